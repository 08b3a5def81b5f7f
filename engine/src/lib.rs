pub mod error;
pub mod matrix;
pub mod prediction;
pub mod similarity;

use crate::matrix::{SimilarityMatrixBuilder, SimilarityStore};
use crate::prediction::{predict, Recommendation};
use anyhow::Error;
use dataset::{Item, User};
use log::info;
use std::hash::Hash;

/// The operation surface an external coordinator drives. A single
/// coordinator is assumed: the mutating operations take `&mut self`, so
/// overlapping calls from several threads are ruled out at compile time
/// rather than by convention.
pub trait RecommenderAlgorithm<UserId, ItemId> {
    /// Replaces the working item snapshot. No validation, no other effect.
    fn set_items(&mut self, items: Vec<Item<ItemId, UserId>>);

    /// Replaces the working user snapshot. Same contract as `set_items`.
    fn set_users(&mut self, users: Vec<User<UserId, ItemId>>);

    /// Fully rebuilds the similarity store from the current snapshots,
    /// blocking until it is complete. The previous store stays readable
    /// until the new one replaces it in full; a partially built store is
    /// never observable.
    fn update(&mut self);

    /// Ranked predictions for every item the user has not rated, against
    /// the store built by the last `update`. A user id that was never part
    /// of `set_users` yields an empty result, not an error.
    fn compute_recommendations(&self, user: &UserId) -> Vec<Recommendation<ItemId>>;
}

/// Item-based collaborative filtering: adjusted-cosine similarities built
/// in parallel, weighted-sum predictions on top.
pub struct ItemSimilarity<UserId, ItemId: Hash + Eq> {
    items: Vec<Item<ItemId, UserId>>,
    users: Vec<User<UserId, ItemId>>,
    store: SimilarityStore<ItemId>,
    builder: SimilarityMatrixBuilder,
}

impl<UserId, ItemId: Hash + Eq> ItemSimilarity<UserId, ItemId> {
    pub fn new(pool_size: usize) -> Result<Self, Error> {
        Ok(Self {
            items: Vec::new(),
            users: Vec::new(),
            store: SimilarityStore::default(),
            builder: SimilarityMatrixBuilder::new(pool_size)?,
        })
    }

    pub fn store(&self) -> &SimilarityStore<ItemId> {
        &self.store
    }
}

impl<UserId, ItemId> RecommenderAlgorithm<UserId, ItemId> for ItemSimilarity<UserId, ItemId>
where
    UserId: Hash + Eq + Sync,
    ItemId: Hash + Eq + Ord + Clone + Sync + Send,
{
    fn set_items(&mut self, items: Vec<Item<ItemId, UserId>>) {
        self.items = items;
    }

    fn set_users(&mut self, users: Vec<User<UserId, ItemId>>) {
        self.users = users;
    }

    fn update(&mut self) {
        self.store = self.builder.build(&self.items, &self.users);
        info!(
            "similarity store rebuilt, {} items in the graph",
            self.store.len()
        );
    }

    fn compute_recommendations(&self, user: &UserId) -> Vec<Recommendation<ItemId>> {
        match self.users.iter().find(|known| known.id() == user) {
            Some(user) => predict(user, &self.items, &self.store),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use dataset::Dataset;

    fn algorithm_over(
        triples: &[(&'static str, &'static str, f64)],
        pool_size: usize,
    ) -> ItemSimilarity<&'static str, &'static str> {
        let mut dataset = Dataset::new();
        for (user, item, score) in triples {
            dataset.add_rating(*user, *item, *score);
        }
        let (items, users) = dataset.into_parts();

        let mut algorithm = ItemSimilarity::new(pool_size).unwrap();
        algorithm.set_items(items);
        algorithm.set_users(users);
        algorithm
    }

    #[test]
    fn unknown_user_gets_nothing() {
        let mut algorithm = algorithm_over(
            &[("u1", "a", 5.), ("u1", "b", 3.), ("u2", "a", 4.)],
            2,
        );
        algorithm.update();

        assert!(algorithm.compute_recommendations(&"nobody").is_empty());
    }

    #[test]
    fn before_update_predictions_carry_no_signal() {
        let algorithm = algorithm_over(&[("u1", "a", 5.), ("u2", "b", 3.)], 2);

        // Without an update the store is empty, so every candidate comes
        // back with a NaN score but nothing is lost.
        let recommendations = algorithm.compute_recommendations(&"u1");
        assert_eq!(1, recommendations.len());
        assert!(recommendations[0].score().is_nan());
    }

    #[test]
    fn end_to_end_recommendation() {
        let mut algorithm = algorithm_over(
            &[
                ("u1", "a", 5.),
                ("u1", "b", 3.),
                ("u2", "a", 4.),
                ("u2", "b", 4.),
                ("u3", "a", 5.),
            ],
            2,
        );
        algorithm.update();

        let recommendations = algorithm.compute_recommendations(&"u3");
        assert_eq!(1, recommendations.len());
        assert_eq!("b", *recommendations[0].item());
        assert_approx_eq!(-5., recommendations[0].score());
    }

    #[test]
    fn update_replaces_the_store_in_full() {
        let mut algorithm = algorithm_over(
            &[
                ("u1", "a", 5.),
                ("u1", "b", 3.),
                ("u2", "a", 4.),
                ("u2", "b", 4.),
            ],
            1,
        );
        algorithm.update();
        assert_eq!(2, algorithm.store().len());

        // Shrinking the snapshots and updating again discards the old edges.
        let mut dataset = Dataset::new();
        dataset.add_rating("u1", "a", 5.);
        let (items, users) = dataset.into_parts();
        algorithm.set_items(items);
        algorithm.set_users(users);
        algorithm.update();

        assert_eq!(1, algorithm.store().len());
        assert!(algorithm.store().neighbors(&"b").is_none());
    }
}
