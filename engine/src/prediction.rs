use crate::matrix::SimilarityStore;
use dataset::{Item, User};
use std::{cmp::Ordering, hash::Hash};

/// A candidate item together with its predicted score. The natural order
/// ranks higher scores first, breaks ties by item id and places NaN scores
/// (predictions without enough data, see [`predict`]) after every number,
/// so sorting is total and deterministic.
#[derive(Debug, Clone)]
pub struct Recommendation<ItemId> {
    item: ItemId,
    score: f64,
}

impl<ItemId> Recommendation<ItemId> {
    pub fn new(item: ItemId, score: f64) -> Self {
        Self { item, score }
    }

    pub fn item(&self) -> &ItemId {
        &self.item
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

impl<ItemId> PartialEq for Recommendation<ItemId>
where
    ItemId: Ord,
{
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<ItemId> Eq for Recommendation<ItemId> where ItemId: Ord {}

impl<ItemId> PartialOrd for Recommendation<ItemId>
where
    ItemId: Ord,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<ItemId> Ord for Recommendation<ItemId>
where
    ItemId: Ord,
{
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.score.is_nan(), other.score.is_nan()) {
            (true, true) => self.item.cmp(&other.item),
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => other
                .score
                .total_cmp(&self.score)
                .then_with(|| self.item.cmp(&other.item)),
        }
    }
}

/// Weighted-sum prediction over the similarity graph: for every item the
/// user has not rated, the predicted score is the similarity-weighted
/// average of the user's ratings on that item's neighbors, normalized by
/// the sum of absolute weights used.
///
/// Every unrated item yields a recommendation. When none of an item's
/// neighbors were rated by the user the score degrades to NaN (0/0); that
/// is the documented signal for "insufficient data", not an error. The
/// result carries the full candidate set, sorted; truncation is up to the
/// caller.
pub fn predict<UserId, ItemId>(
    user: &User<UserId, ItemId>,
    items: &[Item<ItemId, UserId>],
    store: &SimilarityStore<ItemId>,
) -> Vec<Recommendation<ItemId>>
where
    UserId: Hash + Eq,
    ItemId: Hash + Eq + Ord + Clone,
{
    let mut recommendations = Vec::new();

    for item in items {
        if user.has_rated(item.id()) {
            continue;
        }

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for edge in store.neighbors(item.id()).unwrap_or(&[]) {
            if let Some(rating) = user.rating(&edge.neighbor) {
                numerator += edge.weight * rating;
                denominator += edge.weight.abs();
            }
        }

        recommendations.push(Recommendation::new(item.id().clone(), numerator / denominator));
    }

    recommendations.sort();
    recommendations
}
