use crate::{
    error::ErrorKind,
    similarity::{adjusted_cosine, index_users},
};
use anyhow::Error;
use dataset::{Item, User};
use log::debug;
use scoped_pool::Pool;
use std::{collections::HashMap, hash::Hash, sync::Mutex, time::Instant};

/// A weighted edge to a neighboring item in the similarity graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityEdge<ItemId> {
    pub neighbor: ItemId,
    pub weight: f64,
}

/// The sparse, symmetric item-to-item similarity graph. If `(i -> j, w)` is
/// present then `(j -> i, w)` is present with the identical weight; item
/// pairs without a common rater have no edge in either direction.
#[derive(Debug, PartialEq)]
pub struct SimilarityStore<ItemId: Hash + Eq> {
    edges: HashMap<ItemId, Vec<SimilarityEdge<ItemId>>>,
}

impl<ItemId: Hash + Eq> Default for SimilarityStore<ItemId> {
    fn default() -> Self {
        Self {
            edges: HashMap::new(),
        }
    }
}

impl<ItemId> SimilarityStore<ItemId>
where
    ItemId: Hash + Eq,
{
    pub fn neighbors(&self, item: &ItemId) -> Option<&[SimilarityEdge<ItemId>]> {
        self.edges.get(item).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

pub struct SimilarityMatrixBuilder {
    pool_size: usize,
}

impl SimilarityMatrixBuilder {
    pub fn new(pool_size: usize) -> Result<Self, Error> {
        if pool_size == 0 {
            return Err(ErrorKind::InvalidPoolSize.into());
        }

        Ok(Self { pool_size })
    }

    /// Computes the full similarity graph for the given snapshot and returns
    /// it by value, fully populated. One unit of work per index `i` compares
    /// item `i` against every item `j > i`, so each unordered pair is scored
    /// exactly once by exactly one worker; the queue of units amortizes the
    /// triangular load imbalance across the fixed-size pool. The scoped pool
    /// joins every unit before this function returns.
    pub fn build<UserId, ItemId>(
        &self,
        items: &[Item<ItemId, UserId>],
        users: &[User<UserId, ItemId>],
    ) -> SimilarityStore<ItemId>
    where
        UserId: Hash + Eq + Sync,
        ItemId: Hash + Eq + Ord + Clone + Sync + Send,
    {
        let started = Instant::now();
        let user_index = index_users(users);

        // One slot per item, allocated before any worker runs. Workers only
        // append to existing slots, never insert new keys.
        let slots: Vec<Mutex<Vec<SimilarityEdge<ItemId>>>> =
            items.iter().map(|_| Mutex::new(Vec::new())).collect();

        let pool = Pool::new(self.pool_size);
        pool.scoped(|scope| {
            for (i, item_a) in items.iter().enumerate() {
                let slots = &slots;
                let user_index = &user_index;

                scope.execute(move || {
                    for (j, item_b) in items.iter().enumerate().skip(i + 1) {
                        if let Some(weight) = adjusted_cosine(item_a, item_b, user_index) {
                            slots[i].lock().unwrap().push(SimilarityEdge {
                                neighbor: item_b.id().clone(),
                                weight,
                            });
                            slots[j].lock().unwrap().push(SimilarityEdge {
                                neighbor: item_a.id().clone(),
                                weight,
                            });
                        }
                    }
                });
            }
        });
        pool.shutdown();

        let mut edges = HashMap::with_capacity(items.len());
        for (item, slot) in items.iter().zip(slots) {
            let mut list = slot.into_inner().unwrap();
            // Sorted so the store contents never depend on how the workers
            // interleaved their appends.
            list.sort_by(|a, b| a.neighbor.cmp(&b.neighbor));
            edges.insert(item.id().clone(), list);
        }

        debug!(
            "similarity store built for {} items with pool size {} in {:?}",
            items.len(),
            self.pool_size,
            started.elapsed()
        );

        SimilarityStore { edges }
    }
}
