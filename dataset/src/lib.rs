pub mod error;

use crate::error::ErrorKind;
use anyhow::Error;
use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
    io::Read,
};

pub type Ratings<ItemId, Value = f64> = HashMap<ItemId, Value>;

/// A user and their ratings. The mean rating is computed once at
/// construction, a user with no ratings has a mean of zero.
#[derive(Debug, Clone)]
pub struct User<UserId, ItemId> {
    id: UserId,
    ratings: Ratings<ItemId>,
    mean: f64,
}

impl<UserId, ItemId> User<UserId, ItemId>
where
    ItemId: Hash + Eq,
{
    pub fn new(id: UserId, ratings: Ratings<ItemId>) -> Self {
        let mean = if ratings.is_empty() {
            0.0
        } else {
            ratings.values().sum::<f64>() / ratings.len() as f64
        };

        Self { id, ratings, mean }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn has_rated(&self, item: &ItemId) -> bool {
        self.ratings.contains_key(item)
    }

    pub fn rating(&self, item: &ItemId) -> Option<f64> {
        self.ratings.get(item).copied()
    }

    pub fn mean_rating(&self) -> f64 {
        self.mean
    }

    pub fn rated_items(&self) -> impl Iterator<Item = &ItemId> {
        self.ratings.keys()
    }

    pub fn ratings(&self) -> &Ratings<ItemId> {
        &self.ratings
    }
}

/// An item and the set of users who rated it.
#[derive(Debug, Clone)]
pub struct Item<ItemId, UserId> {
    id: ItemId,
    raters: HashSet<UserId>,
}

impl<ItemId, UserId> Item<ItemId, UserId>
where
    UserId: Hash + Eq,
{
    pub fn new(id: ItemId, raters: HashSet<UserId>) -> Self {
        Self { id, raters }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn raters(&self) -> impl Iterator<Item = &UserId> {
        self.raters.iter()
    }
}

/// Accumulates (user, item, score) triples and turns them into the
/// item/user collections the engine consumes. Rating the same (user, item)
/// twice keeps the latest score.
#[derive(Debug, Clone)]
pub struct Dataset<UserId, ItemId> {
    ratings: HashMap<UserId, Ratings<ItemId>>,
}

impl<UserId, ItemId> Default for Dataset<UserId, ItemId> {
    fn default() -> Self {
        Self {
            ratings: HashMap::new(),
        }
    }
}

impl<UserId, ItemId> Dataset<UserId, ItemId>
where
    UserId: Hash + Eq + Clone,
    ItemId: Hash + Eq + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rating(&mut self, user: UserId, item: ItemId, score: f64) {
        self.ratings.entry(user).or_default().insert(item, score);
    }

    pub fn into_parts(self) -> (Vec<Item<ItemId, UserId>>, Vec<User<UserId, ItemId>>) {
        let mut raters: HashMap<ItemId, HashSet<UserId>> = HashMap::new();
        for (user_id, ratings) in &self.ratings {
            for item_id in ratings.keys() {
                raters
                    .entry(item_id.clone())
                    .or_default()
                    .insert(user_id.clone());
            }
        }

        let items = raters
            .into_iter()
            .map(|(id, raters)| Item::new(id, raters))
            .collect();

        let users = self
            .ratings
            .into_iter()
            .map(|(id, ratings)| User::new(id, ratings))
            .collect();

        (items, users)
    }
}

/// Reads `user,item,score` rows (no header) into a dataset.
pub fn load_csv<R: Read>(reader: R) -> Result<Dataset<String, String>, Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut dataset = Dataset::new();
    for (i, record) in csv_reader.records().enumerate() {
        let line = i + 1;
        let record = record?;

        if record.len() != 3 {
            return Err(ErrorKind::MalformedRow(line).into());
        }

        let score: f64 = record[2]
            .parse()
            .map_err(|_| ErrorKind::InvalidScore(line))?;

        dataset.add_rating(record[0].to_owned(), record[1].to_owned(), score);
    }

    Ok(dataset)
}
