use dataset::{Item, User};
use std::{collections::HashMap, hash::Hash};

pub type UserIndex<'a, UserId, ItemId> = HashMap<&'a UserId, &'a User<UserId, ItemId>>;

pub fn index_users<UserId, ItemId>(
    users: &[User<UserId, ItemId>],
) -> UserIndex<'_, UserId, ItemId>
where
    UserId: Hash + Eq,
    ItemId: Hash + Eq,
{
    users.iter().map(|user| (user.id(), user)).collect()
}

/// Adjusted cosine similarity between two items, computed over the users
/// who rated both. Each rating is centered on its user's mean before the
/// cosine is taken, which discounts differing rating scales across users.
///
/// Returns `None` when the items share no rater. A zero denominator (every
/// common rater sits exactly on their mean) yields `Some(1.0)`; that value
/// is a defined fallback, not a derived correlation.
pub fn adjusted_cosine<UserId, ItemId>(
    item_a: &Item<ItemId, UserId>,
    item_b: &Item<ItemId, UserId>,
    users: &UserIndex<'_, UserId, ItemId>,
) -> Option<f64>
where
    UserId: Hash + Eq,
    ItemId: Hash + Eq,
{
    let mut cov = None;
    let mut dev_a = 0.0;
    let mut dev_b = 0.0;

    for rater in item_a.raters() {
        let user = match users.get(rater) {
            Some(user) => *user,
            None => continue,
        };

        let rating_b = match user.rating(item_b.id()) {
            Some(rating) => rating,
            None => continue,
        };

        let rating_a = match user.rating(item_a.id()) {
            Some(rating) => rating,
            None => continue,
        };

        let delta_a = rating_a - user.mean_rating();
        let delta_b = rating_b - user.mean_rating();

        *cov.get_or_insert(0.0) += delta_a * delta_b;
        dev_a += delta_a.powi(2);
        dev_b += delta_b.powi(2);
    }

    let num = cov?;
    let dem = dev_a.sqrt() * dev_b.sqrt();

    if dem == 0.0 {
        Some(1.0)
    } else {
        Some(num / dem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use dataset::Dataset;

    fn parts_of(
        triples: &[(&'static str, &'static str, f64)],
    ) -> (
        Vec<Item<&'static str, &'static str>>,
        Vec<User<&'static str, &'static str>>,
    ) {
        let mut dataset = Dataset::new();
        for (user, item, score) in triples {
            dataset.add_rating(*user, *item, *score);
        }
        dataset.into_parts()
    }

    fn item<'a>(
        items: &'a [Item<&'static str, &'static str>],
        id: &str,
    ) -> &'a Item<&'static str, &'static str> {
        items.iter().find(|item| *item.id() == id).unwrap()
    }

    #[test]
    fn opposite_deviations_give_minus_one() {
        let (items, users) = parts_of(&[
            ("u1", "a", 5.),
            ("u1", "b", 3.),
            ("u2", "a", 4.),
            ("u2", "b", 4.),
        ]);
        let index = index_users(&users);

        let similarity = adjusted_cosine(item(&items, "a"), item(&items, "b"), &index);
        assert_approx_eq!(-1., similarity.unwrap());
    }

    #[test]
    fn no_common_rater_gives_none() {
        let (items, users) = parts_of(&[("u1", "a", 5.), ("u2", "b", 3.)]);
        let index = index_users(&users);

        assert!(adjusted_cosine(item(&items, "a"), item(&items, "b"), &index).is_none());
    }

    #[test]
    fn zero_denominator_falls_back_to_one() {
        // The only common rater sits exactly on their mean for both items.
        let (items, users) = parts_of(&[("u1", "a", 3.), ("u1", "b", 3.)]);
        let index = index_users(&users);

        let similarity = adjusted_cosine(item(&items, "a"), item(&items, "b"), &index);
        assert_eq!(Some(1.0), similarity);
    }

    #[test]
    fn similarity_is_bounded() {
        let (items, users) = parts_of(&[
            ("u1", "a", 5.),
            ("u1", "b", 1.),
            ("u1", "c", 3.),
            ("u2", "a", 4.),
            ("u2", "b", 2.),
            ("u2", "c", 5.),
            ("u3", "a", 1.),
            ("u3", "b", 5.),
            ("u3", "c", 2.),
        ]);
        let index = index_users(&users);

        for first in &items {
            for second in &items {
                if first.id() == second.id() {
                    continue;
                }

                let similarity = adjusted_cosine(first, second, &index).unwrap();
                assert!(similarity >= -1.0 - 1e-9 && similarity <= 1.0 + 1e-9);
            }
        }
    }
}
