//! Weighted categorical selection.
//!
//! Weights need not sum to 1. The draw is scaled to the total weight and
//! the list is walked in order, so bucket order is part of the contract.

use crate::rng::LcgRng;

/// Anything that carries a selection weight.
pub trait Weighted {
    fn weight(&self) -> f64;
}

impl<T> Weighted for (T, f64) {
    fn weight(&self) -> f64 {
        self.1
    }
}

/// Pick one bucket from `items` in proportion to its weight.
///
/// Returns `None` only for an empty list. When floating-point rounding
/// walks past every bucket the last one is returned.
pub fn pick_weighted<'a, T: Weighted>(rng: &mut LcgRng, items: &'a [T]) -> Option<&'a T> {
    pick_weighted_by(rng, items, Weighted::weight)
}

/// Same as [`pick_weighted`] with the weight supplied by a closure, for
/// callers that re-weight a static table per asset.
pub fn pick_weighted_by<'a, T, F>(rng: &mut LcgRng, items: &'a [T], weight: F) -> Option<&'a T>
where
    F: Fn(&T) -> f64,
{
    let total: f64 = items.iter().map(|i| weight(i).max(0.0)).sum();
    let roll = rng.next_f64() * total;
    let mut cumulative = 0.0;
    for item in items {
        cumulative += weight(item).max(0.0);
        if roll < cumulative {
            return Some(item);
        }
    }
    items.last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respects_relative_weights() {
        let buckets = [("rare", 1.0), ("common", 9.0)];
        let mut rng = LcgRng::new(2024);
        let common = (0..10_000)
            .filter(|_| pick_weighted(&mut rng, &buckets).map(|b| b.0) == Some("common"))
            .count();
        assert!(
            (8_700..9_300).contains(&common),
            "expected ~90% common, got {common}/10000"
        );
    }

    #[test]
    fn weights_need_not_sum_to_one() {
        let buckets = [("a", 30.0), ("b", 30.0), ("c", 40.0)];
        let mut rng = LcgRng::new(5);
        for _ in 0..1_000 {
            assert!(pick_weighted(&mut rng, &buckets).is_some());
        }
    }

    #[test]
    fn zero_weight_buckets_are_never_picked() {
        let buckets = [("never", 0.0), ("always", 2.5)];
        let mut rng = LcgRng::new(99);
        for _ in 0..1_000 {
            assert_eq!(pick_weighted(&mut rng, &buckets).map(|b| b.0), Some("always"));
        }
    }

    #[test]
    fn all_zero_weights_fall_back_to_last() {
        let buckets = [("first", 0.0), ("last", 0.0)];
        let mut rng = LcgRng::new(1);
        assert_eq!(pick_weighted(&mut rng, &buckets).map(|b| b.0), Some("last"));
    }

    #[test]
    fn empty_list_yields_none() {
        let buckets: [(&str, f64); 0] = [];
        let mut rng = LcgRng::new(1);
        assert!(pick_weighted(&mut rng, &buckets).is_none());
    }
}
