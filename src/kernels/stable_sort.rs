//! This module contains the stable sort kernel that feeds the permutation engine.
//!
//! Callers describe the order with a "less" predicate, the way a column comparator
//! is usually written. The kernel is a bottom-up merge sort over row indices that
//! only ever asks `less`, so a predicate that is not a strict weak order (NaN
//! doubles, a non-strict `<=`) yields some permutation of the input instead of a
//! panic. An element only moves ahead of an earlier one when it is strictly less,
//! so both `<` and `<=` keep equivalent elements in their original order.

use super::permutation::apply_permutation;

/// Length of the runs sorted by insertion before merging starts.
const INSERTION_RUN: usize = 16;

//==================================================================================
// 1. Core Logic
//==================================================================================

/// `a` sorts before `b`: less one way and not the other.
#[inline]
fn precedes<T, F>(a: &T, b: &T, less: &mut F) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    less(a, b) && !less(b, a)
}

/// Merges two sorted index runs into `out`, taking from `left` on ties.
fn merge_runs<T, F>(data: &[T], left: &[usize], right: &[usize], out: &mut [usize], less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let (mut i, mut j) = (0, 0);
    for slot in out.iter_mut() {
        let take_right = j < right.len()
            && (i == left.len() || precedes(&data[right[j]], &data[left[i]], less));
        if take_right {
            *slot = right[j];
            j += 1;
        } else {
            *slot = left[i];
            i += 1;
        }
    }
}

/// The indices of `data` in stably sorted order.
pub(crate) fn stable_order<T, F>(data: &[T], mut less: F) -> Vec<usize>
where
    F: FnMut(&T, &T) -> bool,
{
    let n = data.len();
    let mut order: Vec<usize> = (0..n).collect();
    if n <= 1 {
        return order;
    }

    for start in (0..n).step_by(INSERTION_RUN) {
        let end = (start + INSERTION_RUN).min(n);
        for i in start + 1..end {
            let mut j = i;
            while j > start && precedes(&data[order[j]], &data[order[j - 1]], &mut less) {
                order.swap(j, j - 1);
                j -= 1;
            }
        }
    }

    let mut merged = vec![0usize; n];
    let mut width = INSERTION_RUN;
    while width < n {
        for start in (0..n).step_by(2 * width) {
            let mid = (start + width).min(n);
            let end = (start + 2 * width).min(n);
            merge_runs(
                data,
                &order[start..mid],
                &order[mid..end],
                &mut merged[start..end],
                &mut less,
            );
        }
        std::mem::swap(&mut order, &mut merged);
        width *= 2;
    }
    order
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Sorts `data` in place so that it is non-decreasing under `less`, keeping the
/// relative order of elements that `less` treats as equivalent.
pub fn stable_sort_by<T, F>(data: &mut [T], less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    if data.len() <= 1 {
        return;
    }
    let mut order = stable_order(data, less);
    apply_permutation(data, &mut order);
}

/// Stable sort using `<`.
pub fn stable_sort<T: PartialOrd>(data: &mut [T]) {
    stable_sort_by(data, |a, b| a < b);
}

/// Stable sort on a derived key.
pub fn stable_sort_by_key<T, K, F>(data: &mut [T], mut key: F)
where
    K: PartialOrd,
    F: FnMut(&T) -> K,
{
    stable_sort_by(data, |a, b| key(a) < key(b));
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_sort_default_less() {
        let mut data = vec![5, 3, 9, 1, 3, 7];
        stable_sort(&mut data);
        assert_eq!(data, vec![1, 3, 3, 5, 7, 9]);
    }

    #[test]
    fn test_stable_sort_by_keeps_ties_in_input_order() {
        // (key, original position)
        let mut data = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (0, 'e')];
        stable_sort_by(&mut data, |x, y| x.0 < y.0);
        assert_eq!(data, vec![(0, 'e'), (1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }

    #[test]
    fn test_stable_sort_by_non_strict_predicate_is_still_stable() {
        let mut data = vec![(3, 0), (1, 1), (3, 2), (1, 3)];
        stable_sort_by(&mut data, |x, y| x.0 <= y.0);
        assert_eq!(data, vec![(1, 1), (1, 3), (3, 0), (3, 2)]);
    }

    #[test]
    fn test_stable_sort_by_descending_predicate() {
        let mut data = vec![1, 4, 2, 4, 3];
        stable_sort_by(&mut data, |a, b| a > b);
        assert_eq!(data, vec![4, 4, 3, 2, 1]);
    }

    #[test]
    fn test_stable_sort_by_key() {
        let mut words = vec!["ccc", "a", "bb", "d", "ee"];
        stable_sort_by_key(&mut words, |w| w.len());
        assert_eq!(words, vec!["a", "d", "bb", "ee", "ccc"]);
    }

    #[test]
    fn test_matches_std_stable_sort_on_random_input() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0x5eed);
        for len in [2, 15, 16, 17, 33, 100, 257, 1000] {
            let data: Vec<(u8, usize)> =
                (0..len).map(|pos| (rng.random_range(0..8u8), pos)).collect();

            let mut ours = data.clone();
            stable_sort_by(&mut ours, |a, b| a.0 < b.0);
            let mut expected = data;
            expected.sort_by_key(|x| x.0);

            assert_eq!(ours, expected, "len {}", len);
        }
    }

    #[test]
    fn test_nan_input_does_not_panic() {
        use crate::types::DOUBLE_NULL;
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let mut data: Vec<f64> = (0..500)
                .map(|_| {
                    if rng.random_range(0..10) == 0 {
                        DOUBLE_NULL
                    } else {
                        rng.random_range(-100.0..100.0)
                    }
                })
                .collect();
            let nulls = data.iter().filter(|v| v.is_nan()).count();

            stable_sort(&mut data);

            assert_eq!(data.len(), 500);
            assert_eq!(data.iter().filter(|v| v.is_nan()).count(), nulls);
        }
    }

    #[test]
    fn test_values_without_nan_between_them_stay_ordered() {
        let mut data = vec![3.0, 1.0, 2.0, f64::NAN, 9.0, 7.0];
        stable_sort(&mut data);
        // NaN is equivalent to everything, so each side of it is sorted on its own.
        assert_eq!(&data[..3], &[1.0, 2.0, 3.0]);
        assert!(data[3].is_nan());
        assert_eq!(&data[4..], &[7.0, 9.0]);
    }

    #[test]
    fn test_stable_sort_empty_and_single() {
        let mut empty: Vec<i32> = vec![];
        stable_sort(&mut empty);
        assert!(empty.is_empty());

        let mut single = vec![42];
        stable_sort(&mut single);
        assert_eq!(single, vec![42]);
    }
}
