//! This module contains the permutation engine used to reorder parallel column arrays.
//!
//! Sorting is done on row indices rather than on the rows themselves. The resulting
//! permutation can then be applied, independently, to the timestamp index and to
//! every value column of a table, so a logical row stays coherent after reordering.
//!
//! `apply_permutation` is single-use: walking the cycles overwrites every slot of the
//! permutation with its own index. Reordering several arrays by the same permutation
//! goes through `apply_permutation_with_scratch`, which works on a copy.

use bitvec::prelude::*;

use super::stable_sort::stable_order;

//==================================================================================
// 1. Validation Helpers
//==================================================================================

/// Returns `true` if `perm` contains every index of `[0, perm.len())` exactly once.
pub fn is_permutation(perm: &[usize]) -> bool {
    let mut seen = bitvec![0; perm.len()];
    for &idx in perm {
        if idx >= perm.len() || seen[idx] {
            return false;
        }
        seen.set(idx, true);
    }
    true
}

/// Returns `true` if `perm` maps every index to itself.
pub fn is_identity(perm: &[usize]) -> bool {
    perm.iter().enumerate().all(|(i, &p)| i == p)
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Computes the permutation that stably sorts `values` under `less`.
///
/// Applying the returned permutation to `values` (or to any array parallel to it)
/// yields a sequence ordered by `less`, with ties kept in original index order.
pub fn sort_permutation<T, F>(values: &[T], less: F) -> Vec<usize>
where
    F: FnMut(&T, &T) -> bool,
{
    stable_order(values, less)
}

/// Reorders `items` in place so that `items[k]` becomes the old `items[perm[k]]`.
///
/// Runs in O(n) swaps with O(1) extra space by following the cycles of `perm`.
/// On return `perm` holds the identity permutation.
///
/// `items` and `perm` must have the same length and `perm` must be a valid
/// permutation; both are checked in debug builds only.
pub fn apply_permutation<T>(items: &mut [T], perm: &mut [usize]) {
    debug_assert_eq!(
        items.len(),
        perm.len(),
        "apply_permutation: items and permutation lengths differ"
    );
    debug_assert!(
        is_permutation(perm),
        "apply_permutation: not a valid permutation"
    );

    for i in 0..items.len() {
        let mut current = i;
        while perm[current] != i {
            let next = perm[current];
            items.swap(current, next);
            perm[current] = current;
            current = next;
        }
        perm[current] = current;
    }
}

/// Applies `perm` to `items` through `scratch`, leaving `perm` untouched.
///
/// `scratch` is overwritten and may be reused across calls, which makes this the
/// cheap way to reorder every parallel column of a table by one permutation.
pub fn apply_permutation_with_scratch<T>(items: &mut [T], perm: &[usize], scratch: &mut Vec<usize>) {
    scratch.clear();
    scratch.extend_from_slice(perm);
    apply_permutation(items, scratch);
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
