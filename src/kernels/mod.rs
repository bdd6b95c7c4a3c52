//! This module collects the pure, stateless kernels used while assembling a batch.
//!
//! The kernels operate on plain slices and know nothing about tables, arenas or
//! push strategies. The staging layer composes them to reorder the parallel column
//! arrays of a table so that every logical row stays coherent.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Order-preserving sort driven by a "less" predicate.
pub mod stable_sort;

/// Sort permutations and in-place cycle application.
pub mod permutation;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use self::permutation::{
    apply_permutation, apply_permutation_with_scratch, is_identity, is_permutation,
    sort_permutation,
};
pub use self::stable_sort::{stable_sort, stable_sort_by, stable_sort_by_key};
