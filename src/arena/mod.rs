//! Memory management for the batch assembly path.
//!
//! Blob and string cells are copied once into a `BlobArena` when a table is staged.
//! The batch descriptors handed to the push strategy borrow straight from the arena
//! blocks, so no cell is copied again before submission.

pub mod blob_arena;

pub use blob_arena::{BlobArena, BlobRef, DEFAULT_BLOCK_CAPACITY};
