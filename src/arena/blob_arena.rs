// In: src/arena/blob_arena.rs

//! A growable, chunked byte store with stable addresses.
//!
//! The arena is an append-only list of fixed-capacity blocks. A blob is copied into
//! the current block and identified afterwards by a `BlobRef` handle. Blocks are
//! never reallocated, so the slice a handle resolves to keeps its address for the
//! whole arena generation, i.e. until the next `clear()`.
//!
//! `clear()` keeps every block allocated so that the next batch of a similar size
//! fills the same memory again.

use crate::error::IngestError;

/// Capacity of the first block when none is given.
pub const DEFAULT_BLOCK_CAPACITY: usize = 64;

//==================================================================================
// 1. Handles
//==================================================================================

/// A handle to a blob stored in a `BlobArena`.
///
/// Handles are only meaningful for the arena (and generation) that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlobRef {
    generation: u64,
    block: usize,
    offset: usize,
    len: usize,
}

impl BlobRef {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn block(&self) -> usize {
        self.block
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

//==================================================================================
// 2. Blocks
//==================================================================================

struct BlobBlock {
    storage: Box<[u8]>,
    size: usize,
}

impl BlobBlock {
    /// Allocates a zeroed block, reporting allocation failure instead of aborting.
    fn allocate(capacity: usize) -> Result<Self, IngestError> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| IngestError::AllocationFailed {
                requested: capacity,
            })?;
        // Stays within the reserved capacity, so neither call reallocates.
        storage.resize(capacity, 0u8);
        Ok(Self {
            storage: storage.into_boxed_slice(),
            size: 0,
        })
    }

    fn capacity(&self) -> usize {
        self.storage.len()
    }

    fn can_store(&self, bytes_cnt: usize) -> bool {
        bytes_cnt <= self.capacity() - self.size
    }

    /// Copies `bytes` at the current offset and returns that offset.
    fn add(&mut self, bytes: &[u8]) -> usize {
        debug_assert!(self.can_store(bytes.len()));
        let offset = self.size;
        self.storage[offset..offset + bytes.len()].copy_from_slice(bytes);
        self.size += bytes.len();
        offset
    }

    fn clear(&mut self) {
        self.size = 0;
    }
}

//==================================================================================
// 3. The Arena
//==================================================================================

type AllocateBlock = fn(usize) -> Result<BlobBlock, IngestError>;

/// Stores blobs in blocks that stay put until the arena is cleared.
pub struct BlobArena {
    blocks: Vec<BlobBlock>,
    cur_block: usize,
    filled_blocks_size: usize,
    generation: u64,
    allocate_block: AllocateBlock,
}

impl BlobArena {
    /// Creates an arena whose first block holds `DEFAULT_BLOCK_CAPACITY` bytes.
    pub fn new() -> Result<Self, IngestError> {
        Self::with_capacity(DEFAULT_BLOCK_CAPACITY)
    }

    /// Creates an arena whose first block holds `initial_capacity` bytes.
    pub fn with_capacity(initial_capacity: usize) -> Result<Self, IngestError> {
        Self::with_allocator(initial_capacity, BlobBlock::allocate)
    }

    fn with_allocator(
        initial_capacity: usize,
        allocate_block: AllocateBlock,
    ) -> Result<Self, IngestError> {
        Ok(Self {
            blocks: vec![allocate_block(initial_capacity)?],
            cur_block: 0,
            filled_blocks_size: 0,
            generation: 0,
            allocate_block,
        })
    }

    /// Copies `bytes` into the arena and returns a handle to the stored copy.
    ///
    /// When the current block is too small the arena moves on to the next existing
    /// block with room, or allocates a new block of `max(len, 2 * current capacity)`.
    /// A failed allocation leaves the arena exactly as it was.
    pub fn add(&mut self, bytes: &[u8]) -> Result<BlobRef, IngestError> {
        let len = bytes.len();

        // Work on copies of the cursor state so that nothing changes before the
        // new block, if any, has been allocated.
        let mut cur = self.cur_block;
        let mut filled = self.filled_blocks_size;

        while !self.blocks[cur].can_store(len) {
            filled += self.blocks[cur].size;
            if cur + 1 == self.blocks.len() {
                let capacity = std::cmp::max(len, self.blocks[cur].capacity().saturating_mul(2));
                let block = (self.allocate_block)(capacity)?;
                log::info!(
                    "blob arena: allocating block #{} with {} bytes",
                    self.blocks.len(),
                    capacity
                );
                self.blocks.push(block);
                cur += 1;
                break;
            }
            cur += 1;
        }

        self.cur_block = cur;
        self.filled_blocks_size = filled;
        let offset = self.blocks[cur].add(bytes);

        Ok(BlobRef {
            generation: self.generation,
            block: cur,
            offset,
            len,
        })
    }

    /// Resolves a handle of the current generation to the stored bytes.
    pub fn get(&self, blob: BlobRef) -> Option<&[u8]> {
        if blob.generation != self.generation {
            return None;
        }
        let block = self.blocks.get(blob.block())?;
        let end = blob.offset().checked_add(blob.len())?;
        if end > block.size {
            return None;
        }
        Some(&block.storage[blob.offset()..end])
    }

    /// Like `get`, but reports a stale handle as an error.
    pub fn resolve(&self, blob: BlobRef) -> Result<&[u8], IngestError> {
        self.get(blob).ok_or(IngestError::StaleBlob)
    }

    /// Forgets every stored blob while keeping the allocated blocks.
    ///
    /// Handles returned before the call no longer resolve.
    pub fn clear(&mut self) {
        for block in &mut self.blocks {
            block.clear();
        }
        self.cur_block = 0;
        self.filled_blocks_size = 0;
        self.generation += 1;
    }

    /// Total number of blob bytes stored in this generation.
    pub fn bytes_count(&self) -> usize {
        self.filled_blocks_size + self.blocks[self.cur_block].size
    }

    pub fn is_empty(&self) -> bool {
        self.bytes_count() == 0
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Total capacity of all blocks, used or not.
    pub fn allocated_bytes(&self) -> usize {
        self.blocks.iter().map(BlobBlock::capacity).sum()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl std::fmt::Debug for BlobArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobArena")
            .field("blocks", &self.blocks.len())
            .field("cur_block", &self.cur_block)
            .field("bytes_count", &self.bytes_count())
            .field("allocated_bytes", &self.allocated_bytes())
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
#[path = "blob_arena_tests.rs"]
mod tests;
