use super::*;

fn bytes_of(len: usize, fill: u8) -> Vec<u8> {
    vec![fill; len]
}

#[test]
fn test_small_blobs_share_first_block() {
    let mut arena = BlobArena::with_capacity(64).unwrap();

    arena.add(&bytes_of(10, 1)).unwrap();
    arena.add(&bytes_of(20, 2)).unwrap();
    arena.add(&bytes_of(30, 3)).unwrap();

    assert_eq!(arena.bytes_count(), 60);
    assert_eq!(arena.block_count(), 1);
}

#[test]
fn test_oversized_blob_allocates_doubled_block() {
    let mut arena = BlobArena::with_capacity(64).unwrap();
    for (len, fill) in [(10, 1), (20, 2), (30, 3)] {
        arena.add(&bytes_of(len, fill)).unwrap();
    }

    // 4 bytes left in the first block: a new block of max(100, 64 * 2) is created.
    let big = arena.add(&bytes_of(100, 4)).unwrap();

    assert_eq!(arena.bytes_count(), 160);
    assert_eq!(arena.block_count(), 2);
    assert_eq!(arena.allocated_bytes(), 64 + 128);
    assert_eq!(big.block(), 1);
    assert_eq!(big.offset(), 0);
}

#[test]
fn test_growth_takes_requested_size_when_larger_than_double() {
    let mut arena = BlobArena::with_capacity(8).unwrap();
    arena.add(&bytes_of(100, 9)).unwrap();
    assert_eq!(arena.allocated_bytes(), 8 + 100);
    assert_eq!(arena.bytes_count(), 100);
}

#[test]
fn test_round_trip_content() {
    let mut arena = BlobArena::new().unwrap();
    let a = arena.add(b"hello").unwrap();
    let b = arena.add(b"").unwrap();
    let c = arena.add(b"world, this is a longer payload than the first block").unwrap();

    assert_eq!(arena.get(a), Some(&b"hello"[..]));
    assert_eq!(arena.get(b), Some(&b""[..]));
    assert!(b.is_empty());
    assert_eq!(
        arena.get(c),
        Some(&b"world, this is a longer payload than the first block"[..])
    );
}

#[test]
fn test_addresses_are_stable_across_growth() {
    let mut arena = BlobArena::with_capacity(16).unwrap();
    let mut seen = Vec::new();

    for i in 0..200usize {
        let payload = bytes_of(1 + (i * 7) % 50, i as u8);
        let handle = arena.add(&payload).unwrap();
        let ptr = arena.get(handle).unwrap().as_ptr();
        seen.push((handle, ptr, payload));
    }
    assert!(arena.block_count() > 1);

    for (handle, ptr, payload) in &seen {
        let stored = arena.get(*handle).unwrap();
        assert_eq!(stored.as_ptr(), *ptr);
        assert_eq!(stored, payload.as_slice());
    }
}

#[test]
fn test_clear_resets_count_and_keeps_blocks() {
    let mut arena = BlobArena::with_capacity(64).unwrap();
    let first = arena.add(&bytes_of(40, 1)).unwrap();
    let first_ptr = arena.get(first).unwrap().as_ptr();
    arena.add(&bytes_of(100, 2)).unwrap();
    assert_eq!(arena.block_count(), 2);

    arena.clear();

    assert_eq!(arena.bytes_count(), 0);
    assert!(arena.is_empty());
    assert_eq!(arena.block_count(), 2);
    assert_eq!(arena.get(first), None);
    assert!(matches!(arena.resolve(first), Err(IngestError::StaleBlob)));

    // The next generation fills the same memory again.
    let again = arena.add(&bytes_of(40, 3)).unwrap();
    assert_eq!(arena.get(again).unwrap().as_ptr(), first_ptr);
    assert_eq!(again.generation(), first.generation() + 1);
}

#[test]
fn test_clear_reuses_later_blocks_before_allocating() {
    let mut arena = BlobArena::with_capacity(64).unwrap();
    arena.add(&bytes_of(100, 1)).unwrap(); // second block of 128 bytes
    arena.clear();

    let handle = arena.add(&bytes_of(100, 2)).unwrap();

    assert_eq!(handle.block(), 1);
    assert_eq!(arena.block_count(), 2);
    assert_eq!(arena.bytes_count(), 100);
}

#[test]
fn test_stability_holds_within_new_generation() {
    let mut arena = BlobArena::with_capacity(32).unwrap();
    for _ in 0..10 {
        arena.add(&bytes_of(30, 0)).unwrap();
    }
    arena.clear();

    let mut seen = Vec::new();
    for i in 0..50u8 {
        let handle = arena.add(&bytes_of(usize::from(i) + 1, i)).unwrap();
        seen.push((handle, arena.get(handle).unwrap().as_ptr()));
    }
    let expected: usize = (1..=50).sum();
    assert_eq!(arena.bytes_count(), expected);

    for (handle, ptr) in seen {
        assert_eq!(arena.get(handle).unwrap().as_ptr(), ptr);
    }
}

#[test]
fn test_allocation_failure_is_reported() {
    let result = BlobArena::with_capacity(usize::MAX);
    assert!(matches!(
        result,
        Err(IngestError::AllocationFailed { requested }) if requested == usize::MAX
    ));
}

#[test]
fn test_handles_from_other_blocks_do_not_resolve_out_of_bounds() {
    let mut arena = BlobArena::with_capacity(8).unwrap();
    let handle = arena.add(b"abcd").unwrap();
    let forged = BlobRef {
        len: 64,
        ..handle
    };
    assert_eq!(arena.get(forged), None);
}

fn refuse_large_blocks(capacity: usize) -> Result<BlobBlock, IngestError> {
    if capacity > 64 {
        return Err(IngestError::AllocationFailed {
            requested: capacity,
        });
    }
    BlobBlock::allocate(capacity)
}

#[test]
fn test_failed_growth_leaves_arena_unchanged() {
    let mut arena = BlobArena::with_allocator(64, refuse_large_blocks).unwrap();
    let first = arena.add(&bytes_of(60, 1)).unwrap();
    let first_ptr = arena.get(first).unwrap().as_ptr();

    let result = arena.add(&bytes_of(100, 2));

    assert!(matches!(
        result,
        Err(IngestError::AllocationFailed { requested: 128 })
    ));
    assert_eq!(arena.bytes_count(), 60);
    assert_eq!(arena.block_count(), 1);
    assert_eq!(arena.allocated_bytes(), 64);
    assert_eq!(arena.get(first).unwrap().as_ptr(), first_ptr);

    // The remaining room of the current block is still usable.
    let tail = arena.add(&bytes_of(4, 3)).unwrap();
    assert_eq!((tail.block(), tail.offset()), (0, 60));
    assert_eq!(arena.bytes_count(), 64);
}

#[test]
fn test_failed_growth_after_clear_keeps_cursor() {
    let mut arena = BlobArena::with_allocator(32, refuse_large_blocks).unwrap();
    arena.add(&bytes_of(50, 1)).unwrap(); // second block of 64 bytes
    arena.clear();
    arena.add(&bytes_of(20, 2)).unwrap();

    // Walks past both blocks, then fails to allocate a third one.
    assert!(arena.add(&bytes_of(65, 3)).is_err());

    assert_eq!(arena.block_count(), 2);
    assert_eq!(arena.bytes_count(), 20);
    let next = arena.add(&bytes_of(10, 4)).unwrap();
    assert_eq!((next.block(), next.offset()), (0, 20));
}
