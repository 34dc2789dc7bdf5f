use crate::models::config::MemoryCaps;

/// Heap allocator that serves blocks from a capability-selected region.
pub trait RegionAllocator {
    /// Allocate `size` bytes as a zeroed block of 16-bit samples.
    ///
    /// Returns `None` when the region is exhausted. `size` is always a
    /// multiple of two.
    fn allocate(&mut self, size: usize, caps: MemoryCaps) -> Option<Box<[i16]>>;

    /// Return a block obtained from [`allocate`](Self::allocate).
    fn free(&mut self, block: Box<[i16]>);
}
