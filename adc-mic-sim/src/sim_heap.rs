//! Bounded heap region standing in for the target's capability-based
//! allocator.

use adc_mic_core::models::config::MemoryCaps;
use adc_mic_core::traits::region_allocator::RegionAllocator;

use crate::journal::{Journal, SimEvent};

/// Internal RAM available to the capture buffer on the reference board.
pub const DEFAULT_INTERNAL_BYTES: usize = 64 * 1024;

/// A heap region with a fixed byte budget.
///
/// Requests asking for [`MemoryCaps::SPIRAM`] fail unless external RAM was
/// configured with [`SimHeap::with_spiram`].
pub struct SimHeap {
    internal_capacity: usize,
    spiram_capacity: usize,
    used: usize,
    peak: usize,
    live_blocks: usize,
    journal: Journal,
}

impl SimHeap {
    pub fn new(internal_capacity: usize, journal: Journal) -> Self {
        Self {
            internal_capacity,
            spiram_capacity: 0,
            used: 0,
            peak: 0,
            live_blocks: 0,
            journal,
        }
    }

    pub fn with_spiram(mut self, capacity: usize) -> Self {
        self.spiram_capacity = capacity;
        self
    }

    /// A region that refuses every request.
    pub fn exhausted(journal: Journal) -> Self {
        Self::new(0, journal)
    }

    pub fn used(&self) -> usize {
        self.used
    }

    /// High-water mark of bytes in use.
    pub fn peak(&self) -> usize {
        self.peak
    }

    /// Blocks handed out and not yet freed.
    pub fn live_blocks(&self) -> usize {
        self.live_blocks
    }

    fn capacity_for(&self, caps: MemoryCaps) -> usize {
        if caps.contains(MemoryCaps::SPIRAM) {
            self.spiram_capacity
        } else {
            self.internal_capacity
        }
    }
}

impl RegionAllocator for SimHeap {
    fn allocate(&mut self, size: usize, caps: MemoryCaps) -> Option<Box<[i16]>> {
        let fits = self
            .used
            .checked_add(size)
            .is_some_and(|total| total <= self.capacity_for(caps));
        let ok = size > 0 && fits;
        self.journal.record(SimEvent::Allocate { size, caps, ok });
        if !ok {
            log::warn!(
                "sim heap: cannot allocate {} bytes ({} of {} in use)",
                size,
                self.used,
                self.capacity_for(caps)
            );
            return None;
        }

        self.used += size;
        self.peak = self.peak.max(self.used);
        self.live_blocks += 1;
        Some(vec![0i16; size.div_ceil(2)].into_boxed_slice())
    }

    fn free(&mut self, block: Box<[i16]>) {
        let size = block.len() * 2;
        self.used = self.used.saturating_sub(size);
        self.live_blocks = self.live_blocks.saturating_sub(1);
        self.journal.record(SimEvent::Free { size });
    }
}
