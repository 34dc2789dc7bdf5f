use crate::models::config::MemoryCaps;
use crate::models::error::CaptureError;
use crate::processing::wav_format;
use crate::traits::region_allocator::RegionAllocator;

/// Chunk buffer allocated from a capability-selected heap region.
///
/// Returned to the allocator exactly once, by [`release`](Self::release) or
/// on drop.
pub struct SampleBuffer<'a, A: RegionAllocator> {
    allocator: &'a mut A,
    block: Option<Box<[i16]>>,
    size: usize,
}

impl<'a, A: RegionAllocator> SampleBuffer<'a, A> {
    /// Allocate `size` bytes from the region selected by `caps`.
    pub fn allocate(allocator: &'a mut A, size: usize, caps: MemoryCaps) -> Result<Self, CaptureError> {
        let Some(block) = allocator.allocate(size, caps) else {
            log::error!("Failed to allocate {} byte sample buffer", size);
            return Err(CaptureError::OutOfMemory { requested: size });
        };
        if block.len() * 2 < size {
            log::error!(
                "Allocator returned {} bytes, {} requested",
                block.len() * 2,
                size
            );
            allocator.free(block);
            return Err(CaptureError::OutOfMemory { requested: size });
        }

        Ok(Self {
            allocator,
            block: Some(block),
            size,
        })
    }

    /// Size of the buffer in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn as_slice(&self) -> &[i16] {
        match &self.block {
            Some(block) => &block[..self.size / 2],
            None => &[],
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [i16] {
        match &mut self.block {
            Some(block) => &mut block[..self.size / 2],
            None => &mut [],
        }
    }

    /// Copy the current contents out as little-endian PCM bytes.
    pub fn snapshot(&self) -> Vec<u8> {
        wav_format::encode_pcm16(self.as_slice())
    }

    /// Return the block to the allocator.
    pub fn release(mut self) {
        self.free();
    }

    fn free(&mut self) {
        if let Some(block) = self.block.take() {
            self.allocator.free(block);
        }
    }
}

impl<A: RegionAllocator> Drop for SampleBuffer<'_, A> {
    fn drop(&mut self) {
        self.free();
    }
}
