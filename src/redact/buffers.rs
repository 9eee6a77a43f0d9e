//! Scratch buffers for replacement rows
//!
//! Buffers are reused from spot to spot. Capacity doubles when a spot needs
//! more than is available and is never given back during the run.

use super::errors::{RedactError, RedactResult};
use super::mode::{MASK_BASE, MASK_QUALITY, REDACTED_FILTER};

/// Growable byte buffer with an explicit fill length
#[derive(Debug, Default)]
pub struct ScratchBuffer {
    data: Vec<u8>,
}

impl ScratchBuffer {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Filled bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Grows capacity to at least `len`, doubling the request
    fn reserve_for(&mut self, len: usize) -> RedactResult<()> {
        if len <= self.data.capacity() {
            return Ok(());
        }
        let target = len.saturating_mul(2);
        let additional = target - self.data.len();
        self.data
            .try_reserve_exact(additional)
            .map_err(|_| RedactError::allocation_failed(target))
    }

    /// Sets the content to `len` copies of `value`
    pub fn fill(&mut self, value: u8, len: usize) -> RedactResult<&[u8]> {
        self.reserve_for(len)?;
        self.data.clear();
        self.data.resize(len, value);
        Ok(&self.data)
    }
}

/// Replacement payload of one redacted spot
#[derive(Debug, Clone, Copy)]
pub struct Replacement<'a> {
    pub filter: &'a [u8],
    pub bases: Option<&'a [u8]>,
    pub quality: Option<&'a [u8]>,
}

/// The three scratch buffers shared across the sweep
#[derive(Debug, Default)]
pub struct BufferRecycler {
    filter: ScratchBuffer,
    bases: ScratchBuffer,
    quality: ScratchBuffer,
}

impl BufferRecycler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the replacement for a redacted spot.
    ///
    /// The filter buffer is always filled. Bases and quality are filled only
    /// when their lengths are given.
    pub fn replacement(
        &mut self,
        filter_len: usize,
        bases_len: Option<usize>,
        quality_len: Option<usize>,
    ) -> RedactResult<Replacement<'_>> {
        let filter = self.filter.fill(REDACTED_FILTER, filter_len)?;
        let bases = match bases_len {
            Some(len) => Some(self.bases.fill(MASK_BASE, len)?),
            None => None,
        };
        let quality = match quality_len {
            Some(len) => Some(self.quality.fill(MASK_QUALITY, len)?),
            None => None,
        };
        Ok(Replacement {
            filter,
            bases,
            quality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill() {
        let mut buf = ScratchBuffer::new();
        assert_eq!(buf.fill(b'N', 3).unwrap(), b"NNN");
        assert_eq!(buf.len(), 3);
        assert!(buf.capacity() >= 6);
    }

    #[test]
    fn test_never_shrinks() {
        let mut buf = ScratchBuffer::new();
        buf.fill(0, 100).unwrap();
        let grown = buf.capacity();
        buf.fill(0, 2).unwrap();
        assert_eq!(buf.capacity(), grown);
        assert_eq!(buf.as_slice(), &[0, 0]);
    }

    #[test]
    fn test_no_growth_when_capacity_suffices() {
        let mut buf = ScratchBuffer::new();
        buf.fill(1, 10).unwrap();
        let cap = buf.capacity();
        buf.fill(1, cap).unwrap();
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn test_replacement_filter_only() {
        let mut recycler = BufferRecycler::new();
        let r = recycler.replacement(2, None, None).unwrap();
        assert_eq!(r.filter, &[3, 3]);
        assert!(r.bases.is_none());
        assert!(r.quality.is_none());
    }

    #[test]
    fn test_replacement_full_content() {
        let mut recycler = BufferRecycler::new();
        let r = recycler.replacement(1, Some(4), Some(3)).unwrap();
        assert_eq!(r.filter, &[3]);
        assert_eq!(r.bases.unwrap(), b"NNNN");
        assert_eq!(r.quality.unwrap(), &[0, 0, 0]);
    }

    #[test]
    fn test_zero_length_spot() {
        let mut recycler = BufferRecycler::new();
        let r = recycler.replacement(0, Some(0), Some(0)).unwrap();
        assert!(r.filter.is_empty());
        assert_eq!(r.bases.unwrap(), b"");
    }
}
