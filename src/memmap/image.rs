// Sparse memory image of a codeplug.
//
// Device memory is large and mostly unused; only the regions a codec
// allocates exist in the image. Regions are kept sorted by address and never
// overlap. Element views hand out bounds-checked windows into a region.

use super::raw::RawBuffer;
use crate::bitwise::Element;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("region {address:#010x}+{size:#x} partially overlaps an existing region")]
    Overlap { address: u32, size: usize },
}

pub type Result<T> = std::result::Result<T, ImageError>;

#[derive(Debug, Clone)]
struct Region {
    address: u32,
    buffer: RawBuffer,
}

impl Region {
    fn end(&self) -> u64 {
        self.address as u64 + self.buffer.len() as u64
    }

    fn contains(&self, address: u32, size: usize) -> bool {
        self.address <= address && address as u64 + size as u64 <= self.end()
    }

    fn intersects(&self, address: u32, size: usize) -> bool {
        (self.address as u64) < address as u64 + size as u64 && (address as u64) < self.end()
    }
}

/// Sparse set of allocated memory regions.
#[derive(Debug, Clone, Default)]
pub struct Image {
    regions: Vec<Region>,
}

impl Image {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate `size` zero-filled bytes at `address`.
    ///
    /// Re-allocating a range that an existing region already covers is a
    /// no-op and keeps the existing bytes. That makes repeated allocation
    /// passes safe and lets an update run over a downloaded image without
    /// wiping vendor bytes. A partial overlap is a layout bug and fails.
    pub fn add_element(&mut self, address: u32, size: usize) -> Result<()> {
        if self.regions.iter().any(|r| r.contains(address, size)) {
            return Ok(());
        }
        if self.regions.iter().any(|r| r.intersects(address, size)) {
            return Err(ImageError::Overlap { address, size });
        }
        let pos = self
            .regions
            .partition_point(|r| r.address < address);
        self.regions.insert(
            pos,
            Region {
                address,
                buffer: RawBuffer::new(size),
            },
        );
        Ok(())
    }

    /// True when `size` bytes at `address` lie within one allocated region.
    pub fn is_allocated(&self, address: u32, size: usize) -> bool {
        self.regions.iter().any(|r| r.contains(address, size))
    }

    /// Bounds-checked read view of `size` bytes at `address`.
    /// Returns `None` (with a log entry) when the range is not allocated.
    pub fn element(&self, address: u32, size: usize) -> Option<Element<&[u8]>> {
        match self.regions.iter().find(|r| r.contains(address, size)) {
            Some(r) => {
                let off = (address - r.address) as usize;
                Some(Element::new(&r.buffer.as_ref()[off..off + size]))
            }
            None => {
                tracing::warn!(
                    address = format_args!("{:#010x}", address),
                    size,
                    "element access to unallocated memory"
                );
                None
            }
        }
    }

    /// Bounds-checked write view of `size` bytes at `address`.
    pub fn element_mut(&mut self, address: u32, size: usize) -> Option<Element<&mut [u8]>> {
        match self.regions.iter_mut().find(|r| r.contains(address, size)) {
            Some(r) => {
                let off = (address - r.address) as usize;
                Some(Element::new(&mut r.buffer.as_mut()[off..off + size]))
            }
            None => {
                tracing::warn!(
                    address = format_args!("{:#010x}", address),
                    size,
                    "element access to unallocated memory"
                );
                None
            }
        }
    }

    /// Copy `data` starting at `address` into every allocated region it
    /// touches. Bytes falling outside allocated regions are dropped. Used to
    /// lay a flat memory dump into a pre-allocated decode image. Returns the
    /// number of bytes copied.
    pub fn write_in(&mut self, address: u32, data: &[u8]) -> usize {
        let mut copied = 0;
        let start = address as u64;
        let end = start + data.len() as u64;
        for r in &mut self.regions {
            let lo = start.max(r.address as u64);
            let hi = end.min(r.end());
            if lo >= hi {
                continue;
            }
            let n = (hi - lo) as usize;
            let src = (lo - start) as usize;
            let dst = (lo - r.address as u64) as usize;
            r.buffer.as_mut()[dst..dst + n].copy_from_slice(&data[src..src + n]);
            copied += n;
        }
        copied
    }

    /// Iterate allocated regions in address order.
    pub fn regions(&self) -> impl Iterator<Item = (u32, &RawBuffer)> {
        self.regions.iter().map(|r| (r.address, &r.buffer))
    }

    pub fn num_regions(&self) -> usize {
        self.regions.len()
    }

    /// Total allocated bytes across all regions.
    pub fn total_size(&self) -> usize {
        self.regions.iter().map(|r| r.buffer.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_is_idempotent_and_preserves_bytes() {
        let mut image = Image::new();
        image.add_element(0x1000, 0x40).unwrap();
        image
            .element_mut(0x1000, 0x40)
            .unwrap()
            .set_u32_le(0, 0xDEADBEEF);

        // Same range again, and a sub-range: existing bytes survive.
        image.add_element(0x1000, 0x40).unwrap();
        image.add_element(0x1010, 0x10).unwrap();
        assert_eq!(image.element(0x1000, 0x40).unwrap().get_u32_le(0), 0xDEADBEEF);
        assert_eq!(image.num_regions(), 1);
    }

    #[test]
    fn test_partial_overlap_rejected() {
        let mut image = Image::new();
        image.add_element(0x1000, 0x40).unwrap();
        assert!(image.add_element(0x1020, 0x40).is_err());
        assert!(image.add_element(0x0ff0, 0x20).is_err());
        // Adjacent is fine.
        image.add_element(0x1040, 0x40).unwrap();
        assert_eq!(image.num_regions(), 2);
    }

    #[test]
    fn test_regions_stay_sorted() {
        let mut image = Image::new();
        image.add_element(0x2000, 0x10).unwrap();
        image.add_element(0x1000, 0x10).unwrap();
        image.add_element(0x3000, 0x10).unwrap();
        let addrs: Vec<u32> = image.regions().map(|(a, _)| a).collect();
        assert_eq!(addrs, vec![0x1000, 0x2000, 0x3000]);
    }

    #[test]
    fn test_unallocated_access_returns_none() {
        let mut image = Image::new();
        image.add_element(0x1000, 0x40).unwrap();
        assert!(image.element(0x2000, 0x10).is_none());
        // Range straddling the region end is not allocated either.
        assert!(image.element(0x1030, 0x20).is_none());
        assert!(image.element_mut(0x2000, 0x10).is_none());
        assert!(image.is_allocated(0x1000, 0x40));
        assert!(!image.is_allocated(0x1000, 0x41));
    }

    #[test]
    fn test_write_in_spans_regions() {
        let mut image = Image::new();
        image.add_element(0x1000, 4).unwrap();
        image.add_element(0x1008, 4).unwrap();

        // 12 bytes covering both regions and the gap between them.
        let data: Vec<u8> = (0u8..12).collect();
        let copied = image.write_in(0x1000, &data);
        assert_eq!(copied, 8);
        assert_eq!(image.element(0x1000, 4).unwrap().bytes(), &[0, 1, 2, 3]);
        assert_eq!(image.element(0x1008, 4).unwrap().bytes(), &[8, 9, 10, 11]);
    }
}
