/// Positioned sector reads from an ISO image

use crate::error::{IsoError, Result};
use crate::format::constants::{sector_offset, SECTOR_SIZE};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Take};
use std::path::Path;

/// Reads whole sectors and byte ranges from an image at absolute positions
///
/// Every read seeks first, so callers may read in any order. The reader holds
/// the image length and refuses ranges that run past it.
#[derive(Debug)]
pub struct SectorReader<R> {
    inner: R,
    len: u64,
}

impl SectorReader<File> {
    /// Open an image file for reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(file)
    }
}

impl<R: Read + Seek> SectorReader<R> {
    /// Wrap a seekable source, measuring its total length
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        Ok(Self { inner, len })
    }

    /// Total image length in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the image is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read one full sector
    pub fn read_sector(&mut self, sector: u32) -> Result<[u8; SECTOR_SIZE]> {
        self.check_extent(sector, SECTOR_SIZE as u64)?;
        let mut buf = [0u8; SECTOR_SIZE];
        self.read_into(sector, &mut buf)?;
        Ok(buf)
    }

    /// Read exactly `length` bytes starting at the beginning of `sector`
    ///
    /// The extent is bounds-checked before the buffer is allocated.
    pub fn read_range(&mut self, sector: u32, length: u32) -> Result<Vec<u8>> {
        self.check_extent(sector, length as u64)?;
        let mut buf = vec![0u8; length as usize];
        self.read_into(sector, &mut buf)?;
        Ok(buf)
    }

    /// Stream `length` bytes starting at the beginning of `sector`
    ///
    /// The returned reader yields at most `length` bytes; nothing is buffered here.
    pub fn range_reader(&mut self, sector: u32, length: u32) -> Result<Take<&mut R>> {
        self.check_extent(sector, length as u64)?;
        self.inner.seek(SeekFrom::Start(sector_offset(sector)))?;
        Ok((&mut self.inner).take(length as u64))
    }

    /// Check that `length` bytes at `sector` lie within the image
    pub fn check_extent(&self, sector: u32, length: u64) -> Result<()> {
        let end = sector_offset(sector).saturating_add(length);
        if end > self.len {
            return Err(IsoError::ExtentOutOfBounds {
                sector,
                length,
                image_size: self.len,
            });
        }
        Ok(())
    }

    fn read_into(&mut self, sector: u32, buf: &mut [u8]) -> Result<()> {
        self.inner.seek(SeekFrom::Start(sector_offset(sector)))?;
        self.inner.read_exact(buf)?;
        Ok(())
    }

    /// Consume the reader and return the underlying source
    pub fn into_inner(self) -> R {
        self.inner
    }
}
