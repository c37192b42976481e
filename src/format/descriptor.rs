/// Primary Volume Descriptor

use crate::error::{IsoError, Result};
use crate::filesystem::record::parse_record;
use crate::filesystem::DirectoryEntry;
use crate::format::constants::*;
use crate::format::endian::{decode_dual_endian_u16, decode_dual_endian_u32};
use crate::io::SectorReader;
use std::io::{Read, Seek};

/// Fields of the Primary Volume Descriptor used for mounting and reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryVolumeDescriptor {
    /// System identifier, trailing spaces removed
    pub system_id: String,
    /// Volume identifier, trailing spaces removed
    pub volume_id: String,
    /// Volume size in logical blocks
    pub volume_space_size: u32,
    /// Logical block size in bytes
    pub logical_block_size: u16,
    /// Root directory, with an empty name
    pub root: DirectoryEntry,
}

impl PrimaryVolumeDescriptor {
    /// Read and validate the descriptor at sector 16
    pub fn read<R: Read + Seek>(reader: &mut SectorReader<R>) -> Result<Self> {
        let sector = reader.read_sector(PVD_SECTOR)?;
        Self::parse(&sector)
    }

    /// Parse a descriptor sector
    pub fn parse(sector: &[u8]) -> Result<Self> {
        if sector.len() < SECTOR_SIZE {
            return Err(IsoError::InsufficientData {
                needed: SECTOR_SIZE,
                available: sector.len(),
            });
        }

        let id_end = DESCRIPTOR_IDENTIFIER_OFFSET + STANDARD_IDENTIFIER.len();
        if &sector[DESCRIPTOR_IDENTIFIER_OFFSET..id_end] != STANDARD_IDENTIFIER {
            return Err(IsoError::descriptor("missing CD001 standard identifier"));
        }
        if sector[0] != PVD_TYPE {
            return Err(IsoError::descriptor(format!(
                "sector {} holds descriptor type {}, expected {}",
                PVD_SECTOR, sector[0], PVD_TYPE
            )));
        }

        Ok(Self {
            system_id: text_field(sector, PVD_SYSTEM_ID_OFFSET),
            volume_id: text_field(sector, PVD_VOLUME_ID_OFFSET),
            volume_space_size: decode_dual_endian_u32(&sector[PVD_VOLUME_SPACE_SIZE_OFFSET..])?,
            logical_block_size: decode_dual_endian_u16(&sector[PVD_LOGICAL_BLOCK_SIZE_OFFSET..])?,
            root: root_from_sector(sector)?,
        })
    }
}

/// Locate the root directory from the descriptor at sector 16
///
/// Only the root directory record is decoded; the rest of the descriptor is not checked.
pub fn locate_root<R: Read + Seek>(reader: &mut SectorReader<R>) -> Result<DirectoryEntry> {
    let sector = reader.read_sector(PVD_SECTOR)?;
    root_from_sector(&sector)
}

fn root_from_sector(sector: &[u8]) -> Result<DirectoryEntry> {
    let end = ROOT_RECORD_OFFSET + ROOT_RECORD_LENGTH;
    let record = parse_record(&sector[ROOT_RECORD_OFFSET..end])?;
    Ok(DirectoryEntry::new(
        String::new(),
        true,
        record.extent_location,
        record.byte_length,
    ))
}

fn text_field(sector: &[u8], offset: usize) -> String {
    String::from_utf8_lossy(&sector[offset..offset + PVD_ID_LENGTH])
        .trim_end_matches([' ', '\0'])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::record::tests::encode_record;
    use std::io::Cursor;

    fn pvd_sector(root_extent: u32, root_size: u32) -> Vec<u8> {
        let mut sector = vec![0u8; SECTOR_SIZE];
        sector[0] = PVD_TYPE;
        sector[1..6].copy_from_slice(STANDARD_IDENTIFIER);
        sector[6] = 1;
        sector[8..40].fill(b' ');
        sector[8..13].copy_from_slice(b"LINUX");
        sector[40..72].fill(b' ');
        sector[40..46].copy_from_slice(b"CDROM1");
        sector[80..84].copy_from_slice(&20u32.to_le_bytes());
        sector[84..88].copy_from_slice(&20u32.to_be_bytes());
        sector[128..130].copy_from_slice(&2048u16.to_le_bytes());
        sector[130..132].copy_from_slice(&2048u16.to_be_bytes());
        let root = encode_record(&[0x00], FLAG_DIRECTORY, root_extent, root_size);
        sector[156..156 + root.len()].copy_from_slice(&root);
        sector
    }

    #[test]
    fn test_parse_descriptor() {
        let pvd = PrimaryVolumeDescriptor::parse(&pvd_sector(18, 2048)).unwrap();
        assert_eq!(pvd.system_id, "LINUX");
        assert_eq!(pvd.volume_id, "CDROM1");
        assert_eq!(pvd.volume_space_size, 20);
        assert_eq!(pvd.logical_block_size, 2048);
        assert_eq!(pvd.root.extent_location, 18);
        assert_eq!(pvd.root.byte_length, 2048);
        assert!(pvd.root.is_directory);
    }

    #[test]
    fn test_locate_root() {
        let mut image = vec![0u8; 16 * SECTOR_SIZE];
        image.extend(pvd_sector(19, 4096));
        let mut reader = SectorReader::new(Cursor::new(image)).unwrap();

        let root = locate_root(&mut reader).unwrap();
        assert_eq!(root.name, "");
        assert_eq!(root.extent_location, 19);
        assert_eq!(root.byte_length, 4096);
    }

    #[test]
    fn test_missing_signature() {
        let mut sector = pvd_sector(18, 2048);
        sector[1..6].copy_from_slice(b"BEA01");
        assert!(matches!(
            PrimaryVolumeDescriptor::parse(&sector),
            Err(IsoError::InvalidDescriptor(_))
        ));
    }

    #[test]
    fn test_wrong_descriptor_type() {
        let mut sector = pvd_sector(18, 2048);
        sector[0] = 0xFF;
        assert!(matches!(
            PrimaryVolumeDescriptor::parse(&sector),
            Err(IsoError::InvalidDescriptor(_))
        ));
    }

    #[test]
    fn test_image_too_small() {
        let mut reader = SectorReader::new(Cursor::new(vec![0u8; 4096])).unwrap();
        assert!(matches!(
            locate_root(&mut reader),
            Err(IsoError::ExtentOutOfBounds { sector: 16, .. })
        ));
    }
}
