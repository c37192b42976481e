/// ISO9660 (ECMA-119) on-disk constants

/// Logical sector size in bytes
pub const SECTOR_SIZE: usize = 2048;

/// Sector holding the Primary Volume Descriptor (sectors 0-15 are the system area)
pub const PVD_SECTOR: u32 = 16;

/// Volume descriptor type code for a Primary Volume Descriptor
pub const PVD_TYPE: u8 = 0x01;

/// Standard identifier present in every volume descriptor
pub const STANDARD_IDENTIFIER: &[u8] = b"CD001";

/// Offset of the standard identifier within a volume descriptor
pub const DESCRIPTOR_IDENTIFIER_OFFSET: usize = 1;

/// Offset of the system identifier (32 a-characters)
pub const PVD_SYSTEM_ID_OFFSET: usize = 8;

/// Offset of the volume identifier (32 d-characters)
pub const PVD_VOLUME_ID_OFFSET: usize = 40;

/// Length of the system and volume identifier fields
pub const PVD_ID_LENGTH: usize = 32;

/// Offset of the volume space size (dual-endian u32, in logical blocks)
pub const PVD_VOLUME_SPACE_SIZE_OFFSET: usize = 80;

/// Offset of the logical block size (dual-endian u16)
pub const PVD_LOGICAL_BLOCK_SIZE_OFFSET: usize = 128;

/// Offset of the root directory record within the PVD
pub const ROOT_RECORD_OFFSET: usize = 156;

/// Length of the root directory record
pub const ROOT_RECORD_LENGTH: usize = 34;

/// Directory record: extent location (dual-endian u32)
pub const RECORD_EXTENT_OFFSET: usize = 2;

/// Directory record: data length (dual-endian u32)
pub const RECORD_DATA_LENGTH_OFFSET: usize = 10;

/// Directory record: file flags
pub const RECORD_FLAGS_OFFSET: usize = 25;

/// Directory record: identifier length
pub const RECORD_ID_LENGTH_OFFSET: usize = 32;

/// Directory record: start of the identifier
pub const RECORD_ID_OFFSET: usize = 33;

/// File flag bit marking a directory
pub const FLAG_DIRECTORY: u8 = 0x02;

/// Identifier byte of the self ("this directory") record
pub const SELF_IDENTIFIER: u8 = 0x00;

/// Identifier byte of the parent directory record
pub const PARENT_IDENTIFIER: u8 = 0x01;

/// Separator between a file identifier and its version number
pub const VERSION_SEPARATOR: char = ';';

/// Byte offset of a sector within the image
#[inline]
pub fn sector_offset(sector: u32) -> u64 {
    sector as u64 * SECTOR_SIZE as u64
}

/// Byte offset of the next sector boundary strictly after `offset`
#[inline]
pub fn next_sector_boundary(offset: usize) -> usize {
    (offset / SECTOR_SIZE + 1) * SECTOR_SIZE
}
