/// ISO9660 directory record parser

use crate::error::{IsoError, Result};
use crate::filesystem::DirectoryEntry;
use crate::format::constants::*;
use crate::format::endian::decode_dual_endian_u32;

/// Identifier carried by a directory record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordIdentifier {
    /// The self record (`\x00`)
    Current,
    /// The parent record (`\x01`)
    Parent,
    /// A named file or directory, version suffix removed
    Name(String),
}

/// One decoded directory record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRecord {
    /// Total record length (byte 0)
    pub length: u8,
    /// First sector of the data
    pub extent_location: u32,
    /// Data length in bytes
    pub byte_length: u32,
    /// Raw file flags
    pub flags: u8,
    /// Record identifier
    pub identifier: RecordIdentifier,
}

impl DirectoryRecord {
    /// Is the directory flag set?
    pub fn is_directory(&self) -> bool {
        self.flags & FLAG_DIRECTORY != 0
    }

    /// Is this the self or parent record?
    pub fn is_special(&self) -> bool {
        !matches!(self.identifier, RecordIdentifier::Name(_))
    }

    /// Convert to a directory entry; self and parent records yield `None`
    pub fn into_entry(self) -> Option<DirectoryEntry> {
        let is_directory = self.is_directory();
        match self.identifier {
            RecordIdentifier::Name(name) => Some(DirectoryEntry::new(
                name,
                is_directory,
                self.extent_location,
                self.byte_length,
            )),
            RecordIdentifier::Current | RecordIdentifier::Parent => None,
        }
    }
}

/// Parse one directory record
///
/// `data` must start at the record's length byte. Every field must lie within both the
/// declared record length and the slice.
pub fn parse_record(data: &[u8]) -> Result<DirectoryRecord> {
    let length = *data.first().ok_or(IsoError::InsufficientData {
        needed: 1,
        available: 0,
    })?;
    let limit = (length as usize).min(data.len());
    let record = &data[..limit];

    let extent_location =
        decode_dual_endian_u32(field(record, "extent", RECORD_EXTENT_OFFSET, 8)?)?;
    let byte_length =
        decode_dual_endian_u32(field(record, "data length", RECORD_DATA_LENGTH_OFFSET, 8)?)?;
    let flags = field(record, "flags", RECORD_FLAGS_OFFSET, 1)?[0];
    let id_len = field(record, "identifier length", RECORD_ID_LENGTH_OFFSET, 1)?[0] as usize;
    let id = field(record, "identifier", RECORD_ID_OFFSET, id_len)?;

    let identifier = match id {
        [SELF_IDENTIFIER] => RecordIdentifier::Current,
        [PARENT_IDENTIFIER] => RecordIdentifier::Parent,
        _ => RecordIdentifier::Name(strip_version(&String::from_utf8_lossy(id)).to_string()),
    };

    Ok(DirectoryRecord {
        length,
        extent_location,
        byte_length,
        flags,
        identifier,
    })
}

/// Slice a fixed-offset field out of a record
fn field<'a>(
    record: &'a [u8],
    name: &'static str,
    start: usize,
    width: usize,
) -> Result<&'a [u8]> {
    let end = start + width;
    if end > record.len() {
        return Err(IsoError::overrun(name, end, record.len()));
    }
    Ok(&record[start..end])
}

/// Drop the `;N` version suffix from a file identifier
pub fn strip_version(identifier: &str) -> &str {
    identifier
        .split(VERSION_SEPARATOR)
        .next()
        .unwrap_or(identifier)
}
