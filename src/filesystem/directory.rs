/// Directory extent scanning

use crate::error::Result;
use crate::filesystem::record::parse_record;
use crate::filesystem::DirectoryEntry;
use crate::format::constants::next_sector_boundary;
use crate::io::SectorReader;
use std::io::{Read, Seek};
use tracing::debug;

/// Parse the raw bytes of a directory extent into its entries
///
/// Entries come back in on-disk order. A zero length byte pads out the rest of the
/// current sector, so scanning resumes at the next sector boundary. A record that
/// would run past the end of the buffer ends the listing.
pub fn parse_directory_block(data: &[u8]) -> Result<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        let record_length = data[offset] as usize;

        if record_length == 0 {
            let next = next_sector_boundary(offset);
            if next <= offset {
                break;
            }
            offset = next;
            continue;
        }

        if offset + record_length > data.len() {
            debug!(offset, record_length, "directory record truncated, ending listing");
            break;
        }

        let record = parse_record(&data[offset..offset + record_length])?;
        if let Some(entry) = record.into_entry() {
            debug!(
                name = %entry.name,
                extent = entry.extent_location,
                size = entry.byte_length,
                directory = entry.is_directory,
                "directory record"
            );
            entries.push(entry);
        }

        offset += record_length;
    }

    Ok(entries)
}

/// Read a directory's extent from the image and parse its entries
pub fn read_directory<R: Read + Seek>(
    reader: &mut SectorReader<R>,
    extent_location: u32,
    byte_length: u32,
) -> Result<Vec<DirectoryEntry>> {
    let data = reader.read_range(extent_location, byte_length)?;
    parse_directory_block(&data)
}
