/*!
# isoextract

A Rust library for reading ISO9660 disc images and extracting their contents to the host filesystem.

## Features

- Positioned 2048-byte sector reads from any `Read + Seek` source
- Dual-endian integer decoding with consistency checks
- Directory record and directory extent parsing
- Primary Volume Descriptor decoding and root directory lookup
- Recursive extraction with depth limits and a skip-or-abort error policy

## Quick Start

```rust,no_run
use isoextract::{ExtractOptions, Extractor, FileSystem, IsoFileSystem};
use std::path::Path;

// Mount an image
let mut fs = IsoFileSystem::open("disc.iso")?;

// List the root directory
for entry in fs.read_dir("/")? {
    println!("{}: {} bytes", entry.name, entry.byte_length);
}

// Read a file
let contents = fs.read_file("/DOCS/README.TXT")?;

// Extract everything
let mut extractor = Extractor::new(ExtractOptions::default());
let total = extractor.extract_image(&mut fs, Path::new("disc_extracted"))?;
println!("{} bytes extracted", total);
# Ok::<(), isoextract::IsoError>(())
```

## Supported Format

Plain ISO9660 (ECMA-119) volumes with single-extent files. Joliet, Rock Ridge,
multi-extent files and the path table are not used.

## Modules

- `format`: on-disk constants, dual-endian integers and the Primary Volume Descriptor
- `io`: sector reader and host file writer
- `filesystem`: directory records, directory listings and the mounted filesystem
- `extract`: recursive extraction onto the host
- `error`: Error types and Result alias
*/

#![warn(missing_docs)]

/// Error types and Result alias
pub mod error;
/// Recursive extraction onto the host filesystem
pub mod extract;
/// ISO9660 directory structures and filesystem access
pub mod filesystem;
/// ISO9660 on-disk format
pub mod format;
/// Sector reads and host writes
pub mod io;

// Re-export common types
pub use error::{IsoError, Result};
pub use extract::{
    extract, ErrorPolicy, ExtractOptions, ExtractOptionsBuilder, ExtractSummary, ExtractedFile,
    Extractor, FileCallback, SkippedEntry,
};
pub use filesystem::{
    parse_directory_block, parse_record, read_directory, DirectoryEntry, DirectoryRecord,
    FileSystem, IsoFileSystem, RecordIdentifier, VolumeInfo, DEFAULT_MAX_DEPTH,
};
pub use format::{
    decode_dual_endian_u16, decode_dual_endian_u32, locate_root, PrimaryVolumeDescriptor,
    SECTOR_SIZE,
};
pub use io::SectorReader;
