/// ISO9660 directory structures and filesystem access

/// Directory extent scanning
pub mod directory;
/// Directory record parser
pub mod record;

pub use directory::{parse_directory_block, read_directory};
pub use record::{parse_record, DirectoryRecord, RecordIdentifier};

use crate::error::{IsoError, Result};
use crate::format::PrimaryVolumeDescriptor;
use crate::io::SectorReader;
use std::fs::File;
use std::io::{Read, Seek, Take};
use std::path::Path;
use tracing::debug;

/// Default limit on directory nesting when walking an image
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Identifier with the version suffix removed
    pub name: String,
    /// Directory flag
    pub is_directory: bool,
    /// First sector of the entry's data
    pub extent_location: u32,
    /// Size of the entry's data in bytes
    pub byte_length: u32,
    /// Child entries, filled only by [`IsoFileSystem::load_tree`]
    pub children: Vec<DirectoryEntry>,
}

impl DirectoryEntry {
    /// Create an entry with no children
    pub fn new(name: String, is_directory: bool, extent_location: u32, byte_length: u32) -> Self {
        Self {
            name,
            is_directory,
            extent_location,
            byte_length,
            children: Vec::new(),
        }
    }

    /// Number of files in this subtree (requires a loaded tree)
    pub fn file_count(&self) -> usize {
        if self.is_directory {
            self.children.iter().map(DirectoryEntry::file_count).sum()
        } else {
            1
        }
    }

    /// Total declared file bytes in this subtree (requires a loaded tree)
    pub fn total_size(&self) -> u64 {
        if self.is_directory {
            self.children.iter().map(DirectoryEntry::total_size).sum()
        } else {
            self.byte_length as u64
        }
    }
}

/// Volume information
#[derive(Debug)]
pub struct VolumeInfo {
    /// Volume identifier
    pub volume_id: String,
    /// System identifier
    pub system_id: String,
    /// Volume size in logical blocks
    pub volume_space_size: u32,
    /// Logical block size in bytes
    pub logical_block_size: u16,
    /// Image file length in bytes
    pub image_size: u64,
}

/// Read-only filesystem access to a disc image
pub trait FileSystem {
    /// List the entries of the directory at `path`
    fn read_dir(&mut self, path: &str) -> Result<Vec<DirectoryEntry>>;

    /// Read a file's contents
    fn read_file(&mut self, path: &str) -> Result<Vec<u8>>;

    /// Get volume information
    fn info(&self) -> VolumeInfo;
}

/// ISO9660 filesystem mounted from an image
#[derive(Debug)]
pub struct IsoFileSystem<R> {
    reader: SectorReader<R>,
    pvd: PrimaryVolumeDescriptor,
}

impl IsoFileSystem<File> {
    /// Open and mount an image file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::mount(SectorReader::open(path)?)
    }
}

impl<R: Read + Seek> IsoFileSystem<R> {
    /// Mount a filesystem by reading the Primary Volume Descriptor
    pub fn mount(mut reader: SectorReader<R>) -> Result<Self> {
        let pvd = PrimaryVolumeDescriptor::read(&mut reader)?;
        debug!(
            volume = %pvd.volume_id,
            root_extent = pvd.root.extent_location,
            root_size = pvd.root.byte_length,
            "mounted volume"
        );
        Ok(Self { reader, pvd })
    }

    /// The root directory entry
    pub fn root(&self) -> &DirectoryEntry {
        &self.pvd.root
    }

    /// The parsed Primary Volume Descriptor
    pub fn descriptor(&self) -> &PrimaryVolumeDescriptor {
        &self.pvd
    }

    /// Mutable access to the underlying sector reader
    pub fn reader_mut(&mut self) -> &mut SectorReader<R> {
        &mut self.reader
    }

    /// Entries of the root directory
    pub fn root_entries(&mut self) -> Result<Vec<DirectoryEntry>> {
        let root = &self.pvd.root;
        read_directory(&mut self.reader, root.extent_location, root.byte_length)
    }

    /// Entries of a directory given its entry
    pub fn list(&mut self, dir: &DirectoryEntry) -> Result<Vec<DirectoryEntry>> {
        if !dir.is_directory {
            return Err(IsoError::NotADirectory(dir.name.clone()));
        }
        read_directory(&mut self.reader, dir.extent_location, dir.byte_length)
    }

    /// Find the entry at a `/`-separated path; empty path or `/` is the root
    pub fn lookup(&mut self, path: &str) -> Result<DirectoryEntry> {
        let mut current = self.pvd.root.clone();

        for component in path.split('/').filter(|c| !c.is_empty()) {
            if !current.is_directory {
                return Err(IsoError::NotADirectory(path.to_string()));
            }
            current = self
                .list(&current)?
                .into_iter()
                .find(|e| e.name == component)
                .ok_or_else(|| IsoError::NotFound(path.to_string()))?;
        }

        Ok(current)
    }

    /// Read an entry's data, exactly its declared length
    pub fn read_entry(&mut self, entry: &DirectoryEntry) -> Result<Vec<u8>> {
        if entry.is_directory {
            return Err(IsoError::IsADirectory(entry.name.clone()));
        }
        self.reader.read_range(entry.extent_location, entry.byte_length)
    }

    /// Stream an entry's data without buffering it
    pub fn entry_reader(&mut self, entry: &DirectoryEntry) -> Result<Take<&mut R>> {
        if entry.is_directory {
            return Err(IsoError::IsADirectory(entry.name.clone()));
        }
        self.reader.range_reader(entry.extent_location, entry.byte_length)
    }

    /// Load the full directory tree with every directory's children populated
    pub fn load_tree(&mut self, max_depth: usize) -> Result<DirectoryEntry> {
        let mut root = self.pvd.root.clone();
        self.populate(&mut root, 0, max_depth, "/")?;
        Ok(root)
    }

    fn populate(
        &mut self,
        dir: &mut DirectoryEntry,
        depth: usize,
        max_depth: usize,
        path: &str,
    ) -> Result<()> {
        if depth > max_depth {
            return Err(IsoError::DepthLimitExceeded {
                max_depth,
                path: path.to_string(),
            });
        }

        let mut children = self.list(dir)?;
        for child in children.iter_mut().filter(|c| c.is_directory) {
            let child_path = format!("{}{}/", path, child.name);
            self.populate(child, depth + 1, max_depth, &child_path)?;
        }
        dir.children = children;
        Ok(())
    }
}

impl<R: Read + Seek> FileSystem for IsoFileSystem<R> {
    fn read_dir(&mut self, path: &str) -> Result<Vec<DirectoryEntry>> {
        let dir = self.lookup(path)?;
        if !dir.is_directory {
            return Err(IsoError::NotADirectory(path.to_string()));
        }
        self.list(&dir)
    }

    fn read_file(&mut self, path: &str) -> Result<Vec<u8>> {
        let entry = self.lookup(path)?;
        if entry.is_directory {
            return Err(IsoError::IsADirectory(path.to_string()));
        }
        self.read_entry(&entry)
    }

    fn info(&self) -> VolumeInfo {
        VolumeInfo {
            volume_id: self.pvd.volume_id.clone(),
            system_id: self.pvd.system_id.clone(),
            volume_space_size: self.pvd.volume_space_size,
            logical_block_size: self.pvd.logical_block_size,
            image_size: self.reader.len(),
        }
    }
}
