/// Tree extraction onto the host filesystem

/// Extraction options and builder
pub mod options;

pub use options::{ErrorPolicy, ExtractOptions, ExtractOptionsBuilder};

use crate::error::{IsoError, Result};
use crate::filesystem::{read_directory, DirectoryEntry, IsoFileSystem};
use crate::io::{create_host_dir, write_host_file, SectorReader};
use std::fmt;
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A file written to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    /// Host path
    pub path: PathBuf,
    /// Bytes written
    pub size: u64,
}

/// An entry left out under [`ErrorPolicy::Skip`]
#[derive(Debug)]
pub struct SkippedEntry {
    /// Host path the entry would have been written to
    pub path: PathBuf,
    /// Why it was skipped
    pub error: IsoError,
}

/// Running totals of an extraction
#[derive(Debug, Default)]
pub struct ExtractSummary {
    /// Sum of file bytes written
    pub total_bytes: u64,
    /// Files written, in extraction order
    pub files: Vec<ExtractedFile>,
    /// Number of directories created
    pub directories: usize,
    /// Entries skipped after an error
    pub skipped: Vec<SkippedEntry>,
}

impl ExtractSummary {
    /// Ratio of extracted bytes to the image length, for reporting only
    pub fn ratio(&self, image_size: u64) -> f64 {
        if image_size == 0 {
            0.0
        } else {
            self.total_bytes as f64 / image_size as f64
        }
    }
}

/// Called once for every file as soon as it has been written
pub type FileCallback = Box<dyn FnMut(&ExtractedFile)>;

/// Recursive, depth-first extractor
#[derive(Default)]
pub struct Extractor {
    options: ExtractOptions,
    summary: ExtractSummary,
    on_file: Option<FileCallback>,
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor")
            .field("options", &self.options)
            .field("summary", &self.summary)
            .field("on_file", &self.on_file.is_some())
            .finish()
    }
}

impl Extractor {
    /// Create an extractor with the given options
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            options,
            summary: ExtractSummary::default(),
            on_file: None,
        }
    }

    /// Report each file as it is written
    pub fn on_file<F: FnMut(&ExtractedFile) + 'static>(mut self, callback: F) -> Self {
        self.on_file = Some(Box::new(callback));
        self
    }

    /// The options in use
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Totals so far
    pub fn summary(&self) -> &ExtractSummary {
        &self.summary
    }

    /// Consume the extractor and return its totals
    pub fn into_summary(self) -> ExtractSummary {
        self.summary
    }

    /// Extract a whole mounted image into `out_dir`
    pub fn extract_image<R: Read + Seek>(
        &mut self,
        fs: &mut IsoFileSystem<R>,
        out_dir: &Path,
    ) -> Result<u64> {
        create_host_dir(out_dir)?;
        let entries = fs.root_entries()?;
        self.extract(fs.reader_mut(), &entries, out_dir)
    }

    /// Extract `entries` into `out_dir`, returning the bytes written under it
    pub fn extract<R: Read + Seek>(
        &mut self,
        reader: &mut SectorReader<R>,
        entries: &[DirectoryEntry],
        out_dir: &Path,
    ) -> Result<u64> {
        self.extract_level(reader, entries, out_dir, 0)
    }

    fn extract_level<R: Read + Seek>(
        &mut self,
        reader: &mut SectorReader<R>,
        entries: &[DirectoryEntry],
        out_dir: &Path,
        depth: usize,
    ) -> Result<u64> {
        let mut total = 0;

        for entry in entries {
            match self.extract_entry(reader, entry, out_dir, depth) {
                Ok(bytes) => total += bytes,
                Err(error) => match self.options.error_policy {
                    ErrorPolicy::Abort => return Err(error),
                    ErrorPolicy::Skip => {
                        let path = out_dir.join(&entry.name);
                        warn!(path = %path.display(), %error, "skipping entry");
                        self.summary.skipped.push(SkippedEntry { path, error });
                    }
                },
            }
        }

        Ok(total)
    }

    fn extract_entry<R: Read + Seek>(
        &mut self,
        reader: &mut SectorReader<R>,
        entry: &DirectoryEntry,
        out_dir: &Path,
        depth: usize,
    ) -> Result<u64> {
        let path = out_dir.join(host_component(&entry.name)?);

        if entry.is_directory {
            if depth + 1 > self.options.max_depth {
                return Err(IsoError::DepthLimitExceeded {
                    max_depth: self.options.max_depth,
                    path: path.display().to_string(),
                });
            }

            create_host_dir(&path)?;
            self.summary.directories += 1;

            let children = read_directory(reader, entry.extent_location, entry.byte_length)?;
            self.extract_level(reader, &children, &path, depth + 1)
        } else {
            let size = entry.byte_length as u64;
            let source = reader.range_reader(entry.extent_location, entry.byte_length)?;
            let written = write_host_file(&path, source, self.options.overwrite)?;
            if written != size {
                return Err(IsoError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("{}: wrote {} of {} bytes", path.display(), written, size),
                )));
            }

            info!(path = %path.display(), size, "extracted");
            let file = ExtractedFile { path, size };
            if let Some(callback) = self.on_file.as_mut() {
                callback(&file);
            }
            self.summary.total_bytes += size;
            self.summary.files.push(file);
            Ok(size)
        }
    }
}

/// Extract `entries` into `out_dir` with default options
pub fn extract<R: Read + Seek>(
    reader: &mut SectorReader<R>,
    entries: &[DirectoryEntry],
    out_dir: &Path,
) -> Result<u64> {
    Extractor::default().extract(reader, entries, out_dir)
}

/// Validate an identifier for use as a single host path component
pub fn host_component(name: &str) -> Result<&str> {
    let unsafe_name = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if unsafe_name {
        return Err(IsoError::InvalidIdentifier(name.to_string()));
    }
    Ok(name)
}
