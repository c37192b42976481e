/// Host filesystem writer for extracted files

use crate::error::{IsoError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

/// Copy everything `source` yields into a new host file at `path`
///
/// The file handle is scoped to this call and closed on every return path.
/// When `overwrite` is false an existing file is left untouched and an error
/// is returned. Returns the number of bytes written.
pub fn write_host_file<S: Read>(path: &Path, mut source: S, overwrite: bool) -> Result<u64> {
    let file = if overwrite {
        File::create(path)?
    } else {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => {
                    IsoError::AlreadyExists(path.display().to_string())
                }
                _ => IsoError::Io(e),
            })?
    };

    let mut writer = BufWriter::new(file);
    let written = io::copy(&mut source, &mut writer)?;
    writer.flush()?;
    Ok(written)
}

/// Create a host directory, succeeding if it already exists
pub fn create_host_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_host_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("HELLO.TXT");

        assert_eq!(write_host_file(&path, &b"hello"[..], false).unwrap(), 5);
        assert_eq!(fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn test_refuse_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("HELLO.TXT");
        fs::write(&path, b"old").unwrap();

        let err = write_host_file(&path, &b"new"[..], false).unwrap_err();
        assert!(matches!(err, IsoError::AlreadyExists(_)));
        assert_eq!(fs::read(&path).unwrap(), b"old");

        write_host_file(&path, &b"new"[..], true).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_create_host_dir_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A").join("B");
        create_host_dir(&path).unwrap();
        create_host_dir(&path).unwrap();
        assert!(path.is_dir());
    }
}
