use thiserror::Error;

/// Result type alias for ISO operations
pub type Result<T> = std::result::Result<T, IsoError>;

/// Errors that can occur when working with ISO9660 images
#[derive(Debug, Error)]
pub enum IsoError {
    /// I/O error against the image or the output filesystem
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The two halves of a dual-endian field disagree
    #[error("Endianness mismatch: little-endian {little} != big-endian {big}")]
    EndianMismatch {
        /// Value decoded from the little-endian half
        little: u32,
        /// Value decoded from the big-endian half
        big: u32,
    },

    /// Not enough bytes to decode a required field
    #[error("Insufficient data: needed {needed} bytes, got {available}")]
    InsufficientData {
        /// Bytes required
        needed: usize,
        /// Bytes available
        available: usize,
    },

    /// A directory record field lies outside the record
    #[error("Record field {field} at offset {offset} exceeds record length {record_length}")]
    RecordOverrun {
        /// Name of the field being decoded
        field: &'static str,
        /// End offset of the field within the record
        offset: usize,
        /// Declared (or available) record length
        record_length: usize,
    },

    /// An extent lies past the end of the image
    #[error("Extent at sector {sector} with length {length} exceeds image size {image_size}")]
    ExtentOutOfBounds {
        /// Starting sector
        sector: u32,
        /// Length in bytes
        length: u64,
        /// Total image size in bytes
        image_size: u64,
    },

    /// Primary Volume Descriptor is missing or malformed
    #[error("Invalid volume descriptor: {0}")]
    InvalidDescriptor(String),

    /// Identifier cannot be used as a host path component
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Directory nesting exceeds the configured limit
    #[error("Directory depth limit of {max_depth} exceeded at {path}")]
    DepthLimitExceeded {
        /// Configured maximum depth
        max_depth: usize,
        /// Image path where the limit was hit
        path: String,
    },

    /// Path not found in the image
    #[error("File not found: {0}")]
    NotFound(String),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// Path exists but is a directory
    #[error("Is a directory: {0}")]
    IsADirectory(String),

    /// Host file already exists and overwriting is disabled
    #[error("Refusing to overwrite existing file: {0}")]
    AlreadyExists(String),
}

impl IsoError {
    /// Create an invalid descriptor error
    pub fn descriptor<S: Into<String>>(message: S) -> Self {
        IsoError::InvalidDescriptor(message.into())
    }

    /// Create a record overrun error
    pub fn overrun(field: &'static str, offset: usize, record_length: usize) -> Self {
        IsoError::RecordOverrun {
            field,
            offset,
            record_length,
        }
    }

    /// Whether this error means the image does not conform to the on-disk format
    pub fn is_format_error(&self) -> bool {
        !matches!(
            self,
            IsoError::Io(_)
                | IsoError::NotFound(_)
                | IsoError::NotADirectory(_)
                | IsoError::IsADirectory(_)
                | IsoError::AlreadyExists(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IsoError::EndianMismatch { little: 1, big: 16777216 };
        assert_eq!(
            err.to_string(),
            "Endianness mismatch: little-endian 1 != big-endian 16777216"
        );
    }

    #[test]
    fn test_overrun_error() {
        let err = IsoError::overrun("identifier", 40, 34);
        assert_eq!(
            err.to_string(),
            "Record field identifier at offset 40 exceeds record length 34"
        );
        assert!(err.is_format_error());
    }

    #[test]
    fn test_io_is_not_format_error() {
        let err: IsoError = std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into();
        assert!(!err.is_format_error());
    }
}
