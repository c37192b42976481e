/// I/O against the image and the host filesystem

/// Positioned sector reader for ISO images
pub mod reader;
/// Host file and directory writer
pub mod writer;

pub use reader::SectorReader;
pub use writer::{create_host_dir, write_host_file};
