/// ISO9660 on-disk format: constants, integer encoding and volume descriptors

/// Format constants
pub mod constants;
/// Primary Volume Descriptor
pub mod descriptor;
/// Dual-endian integer decoding
pub mod endian;

pub use constants::*;
pub use descriptor::{locate_root, PrimaryVolumeDescriptor};
pub use endian::{decode_dual_endian_u16, decode_dual_endian_u32};
