/// Dual-endian integer decoding
///
/// ISO9660 stores several integers twice, little-endian followed by big-endian.
/// Both copies are decoded and must agree.

use crate::error::{IsoError, Result};

/// Decode a dual-endian u32 from the first 8 bytes of `data`
pub fn decode_dual_endian_u32(data: &[u8]) -> Result<u32> {
    if data.len() < 8 {
        return Err(IsoError::InsufficientData {
            needed: 8,
            available: data.len(),
        });
    }

    let little = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let big = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
    if little != big {
        return Err(IsoError::EndianMismatch { little, big });
    }

    Ok(little)
}

/// Decode a dual-endian u16 from the first 4 bytes of `data`
pub fn decode_dual_endian_u16(data: &[u8]) -> Result<u16> {
    if data.len() < 4 {
        return Err(IsoError::InsufficientData {
            needed: 4,
            available: data.len(),
        });
    }

    let little = u16::from_le_bytes([data[0], data[1]]);
    let big = u16::from_be_bytes([data[2], data[3]]);
    if little != big {
        return Err(IsoError::EndianMismatch {
            little: little as u32,
            big: big as u32,
        });
    }

    Ok(little)
}
