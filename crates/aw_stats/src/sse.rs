//! SmartSteamEmu `stats.bin` decoder.
//!
//! The file is a bare sequence of fixed 24-byte little-endian records, one
//! per achievement the emulator has ever touched:
//!
//! ```text
//! offset  size  field
//! 0       4     CRC32 of the achievement's canonical name
//! 4       4     earned flag (nonzero = earned)
//! 8       4     unlock time, unix seconds
//! 12      12    reserved
//! ```
//!
//! The record key is the CRC digest rendered as 8 lowercase hex digits; the
//! entry also carries the digest in its `crc` list so the reconciliation
//! engine matches by checksum instead of by name. A truncated trailing
//! record is ignored, not fatal.

use crate::{RawEntry, RawStatRecord, RawValue, Result};
use byteorder::{ByteOrder, LittleEndian};

/// Size of one stat record in bytes.
pub const RECORD_SIZE: usize = 24;

/// Byte offset of the earned flag inside a record.
pub const EARNED_OFFSET: usize = 4;

/// Byte offset of the unlock timestamp inside a record.
pub const TIME_OFFSET: usize = 8;

/// Decode a `stats.bin` style CRC-keyed stat block.
pub fn decode_sse(bytes: &[u8]) -> Result<RawStatRecord> {
    let mut entries = Vec::with_capacity(bytes.len() / RECORD_SIZE);

    for record in bytes.chunks_exact(RECORD_SIZE) {
        let crc = LittleEndian::read_u32(&record[0..4]);
        let earned = LittleEndian::read_u32(&record[EARNED_OFFSET..EARNED_OFFSET + 4]);
        let time = LittleEndian::read_u32(&record[TIME_OFFSET..TIME_OFFSET + 4]);

        let digest = format!("{crc:08x}");
        let mut entry = RawEntry::new(digest.clone())
            .with_field("Achieved", RawValue::Int(i64::from(earned != 0)))
            .with_field("UnlockTime", RawValue::Int(i64::from(time)));
        entry.crc = Some(vec![digest]);
        entries.push(entry);
    }

    Ok(RawStatRecord {
        entries,
        earned_only: false,
    })
}
