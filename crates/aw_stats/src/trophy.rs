//! RPCS3 trophy set decoder (`TROPUSR.DAT` style).
//!
//! Layout: a 4-byte `TROP` magic, a little-endian u32 record count, then
//! fixed 16-byte records:
//!
//! ```text
//! offset  size  field
//! 0       4     trophy id (u32)
//! 4       4     earned flag (nonzero = earned)
//! 8       8     unlock time, unix seconds (u64)
//! ```
//!
//! Keys are the decimal trophy ids; RPCS3 schemas name their entries the
//! same way, so the ordinary name-equality match applies. The count field is
//! trusted only up to the bytes actually present — a truncated file yields
//! the records that fit.

use crate::{DecodeError, RawEntry, RawStatRecord, RawValue, Result};
use byteorder::{ByteOrder, LittleEndian};

const MAGIC: &[u8; 4] = b"TROP";
const HEADER_SIZE: usize = 8;
const RECORD_SIZE: usize = 16;

/// Decode a trophy set file.
pub fn decode_trophies(bytes: &[u8]) -> Result<RawStatRecord> {
    if bytes.len() < HEADER_SIZE || &bytes[0..4] != MAGIC {
        return Err(DecodeError::Malformed("missing TROP magic".into()));
    }

    let declared = LittleEndian::read_u32(&bytes[4..8]) as usize;
    let body = &bytes[HEADER_SIZE..];
    let available = body.len() / RECORD_SIZE;
    let count = declared.min(available);

    let mut entries = Vec::with_capacity(count);
    for record in body.chunks_exact(RECORD_SIZE).take(count) {
        let id = LittleEndian::read_u32(&record[0..4]);
        let earned = LittleEndian::read_u32(&record[4..8]);
        let time = LittleEndian::read_u64(&record[8..16]);

        entries.push(
            RawEntry::new(id.to_string())
                .with_field("Achieved", RawValue::Int(i64::from(earned != 0)))
                .with_field("UnlockTime", RawValue::Int(time.min(i64::MAX as u64) as i64)),
        );
    }

    Ok(RawStatRecord {
        entries,
        earned_only: false,
    })
}
