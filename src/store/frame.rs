//! Log frame encoding
//!
//! One committed batch is one frame:
//! ```text
//! ┌──────────────────┬─────────┬─────────────┬──────────────┬──────────────────────┐
//! │ First Seq (8)    │ Len (4) │ Data CRC (4)│ Head CRC (4) │ bincode(Vec<Row>)    │
//! └──────────────────┴─────────┴─────────────┴──────────────┴──────────────────────┘
//! ```
//! All integers are little-endian. `Head CRC` covers the first 16 header
//! bytes and `Data CRC` covers the payload, so `Len` is trusted only once the
//! header checksum matches.
//!
//! A frame is torn only when the log ends inside it. An all-zero header
//! followed by nothing but zeros is treated as a torn tail too, since a crash
//! can leave preallocated zero blocks behind the last frame.

use std::io::{self, Read};

use crate::model::Row;

use super::{StoreError, StoreResult};

/// First Seq (8) + Len (4) + Data CRC (4) + Head CRC (4)
pub(crate) const FRAME_HEADER_SIZE: usize = 20;

/// Largest payload a single frame may carry
pub(crate) const MAX_FRAME_PAYLOAD: usize = 256 * 1024 * 1024;

/// Outcome of reading one frame from a log
#[derive(Debug)]
pub(crate) enum FrameRead {
    /// A complete, checksummed batch
    Frame { first_sequence: u64, rows: Vec<Row>, size: u64 },

    /// The log ends partway through a frame (interrupted write)
    Torn,

    /// Clean end of log
    End,
}

/// Encode a batch as a frame
pub(crate) fn encode_frame(first_sequence: u64, rows: &[Row]) -> StoreResult<Vec<u8>> {
    let payload = bincode::serialize(rows).map_err(|e| StoreError::Serialization(e.to_string()))?;
    if payload.len() > MAX_FRAME_PAYLOAD {
        return Err(StoreError::Rejected(format!(
            "batch of {} bytes exceeds frame limit of {}",
            payload.len(),
            MAX_FRAME_PAYLOAD
        )));
    }
    let len = payload.len() as u32;

    let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
    frame.extend_from_slice(&first_sequence.to_le_bytes());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    let head_crc = crc32fast::hash(&frame);
    frame.extend_from_slice(&head_crc.to_le_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Read the next frame
pub(crate) fn read_frame<R: Read>(reader: &mut R) -> StoreResult<FrameRead> {
    let mut header = [0u8; FRAME_HEADER_SIZE];
    match read_full(reader, &mut header)? {
        0 => return Ok(FrameRead::End),
        n if n < FRAME_HEADER_SIZE => return Ok(FrameRead::Torn),
        _ => {}
    }

    if header.iter().all(|&b| b == 0) {
        return if rest_is_zero(reader)? {
            Ok(FrameRead::Torn)
        } else {
            Err(StoreError::Corruption(
                "zeroed frame header followed by data".to_string(),
            ))
        };
    }

    let (checked, head_crc_bytes) = header.split_at(16);
    let expected_head_crc = u32::from_le_bytes(to_array(head_crc_bytes));
    let actual_head_crc = crc32fast::hash(checked);
    if actual_head_crc != expected_head_crc {
        return Err(StoreError::Corruption(format!(
            "frame header CRC mismatch: expected {:#010x}, got {:#010x}",
            expected_head_crc, actual_head_crc
        )));
    }

    let first_sequence = u64::from_le_bytes(to_array(&checked[0..8]));
    let len = u32::from_le_bytes(to_array(&checked[8..12])) as usize;
    let expected_crc = u32::from_le_bytes(to_array(&checked[12..16]));

    if len > MAX_FRAME_PAYLOAD {
        return Err(StoreError::Corruption(format!(
            "frame at sequence {} claims {} bytes, limit is {}",
            first_sequence, len, MAX_FRAME_PAYLOAD
        )));
    }

    // A short read here means EOF was reached, so nothing follows this frame
    let mut payload = vec![0u8; len];
    if read_full(reader, &mut payload)? < len {
        return Ok(FrameRead::Torn);
    }

    let actual_crc = crc32fast::hash(&payload);
    if actual_crc != expected_crc {
        return Err(StoreError::Corruption(format!(
            "CRC mismatch in frame at sequence {}: expected {:#010x}, got {:#010x}",
            first_sequence, expected_crc, actual_crc
        )));
    }

    let rows: Vec<Row> = bincode::deserialize(&payload)
        .map_err(|e| StoreError::Corruption(format!("undecodable frame: {}", e)))?;

    Ok(FrameRead::Frame {
        first_sequence,
        rows,
        size: (FRAME_HEADER_SIZE + len) as u64,
    })
}

/// Consume the rest of the reader; true if every remaining byte is zero
fn rest_is_zero<R: Read>(reader: &mut R) -> io::Result<bool> {
    let mut chunk = [0u8; 4096];
    loop {
        let n = read_full(reader, &mut chunk)?;
        if chunk[..n].iter().any(|&b| b != 0) {
            return Ok(false);
        }
        if n < chunk.len() {
            return Ok(true);
        }
    }
}

/// Fill `buf` until it is full or the reader hits EOF; returns bytes read
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn to_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}
