//! Payload chunking and reassembly.
//!
//! `split` produces ordered, independently addressable chunks of bounded
//! size; `join` reassembles them regardless of arrival order and detects
//! loss, duplication, and per-chunk corruption. Chunks from the same payload
//! share a session id so unrelated chunk streams cannot be interleaved.

use crate::codec::{decode_base64, encode_base64};
use crate::error::VaultError;
use crate::Result;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One addressable slice of a larger payload
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Session id shared by every chunk of the same payload
    pub session_id: u64,
    /// Position of this slice, `0 <= index < total_count`
    pub index: u32,
    /// Number of chunks the payload was split into
    pub total_count: u32,
    /// The payload slice itself
    pub payload: Bytes,
    /// CRC32C over the slice, checked during reassembly
    pub slice_checksum: u32,
}

/// Wire form of a chunk: the record an external QR renderer carries.
///
/// Field names are kept short to minimize symbol density per QR cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Session id
    pub sid: u64,
    /// Chunk index
    pub idx: u32,
    /// Total chunk count
    pub total: u32,
    /// CRC32C of the raw slice
    pub crc: u32,
    /// Base64 of the raw slice
    pub data: String,
}

impl Chunk {
    /// Serialize into the wire record
    pub fn to_record(&self) -> ChunkRecord {
        ChunkRecord {
            sid: self.session_id,
            idx: self.index,
            total: self.total_count,
            crc: self.slice_checksum,
            data: encode_base64(&self.payload),
        }
    }

    /// Rebuild a chunk from its wire record.
    ///
    /// The slice checksum is carried over as recorded; `join` is where it is
    /// verified against the decoded bytes.
    pub fn from_record(record: &ChunkRecord) -> Result<Self> {
        let payload = Bytes::from(decode_base64(&record.data)?);
        Ok(Self {
            session_id: record.sid,
            index: record.idx,
            total_count: record.total,
            payload,
            slice_checksum: record.crc,
        })
    }
}

/// Session id for a payload: leading 8 bytes of its digest.
///
/// Derived rather than drawn from randomness so `split` stays a pure
/// function; unrelated payloads still get distinct ids with overwhelming
/// probability.
pub fn session_id(payload: &[u8]) -> u64 {
    let hash = blake3::hash(payload);
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_be_bytes(prefix)
}

/// Split a payload into chunks of at most `max_chunk_size` bytes.
///
/// Chunks come out in strictly increasing index order covering
/// `[0, total_count)`; only the final chunk may be shorter. An empty payload
/// yields a single empty chunk so that `join(split(x)) == x` for all x.
pub fn split(payload: &[u8], max_chunk_size: usize) -> Result<Vec<Chunk>> {
    if max_chunk_size == 0 {
        return Err(VaultError::InvalidConfiguration(
            "max_chunk_size must be > 0".into(),
        ));
    }

    let session = session_id(payload);
    let total_count = payload.len().div_ceil(max_chunk_size).max(1);
    if total_count > u32::MAX as usize {
        return Err(VaultError::InvalidConfiguration(format!(
            "payload of {} bytes needs more than u32::MAX chunks at chunk size {}",
            payload.len(),
            max_chunk_size
        )));
    }

    let mut chunks = Vec::with_capacity(total_count);
    for index in 0..total_count {
        let start = index * max_chunk_size;
        let end = (start + max_chunk_size).min(payload.len());
        let slice = &payload[start..end];
        chunks.push(Chunk {
            session_id: session,
            index: index as u32,
            total_count: total_count as u32,
            payload: Bytes::copy_from_slice(slice),
            slice_checksum: crc32c::crc32c(slice),
        });
    }

    Ok(chunks)
}

/// Reassemble chunks into the original payload.
///
/// Pure function of the chunk set: arrival order does not matter. Every
/// index in `[0, total_count)` must be present exactly once and every slice
/// checksum must verify. `CorruptChunk` is the only error a caller may
/// retry, by re-fetching that one chunk from its transport.
pub fn join(chunks: &[Chunk]) -> Result<Bytes> {
    let first = chunks.first().ok_or_else(|| {
        VaultError::InvalidConfiguration("cannot join an empty chunk set".into())
    })?;

    let session = first.session_id;
    let total = first.total_count;
    if total == 0 {
        return Err(VaultError::InvalidStructure(
            "chunk declares total_count of 0".into(),
        ));
    }

    // total_count comes straight off the wire; never allocate total-sized
    // buffers before the received set has been validated against it
    for chunk in chunks {
        if chunk.session_id != session {
            return Err(VaultError::SessionMismatch {
                expected: session,
                actual: chunk.session_id,
            });
        }
        if chunk.total_count != total {
            return Err(VaultError::InvalidStructure(format!(
                "chunk {} declares total_count {} but the set started with {}",
                chunk.index, chunk.total_count, total
            )));
        }
        if chunk.index >= total {
            return Err(VaultError::InvalidStructure(format!(
                "chunk index {} out of range for total_count {}",
                chunk.index, total
            )));
        }
    }

    let mut ordered: Vec<&Chunk> = chunks.iter().collect();
    ordered.sort_unstable_by_key(|c| c.index);

    let mut expected = 0u32;
    for chunk in &ordered {
        if chunk.index < expected {
            return Err(VaultError::DuplicateChunk(chunk.index));
        }
        if chunk.index > expected {
            return Err(VaultError::MissingChunk(expected));
        }
        expected += 1;
    }
    if expected < total {
        return Err(VaultError::MissingChunk(expected));
    }

    let mut out = Vec::new();
    for chunk in ordered {
        let actual = crc32c::crc32c(&chunk.payload);
        if actual != chunk.slice_checksum {
            return Err(VaultError::CorruptChunk {
                index: chunk.index,
                expected: chunk.slice_checksum,
                actual,
            });
        }
        out.extend_from_slice(&chunk.payload);
    }

    Ok(Bytes::from(out))
}
