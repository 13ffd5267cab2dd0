//! Error types for svgvault operations

use crate::types::StrategyTag;

/// Errors that can occur while building, parsing, or verifying containers
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VaultError {
    /// Bad caller-supplied parameter, surfaced immediately and never retried
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Input text does not match the claimed encoding
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// Close marker not found where the declared payload length says it must be
    #[error("Boundary mismatch: close marker expected at byte offset {expected_at}")]
    BoundaryMismatch {
        /// Offset where the close marker was expected.
        expected_at: usize,
    },

    /// Document matches no known container signature
    #[error("Unknown container format: no recognized strategy marker found")]
    UnknownFormat,

    /// Document carries no embedded payload markers
    #[error("No embedded payload found in document")]
    NoEmbeddedPayload,

    /// A chunk index in [0, total_count) is absent from the reassembly set
    #[error("Missing chunk at index {0}")]
    MissingChunk(u32),

    /// The same chunk index appeared more than once
    #[error("Duplicate chunk at index {0}")]
    DuplicateChunk(u32),

    /// Per-chunk checksum mismatch; the caller may re-fetch this one chunk
    #[error("Corrupt chunk at index {index}: expected crc {expected:#010x}, got {actual:#010x}")]
    CorruptChunk {
        /// Index of the offending chunk.
        index: u32,
        /// Checksum recorded when the chunk was produced.
        expected: u32,
        /// Checksum recomputed over the received slice.
        actual: u32,
    },

    /// Chunks from unrelated payloads were interleaved into one reassembly
    #[error("Session mismatch: expected {expected:#018x}, got {actual:#018x}")]
    SessionMismatch {
        /// Session id of the first chunk seen.
        expected: u64,
        /// Conflicting session id.
        actual: u64,
    },

    /// Policy ceiling exceeded; surfaced with the limit so the caller can adjust
    #[error("Payload size {actual} exceeds configured ceiling {limit}")]
    PayloadTooLarge {
        /// Actual payload length in bytes.
        actual: usize,
        /// Configured ceiling in bytes.
        limit: usize,
    },

    /// Declared limitation of a lossy strategy, not a bug
    #[error("Extraction not supported for strategy {0}")]
    ExtractionNotSupported(StrategyTag),

    /// Document parsed but its internal structure is inconsistent
    #[error("Invalid container structure: {0}")]
    InvalidStructure(String),
}
