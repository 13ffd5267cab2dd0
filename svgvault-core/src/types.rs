//! Core types for svgvault containers

use crate::constants::{CHECKSUM_ALGORITHM, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_PAYLOAD_SIZE};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One selectable encoding/container scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyTag {
    /// Payload hidden in comment regions of an otherwise ordinary SVG
    Polyglot,
    /// Payload encoded with the base-85 codec inside a metadata element
    Ascii85,
    /// Payload encoded with standard base-64 inside a hidden text element
    Base64,
    /// Payload split into addressable chunks, one record per QR cell
    QrChunked,
    /// Lossy animated vector rendition; extraction is not supported
    VectorLossy,
}

impl StrategyTag {
    /// Short lowercase name used in metadata and CLI output
    pub const fn as_str(&self) -> &'static str {
        match self {
            StrategyTag::Polyglot => "polyglot",
            StrategyTag::Ascii85 => "ascii85",
            StrategyTag::Base64 => "base64",
            StrategyTag::QrChunked => "qr_chunked",
            StrategyTag::VectorLossy => "vector_lossy",
        }
    }

    /// Whether extraction reproduces the original bytes exactly
    pub const fn supports_round_trip(&self) -> bool {
        !matches!(self, StrategyTag::VectorLossy)
    }
}

impl fmt::Display for StrategyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw binary buffer plus the attributes the container records about it.
///
/// Immutable once constructed; the checksum is computed exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    data: Bytes,
    checksum: [u8; 32],
    mime: String,
}

impl Payload {
    /// Wrap raw bytes, computing the content digest up front
    pub fn new(data: impl Into<Bytes>, mime: impl Into<String>) -> Self {
        let data = data.into();
        let checksum = *blake3::hash(&data).as_bytes();
        Self {
            data,
            checksum,
            mime: mime.into(),
        }
    }

    /// Wrap video bytes with the default MIME tag
    pub fn video(data: impl Into<Bytes>) -> Self {
        Self::new(data, "video/mp4")
    }

    /// Borrowed view of the payload bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Cheap clone of the underlying buffer
    pub fn bytes(&self) -> Bytes {
        self.data.clone()
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the payload is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Declared MIME tag
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Raw content digest
    pub fn checksum(&self) -> &[u8; 32] {
        &self.checksum
    }

    /// Digest in recorded form: algorithm identifier + lowercase hex
    pub fn checksum_string(&self) -> String {
        format!("{}:{}", CHECKSUM_ALGORITHM, hex::encode(self.checksum))
    }
}

/// Bounded-size preview attached next to the main payload.
///
/// Absence never blocks extraction; the preview is cosmetic.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    /// JPEG-encoded thumbnail bytes (produced by an external frame source)
    pub jpeg: Bytes,
    /// Rendered width in pixels
    pub width: u32,
    /// Rendered height in pixels
    pub height: u32,
}

/// Immutable per-call configuration for container building.
///
/// Replaces mutable converter state: two builds with the same options and
/// payload produce byte-identical documents.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    /// Policy ceiling on payload size; exceeding it fails the build
    pub max_payload_size: usize,
    /// Chunk size for the chunked strategy
    pub chunk_size: usize,
    /// Optional thumbnail preview
    pub preview: Option<Preview>,
    /// Canvas width recorded in the document
    pub width: u32,
    /// Canvas height recorded in the document
    pub height: u32,
    /// Nominal frame rate of the source video
    pub fps: f64,
    /// Frame count of the source video
    pub frame_count: u32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            preview: None,
            width: 640,
            height: 360,
            fps: 30.0,
            frame_count: 0,
        }
    }
}

impl BuildOptions {
    /// Options with a specific canvas size
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Set the canvas width
    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Set the canvas height
    pub fn height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    /// Set the declared frame rate
    pub fn fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    /// Set the declared source frame count
    pub fn frame_count(mut self, frame_count: u32) -> Self {
        self.frame_count = frame_count;
        self
    }

    /// Set the chunk size for the chunked strategy
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the payload size ceiling
    pub fn max_payload_size(mut self, limit: usize) -> Self {
        self.max_payload_size = limit;
        self
    }

    /// Attach a preview thumbnail
    pub fn preview(mut self, preview: Preview) -> Self {
        self.preview = Some(preview);
        self
    }
}

/// Result of integrity verification over a fully reassembled payload.
///
/// Returned to the caller, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// Checksum recorded in the container, if any
    pub original_checksum: Option<String>,
    /// Checksum recomputed over the recovered payload
    pub recovered_checksum: String,
    /// Whether the declared original length matches the recovered length
    pub byte_length_match: bool,
    /// False when the document parses but checksum metadata is absent
    /// ("unverifiable", distinct from "corrupt")
    pub structural_validity: bool,
}

impl IntegrityReport {
    /// True when the container is verifiable and the recovered payload
    /// matches the recorded checksum and length exactly
    pub fn is_valid(&self) -> bool {
        self.structural_validity
            && self.byte_length_match
            && self.original_checksum.as_deref() == Some(self.recovered_checksum.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_checksum_is_prefixed_lowercase_hex() {
        let payload = Payload::video(vec![1u8, 2, 3]);
        let s = payload.checksum_string();
        assert!(s.starts_with("blake3:"));
        let digest = &s["blake3:".len()..];
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn identical_bytes_share_a_checksum() {
        let a = Payload::video(vec![7u8; 100]);
        let b = Payload::new(vec![7u8; 100], "application/octet-stream");
        assert_eq!(a.checksum(), b.checksum());
    }

    #[test]
    fn report_validity_requires_all_three() {
        let report = IntegrityReport {
            original_checksum: Some("blake3:aa".into()),
            recovered_checksum: "blake3:aa".into(),
            byte_length_match: true,
            structural_validity: true,
        };
        assert!(report.is_valid());

        let unverifiable = IntegrityReport {
            original_checksum: None,
            structural_validity: false,
            ..report.clone()
        };
        assert!(!unverifiable.is_valid());

        let corrupt = IntegrityReport {
            recovered_checksum: "blake3:bb".into(),
            ..report
        };
        assert!(!corrupt.is_valid());
    }
}
