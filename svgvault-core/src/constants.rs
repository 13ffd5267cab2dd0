//! Constants and limits for svgvault containers

/// XML namespace for the video metadata element
pub const VIDEO_NS: &str = "http://example.org/video/2024";

/// Container format version recorded in document metadata
pub const FORMAT_VERSION: &str = "1";

/// Prefix of the steganographic boundary token; a per-document hex suffix
/// derived from the payload digest follows it
pub const BOUNDARY_PREFIX: &str = "SVGVAULT_BOUNDARY_";

/// Detection signature for the ascii85 strategy (attribute on the data element)
pub const ASCII85_SIGNATURE: &str = "encoding=\"ascii85\"";

/// Detection signature for the chunked strategy (per-chunk group id prefix)
pub const QR_FRAME_ID_PREFIX: &str = "id=\"qr-frame-";

/// Detection signature for the base64 strategy (hidden text element id)
pub const BASE64_SIGNATURE: &str = "id=\"base64VideoData\"";

/// Detection signatures for the lossy vector strategy; both must be present
pub const VECTOR_PATH_SIGNATURE: &str = "<path d=";
/// Companion vector signature (frame show/hide animation)
pub const VECTOR_SET_SIGNATURE: &str = "<set attributeName=";

/// Algorithm identifier recorded ahead of every content digest
pub const CHECKSUM_ALGORITHM: &str = "blake3";

/// Default policy ceiling for payload size (64 MiB)
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

/// Default chunk size for the chunked strategy, matching what a QR symbol
/// at moderate error correction can carry
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Hex characters of the payload digest used for the boundary token suffix
pub const BOUNDARY_TOKEN_HEX_LEN: usize = 16;
