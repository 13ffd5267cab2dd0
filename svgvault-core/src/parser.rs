//! Container parser and integrity validator.
//!
//! Detects which strategy produced a document, extracts the payload, and
//! verifies it against the recorded checksum. Detection is deterministic and
//! tries the most structurally specific signature first, so a document with
//! coincidentally overlapping signatures cannot be misclassified.

use crate::chunker::{self, Chunk, ChunkRecord};
use crate::codec::{decode_ascii85, decode_base64};
use crate::constants::{
    ASCII85_SIGNATURE, BASE64_SIGNATURE, BOUNDARY_PREFIX, CHECKSUM_ALGORITHM, QR_FRAME_ID_PREFIX,
    VECTOR_PATH_SIGNATURE, VECTOR_SET_SIGNATURE,
};
use crate::error::VaultError;
use crate::stego;
use crate::types::{IntegrityReport, StrategyTag};
use crate::Result;
use bytes::Bytes;
use memchr::memmem;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Identify the strategy that produced `document`.
///
/// Detection order, most specific first: steganographic boundary token,
/// ascii85 encoding attribute, chunk group ids, base64 element id, vector
/// path-plus-animation signature. Fails with [`VaultError::UnknownFormat`]
/// when nothing matches.
pub fn detect_strategy(document: &str) -> Result<StrategyTag> {
    let bytes = document.as_bytes();

    let strategy = if memmem::find(bytes, BOUNDARY_PREFIX.as_bytes()).is_some() {
        StrategyTag::Polyglot
    } else if memmem::find(bytes, ASCII85_SIGNATURE.as_bytes()).is_some() {
        StrategyTag::Ascii85
    } else if memmem::find(bytes, QR_FRAME_ID_PREFIX.as_bytes()).is_some() {
        StrategyTag::QrChunked
    } else if memmem::find(bytes, BASE64_SIGNATURE.as_bytes()).is_some() {
        StrategyTag::Base64
    } else if memmem::find(bytes, VECTOR_PATH_SIGNATURE.as_bytes()).is_some()
        && memmem::find(bytes, VECTOR_SET_SIGNATURE.as_bytes()).is_some()
    {
        StrategyTag::VectorLossy
    } else {
        return Err(VaultError::UnknownFormat);
    };

    #[cfg(feature = "logging")]
    debug!(strategy = strategy.as_str(), "detected container strategy");

    Ok(strategy)
}

/// Extract the payload from `document`, detecting the strategy first.
///
/// The lossy vector strategy fails with
/// [`VaultError::ExtractionNotSupported`]: a declared limitation, not a bug.
pub fn extract(document: &str) -> Result<Bytes> {
    match detect_strategy(document)? {
        StrategyTag::Polyglot => stego::locate_and_extract(document),
        StrategyTag::Ascii85 => extract_ascii85(document),
        StrategyTag::Base64 => extract_base64(document),
        StrategyTag::QrChunked => extract_chunked(document),
        StrategyTag::VectorLossy => {
            Err(VaultError::ExtractionNotSupported(StrategyTag::VectorLossy))
        }
    }
}

/// Extract and verify in one call.
///
/// The report's `structural_validity` is false when the document lacks
/// checksum metadata or fails the cheap well-formedness checks; that is
/// "unverifiable", not "corrupt", so no error is raised for it.
pub fn extract_verified(document: &str) -> Result<(Bytes, IntegrityReport)> {
    let strategy = detect_strategy(document)?;
    let payload = extract(document)?;

    let recorded = recorded_checksum(document, strategy);
    let declared = declared_size(document, strategy);

    let mut report = verify(&payload, recorded.as_deref(), declared);
    report.structural_validity = report.structural_validity && check_structure(document);

    #[cfg(feature = "logging")]
    if !report.is_valid() {
        warn!(
            strategy = strategy.as_str(),
            structural = report.structural_validity,
            "extracted payload failed integrity verification"
        );
    }

    Ok((payload, report))
}

/// Verify a fully reassembled payload against recorded metadata.
///
/// Always recomputes the checksum over the complete payload, never over
/// partial chunks. Absent checksum metadata yields
/// `structural_validity = false` without raising.
pub fn verify(
    payload: &[u8],
    recorded_checksum: Option<&str>,
    declared_len: Option<usize>,
) -> IntegrityReport {
    let recovered = format!(
        "{}:{}",
        CHECKSUM_ALGORITHM,
        hex::encode(blake3::hash(payload).as_bytes())
    );

    IntegrityReport {
        original_checksum: recorded_checksum.map(str::to_string),
        recovered_checksum: recovered,
        byte_length_match: declared_len.map_or(true, |n| n == payload.len()),
        structural_validity: recorded_checksum.is_some(),
    }
}

/// Cheap structural checks: XML declaration or root present, `<svg>` opened
/// and closed, comment markers balanced
pub fn check_structure(document: &str) -> bool {
    let trimmed = document.trim_start();
    let plausible_start =
        trimmed.starts_with("<?xml") || trimmed.starts_with("<svg") || trimmed.starts_with("<!--");

    let bytes = document.as_bytes();
    let has_root = memmem::find(bytes, b"<svg").is_some() && memmem::find(bytes, b"</svg>").is_some();
    let opens = memmem::find_iter(bytes, b"<!--").count();
    let closes = memmem::find_iter(bytes, b"-->").count();

    plausible_start && has_root && opens == closes
}

/// Checksum recorded next to the encoded region, if any
pub fn recorded_checksum(document: &str, strategy: StrategyTag) -> Option<String> {
    match strategy {
        StrategyTag::Polyglot => stego::find_header(document).and_then(|h| h.checksum),
        StrategyTag::Ascii85 => element_attr(document, ASCII85_SIGNATURE, "checksum=\""),
        StrategyTag::Base64 => element_attr(document, BASE64_SIGNATURE, "data-checksum=\""),
        StrategyTag::QrChunked => chunk_index(document).map(|index| index.checksum),
        StrategyTag::VectorLossy => None,
    }
}

/// Original payload length declared in the document, if any
pub fn declared_size(document: &str, strategy: StrategyTag) -> Option<usize> {
    match strategy {
        StrategyTag::Polyglot => stego::find_header(document).map(|h| h.len),
        StrategyTag::Ascii85 => {
            element_attr(document, ASCII85_SIGNATURE, "originalSize=\"")?.parse().ok()
        }
        StrategyTag::Base64 => element_attr(document, BASE64_SIGNATURE, "data-original-size=\"")?
            .parse()
            .ok(),
        StrategyTag::QrChunked => chunk_index(document).map(|index| index.total_size),
        StrategyTag::VectorLossy => None,
    }
}

/// Value of `name="..."` on the element whose tag contains `anchor`.
///
/// The search never leaves that element, so an identically named attribute
/// elsewhere in the document cannot shadow the recorded metadata.
fn element_attr(document: &str, anchor: &str, name: &str) -> Option<String> {
    let bytes = document.as_bytes();
    let anchor_at = memmem::find(bytes, anchor.as_bytes())?;
    let tag_start = memmem::rfind(&bytes[..anchor_at], b"<")?;
    let tag_end = anchor_at + memmem::find(&bytes[anchor_at..], b">")?;
    let element = &bytes[tag_start..tag_end];

    let value_at = memmem::find(element, name.as_bytes())? + name.len();
    let rest = &element[value_at..];
    let end = memmem::find(rest, b"\"")?;
    std::str::from_utf8(&rest[..end]).ok().map(str::to_string)
}

fn chunk_index(document: &str) -> Option<crate::builder::ChunkIndex> {
    let bytes = document.as_bytes();
    let open = b"<metadata id=\"vaultChunkIndex\">";
    let start = memmem::find(bytes, open)? + open.len();
    let rest = &bytes[start..];
    let end = memmem::find(rest, b"</metadata>")?;
    let json = std::str::from_utf8(&rest[..end]).ok()?;
    serde_json::from_str(json).ok()
}

fn extract_ascii85(document: &str) -> Result<Bytes> {
    let bytes = document.as_bytes();
    let signature_at = memmem::find(bytes, ASCII85_SIGNATURE.as_bytes())
        .ok_or(VaultError::NoEmbeddedPayload)?;
    let scope = &bytes[signature_at..];

    let cdata_open = b"<![CDATA[";
    let cdata_at = memmem::find(scope, cdata_open).ok_or_else(|| {
        VaultError::InvalidStructure("ascii85 container without a CDATA payload region".into())
    })? + cdata_open.len();
    let region = &scope[cdata_at..];
    let cdata_end = memmem::find(region, b"]]>").ok_or_else(|| {
        VaultError::InvalidStructure("unterminated CDATA payload region".into())
    })?;

    let wrapped: String = std::str::from_utf8(&region[..cdata_end])
        .map_err(|_| VaultError::MalformedEncoding("payload region is not ascii text".into()))?
        .split_whitespace()
        .collect();

    let ascii85_text = String::from_utf8(decode_base64(&wrapped)?)
        .map_err(|_| VaultError::MalformedEncoding("unwrapped region is not ascii85 text".into()))?;

    Ok(Bytes::from(decode_ascii85(&ascii85_text)?))
}

fn extract_base64(document: &str) -> Result<Bytes> {
    let bytes = document.as_bytes();
    let signature_at = memmem::find(bytes, BASE64_SIGNATURE.as_bytes())
        .ok_or(VaultError::NoEmbeddedPayload)?;
    let scope = &bytes[signature_at..];

    let content_at = memmem::find(scope, b">").ok_or_else(|| {
        VaultError::InvalidStructure("unterminated base64 data element".into())
    })? + 1;
    let region = &scope[content_at..];
    let content_end = memmem::find(region, b"</text>").ok_or_else(|| {
        VaultError::InvalidStructure("base64 data element never closes".into())
    })?;

    let encoded: String = std::str::from_utf8(&region[..content_end])
        .map_err(|_| VaultError::MalformedEncoding("payload region is not ascii text".into()))?
        .split_whitespace()
        .collect();

    Ok(Bytes::from(decode_base64(&encoded)?))
}

fn extract_chunked(document: &str) -> Result<Bytes> {
    let bytes = document.as_bytes();
    let mut chunks: Vec<Chunk> = Vec::new();

    for group_at in memmem::find_iter(bytes, QR_FRAME_ID_PREFIX.as_bytes()) {
        let scope = &bytes[group_at..];
        let desc_open = b"<desc>";
        let Some(desc_rel) = memmem::find(scope, desc_open) else {
            continue;
        };
        let record_region = &scope[desc_rel + desc_open.len()..];
        let Some(desc_end) = memmem::find(record_region, b"</desc>") else {
            continue;
        };
        let json = std::str::from_utf8(&record_region[..desc_end]).map_err(|_| {
            VaultError::MalformedEncoding("chunk record is not ascii text".into())
        })?;

        let record: ChunkRecord = serde_json::from_str(json).map_err(|e| {
            VaultError::MalformedEncoding(format!("unparseable chunk record: {}", e))
        })?;
        chunks.push(Chunk::from_record(&record)?);
    }

    if chunks.is_empty() {
        return Err(VaultError::InvalidStructure(
            "chunked container without chunk records".into(),
        ));
    }

    chunker::join(&chunks)
}
