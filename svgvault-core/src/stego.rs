//! Steganographic embedder: hides a payload in SVG comment regions.
//!
//! The payload travels base64-encoded between two comment markers carrying a
//! per-document boundary token, so the host document stays well-formed XML
//! and the markers cannot collide with payload text by construction. The
//! open marker additionally declares the exact payload byte length;
//! extraction reads exactly that many encoded characters and only then
//! requires the close marker at the computed offset, so even a marker
//! lookalike inside the region can never truncate the result.

use crate::codec::{base64_encoded_len, decode_base64, encode_base64};
use crate::constants::{BOUNDARY_PREFIX, BOUNDARY_TOKEN_HEX_LEN, CHECKSUM_ALGORITHM};
use crate::error::VaultError;
use crate::Result;
use bytes::Bytes;
use memchr::memmem;

/// Per-document boundary token: fixed prefix plus a digest-derived suffix,
/// collision-resistant across payloads
pub fn boundary_token(payload: &[u8]) -> String {
    let hash = blake3::hash(payload);
    let suffix = hex::encode(&hash.as_bytes()[..BOUNDARY_TOKEN_HEX_LEN / 2]);
    format!("{}{}", BOUNDARY_PREFIX, suffix)
}

/// Wrap `payload` in boundary markers and place it inside `template`.
///
/// The data block lands right after the XML declaration (or at the start of
/// the document when there is none), followed by the untouched template and
/// a human-readable summary trailer.
pub fn embed(template: &str, payload: &[u8]) -> String {
    let token = boundary_token(payload);
    let checksum = hex::encode(blake3::hash(payload).as_bytes());
    let encoded = encode_base64(payload);

    let block = format!(
        "<!--{token} len={len} sum={alg}:{checksum}-->\n{encoded}\n<!--/{token}-->\n",
        token = token,
        len = payload.len(),
        alg = CHECKSUM_ALGORITHM,
        checksum = checksum,
        encoded = encoded,
    );

    let trailer = format!(
        "\n<!--{token} summary original={len} bytes-->\n",
        token = token,
        len = payload.len(),
    );

    // Keep the XML declaration first so the host stays well-formed
    let insert_at = match template.find("?>") {
        Some(pos) => {
            let mut at = pos + 2;
            if template[at..].starts_with('\n') {
                at += 1;
            }
            at
        }
        None => 0,
    };

    let mut out = String::with_capacity(template.len() + block.len() + trailer.len() + 1);
    out.push_str(&template[..insert_at]);
    if insert_at > 0 && !template[..insert_at].ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&block);
    out.push_str(&template[insert_at..]);
    out.push_str(&trailer);
    out
}

/// Parsed open-marker header of an embedded payload region
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EmbedHeader {
    /// Full boundary token including the prefix
    pub token: String,
    /// Declared payload byte length
    pub len: usize,
    /// Recorded content checksum, `algorithm:hex`
    pub checksum: Option<String>,
    /// Byte offset where the encoded payload region starts
    pub data_start: usize,
}

/// Locate the first open marker that declares a payload region.
///
/// Summary trailers reuse the boundary token but carry no `len=` field and
/// are skipped.
pub(crate) fn find_header(document: &str) -> Option<EmbedHeader> {
    // All offset arithmetic happens on bytes so a hostile document with
    // multibyte characters near a marker cannot cause a slicing panic.
    let open = format!("<!--{}", BOUNDARY_PREFIX);
    let finder = memmem::Finder::new(open.as_bytes());
    let bytes = document.as_bytes();

    let mut search_from = 0;
    while let Some(rel) = finder.find(&bytes[search_from..]) {
        let marker_at = search_from + rel;
        search_from = marker_at + open.len();

        let token_start = marker_at + 4; // past "<!--"
        let token_end = token_start + BOUNDARY_PREFIX.len() + BOUNDARY_TOKEN_HEX_LEN;
        if token_end > bytes.len() {
            return None;
        }
        let Ok(token) = std::str::from_utf8(&bytes[token_start..token_end]) else {
            continue;
        };

        let rest = &bytes[token_end..];
        let Some(after_len) = rest.strip_prefix(b" len=") else {
            continue; // summary trailer or foreign comment
        };

        let digit_count = after_len.iter().take_while(|b| b.is_ascii_digit()).count();
        if digit_count == 0 {
            continue;
        }
        let Ok(digits) = std::str::from_utf8(&after_len[..digit_count]) else {
            continue;
        };
        let Ok(len) = digits.parse::<usize>() else {
            continue;
        };

        let header_rest = &after_len[digit_count..];
        let close_rel = memmem::find(header_rest, b"-->\n")?;
        let header_text = &header_rest[..close_rel];

        let sum_prefix = b" sum=";
        let checksum = memmem::find(header_text, sum_prefix).and_then(|at| {
            let tail = &header_text[at + sum_prefix.len()..];
            let end = tail
                .iter()
                .position(|b| b.is_ascii_whitespace())
                .unwrap_or(tail.len());
            std::str::from_utf8(&tail[..end]).ok().map(str::to_string)
        });

        let data_start = token_end + " len=".len() + digit_count + close_rel + "-->\n".len();
        return Some(EmbedHeader {
            token: token.to_string(),
            len,
            checksum,
            data_start,
        });
    }

    None
}

/// Extract the embedded payload from `document`.
///
/// Fails with [`VaultError::NoEmbeddedPayload`] when no payload marker is
/// present, and with [`VaultError::BoundaryMismatch`] when the close marker
/// is not exactly where the declared length puts it. Never returns
/// truncated data.
pub fn locate_and_extract(document: &str) -> Result<Bytes> {
    let header = find_header(document).ok_or(VaultError::NoEmbeddedPayload)?;

    let bytes = document.as_bytes();

    // The declared length is untrusted wire data; a claim the document
    // cannot physically hold must fail before any offset arithmetic on it
    let remaining = bytes.len().saturating_sub(header.data_start);
    if header.len > remaining {
        return Err(VaultError::BoundaryMismatch {
            expected_at: bytes.len(),
        });
    }

    let encoded_len = base64_encoded_len(header.len);
    let data_end = header.data_start + encoded_len;
    let close = format!("\n<!--/{}-->", header.token);
    let expected_close_end = data_end + close.len();

    if expected_close_end > bytes.len() || &bytes[data_end..expected_close_end] != close.as_bytes()
    {
        return Err(VaultError::BoundaryMismatch {
            expected_at: data_end,
        });
    }

    let region = std::str::from_utf8(&bytes[header.data_start..data_end]).map_err(|_| {
        VaultError::MalformedEncoding("embedded region is not ascii text".into())
    })?;
    let decoded = decode_base64(region)?;
    if decoded.len() != header.len {
        return Err(VaultError::MalformedEncoding(format!(
            "embedded region decoded to {} bytes but the marker declares {}",
            decoded.len(),
            header.len
        )));
    }

    Ok(Bytes::from(decoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\" height=\"10\">\n  <rect width=\"100%\" height=\"100%\"/>\n</svg>";

    #[test]
    fn embed_then_extract_round_trips() {
        let payload = b"\x00\x01binary video bytes\xff\xfe";
        let document = embed(TEMPLATE, payload);
        let extracted = locate_and_extract(&document).unwrap();
        assert_eq!(&extracted[..], payload);
    }

    #[test]
    fn embedded_document_keeps_xml_declaration_first() {
        let document = embed(TEMPLATE, b"data");
        assert!(document.starts_with("<?xml"));
        assert!(document.contains("<svg"));
        assert!(document.contains("</svg>"));
    }

    #[test]
    fn payload_containing_marker_text_survives() {
        // Payload that contains a full open-marker lookalike
        let mut payload = Vec::new();
        payload.extend_from_slice(b"<!--");
        payload.extend_from_slice(BOUNDARY_PREFIX.as_bytes());
        payload.extend_from_slice(b"0000000000000000 len=1-->");
        payload.extend_from_slice(&[0u8, 255, 7]);

        let document = embed(TEMPLATE, &payload);
        let extracted = locate_and_extract(&document).unwrap();
        assert_eq!(&extracted[..], &payload[..]);
    }

    #[test]
    fn absent_markers_mean_no_embedded_payload() {
        assert_eq!(
            locate_and_extract(TEMPLATE),
            Err(VaultError::NoEmbeddedPayload)
        );
    }

    #[test]
    fn truncated_region_is_a_boundary_mismatch() {
        let document = embed(TEMPLATE, b"some payload worth keeping");
        let header = find_header(&document).unwrap();
        let cut = header.data_start + 4;
        let truncated = &document[..cut];

        assert!(matches!(
            locate_and_extract(truncated),
            Err(VaultError::BoundaryMismatch { .. })
        ));
    }

    #[test]
    fn header_records_len_and_checksum() {
        let payload = b"0123456789";
        let document = embed(TEMPLATE, payload);
        let header = find_header(&document).unwrap();

        assert_eq!(header.len, 10);
        let sum = header.checksum.unwrap();
        assert_eq!(
            sum,
            format!("blake3:{}", hex::encode(blake3::hash(payload).as_bytes()))
        );
    }

    #[test]
    fn absurd_declared_len_is_a_boundary_mismatch() {
        // usize::MAX: large enough to overflow any unchecked length math
        let token = boundary_token(b"x");
        let document = format!(
            "<!--{token} len=18446744073709551615 sum=blake3:00-->\nQUJD\n<!--/{token}-->\n",
            token = token,
        );

        assert!(matches!(
            locate_and_extract(&document),
            Err(VaultError::BoundaryMismatch { .. })
        ));
    }

    #[test]
    fn declared_len_beyond_the_document_is_a_boundary_mismatch() {
        let document = embed(TEMPLATE, b"short payload");
        let inflated = document.replacen(" len=13 ", " len=9999 ", 1);
        assert_ne!(document, inflated);

        assert!(matches!(
            locate_and_extract(&inflated),
            Err(VaultError::BoundaryMismatch { .. })
        ));
    }

    #[test]
    fn summary_trailer_is_not_mistaken_for_a_payload() {
        let document = embed(TEMPLATE, b"xyz");
        // Strip the data block, keeping only the summary trailer
        let close = format!("<!--/{}-->\n", boundary_token(b"xyz"));
        let after_block = document.find(&close).unwrap() + close.len();
        let summary_only = &document[after_block..];

        assert!(summary_only.contains(BOUNDARY_PREFIX));
        assert_eq!(
            locate_and_extract(summary_only),
            Err(VaultError::NoEmbeddedPayload)
        );
    }
}
