//! Text codec set: stateless bijections between byte buffers and printable text.
//!
//! Two codecs are provided:
//!
//! - a base-85 variant working on 4-byte groups (5 symbols per group, exactly
//!   25% overhead for aligned buffers);
//! - standard base-64 (33% overhead) delegating to the `base64` crate.
//!
//! Both are total on byte input; decoding rejects streams whose length or
//! symbols are inconsistent with the padding rules.

use crate::error::VaultError;
use crate::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// First symbol of the base-85 alphabet (`!`)
const A85_FIRST: u8 = 33;
/// Last symbol of the base-85 alphabet (`u`)
const A85_LAST: u8 = 117;

/// Encode bytes as base-85 text.
///
/// Each full 4-byte group becomes 5 symbols. A trailing group of n bytes
/// (1..=3) is zero-padded, encoded, and truncated to n+1 symbols, so the
/// symbol count itself records the leftover byte count. There is no `z`
/// shorthand for zero groups; `[0, 0, 0, 0]` encodes to `!!!!!`.
pub fn encode_ascii85(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() / 4 * 5 + 5);

    for group in data.chunks(4) {
        let mut quad = [0u8; 4];
        quad[..group.len()].copy_from_slice(group);
        let mut value = u32::from_be_bytes(quad);

        let mut symbols = [0u8; 5];
        for slot in symbols.iter_mut().rev() {
            *slot = A85_FIRST + (value % 85) as u8;
            value /= 85;
        }

        let keep = if group.len() == 4 { 5 } else { group.len() + 1 };
        for &sym in &symbols[..keep] {
            out.push(sym as char);
        }
    }

    out
}

/// Decode base-85 text produced by [`encode_ascii85`].
///
/// Fails with [`VaultError::MalformedEncoding`] on symbols outside the
/// alphabet, on a group whose value overflows 32 bits, or on a stream length
/// inconsistent with the padding rule (a trailing group of one symbol cannot
/// encode any byte count).
pub fn decode_ascii85(encoded: &str) -> Result<Vec<u8>> {
    let symbols = encoded.as_bytes();

    if symbols.len() % 5 == 1 {
        return Err(VaultError::MalformedEncoding(format!(
            "ascii85 stream of {} symbols has an impossible trailing group of 1",
            symbols.len()
        )));
    }

    let mut out = Vec::with_capacity(symbols.len() / 5 * 4 + 3);

    for group in symbols.chunks(5) {
        // Partial trailing group: pad with the max symbol and truncate below
        let mut padded = [A85_LAST; 5];
        padded[..group.len()].copy_from_slice(group);

        let mut value: u64 = 0;
        for &sym in &padded {
            if !(A85_FIRST..=A85_LAST).contains(&sym) {
                return Err(VaultError::MalformedEncoding(format!(
                    "symbol {:#04x} outside the ascii85 alphabet",
                    sym
                )));
            }
            value = value * 85 + u64::from(sym - A85_FIRST);
        }

        if value > u64::from(u32::MAX) {
            return Err(VaultError::MalformedEncoding(
                "ascii85 group value overflows 32 bits".into(),
            ));
        }

        let quad = (value as u32).to_be_bytes();
        let keep = if group.len() == 5 { 4 } else { group.len() - 1 };
        out.extend_from_slice(&quad[..keep]);
    }

    Ok(out)
}

/// Encode bytes as standard base-64 with `=` padding
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode standard base-64 text.
///
/// Invalid length-mod-4 or invalid characters fail with
/// [`VaultError::MalformedEncoding`].
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded)
        .map_err(|e| VaultError::MalformedEncoding(format!("invalid base64: {}", e)))
}

/// Exact encoded length of `n` payload bytes under [`encode_base64`]
pub const fn base64_encoded_len(n: usize) -> usize {
    n.div_ceil(3) * 4
}
