//! Fuzzing placeholder for svgvault-core parsing and decoding
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_parse

pub fn fuzz_parse(data: &[u8]) {
    use svgvault_core::parser::{check_structure, detect_strategy, extract, extract_verified};

    // Try to parse as a container document - should never panic
    if let Ok(document) = std::str::from_utf8(data) {
        let _ = detect_strategy(document);
        let _ = extract(document);
        let _ = extract_verified(document);
        let _ = check_structure(document);
    }
}

pub fn fuzz_decode_ascii85(data: &[u8]) {
    use svgvault_core::codec::decode_ascii85;

    // Try to decode - should never panic
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = decode_ascii85(text);
    }
}

pub fn fuzz_decode_base64(data: &[u8]) {
    use svgvault_core::codec::decode_base64;

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = decode_base64(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzz_parse_empty() {
        fuzz_parse(&[]);
    }

    #[test]
    fn test_fuzz_parse_marker_fragment() {
        fuzz_parse(b"<!--SVGVAULT_BOUNDARY_0123 len=");
    }

    #[test]
    fn test_fuzz_parse_multibyte_near_marker() {
        fuzz_parse("<!--SVGVAULT_BOUNDARY_00ff00ff00ff00ff len=3 é-->".as_bytes());
    }

    #[test]
    fn test_fuzz_parse_huge_declared_len() {
        fuzz_parse(
            b"<!--SVGVAULT_BOUNDARY_00000000000000ff len=18446744073709551615 sum=blake3:00-->\nQUJD\n",
        );
    }

    #[test]
    fn test_fuzz_decode_random() {
        fuzz_decode_ascii85(&[0x12, 0x34, 0x56, 0x78]);
        fuzz_decode_base64(&[0xFF; 64]);
    }
}
