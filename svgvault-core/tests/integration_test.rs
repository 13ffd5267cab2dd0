//! Integration tests for the complete build → detect → extract → verify flow

use svgvault_core::builder::{build, build_vector};
use svgvault_core::chunker;
use svgvault_core::parser::{detect_strategy, extract, extract_verified};
use svgvault_core::sequencer::{sequence, FrameRun};
use svgvault_core::{BuildOptions, Payload, StrategyTag, VaultError};
use std::time::Duration;

fn sample_payload() -> Payload {
    // Plausible mp4 opening bytes followed by high-entropy filler
    let mut data = b"\x00\x00\x00\x20ftypisom\x00\x00\x02\x00".to_vec();
    data.extend((0..3000u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8));
    Payload::video(data)
}

#[test]
fn full_workflow_every_byte_strategy() {
    let payload = sample_payload();
    let options = BuildOptions::default().chunk_size(512);

    for strategy in [
        StrategyTag::Polyglot,
        StrategyTag::Ascii85,
        StrategyTag::Base64,
        StrategyTag::QrChunked,
    ] {
        let document = build(strategy, &payload, &options).unwrap();

        assert_eq!(detect_strategy(&document).unwrap(), strategy);

        let (recovered, report) = extract_verified(&document).unwrap();
        assert_eq!(&recovered[..], payload.data(), "{} bytes differ", strategy);
        assert!(report.is_valid(), "{} report invalid: {:?}", strategy, report);
        assert_eq!(
            report.original_checksum.as_deref(),
            Some(payload.checksum_string().as_str())
        );
    }
}

#[test]
fn full_workflow_vector_lossy() {
    // Three frames, middle one nearly identical to the first
    let frames: Vec<Vec<String>> = vec![
        vec!["M 0,0 L 10,10 Z".to_string()],
        vec!["M 0,0 L 10,11 Z".to_string()],
        vec!["M 90,90 L 0,0 Z".to_string()],
    ];
    let diff = |a: &Vec<String>, b: &Vec<String>| if a == b { 1.0 } else { 0.5 };

    let runs = sequence(frames, Duration::from_millis(40), 0.9, diff).unwrap();
    assert_eq!(runs.len(), 3);

    let document = build_vector(&runs, &BuildOptions::default()).unwrap();
    assert_eq!(detect_strategy(&document).unwrap(), StrategyTag::VectorLossy);
    assert_eq!(
        extract(&document),
        Err(VaultError::ExtractionNotSupported(StrategyTag::VectorLossy))
    );
}

#[test]
fn deduplicated_runs_collapse_into_one_vector_group() {
    let frames: Vec<Vec<String>> = vec![vec!["M 1,1 Z".to_string()]; 10];
    let diff = |_: &Vec<String>, _: &Vec<String>| 1.0;

    let runs = sequence(frames, Duration::from_millis(33), 0.95, diff).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].source_frame_count, 10);
    assert_eq!(runs[0].duration, Duration::from_millis(330));
}

#[test]
fn chunked_container_survives_record_reordering() {
    let payload = sample_payload();
    let document = build(
        StrategyTag::QrChunked,
        &payload,
        &BuildOptions::default().chunk_size(256),
    )
    .unwrap();

    // Reassembly through the chunker directly, records presented out of order
    let chunks = chunker::split(payload.data(), 256).unwrap();
    let mut reversed = chunks.clone();
    reversed.reverse();
    let joined = chunker::join(&reversed).unwrap();
    assert_eq!(&joined[..], payload.data());

    // And through the document path
    let (recovered, _) = extract_verified(&document).unwrap();
    assert_eq!(&recovered[..], payload.data());
}

#[test]
fn missing_chunk_is_reported_by_index() {
    let payload = sample_payload();
    let chunks = chunker::split(payload.data(), 1000).unwrap();
    assert!(chunks.len() >= 3);

    let partial: Vec<_> = chunks
        .iter()
        .filter(|c| c.index != 1)
        .cloned()
        .collect();
    assert_eq!(chunker::join(&partial), Err(VaultError::MissingChunk(1)));
}

#[test]
fn preview_thumbnail_does_not_affect_extraction() {
    use bytes::Bytes;
    use svgvault_core::types::Preview;

    let payload = sample_payload();
    let with_preview = BuildOptions::default().preview(Preview {
        jpeg: Bytes::from_static(b"\xff\xd8\xff\xe0 jfif stub \xff\xd9"),
        width: 160,
        height: 90,
    });

    for strategy in [
        StrategyTag::Polyglot,
        StrategyTag::Ascii85,
        StrategyTag::Base64,
        StrategyTag::QrChunked,
    ] {
        let document = build(strategy, &payload, &with_preview).unwrap();
        let (recovered, report) = extract_verified(&document).unwrap();
        assert_eq!(&recovered[..], payload.data(), "{} with preview", strategy);
        assert!(report.is_valid());
    }
}

#[test]
fn empty_payload_round_trips_everywhere() {
    let payload = Payload::video(Vec::new());
    let options = BuildOptions::default();

    for strategy in [
        StrategyTag::Polyglot,
        StrategyTag::Ascii85,
        StrategyTag::Base64,
        StrategyTag::QrChunked,
    ] {
        let document = build(strategy, &payload, &options).unwrap();
        let (recovered, report) = extract_verified(&document).unwrap();
        assert!(recovered.is_empty(), "{} not empty", strategy);
        assert!(report.is_valid(), "{} report: {:?}", strategy, report);
    }
}

#[test]
fn foreign_svg_is_rejected_as_unknown() {
    let doc = r#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
  <circle cx="5" cy="5" r="4" fill="red"/>
</svg>"#;
    assert_eq!(detect_strategy(doc), Err(VaultError::UnknownFormat));
}
