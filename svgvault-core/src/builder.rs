//! Container builder: assembles complete SVG output documents.
//!
//! Every container records the strategy marker, the original payload length,
//! and a content checksum next to the encoded region, plus an optional
//! preview thumbnail that never participates in extraction.

use crate::chunker;
use crate::codec::{encode_ascii85, encode_base64};
use crate::constants::{FORMAT_VERSION, VIDEO_NS};
use crate::error::VaultError;
use crate::sequencer::FrameRun;
use crate::stego;
use crate::types::{BuildOptions, Payload, StrategyTag};
use crate::Result;
use serde::{Deserialize, Serialize};

#[cfg(feature = "logging")]
use tracing::debug;

/// SVG path strings making up one lossy vector frame
pub type VectorPaths = Vec<String>;

/// Document-level metadata of a chunked container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkIndex {
    /// Always `"qr_chunked"`
    pub format: String,
    /// Number of chunk records in the document
    pub chunks: u32,
    /// Chunk size the payload was split with
    pub chunk_size: usize,
    /// Original payload length in bytes
    pub total_size: usize,
    /// Session id shared by every chunk record
    pub session: u64,
    /// Content checksum over the whole payload, `algorithm:hex`
    pub checksum: String,
}

/// Assemble a complete container document for `strategy`.
///
/// Fails with [`VaultError::PayloadTooLarge`] when the payload exceeds the
/// configured ceiling, and with [`VaultError::InvalidConfiguration`] for
/// [`StrategyTag::VectorLossy`], which is built from frame runs via
/// [`build_vector`] rather than from raw bytes.
pub fn build(strategy: StrategyTag, payload: &Payload, options: &BuildOptions) -> Result<String> {
    if payload.len() > options.max_payload_size {
        return Err(VaultError::PayloadTooLarge {
            actual: payload.len(),
            limit: options.max_payload_size,
        });
    }

    let document = match strategy {
        StrategyTag::Polyglot => build_polyglot(payload, options),
        StrategyTag::Ascii85 => build_ascii85(payload, options),
        StrategyTag::Base64 => build_base64(payload, options),
        StrategyTag::QrChunked => build_chunked(payload, options)?,
        StrategyTag::VectorLossy => {
            return Err(VaultError::InvalidConfiguration(
                "vector_lossy containers are built from frame runs; use build_vector".into(),
            ))
        }
    };

    #[cfg(feature = "logging")]
    debug!(
        strategy = strategy.as_str(),
        payload_len = payload.len(),
        document_len = document.len(),
        "built container"
    );

    Ok(document)
}

fn preview_element(options: &BuildOptions) -> String {
    match &options.preview {
        Some(preview) => format!(
            "  <image x=\"10\" y=\"10\" width=\"{}\" height=\"{}\" href=\"data:image/jpeg;base64,{}\"/>\n",
            preview.width,
            preview.height,
            encode_base64(&preview.jpeg)
        ),
        None => String::new(),
    }
}

fn build_polyglot(payload: &Payload, options: &BuildOptions) -> String {
    let template = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\">\n\
           <title>Polyglot Video Container</title>\n\
           <desc>Video bytes hidden in comment regions</desc>\n\
           <rect width=\"100%\" height=\"100%\" fill=\"#2a2a2a\"/>\n\
         {preview}\
           <text x=\"50%\" y=\"40%\" fill=\"#0f0\" text-anchor=\"middle\">Polyglot SVG Container</text>\n\
           <text x=\"50%\" y=\"55%\" fill=\"#0f0\" text-anchor=\"middle\" font-size=\"14\">{w}x{h} @ {fps:.1} fps</text>\n\
         </svg>",
        w = options.width,
        h = options.height,
        fps = options.fps,
        preview = preview_element(options),
    );

    stego::embed(&template, payload.data())
}

fn build_ascii85(payload: &Payload, options: &BuildOptions) -> String {
    let encoded = encode_ascii85(payload.data());
    // The ascii85 alphabet can spell "]]>", so the text is base64-wrapped
    // before it enters the CDATA region
    let wrapped = encode_base64(encoded.as_bytes());

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <svg xmlns=\"http://www.w3.org/2000/svg\"\n\
             xmlns:video=\"{ns}\"\n\
             width=\"{w}\" height=\"{h}\">\n\
           <title>Ascii85 Encoded Video</title>\n\
           <desc>Video data encoded with ascii85 (25% overhead)</desc>\n\
           <metadata>\n\
             <video:data encoding=\"ascii85\"\n\
                         version=\"{version}\"\n\
                         originalSize=\"{n}\"\n\
                         checksum=\"{checksum}\"\n\
                         mime=\"{mime}\"\n\
                         fps=\"{fps}\"\n\
                         frames=\"{frames}\"\n\
                         id=\"videoData\"><![CDATA[\n\
         {wrapped}\n\
         ]]></video:data>\n\
           </metadata>\n\
           <rect width=\"100%\" height=\"100%\" fill=\"#1a1a1a\"/>\n\
         {preview}\
           <text x=\"50%\" y=\"40%\" fill=\"#0f0\" text-anchor=\"middle\">Ascii85 Video Container</text>\n\
         </svg>\n",
        ns = VIDEO_NS,
        w = options.width,
        h = options.height,
        version = FORMAT_VERSION,
        n = payload.len(),
        checksum = payload.checksum_string(),
        mime = payload.mime(),
        fps = options.fps,
        frames = options.frame_count,
        wrapped = wrapped,
        preview = preview_element(options),
    )
}

fn build_base64(payload: &Payload, options: &BuildOptions) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\">\n\
           <title>Base64 Encoded Video</title>\n\
           <desc>Video data encoded with base64 (33% overhead)</desc>\n\
           <rect width=\"100%\" height=\"100%\" fill=\"#1a1a1a\"/>\n\
         {preview}\
           <text x=\"50%\" y=\"40%\" fill=\"#0f0\" text-anchor=\"middle\">Base64 Video Container</text>\n\
           <text id=\"base64VideoData\" data-original-size=\"{n}\" data-checksum=\"{checksum}\" style=\"display:none\" font-size=\"0\">{encoded}</text>\n\
         </svg>\n",
        w = options.width,
        h = options.height,
        n = payload.len(),
        checksum = payload.checksum_string(),
        encoded = encode_base64(payload.data()),
        preview = preview_element(options),
    )
}

fn build_chunked(payload: &Payload, options: &BuildOptions) -> Result<String> {
    let chunks = chunker::split(payload.data(), options.chunk_size)?;

    let index = ChunkIndex {
        format: "qr_chunked".into(),
        chunks: chunks.len() as u32,
        chunk_size: options.chunk_size,
        total_size: payload.len(),
        session: chunks[0].session_id,
        checksum: payload.checksum_string(),
    };
    let index_json = serde_json::to_string(&index)
        .map_err(|e| VaultError::InvalidStructure(format!("chunk index serialization: {}", e)))?;

    // Grid of cells sized so a QR renderer can fill each group
    let cell = (options.width.min(options.height) / 2).max(1);
    let grid_cols = (options.width / cell).max(1);

    let mut groups = String::new();
    for chunk in &chunks {
        let record_json = serde_json::to_string(&chunk.to_record())
            .map_err(|e| VaultError::InvalidStructure(format!("chunk serialization: {}", e)))?;
        let x = (chunk.index % grid_cols) * cell;
        let y = (chunk.index / grid_cols) * cell;
        let opacity = if chunk.index == 0 { "1" } else { "0.1" };

        groups.push_str(&format!(
            "  <g id=\"qr-frame-{idx}\" transform=\"translate({x},{y})\" opacity=\"{opacity}\">\n\
               <desc>{record}</desc>\n\
               <rect width=\"{cell}\" height=\"{cell}\" fill=\"#fff\" stroke=\"#000\"/>\n\
             </g>\n",
            idx = chunk.index,
            x = x,
            y = y,
            opacity = opacity,
            record = record_json,
            cell = cell,
        ));
    }

    Ok(format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n\
           <title>Chunked Video Container</title>\n\
           <desc>Video payload split into {count} addressable chunk records</desc>\n\
           <metadata id=\"vaultChunkIndex\">{index}</metadata>\n\
         {preview}\
         {groups}\
         </svg>\n",
        w = options.width,
        h = options.height,
        count = chunks.len(),
        index = index_json,
        preview = preview_element(options),
        groups = groups,
    ))
}

/// Assemble a lossy animated vector container from pre-sequenced frame runs.
///
/// Each run becomes a frame group shown for its cumulative duration via
/// `<set>` timing. The result approximates the source visually; the original
/// video bytes are not recoverable from it.
pub fn build_vector(runs: &[FrameRun<VectorPaths>], options: &BuildOptions) -> Result<String> {
    let mut groups = String::new();
    let mut elapsed = 0.0f64;

    for (idx, run) in runs.iter().enumerate() {
        let duration = run.duration.as_secs_f64();
        let opacity = if idx == 0 { "1" } else { "0" };

        groups.push_str(&format!("  <g id=\"frame-{}\" opacity=\"{}\">\n", idx, opacity));
        if idx > 0 {
            groups.push_str(&format!(
                "    <set attributeName=\"opacity\" to=\"1\" begin=\"{:.3}s\" dur=\"{:.3}s\"/>\n\
                     <set attributeName=\"opacity\" to=\"0\" begin=\"{:.3}s\" dur=\"0.001s\"/>\n",
                elapsed,
                duration,
                elapsed + duration,
            ));
        }
        for path in &run.representative {
            groups.push_str(&format!(
                "    <path d=\"{}\" fill=\"none\" stroke=\"#0f0\" stroke-width=\"1\" opacity=\"0.8\"/>\n",
                path
            ));
        }
        groups.push_str("  </g>\n");

        elapsed += duration;
    }

    Ok(format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n\
           <title>Vector Frame Animation</title>\n\
           <desc>Lossy vector rendition of {count} frame runs over {total:.3}s</desc>\n\
         {groups}\
         </svg>\n",
        w = options.width,
        h = options.height,
        count = runs.len(),
        total = elapsed,
        groups = groups,
    ))
}
