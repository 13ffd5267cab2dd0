use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::io::{self, Read};
use svgvault_core::builder::build;
use svgvault_core::{BuildOptions, Payload, StrategyTag};
use tracing::info;

/// Conversion method selectable on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Method {
    /// Steganographic comment embedding (smallest overhead)
    Polyglot,
    /// Ascii85 text encoding in a metadata element
    Ascii85,
    /// Base64 text encoding in a hidden text element
    Base64,
    /// Payload split into addressable chunk records
    QrChunked,
}

impl From<Method> for StrategyTag {
    fn from(method: Method) -> Self {
        match method {
            Method::Polyglot => StrategyTag::Polyglot,
            Method::Ascii85 => StrategyTag::Ascii85,
            Method::Base64 => StrategyTag::Base64,
            Method::QrChunked => StrategyTag::QrChunked,
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn execute(
    input: &str,
    output: &str,
    method: Method,
    width: u32,
    height: u32,
    fps: f64,
    chunk_size: usize,
    max_size: Option<usize>,
) -> Result<()> {
    info!("Converting {} into an SVG container", input);

    let data = read_input(input)?;
    let payload_len = data.len();
    let payload = Payload::video(data);

    let mut options = BuildOptions::default()
        .width(width)
        .height(height)
        .fps(fps)
        .chunk_size(chunk_size);
    if let Some(limit) = max_size {
        options = options.max_payload_size(limit);
    }

    let document = build(method.into(), &payload, &options)
        .with_context(|| format!("Failed to build {:?} container", method))?;

    fs::write(output, &document)
        .with_context(|| format!("Failed to write output file: {}", output))?;

    println!(
        "{} Wrote {} ({} payload bytes, {} container bytes, checksum {})",
        "✓".green(),
        output,
        payload_len,
        document.len(),
        payload.checksum_string()
    );

    Ok(())
}

pub(crate) fn read_input(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(input).with_context(|| format!("Failed to read input file: {}", input))
    }
}
