use anyhow::{Context, Result};
use colored::*;
use std::fs;
use svgvault_core::parser::{detect_strategy, extract_verified};
use tracing::{info, warn};

pub fn execute(input: &str, output: &str, skip_verify: bool) -> Result<()> {
    info!("Extracting payload from {}", input);

    let document = read_document(input)?;
    let strategy = detect_strategy(&document)?;
    let (payload, report) = extract_verified(&document)?;

    if !skip_verify && !report.is_valid() {
        if !report.byte_length_match {
            warn!("declared byte length does not match the recovered payload");
        }
        anyhow::bail!(
            "integrity verification failed (recorded {:?}, recovered {})",
            report.original_checksum,
            report.recovered_checksum
        );
    }

    fs::write(output, &payload)
        .with_context(|| format!("Failed to write output file: {}", output))?;

    let status = if report.is_valid() {
        "✓".green()
    } else {
        "!".yellow()
    };
    println!(
        "{} Extracted {} bytes from {} container into {}",
        status,
        payload.len(),
        strategy,
        output
    );
    if !report.structural_validity {
        println!("  {} payload could not be verified against recorded metadata", "!".yellow());
    }

    Ok(())
}

pub(crate) fn read_document(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read input file: {}", input))
    }
}
