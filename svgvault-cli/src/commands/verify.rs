use anyhow::Result;
use colored::*;
use svgvault_core::parser::{check_structure, detect_strategy, extract_verified};
use svgvault_core::{StrategyTag, VaultError};
use tracing::info;

use super::extract::read_document;

pub fn execute(input: &str, json: bool) -> Result<()> {
    info!("Verifying container: {}", input);

    let document = read_document(input)?;

    let strategy = match detect_strategy(&document) {
        Ok(s) => s,
        Err(VaultError::UnknownFormat) => {
            println!("{} No known container format detected", "✗".red());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        if strategy == StrategyTag::VectorLossy {
            anyhow::bail!("lossy vector containers carry no verifiable payload");
        }
        let (_, report) = extract_verified(&document)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n=== Container ===");
    println!("Strategy:           {}", strategy);
    println!(
        "Document size:      {} bytes",
        document.len()
    );
    println!(
        "Structure:          {}",
        if check_structure(&document) {
            "well-formed".green()
        } else {
            "malformed".red()
        }
    );

    if strategy == StrategyTag::VectorLossy {
        println!("\n{} Lossy vector container: nothing to verify byte-for-byte", "!".yellow());
        return Ok(());
    }

    let (payload, report) = extract_verified(&document)?;

    println!("\n=== Integrity ===");
    println!("Payload bytes:      {}", payload.len());
    match &report.original_checksum {
        Some(recorded) => println!("Recorded checksum:  {}", recorded),
        None => println!("Recorded checksum:  {}", "absent".yellow()),
    }
    println!("Recovered checksum: {}", report.recovered_checksum);
    println!(
        "Length match:       {}",
        if report.byte_length_match {
            "yes".green()
        } else {
            "no".red()
        }
    );

    println!("\n=== Summary ===");
    if report.is_valid() {
        println!("{} Container is intact and fully verifiable", "✓".green());
    } else if report.original_checksum.is_none() {
        println!("{} Payload extracted but unverifiable (no recorded checksum)", "!".yellow());
    } else {
        println!("{} Integrity verification FAILED", "✗".red());
    }

    Ok(())
}
