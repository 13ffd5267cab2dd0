use anyhow::Result;
use colored::*;
use svgvault_core::parser::{check_structure, detect_strategy};
use svgvault_core::VaultError;
use tracing::info;

use super::extract::read_document;

pub fn execute(input: &str) -> Result<()> {
    info!("Detecting container format of {}", input);

    let document = read_document(input)?;

    match detect_strategy(&document) {
        Ok(strategy) => {
            let recoverable = if strategy.supports_round_trip() {
                "byte-exact recovery".green()
            } else {
                "lossy, not recoverable".yellow()
            };
            println!("{} {} container ({})", "✓".green(), strategy, recoverable);
        }
        Err(VaultError::UnknownFormat) => {
            println!("{} No known container format detected", "✗".red());
        }
        Err(e) => return Err(e.into()),
    }

    if !check_structure(&document) {
        println!("  {} document fails structural checks", "!".yellow());
    }

    Ok(())
}
