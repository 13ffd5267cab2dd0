use anyhow::Result;
use colored::*;
use svgvault_core::hybrid::compare_strategies;
use svgvault_core::{BuildOptions, Payload};
use tracing::info;

use super::convert::read_input;

pub fn execute(input: &str, chunk_size: usize) -> Result<()> {
    info!("Comparing container strategies for {}", input);

    let data = read_input(input)?;
    let payload = Payload::video(data);
    let options = BuildOptions::default().chunk_size(chunk_size);

    let outcomes = compare_strategies(&payload, &options, None)?;

    println!("\nPayload: {} bytes\n", payload.len());
    println!(
        "{:<12} {:>14} {:>10} {:>12}",
        "STRATEGY", "CONTAINER", "OVERHEAD", "ROUND-TRIP"
    );
    for outcome in &outcomes {
        let round_trip = if outcome.round_trip {
            "yes".green()
        } else {
            "no".red()
        };
        println!(
            "{:<12} {:>14} {:>9.2}x {:>12}",
            outcome.strategy.to_string(),
            format!("{} bytes", outcome.size),
            outcome.overhead_ratio,
            round_trip
        );
    }

    if let Some(best) = outcomes.first() {
        println!(
            "\n{} Smallest container: {} ({} bytes)",
            "✓".green(),
            best.strategy,
            best.size
        );
    }

    Ok(())
}
