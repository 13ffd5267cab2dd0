//! Basic conversion example

use svgvault_core::builder::build;
use svgvault_core::parser::extract_verified;
use svgvault_core::{BuildOptions, Payload, StrategyTag};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Svgvault Basic Conversion Example\n");

    // A stand-in for real video bytes
    let mut video = b"\x00\x00\x00\x20ftypisom".to_vec();
    video.extend((0..2000u32).map(|i| (i * 17 % 251) as u8));

    let payload = Payload::video(video);
    let options = BuildOptions::default().width(640).height(360).fps(30.0);

    println!("Payload:  {} bytes, checksum {}\n", payload.len(), payload.checksum_string());

    for strategy in [
        StrategyTag::Polyglot,
        StrategyTag::Ascii85,
        StrategyTag::Base64,
        StrategyTag::QrChunked,
    ] {
        let document = build(strategy, &payload, &options)?;
        let (recovered, report) = extract_verified(&document)?;

        println!(
            "{:<11} {} container bytes, round trip {}",
            strategy.to_string(),
            document.len(),
            if &recovered[..] == payload.data() && report.is_valid() {
                "ok"
            } else {
                "FAILED"
            }
        );
    }

    let document = build(StrategyTag::Polyglot, &payload, &options)?;
    std::fs::write("example_output.svg", &document)?;

    println!("\nWrote example_output.svg");
    println!("Use 'svgvault extract --input example_output.svg --output recovered.mp4' to read it back");

    Ok(())
}
