//! Example demonstrating chunked containers and partial recovery reporting

use svgvault_core::chunker;
use svgvault_core::VaultError;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Svgvault Chunked Recovery Example\n");

    let payload: Vec<u8> = (0..5000u32).map(|i| (i % 256) as u8).collect();

    // Split into addressable chunks
    let chunks = chunker::split(&payload, 1000)?;
    println!("Split {} bytes into {} chunks (session {:#018x})", payload.len(), chunks.len(), chunks[0].session_id);

    for chunk in &chunks {
        println!(
            "  chunk {}/{}: {} bytes, crc32c {:#010x}",
            chunk.index + 1,
            chunk.total_count,
            chunk.payload.len(),
            chunk.slice_checksum
        );
    }

    // Chunks arrive out of order; reassembly still succeeds
    let mut shuffled = chunks.clone();
    shuffled.rotate_left(2);
    let joined = chunker::join(&shuffled)?;
    assert_eq!(&joined[..], &payload[..]);
    println!("\nReassembled out-of-order chunks: {} bytes, intact", joined.len());

    // A lost chunk is reported by index rather than silently skipped
    let partial: Vec<_> = chunks.iter().filter(|c| c.index != 3).cloned().collect();
    match chunker::join(&partial) {
        Err(VaultError::MissingChunk(idx)) => println!("Dropped chunk detected: index {}", idx),
        other => println!("Unexpected result: {:?}", other.map(|b| b.len())),
    }

    // A corrupted slice is caught by its per-chunk checksum
    let mut damaged = chunks;
    let mut bytes = damaged[2].payload.to_vec();
    bytes[0] ^= 0xFF;
    damaged[2].payload = bytes.into();
    match chunker::join(&damaged) {
        Err(VaultError::CorruptChunk { index, .. }) => println!("Corrupt chunk detected: index {}", index),
        other => println!("Unexpected result: {:?}", other.map(|b| b.len())),
    }

    Ok(())
}
