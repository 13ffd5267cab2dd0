//! # Svgvault Core
//!
//! Packs arbitrary video payloads into standalone SVG container documents and
//! recovers them byte-for-byte, with one deliberately lossy vector strategy.
//!
//! ## Modules
//!
//! - `constants`: Format markers, signatures and limits
//! - `types`: Core types (StrategyTag, Payload, BuildOptions, IntegrityReport)
//! - `codec`: Ascii85 and base64 text codecs
//! - `chunker`: Payload splitting and checksummed reassembly
//! - `stego`: Comment-region steganographic embedding
//! - `builder`: Container document assembly per strategy
//! - `parser`: Strategy detection, extraction and integrity verification
//! - `sequencer`: Deduplicating frame run sequencing
//! - `hybrid`: Cross-strategy size/fidelity comparison

#![warn(missing_docs)]

pub mod builder;
pub mod chunker;
pub mod codec;
pub mod constants;
pub mod error;
pub mod hybrid;
pub mod parser;
pub mod sequencer;
pub mod stego;
pub mod types;

// Re-export commonly used types
pub use error::VaultError;
pub use types::{BuildOptions, IntegrityReport, Payload, StrategyTag};

/// Result type alias for svgvault operations
pub type Result<T> = core::result::Result<T, VaultError>;
