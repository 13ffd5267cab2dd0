//! Strategy comparison: build the same payload every way and measure.
//!
//! A composition layer over [`builder`](crate::builder) and
//! [`parser`](crate::parser); it owns no encoding of its own.

use crate::builder::{self, VectorPaths};
use crate::parser;
use crate::sequencer::FrameRun;
use crate::types::{BuildOptions, Payload, StrategyTag};
use crate::Result;

#[cfg(feature = "logging")]
use tracing::debug;

/// Result of building one payload with one strategy
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyOutcome {
    /// Strategy the container was built with
    pub strategy: StrategyTag,
    /// Container document size in bytes
    pub size: usize,
    /// Container size divided by payload size
    pub overhead_ratio: f64,
    /// Whether the payload byte-for-byte survived extraction
    pub round_trip: bool,
}

/// Build `payload` with every byte-preserving strategy, plus the lossy
/// vector strategy when `vector_runs` is given, and report the outcomes
/// sorted by ascending container size.
///
/// Round-trip status comes from actually extracting each built document and
/// comparing bytes, not from the strategy's declared capability.
pub fn compare_strategies(
    payload: &Payload,
    options: &BuildOptions,
    vector_runs: Option<&[FrameRun<VectorPaths>]>,
) -> Result<Vec<StrategyOutcome>> {
    let mut outcomes = Vec::with_capacity(5);

    for strategy in [
        StrategyTag::Polyglot,
        StrategyTag::Ascii85,
        StrategyTag::Base64,
        StrategyTag::QrChunked,
    ] {
        let document = builder::build(strategy, payload, options)?;
        let round_trip = parser::extract(&document)
            .map(|bytes| &bytes[..] == payload.data())
            .unwrap_or(false);
        outcomes.push(outcome(strategy, document.len(), payload.len(), round_trip));
    }

    if let Some(runs) = vector_runs {
        let document = builder::build_vector(runs, options)?;
        outcomes.push(outcome(
            StrategyTag::VectorLossy,
            document.len(),
            payload.len(),
            false,
        ));
    }

    outcomes.sort_by_key(|o| o.size);

    #[cfg(feature = "logging")]
    if let Some(best) = outcomes.first() {
        debug!(
            strategy = best.strategy.as_str(),
            size = best.size,
            "smallest container strategy"
        );
    }

    Ok(outcomes)
}

fn outcome(
    strategy: StrategyTag,
    document_len: usize,
    payload_len: usize,
    round_trip: bool,
) -> StrategyOutcome {
    let overhead_ratio = if payload_len == 0 {
        0.0
    } else {
        document_len as f64 / payload_len as f64
    };
    StrategyOutcome {
        strategy,
        size: document_len,
        overhead_ratio,
        round_trip,
    }
}
