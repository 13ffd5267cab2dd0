//! Deduplicating frame sequencer for the lossy animation path.
//!
//! Collapses runs of near-duplicate consecutive frames into single frames
//! carrying a cumulative duration. Similarity is computed by a
//! caller-supplied difference function, keeping image libraries out of the
//! core; [`mse_similarity`] is a ready-made collaborator for grayscale byte
//! buffers.

use crate::error::VaultError;
use crate::Result;
use std::time::Duration;

/// A run of visually similar consecutive frames collapsed to one
/// representative plus cumulative duration
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRun<F> {
    /// First frame of the run; no averaging, keeping the transform
    /// deterministic and cheap
    pub representative: F,
    /// Cumulative nominal duration of every source frame in the run
    pub duration: Duration,
    /// Number of source frames folded into this run
    pub source_frame_count: u32,
}

/// Collapse `frames` into runs of similar consecutive frames.
///
/// A frame folds into the current run when `diff(representative, frame)`
/// is at least `similarity_threshold` (1.0 = identical). Run durations sum
/// exactly to `frames.len() × frame_interval`: pixel data of folded frames
/// is discarded, their time is not.
///
/// Threshold 1.0 degenerates to one run per distinct frame; threshold 0.0
/// collapses everything into a single run. A threshold outside `[0, 1]`
/// (or NaN) fails with [`VaultError::InvalidConfiguration`].
pub fn sequence<F>(
    frames: Vec<F>,
    frame_interval: Duration,
    similarity_threshold: f64,
    diff: impl Fn(&F, &F) -> f64,
) -> Result<Vec<FrameRun<F>>> {
    if !(0.0..=1.0).contains(&similarity_threshold) {
        return Err(VaultError::InvalidConfiguration(format!(
            "similarity_threshold must be in [0, 1], got {}",
            similarity_threshold
        )));
    }

    let mut runs: Vec<FrameRun<F>> = Vec::new();

    for frame in frames {
        match runs.last_mut() {
            Some(run) if diff(&run.representative, &frame) >= similarity_threshold => {
                run.duration += frame_interval;
                run.source_frame_count += 1;
            }
            _ => runs.push(FrameRun {
                representative: frame,
                duration: frame_interval,
                source_frame_count: 1,
            }),
        }
    }

    Ok(runs)
}

/// Mean-squared-error similarity between two equal-length grayscale buffers,
/// normalized to `[0, 1]` with 1.0 meaning identical.
///
/// Buffers of different lengths compare as fully dissimilar.
pub fn mse_similarity(a: &[u8], b: &[u8]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return if a.len() == b.len() { 1.0 } else { 0.0 };
    }

    let sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum();
    let mse = sum / a.len() as f64;

    (1.0 - mse / (255.0 * 255.0)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(40); // 25 fps

    fn frames(values: &[u8]) -> Vec<Vec<u8>> {
        values.iter().map(|&v| vec![v; 16]).collect()
    }

    #[test]
    fn threshold_one_keeps_every_distinct_frame() {
        let input = frames(&[0, 60, 120, 180]);
        let runs = sequence(input, INTERVAL, 1.0, |a, b| mse_similarity(a, b)).unwrap();

        assert_eq!(runs.len(), 4);
        assert!(runs.iter().all(|r| r.source_frame_count == 1));
        assert!(runs.iter().all(|r| r.duration == INTERVAL));
    }

    #[test]
    fn threshold_zero_collapses_to_a_single_run() {
        let input = frames(&[0, 60, 120, 180, 240]);
        let runs = sequence(input, INTERVAL, 0.0, |a, b| mse_similarity(a, b)).unwrap();

        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].source_frame_count, 5);
        assert_eq!(runs[0].duration, INTERVAL * 5);
        assert_eq!(runs[0].representative, vec![0u8; 16]);
    }

    #[test]
    fn durations_always_sum_to_total_nominal_duration() {
        let input = frames(&[10, 10, 11, 200, 200, 200, 10]);
        let runs = sequence(input, INTERVAL, 0.99, |a, b| mse_similarity(a, b)).unwrap();

        let total: Duration = runs.iter().map(|r| r.duration).sum();
        assert_eq!(total, INTERVAL * 7);
        let counted: u32 = runs.iter().map(|r| r.source_frame_count).sum();
        assert_eq!(counted, 7);
    }

    #[test]
    fn representative_is_the_first_member_of_the_run() {
        let input = frames(&[10, 11, 12]);
        let runs = sequence(input, INTERVAL, 0.99, |a, b| mse_similarity(a, b)).unwrap();

        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].representative, vec![10u8; 16]);
    }

    #[test]
    fn similarity_compares_to_representative_not_predecessor() {
        // Slow drift: each neighbor pair is similar, but the drift from the
        // run's first frame eventually exceeds the threshold.
        let input = frames(&[0, 10, 20, 30, 40]);
        let threshold = mse_similarity(&[0u8; 16], &[15u8; 16]);
        let runs = sequence(input, INTERVAL, threshold, |a, b| mse_similarity(a, b)).unwrap();

        assert!(runs.len() > 1, "drift past the representative must split runs");
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let input = frames(&[1, 2]);
        assert!(matches!(
            sequence(input.clone(), INTERVAL, 1.5, |a, b| mse_similarity(a, b)),
            Err(VaultError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            sequence(input.clone(), INTERVAL, -0.1, |a, b| mse_similarity(a, b)),
            Err(VaultError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            sequence(input, INTERVAL, f64::NAN, |a, b| mse_similarity(a, b)),
            Err(VaultError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn empty_input_yields_no_runs() {
        let runs =
            sequence(Vec::<Vec<u8>>::new(), INTERVAL, 0.5, |a, b| mse_similarity(a, b)).unwrap();
        assert!(runs.is_empty());
    }

    #[test]
    fn mse_similarity_boundaries() {
        assert_eq!(mse_similarity(&[5, 5, 5], &[5, 5, 5]), 1.0);
        assert_eq!(mse_similarity(&[0, 0], &[255, 255]), 0.0);
        assert_eq!(mse_similarity(&[1, 2], &[1, 2, 3]), 0.0);
        assert_eq!(mse_similarity(&[], &[]), 1.0);
    }
}
