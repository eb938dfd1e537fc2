//! Task transforms and simulated work.
//!
//! The pipeline treats the per-task computation as an injected, pure
//! function of `(id, value)`. It may fail; a failure abandons that one
//! task and nothing else.

use std::time::Duration;

use rand::Rng;
use thiserror::Error;

use crate::error::{Error, Result};
use crate::model::TaskId;

/// Why a transform could not produce an output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("rejected: {0}")]
    Rejected(String),
}

/// A pure `(id, value) -> output` computation applied by workers.
pub trait Transform: Send + Sync {
    fn apply(&self, id: TaskId, value: i64) -> std::result::Result<i64, TransformError>;
}

impl<F> Transform for F
where
    F: Fn(TaskId, i64) -> std::result::Result<i64, TransformError> + Send + Sync,
{
    fn apply(&self, id: TaskId, value: i64) -> std::result::Result<i64, TransformError> {
        self(id, value)
    }
}

/// `value * 2 + id`, with overflow reported instead of wrapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleAndOffset;

impl Transform for DoubleAndOffset {
    fn apply(&self, id: TaskId, value: i64) -> std::result::Result<i64, TransformError> {
        let id = i64::try_from(id).map_err(|_| TransformError::Overflow)?;
        value
            .checked_mul(2)
            .and_then(|doubled| doubled.checked_add(id))
            .ok_or(TransformError::Overflow)
    }
}

// ---------------------------------------------------------------------------
// Simulated work
// ---------------------------------------------------------------------------

/// Half-open range `[min, max)` the per-task work delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    pub fn new(min: Duration, max: Duration) -> Result<Self> {
        if min > max {
            return Err(Error::Config(format!(
                "delay lower bound {}ms exceeds upper bound {}ms",
                min.as_millis(),
                max.as_millis()
            )));
        }
        Ok(Self { min, max })
    }

    pub fn from_millis(min_ms: u64, max_ms: u64) -> Result<Self> {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }

    /// No delay at all.
    pub fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draw one delay. An empty range yields exactly `min`.
    pub fn sample(&self) -> Duration {
        if self.min >= self.max {
            return self.min;
        }
        rand::rng().random_range(self.min..self.max)
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(50),
            max: Duration::from_millis(150),
        }
    }
}

/// Suspend the calling task for one sampled delay without blocking the thread.
pub async fn simulate_work(range: DelayRange) -> Duration {
    let delay = range.sample();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    delay
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_and_offset_matches_reference() {
        assert_eq!(DoubleAndOffset.apply(1, 100), Ok(201));
        assert_eq!(DoubleAndOffset.apply(5, 500), Ok(1005));
    }

    #[test]
    fn double_and_offset_reports_overflow() {
        assert_eq!(
            DoubleAndOffset.apply(1, i64::MAX),
            Err(TransformError::Overflow)
        );
        assert_eq!(
            DoubleAndOffset.apply(u64::MAX, 0),
            Err(TransformError::Overflow)
        );
    }

    #[test]
    fn closures_are_transforms() {
        let negate = |_id: TaskId, value: i64| Ok::<_, TransformError>(-value);
        assert_eq!(negate.apply(3, 7), Ok(-7));
    }

    #[test]
    fn sample_stays_in_half_open_range() {
        let range = DelayRange::from_millis(50, 150).unwrap();
        for _ in 0..500 {
            let d = range.sample();
            assert!(d >= Duration::from_millis(50));
            assert!(d < Duration::from_millis(150));
        }
    }

    #[test]
    fn sample_handles_bounds_beyond_u64_micros() {
        // u64::MAX ms is far more microseconds than fit in a u64.
        let min = Duration::from_millis(u64::MAX - 10);
        let max = Duration::from_millis(u64::MAX);
        let range = DelayRange::new(min, max).unwrap();
        for _ in 0..100 {
            let d = range.sample();
            assert!(d >= min && d < max, "{d:?} outside range");
        }
    }

    #[test]
    fn empty_range_yields_lower_bound() {
        let range = DelayRange::from_millis(20, 20).unwrap();
        assert_eq!(range.sample(), Duration::from_millis(20));
        assert_eq!(DelayRange::none().sample(), Duration::ZERO);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = DelayRange::from_millis(10, 5).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
