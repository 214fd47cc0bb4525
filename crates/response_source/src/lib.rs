//! Minimal contract for the simulated agent behind a conversation.
//!
//! This crate defines only what the reveal engine consumes from a response
//! generator: which reply to reveal next and how long each pause lasts. It
//! excludes timers, message state and any turn orchestration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Error returned while constructing/configuring a source before any turn starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceInitError {
    #[error("delay range start {start_ms}ms is after end {end_ms}ms")]
    InvertedRange { start_ms: u64, end_ms: u64 },

    #[error("delay range '{0}' must look like '<start>..<end>' in milliseconds")]
    MalformedRange(String),
}

/// Half-open millisecond range `[start_ms, end_ms)` a pause is drawn from.
///
/// Equal bounds describe a fixed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DelayRange {
    start_ms: u64,
    end_ms: u64,
}

impl DelayRange {
    /// Creates a validated range.
    pub fn new(start_ms: u64, end_ms: u64) -> Result<Self, SourceInitError> {
        if start_ms > end_ms {
            return Err(SourceInitError::InvertedRange { start_ms, end_ms });
        }

        Ok(Self { start_ms, end_ms })
    }

    /// Range spanning `a` and `b` in whichever order they are given.
    #[must_use]
    pub const fn ordered(a: u64, b: u64) -> Self {
        if a <= b {
            Self {
                start_ms: a,
                end_ms: b,
            }
        } else {
            Self {
                start_ms: b,
                end_ms: a,
            }
        }
    }

    /// Range that always yields `ms`.
    #[must_use]
    pub const fn fixed(ms: u64) -> Self {
        Self {
            start_ms: ms,
            end_ms: ms,
        }
    }

    #[must_use]
    pub const fn start_ms(&self) -> u64 {
        self.start_ms
    }

    #[must_use]
    pub const fn end_ms(&self) -> u64 {
        self.end_ms
    }

    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        self.start_ms == self.end_ms
    }

    /// Returns true when `delay` could have been drawn from this range.
    #[must_use]
    pub fn contains(&self, delay: Duration) -> bool {
        let ms = delay.as_millis();
        if self.is_fixed() {
            return ms == u128::from(self.start_ms);
        }

        ms >= u128::from(self.start_ms) && ms < u128::from(self.end_ms)
    }
}

impl fmt::Display for DelayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_ms, self.end_ms)
    }
}

impl FromStr for DelayRange {
    type Err = SourceInitError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = || SourceInitError::MalformedRange(raw.to_string());
        let (start, end) = raw.trim().split_once("..").ok_or_else(malformed)?;
        let start_ms = start.trim().parse::<u64>().map_err(|_| malformed())?;
        let end_ms = end.trim().parse::<u64>().map_err(|_| malformed())?;

        Self::new(start_ms, end_ms)
    }
}

/// Immutable metadata describing a response source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceProfile {
    pub source_id: String,
    pub pool_size: usize,
}

/// Picks the reply revealed for one turn.
pub trait ResponseSource: Send + 'static {
    /// Returns source identity metadata.
    fn profile(&self) -> SourceProfile;

    /// Chooses the full text of the next reply.
    fn choose(&mut self) -> String;
}

/// Draws pause lengths for the think, compose and per-character phases.
pub trait DelaySampler: Send + 'static {
    fn sample(&mut self, range: DelayRange) -> Duration;
}
