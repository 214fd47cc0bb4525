//! Canned implementations of the shared `response_source` contract.
//!
//! This crate contains no timing or message logic and is intended for the
//! console and for deterministic contract-level tests.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use response_source::{DelayRange, DelaySampler, ResponseSource, SourceProfile};

/// Stable source identifier for the built-in pool.
pub const CANNED_SOURCE_ID: &str = "canned";

/// Stable source identifier for in-order scripted replies.
pub const SCRIPTED_SOURCE_ID: &str = "scripted";

/// Replies revealed by the default console agent.
pub const DEFAULT_RESPONSES: [&str; 5] = [
    "Fascinating query, Commander. Let me analyze the cosmic data streams...",
    "Processing your request through my quantum neural networks...",
    "Consulting the galactic knowledge archives for optimal solutions...",
    "Interesting perspective. The stars whisper of infinite possibilities...",
    "Your wisdom resonates across the cosmic frequencies, Commander.",
];

/// Uniformly random choice over a fixed reply pool.
#[derive(Debug)]
pub struct CannedResponses {
    pool: Vec<String>,
    rng: StdRng,
}

impl CannedResponses {
    /// Creates a source over `pool`, seeded from OS entropy.
    #[must_use]
    pub fn new(pool: Vec<String>) -> Self {
        Self::with_rng(pool, StdRng::from_entropy())
    }

    /// Creates a source whose choices repeat for the same `seed`.
    #[must_use]
    pub fn with_seed(pool: Vec<String>, seed: u64) -> Self {
        Self::with_rng(pool, StdRng::seed_from_u64(seed))
    }

    fn with_rng(pool: Vec<String>, rng: StdRng) -> Self {
        Self {
            pool: sanitize_pool(pool),
            rng,
        }
    }

    #[must_use]
    pub fn pool(&self) -> &[String] {
        &self.pool
    }
}

impl Default for CannedResponses {
    fn default() -> Self {
        Self::new(default_pool())
    }
}

impl ResponseSource for CannedResponses {
    fn profile(&self) -> SourceProfile {
        SourceProfile {
            source_id: CANNED_SOURCE_ID.to_string(),
            pool_size: self.pool.len(),
        }
    }

    fn choose(&mut self) -> String {
        let index = self.rng.gen_range(0..self.pool.len());
        self.pool[index].clone()
    }
}

/// Replies handed out in order, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct ScriptedResponses {
    script: Vec<String>,
    cursor: usize,
}

impl ScriptedResponses {
    #[must_use]
    pub fn new(script: Vec<String>) -> Self {
        Self {
            script: sanitize_pool(script),
            cursor: 0,
        }
    }
}

impl ResponseSource for ScriptedResponses {
    fn profile(&self) -> SourceProfile {
        SourceProfile {
            source_id: SCRIPTED_SOURCE_ID.to_string(),
            pool_size: self.script.len(),
        }
    }

    fn choose(&mut self) -> String {
        let reply = self.script[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.script.len();
        reply
    }
}

/// Uniform sampling inside each requested range.
#[derive(Debug)]
pub struct JitterSampler {
    rng: StdRng,
}

impl JitterSampler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for JitterSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl DelaySampler for JitterSampler {
    fn sample(&mut self, range: DelayRange) -> Duration {
        if range.is_fixed() {
            return Duration::from_millis(range.start_ms());
        }

        Duration::from_millis(self.rng.gen_range(range.start_ms()..range.end_ms()))
    }
}

fn default_pool() -> Vec<String> {
    DEFAULT_RESPONSES.iter().map(|reply| reply.to_string()).collect()
}

fn sanitize_pool(pool: Vec<String>) -> Vec<String> {
    let sanitized: Vec<String> = pool
        .into_iter()
        .filter(|reply| !reply.trim().is_empty())
        .collect();

    if sanitized.is_empty() {
        return default_pool();
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pool_exposes_canned_identity() {
        let profile = CannedResponses::default().profile();

        assert_eq!(profile.source_id, CANNED_SOURCE_ID);
        assert_eq!(profile.pool_size, DEFAULT_RESPONSES.len());
    }

    #[test]
    fn choices_always_come_from_the_pool() {
        let mut source = CannedResponses::with_seed(default_pool(), 11);

        for _ in 0..64 {
            let reply = source.choose();
            assert!(DEFAULT_RESPONSES.contains(&reply.as_str()), "{reply}");
        }
    }

    #[test]
    fn same_seed_repeats_the_same_choices() {
        let mut first = CannedResponses::with_seed(default_pool(), 3);
        let mut second = CannedResponses::with_seed(default_pool(), 3);

        let a: Vec<String> = (0..10).map(|_| first.choose()).collect();
        let b: Vec<String> = (0..10).map(|_| second.choose()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn blank_pool_entries_are_dropped_and_empty_pool_falls_back() {
        let source = CannedResponses::new(vec!["  ".to_string(), "kept".to_string()]);
        assert_eq!(source.pool(), ["kept".to_string()]);

        let fallback = CannedResponses::new(vec!["\n".to_string()]);
        assert_eq!(fallback.pool().len(), DEFAULT_RESPONSES.len());
    }

    #[test]
    fn scripted_replies_cycle_in_order() {
        let mut source = ScriptedResponses::new(vec!["one".to_string(), "two".to_string()]);

        assert_eq!(source.choose(), "one");
        assert_eq!(source.choose(), "two");
        assert_eq!(source.choose(), "one");
        assert_eq!(source.profile().source_id, SCRIPTED_SOURCE_ID);
    }

    #[test]
    fn jitter_stays_inside_half_open_range() {
        let range = DelayRange::new(30, 50).expect("valid range");
        let mut sampler = JitterSampler::with_seed(5);

        for _ in 0..256 {
            let delay = sampler.sample(range);
            assert!(range.contains(delay), "{delay:?}");
        }
    }

    #[test]
    fn fixed_range_is_returned_verbatim() {
        let mut sampler = JitterSampler::with_seed(1);
        assert_eq!(
            sampler.sample(DelayRange::fixed(800)),
            Duration::from_millis(800)
        );
    }
}
