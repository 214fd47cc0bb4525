#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chat_reveal::{
    ChatSession, DelayRange, DelaySampler, Message, ResponseSource, RevealConfig, SourceProfile,
};
use response_source_canned::{JitterSampler, ScriptedResponses};

pub const WELCOME: &str = "Welcome aboard.";
pub const THINK_MS: u64 = 1000;
pub const PREP_MS: u64 = 500;
pub const CHAR_MS: u64 = 30;

pub fn fixed_config() -> RevealConfig {
    RevealConfig {
        think_delay: DelayRange::fixed(THINK_MS),
        prep_delay: DelayRange::fixed(PREP_MS),
        char_delay: DelayRange::fixed(CHAR_MS),
        welcome: WELCOME.to_string(),
    }
}

/// Session with fixed delays and replies handed out in order.
pub fn scripted_session(replies: &[&str]) -> ChatSession {
    ChatSession::with_sources(
        fixed_config(),
        Box::new(ScriptedResponses::new(
            replies.iter().map(|reply| reply.to_string()).collect(),
        )),
        Box::new(JitterSampler::with_seed(0)),
    )
}

/// Virtual milliseconds from submission until a reply of `chars` characters settles.
pub fn turn_duration_ms(chars: usize) -> u64 {
    THINK_MS + PREP_MS + CHAR_MS * chars as u64
}

pub async fn advance_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

pub fn revealing_count(snapshot: &[Message]) -> usize {
    snapshot
        .iter()
        .filter(|message| message.is_revealing())
        .count()
}

/// Records every delay range the scheduler asks for.
#[derive(Clone, Default)]
pub struct RecordingSampler {
    pub requests: Arc<Mutex<Vec<DelayRange>>>,
}

impl DelaySampler for RecordingSampler {
    fn sample(&mut self, range: DelayRange) -> Duration {
        lock_unpoisoned(&self.requests).push(range);
        Duration::from_millis(range.start_ms())
    }
}

/// Counts how often a reply was chosen.
#[derive(Clone)]
pub struct CountingSource {
    pub reply: String,
    pub choices: Arc<Mutex<usize>>,
}

impl CountingSource {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            choices: Arc::new(Mutex::new(0)),
        }
    }
}

impl ResponseSource for CountingSource {
    fn profile(&self) -> SourceProfile {
        SourceProfile {
            source_id: "counting".to_string(),
            pool_size: 1,
        }
    }

    fn choose(&mut self) -> String {
        *lock_unpoisoned(&self.choices) += 1;
        self.reply.clone()
    }
}

pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
