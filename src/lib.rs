//! Message lifecycle and incremental-reveal engine for conversational consoles.
//!
//! Invariant: at most one message in the conversation log is revealing at any
//! instant, and only the [`RevealScheduler`] grows or settles it.
//!
//! # Public API Overview
//! - Drive a conversation through [`ChatSession`]: `submit`, `snapshot`,
//!   `input_disabled`, `subscribe`, `teardown`.
//! - Inspect or embed the append-only log via [`ConversationStore`] and the
//!   shared [`ConversationHandle`].
//! - Tune timing with [`RevealConfig`] or load it from the environment with
//!   [`EnvConfig`].
//! - Swap the simulated agent through the `response_source` contract
//!   ([`ResponseSource`], [`DelaySampler`]).
//!
//! The scheduler runs its turns as tokio tasks; hosts are expected to drive a
//! current-thread runtime so every store mutation happens on one control
//! thread.

pub mod config;
pub mod error;
pub mod logging;
pub mod message;
pub mod scheduler;
pub mod session;
pub mod store;

pub use crate::config::{EnvConfig, RevealConfig, DEFAULT_WELCOME};
pub use crate::error::{ConfigError, RevealError};
pub use crate::message::{Message, MessageId, Speaker};
pub use crate::scheduler::{RevealScheduler, TurnId, TurnState};
pub use crate::session::{ChatSession, SubmitOutcome};
pub use crate::store::{speaker_counts, ConversationHandle, ConversationStore};

pub use response_source::{DelayRange, DelaySampler, ResponseSource, SourceProfile};
