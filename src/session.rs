use response_source::{DelaySampler, ResponseSource, SourceProfile};
use response_source_canned::{CannedResponses, JitterSampler};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::debug;

use crate::config::RevealConfig;
use crate::error::RevealError;
use crate::message::{Message, MessageId};
use crate::scheduler::{RevealScheduler, TurnState};
use crate::store::{ConversationHandle, ConversationStore};

/// Result of a boundary-layer submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The user message was appended and a turn started.
    Accepted(MessageId),
    /// The text was empty or whitespace only.
    RejectedBlank,
    /// A turn is still thinking, composing or revealing.
    RejectedBusy,
}

impl SubmitOutcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// One conversation: the store plus the scheduler that answers into it.
pub struct ChatSession {
    conversation: ConversationHandle,
    scheduler: RevealScheduler,
}

impl ChatSession {
    /// Creates a session seeded with the configured welcome message and the
    /// built-in canned agent.
    pub fn new(config: RevealConfig) -> Self {
        Self::with_sources(
            config,
            Box::new(CannedResponses::default()),
            Box::new(JitterSampler::default()),
        )
    }

    pub fn with_sources(
        config: RevealConfig,
        responses: Box<dyn ResponseSource>,
        delays: Box<dyn DelaySampler>,
    ) -> Self {
        let conversation = ConversationHandle::new(ConversationStore::with_welcome(
            config.welcome.clone(),
        ));
        let scheduler = RevealScheduler::new(conversation.clone(), config, responses, delays);

        Self {
            conversation,
            scheduler,
        }
    }

    /// Appends a user message and starts the agent's reply.
    ///
    /// Blank text and submissions during an active turn are ignored. Errors
    /// are reserved for a torn-down session, a caller outside a tokio runtime
    /// and invariant violations. Neither lifecycle error appends anything.
    pub fn submit(&self, text: &str) -> Result<SubmitOutcome, RevealError> {
        if text.trim().is_empty() {
            return Ok(SubmitOutcome::RejectedBlank);
        }

        if self.scheduler.is_closed() {
            return Err(RevealError::Closed);
        }

        if self.input_disabled() {
            debug!("submission ignored while a turn is in flight");
            return Ok(SubmitOutcome::RejectedBusy);
        }

        // The reply needs a runtime to spawn on; check before the log grows.
        Handle::try_current().map_err(|_| RevealError::NoRuntime)?;

        let message = self.conversation.mutate(|store| store.append_user(text));
        self.scheduler.start_turn()?;

        Ok(SubmitOutcome::Accepted(message.id()))
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.conversation.snapshot()
    }

    /// True from an accepted submission until its reply settles, and after teardown.
    pub fn input_disabled(&self) -> bool {
        self.scheduler.is_closed() || self.scheduler.state().is_busy()
    }

    pub fn turn_state(&self) -> TurnState {
        self.scheduler.state()
    }

    /// Returns a receiver that changes whenever the conversation log does.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.conversation.subscribe()
    }

    pub fn conversation(&self) -> &ConversationHandle {
        &self.conversation
    }

    pub fn config(&self) -> &RevealConfig {
        self.scheduler.config()
    }

    pub fn source_profile(&self) -> SourceProfile {
        self.scheduler.source_profile()
    }

    pub fn last_fault(&self) -> Option<RevealError> {
        self.scheduler.last_fault()
    }

    /// Cancels the in-flight turn; the session accepts no further input.
    pub fn teardown(&self) {
        self.scheduler.shutdown();
    }
}
