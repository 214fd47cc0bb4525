use thiserror::Error;

use crate::message::MessageId;
use crate::scheduler::TurnState;

/// Failures raised by the conversation store and the reveal scheduler.
///
/// Every variant except [`RevealError::Closed`] and [`RevealError::NoRuntime`]
/// is an invariant violation: the single-reveal guarantee was about to be
/// broken by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevealError {
    #[error("message {active} is still revealing; a second placeholder cannot be appended")]
    RevealInFlight { active: MessageId },

    #[error("message {id} is not the revealing message")]
    NotRevealing { id: MessageId },

    #[error("no message with id {id}")]
    UnknownMessage { id: MessageId },

    #[error("a turn is already in flight ({state})")]
    TurnInFlight { state: TurnState },

    #[error("reveal scheduler has been shut down")]
    Closed,

    #[error("reveal scheduler needs a running tokio runtime")]
    NoRuntime,
}

impl RevealError {
    /// Returns true for programming errors, as opposed to lifecycle outcomes.
    #[must_use]
    pub fn is_invariant_violation(&self) -> bool {
        !matches!(self, Self::Closed | Self::NoRuntime)
    }
}

/// Malformed environment configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key}: {source}")]
    InvalidRange {
        key: &'static str,
        #[source]
        source: response_source::SourceInitError,
    },
}
