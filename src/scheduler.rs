use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use response_source::{DelayRange, DelaySampler, ResponseSource, SourceProfile};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

use crate::config::RevealConfig;
use crate::error::RevealError;
use crate::message::MessageId;
use crate::store::{lock_unpoisoned, ConversationHandle, ConversationStore};

/// Identifier for one user turn.
pub type TurnId = u64;

/// Phase of the current (or most recent) turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Thinking { turn: TurnId },
    Composing { turn: TurnId, message: MessageId },
    Revealing { turn: TurnId, message: MessageId },
    Settled { turn: TurnId, message: MessageId },
}

impl TurnState {
    /// Returns true while a turn holds the conversation.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            Self::Thinking { .. } | Self::Composing { .. } | Self::Revealing { .. }
        )
    }

    #[must_use]
    pub fn turn(&self) -> Option<TurnId> {
        match self {
            Self::Idle => None,
            Self::Thinking { turn }
            | Self::Composing { turn, .. }
            | Self::Revealing { turn, .. }
            | Self::Settled { turn, .. } => Some(*turn),
        }
    }

    /// Returns the agent message targeted by the turn once it exists.
    #[must_use]
    pub fn message(&self) -> Option<MessageId> {
        match self {
            Self::Idle | Self::Thinking { .. } => None,
            Self::Composing { message, .. }
            | Self::Revealing { message, .. }
            | Self::Settled { message, .. } => Some(*message),
        }
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Thinking { turn } => write!(f, "turn {turn} thinking"),
            Self::Composing { turn, message } => write!(f, "turn {turn} composing {message}"),
            Self::Revealing { turn, message } => write!(f, "turn {turn} revealing {message}"),
            Self::Settled { turn, message } => write!(f, "turn {turn} settled {message}"),
        }
    }
}

struct ActiveTurn {
    turn: TurnId,
    cancel: CancellationToken,
    join_handle: Option<JoinHandle<()>>,
}

enum TurnOutcome {
    Settled(MessageId),
    Cancelled,
}

struct Shared {
    conversation: ConversationHandle,
    config: RevealConfig,
    responses: Mutex<Box<dyn ResponseSource>>,
    delays: Mutex<Box<dyn DelaySampler>>,
    state: Mutex<TurnState>,
    active: Mutex<Option<ActiveTurn>>,
    fault: Mutex<Option<RevealError>>,
}

impl Shared {
    fn sample(&self, range: DelayRange) -> Duration {
        lock_unpoisoned(&self.delays).sample(range)
    }

    fn choose(&self) -> String {
        lock_unpoisoned(&self.responses).choose()
    }

    fn state(&self) -> TurnState {
        *lock_unpoisoned(&self.state)
    }

    fn transition(&self, turn: TurnId, next: TurnState) {
        let mut state = lock_unpoisoned(&self.state);
        if state.turn() == Some(turn) {
            *state = next;
        }
    }

    /// Mutates the store unless the turn was cancelled.
    ///
    /// The cancellation check happens under the store lock, so once
    /// `shutdown` has cancelled the token and passed the lock no mutation
    /// from this turn can land.
    fn apply<R>(
        &self,
        cancel: &CancellationToken,
        mutation: impl FnOnce(&mut ConversationStore) -> Result<R, RevealError>,
    ) -> Result<Option<R>, RevealError> {
        self.conversation.mutate(|store| {
            if cancel.is_cancelled() {
                return Ok(None);
            }
            mutation(store).map(Some)
        })
    }

    fn clear_active_turn_if_matching(&self, turn: TurnId) {
        let mut active = lock_unpoisoned(&self.active);
        if active.as_ref().map(|active| active.turn) == Some(turn) {
            // Dropping the handle detaches the task, which is finishing anyway.
            active.take();
        }
    }
}

/// Owns the timers of the single in-flight turn and drives its reveal.
pub struct RevealScheduler {
    shared: Arc<Shared>,
    next_turn_id: AtomicU64,
    closed: AtomicBool,
}

impl RevealScheduler {
    pub fn new(
        conversation: ConversationHandle,
        config: RevealConfig,
        responses: Box<dyn ResponseSource>,
        delays: Box<dyn DelaySampler>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                conversation,
                config,
                responses: Mutex::new(responses),
                delays: Mutex::new(delays),
                state: Mutex::new(TurnState::Idle),
                active: Mutex::new(None),
                fault: Mutex::new(None),
            }),
            next_turn_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        }
    }

    /// Starts the response pipeline for one user turn.
    ///
    /// Must be called from within a tokio runtime. Starting while another
    /// turn is thinking, composing or revealing is a programming error and
    /// fails with [`RevealError::TurnInFlight`] rather than queueing.
    pub fn start_turn(&self) -> Result<TurnId, RevealError> {
        if self.is_closed() {
            return Err(RevealError::Closed);
        }

        let runtime = Handle::try_current().map_err(|_| RevealError::NoRuntime)?;
        let mut active = lock_unpoisoned(&self.shared.active);

        let turn = {
            let mut state = lock_unpoisoned(&self.shared.state);
            if state.is_busy() {
                let error = RevealError::TurnInFlight { state: *state };
                error!(%error, "overlapping turn rejected");
                return Err(error);
            }

            let turn = self.next_turn_id.fetch_add(1, Ordering::SeqCst);
            *state = TurnState::Thinking { turn };
            turn
        };

        let cancel = CancellationToken::new();
        let join_handle = runtime.spawn(run_turn(
            Arc::clone(&self.shared),
            turn,
            cancel.clone(),
        ));

        *active = Some(ActiveTurn {
            turn,
            cancel,
            join_handle: Some(join_handle),
        });

        debug!(turn, "turn started");
        Ok(turn)
    }

    /// Cancels every pending timer of the active turn and refuses new turns.
    ///
    /// No store mutation from this scheduler happens after this returns.
    pub fn shutdown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        let active = lock_unpoisoned(&self.shared.active).take();
        if let Some(mut active) = active {
            active.cancel.cancel();
            if let Some(join_handle) = active.join_handle.take() {
                join_handle.abort();
            }
            debug!(turn = active.turn, "turn cancelled by shutdown");
        }

        // Wait out a mutation that may be holding the store lock right now.
        self.shared.conversation.read(|_| ());
        *lock_unpoisoned(&self.shared.state) = TurnState::Idle;
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> TurnState {
        self.shared.state()
    }

    pub fn config(&self) -> &RevealConfig {
        &self.shared.config
    }

    pub fn source_profile(&self) -> SourceProfile {
        lock_unpoisoned(&self.shared.responses).profile()
    }

    /// Returns the invariant violation that aborted the most recent faulted turn.
    pub fn last_fault(&self) -> Option<RevealError> {
        lock_unpoisoned(&self.shared.fault).clone()
    }
}

impl Drop for RevealScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_turn(shared: Arc<Shared>, turn: TurnId, cancel: CancellationToken) {
    match reveal(&shared, turn, &cancel).await {
        Ok(TurnOutcome::Settled(message)) => {
            debug!(turn, %message, "turn settled");
        }
        Ok(TurnOutcome::Cancelled) => {
            debug!(turn, "turn stopped after cancellation");
        }
        Err(fault) => {
            error!(turn, error = %fault, "reveal turn faulted");
            *lock_unpoisoned(&shared.fault) = Some(fault);
            shared.transition(turn, TurnState::Idle);
        }
    }

    shared.clear_active_turn_if_matching(turn);
}

async fn reveal(
    shared: &Shared,
    turn: TurnId,
    cancel: &CancellationToken,
) -> Result<TurnOutcome, RevealError> {
    let think = shared.sample(shared.config.think_delay);
    debug!(turn, ?think, "thinking");
    if !pause(cancel, think).await {
        return Ok(TurnOutcome::Cancelled);
    }

    let placeholder = shared.apply(cancel, |store| {
        let message = store.append_agent_placeholder()?;
        shared.transition(turn, TurnState::Composing { turn, message });
        Ok(message)
    })?;
    let Some(message) = placeholder else {
        return Ok(TurnOutcome::Cancelled);
    };

    let prep = shared.sample(shared.config.prep_delay);
    debug!(turn, %message, ?prep, "composing");
    if !pause(cancel, prep).await {
        return Ok(TurnOutcome::Cancelled);
    }

    let reply = shared.choose();
    shared.transition(turn, TurnState::Revealing { turn, message });
    debug!(turn, %message, chars = reply.chars().count(), "revealing");

    for ch in reply.chars() {
        let delay = shared.sample(shared.config.char_delay);
        if !pause(cancel, delay).await {
            return Ok(TurnOutcome::Cancelled);
        }

        if shared
            .apply(cancel, |store| store.append_char(message, ch))?
            .is_none()
        {
            return Ok(TurnOutcome::Cancelled);
        }
        trace!(turn, %message, ?ch, "revealed character");
    }

    let settled = shared.apply(cancel, |store| {
        store.settle(message)?;
        shared.transition(turn, TurnState::Settled { turn, message });
        Ok(())
    })?;

    match settled {
        Some(()) => Ok(TurnOutcome::Settled(message)),
        None => Ok(TurnOutcome::Cancelled),
    }
}

/// Sleeps for `delay`; returns false when `cancel` fires first.
async fn pause(cancel: &CancellationToken, delay: Duration) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}
