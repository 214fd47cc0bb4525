use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use crate::error::RevealError;
use crate::message::{Message, MessageId, Speaker};

/// Append-only conversation log plus the id of the message being revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationStore {
    log: Vec<Message>,
    revealing: Option<MessageId>,
    next_id: u64,
    revision: u64,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            revealing: None,
            next_id: 1,
            revision: 0,
        }
    }

    /// Creates a store whose log starts with one settled agent message.
    pub fn with_welcome(text: impl Into<String>) -> Self {
        let mut store = Self::new();
        let id = store.allocate_id();
        store.log.push(Message::agent(id, text.into(), false));
        store
    }

    /// Appends a complete user message.
    ///
    /// Callers reject blank input before reaching the store.
    pub fn append_user(&mut self, text: impl Into<String>) -> Message {
        let id = self.allocate_id();
        let message = Message::user(id, text.into());
        self.log.push(message.clone());
        self.revision += 1;
        message
    }

    /// Appends an empty agent message that becomes the revealing message.
    pub fn append_agent_placeholder(&mut self) -> Result<MessageId, RevealError> {
        if let Some(active) = self.revealing {
            return Err(RevealError::RevealInFlight { active });
        }

        let id = self.allocate_id();
        self.log.push(Message::agent(id, String::new(), true));
        self.revealing = Some(id);
        self.revision += 1;
        Ok(id)
    }

    /// Appends one character to the revealing message.
    pub fn append_char(&mut self, id: MessageId, ch: char) -> Result<(), RevealError> {
        if self.revealing != Some(id) {
            return Err(self.not_revealing_error(id));
        }

        let message = self.message_mut(id)?;
        message.text.push(ch);
        self.revision += 1;
        Ok(())
    }

    /// Clears the revealing flag. Settling an already settled message is a no-op.
    pub fn settle(&mut self, id: MessageId) -> Result<(), RevealError> {
        let message = self.message_mut(id)?;
        if !message.revealing {
            return Ok(());
        }

        message.revealing = false;
        self.revealing = None;
        self.revision += 1;
        Ok(())
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.log.clone()
    }

    pub fn messages(&self) -> &[Message] {
        &self.log
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.index_of(id).map(|index| &self.log[index])
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn revealing_id(&self) -> Option<MessageId> {
        self.revealing
    }

    pub fn is_revealing(&self) -> bool {
        self.revealing.is_some()
    }

    /// Number of mutations applied since creation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn allocate_id(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }

    // Ids are allocated in append order, so the log is sorted by id.
    fn index_of(&self, id: MessageId) -> Option<usize> {
        self.log.binary_search_by_key(&id, |message| message.id).ok()
    }

    fn message_mut(&mut self, id: MessageId) -> Result<&mut Message, RevealError> {
        match self.index_of(id) {
            Some(index) => Ok(&mut self.log[index]),
            None => Err(RevealError::UnknownMessage { id }),
        }
    }

    fn not_revealing_error(&self, id: MessageId) -> RevealError {
        if self.index_of(id).is_none() {
            RevealError::UnknownMessage { id }
        } else {
            RevealError::NotRevealing { id }
        }
    }
}

/// Shared handle to one store that publishes a revision after each mutation.
///
/// Outside this crate the handle is read-only; only the session and its
/// scheduler append to or grow the log.
///
/// ```compile_fail
/// use chat_reveal::{ChatSession, RevealConfig};
///
/// let session = ChatSession::new(RevealConfig::default());
/// session
///     .conversation()
///     .mutate(|store| store.append_user("stray"));
/// ```
#[derive(Debug, Clone)]
pub struct ConversationHandle {
    store: Arc<Mutex<ConversationStore>>,
    changes: Arc<watch::Sender<u64>>,
}

impl ConversationHandle {
    pub fn new(store: ConversationStore) -> Self {
        let (changes, _) = watch::channel(store.revision());
        Self {
            store: Arc::new(Mutex::new(store)),
            changes: Arc::new(changes),
        }
    }

    /// Applies `mutation` under the store lock, then notifies subscribers if
    /// the revision moved.
    pub(crate) fn mutate<R>(&self, mutation: impl FnOnce(&mut ConversationStore) -> R) -> R {
        let (result, revision) = {
            let mut store = lock_unpoisoned(&self.store);
            let result = mutation(&mut store);
            (result, store.revision())
        };

        self.changes.send_if_modified(|published| {
            if *published == revision {
                return false;
            }
            *published = revision;
            true
        });

        result
    }

    pub fn read<R>(&self, reader: impl FnOnce(&ConversationStore) -> R) -> R {
        let store = lock_unpoisoned(&self.store);
        reader(&store)
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.read(ConversationStore::snapshot)
    }

    pub fn is_revealing(&self) -> bool {
        self.read(ConversationStore::is_revealing)
    }

    /// Returns a receiver that observes the store revision.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}

/// Counts user and agent messages; used by renderers and tests.
pub fn speaker_counts(messages: &[Message]) -> (usize, usize) {
    messages
        .iter()
        .fold((0, 0), |(users, agents), message| match message.speaker {
            Speaker::User => (users + 1, agents),
            Speaker::Agent => (users, agents + 1),
        })
}

pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    fn store_with_placeholder() -> (ConversationStore, MessageId) {
        let mut store = ConversationStore::with_welcome("welcome");
        store.append_user("hello");
        let id = store
            .append_agent_placeholder()
            .expect("no reveal is active yet");
        (store, id)
    }

    #[test]
    fn welcome_message_is_a_settled_agent_message() {
        let store = ConversationStore::with_welcome("greetings");

        assert_eq!(store.len(), 1);
        let welcome = &store.messages()[0];
        assert_eq!(welcome.speaker(), Speaker::Agent);
        assert_eq!(welcome.text(), "greetings");
        assert!(!welcome.is_revealing());
        assert!(!store.is_revealing());
    }

    #[test]
    fn append_user_keeps_text_verbatim_and_ids_increase() {
        let mut store = ConversationStore::new();
        let first = store.append_user("  padded  ");
        let second = store.append_user("next");

        assert_eq!(first.text(), "  padded  ");
        assert_eq!(first.speaker(), Speaker::User);
        assert!(!first.is_revealing());
        assert!(second.id() > first.id());
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn placeholder_is_empty_and_revealing() {
        let (store, id) = store_with_placeholder();

        let placeholder = store.get(id).expect("placeholder exists");
        assert_eq!(placeholder.text(), "");
        assert!(placeholder.is_revealing());
        assert_eq!(store.revealing_id(), Some(id));
    }

    #[test]
    fn second_placeholder_while_revealing_is_rejected() {
        let (mut store, id) = store_with_placeholder();
        let len_before = store.len();

        assert_eq!(
            store.append_agent_placeholder(),
            Err(RevealError::RevealInFlight { active: id })
        );
        assert_eq!(store.len(), len_before);
    }

    #[test]
    fn append_char_grows_only_the_revealing_message() {
        let (mut store, id) = store_with_placeholder();

        for ch in "hi!".chars() {
            store.append_char(id, ch).expect("message is revealing");
        }

        assert_eq!(store.get(id).map(Message::text), Some("hi!"));
    }

    #[test]
    fn append_char_rejects_settled_user_and_unknown_ids() {
        let (mut store, id) = store_with_placeholder();
        let user_id = store.messages()[1].id();

        assert_eq!(
            store.append_char(user_id, 'x'),
            Err(RevealError::NotRevealing { id: user_id })
        );
        assert_eq!(
            store.append_char(MessageId(99), 'x'),
            Err(RevealError::UnknownMessage { id: MessageId(99) })
        );

        store.settle(id).expect("settle revealing message");
        assert_matches!(
            store.append_char(id, 'x'),
            Err(RevealError::NotRevealing { .. })
        );
        assert_eq!(store.messages()[1].text(), "hello");
    }

    #[test]
    fn settle_twice_matches_settle_once() {
        let (mut once, id) = store_with_placeholder();
        once.append_char(id, 'a').expect("revealing");
        let mut twice = once.clone();

        once.settle(id).expect("first settle");
        twice.settle(id).expect("first settle");
        twice.settle(id).expect("second settle is a no-op");

        assert_eq!(once, twice);
        assert!(!twice.is_revealing());
    }

    #[test]
    fn settle_unknown_id_fails() {
        let mut store = ConversationStore::new();
        assert_eq!(
            store.settle(MessageId(4)),
            Err(RevealError::UnknownMessage { id: MessageId(4) })
        );
    }

    #[test]
    fn new_placeholder_is_allowed_after_settle() {
        let (mut store, id) = store_with_placeholder();
        store.settle(id).expect("settle");

        let next = store
            .append_agent_placeholder()
            .expect("previous reveal settled");
        assert!(next > id);
        assert_eq!(speaker_counts(store.messages()), (1, 3));
    }

    #[test]
    fn handle_publishes_revision_only_when_store_changes() {
        let handle = ConversationHandle::new(ConversationStore::with_welcome("hi"));
        let mut changes = handle.subscribe();
        assert!(!changes.has_changed().expect("sender alive"));

        handle.mutate(|store| store.settle(MessageId(1))).expect("no-op settle");
        assert!(!changes.has_changed().expect("sender alive"));

        handle.mutate(|store| store.append_user("ping"));
        assert!(changes.has_changed().expect("sender alive"));
        assert_eq!(*changes.borrow_and_update(), 1);
        assert_eq!(handle.snapshot().len(), 2);
    }

    #[test]
    fn messages_serialize_with_lowercase_speakers() {
        let mut store = ConversationStore::new();
        store.append_user("ping");

        let json = serde_json::to_value(store.snapshot()).expect("serialize snapshot");
        assert_eq!(json[0]["speaker"], "user");
        assert_eq!(json[0]["text"], "ping");
        assert_eq!(json[0]["id"], 1);
        assert_eq!(json[0]["revealing"], false);
        assert!(json[0]["created_at"].is_string());
    }
}
