use std::fmt;

use serde::Serialize;
use time::OffsetDateTime;

/// Store-assigned message identifier; later messages always carry larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Agent,
}

/// One entry of the conversation log.
///
/// Fields are read-only outside the crate; only the store mutates messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub(crate) id: MessageId,
    pub(crate) speaker: Speaker,
    pub(crate) text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) created_at: OffsetDateTime,
    pub(crate) revealing: bool,
}

impl Message {
    pub(crate) fn user(id: MessageId, text: String) -> Self {
        Self {
            id,
            speaker: Speaker::User,
            text,
            created_at: OffsetDateTime::now_utc(),
            revealing: false,
        }
    }

    pub(crate) fn agent(id: MessageId, text: String, revealing: bool) -> Self {
        Self {
            id,
            speaker: Speaker::Agent,
            text,
            created_at: OffsetDateTime::now_utc(),
            revealing,
        }
    }

    #[must_use]
    pub fn id(&self) -> MessageId {
        self.id
    }

    #[must_use]
    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    #[must_use]
    pub fn is_revealing(&self) -> bool {
        self.revealing
    }
}
