//! Incremental transcript printing.
//!
//! The conversation log is append-only and only its revealing message grows,
//! so the printer remembers how far it got and emits just the new suffix.

use chat_reveal::{Message, MessageId, Speaker};

use crate::header::format_clock;
use crate::style::{bold, cyan, dim, magenta, ERASE_PREVIOUS_COLUMN};

/// Trailing cursor drawn after a revealing message; never part of the text.
pub const REVEAL_CURSOR: char = '▮';

pub const AGENT_LABEL: &str = "GALXIUM";
pub const USER_LABEL: &str = "COMMANDER";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenMessage {
    id: MessageId,
    printed_chars: usize,
    cursor_shown: bool,
}

#[derive(Debug, Default)]
pub struct TranscriptPrinter {
    next_index: usize,
    open: Option<OpenMessage>,
}

impl TranscriptPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a revealing message is printed without its line ending.
    pub fn line_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn printed_messages(&self) -> usize {
        self.next_index
    }

    /// Ends an open revealing line, erasing its cursor.
    ///
    /// The message is not marked printed: the next `render` starts it again
    /// from its speaker prefix, so output written in between does not leave
    /// the reply continuing on an unlabelled line.
    pub fn break_line(&mut self) -> String {
        match self.open.take() {
            Some(open) if open.cursor_shown => format!("{ERASE_PREVIOUS_COLUMN}\n"),
            Some(_) => "\n".to_string(),
            None => String::new(),
        }
    }

    /// Returns the terminal output that brings the screen up to `snapshot`.
    pub fn render(&mut self, snapshot: &[Message]) -> String {
        let mut out = String::new();

        while let Some(message) = snapshot.get(self.next_index) {
            let printed_chars = match self.open.take() {
                Some(open) if open.id == message.id() => {
                    if open.cursor_shown {
                        out.push_str(ERASE_PREVIOUS_COLUMN);
                    }
                    open.printed_chars
                }
                _ => {
                    out.push_str(&message_prefix(message));
                    0
                }
            };

            let text = message.text();
            let new_chars: String = text.chars().skip(printed_chars).collect();
            out.push_str(&new_chars);

            if message.is_revealing() {
                out.push(REVEAL_CURSOR);
                self.open = Some(OpenMessage {
                    id: message.id(),
                    printed_chars: text.chars().count(),
                    cursor_shown: true,
                });
                break;
            }

            out.push('\n');
            self.next_index += 1;
        }

        out
    }
}

fn message_prefix(message: &Message) -> String {
    let label = match message.speaker() {
        Speaker::Agent => bold(&cyan(AGENT_LABEL)),
        Speaker::User => bold(&magenta(USER_LABEL)),
    };
    format!(
        "{} {label} {} ",
        dim(&format!("[{}]", format_clock(message.created_at()))),
        dim("›"),
    )
}
