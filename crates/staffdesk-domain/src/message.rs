//! Conversational messages and their senders.

use std::fmt;

/// The originator of a message.
///
/// `User`, `Agent` and `System` are the only producers in this system; the
/// `Other` variant exists so that any label found in a persisted log can be
/// carried through a parse/append round trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sender {
    /// The human operating the chat.
    User,
    /// The assistant.
    Agent,
    /// Application-generated notices (e.g. upload confirmations).
    System,
    /// A label read back from a log that matches none of the above.
    Other(String),
}

impl Sender {
    /// The label written into log markers.
    ///
    /// Canonical labels never contain `:`; the log marker grammar splits
    /// on the first colon after the sender.
    pub fn label(&self) -> &str {
        match self {
            Sender::User => "You",
            Sender::Agent => "Agent",
            Sender::System => "System",
            Sender::Other(s) => s,
        }
    }

    /// Parse a label back into a sender. Unknown labels are preserved.
    pub fn parse(label: &str) -> Self {
        match label {
            "You" => Sender::User,
            "Agent" => Sender::Agent,
            "System" => Sender::System,
            other => Sender::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One conversational turn.
///
/// Messages are created the instant they are sent or produced, persisted
/// immediately, and never mutated afterwards. The timestamp is stored as the
/// literal bracketed text that appears in the log (e.g. `[14:03:22]`); the
/// date is implied by the containing day-log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Who produced the message.
    pub sender: Sender,
    /// Literal bracketed wall-clock time, e.g. `[14:03:22]`.
    pub timestamp: String,
    /// Ordered content lines; re-joined with `\n` for display.
    pub content: Vec<String>,
}

impl Message {
    /// Create a message stamped with the current wall-clock time.
    pub fn now(sender: Sender, text: &str) -> Self {
        let timestamp = chrono::Local::now().format("[%H:%M:%S]").to_string();
        Self::with_timestamp(sender, timestamp, text)
    }

    /// Create a message with an explicit timestamp (used when parsing logs).
    pub fn with_timestamp(sender: Sender, timestamp: impl Into<String>, text: &str) -> Self {
        Self {
            sender,
            timestamp: timestamp.into(),
            content: text.split('\n').map(str::to_string).collect(),
        }
    }

    /// The message body with lines re-joined by `\n`.
    pub fn text(&self) -> String {
        self.content.join("\n")
    }
}
