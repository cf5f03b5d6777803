//! Output formatting for the chat shell.

use colored::*;
use staffdesk_domain::{Message, Sender};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Render one conversation message with its sender label and timestamp.
    pub fn message(&self, message: &Message) -> String {
        let label = message.sender.label();
        let header = if self.color_enabled {
            let colored_label = match message.sender {
                Sender::User => label.cyan().bold(),
                Sender::Agent => label.green().bold(),
                Sender::System => label.yellow().bold(),
                Sender::Other(_) => label.normal().bold(),
            };
            format!("{} {}", colored_label, message.timestamp.dimmed())
        } else {
            format!("{} {}", label, message.timestamp)
        };

        format!("{}\n{}", header, message.text())
    }

    /// Format a transient status line (e.g. the typing indicator).
    pub fn status(&self, text: &str) -> String {
        if self.color_enabled {
            text.dimmed().italic().to_string()
        } else {
            text.to_string()
        }
    }

    /// Format an info message.
    pub fn info(&self, text: &str) -> String {
        self.colorize(text, "blue")
    }

    /// Format an error message.
    pub fn error(&self, text: &str) -> String {
        self.colorize(text, "red")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
