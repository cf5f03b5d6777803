//! Append-only conversation day-logs.
//!
//! One file per calendar day, `chat_log_<YYYYMMDD>.txt`. Every message is
//! wrapped in a begin marker carrying sender and timestamp, its content
//! lines verbatim, and an end marker carrying the sender again:
//!
//! ```text
//! <BEGIN:You:[14:03:22]>
//! first content line
//! second content line
//! <END:You>
//! ```
//!
//! Reading concatenates all day files in filename-sorted (chronological)
//! order and parses forward; physical line order within a file defines
//! message order. A message whose end marker is missing at end-of-input
//! (crash mid-write) is still recovered.

use crate::StoreError;
use staffdesk_domain::{Message, Sender};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Append-only, per-day conversation log.
///
/// The file is opened, appended and closed per message; no handle is held
/// across messages. Appends within this process are serialized by an
/// internal lock. Appenders in *other* processes are not synchronized and
/// can interleave at the line level (known limitation).
pub struct ConversationLog {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl ConversationLog {
    /// Open (creating if needed) a log rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// The directory holding the day files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Append one message to today's file.
    ///
    /// The begin marker, content lines and end marker are written as a
    /// single buffered write so a failure cannot leave a marker without its
    /// message body on a previously healthy file.
    pub fn append(&self, message: &Message) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let file_name = format!("chat_log_{}.txt", chrono::Local::now().format("%Y%m%d"));
        let path = self.dir.join(file_name);

        let mut record = String::new();
        record.push_str(&format!(
            "<BEGIN:{}:{}>\n",
            message.sender.label(),
            message.timestamp
        ));
        for line in &message.content {
            record.push_str(line);
            record.push('\n');
        }
        record.push_str(&format!("<END:{}>\n", message.sender.label()));

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(record.as_bytes())?;
        debug!("Appended {} message to {}", message.sender, path.display());
        Ok(())
    }

    /// Read back the last `limit` messages across all day files.
    ///
    /// `limit == 0` means unlimited. Messages come back in conversation
    /// order (filename-sorted files, physical line order within a file).
    pub fn read_recent(&self, limit: usize) -> Result<Vec<Message>, StoreError> {
        let mut messages = self.read_all()?;
        if limit > 0 && messages.len() > limit {
            messages.drain(..messages.len() - limit);
        }
        Ok(messages)
    }

    /// Parse every day file into the full message sequence.
    ///
    /// Parser state deliberately spans file boundaries: the files are
    /// treated as one concatenated stream, so an unterminated message at
    /// the end of the stream is recovered exactly once.
    fn read_all(&self) -> Result<Vec<Message>, StoreError> {
        let mut names: Vec<String> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with("chat_log_") && name.ends_with(".txt"))
            .collect();
        names.sort();

        let mut parser = LogParser::default();
        for name in names {
            let contents = fs::read_to_string(self.dir.join(&name))?;
            for line in contents.lines() {
                parser.feed(line.trim_end_matches('\r'));
            }
        }
        Ok(parser.finish())
    }
}

/// Forward scanner over log lines.
///
/// Three line classes: begin marker, end marker, plain content. One pending
/// message accumulates between markers; lines outside an open message are
/// silently dropped.
#[derive(Default)]
struct LogParser {
    messages: Vec<Message>,
    pending: Option<Pending>,
}

struct Pending {
    label: String,
    timestamp: String,
    content: Vec<String>,
}

impl LogParser {
    fn feed(&mut self, line: &str) {
        if let Some((label, timestamp)) = parse_begin_marker(line) {
            // A new begin marker closes any message still open.
            self.close_pending();
            self.pending = Some(Pending {
                label: label.to_string(),
                timestamp: timestamp.to_string(),
                content: Vec::new(),
            });
            return;
        }

        if let Some(label) = parse_end_marker(line) {
            // Only the matching sender's end marker closes the message;
            // any other end marker inside an open message is content, and
            // one outside any message is dropped.
            let closes = self.pending.as_ref().is_some_and(|p| p.label == label);
            if closes {
                self.close_pending();
            } else if let Some(pending) = &mut self.pending {
                pending.content.push(line.to_string());
            }
            return;
        }

        if let Some(pending) = &mut self.pending {
            pending.content.push(line.to_string());
        }
    }

    /// Emit everything, recovering a message left open at end-of-input.
    fn finish(mut self) -> Vec<Message> {
        self.close_pending();
        self.messages
    }

    fn close_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.messages.push(Message {
                sender: Sender::parse(&pending.label),
                timestamp: pending.timestamp,
                content: pending.content,
            });
        }
    }
}

/// Parse `<BEGIN:{sender}:{timestamp}>` into (sender, timestamp).
///
/// The sender may not contain `:`; everything after the first colon is the
/// literal timestamp text. A begin marker without a timestamp part yields
/// an empty timestamp.
fn parse_begin_marker(line: &str) -> Option<(&str, &str)> {
    let inner = line.strip_prefix("<BEGIN:")?.strip_suffix('>')?;
    match inner.split_once(':') {
        Some((label, timestamp)) => Some((label, timestamp)),
        None => Some((inner, "")),
    }
}

/// Parse `<END:{sender}>` into the sender label.
fn parse_end_marker(line: &str) -> Option<&str> {
    line.strip_prefix("<END:")?.strip_suffix('>')
}
