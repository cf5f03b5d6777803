//! Chat session: foreground/background split for message handling.
//!
//! Sending a message returns control to the caller immediately; the
//! routing-and-completion work runs on a spawned worker task. The worker
//! never touches foreground state: it sends one [`ChatEvent`] over a
//! channel, and the foreground applies the reply effects as a single unit,
//! in order: append to the visible history, clear the typing status,
//! persist to the conversation log.
//!
//! There is no serialization across concurrent sends: a second message sent
//! before the first reply lands runs on its own worker, and replies may
//! arrive out of send order. There is also no cancellation of an in-flight
//! completion. Both are inherited, documented behavior.

use staffdesk_domain::traits::{CompletionBackend, DocumentSource};
use staffdesk_domain::{Message, Sender};
use staffdesk_router::IntentRouter;
use staffdesk_store::ConversationLog;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

/// An effect produced by a background worker for the foreground to apply.
#[derive(Debug)]
pub enum ChatEvent {
    /// A completed reply for a previously sent message.
    AgentReply(Message),
}

/// One conversation: router, log, and the worker-to-foreground channel.
pub struct ChatSession<L, D> {
    router: Arc<IntentRouter<L, D>>,
    log: Arc<ConversationLog>,
    events_tx: mpsc::UnboundedSender<ChatEvent>,
    events_rx: mpsc::UnboundedReceiver<ChatEvent>,
    pending: usize,
}

impl<L, D> ChatSession<L, D>
where
    L: CompletionBackend + Send + Sync + 'static,
    L::Error: std::fmt::Display + Send,
    D: DocumentSource + Send + Sync + 'static,
    D::Error: std::fmt::Display + Send,
{
    /// Create a session over a router and a conversation log.
    pub fn new(router: Arc<IntentRouter<L, D>>, log: Arc<ConversationLog>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            router,
            log,
            events_tx,
            events_rx,
            pending: 0,
        }
    }

    /// The conversation log backing this session.
    pub fn log(&self) -> &Arc<ConversationLog> {
        &self.log
    }

    /// Number of sends whose replies have not been applied yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Send a user message; returns as soon as the worker is spawned.
    ///
    /// The user message is shown via `show` and persisted before the worker
    /// starts. Log failures are logged and swallowed; persistence is
    /// best-effort and never blocks the conversation.
    pub fn send<F: FnMut(&Message)>(&mut self, text: &str, mut show: F) {
        let user_message = Message::now(Sender::User, text);
        show(&user_message);
        if let Err(e) = self.log.append(&user_message) {
            warn!("Failed to persist user message: {}", e);
        }

        self.pending += 1;
        let router = Arc::clone(&self.router);
        let events_tx = self.events_tx.clone();
        let text = text.to_string();
        tokio::spawn(async move {
            let reply = router.route(&text).await;
            // The foreground may have shut down; nothing left to notify.
            let _ = events_tx.send(ChatEvent::AgentReply(Message::now(Sender::Agent, &reply)));
        });
    }

    /// Record an application notice (e.g. an upload confirmation).
    pub fn record_system<F: FnMut(&Message)>(&self, text: &str, mut show: F) {
        let message = Message::now(Sender::System, text);
        show(&message);
        if let Err(e) = self.log.append(&message) {
            warn!("Failed to persist system message: {}", e);
        }
    }

    /// Await the next completed event.
    pub async fn next_event(&mut self) -> Option<ChatEvent> {
        self.events_rx.recv().await
    }

    /// Take a completed event without waiting, if one is queued.
    pub fn try_next_event(&mut self) -> Option<ChatEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Apply a completed reply: view append, status clear, then persist.
    pub fn apply<F: FnMut(&Message)>(&mut self, event: ChatEvent, mut show: F) {
        match event {
            ChatEvent::AgentReply(message) => {
                show(&message);
                self.pending = self.pending.saturating_sub(1);
                if let Err(e) = self.log.append(&message) {
                    warn!("Failed to persist reply: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use staffdesk_domain::{Table, UploadSlot};
    use staffdesk_llm::MockCompletion;
    use staffdesk_store::FileStore;
    use std::path::Path;

    struct StubDocuments;

    #[async_trait]
    impl DocumentSource for StubDocuments {
        type Error = String;

        async fn extract_text(&self, _path: &Path) -> Result<String, Self::Error> {
            Ok(String::new())
        }

        fn extract_tables(&self, _path: &Path) -> Result<Vec<Table>, Self::Error> {
            Ok(Vec::new())
        }
    }

    fn session_in(
        dir: &Path,
        backend: MockCompletion,
    ) -> ChatSession<MockCompletion, StubDocuments> {
        let router = IntentRouter::new(
            Arc::new(backend),
            Arc::new(StubDocuments),
            Arc::new(UploadSlot::new()),
            Arc::new(FileStore::new(dir.join("files")).unwrap()),
        );
        let log = Arc::new(ConversationLog::new(dir.join("chats")).unwrap());
        ChatSession::new(Arc::new(router), log)
    }

    #[tokio::test]
    async fn test_send_returns_before_reply_and_reply_arrives() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path(), MockCompletion::new("Hi!"));

        let mut shown = Vec::new();
        session.send("hello over there", |m| shown.push(m.clone()));

        // Control is back before the reply exists.
        assert_eq!(session.pending(), 1);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].sender, Sender::User);

        let event = session.next_event().await.unwrap();
        session.apply(event, |m| shown.push(m.clone()));

        assert_eq!(session.pending(), 0);
        assert_eq!(shown[1].sender, Sender::Agent);
        assert_eq!(shown[1].text(), "Hi!");
    }

    #[tokio::test]
    async fn test_messages_persist_in_view_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path(), MockCompletion::new("Reply"));

        session.send("first", |_| {});
        let event = session.next_event().await.unwrap();
        session.apply(event, |_| {});

        let persisted = session.log().read_recent(0).unwrap();
        assert_eq!(persisted.len(), 2);
        assert_eq!(persisted[0].sender, Sender::User);
        assert_eq!(persisted[0].text(), "first");
        assert_eq!(persisted[1].sender, Sender::Agent);
        assert_eq!(persisted[1].text(), "Reply");
    }

    #[tokio::test]
    async fn test_system_messages_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(dir.path(), MockCompletion::new("x"));

        session.record_system("File uploaded: cv.pptx", |_| {});

        let persisted = session.log().read_recent(0).unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].sender, Sender::System);
    }

    #[tokio::test]
    async fn test_concurrent_sends_both_complete() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path(), MockCompletion::new("Reply"));

        session.send("one", |_| {});
        session.send("two", |_| {});
        assert_eq!(session.pending(), 2);

        for _ in 0..2 {
            let event = session.next_event().await.unwrap();
            session.apply(event, |_| {});
        }
        assert_eq!(session.pending(), 0);

        // 2 user messages + 2 replies, with no ordering guarantee between
        // the two replies.
        assert_eq!(session.log().read_recent(0).unwrap().len(), 4);
    }
}
