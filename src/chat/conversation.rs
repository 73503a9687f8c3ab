//! Conversation: append-only message log with a simulated worker reply.
//!
//! Every accepted customer message schedules exactly one canned reply after
//! a fixed delay. The reply runs as a tokio task owned by the conversation.
//! [`Conversation::close`] is the teardown to use: it marks the shared log
//! closed under its lock and aborts the tasks, so no reply lands afterwards.
//! Dropping without closing is best effort. It raises a cancellation flag that
//! reply tasks check under the lock and again before broadcasting, so a task
//! that has not yet taken the lock never appends.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::attachment::Attachment;
use crate::clock::Clock;
use crate::config::AppConfig;

use super::model::{ChatEvent, IMAGE_PLACEHOLDER, Message, MessageKind, Sender};

/// Broadcast channel capacity for chat events.
const EVENT_CAPACITY: usize = 64;

/// Shared log state, mutated by both the owner and reply tasks.
#[derive(Debug, Default)]
struct ChatLog {
    messages: Vec<Message>,
    next_id: u64,
    pending_replies: usize,
    closed: bool,
}

impl ChatLog {
    fn append(
        &mut self,
        sender: Sender,
        content: String,
        kind: MessageKind,
        image: Option<Attachment>,
        timestamp: DateTime<Utc>,
    ) -> Message {
        self.next_id += 1;
        let message = Message {
            id: self.next_id,
            content,
            sender,
            timestamp,
            kind,
            image,
        };
        self.messages.push(message.clone());
        message
    }
}

/// State owned by an open chat modal with one worker.
pub struct Conversation {
    worker_id: String,
    worker_name: String,
    reply_delay: Duration,
    canned_reply: String,
    clock: Arc<dyn Clock>,
    log: Arc<RwLock<ChatLog>>,
    /// Raised on close or drop; checked by reply tasks under the log lock.
    cancelled: Arc<AtomicBool>,
    tx: broadcast::Sender<ChatEvent>,
    replies: Vec<JoinHandle<()>>,
    draft: String,
    pending_image: Option<Attachment>,
}

impl Conversation {
    pub fn new(
        worker_id: impl Into<String>,
        worker_name: impl Into<String>,
        config: &AppConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_CAPACITY);
        Self {
            worker_id: worker_id.into(),
            worker_name: worker_name.into(),
            reply_delay: config.reply_delay,
            canned_reply: config.canned_reply.clone(),
            clock,
            log: Arc::new(RwLock::new(ChatLog::default())),
            cancelled: Arc::new(AtomicBool::new(false)),
            tx,
            replies: Vec::new(),
            draft: String::new(),
            pending_image: None,
        }
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    pub fn worker_name(&self) -> &str {
        &self.worker_name
    }

    /// Subscribe to appended messages and typing changes.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.tx.subscribe()
    }

    /// Preload earlier messages (e.g. fixture history) without scheduling
    /// replies.
    pub async fn seed(&self, sender: Sender, content: &str, timestamp: DateTime<Utc>) {
        let mut log = self.log.write().await;
        if log.closed {
            return;
        }
        log.append(
            sender,
            content.to_string(),
            MessageKind::Text,
            None,
            timestamp,
        );
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn pending_image(&self) -> Option<&Attachment> {
        self.pending_image.as_ref()
    }

    /// Attach an image to the next message, replacing any pending one.
    pub fn attach_image(&mut self, image: Attachment) {
        self.pending_image = Some(image);
    }

    pub fn remove_image(&mut self) {
        self.pending_image = None;
    }

    /// Send the pending draft and image.
    pub async fn send_draft(&mut self) -> Option<Message> {
        let content = std::mem::take(&mut self.draft);
        let image = self.pending_image.take();
        self.send(&content, image).await
    }

    /// Append a customer message and schedule the worker's reply.
    ///
    /// Returns `None` without touching the log when there is neither text
    /// nor an image, or when the conversation is closed.
    pub async fn send(&mut self, content: &str, image: Option<Attachment>) -> Option<Message> {
        let text = content.trim();
        if text.is_empty() && image.is_none() {
            debug!(worker_id = %self.worker_id, "Empty message ignored");
            return None;
        }

        let content = if text.is_empty() {
            IMAGE_PLACEHOLDER.to_string()
        } else {
            text.to_string()
        };
        let kind = if image.is_some() {
            MessageKind::Image
        } else {
            MessageKind::Text
        };

        let message = {
            let mut log = self.log.write().await;
            if log.closed {
                debug!(worker_id = %self.worker_id, "Send ignored on closed conversation");
                return None;
            }
            let message = log.append(Sender::Customer, content, kind, image, self.clock.now());
            log.pending_replies += 1;
            message
        };

        self.draft.clear();
        self.pending_image = None;

        info!(
            worker_id = %self.worker_id,
            message_id = message.id,
            kind = ?message.kind,
            "Customer message sent"
        );
        let _ = self.tx.send(ChatEvent::MessageAppended {
            message: message.clone(),
        });
        let _ = self.tx.send(ChatEvent::Typing { active: true });

        self.replies.retain(|handle| !handle.is_finished());
        self.replies.push(self.spawn_reply());

        Some(message)
    }

    fn spawn_reply(&self) -> JoinHandle<()> {
        let log = Arc::clone(&self.log);
        let cancelled = Arc::clone(&self.cancelled);
        let clock = Arc::clone(&self.clock);
        let tx = self.tx.clone();
        let delay = self.reply_delay;
        let reply = self.canned_reply.clone();
        let worker_id = self.worker_id.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let (message, still_typing) = {
                let mut log = log.write().await;
                if log.closed || cancelled.load(Ordering::Acquire) {
                    return;
                }
                log.pending_replies = log.pending_replies.saturating_sub(1);
                let message = log.append(Sender::Worker, reply, MessageKind::Text, None, clock.now());
                (message, log.pending_replies > 0)
            };

            debug!(worker_id = %worker_id, message_id = message.id, "Simulated reply appended");
            if cancelled.load(Ordering::Acquire) {
                return;
            }
            let _ = tx.send(ChatEvent::MessageAppended { message });
            if !still_typing {
                let _ = tx.send(ChatEvent::Typing { active: false });
            }
        })
    }

    /// Whether a simulated reply is pending.
    pub async fn is_typing(&self) -> bool {
        let log = self.log.read().await;
        !log.closed && log.pending_replies > 0
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.log.read().await.messages.clone()
    }

    pub async fn len(&self) -> usize {
        self.log.read().await.messages.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.log.read().await.messages.is_empty()
    }

    pub async fn is_closed(&self) -> bool {
        self.log.read().await.closed
    }

    /// Tear down: cancel pending replies and refuse further appends.
    pub async fn close(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        {
            let mut log = self.log.write().await;
            if log.closed {
                return;
            }
            log.closed = true;
            log.pending_replies = 0;
        }
        let cancelled = self.abort_replies();
        self.draft.clear();
        self.pending_image = None;
        info!(worker_id = %self.worker_id, cancelled, "Conversation closed");
        let _ = self.tx.send(ChatEvent::Closed);
    }

    fn abort_replies(&mut self) -> usize {
        let mut cancelled = 0;
        for handle in self.replies.drain(..) {
            if !handle.is_finished() {
                cancelled += 1;
            }
            handle.abort();
        }
        cancelled
    }
}

impl Drop for Conversation {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        if let Ok(mut log) = self.log.try_write() {
            log.closed = true;
        }
        self.abort_replies();
    }
}

impl std::fmt::Debug for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("worker_id", &self.worker_id)
            .field("worker_name", &self.worker_name)
            .field("reply_delay", &self.reply_delay)
            .field("pending_tasks", &self.replies.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;

    fn conversation() -> Conversation {
        Conversation::new(
            "1",
            "John Smith",
            &AppConfig::default(),
            Arc::new(SystemClock::new()),
        )
    }

    async fn wait_past_reply() {
        tokio::time::sleep(Duration::from_secs(3)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn empty_send_is_ignored() {
        let mut chat = conversation();
        assert!(chat.send("", None).await.is_none());
        assert!(chat.send("   \n", None).await.is_none());
        assert!(chat.is_empty().await);
        assert!(!chat.is_typing().await);
    }

    #[tokio::test(start_paused = true)]
    async fn send_then_one_reply_after_delay() {
        let mut chat = conversation();
        let sent = chat.send("hello", None).await.unwrap();
        assert_eq!(sent.sender, Sender::Customer);
        assert_eq!(sent.content, "hello");
        assert_eq!(chat.len().await, 1);
        assert!(chat.is_typing().await);

        tokio::time::sleep(Duration::from_millis(1_900)).await;
        assert_eq!(chat.len().await, 1, "reply not before the delay");

        wait_past_reply().await;
        let messages = chat.messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, sent.id);
        assert_eq!(messages[1].sender, Sender::Worker);
        assert_eq!(messages[1].content, crate::config::DEFAULT_CANNED_REPLY);
        assert!(messages[1].id > messages[0].id);
        assert!(!chat.is_typing().await);

        wait_past_reply().await;
        assert_eq!(chat.len().await, 2, "exactly one reply per send");
    }

    #[tokio::test(start_paused = true)]
    async fn close_before_delay_cancels_reply() {
        let mut chat = conversation();
        chat.send("hello", None).await.unwrap();
        let before = chat.len().await;

        chat.close().await;
        wait_past_reply().await;

        assert_eq!(chat.len().await, before);
        assert!(chat.is_closed().await);
        assert!(!chat.is_typing().await);
        assert!(chat.send("again", None).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_before_delay_cancels_reply() {
        let mut chat = conversation();
        chat.send("hello", None).await.unwrap();
        let log = Arc::clone(&chat.log);

        drop(chat);
        wait_past_reply().await;

        assert_eq!(log.read().await.messages.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_under_lock_contention_still_cancels_reply() {
        let chat = conversation();
        let log = Arc::clone(&chat.log);
        let mut rx = chat.subscribe();
        // Not tracked in `replies`, so drop cannot abort it
        let reply = chat.spawn_reply();

        {
            let _busy = log.read().await;
            drop(chat);
        }
        assert!(!log.read().await.closed, "try_write failed while the lock was held");

        wait_past_reply().await;
        assert!(reply.is_finished());
        assert!(log.read().await.messages.is_empty());
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn image_only_message() {
        let mut chat = conversation();
        let photo = Attachment::from_name("outlet.jpg", 2048);
        chat.attach_image(photo.clone());
        chat.set_draft("   ");

        let sent = chat.send_draft().await.unwrap();
        assert_eq!(sent.content, IMAGE_PLACEHOLDER);
        assert_eq!(sent.kind, MessageKind::Image);
        assert_eq!(sent.image, Some(photo));
        assert!(chat.pending_image().is_none());
        assert!(chat.draft().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn send_clears_draft_and_image() {
        let mut chat = conversation();
        chat.set_draft("Can you come Tuesday?");
        chat.attach_image(Attachment::from_name("kitchen.png", 10));
        let sent = chat.send_draft().await.unwrap();
        assert_eq!(sent.kind, MessageKind::Image);
        assert_eq!(sent.content, "Can you come Tuesday?");
        assert!(chat.draft().is_empty());
        assert!(chat.pending_image().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn replies_follow_their_messages_in_order() {
        let mut chat = conversation();
        chat.send("first", None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        chat.send("second", None).await.unwrap();

        wait_past_reply().await;
        let senders: Vec<Sender> = chat.messages().await.iter().map(|m| m.sender).collect();
        assert_eq!(
            senders,
            vec![Sender::Customer, Sender::Customer, Sender::Worker, Sender::Worker]
        );
        let ids: Vec<u64> = chat.messages().await.iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn events_are_broadcast() {
        let mut chat = conversation();
        let mut rx = chat.subscribe();

        chat.send("hi", None).await.unwrap();
        match rx.recv().await.unwrap() {
            ChatEvent::MessageAppended { message } => assert_eq!(message.content, "hi"),
            other => panic!("Expected MessageAppended, got {other:?}"),
        }
        assert_eq!(rx.recv().await.unwrap(), ChatEvent::Typing { active: true });

        match rx.recv().await.unwrap() {
            ChatEvent::MessageAppended { message } => assert_eq!(message.sender, Sender::Worker),
            other => panic!("Expected worker reply, got {other:?}"),
        }
        assert_eq!(rx.recv().await.unwrap(), ChatEvent::Typing { active: false });

        chat.close().await;
        assert_eq!(rx.recv().await.unwrap(), ChatEvent::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn seeded_history_precedes_new_messages() {
        let mut chat = conversation();
        let earlier = Utc::now() - chrono::Duration::minutes(30);
        chat.seed(Sender::Customer, "Do you do home wiring?", earlier).await;
        chat.seed(Sender::Worker, "Yes!", earlier).await;
        assert!(!chat.is_typing().await);

        let sent = chat.send("Great", None).await.unwrap();
        assert_eq!(sent.id, 3);
    }
}
