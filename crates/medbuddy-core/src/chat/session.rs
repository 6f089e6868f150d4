//! Chat session with delayed bot replies.

use chrono::{DateTime, Duration, Utc};

use super::responder::{KeywordResponder, Responder};
use crate::models::{ChatMessage, Sender};

/// Bot message a new session starts with.
pub const GREETING: &str = "Hello! I'm your MedBuddy AI assistant. How can I help you today?";

/// Default delay before a bot reply shows up.
pub const DEFAULT_REPLY_DELAY_MS: u64 = 1000;
/// Longer delays are clamped to one day.
pub const MAX_REPLY_DELAY_MS: u64 = 24 * 60 * 60 * 1000;

struct PendingReply {
    due: DateTime<Utc>,
    text: String,
}

/// In-memory conversation. Nothing here is persisted.
pub struct ChatSession<R: Responder = KeywordResponder> {
    responder: R,
    reply_delay: Duration,
    messages: Vec<ChatMessage>,
    pending: Vec<PendingReply>,
}

impl ChatSession<KeywordResponder> {
    /// Session with the keyword responder and the default delay.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_responder(KeywordResponder::new(), DEFAULT_REPLY_DELAY_MS, now)
    }
}

impl<R: Responder> ChatSession<R> {
    pub fn with_responder(responder: R, reply_delay_ms: u64, now: DateTime<Utc>) -> Self {
        let delay_ms = reply_delay_ms.min(MAX_REPLY_DELAY_MS) as i64;
        Self {
            responder,
            reply_delay: Duration::milliseconds(delay_ms),
            messages: vec![ChatMessage::new(GREETING, Sender::Bot, now)],
            pending: Vec::new(),
        }
    }

    /// Record a user message and schedule the bot's reply.
    ///
    /// Whitespace-only input is ignored and returns `None`.
    pub fn send(&mut self, text: &str, now: DateTime<Utc>) -> Option<&ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }

        let reply = self.responder.respond(text);
        self.pending.push(PendingReply {
            due: now
                .checked_add_signed(self.reply_delay)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            text: reply,
        });
        self.messages.push(ChatMessage::new(text, Sender::User, now));
        self.messages.last()
    }

    /// Append every scheduled reply that is due. Returns how many landed.
    pub fn deliver_due(&mut self, now: DateTime<Utc>) -> usize {
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = waiting;

        let delivered = due.len();
        for reply in due {
            self.messages
                .push(ChatMessage::new(reply.text, Sender::Bot, reply.due));
        }
        delivered
    }

    /// Replies scheduled but not yet delivered.
    pub fn pending_replies(&self) -> usize {
        self.pending.len()
    }

    /// When the next reply becomes due, if any.
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.pending.iter().map(|p| p.due).min()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn responder(&self) -> &R {
        &self.responder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{FALLBACK_REPLY, TAKEN_REPLY};
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_seeded_with_greeting() {
        let session = ChatSession::new(t0());
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].text, GREETING);
        assert!(session.messages()[0].is_from_bot());
    }

    #[test]
    fn test_reply_arrives_after_delay() {
        let mut session = ChatSession::new(t0());
        let sent = session.send("I took my pill", t0()).unwrap();
        assert_eq!(sent.sender, Sender::User);
        assert_eq!(sent.text, "I took my pill");

        assert_eq!(session.deliver_due(t0() + Duration::milliseconds(999)), 0);
        assert_eq!(session.messages().len(), 2);

        assert_eq!(session.deliver_due(t0() + Duration::milliseconds(1000)), 1);
        let last = session.messages().last().unwrap();
        assert!(last.is_from_bot());
        assert_eq!(last.text, TAKEN_REPLY);
        assert_eq!(session.pending_replies(), 0);
    }

    #[test]
    fn test_whitespace_ignored() {
        let mut session = ChatSession::new(t0());
        assert!(session.send("   \n", t0()).is_none());
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.pending_replies(), 0);
    }

    #[test]
    fn test_replies_delivered_in_order() {
        let mut session = ChatSession::new(t0());
        session.send("I took it", t0());
        session.send("banana", t0() + Duration::milliseconds(200));
        assert_eq!(session.next_due(), Some(t0() + Duration::milliseconds(1000)));

        assert_eq!(session.deliver_due(t0() + Duration::seconds(5)), 2);
        let texts: Vec<&str> = session.messages()[3..].iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec![TAKEN_REPLY, FALLBACK_REPLY]);
    }

    #[test]
    fn test_huge_delay_is_clamped() {
        let mut session = ChatSession::with_responder(KeywordResponder::new(), 1_000_000_000_000_000_000, t0());
        assert!(session.send("hello", t0()).is_some());
        assert_eq!(
            session.next_due(),
            Some(t0() + Duration::milliseconds(MAX_REPLY_DELAY_MS as i64))
        );
        assert_eq!(session.deliver_due(t0() + Duration::days(1)), 1);
    }

    #[test]
    fn test_delay_near_end_of_time_saturates() {
        let late = DateTime::<Utc>::MAX_UTC - Duration::seconds(1);
        let mut session = ChatSession::with_responder(KeywordResponder::new(), MAX_REPLY_DELAY_MS, late);
        session.send("hello", late);
        assert_eq!(session.next_due(), Some(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn test_custom_responder() {
        struct Echo;
        impl Responder for Echo {
            fn respond(&self, text: &str) -> String {
                format!("echo: {}", text)
            }
        }

        let mut session = ChatSession::with_responder(Echo, 0, t0());
        session.send("hi", t0());
        session.deliver_due(t0());
        assert_eq!(session.messages().last().unwrap().text, "echo: hi");
    }
}
