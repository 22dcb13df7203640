//! Chat transcripts for the case assistant and the general assistant.

use crate::models::{decode_history, encode_history, ChatMessage, WireMessage};

/// Assistant line appended when a question could not be delivered.
pub const CONNECTION_ERROR_REPLY: &str = "Connection error. Try again.";

/// Reply used when the general assistant endpoint fails.
pub const GENERAL_FALLBACK_REPLY: &str =
    "Sorry, I am having trouble connecting to the server. Please try again.";

/// Opening line of the general (case-less) assistant.
pub const GENERAL_INTRO: &str =
    "Hello! I am your General Legal Assistant. Ask me anything about Indian Law.";

/// Number of summary characters quoted in a case greeting.
const GREETING_EXCERPT: usize = 150;

/// An ordered chat transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    /// Builds a case transcript from the stored wire history.
    ///
    /// An empty history with a case summary at hand opens with a greeting
    /// quoting the start of that summary.
    pub fn for_case(history: Vec<WireMessage>, summary: Option<&str>) -> Self {
        if !history.is_empty() {
            return Self::from_messages(decode_history(history));
        }
        match summary.filter(|text| !text.trim().is_empty()) {
            Some(summary) => {
                let excerpt: String = summary.chars().take(GREETING_EXCERPT).collect();
                Self::from_messages(vec![ChatMessage::ai(format!(
                    "I have analyzed the case:\n{excerpt}...\n\nHow can I help?"
                ))])
            }
            None => Self::new(),
        }
    }

    /// Transcript of the general assistant, seeded with its introduction.
    pub fn general() -> Self {
        Self::from_messages(vec![ChatMessage::ai(GENERAL_INTRO)])
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// The transcript in wire vocabulary, as sent with a question.
    pub fn wire_history(&self) -> Vec<WireMessage> {
        encode_history(&self.messages)
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
