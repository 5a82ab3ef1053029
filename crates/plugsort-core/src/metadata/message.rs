use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kernel::constants::DEFAULT_LANGUAGE;
use crate::metadata::Conditional;

/// Severity of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// A note
    #[serde(rename = "say")]
    Say,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageType::Say => write!(f, "say"),
            MessageType::Warn => write!(f, "warn"),
            MessageType::Error => write!(f, "error"),
        }
    }
}

/// Message text in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    pub text: String,
    #[serde(rename = "lang", default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl MessageContent {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            language: default_language(),
        }
    }

    pub fn with_language(text: &str, language: &str) -> Self {
        Self {
            text: text.to_string(),
            language: language.to_string(),
        }
    }
}

/// A message attached to a plugin, or a global message of a metadata list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MessageRepr", into = "MessageRepr")]
pub struct Message {
    pub message_type: MessageType,
    /// Content in one or more languages, never empty
    pub content: Vec<MessageContent>,
    pub condition: Option<String>,
}

impl Message {
    pub fn new(message_type: MessageType, text: &str) -> Self {
        Self {
            message_type,
            content: vec![MessageContent::new(text)],
            condition: None,
        }
    }

    pub fn with_condition(mut self, condition: &str) -> Self {
        self.condition = Some(condition.to_string());
        self
    }

    /// Picks the content for `language`, falling back to English, then to the
    /// first content entry. `None` only when the message has no content.
    pub fn content_for(&self, language: &str) -> Option<&MessageContent> {
        self.content
            .iter()
            .find(|c| c.language == language)
            .or_else(|| self.content.iter().find(|c| c.language == DEFAULT_LANGUAGE))
            .or_else(|| self.content.first())
    }
}

impl Conditional for Message {
    fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ContentRepr {
    Text(String),
    Localized(Vec<MessageContent>),
}

#[derive(Serialize, Deserialize)]
struct MessageRepr {
    #[serde(rename = "type")]
    message_type: MessageType,
    content: ContentRepr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    subs: Vec<String>,
}

/// Replaces `{0}`, `{1}`, ... with the matching substitution.
fn substitute(text: &str, subs: &[String]) -> String {
    subs.iter()
        .enumerate()
        .fold(text.to_string(), |acc, (i, sub)| acc.replace(&format!("{{{}}}", i), sub))
}

impl TryFrom<MessageRepr> for Message {
    type Error = String;

    fn try_from(repr: MessageRepr) -> Result<Self, Self::Error> {
        let content = match repr.content {
            ContentRepr::Text(text) => vec![MessageContent::new(&text)],
            ContentRepr::Localized(contents) => contents,
        };
        if content.is_empty() {
            return Err("message content must not be empty".to_string());
        }
        let content = content
            .into_iter()
            .map(|c| MessageContent {
                text: substitute(&c.text, &repr.subs),
                language: c.language,
            })
            .collect();
        Ok(Message {
            message_type: repr.message_type,
            content,
            condition: repr.condition,
        })
    }
}

impl From<Message> for MessageRepr {
    fn from(message: Message) -> Self {
        let single_default = matches!(
            message.content.as_slice(),
            [only] if only.language == DEFAULT_LANGUAGE
        );
        let content = if single_default {
            ContentRepr::Text(message.content.into_iter().map(|c| c.text).collect())
        } else {
            ContentRepr::Localized(message.content)
        };
        MessageRepr {
            message_type: message.message_type,
            content,
            condition: message.condition,
            subs: Vec::new(),
        }
    }
}
