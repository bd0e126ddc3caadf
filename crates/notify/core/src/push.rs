//! Push notification types.

use std::collections::{BTreeMap, HashSet};

/// A notification payload sent to every token of a multicast.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    /// String key/value data delivered alongside the notification.
    #[serde(default)]
    pub data: BTreeMap<String, String>,
    /// Page opened when the notification is clicked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl PushMessage {
    /// Create a message with a title and body.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data: BTreeMap::new(),
            link: None,
        }
    }

    /// Add a data entry.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Set the click-through link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Result of a push attempt to a single token.
#[derive(Debug, Clone, PartialEq)]
pub struct PushResult {
    /// Token that was pushed.
    pub token: String,
    /// Provider message ID (if successful).
    pub message_id: Option<String>,
    /// Error (if failed).
    pub error: Option<String>,
}

impl PushResult {
    /// Create a successful push result.
    pub fn success(token: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            message_id: Some(message_id.into()),
            error: None,
        }
    }

    /// Create a failed push result.
    pub fn failure(token: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            token: token.into(),
            message_id: None,
            error: Some(error.to_string()),
        }
    }

    /// Check if push was successful.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-token outcome of a multicast send, in the order tokens were given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MulticastReport {
    pub responses: Vec<PushResult>,
}

impl MulticastReport {
    pub fn new(responses: Vec<PushResult>) -> Self {
        Self { responses }
    }

    pub fn success_count(&self) -> usize {
        self.responses.iter().filter(|r| r.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.responses.len() - self.success_count()
    }

    /// Tokens at the failed response indices of `tokens`.
    ///
    /// `tokens` must be the list the multicast was sent to.
    pub fn failed_tokens<'a>(&self, tokens: &'a [String]) -> Vec<&'a str> {
        self.responses
            .iter()
            .zip(tokens)
            .filter(|(response, _)| !response.is_success())
            .map(|(_, token)| token.as_str())
            .collect()
    }
}

/// Deduplicate tokens, keeping first-occurrence order and dropping blanks.
pub fn dedupe_tokens<I, T>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut seen = HashSet::new();
    tokens
        .into_iter()
        .map(Into::into)
        .filter(|token| !token.trim().is_empty())
        .filter(|token| seen.insert(token.clone()))
        .collect()
}
