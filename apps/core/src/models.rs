use serde::{Deserialize, Serialize};

/// Incoming chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The user's text.
    pub text: String,
    /// Caller-supplied identifier. Only recorded in logs; never affects the reply.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// A substring of the input tagged with a semantic category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// The raw span as it appears in the message.
    pub text: String,
    /// Category such as `DATE`, `MONEY` or `GPE`.
    pub label: String,
}

/// Reply sent back for a chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The selected canned reply.
    pub text: String,
    /// Sentiment label exactly as produced by the analyzer.
    pub sentiment: String,
    /// Entities exactly as produced by the analyzer.
    pub entities: Vec<Entity>,
}
