use std::sync::Arc;
use tracing::{info, instrument};

use crate::brain::{IntentClassifier, ResponseTable, TextAnalyzer};
use crate::error::AppError;
use crate::models::{ChatResponse, Message};

/// Turns one message into one reply.
///
/// Holds the read-only state built at startup (analyzer models and the
/// response table). Shared across requests behind an `Arc`; no locking.
pub struct ChatEngine {
    analyzer: Arc<dyn TextAnalyzer>,
    classifier: IntentClassifier,
    responses: ResponseTable,
}

impl ChatEngine {
    pub fn new(analyzer: Arc<dyn TextAnalyzer>, responses: ResponseTable) -> Self {
        Self {
            analyzer,
            classifier: IntentClassifier::new(),
            responses,
        }
    }

    /// Processes a user message.
    ///
    /// 1. Runs the analyzer (sentiment + entities) on the raw text.
    /// 2. Classifies the intent of the lowercased text.
    /// 3. Picks a reply for `(intent, sentiment)`.
    ///
    /// Analyzer output is passed through to the response untouched.
    #[instrument(skip_all)]
    pub async fn respond(&self, message: &Message) -> Result<ChatResponse, AppError> {
        let analysis = self.analyzer.analyze(&message.text).await?;
        let intent = self.classifier.classify_raw(&message.text);
        let text = self.responses.select(intent.intent, &analysis.sentiment)?.to_string();

        info!(
            intent = %intent.intent,
            keyword = intent.matched.unwrap_or("-"),
            sentiment = %analysis.sentiment,
            confidence = analysis.confidence,
            entities = analysis.entities.len(),
            "Reply selected"
        );

        Ok(ChatResponse {
            text,
            sentiment: analysis.sentiment,
            entities: analysis.entities,
        })
    }
}
