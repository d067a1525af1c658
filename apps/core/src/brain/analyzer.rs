//! Analyzer - runs the sentiment model and the entity recognizer on a message.
//!
//! The rest of the service only sees the [`TextAnalyzer`] trait, so the model
//! backends can be swapped (or stubbed in tests) without touching the chat path.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use super::entities::EntityRecognizer;
use super::sentiment::SentimentClassifier;
use crate::error::AppError;
use crate::models::Entity;

/// Output of a single analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Sentiment label (`POSITIVE`, `NEGATIVE`, or anything else the backend emits).
    pub sentiment: String,
    /// Backend confidence, for logs only.
    pub confidence: f32,
    pub entities: Vec<Entity>,
}

/// Defines the public interface of a text analyzer.
///
/// Implementations must be cheap to share across requests; they are held
/// behind an `Arc` for the whole process lifetime.
#[async_trait]
pub trait TextAnalyzer: Send + Sync + 'static {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, AppError>;
}

/// Production analyzer: embedding-based sentiment plus pattern entities.
pub struct ModelAnalyzer {
    sentiment: Arc<SentimentClassifier>,
    entities: Arc<EntityRecognizer>,
}

impl ModelAnalyzer {
    pub fn new(sentiment: SentimentClassifier, entities: EntityRecognizer) -> Self {
        Self {
            sentiment: Arc::new(sentiment),
            entities: Arc::new(entities),
        }
    }

    fn analyze_blocking(
        sentiment: &SentimentClassifier,
        entities: &EntityRecognizer,
        text: &str,
    ) -> Result<AnalysisResult, AppError> {
        let start = Instant::now();
        let score = sentiment.classify(text)?;
        let entities = entities.recognize(text);

        debug!(
            "Analyzed {} chars in {:?}: {} ({:.2}), {} entities",
            text.len(),
            start.elapsed(),
            score.label,
            score.confidence,
            entities.len()
        );

        Ok(AnalysisResult {
            sentiment: score.label.to_string(),
            confidence: score.confidence,
            entities,
        })
    }
}

#[async_trait]
impl TextAnalyzer for ModelAnalyzer {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::Analysis("Cannot analyze empty text".to_string()));
        }

        let sentiment = Arc::clone(&self.sentiment);
        let entities = Arc::clone(&self.entities);
        let text = text.to_string();

        // Model inference is CPU-bound
        tokio::task::spawn_blocking(move || Self::analyze_blocking(&sentiment, &entities, &text)).await?
    }
}
