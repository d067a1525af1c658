//! Sentiment classification using FastEmbed embeddings.
//!
//! Uses the AllMiniLML6V2 sentence model to place a message relative to two
//! anchor centroids (positive and negative phrasing). Whichever centroid is
//! closer by cosine similarity decides the label.

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::error::AppError;

pub const POSITIVE: &str = "POSITIVE";
pub const NEGATIVE: &str = "NEGATIVE";

const POSITIVE_ANCHORS: &[&str] = &[
    "I love this, it is wonderful",
    "great happy awesome fantastic amazing",
    "this makes me so glad and excited",
    "thank you, that is really kind and helpful",
    "what a beautiful, fun and delightful day",
];

const NEGATIVE_ANCHORS: &[&str] = &[
    "I hate this, it is terrible",
    "awful sad angry horrible bad",
    "this makes me upset and frustrated",
    "I am disappointed, nothing works",
    "what a boring, annoying and miserable day",
];

/// Anything that turns text into fixed-size vectors.
pub trait Embedder: Send + Sync + 'static {
    fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, AppError>;
}

/// Pretrained sentence-embedding model backed by fastembed (ONNX runtime).
pub struct FastEmbedder {
    model: TextEmbedding,
}

impl FastEmbedder {
    /// Loads the model from `cache_dir`, downloading it there if it is missing.
    pub fn load(cache_dir: PathBuf) -> Result<Self, AppError> {
        let mut options = InitOptions::new(EmbeddingModel::AllMiniLML6V2);
        options.show_download_progress = false;
        options.cache_dir = cache_dir;

        let model = TextEmbedding::try_new(options)
            .map_err(|e| AppError::Model(format!("Failed to load embedding model: {}", e)))?;
        Ok(Self { model })
    }
}

impl Embedder for FastEmbedder {
    fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, AppError> {
        self.model
            .embed(texts, None)
            .map_err(|e| AppError::Analysis(format!("Embedding failed: {}", e)))
    }
}

/// Label plus how far apart the two centroid similarities were.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentScore {
    pub label: &'static str,
    /// Similarity margin, 0.0 (undecided) to 1.0.
    pub confidence: f32,
}

/// Binary sentiment classifier over an [`Embedder`].
pub struct SentimentClassifier {
    embedder: Arc<dyn Embedder>,
    positive: Vec<f32>,
    negative: Vec<f32>,
}

impl SentimentClassifier {
    /// Builds the classifier, embedding the anchor phrases once.
    pub fn new(embedder: Arc<dyn Embedder>) -> Result<Self, AppError> {
        info!("Pre-computing sentiment anchor embeddings...");
        let positive = centroid(&embedder.embed(to_owned(POSITIVE_ANCHORS))?)?;
        let negative = centroid(&embedder.embed(to_owned(NEGATIVE_ANCHORS))?)?;

        Ok(Self {
            embedder,
            positive,
            negative,
        })
    }

    pub fn classify(&self, text: &str) -> Result<SentimentScore, AppError> {
        let embedding = self
            .embedder
            .embed(vec![text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Analysis("Embedder returned no vector".to_string()))?;

        let to_positive = cosine_similarity(&embedding, &self.positive);
        let to_negative = cosine_similarity(&embedding, &self.negative);

        let label = if to_positive >= to_negative { POSITIVE } else { NEGATIVE };
        Ok(SentimentScore {
            label,
            confidence: (to_positive - to_negative).abs().min(1.0),
        })
    }
}

fn to_owned(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|p| p.to_string()).collect()
}

/// Mean of the L2-normalised vectors.
fn centroid(vectors: &[Vec<f32>]) -> Result<Vec<f32>, AppError> {
    let dim = vectors
        .first()
        .map(Vec::len)
        .filter(|d| *d > 0)
        .ok_or_else(|| AppError::Model("Anchor embeddings are empty".to_string()))?;

    let mut sum = vec![0.0f32; dim];
    for v in vectors {
        if v.len() != dim {
            return Err(AppError::Model("Anchor embeddings differ in size".to_string()));
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm == 0.0 {
            continue;
        }
        for (acc, x) in sum.iter_mut().zip(v) {
            *acc += x / norm;
        }
    }

    let count = vectors.len() as f32;
    Ok(sum.into_iter().map(|x| x / count).collect())
}

/// Calculate cosine similarity between two vectors
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}
