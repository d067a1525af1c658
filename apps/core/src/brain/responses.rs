//! Response table and reply selection.
//!
//! The table is a JSON document `{ intent: {positive, neutral, negative} }`
//! loaded once at startup. It is validated eagerly so that a bad asset stops
//! the service before it accepts traffic.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use super::intent::Intent;
use crate::error::AppError;

/// Key of the mandatory fallback entry.
pub const DEFAULT_INTENT: &str = "default";

/// Sentiment bucket inside a response set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Positive,
    Negative,
    Neutral,
}

impl Bucket {
    /// Maps an analyzer label to a bucket. Only the exact labels `POSITIVE`
    /// and `NEGATIVE` are recognised; everything else is neutral.
    pub fn from_sentiment(label: &str) -> Self {
        match label {
            "POSITIVE" => Bucket::Positive,
            "NEGATIVE" => Bucket::Negative,
            _ => Bucket::Neutral,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Bucket::Positive => "positive",
            Bucket::Negative => "negative",
            Bucket::Neutral => "neutral",
        }
    }
}

/// Candidate replies of one intent, split by sentiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseSet {
    pub positive: Vec<String>,
    pub neutral: Vec<String>,
    pub negative: Vec<String>,
}

impl ResponseSet {
    pub fn bucket(&self, bucket: Bucket) -> &[String] {
        match bucket {
            Bucket::Positive => &self.positive,
            Bucket::Negative => &self.negative,
            Bucket::Neutral => &self.neutral,
        }
    }
}

/// Immutable intent -> replies mapping.
#[derive(Debug, Clone)]
pub struct ResponseTable {
    fallback: ResponseSet,
    entries: HashMap<String, ResponseSet>,
}

impl ResponseTable {
    /// Builds a table and checks its invariants: a `default` entry exists and
    /// no bucket of any entry is empty.
    pub fn new(mut entries: HashMap<String, ResponseSet>) -> Result<Self, AppError> {
        for (intent, set) in &entries {
            for bucket in [Bucket::Positive, Bucket::Neutral, Bucket::Negative] {
                if set.bucket(bucket).is_empty() {
                    return Err(AppError::Config(format!(
                        "Response table entry '{}' has an empty '{}' list",
                        intent,
                        bucket.name()
                    )));
                }
            }
        }

        let fallback = entries.remove(DEFAULT_INTENT).ok_or_else(|| {
            AppError::Config(format!("Response table has no '{}' entry", DEFAULT_INTENT))
        })?;

        for intent in Intent::ALL {
            if intent != Intent::Default && !entries.contains_key(intent.label()) {
                warn!("Response table has no '{}' entry, it will use '{}'", intent, DEFAULT_INTENT);
            }
        }

        Ok(Self { fallback, entries })
    }

    /// Parses and validates a table from JSON text.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let entries: HashMap<String, ResponseSet> = serde_json::from_str(json)
            .map_err(|e| AppError::Config(format!("Malformed response table: {}", e)))?;
        Self::new(entries)
    }

    /// Loads the table asset from disk.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read response table {:?}: {}", path, e))
        })?;
        let table = Self::from_json(&json)?;
        info!("Loaded response table from {:?} ({} intents)", path, table.intent_count());
        Ok(table)
    }

    /// Number of intents, `default` included.
    pub fn intent_count(&self) -> usize {
        self.entries.len() + 1
    }

    /// Entry for `intent`, falling back to `default` when the intent is absent.
    pub fn resolve(&self, intent: &str) -> &ResponseSet {
        self.entries.get(intent).unwrap_or(&self.fallback)
    }

    /// Picks a reply for `(intent, sentiment)` with the thread-local RNG.
    pub fn select(&self, intent: Intent, sentiment: &str) -> Result<&str, AppError> {
        self.select_with(intent, sentiment, &mut rand::thread_rng())
    }

    /// Picks a reply for `(intent, sentiment)` with the given random source.
    pub fn select_with<R: Rng + ?Sized>(
        &self,
        intent: Intent,
        sentiment: &str,
        rng: &mut R,
    ) -> Result<&str, AppError> {
        let bucket = Bucket::from_sentiment(sentiment);
        let candidates = self.resolve(intent.label()).bucket(bucket);

        candidates.choose(rng).map(String::as_str).ok_or_else(|| {
            AppError::Config(format!(
                "No '{}' replies configured for intent '{}'",
                bucket.name(),
                intent
            ))
        })
    }
}
