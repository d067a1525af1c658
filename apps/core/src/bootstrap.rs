//! Startup loading of the analyzer models.
//!
//! The downloaded sentiment model gets exactly one retry: if the first load
//! fails, its cache is cleared and the load runs again, which re-downloads it.
//! A second failure is fatal. Entity patterns are only written when missing.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::brain::{EntityRecognizer, FastEmbedder, ModelAnalyzer, SentimentClassifier};
use crate::error::AppError;
use crate::fs_manager::DataLayout;

/// Runs `load`; on failure clears `cache` and runs it once more.
pub fn load_with_retry<T, F>(name: &str, cache: &Path, mut load: F) -> Result<T, AppError>
where
    F: FnMut() -> Result<T, AppError>,
{
    match load() {
        Ok(value) => Ok(value),
        Err(first) => {
            warn!("Loading {} failed: {}. Clearing {:?} and retrying once", name, first, cache);
            clear_cache(cache)?;
            load().map_err(|second| {
                AppError::Model(format!("{} failed to load after retry: {}", name, second))
            })
        }
    }
}

/// Removes a cached artifact (file or directory). Missing paths are fine.
fn clear_cache(path: &Path) -> Result<(), AppError> {
    if path.is_dir() {
        fs::remove_dir_all(path)?;
        fs::create_dir_all(path)?;
    } else if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Loads the sentiment model, downloading it into the layout on first run.
pub fn load_sentiment(layout: &DataLayout) -> Result<SentimentClassifier, AppError> {
    let cache = layout.embeddings_dir();
    load_with_retry("sentiment model", &cache, || {
        let embedder = FastEmbedder::load(cache.clone())?;
        SentimentClassifier::new(Arc::new(embedder))
    })
}

/// Loads the entity patterns, writing the defaults on first run.
///
/// The pattern file is user-editable, so it never goes through
/// [`load_with_retry`]: a file that exists but does not load is a fatal
/// error and is left on disk untouched.
pub fn load_entities(layout: &DataLayout) -> Result<EntityRecognizer, AppError> {
    EntityRecognizer::bootstrap(&layout.entity_patterns_path())
}

/// Builds the production analyzer. Blocking: may download model files.
pub fn load_analyzer(layout: &DataLayout) -> Result<ModelAnalyzer, AppError> {
    layout.init()?;

    let entities = load_entities(layout)?;
    info!("Entity recognizer ready ({} patterns)", entities.pattern_count());

    let sentiment = load_sentiment(layout)?;
    info!("Sentiment model ready");

    Ok(ModelAnalyzer::new(sentiment, entities))
}
