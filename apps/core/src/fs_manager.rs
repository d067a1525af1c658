use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Directory the default asset and data paths are resolved from.
///
/// Debug builds point at the crate directory (`apps/core`) so `cargo run`
/// works from anywhere in the workspace. Release builds use the directory of
/// the executable, falling back to the working directory.
pub fn app_root() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    }

    #[cfg(not(debug_assertions))]
    match std::env::current_exe() {
        Ok(exe) => exe
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
        Err(e) => {
            tracing::warn!("Cannot locate executable ({}), using working directory", e);
            PathBuf::from(".")
        }
    }
}

/// Layout of the runtime data tree.
///
/// ```text
/// <root>/
///   models/
///     embeddings/   fastembed cache (sentiment model)
///     entities/     entity pattern artifact
/// ```
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root of the data tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Model directory (`<root>/models`).
    pub fn models_dir(&self) -> PathBuf {
        self.root.join("models")
    }

    /// Cache of the sentence-embedding model used for sentiment.
    pub fn embeddings_dir(&self) -> PathBuf {
        self.models_dir().join("embeddings")
    }

    pub fn entities_dir(&self) -> PathBuf {
        self.models_dir().join("entities")
    }

    /// Entity pattern artifact, written by bootstrap when absent.
    pub fn entity_patterns_path(&self) -> PathBuf {
        self.entities_dir().join("patterns.json")
    }

    /// Creates every directory of the layout that does not exist yet.
    pub fn init(&self) -> Result<(), std::io::Error> {
        for dir in [self.root.clone(), self.models_dir(), self.embeddings_dir(), self.entities_dir()] {
            if !dir.exists() {
                info!("Creating data directory: {:?}", dir);
                fs::create_dir_all(&dir)?;
            }
        }

        Ok(())
    }
}
