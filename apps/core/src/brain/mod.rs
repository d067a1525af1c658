//! # Brain Module
//!
//! Everything that turns a user message into a reply, without any transport.
//!
//! ## Components
//! - `intent`: ordered keyword rules (greeting, farewell, question, thanks, default)
//! - `sentiment`: embedding-based POSITIVE/NEGATIVE classifier
//! - `entities`: pattern-based entity recognizer
//! - `analyzer`: the `TextAnalyzer` seam combining sentiment and entities
//! - `responses`: response table and reply selection

pub mod analyzer;
pub mod entities;
pub mod intent;
pub mod responses;
pub mod sentiment;

pub use analyzer::{ModelAnalyzer, TextAnalyzer};
pub use entities::EntityRecognizer;
pub use intent::IntentClassifier;
pub use responses::ResponseTable;
pub use sentiment::{FastEmbedder, SentimentClassifier};
