//! Test Module
//!
//! ## Test Categories
//! - `fixtures`: stub analyzers, a keyword embedder and sample tables
//! - `brain_tests`: intent rules, reply selection, sentiment, entities, engine
//! - `api_tests`: HTTP endpoints driven in-process through the router
//! - `bootstrap_tests`: model loading with a single retry
//! - `config_tests`: environment-driven configuration


pub mod brain_tests;
