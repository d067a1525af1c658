//! Entity extraction from ordered regex patterns.
//!
//! Patterns are grouped under spaCy-style labels and stored in a JSON artifact
//! next to the other models. The first pattern to claim a span keeps it, so
//! `$20` is MONEY rather than CARDINAL.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::AppError;
use crate::models::Entity;

/// One labelled pattern of the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPattern {
    pub label: String,
    /// Regex string (compatible with the `regex` crate, no lookarounds).
    pub pattern: String,
}

impl EntityPattern {
    fn new(label: &str, pattern: &str) -> Self {
        Self {
            label: label.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

/// On-disk shape of the pattern artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternFile {
    pub patterns: Vec<EntityPattern>,
}

/// Built-in pattern set written by bootstrap when no artifact exists.
pub fn default_patterns() -> Vec<EntityPattern> {
    vec![
        // Money
        EntityPattern::new("MONEY", r"(?i)[$€£]\s?\d+(?:[.,]\d+)*(?:\s?(?:million|billion|k)\b)?"),
        EntityPattern::new("MONEY", r"(?i)\b\d+(?:[.,]\d+)*\s?(?:dollars|euros|pounds|bucks|cents)\b"),
        // Percentages
        EntityPattern::new("PERCENT", r"(?i)\b\d+(?:\.\d+)?(?:\s?%|\s?percent\b)"),
        // Dates
        EntityPattern::new("DATE", r"\b\d{4}-\d{2}-\d{2}\b"),
        EntityPattern::new("DATE", r"\b\d{1,2}/\d{1,2}/\d{2,4}\b"),
        EntityPattern::new(
            "DATE",
            r"(?i)\b(?:january|february|march|april|june|july|august|september|october|november|december)(?:\s+\d{1,2}(?:st|nd|rd|th)?)?(?:,?\s+\d{4})?\b",
        ),
        EntityPattern::new("DATE", r"(?i)\bmay\s+\d{1,2}(?:st|nd|rd|th)?(?:,?\s+\d{4})?\b"),
        EntityPattern::new("DATE", r"(?i)\b(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)s?\b"),
        EntityPattern::new("DATE", r"(?i)\b(?:today|tomorrow|yesterday)\b"),
        EntityPattern::new("DATE", r"(?i)\b(?:next|last|this)\s+(?:week|weekend|month|year|winter|summer|spring|autumn)\b"),
        // Times
        EntityPattern::new("TIME", r"(?i)\b\d{1,2}(?::\d{2})?\s?(?:am|pm)\b"),
        EntityPattern::new("TIME", r"\b\d{1,2}:\d{2}\b"),
        EntityPattern::new("TIME", r"(?i)\b(?:noon|midnight|tonight|this (?:morning|afternoon|evening))\b"),
        // Ordinals before cardinals
        EntityPattern::new(
            "ORDINAL",
            r"(?i)\b(?:first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth|\d+(?:st|nd|rd|th))\b",
        ),
        EntityPattern::new("CARDINAL", r"\b\d+(?:[.,]\d+)*\b"),
        EntityPattern::new(
            "CARDINAL",
            r"(?i)\b(?:one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|dozen|hundred|thousand|million)\b",
        ),
        // Places
        EntityPattern::new(
            "GPE",
            r"\b(?:Argentina|Australia|Canada|Chile|China|France|Germany|India|Japan|New Zealand|South Africa|United States|USA|UK|London|New York|Paris|Tokyo|Sydney|Cape Town)\b",
        ),
        EntityPattern::new("LOC", r"\b(?:Antarctica|(?:the )?(?:South|North) Pole|Arctic|Pacific|Atlantic|Southern Ocean)\b"),
    ]
}

struct CompiledPattern {
    label: String,
    regex: Regex,
}

/// Regex-driven entity recognizer.
pub struct EntityRecognizer {
    patterns: Vec<CompiledPattern>,
}

impl EntityRecognizer {
    /// Compiles the patterns in order. An invalid regex is a load error.
    pub fn from_patterns(patterns: &[EntityPattern]) -> Result<Self, AppError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                if p.label.trim().is_empty() {
                    return Err(AppError::Model(format!("Pattern {:?} has an empty label", p.pattern)));
                }
                Ok(CompiledPattern {
                    label: p.label.clone(),
                    regex: Regex::new(&p.pattern).map_err(|e| {
                        AppError::Model(format!("Invalid {} pattern {:?}: {}", p.label, p.pattern, e))
                    })?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Recognizer over [`default_patterns`].
    #[cfg(test)]
    pub fn with_defaults() -> Result<Self, AppError> {
        Self::from_patterns(&default_patterns())
    }

    /// Loads the artifact at `path`.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Model(format!("Cannot read entity patterns {:?}: {}", path, e)))?;
        let file: PatternFile = serde_json::from_str(&content)
            .map_err(|e| AppError::Model(format!("Malformed entity patterns {:?}: {}", path, e)))?;

        let recognizer = Self::from_patterns(&file.patterns)?;
        info!("Loaded {} entity patterns from {:?}", recognizer.patterns.len(), path);
        Ok(recognizer)
    }

    /// Writes the default artifact if `path` does not exist, then loads it.
    /// Safe to call repeatedly.
    pub fn bootstrap(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            write_default_patterns(path)?;
        }
        Self::load(path)
    }

    /// Finds non-overlapping entity spans, in text order.
    pub fn recognize(&self, text: &str) -> Vec<Entity> {
        let mut spans: Vec<(usize, usize, &str)> = Vec::new();

        for pattern in &self.patterns {
            for m in pattern.regex.find_iter(text) {
                if m.start() == m.end() {
                    continue;
                }
                let overlaps = spans
                    .iter()
                    .any(|(start, end, _)| m.start() < *end && *start < m.end());
                if !overlaps {
                    spans.push((m.start(), m.end(), pattern.label.as_str()));
                }
            }
        }

        spans.sort_by_key(|(start, _, _)| *start);
        spans
            .into_iter()
            .map(|(start, end, label)| Entity {
                text: text[start..end].to_string(),
                label: label.to_string(),
            })
            .collect()
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

/// Serialises [`default_patterns`] to `path`, creating parent directories.
pub fn write_default_patterns(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = PatternFile {
        patterns: default_patterns(),
    };
    fs::write(path, serde_json::to_string_pretty(&file)?)?;
    info!("Wrote default entity patterns to {:?}", path);
    Ok(())
}
