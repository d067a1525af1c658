//! Intent Classification using ordered keyword rules.
//!
//! Rules are evaluated top to bottom and the first one that matches wins, so
//! "hi, bye!" is a greeting. Matching is plain substring containment on
//! lowercased text. No ML model required.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Detected intent type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Greeting (hello, hi, hey)
    Greeting,
    /// Farewell (bye, goodbye, see you)
    Farewell,
    /// Question (contains ?)
    Question,
    /// Thanks (thank, thanks)
    Thanks,
    /// Nothing matched
    Default,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Intent {
    /// Every intent, in rule order, `Default` last.
    pub const ALL: [Intent; 5] = [
        Intent::Greeting,
        Intent::Farewell,
        Intent::Question,
        Intent::Thanks,
        Intent::Default,
    ];

    /// Returns the label used as key in the response table
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Farewell => "farewell",
            Intent::Question => "question",
            Intent::Thanks => "thanks",
            Intent::Default => "default",
        }
    }
}

/// Result of intent classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentResult {
    /// Detected intent
    pub intent: Intent,
    /// Keyword that triggered the rule (None for `Default`)
    pub matched: Option<&'static str>,
}

/// What a rule looks for in the text.
#[derive(Debug, Clone, Copy)]
enum Predicate {
    /// Any of the keywords appears as a substring.
    AnyOf(&'static [&'static str]),
}

impl Predicate {
    fn find(&self, text: &str) -> Option<&'static str> {
        match self {
            Predicate::AnyOf(keywords) => keywords.iter().copied().find(|kw| text.contains(kw)),
        }
    }
}

/// One `(predicate, label)` pair of the rule list.
struct IntentRule {
    predicate: Predicate,
    intent: Intent,
}

// Order is part of the contract: greeting beats farewell beats question beats thanks.
const RULES: &[IntentRule] = &[
    IntentRule {
        predicate: Predicate::AnyOf(&["hello", "hi", "hey"]),
        intent: Intent::Greeting,
    },
    IntentRule {
        predicate: Predicate::AnyOf(&["bye", "goodbye", "see you"]),
        intent: Intent::Farewell,
    },
    IntentRule {
        predicate: Predicate::AnyOf(&["?"]),
        intent: Intent::Question,
    },
    IntentRule {
        predicate: Predicate::AnyOf(&["thank", "thanks"]),
        intent: Intent::Thanks,
    },
];

/// Intent classifier using the ordered rule list
#[derive(Debug, Default, Clone, Copy)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify already-lowercased text.
    pub fn classify(&self, text: &str) -> IntentResult {
        RULES
            .iter()
            .find_map(|rule| {
                rule.predicate.find(text).map(|kw| IntentResult {
                    intent: rule.intent,
                    matched: Some(kw),
                })
            })
            .unwrap_or(IntentResult {
                intent: Intent::Default,
                matched: None,
            })
    }

    /// Lowercase the raw message, then classify it.
    pub fn classify_raw(&self, text: &str) -> IntentResult {
        self.classify(&text.to_lowercase())
    }
}
