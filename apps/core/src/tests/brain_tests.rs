//! Brain Module Tests
//!
//! Intent rules, reply selection, sentiment, entity extraction and the chat
//! engine that ties them together.

use super::fixtures::{
    sample_table, BrokenEmbedder, FailingAnalyzer, KeywordEmbedder, StubAnalyzer, SAMPLE_TABLE,
};
use crate::brain::entities::EntityRecognizer;
use crate::brain::intent::Intent;
use crate::brain::responses::{Bucket, ResponseSet};
use crate::brain::sentiment::{NEGATIVE, POSITIVE};
use crate::brain::{IntentClassifier, ModelAnalyzer, ResponseTable, SentimentClassifier, TextAnalyzer};
use crate::engine::ChatEngine;
use crate::error::AppError;
use crate::models::{Entity, Message};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

#[cfg(test)]
mod intent_classifier_tests {
    use super::*;

    #[test]
    fn test_hello_without_question_or_farewell_is_greeting() {
        let classifier = IntentClassifier::new();

        let messages = vec!["hello", "hello penguin", "well hello.", "oh hello, frosty"];

        for message in messages {
            assert_eq!(
                classifier.classify(message).intent,
                Intent::Greeting,
                "Expected Greeting for '{}'",
                message
            );
        }
    }

    #[test]
    fn test_greeting_and_farewell_resolves_to_greeting() {
        let classifier = IntentClassifier::new();

        let messages = vec![
            "hello and goodbye",
            "bye, hi!",
            "see you later, hey",
            "goodbye? hello?",
        ];

        for message in messages {
            assert_eq!(
                classifier.classify(message).intent,
                Intent::Greeting,
                "Expected Greeting for '{}'",
                message
            );
        }
    }

    #[test]
    fn test_farewell_beats_question_and_thanks() {
        let classifier = IntentClassifier::new();

        assert_eq!(classifier.classify("goodbye?").intent, Intent::Farewell);
        assert_eq!(classifier.classify("thanks, bye").intent, Intent::Farewell);
    }

    #[test]
    fn test_question_beats_thanks() {
        let classifier = IntentClassifier::new();

        assert_eq!(classifier.classify("thank you?").intent, Intent::Question);
        assert_eq!(classifier.classify("thank you").intent, Intent::Thanks);
    }

    #[test]
    fn test_no_keywords_is_default() {
        let classifier = IntentClassifier::new();

        let messages = vec!["tell me a joke", "penguins are cool", "", "12345", "the abyss"];

        for message in messages {
            assert_eq!(
                classifier.classify(message).intent,
                Intent::Default,
                "Expected Default for '{}'",
                message
            );
        }
    }

    #[test]
    fn test_raw_text_is_lowercased() {
        let classifier = IntentClassifier::new();

        assert_eq!(classifier.classify_raw("HELLO THERE").intent, Intent::Greeting);
        assert_eq!(classifier.classify_raw("GoodBye").intent, Intent::Farewell);
        assert_eq!(classifier.classify_raw("THANKS").intent, Intent::Thanks);
    }
}

#[cfg(test)]
mod response_table_tests {
    use super::*;

    #[test]
    fn test_selection_stays_within_resolved_bucket() {
        let table = sample_table();

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for intent in Intent::ALL {
                for sentiment in ["POSITIVE", "NEGATIVE", "NEUTRAL", "LABEL_1"] {
                    let reply = table.select_with(intent, sentiment, &mut rng).unwrap();
                    let bucket = Bucket::from_sentiment(sentiment);
                    let allowed = table.resolve(intent.label()).bucket(bucket);
                    assert!(
                        allowed.iter().any(|r| r == reply),
                        "'{}' not in {:?}/{:?}",
                        reply,
                        intent,
                        bucket
                    );
                }
            }
        }
    }

    #[test]
    fn test_absent_intent_uses_default_buckets() {
        let table = sample_table();

        // "thanks" is not in the sample table
        assert_eq!(table.select(Intent::Thanks, "POSITIVE").unwrap(), "Nice!");
        assert_eq!(table.select(Intent::Thanks, "NEGATIVE").unwrap(), "Oh no.");
        assert_eq!(table.select(Intent::Thanks, "whatever").unwrap(), "I see.");
    }

    #[test]
    fn test_all_greeting_replies_are_reachable() {
        let table = sample_table();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..200 {
            seen.insert(table.select_with(Intent::Greeting, "NEUTRAL", &mut rng).unwrap());
        }

        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_empty_bucket_is_rejected_at_load() {
        let json = r#"{
            "default": {"positive": ["a"], "neutral": ["b"], "negative": ["c"]},
            "greeting": {"positive": [], "neutral": ["b"], "negative": ["c"]}
        }"#;

        match ResponseTable::from_json(json) {
            Err(AppError::Config(msg)) => {
                assert!(msg.contains("greeting"));
                assert!(msg.contains("positive"));
            }
            other => panic!("Expected config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_unknown_bucket_key_is_rejected() {
        let json = r#"{
            "default": {"positive": ["a"], "neutral": ["b"], "negative": ["c"], "happy": ["d"]}
        }"#;
        assert!(matches!(ResponseTable::from_json(json), Err(AppError::Config(_))));
    }

    #[test]
    fn test_missing_bucket_key_is_rejected() {
        let json = r#"{"default": {"positive": ["a"], "neutral": ["b"]}}"#;
        assert!(matches!(ResponseTable::from_json(json), Err(AppError::Config(_))));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(ResponseTable::from_json("{\"default\": "), Err(AppError::Config(_))));
        assert!(matches!(ResponseTable::from_json("[]"), Err(AppError::Config(_))));
    }

    #[test]
    fn test_extra_intents_are_accepted() {
        let mut json: serde_json::Value = serde_json::from_str(SAMPLE_TABLE).unwrap();
        json["joke"] = serde_json::json!({
            "positive": ["Why don't eggs tell jokes? They'd crack up!"],
            "neutral": ["What do you call a magic dog? A labracadabrador!"],
            "negative": ["What do cows do on date night? Go to the moo-vies!"]
        });

        let table = ResponseTable::from_json(&json.to_string()).unwrap();
        assert_eq!(table.intent_count(), 5);
    }

    #[test]
    fn test_shipped_response_table_is_complete() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/responses.json");
        let table = ResponseTable::load(&path).unwrap();

        for intent in Intent::ALL {
            let set: &ResponseSet = table.resolve(intent.label());
            assert!(!set.positive.is_empty() && !set.neutral.is_empty() && !set.negative.is_empty());
        }
        assert_eq!(table.intent_count(), Intent::ALL.len());
    }
}

#[cfg(test)]
mod sentiment_tests {
    use super::*;

    #[test]
    fn test_keyword_embedder_polarity() {
        let classifier = SentimentClassifier::new(KeywordEmbedder::shared()).unwrap();

        assert_eq!(classifier.classify("I love penguins, they are great").unwrap().label, POSITIVE);
        assert_eq!(classifier.classify("this is awful and sad").unwrap().label, NEGATIVE);
    }

    #[test]
    fn test_confidence_is_bounded() {
        let classifier = SentimentClassifier::new(KeywordEmbedder::shared()).unwrap();

        let score = classifier.classify("happy happy happy").unwrap();
        assert!(score.confidence > 0.0 && score.confidence <= 1.0);
    }

    #[test]
    fn test_broken_embedder_fails_construction() {
        assert!(SentimentClassifier::new(Arc::new(BrokenEmbedder)).is_err());
    }
}

#[cfg(test)]
mod analyzer_tests {
    use super::*;

    fn analyzer() -> ModelAnalyzer {
        ModelAnalyzer::new(
            SentimentClassifier::new(KeywordEmbedder::shared()).unwrap(),
            EntityRecognizer::with_defaults().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_analyze_combines_sentiment_and_entities() {
        let result = analyzer()
            .analyze("I love the South Pole in December")
            .await
            .unwrap();

        assert_eq!(result.sentiment, POSITIVE);
        assert_eq!(
            result.entities,
            vec![
                Entity {
                    text: "the South Pole".to_string(),
                    label: "LOC".to_string()
                },
                Entity {
                    text: "December".to_string(),
                    label: "DATE".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_text_is_an_analysis_error() {
        let analyzer = analyzer();

        assert!(matches!(analyzer.analyze("").await, Err(AppError::Analysis(_))));
        assert!(matches!(analyzer.analyze("   \n").await, Err(AppError::Analysis(_))));
    }

    #[tokio::test]
    async fn test_entity_spans_do_not_overlap() {
        let result = analyzer()
            .analyze("Meet me on March 3rd at 10:30 am with $15 and 2 fish, 50% off")
            .await
            .unwrap();

        let mut cursor = 0;
        let text = "Meet me on March 3rd at 10:30 am with $15 and 2 fish, 50% off";
        for entity in &result.entities {
            let start = text[cursor..].find(&entity.text).unwrap() + cursor;
            assert!(start >= cursor, "Overlapping or unordered span {:?}", entity);
            cursor = start + entity.text.len();
        }

        let labels: Vec<&str> = result.entities.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["DATE", "TIME", "MONEY", "CARDINAL", "PERCENT"]);
    }
}

#[cfg(test)]
mod engine_tests {
    use super::*;

    fn message(text: &str) -> Message {
        Message {
            text: text.to_string(),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn test_greeting_reply_matches_sentiment() {
        let engine = ChatEngine::new(Arc::new(StubAnalyzer::new("NEGATIVE")), sample_table());

        let response = engine.respond(&message("Hello there")).await.unwrap();

        assert_eq!(response.sentiment, "NEGATIVE");
        assert!(["Hi. Rough day?", "Hello, I'm here for you."].contains(&response.text.as_str()));
    }

    #[tokio::test]
    async fn test_analysis_is_passed_through_verbatim() {
        let entities = vec![Entity {
            text: "Frosty".to_string(),
            label: "PERSON".to_string(),
        }];
        let analyzer = StubAnalyzer::new("LABEL_7").with_entities(entities.clone());
        let engine = ChatEngine::new(Arc::new(analyzer), sample_table());

        let response = engine.respond(&message("is Frosty here?")).await.unwrap();

        assert_eq!(response.sentiment, "LABEL_7");
        assert_eq!(response.entities, entities);
        assert_eq!(response.text, "Let me think...");
    }

    #[tokio::test]
    async fn test_user_id_does_not_change_reply() {
        let engine = ChatEngine::new(Arc::new(StubAnalyzer::new("POSITIVE")), sample_table());
        let with_user = Message {
            text: "good night, bye".to_string(),
            user_id: Some("penguin-42".to_string()),
        };

        let response = engine.respond(&with_user).await.unwrap();
        assert_eq!(response.text, "Bye, have fun!");
    }

    #[tokio::test]
    async fn test_analysis_failure_propagates() {
        let engine = ChatEngine::new(Arc::new(FailingAnalyzer), sample_table());

        let result = engine.respond(&message("hello")).await;
        assert!(matches!(result, Err(AppError::Analysis(_))));
    }
}
