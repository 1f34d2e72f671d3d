//! Similarity scoring: sentence embeddings compared by cosine similarity.
//!
//! The embedding backend is pluggable: `AppState` carries an
//! `Arc<dyn SentenceEmbedder>` loaded once at startup and shared read-only
//! by every request. Default backend: `BertEmbedder` (candle, CPU).

pub mod embedder;
pub mod similarity;

use std::sync::Arc;

use thiserror::Error;

pub use embedder::BertEmbedder;
pub use similarity::{cosine_similarity, match_score_percent};

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("failed to load embedding model: {0}")]
    ModelLoad(String),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("inference error: {0}")]
    Inference(#[from] candle_core::Error),

    #[error("embedding dimensions differ ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },

    #[error("scoring worker failed: {0}")]
    Worker(String),
}

/// Encodes a string into a fixed-length dense vector.
///
/// Implementations must be deterministic for a given input and safe to call
/// concurrently through a shared reference.
pub trait SentenceEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, ScoringError>;

    /// Identifier reported by `/health`.
    fn model_id(&self) -> &str;
}

/// Embeds both texts independently and returns their cosine similarity in [-1, 1].
pub fn score(embedder: &dyn SentenceEmbedder, a: &str, b: &str) -> Result<f32, ScoringError> {
    let left = embedder.embed(a)?;
    let right = embedder.embed(b)?;
    cosine_similarity(&left, &right)
}

/// Runs [`score`] on the blocking pool; inference is CPU-bound.
pub async fn score_blocking(
    embedder: Arc<dyn SentenceEmbedder>,
    a: String,
    b: String,
) -> Result<f32, ScoringError> {
    tokio::task::spawn_blocking(move || score(embedder.as_ref(), &a, &b))
        .await
        .map_err(|e| ScoringError::Worker(e.to_string()))?
}


#[cfg(test)]
mod tests {
    use super::stub::{BrokenEmbedder, LetterEmbedder};
    use super::*;

    #[test]
    fn test_identical_texts_score_one() {
        let text = "Senior Rust engineer with distributed systems experience";
        let sim = score(&LetterEmbedder, text, text).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
        assert_eq!(match_score_percent(sim), 100.0);
    }

    #[test]
    fn test_score_is_symmetric() {
        let a = "Built payment pipelines in Rust";
        let b = "Looking for a backend engineer who knows Kafka";
        let ab = score(&LetterEmbedder, a, b).unwrap();
        let ba = score(&LetterEmbedder, b, a).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_embedder_failure_propagates() {
        assert!(matches!(
            score(&BrokenEmbedder, "a", "b"),
            Err(ScoringError::Tokenizer(_))
        ));
    }

    #[tokio::test]
    async fn test_score_blocking_matches_sync() {
        let embedder: Arc<dyn SentenceEmbedder> = Arc::new(LetterEmbedder);
        let sync = score(embedder.as_ref(), "abc", "abd").unwrap();
        let threaded = score_blocking(embedder, "abc".into(), "abd".into())
            .await
            .unwrap();
        assert_eq!(sync, threaded);
    }
}
