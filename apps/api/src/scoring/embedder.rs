use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use hf_hub::{api::sync::Api, Repo, RepoType};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::scoring::{ScoringError, SentenceEmbedder};

/// Token window of the MiniLM sentence-transformers family; longer input is truncated.
const MAX_SEQUENCE_LENGTH: usize = 256;

fn normalize_l2(v: &Tensor) -> candle_core::Result<Tensor> {
    v.broadcast_div(&v.sqr()?.sum_keepdim(1)?.sqrt()?)
}

/// Frozen BERT sentence-embedding model: mean pooling over token states, then L2 normalisation.
pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    model_id: String,
}

impl BertEmbedder {
    /// Fetches (or reuses the local hub cache for) config, tokenizer and weights and
    /// builds the model on CPU. Called once at process start.
    pub fn load(model_id: &str) -> Result<Self, ScoringError> {
        let started = Instant::now();

        let api = Api::new().map_err(|e| ScoringError::ModelLoad(e.to_string()))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));
        let fetch = |file: &str| {
            repo.get(file)
                .map_err(|e| ScoringError::ModelLoad(format!("{model_id}/{file}: {e}")))
        };
        let config_path = fetch("config.json")?;
        let tokenizer_path = fetch("tokenizer.json")?;
        let weights_path = fetch("model.safetensors")?;

        let config = std::fs::read_to_string(&config_path)
            .map_err(|e| ScoringError::ModelLoad(e.to_string()))?;
        let config: BertConfig = serde_json::from_str(&config)
            .map_err(|e| ScoringError::ModelLoad(format!("invalid config.json: {e}")))?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| ScoringError::Tokenizer(e.to_string()))?;
        tokenizer
            .with_padding(None)
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| ScoringError::Tokenizer(e.to_string()))?;

        let device = Device::Cpu;
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DTYPE, &device)? };
        let model = BertModel::load(vb, &config)?;

        info!(
            "Embedding model '{}' loaded in {:.2?}",
            model_id,
            started.elapsed()
        );

        Ok(Self {
            model,
            tokenizer,
            model_id: model_id.to_string(),
        })
    }
}

impl SentenceEmbedder for BertEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, ScoringError> {
        let device = &self.model.device;

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ScoringError::Tokenizer(e.to_string()))?;

        let token_ids = Tensor::new(encoding.get_ids(), device)?.unsqueeze(0)?;
        let token_type_ids = token_ids.zeros_like()?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;

        let hidden = self
            .model
            .forward(&token_ids, &token_type_ids, Some(&attention_mask))?;
        let (_, n_tokens, _) = hidden.dims3()?;
        debug!("Embedded {n_tokens} tokens");

        // No padding, so every token position counts toward the mean.
        let pooled = (hidden.sum(1)? / (n_tokens as f64))?;
        let normalized = normalize_l2(&pooled)?;

        Ok(normalized.squeeze(0)?.to_dtype(DType::F32)?.to_vec1()?)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EMBEDDING_MODEL;
    use crate::scoring::{match_score_percent, score};

    #[test]
    #[ignore = "downloads model weights from the Hugging Face hub"]
    fn test_bert_embedder_identity_and_symmetry() {
        let embedder = BertEmbedder::load(DEFAULT_EMBEDDING_MODEL).unwrap();

        let resume = "Backend engineer, five years of Rust and PostgreSQL.";
        let jd = "We are hiring a Rust developer to own our database layer.";

        let same = score(&embedder, resume, resume).unwrap();
        assert!((same - 1.0).abs() < 1e-4);
        assert_eq!(match_score_percent(same), 100.0);

        let ab = score(&embedder, resume, jd).unwrap();
        let ba = score(&embedder, jd, resume).unwrap();
        assert!((ab - ba).abs() < 1e-6);
        assert!(ab > 0.0 && ab < 1.0);

        assert_eq!(embedder.embed(resume).unwrap().len(), 384);
    }
}
