//! ONNX embedding engine (bge-small-en-v1.5, mean pooling, L2 normalization).

use std::path::PathBuf;

use hf_hub::api::sync::Api;
use ort::inputs;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Tensor;
use tokenizers::{Tokenizer, TruncationParams};

use super::{EMBEDDING_DIMS, Embedder, l2_normalize};
use crate::errors::Error;

const MAX_TOKENS: usize = 512;

/// Synchronous ONNX Runtime embedder.
///
/// Model files come from the HuggingFace Hub cache and are downloaded
/// on first use only.
pub struct EmbeddingEngine {
    session: Session,
    tokenizer: Tokenizer,
    requires_token_type_ids: bool,
}

/// Locate (downloading if needed) the ONNX graph and tokenizer of a model.
fn fetch_model_files(model_id: &str) -> Result<(PathBuf, PathBuf), Error> {
    let repo = Api::new()?.model(model_id.to_string());
    let model_path = repo
        .get("onnx/model.onnx")
        .or_else(|_| repo.get("model.onnx"))?;
    let tokenizer_path = repo.get("tokenizer.json")?;
    Ok((model_path, tokenizer_path))
}

/// Average token vectors weighted by the attention mask.
fn mean_pool(hidden: &[f32], attention_mask: &[u32], seq_len: usize) -> Vec<f32> {
    let mut pooled = vec![0.0f32; EMBEDDING_DIMS];
    let mut weight = 0.0f32;

    for (token, row) in hidden.chunks(EMBEDDING_DIMS).take(seq_len).enumerate() {
        let mask = attention_mask.get(token).copied().unwrap_or(0) as f32;
        weight += mask;
        for (acc, value) in pooled.iter_mut().zip(row) {
            *acc += value * mask;
        }
    }

    let weight = weight.max(1e-9);
    pooled.iter_mut().for_each(|v| *v /= weight);
    pooled
}

impl EmbeddingEngine {
    /// Load the model from the HuggingFace cache, downloading on first use.
    pub fn new(model_id: &str) -> Result<Self, Error> {
        let (model_path, tokenizer_path) = fetch_model_files(model_id)?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)?;
        tokenizer
            .with_padding(None)
            .with_truncation(Some(TruncationParams {
                max_length: MAX_TOKENS,
                ..Default::default()
            }))?;

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level1)
            .map_err(ort::Error::from)?
            .commit_from_file(&model_path)?;

        let requires_token_type_ids = session
            .inputs()
            .iter()
            .any(|input| input.name() == "token_type_ids");

        Ok(EmbeddingEngine {
            session,
            tokenizer,
            requires_token_type_ids,
        })
    }

    fn infer(&mut self, ids: Vec<i64>, mask: Vec<i64>) -> Result<Vec<f32>, Error> {
        let seq_len = ids.len();
        let ids = Tensor::from_array(([1usize, seq_len], ids))?;
        let mask = Tensor::from_array(([1usize, seq_len], mask))?;

        let outputs = if self.requires_token_type_ids {
            let type_ids = Tensor::from_array(([1usize, seq_len], vec![0i64; seq_len]))?;
            self.session.run(inputs![
                "input_ids" => ids,
                "attention_mask" => mask,
                "token_type_ids" => type_ids
            ])?
        } else {
            self.session.run(inputs![
                "input_ids" => ids,
                "attention_mask" => mask
            ])?
        };

        let (shape, data) = outputs
            .get("last_hidden_state")
            .or_else(|| outputs.get("token_embeddings"))
            .ok_or_else(|| {
                Error::Inference("model produced no token embedding output".to_string())
            })?
            .try_extract_tensor::<f32>()?;

        if shape.len() != 3 || shape[0] != 1 || shape[2] as usize != EMBEDDING_DIMS {
            return Err(Error::Inference(format!(
                "unexpected output shape {:?}, expected [1, seq_len, {}]",
                shape, EMBEDDING_DIMS
            )));
        }
        Ok(data.to_vec())
    }
}

impl Embedder for EmbeddingEngine {
    /// Empty text embeds to the zero vector; long text is truncated to 512 tokens.
    fn embed(&mut self, text: &str) -> Result<Vec<f32>, Error> {
        if text.is_empty() {
            return Ok(vec![0.0f32; EMBEDDING_DIMS]);
        }

        let encoding = self.tokenizer.encode(text, true)?;
        let attention_mask = encoding.get_attention_mask().to_vec();
        let ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        if ids.is_empty() {
            return Ok(vec![0.0f32; EMBEDDING_DIMS]);
        }

        let seq_len = ids.len();
        let mask: Vec<i64> = attention_mask.iter().map(|&m| m as i64).collect();
        let hidden = self.infer(ids, mask)?;

        Ok(l2_normalize(&mean_pool(&hidden, &attention_mask, seq_len)))
    }
}
