//! Text-to-vector embedding.
//!
//! The memory store only needs "given text, return a vector"; the
//! `Embedder` trait is that seam. `EmbeddingEngine` runs the ONNX model,
//! `HashingEmbedder` is a deterministic offline alternative.

mod hashing;
mod onnx;

pub use hashing::HashingEmbedder;
pub use onnx::EmbeddingEngine;

use crate::errors::Error;

/// Embedding dimensions shared by every embedder.
pub const EMBEDDING_DIMS: usize = 384;

/// Model id selecting the offline hashing embedder.
pub const HASHING_MODEL_ID: &str = "hashing";

/// Converts text into a fixed-size, L2-normalized vector.
pub trait Embedder {
    /// Embed a single text into an `EMBEDDING_DIMS`-long vector.
    fn embed(&mut self, text: &str) -> Result<Vec<f32>, Error>;
}

/// Build the embedder for a configured model id.
///
/// `hashing` selects `HashingEmbedder`; anything else is treated as a
/// HuggingFace model id and loaded through ONNX Runtime.
pub fn load_embedder(model_id: &str) -> Result<Box<dyn Embedder>, Error> {
    if model_id == HASHING_MODEL_ID {
        tracing::debug!("using hashing embedder");
        return Ok(Box::new(HashingEmbedder::new()));
    }
    tracing::debug!(model_id, "loading ONNX embedding model");
    Ok(Box::new(EmbeddingEngine::new(model_id)?))
}

pub(crate) fn l2_normalize(vec: &[f32]) -> Vec<f32> {
    let norm: f32 = vec.iter().map(|&x| x * x).sum::<f32>().sqrt();
    let norm = norm.max(1e-9);

    vec.iter().map(|&x| x / norm).collect()
}
