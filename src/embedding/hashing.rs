//! Deterministic feature-hashing embedder.
//!
//! Each lowercase word is hashed (FNV-1a) into one of `EMBEDDING_DIMS`
//! buckets with a hash-derived sign. Texts sharing words end up close in
//! cosine distance; texts sharing none are orthogonal. No model download.

use super::{EMBEDDING_DIMS, Embedder, l2_normalize};
use crate::errors::Error;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Bag-of-words embedder built on the hashing trick.
#[derive(Debug, Default, Clone)]
pub struct HashingEmbedder;

impl HashingEmbedder {
    pub fn new() -> Self {
        HashingEmbedder
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| {
        (hash ^ b as u64).wrapping_mul(FNV_PRIME)
    })
}

impl Embedder for HashingEmbedder {
    fn embed(&mut self, text: &str) -> Result<Vec<f32>, Error> {
        let mut vector = vec![0.0f32; EMBEDDING_DIMS];
        let words = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase);

        for word in words {
            let hash = fnv1a(word.as_bytes());
            let bucket = (hash % EMBEDDING_DIMS as u64) as usize;
            let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        if vector.iter().all(|&x| x == 0.0) {
            return Ok(vector);
        }
        Ok(l2_normalize(&vector))
    }
}
