//! Embedding BLOB conversion and cosine distance computation.

use super::Error;

pub type Result<T> = std::result::Result<T, Error>;

const EMBEDDING_DIMS: usize = crate::embedding::EMBEDDING_DIMS;
const EMBEDDING_BLOB_SIZE: usize = EMBEDDING_DIMS * 4;

/// Convert an embedding to a little-endian BLOB.
///
/// # Errors
///
/// Returns `Error::MismatchedDimensions` if the vector is not exactly 384 values.
pub fn vec_to_blob(vec: &[f32]) -> Result<Vec<u8>> {
    if vec.len() != EMBEDDING_DIMS {
        return Err(Error::MismatchedDimensions {
            expected: EMBEDDING_DIMS,
            actual: vec.len(),
        });
    }
    Ok(vec.iter().flat_map(|x| x.to_le_bytes()).collect())
}

/// Decode a little-endian BLOB back into an embedding.
///
/// # Errors
///
/// Returns `Error::InvalidBlobSize` if the blob is not exactly 1,536 bytes.
pub fn blob_to_vec(blob: &[u8]) -> Result<Vec<f32>> {
    if blob.len() != EMBEDDING_BLOB_SIZE {
        return Err(Error::InvalidBlobSize {
            expected: EMBEDDING_BLOB_SIZE,
            actual: blob.len(),
        });
    }
    Ok(blob
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Cosine similarity in [-1, 1]. Zero vectors have similarity 0.
///
/// # Errors
///
/// - `Error::EmptyVector` if either vector is empty.
/// - `Error::MismatchedDimensions` if lengths differ.
/// - `Error::InvalidEmbedding` if any value is NaN or infinite.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.is_empty() || b.is_empty() {
        return Err(Error::EmptyVector);
    }
    if a.len() != b.len() {
        return Err(Error::MismatchedDimensions {
            expected: a.len(),
            actual: b.len(),
        });
    }
    if a.iter().chain(b.iter()).any(|x| !x.is_finite()) {
        return Err(Error::InvalidEmbedding(
            "Vector contains NaN or infinite values".to_string(),
        ));
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

/// Cosine distance `1 - similarity`, bounded to [0, 2].
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Result<f64> {
    Ok(1.0 - cosine_similarity(a, b)?)
}
