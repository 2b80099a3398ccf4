//! Cosine similarity between embedding vectors.
//!
//! Defined for every input: a missing vector, a length mismatch, or a zero
//! vector all yield `0.0` instead of an error or `NaN`. Upstream embedding
//! generation may legitimately omit a field (e.g. a resume with no certifications).

use tracing::debug;

/// Returns `dot(a, b) / (||a|| * ||b||)` in `[-1.0, 1.0]`.
///
/// Accumulates in `f64` and clamps the result so rounding never escapes the range.
pub fn cosine_similarity(a: Option<&[f32]>, b: Option<&[f32]>) -> f64 {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return 0.0,
    };

    if a.len() != b.len() {
        debug!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; similarity is zero"
        );
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;

    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    if similarity.is_nan() {
        return 0.0;
    }
    similarity.clamp(-1.0, 1.0)
}
