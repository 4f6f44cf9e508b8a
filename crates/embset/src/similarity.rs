//! Similarity scoring.

/// Guards the cosine denominator against zero-length vectors.
pub const COSINE_EPSILON: f32 = 1e-8;

/// Cosine similarity between two vectors of equal length.
///
/// Computed as `dot(a, b) / (|a| * |b| + 1e-8)`, so a zero vector scores
/// 0.0 against everything instead of producing NaN. Vectors are not
/// normalized first.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt() + COSINE_EPSILON)
}

/// Scale a vector to unit length in place. Zero vectors are left untouched.
pub fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}
