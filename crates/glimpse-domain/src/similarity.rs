//! Similarity math for embedding comparison

/// Calculate cosine similarity between two embedding vectors.
///
/// Returns a value in [-1, 1], where 1.0 means identical direction and
/// higher values mean *more similar* inputs. The pipeline clamps the
/// result to [0, 1] before comparing against the acceptance threshold.
///
/// Returns 0.0 when either vector has zero magnitude or when the lengths
/// differ (embeddings from different models are not comparable).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}
