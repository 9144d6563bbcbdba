//! Embedding vector helpers

/// Ordered embedding values; dimensionality is fixed per embedding model
pub type EmbeddingVector = Vec<f32>;

/// Euclidean (L2) distance, the metric behind pgvector's `<->` operator.
///
/// Vectors of different lengths are incomparable and yield `f32::INFINITY`.
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }

    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l2_distance_identical() {
        assert_eq!(l2_distance(&[0.5, 0.5], &[0.5, 0.5]), 0.0);
    }

    #[test]
    fn test_l2_distance_known_value() {
        let distance = l2_distance(&[0.0, 0.0], &[3.0, 4.0]);
        assert!((distance - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_l2_distance_different_lengths() {
        assert_eq!(l2_distance(&[1.0], &[1.0, 2.0]), f32::INFINITY);
    }
}
