use crate::scoring::ScoringError;

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
fn l2_norm(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}

/// `dot(a, b) / (‖a‖·‖b‖)`. A zero vector has no direction; its similarity is 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, ScoringError> {
    if a.len() != b.len() {
        return Err(ScoringError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let denom = l2_norm(a) * l2_norm(b);
    if denom == 0.0 {
        return Ok(0.0);
    }
    Ok((dot(a, b) / denom).clamp(-1.0, 1.0))
}

/// Rescales a similarity to a percentage rounded to two decimals.
/// Negative similarities stay negative.
pub fn match_score_percent(similarity: f32) -> f64 {
    (similarity as f64 * 100.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_vectors() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_vectors() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 5.0]).unwrap();
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn test_opposite_vectors_are_negative() {
        let sim = cosine_similarity(&[1.0, 1.0], &[-1.0, -1.0]).unwrap();
        assert!((sim + 1.0).abs() < 1e-6);
        assert_eq!(match_score_percent(sim), -100.0);
    }

    #[test]
    fn test_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = cosine_similarity(&[1.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::DimensionMismatch { left: 1, right: 2 }
        ));
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(match_score_percent(0.123456), 12.35);
        assert_eq!(match_score_percent(0.5), 50.0);
        assert_eq!(match_score_percent(-0.0042), -0.42);
    }
}
