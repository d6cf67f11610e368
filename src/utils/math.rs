//! Shared numeric helpers for feature statistics and 3D vectors.

/// A point in the 3D layout space.
pub type Vec3 = [f64; 3];

/// Compute cosine similarity between two vectors.
/// Returns dot(a,b) / (norm(a) * norm(b)), or 0.0 if either vector has zero norm.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Arithmetic mean, or 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Sample standard deviation (n - 1 denominator).
///
/// Fewer than two samples yield 0.0 rather than NaN.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Population standard deviation (n denominator), 0.0 for an empty slice.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Element-wise subtraction: a - b.
pub fn vec3_sub(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Euclidean length of a 3-vector.
pub fn vec3_norm(v: &Vec3) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Component-wise mean of a set of points. Empty input yields the origin.
pub fn vec3_centroid<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Vec3 {
    let mut sum = [0.0; 3];
    let mut count = 0usize;
    for p in points {
        sum[0] += p[0];
        sum[1] += p[1];
        sum[2] += p[2];
        count += 1;
    }
    if count == 0 {
        return [0.0; 3];
    }
    let n = count as f64;
    [sum[0] / n, sum[1] / n, sum[2] / n]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&a, &a);
        assert!(
            (sim - 1.0).abs() < 1e-12,
            "Identical vectors should have similarity 1.0, got {sim}"
        );
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(sim.abs() < 1e-12, "Orthogonal vectors should have similarity 0.0, got {sim}");
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((sim + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_mean_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2.0, 4.0]), 3.0);
    }

    #[test]
    fn test_sample_std_single_sample_is_zero() {
        assert_eq!(sample_std(&[42.0]), 0.0);
        assert_eq!(sample_std(&[]), 0.0);
    }

    #[test]
    fn test_sample_std_known_value() {
        // values 2,4,4,4,5,5,7,9: sample variance = 32/7
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((sample_std(&v) - expected).abs() < 1e-12);
        assert!((population_std(&v) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_sample_std_zero_variance() {
        assert_eq!(sample_std(&[3.0, 3.0, 3.0]), 0.0);
    }

    #[test]
    fn test_vec3_centroid() {
        let pts = [[0.0, 0.0, 0.0], [2.0, 4.0, -6.0]];
        assert_eq!(vec3_centroid(pts.iter()), [1.0, 2.0, -3.0]);
    }

    #[test]
    fn test_vec3_centroid_empty_is_origin() {
        let pts: [Vec3; 0] = [];
        assert_eq!(vec3_centroid(pts.iter()), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_vec3_norm_and_sub() {
        let d = vec3_sub(&[4.0, 6.0, 0.0], &[1.0, 2.0, 0.0]);
        assert_eq!(d, [3.0, 4.0, 0.0]);
        assert_eq!(vec3_norm(&d), 5.0);
    }
}
