//! Min-max scaling of one indicator column onto 0–100.
//!
//! A column is all regions' values of one indicator in one period. The
//! largest raw value maps to 100 and the smallest to 0; `invert` flips that
//! for indicators where lower is better. A column without variance scores
//! 0 everywhere, which keeps results comparable with earlier runs of the
//! scoring model.

/// Scale a column that may contain missing values.
///
/// Missing inputs take no part in the min/max and stay missing in the output.
pub fn normalize(values: &[Option<f64>], invert: bool) -> Vec<Option<f64>> {
    let Some((min, max)) = bounds(values.iter().flatten().copied()) else {
        return vec![None; values.len()];
    };

    values
        .iter()
        .map(|v| v.map(|v| scale(v, min, max, invert)))
        .collect()
}

/// Scale a column without missing values.
pub fn normalize_dense(values: &[f64], invert: bool) -> Vec<f64> {
    let Some((min, max)) = bounds(values.iter().copied()) else {
        return Vec::new();
    };

    values.iter().map(|&v| scale(v, min, max, invert)).collect()
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((min, max)) => Some((min.min(v), max.max(v))),
    })
}

fn scale(v: f64, min: f64, max: f64, invert: bool) -> f64 {
    let range = max - min;
    if range == 0.0 {
        return 0.0;
    }
    if invert {
        (max - v) / range * 100.0
    } else {
        (v - min) / range * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_normalize_basic() {
        let scores = normalize_dense(&[10.0, 20.0, 30.0], false);
        assert_eq!(scores, vec![0.0, 50.0, 100.0]);
    }

    #[test]
    fn test_normalize_inverted() {
        let scores = normalize_dense(&[10.0, 20.0, 30.0], true);
        assert_eq!(scores, vec![100.0, 50.0, 0.0]);
    }

    #[test]
    fn test_normalize_extremes_and_range() {
        let raw = [3.2, 7.9, 5.5, 4.1, 6.0];
        let scores = normalize_dense(&raw, false);
        assert!(scores.iter().all(|s| (0.0..=100.0).contains(s)));
        assert_eq!(scores[1], 100.0); // argmax
        assert_eq!(scores[0], 0.0); // argmin

        let inverted = normalize_dense(&raw, true);
        assert_eq!(inverted[1], 0.0);
        assert_eq!(inverted[0], 100.0);
    }

    #[test]
    fn test_normalize_inversion_is_complement() {
        let raw = [4.2, 1.0, 9.5, 7.25, 3.0, 9.5];
        let plain = normalize_dense(&raw, false);
        let inverted = normalize_dense(&raw, true);
        for (p, i) in plain.iter().zip(&inverted) {
            assert_close(*i, 100.0 - p);
        }
    }

    #[test]
    fn test_normalize_degenerate_column_is_zero() {
        assert_eq!(normalize_dense(&[5.0, 5.0, 5.0], false), vec![0.0; 3]);
        // Both polarities are zero, not complements
        assert_eq!(normalize_dense(&[5.0, 5.0, 5.0], true), vec![0.0; 3]);
        assert_eq!(normalize_dense(&[42.0], false), vec![0.0]);
    }

    #[test]
    fn test_normalize_excludes_missing_values() {
        let scores = normalize(&[Some(10.0), None, Some(30.0), Some(20.0)], false);
        assert_eq!(scores, vec![Some(0.0), None, Some(100.0), Some(50.0)]);
    }

    #[test]
    fn test_normalize_all_missing() {
        assert_eq!(normalize(&[None, None], false), vec![None, None]);
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize(&[], false).is_empty());
        assert!(normalize_dense(&[], true).is_empty());
    }
}
