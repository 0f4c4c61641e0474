/// Percent change of an indicator from `baseline` to `current`.
///
/// Returns 0 when either value is missing or the baseline is zero, so every
/// region still gets a trend score when its history is incomplete.
pub fn growth(current: Option<f64>, baseline: Option<f64>) -> f64 {
    match (current, baseline) {
        (Some(current), Some(baseline)) if baseline != 0.0 => {
            (current - baseline) / baseline * 100.0
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_percent() {
        assert!((growth(Some(120.0), Some(100.0)) - 20.0).abs() < 1e-9);
        assert!((growth(Some(90.0), Some(100.0)) + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_growth_zero_baseline() {
        assert_eq!(growth(Some(120.0), Some(0.0)), 0.0);
    }

    #[test]
    fn test_growth_missing_values() {
        assert_eq!(growth(Some(120.0), None), 0.0);
        assert_eq!(growth(None, Some(100.0)), 0.0);
        assert_eq!(growth(None, None), 0.0);
    }
}
