use super::config::{SaturationKind, ScoringConfig};

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Category indicator lists
    for (name, indicators) in config.categories.all() {
        for (i, indicator) in indicators.iter().enumerate() {
            if indicator.trim().is_empty() {
                errors.push(format!(
                    "scoring.categories.{}[{}]: indicator name must not be empty",
                    name, i
                ));
            }
        }
    }

    for (field, value) in [
        ("trend_indicator", &config.trend_indicator),
        ("risk_indicator", &config.risk_indicator),
        ("purchasing_power_indicator", &config.purchasing_power_indicator),
    ] {
        if value.trim().is_empty() {
            errors.push(format!("scoring.{}: must not be empty", field));
        }
    }

    // Hunter weights
    let weights = config.hunter_weights;
    for (field, weight) in [
        ("service_gap", weights.service_gap),
        ("growth", weights.growth),
        ("risk", weights.risk),
        ("market_size", weights.market_size),
    ] {
        if !weight.is_finite() || weight < 0.0 {
            errors.push(format!(
                "scoring.hunter_weights.{}: must be a non-negative number (got {})",
                field, weight
            ));
        }
    }
    if weights.total() <= 0.0 {
        errors.push("scoring.hunter_weights: at least one weight must be positive".to_string());
    }

    // Saturation constants of the selected strategy
    let saturation = config.saturation;
    match saturation.strategy {
        SaturationKind::Ratio => {
            if !saturation.penalty_factor.is_finite() || saturation.penalty_factor < 0.0 {
                errors.push(format!(
                    "scoring.saturation.penalty_factor: must be non-negative (got {})",
                    saturation.penalty_factor
                ));
            }
        }
        SaturationKind::Deviation => {
            if !saturation.reference.is_finite() || saturation.reference <= 0.0 {
                errors.push(format!(
                    "scoring.saturation.reference: must be positive (got {})",
                    saturation.reference
                ));
            }
            if !saturation.scaling.is_finite() || saturation.scaling < 0.0 {
                errors.push(format!(
                    "scoring.saturation.scaling: must be non-negative (got {})",
                    saturation.scaling
                ));
            }
        }
    }

    // Period overrides
    if let (Some(current), Some(baseline)) =
        (config.trend.current_period, config.trend.baseline_period)
    {
        if baseline > current {
            errors.push(format!(
                "scoring.trend: baseline_period {} is after current_period {}",
                baseline, current
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
