use super::normalize::normalize_dense;

/// Market-saturation penalty applied to the structural index.
///
/// Two policies exist and the caller picks one through configuration:
/// `Ratio` ranks regions against each other by competitor density, while
/// `Deviation` compares each region with a fixed residents-per-competitor
/// reference and can also award a bonus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SaturationStrategy {
    /// `structural - norm(competitors / population) * penalty_factor`
    Ratio { penalty_factor: f64 },
    /// `structural - (population / competitors - reference) * scaling`
    Deviation { reference: f64, scaling: f64 },
}

/// Inputs for one region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationInput {
    pub structural: f64,
    pub population: f64,
    pub competitors: f64,
}

/// Adjusted index of one region with the penalty that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationOutcome {
    pub penalty: f64, // Subtracted from the structural index; negative is a bonus
    pub adjusted: f64,
}

impl SaturationStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            SaturationStrategy::Ratio { .. } => "ratio",
            SaturationStrategy::Deviation { .. } => "deviation",
        }
    }

    /// Compute the density-adjusted index for all regions at once.
    ///
    /// The ratio policy normalizes across regions, so it needs the whole column.
    pub fn apply(&self, inputs: &[SaturationInput]) -> Vec<SaturationOutcome> {
        let penalties: Vec<f64> = match *self {
            SaturationStrategy::Ratio { penalty_factor } => {
                let density: Vec<f64> = inputs
                    .iter()
                    .map(|i| ratio(i.competitors, i.population))
                    .collect();
                normalize_dense(&density, false)
                    .into_iter()
                    .map(|score| score * penalty_factor)
                    .collect()
            }
            SaturationStrategy::Deviation { reference, scaling } => inputs
                .iter()
                .map(|i| (ratio(i.population, i.competitors) - reference) * scaling)
                .collect(),
        };

        inputs
            .iter()
            .zip(penalties)
            .map(|(input, penalty)| SaturationOutcome {
                penalty,
                adjusted: input.structural - penalty,
            })
            .collect()
    }
}

/// Division that yields 0 instead of infinity for an empty denominator.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
