pub mod category;
pub mod config;
pub mod engine;
pub mod normalize;
pub mod saturation;
pub mod trend;
pub mod validation;

pub use category::{aggregate, category_score, NormalizedRow};
pub use config::*;
pub use engine::{
    score_regions, CategoryScores, HunterScores, IndexKind, Indices, Kpis, ScoredRegion,
    ScoredTable,
};
pub use normalize::{normalize, normalize_dense};
pub use saturation::{SaturationInput, SaturationOutcome, SaturationStrategy};
pub use trend::growth;
pub use validation::validate_scoring;
