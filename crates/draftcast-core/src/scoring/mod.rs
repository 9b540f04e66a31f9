// Scoring engine: normalized sub-scores combined into a composite ranking.

pub mod normalize;
pub mod rank;
pub mod scarcity;
pub mod weights;
