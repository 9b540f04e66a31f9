// Recommendation layer: turn handling, explanations, and strategy hints.

pub mod engine;
pub mod explain;
pub mod strategy;
