// Library root for the draft engine.
//
// Pure computation over an in-memory draft: no network or disk I/O. The
// app crate feeds picks in and prints what comes out.

pub mod catalog;
pub mod draft;
pub mod error;
pub mod player;
pub mod recommend;
pub mod scoring;

pub use catalog::PlayerCatalog;
pub use draft::order::{is_user_turn, next_team, DraftOrder, TurnSlot};
pub use draft::pick::{Pick, TeamId};
pub use draft::roster::{Lineup, RosterNeeds, RosterRequirements, RosterSlot};
pub use draft::state::{DraftConfig, DraftPhase, DraftSnapshot, DraftState};
pub use error::{DraftError, Result};
pub use player::{Player, PlayerId, PlayerRecord, Position};
pub use recommend::engine::{Recommendation, RecommendationEngine};
pub use recommend::explain::{explain, Explanation};
pub use scoring::normalize::ProjectionNormalization;
pub use scoring::rank::{rank, rank_with, Factor, FactorContribution, RankedPlayer};
pub use scoring::weights::{RiskTolerance, ScoringConfig, ScoringWeights};
