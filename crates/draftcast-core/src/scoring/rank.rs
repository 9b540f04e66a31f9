// Composite ranking of undrafted players.
//
// Each candidate gets four sub-scores (value, projection, scarcity, risk),
// each multiplied by its configured weight and summed. Ordering is fully
// deterministic: composite desc, projection desc, ADP asc, id asc.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::normalize::{compute_pool_stats, PoolStats};
use super::scarcity::{compute_scarcity, PositionScarcity, ScarcityUrgency};
use super::weights::{RiskTolerance, ScoringConfig, ScoringWeights};
use crate::catalog::PlayerCatalog;
use crate::draft::pick::TeamId;
use crate::draft::state::DraftState;
use crate::error::Result;
use crate::player::{Player, Position};

/// Composite scores are compared at this resolution so floating-point noise
/// never decides an order the tie-breaks should.
const SCORE_QUANTUM: f64 = 1e9;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Value,
    Projection,
    Scarcity,
    Risk,
}

impl Factor {
    pub fn label(&self) -> &'static str {
        match self {
            Factor::Value => "value",
            Factor::Projection => "projection",
            Factor::Scarcity => "scarcity",
            Factor::Risk => "risk",
        }
    }
}

/// One factor's share of a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorContribution {
    pub factor: Factor,
    /// The normalized sub-score before weighting.
    pub raw: f64,
    pub weight: f64,
    /// `raw * weight`.
    pub weighted: f64,
}

/// A candidate with its composite score and how it was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlayer {
    pub player: Player,
    pub score: f64,
    /// One entry per factor, in `Factor` order.
    pub breakdown: Vec<FactorContribution>,
    /// `current_pick - adp`: positive when the player has slid past ADP.
    pub adp_delta: f64,
    /// Slid at least the configured threshold past ADP.
    pub fallen: bool,
    /// Would fill one of the user's open starting slots.
    pub fills_need: bool,
    pub urgency: ScarcityUrgency,
}

impl RankedPlayer {
    pub fn contribution(&self, factor: Factor) -> Option<&FactorContribution> {
        self.breakdown.iter().find(|c| c.factor == factor)
    }
}

// ---------------------------------------------------------------------------
// Sub-scores
// ---------------------------------------------------------------------------

/// ADP relative to the current pick, mapped into `0.0..=1.0`.
///
/// A player whose ADP equals the current pick scores 0.5; one full round of
/// slide in either direction moves the score by 0.5.
pub fn value_score(adp: f64, current_pick: u32, team_count: usize) -> f64 {
    let span = 2.0 * team_count.max(1) as f64;
    (0.5 + (current_pick as f64 - adp) / span).clamp(0.0, 1.0)
}

/// `-(risk / tolerance)`.
pub fn risk_score(risk: f64, tolerance: RiskTolerance) -> f64 {
    -(risk * tolerance.penalty_factor())
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Rank every undrafted player for `user_team` with default normalization
/// and fallen threshold.
///
/// Fails with `InvalidWeights` on bad weights and `UnknownTeam` if
/// `user_team` is not in the draft. An exhausted pool yields an empty list.
pub fn rank(
    catalog: &PlayerCatalog,
    state: &DraftState,
    user_team: &TeamId,
    weights: &ScoringWeights,
    risk_tolerance: RiskTolerance,
) -> Result<Vec<RankedPlayer>> {
    let config = ScoringConfig {
        weights: *weights,
        risk_tolerance,
        ..ScoringConfig::default()
    };
    rank_with(catalog, state, user_team, &config)
}

/// `rank` with a full scoring configuration.
pub fn rank_with(
    catalog: &PlayerCatalog,
    state: &DraftState,
    user_team: &TeamId,
    config: &ScoringConfig,
) -> Result<Vec<RankedPlayer>> {
    config.validate()?;

    let undrafted = catalog.undrafted(state);
    if undrafted.is_empty() {
        debug!("No undrafted players left to rank");
        return Ok(Vec::new());
    }

    let current_pick = state.next_pick_number();
    let team_count = state.order().team_count();
    let needs = state.needs(user_team)?;

    let scarcity: HashMap<Position, PositionScarcity> =
        compute_scarcity(state, &undrafted, user_team, current_pick)?
            .into_iter()
            .map(|e| (e.position, e))
            .collect();

    let mut by_position: HashMap<Position, Vec<f64>> = HashMap::new();
    for p in &undrafted {
        by_position.entry(p.position).or_default().push(p.projection);
    }
    let stats: HashMap<Position, PoolStats> = by_position
        .into_iter()
        .map(|(pos, values)| (pos, compute_pool_stats(&values)))
        .collect();

    let fallen_threshold = config.fallen_threshold.unwrap_or(team_count as f64);
    let weights = &config.weights;

    let mut ranked: Vec<RankedPlayer> = undrafted
        .into_iter()
        .map(|player| {
            let pos_stats = stats
                .get(&player.position)
                .copied()
                .unwrap_or_else(|| compute_pool_stats(&[]));
            let pos_scarcity = scarcity.get(&player.position);

            let raw = [
                (Factor::Value, value_score(player.adp, current_pick, team_count), weights.value),
                (
                    Factor::Projection,
                    config.normalization.apply(player.projection, &pos_stats),
                    weights.projection,
                ),
                (
                    Factor::Scarcity,
                    pos_scarcity.map(|s| s.score).unwrap_or(0.0),
                    weights.scarcity,
                ),
                (Factor::Risk, risk_score(player.risk, config.risk_tolerance), weights.risk),
            ];

            let breakdown: Vec<FactorContribution> = raw
                .into_iter()
                .map(|(factor, raw, weight)| FactorContribution {
                    factor,
                    raw,
                    weight,
                    weighted: raw * weight,
                })
                .collect();
            let score: f64 = breakdown.iter().map(|c| c.weighted).sum();
            let adp_delta = current_pick as f64 - player.adp;

            RankedPlayer {
                player: player.clone(),
                score,
                breakdown,
                adp_delta,
                fallen: adp_delta >= fallen_threshold,
                fills_need: needs.fills_starter(player.position),
                urgency: pos_scarcity
                    .map(|s| s.urgency)
                    .unwrap_or(ScarcityUrgency::Low),
            }
        })
        .collect();

    ranked.sort_by(compare_ranked);

    if let Some(top) = ranked.first() {
        debug!(
            "Ranked {} players for {} at pick #{}; top: {} ({:.3})",
            ranked.len(),
            user_team,
            current_pick,
            top.player.name,
            top.score
        );
    }

    Ok(ranked)
}

/// Composite desc, projection desc, ADP asc, identifier asc.
fn compare_ranked(a: &RankedPlayer, b: &RankedPlayer) -> Ordering {
    quantize(b.score)
        .total_cmp(&quantize(a.score))
        .then_with(|| b.player.projection.total_cmp(&a.player.projection))
        .then_with(|| a.player.adp.total_cmp(&b.player.adp))
        .then_with(|| a.player.id.cmp(&b.player.id))
}

// Stays in f64: weights are unbounded, so an integer cast could saturate.
fn quantize(score: f64) -> f64 {
    (score * SCORE_QUANTUM).round()
}
