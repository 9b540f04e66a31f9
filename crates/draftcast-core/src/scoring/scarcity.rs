// Positional scarcity for the drafting team.
//
// For each position, compares how many viable players remain (supply) with
// how many of them the other teams are expected to take before the user
// picks again (demand). A position the user needs that is about to run dry
// scores close to 1.0; a position the user does not need scores 0.0.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::draft::pick::TeamId;
use crate::draft::state::DraftState;
use crate::error::Result;
use crate::player::{Player, Position, ALL_POSITIONS};

/// Need weight for a position the user only needs for a FLEX slot.
pub const FLEX_NEED_WEIGHT: f64 = 0.5;

// ---------------------------------------------------------------------------
// Scarcity urgency levels
// ---------------------------------------------------------------------------

/// How urgently a position needs to be addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScarcityUrgency {
    /// 0-2 viable players left after expected demand: act now or miss out.
    Critical,
    /// 3-4 left: should address soon.
    High,
    /// 5-7 left: comfortable window.
    Medium,
    /// 8+ left: no rush.
    Low,
}

impl ScarcityUrgency {
    /// Determine urgency from the number of viable players expected to
    /// survive until the user's next pick.
    pub fn from_count(remaining: usize) -> Self {
        match remaining {
            0..=2 => ScarcityUrgency::Critical,
            3..=4 => ScarcityUrgency::High,
            5..=7 => ScarcityUrgency::Medium,
            _ => ScarcityUrgency::Low,
        }
    }

    /// Return a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ScarcityUrgency::Critical => "CRITICAL",
            ScarcityUrgency::High => "HIGH",
            ScarcityUrgency::Medium => "MEDIUM",
            ScarcityUrgency::Low => "LOW",
        }
    }
}

// ---------------------------------------------------------------------------
// Scarcity entry
// ---------------------------------------------------------------------------

/// Scarcity analysis for a single position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionScarcity {
    pub position: Position,
    /// 1.0 for an open dedicated slot, `FLEX_NEED_WEIGHT` for a FLEX-only
    /// need, 0.0 otherwise.
    pub need_weight: f64,
    /// Undrafted players at this position with a positive projection.
    pub supply: usize,
    /// Players at this position the other teams still need and have picks
    /// to take before the user's next turn.
    pub demand: usize,
    /// Scarcity sub-score in `0.0..=1.0`.
    pub score: f64,
    pub urgency: ScarcityUrgency,
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Compute scarcity for every position from the perspective of `user_team`
/// drafting at `current_pick`.
///
/// For each position:
/// 1. Weight the user's need (dedicated, FLEX-only, or none).
/// 2. Count viable undrafted players (supply).
/// 3. For each other team, count its picks strictly between `current_pick`
///    and the user's next pick, capped by its open dedicated slots (demand).
/// 4. Score = need_weight * min((demand + 1) / supply, 1.0), or 0.0 when
///    the user has no need or nothing is left.
///
/// Fails only if `user_team` is not in the draft.
pub fn compute_scarcity(
    state: &DraftState,
    undrafted: &[&Player],
    user_team: &TeamId,
    current_pick: u32,
) -> Result<Vec<PositionScarcity>> {
    let user_needs = state.needs(user_team)?;
    let window = picks_before_next_turn(state, user_team, current_pick);

    let mut other_needs = Vec::with_capacity(window.len());
    for (team, picks) in &window {
        other_needs.push((state.needs(team)?, *picks));
    }

    let entries = ALL_POSITIONS
        .iter()
        .map(|&pos| {
            let need_weight = if user_needs.need(pos) > 0 {
                1.0
            } else if pos.is_flex_eligible() && user_needs.flex_deficit > 0 {
                FLEX_NEED_WEIGHT
            } else {
                0.0
            };

            let supply = undrafted
                .iter()
                .filter(|p| p.position == pos && p.projection > 0.0)
                .count();

            let demand: usize = other_needs
                .iter()
                .map(|(needs, picks)| needs.need(pos).min(*picks))
                .sum();

            let score = if need_weight == 0.0 || supply == 0 {
                0.0
            } else {
                let depletion = ((demand + 1) as f64 / supply as f64).min(1.0);
                need_weight * depletion
            };

            PositionScarcity {
                position: pos,
                need_weight,
                supply,
                demand,
                score,
                urgency: ScarcityUrgency::from_count(supply.saturating_sub(demand)),
            }
        })
        .collect();

    Ok(entries)
}

/// Picks each other team holds between `current_pick` and the user's next
/// pick (exclusive on both ends), clipped to the end of the draft.
fn picks_before_next_turn(
    state: &DraftState,
    user_team: &TeamId,
    current_pick: u32,
) -> Vec<(TeamId, usize)> {
    let order = state.order();
    let last_pick = state.config().total_picks() as u32;
    let window_end = order
        .next_pick_for(user_team, current_pick)
        .map(|p| p.min(last_pick + 1))
        .unwrap_or(last_pick + 1);

    let mut counts: HashMap<TeamId, usize> = HashMap::new();
    for pick in current_pick + 1..window_end {
        *counts.entry(order.slot_for_pick(pick).team).or_insert(0) += 1;
    }

    // Draft order keeps the result deterministic.
    order
        .teams()
        .iter()
        .filter(|t| *t != user_team)
        .filter_map(|t| counts.get(t).map(|&n| (t.clone(), n)))
        .collect()
}
