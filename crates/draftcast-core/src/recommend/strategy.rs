// Draft-strategy hints derived from the round and the user's roster.
//
// Hints ride along with a recommendation. They never change the ranking.

use serde::{Deserialize, Serialize};

use crate::draft::roster::RosterNeeds;
use crate::player::{Player, Position};
use crate::scoring::scarcity::PositionScarcity;

/// Positions that get a priority entry. K and DST are left to the last rounds.
const SKILL_POSITIONS: [Position; 4] = [
    Position::Quarterback,
    Position::RunningBack,
    Position::WideReceiver,
    Position::TightEnd,
];

/// Last round of the early phase.
const EARLY_ROUNDS_END: u32 = 3;
/// Last round of the middle phase.
const MIDDLE_ROUNDS_END: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStrategy {
    /// No RB yet in the early rounds: load up on WR/TE.
    ZeroRb,
    /// One anchor RB, then build WR depth.
    HeroRb,
    /// Grab a top TE while the tier lasts.
    EliteTe,
    /// Best player available.
    Balanced,
}

impl DraftStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            DraftStrategy::ZeroRb => "Zero RB",
            DraftStrategy::HeroRb => "Hero RB",
            DraftStrategy::EliteTe => "Elite TE",
            DraftStrategy::Balanced => "Balanced",
        }
    }

    /// Pick a strategy from the round and the positions already rostered.
    pub fn determine(round: u32, needs: &RosterNeeds) -> Self {
        let rostered = |pos: Position| needs.positions.get(&pos).map(|n| n.rostered).unwrap_or(0);

        if round <= EARLY_ROUNDS_END {
            if rostered(Position::RunningBack) == 0 {
                DraftStrategy::ZeroRb
            } else if rostered(Position::WideReceiver) == 0 {
                DraftStrategy::HeroRb
            } else {
                DraftStrategy::Balanced
            }
        } else if round <= MIDDLE_ROUNDS_END {
            if rostered(Position::TightEnd) == 0 {
                DraftStrategy::EliteTe
            } else {
                DraftStrategy::Balanced
            }
        } else {
            DraftStrategy::Balanced
        }
    }
}

/// Strategy, position priorities, and short insight lines for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyAdvice {
    pub strategy: DraftStrategy,
    /// Skill positions, most pressing first.
    pub position_priorities: Vec<Position>,
    pub insights: Vec<String>,
}

/// Build strategy advice for the user at `round`.
pub fn advise<'a, I>(
    round: u32,
    roster: I,
    needs: &RosterNeeds,
    scarcity: &[PositionScarcity],
) -> StrategyAdvice
where
    I: IntoIterator<Item = &'a Player>,
{
    let roster_size = roster.into_iter().count();
    let strategy = DraftStrategy::determine(round, needs);

    StrategyAdvice {
        strategy,
        position_priorities: position_priorities(round, needs, scarcity),
        insights: insights(round, roster_size, needs),
    }
}

/// Order skill positions by need, then scarcity, with small round bonuses
/// (RB/WR early, TE in the middle rounds, QB late).
pub fn position_priorities(
    round: u32,
    needs: &RosterNeeds,
    scarcity: &[PositionScarcity],
) -> Vec<Position> {
    let mut scored: Vec<(Position, f64)> = SKILL_POSITIONS
        .iter()
        .map(|&pos| {
            let need = needs.positions.get(&pos);
            let mut score = match need {
                Some(n) if n.deficit > 0 => 10.0,
                Some(n) if n.required > 0 && n.rostered == n.required => 5.0,
                _ => 0.0,
            };

            score += scarcity
                .iter()
                .find(|s| s.position == pos)
                .map(|s| s.score * 5.0)
                .unwrap_or(0.0);

            score += match pos {
                Position::RunningBack | Position::WideReceiver if round <= EARLY_ROUNDS_END => 3.0,
                Position::TightEnd if round > EARLY_ROUNDS_END && round <= 6 => 2.0,
                Position::Quarterback if round > MIDDLE_ROUNDS_END => 1.0,
                _ => 0.0,
            };

            (pos, score)
        })
        .collect();

    // Stable: equal scores keep QB, RB, WR, TE order.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.into_iter().map(|(pos, _)| pos).collect()
}

fn insights(round: u32, roster_size: usize, needs: &RosterNeeds) -> Vec<String> {
    let mut lines = Vec::new();
    let rostered = |pos: Position| needs.positions.get(&pos).map(|n| n.rostered).unwrap_or(0);

    if round <= EARLY_ROUNDS_END {
        if rostered(Position::RunningBack) == 0 {
            lines.push("Consider Zero RB: focus on elite WRs and TE".to_string());
        } else if rostered(Position::WideReceiver) == 0 {
            lines.push("Consider Hero RB: build WR depth around your RB".to_string());
        }
    } else if round <= MIDDLE_ROUNDS_END {
        if needs.need(Position::TightEnd) > 0 {
            lines.push("TE premium: an elite TE is a positional edge".to_string());
        }
        if needs.need(Position::Quarterback) > 0 {
            lines.push("QB can wait: focus on RB/WR depth first".to_string());
        }
    } else {
        lines.push("Late rounds: target high-upside players and handcuffs".to_string());
    }

    if roster_size < 5 {
        lines.push("Early in the draft: build a foundation with safe picks".to_string());
    } else if roster_size > 10 {
        lines.push("Deep in the draft: take shots on sleepers".to_string());
    }

    for (pos, need) in &needs.positions {
        if need.deficit > 0 {
            lines.push(format!("Need {} more {}", need.deficit, pos));
        } else if need.surplus > 0 {
            lines.push(format!("{} extra {}", need.surplus, pos));
        }
    }

    lines
}
