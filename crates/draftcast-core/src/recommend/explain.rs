// Human-readable justification fields for a recommendation.
//
// Structured fields only. Turning them into prose is the narration layer's job.

use serde::{Deserialize, Serialize};

use super::engine::Recommendation;
use crate::player::{PlayerId, Position};
use crate::scoring::rank::{Factor, RankedPlayer};
use crate::scoring::scarcity::ScarcityUrgency;

/// Risk at or above this is called out as volatile.
const HIGH_RISK: f64 = 0.5;

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// Projection tier of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerTier {
    Elite,
    Good,
    Average,
    BelowAverage,
}

impl PlayerTier {
    /// Elite > 250, good > 200, average > 150 projected points.
    pub fn from_projection(projection: f64) -> Self {
        if projection > 250.0 {
            PlayerTier::Elite
        } else if projection > 200.0 {
            PlayerTier::Good
        } else if projection > 150.0 {
            PlayerTier::Average
        } else {
            PlayerTier::BelowAverage
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlayerTier::Elite => "elite",
            PlayerTier::Good => "good",
            PlayerTier::Average => "average",
            PlayerTier::BelowAverage => "below_average",
        }
    }
}

// ---------------------------------------------------------------------------
// Explanation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationFlag {
    /// Slid well past ADP.
    ValuePick,
    /// Fills an open starting slot.
    FillsNeed,
    /// Position is about to run dry.
    ScarcePosition,
    HighRisk,
}

impl ExplanationFlag {
    pub fn label(&self) -> &'static str {
        match self {
            ExplanationFlag::ValuePick => "value pick",
            ExplanationFlag::FillsNeed => "fills need",
            ExplanationFlag::ScarcePosition => "scarce position",
            ExplanationFlag::HighRisk => "high risk",
        }
    }
}

/// One factor's contribution, with its share of the total magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorLine {
    pub factor: Factor,
    pub raw: f64,
    pub weight: f64,
    pub weighted: f64,
    /// `|weighted|` over the sum of `|weighted|` across factors; 0 when all
    /// contributions are zero.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// 1-indexed position in the recommendation.
    pub rank: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub position: Position,
    pub team: String,
    pub score: f64,
    pub tier: PlayerTier,
    pub flags: Vec<ExplanationFlag>,
    /// Never empty.
    pub factors: Vec<FactorLine>,
    pub reasons: Vec<String>,
}

impl Explanation {
    /// Single-line summary for plain-text output.
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "{}. {} ({}, {}) score {:.3} [{}]",
            self.rank,
            self.name,
            self.position,
            self.team,
            self.score,
            self.tier.label()
        );
        if !self.flags.is_empty() {
            let flags: Vec<&str> = self.flags.iter().map(|f| f.label()).collect();
            line.push_str(&format!(" {}", flags.join(", ")));
        }
        line
    }
}

/// Map each candidate's factor breakdown to justification fields.
///
/// Candidates with an empty breakdown are dropped, so every returned entry
/// carries at least one factor line. `rank` is the candidate's position in
/// the recommendation, gaps included.
pub fn explain(recommendation: &Recommendation) -> Vec<Explanation> {
    recommendation
        .candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.breakdown.is_empty())
        .map(|(i, c)| explain_candidate(i + 1, c))
        .collect()
}

fn explain_candidate(rank: usize, candidate: &RankedPlayer) -> Explanation {
    let player = &candidate.player;

    let magnitude: f64 = candidate.breakdown.iter().map(|c| c.weighted.abs()).sum();
    let factors = candidate
        .breakdown
        .iter()
        .map(|c| FactorLine {
            factor: c.factor,
            raw: c.raw,
            weight: c.weight,
            weighted: c.weighted,
            share: if magnitude > 0.0 {
                c.weighted.abs() / magnitude
            } else {
                0.0
            },
        })
        .collect();

    let scarce = candidate
        .contribution(Factor::Scarcity)
        .is_some_and(|c| c.raw > 0.0)
        && matches!(
            candidate.urgency,
            ScarcityUrgency::Critical | ScarcityUrgency::High
        );

    let mut flags = Vec::new();
    if candidate.fallen {
        flags.push(ExplanationFlag::ValuePick);
    }
    if candidate.fills_need {
        flags.push(ExplanationFlag::FillsNeed);
    }
    if scarce {
        flags.push(ExplanationFlag::ScarcePosition);
    }
    if player.risk >= HIGH_RISK {
        flags.push(ExplanationFlag::HighRisk);
    }

    let tier = PlayerTier::from_projection(player.projection);

    let mut reasons = Vec::new();
    if candidate.adp_delta >= 0.0 {
        reasons.push(format!(
            "Available {:.1} picks after ADP {:.1}",
            candidate.adp_delta, player.adp
        ));
    } else {
        reasons.push(format!(
            "ADP {:.1} is {:.1} picks away",
            player.adp, -candidate.adp_delta
        ));
    }
    reasons.push(format!(
        "{:.1} projected points ({} {})",
        player.projection,
        tier.label(),
        player.position
    ));
    if candidate.fills_need {
        reasons.push(format!("Fills an open {} starting slot", player.position));
    }
    if scarce {
        reasons.push(format!(
            "{} supply is {} before your next pick",
            player.position,
            candidate.urgency.label()
        ));
    }
    if player.risk >= HIGH_RISK {
        reasons.push(format!("Volatile: risk {:.2}", player.risk));
    }

    Explanation {
        rank,
        player_id: player.id.clone(),
        name: player.name.clone(),
        position: player.position,
        team: player.team.clone(),
        score: candidate.score,
        tier,
        flags,
        factors,
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::pick::TeamId;
    use crate::draft::roster::{RosterNeeds, RosterRequirements};
    use crate::player::Player;
    use crate::recommend::strategy::{DraftStrategy, StrategyAdvice};
    use crate::scoring::rank::FactorContribution;

    fn make_candidate(id: &str, projection: f64, risk: f64, breakdown: Vec<FactorContribution>) -> RankedPlayer {
        let score: f64 = breakdown.iter().map(|c| c.weighted).sum();
        RankedPlayer {
            player: Player {
                id: PlayerId::from(id),
                name: format!("Player {id}"),
                position: Position::WideReceiver,
                team: "TST".into(),
                adp: 12.0,
                projection,
                risk,
            },
            score,
            breakdown,
            adp_delta: 5.0,
            fallen: true,
            fills_need: true,
            urgency: ScarcityUrgency::Critical,
        }
    }

    fn contribution(factor: Factor, raw: f64, weight: f64) -> FactorContribution {
        FactorContribution {
            factor,
            raw,
            weight,
            weighted: raw * weight,
        }
    }

    fn make_recommendation(candidates: Vec<RankedPlayer>) -> Recommendation {
        Recommendation {
            pick_number: 17,
            round: 2,
            team: TeamId::from("A"),
            candidates,
            needs: RosterNeeds::compute(std::iter::empty(), &RosterRequirements::standard()),
            scarcity: Vec::new(),
            advice: StrategyAdvice {
                strategy: DraftStrategy::Balanced,
                position_priorities: Vec::new(),
                insights: Vec::new(),
            },
        }
    }

    #[test]
    fn tiers_from_projection() {
        assert_eq!(PlayerTier::from_projection(251.0), PlayerTier::Elite);
        assert_eq!(PlayerTier::from_projection(250.0), PlayerTier::Good);
        assert_eq!(PlayerTier::from_projection(175.0), PlayerTier::Average);
        assert_eq!(PlayerTier::from_projection(150.0), PlayerTier::BelowAverage);
    }

    #[test]
    fn explanation_carries_flags_and_factors() {
        let rec = make_recommendation(vec![make_candidate(
            "w1",
            260.0,
            0.7,
            vec![
                contribution(Factor::Value, 0.75, 1.0),
                contribution(Factor::Projection, 1.0, 1.0),
                contribution(Factor::Scarcity, 1.0, 1.0),
                contribution(Factor::Risk, -0.7, 1.0),
            ],
        )]);
        let out = explain(&rec);
        assert_eq!(out.len(), 1);
        let e = &out[0];
        assert_eq!(e.rank, 1);
        assert_eq!(e.tier, PlayerTier::Elite);
        assert_eq!(
            e.flags,
            vec![
                ExplanationFlag::ValuePick,
                ExplanationFlag::FillsNeed,
                ExplanationFlag::ScarcePosition,
                ExplanationFlag::HighRisk,
            ]
        );
        assert_eq!(e.factors.len(), 4);
        let share_sum: f64 = e.factors.iter().map(|f| f.share).sum();
        assert!((share_sum - 1.0).abs() < 1e-9);
        assert!(e.reasons[0].starts_with("Available 5.0 picks after ADP"));
        assert!(e.summary_line().contains("value pick, fills need"));
    }

    #[test]
    fn empty_breakdown_is_dropped_without_renumbering() {
        let rec = make_recommendation(vec![
            make_candidate("w1", 200.0, 0.0, Vec::new()),
            make_candidate("w2", 190.0, 0.0, vec![contribution(Factor::Value, 0.5, 1.0)]),
        ]);
        let out = explain(&rec);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].player_id, PlayerId::from("w2"));
        // w2 is still second in the recommendation.
        assert_eq!(out[0].rank, 2);
        assert_eq!(rec.candidates[out[0].rank - 1].player.id, out[0].player_id);
        assert!(out.iter().all(|e| !e.factors.is_empty()));
    }

    #[test]
    fn all_zero_contributions_have_zero_share() {
        let rec = make_recommendation(vec![make_candidate(
            "w1",
            100.0,
            0.0,
            vec![contribution(Factor::Scarcity, 0.0, 1.0)],
        )]);
        let out = explain(&rec);
        assert_eq!(out[0].factors[0].share, 0.0);
        assert!(!out[0].flags.contains(&ExplanationFlag::ScarcePosition));
    }
}
