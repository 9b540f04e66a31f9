// Roster requirements, positional needs, and lineup slot assignment.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DraftError, Result};
use crate::player::{Player, Position, ALL_POSITIONS};

/// A slot kind in the league's roster configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum RosterSlot {
    /// A dedicated starting slot for one position.
    Position(Position),
    /// A starting slot any RB/WR/TE can fill.
    Flex,
    Bench,
}

impl RosterSlot {
    /// Parse a roster config key ("QB", "FLEX", "BE", ...).
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_uppercase().as_str() {
            "FLEX" | "W/R/T" | "RB/WR/TE" => Some(RosterSlot::Flex),
            "BE" | "BN" | "BENCH" => Some(RosterSlot::Bench),
            other => Position::from_str_pos(other).map(RosterSlot::Position),
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            RosterSlot::Position(p) => p.display_str(),
            RosterSlot::Flex => "FLEX",
            RosterSlot::Bench => "BE",
        }
    }

    /// Whether a player at `position` may sit in this slot.
    pub fn accepts(&self, position: Position) -> bool {
        match self {
            RosterSlot::Position(p) => *p == position,
            RosterSlot::Flex => position.is_flex_eligible(),
            RosterSlot::Bench => true,
        }
    }
}

impl fmt::Display for RosterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

impl From<RosterSlot> for String {
    fn from(slot: RosterSlot) -> String {
        slot.display_str().to_string()
    }
}

impl TryFrom<String> for RosterSlot {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        RosterSlot::from_key(&s).ok_or_else(|| format!("unknown roster slot '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// Requirements
// ---------------------------------------------------------------------------

/// How many of each slot kind a team must fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRequirements {
    slots: BTreeMap<RosterSlot, usize>,
}

impl RosterRequirements {
    /// Build requirements from a config table such as
    /// `{"QB": 1, "RB": 2, "WR": 2, "TE": 1, "FLEX": 1, "K": 1, "DST": 1, "BE": 6}`.
    ///
    /// Unknown keys are rejected rather than ignored.
    pub fn from_config(table: &HashMap<String, usize>) -> Result<Self> {
        let mut slots = BTreeMap::new();
        for (key, &count) in table {
            let slot = RosterSlot::from_key(key).ok_or_else(|| {
                DraftError::validation(
                    format!("roster.{key}"),
                    "not a recognized position, FLEX, or BE slot",
                )
            })?;
            *slots.entry(slot).or_insert(0) += count;
        }
        Ok(RosterRequirements { slots })
    }

    /// The common one-QB league: 1 QB, 2 RB, 2 WR, 1 TE, 1 FLEX, 1 K,
    /// 1 DST, 6 bench.
    pub fn standard() -> Self {
        let slots = [
            (RosterSlot::Position(Position::Quarterback), 1),
            (RosterSlot::Position(Position::RunningBack), 2),
            (RosterSlot::Position(Position::WideReceiver), 2),
            (RosterSlot::Position(Position::TightEnd), 1),
            (RosterSlot::Flex, 1),
            (RosterSlot::Position(Position::Kicker), 1),
            (RosterSlot::Position(Position::Defense), 1),
            (RosterSlot::Bench, 6),
        ]
        .into_iter()
        .collect();
        RosterRequirements { slots }
    }

    pub fn count(&self, slot: RosterSlot) -> usize {
        self.slots.get(&slot).copied().unwrap_or(0)
    }

    pub fn required(&self, position: Position) -> usize {
        self.count(RosterSlot::Position(position))
    }

    /// Total number of slots, starters and bench.
    pub fn total_slots(&self) -> usize {
        self.slots.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RosterSlot, usize)> + '_ {
        self.slots.iter().map(|(&slot, &count)| (slot, count))
    }
}

// ---------------------------------------------------------------------------
// Needs
// ---------------------------------------------------------------------------

/// Fill status of one position's dedicated slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionNeed {
    pub required: usize,
    /// Players on the roster at this position (may exceed `required`).
    pub rostered: usize,
    /// `max(0, required - rostered)`.
    pub deficit: usize,
    /// `max(0, rostered - required)`.
    pub surplus: usize,
}

/// Unmet roster slots for one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterNeeds {
    pub positions: BTreeMap<Position, PositionNeed>,
    /// FLEX slots still open after dedicated slots absorb their players.
    pub flex_deficit: usize,
    /// Bench slots still open after starters are filled.
    pub bench_deficit: usize,
}

impl RosterNeeds {
    /// Derive needs from a roster's positions. Never negative by construction.
    pub fn compute<'a, I>(roster: I, requirements: &RosterRequirements) -> Self
    where
        I: IntoIterator<Item = &'a Player>,
    {
        let mut counts: BTreeMap<Position, usize> = BTreeMap::new();
        for player in roster {
            *counts.entry(player.position).or_insert(0) += 1;
        }

        let mut positions = BTreeMap::new();
        let mut flex_overflow = 0usize;
        let mut other_overflow = 0usize;

        for pos in ALL_POSITIONS {
            let required = requirements.required(pos);
            let rostered = counts.get(&pos).copied().unwrap_or(0);
            let surplus = rostered.saturating_sub(required);
            if pos.is_flex_eligible() {
                flex_overflow += surplus;
            } else {
                other_overflow += surplus;
            }
            positions.insert(
                pos,
                PositionNeed {
                    required,
                    rostered,
                    deficit: required.saturating_sub(rostered),
                    surplus,
                },
            );
        }

        let flex_required = requirements.count(RosterSlot::Flex);
        let flex_filled = flex_overflow.min(flex_required);
        let bench_candidates = (flex_overflow - flex_filled) + other_overflow;

        RosterNeeds {
            positions,
            flex_deficit: flex_required - flex_filled,
            bench_deficit: requirements
                .count(RosterSlot::Bench)
                .saturating_sub(bench_candidates),
        }
    }

    /// Open dedicated slots at a position.
    pub fn need(&self, position: Position) -> usize {
        self.positions.get(&position).map(|n| n.deficit).unwrap_or(0)
    }

    pub fn surplus(&self, position: Position) -> usize {
        self.positions.get(&position).map(|n| n.surplus).unwrap_or(0)
    }

    /// Whether drafting a player at `position` would fill a starting slot,
    /// dedicated or FLEX.
    pub fn fills_starter(&self, position: Position) -> bool {
        self.need(position) > 0 || (position.is_flex_eligible() && self.flex_deficit > 0)
    }

    /// Total unfilled starting slots.
    pub fn starter_deficit(&self) -> usize {
        self.positions.values().map(|n| n.deficit).sum::<usize>() + self.flex_deficit
    }
}

// ---------------------------------------------------------------------------
// Lineup
// ---------------------------------------------------------------------------

/// A player placed into a roster slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupEntry {
    pub slot: RosterSlot,
    pub player: Player,
}

/// A team's roster arranged into slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lineup {
    /// Starting slots, in slot order.
    pub starters: Vec<LineupEntry>,
    pub bench: Vec<Player>,
    /// Players that fit no remaining slot.
    pub overflow: Vec<Player>,
    /// Sum of starter projections.
    pub starter_projection: f64,
}

impl Lineup {
    /// Place players into slots, highest projection first.
    ///
    /// Slot assignment priority:
    /// 1. Dedicated position slot
    /// 2. FLEX (RB/WR/TE only)
    /// 3. Bench
    pub fn assign<'a, I>(roster: I, requirements: &RosterRequirements) -> Self
    where
        I: IntoIterator<Item = &'a Player>,
    {
        let mut players: Vec<&Player> = roster.into_iter().collect();
        players.sort_by(|a, b| {
            b.projection
                .total_cmp(&a.projection)
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut open: BTreeMap<RosterSlot, usize> = requirements.iter().collect();
        let mut starters = Vec::new();
        let mut bench = Vec::new();
        let mut overflow = Vec::new();

        for player in players {
            let dedicated = RosterSlot::Position(player.position);
            let slot = [dedicated, RosterSlot::Flex, RosterSlot::Bench]
                .into_iter()
                .find(|slot| slot.accepts(player.position) && open.get(slot).is_some_and(|&n| n > 0));

            match slot {
                Some(slot) => {
                    if let Some(n) = open.get_mut(&slot) {
                        *n -= 1;
                    }
                    if slot == RosterSlot::Bench {
                        bench.push(player.clone());
                    } else {
                        starters.push(LineupEntry {
                            slot,
                            player: player.clone(),
                        });
                    }
                }
                None => overflow.push(player.clone()),
            }
        }

        // Stable sort keeps projection order within a slot kind.
        starters.sort_by_key(|e| e.slot);
        let starter_projection = starters.iter().map(|e| e.player.projection).sum();

        Lineup {
            starters,
            bench,
            overflow,
            starter_projection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerId;

    fn make_player(id: &str, position: Position, projection: f64) -> Player {
        Player {
            id: PlayerId::from(id),
            name: id.to_string(),
            position,
            team: "TST".into(),
            adp: 10.0,
            projection,
            risk: 0.0,
        }
    }

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn slot_keys_parse() {
        assert_eq!(RosterSlot::from_key("FLEX"), Some(RosterSlot::Flex));
        assert_eq!(RosterSlot::from_key("w/r/t"), Some(RosterSlot::Flex));
        assert_eq!(RosterSlot::from_key("BN"), Some(RosterSlot::Bench));
        assert_eq!(
            RosterSlot::from_key("DEF"),
            Some(RosterSlot::Position(Position::Defense))
        );
        assert_eq!(RosterSlot::from_key("IR"), None);
    }

    #[test]
    fn requirements_from_config() {
        let mut table = HashMap::new();
        table.insert("QB".to_string(), 1);
        table.insert("RB".to_string(), 2);
        table.insert("FLEX".to_string(), 1);
        table.insert("BE".to_string(), 5);
        let req = RosterRequirements::from_config(&table).unwrap();
        assert_eq!(req.required(Position::Quarterback), 1);
        assert_eq!(req.required(Position::RunningBack), 2);
        assert_eq!(req.required(Position::TightEnd), 0);
        assert_eq!(req.count(RosterSlot::Flex), 1);
        assert_eq!(req.total_slots(), 9);
    }

    #[test]
    fn requirements_reject_unknown_key() {
        let mut table = HashMap::new();
        table.insert("IR".to_string(), 1);
        let err = RosterRequirements::from_config(&table).unwrap_err();
        assert!(matches!(err, DraftError::Validation { .. }));
    }

    #[test]
    fn needs_for_empty_roster_equal_requirements() {
        let req = RosterRequirements::standard();
        let needs = RosterNeeds::compute(std::iter::empty(), &req);
        assert_eq!(needs.need(Position::RunningBack), 2);
        assert_eq!(needs.need(Position::Quarterback), 1);
        assert_eq!(needs.flex_deficit, 1);
        assert_eq!(needs.bench_deficit, 6);
        assert_eq!(needs.starter_deficit(), 9);
    }

    #[test]
    fn needs_never_negative_and_overflow_fills_flex_then_bench() {
        let req = RosterRequirements::standard();
        let roster = vec![
            make_player("r1", Position::RunningBack, 200.0),
            make_player("r2", Position::RunningBack, 190.0),
            make_player("r3", Position::RunningBack, 180.0),
            make_player("r4", Position::RunningBack, 170.0),
            make_player("q1", Position::Quarterback, 300.0),
            make_player("q2", Position::Quarterback, 280.0),
        ];
        let needs = RosterNeeds::compute(&roster, &req);

        assert_eq!(needs.need(Position::RunningBack), 0);
        assert_eq!(needs.surplus(Position::RunningBack), 2);
        assert_eq!(needs.need(Position::Quarterback), 0);
        assert_eq!(needs.surplus(Position::Quarterback), 1);
        // One surplus RB takes the FLEX; the other RB and the backup QB go to the bench.
        assert_eq!(needs.flex_deficit, 0);
        assert_eq!(needs.bench_deficit, 4);
        assert!(!needs.fills_starter(Position::RunningBack));
        assert!(needs.fills_starter(Position::WideReceiver));
    }

    #[test]
    fn fills_starter_via_flex() {
        let mut table = HashMap::new();
        table.insert("WR".to_string(), 1);
        table.insert("FLEX".to_string(), 1);
        let req = RosterRequirements::from_config(&table).unwrap();
        let roster = vec![make_player("w1", Position::WideReceiver, 200.0)];
        let needs = RosterNeeds::compute(&roster, &req);
        assert_eq!(needs.need(Position::WideReceiver), 0);
        assert!(needs.fills_starter(Position::TightEnd));
        assert!(!needs.fills_starter(Position::Kicker));
    }

    #[test]
    fn lineup_assigns_best_players_to_starting_slots() {
        let req = RosterRequirements::standard();
        let roster = vec![
            make_player("r_low", Position::RunningBack, 120.0),
            make_player("r_top", Position::RunningBack, 250.0),
            make_player("r_mid", Position::RunningBack, 180.0),
            make_player("w1", Position::WideReceiver, 210.0),
        ];
        let lineup = Lineup::assign(&roster, &req);

        let starter_ids: Vec<(&str, &str)> = lineup
            .starters
            .iter()
            .map(|e| (e.slot.display_str(), e.player.id.as_str()))
            .collect();
        assert_eq!(
            starter_ids,
            vec![("RB", "r_top"), ("RB", "r_mid"), ("WR", "w1"), ("FLEX", "r_low")]
        );
        assert!(lineup.bench.is_empty());
        assert!(approx_eq(lineup.starter_projection, 760.0, 1e-9));
    }

    #[test]
    fn lineup_overflow_when_no_slot_left() {
        let mut table = HashMap::new();
        table.insert("K".to_string(), 1);
        let req = RosterRequirements::from_config(&table).unwrap();
        let roster = vec![
            make_player("k1", Position::Kicker, 140.0),
            make_player("k2", Position::Kicker, 130.0),
        ];
        let lineup = Lineup::assign(&roster, &req);
        assert_eq!(lineup.starters.len(), 1);
        assert_eq!(lineup.starters[0].player.id.as_str(), "k1");
        assert_eq!(lineup.overflow.len(), 1);
        assert_eq!(lineup.overflow[0].id.as_str(), "k2");
    }

    #[test]
    fn roster_slot_serializes_as_key() {
        let json = serde_json::to_string(&RosterSlot::Flex).unwrap();
        assert_eq!(json, "\"FLEX\"");
        let slot: RosterSlot = serde_json::from_str("\"TE\"").unwrap();
        assert_eq!(slot, RosterSlot::Position(Position::TightEnd));
    }
}
