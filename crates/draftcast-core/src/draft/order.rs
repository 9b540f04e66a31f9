// Draft order and turn detection.
//
// Pick number -> (round, team) is a pure function of the team list and the
// snake flag. Nothing here looks at timestamps or mutable session state.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::pick::TeamId;
use super::state::DraftState;
use crate::error::{DraftError, Result};

/// The ordered team list for round 1, plus whether rounds alternate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOrder {
    teams: Vec<TeamId>,
    snake: bool,
}

/// Where a given pick falls in the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSlot {
    pub pick_number: u32,
    /// 1-indexed round.
    pub round: u32,
    /// 1-indexed position within the round, after snake reversal.
    pub pick_in_round: u32,
    pub team: TeamId,
}

impl DraftOrder {
    /// Create a draft order. Fails on an empty or duplicated team list.
    pub fn new(teams: Vec<TeamId>, snake: bool) -> Result<Self> {
        if teams.is_empty() {
            return Err(DraftError::validation("order.teams", "must not be empty"));
        }
        let mut seen = HashSet::new();
        for team in &teams {
            if team.as_str().trim().is_empty() {
                return Err(DraftError::validation("order.teams", "team id must not be blank"));
            }
            if !seen.insert(team) {
                return Err(DraftError::validation(
                    "order.teams",
                    format!("team '{team}' appears more than once"),
                ));
            }
        }
        Ok(DraftOrder { teams, snake })
    }

    pub fn teams(&self) -> &[TeamId] {
        &self.teams
    }

    pub fn is_snake(&self) -> bool {
        self.snake
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn contains(&self, team: &TeamId) -> bool {
        self.teams.contains(team)
    }

    /// Resolve a 1-indexed pick number to its round and team.
    ///
    /// Odd rounds follow the configured order; even rounds run in reverse
    /// when `snake` is set. A pick number of 0 is treated as pick 1.
    pub fn slot_for_pick(&self, pick_number: u32) -> TurnSlot {
        let n = self.teams.len() as u32;
        let idx = pick_number.max(1) - 1;
        let round = idx / n + 1;
        let offset = idx % n;
        let team_idx = self.team_index_in_round(round, offset);

        TurnSlot {
            pick_number: idx + 1,
            round,
            pick_in_round: offset + 1,
            team: self.teams[team_idx as usize].clone(),
        }
    }

    /// The first pick number strictly after `after_pick` that belongs to
    /// `team`. Returns `None` for a team not in the order.
    pub fn next_pick_for(&self, team: &TeamId, after_pick: u32) -> Option<u32> {
        let team_idx = self.teams.iter().position(|t| t == team)? as u32;
        let n = self.teams.len() as u32;
        let start_round = after_pick / n + 1;

        // A team picks once per round, so the answer is at most one round past
        // the round containing `after_pick + 1`.
        (start_round..=start_round + 1)
            .map(|round| {
                let offset = self.offset_in_round(round, team_idx);
                (round - 1) * n + offset + 1
            })
            .find(|&pick| pick > after_pick)
    }

    fn team_index_in_round(&self, round: u32, offset: u32) -> u32 {
        let n = self.teams.len() as u32;
        if self.snake && round % 2 == 0 {
            n - 1 - offset
        } else {
            offset
        }
    }

    fn offset_in_round(&self, round: u32, team_idx: u32) -> u32 {
        // The reversal is its own inverse.
        self.team_index_in_round(round, team_idx)
    }
}

/// Whose turn it is for the next pick of `state`.
///
/// Pure: maps `state.history().len() + 1` through `order`.
pub fn next_team(state: &DraftState, order: &DraftOrder) -> TurnSlot {
    order.slot_for_pick(state.history().len() as u32 + 1)
}

/// Whether the next pick belongs to `user_team`. Always false once the
/// draft is complete.
pub fn is_user_turn(state: &DraftState, order: &DraftOrder, user_team: &TeamId) -> bool {
    !state.is_complete() && next_team(state, order).team == *user_team
}
