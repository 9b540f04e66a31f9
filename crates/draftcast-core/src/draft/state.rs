// Draft state: pick history, derived rosters, and the session phase.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::order::{DraftOrder, TurnSlot};
use super::pick::{Pick, TeamId};
use super::roster::{Lineup, RosterNeeds, RosterRequirements};
use crate::catalog::PlayerCatalog;
use crate::error::{DraftError, Result};
use crate::player::{Player, PlayerId};

/// Session setup: who picks when, for how long, and what a full roster is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftConfig {
    pub order: DraftOrder,
    pub rounds: u32,
    pub requirements: RosterRequirements,
}

impl DraftConfig {
    pub fn new(order: DraftOrder, rounds: u32, requirements: RosterRequirements) -> Result<Self> {
        if rounds == 0 {
            return Err(DraftError::validation("rounds", "must be greater than 0"));
        }
        Ok(DraftConfig {
            order,
            rounds,
            requirements,
        })
    }

    /// Total number of picks across all rounds.
    pub fn total_picks(&self) -> usize {
        self.order.team_count() * self.rounds as usize
    }
}

/// Lifecycle of a draft session. Driven only by `apply` and `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftPhase {
    Empty,
    InProgress,
    /// Terminal: no further picks are accepted.
    Complete,
}

/// The authoritative record of one draft session.
#[derive(Debug, Clone)]
pub struct DraftState {
    catalog: Arc<PlayerCatalog>,
    config: Arc<DraftConfig>,
    /// All recorded picks, in pick-number order.
    history: Vec<Pick>,
    /// Drafted player -> team that took them.
    drafted: HashMap<PlayerId, TeamId>,
    /// Team -> drafted players in draft order.
    rosters: HashMap<TeamId, Vec<PlayerId>>,
    complete: bool,
}

impl DraftState {
    /// Create an empty draft state.
    pub fn new(catalog: Arc<PlayerCatalog>, config: Arc<DraftConfig>) -> Self {
        let rosters = config
            .order
            .teams()
            .iter()
            .map(|t| (t.clone(), Vec::new()))
            .collect();

        DraftState {
            catalog,
            config,
            history: Vec::new(),
            drafted: HashMap::new(),
            rosters,
            complete: false,
        }
    }

    /// Rebuild a draft state from an authoritative, ordered pick list.
    ///
    /// Fails on the first pick `apply` would reject; the partially built
    /// state is discarded.
    pub fn replay<I>(catalog: Arc<PlayerCatalog>, config: Arc<DraftConfig>, picks: I) -> Result<Self>
    where
        I: IntoIterator<Item = Pick>,
    {
        let mut state = DraftState::new(catalog, config);
        for pick in picks {
            state.apply(pick)?;
        }
        Ok(state)
    }

    /// Record a pick.
    ///
    /// Validation order:
    /// 1. Draft not complete (`DraftComplete`)
    /// 2. Pick number is exactly the last pick number + 1 (`OutOfOrderPick`)
    /// 3. Team is in the draft order (`UnknownTeam`)
    /// 4. Player exists in the catalog (`NotFound`)
    /// 5. Player is still undrafted (`DuplicateDraft`)
    ///
    /// A rejected pick leaves the state untouched.
    pub fn apply(&mut self, pick: Pick) -> Result<()> {
        if self.complete {
            return Err(DraftError::DraftComplete);
        }

        let expected = self.next_pick_number();
        if pick.pick_number != expected {
            return Err(DraftError::OutOfOrderPick {
                expected,
                got: pick.pick_number,
            });
        }

        if !self.rosters.contains_key(&pick.team) {
            return Err(DraftError::UnknownTeam(pick.team.clone()));
        }

        let player = self.catalog.get(&pick.player)?;

        if let Some(owner) = self.drafted.get(&pick.player) {
            return Err(DraftError::DuplicateDraft {
                player: pick.player.clone(),
                team: owner.clone(),
            });
        }

        // Traded picks are legal; the mismatch is only worth a log line.
        let slot = self.config.order.slot_for_pick(pick.pick_number);
        if slot.team != pick.team {
            warn!(
                "Pick #{} made by {} but the slot belongs to {}",
                pick.pick_number, pick.team, slot.team
            );
        }
        if let Some(prev) = self.history.last() {
            if pick.timestamp < prev.timestamp {
                debug!(
                    "Pick #{} timestamp precedes pick #{}; keeping pick-number order",
                    pick.pick_number, prev.pick_number
                );
            }
        }

        debug!(
            "Recording pick #{}: {} ({}) -> {}",
            pick.pick_number, player.name, player.position, pick.team
        );

        self.drafted.insert(pick.player.clone(), pick.team.clone());
        if let Some(roster) = self.rosters.get_mut(&pick.team) {
            roster.push(pick.player.clone());
        }
        self.history.push(pick);

        if self.history.len() >= self.config.total_picks() {
            info!("Draft complete after {} picks", self.history.len());
            self.complete = true;
        } else if self.drafted.len() == self.catalog.len() {
            info!("Draft complete: player pool exhausted");
            self.complete = true;
        }

        Ok(())
    }

    /// Mark the draft as ended, as signalled by the external feed.
    pub fn end(&mut self) {
        if !self.complete {
            info!("Draft ended by feed at pick #{}", self.history.len());
        }
        self.complete = true;
    }

    pub fn phase(&self) -> DraftPhase {
        if self.complete {
            DraftPhase::Complete
        } else if self.history.is_empty() {
            DraftPhase::Empty
        } else {
            DraftPhase::InProgress
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn history(&self) -> &[Pick] {
        &self.history
    }

    /// Pick number of the most recent pick, 0 before the first pick.
    pub fn last_pick_number(&self) -> u32 {
        self.history.last().map(|p| p.pick_number).unwrap_or(0)
    }

    pub fn next_pick_number(&self) -> u32 {
        self.last_pick_number() + 1
    }

    pub fn is_drafted(&self, player: &PlayerId) -> bool {
        self.drafted.contains_key(player)
    }

    pub fn drafted_by(&self, player: &PlayerId) -> Option<&TeamId> {
        self.drafted.get(player)
    }

    pub fn drafted_count(&self) -> usize {
        self.drafted.len()
    }

    pub fn catalog(&self) -> &Arc<PlayerCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &Arc<DraftConfig> {
        &self.config
    }

    pub fn order(&self) -> &DraftOrder {
        &self.config.order
    }

    /// Players drafted by `team`, in the order they were drafted.
    pub fn roster_of(&self, team: &TeamId) -> Result<Vec<&Player>> {
        let ids = self
            .rosters
            .get(team)
            .ok_or_else(|| DraftError::UnknownTeam(team.clone()))?;
        ids.iter().map(|id| self.catalog.get(id)).collect()
    }

    /// Unfilled slots for `team` against the given requirement table.
    pub fn needs_of(&self, team: &TeamId, requirements: &RosterRequirements) -> Result<RosterNeeds> {
        let roster = self.roster_of(team)?;
        Ok(RosterNeeds::compute(roster, requirements))
    }

    /// `needs_of` against the session's configured requirements.
    pub fn needs(&self, team: &TeamId) -> Result<RosterNeeds> {
        self.needs_of(team, &self.config.requirements)
    }

    /// The team's players arranged into starting and bench slots.
    pub fn lineup_of(&self, team: &TeamId) -> Result<Lineup> {
        let roster = self.roster_of(team)?;
        Ok(Lineup::assign(roster, &self.config.requirements))
    }

    /// The slot the next pick falls in, or `None` once complete.
    pub fn next_turn(&self) -> Option<TurnSlot> {
        if self.complete {
            None
        } else {
            Some(self.config.order.slot_for_pick(self.next_pick_number()))
        }
    }

    /// Serializable view of the whole session for UI layers.
    pub fn snapshot(&self) -> Result<DraftSnapshot> {
        let teams = self
            .config
            .order
            .teams()
            .iter()
            .map(|team| {
                let roster: Vec<Player> = self.roster_of(team)?.into_iter().cloned().collect();
                Ok(TeamSnapshot {
                    team: team.clone(),
                    needs: RosterNeeds::compute(&roster, &self.config.requirements),
                    lineup: Lineup::assign(&roster, &self.config.requirements),
                    roster,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DraftSnapshot {
            phase: self.phase(),
            pick_count: self.history.len(),
            total_picks: self.config.total_picks(),
            next_turn: self.next_turn(),
            history: self.history.clone(),
            teams,
        })
    }
}

/// Point-in-time copy of a draft for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub phase: DraftPhase,
    pub pick_count: usize,
    pub total_picks: usize,
    pub next_turn: Option<TurnSlot>,
    pub history: Vec<Pick>,
    /// One entry per team, in draft order.
    pub teams: Vec<TeamSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub team: TeamId,
    /// Drafted players in draft order.
    pub roster: Vec<Player>,
    pub needs: RosterNeeds,
    pub lineup: Lineup,
}
