// Recommendation engine: the single entry point the session loop drives.
//
// Owns the draft state for one session. Every pick goes through `on_pick`,
// which applies it and, when the next pick is the user's, ranks the board.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::explain::{explain, Explanation};
use super::strategy::{advise, StrategyAdvice};
use crate::catalog::PlayerCatalog;
use crate::draft::order::is_user_turn;
use crate::draft::pick::{Pick, TeamId};
use crate::draft::roster::RosterNeeds;
use crate::draft::state::{DraftConfig, DraftSnapshot, DraftState};
use crate::error::{DraftError, Result};
use crate::scoring::rank::{rank_with, RankedPlayer};
use crate::scoring::scarcity::{compute_scarcity, PositionScarcity};
use crate::scoring::weights::{ScoringConfig, ScoringWeights};

/// Default number of candidates in a recommendation.
pub const DEFAULT_TOP_N: usize = 10;

/// Ranked candidates for one of the user's turns. Built fresh per turn and
/// never stored by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub pick_number: u32,
    pub round: u32,
    pub team: TeamId,
    /// Best first, at most `top_n` long.
    pub candidates: Vec<RankedPlayer>,
    pub needs: RosterNeeds,
    pub scarcity: Vec<PositionScarcity>,
    pub advice: StrategyAdvice,
}

impl Recommendation {
    pub fn explain(&self) -> Vec<Explanation> {
        explain(self)
    }
}

#[derive(Debug)]
pub struct RecommendationEngine {
    state: DraftState,
    user_team: TeamId,
    scoring: ScoringConfig,
    top_n: usize,
}

impl RecommendationEngine {
    /// Start an engine on an empty draft.
    pub fn new(
        catalog: Arc<PlayerCatalog>,
        config: Arc<DraftConfig>,
        user_team: TeamId,
        scoring: ScoringConfig,
        top_n: usize,
    ) -> Result<Self> {
        Self::from_state(DraftState::new(catalog, config), user_team, scoring, top_n)
    }

    /// Wrap an existing draft state, e.g. one rebuilt with `DraftState::replay`.
    pub fn from_state(
        state: DraftState,
        user_team: TeamId,
        scoring: ScoringConfig,
        top_n: usize,
    ) -> Result<Self> {
        if !state.order().contains(&user_team) {
            return Err(DraftError::UnknownTeam(user_team));
        }
        if top_n == 0 {
            return Err(DraftError::validation("top_n", "must be greater than 0"));
        }
        scoring.validate()?;

        info!(
            "Recommendation engine ready for {} ({} teams, {} rounds)",
            user_team,
            state.order().team_count(),
            state.config().rounds
        );

        Ok(RecommendationEngine {
            state,
            user_team,
            scoring,
            top_n,
        })
    }

    /// Apply a pick from the feed.
    ///
    /// Returns a recommendation when the next pick is the user's, `None`
    /// otherwise. A rejected pick leaves the state untouched.
    pub fn on_pick(&mut self, pick: Pick) -> Result<Option<Recommendation>> {
        let pick_number = pick.pick_number;
        if let Err(e) = self.state.apply(pick) {
            warn!("Rejected pick #{}: {}", pick_number, e);
            return Err(e);
        }
        self.current_recommendation()
    }

    /// A recommendation for the current state if it is the user's turn.
    /// Used at session start, when the user holds the first pick.
    pub fn current_recommendation(&self) -> Result<Option<Recommendation>> {
        if !is_user_turn(&self.state, self.state.order(), &self.user_team) {
            return Ok(None);
        }
        self.recommend().map(Some)
    }

    /// Rank the board for the user at the next pick, whoever holds it.
    pub fn recommend(&self) -> Result<Recommendation> {
        if self.state.is_complete() {
            return Err(DraftError::DraftComplete);
        }

        let pick_number = self.state.next_pick_number();
        let slot = self.state.order().slot_for_pick(pick_number);
        let catalog = self.state.catalog();

        let mut candidates = rank_with(catalog, &self.state, &self.user_team, &self.scoring)?;
        candidates.truncate(self.top_n);

        let undrafted = catalog.undrafted(&self.state);
        let scarcity = compute_scarcity(&self.state, &undrafted, &self.user_team, pick_number)?;
        let needs = self.state.needs(&self.user_team)?;
        let roster = self.state.roster_of(&self.user_team)?;
        let advice = advise(slot.round, roster, &needs, &scarcity);

        info!(
            "Recommendation for pick #{} (round {}): {} candidates, strategy {}",
            pick_number,
            slot.round,
            candidates.len(),
            advice.strategy.label()
        );

        Ok(Recommendation {
            pick_number,
            round: slot.round,
            team: self.user_team.clone(),
            candidates,
            needs,
            scarcity,
            advice,
        })
    }

    /// Replace the state with one rebuilt from an authoritative pick list.
    ///
    /// The current state is kept if the replay fails.
    pub fn resync(&mut self, picks: Vec<Pick>) -> Result<Option<Recommendation>> {
        let count = picks.len();
        let state = DraftState::replay(
            self.state.catalog().clone(),
            self.state.config().clone(),
            picks,
        )?;
        info!("Resynchronized draft state from {} picks", count);
        self.state = state;
        self.current_recommendation()
    }

    /// Mark the draft ended by the feed.
    pub fn end_draft(&mut self) {
        self.state.end();
    }

    /// Swap in a new scoring configuration. On `InvalidWeights` the previous
    /// configuration stays in effect.
    pub fn set_scoring(&mut self, scoring: ScoringConfig) -> Result<()> {
        scoring.validate()?;
        debug!("Scoring updated: {:?}", scoring.weights);
        self.scoring = scoring;
        Ok(())
    }

    pub fn set_weights(&mut self, weights: ScoringWeights) -> Result<()> {
        self.set_scoring(ScoringConfig {
            weights,
            ..self.scoring
        })
    }

    pub fn snapshot(&self) -> Result<DraftSnapshot> {
        self.state.snapshot()
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    pub fn user_team(&self) -> &TeamId {
        &self.user_team
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}
