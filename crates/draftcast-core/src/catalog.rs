// Player catalog: the validated, read-only pool of draftable players.
//
// Built once per session from the merged ADP/projection/risk feeds and then
// shared (behind an `Arc`) by every draft state and scoring call.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::draft::state::DraftState;
use crate::error::{DraftError, Result};
use crate::player::{Player, PlayerId, PlayerRecord, Position};

#[derive(Debug, Clone)]
pub struct PlayerCatalog {
    /// All players, sorted by ADP then identifier.
    players: Vec<Player>,
    index: HashMap<PlayerId, usize>,
}

impl PlayerCatalog {
    /// Build the catalog from raw player records.
    ///
    /// Fails with `DraftError::Validation` on an empty list, a blank or
    /// duplicate identifier, a missing or unknown position, a missing or
    /// non-finite ADP/projection, or a risk score outside `0.0..=1.0`.
    pub fn load(records: Vec<PlayerRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(DraftError::validation("players", "catalog must not be empty"));
        }

        let mut players = Vec::with_capacity(records.len());
        let mut seen: HashSet<String> = HashSet::with_capacity(records.len());

        for record in records {
            let id = record.id.trim().to_string();
            if id.is_empty() {
                return Err(DraftError::validation(
                    "players.id",
                    format!("player '{}' has a blank identifier", record.name),
                ));
            }
            if !seen.insert(id.clone()) {
                return Err(DraftError::validation(
                    format!("players[{id}].id"),
                    "duplicate player identifier",
                ));
            }

            let position_str = record.position.as_deref().ok_or_else(|| {
                DraftError::validation(format!("players[{id}].position"), "missing")
            })?;
            let position = Position::from_str_pos(position_str).ok_or_else(|| {
                DraftError::validation(
                    format!("players[{id}].position"),
                    format!("unknown position '{position_str}'"),
                )
            })?;

            let adp = required_finite(record.adp, &id, "adp")?;
            if adp <= 0.0 {
                return Err(DraftError::validation(
                    format!("players[{id}].adp"),
                    format!("must be > 0, got {adp}"),
                ));
            }
            let projection = required_finite(record.projection, &id, "projection")?;

            let risk = record.risk.unwrap_or(0.0);
            if !(0.0..=1.0).contains(&risk) {
                return Err(DraftError::validation(
                    format!("players[{id}].risk"),
                    format!("must be between 0.0 and 1.0 inclusive, got {risk}"),
                ));
            }

            players.push(Player {
                id: PlayerId(id),
                name: record.name.trim().to_string(),
                position,
                team: record.team.trim().to_string(),
                adp,
                projection,
                risk,
            });
        }

        players.sort_by(|a, b| a.adp.total_cmp(&b.adp).then_with(|| a.id.cmp(&b.id)));

        let index = players
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();

        debug!("Player catalog loaded with {} players", players.len());

        Ok(PlayerCatalog { players, index })
    }

    /// Look up a player by identifier.
    pub fn get(&self, id: &PlayerId) -> Result<&Player> {
        self.index
            .get(id)
            .map(|&i| &self.players[i])
            .ok_or_else(|| DraftError::NotFound(id.clone()))
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.index.contains_key(id)
    }

    /// Players not yet drafted in `state`, in ADP order.
    pub fn undrafted<'a>(&'a self, state: &DraftState) -> Vec<&'a Player> {
        self.players
            .iter()
            .filter(|p| !state.is_drafted(&p.id))
            .collect()
    }

    /// All players at a position, in ADP order.
    pub fn by_position(&self, position: Position) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(move |p| p.position == position)
    }

    /// All players in ADP order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

fn required_finite(value: Option<f64>, id: &str, field: &str) -> Result<f64> {
    match value {
        None => Err(DraftError::validation(format!("players[{id}].{field}"), "missing")),
        Some(v) if !v.is_finite() => Err(DraftError::validation(
            format!("players[{id}].{field}"),
            format!("must be finite, got {v}"),
        )),
        Some(v) => Ok(v),
    }
}
