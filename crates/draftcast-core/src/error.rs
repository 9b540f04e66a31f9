// Error taxonomy shared by the catalog, draft state, and scoring engine.

use thiserror::Error;

use crate::draft::pick::TeamId;
use crate::player::PlayerId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    /// Malformed catalog or configuration input. Fatal to session start.
    #[error("validation error for `{field}`: {message}")]
    Validation { field: String, message: String },

    #[error("out-of-order pick: expected pick #{expected}, got #{got}")]
    OutOfOrderPick { expected: u32, got: u32 },

    #[error("player {player} was already drafted by {team}")]
    DuplicateDraft { player: PlayerId, team: TeamId },

    #[error("unknown team: {0}")]
    UnknownTeam(TeamId),

    #[error("draft is complete; no further picks accepted")]
    DraftComplete,

    #[error("invalid scoring weights: {0}")]
    InvalidWeights(String),

    #[error("player not found: {0}")]
    NotFound(PlayerId),
}

impl DraftError {
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DraftError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from a malformed pick stream, meaning the
    /// local state must be rebuilt from the authoritative pick list.
    ///
    /// `NotFound` counts here as well: a pick naming a player the catalog
    /// has never seen means the feed and the session disagree.
    pub fn is_pick_stream_error(&self) -> bool {
        matches!(
            self,
            DraftError::OutOfOrderPick { .. }
                | DraftError::DuplicateDraft { .. }
                | DraftError::UnknownTeam(_)
                | DraftError::DraftComplete
                | DraftError::NotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DraftError>;
