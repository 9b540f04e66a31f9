// Scoring weights and risk tolerance.

use serde::{Deserialize, Serialize};

use super::normalize::ProjectionNormalization;
use crate::error::{DraftError, Result};

/// Multipliers applied to each sub-score before summing. Missing fields
/// deserialize to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub value: f64,
    pub projection: f64,
    pub scarcity: f64,
    pub risk: f64,
}

impl ScoringWeights {
    /// Equal weight on every factor.
    pub fn equal() -> Self {
        ScoringWeights {
            value: 1.0,
            projection: 1.0,
            scarcity: 1.0,
            risk: 1.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.value + self.projection + self.scarcity + self.risk
    }

    /// Weights must be finite, non-negative, and sum to a positive total.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("value", self.value),
            ("projection", self.projection),
            ("scarcity", self.scarcity),
            ("risk", self.risk),
        ];
        for (name, val) in fields {
            if !val.is_finite() {
                return Err(DraftError::InvalidWeights(format!(
                    "{name} must be finite, got {val}"
                )));
            }
            if val < 0.0 {
                return Err(DraftError::InvalidWeights(format!(
                    "{name} must be >= 0, got {val}"
                )));
            }
        }
        let total = self.total();
        if total <= 0.0 {
            return Err(DraftError::InvalidWeights(format!(
                "weights must sum to a positive total, got {total}"
            )));
        }
        Ok(())
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::equal()
    }
}

/// How much volatility the user accepts. The risk sub-score is
/// `-(risk / tolerance)`, so a low tolerance penalizes volatile players more.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct RiskTolerance(f64);

impl RiskTolerance {
    pub const LOW: RiskTolerance = RiskTolerance(0.5);
    pub const MEDIUM: RiskTolerance = RiskTolerance(1.0);
    pub const HIGH: RiskTolerance = RiskTolerance(2.0);

    /// Fails with `InvalidWeights` unless `value` is finite and > 0.
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(DraftError::InvalidWeights(format!(
                "risk tolerance must be finite and > 0, got {value}"
            )));
        }
        Ok(RiskTolerance(value))
    }

    /// Parse the "low" / "medium" / "high" presets.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" | "conservative" => Some(Self::LOW),
            "medium" | "balanced" => Some(Self::MEDIUM),
            "high" | "aggressive" => Some(Self::HIGH),
            _ => None,
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Multiplier applied to a player's risk score.
    pub fn penalty_factor(&self) -> f64 {
        1.0 / self.0
    }
}

impl Default for RiskTolerance {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl TryFrom<f64> for RiskTolerance {
    type Error = DraftError;

    fn try_from(value: f64) -> Result<Self> {
        RiskTolerance::new(value)
    }
}

impl From<RiskTolerance> for f64 {
    fn from(t: RiskTolerance) -> f64 {
        t.0
    }
}

/// Everything the ranker needs besides the draft itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    pub risk_tolerance: RiskTolerance,
    #[serde(default)]
    pub normalization: ProjectionNormalization,
    /// How many picks before the current pick a player's ADP must be to
    /// flag a fallen value pick. `None` uses one full round.
    #[serde(default)]
    pub fallen_threshold: Option<f64>,
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        if let Some(t) = self.fallen_threshold {
            if !t.is_finite() || t < 0.0 {
                return Err(DraftError::InvalidWeights(format!(
                    "fallen threshold must be finite and >= 0, got {t}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            weights: ScoringWeights::default(),
            risk_tolerance: RiskTolerance::default(),
            normalization: ProjectionNormalization::default(),
            fallen_threshold: None,
        }
    }
}
