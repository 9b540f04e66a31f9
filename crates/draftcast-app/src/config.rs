// Configuration loading and parsing (draftcast.toml).

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use draftcast_core::{
    DraftConfig, DraftOrder, ProjectionNormalization, RiskTolerance, RosterRequirements,
    ScoringConfig, ScoringWeights, TeamId,
};

/// File name of the configuration file inside `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "draftcast.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub scoring: ScoringSection,
    pub data: DataPaths,
    /// Directory the config was loaded from; relative data paths resolve
    /// against it.
    pub base_dir: PathBuf,
}

/// Raw deserialization target for draftcast.toml.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    league: LeagueConfig,
    #[serde(default)]
    scoring: ScoringSection,
    data: DataPaths,
}

// ---------------------------------------------------------------------------
// [league]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Team identifiers in first-round draft order.
    pub teams: Vec<String>,
    pub user_team: String,
    #[serde(default = "default_snake")]
    pub snake: bool,
    pub rounds: u32,
    /// Slot counts keyed by "QB", "RB", ..., "FLEX", "BE".
    pub roster: HashMap<String, usize>,
}

fn default_snake() -> bool {
    true
}

// ---------------------------------------------------------------------------
// [scoring]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSection {
    #[serde(default)]
    pub weights: ScoringWeights,
    #[serde(default)]
    pub risk_tolerance: RiskToleranceSetting,
    #[serde(default)]
    pub normalization: ProjectionNormalization,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default)]
    pub fallen_threshold: Option<f64>,
}

fn default_top_n() -> usize {
    draftcast_core::recommend::engine::DEFAULT_TOP_N
}

impl Default for ScoringSection {
    fn default() -> Self {
        ScoringSection {
            weights: ScoringWeights::default(),
            risk_tolerance: RiskToleranceSetting::default(),
            normalization: ProjectionNormalization::default(),
            top_n: default_top_n(),
            fallen_threshold: None,
        }
    }
}

/// `risk_tolerance = 1.5` or `risk_tolerance = "low"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RiskToleranceSetting {
    Value(f64),
    Label(String),
}

impl Default for RiskToleranceSetting {
    fn default() -> Self {
        RiskToleranceSetting::Label("medium".into())
    }
}

impl RiskToleranceSetting {
    pub fn resolve(&self) -> Result<RiskTolerance, ConfigError> {
        match self {
            RiskToleranceSetting::Value(v) => RiskTolerance::new(*v)
                .map_err(|e| invalid("scoring.risk_tolerance", e.to_string())),
            RiskToleranceSetting::Label(label) => RiskTolerance::from_label(label).ok_or_else(|| {
                invalid(
                    "scoring.risk_tolerance",
                    format!("unknown label '{label}', expected low, medium, or high"),
                )
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// [data]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    /// Player CSV (id, name, position, team, adp, projection, risk).
    pub players: String,
    /// Optional recorded pick log to replay.
    #[serde(default)]
    pub picks: Option<String>,
    /// Pause between replayed picks, in milliseconds.
    #[serde(default)]
    pub replay_delay_ms: u64,
}

// ---------------------------------------------------------------------------
// Conversions into engine types
// ---------------------------------------------------------------------------

impl Config {
    pub fn user_team(&self) -> TeamId {
        TeamId::from(self.league.user_team.as_str())
    }

    pub fn draft_config(&self) -> Result<DraftConfig, ConfigError> {
        let teams = self
            .league
            .teams
            .iter()
            .map(|t| TeamId::from(t.as_str()))
            .collect();
        let order = DraftOrder::new(teams, self.league.snake)
            .map_err(|e| invalid("league.teams", e.to_string()))?;
        let requirements = RosterRequirements::from_config(&self.league.roster)
            .map_err(|e| invalid("league.roster", e.to_string()))?;
        DraftConfig::new(order, self.league.rounds, requirements)
            .map_err(|e| invalid("league.rounds", e.to_string()))
    }

    pub fn scoring_config(&self) -> Result<ScoringConfig, ConfigError> {
        let config = ScoringConfig {
            weights: self.scoring.weights,
            risk_tolerance: self.scoring.risk_tolerance.resolve()?,
            normalization: self.scoring.normalization,
            fallen_threshold: self.scoring.fallen_threshold,
        };
        config
            .validate()
            .map_err(|e| invalid("scoring.weights", e.to_string()))?;
        Ok(config)
    }

    pub fn players_path(&self) -> PathBuf {
        self.base_dir.join(&self.data.players)
    }

    pub fn picks_path(&self) -> Option<PathBuf> {
        self.data.picks.as_ref().map(|p| self.base_dir.join(p))
    }

    pub fn replay_delay(&self) -> Duration {
        Duration::from_millis(self.data.replay_delay_ms)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/draftcast.toml` relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        league: file.league,
        scoring: file.scoring,
        data: file.data,
        base_dir: base_dir.to_path_buf(),
    };

    validate(&config)?;

    Ok(config)
}

/// Seed `config/draftcast.toml` from `defaults/` on first run.
///
/// Returns the path written, or `None` when a config file was already in
/// place. Nothing else under `defaults/` is touched. Fails only when there is
/// neither a config file nor a default to seed it from.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no {CONFIG_FILE} in {}/config or {}/defaults",
                base_dir.display(),
                base_dir.display()
            ),
        });
    }

    let copy_err = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to seed {}: {e}", target.display()),
    };
    std::fs::create_dir_all(base_dir.join("config")).map_err(copy_err)?;
    std::fs::copy(&source, &target).map_err(copy_err)?;
    info!("Seeded {} from {}", target.display(), source.display());

    Ok(Some(target))
}

/// The directory config is loaded from: the current directory when it has a
/// `config/` or `defaults/` directory, otherwise the platform config dir.
pub fn resolve_base_dir() -> Result<PathBuf, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    if cwd.join("config").exists() || cwd.join("defaults").exists() {
        return Ok(cwd);
    }
    Ok(directories::ProjectDirs::from("", "", "draftcast")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or(cwd))
}

/// Convenience wrapper: resolves the base directory, copies defaults, loads.
pub fn load_config() -> Result<Config, ConfigError> {
    let base_dir = resolve_base_dir()?;
    ensure_config_file(&base_dir)?;
    load_config_from(&base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let league = &config.league;

    if league.teams.is_empty() {
        return Err(invalid("league.teams", "must list at least one team"));
    }
    let mut seen = HashSet::new();
    for team in &league.teams {
        if team.trim().is_empty() {
            return Err(invalid("league.teams", "team id must not be blank"));
        }
        if !seen.insert(team.as_str()) {
            return Err(invalid("league.teams", format!("team '{team}' appears more than once")));
        }
    }
    if !seen.contains(league.user_team.as_str()) {
        return Err(invalid(
            "league.user_team",
            format!("'{}' is not one of league.teams", league.user_team),
        ));
    }
    if league.rounds == 0 {
        return Err(invalid("league.rounds", "must be greater than 0"));
    }
    RosterRequirements::from_config(&league.roster)
        .map_err(|e| invalid("league.roster", e.to_string()))?;

    if config.scoring.top_n == 0 {
        return Err(invalid("scoring.top_n", "must be greater than 0"));
    }
    config.scoring_config()?;

    if config.data.players.trim().is_empty() {
        return Err(invalid("data.players", "must not be empty"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Helper: returns the path to the draftcast-app crate root
    /// (works whether `cargo test` runs from the crate root or repo root).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("crates/draftcast-app/defaults").exists() {
            cwd.join("crates/draftcast-app")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    const VALID: &str = r#"
[league]
name = "Test League"
teams = ["A", "B", "C"]
user_team = "B"
rounds = 4

[league.roster]
QB = 1
RB = 1
WR = 1
FLEX = 1

[scoring]
risk_tolerance = "low"
top_n = 3

[scoring.weights]
scarcity = 2.0

[data]
players = "players.csv"
"#;

    fn write_config(name: &str, body: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), body).unwrap();
        tmp
    }

    fn expect_validation(name: &str, body: &str, expected_field: &str) {
        let tmp = write_config(name, body);
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected_field),
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn load_defaults_file() {
        let root = project_root();
        let tmp = std::env::temp_dir().join("draftcast_config_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::copy(
            root.join("defaults").join(CONFIG_FILE),
            tmp.join("config").join(CONFIG_FILE),
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("defaults should load");
        assert_eq!(config.league.teams.len(), 10);
        assert!(config.league.snake);
        let draft = config.draft_config().unwrap();
        assert_eq!(draft.total_picks(), 10 * config.league.rounds as usize);
        assert_eq!(config.scoring_config().unwrap().weights, ScoringWeights::equal());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn load_valid_config() {
        let tmp = write_config("draftcast_config_valid", VALID);
        let config = load_config_from(&tmp).unwrap();

        assert_eq!(config.league.name, "Test League");
        assert_eq!(config.user_team(), TeamId::from("B"));
        assert_eq!(config.scoring.top_n, 3);
        let scoring = config.scoring_config().unwrap();
        assert_eq!(scoring.risk_tolerance, RiskTolerance::LOW);
        assert_eq!(scoring.weights.scarcity, 2.0);
        assert_eq!(scoring.weights.value, 1.0);
        assert_eq!(scoring.normalization, ProjectionNormalization::MinMax);
        assert_eq!(config.players_path(), tmp.join("players.csv"));
        assert!(config.picks_path().is_none());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn numeric_risk_tolerance() {
        let body = VALID.replace(r#"risk_tolerance = "low""#, "risk_tolerance = 1.5");
        let tmp = write_config("draftcast_config_numeric_risk", &body);
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.scoring_config().unwrap().risk_tolerance.value(), 1.5);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_user_team() {
        let body = VALID.replace(r#"user_team = "B""#, r#"user_team = "Z""#);
        expect_validation("draftcast_config_user_team", &body, "league.user_team");
    }

    #[test]
    fn rejects_duplicate_teams() {
        let body = VALID.replace(r#"["A", "B", "C"]"#, r#"["A", "B", "B"]"#);
        expect_validation("draftcast_config_dup_teams", &body, "league.teams");
    }

    #[test]
    fn rejects_zero_rounds() {
        let body = VALID.replace("rounds = 4", "rounds = 0");
        expect_validation("draftcast_config_rounds", &body, "league.rounds");
    }

    #[test]
    fn rejects_unknown_roster_slot() {
        let body = VALID.replace("FLEX = 1", "LB = 2");
        expect_validation("draftcast_config_roster", &body, "league.roster");
    }

    #[test]
    fn rejects_bad_weights() {
        let body = VALID.replace("scarcity = 2.0", "scarcity = -2.0");
        expect_validation("draftcast_config_weights", &body, "scoring.weights");
    }

    #[test]
    fn rejects_bad_risk_tolerance() {
        let body = VALID.replace(r#"risk_tolerance = "low""#, r#"risk_tolerance = "reckless""#);
        expect_validation("draftcast_config_risk_label", &body, "scoring.risk_tolerance");

        let body = VALID.replace(r#"risk_tolerance = "low""#, "risk_tolerance = 0.0");
        expect_validation("draftcast_config_risk_zero", &body, "scoring.risk_tolerance");
    }

    #[test]
    fn rejects_zero_top_n() {
        let body = VALID.replace("top_n = 3", "top_n = 0");
        expect_validation("draftcast_config_top_n", &body, "scoring.top_n");
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = std::env::temp_dir().join("draftcast_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = write_config("draftcast_config_parse", "[league\nname = ");
        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn seeds_only_the_config_file() {
        let tmp = std::env::temp_dir().join("draftcast_config_seed");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();

        let root = project_root();
        fs::copy(
            root.join("defaults").join(CONFIG_FILE),
            defaults_dir.join(CONFIG_FILE),
        )
        .unwrap();
        fs::write(defaults_dir.join("notes.txt"), "not config\n").unwrap();

        let seeded = ensure_config_file(&tmp).expect("should succeed");
        assert_eq!(seeded, Some(tmp.join("config").join(CONFIG_FILE)));
        assert!(!tmp.join("config").join("notes.txt").exists());
        assert!(load_config_from(&tmp).is_ok());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn existing_config_file_is_kept() {
        let tmp = std::env::temp_dir().join("draftcast_config_seed_keeps");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), "# default\n").unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), "# custom\n").unwrap();

        assert_eq!(ensure_config_file(&tmp).expect("should succeed"), None);
        let content = fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn config_without_defaults_needs_no_seeding() {
        let tmp = std::env::temp_dir().join("draftcast_config_no_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), "# custom\n").unwrap();

        assert_eq!(ensure_config_file(&tmp).expect("should succeed"), None);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn seeding_errors_without_config_or_default() {
        let tmp = std::env::temp_dir().join("draftcast_config_seed_missing");
        let _ = fs::remove_dir_all(&tmp);
        // An unrelated defaults file does not count.
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join("other.toml"), "x = 1\n").unwrap();

        let err = ensure_config_file(&tmp).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains(CONFIG_FILE));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }
        assert!(!tmp.join("config").exists());

        let _ = fs::remove_dir_all(&tmp);
    }
}
