// Player and pick data loading.
//
// Reads the merged player CSV produced by the data-refresh jobs
// (id, name, position, team, adp, projection, risk) and recorded pick logs
// (pick_number, team, player_id, timestamp).

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::info;

use draftcast_core::{DraftError, Pick, PlayerCatalog, PlayerRecord};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("invalid player data: {0}")]
    Catalog(#[from] DraftError),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// Player CSV row. Required engine fields are optional here so that a blank
/// cell surfaces as a catalog validation error naming the player.
#[derive(Debug, Deserialize)]
struct RawPlayer {
    #[serde(alias = "player_id")]
    id: String,
    #[serde(alias = "player_name")]
    name: String,
    #[serde(default, alias = "pos")]
    position: Option<String>,
    #[serde(default, alias = "nfl_team")]
    team: String,
    #[serde(default)]
    adp: Option<f64>,
    #[serde(default, alias = "projected_points")]
    projection: Option<f64>,
    #[serde(default, alias = "risk_score")]
    risk: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawPick {
    #[serde(alias = "pick")]
    pick_number: u32,
    team: String,
    #[serde(alias = "player")]
    player_id: String,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Reader-based loaders (enable testing without temp files)
// ---------------------------------------------------------------------------

/// Parse player rows. A row that fails to parse is an error naming its
/// line: a silently dropped player would only surface later, as a live pick
/// the catalog has never heard of.
pub fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    reader
        .deserialize::<RawPlayer>()
        .map(|result| {
            let raw = result?;
            Ok(PlayerRecord {
                id: raw.id.trim().to_string(),
                name: raw.name.trim().to_string(),
                position: raw
                    .position
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty()),
                team: raw.team.trim().to_string(),
                adp: raw.adp,
                projection: raw.projection,
                risk: raw.risk,
            })
        })
        .collect()
}

/// Parse a pick log. A malformed pick is an error: a skipped pick would
/// break the pick-number sequence for everything after it.
///
/// Picks without a timestamp get the load time; the timestamp is advisory.
pub fn load_picks_from_reader<R: Read>(rdr: R) -> Result<Vec<Pick>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let loaded_at = Utc::now();
    reader
        .deserialize::<RawPick>()
        .map(|result| {
            let raw = result?;
            Ok(Pick::new(
                raw.pick_number,
                raw.team.trim(),
                raw.player_id.trim(),
                raw.timestamp.unwrap_or(loaded_at),
            ))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

pub fn load_players(path: &Path) -> Result<Vec<PlayerRecord>, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_players_from_reader(file).map_err(|e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

pub fn load_picks(path: &Path) -> Result<Vec<Pick>, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_picks_from_reader(file).map_err(|e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load the player CSV and build the validated catalog.
pub fn load_catalog(path: &Path) -> Result<PlayerCatalog, DataError> {
    let records = load_players(path)?;
    let catalog = PlayerCatalog::load(records)?;
    info!("Loaded {} players from {}", catalog.len(), path.display());
    Ok(catalog)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use draftcast_core::{PlayerId, Position, TeamId};

    const PLAYERS: &str = "\
id,name,position,team,adp,projection,risk
p1,Alpha Back,RB,KC,1.2,280.5,0.2
p2, Bravo Wide ,WR,MIA,2.0,265.0,0.1
p3,Charlie Tight,TE,SF,15.5,190.0,
";

    #[test]
    fn player_csv_parses() {
        let records = load_players_from_reader(PLAYERS.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].name, "Bravo Wide");
        assert_eq!(records[0].adp, Some(1.2));
        assert_eq!(records[2].risk, None);

        let catalog = PlayerCatalog::load(records).unwrap();
        let p3 = catalog.get(&PlayerId::from("p3")).unwrap();
        assert_eq!(p3.position, Position::TightEnd);
        assert_eq!(p3.risk, 0.0);
    }

    #[test]
    fn player_csv_aliases_and_extra_columns() {
        let csv = "\
player_id,player_name,pos,nfl_team,adp,projected_points,risk_score,bye
x1,Xray,QB,BUF,20.0,330.0,0.3,7
";
        let records = load_players_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].position.as_deref(), Some("QB"));
        assert_eq!(records[0].projection, Some(330.0));
        assert_eq!(records[0].risk, Some(0.3));
    }

    #[test]
    fn blank_required_cell_fails_catalog_validation() {
        let csv = "\
id,name,position,team,adp,projection,risk
p1,Alpha,RB,KC,,200.0,0.1
";
        let records = load_players_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(records[0].adp, None);
        let err = PlayerCatalog::load(records).unwrap_err();
        assert!(matches!(err, DraftError::Validation { ref field, .. } if field == "players[p1].adp"));
    }

    #[test]
    fn malformed_player_row_is_an_error() {
        let csv = "\
id,name,position,team,adp,projection,risk
p2,Bravo,WR,MIA,3.0,210.0,0.1
p1,Alpha,RB,KC,abc,200.0,0.1
";
        let err = load_players_from_reader(csv.as_bytes()).unwrap_err();
        assert_eq!(err.position().map(|p| p.line()), Some(3));
    }

    #[test]
    fn malformed_player_row_fails_catalog_load() {
        let dir = std::env::temp_dir().join("draftcast_data_malformed_player");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("players.csv");
        std::fs::write(
            &path,
            "id,name,position,team,adp,projection,risk\np1,Alpha,RB,KC,abc,200.0,0.1\n",
        )
        .unwrap();
        let err = load_catalog(&path).unwrap_err();
        assert!(matches!(err, DataError::Csv { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn pick_csv_parses_with_optional_timestamp() {
        let csv = "\
pick_number,team,player_id,timestamp
1,A,p1,2026-08-30T19:00:00Z
2,B,p2,
";
        let picks = load_picks_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].team, TeamId::from("A"));
        assert_eq!(picks[0].player, PlayerId::from("p1"));
        assert_eq!(
            picks[0].timestamp,
            Utc.with_ymd_and_hms(2026, 8, 30, 19, 0, 0).unwrap()
        );
        assert_eq!(picks[1].pick_number, 2);
    }

    #[test]
    fn malformed_pick_row_is_an_error() {
        let csv = "\
pick_number,team,player_id,timestamp
one,A,p1,
";
        assert!(load_picks_from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_players(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
