// Config + CSV data + replay feed + session loop, wired the way the binary
// wires them.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use draftcast_app::config::{self, CONFIG_FILE};
use draftcast_app::data;
use draftcast_app::feed::{CsvReplayFeed, FeedEvent, PickFeed};
use draftcast_app::session::{self, SessionCommand, SessionUpdate};
use draftcast_core::{DraftState, Pick, PlayerId, RecommendationEngine};

fn crate_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn fixtures() -> PathBuf {
    crate_root().join("tests").join("fixtures")
}

fn fixture_engine() -> (config::Config, RecommendationEngine) {
    let config = config::load_config_from(&fixtures()).unwrap();
    let catalog = data::load_catalog(&config.players_path()).unwrap();
    let engine = RecommendationEngine::new(
        Arc::new(catalog),
        Arc::new(config.draft_config().unwrap()),
        config.user_team(),
        config.scoring_config().unwrap(),
        config.scoring.top_n,
    )
    .unwrap();
    (config, engine)
}

/// A replay feed whose live stream loses one pick. Its history is intact.
struct LossyFeed {
    inner: CsvReplayFeed,
    lost_pick: u32,
}

#[async_trait]
impl PickFeed for LossyFeed {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn next_event(&mut self) -> anyhow::Result<Option<FeedEvent>> {
        loop {
            match self.inner.next_event().await? {
                Some(FeedEvent::Pick(pick)) if pick.pick_number == self.lost_pick => continue,
                other => return Ok(other),
            }
        }
    }

    async fn resync(&mut self) -> anyhow::Result<Vec<Pick>> {
        self.inner.resync().await
    }
}

fn recommended_picks(updates: &[SessionUpdate]) -> Vec<u32> {
    updates
        .iter()
        .filter_map(|u| match u {
            SessionUpdate::Recommendation { pick_number, .. } => Some(*pick_number),
            _ => None,
        })
        .collect()
}

async fn collect(mut rx: mpsc::Receiver<SessionUpdate>) -> Vec<SessionUpdate> {
    let mut updates = Vec::new();
    while let Some(update) = rx.recv().await {
        updates.push(update);
    }
    updates
}

#[tokio::test]
async fn replayed_draft_recommends_on_user_turns() {
    let (config, engine) = fixture_engine();
    let picks_path = config.picks_path().unwrap();
    let replay = CsvReplayFeed::from_path(&picks_path, Duration::ZERO).unwrap();

    let (cmd_tx, cmd_rx) = mpsc::channel::<SessionCommand>(4);
    let (out_tx, out_rx) = mpsc::channel(64);
    drop(cmd_tx);

    session::run(replay, cmd_rx, out_tx, engine).await.unwrap();

    let updates = collect(out_rx).await;
    // B picks 2, 7 and 10 in a four-team snake.
    assert_eq!(recommended_picks(&updates), vec![2, 7, 10]);
    assert_eq!(updates.last(), Some(&SessionUpdate::DraftComplete));
    assert!(!updates
        .iter()
        .any(|u| matches!(u, SessionUpdate::OutOfSync { .. })));

    if let SessionUpdate::Recommendation { explanations, .. } = &updates[0] {
        assert_eq!(explanations.len(), 5);
        // p01 went first overall and must never be offered.
        assert!(explanations
            .iter()
            .all(|e| e.player_id != PlayerId::from("p01")));
        assert!(explanations.iter().all(|e| !e.reasons.is_empty()));
    } else {
        panic!("first update should be a recommendation");
    }
}

#[tokio::test]
async fn lost_pick_recovers_from_feed_history() {
    let (config, engine) = fixture_engine();
    let replay = CsvReplayFeed::from_path(&config.picks_path().unwrap(), Duration::ZERO).unwrap();
    let feed = LossyFeed {
        inner: replay,
        lost_pick: 4,
    };

    let (cmd_tx, cmd_rx) = mpsc::channel::<SessionCommand>(4);
    let (out_tx, out_rx) = mpsc::channel(64);
    drop(cmd_tx);

    session::run(feed, cmd_rx, out_tx, engine).await.unwrap();
    let updates = collect(out_rx).await;

    let diverged = updates
        .iter()
        .filter(|u| matches!(u, SessionUpdate::OutOfSync { .. }))
        .count();
    assert_eq!(diverged, 1);
    let requested = updates
        .iter()
        .position(|u| *u == SessionUpdate::ResyncRequested)
        .unwrap();
    assert!(matches!(updates[requested - 1], SessionUpdate::OutOfSync { .. }));
    // Rebuilt through pick 5, then the rest of the log applies live.
    assert_eq!(recommended_picks(&updates), vec![2, 7, 10]);
    assert_eq!(updates.last(), Some(&SessionUpdate::DraftComplete));
}

#[test]
fn bundled_sample_data_fits_the_default_league() {
    let root = crate_root();
    let tmp = std::env::temp_dir().join("draftcast_sample_data");
    let _ = std::fs::remove_dir_all(&tmp);
    std::fs::create_dir_all(tmp.join("config")).unwrap();
    std::fs::copy(
        root.join("defaults").join(CONFIG_FILE),
        tmp.join("config").join(CONFIG_FILE),
    )
    .unwrap();
    let config = config::load_config_from(&tmp).unwrap();

    let catalog = data::load_catalog(&root.join("data").join("players.csv")).unwrap();
    let draft_config = config.draft_config().unwrap();
    assert!(catalog.len() >= draft_config.total_picks());

    let picks = data::load_picks(&root.join("data").join("picks.csv")).unwrap();
    let state = DraftState::replay(Arc::new(catalog), Arc::new(draft_config), picks).unwrap();
    assert_eq!(state.history().len(), 22);
    assert!(!state.is_complete());

    let _ = std::fs::remove_dir_all(&tmp);
}

#[test]
fn fixture_config_resolves_relative_data_paths() {
    let config = config::load_config_from(&fixtures()).unwrap();
    assert_eq!(config.players_path(), fixtures().join("players.csv"));
    assert!(Path::new(&config.picks_path().unwrap()).exists());
    assert_eq!(config.replay_delay(), Duration::ZERO);
}
