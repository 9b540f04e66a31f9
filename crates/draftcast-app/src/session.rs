// Session event loop.
//
// Owns the recommendation engine and the pick feed for one draft, and
// processes feed events and user commands strictly one at a time. Outputs go
// out on `out_tx` for whatever renders them (stdout in the binary,
// assertions in tests).

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use draftcast_core::{
    DraftSnapshot, Explanation, Pick, Recommendation, RecommendationEngine, ScoringConfig,
};

use crate::feed::{FeedEvent, PickFeed};

pub const OUT_OF_SYNC_MESSAGE: &str = "draft state out of sync — resynchronizing";

/// Commands from the user side of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Re-rank with new weights, tolerance or normalization.
    SetScoring(ScoringConfig),
    Snapshot,
    Quit,
}

/// Updates pushed out of the session loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionUpdate {
    /// It is the user's turn at `pick_number`.
    Recommendation {
        pick_number: u32,
        round: u32,
        strategy: String,
        insights: Vec<String>,
        explanations: Vec<Explanation>,
    },
    /// A pick could not be applied. Picks are held back until the state is
    /// rebuilt from the feed's history.
    OutOfSync { message: String },
    /// The session asked the feed for the authoritative pick history.
    ResyncRequested,
    Snapshot(Box<DraftSnapshot>),
    /// New scoring settings were invalid; the old ones are still in effect.
    ScoringRejected { reason: String },
    DraftComplete,
}

impl SessionUpdate {
    fn from_recommendation(rec: &Recommendation) -> Self {
        SessionUpdate::Recommendation {
            pick_number: rec.pick_number,
            round: rec.round,
            strategy: rec.advice.strategy.label().to_string(),
            insights: rec.advice.insights.clone(),
            explanations: rec.explain(),
        }
    }
}

/// Loop-local bookkeeping that is not part of the draft itself.
struct Session {
    engine: RecommendationEngine,
    in_sync: bool,
    complete_sent: bool,
}

/// Run the session loop.
///
/// Polls two sources using `tokio::select!`:
/// 1. User commands
/// 2. The pick feed (picks, draft end, pushed history)
///
/// When a pick cannot be applied the session asks the feed for its full
/// history and rebuilds from it. If the feed cannot supply a usable history,
/// the session stays out of sync and asks again on the next pick.
///
/// Exits on `Quit`, or once the feed is exhausted and the command channel
/// has closed.
pub async fn run<F: PickFeed>(
    mut feed: F,
    mut cmd_rx: mpsc::Receiver<SessionCommand>,
    out_tx: mpsc::Sender<SessionUpdate>,
    engine: RecommendationEngine,
) -> anyhow::Result<()> {
    let feed_name = feed.name().to_string();
    info!(
        "Session loop started for {} on feed '{}'",
        engine.user_team(),
        feed_name
    );

    let mut session = Session {
        engine,
        in_sync: true,
        complete_sent: false,
    };

    // The user may hold the very first pick.
    if let Some(rec) = session.engine.current_recommendation()? {
        let _ = out_tx.send(SessionUpdate::from_recommendation(&rec)).await;
    }

    let mut cmd_open = true;
    let mut feed_open = true;

    while cmd_open || feed_open {
        let mut needs_resync = false;

        tokio::select! {
            // Commands first so Quit is not stuck behind a feed backlog.
            biased;

            // --- User commands (only poll when channel is open) ---
            cmd = cmd_rx.recv(), if cmd_open => {
                match cmd {
                    Some(SessionCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_command(&mut session, cmd, &out_tx).await;
                    }
                    None => {
                        debug!("Command channel closed");
                        cmd_open = false;
                    }
                }
            }

            // --- Feed events ---
            event = feed.next_event(), if feed_open => {
                match event {
                    Ok(Some(FeedEvent::Pick(pick))) => {
                        needs_resync = handle_pick(&mut session, pick, &out_tx).await;
                    }
                    Ok(Some(FeedEvent::Resync(picks))) => {
                        info!("Feed '{}' pushed {} picks of history", feed_name, picks.len());
                        handle_resync(&mut session, picks, &out_tx).await;
                    }
                    Ok(Some(FeedEvent::DraftEnded)) => {
                        info!("Feed reported the draft ended");
                        session.engine.end_draft();
                        send_complete_once(&mut session, &out_tx).await;
                    }
                    Ok(None) => {
                        info!("Feed '{}' exhausted", feed_name);
                        feed_open = false;
                    }
                    Err(e) => {
                        error!("Feed '{}' failed: {}", feed_name, e);
                        feed_open = false;
                    }
                }
            }
        }

        if needs_resync {
            request_resync(&mut session, &mut feed, &out_tx).await;
        }
    }

    info!(
        "Session loop exiting after {} picks",
        session.engine.state().history().len()
    );
    Ok(())
}

/// Apply one live pick. Returns true when the session needs the feed's
/// history before it can continue.
async fn handle_pick(
    session: &mut Session,
    pick: Pick,
    out_tx: &mpsc::Sender<SessionUpdate>,
) -> bool {
    if !session.in_sync {
        debug!("Pick #{} arrived while out of sync", pick.pick_number);
        return true;
    }

    debug!(
        "Pick #{}: {} takes {} (reported at {})",
        pick.pick_number, pick.team, pick.player, pick.timestamp
    );

    match session.engine.on_pick(pick) {
        Ok(Some(rec)) => {
            let _ = out_tx.send(SessionUpdate::from_recommendation(&rec)).await;
        }
        Ok(None) => {}
        Err(e) if e.is_pick_stream_error() => {
            warn!("Pick stream diverged: {}", e);
            session.in_sync = false;
            let _ = out_tx
                .send(SessionUpdate::OutOfSync {
                    message: OUT_OF_SYNC_MESSAGE.to_string(),
                })
                .await;
            return true;
        }
        Err(e) => {
            error!("Failed to process pick: {}", e);
        }
    }

    if session.engine.is_complete() {
        send_complete_once(session, out_tx).await;
    }
    false
}

async fn request_resync<F: PickFeed>(
    session: &mut Session,
    feed: &mut F,
    out_tx: &mpsc::Sender<SessionUpdate>,
) {
    let _ = out_tx.send(SessionUpdate::ResyncRequested).await;
    match feed.resync().await {
        Ok(picks) => {
            info!("Rebuilding from {} picks of history", picks.len());
            handle_resync(session, picks, out_tx).await;
        }
        Err(e) => {
            warn!("Feed '{}' could not supply pick history: {}", feed.name(), e);
        }
    }
}

async fn handle_resync(
    session: &mut Session,
    picks: Vec<Pick>,
    out_tx: &mpsc::Sender<SessionUpdate>,
) {
    match session.engine.resync(picks) {
        Ok(rec) => {
            session.in_sync = true;
            if let Some(rec) = rec {
                let _ = out_tx.send(SessionUpdate::from_recommendation(&rec)).await;
            }
            if session.engine.is_complete() {
                send_complete_once(session, out_tx).await;
            } else {
                session.complete_sent = false;
            }
        }
        Err(e) => {
            warn!("Resync history rejected: {}", e);
            session.in_sync = false;
        }
    }
}

async fn handle_command(
    session: &mut Session,
    cmd: SessionCommand,
    out_tx: &mpsc::Sender<SessionUpdate>,
) {
    match cmd {
        SessionCommand::SetScoring(scoring) => {
            if let Err(e) = session.engine.set_scoring(scoring) {
                warn!("Scoring update rejected: {}", e);
                let _ = out_tx
                    .send(SessionUpdate::ScoringRejected {
                        reason: e.to_string(),
                    })
                    .await;
                return;
            }
            info!("Scoring updated");
            // Re-rank immediately if the user is on the clock.
            match session.engine.current_recommendation() {
                Ok(Some(rec)) => {
                    let _ = out_tx.send(SessionUpdate::from_recommendation(&rec)).await;
                }
                Ok(None) => {}
                Err(e) => error!("Failed to re-rank after scoring update: {}", e),
            }
        }
        SessionCommand::Snapshot => match session.engine.snapshot() {
            Ok(snapshot) => {
                let _ = out_tx.send(SessionUpdate::Snapshot(Box::new(snapshot))).await;
            }
            Err(e) => error!("Failed to build snapshot: {}", e),
        },
        SessionCommand::Quit => {}
    }
}

async fn send_complete_once(session: &mut Session, out_tx: &mpsc::Sender<SessionUpdate>) {
    if session.complete_sent {
        return;
    }
    session.complete_sent = true;
    info!("Draft complete");
    let _ = out_tx.send(SessionUpdate::DraftComplete).await;
}
