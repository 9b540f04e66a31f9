// Pick-event feeds.
//
// A feed yields draft events in the order the draft room reports them and,
// on request, the full pick history so far. The session loop owns its feed
// and polls it alongside user commands, so a feed never touches engine
// state directly.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use draftcast_core::Pick;

use crate::data::{load_picks, DataError};

/// Events a live draft source can report.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A single new pick.
    Pick(Pick),
    /// The draft room closed the draft.
    DraftEnded,
    /// The full, authoritative pick history, pushed unprompted by the source
    /// (for example after a reconnect).
    Resync(Vec<Pick>),
}

/// A source of draft events (polling client, push stream, recorded log).
///
/// `next_event` is polled inside `tokio::select!`, so it must be cancel-safe:
/// dropping the future before it completes must not lose an event.
#[async_trait]
pub trait PickFeed: Send {
    /// Short name for log lines.
    fn name(&self) -> &str;

    /// The next event, or `None` once the feed has nothing more to say.
    async fn next_event(&mut self) -> anyhow::Result<Option<FeedEvent>>;

    /// Every pick made so far, in pick-number order. Called when the session
    /// can no longer trust its own state.
    async fn resync(&mut self) -> anyhow::Result<Vec<Pick>>;
}

/// Replays a recorded pick log, optionally pacing picks, then reports the
/// draft as ended.
pub struct CsvReplayFeed {
    name: String,
    log: Vec<Pick>,
    /// Picks already emitted.
    cursor: usize,
    delay: Duration,
    send_end_signal: bool,
    end_signal_sent: bool,
}

impl CsvReplayFeed {
    pub fn from_picks(name: impl Into<String>, picks: Vec<Pick>, delay: Duration) -> Self {
        CsvReplayFeed {
            name: name.into(),
            log: picks,
            cursor: 0,
            delay,
            send_end_signal: true,
            end_signal_sent: false,
        }
    }

    /// Whether to report `DraftEnded` once the log runs out. Turn this off
    /// when replaying a partial log into a draft that continues.
    pub fn with_end_signal(mut self, enabled: bool) -> Self {
        self.send_end_signal = enabled;
        self
    }

    pub fn from_path(path: &Path, delay: Duration) -> Result<Self, DataError> {
        let picks = load_picks(path)?;
        info!("Replaying {} recorded picks from {}", picks.len(), path.display());
        Ok(Self::from_picks(path.display().to_string(), picks, delay))
    }

    pub fn remaining(&self) -> usize {
        self.log.len() - self.cursor
    }
}

#[async_trait]
impl PickFeed for CsvReplayFeed {
    fn name(&self) -> &str {
        &self.name
    }

    async fn next_event(&mut self) -> anyhow::Result<Option<FeedEvent>> {
        if self.cursor < self.log.len() {
            // Sleep before advancing so a cancelled poll loses nothing.
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let pick = self.log[self.cursor].clone();
            self.cursor += 1;
            return Ok(Some(FeedEvent::Pick(pick)));
        }
        if self.send_end_signal && !self.end_signal_sent {
            self.end_signal_sent = true;
            return Ok(Some(FeedEvent::DraftEnded));
        }
        Ok(None)
    }

    /// The recorded log up to the last pick emitted.
    async fn resync(&mut self) -> anyhow::Result<Vec<Pick>> {
        debug!("Feed '{}' serving {} picks for resync", self.name, self.cursor);
        Ok(self.log[..self.cursor].to_vec())
    }
}
