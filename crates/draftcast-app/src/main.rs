// Draftcast entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, stdout is for recommendations)
// 2. Load config
// 3. Load the player catalog
// 4. Build the recommendation engine
// 5. Create mpsc channels
// 6. Open the pick feed (recorded log replay, if configured)
// 7. Spawn the session loop, which owns the feed
// 8. Print updates and read commands from stdin until the session ends
//
// `--json` prints one JSON object per update instead of plain text.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use draftcast_app::config;
use draftcast_app::console;
use draftcast_app::data;
use draftcast_app::feed::CsvReplayFeed;
use draftcast_app::session;
use draftcast_core::RecommendationEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let json_output = std::env::args().skip(1).any(|arg| arg == "--json");

    // 1. Initialize tracing
    init_tracing()?;
    info!("Draftcast starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} teams, {} rounds, user team {}",
        config.league.name,
        config.league.teams.len(),
        config.league.rounds,
        config.league.user_team
    );

    // 3. Load the player catalog
    let players_path = config.players_path();
    let catalog = data::load_catalog(&players_path)
        .with_context(|| format!("failed to load players from {}", players_path.display()))?;

    // 4. Build the engine
    let draft_config = config.draft_config().context("invalid league settings")?;
    let scoring = config.scoring_config().context("invalid scoring settings")?;
    let engine = RecommendationEngine::new(
        Arc::new(catalog),
        Arc::new(draft_config),
        config.user_team(),
        scoring,
        config.scoring.top_n,
    )
    .context("failed to start the recommendation engine")?;

    // 5. Create mpsc channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (out_tx, mut out_rx) = mpsc::channel(256);

    // 6. Open the pick feed
    let replay = match config.picks_path() {
        Some(path) => CsvReplayFeed::from_path(&path, config.replay_delay())
            .with_context(|| format!("failed to load picks from {}", path.display()))?,
        None => {
            info!("No pick log configured; waiting for commands");
            CsvReplayFeed::from_picks("idle", Vec::new(), config.replay_delay())
        }
    }
    // A replayed log may stop mid-draft; completion comes from the picks.
    .with_end_signal(false);

    // 7. Spawn the session loop
    let session_handle = tokio::spawn(async move {
        if let Err(e) = session::run(replay, cmd_rx, out_tx, engine).await {
            error!("Session loop error: {}", e);
        }
    });

    // 8. Print updates, forward typed commands
    if !json_output {
        println!("{}", console::HELP);
    }
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    // Dropped when stdin closes so the session ends once the feed runs out.
    let mut cmd_tx = Some(cmd_tx);

    loop {
        tokio::select! {
            update = out_rx.recv() => {
                match update {
                    Some(update) if json_output => match console::render_json(&update) {
                        Ok(line) => print!("{line}"),
                        Err(e) => error!("Failed to serialize update: {}", e),
                    },
                    Some(update) => print!("{}", console::render(&update)),
                    None => break,
                }
            }
            line = lines.next_line(), if cmd_tx.is_some() => {
                match line {
                    Ok(Some(line)) if line.trim().is_empty() => {}
                    Ok(Some(line)) => match console::parse_command(&line, &scoring) {
                        Ok(cmd) => {
                            let Some(tx) = &cmd_tx else { continue };
                            if tx.send(cmd).await.is_err() {
                                break;
                            }
                        }
                        Err(message) => println!("{message}"),
                    },
                    Ok(None) => {
                        cmd_tx = None;
                    }
                    Err(e) => {
                        warn!("stdin read failed: {}", e);
                        cmd_tx = None;
                    }
                }
            }
        }
    }

    let _ = session_handle.await;

    info!("Draftcast shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (stdout carries the recommendations).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("draftcast.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("draftcast_app=info,draftcast_core=info,warn")
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
