// Plain-text front end: parses typed commands and renders session updates.

use draftcast_core::{ScoringConfig, ScoringWeights};

use crate::session::{SessionCommand, SessionUpdate};

pub const HELP: &str = "commands: snapshot | weights <value> <projection> <scarcity> <risk> | quit";

/// Parse one input line. `Err` carries a message for the user.
pub fn parse_command(line: &str, current: &ScoringConfig) -> Result<SessionCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Err(HELP.to_string());
    };
    match word.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => Ok(SessionCommand::Quit),
        "s" | "snapshot" => Ok(SessionCommand::Snapshot),
        "w" | "weights" => {
            let values = parts
                .map(|p| p.parse::<f64>().map_err(|_| format!("not a number: {p}")))
                .collect::<Result<Vec<f64>, String>>()?;
            let [value, projection, scarcity, risk] = values[..] else {
                return Err("weights takes four numbers".to_string());
            };
            Ok(SessionCommand::SetScoring(ScoringConfig {
                weights: ScoringWeights {
                    value,
                    projection,
                    scarcity,
                    risk,
                },
                ..*current
            }))
        }
        other => Err(format!("unknown command '{other}'; {HELP}")),
    }
}

/// Render an update for the terminal.
pub fn render(update: &SessionUpdate) -> String {
    match update {
        SessionUpdate::Recommendation {
            pick_number,
            round,
            strategy,
            insights,
            explanations,
        } => {
            let mut out = format!("== On the clock: pick #{pick_number} (round {round}), strategy {strategy} ==\n");
            for insight in insights {
                out.push_str(&format!("   * {insight}\n"));
            }
            for e in explanations {
                out.push_str(&e.summary_line());
                out.push('\n');
                for reason in &e.reasons {
                    out.push_str(&format!("      - {reason}\n"));
                }
            }
            out
        }
        SessionUpdate::OutOfSync { message } => format!("!! {message}\n"),
        SessionUpdate::ResyncRequested => "!! waiting for full pick history\n".to_string(),
        SessionUpdate::Snapshot(snapshot) => {
            let mut out = format!(
                "== Draft: {}/{} picks, {:?} ==\n",
                snapshot.pick_count, snapshot.total_picks, snapshot.phase
            );
            for team in &snapshot.teams {
                let names: Vec<&str> = team.roster.iter().map(|p| p.name.as_str()).collect();
                out.push_str(&format!("{}: {}\n", team.team, names.join(", ")));
            }
            out
        }
        SessionUpdate::ScoringRejected { reason } => format!("scoring not changed: {reason}\n"),
        SessionUpdate::DraftComplete => "== Draft complete ==\n".to_string(),
    }
}

/// Render an update as one JSON line, for a downstream narration process.
pub fn render_json(update: &SessionUpdate) -> serde_json::Result<String> {
    serde_json::to_string(update).map(|mut line| {
        line.push('\n');
        line
    })
}
