//! Plain-text rendering of a session view.

use std::fmt::Write;

use wgp_core::domain::{HoleOutcome, HoleStatus, HoleSummary, Phase, TeamId};
use wgp_core::SessionView;

pub fn render_text(view: &SessionView) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, view);
    out
}

fn write_report(out: &mut String, view: &SessionView) -> std::fmt::Result {
    writeln!(
        out,
        "Holes completed: {}  Phase: {}",
        view.holes_completed,
        phase_label(view.phase)
    )?;
    if let Some(carry) = view.carry_over {
        writeln!(out, "Carry-over pending from hole {}", carry.from_hole)?;
    }

    writeln!(out, "\nLeaderboard")?;
    for (rank, player) in view.leaderboard().into_iter().enumerate() {
        writeln!(
            out,
            "{:>2}. {:<12} {:>7}  W{} L{} H{} solo {}",
            rank + 1,
            player.name,
            player.points.to_string(),
            player.holes_won,
            player.holes_lost,
            player.holes_halved,
            player.solo_count
        )?;
    }

    if !view.history.is_empty() {
        writeln!(out, "\nHoles")?;
        for summary in &view.history {
            write_hole(out, view, summary)?;
        }
    }

    if let Some(open) = &view.current_hole {
        writeln!(
            out,
            "\nHole {} in play, wager {}",
            open.hole.number, open.wager.current_wager
        )?;
    }
    Ok(())
}

fn write_hole(out: &mut String, view: &SessionView, summary: &HoleSummary) -> std::fmt::Result {
    let result = match summary.outcome {
        HoleOutcome::Halved => "halved".to_string(),
        HoleOutcome::Won { winner, .. } => {
            let side = match winner {
                TeamId::Team1 => "captain's side",
                TeamId::Team2 => "opponents",
            };
            match summary.status {
                HoleStatus::Conceded => format!("{side} by concession"),
                _ => format!("won by {side}"),
            }
        }
    };
    write!(
        out,
        "{:>3}  wager {:>4}  {:<28}",
        summary.number, summary.current_wager, result
    )?;
    for (id, delta) in &summary.deltas {
        let name = view
            .players
            .iter()
            .find(|p| p.id == *id)
            .map_or("?", |p| p.name.as_str());
        write!(out, " {name} {delta}")?;
    }
    writeln!(out)
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Normal => "normal",
        Phase::MidRoundVariant => "mid-round",
        Phase::LatePhase => "late",
        Phase::Complete => "complete",
    }
}
