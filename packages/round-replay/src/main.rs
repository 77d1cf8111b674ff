//! Round replay CLI: rebuild a session from a saved snapshot and report it.
//!
//! The snapshot is replayed from its action log and checked against the
//! stored view before anything is printed, so a tampered file is rejected.

mod report;

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wgp_core::{GameSession, HoleAction, SessionSnapshot};

#[derive(Parser)]
#[command(name = "round-replay")]
#[command(about = "Replay and audit a saved Wolf Goat Pig round")]
struct Args {
    /// Snapshot JSON produced by a running session
    #[arg(short, long)]
    input: PathBuf,

    /// Report format
    #[arg(long, default_value = "text")]
    format: Format,

    /// Correct a completed hole before reporting
    #[arg(long, requires = "actions")]
    edit_hole: Option<u8>,

    /// JSON array of replacement actions for `--edit-hole`
    #[arg(long, requires = "edit_hole")]
    actions: Option<PathBuf>,

    /// Write the resulting snapshot here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // RUST_LOG wins; otherwise quiet unless --verbose
    let default = if args.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let json = fs::read_to_string(&args.input)?;
    let snapshot = SessionSnapshot::from_json(&json)?;
    let mut session = GameSession::reconstruct(&snapshot)?;
    info!(
        input = %args.input.display(),
        holes = session.history().len(),
        "Snapshot replayed"
    );

    if let (Some(number), Some(path)) = (args.edit_hole, &args.actions) {
        let actions: Vec<HoleAction> = serde_json::from_str(&fs::read_to_string(path)?)?;
        let outcome = session.edit_hole(number, actions)?;
        info!(
            hole = outcome.hole,
            invalidated = ?outcome.invalidated,
            "Hole corrected"
        );
    }

    let view = session.view()?;
    match args.format {
        Format::Text => print!("{}", report::render_text(&view)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&view)?),
    }

    if let Some(path) = args.output {
        fs::write(&path, session.serialize()?.to_json()?)?;
        info!(output = %path.display(), "Snapshot written");
    }

    Ok(())
}
