use std::io::Write as _;

use anyhow::Context;
use evotris_engine::{DEFAULT_COLS, DEFAULT_ROWS, Game, PieceSource};
use evotris_evaluator::{turn_evaluator::TurnEvaluator, weights::Weights};

use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Comma-separated weights, one per feature; invalid input falls back to the defaults
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    weights: Option<Vec<String>>,
    /// Stop after this many turns even if the game is not lost
    #[arg(long)]
    turn_cap: Option<usize>,
    /// Seed for the piece sequence
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: usize,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        weights,
        turn_cap,
        seed,
        rows,
        cols,
    } = arg;
    if *rows == 0 || !(evotris_engine::MIN_COLS..=evotris_engine::MAX_COLS).contains(cols) {
        anyhow::bail!(
            "board must have at least 1 row and {}..={} columns, got {rows}x{cols}",
            evotris_engine::MIN_COLS,
            evotris_engine::MAX_COLS
        );
    }

    let weights = weights
        .as_deref()
        .map_or(Weights::DEFAULT, Weights::parse_or_default);
    tracing::info!(%weights, "playing");

    let pieces = seed.map_or_else(PieceSource::new, PieceSource::with_seed);
    let mut game = Game::with_source(*rows, *cols, pieces);
    let evaluator = TurnEvaluator::new(weights);
    let outcome = evaluator.play_game(&mut game, turn_cap.unwrap_or(usize::MAX));

    let mut output = Output::stdout();
    writeln!(output, "{} {}", outcome.rows_cleared, outcome.turns_played)
        .with_context(|| format!("Failed to write result to {}", output.display_path()))?;
    Ok(())
}
