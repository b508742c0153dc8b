use std::{io::Write as _, path::PathBuf};

use anyhow::Context;
use evotris_training::{config::EvolutionConfig, evolution::EvolutionEngine, report::TextSink};

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct OptimizeArg {
    /// Number of generations to run
    #[arg(long)]
    generations: Option<usize>,
    /// Turn cap of the first generation
    #[arg(long)]
    turn_cap: Option<usize>,
    /// JSON file with optimizer settings; command-line options take precedence
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    population: Option<usize>,
    #[arg(long)]
    games_per_agent: Option<usize>,
    /// Worker threads (defaults to the number of hardware threads)
    #[arg(long)]
    workers: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    /// Include the default weights in the first generation
    #[arg(long)]
    seed_with_default: bool,
    /// Generation report file (stderr if omitted)
    #[arg(long)]
    log: Option<PathBuf>,
    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

impl OptimizeArg {
    fn load_config(&self) -> anyhow::Result<EvolutionConfig> {
        let mut config: EvolutionConfig = match &self.config {
            Some(path) => util::read_json_file("optimizer config", path)?,
            None => EvolutionConfig::default(),
        };
        let overrides = [
            (&mut config.generations, self.generations),
            (&mut config.initial_turn_cap, self.turn_cap),
            (&mut config.population_size, self.population),
            (&mut config.games_per_agent, self.games_per_agent),
            (&mut config.workers, self.workers),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.seed_with_default |= self.seed_with_default;
        Ok(config)
    }
}

pub(crate) fn run(arg: &OptimizeArg) -> anyhow::Result<()> {
    let config = arg.load_config()?;
    if arg.print_config {
        return Output::stdout().write_json(&config);
    }

    let report_output = Output::from_log_path(arg.log.clone())?;
    tracing::info!(
        generations = config.generations,
        population = config.population_size,
        games_per_agent = config.games_per_agent,
        workers = config.workers,
        turn_cap = config.initial_turn_cap,
        report = %report_output.display_path(),
        "starting optimization"
    );

    let mut engine = EvolutionEngine::new(config, TextSink::new(report_output))
        .context("Failed to start optimizer")?;
    engine.run().context("Optimization failed")?;

    let best = engine
        .best()
        .context("Optimization finished without a report")?;
    tracing::info!(
        rows = best.rows_completed,
        turns = best.turns_played,
        weights = %best.weights,
        "best agent"
    );
    let mut output = Output::stdout();
    writeln!(output, "{}", best.weights)
        .with_context(|| format!("Failed to write weights to {}", output.display_path()))?;
    Ok(())
}
