use clap::{Parser, Subcommand};

use self::{optimize::OptimizeArg, play::PlayArg};

mod optimize;
mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play one game with fixed weights and print `rows turns`
    Play(#[clap(flatten)] PlayArg),
    /// Tune weights with the genetic algorithm
    Optimize(#[clap(flatten)] OptimizeArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Optimize(arg) => optimize::run(&arg)?,
    }
    Ok(())
}
