use clap::{Parser, Subcommand};

use self::{export_track::ExportTrackArg, train::TrainArg};

mod export_track;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve fuzzy driver brains with a genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Write the built-in circuit layout as JSON
    ExportTrack(#[clap(flatten)] ExportTrackArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Train(TrainArg::default())) {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::ExportTrack(arg) => export_track::run(&arg)?,
    }
    Ok(())
}
