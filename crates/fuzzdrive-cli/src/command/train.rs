use std::{path::PathBuf, sync::Arc};

use fuzzdrive_engine::{StartPose, Track, TrackLayout, TrackMap, TrackWorld};
use fuzzdrive_training::{
    FitnessSummary, SessionStatus, TrainingConfig, TrainingSeed, TrainingSession,
};
use rand::Rng as _;

use crate::util;

/// Laps an agent must complete for the run to count as won.
const LAPS_TO_WIN: u32 = 3;

/// Start pose for the built-in ring circuit, centered on the top road band.
const RING_START: StartPose = StartPose {
    x: 140.0,
    y: 170.0,
    heading: 0.0,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Track layout JSON file; the built-in ring circuit when omitted
    #[arg(long)]
    map: Option<PathBuf>,
    /// Agents per generation
    #[arg(long, default_value_t = 100)]
    population: usize,
    /// Per-gene mutation probability
    #[arg(long, default_value_t = 0.05)]
    mutation_rate: f64,
    /// Stop after this many generations without a winner
    #[arg(long, default_value_t = 200)]
    generations: u32,
    /// Simulated seconds advanced per wall-clock tick, as a multiplier
    #[arg(long, default_value_t = 1.0)]
    time_scale: f32,
    /// Simulation ticks per simulated second
    #[arg(long, default_value_t = 60.0)]
    tick_rate: f32,
    /// 32-hex-char seed for a reproducible run
    #[arg(long)]
    seed: Option<TrainingSeed>,
}

impl Default for TrainArg {
    fn default() -> Self {
        Self {
            map: None,
            population: 100,
            mutation_rate: 0.05,
            generations: 200,
            time_scale: 1.0,
            tick_rate: 60.0,
            seed: None,
        }
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let (map, start) = match &arg.map {
        Some(path) => {
            let layout: TrackLayout = util::read_json_file("track layout", path)?;
            layout.build()?
        }
        None => (TrackMap::ring_circuit(), RING_START),
    };
    let map = Arc::new(map);
    let track = Track::generate(&map, start, LAPS_TO_WIN);
    anyhow::ensure!(
        !track.checkpoints().is_empty(),
        "no checkpoints could be generated; is the start pose on the road?"
    );
    eprintln!(
        "Track ready: {} checkpoints, {} laps to win",
        track.checkpoints().len(),
        LAPS_TO_WIN
    );

    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    eprintln!("Seed: {seed}");

    let config = TrainingConfig {
        target_population: arg.population,
        mutation_rate: arg.mutation_rate,
        ..TrainingConfig::default()
    };
    let world = TrackWorld::new(map, track, start);
    let mut session = TrainingSession::new(world, config, seed)?;

    let dt = arg.time_scale / arg.tick_rate;
    anyhow::ensure!(dt > 0.0, "time scale and tick rate must be positive");

    loop {
        match session.advance(dt) {
            SessionStatus::Running { .. } => {}
            SessionStatus::GenerationComplete {
                generation,
                summary,
            } => {
                report_generation(&session, generation, summary);
                if generation >= arg.generations {
                    eprintln!("Generation limit reached without a winner.");
                    break;
                }
            }
            SessionStatus::LapTargetReached { generation, laps } => {
                eprintln!("Winner in generation #{generation}: {laps} laps completed.");
                if let Some(best) = session.population().best() {
                    eprintln!(
                        "  Fitness: {:.1} ({} checkpoints, {:.1} px traveled, {:.1} s alive)",
                        best.fitness(),
                        best.checkpoints_passed(),
                        best.distance_traveled(),
                        best.lifetime(),
                    );
                }
                break;
            }
        }
    }

    Ok(())
}

fn report_generation(session: &TrainingSession, generation: u32, summary: FitnessSummary) {
    eprintln!("Generation #{} terminated:", generation - 1);
    eprintln!("  Fitness:");
    eprintln!("    Min:    {:.1}", summary.min);
    eprintln!("    Max:    {:.1}", summary.max);
    eprintln!("    Mean:   {:.1}", summary.mean);
    eprintln!("    Median: {:.1}", summary.median);
    eprintln!(
        "  Best fitness so far: {:.1}",
        session.evolver().best_fitness()
    );
    if session.evolver().last_boosted() {
        eprintln!("  Stagnation detected: mutation boost applied to this rollover");
    }
}
