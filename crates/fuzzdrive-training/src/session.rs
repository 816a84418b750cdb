use fuzzdrive_engine::TrackWorld;
use rand_pcg::Pcg32;

use crate::{
    config::{ConfigError, TrainingConfig},
    genetic::PopulationEvolver,
    population::{FitnessSummary, Population},
    seed::TrainingSeed,
};

/// Outcome of one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionStatus {
    /// The current generation is still being evaluated.
    Running { alive: usize },
    /// Every agent terminated; the population was rolled over.
    ///
    /// `generation` is the index of the freshly installed generation and
    /// `summary` describes the fitness of the one that just finished.
    GenerationComplete {
        generation: u32,
        summary: FitnessSummary,
    },
    /// An agent completed the lap target. Training is finished.
    LapTargetReached { generation: u32, laps: u32 },
}

/// Drives one full training run: evaluate, roll over, repeat.
///
/// The session owns the world, the current population, and the only RNG used
/// for genetic operations, so a run is fully determined by its seed and
/// configuration.
#[derive(Debug)]
pub struct TrainingSession {
    world: TrackWorld,
    population: Population,
    evolver: PopulationEvolver,
    generation: u32,
    rng: Pcg32,
}

impl TrainingSession {
    /// Starts a session with a freshly randomized generation zero.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration fails validation.
    pub fn new(
        world: TrackWorld,
        config: TrainingConfig,
        seed: TrainingSeed,
    ) -> Result<Self, ConfigError> {
        let evolver = PopulationEvolver::new(config)?;
        let mut rng = seed.rng();
        let population = Population::random(&world, config.target_population, &mut rng);
        Ok(Self {
            world,
            population,
            evolver,
            generation: 0,
            rng,
        })
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Ticks every live agent, then checks the lap target and, once the whole
    /// generation has terminated, breeds and installs the next one.
    pub fn advance(&mut self, dt: f32) -> SessionStatus {
        self.population.tick(dt, self.world.track());

        let laps = self.population.max_laps();
        if laps >= self.world.track().laps_to_win() {
            return SessionStatus::LapTargetReached {
                generation: self.generation,
                laps,
            };
        }

        if self.population.all_terminated() {
            let summary = self
                .population
                .fitness_summary()
                .unwrap_or(FitnessSummary {
                    min: 0.0,
                    max: 0.0,
                    mean: 0.0,
                    median: 0.0,
                });
            self.population = self
                .evolver
                .evolve(&mut self.population, &self.world, &mut self.rng);
            self.generation += 1;
            return SessionStatus::GenerationComplete {
                generation: self.generation,
                summary,
            };
        }

        SessionStatus::Running {
            alive: self.population.alive_count(),
        }
    }

    #[must_use]
    pub const fn world(&self) -> &TrackWorld {
        &self.world
    }

    #[must_use]
    pub const fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub const fn evolver(&self) -> &PopulationEvolver {
        &self.evolver
    }

    /// Index of the generation currently being evaluated.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fuzzdrive_engine::{Checkpoint, StartPose, Track, TrackMap};

    use super::*;
    use crate::agent::INITIAL_TIME_REMAINING;

    fn seed() -> TrainingSeed {
        "00000000000000000000000000002026"
            .parse()
            .unwrap()
    }

    fn arena_world(checkpoints: Vec<Checkpoint>, laps_to_win: u32) -> TrackWorld {
        let map = Arc::new(TrackMap::open_arena(100, 100));
        let start = StartPose {
            x: 200.0,
            y: 500.0,
            heading: 0.0,
        };
        TrackWorld::new(map, Track::new(checkpoints, laps_to_win), start)
    }

    #[test]
    fn generation_completes_within_the_time_budget() {
        let world = arena_world(vec![], 3);
        let config = TrainingConfig {
            target_population: 10,
            ..TrainingConfig::default()
        };
        let mut session = TrainingSession::new(world, config, seed()).unwrap();

        let dt = 1.0 / 60.0;
        // Without checkpoints no time refunds happen, so the whole generation
        // must terminate within the initial budget plus slack for collisions.
        let max_ticks = (INITIAL_TIME_REMAINING / dt).ceil() as usize + 10;
        let mut completed = false;
        for _ in 0..max_ticks {
            match session.advance(dt) {
                SessionStatus::GenerationComplete { generation, summary } => {
                    assert_eq!(generation, 1);
                    assert!(summary.min <= summary.median && summary.median <= summary.max);
                    completed = true;
                    break;
                }
                SessionStatus::Running { alive } => assert!(alive <= 10),
                SessionStatus::LapTargetReached { .. } => {
                    panic!("no laps possible without checkpoints")
                }
            }
        }
        assert!(completed, "generation never terminated");
        assert_eq!(session.generation(), 1);
        assert_eq!(session.population().len(), 10);
        assert_eq!(session.population().alive_count(), 10);
    }

    #[test]
    fn lap_target_stops_the_session() {
        // A single checkpoint enclosing the start pose: every fitness update
        // captures it, so laps accumulate as fast as ticks.
        let checkpoint = Checkpoint {
            x: 200.0,
            y: 500.0,
            radius: 400.0,
        };
        let world = arena_world(vec![checkpoint], 2);
        let config = TrainingConfig {
            target_population: 4,
            ..TrainingConfig::default()
        };
        let mut session = TrainingSession::new(world, config, seed()).unwrap();

        let mut reached = None;
        for _ in 0..100 {
            if let SessionStatus::LapTargetReached { generation, laps } =
                session.advance(1.0 / 60.0)
            {
                reached = Some((generation, laps));
                break;
            }
        }
        let (generation, laps) = reached.expect("lap target never reached");
        assert_eq!(generation, 0);
        assert!(laps >= 2);
    }

    #[test]
    fn runs_are_reproducible_for_a_fixed_seed() {
        let config = TrainingConfig {
            target_population: 6,
            ..TrainingConfig::default()
        };
        let mut a = TrainingSession::new(arena_world(vec![], 3), config, seed()).unwrap();
        let mut b = TrainingSession::new(arena_world(vec![], 3), config, seed()).unwrap();

        for _ in 0..600 {
            assert_eq!(a.advance(1.0 / 60.0), b.advance(1.0 / 60.0));
        }
        let (sa, sb) = (
            a.population().fitness_summary().unwrap(),
            b.population().fitness_summary().unwrap(),
        );
        assert_eq!(sa, sb);
    }
}
