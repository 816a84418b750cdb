use fuzzdrive_brain::Genome;
use fuzzdrive_engine::TrackWorld;
use rand::Rng;

use crate::{
    config::{ConfigError, TrainingConfig},
    population::Population,
};

/// Number of top genomes copied unchanged into the next generation.
pub const ELITE_COUNT: usize = 2;
/// Contestants per tournament selection round.
pub const TOURNAMENT_SIZE: usize = 3;

/// Rolls terminated generations over into fresh populations.
///
/// Tracks the best fitness seen across the whole run; when it fails to improve
/// for more than the configured number of generations, the next rollover uses
/// the boosted mutation rate to kick the population out of the plateau.
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    config: TrainingConfig,
    best_fitness: f32,
    stagnant_generations: u32,
    last_boosted: bool,
}

impl PopulationEvolver {
    /// # Errors
    ///
    /// Returns an error when the configuration fails validation.
    pub fn new(config: TrainingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            best_fitness: f32::NEG_INFINITY,
            stagnant_generations: 0,
            last_boosted: false,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Best fitness observed over every generation so far.
    #[must_use]
    pub const fn best_fitness(&self) -> f32 {
        self.best_fitness
    }

    /// Whether the most recent rollover used the boosted mutation rate.
    #[must_use]
    pub const fn last_boosted(&self) -> bool {
        self.last_boosted
    }

    /// Breeds the next generation from a fully terminated population.
    ///
    /// The top [`ELITE_COUNT`] genomes survive unmutated; the remaining slots
    /// are filled by tournament selection, uniform crossover, and per-gene
    /// mutation. The returned population always has the configured target
    /// size, regardless of the evaluated population's size.
    ///
    /// # Panics
    ///
    /// Panics if `population` is empty.
    pub fn evolve<R>(
        &mut self,
        population: &mut Population,
        world: &TrackWorld,
        rng: &mut R,
    ) -> Population
    where
        R: Rng + ?Sized,
    {
        assert!(!population.is_empty(), "cannot evolve an empty population");
        population.sort_by_fitness_desc();

        let generation_best = population.agents()[0].fitness();
        if generation_best > self.best_fitness {
            self.best_fitness = generation_best;
            self.stagnant_generations = 0;
        } else {
            self.stagnant_generations += 1;
        }

        // The boost is transient: it applies to this rollover only and never
        // raises an already-high configured rate.
        let boost = self.stagnant_generations > self.config.stagnation_threshold
            && self.config.mutation_rate < self.config.mutation_boost_rate;
        let rate = if boost {
            self.config.mutation_boost_rate
        } else {
            self.config.mutation_rate
        };
        self.last_boosted = boost;

        let mut genomes = Vec::with_capacity(self.config.target_population);
        for agent in population.agents().iter().take(ELITE_COUNT) {
            genomes.push(agent.genome().clone());
        }
        while genomes.len() < self.config.target_population {
            let a = tournament_select(population, rng);
            let b = tournament_select(population, rng);
            let mut child = Genome::crossover(a, b, rng);
            child.mutate(rate, rng);
            genomes.push(child);
        }

        Population::from_genomes(genomes, world)
    }
}

/// Picks the fittest of [`TOURNAMENT_SIZE`] uniformly drawn contestants.
///
/// Draws are with replacement, so the same agent can enter a tournament more
/// than once.
fn tournament_select<'p, R>(population: &'p Population, rng: &mut R) -> &'p Genome
where
    R: Rng + ?Sized,
{
    let agents = population.agents();
    let mut best = &agents[rng.random_range(0..agents.len())];
    for _ in 1..TOURNAMENT_SIZE {
        let contender = &agents[rng.random_range(0..agents.len())];
        if contender.fitness() > best.fitness() {
            best = contender;
        }
    }
    best.genome()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fuzzdrive_engine::{StartPose, Track, TrackMap};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn arena_world() -> TrackWorld {
        let map = Arc::new(TrackMap::open_arena(100, 100));
        let start = StartPose {
            x: 200.0,
            y: 500.0,
            heading: 0.0,
        };
        TrackWorld::new(map, Track::new(vec![], 3), start)
    }

    fn evaluated_population(world: &TrackWorld, count: usize, rng: &mut Pcg32) -> Population {
        let mut population = Population::random(world, count, rng);
        let mut ticks = 0;
        while !population.all_terminated() && ticks < 1_000 {
            population.tick(1.0 / 30.0, world.track());
            ticks += 1;
        }
        population
    }

    #[test]
    fn rollover_produces_target_population() {
        let world = arena_world();
        let mut rng = Pcg32::seed_from_u64(20);
        let config = TrainingConfig {
            target_population: 16,
            ..TrainingConfig::default()
        };
        let mut evolver = PopulationEvolver::new(config).unwrap();

        // Evaluate fewer agents than the target; the rollover refills.
        let mut population = evaluated_population(&world, 10, &mut rng);
        let next = evolver.evolve(&mut population, &world, &mut rng);
        assert_eq!(next.len(), 16);
        assert_eq!(next.alive_count(), 16);
    }

    #[test]
    fn elites_survive_unmutated() {
        let world = arena_world();
        let mut rng = Pcg32::seed_from_u64(21);
        let mut evolver = PopulationEvolver::new(TrainingConfig {
            target_population: 12,
            ..TrainingConfig::default()
        })
        .unwrap();

        let mut population = evaluated_population(&world, 12, &mut rng);
        population.sort_by_fitness_desc();
        let elite_genomes = population
            .agents()
            .iter()
            .take(ELITE_COUNT)
            .map(|a| a.genome().clone())
            .collect::<Vec<_>>();

        let next = evolver.evolve(&mut population, &world, &mut rng);
        for (expected, agent) in elite_genomes.iter().zip(next.agents()) {
            assert_eq!(agent.genome(), expected);
        }
    }

    #[test]
    fn stagnation_triggers_transient_boost() {
        let world = arena_world();
        let mut rng = Pcg32::seed_from_u64(22);
        let mut evolver = PopulationEvolver::new(TrainingConfig {
            target_population: 8,
            stagnation_threshold: 2,
            ..TrainingConfig::default()
        })
        .unwrap();

        // Pin the best-ever fitness above anything an arena run can reach,
        // so every subsequent generation counts as stagnant.
        evolver.best_fitness = 1.0e9;

        let mut population = evaluated_population(&world, 8, &mut rng);
        for generation in 0..4 {
            let next = evolver.evolve(&mut population, &world, &mut rng);
            let expect_boost = generation >= 2;
            assert_eq!(
                evolver.last_boosted(),
                expect_boost,
                "generation {generation}"
            );
            population = next;
            let mut ticks = 0;
            while !population.all_terminated() && ticks < 1_000 {
                population.tick(1.0 / 30.0, world.track());
                ticks += 1;
            }
        }
        assert_eq!(evolver.best_fitness(), 1.0e9);
    }

    #[test]
    fn high_configured_rate_disables_boost() {
        let world = arena_world();
        let mut rng = Pcg32::seed_from_u64(23);
        let mut evolver = PopulationEvolver::new(TrainingConfig {
            target_population: 8,
            mutation_rate: 0.5,
            stagnation_threshold: 0,
            ..TrainingConfig::default()
        })
        .unwrap();
        evolver.best_fitness = 1.0e9;

        let mut population = evaluated_population(&world, 8, &mut rng);
        evolver.evolve(&mut population, &world, &mut rng);
        let mut population = evaluated_population(&world, 8, &mut rng);
        evolver.evolve(&mut population, &world, &mut rng);
        assert!(!evolver.last_boosted());
    }
}
