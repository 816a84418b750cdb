use fuzzdrive_brain::Genome;
use fuzzdrive_engine::{Track, TrackWorld};
use rand::Rng;

use crate::agent::Agent;

/// One generation of agents evaluated together on a shared world.
#[derive(Debug, Clone)]
pub struct Population {
    agents: Vec<Agent>,
}

impl Population {
    /// Spawns `count` agents with independently randomized genomes.
    pub fn random<R>(world: &TrackWorld, count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let agents = (0..count)
            .map(|_| Agent::new(Genome::random(rng), world))
            .collect();
        Self { agents }
    }

    /// Spawns one agent per genome, all at the world's start pose.
    #[must_use]
    pub fn from_genomes(genomes: Vec<Genome>, world: &TrackWorld) -> Self {
        let agents = genomes
            .into_iter()
            .map(|genome| Agent::new(genome, world))
            .collect();
        Self { agents }
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Advances every live agent by one tick and refreshes its fitness.
    ///
    /// Terminated agents are skipped entirely, so their fitness stays frozen
    /// at its value from the tick they died.
    pub fn tick(&mut self, dt: f32, track: &Track) {
        for agent in &mut self.agents {
            if agent.is_destroyed() {
                continue;
            }
            agent.control(dt);
            agent.update_fitness(track);
        }
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| !a.is_destroyed()).count()
    }

    #[must_use]
    pub fn all_terminated(&self) -> bool {
        self.agents.iter().all(Agent::is_destroyed)
    }

    /// Fittest agent of the generation, if any.
    #[must_use]
    pub fn best(&self) -> Option<&Agent> {
        self.agents
            .iter()
            .max_by(|a, b| a.fitness().total_cmp(&b.fitness()))
    }

    /// Highest completed lap count across the population.
    #[must_use]
    pub fn max_laps(&self) -> u32 {
        self.agents.iter().map(Agent::laps).max().unwrap_or(0)
    }

    /// Orders agents from fittest to least fit.
    pub fn sort_by_fitness_desc(&mut self) {
        self.agents
            .sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
    }

    /// Fitness distribution of the generation, `None` when empty.
    #[must_use]
    pub fn fitness_summary(&self) -> Option<FitnessSummary> {
        if self.agents.is_empty() {
            return None;
        }
        let mut values = self
            .agents
            .iter()
            .map(Agent::fitness)
            .collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);

        let min = values[0];
        let max = values[values.len() - 1];
        #[expect(clippy::cast_precision_loss)]
        let mean = values.iter().sum::<f32>() / values.len() as f32;
        let mid = values.len() / 2;
        let median = if values.len() % 2 == 0 {
            f32::midpoint(values[mid - 1], values[mid])
        } else {
            values[mid]
        };

        Some(FitnessSummary {
            min,
            max,
            mean,
            median,
        })
    }
}

/// Summary statistics over one generation's fitness values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessSummary {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub median: f32,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fuzzdrive_engine::{StartPose, TrackMap};
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

    #[test]
    fn random_population_has_requested_size() {
        let world = arena_world();
        let mut rng = Pcg32::seed_from_u64(7);
        let population = Population::random(&world, 12, &mut rng);
        assert_eq!(population.len(), 12);
        assert_eq!(population.alive_count(), 12);
        assert!(!population.all_terminated());
    }

    #[test]
    fn every_agent_terminates_within_the_time_budget() {
        let world = arena_world();
        let mut rng = Pcg32::seed_from_u64(8);
        let mut population = Population::random(&world, 8, &mut rng);

        // No checkpoints, so nothing can refund time. Worst case every agent
        // coasts until the 6 second budget runs dry.
        let mut ticks = 0;
        while !population.all_terminated() && ticks < 1_000 {
            population.tick(1.0 / 60.0, world.track());
            ticks += 1;
        }
        assert!(population.all_terminated(), "agents still alive");
    }

    #[test]
    fn sort_and_summary_agree_on_extremes() {
        let world = arena_world();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut population = Population::random(&world, 10, &mut rng);

        for _ in 0..120 {
            population.tick(1.0 / 60.0, world.track());
        }
        population.sort_by_fitness_desc();
        let summary = population.fitness_summary().unwrap();
        let best = population.best().unwrap();

        assert_eq!(best.fitness(), population.agents()[0].fitness());
        assert_eq!(summary.max, best.fitness());
        assert!(summary.min <= summary.median && summary.median <= summary.max);
        assert_eq!(
            summary.min,
            population.agents()[population.len() - 1].fitness()
        );
    }

    #[test]
    fn inert_genomes_score_exactly_by_distance_and_lifetime() {
        use crate::agent::{INITIAL_TIME_REMAINING, SLOWNESS_PENALTY_FACTOR};

        let world = arena_world();
        let genomes = vec![Genome::ALL_INACTIVE; 10];
        let mut population = Population::from_genomes(genomes, &world);

        let dt = 1.0 / 60.0;
        let mut ticks = 0;
        while !population.all_terminated() {
            population.tick(dt, world.track());
            ticks += 1;
            assert!(
                ticks <= (INITIAL_TIME_REMAINING / dt).ceil() as usize + 1,
                "population outlived its time budget"
            );
        }

        // With no checkpoints the fitness reduces to the base formula. All
        // agents share a genome and a start pose, so they score identically.
        for agent in population.agents() {
            let expected = agent.distance_traveled().max(0.0)
                - agent.lifetime() * SLOWNESS_PENALTY_FACTOR;
            assert!((agent.fitness() - expected).abs() < 1e-3);
            assert!(agent.distance_traveled() > 0.0, "forward bias should move the car");
        }
        let summary = population.fitness_summary().unwrap();
        assert!((summary.max - summary.min).abs() < 1e-3);
    }

    #[test]
    fn empty_population_has_no_summary() {
        let world = arena_world();
        let population = Population::from_genomes(vec![], &world);
        assert!(population.is_empty());
        assert!(population.fitness_summary().is_none());
        assert!(population.best().is_none());
        assert_eq!(population.max_laps(), 0);
    }
}
