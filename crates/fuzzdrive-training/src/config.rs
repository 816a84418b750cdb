/// Smallest population that supports elitism plus reproduction.
pub const MIN_POPULATION: usize = 2;

/// Tunable parameters of the evolutionary loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingConfig {
    /// Number of agents per generation.
    pub target_population: usize,
    /// Per-gene flip probability applied to offspring.
    pub mutation_rate: f64,
    /// Generations without a new best fitness before the boost kicks in.
    pub stagnation_threshold: u32,
    /// Elevated mutation rate used while the population is stagnant.
    pub mutation_boost_rate: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            target_population: 100,
            mutation_rate: 0.05,
            stagnation_threshold: 5,
            mutation_boost_rate: 0.20,
        }
    }
}

impl TrainingConfig {
    /// Rejects configurations the genetic operators cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error when the population is too small for elitism or a
    /// mutation rate falls outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_population < MIN_POPULATION {
            return Err(ConfigError::PopulationTooSmall {
                size: self.target_population,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::MutationRateOutOfRange {
                rate: self.mutation_rate,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_boost_rate) {
            return Err(ConfigError::BoostRateOutOfRange {
                rate: self.mutation_boost_rate,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size {size} is below the minimum of {MIN_POPULATION}")]
    PopulationTooSmall { size: usize },
    #[display("mutation rate {rate} is outside [0, 1]")]
    MutationRateOutOfRange { rate: f64 },
    #[display("mutation boost rate {rate} is outside [0, 1]")]
    BoostRateOutOfRange { rate: f64 },
}
