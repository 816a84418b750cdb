//! Evolutionary training loop for fuzzy driver brains.
//!
//! This crate binds genomes (`fuzzdrive-brain`) to simulated vehicles
//! (`fuzzdrive-engine`) and evolves them across generations:
//!
//! 1. **Agent** (`agent`) - One genome driving one car: per-tick control
//!    (sensor snapshot → fuzzy inference → steering/throttle) and fitness
//!    accounting (checkpoints, signed distance, slowness penalty, time budget).
//! 2. **Population** (`population`) - The agents of one generation, advanced
//!    tick by tick in a fixed order until all are terminated.
//! 3. **Evolution** (`genetic`) - Rollover from one generation to the next:
//!    fitness ranking, elitism, tournament selection, uniform crossover,
//!    mutation with transient stagnation boosting.
//! 4. **Session** (`session`) - The outer loop gluing the above together,
//!    reporting generation completions and the lap-target win condition.
//!
//! # Training Cycle
//!
//! ```text
//! Population (N agents, one generation)
//!     ↓ tick(dt) until every agent is terminated
//! Fitness-ranked agents
//!     ↓ elitism + tournament selection + crossover + mutation
//! Next Population (fresh cars, copied genomes)
//! ```
//!
//! All randomness flows through a caller-supplied RNG; [`TrainingSeed`] gives
//! reproducible runs.

pub use self::{agent::*, config::*, genetic::*, population::*, seed::*, session::*};

mod agent;
mod config;
mod genetic;
mod population;
mod seed;
mod session;
