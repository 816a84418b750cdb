//! Fuzzy-rule-based controller ("brain") evolved by a genetic algorithm.
//!
//! This crate implements the decision-making side of the driver AI:
//!
//! 1. **Genome** (`genome`) - A fixed-length genetic encoding of 20 fuzzy rules.
//!    Rules 0-9 govern steering, rules 10-19 govern throttle. Each rule carries an
//!    activation flag plus an OR-clause and an AND-clause bit mask over the
//!    25 input channels x 5 output bins cross product.
//! 2. **Fuzzification** (`fuzzifier`) - Converts 5 normalized distance-sensor
//!    readings into a 25-value membership snapshot over 5 fuzzy distance levels.
//! 3. **Inference** (`controller`) - Evaluates the genome's rules against a
//!    snapshot and defuzzifies the aggregated bin activations into a steering
//!    angle and a throttle level.
//!
//! # Data Flow
//!
//! ```text
//! Sensor readings [0, 100] x 5
//!     ↓ fuzzifier::fuzzify
//! FuzzySnapshot (25 membership values)
//!     ↓ FuzzyController::evaluate_steering / evaluate_throttle
//! Steering angle [-45, 45] / throttle level [-1, 1]
//! ```
//!
//! The crate is deliberately free of any simulation or training concern: it is a
//! pure function from sensor space to control space, parameterized by a genome.
//! Genetic operators ([`Genome::mutate`], [`Genome::crossover`]) live here so that
//! the bit layout stays private to one crate.

pub use self::{controller::*, fuzzifier::*, genome::*};

mod controller;
mod fuzzifier;
mod genome;
