//! Fuzzy inference: genome rules applied to a membership snapshot.
//!
//! Steering and throttle are computed by two disjoint halves of the rule set.
//! Per output, every active rule accumulates activations into the 5 output
//! bins (OR clauses via running maximum, AND clauses via running minimum),
//! rule results aggregate across rules via maximum, and the final scalar is
//! the weighted centroid of the bin activations over a fixed consequent table.
//!
//! When no rule fires for an output, the result is the domain's neutral value
//! (0.0). This is the defined no-signal default, not an error.

use std::ops::Range;

use crate::{
    fuzzifier::FuzzySnapshot,
    genome::{Genome, OUTPUT_BINS, Rule},
};

/// Steering consequents in degrees, hard left to hard right.
pub const STEERING_CONSEQUENTS: [f32; OUTPUT_BINS] = [-45.0, -22.5, 0.0, 22.5, 45.0];
/// Throttle consequents: full brake, light brake, coast, half, full throttle.
pub const THROTTLE_CONSEQUENTS: [f32; OUTPUT_BINS] = [-1.0, -0.5, 0.0, 0.5, 1.0];

const STEERING_RULES: Range<usize> = 0..10;
const THROTTLE_RULES: Range<usize> = 10..20;

/// Deterministic fuzzy controller over one genome.
#[derive(Debug, Clone)]
pub struct FuzzyController {
    genome: Genome,
}

impl FuzzyController {
    #[must_use]
    pub const fn new(genome: Genome) -> Self {
        Self { genome }
    }

    #[must_use]
    pub const fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Desired steering angle in degrees, within `[-45, 45]`.
    #[must_use]
    pub fn evaluate_steering(&self, snapshot: &FuzzySnapshot) -> f32 {
        self.evaluate(snapshot, STEERING_RULES, &STEERING_CONSEQUENTS)
    }

    /// Desired throttle level within `[-1, 1]`; negative means braking.
    #[must_use]
    pub fn evaluate_throttle(&self, snapshot: &FuzzySnapshot) -> f32 {
        self.evaluate(snapshot, THROTTLE_RULES, &THROTTLE_CONSEQUENTS)
    }

    fn evaluate(
        &self,
        snapshot: &FuzzySnapshot,
        rules: Range<usize>,
        consequents: &[f32; OUTPUT_BINS],
    ) -> f32 {
        let mut bins = [0.0_f32; OUTPUT_BINS];
        for rule in &self.genome.rules()[rules] {
            if !rule.active {
                continue;
            }
            for (bin, aggregated) in bins.iter_mut().enumerate() {
                let fired = rule_activation(rule, snapshot, bin);
                *aggregated = aggregated.max(fired);
            }
        }
        defuzzify(&bins, consequents)
    }
}

/// Activation of one rule for one output bin.
fn rule_activation(rule: &Rule, snapshot: &FuzzySnapshot, bin: usize) -> f32 {
    let mut or_activation = 0.0_f32;
    let mut and_activation = 1.0_f32;
    let mut used_or = false;
    let mut used_and = false;

    for (channel, &value) in snapshot.values().iter().enumerate() {
        if rule.or_mask.is_set(channel, bin) {
            or_activation = or_activation.max(value);
            used_or = true;
        }
        if rule.and_mask.is_set(channel, bin) {
            and_activation = and_activation.min(value);
            used_and = true;
        }
    }

    match (used_or, used_and) {
        (true, true) => or_activation.min(and_activation),
        (true, false) => or_activation,
        (false, true) => and_activation,
        (false, false) => 0.0,
    }
}

/// Weighted-centroid defuzzification over the output bins.
///
/// Returns 0.0 when the total activation is zero (no rule fired).
fn defuzzify(activations: &[f32; OUTPUT_BINS], consequents: &[f32; OUTPUT_BINS]) -> f32 {
    let mut numerator = 0.0_f32;
    let mut denominator = 0.0_f32;
    for (activation, consequent) in activations.iter().zip(consequents) {
        numerator += activation * consequent;
        denominator += activation;
    }
    if denominator == 0.0 {
        return 0.0;
    }
    // Consequents bound the centroid, so no extra clamp is needed.
    numerator / denominator
}
