use rand::Rng;

/// Total number of fuzzy rules in a genome.
///
/// Rules `0..10` drive steering, rules `10..20` drive throttle.
pub const RULE_COUNT: usize = 20;
/// Number of input membership channels (5 sensors x 5 distance levels).
pub const INPUT_CHANNELS: usize = 25;
/// Number of discrete output bins per controlled quantity.
pub const OUTPUT_BINS: usize = 5;
/// Bits per clause mask: one per (input channel, output bin) pair.
pub const CLAUSE_BITS: usize = INPUT_CHANNELS * OUTPUT_BINS;
/// Logical genes per rule: activation flag + OR clause + AND clause.
pub const GENES_PER_RULE: usize = 1 + 2 * CLAUSE_BITS;

/// Probability that an individual clause bit is set at random initialization.
///
/// Sparse initialization keeps most rules from firing on every input, which
/// would collapse the controller to a near-constant output.
const SPARSE_BIT_PROBABILITY: f64 = 0.02;

const CLAUSE_MASK: u128 = (1 << CLAUSE_BITS) - 1;

/// 125-bit clause mask over the (input channel, output bin) cross product.
///
/// Bit `channel * OUTPUT_BINS + bin` controls whether the channel participates
/// in the clause for that output bin. Stored in the low 125 bits of a `u128`;
/// the top 3 bits are always clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleMask(u128);

impl RuleMask {
    pub const EMPTY: Self = Self(0);

    const fn bit(channel: usize, bin: usize) -> u128 {
        1 << (channel * OUTPUT_BINS + bin)
    }

    /// Checks whether the bit for `(channel, bin)` is set.
    #[inline]
    #[must_use]
    pub const fn is_set(self, channel: usize, bin: usize) -> bool {
        self.0 & Self::bit(channel, bin) != 0
    }

    /// Sets the bit for `(channel, bin)`.
    pub const fn set(&mut self, channel: usize, bin: usize) {
        self.0 |= Self::bit(channel, bin);
    }

    /// Number of set bits in the mask.
    #[must_use]
    pub const fn count_ones(self) -> u32 {
        self.0.count_ones()
    }

    fn random_sparse<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut bits = 0;
        for i in 0..CLAUSE_BITS {
            if rng.random_bool(SPARSE_BIT_PROBABILITY) {
                bits |= 1 << i;
            }
        }
        Self(bits)
    }

    fn mutate<R>(&mut self, rate: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for i in 0..CLAUSE_BITS {
            if rng.random_bool(rate) {
                self.0 ^= 1 << i;
            }
        }
    }

    fn crossover<R>(a: Self, b: Self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        // Each bit picked from one parent with equal probability.
        let select = rng.random::<u128>() & CLAUSE_MASK;
        Self((a.0 & select) | (b.0 & !select))
    }
}

/// One fuzzy rule: an activation flag plus OR/AND clause masks.
///
/// An inactive rule contributes nothing to inference regardless of its masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rule {
    pub active: bool,
    pub or_mask: RuleMask,
    pub and_mask: RuleMask,
}

impl Rule {
    pub const INACTIVE: Self = Self {
        active: false,
        or_mask: RuleMask::EMPTY,
        and_mask: RuleMask::EMPTY,
    };

    fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            active: rng.random_bool(0.5),
            or_mask: RuleMask::random_sparse(rng),
            and_mask: RuleMask::random_sparse(rng),
        }
    }

    fn mutate<R>(&mut self, rate: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        if rng.random_bool(rate) {
            self.active = !self.active;
        }
        self.or_mask.mutate(rate, rng);
        self.and_mask.mutate(rate, rng);
    }

    fn crossover<R>(a: &Self, b: &Self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            active: if rng.random_bool(0.5) { a.active } else { b.active },
            or_mask: RuleMask::crossover(a.or_mask, b.or_mask, rng),
            and_mask: RuleMask::crossover(a.and_mask, b.and_mask, rng),
        }
    }
}

/// Fixed-length genetic encoding of a fuzzy controller.
///
/// The genome is structured as an array of [`RULE_COUNT`] rules rather than a
/// flat bit vector; the logical gene count (20 rules x 251 genes) and gene
/// order are nevertheless fixed, and genetic operators treat every flag and
/// clause bit as an independent gene.
///
/// A genome is owned by exactly one agent at a time. Crossover and mutation
/// always act on fresh copies, never on a genome whose behavior has already
/// been evaluated this generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genome {
    rules: [Rule; RULE_COUNT],
}

impl Genome {
    /// Genome with every gene false. Both controller outputs are exactly 0.0.
    pub const ALL_INACTIVE: Self = Self {
        rules: [Rule::INACTIVE; RULE_COUNT],
    };

    /// Creates a genome with sparse random clause bits and 50/50 activation flags.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            rules: std::array::from_fn(|_| Rule::random(rng)),
        }
    }

    /// Builds a genome from explicit rules.
    #[must_use]
    pub const fn from_rules(rules: [Rule; RULE_COUNT]) -> Self {
        Self { rules }
    }

    #[must_use]
    pub const fn rules(&self) -> &[Rule; RULE_COUNT] {
        &self.rules
    }

    /// Flips each gene independently with probability `rate`.
    ///
    /// `rate` 0.0 leaves the genome untouched; 1.0 flips every gene.
    ///
    /// # Panics
    ///
    /// Panics if `rate` is not within `[0, 1]`.
    pub fn mutate<R>(&mut self, rate: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        assert!((0.0..=1.0).contains(&rate), "mutation rate must be in [0, 1]");
        for rule in &mut self.rules {
            rule.mutate(rate, rng);
        }
    }

    /// Uniform gene-wise crossover: each gene copied from either parent with
    /// probability 0.5.
    pub fn crossover<R>(a: &Self, b: &Self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            rules: std::array::from_fn(|i| Rule::crossover(&a.rules[i], &b.rules[i], rng)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn clause_bit_count(genome: &Genome) -> u32 {
        genome
            .rules()
            .iter()
            .map(|r| r.or_mask.count_ones() + r.and_mask.count_ones())
            .sum()
    }

    #[test]
    fn random_genome_is_sparse() {
        let mut rng = Pcg32::seed_from_u64(1);
        let genome = Genome::random(&mut rng);

        // 2% of 20 * 250 clause bits = 100 expected; allow a generous band.
        let set = clause_bit_count(&genome);
        assert!((30..300).contains(&set), "unexpected bit count {set}");
    }

    #[test]
    fn mutation_rate_zero_is_identity() {
        let mut rng = Pcg32::seed_from_u64(2);
        let original = Genome::random(&mut rng);
        let mut copy = original.clone();
        copy.mutate(0.0, &mut rng);
        assert_eq!(copy, original);
    }

    #[test]
    fn mutation_rate_one_flips_every_gene() {
        let mut rng = Pcg32::seed_from_u64(3);
        let original = Genome::random(&mut rng);
        let mut flipped = original.clone();
        flipped.mutate(1.0, &mut rng);

        for (a, b) in original.rules().iter().zip(flipped.rules()) {
            assert_eq!(a.active, !b.active);
            for channel in 0..INPUT_CHANNELS {
                for bin in 0..OUTPUT_BINS {
                    assert_eq!(a.or_mask.is_set(channel, bin), !b.or_mask.is_set(channel, bin));
                    assert_eq!(
                        a.and_mask.is_set(channel, bin),
                        !b.and_mask.is_set(channel, bin)
                    );
                }
            }
        }
    }

    #[test]
    fn crossover_is_gene_wise() {
        let mut rng = Pcg32::seed_from_u64(4);
        let a = Genome::random(&mut rng);
        let b = Genome::random(&mut rng);
        let child = Genome::crossover(&a, &b, &mut rng);

        for ((ra, rb), rc) in a.rules().iter().zip(b.rules()).zip(child.rules()) {
            assert!(rc.active == ra.active || rc.active == rb.active);
            for channel in 0..INPUT_CHANNELS {
                for bin in 0..OUTPUT_BINS {
                    let ga = ra.or_mask.is_set(channel, bin);
                    let gb = rb.or_mask.is_set(channel, bin);
                    let gc = rc.or_mask.is_set(channel, bin);
                    assert!(gc == ga || gc == gb, "OR gene not inherited");

                    let ga = ra.and_mask.is_set(channel, bin);
                    let gb = rb.and_mask.is_set(channel, bin);
                    let gc = rc.and_mask.is_set(channel, bin);
                    assert!(gc == ga || gc == gb, "AND gene not inherited");
                }
            }
        }
    }

    #[test]
    fn crossover_of_identical_parents_is_identity() {
        let mut rng = Pcg32::seed_from_u64(5);
        let a = Genome::random(&mut rng);
        let child = Genome::crossover(&a, &a.clone(), &mut rng);
        assert_eq!(child, a);
    }
}
