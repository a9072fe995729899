//! Adaptive swap mutation.
//!
//! # Rate selection
//!
//! The population's average fitness is the threshold: a chromosome below it
//! mutates with the high rate, one at or above it with the low rate. Each
//! chromosome makes a single uniform draw in `[0, draw_ceiling)` and mutates
//! when `draw <= rate`.
//!
//! # Swap
//!
//! Two distinct positions exchange their timeslot and classroom. The
//! invigilators stay with their position. The result is not validated here;
//! the evaluator penalizes whatever the swap breaks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::chromosome::{Chromosome, Population};
use crate::models::EncodedExam;

/// Exchanges timeslot and classroom between positions `i` and `j`.
///
/// Applying the same swap twice restores the original genes.
///
/// # Panics
/// Panics if `i` or `j` is out of bounds.
pub fn swap_mutation(exams: &mut [EncodedExam], i: usize, j: usize) {
    if i == j {
        return;
    }
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    let (head, tail) = exams.split_at_mut(hi);
    let a = &mut head[lo];
    let b = &mut tail[0];
    std::mem::swap(&mut a.timeslot, &mut b.timeslot);
    std::mem::swap(&mut a.classroom_code, &mut b.classroom_code);
}

/// Swaps two distinct random positions. No-op for fewer than two genes.
pub fn random_swap<R: Rng>(exams: &mut [EncodedExam], rng: &mut R) {
    let n = exams.len();
    if n < 2 {
        return;
    }
    let i = rng.random_range(0..n);
    let mut j = rng.random_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    swap_mutation(exams, i, j);
}

/// Fitness-dependent mutation operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveMutation {
    /// Rate for chromosomes at or above the average.
    pub low_rate: f64,
    /// Rate for chromosomes below the average.
    pub high_rate: f64,
    /// Upper bound of the per-chromosome draw.
    pub draw_ceiling: f64,
}

impl AdaptiveMutation {
    /// Creates the operator.
    pub fn new(low_rate: f64, high_rate: f64, draw_ceiling: f64) -> Self {
        Self {
            low_rate,
            high_rate,
            draw_ceiling,
        }
    }

    /// Rate for a chromosome with `fitness` given the population `average`.
    #[inline]
    pub fn rate_for(&self, fitness: f64, average: f64) -> f64 {
        if fitness < average {
            self.high_rate
        } else {
            self.low_rate
        }
    }

    /// Mutates the population in place and returns how many chromosomes
    /// were changed.
    ///
    /// One seed per chromosome is drawn from `rng` before any work starts,
    /// so the outcome depends only on `rng`, not on `parallel` or thread
    /// scheduling.
    pub fn apply<R: Rng>(&self, population: &mut Population, parallel: bool, rng: &mut R) -> usize {
        let Some(average) = population.average_fitness() else {
            return 0;
        };
        let seeds: Vec<u64> = (0..population.len()).map(|_| rng.random()).collect();
        let members = population.members_mut();

        if parallel {
            members
                .par_iter_mut()
                .zip(seeds)
                .map(|(c, seed)| self.mutate_one(c, average, seed))
                .filter(|&changed| changed)
                .count()
        } else {
            members
                .iter_mut()
                .zip(seeds)
                .map(|(c, seed)| self.mutate_one(c, average, seed))
                .filter(|&changed| changed)
                .count()
        }
    }

    fn mutate_one(&self, chromosome: &mut Chromosome, average: f64, seed: u64) -> bool {
        let mut rng = StdRng::seed_from_u64(seed);
        let rate = self.rate_for(chromosome.fitness(), average);
        let draw = rng.random_range(0.0..self.draw_ceiling);
        if draw <= rate && chromosome.len() >= 2 {
            random_swap(chromosome.exams_mut(), &mut rng);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::testkit::{feasible, feasible_genes};
    use proptest::prelude::*;

    #[test]
    fn test_swap_keeps_invigilators() {
        let mut genes = feasible_genes();
        let before = genes.clone();
        swap_mutation(&mut genes, 0, 3);

        assert_eq!(genes[0].timeslot, before[3].timeslot);
        assert_eq!(genes[0].classroom_code, before[3].classroom_code);
        assert_eq!(genes[3].timeslot, before[0].timeslot);
        assert_eq!(genes[0].invigilators, before[0].invigilators);
        assert_eq!(genes[0].course_code(), "C1");
        assert_eq!(genes[1..3], before[1..3]);
    }

    #[test]
    fn test_random_swap_picks_distinct_positions() {
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let mut genes = feasible_genes();
            random_swap(&mut genes, &mut rng);
            let changed = genes
                .iter()
                .zip(feasible_genes())
                .filter(|(a, b)| *a != b)
                .count();
            // every fixture gene has a distinct placement
            assert_eq!(changed, 2);
        }
    }

    #[test]
    fn test_rate_threshold() {
        let m = AdaptiveMutation::new(0.01, 0.07, 0.1);
        assert_eq!(m.rate_for(-3.0, -1.0), 0.07);
        assert_eq!(m.rate_for(-1.0, -1.0), 0.01);
        assert_eq!(m.rate_for(0.5, -1.0), 0.01);
    }

    fn scored_population() -> Population {
        let members = (0..20)
            .map(|i| {
                let mut c = feasible(i);
                c.set_raw_fitness(if i % 2 == 0 { -2.0 } else { 0.5 });
                c
            })
            .collect();
        Population::new(members)
    }

    #[test]
    fn test_certain_and_impossible_mutation() {
        let mut rng = create_rng(1);
        let mut pop = scored_population();
        // every draw in [0, 0.1) is <= 1.0
        let always = AdaptiveMutation::new(1.0, 1.0, 0.1);
        assert_eq!(always.apply(&mut pop, false, &mut rng), 20);

        let mut pop = scored_population();
        let never = AdaptiveMutation::new(0.0, 0.0, 0.1);
        // a draw of exactly 0.0 is possible but vanishingly unlikely
        assert!(never.apply(&mut pop, true, &mut rng) <= 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let m = AdaptiveMutation::new(0.02, 0.08, 0.1);
        let mut seq = scored_population();
        let mut par = scored_population();
        let n_seq = m.apply(&mut seq, false, &mut create_rng(9));
        let n_par = m.apply(&mut par, true, &mut create_rng(9));
        assert_eq!(n_seq, n_par);
        assert_eq!(seq, par);
    }

    #[test]
    fn test_empty_population() {
        let m = AdaptiveMutation::new(1.0, 1.0, 0.1);
        let mut pop = Population::default();
        assert_eq!(m.apply(&mut pop, true, &mut create_rng(0)), 0);
    }

    proptest! {
        #[test]
        fn prop_swap_is_involution(i in 0usize..5, j in 0usize..5) {
            let original = feasible_genes();
            let mut genes = original.clone();
            swap_mutation(&mut genes, i, j);
            swap_mutation(&mut genes, i, j);
            prop_assert_eq!(genes, original);
        }
    }
}
