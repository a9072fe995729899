//! Parent selection strategies.
//!
//! Selection determines which chromosomes become parents for crossover.
//! The controller switches strategy as the run progresses: tournament while
//! exploring, roulette once the search has stabilized, rank in the final
//! phase of the run.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chromosome::compare_fitness;
use super::types::Individual;
use crate::error::{Result, TimetableError};

/// Selection strategy for choosing parents.
///
/// All strategies assume **maximization** (higher fitness = better).
///
/// # Examples
///
/// ```
/// use u_timetable::ga::Selection;
///
/// // Tournament with size 3 (moderate selection pressure)
/// let sel = Selection::Tournament(3);
///
/// // Late in a 1000-generation run, rank selection takes over
/// assert_eq!(Selection::for_generation(800, 1000, false, 3, 0.7), Selection::Rank);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// Tournament selection: pick `k` chromosomes at random, select the best.
    ///
    /// Higher `k` = stronger selection pressure.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// Timetable fitness is often negative, so weights are shifted:
    /// `w_i = f_i - min + ε`. Equal fitness degenerates to uniform
    /// selection.
    ///
    /// # Complexity
    /// O(n) per selection (linear scan)
    Roulette,

    /// Linear rank selection.
    ///
    /// Chromosomes are sorted best first and weighted `n, n-1, …, 1`, so
    /// the probability depends on position only, not on fitness scale.
    ///
    /// Reference: Baker (1985), "Adaptive Selection Methods for Genetic
    /// Algorithms"
    ///
    /// # Complexity
    /// O(n log n) per selection (sort)
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Strategy for the 1-based generation `generation` of a
    /// `max_generations` run.
    ///
    /// Rank once `generation ≥ rank_phase × max_generations`; otherwise
    /// roulette while stable and tournament while exploring.
    pub fn for_generation(
        generation: usize,
        max_generations: usize,
        stable: bool,
        tournament_size: usize,
        rank_phase: f64,
    ) -> Self {
        if generation as f64 >= rank_phase * max_generations as f64 {
            Selection::Rank
        } else if stable {
            Selection::Roulette
        } else {
            Selection::Tournament(tournament_size)
        }
    }

    /// Select a parent index from the population.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<I: Individual, R: Rng>(&self, population: &[I], rng: &mut R) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::Tournament(k) => tournament(population, *k, rng),
            Selection::Roulette => roulette(population, rng),
            Selection::Rank => rank(population, rng),
        }
    }

    /// Selects `count` parent indices, in mating order.
    ///
    /// # Errors
    /// [`TimetableError::EmptyPopulation`] if `population` is empty.
    pub fn select_parents<I: Individual, R: Rng>(
        &self,
        population: &[I],
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        if population.is_empty() {
            return Err(TimetableError::EmptyPopulation);
        }
        Ok((0..count).map(|_| self.select(population, rng)).collect())
    }
}

/// Tournament selection: pick k random chromosomes, return the best.
fn tournament<I: Individual, R: Rng>(population: &[I], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if population[idx].fitness() > population[best_idx].fitness() {
            best_idx = idx;
        }
    }
    best_idx
}

/// Roulette wheel selection over min-shifted fitness.
fn roulette<I: Individual, R: Rng>(population: &[I], rng: &mut R) -> usize {
    let n = population.len();
    if n == 1 {
        return 0;
    }

    let fitnesses: Vec<f64> = population.iter().map(Individual::fitness).collect();
    let min_fitness = fitnesses.iter().cloned().fold(f64::INFINITY, f64::min);
    if !min_fitness.is_finite() {
        return rng.random_range(0..n);
    }

    let epsilon = 1e-10;
    let weights: Vec<f64> = fitnesses
        .iter()
        .map(|&f| {
            let w = f - min_fitness + epsilon;
            if w.is_finite() && w > 0.0 {
                w
            } else {
                epsilon
            }
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }

    n - 1 // floating-point fallback
}

/// Rank-based selection using linear ranking, best first.
fn rank<I: Individual, R: Rng>(population: &[I], rng: &mut R) -> usize {
    let n = population.len();
    if n == 1 {
        return 0;
    }

    let mut indexed: Vec<(usize, f64)> = population
        .iter()
        .enumerate()
        .map(|(i, ind)| (i, ind.fitness()))
        .collect();
    indexed.sort_by(|a, b| compare_fitness(b.1, a.1));

    // weight_i = n - rank_i
    let total: f64 = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;

    for (rank, &(original_idx, _)) in indexed.iter().enumerate() {
        let weight = (n - rank) as f64;
        cumulative += weight;
        if cumulative > threshold {
            return original_idx;
        }
    }

    indexed[n - 1].0 // fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[derive(Clone)]
    struct TestInd {
        fit: f64,
    }

    impl Individual for TestInd {
        fn fitness(&self) -> f64 {
            self.fit
        }
    }

    fn make_population(fitnesses: &[f64]) -> Vec<TestInd> {
        fitnesses.iter().map(|&f| TestInd { fit: f }).collect()
    }

    fn counts(sel: Selection, pop: &[TestInd], n: usize) -> Vec<u32> {
        let mut rng = create_rng(42);
        let mut counts = vec![0u32; pop.len()];
        for _ in 0..n {
            counts[sel.select(pop, &mut rng)] += 1;
        }
        counts
    }

    #[test]
    fn test_tournament_favors_best() {
        let pop = make_population(&[-10.0, -5.0, 0.9, -8.0]);
        let counts = counts(Selection::Tournament(4), &pop, 10000);
        // Index 2 (fitness=0.9) should dominate
        assert!(
            counts[2] > 6000,
            "expected best to be selected >60% of the time, got {counts:?}"
        );
    }

    #[test]
    fn test_tournament_size_1_is_random() {
        let pop = make_population(&[-10.0, -5.0, 0.9, -8.0]);
        for &c in &counts(Selection::Tournament(1), &pop, 10000) {
            assert!(c > 1500, "expected uniform, got count {c}");
        }
    }

    #[test]
    fn test_roulette_favors_best_with_negative_fitness() {
        let pop = make_population(&[-100.0, -50.0, 0.5, -80.0]);
        let counts = counts(Selection::Roulette, &pop, 10000);
        assert!(
            counts[2] > counts[1] && counts[1] > counts[0],
            "expected selection to follow fitness, got {counts:?}"
        );
    }

    #[test]
    fn test_roulette_equal_fitness_is_uniform() {
        let pop = make_population(&[-3.0, -3.0, -3.0, -3.0]);
        for &c in &counts(Selection::Roulette, &pop, 10000) {
            assert!(c > 2000, "expected roughly uniform, got count {c}");
        }
    }

    #[test]
    fn test_rank_favors_best() {
        let pop = make_population(&[-100.0, -50.0, 0.5, -80.0]);
        let counts = counts(Selection::Rank, &pop, 10000);
        // weights 4:3:2:1 for ranks of indices 2, 1, 3, 0
        assert!(counts[2] > counts[1]);
        assert!(counts[1] > counts[3]);
        assert!(counts[3] > counts[0]);
    }

    #[test]
    fn test_single_individual() {
        let pop = make_population(&[5.0]);
        let mut rng = create_rng(42);

        assert_eq!(Selection::Tournament(3).select(&pop, &mut rng), 0);
        assert_eq!(Selection::Roulette.select(&pop, &mut rng), 0);
        assert_eq!(Selection::Rank.select(&pop, &mut rng), 0);
    }

    #[test]
    fn test_select_parents() {
        let pop = make_population(&[1.0, 2.0, 3.0]);
        let mut rng = create_rng(7);
        let parents = Selection::Rank.select_parents(&pop, 6, &mut rng).unwrap();
        assert_eq!(parents.len(), 6);
        assert!(parents.iter().all(|&i| i < 3));

        let empty: Vec<TestInd> = vec![];
        assert_eq!(
            Selection::Roulette.select_parents(&empty, 2, &mut rng),
            Err(TimetableError::EmptyPopulation)
        );
    }

    #[test]
    fn test_policy_by_generation() {
        assert_eq!(
            Selection::for_generation(10, 100, false, 4, 0.7),
            Selection::Tournament(4)
        );
        assert_eq!(
            Selection::for_generation(10, 100, true, 4, 0.7),
            Selection::Roulette
        );
        // rank takes precedence over stability
        assert_eq!(
            Selection::for_generation(70, 100, true, 4, 0.7),
            Selection::Rank
        );
        assert_eq!(
            Selection::for_generation(69, 100, false, 4, 0.7),
            Selection::Tournament(4)
        );
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_population_panics() {
        let pop: Vec<TestInd> = vec![];
        let mut rng = create_rng(42);
        Selection::Tournament(3).select(&pop, &mut rng);
    }
}
