//! Fitness sharing.
//!
//! Discounts the fitness of chromosomes that sit in crowded regions of the
//! search space so one genotype cannot take over the population.
//!
//! # Model (Goldberg & Richardson, 1987)
//!
//! - distance `d(a, b)`: fraction of positions whose classroom or timeslot
//!   differ, in `[0, 1]`
//! - kernel `sh(d) = 1 - (d / σ)^α` for `d < σ`, else 0
//! - niche count `m_i = Σ_j sh(d(i, j))`, self included, so `m_i ≥ 1`
//!
//! Positive fitness is divided by `m_i`, non-positive fitness multiplied by
//! it; both move the value down. A chromosome farther than `σ` from every
//! other member has `m_i = 1` and keeps its raw fitness.
//!
//! # Reference
//! Goldberg & Richardson (1987), "Genetic Algorithms with Sharing for
//! Multimodal Function Optimization"

use super::chromosome::{Chromosome, Population};

/// Genotype distance: share of positions with a different placement.
pub fn distance(a: &Chromosome, b: &Chromosome) -> f64 {
    let n = a.len().max(b.len());
    if n == 0 {
        return 0.0;
    }
    let same = a
        .exams()
        .iter()
        .zip(b.exams())
        .filter(|(x, y)| x.same_placement(y))
        .count();
    (n - same) as f64 / n as f64
}

/// Sharing kernel.
#[inline]
pub fn sharing_kernel(distance: f64, radius: f64, alpha: f64) -> f64 {
    if distance < radius {
        1.0 - (distance / radius).powf(alpha)
    } else {
        0.0
    }
}

/// Niche count of every member.
pub fn niche_counts(members: &[Chromosome], radius: f64, alpha: f64) -> Vec<f64> {
    let n = members.len();
    let mut counts = vec![1.0; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let sh = sharing_kernel(distance(&members[i], &members[j]), radius, alpha);
            counts[i] += sh;
            counts[j] += sh;
        }
    }
    counts
}

/// Discounts `raw` by a niche count `m ≥ 1`.
#[inline]
pub fn shared_value(raw: f64, niche: f64) -> f64 {
    if raw > 0.0 {
        raw / niche
    } else {
        raw * niche
    }
}

/// Replaces every member's selection fitness with its shared value.
///
/// Always reads the raw fitness, so calling it again in the same
/// generation yields the same values.
pub fn apply_fitness_sharing(population: &mut Population, radius: f64, alpha: f64) {
    let counts = niche_counts(population.as_slice(), radius, alpha);
    for (chromosome, m) in population.members_mut().iter_mut().zip(counts) {
        let shared = shared_value(chromosome.raw_fitness(), m);
        chromosome.set_shared_fitness(shared);
    }
}
