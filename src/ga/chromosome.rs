//! Chromosome and population.
//!
//! # Encoding
//!
//! A [`Chromosome`] is one full timetable: one [`EncodedExam`] per course,
//! in entity-set course order. Every chromosome of a run uses the same
//! order, so position `i` always denotes the same course and crossover can
//! recombine positionally.
//!
//! # Identity
//!
//! Ids come from an [`IdGenerator`] owned by the runner. They are
//! assigned once, at creation, and never reused.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::types::Individual;
use crate::models::EncodedExam;

/// Chromosome identifier.
pub type ChromosomeId = u64;

/// One candidate timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chromosome {
    id: ChromosomeId,
    exams: Vec<EncodedExam>,
    /// Fitness used for selection and mutation (after sharing, if enabled).
    fitness: f64,
    /// Fitness before sharing; used to track the best timetable.
    raw_fitness: f64,
    /// Generations survived.
    age: u32,
}

impl Individual for Chromosome {
    fn fitness(&self) -> f64 {
        self.fitness
    }
}

impl Chromosome {
    /// Creates an unscored chromosome of age 0.
    pub fn new(id: ChromosomeId, exams: Vec<EncodedExam>) -> Self {
        Self {
            id,
            exams,
            fitness: f64::NEG_INFINITY,
            raw_fitness: f64::NEG_INFINITY,
            age: 0,
        }
    }

    /// Unique id.
    #[inline]
    pub fn id(&self) -> ChromosomeId {
        self.id
    }

    /// Genes in course order.
    #[inline]
    pub fn exams(&self) -> &[EncodedExam] {
        &self.exams
    }

    /// Mutable genes. The length never changes.
    #[inline]
    pub fn exams_mut(&mut self) -> &mut [EncodedExam] {
        &mut self.exams
    }

    /// Number of genes.
    #[inline]
    pub fn len(&self) -> usize {
        self.exams.len()
    }

    /// Whether the chromosome has no genes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }

    /// Selection fitness (shared, when fitness sharing is on).
    #[inline]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Fitness before sharing.
    #[inline]
    pub fn raw_fitness(&self) -> f64 {
        self.raw_fitness
    }

    /// Generations survived.
    #[inline]
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Stores a fresh raw score; the selection fitness starts equal to it.
    pub(crate) fn set_raw_fitness(&mut self, raw: f64) {
        self.raw_fitness = raw;
        self.fitness = raw;
    }

    /// Overrides the selection fitness, keeping the raw score.
    pub(crate) fn set_shared_fitness(&mut self, shared: f64) {
        self.fitness = shared;
    }

    pub(crate) fn increment_age(&mut self) {
        self.age = self.age.saturating_add(1);
    }

    /// Copy of this chromosome's genes under a new id, age 0, unscored.
    pub(crate) fn rekeyed(&self, id: ChromosomeId) -> Self {
        Self::new(id, self.exams.clone())
    }
}

/// Monotonic chromosome id source.
///
/// Owned by the runner and lent `&mut` to whoever creates chromosomes, so
/// it has a single writer.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    next: ChromosomeId,
}

impl IdGenerator {
    /// Creates a generator whose first id is `first`.
    pub fn starting_at(first: ChromosomeId) -> Self {
        Self { next: first }
    }

    /// Returns a fresh id.
    pub fn next_id(&mut self) -> ChromosomeId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call will return.
    pub fn peek(&self) -> ChromosomeId {
        self.next
    }
}

/// The working set of chromosomes for one generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Population {
    members: Vec<Chromosome>,
}

impl Population {
    /// Wraps a set of chromosomes.
    pub fn new(members: Vec<Chromosome>) -> Self {
        Self { members }
    }

    /// Number of chromosomes.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the population is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Read access to the members.
    pub fn as_slice(&self) -> &[Chromosome] {
        &self.members
    }

    /// Iterates over the members.
    pub fn iter(&self) -> std::slice::Iter<'_, Chromosome> {
        self.members.iter()
    }

    /// Looks up a member by id.
    pub fn get(&self, id: ChromosomeId) -> Option<&Chromosome> {
        self.members.iter().find(|c| c.id == id)
    }

    pub(crate) fn members_mut(&mut self) -> &mut Vec<Chromosome> {
        &mut self.members
    }

    /// Member with the highest raw fitness.
    pub fn best(&self) -> Option<&Chromosome> {
        self.members
            .iter()
            .max_by(|a, b| compare_fitness(a.raw_fitness, b.raw_fitness))
    }

    /// Mean selection fitness, or `None` for an empty population.
    pub fn average_fitness(&self) -> Option<f64> {
        if self.members.is_empty() {
            return None;
        }
        let total: f64 = self.members.iter().map(|c| c.fitness).sum();
        Some(total / self.members.len() as f64)
    }

    /// Adds one generation to every member's age.
    pub fn age_all(&mut self) {
        for chromosome in &mut self.members {
            chromosome.increment_age();
        }
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Chromosome;
    type IntoIter = std::slice::Iter<'a, Chromosome>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

/// Total order on fitness values; NaN compares equal.
pub(crate) fn compare_fitness(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(id: ChromosomeId, raw: f64) -> Chromosome {
        let mut c = Chromosome::new(id, Vec::new());
        c.set_raw_fitness(raw);
        c
    }

    #[test]
    fn test_id_generator_is_monotonic() {
        let mut ids = IdGenerator::starting_at(5);
        assert_eq!(ids.next_id(), 5);
        assert_eq!(ids.next_id(), 6);
        assert_eq!(ids.peek(), 7);
    }

    #[test]
    fn test_best_uses_raw_fitness() {
        let mut a = scored(0, -1.0);
        let b = scored(1, -2.0);
        // sharing may push the selection fitness below another member's
        a.set_shared_fitness(-5.0);
        let pop = Population::new(vec![a, b]);
        assert_eq!(pop.best().map(Chromosome::id), Some(0));
    }

    #[test]
    fn test_average_and_best() {
        let pop = Population::new(vec![scored(0, 1.0), scored(1, 3.0), scored(2, 2.0)]);
        assert_eq!(pop.average_fitness(), Some(2.0));
        assert_eq!(pop.best().map(Chromosome::id), Some(1));
        assert_eq!(Population::default().average_fitness(), None);
    }

    #[test]
    fn test_age_and_rekey() {
        let mut pop = Population::new(vec![scored(0, 1.0)]);
        pop.age_all();
        pop.age_all();
        assert_eq!(pop.as_slice()[0].age(), 2);

        let child = pop.as_slice()[0].rekeyed(9);
        assert_eq!(child.id(), 9);
        assert_eq!(child.age(), 0);
        assert_eq!(child.raw_fitness(), f64::NEG_INFINITY);
    }
}
