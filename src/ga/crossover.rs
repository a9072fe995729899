//! Positional crossover.
//!
//! Every chromosome lists its exams in the same course order, so genes can
//! be exchanged position by position without repair: child 1 takes parent
//! 1's genes outside the exchanged region and parent 2's inside it, child 2
//! the reverse.
//!
//! # Operators
//!
//! - [`one_point_crossover`]: cut `p ∈ [1, n-1]`, tails swap
//! - [`two_point_crossover`]: cuts `1 ≤ a < b ≤ n-1`, segment `[a, b)` swaps
//!
//! # Reference
//! Holland (1975), "Adaptation in Natural and Artificial Systems"

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chromosome::{Chromosome, IdGenerator};

/// Crossover variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crossover {
    /// Single cut point. Used once the search is stable.
    OnePoint,
    /// Two cut points. Used while exploring.
    TwoPoint,
}

impl Crossover {
    /// Variant for the controller's current state.
    pub fn for_phase(stable: bool) -> Self {
        if stable {
            Crossover::OnePoint
        } else {
            Crossover::TwoPoint
        }
    }

    /// Recombines two gene sequences.
    ///
    /// # Panics
    /// Panics if the parents have different lengths.
    pub fn recombine<T: Clone, R: Rng>(
        &self,
        parent1: &[T],
        parent2: &[T],
        rng: &mut R,
    ) -> (Vec<T>, Vec<T>) {
        match self {
            Crossover::OnePoint => one_point_crossover(parent1, parent2, rng),
            Crossover::TwoPoint => two_point_crossover(parent1, parent2, rng),
        }
    }

    /// Mates parents pairwise: (0, 1), (2, 3), …
    ///
    /// Each pair recombines with probability `rate`; otherwise both parents
    /// pass through unchanged. An odd last parent also passes through. Every
    /// child is a new chromosome with a fresh id and age 0, so the output
    /// has exactly `parents.len()` members.
    pub fn produce_children<R: Rng>(
        &self,
        parents: &[&Chromosome],
        rate: f64,
        ids: &mut IdGenerator,
        rng: &mut R,
    ) -> Vec<Chromosome> {
        let mut children = Vec::with_capacity(parents.len());
        for pair in parents.chunks(2) {
            match pair {
                [a, b] if rng.random::<f64>() < rate => {
                    let (c1, c2) = self.recombine(a.exams(), b.exams(), rng);
                    children.push(Chromosome::new(ids.next_id(), c1));
                    children.push(Chromosome::new(ids.next_id(), c2));
                }
                _ => {
                    for parent in pair {
                        children.push(parent.rekeyed(ids.next_id()));
                    }
                }
            }
        }
        children
    }
}

/// One-point crossover with a random interior cut.
///
/// Sequences shorter than 2 have no interior cut and are returned as-is.
///
/// # Panics
/// Panics if the parents have different lengths.
pub fn one_point_crossover<T: Clone, R: Rng>(
    parent1: &[T],
    parent2: &[T],
    rng: &mut R,
) -> (Vec<T>, Vec<T>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");

    if n < 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }
    let cut = rng.random_range(1..n);
    one_point_at(parent1, parent2, cut)
}

/// Two-point crossover with random interior cuts.
///
/// Falls back to one-point for `n = 2`, where only one interior cut exists.
///
/// # Panics
/// Panics if the parents have different lengths.
pub fn two_point_crossover<T: Clone, R: Rng>(
    parent1: &[T],
    parent2: &[T],
    rng: &mut R,
) -> (Vec<T>, Vec<T>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");

    if n < 3 {
        return one_point_crossover(parent1, parent2, rng);
    }
    let a = rng.random_range(1..n - 1);
    let b = rng.random_range(a + 1..n);
    two_point_at(parent1, parent2, a, b)
}

/// One-point crossover at a fixed cut: positions `cut..` swap.
pub fn one_point_at<T: Clone>(parent1: &[T], parent2: &[T], cut: usize) -> (Vec<T>, Vec<T>) {
    let n = parent1.len();
    two_point_at(parent1, parent2, cut, n)
}

/// Two-point crossover at fixed cuts: positions `a..b` swap.
///
/// # Panics
/// Panics unless `a <= b <= n` and the parents have equal length.
pub fn two_point_at<T: Clone>(
    parent1: &[T],
    parent2: &[T],
    a: usize,
    b: usize,
) -> (Vec<T>, Vec<T>) {
    assert_eq!(
        parent1.len(),
        parent2.len(),
        "parents must have equal length"
    );
    assert!(a <= b && b <= parent1.len(), "invalid cut points {a}..{b}");

    let build = |outer: &[T], inner: &[T]| -> Vec<T> {
        outer[..a]
            .iter()
            .chain(&inner[a..b])
            .chain(&outer[b..])
            .cloned()
            .collect()
    };
    (build(parent1, parent2), build(parent2, parent1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::testkit::{feasible, gene, slot};
    use proptest::prelude::*;

    /// Genes tagged with their parent: `(parent, position)`.
    fn tagged(parent: u8, n: usize) -> Vec<(u8, usize)> {
        (0..n).map(|i| (parent, i)).collect()
    }

    #[test]
    fn test_one_point_at() {
        let (c1, c2) = one_point_at(&[1, 2, 3, 4], &[5, 6, 7, 8], 1);
        assert_eq!(c1, vec![1, 6, 7, 8]);
        assert_eq!(c2, vec![5, 2, 3, 4]);
    }

    #[test]
    fn test_two_point_at() {
        let (c1, c2) = two_point_at(&[1, 2, 3, 4, 5], &[6, 7, 8, 9, 10], 1, 3);
        assert_eq!(c1, vec![1, 7, 8, 4, 5]);
        assert_eq!(c2, vec![6, 2, 3, 9, 10]);
    }

    #[test]
    fn test_short_sequences() {
        let mut rng = create_rng(42);
        let (c1, c2) = two_point_crossover(&[1], &[2], &mut rng);
        assert_eq!((c1, c2), (vec![1], vec![2]));

        let empty: [u8; 0] = [];
        let (c1, c2) = one_point_crossover(&empty, &empty, &mut rng);
        assert!(c1.is_empty() && c2.is_empty());

        // n = 2: the only interior cut is 1
        let (c1, c2) = two_point_crossover(&[1, 2], &[3, 4], &mut rng);
        assert_eq!(c1, vec![1, 4]);
        assert_eq!(c2, vec![3, 2]);
    }

    #[test]
    #[should_panic(expected = "parents must have equal length")]
    fn test_length_mismatch_panics() {
        let mut rng = create_rng(42);
        one_point_crossover(&[1, 2, 3], &[1, 2], &mut rng);
    }

    #[test]
    fn test_two_point_always_keeps_both_ends() {
        let mut rng = create_rng(3);
        let p1 = tagged(1, 6);
        let p2 = tagged(2, 6);
        for _ in 0..200 {
            let (c1, c2) = two_point_crossover(&p1, &p2, &mut rng);
            assert_eq!(c1[0].0, 1);
            assert_eq!(c1[5].0, 1);
            assert_eq!(c2[0].0, 2);
            assert!(c1.iter().any(|g| g.0 == 2), "segment must be non-empty");
        }
    }

    #[test]
    fn test_produce_children_ids_and_size() {
        let mut rng = create_rng(42);
        let mut ids = IdGenerator::starting_at(100);
        let a = feasible(1);
        let mut b = feasible(2);
        b.exams_mut()[4] = gene("C5", "LAB", slot(3, 13, 0, 60), &["I2"]);
        let c = feasible(3);
        let parents = vec![&a, &b, &c];

        let children = Crossover::TwoPoint.produce_children(&parents, 1.0, &mut ids, &mut rng);
        assert_eq!(children.len(), 3);
        let child_ids: Vec<_> = children.iter().map(Chromosome::id).collect();
        assert_eq!(child_ids, vec![100, 101, 102]);
        assert!(children.iter().all(|c| c.age() == 0 && c.len() == 5));
        // the unpaired parent passes through
        assert_eq!(children[2].exams(), c.exams());
    }

    #[test]
    fn test_zero_rate_clones_parents() {
        let mut rng = create_rng(42);
        let mut ids = IdGenerator::default();
        let a = feasible(1);
        let mut b = feasible(2);
        b.exams_mut().swap(0, 1);
        let children =
            Crossover::OnePoint.produce_children(&[&a, &b], 0.0, &mut ids, &mut rng);
        assert_eq!(children[0].exams(), a.exams());
        assert_eq!(children[1].exams(), b.exams());
        assert_ne!(children[0].id(), a.id());
    }

    #[test]
    fn test_phase_policy() {
        assert_eq!(Crossover::for_phase(true), Crossover::OnePoint);
        assert_eq!(Crossover::for_phase(false), Crossover::TwoPoint);
    }

    proptest! {
        #[test]
        fn prop_children_trace_to_parents(n in 0usize..40, seed in any::<u64>(), two in any::<bool>()) {
            let mut rng = create_rng(seed);
            let p1 = tagged(1, n);
            let p2 = tagged(2, n);
            let op = if two { Crossover::TwoPoint } else { Crossover::OnePoint };
            let (c1, c2) = op.recombine(&p1, &p2, &mut rng);

            prop_assert_eq!(c1.len(), n);
            prop_assert_eq!(c2.len(), n);
            for i in 0..n {
                // same position, exactly one parent each, complementary
                prop_assert_eq!(c1[i].1, i);
                prop_assert_eq!(c2[i].1, i);
                prop_assert_ne!(c1[i].0, c2[i].0);
            }
        }
    }
}
