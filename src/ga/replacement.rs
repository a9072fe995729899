//! Survivor replacement.
//!
//! Children enter the population by evicting existing members. Early in the
//! run eviction is uniform at random; later the oldest members go first,
//! which flushes long-lived chromosomes once the search has settled.

use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chromosome::{Chromosome, Population};

/// Eviction policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Replacement {
    /// Evict uniformly random members.
    Random,
    /// Evict the oldest members; ties broken at random.
    AgeBased,
}

impl Replacement {
    /// Policy for the 1-based generation `generation`: random before
    /// `switch_at`, age-based from then on.
    pub fn for_generation(generation: usize, switch_at: usize) -> Self {
        if generation < switch_at {
            Replacement::Random
        } else {
            Replacement::AgeBased
        }
    }

    /// Evicts members, appends `children` and returns the evicted members.
    ///
    /// For `children.len() <= target` and a population of size `target`,
    /// the population has exactly `target` members afterwards. A population
    /// that would still be too large is truncated from the back, dropping
    /// the most recently added children first.
    pub fn apply<R: Rng>(
        &self,
        population: &mut Population,
        children: Vec<Chromosome>,
        target: usize,
        rng: &mut R,
    ) -> Vec<Chromosome> {
        let members = population.members_mut();
        let n = members.len();
        let excess = (n + children.len()).saturating_sub(target).min(n);

        let mut doomed: Vec<usize> = match self {
            Replacement::Random => index::sample(rng, n, excess).into_vec(),
            Replacement::AgeBased => {
                let mut order: Vec<usize> = (0..n).collect();
                order.shuffle(rng);
                // stable sort keeps the shuffled order among equal ages
                order.sort_by(|&a, &b| members[b].age().cmp(&members[a].age()));
                order.truncate(excess);
                order
            }
        };

        // remove back to front so earlier indices stay valid
        doomed.sort_unstable_by(|a, b| b.cmp(a));
        let mut evicted: Vec<Chromosome> =
            doomed.into_iter().map(|i| members.swap_remove(i)).collect();

        members.extend(children);
        if members.len() > target {
            evicted.extend(members.drain(target..));
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::ChromosomeId;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn aged(id: ChromosomeId, age: u32) -> Chromosome {
        let mut c = Chromosome::new(id, Vec::new());
        for _ in 0..age {
            c.increment_age();
        }
        c
    }

    fn children(first: ChromosomeId, n: usize) -> Vec<Chromosome> {
        (0..n as u64).map(|i| aged(first + i, 0)).collect()
    }

    #[test]
    fn test_policy_switch() {
        assert_eq!(Replacement::for_generation(0, 100), Replacement::Random);
        assert_eq!(Replacement::for_generation(99, 100), Replacement::Random);
        assert_eq!(Replacement::for_generation(100, 100), Replacement::AgeBased);
    }

    #[test]
    fn test_age_based_evicts_oldest() {
        let mut rng = create_rng(42);
        let mut pop = Population::new(vec![aged(0, 1), aged(1, 9), aged(2, 3), aged(3, 7)]);
        let evicted = Replacement::AgeBased.apply(&mut pop, children(10, 2), 4, &mut rng);

        let mut gone: Vec<_> = evicted.iter().map(Chromosome::id).collect();
        gone.sort_unstable();
        assert_eq!(gone, vec![1, 3]);
        assert_eq!(pop.len(), 4);
        assert!(pop.get(10).is_some() && pop.get(11).is_some());
    }

    #[test]
    fn test_age_ties_are_random() {
        let mut seen = std::collections::HashSet::new();
        for seed in 0..50 {
            let mut rng = create_rng(seed);
            let mut pop = Population::new(vec![aged(0, 5), aged(1, 5), aged(2, 5)]);
            let evicted = Replacement::AgeBased.apply(&mut pop, children(10, 1), 3, &mut rng);
            seen.insert(evicted[0].id());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_random_keeps_unevicted_members() {
        let mut rng = create_rng(7);
        let mut pop = Population::new((0..6).map(|i| aged(i, 0)).collect());
        let evicted = Replacement::Random.apply(&mut pop, children(100, 2), 6, &mut rng);
        assert_eq!(evicted.len(), 2);
        for c in &evicted {
            assert!(c.id() < 6);
            assert!(pop.get(c.id()).is_none());
        }
    }

    #[test]
    fn test_more_children_than_target() {
        let mut rng = create_rng(1);
        let mut pop = Population::new((0..3).map(|i| aged(i, 0)).collect());
        let evicted = Replacement::Random.apply(&mut pop, children(10, 5), 3, &mut rng);
        assert_eq!(pop.len(), 3);
        assert_eq!(evicted.len(), 5);
        let ids: Vec<_> = pop.iter().map(Chromosome::id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }

    proptest! {
        #[test]
        fn prop_population_returns_to_target(
            target in 1usize..40,
            child_frac in 0.0f64..=1.0,
            seed in any::<u64>(),
            age_based in any::<bool>(),
        ) {
            let mut rng = create_rng(seed);
            let k = (target as f64 * child_frac) as usize;
            let mut pop = Population::new((0..target as u64).map(|i| aged(i, (i % 4) as u32)).collect());
            let policy = if age_based { Replacement::AgeBased } else { Replacement::Random };
            let evicted = policy.apply(&mut pop, children(1000, k), target, &mut rng);
            prop_assert_eq!(pop.len(), target);
            prop_assert_eq!(evicted.len(), k);
        }
    }
}
