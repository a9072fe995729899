//! Constraint-based fitness evaluation.
//!
//! # Score layout
//!
//! Each chromosome gets a [`ScoreCard`]:
//!
//! - `hard`: one violation count per hard constraint, in
//!   [`HARD_CONSTRAINTS`] order, followed by the hard score
//!   `-(total violations)`.
//! - `soft`: one non-negative penalty per soft constraint, in
//!   [`SOFT_CONSTRAINTS`] order, followed by the soft score
//!   `1 / (1 + weighted penalty)`, which lies in `(0, 1]`.
//! - `combined`: hard score + soft score.
//!
//! Because the soft score never reaches 1 from above nor 0 from below, one
//! fewer hard violation is always worth more than any soft improvement.
//!
//! # Complexity
//! O(E² + E·I) per chromosome for E exams and I invigilators per exam.

use chrono::TimeDelta;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::chromosome::{compare_fitness, Chromosome, ChromosomeId, Population};
use super::config::FitnessConfig;
use super::sharing::apply_fitness_sharing;
use crate::error::Result;
use crate::models::{EntitySet, Timeslot};

/// Hard constraints, in score-vector order.
pub const HARD_CONSTRAINTS: [&str; 6] = [
    "invigilator_overlap",
    "classroom_overlap",
    "student_overlap",
    "classroom_capacity",
    "invigilator_max_exams",
    "scheduling_window",
];

/// Soft constraints, in score-vector order.
pub const SOFT_CONSTRAINTS: [&str; 3] = [
    "student_gap",
    "invigilator_balance",
    "classroom_utilization",
];

/// Whether a constraint invalidates a timetable or only degrades it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintKind {
    Hard,
    Soft,
}

/// Per-constraint scores for one chromosome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    /// Chromosome the scores belong to.
    pub chromosome_id: ChromosomeId,
    /// Violation counts, then the hard score.
    pub hard: Vec<f64>,
    /// Penalties, then the soft score.
    pub soft: Vec<f64>,
    /// Hard score + soft score, before fitness sharing.
    pub combined: f64,
}

impl ScoreCard {
    /// Aggregate hard score (last entry of `hard`).
    pub fn hard_score(&self) -> f64 {
        self.hard.last().copied().unwrap_or(0.0)
    }

    /// Aggregate soft score (last entry of `soft`).
    pub fn soft_score(&self) -> f64 {
        self.soft.last().copied().unwrap_or(0.0)
    }

    /// Total number of hard-constraint violations.
    pub fn hard_violations(&self) -> usize {
        self.hard[..HARD_CONSTRAINTS.len().min(self.hard.len())]
            .iter()
            .sum::<f64>() as usize
    }

    /// Whether the timetable violates no hard constraint.
    pub fn is_feasible(&self) -> bool {
        self.hard_violations() == 0
    }
}

/// One line of a constraint checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintCheck {
    /// Constraint name from [`HARD_CONSTRAINTS`] or [`SOFT_CONSTRAINTS`].
    pub name: &'static str,
    /// Hard or soft.
    pub kind: ConstraintKind,
    /// Violation count (hard) or penalty (soft).
    pub score: f64,
    /// Whether the constraint is fully met.
    pub satisfied: bool,
}

/// Hard, soft and combined scores of a whole population, best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessTables {
    /// `(chromosome id, hard score)`, descending.
    pub hard: Vec<(ChromosomeId, f64)>,
    /// `(chromosome id, soft score)`, descending.
    pub soft: Vec<(ChromosomeId, f64)>,
    /// `(chromosome id, selection fitness)`, descending. Holds shared
    /// values when fitness sharing is on.
    pub combined: Vec<(ChromosomeId, f64)>,
}

impl FitnessTables {
    /// Builds the tables from fresh score cards and the scored population.
    pub fn build(cards: &[ScoreCard], population: &Population) -> Self {
        let mut hard: Vec<_> = cards
            .iter()
            .map(|c| (c.chromosome_id, c.hard_score()))
            .collect();
        let mut soft: Vec<_> = cards
            .iter()
            .map(|c| (c.chromosome_id, c.soft_score()))
            .collect();
        let mut combined: Vec<_> = population.iter().map(|c| (c.id(), c.fitness())).collect();

        for table in [&mut hard, &mut soft, &mut combined] {
            table.sort_by(|a, b| compare_fitness(b.1, a.1));
        }
        Self {
            hard,
            soft,
            combined,
        }
    }

    /// Top entry of the combined table.
    pub fn best(&self) -> Option<(ChromosomeId, f64)> {
        self.combined.first().copied()
    }
}

/// Scores chromosomes against an entity set.
///
/// Stateless apart from borrowed inputs, so one evaluator can be shared
/// across rayon workers.
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator<'a> {
    entities: &'a EntitySet,
    config: &'a FitnessConfig,
}

/// A gene with its references resolved to entity indices.
struct Resolved<'g> {
    course: usize,
    classroom: usize,
    invigilators: Vec<usize>,
    slot: &'g Timeslot,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator.
    pub fn new(entities: &'a EntitySet, config: &'a FitnessConfig) -> Self {
        Self { entities, config }
    }

    /// Scores one chromosome.
    ///
    /// # Errors
    /// A data-integrity error if the genes are not one exam per course in
    /// course order, or reference an unknown classroom or invigilator.
    pub fn evaluate(&self, chromosome: &Chromosome) -> Result<ScoreCard> {
        let genes = self.resolve(chromosome)?;
        let entities = self.entities;
        let min_gap = TimeDelta::minutes(i64::from(self.config.min_student_gap_minutes));

        let mut invigilator_overlap = 0usize;
        let mut classroom_overlap = 0usize;
        let mut student_overlap = 0usize;
        let mut student_gap = 0usize;

        for (i, a) in genes.iter().enumerate() {
            for b in &genes[i + 1..] {
                let shared = entities.shared_students(a.course, b.course);
                match a.slot.gap_to(b.slot) {
                    None => {
                        invigilator_overlap += a
                            .invigilators
                            .iter()
                            .filter(|x| b.invigilators.contains(*x))
                            .count();
                        if a.classroom == b.classroom {
                            classroom_overlap += 1;
                        }
                        student_overlap += shared;
                    }
                    Some(gap) if gap < min_gap => student_gap += shared,
                    Some(_) => {}
                }
            }
        }

        let mut capacity = 0usize;
        let mut outside_window = 0usize;
        let mut utilization = 0.0;
        let mut monitored = vec![0usize; entities.invigilators().len()];

        for gene in &genes {
            let course = &entities.courses()[gene.course];
            let room = &entities.classrooms()[gene.classroom];
            let students = entities.student_count(gene.course);

            if (room.capacity as usize) < students {
                capacity += 1;
            }
            if !entities.window().contains(gene.slot) {
                outside_window += 1;
            }
            if room.capacity > 0 {
                let seated = students.min(room.capacity as usize) as f64;
                utilization += (f64::from(room.capacity) - seated) / f64::from(room.capacity);
            }
            if course.requires_pc_lab && !room.pc_lab {
                utilization += 1.0;
            }
            for &inv in &gene.invigilators {
                monitored[inv] += 1;
            }
        }

        let over_limit: usize = monitored
            .iter()
            .zip(entities.invigilators())
            .map(|(&n, inv)| n.saturating_sub(inv.max_monitored_exams))
            .sum();
        let balance = std_dev(&monitored);

        let mut hard: Vec<f64> = [
            invigilator_overlap,
            classroom_overlap,
            student_overlap,
            capacity,
            over_limit,
            outside_window,
        ]
        .iter()
        .map(|&n| n as f64)
        .collect();
        let violations: f64 = hard.iter().sum();
        let hard_score = if violations > 0.0 { -violations } else { 0.0 };
        hard.push(hard_score);

        let mut soft = vec![student_gap as f64, balance, utilization];
        let weighted = self.config.student_gap_weight * soft[0]
            + self.config.invigilator_balance_weight * soft[1]
            + self.config.classroom_utilization_weight * soft[2];
        let soft_score = 1.0 / (1.0 + weighted);
        soft.push(soft_score);

        Ok(ScoreCard {
            chromosome_id: chromosome.id(),
            hard,
            soft,
            combined: hard_score + soft_score,
        })
    }

    /// Named per-constraint breakdown for one chromosome.
    pub fn checklist(&self, chromosome: &Chromosome) -> Result<Vec<ConstraintCheck>> {
        let card = self.evaluate(chromosome)?;
        let hard = HARD_CONSTRAINTS
            .iter()
            .zip(&card.hard)
            .map(|(&name, &score)| ConstraintCheck {
                name,
                kind: ConstraintKind::Hard,
                score,
                satisfied: score == 0.0,
            });
        let soft = SOFT_CONSTRAINTS
            .iter()
            .zip(&card.soft)
            .map(|(&name, &score)| ConstraintCheck {
                name,
                kind: ConstraintKind::Soft,
                score,
                satisfied: score.abs() < 1e-9,
            });
        Ok(hard.chain(soft).collect())
    }

    /// Scores every chromosome, then applies fitness sharing if requested.
    ///
    /// Raw scores are computed independently per chromosome (in parallel
    /// when `parallel` is set). Sharing runs afterwards on the joined raw
    /// scores, so it is applied exactly once per call.
    pub fn score_population(
        &self,
        population: &mut Population,
        parallel: bool,
        sharing: bool,
    ) -> Result<Vec<ScoreCard>> {
        let cards: Vec<ScoreCard> = if parallel {
            population
                .as_slice()
                .par_iter()
                .map(|c| self.evaluate(c))
                .collect::<Result<_>>()?
        } else {
            population
                .iter()
                .map(|c| self.evaluate(c))
                .collect::<Result<_>>()?
        };

        for (chromosome, card) in population.members_mut().iter_mut().zip(&cards) {
            chromosome.set_raw_fitness(card.combined);
        }

        if sharing {
            apply_fitness_sharing(
                population,
                self.config.sharing_radius,
                self.config.sharing_alpha,
            );
        }
        Ok(cards)
    }

    fn resolve<'g>(&self, chromosome: &'g Chromosome) -> Result<Vec<Resolved<'g>>> {
        self.entities.check_layout(chromosome.exams())?;
        chromosome
            .exams()
            .iter()
            .enumerate()
            .map(|(course, gene)| {
                let invigilators = gene
                    .invigilators
                    .iter()
                    .map(|id| self.entities.invigilator_index(id))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Resolved {
                    course,
                    classroom: self.entities.classroom_index(&gene.classroom_code)?,
                    invigilators,
                    slot: &gene.timeslot,
                })
            })
            .collect()
    }
}

/// Population standard deviation; 0 for fewer than two values.
fn std_dev(values: &[usize]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<usize>() as f64 / n;
    let var = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    var.sqrt()
}
