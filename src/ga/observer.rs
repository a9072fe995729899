//! Per-generation reporting.
//!
//! The runner calls a [`GenerationObserver`] once per generation, after the
//! population has been scored and the fitness tables are final. Observers
//! only get shared references; they cannot steer the run.

use serde::{Deserialize, Serialize};

use super::chromosome::{Chromosome, Population};
use super::fitness::{FitnessTables, ScoreCard};
use super::replacement::Replacement;
use super::selection::Selection;
use super::stability::OperatorRates;

/// Snapshot of one finished generation.
#[derive(Debug, Clone, Copy)]
pub struct GenerationReport<'a> {
    /// 1-based generation number.
    pub generation: usize,
    /// Whether the controller is in the stable state.
    pub stable: bool,
    /// Consecutive generations whose population best did not rise.
    pub without_improvement: usize,
    /// Hard, soft and combined tables, best first.
    pub tables: &'a FitnessTables,
    /// Per-constraint score vectors, in population order.
    pub score_cards: &'a [ScoreCard],
    /// Best chromosome of the current population, by raw fitness.
    pub best: &'a Chromosome,
    /// The population after replacement and scoring.
    pub population: &'a Population,
    /// Parent selection used this generation.
    pub selection: Selection,
    /// Replacement used this generation.
    pub replacement: Replacement,
    /// Operator rates that will be used next generation.
    pub rates: OperatorRates,
}

/// Receives a [`GenerationReport`] after every generation.
pub trait GenerationObserver {
    fn on_generation(&mut self, report: &GenerationReport<'_>);
}

impl<F> GenerationObserver for F
where
    F: FnMut(&GenerationReport<'_>),
{
    fn on_generation(&mut self, report: &GenerationReport<'_>) {
        self(report)
    }
}

/// One row of [`FitnessHistory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    /// 1-based generation number.
    pub generation: usize,
    /// Best raw combined fitness in the population.
    pub best_fitness: f64,
    /// Mean selection fitness.
    pub average_fitness: f64,
    /// Hard score of the best chromosome.
    pub best_hard: f64,
    /// Soft score of the best chromosome.
    pub best_soft: f64,
    /// Whether the controller was stable after this generation.
    pub stable: bool,
}

/// Observer that keeps a serializable row per generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessHistory {
    rows: Vec<HistoryRow>,
}

impl FitnessHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded rows, oldest first.
    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    /// Row with the highest best fitness.
    pub fn peak(&self) -> Option<&HistoryRow> {
        self.rows
            .iter()
            .max_by(|a, b| super::chromosome::compare_fitness(a.best_fitness, b.best_fitness))
    }
}

impl GenerationObserver for FitnessHistory {
    fn on_generation(&mut self, report: &GenerationReport<'_>) {
        let best_id = report.best.id();
        let card = report
            .score_cards
            .iter()
            .find(|c| c.chromosome_id == best_id);
        self.rows.push(HistoryRow {
            generation: report.generation,
            best_fitness: report.best.raw_fitness(),
            average_fitness: report.population.average_fitness().unwrap_or(f64::NAN),
            best_hard: card.map_or(f64::NAN, ScoreCard::hard_score),
            best_soft: card.map_or(f64::NAN, ScoreCard::soft_score),
            stable: report.stable,
        });
    }
}
