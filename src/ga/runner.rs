//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → (selection → crossover → mutation →
//! replacement → evaluation) per generation.
//!
//! # Operator policy
//!
//! | operator    | rule |
//! |-------------|------|
//! | selection   | rank in the last phase of the run, roulette while stable, tournament otherwise |
//! | crossover   | one-point while stable, two-point otherwise |
//! | replacement | random before `replacement_switch_generation`, age-based afterwards |
//!
//! # Termination
//!
//! The loop stops after `max_generations`, after `stagnation_tolerance`
//! consecutive generations whose population best did not rise above the
//! previous generation's, or when the
//! cancellation flag is raised. Cancellation is checked between
//! generations only.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::chromosome::{Chromosome, IdGenerator, Population};
use super::config::GaConfig;
use super::crossover::Crossover;
use super::fitness::{FitnessEvaluator, FitnessTables};
use super::init::Initializer;
use super::mutation::AdaptiveMutation;
use super::observer::{GenerationObserver, GenerationReport};
use super::replacement::Replacement;
use super::selection::Selection;
use super::stability::{OperatorRates, StabilityTracker};
use crate::error::{Result, TimetableError};
use crate::models::EntitySet;
use crate::random::rng_from_seed;

/// Result of a GA run.
///
/// Contains the best timetable found, along with statistics about the
/// evolutionary process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaResult {
    /// The best chromosome found during the entire run, by raw fitness.
    pub best: Chromosome,

    /// Raw fitness of `best`.
    pub best_fitness: f64,

    /// Best raw fitness of the initial population.
    pub initial_best_fitness: f64,

    /// Total number of generations executed.
    pub generations: usize,

    /// `(best_fitness - initial_best_fitness) / generations`, or 0 when no
    /// generation ran.
    pub convergence_rate: f64,

    /// Whether the run was terminated due to stagnation.
    pub stagnated: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Whether the controller ended in the stable state.
    pub stable: bool,

    /// Best-so-far fitness: the initial value, then one entry per
    /// generation.
    pub fitness_history: Vec<f64>,
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```ignore
/// let entities = EntitySet::new(courses, students, rooms, invigilators, slots, window)?;
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&entities, &config)?;
/// println!("Best fitness: {}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA from a freshly initialized population.
    ///
    /// # Errors
    /// Invalid configuration, degenerate entity sets and dangling entity
    /// references.
    pub fn run(entities: &EntitySet, config: &GaConfig) -> Result<GaResult> {
        Self::run_with_cancel(entities, config, &mut |_: &GenerationReport<'_>| {}, None)
    }

    /// Runs the GA, reporting every generation to `observer`.
    pub fn run_with_observer<O>(
        entities: &EntitySet,
        config: &GaConfig,
        observer: &mut O,
    ) -> Result<GaResult>
    where
        O: GenerationObserver + ?Sized,
    {
        Self::run_with_cancel(entities, config, observer, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops
    /// before the next generation and returns the best timetable found so
    /// far.
    pub fn run_with_cancel<O>(
        entities: &EntitySet,
        config: &GaConfig,
        observer: &mut O,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult>
    where
        O: GenerationObserver + ?Sized,
    {
        config.validate()?;
        let mut rng = rng_from_seed(config.seed);
        let mut ids = IdGenerator::default();
        let population =
            Initializer::new(entities)?.population(config.population_size, &mut ids, &mut rng)?;
        Evolution::new(entities, config, population, ids, rng).run(observer, cancel)
    }

    /// Runs the GA from a caller-supplied initial population.
    ///
    /// Every chromosome must list one gene per course in entity-set course
    /// order. New ids continue after the largest id in `population`.
    ///
    /// # Errors
    /// [`TimetableError::EmptyPopulation`] for an empty population, the
    /// layout errors of [`EntitySet::check_layout`] for a chromosome that
    /// breaks course order, plus everything [`run`](Self::run) reports.
    pub fn run_with_population<O>(
        entities: &EntitySet,
        config: &GaConfig,
        population: Population,
        observer: &mut O,
    ) -> Result<GaResult>
    where
        O: GenerationObserver + ?Sized,
    {
        config.validate()?;
        if population.is_empty() {
            return Err(TimetableError::EmptyPopulation);
        }
        for chromosome in &population {
            entities.check_layout(chromosome.exams())?;
        }
        let next = population.iter().map(Chromosome::id).max().map_or(0, |id| id + 1);
        let rng = rng_from_seed(config.seed);
        Evolution::new(entities, config, population, IdGenerator::starting_at(next), rng)
            .run(observer, None)
    }
}

/// State of one run.
struct Evolution<'a> {
    entities: &'a EntitySet,
    config: &'a GaConfig,
    population: Population,
    ids: IdGenerator,
    rng: rand::rngs::StdRng,
}

impl<'a> Evolution<'a> {
    fn new(
        entities: &'a EntitySet,
        config: &'a GaConfig,
        population: Population,
        ids: IdGenerator,
        rng: rand::rngs::StdRng,
    ) -> Self {
        Self {
            entities,
            config,
            population,
            ids,
            rng,
        }
    }

    fn run<O>(mut self, observer: &mut O, cancel: Option<Arc<AtomicBool>>) -> Result<GaResult>
    where
        O: GenerationObserver + ?Sized,
    {
        let config = self.config;
        let adaptation = &config.adaptation;
        let evaluator = FitnessEvaluator::new(self.entities, &config.fitness);

        info!(
            exams = self.entities.courses().len(),
            population_size = config.population_size,
            max_generations = config.max_generations,
            fitness_sharing = config.fitness_sharing,
            "starting timetable search"
        );

        // 1. Evaluate initial population
        evaluator.score_population(&mut self.population, config.parallel, config.fitness_sharing)?;

        // 2. Track best
        let mut best = self
            .population
            .best()
            .ok_or(TimetableError::EmptyPopulation)?
            .clone();
        let initial_best_fitness = best.raw_fitness();
        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(initial_best_fitness);

        let mut tracker = StabilityTracker::new(adaptation);
        let mut rates = OperatorRates {
            low_mutation: config.low_mutation_rate,
            high_mutation: config.high_mutation_rate,
            crossover: config.crossover_rate,
        };
        let parent_count = config.parent_count();

        let mut population_best = initial_best_fitness;
        let mut generations = 0usize;
        let mut stagnated = false;
        let mut cancelled = false;

        // 3. Evolutionary loop
        while generations < config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            let gen = generations + 1;
            let stable = tracker.is_stable();
            let before = population_best;
            self.population.age_all();

            // Selection
            let selection = Selection::for_generation(
                gen,
                config.max_generations,
                stable,
                config.tournament_size,
                adaptation.rank_phase,
            );
            let parent_idx = selection.select_parents(
                self.population.as_slice(),
                parent_count,
                &mut self.rng,
            )?;

            // Crossover
            let children = {
                let members = self.population.as_slice();
                let parents: Vec<&Chromosome> = parent_idx.iter().map(|&i| &members[i]).collect();
                Crossover::for_phase(stable).produce_children(
                    &parents,
                    rates.crossover,
                    &mut self.ids,
                    &mut self.rng,
                )
            };

            // Mutation
            let mutated = AdaptiveMutation::new(
                rates.low_mutation,
                rates.high_mutation,
                config.mutation_draw_ceiling,
            )
            .apply(&mut self.population, config.parallel, &mut self.rng);

            // Replacement
            let replacement =
                Replacement::for_generation(gen, adaptation.replacement_switch_generation);
            replacement.apply(
                &mut self.population,
                children,
                config.population_size,
                &mut self.rng,
            );

            // Evaluation
            let cards = evaluator.score_population(
                &mut self.population,
                config.parallel,
                config.fitness_sharing,
            )?;
            let tables = FitnessTables::build(&cards, &self.population);
            let gen_best = self
                .population
                .best()
                .ok_or(TimetableError::EmptyPopulation)?;
            let after = gen_best.raw_fitness();
            if after > best.raw_fitness() {
                best = gen_best.clone();
            }
            population_best = after;
            generations += 1;

            let update = tracker.observe(before, after);
            if update.bump_rates {
                rates.bump(adaptation);
                info!(
                    generation = generations,
                    low_mutation = rates.low_mutation,
                    high_mutation = rates.high_mutation,
                    crossover = rates.crossover,
                    "raising operator rates after prolonged stall"
                );
            }
            if update.became_stable {
                info!(generation = generations, best = after, "search became stable");
            } else if update.left_stable {
                info!(generation = generations, best = after, "search left stable state");
            }
            let best_so_far = best.raw_fitness();
            debug!(
                generation = generations,
                ?selection,
                before,
                after,
                improvement = after - before,
                best_so_far,
                mutated,
                without_improvement = tracker.without_improvement(),
                under_threshold = tracker.under_threshold(),
                "generation finished"
            );

            fitness_history.push(best_so_far);

            observer.on_generation(&GenerationReport {
                generation: generations,
                stable: tracker.is_stable(),
                without_improvement: tracker.without_improvement(),
                tables: &tables,
                score_cards: &cards,
                best: gen_best,
                population: &self.population,
                selection,
                replacement,
                rates,
            });

            if config.stagnation_tolerance > 0
                && tracker.without_improvement() >= config.stagnation_tolerance
            {
                stagnated = true;
                break;
            }
        }

        let best_fitness = best.raw_fitness();
        let convergence_rate = if generations == 0 {
            0.0
        } else {
            (best_fitness - initial_best_fitness) / generations as f64
        };

        info!(
            generations,
            best_fitness,
            initial_best_fitness,
            convergence_rate,
            stagnated,
            cancelled,
            "timetable search finished"
        );

        Ok(GaResult {
            best,
            best_fitness,
            initial_best_fitness,
            generations,
            convergence_rate,
            stagnated,
            cancelled,
            stable: tracker.is_stable(),
            fitness_history,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
