//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.
//! [`FitnessConfig`] tunes constraint scoring and fitness sharing;
//! [`AdaptiveConfig`] holds the stall/stability thresholds that switch
//! operators and bump rates during a run.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};

/// Configuration for the timetable GA.
///
/// # Defaults
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 1000);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(60)
///     .with_mutation_rates(0.01, 0.08)
///     .with_crossover_rate(0.85)
///     .with_fitness_sharing(true)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Number of chromosomes kept between generations.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_generations: usize,

    /// Mutation rate for chromosomes at or above the population average.
    pub low_mutation_rate: f64,

    /// Mutation rate for chromosomes below the population average.
    pub high_mutation_rate: f64,

    /// Upper bound of the per-chromosome mutation draw.
    ///
    /// A chromosome mutates when a uniform draw in `[0, ceiling)` is at
    /// most its rate. The ceiling sits above typical rates so most
    /// low-rate chromosomes are skipped.
    pub mutation_draw_ceiling: f64,

    /// Probability that a parent pair recombines (0.0–1.0).
    pub crossover_rate: f64,

    /// Consecutive generations without improvement before stopping.
    ///
    /// Set to 0 to disable stagnation-based termination.
    pub stagnation_tolerance: usize,

    /// Whether similar chromosomes share (discount) their fitness.
    pub fitness_sharing: bool,

    /// Tournament size while exploring.
    pub tournament_size: usize,

    /// Parents per generation as a fraction of the population.
    pub parent_ratio: f64,

    /// Whether to evaluate and mutate chromosomes in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,

    /// Constraint scoring parameters.
    pub fitness: FitnessConfig,

    /// Stall detection and operator switching thresholds.
    pub adaptation: AdaptiveConfig,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 1000,
            low_mutation_rate: 0.005,
            high_mutation_rate: 0.07,
            mutation_draw_ceiling: 0.1,
            crossover_rate: 0.8,
            stagnation_tolerance: 500,
            fitness_sharing: false,
            tournament_size: 3,
            parent_ratio: 0.5,
            parallel: true,
            seed: None,
            fitness: FitnessConfig::default(),
            adaptation: AdaptiveConfig::default(),
        }
    }
}

/// Soft-constraint weights and fitness-sharing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    /// Minimum idle time between two exams of the same student, in minutes.
    pub min_student_gap_minutes: u32,

    /// Weight of the student-gap penalty.
    pub student_gap_weight: f64,

    /// Weight of the invigilator workload imbalance.
    pub invigilator_balance_weight: f64,

    /// Weight of the classroom utilization penalty.
    pub classroom_utilization_weight: f64,

    /// Distance below which two chromosomes share fitness (0.0–1.0].
    pub sharing_radius: f64,

    /// Shape of the sharing kernel; 1.0 is triangular.
    pub sharing_alpha: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            min_student_gap_minutes: 60,
            student_gap_weight: 1.0,
            invigilator_balance_weight: 1.0,
            classroom_utilization_weight: 1.0,
            sharing_radius: 0.5,
            sharing_alpha: 1.0,
        }
    }
}

/// Thresholds that drive the exploring/stable state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    /// A generation improving the best fitness by less than this stalls.
    pub improvement_epsilon: f64,

    /// Consecutive stalled generations before the search is declared stable.
    pub stability_window: usize,

    /// Consecutive stalled generations before rates are bumped.
    pub rate_bump_after: usize,

    /// Added to the low mutation rate on a bump.
    pub low_mutation_bump: f64,

    /// Added to the high mutation rate on a bump.
    pub high_mutation_bump: f64,

    /// Added to the crossover rate on a bump.
    pub crossover_bump: f64,

    /// Fraction of `max_generations` after which rank selection takes over.
    pub rank_phase: f64,

    /// Generation from which age-based replacement replaces random replacement.
    pub replacement_switch_generation: usize,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            improvement_epsilon: 0.0001,
            stability_window: 250,
            rate_bump_after: 100,
            low_mutation_bump: 0.001,
            high_mutation_bump: 0.01,
            crossover_bump: 0.02,
            rank_phase: 0.7,
            replacement_switch_generation: 100,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the low and high mutation rates.
    pub fn with_mutation_rates(mut self, low: f64, high: f64) -> Self {
        self.low_mutation_rate = low.clamp(0.0, 1.0);
        self.high_mutation_rate = high.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation draw ceiling.
    pub fn with_mutation_draw_ceiling(mut self, ceiling: f64) -> Self {
        self.mutation_draw_ceiling = ceiling;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the stagnation tolerance (0 to disable).
    pub fn with_stagnation_tolerance(mut self, generations: usize) -> Self {
        self.stagnation_tolerance = generations;
        self
    }

    /// Enables or disables fitness sharing.
    pub fn with_fitness_sharing(mut self, enabled: bool) -> Self {
        self.fitness_sharing = enabled;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the parent ratio.
    pub fn with_parent_ratio(mut self, ratio: f64) -> Self {
        self.parent_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replaces the fitness parameters.
    pub fn with_fitness(mut self, fitness: FitnessConfig) -> Self {
        self.fitness = fitness;
        self
    }

    /// Replaces the adaptation thresholds.
    pub fn with_adaptation(mut self, adaptation: AdaptiveConfig) -> Self {
        self.adaptation = adaptation;
        self
    }

    /// Preset for quick feasibility checks.
    ///
    /// - Population: 30, Generations: 200, Stagnation tolerance: 100
    pub fn fast() -> Self {
        Self {
            population_size: 30,
            max_generations: 200,
            stagnation_tolerance: 100,
            ..Self::default()
        }
    }

    /// Preset balancing quality and time.
    ///
    /// - Population: 100, Generations: 1000, Stagnation tolerance: 500
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Preset for final timetables.
    ///
    /// - Population: 200, Generations: 3000, Stagnation tolerance: 1000,
    ///   fitness sharing on
    pub fn quality() -> Self {
        Self {
            population_size: 200,
            max_generations: 3000,
            stagnation_tolerance: 1000,
            fitness_sharing: true,
            ..Self::default()
        }
    }

    /// Picks a preset from the number of exams.
    ///
    /// - `exam_count < 50` → [`fast()`](Self::fast)
    /// - `50 ≤ exam_count < 300` → [`balanced()`](Self::balanced)
    /// - `exam_count ≥ 300` → [`quality()`](Self::quality)
    pub fn auto_select(exam_count: usize) -> Self {
        if exam_count < 50 {
            Self::fast()
        } else if exam_count < 300 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Number of parents selected per generation.
    ///
    /// Rounded to an even number so every parent has a partner, at least 2
    /// and at most the population size.
    pub fn parent_count(&self) -> usize {
        let raw = (self.population_size as f64 * self.parent_ratio).round() as usize;
        let mut n = raw.clamp(2, self.population_size.max(2));
        if n % 2 == 1 {
            n -= 1;
        }
        n.max(2)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`TimetableError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(TimetableError::InvalidConfig(msg.into()));

        if self.population_size < 2 {
            return fail("population_size must be at least 2");
        }
        if self.max_generations == 0 {
            return fail("max_generations must be at least 1");
        }
        for (name, rate) in [
            ("low_mutation_rate", self.low_mutation_rate),
            ("high_mutation_rate", self.high_mutation_rate),
            ("crossover_rate", self.crossover_rate),
            ("parent_ratio", self.parent_ratio),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(TimetableError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {rate}"
                )));
            }
        }
        if self.low_mutation_rate > self.high_mutation_rate {
            return fail("low_mutation_rate must not exceed high_mutation_rate");
        }
        if self.mutation_draw_ceiling <= 0.0 || !self.mutation_draw_ceiling.is_finite() {
            return fail("mutation_draw_ceiling must be positive");
        }
        if self.tournament_size == 0 {
            return fail("tournament_size must be at least 1");
        }
        self.fitness.validate()?;
        self.adaptation.validate()
    }
}

impl FitnessConfig {
    /// Validates weights and sharing parameters.
    pub fn validate(&self) -> Result<()> {
        for (name, w) in [
            ("student_gap_weight", self.student_gap_weight),
            ("invigilator_balance_weight", self.invigilator_balance_weight),
            ("classroom_utilization_weight", self.classroom_utilization_weight),
        ] {
            if w < 0.0 || !w.is_finite() {
                return Err(TimetableError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {w}"
                )));
            }
        }
        if !(self.sharing_radius > 0.0 && self.sharing_radius <= 1.0) {
            return Err(TimetableError::InvalidConfig(
                "sharing_radius must be within (0, 1]".into(),
            ));
        }
        if self.sharing_alpha <= 0.0 {
            return Err(TimetableError::InvalidConfig(
                "sharing_alpha must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl AdaptiveConfig {
    /// Validates the thresholds.
    pub fn validate(&self) -> Result<()> {
        if self.improvement_epsilon < 0.0 {
            return Err(TimetableError::InvalidConfig(
                "improvement_epsilon must be non-negative".into(),
            ));
        }
        if self.stability_window == 0 {
            return Err(TimetableError::InvalidConfig(
                "stability_window must be at least 1".into(),
            ));
        }
        if self.rate_bump_after >= self.stability_window {
            return Err(TimetableError::InvalidConfig(
                "rate_bump_after must be smaller than stability_window".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.rank_phase) {
            return Err(TimetableError::InvalidConfig(
                "rank_phase must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}
