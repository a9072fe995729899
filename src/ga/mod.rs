//! Genetic search over exam timetables.
//!
//! A chromosome is one complete timetable; the runner evolves a population
//! of them against hard and soft constraints, adapting its operators as the
//! search stalls.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, rates, presets)
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Final result with statistics
//! - [`FitnessEvaluator`]: Hard/soft constraint scoring
//! - [`GenerationObserver`]: Per-generation reporting hook
//!
//! # Operators
//!
//! - [`Selection`]: tournament, roulette, rank
//! - [`Crossover`]: one-point, two-point (positional)
//! - [`AdaptiveMutation`]: fitness-dependent timeslot/classroom swap
//! - [`Replacement`]: random, age-based
//! - [`sharing`]: fitness sharing between similar chromosomes
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Burke & Petrovic (2002), *Recent research directions in automated timetabling*

mod chromosome;
mod config;
mod crossover;
mod fitness;
mod init;
mod mutation;
mod observer;
mod replacement;
mod runner;
mod selection;
pub mod sharing;
mod stability;
mod types;

pub use chromosome::{Chromosome, ChromosomeId, IdGenerator, Population};
pub use config::{AdaptiveConfig, FitnessConfig, GaConfig};
pub use crossover::{one_point_at, one_point_crossover, two_point_at, two_point_crossover, Crossover};
pub use fitness::{
    ConstraintCheck, ConstraintKind, FitnessEvaluator, FitnessTables, ScoreCard,
    HARD_CONSTRAINTS, SOFT_CONSTRAINTS,
};
pub use init::Initializer;
pub use mutation::{random_swap, swap_mutation, AdaptiveMutation};
pub use observer::{FitnessHistory, GenerationObserver, GenerationReport, HistoryRow};
pub use replacement::Replacement;
pub use runner::{GaResult, GaRunner};
pub use selection::Selection;
pub use stability::{OperatorRates, StabilityTracker, StabilityUpdate};
pub use types::Individual;
