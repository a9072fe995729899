//! Evolutionary exam timetabling.
//!
//! Assigns every course exam a classroom, a timeslot and its invigilators
//! using a genetic algorithm with adaptive operators:
//!
//! - **Models** ([`models`]): courses, students, classrooms, invigilators,
//!   timeslots and the scheduling window, validated into an
//!   [`EntitySet`](models::EntitySet).
//! - **GA** ([`ga`]): chromosome encoding, constraint-based fitness with
//!   optional fitness sharing, selection/crossover/mutation/replacement
//!   operators and the generation controller.
//!
//! # Architecture
//!
//! The crate owns the search only. Loading entities, rendering timetables
//! and persisting results belong to callers, which consume [`ga::GaResult`]
//! or observe the run through [`ga::GenerationObserver`].

pub mod error;
pub mod ga;
pub mod models;
pub mod random;

#[cfg(test)]
mod testkit;

pub use error::{Result, TimetableError};
