//! Error types.
//!
//! Every fallible operation in the crate returns [`Result`]. Errors fall
//! into three groups: invalid configuration, dangling or duplicated entity
//! references, and degenerate inputs (nothing to schedule, nowhere to put
//! it). Non-convergence is never an error; the runner always terminates.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors raised while configuring, initializing or evaluating a timetable search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimetableError {
    /// A configuration value is missing or out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A timeslot whose start is not strictly before its end.
    #[error("invalid timeslot: start {start} is not before end {end}")]
    InvalidTimeslot {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// A reference to a course code that is not in the entity set.
    #[error("unknown course '{0}'")]
    UnknownCourse(String),

    /// A reference to a classroom code that is not in the entity set.
    #[error("unknown classroom '{0}'")]
    UnknownClassroom(String),

    /// A reference to an invigilator id that is not in the entity set.
    #[error("unknown invigilator '{0}'")]
    UnknownInvigilator(String),

    /// A course registers a student id that is not in the entity set.
    #[error("course '{course}' registers unknown student '{student}'")]
    UnknownStudent { course: String, student: String },

    /// Two entities of the same kind share an id.
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    /// An exam was encoded before a classroom and timeslot were assigned.
    #[error("exam for course '{0}' has no classroom or timeslot assigned")]
    UnassignedExam(String),

    /// A timetable that does not hold exactly one exam per course.
    #[error("timetable has {found} exams, expected one per course ({expected})")]
    ExamCountMismatch { expected: usize, found: usize },

    /// A gene that is not in course order.
    #[error("exam at position {position} is for course '{found}', expected '{expected}'")]
    ExamOrderMismatch {
        position: usize,
        expected: String,
        found: String,
    },

    /// An operation that needs at least one chromosome got none.
    #[error("population is empty")]
    EmptyPopulation,

    /// No courses to schedule.
    #[error("entity set contains no courses")]
    NoExams,

    /// No candidate timeslots were supplied.
    #[error("entity set contains no timeslots")]
    NoTimeslots,

    /// No classrooms were supplied.
    #[error("entity set contains no classrooms")]
    NoClassrooms,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TimetableError>;
