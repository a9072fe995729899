//! Timetabling domain model.
//!
//! - [`Course`], [`Student`], [`Classroom`], [`Invigilator`]: entity records
//! - [`Timeslot`], [`SchedulingWindow`]: the time model
//! - [`Exam`], [`EncodedExam`]: an exam request and its assigned gene form
//! - [`EntitySet`]: indexed, validated bundle of all of the above

mod entity;
mod entity_set;
mod exam;
mod timeslot;

pub use entity::{Classroom, Course, Invigilator, Student};
pub use entity_set::EntitySet;
pub use exam::{EncodedExam, Exam};
pub use timeslot::{SchedulingWindow, Timeslot};
