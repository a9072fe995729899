//! Exam requests and their encoded (fully assigned) form.

use serde::{Deserialize, Serialize};

use super::{Course, Timeslot};
use crate::error::{Result, TimetableError};

/// An exam request, possibly still unassigned.
///
/// Built from a [`Course`]; the initializer fills in classroom, timeslot
/// and invigilators, then [`encode`](Exam::encode) freezes it into an
/// [`EncodedExam`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    /// Code of the examined course.
    pub course_code: String,
    /// Registered students, copied from the course.
    pub students: Vec<String>,
    /// Preparation buffer before the exam, in minutes.
    pub before_prep_minutes: u32,
    /// Exam length in minutes.
    pub exam_minutes: u32,
    /// Clean-up buffer after the exam, in minutes.
    pub after_prep_minutes: u32,
    /// Assigned classroom code.
    pub classroom: Option<String>,
    /// Assigned combined timeslot (buffers included).
    pub timeslot: Option<Timeslot>,
    /// Assigned invigilator ids.
    pub invigilators: Vec<String>,
}

impl Exam {
    /// Creates an unassigned exam for `course`.
    pub fn from_course(course: &Course) -> Self {
        Self {
            course_code: course.code.clone(),
            students: course.students.clone(),
            before_prep_minutes: course.before_prep_minutes,
            exam_minutes: course.exam_minutes,
            after_prep_minutes: course.after_prep_minutes,
            classroom: None,
            timeslot: None,
            invigilators: Vec::new(),
        }
    }

    /// Length of the combined slot.
    #[inline]
    pub fn combined_minutes(&self) -> u32 {
        self.before_prep_minutes + self.exam_minutes + self.after_prep_minutes
    }

    /// Whether classroom and timeslot are both set.
    pub fn is_assigned(&self) -> bool {
        self.classroom.is_some() && self.timeslot.is_some()
    }

    /// Freezes the assignment into a gene.
    ///
    /// # Errors
    /// [`TimetableError::UnassignedExam`] if classroom or timeslot is missing.
    pub fn encode(self) -> Result<EncodedExam> {
        match (self.classroom, self.timeslot) {
            (Some(classroom), Some(timeslot)) => Ok(EncodedExam::new(
                self.course_code,
                classroom,
                timeslot,
                self.invigilators,
            )),
            _ => Err(TimetableError::UnassignedExam(self.course_code)),
        }
    }
}

/// One gene: an exam's full resource assignment.
///
/// The course key never changes; classroom, timeslot and invigilators are
/// rewritten by mutation and crossover.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodedExam {
    course_code: String,
    /// Assigned classroom code.
    pub classroom_code: String,
    /// Combined timeslot, preparation buffers included.
    pub timeslot: Timeslot,
    /// Assigned invigilator ids, in assignment order.
    pub invigilators: Vec<String>,
}

impl EncodedExam {
    /// Creates a gene.
    pub fn new(
        course_code: impl Into<String>,
        classroom_code: impl Into<String>,
        timeslot: Timeslot,
        invigilators: Vec<String>,
    ) -> Self {
        Self {
            course_code: course_code.into(),
            classroom_code: classroom_code.into(),
            timeslot,
            invigilators,
        }
    }

    /// Code of the examined course.
    #[inline]
    pub fn course_code(&self) -> &str {
        &self.course_code
    }

    /// The slot students actually sit the exam: the combined slot minus
    /// the course's before/after buffers.
    ///
    /// # Errors
    /// [`TimetableError::UnknownCourse`] if `course` is not this gene's
    /// course, [`TimetableError::InvalidTimeslot`] if the buffers consume
    /// the whole slot.
    pub fn student_timeslot(&self, course: &Course) -> Result<Timeslot> {
        if course.code != self.course_code {
            return Err(TimetableError::UnknownCourse(course.code.clone()));
        }
        self.timeslot
            .shrink(course.before_prep_minutes, course.after_prep_minutes)
    }

    /// Whether classroom and timeslot match another gene's.
    pub fn same_placement(&self, other: &Self) -> bool {
        self.classroom_code == other.classroom_code && self.timeslot == other.timeslot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn slot(hour: u32, minutes: u32) -> Timeslot {
        let start = NaiveDate::from_ymd_opt(2024, 6, 3)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap();
        Timeslot::starting_at(start, minutes).unwrap()
    }

    #[test]
    fn test_encode_requires_assignment() {
        let course = Course::new("CS101", 60).with_students(["s1", "s2"]);
        let exam = Exam::from_course(&course);
        assert!(!exam.is_assigned());
        assert_eq!(
            exam.clone().encode(),
            Err(TimetableError::UnassignedExam("CS101".into()))
        );

        let mut exam = exam;
        exam.classroom = Some("R1".into());
        exam.timeslot = Some(slot(9, 60));
        exam.invigilators = vec!["I1".into()];
        let gene = exam.encode().unwrap();
        assert_eq!(gene.course_code(), "CS101");
        assert_eq!(gene.classroom_code, "R1");
        assert_eq!(gene.invigilators, vec!["I1".to_string()]);
    }

    #[test]
    fn test_combined_minutes() {
        let exam = Exam::from_course(&Course::new("CS101", 90).with_prep(15, 30));
        assert_eq!(exam.combined_minutes(), 135);
    }

    #[test]
    fn test_student_timeslot() {
        let course = Course::new("CS101", 60).with_prep(30, 30);
        let gene = EncodedExam::new("CS101", "R1", slot(9, 120), vec![]);
        let sitting = gene.student_timeslot(&course).unwrap();
        assert_eq!(sitting.duration(), chrono::TimeDelta::minutes(60));

        let other = Course::new("MA1", 60);
        assert!(gene.student_timeslot(&other).is_err());
    }
}
