//! Indexed, validated collection of all scheduling inputs.
//!
//! [`EntitySet::new`] checks structural integrity once, up front:
//! - no duplicate course, student, classroom or invigilator ids
//! - every registered student exists
//!
//! Afterwards lookups by code are O(1) and fail loudly on dangling
//! references instead of skipping them.

use std::collections::HashMap;

use super::{
    Classroom, Course, EncodedExam, Exam, Invigilator, SchedulingWindow, Student, Timeslot,
};
use crate::error::{Result, TimetableError};

/// All entities a timetable search runs against.
#[derive(Debug, Clone)]
pub struct EntitySet {
    courses: Vec<Course>,
    students: Vec<Student>,
    classrooms: Vec<Classroom>,
    invigilators: Vec<Invigilator>,
    timeslots: Vec<Timeslot>,
    window: SchedulingWindow,

    course_index: HashMap<String, usize>,
    classroom_index: HashMap<String, usize>,
    invigilator_index: HashMap<String, usize>,
    /// Sorted, deduplicated student indices per course.
    course_students: Vec<Vec<usize>>,
}

impl EntitySet {
    /// Builds and validates an entity set.
    ///
    /// `timeslots` is the precomputed ordered sequence of candidate exam
    /// start slots inside `window`.
    ///
    /// # Errors
    /// [`TimetableError::DuplicateId`] or [`TimetableError::UnknownStudent`].
    pub fn new(
        courses: Vec<Course>,
        students: Vec<Student>,
        classrooms: Vec<Classroom>,
        invigilators: Vec<Invigilator>,
        timeslots: Vec<Timeslot>,
        window: SchedulingWindow,
    ) -> Result<Self> {
        let course_index = index_by(&courses, "course", |c| &c.code)?;
        let student_index = index_by(&students, "student", |s| &s.id)?;
        let classroom_index = index_by(&classrooms, "classroom", |c| &c.code)?;
        let invigilator_index = index_by(&invigilators, "invigilator", |i| &i.id)?;

        let mut course_students = Vec::with_capacity(courses.len());
        for course in &courses {
            let mut ids = Vec::with_capacity(course.students.len());
            for student in &course.students {
                let idx = student_index.get(student).copied().ok_or_else(|| {
                    TimetableError::UnknownStudent {
                        course: course.code.clone(),
                        student: student.clone(),
                    }
                })?;
                ids.push(idx);
            }
            ids.sort_unstable();
            ids.dedup();
            course_students.push(ids);
        }

        Ok(Self {
            courses,
            students,
            classrooms,
            invigilators,
            timeslots,
            window,
            course_index,
            classroom_index,
            invigilator_index,
            course_students,
        })
    }

    /// All courses, in exam order.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// All students.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// All classrooms.
    pub fn classrooms(&self) -> &[Classroom] {
        &self.classrooms
    }

    /// All invigilators.
    pub fn invigilators(&self) -> &[Invigilator] {
        &self.invigilators
    }

    /// Candidate exam start slots.
    pub fn timeslots(&self) -> &[Timeslot] {
        &self.timeslots
    }

    /// Global scheduling window.
    pub fn window(&self) -> &SchedulingWindow {
        &self.window
    }

    /// Position of a course in [`courses`](Self::courses).
    pub fn course_index(&self, code: &str) -> Result<usize> {
        self.course_index
            .get(code)
            .copied()
            .ok_or_else(|| TimetableError::UnknownCourse(code.to_string()))
    }

    /// Checks that `genes` hold exactly one exam per course, in course order.
    ///
    /// Crossover is positional, so a timetable laid out any other way would
    /// lose or duplicate exams when recombined.
    ///
    /// # Errors
    /// [`TimetableError::ExamCountMismatch`] for a wrong length,
    /// [`TimetableError::UnknownCourse`] for a code not in the set and
    /// [`TimetableError::ExamOrderMismatch`] for a known course at the wrong
    /// position.
    pub fn check_layout(&self, genes: &[EncodedExam]) -> Result<()> {
        if genes.len() != self.courses.len() {
            return Err(TimetableError::ExamCountMismatch {
                expected: self.courses.len(),
                found: genes.len(),
            });
        }
        for (position, (gene, course)) in genes.iter().zip(&self.courses).enumerate() {
            if gene.course_code() != course.code {
                self.course_index(gene.course_code())?;
                return Err(TimetableError::ExamOrderMismatch {
                    position,
                    expected: course.code.clone(),
                    found: gene.course_code().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Position of a classroom in [`classrooms`](Self::classrooms).
    pub fn classroom_index(&self, code: &str) -> Result<usize> {
        self.classroom_index
            .get(code)
            .copied()
            .ok_or_else(|| TimetableError::UnknownClassroom(code.to_string()))
    }

    /// Position of an invigilator in [`invigilators`](Self::invigilators).
    pub fn invigilator_index(&self, id: &str) -> Result<usize> {
        self.invigilator_index
            .get(id)
            .copied()
            .ok_or_else(|| TimetableError::UnknownInvigilator(id.to_string()))
    }

    /// Looks up a course by code.
    pub fn course(&self, code: &str) -> Result<&Course> {
        Ok(&self.courses[self.course_index(code)?])
    }

    /// Looks up a classroom by code.
    pub fn classroom(&self, code: &str) -> Result<&Classroom> {
        Ok(&self.classrooms[self.classroom_index(code)?])
    }

    /// Looks up an invigilator by id.
    pub fn invigilator(&self, id: &str) -> Result<&Invigilator> {
        Ok(&self.invigilators[self.invigilator_index(id)?])
    }

    /// Number of distinct students registered for a course.
    pub fn student_count(&self, course_idx: usize) -> usize {
        self.course_students[course_idx].len()
    }

    /// Number of students registered for both courses.
    pub fn shared_students(&self, a: usize, b: usize) -> usize {
        let (xs, ys) = (&self.course_students[a], &self.course_students[b]);
        let (mut i, mut j, mut shared) = (0, 0, 0);
        while i < xs.len() && j < ys.len() {
            match xs[i].cmp(&ys[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    shared += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        shared
    }

    /// One unassigned exam per course, in course order.
    pub fn exams(&self) -> Vec<Exam> {
        self.courses.iter().map(Exam::from_course).collect()
    }
}

fn index_by<T>(
    items: &[T],
    kind: &'static str,
    key: impl Fn(&T) -> &String,
) -> Result<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let id = key(item);
        if index.insert(id.clone(), i).is_some() {
            return Err(TimetableError::DuplicateId {
                kind,
                id: id.clone(),
            });
        }
    }
    Ok(index)
}
