//! Domain records supplied by the data source: courses, students,
//! classrooms and invigilators.

use serde::{Deserialize, Serialize};

/// A course that needs one exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course code.
    pub code: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Ids of registered students.
    #[serde(default)]
    pub students: Vec<String>,
    /// Exam length in minutes.
    pub exam_minutes: u32,
    /// Preparation buffer before the exam, in minutes.
    #[serde(default)]
    pub before_prep_minutes: u32,
    /// Clean-up buffer after the exam, in minutes.
    #[serde(default)]
    pub after_prep_minutes: u32,
    /// Number of invigilators the exam needs.
    #[serde(default = "one")]
    pub required_invigilators: usize,
    /// Whether the exam must run in a PC lab.
    #[serde(default)]
    pub requires_pc_lab: bool,
}

fn one() -> usize {
    1
}

impl Course {
    /// Creates a course with no students, no buffers and one invigilator.
    pub fn new(code: impl Into<String>, exam_minutes: u32) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            students: Vec::new(),
            exam_minutes,
            before_prep_minutes: 0,
            after_prep_minutes: 0,
            required_invigilators: 1,
            requires_pc_lab: false,
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Registers students.
    pub fn with_students<S: Into<String>>(mut self, students: impl IntoIterator<Item = S>) -> Self {
        self.students.extend(students.into_iter().map(Into::into));
        self
    }

    /// Sets the before/after preparation buffers.
    pub fn with_prep(mut self, before_minutes: u32, after_minutes: u32) -> Self {
        self.before_prep_minutes = before_minutes;
        self.after_prep_minutes = after_minutes;
        self
    }

    /// Sets the number of invigilators.
    pub fn with_invigilators(mut self, n: usize) -> Self {
        self.required_invigilators = n;
        self
    }

    /// Marks the exam as needing a PC lab.
    pub fn with_pc_lab(mut self, required: bool) -> Self {
        self.requires_pc_lab = required;
        self
    }
}

/// A student. Course registration is held on [`Course::students`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique student id.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
}

impl Student {
    /// Creates a student.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
        }
    }
}

/// A room exams can be held in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    /// Unique classroom code.
    pub code: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Seats available.
    pub capacity: u32,
    /// Whether the room is a PC lab.
    #[serde(default)]
    pub pc_lab: bool,
    /// Free-form properties (projector, accessibility, ...).
    #[serde(default)]
    pub properties: Vec<String>,
}

impl Classroom {
    /// Creates a regular (non-PC-lab) classroom.
    pub fn new(code: impl Into<String>, capacity: u32) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            capacity,
            pc_lab: false,
            properties: Vec::new(),
        }
    }

    /// Marks the room as a PC lab.
    pub fn with_pc_lab(mut self, pc_lab: bool) -> Self {
        self.pc_lab = pc_lab;
        self
    }
}

/// A staff member who supervises exams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invigilator {
    /// Unique invigilator id.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Maximum number of exams this person may monitor in one timetable.
    pub max_monitored_exams: usize,
}

impl Invigilator {
    /// Creates an invigilator.
    pub fn new(id: impl Into<String>, max_monitored_exams: usize) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            max_monitored_exams,
        }
    }
}
