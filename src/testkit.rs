//! Small deterministic timetabling instance shared by unit tests.
//!
//! Five courses, three classrooms, two invigilators and four 3-hour start
//! slots over two days (3 and 4 June 2024, 09:00–17:00).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::ga::{Chromosome, ChromosomeId};
use crate::models::{
    Classroom, Course, EncodedExam, EntitySet, Invigilator, SchedulingWindow, Student, Timeslot,
};

pub(crate) fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .expect("valid fixture instant")
}

pub(crate) fn slot(day: u32, hour: u32, minute: u32, minutes: u32) -> Timeslot {
    Timeslot::starting_at(at(day, hour, minute), minutes).expect("valid fixture slot")
}

pub(crate) fn window() -> SchedulingWindow {
    SchedulingWindow::new(
        NaiveDate::from_ymd_opt(2024, 6, 3).expect("date"),
        NaiveDate::from_ymd_opt(2024, 6, 5).expect("date"),
        NaiveTime::from_hms_opt(9, 0, 0).expect("time"),
        NaiveTime::from_hms_opt(17, 0, 0).expect("time"),
    )
    .expect("valid fixture window")
}

pub(crate) fn courses() -> Vec<Course> {
    vec![
        Course::new("C1", 120).with_students(["s1", "s2", "s3"]),
        Course::new("C2", 120).with_students(["s3", "s4"]),
        Course::new("C3", 90).with_prep(15, 15).with_students(["s5", "s6"]),
        Course::new("C4", 120).with_students(["s1", "s7"]),
        Course::new("C5", 60).with_students(["s8"]).with_pc_lab(true),
    ]
}

/// The five-exam fixture.
pub(crate) fn entities() -> EntitySet {
    EntitySet::new(
        courses(),
        (1..=8).map(|i| Student::new(format!("s{i}"))).collect(),
        vec![
            Classroom::new("R1", 4),
            Classroom::new("R2", 3),
            Classroom::new("LAB", 2).with_pc_lab(true),
        ],
        vec![Invigilator::new("I1", 3), Invigilator::new("I2", 3)],
        vec![
            slot(3, 9, 0, 180),
            slot(3, 13, 0, 180),
            slot(4, 9, 0, 180),
            slot(4, 13, 0, 180),
        ],
        window(),
    )
    .expect("valid fixture entities")
}

pub(crate) fn gene(course: &str, room: &str, ts: Timeslot, invigilators: &[&str]) -> EncodedExam {
    EncodedExam::new(
        course,
        room,
        ts,
        invigilators.iter().map(|s| s.to_string()).collect(),
    )
}

/// A timetable with no hard-constraint violations.
pub(crate) fn feasible_genes() -> Vec<EncodedExam> {
    vec![
        gene("C1", "R1", slot(3, 9, 0, 120), &["I1"]),
        gene("C2", "R2", slot(3, 13, 0, 120), &["I1"]),
        gene("C3", "R2", slot(3, 9, 0, 120), &["I2"]),
        gene("C4", "R1", slot(4, 9, 0, 120), &["I2"]),
        gene("C5", "LAB", slot(4, 13, 0, 60), &["I1"]),
    ]
}

pub(crate) fn feasible(id: ChromosomeId) -> Chromosome {
    Chromosome::new(id, feasible_genes())
}
