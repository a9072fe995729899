//! Initial population construction.
//!
//! Each timetable is built greedily in course order with randomized tie
//! breaking, so the population starts diverse but mostly sensible:
//!
//! 1. Candidate start slots are visited in random order. The first whose
//!    combined slot fits the scheduling window, clashes with no already
//!    placed exam sharing a student, and leaves a suitable classroom free
//!    is taken.
//! 2. A suitable classroom seats every registered student and is a PC lab
//!    when the course needs one. Without any suitable room the largest
//!    room is used.
//! 3. Invigilators are assigned least-loaded first, preferring those not
//!    already busy in an overlapping slot.
//!
//! When no start slot satisfies step 1 a random one is used; the evaluator
//! scores the resulting violations.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use super::chromosome::{Chromosome, IdGenerator, Population};
use crate::error::{Result, TimetableError};
use crate::models::{EncodedExam, EntitySet, Timeslot};

/// A placed exam, by entity index.
struct Placement {
    course: usize,
    classroom: usize,
    slot: Timeslot,
    invigilators: Vec<usize>,
}

/// Builds random, load-aware timetables for an entity set.
#[derive(Debug, Clone, Copy)]
pub struct Initializer<'a> {
    entities: &'a EntitySet,
}

impl<'a> Initializer<'a> {
    /// Creates an initializer.
    ///
    /// # Errors
    /// [`TimetableError::NoExams`], [`TimetableError::NoTimeslots`] or
    /// [`TimetableError::NoClassrooms`] for an entity set with nothing to
    /// schedule or nowhere to schedule it.
    pub fn new(entities: &'a EntitySet) -> Result<Self> {
        if entities.courses().is_empty() {
            return Err(TimetableError::NoExams);
        }
        if entities.timeslots().is_empty() {
            return Err(TimetableError::NoTimeslots);
        }
        if entities.classrooms().is_empty() {
            return Err(TimetableError::NoClassrooms);
        }
        Ok(Self { entities })
    }

    /// Builds `size` chromosomes with fresh ids.
    pub fn population<R: Rng>(
        &self,
        size: usize,
        ids: &mut IdGenerator,
        rng: &mut R,
    ) -> Result<Population> {
        let members = (0..size)
            .map(|_| -> Result<Chromosome> {
                let genes = self.timetable(rng)?;
                Ok(Chromosome::new(ids.next_id(), genes))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Population::new(members))
    }

    /// Builds one timetable: one gene per course, in course order.
    pub fn timetable<R: Rng>(&self, rng: &mut R) -> Result<Vec<EncodedExam>> {
        let entities = self.entities;
        let mut placed: Vec<Placement> = Vec::with_capacity(entities.courses().len());
        let mut load = vec![0usize; entities.invigilators().len()];
        let mut genes = Vec::with_capacity(entities.courses().len());

        for (course_idx, mut exam) in entities.exams().into_iter().enumerate() {
            let course = &entities.courses()[course_idx];
            let rooms = self.suitable_rooms(course_idx);

            let mut starts: Vec<&Timeslot> = entities.timeslots().iter().collect();
            starts.shuffle(rng);

            let mut choice = None;
            for start in starts {
                let slot = Timeslot::starting_at(start.start(), exam.combined_minutes())?;
                if !entities.window().contains(&slot) || self.student_clash(&placed, course_idx, &slot)
                {
                    continue;
                }
                let free: Vec<usize> = rooms
                    .iter()
                    .copied()
                    .filter(|&r| {
                        !placed
                            .iter()
                            .any(|p| p.classroom == r && p.slot.overlaps(&slot))
                    })
                    .collect();
                if let Some(&room) = free.choose(rng) {
                    choice = Some((room, slot));
                    break;
                }
            }

            let (classroom, slot) = match choice {
                Some(found) => found,
                None => {
                    let start = entities
                        .timeslots()
                        .choose(rng)
                        .ok_or(TimetableError::NoTimeslots)?;
                    let room = rooms
                        .choose(rng)
                        .copied()
                        .ok_or(TimetableError::NoClassrooms)?;
                    (room, Timeslot::starting_at(start.start(), exam.combined_minutes())?)
                }
            };

            let invigilators =
                self.pick_invigilators(course.required_invigilators, &slot, &placed, &load, rng);
            for &i in &invigilators {
                load[i] += 1;
            }

            exam.classroom = Some(entities.classrooms()[classroom].code.clone());
            exam.timeslot = Some(slot);
            exam.invigilators = invigilators
                .iter()
                .map(|&i| entities.invigilators()[i].id.clone())
                .collect();
            genes.push(exam.encode()?);

            placed.push(Placement {
                course: course_idx,
                classroom,
                slot,
                invigilators,
            });
        }
        Ok(genes)
    }

    /// Rooms that seat the course (and are PC labs if needed), or the
    /// largest room when none does.
    fn suitable_rooms(&self, course_idx: usize) -> Vec<usize> {
        let course = &self.entities.courses()[course_idx];
        let students = self.entities.student_count(course_idx);
        let classrooms = self.entities.classrooms();

        let fitting: Vec<usize> = classrooms
            .iter()
            .enumerate()
            .filter(|(_, room)| room.capacity as usize >= students)
            .filter(|(_, room)| !course.requires_pc_lab || room.pc_lab)
            .map(|(i, _)| i)
            .collect();
        if !fitting.is_empty() {
            return fitting;
        }
        classrooms
            .iter()
            .enumerate()
            .max_by_key(|(_, room)| room.capacity)
            .map(|(i, _)| vec![i])
            .unwrap_or_default()
    }

    fn student_clash(&self, placed: &[Placement], course_idx: usize, slot: &Timeslot) -> bool {
        placed.iter().any(|p| {
            p.slot.overlaps(slot) && self.entities.shared_students(p.course, course_idx) > 0
        })
    }

    /// `required` invigilators: idle before busy, then least loaded, ties
    /// broken at random.
    fn pick_invigilators<R: Rng>(
        &self,
        required: usize,
        slot: &Timeslot,
        placed: &[Placement],
        load: &[usize],
        rng: &mut R,
    ) -> Vec<usize> {
        let mut order: Vec<usize> = (0..load.len()).collect();
        order.shuffle(rng);
        order.sort_by_key(|&i| {
            let busy = placed
                .iter()
                .any(|p| p.slot.overlaps(slot) && p.invigilators.contains(&i));
            (busy, load[i])
        });
        order.truncate(required);
        order
    }
}
