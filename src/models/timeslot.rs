//! Time model: timeslots and the global scheduling window.
//!
//! # Time Model
//! Instants are local `NaiveDateTime`s; the timetable never crosses time
//! zones. A [`Timeslot`] is the half-open interval `[start, end)`, so two
//! back-to-back slots do not overlap.
//!
//! # Window
//! A [`SchedulingWindow`] bounds every exam: dates in
//! `[start_date, end_date)`, daily hours in `[start_time, end_time]`, and
//! never on a holiday.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};

/// A half-open time interval `[start, end)` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawTimeslot")]
pub struct Timeslot {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Deserialize)]
struct RawTimeslot {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TryFrom<RawTimeslot> for Timeslot {
    type Error = TimetableError;

    fn try_from(raw: RawTimeslot) -> Result<Self> {
        Timeslot::new(raw.start, raw.end)
    }
}

impl Timeslot {
    /// Creates a timeslot.
    ///
    /// # Errors
    /// [`TimetableError::InvalidTimeslot`] unless `start < end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start >= end {
            return Err(TimetableError::InvalidTimeslot { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a timeslot of `minutes` length beginning at `start`.
    pub fn starting_at(start: NaiveDateTime, minutes: u32) -> Result<Self> {
        Self::new(start, start + TimeDelta::minutes(i64::from(minutes)))
    }

    /// Interval start (inclusive).
    #[inline]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Interval end (exclusive).
    #[inline]
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Calendar date of the start instant.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Length of the interval.
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether two slots share any instant.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Idle time between two non-overlapping slots, or `None` if they overlap.
    pub fn gap_to(&self, other: &Self) -> Option<TimeDelta> {
        if self.overlaps(other) {
            None
        } else if self.end <= other.start {
            Some(other.start - self.end)
        } else {
            Some(self.start - other.end)
        }
    }

    /// Shrinks the slot by `before` minutes at the start and `after` at the end.
    ///
    /// # Errors
    /// [`TimetableError::InvalidTimeslot`] if nothing is left.
    pub fn shrink(&self, before: u32, after: u32) -> Result<Self> {
        Self::new(
            self.start + TimeDelta::minutes(i64::from(before)),
            self.end - TimeDelta::minutes(i64::from(after)),
        )
    }
}

/// Global date/time bounds for every exam, plus excluded dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingWindow {
    /// First schedulable date (inclusive).
    pub start_date: NaiveDate,
    /// Last schedulable date (exclusive).
    pub end_date: NaiveDate,
    /// Earliest daily start time.
    pub start_time: NaiveTime,
    /// Latest daily end time.
    pub end_time: NaiveTime,
    /// Dates on which no exam may take place.
    #[serde(default)]
    pub holidays: BTreeSet<NaiveDate>,
}

impl SchedulingWindow {
    /// Creates a window without holidays.
    ///
    /// # Errors
    /// [`TimetableError::InvalidConfig`] if the date range or the daily
    /// hours are empty.
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Self> {
        if start_date >= end_date {
            return Err(TimetableError::InvalidConfig(format!(
                "start date {start_date} must be before end date {end_date}"
            )));
        }
        if start_time >= end_time {
            return Err(TimetableError::InvalidConfig(format!(
                "start time {start_time} must be before end time {end_time}"
            )));
        }
        Ok(Self {
            start_date,
            end_date,
            start_time,
            end_time,
            holidays: BTreeSet::new(),
        })
    }

    /// Adds excluded dates.
    pub fn with_holidays(mut self, holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.holidays.extend(holidays);
        self
    }

    /// Whether `date` is a schedulable day.
    pub fn is_open_on(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date < self.end_date && !self.holidays.contains(&date)
    }

    /// Whether `slot` lies entirely inside the window on a single open day.
    pub fn contains(&self, slot: &Timeslot) -> bool {
        let date = slot.start().date();
        self.is_open_on(date)
            && slot.end().date() == date
            && slot.start().time() >= self.start_time
            && slot.end().time() <= self.end_time
    }
}
