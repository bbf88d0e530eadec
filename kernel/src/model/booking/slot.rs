use crate::model::role::Role;
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use shared::error::AppError;
use std::{fmt, str::FromStr};

const SLOT_FORMAT: &str = "%H:%M";

/// A bookable stretch of wall-clock time within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, AppError> {
        if end <= start {
            return Err(AppError::UnprocessableEntity(format!(
                "time slot must end after it starts ({} >= {})",
                start.format(SLOT_FORMAT),
                end.format(SLOT_FORMAT)
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Slots offered to `role` on `date`.
    ///
    /// Students get evening hours on weekdays and the whole day at weekends.
    /// Staff book the two daily class sessions. Admins do not book.
    pub fn schedule(role: Role, date: NaiveDate) -> Vec<TimeSlot> {
        match role {
            Role::Student => match date.weekday() {
                Weekday::Sat | Weekday::Sun => (8..21).map(hourly).collect(),
                _ => (18..21).map(hourly).collect(),
            },
            Role::Staff => vec![
                fixed((10, 45), (13, 15)),
                fixed((14, 5), (16, 35)),
            ],
            Role::Admin => Vec::new(),
        }
    }

    pub fn is_offered(&self, role: Role, date: NaiveDate) -> bool {
        Self::schedule(role, date).contains(self)
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

fn hourly(hour: u32) -> TimeSlot {
    fixed((hour, 0), (hour + 1, 0))
}

fn fixed((sh, sm): (u32, u32), (eh, em): (u32, u32)) -> TimeSlot {
    TimeSlot {
        start: hm(sh, sm),
        end: hm(eh, em),
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format(SLOT_FORMAT),
            self.end.format(SLOT_FORMAT)
        )
    }
}

impl FromStr for TimeSlot {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::UnprocessableEntity(format!("invalid time slot: {s}"));
        let (start, end) = s.split_once('-').ok_or_else(invalid)?;
        let start = NaiveTime::parse_from_str(start.trim(), SLOT_FORMAT).map_err(|_| invalid())?;
        let end = NaiveTime::parse_from_str(end.trim(), SLOT_FORMAT).map_err(|_| invalid())?;
        Self::new(start, end)
    }
}
