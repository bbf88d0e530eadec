use crate::model::id::{LabId, UtilizationId};
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub mod event;

pub const MAX_HOURS_PER_DAY: f64 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Utilization {
    pub utilization_id: UtilizationId,
    pub lab_id: LabId,
    pub date: NaiveDate,
    pub hours_used: f64,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UtilizationQuery {
    pub lab_id: Option<LabId>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Per-day totals behind the admin dashboard charts.
#[derive(Debug, Default, PartialEq)]
pub struct UtilizationSummary {
    pub hours_by_date: BTreeMap<NaiveDate, f64>,
    pub bookings_by_date: BTreeMap<NaiveDate, i64>,
}

impl UtilizationSummary {
    pub fn new(
        hours: impl IntoIterator<Item = (NaiveDate, f64)>,
        bookings: impl IntoIterator<Item = (NaiveDate, i64)>,
    ) -> Self {
        let mut summary = Self::default();
        for (date, h) in hours {
            *summary.hours_by_date.entry(date).or_default() += h;
        }
        for (date, n) in bookings {
            *summary.bookings_by_date.entry(date).or_default() += n;
        }
        summary
    }

    pub fn total_hours(&self) -> f64 {
        self.hours_by_date.values().sum()
    }
}
