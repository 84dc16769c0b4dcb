//! Hourly expansion engine
//!
//! This module turns one attendance record into the ordered sequence of
//! per-hour facts it implies: one fact per (date, hour) slot from the
//! arrival hour to the departure hour inclusive.
//!
//! Occupancy is measured by a fixed hourly snapshot (who is present at the
//! top of the hour), while arrivals are an event counted against the hour in
//! which they occur even when that hour's snapshot predates the event. A
//! patient arriving at 08:15 therefore contributes an arrival to the 08:00
//! hour but is first counted as present at the 09:00 snapshot; a patient
//! arriving at exactly 08:00:00 counts as both.

use crate::domain::attendance::AttendanceRecord;
use crate::domain::census::HourFact;
use crate::domain::errors::CensusError;
use crate::domain::ids::{DepartmentTypeId, SiteCode};
use crate::domain::result::Result;
use chrono::NaiveDate;

/// Expands an attendance record into its per-hour facts
///
/// The returned iterator is finite, non-empty, and ordered by ascending
/// (date, hour). A stay contained entirely within one hour yields exactly
/// one fact.
///
/// # Errors
///
/// Returns `CensusError::DataFormat` if the departure instant precedes the
/// arrival instant. Such records are rejected outright rather than silently
/// contributing zero facts, so data-quality faults surface instead of
/// vanishing into the aggregate.
///
/// # Examples
///
/// ```
/// use ed_census::core::expand::expand;
/// use ed_census::domain::AttendanceRecord;
///
/// let record = AttendanceRecord::from_raw(
///     "RAL26", "01",
///     "2024-01-01", "08:15:00",
///     "2024-01-01", "10:00:00",
/// ).unwrap();
///
/// let facts: Vec<_> = expand(&record).unwrap().collect();
/// assert_eq!(facts.len(), 3);
/// assert_eq!((facts[0].count_patients, facts[0].count_arrivals), (0, 1));
/// assert_eq!((facts[1].count_patients, facts[1].count_arrivals), (1, 0));
/// ```
pub fn expand(record: &AttendanceRecord) -> Result<HourExpansion> {
    if record.departure_instant() < record.arrival_instant() {
        return Err(CensusError::DataFormat(format!(
            "departure {} precedes arrival {} for site {} department {}",
            record.departure_instant(),
            record.arrival_instant(),
            record.site_code,
            record.department_type_id,
        )));
    }

    let remaining = slots_between(
        record.arrival_date,
        record.arrival_hour(),
        record.departure_date,
        record.departure_hour(),
    );

    Ok(HourExpansion {
        site_code: record.site_code.clone(),
        department_type_id: record.department_type_id.clone(),
        current_date: record.arrival_date,
        current_hour: record.arrival_hour(),
        arrival_counts_as_present: record.arrived_on_the_hour(),
        arrival_emitted: false,
        remaining,
    })
}

/// Number of (date, hour) slots from start to end inclusive
fn slots_between(start_date: NaiveDate, start_hour: u32, end_date: NaiveDate, end_hour: u32) -> u64 {
    let days = (end_date - start_date).num_days();
    (days * 24 + i64::from(end_hour) - i64::from(start_hour) + 1) as u64
}

/// Lazy iterator over the per-hour facts of one attendance
///
/// Restartable in the sense that `expand` can be called again on the same
/// record; iteration itself is single-pass. Safe to feed straight into the
/// aggregator without materializing the facts.
#[derive(Debug, Clone)]
pub struct HourExpansion {
    site_code: SiteCode,
    department_type_id: DepartmentTypeId,
    current_date: NaiveDate,
    current_hour: u32,
    arrival_counts_as_present: bool,
    arrival_emitted: bool,
    remaining: u64,
}

impl Iterator for HourExpansion {
    type Item = HourFact;

    fn next(&mut self) -> Option<HourFact> {
        if self.remaining == 0 {
            return None;
        }

        let (count_patients, count_arrivals) = if self.arrival_emitted {
            (1, 0)
        } else {
            self.arrival_emitted = true;
            (u32::from(self.arrival_counts_as_present), 1)
        };

        let fact = HourFact {
            date_activity: self.current_date,
            hour: self.current_hour,
            site_code: self.site_code.clone(),
            department_type_id: self.department_type_id.clone(),
            count_patients,
            count_arrivals,
        };

        self.remaining -= 1;
        if self.remaining > 0 {
            if self.current_hour == 23 {
                self.current_hour = 0;
                match self.current_date.succ_opt() {
                    Some(next) => self.current_date = next,
                    None => self.remaining = 0,
                }
            } else {
                self.current_hour += 1;
            }
        }

        Some(fact)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for HourExpansion {}
