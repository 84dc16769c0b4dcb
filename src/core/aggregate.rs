//! Census aggregation
//!
//! Groups per-patient hour facts by (date, hour, site, department) and sums
//! the presence and arrival flags within each group. Summation is
//! commutative and associative, so the result is independent of input order
//! and partial sums from parallel workers could be merged the same way.

use crate::domain::census::{CensusCounts, CensusKey, HourFact};
use std::collections::BTreeMap;

/// Aggregates hour facts into per-group census counts
///
/// The representation is sparse: groups that no fact maps into do not
/// appear. Output is ordered by ascending (date, hour, site, department)
/// regardless of input order.
///
/// # Examples
///
/// ```
/// use ed_census::core::aggregate::aggregate;
/// use ed_census::core::expand::expand;
/// use ed_census::domain::AttendanceRecord;
///
/// let record = AttendanceRecord::from_raw(
///     "RAL26", "01",
///     "2024-01-01", "08:15:00",
///     "2024-01-01", "10:00:00",
/// ).unwrap();
///
/// let counts = aggregate(expand(&record).unwrap());
/// assert_eq!(counts.len(), 3);
/// ```
pub fn aggregate<I>(facts: I) -> Vec<CensusCounts>
where
    I: IntoIterator<Item = HourFact>,
{
    let mut groups: BTreeMap<CensusKey, (u32, u32)> = BTreeMap::new();

    for fact in facts {
        let entry = groups.entry(fact.key()).or_insert((0, 0));
        entry.0 += fact.count_patients;
        entry.1 += fact.count_arrivals;
    }

    groups
        .into_iter()
        .map(|(key, (count_patients, count_arrivals))| CensusCounts {
            key,
            count_patients,
            count_arrivals,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{DepartmentTypeId, SiteCode};
    use chrono::NaiveDate;

    fn fact(
        date: &str,
        hour: u32,
        site: &str,
        dept: &str,
        patients: u32,
        arrivals: u32,
    ) -> HourFact {
        HourFact {
            date_activity: date.parse::<NaiveDate>().unwrap(),
            hour,
            site_code: SiteCode::new(site).unwrap(),
            department_type_id: DepartmentTypeId::new(dept).unwrap(),
            count_patients: patients,
            count_arrivals: arrivals,
        }
    }

    #[test]
    fn test_overlapping_patients_sum() {
        let counts = aggregate(vec![
            fact("2024-01-01", 9, "RAL26", "01", 1, 0),
            fact("2024-01-01", 9, "RAL26", "01", 1, 1),
        ]);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].count_patients, 2);
        assert_eq!(counts[0].count_arrivals, 1);
    }

    #[test]
    fn test_distinct_keys_stay_separate() {
        let counts = aggregate(vec![
            fact("2024-01-01", 9, "RAL26", "01", 1, 0),
            fact("2024-01-01", 9, "RAL26", "02", 1, 0),
            fact("2024-01-01", 9, "RAL01", "01", 1, 0),
            fact("2024-01-01", 10, "RAL26", "01", 1, 0),
        ]);
        assert_eq!(counts.len(), 4);
        assert!(counts.iter().all(|c| c.count_patients == 1));
    }

    #[test]
    fn test_order_invariance() {
        let facts = vec![
            fact("2024-01-02", 3, "RRV03", "01", 1, 0),
            fact("2024-01-01", 9, "RAL26", "01", 0, 1),
            fact("2024-01-01", 9, "RAL26", "01", 1, 0),
            fact("2024-01-01", 23, "RAPNM", "03", 1, 1),
        ];

        let forward = aggregate(facts.clone());
        let reversed = aggregate(facts.into_iter().rev());
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_output_sorted_by_key() {
        let counts = aggregate(vec![
            fact("2024-01-02", 0, "RAL26", "01", 1, 0),
            fact("2024-01-01", 23, "RAL26", "01", 1, 0),
            fact("2024-01-01", 8, "RAL26", "01", 1, 0),
        ]);
        let keys: Vec<_> = counts.iter().map(|c| (c.key.date_activity, c.key.hour)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_zero_measure_group_is_kept() {
        // A mid-hour arrival fact maps into a group even though the
        // presence measure is zero
        let counts = aggregate(vec![fact("2024-01-01", 8, "RAL26", "01", 0, 1)]);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].count_patients, 0);
        assert_eq!(counts[0].count_arrivals, 1);
    }

    #[test]
    fn test_empty_input_empty_output() {
        assert!(aggregate(Vec::new()).is_empty());
    }
}
