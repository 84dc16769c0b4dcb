//! Census row enrichment
//!
//! Attaches the analytic metadata to aggregated census counts: financial
//! year/month, month name, week boundaries, and the human-readable site and
//! department labels from configuration.

use crate::core::calendar;
use crate::domain::census::{CensusCounts, CensusRow};
use std::collections::BTreeMap;

/// Fallback description for department type ids missing from configuration
pub const UNKNOWN_DEPARTMENT: &str = "Unknown";

/// Enriches aggregated counts into fully-labelled census rows
///
/// Holds the configured site-code → shorthand and department-id →
/// description mappings. Site codes absent from the mapping pass through
/// unchanged as their own shorthand; department ids absent from the mapping
/// get the explicit [`UNKNOWN_DEPARTMENT`] label.
#[derive(Debug, Clone)]
pub struct Enricher {
    site_shorthands: BTreeMap<String, String>,
    department_descriptions: BTreeMap<String, String>,
}

impl Enricher {
    /// Creates an enricher from the configured mappings
    pub fn new(
        site_shorthands: BTreeMap<String, String>,
        department_descriptions: BTreeMap<String, String>,
    ) -> Self {
        Self {
            site_shorthands,
            department_descriptions,
        }
    }

    /// Enriches one aggregated group into a census row
    pub fn enrich(&self, counts: CensusCounts) -> CensusRow {
        let CensusCounts {
            key,
            count_patients,
            count_arrivals,
        } = counts;

        let date = key.date_activity;

        let shorthand = self
            .site_shorthands
            .get(key.site_code.as_str())
            .cloned()
            .unwrap_or_else(|| key.site_code.as_str().to_string());

        let department_type_desc = self
            .department_descriptions
            .get(key.department_type_id.as_str())
            .cloned()
            .unwrap_or_else(|| UNKNOWN_DEPARTMENT.to_string());

        CensusRow {
            date_activity: date,
            hour: key.hour,
            site_code: key.site_code,
            department_type_id: key.department_type_id,
            count_patients,
            count_arrivals,
            fin_year: calendar::financial_year(date),
            fin_month: calendar::financial_month(date),
            month_name: calendar::month_name(date).to_string(),
            date_weekstarting: calendar::week_starting(date),
            date_weekending: calendar::week_ending(date),
            shorthand,
            department_type_desc,
        }
    }

    /// Enriches a batch of aggregated groups, preserving their order
    pub fn enrich_all(&self, counts: Vec<CensusCounts>) -> Vec<CensusRow> {
        counts.into_iter().map(|c| self.enrich(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::census::CensusKey;
    use crate::domain::ids::{DepartmentTypeId, SiteCode};
    use chrono::NaiveDate;

    fn enricher() -> Enricher {
        let sites = BTreeMap::from([
            ("RAL26".to_string(), "BH".to_string()),
            ("RAL01".to_string(), "RFH".to_string()),
        ]);
        let departments = BTreeMap::from([
            ("01".to_string(), "Emergency Department".to_string()),
            ("02".to_string(), "Urgent Treatment Centre".to_string()),
        ]);
        Enricher::new(sites, departments)
    }

    fn counts(date: &str, hour: u32, site: &str, dept: &str) -> CensusCounts {
        CensusCounts {
            key: CensusKey {
                date_activity: date.parse::<NaiveDate>().unwrap(),
                hour,
                site_code: SiteCode::new(site).unwrap(),
                department_type_id: DepartmentTypeId::new(dept).unwrap(),
            },
            count_patients: 2,
            count_arrivals: 1,
        }
    }

    #[test]
    fn test_enrich_mapped_labels() {
        let row = enricher().enrich(counts("2024-02-15", 9, "RAL26", "01"));
        assert_eq!(row.shorthand, "BH");
        assert_eq!(row.department_type_desc, "Emergency Department");
        assert_eq!(row.count_patients, 2);
        assert_eq!(row.count_arrivals, 1);
    }

    #[test]
    fn test_enrich_calendar_fields() {
        let row = enricher().enrich(counts("2024-02-15", 9, "RAL26", "01"));
        assert_eq!(row.fin_year, "23-24");
        assert_eq!(row.fin_month, 11);
        assert_eq!(row.month_name, "Feb");
        // 2024-02-15 is a Thursday
        assert_eq!(
            row.date_weekstarting,
            NaiveDate::from_ymd_opt(2024, 2, 12).unwrap()
        );
        assert_eq!(
            row.date_weekending,
            NaiveDate::from_ymd_opt(2024, 2, 18).unwrap()
        );
    }

    #[test]
    fn test_unmapped_site_passes_through() {
        let row = enricher().enrich(counts("2024-02-15", 9, "RKEQ4", "01"));
        assert_eq!(row.shorthand, "RKEQ4");
    }

    #[test]
    fn test_unmapped_department_is_unknown() {
        let row = enricher().enrich(counts("2024-02-15", 9, "RAL26", "99"));
        assert_eq!(row.department_type_desc, "Unknown");
    }

    #[test]
    fn test_enrich_all_preserves_order() {
        let rows = enricher().enrich_all(vec![
            counts("2024-02-15", 8, "RAL26", "01"),
            counts("2024-02-15", 9, "RAL26", "01"),
        ]);
        assert_eq!(rows[0].hour, 8);
        assert_eq!(rows[1].hour, 9);
    }
}
