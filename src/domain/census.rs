//! Census domain models
//!
//! This module defines the intermediate and output types of the expansion
//! pipeline: per-patient-hour facts, the aggregation key, and the enriched
//! census row handed to the persistence layer.

use super::ids::{DepartmentTypeId, SiteCode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One patient's contribution to one hour's presence/arrival counts
///
/// Produced by the expansion engine, consumed immediately by the
/// aggregator; never persisted individually. Both counts are 0 or 1 on a
/// single fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourFact {
    /// Calendar date the hour belongs to
    pub date_activity: NaiveDate,

    /// Hour of day, 0-23
    pub hour: u32,

    /// Site the patient attended
    pub site_code: SiteCode,

    /// ECDS department type classification
    pub department_type_id: DepartmentTypeId,

    /// 1 iff the patient was present at the start of this hour
    pub count_patients: u32,

    /// 1 iff this hour is the patient's arrival hour
    pub count_arrivals: u32,
}

impl HourFact {
    /// The aggregation key for this fact
    pub fn key(&self) -> CensusKey {
        CensusKey {
            date_activity: self.date_activity,
            hour: self.hour,
            site_code: self.site_code.clone(),
            department_type_id: self.department_type_id.clone(),
        }
    }
}

/// Grouping key for census aggregation
///
/// Ordered by (date, hour, site, department) so aggregated output is
/// deterministic regardless of input order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CensusKey {
    /// Calendar date the hour belongs to
    pub date_activity: NaiveDate,

    /// Hour of day, 0-23
    pub hour: u32,

    /// Site the patients attended
    pub site_code: SiteCode,

    /// ECDS department type classification
    pub department_type_id: DepartmentTypeId,
}

/// Aggregated counts for one (date, hour, site, department) group
///
/// The output of the aggregator before calendar and label enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CensusCounts {
    /// Grouping key
    pub key: CensusKey,

    /// Number of patients present at the top of the hour
    pub count_patients: u32,

    /// Number of patients who arrived during the hour
    pub count_arrivals: u32,
}

/// One fully-enriched row of the hourly census output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensusRow {
    /// Calendar date the hour belongs to
    pub date_activity: NaiveDate,

    /// Hour of day, 0-23
    pub hour: u32,

    /// Site the patients attended
    pub site_code: SiteCode,

    /// ECDS department type classification
    pub department_type_id: DepartmentTypeId,

    /// Number of patients present at the top of the hour
    pub count_patients: u32,

    /// Number of patients who arrived during the hour
    pub count_arrivals: u32,

    /// UK financial year, formatted `yy-zz` (e.g. `"23-24"`)
    pub fin_year: String,

    /// Financial month, 1 = April through 12 = March
    pub fin_month: u32,

    /// Short month name corresponding to the financial month
    pub month_name: String,

    /// Monday of the week containing `date_activity`
    pub date_weekstarting: NaiveDate,

    /// Sunday of the week containing `date_activity`
    pub date_weekending: NaiveDate,

    /// Short site label, or the raw site code when unmapped
    pub shorthand: String,

    /// Configured department description, `"Unknown"` when unmapped
    pub department_type_desc: String,
}
