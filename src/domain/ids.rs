//! Domain identifier types
//!
//! This module provides newtype wrappers for the identifiers carried on
//! attendance records. Each type ensures the two identifier kinds cannot be
//! mixed up and rejects empty values at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Site code newtype wrapper
///
/// Represents an ODS site code identifying a hospital site,
/// e.g. `"RAL26"` for Barnet Hospital.
///
/// # Examples
///
/// ```
/// use ed_census::domain::ids::SiteCode;
/// use std::str::FromStr;
///
/// let site = SiteCode::from_str("RAL26").unwrap();
/// assert_eq!(site.as_str(), "RAL26");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SiteCode(String);

impl SiteCode {
    /// Creates a new SiteCode from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the code is empty or whitespace-only.
    pub fn new(code: impl Into<String>) -> Result<Self, String> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err("Site code cannot be empty".to_string());
        }
        Ok(Self(code))
    }

    /// Returns the site code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SiteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SiteCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for SiteCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Department type identifier newtype wrapper
///
/// The ECDS department type classification, a short zero-padded code
/// (`"01"` = emergency department, `"02"`/`"03"` = urgent treatment
/// services). Opaque to the pipeline; descriptions come from configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DepartmentTypeId(String);

impl DepartmentTypeId {
    /// Creates a new DepartmentTypeId from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or whitespace-only.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Department type id cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the department type id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DepartmentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DepartmentTypeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for DepartmentTypeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
