use std::fmt;

use super::model::LaunchRecord;

/// Dropdown value meaning "no site filter".
pub const ALL_SITES: &str = "All Sites";

// ---------------------------------------------------------------------------
// Site selection
// ---------------------------------------------------------------------------

/// Current value of the site dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// Decode a dropdown value. The sentinel always maps to [`SiteSelection::All`].
    pub fn from_value(value: &str) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }

    /// Whether a record passes the site filter. Records without a site
    /// only pass when no site is selected.
    pub fn matches(&self, record: &LaunchRecord) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(site) => record.site.as_deref() == Some(site.as_str()),
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelection::All => write!(f, "{ALL_SITES}"),
            SiteSelection::Site(site) => write!(f, "{site}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Payload range
// ---------------------------------------------------------------------------

/// Inclusive payload window from the range slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Self {
        PayloadRange { low, high }
    }

    /// Inclusive-between test. A reversed range matches nothing and a
    /// record without a payload never matches.
    pub fn contains(&self, record: &LaunchRecord) -> bool {
        record
            .payload_kg
            .is_some_and(|kg| self.low <= kg && kg <= self.high)
    }
}

// ---------------------------------------------------------------------------
// Row selection
// ---------------------------------------------------------------------------

/// Return indices of records that pass the site filter and, when given,
/// the payload filter. Order follows the table.
pub fn filtered_indices(
    records: &[LaunchRecord],
    site: &SiteSelection,
    payload: Option<PayloadRange>,
) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, rec)| site.matches(rec))
        .filter(|(_, rec)| payload.map_or(true, |range| range.contains(rec)))
        .map(|(i, _)| i)
        .collect()
}

/// Indices of successful launches.
pub fn success_indices(records: &[LaunchRecord]) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, rec)| rec.outcome.is_success())
        .map(|(i, _)| i)
        .collect()
}
