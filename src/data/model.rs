use std::fmt;

// ---------------------------------------------------------------------------
// Cell – a single raw value read from the source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common Pandas dtypes.
/// Every loader normalises its rows into cells before records are built.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::String(s) => write!(f, "{s}"),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Null => write!(f, "<null>"),
        }
    }
}

impl Cell {
    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(v) => Some(*v),
            Cell::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text form of the cell, `None` for nulls and blank strings.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::String(s) if s.trim().is_empty() => None,
            Cell::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome – the binary `class` column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Decode the `class` column: 1 / 1.0 / true is a success, 0 / 0.0 / false a failure.
    pub fn from_cell(cell: &Cell) -> Option<Self> {
        match cell {
            Cell::Integer(1) | Cell::Bool(true) => Some(Outcome::Success),
            Cell::Integer(0) | Cell::Bool(false) => Some(Outcome::Failure),
            Cell::Float(v) if *v == 1.0 => Some(Outcome::Success),
            Cell::Float(v) if *v == 0.0 => Some(Outcome::Failure),
            _ => None,
        }
    }

    /// Numeric class value plotted on the scatter y axis.
    pub fn class(self) -> u8 {
        match self {
            Outcome::Success => 1,
            Outcome::Failure => 0,
        }
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "Success"),
            Outcome::Failure => write!(f, "Failure"),
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single launch. Site and payload may be missing in the source file;
/// such rows stay in the table but never pass a site or payload filter.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub site: Option<String>,
    pub payload_kg: Option<f64>,
    pub outcome: Outcome,
    pub booster_category: Option<String>,
}

impl LaunchRecord {
    #[cfg(test)]
    pub fn new(site: &str, payload_kg: f64, outcome: Outcome, booster_category: &str) -> Self {
        LaunchRecord {
            site: Some(site.to_string()),
            payload_kg: Some(payload_kg),
            outcome,
            booster_category: Some(booster_category.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed summaries.
/// Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct LaunchTable {
    records: Vec<LaunchRecord>,
    /// Distinct launch sites in first-seen order.
    sites: Vec<String>,
    /// Distinct booster categories in first-seen order.
    booster_categories: Vec<String>,
    /// Observed (min, max) payload over non-missing values.
    payload_bounds: Option<(f64, f64)>,
}

impl LaunchTable {
    /// Build summaries from the loaded records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut sites: Vec<String> = Vec::new();
        let mut booster_categories: Vec<String> = Vec::new();
        let mut payload_bounds: Option<(f64, f64)> = None;

        for rec in &records {
            if let Some(site) = &rec.site {
                if !sites.contains(site) {
                    sites.push(site.clone());
                }
            }
            if let Some(cat) = &rec.booster_category {
                if !booster_categories.contains(cat) {
                    booster_categories.push(cat.clone());
                }
            }
            if let Some(kg) = rec.payload_kg {
                payload_bounds = Some(match payload_bounds {
                    Some((lo, hi)) => (lo.min(kg), hi.max(kg)),
                    None => (kg, kg),
                });
            }
        }

        LaunchTable {
            records,
            sites,
            booster_categories,
            payload_bounds,
        }
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn booster_categories(&self) -> &[String] {
        &self.booster_categories
    }

    /// Observed payload minimum and maximum, `None` when no row has a payload.
    pub fn payload_bounds(&self) -> Option<(f64, f64)> {
        self.payload_bounds
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summaries_keep_first_seen_order() {
        let table = LaunchTable::from_records(vec![
            LaunchRecord::new("KSC LC-39A", 2500.0, Outcome::Success, "FT"),
            LaunchRecord::new("CCAFS LC-40", 500.0, Outcome::Failure, "v1.0"),
            LaunchRecord::new("KSC LC-39A", 9600.0, Outcome::Success, "B4"),
            LaunchRecord::new("VAFB SLC-4E", 0.0, Outcome::Failure, "FT"),
        ]);

        assert_eq!(table.len(), 4);
        assert_eq!(table.sites(), ["KSC LC-39A", "CCAFS LC-40", "VAFB SLC-4E"]);
        assert_eq!(table.booster_categories(), ["FT", "v1.0", "B4"]);
        assert_eq!(table.payload_bounds(), Some((0.0, 9600.0)));
    }

    #[test]
    fn missing_values_are_skipped_in_summaries() {
        let table = LaunchTable::from_records(vec![LaunchRecord {
            site: None,
            payload_kg: None,
            outcome: Outcome::Failure,
            booster_category: None,
        }]);

        assert!(table.sites().is_empty());
        assert!(table.booster_categories().is_empty());
        assert_eq!(table.payload_bounds(), None);
        assert!(!table.is_empty());
    }

    #[test]
    fn outcome_decodes_class_cells() {
        assert_eq!(Outcome::from_cell(&Cell::Integer(1)), Some(Outcome::Success));
        assert_eq!(Outcome::from_cell(&Cell::Float(0.0)), Some(Outcome::Failure));
        assert_eq!(Outcome::from_cell(&Cell::Bool(true)), Some(Outcome::Success));
        assert_eq!(Outcome::from_cell(&Cell::Integer(2)), None);
        assert_eq!(Outcome::from_cell(&Cell::Null), None);
        assert_eq!(Outcome::Success.class(), 1);
    }

    #[test]
    fn blank_text_cells_read_as_missing() {
        assert_eq!(Cell::String("  ".into()).as_text(), None);
        assert_eq!(Cell::Integer(7).as_text().as_deref(), Some("7"));
        assert_eq!(Cell::String("x".into()).as_f64(), None);
    }
}
