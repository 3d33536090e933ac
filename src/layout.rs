use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::filter::{ALL_SITES, PayloadRange};
use crate::data::model::LaunchTable;

pub const SITE_DROPDOWN_ID: &str = "site-dropdown";
pub const PAYLOAD_SLIDER_ID: &str = "payload_slider";
pub const PIE_CHART_ID: &str = "success-pie-chart";
pub const SCATTER_CHART_ID: &str = "success-payload-scatter-chart";

pub const SLIDER_MIN: f64 = 0.0;
pub const SLIDER_MAX: f64 = 10000.0;
pub const SLIDER_STEP: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Layout components
// ---------------------------------------------------------------------------

/// The static page: built once at startup, served as JSON and rendered to HTML.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: String,
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Component {
    Heading(Heading),
    Dropdown(Dropdown),
    Paragraph { text: String },
    RangeSlider(RangeSlider),
    Graph { id: String },
    Break,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub text: String,
    pub text_align: String,
    pub color: String,
    pub font_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dropdown {
    pub id: String,
    pub options: Vec<DropdownOption>,
    pub value: String,
    pub searchable: bool,
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSlider {
    pub id: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Tick position → label.
    pub marks: BTreeMap<u32, String>,
    pub value: [f64; 2],
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Slider handles' starting positions: the observed payload bounds clamped
/// into the slider domain. An empty table starts at the full domain.
pub fn default_payload_range(table: &LaunchTable) -> PayloadRange {
    let (lo, hi) = table.payload_bounds().unwrap_or((SLIDER_MIN, SLIDER_MAX));
    let clamped = PayloadRange::new(lo.clamp(SLIDER_MIN, SLIDER_MAX), hi.clamp(SLIDER_MIN, SLIDER_MAX));
    if clamped.low != lo || clamped.high != hi {
        log::warn!(
            "observed payload range [{lo}, {hi}] exceeds slider domain, clamped to [{}, {}]",
            clamped.low,
            clamped.high
        );
    }
    clamped
}

/// Options for the site dropdown: the sentinel, then every site in first-seen order.
pub fn site_options(table: &LaunchTable) -> Vec<DropdownOption> {
    std::iter::once(ALL_SITES)
        .chain(table.sites().iter().map(String::as_str))
        .map(|site| DropdownOption {
            label: site.to_string(),
            value: site.to_string(),
        })
        .collect()
}

/// Tick labels every step across the slider domain.
pub fn slider_marks() -> BTreeMap<u32, String> {
    (SLIDER_MIN as u32..=SLIDER_MAX as u32)
        .step_by(SLIDER_STEP as usize)
        .map(|kg| (kg, format!("{kg} Kg")))
        .collect()
}

impl Layout {
    pub fn build(table: &LaunchTable) -> Self {
        let payload = default_payload_range(table);

        Layout {
            title: "SpaceX Launch Records Dashboard".to_string(),
            components: vec![
                Component::Heading(Heading {
                    text: "SpaceX Launch Records Dashboard".to_string(),
                    text_align: "center".to_string(),
                    color: "#503D36".to_string(),
                    font_size: 40,
                }),
                Component::Dropdown(Dropdown {
                    id: SITE_DROPDOWN_ID.to_string(),
                    options: site_options(table),
                    value: ALL_SITES.to_string(),
                    searchable: true,
                    placeholder: "Select a Launch Site".to_string(),
                }),
                Component::Break,
                Component::Graph { id: PIE_CHART_ID.to_string() },
                Component::Break,
                Component::Paragraph { text: "Payload range (Kg):".to_string() },
                Component::RangeSlider(RangeSlider {
                    id: PAYLOAD_SLIDER_ID.to_string(),
                    min: SLIDER_MIN,
                    max: SLIDER_MAX,
                    step: SLIDER_STEP,
                    marks: slider_marks(),
                    value: [payload.low, payload.high],
                }),
                Component::Break,
                Component::Graph { id: SCATTER_CHART_ID.to_string() },
            ],
        }
    }

    pub fn dropdown(&self) -> Option<&Dropdown> {
        self.components.iter().find_map(|c| match c {
            Component::Dropdown(d) => Some(d),
            _ => None,
        })
    }

    pub fn range_slider(&self) -> Option<&RangeSlider> {
        self.components.iter().find_map(|c| match c {
            Component::RangeSlider(s) => Some(s),
            _ => None,
        })
    }
}
