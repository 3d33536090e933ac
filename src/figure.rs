use serde::Serialize;

// ---------------------------------------------------------------------------
// Figure – a chart description in Plotly.js JSON shape
// ---------------------------------------------------------------------------

/// One rendering of a chart: traces plus layout. Rebuilt on every control
/// change and handed to `Plotly.react` on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: FigureLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Pie(PieTrace),
    Scatter(ScatterTrace),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
    pub marker: PieMarker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieMarker {
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    /// Legend entry, the colour group's label.
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<u8>,
    pub mode: &'static str,
    pub marker: ScatterMarker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterMarker {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureLayout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    pub legend: Legend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: Title,
}

impl Figure {
    /// A pie chart with one slice per `(label, value, colour)`.
    pub fn pie(title: impl Into<String>, slices: Vec<(String, usize, String)>) -> Self {
        let mut labels = Vec::with_capacity(slices.len());
        let mut values = Vec::with_capacity(slices.len());
        let mut colors = Vec::with_capacity(slices.len());
        for (label, value, color) in slices {
            labels.push(label);
            values.push(value);
            colors.push(color);
        }
        Figure {
            data: vec![Trace::Pie(PieTrace {
                labels,
                values,
                marker: PieMarker { colors },
            })],
            layout: FigureLayout {
                title: Title::new(title),
                xaxis: None,
                yaxis: None,
                legend: Legend { title: Title::new("") },
            },
        }
    }

    /// A scatter chart from pre-grouped traces.
    pub fn scatter(
        title: impl Into<String>,
        x_title: &str,
        y_title: &str,
        legend_title: &str,
        traces: Vec<ScatterTrace>,
    ) -> Self {
        Figure {
            data: traces.into_iter().map(Trace::Scatter).collect(),
            layout: FigureLayout {
                title: Title::new(title),
                xaxis: Some(Axis { title: Title::new(x_title) }),
                yaxis: Some(Axis { title: Title::new(y_title) }),
                legend: Legend { title: Title::new(legend_title) },
            },
        }
    }

    pub fn title(&self) -> &str {
        &self.layout.title.text
    }

    /// Pie slices as `(label, value)`, empty for non-pie figures.
    pub fn slices(&self) -> Vec<(&str, usize)> {
        self.data
            .iter()
            .filter_map(|t| match t {
                Trace::Pie(pie) => Some(pie),
                Trace::Scatter(_) => None,
            })
            .flat_map(|pie| pie.labels.iter().map(String::as_str).zip(pie.values.iter().copied()))
            .collect()
    }

    /// Scatter points as `(x, y)` across all traces.
    pub fn points(&self) -> Vec<(f64, u8)> {
        self.data
            .iter()
            .filter_map(|t| match t {
                Trace::Scatter(s) => Some(s),
                Trace::Pie(_) => None,
            })
            .flat_map(|s| s.x.iter().copied().zip(s.y.iter().copied()))
            .collect()
    }
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Title { text: text.into() }
    }
}
