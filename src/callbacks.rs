use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::charts::{ChartColors, payload_outcome_scatter, site_outcome_pie};
use crate::data::filter::{PayloadRange, SiteSelection};
use crate::data::model::LaunchTable;
use crate::figure::Figure;
use crate::layout::{PAYLOAD_SLIDER_ID, PIE_CHART_ID, SCATTER_CHART_ID, SITE_DROPDOWN_ID};

#[derive(Debug, Error, PartialEq)]
pub enum CallbackError {
    #[error("no callback registered for output '{0}'")]
    UnknownOutput(String),
    #[error("callback for '{output}' is missing input '{input}'")]
    MissingInput { output: String, input: String },
    #[error("input '{input}' must be {expected}")]
    WrongInputType { input: String, expected: &'static str },
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Current value of one control as posted by the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    Text(String),
    Range([f64; 2]),
}

/// Control id → current value.
pub type CallbackInputs = HashMap<String, ControlValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub output: String,
    #[serde(default)]
    pub inputs: CallbackInputs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateResponse {
    pub output: String,
    pub figure: Figure,
}

/// One `(output, inputs)` pair as advertised to the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dependency {
    pub output: &'static str,
    pub inputs: Vec<&'static str>,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// What a handler may read: the shared table and its fixed colours.
pub struct HandlerContext<'a> {
    pub table: &'a LaunchTable,
    pub colors: &'a ChartColors,
}

pub type Handler = fn(&HandlerContext<'_>, &Args<'_>) -> Result<Figure, CallbackError>;

/// Typed access to the inputs of a single invocation.
pub struct Args<'a> {
    output: &'a str,
    inputs: &'a CallbackInputs,
}

impl Args<'_> {
    fn get(&self, input: &str) -> Result<&ControlValue, CallbackError> {
        self.inputs.get(input).ok_or_else(|| CallbackError::MissingInput {
            output: self.output.to_string(),
            input: input.to_string(),
        })
    }

    pub fn site(&self, input: &str) -> Result<SiteSelection, CallbackError> {
        match self.get(input)? {
            ControlValue::Text(value) => Ok(SiteSelection::from_value(value)),
            ControlValue::Range(_) => Err(CallbackError::WrongInputType {
                input: input.to_string(),
                expected: "a site name",
            }),
        }
    }

    pub fn payload(&self, input: &str) -> Result<PayloadRange, CallbackError> {
        match self.get(input)? {
            ControlValue::Range([low, high]) => Ok(PayloadRange::new(*low, *high)),
            ControlValue::Text(_) => Err(CallbackError::WrongInputType {
                input: input.to_string(),
                expected: "a [low, high] pair",
            }),
        }
    }
}

struct Callback {
    output: &'static str,
    inputs: Vec<&'static str>,
    handler: Handler,
}

/// Binds outputs to the controls they read. A control change re-runs every
/// callback that lists it as an input.
#[derive(Default)]
pub struct CallbackRegistry {
    callbacks: Vec<Callback>,
}

impl CallbackRegistry {
    pub fn register(&mut self, output: &'static str, inputs: &[&'static str], handler: Handler) {
        self.callbacks.push(Callback {
            output,
            inputs: inputs.to_vec(),
            handler,
        });
    }

    pub fn dependencies(&self) -> Vec<Dependency> {
        self.callbacks
            .iter()
            .map(|cb| Dependency {
                output: cb.output,
                inputs: cb.inputs.clone(),
            })
            .collect()
    }

    /// Outputs that must refresh when `input` changes, in registration order.
    pub fn outputs_for(&self, input: &str) -> Vec<&'static str> {
        self.callbacks
            .iter()
            .filter(|cb| cb.inputs.iter().any(|i| *i == input))
            .map(|cb| cb.output)
            .collect()
    }

    /// Run the callback registered for `request.output`.
    pub fn dispatch(
        &self,
        ctx: &HandlerContext<'_>,
        request: &UpdateRequest,
    ) -> Result<UpdateResponse, CallbackError> {
        let callback = self
            .callbacks
            .iter()
            .find(|cb| cb.output == request.output)
            .ok_or_else(|| CallbackError::UnknownOutput(request.output.clone()))?;

        let args = Args {
            output: callback.output,
            inputs: &request.inputs,
        };
        let figure = (callback.handler)(ctx, &args)?;
        log::debug!(
            "callback {} -> {:?}: {} slices, {} points",
            callback.output,
            figure.title(),
            figure.slices().len(),
            figure.points().len()
        );

        Ok(UpdateResponse {
            output: callback.output.to_string(),
            figure,
        })
    }
}

// ---------------------------------------------------------------------------
// Dashboard callbacks
// ---------------------------------------------------------------------------

fn update_pie_chart(ctx: &HandlerContext<'_>, args: &Args<'_>) -> Result<Figure, CallbackError> {
    let site = args.site(SITE_DROPDOWN_ID)?;
    Ok(site_outcome_pie(ctx.table, ctx.colors, &site))
}

fn update_scatter_chart(ctx: &HandlerContext<'_>, args: &Args<'_>) -> Result<Figure, CallbackError> {
    let site = args.site(SITE_DROPDOWN_ID)?;
    let payload = args.payload(PAYLOAD_SLIDER_ID)?;
    Ok(payload_outcome_scatter(ctx.table, ctx.colors, &site, payload))
}

/// The two chart callbacks of the launch dashboard.
pub fn dashboard_callbacks() -> CallbackRegistry {
    let mut registry = CallbackRegistry::default();
    registry.register(PIE_CHART_ID, &[SITE_DROPDOWN_ID], update_pie_chart);
    registry.register(
        SCATTER_CHART_ID,
        &[SITE_DROPDOWN_ID, PAYLOAD_SLIDER_ID],
        update_scatter_chart,
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{LaunchRecord, Outcome};

    fn table() -> LaunchTable {
        LaunchTable::from_records(vec![
            LaunchRecord::new("SiteA", 500.0, Outcome::Success, "v1.0"),
            LaunchRecord::new("SiteA", 2000.0, Outcome::Failure, "FT"),
            LaunchRecord::new("SiteB", 1500.0, Outcome::Success, "FT"),
        ])
    }

    fn request(body: &str) -> UpdateRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn dropdown_refreshes_both_charts_slider_only_scatter() {
        let registry = dashboard_callbacks();
        assert_eq!(registry.outputs_for(SITE_DROPDOWN_ID), vec![PIE_CHART_ID, SCATTER_CHART_ID]);
        assert_eq!(registry.outputs_for(PAYLOAD_SLIDER_ID), vec![SCATTER_CHART_ID]);
        assert!(registry.outputs_for("unknown").is_empty());
        assert_eq!(registry.dependencies().len(), 2);
    }

    #[test]
    fn dispatch_routes_to_pie() {
        let table = table();
        let colors = ChartColors::for_table(&table);
        let ctx = HandlerContext { table: &table, colors: &colors };
        let registry = dashboard_callbacks();

        let resp = registry
            .dispatch(
                &ctx,
                &request(r#"{"output": "success-pie-chart", "inputs": {"site-dropdown": "All Sites"}}"#),
            )
            .unwrap();
        assert_eq!(resp.output, PIE_CHART_ID);
        assert_eq!(resp.figure.slices(), vec![("SiteA", 1), ("SiteB", 1)]);
    }

    #[test]
    fn dispatch_routes_to_scatter() {
        let table = table();
        let colors = ChartColors::for_table(&table);
        let ctx = HandlerContext { table: &table, colors: &colors };
        let registry = dashboard_callbacks();

        let resp = registry
            .dispatch(
                &ctx,
                &request(
                    r#"{"output": "success-payload-scatter-chart",
                        "inputs": {"site-dropdown": "SiteA", "payload_slider": [0, 10000]}}"#,
                ),
            )
            .unwrap();
        assert_eq!(resp.figure.points().len(), 2);
    }

    #[test]
    fn dispatch_reports_bad_requests() {
        let table = table();
        let colors = ChartColors::for_table(&table);
        let ctx = HandlerContext { table: &table, colors: &colors };
        let registry = dashboard_callbacks();

        let err = registry
            .dispatch(&ctx, &request(r#"{"output": "nope", "inputs": {}}"#))
            .unwrap_err();
        assert_eq!(err, CallbackError::UnknownOutput("nope".into()));

        let err = registry
            .dispatch(
                &ctx,
                &request(r#"{"output": "success-payload-scatter-chart", "inputs": {"site-dropdown": "SiteA"}}"#),
            )
            .unwrap_err();
        assert_eq!(
            err,
            CallbackError::MissingInput {
                output: SCATTER_CHART_ID.into(),
                input: PAYLOAD_SLIDER_ID.into()
            }
        );

        let err = registry
            .dispatch(
                &ctx,
                &request(r#"{"output": "success-pie-chart", "inputs": {"site-dropdown": [1, 2]}}"#),
            )
            .unwrap_err();
        assert!(matches!(err, CallbackError::WrongInputType { .. }));
    }
}
