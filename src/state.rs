use std::sync::Arc;

use crate::callbacks::{
    CallbackError, CallbackRegistry, Dependency, HandlerContext, UpdateRequest, UpdateResponse,
    dashboard_callbacks,
};
use crate::charts::ChartColors;
use crate::data::model::LaunchTable;
use crate::layout::Layout;

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// Everything the server needs, built once at startup and read-only after.
pub struct Dashboard {
    /// Loaded launch table.
    pub table: Arc<LaunchTable>,

    /// Colour assignments shared by every rendering.
    pub colors: ChartColors,

    /// Static page declaration.
    pub layout: Layout,

    /// Output → handler bindings.
    pub callbacks: CallbackRegistry,
}

impl Dashboard {
    /// Ingest a loaded table: derive colours, layout and callbacks.
    pub fn new(table: LaunchTable) -> Self {
        let colors = ChartColors::for_table(&table);
        let layout = Layout::build(&table);
        Dashboard {
            table: Arc::new(table),
            colors,
            layout,
            callbacks: dashboard_callbacks(),
        }
    }

    pub fn dependencies(&self) -> Vec<Dependency> {
        self.callbacks.dependencies()
    }

    /// Run the callback for one output with the posted control values.
    pub fn update(&self, request: &UpdateRequest) -> Result<UpdateResponse, CallbackError> {
        let ctx = HandlerContext {
            table: &self.table,
            colors: &self.colors,
        };
        self.callbacks.dispatch(&ctx, request)
    }
}
