mod callbacks;
mod charts;
mod cli;
mod color;
mod data;
mod figure;
mod layout;
mod page;
mod server;
mod state;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use layout::{PAYLOAD_SLIDER_ID, SITE_DROPDOWN_ID};
use server::App;
use state::Dashboard;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let table = data::loader::load_file(&cli.data).inspect_err(|e| log::error!("Failed to load data: {e:#}"))?;
    log::info!(
        "Loaded {} launches from {} across sites {:?}",
        table.len(),
        cli.data.display(),
        table.sites()
    );
    if table.is_empty() {
        log::warn!("{} contains no launches, charts will be empty", cli.data.display());
    }
    match table.payload_bounds() {
        Some((lo, hi)) => log::info!("Observed payload range: [{lo}, {hi}] kg"),
        None => log::warn!("No launch carries a payload mass"),
    }

    let dashboard = Dashboard::new(table);
    if let Some(dropdown) = dashboard.layout.dropdown() {
        log::info!("Site dropdown: {} options", dropdown.options.len());
    }
    if let Some(slider) = dashboard.layout.range_slider() {
        log::info!("Payload slider starts at {:?}", slider.value);
    }
    for control in [SITE_DROPDOWN_ID, PAYLOAD_SLIDER_ID] {
        log::debug!("{control} drives {:?}", dashboard.callbacks.outputs_for(control));
    }

    let app = App::new(dashboard).context("rendering dashboard page")?;
    server::serve(&app, &cli.host, cli.port)
}
