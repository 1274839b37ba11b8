// Main entry point - Dependency injection and refresh loop setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::application::chart_renderer::ChartRenderer;
use crate::application::data_fetcher::DataFetcher;
use crate::application::refresh_scheduler::RefreshScheduler;
use crate::domain::location::Coordinates;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::prediction_api::PredictionApiClient;
use crate::presentation::input::{spawn_reader, InputEnd};
use crate::presentation::terminal_surface::{write_charts, TerminalSurface};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the dashboard owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Optional `<latitude> <longitude>` arguments pick the site; blanks or junk keep the default
    let args: Vec<String> = std::env::args().skip(1).collect();
    let site = Coordinates::parse_or(
        args.first().map(String::as_str).unwrap_or_default(),
        args.get(1).map(String::as_str).unwrap_or_default(),
        config.site.default_coordinates,
    );

    // Create API client (infrastructure layer)
    let client = Arc::new(PredictionApiClient::new(&config.api)?);

    // Create UI surface (presentation layer)
    let surface = Arc::new(TerminalSurface::new(config.chart.width, config.chart.height));
    let charts = tokio::spawn(write_charts(
        surface.chart_updates(),
        config.chart.output_path.clone().into(),
    ));

    // Create services (application layer)
    let fetcher = DataFetcher::new(client, config.fallbacks.clone());
    let scheduler = RefreshScheduler::new(
        fetcher,
        surface,
        ChartRenderer::new(config.chart.padding).with_title(config.chart.title.clone()),
        &config.refresh,
        site,
    );

    tracing::info!(
        "Starting mineguard-dashboard for site {} against {} (chart: {})",
        site,
        config.api.base_url,
        config.chart.output_path
    );
    println!("Type \"<latitude> <longitude>\" and press Enter to predict risk, or \"quit\".");

    let (tx, rx) = mpsc::channel(8);
    // Without stdin the dashboard keeps refreshing on its timer
    let input_end = spawn_reader(std::io::BufReader::new(std::io::stdin()), tx)?;

    tokio::select! {
        _ = scheduler.run(rx) => {}
        Ok(InputEnd::Quit) = input_end => {
            tracing::info!("Quit requested");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
    }

    charts.abort();
    Ok(())
}
