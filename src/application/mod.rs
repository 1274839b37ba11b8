// Application layer - Ports and refresh use cases
pub mod chart_renderer;
pub mod data_fetcher;
pub mod drawing;
pub mod fallback;
pub mod refresh_scheduler;
pub mod telemetry_source;
pub mod ui_surface;
