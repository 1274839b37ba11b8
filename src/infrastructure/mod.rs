// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod prediction_api;
pub mod svg_surface;
