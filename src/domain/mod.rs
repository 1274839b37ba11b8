// Domain layer - Readings, risk, coordinates and chart scaling
pub mod dashboard;
pub mod location;
pub mod risk;
pub mod scale;
pub mod telemetry;
