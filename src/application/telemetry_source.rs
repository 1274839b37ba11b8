// Port for raw telemetry payloads from the prediction API
use crate::domain::location::Coordinates;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Transport-level failure. Callers never see these directly; a failed domain falls back
/// to its offline reading instead.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Current weather at the site
    async fn weather(&self, coordinates: Coordinates) -> Result<Value, FetchError>;

    /// Latest ground sensor readings
    async fn sensors(&self) -> Result<Value, FetchError>;

    /// Risk prediction for the site
    async fn prediction(&self, coordinates: Coordinates) -> Result<Value, FetchError>;

    /// Recent vibration history for the trend chart
    async fn vibration_history(&self) -> Result<Value, FetchError>;
}
