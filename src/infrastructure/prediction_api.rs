// Prediction API client implementation
use crate::application::telemetry_source::{FetchError, TelemetrySource};
use crate::domain::location::Coordinates;
use crate::infrastructure::config::{prepare_path, ApiSettings};
use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct PredictionApiClient {
    client: reqwest::Client,
    base_url: String,
    weather_path: String,
    sensors_path: String,
    predict_path: String,
    series_path: String,
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    latitude: f64,
    longitude: f64,
}

impl PredictionApiClient {
    pub fn new(settings: &ApiSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            weather_path: settings.weather_path.clone(),
            sensors_path: settings.sensors_path.clone(),
            predict_path: settings.predict_path.clone(),
            series_path: settings.series_path.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn weather_url(&self, coordinates: Coordinates) -> String {
        let mut vars = HashMap::new();
        vars.insert("latitude", coordinates.latitude.to_string());
        vars.insert("longitude", coordinates.longitude.to_string());
        self.url(&prepare_path(&self.weather_path, &vars))
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Value, FetchError> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("API request failed with status {}: {}", status, body);
            return Err(FetchError::Status(status.as_u16()));
        }

        response.json::<Value>().await.map_err(transport_error)
    }
}

fn transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_decode() {
        FetchError::Decode(e.to_string())
    } else {
        FetchError::Network(e.to_string())
    }
}

#[async_trait]
impl TelemetrySource for PredictionApiClient {
    async fn weather(&self, coordinates: Coordinates) -> Result<Value, FetchError> {
        let url = self.weather_url(coordinates);
        tracing::debug!("GET {}", url);
        self.execute(self.client.get(&url)).await
    }

    async fn sensors(&self) -> Result<Value, FetchError> {
        self.execute(self.client.get(self.url(&self.sensors_path))).await
    }

    async fn prediction(&self, coordinates: Coordinates) -> Result<Value, FetchError> {
        let body = PredictRequest {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        };
        self.execute(self.client.post(self.url(&self.predict_path)).json(&body))
            .await
    }

    async fn vibration_history(&self) -> Result<Value, FetchError> {
        self.execute(self.client.get(self.url(&self.series_path))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn client_for(server: &mockito::ServerGuard) -> PredictionApiClient {
        PredictionApiClient::new(&ApiSettings {
            base_url: format!("{}/", server.url()),
            timeout_secs: 2,
            ..ApiSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_weather_url() {
        let client = PredictionApiClient::new(&ApiSettings {
            base_url: "http://localhost:8000/".to_string(),
            ..ApiSettings::default()
        })
        .unwrap();
        assert_eq!(
            client.weather_url(Coordinates::new(23.0, 86.5)),
            "http://localhost:8000/weather/23/86.5"
        );
    }

    #[tokio::test]
    async fn test_prediction_posts_coordinates() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/predict")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(json!({ "latitude": 23.0, "longitude": 86.5 })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"risk_level": "Low"}"#)
            .create_async()
            .await;

        let data = client_for(&server)
            .prediction(Coordinates::new(23.0, 86.5))
            .await
            .unwrap();
        assert_eq!(data, json!({ "risk_level": "Low" }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_status_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/sensors/vibration")
            .with_status(503)
            .with_body("waking up")
            .create_async()
            .await;

        let err = client_for(&server).sensors().await.unwrap_err();
        assert!(matches!(err, FetchError::Status(503)));
        assert_eq!(err.to_string(), "HTTP error! status: 503");
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/sensors/vibration")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = client_for(&server).vibration_history().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let client = PredictionApiClient::new(&ApiSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..ApiSettings::default()
        })
        .unwrap();

        let started = std::time::Instant::now();
        let err = client.sensors().await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_) | FetchError::Timeout));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
