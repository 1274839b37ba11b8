// Data fetcher - One normalized reading per dashboard domain
use crate::application::fallback::{field, resolve_number, resolve_risk, resolve_text};
use crate::application::telemetry_source::TelemetrySource;
use crate::domain::dashboard::Fetched;
use crate::domain::location::Coordinates;
use crate::domain::risk::{RiskAssessment, RiskIndicator};
use crate::domain::telemetry::{SensorReading, TimeSeries, TimeSeriesPoint, WeatherReading};
use crate::infrastructure::config::FallbackConfig;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

const RISK_ALIASES: &[&str] = &["risk", "risk_level", "prediction"];
const SERIES_ALIASES: &[&str] = &["series", "history", "time_series"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataDomain {
    Weather,
    Sensors,
    Risk,
    Series,
}

impl DataDomain {
    /// Toast shown when this domain had to use its offline reading.
    pub fn offline_notice(&self) -> &'static str {
        match self {
            DataDomain::Weather => "Using offline weather data",
            DataDomain::Sensors => "Using offline sensor data",
            DataDomain::Risk => "Using offline risk prediction",
            DataDomain::Series => "Using offline chart data",
        }
    }
}

impl fmt::Display for DataDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataDomain::Weather => write!(f, "weather"),
            DataDomain::Sensors => write!(f, "sensor"),
            DataDomain::Risk => write!(f, "risk prediction"),
            DataDomain::Series => write!(f, "time series"),
        }
    }
}

#[derive(Clone)]
pub struct DataFetcher {
    source: Arc<dyn TelemetrySource>,
    fallbacks: FallbackConfig,
}

impl DataFetcher {
    pub fn new(source: Arc<dyn TelemetrySource>, fallbacks: FallbackConfig) -> Self {
        Self { source, fallbacks }
    }

    pub async fn fetch_weather(&self, coordinates: Coordinates) -> Fetched<WeatherReading> {
        let fallback = self.fallbacks.weather;
        match self.source.weather(coordinates).await {
            Ok(data) => {
                tracing::info!("Weather data loaded for {}", coordinates);
                Fetched::live(WeatherReading::new(
                    resolve_number(&data, &["temperature"], fallback.temperature),
                    resolve_number(&data, &["humidity"], fallback.humidity),
                    resolve_number(&data, &["rain", "rainfall"], fallback.rainfall),
                    resolve_number(&data, &["wind_speed", "wind"], fallback.wind_speed),
                ))
            }
            Err(e) => {
                tracing::warn!("Error loading {} data: {}", DataDomain::Weather, e);
                Fetched::fallback(fallback)
            }
        }
    }

    pub async fn fetch_sensors(&self) -> Fetched<SensorReading> {
        let fallback = self.fallbacks.sensors;
        match self.source.sensors().await {
            Ok(data) => {
                tracing::info!("Sensor data loaded");
                Fetched::live(SensorReading::new(
                    resolve_number(&data, &["displacement"], fallback.displacement),
                    resolve_number(&data, &["vibration"], fallback.vibration),
                    resolve_number(&data, &["pore", "pore_pressure"], fallback.pore_pressure),
                ))
            }
            Err(e) => {
                tracing::warn!("Error loading {} data: {}", DataDomain::Sensors, e);
                Fetched::fallback(fallback)
            }
        }
    }

    pub async fn fetch_risk(&self, coordinates: Coordinates) -> Fetched<RiskAssessment> {
        match self.source.prediction(coordinates).await {
            Ok(data) => {
                tracing::debug!("Prediction API response: {}", data);
                let label = resolve_risk(&data, RISK_ALIASES, &self.fallbacks.risk);
                let indicator = RiskIndicator::from_label(&label);
                match &indicator {
                    RiskIndicator::Level(level) => {
                        tracing::info!("Risk prediction loaded: {}", level)
                    }
                    RiskIndicator::Unrecognized(raw) => {
                        tracing::warn!("Unrecognized risk level {:?}", raw)
                    }
                }
                Fetched::live(RiskAssessment::new(
                    indicator,
                    resolve_text(&data, &["alert"]),
                ))
            }
            Err(e) => {
                tracing::warn!("Error loading {}: {}", DataDomain::Risk, e);
                Fetched::fallback(RiskAssessment::new(
                    RiskIndicator::from_label(&self.fallbacks.risk),
                    None,
                ))
            }
        }
    }

    /// The endpoint may or may not carry a history array. Without one the offline trend
    /// is shown, but the fetch still counts as live because the API answered.
    pub async fn fetch_series(&self) -> Fetched<TimeSeries> {
        match self.source.vibration_history().await {
            Ok(data) => match parse_series(&data) {
                Some(series) => {
                    tracing::info!("Time series loaded: {} points", series.len());
                    Fetched::live(series)
                }
                None => {
                    tracing::debug!("No time series in response, using offline trend");
                    Fetched::live(self.fallbacks.series.clone())
                }
            },
            Err(e) => {
                tracing::warn!("Error loading {} data: {}", DataDomain::Series, e);
                Fetched::fallback(self.fallbacks.series.clone())
            }
        }
    }
}

/// Pull `{time|timestamp, vibration|value}` points out of the first history array found.
/// Points missing either field are skipped; an array with no usable point yields `None`.
fn parse_series(data: &Value) -> Option<TimeSeries> {
    let samples = match data {
        Value::Array(items) => items,
        other => field(other, SERIES_ALIASES)?.as_array()?,
    };

    let points: Vec<TimeSeriesPoint> = samples
        .iter()
        .filter_map(|sample| {
            let timestamp = match field(sample, &["time", "timestamp"])? {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let vibration = resolve_number(sample, &["vibration", "value"], f64::NAN);
            (!vibration.is_nan()).then(|| TimeSeriesPoint::new(timestamp, vibration))
        })
        .collect();

    let series = TimeSeries::new(points);
    (!series.is_empty()).then_some(series)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::application::telemetry_source::FetchError;
    use crate::domain::risk::RiskLevel;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned payloads per domain; `None` simulates a transport failure.
    #[derive(Default)]
    pub(crate) struct StubSource {
        pub weather: Option<Value>,
        pub sensors: Option<Value>,
        pub prediction: Option<Value>,
        pub history: Option<Value>,
        pub calls: AtomicUsize,
        pub coordinates_seen: Mutex<Vec<Coordinates>>,
    }

    impl StubSource {
        pub(crate) fn failing() -> Self {
            Self::default()
        }

        fn answer(&self, payload: &Option<Value>) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            payload.clone().ok_or(FetchError::Status(503))
        }
    }

    #[async_trait]
    impl TelemetrySource for StubSource {
        async fn weather(&self, coordinates: Coordinates) -> Result<Value, FetchError> {
            self.coordinates_seen.lock().unwrap().push(coordinates);
            self.answer(&self.weather)
        }

        async fn sensors(&self) -> Result<Value, FetchError> {
            self.answer(&self.sensors)
        }

        async fn prediction(&self, coordinates: Coordinates) -> Result<Value, FetchError> {
            self.coordinates_seen.lock().unwrap().push(coordinates);
            self.answer(&self.prediction)
        }

        async fn vibration_history(&self) -> Result<Value, FetchError> {
            self.answer(&self.history)
        }
    }

    fn fetcher(source: StubSource) -> DataFetcher {
        DataFetcher::new(Arc::new(source), FallbackConfig::default())
    }

    #[tokio::test]
    async fn test_transport_failure_uses_full_fallbacks() {
        let fetcher = fetcher(StubSource::failing());
        let coords = Coordinates::default();

        let weather = fetcher.fetch_weather(coords).await;
        assert!(weather.is_degraded());
        assert_eq!(weather.reading, WeatherReading::new(28.0, 60.0, 2.0, 12.0));

        let sensors = fetcher.fetch_sensors().await;
        assert!(sensors.is_degraded());
        assert_eq!(sensors.reading, SensorReading::new(0.3, 1.2, 0.7));

        let risk = fetcher.fetch_risk(coords).await;
        assert!(risk.is_degraded());
        assert_eq!(risk.reading.level(), Some(RiskLevel::Medium));
        assert_eq!(risk.reading.alert, None);

        let series = fetcher.fetch_series().await;
        assert!(series.is_degraded());
        assert_eq!(series.reading, TimeSeries::offline_default());
    }

    #[tokio::test]
    async fn test_weather_partial_payload() {
        let fetcher = fetcher(StubSource {
            weather: Some(json!({ "temperature": 31, "humidity": 55 })),
            ..Default::default()
        });

        let weather = fetcher.fetch_weather(Coordinates::default()).await;
        assert!(!weather.is_degraded());
        assert_eq!(weather.reading, WeatherReading::new(31.0, 55.0, 2.0, 12.0));
    }

    #[tokio::test]
    async fn test_weather_aliases() {
        let fetcher = fetcher(StubSource {
            weather: Some(json!({ "temperature": 0, "humidity": 40, "rainfall": 7.5, "wind": 3 })),
            ..Default::default()
        });

        let weather = fetcher.fetch_weather(Coordinates::default()).await;
        assert_eq!(weather.reading, WeatherReading::new(0.0, 40.0, 7.5, 3.0));
    }

    #[tokio::test]
    async fn test_sensor_pore_alias() {
        let fetcher = fetcher(StubSource {
            sensors: Some(json!({ "displacement": 0, "vibration": 2.2, "pore_pressure": 0.9 })),
            ..Default::default()
        });

        let sensors = fetcher.fetch_sensors().await;
        assert_eq!(sensors.reading, SensorReading::new(0.0, 2.2, 0.9));
    }

    #[tokio::test]
    async fn test_risk_nested_and_alert() {
        let fetcher = fetcher(StubSource {
            prediction: Some(json!({
                "prediction": { "risk": "HIGH", "confidence": 0.91 },
                "alert": "Slope movement detected"
            })),
            ..Default::default()
        });

        let risk = fetcher.fetch_risk(Coordinates::default()).await;
        assert!(!risk.is_degraded());
        assert_eq!(risk.reading.level(), Some(RiskLevel::High));
        assert_eq!(risk.reading.alert.as_deref(), Some("Slope movement detected"));
    }

    #[tokio::test]
    async fn test_risk_unrecognized_is_not_degraded() {
        let fetcher = fetcher(StubSource {
            prediction: Some(json!({ "risk_level": "Extreme" })),
            ..Default::default()
        });

        let risk = fetcher.fetch_risk(Coordinates::default()).await;
        assert!(!risk.is_degraded());
        assert_eq!(
            risk.reading.indicator,
            RiskIndicator::Unrecognized("extreme".to_string())
        );
    }

    #[tokio::test]
    async fn test_series_from_payload() {
        let fetcher = fetcher(StubSource {
            history: Some(json!({
                "vibration": 1.0,
                "history": [
                    { "time": "08:00", "vibration": 0.8 },
                    { "timestamp": "09:00", "value": "1.1" },
                    { "time": "10:00" }
                ]
            })),
            ..Default::default()
        });

        let series = fetcher.fetch_series().await;
        assert!(!series.is_degraded());
        assert_eq!(
            series.reading,
            TimeSeries::new(vec![
                TimeSeriesPoint::new("08:00", 0.8),
                TimeSeriesPoint::new("09:00", 1.1),
            ])
        );
    }

    #[tokio::test]
    async fn test_series_without_history_uses_offline_trend() {
        let fetcher = fetcher(StubSource {
            history: Some(json!({ "vibration": 1.0 })),
            ..Default::default()
        });

        let series = fetcher.fetch_series().await;
        assert!(!series.is_degraded());
        assert_eq!(series.reading, TimeSeries::offline_default());
    }

    #[test]
    fn test_parse_series_bare_array() {
        let data = json!([{ "time": "08:00", "vibration": 0 }]);
        let series = parse_series(&data).unwrap();
        assert_eq!(series.points()[0].vibration, 0.0);
        assert_eq!(parse_series(&json!({ "series": [] })), None);
    }
}
