use crate::domain::location::Coordinates;
use crate::domain::telemetry::{SensorReading, TimeSeries, WeatherReading};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub refresh: RefreshSettings,
    #[serde(default)]
    pub chart: ChartSettings,
    #[serde(default)]
    pub site: SiteSettings,
    #[serde(default)]
    pub fallbacks: FallbackConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub weather_path: String,
    pub sensors_path: String,
    pub predict_path: String,
    pub series_path: String,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://mineguard-backend-1.onrender.com".to_string(),
            timeout_secs: 10,
            weather_path: "/weather/${latitude}/${longitude}".to_string(),
            sensors_path: "/sensors/vibration".to_string(),
            predict_path: "/predict".to_string(),
            series_path: "/sensors/vibration".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RefreshSettings {
    pub interval_secs: u64,
    pub refresh_on_start: bool,
}

impl RefreshSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            refresh_on_start: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChartSettings {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub title: String,
    pub output_path: String,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 300.0,
            padding: 40.0,
            title: "Vibration Trend (Hz)".to_string(),
            output_path: "vibration_chart.svg".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SiteSettings {
    pub default_coordinates: Coordinates,
}

/// Offline readings shown whenever a domain cannot be fetched.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FallbackConfig {
    pub weather: WeatherReading,
    pub sensors: SensorReading,
    pub risk: String,
    pub series: TimeSeries,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            weather: WeatherReading::default(),
            sensors: SensorReading::default(),
            risk: "Medium".to_string(),
            series: TimeSeries::offline_default(),
        }
    }
}

/// `config/dashboard.{toml,...}` if present, then `MINEGUARD__SECTION__KEY` variables.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("MINEGUARD")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace `${name}` placeholders in an endpoint template, URL-encoding each value
pub fn prepare_path(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, &urlencoding::encode(value));
    }
    result
}
