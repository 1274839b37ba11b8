// Dashboard snapshot produced by one refresh cycle
use super::location::Coordinates;
use super::risk::RiskAssessment;
use super::telemetry::{SensorReading, TimeSeries, WeatherReading};
use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Live,
    Fallback,
}

/// A reading together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub reading: T,
    pub origin: DataOrigin,
}

impl<T> Fetched<T> {
    pub fn live(reading: T) -> Self {
        Self {
            reading,
            origin: DataOrigin::Live,
        }
    }

    pub fn fallback(reading: T) -> Self {
        Self {
            reading,
            origin: DataOrigin::Fallback,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.origin == DataOrigin::Fallback
    }
}

#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub generation: u64,
    pub coordinates: Coordinates,
    pub weather: Fetched<WeatherReading>,
    pub sensors: Fetched<SensorReading>,
    pub risk: Fetched<RiskAssessment>,
    pub series: Fetched<TimeSeries>,
    pub completed_at: DateTime<Local>,
}

impl DashboardSnapshot {
    pub fn degraded_domains(&self) -> usize {
        [
            self.weather.is_degraded(),
            self.sensors.is_degraded(),
            self.risk.is_degraded(),
            self.series.is_degraded(),
        ]
        .into_iter()
        .filter(|d| *d)
        .count()
    }
}
