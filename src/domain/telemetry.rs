// Telemetry reading domain models
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub wind_speed: f64,
}

impl WeatherReading {
    pub fn new(temperature: f64, humidity: f64, rainfall: f64, wind_speed: f64) -> Self {
        Self {
            temperature,
            humidity,
            rainfall,
            wind_speed,
        }
    }
}

impl Default for WeatherReading {
    fn default() -> Self {
        Self::new(28.0, 60.0, 2.0, 12.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub displacement: f64,
    pub vibration: f64,
    pub pore_pressure: f64,
}

impl SensorReading {
    pub fn new(displacement: f64, vibration: f64, pore_pressure: f64) -> Self {
        Self {
            displacement,
            vibration,
            pore_pressure,
        }
    }
}

impl Default for SensorReading {
    fn default() -> Self {
        Self::new(0.3, 1.2, 0.7)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: String,
    pub vibration: f64,
}

impl TimeSeriesPoint {
    pub fn new(timestamp: impl Into<String>, vibration: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            vibration,
        }
    }
}

/// Chronologically ordered vibration samples. Insertion order is display order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSeries {
    points: Vec<TimeSeriesPoint>,
}

impl TimeSeries {
    pub fn new(points: Vec<TimeSeriesPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest and largest vibration value, or `None` for an empty series.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        let mut values = self.points.iter().map(|p| p.vibration);
        let first = values.next()?;
        Some(values.fold((first, first), |(min, max), v| (min.min(v), max.max(v))))
    }

    /// The hourly vibration trend shown while the API has nothing better.
    pub fn offline_default() -> Self {
        let samples = [
            ("08:00", 0.8),
            ("09:00", 1.1),
            ("10:00", 0.9),
            ("11:00", 1.2),
            ("12:00", 0.7),
            ("13:00", 1.4),
            ("14:00", 1.0),
            ("15:00", 1.3),
        ];
        Self::new(
            samples
                .into_iter()
                .map(|(t, v)| TimeSeriesPoint::new(t, v))
                .collect(),
        )
    }
}
