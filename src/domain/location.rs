// Site coordinates and user input validation
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("Please enter both latitude and longitude coordinates.")]
    MissingCoordinates,
    #[error("invalid {field}: {value:?}")]
    InvalidCoordinate { field: &'static str, value: String },
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse what the user typed for a manual prediction. Blank or unusable input is
    /// rejected before anything goes over the network.
    pub fn parse_required(latitude: &str, longitude: &str) -> Result<Self, InputError> {
        let (latitude, longitude) = (latitude.trim(), longitude.trim());
        if latitude.is_empty() || longitude.is_empty() {
            return Err(InputError::MissingCoordinates);
        }

        let lat = parse_axis(latitude, 90.0).ok_or_else(|| InputError::InvalidCoordinate {
            field: "latitude",
            value: latitude.to_string(),
        })?;
        let lon = parse_axis(longitude, 180.0).ok_or_else(|| InputError::InvalidCoordinate {
            field: "longitude",
            value: longitude.to_string(),
        })?;

        Ok(Self::new(lat, lon))
    }

    /// Lenient parse: each axis falls back to `defaults` when blank or invalid.
    pub fn parse_or(latitude: &str, longitude: &str, defaults: Coordinates) -> Self {
        Self::new(
            parse_axis(latitude.trim(), 90.0).unwrap_or(defaults.latitude),
            parse_axis(longitude.trim(), 180.0).unwrap_or(defaults.longitude),
        )
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::new(45.7640, 4.8357)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

fn parse_axis(raw: &str, limit: f64) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= limit)
}
