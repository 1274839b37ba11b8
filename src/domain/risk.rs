// Risk assessment domain model
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Case-insensitive match on the three known level names.
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_label(raw).as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Either a recognized level or whatever normalized text the API sent instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskIndicator {
    Level(RiskLevel),
    Unrecognized(String),
}

impl RiskIndicator {
    pub fn from_label(raw: &str) -> Self {
        match RiskLevel::parse(raw) {
            Some(level) => RiskIndicator::Level(level),
            None => RiskIndicator::Unrecognized(normalize_label(raw)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskAssessment {
    pub indicator: RiskIndicator,
    pub alert: Option<String>,
}

impl RiskAssessment {
    pub fn new(indicator: RiskIndicator, alert: Option<String>) -> Self {
        Self { indicator, alert }
    }

    pub fn level(&self) -> Option<RiskLevel> {
        match self.indicator {
            RiskIndicator::Level(level) => Some(level),
            RiskIndicator::Unrecognized(_) => None,
        }
    }

    /// Visual state for the risk label and bar.
    pub fn display(&self) -> RiskDisplay {
        match &self.indicator {
            RiskIndicator::Level(RiskLevel::Low) => RiskDisplay {
                label: "Low".to_string(),
                bar_width_percent: 30,
                bar_color: "green",
            },
            RiskIndicator::Level(RiskLevel::Medium) => RiskDisplay {
                label: "Medium".to_string(),
                bar_width_percent: 60,
                bar_color: "amber",
            },
            RiskIndicator::Level(RiskLevel::High) => RiskDisplay {
                label: "High".to_string(),
                bar_width_percent: 90,
                bar_color: "red",
            },
            RiskIndicator::Unrecognized(raw) => RiskDisplay {
                label: capitalize(raw),
                bar_width_percent: 0,
                bar_color: "gray",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskDisplay {
    pub label: String,
    pub bar_width_percent: u8,
    pub bar_color: &'static str,
}

/// Lowercase and trim. Applying it twice changes nothing.
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
