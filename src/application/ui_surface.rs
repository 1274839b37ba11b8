// Port for the display the dashboard writes into
use crate::application::drawing::DrawingSurface;
use crate::domain::risk::RiskDisplay;
use std::fmt;
use std::time::Duration;

/// How long a toast stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DisplaySlot {
    Temperature,
    Humidity,
    Rainfall,
    WindSpeed,
    Displacement,
    Vibration,
    PorePressure,
    RiskAlert,
    LastUpdated,
    Coordinates,
}

impl DisplaySlot {
    pub fn title(&self) -> &'static str {
        match self {
            DisplaySlot::Temperature => "Temperature",
            DisplaySlot::Humidity => "Humidity",
            DisplaySlot::Rainfall => "Rainfall",
            DisplaySlot::WindSpeed => "Wind Speed",
            DisplaySlot::Displacement => "Displacement",
            DisplaySlot::Vibration => "Vibration",
            DisplaySlot::PorePressure => "Pore Pressure",
            DisplaySlot::RiskAlert => "Alert",
            DisplaySlot::LastUpdated => "Last Updated",
            DisplaySlot::Coordinates => "Coordinates",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationLevel::Info => write!(f, "INFO"),
            NotificationLevel::Success => write!(f, "SUCCESS"),
            NotificationLevel::Warning => write!(f, "WARN"),
            NotificationLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Everything the refresh pipeline is allowed to touch on screen.
///
/// Implementations own their interior mutability; the scheduler only ever calls these from
/// one apply step at a time.
pub trait UiSurface: Send + Sync {
    fn set_slot(&self, slot: DisplaySlot, text: &str);

    fn set_risk(&self, display: &RiskDisplay);

    /// Show a transient toast that dismisses itself after [`NOTIFICATION_TTL`].
    fn notify(&self, level: NotificationLevel, message: &str);

    /// Busy indicator on the predict control ("Predicting...").
    fn set_busy(&self, busy: bool);

    /// Hand the chart canvas to `draw`.
    fn with_chart_surface(&self, draw: &mut dyn FnMut(&mut dyn DrawingSurface));
}
