// Refresh scheduler - Manual and timed refresh cycles across all domains
use crate::application::chart_renderer::ChartRenderer;
use crate::application::data_fetcher::{DataDomain, DataFetcher};
use crate::application::drawing::DrawingSurface;
use crate::application::ui_surface::{DisplaySlot, NotificationLevel, UiSurface};
use crate::domain::dashboard::DashboardSnapshot;
use crate::domain::location::{Coordinates, InputError};
use crate::domain::risk::RiskLevel;
use crate::infrastructure::config::RefreshSettings;
use chrono::Local;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

/// Raw coordinate text submitted with the predict control.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualTrigger {
    pub latitude: String,
    pub longitude: String,
}

impl ManualTrigger {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }
}

#[derive(Default)]
struct CycleState {
    /// Last generation handed out
    started: AtomicU64,
    /// Newest generation whose results reached the surface
    applied: AtomicU64,
    busy: AtomicUsize,
    coordinates: Mutex<Option<Coordinates>>,
    apply_lock: tokio::sync::Mutex<()>,
}

#[derive(Clone)]
pub struct RefreshScheduler {
    fetcher: DataFetcher,
    surface: Arc<dyn UiSurface>,
    renderer: ChartRenderer,
    interval: Duration,
    refresh_on_start: bool,
    default_coordinates: Coordinates,
    state: Arc<CycleState>,
}

impl RefreshScheduler {
    pub fn new(
        fetcher: DataFetcher,
        surface: Arc<dyn UiSurface>,
        renderer: ChartRenderer,
        settings: &RefreshSettings,
        default_coordinates: Coordinates,
    ) -> Self {
        Self {
            fetcher,
            surface,
            renderer,
            interval: settings.interval(),
            refresh_on_start: settings.refresh_on_start,
            default_coordinates,
            state: Arc::new(CycleState::default()),
        }
    }

    /// Coordinates used by timed refreshes: the last ones submitted, else the site default.
    pub fn coordinates(&self) -> Coordinates {
        self.state
            .coordinates
            .lock()
            .map(|c| c.unwrap_or(self.default_coordinates))
            .unwrap_or(self.default_coordinates)
    }

    /// Timer path. Always runs, regardless of any manual refresh in flight.
    pub async fn refresh(&self) -> Option<DashboardSnapshot> {
        self.run_cycle(self.coordinates()).await
    }

    /// Predict control path. Input is validated before any request goes out, and the busy
    /// indicator is held for the whole cycle.
    pub async fn manual_refresh(
        &self,
        trigger: &ManualTrigger,
    ) -> Result<Option<DashboardSnapshot>, InputError> {
        let coordinates = match Coordinates::parse_required(&trigger.latitude, &trigger.longitude)
        {
            Ok(coordinates) => coordinates,
            Err(e) => {
                tracing::warn!("Rejected manual refresh: {}", e);
                self.surface.notify(NotificationLevel::Error, &e.to_string());
                return Err(e);
            }
        };

        if let Ok(mut current) = self.state.coordinates.lock() {
            *current = Some(coordinates);
        }
        self.surface
            .set_slot(DisplaySlot::Coordinates, &coordinates.to_string());

        let snapshot = {
            let _busy = BusyGuard::acquire(&self.state, self.surface.as_ref());
            self.run_cycle(coordinates).await
        };

        match &snapshot {
            Some(_) => self.surface.notify(
                NotificationLevel::Success,
                "Risk prediction updated successfully!",
            ),
            None => self.surface.notify(
                NotificationLevel::Info,
                "A newer refresh is already on screen",
            ),
        }
        Ok(snapshot)
    }

    /// Drive refreshes until the task is dropped: once at start (if enabled), on every
    /// interval tick, and on every manual trigger. A closed trigger channel only stops
    /// manual refreshes; the timer keeps going.
    pub async fn run(self, mut triggers: mpsc::Receiver<ManualTrigger>) {
        if self.refresh_on_start {
            self.spawn_refresh();
        }

        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut triggers_open = true;

        tracing::info!("Auto-refresh every {:?}", self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::debug!("Timed refresh");
                    self.spawn_refresh();
                }
                trigger = triggers.recv(), if triggers_open => match trigger {
                    Some(trigger) => {
                        let scheduler = self.clone();
                        tokio::spawn(async move {
                            let _ = scheduler.manual_refresh(&trigger).await;
                        });
                    }
                    None => {
                        tracing::info!("Manual trigger input closed");
                        triggers_open = false;
                    }
                },
            }
        }
    }

    fn spawn_refresh(&self) {
        let scheduler = self.clone();
        tokio::spawn(async move {
            scheduler.refresh().await;
        });
    }

    async fn run_cycle(&self, coordinates: Coordinates) -> Option<DashboardSnapshot> {
        let generation = self.state.started.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("Refresh cycle {} for {}", generation, coordinates);

        let weather = self.fetcher.fetch_weather(coordinates).await;
        if self.is_superseded(generation) {
            return None;
        }
        let sensors = self.fetcher.fetch_sensors().await;
        if self.is_superseded(generation) {
            return None;
        }
        let risk = self.fetcher.fetch_risk(coordinates).await;
        if self.is_superseded(generation) {
            return None;
        }
        let series = self.fetcher.fetch_series().await;

        let _apply = self.state.apply_lock.lock().await;
        if self.is_superseded(generation) {
            return None;
        }

        let snapshot = DashboardSnapshot {
            generation,
            coordinates,
            weather,
            sensors,
            risk,
            series,
            completed_at: Local::now(),
        };
        self.apply(&snapshot);
        self.state.applied.store(generation, Ordering::SeqCst);

        tracing::info!(
            "Refresh cycle {} applied for {} ({} degraded domains)",
            snapshot.generation,
            snapshot.coordinates,
            snapshot.degraded_domains()
        );
        Some(snapshot)
    }

    /// A newer cycle already reached the screen; this one's data is stale.
    fn is_superseded(&self, generation: u64) -> bool {
        let superseded = self.state.applied.load(Ordering::SeqCst) > generation;
        if superseded {
            tracing::debug!("Discarding superseded refresh cycle {}", generation);
        }
        superseded
    }

    fn apply(&self, snapshot: &DashboardSnapshot) {
        let surface = self.surface.as_ref();

        let weather = &snapshot.weather.reading;
        surface.set_slot(DisplaySlot::Temperature, &format!("{}°C", weather.temperature));
        surface.set_slot(DisplaySlot::Humidity, &format!("{}%", weather.humidity));
        surface.set_slot(DisplaySlot::Rainfall, &format!("{}mm", weather.rainfall));
        surface.set_slot(DisplaySlot::WindSpeed, &format!("{} km/h", weather.wind_speed));

        let sensors = &snapshot.sensors.reading;
        surface.set_slot(DisplaySlot::Displacement, &format!("{}mm", sensors.displacement));
        surface.set_slot(DisplaySlot::Vibration, &format!("{} Hz", sensors.vibration));
        surface.set_slot(DisplaySlot::PorePressure, &format!("{} kPa", sensors.pore_pressure));

        let risk = &snapshot.risk.reading;
        if risk.level() == Some(RiskLevel::High) {
            tracing::warn!("High risk predicted at {}", snapshot.coordinates);
        }
        surface.set_risk(&risk.display());
        surface.set_slot(
            DisplaySlot::RiskAlert,
            risk.alert.as_deref().unwrap_or("No active alerts"),
        );

        let series = &snapshot.series.reading;
        surface.with_chart_surface(&mut |canvas: &mut dyn DrawingSurface| {
            self.renderer.render(series, canvas)
        });

        surface.set_slot(
            DisplaySlot::LastUpdated,
            &snapshot.completed_at.format("%H:%M:%S").to_string(),
        );

        let degraded = [
            (DataDomain::Weather, snapshot.weather.is_degraded()),
            (DataDomain::Sensors, snapshot.sensors.is_degraded()),
            (DataDomain::Risk, snapshot.risk.is_degraded()),
            (DataDomain::Series, snapshot.series.is_degraded()),
        ];
        for (domain, _) in degraded.iter().filter(|(_, d)| *d) {
            surface.notify(NotificationLevel::Warning, domain.offline_notice());
        }
    }
}

/// Holds the busy indicator on while any manual refresh is running.
struct BusyGuard<'a> {
    state: &'a CycleState,
    surface: &'a dyn UiSurface,
}

impl<'a> BusyGuard<'a> {
    fn acquire(state: &'a CycleState, surface: &'a dyn UiSurface) -> Self {
        if state.busy.fetch_add(1, Ordering::SeqCst) == 0 {
            surface.set_busy(true);
        }
        Self { state, surface }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if self.state.busy.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.surface.set_busy(false);
        }
    }
}
