// Terminal UI surface - Text dashboard on stdout, chart as an SVG file
use crate::application::drawing::DrawingSurface;
use crate::application::ui_surface::{DisplaySlot, NotificationLevel, UiSurface, NOTIFICATION_TTL};
use crate::domain::risk::RiskDisplay;
use crate::infrastructure::svg_surface::SvgSurface;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use futures::StreamExt;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

#[derive(Debug, Clone)]
struct Toast {
    level: NotificationLevel,
    message: String,
    expires_at: Instant,
}

/// Transient notifications, each dropped once its TTL has passed.
#[derive(Debug, Default)]
pub struct ToastBoard {
    toasts: Vec<Toast>,
}

impl ToastBoard {
    pub fn push(&mut self, level: NotificationLevel, message: &str, now: Instant, ttl: Duration) {
        self.prune(now);
        self.toasts.push(Toast {
            level,
            message: message.to_string(),
            expires_at: now + ttl,
        });
    }

    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    pub fn active(&self, now: Instant) -> Vec<(NotificationLevel, &str)> {
        self.toasts
            .iter()
            .filter(|t| t.expires_at > now)
            .map(|t| (t.level, t.message.as_str()))
            .collect()
    }
}

struct DashboardView {
    slots: BTreeMap<DisplaySlot, String>,
    risk: Option<RiskDisplay>,
    toasts: ToastBoard,
    busy: bool,
    chart: SvgSurface,
}

pub struct TerminalSurface {
    view: Mutex<DashboardView>,
    charts: watch::Sender<String>,
}

impl TerminalSurface {
    pub fn new(chart_width: f64, chart_height: f64) -> Self {
        Self {
            view: Mutex::new(DashboardView {
                slots: BTreeMap::new(),
                risk: None,
                toasts: ToastBoard::default(),
                busy: false,
                chart: SvgSurface::new(chart_width, chart_height),
            }),
            charts: watch::channel(String::new()).0,
        }
    }

    /// Every drawn chart as an SVG document. Only the newest unseen one is kept.
    pub fn chart_updates(&self) -> watch::Receiver<String> {
        self.charts.subscribe()
    }

    /// Text rendering of the whole dashboard as it currently stands
    pub fn render(&self) -> String {
        let Ok(view) = self.view.lock() else {
            return String::new();
        };
        let slot = |s: DisplaySlot| view.slots.get(&s).map(String::as_str).unwrap_or("--");

        let mut lines = vec![format!(
            "== MineGuard | updated {} | site {} ==",
            slot(DisplaySlot::LastUpdated),
            slot(DisplaySlot::Coordinates)
        )];
        lines.push(row(
            "Weather",
            &view.slots,
            &[
                DisplaySlot::Temperature,
                DisplaySlot::Humidity,
                DisplaySlot::Rainfall,
                DisplaySlot::WindSpeed,
            ],
        ));
        lines.push(row(
            "Sensors",
            &view.slots,
            &[
                DisplaySlot::Displacement,
                DisplaySlot::Vibration,
                DisplaySlot::PorePressure,
            ],
        ));

        if let Some(risk) = &view.risk {
            let filled = usize::from(risk.bar_width_percent / 10);
            lines.push(format!(
                "Risk      {:<8} {}[{}{}]{} {:>3}%  {}: {}",
                risk.label,
                ansi_color(risk.bar_color),
                "#".repeat(filled),
                "-".repeat(10 - filled),
                ANSI_RESET,
                risk.bar_width_percent,
                DisplaySlot::RiskAlert.title(),
                slot(DisplaySlot::RiskAlert)
            ));
        }
        if view.busy {
            lines.push("Predicting...".to_string());
        }
        for (level, message) in view.toasts.active(Instant::now()) {
            lines.push(format!("[{}] {}", level, message));
        }
        lines.join("\n")
    }
}

/// Write each chart update to `path` until the surface is dropped.
pub async fn write_charts(updates: watch::Receiver<String>, path: PathBuf) {
    let mut charts = WatchStream::from_changes(updates);
    while let Some(svg) = charts.next().await {
        if let Err(e) = tokio::fs::write(&path, svg).await {
            tracing::warn!("Could not write chart to {}: {}", path.display(), e);
        }
    }
}

const ANSI_RESET: &str = "\x1b[0m";

fn ansi_color(color: &str) -> &'static str {
    match color {
        "green" => "\x1b[32m",
        "amber" => "\x1b[33m",
        "red" => "\x1b[31m",
        _ => "\x1b[90m",
    }
}

fn row(label: &str, slots: &BTreeMap<DisplaySlot, String>, fields: &[DisplaySlot]) -> String {
    let cells: Vec<String> = fields
        .iter()
        .map(|f| format!("{} {}", f.title(), slots.get(f).map(String::as_str).unwrap_or("--")))
        .collect();
    format!("{:<9} {}", label, cells.join(" | "))
}

impl UiSurface for TerminalSurface {
    fn set_slot(&self, slot: DisplaySlot, text: &str) {
        if let Ok(mut view) = self.view.lock() {
            view.slots.insert(slot, text.to_string());
        }
        // Last-updated is written at the end of every applied cycle
        if slot == DisplaySlot::LastUpdated {
            println!("{}\n", self.render());
        }
    }

    fn set_risk(&self, display: &RiskDisplay) {
        if let Ok(mut view) = self.view.lock() {
            view.risk = Some(display.clone());
        }
    }

    fn notify(&self, level: NotificationLevel, message: &str) {
        println!("[{}] {}", level, message);
        if let Ok(mut view) = self.view.lock() {
            view.toasts
                .push(level, message, Instant::now(), NOTIFICATION_TTL);
        }
    }

    fn set_busy(&self, busy: bool) {
        if busy {
            println!("Predicting...");
        }
        if let Ok(mut view) = self.view.lock() {
            view.busy = busy;
        }
    }

    fn with_chart_surface(&self, draw: &mut dyn FnMut(&mut dyn DrawingSurface)) {
        let svg = match self.view.lock() {
            Ok(mut view) => {
                let canvas: &mut dyn DrawingSurface = &mut view.chart;
                draw(canvas);
                if view.chart.is_blank() {
                    return;
                }
                view.chart.to_svg()
            }
            Err(_) => return,
        };
        self.charts.send_replace(svg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::drawing::Point;
    use crate::domain::risk::{RiskAssessment, RiskIndicator, RiskLevel};

    #[test]
    fn test_toasts_expire() {
        let mut board = ToastBoard::default();
        let start = Instant::now();
        board.push(NotificationLevel::Warning, "Using offline weather data", start, NOTIFICATION_TTL);
        board.push(
            NotificationLevel::Success,
            "done",
            start + Duration::from_secs(2),
            NOTIFICATION_TTL,
        );

        assert_eq!(board.active(start + Duration::from_secs(1)).len(), 2);
        assert_eq!(
            board.active(start + Duration::from_secs(4)),
            vec![(NotificationLevel::Success, "done")]
        );
        assert!(board.active(start + Duration::from_secs(6)).is_empty());

        board.prune(start + Duration::from_secs(6));
        assert!(board.toasts.is_empty());
    }

    #[test]
    fn test_render_board() {
        let surface = TerminalSurface::new(400.0, 200.0);
        surface.set_slot(DisplaySlot::Temperature, "31°C");
        surface.set_slot(DisplaySlot::Coordinates, "45.764, 4.8357");
        surface.set_risk(
            &RiskAssessment::new(RiskIndicator::Level(RiskLevel::High), None).display(),
        );
        surface.set_slot(DisplaySlot::RiskAlert, "No active alerts");
        surface.set_busy(true);
        surface.notify(NotificationLevel::Warning, "Using offline sensor data");

        let board = surface.render();
        assert!(board.contains("site 45.764, 4.8357"));
        assert!(board.contains("Temperature 31°C | Humidity --"));
        assert!(board.contains("High     \x1b[31m[#########-]\x1b[0m  90%"));
        assert!(board.contains("Predicting..."));
        assert!(board.contains("[WARN] Using offline sensor data"));

        surface.set_busy(false);
        assert!(!surface.render().contains("Predicting..."));
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mineguard-{}-{}.svg", name, std::process::id()))
    }

    #[tokio::test]
    async fn test_latest_chart_written_to_file() {
        let path = scratch_path("terminal-chart");
        let surface = TerminalSurface::new(400.0, 200.0);
        let updates = surface.chart_updates();

        surface.with_chart_surface(&mut |canvas: &mut dyn DrawingSurface| {
            canvas.clear();
            canvas.circle(Point::new(10.0, 10.0), 4.0, "#f59e0b");
        });
        surface.with_chart_surface(&mut |canvas: &mut dyn DrawingSurface| {
            canvas.clear();
            canvas.circle(Point::new(10.0, 10.0), 4.0, "#f59e0b");
            canvas.circle(Point::new(20.0, 20.0), 4.0, "#f59e0b");
        });
        drop(surface);
        write_charts(updates, path.clone()).await;

        let svg = std::fs::read_to_string(&path).unwrap();
        assert_eq!(svg.matches("<circle").count(), 2);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_blank_chart_is_not_published() {
        let path = scratch_path("blank-chart");
        let surface = TerminalSurface::new(400.0, 200.0);
        let updates = surface.chart_updates();

        surface.with_chart_surface(&mut |canvas: &mut dyn DrawingSurface| canvas.clear());
        drop(surface);
        write_charts(updates, path.clone()).await;

        assert!(!path.exists());
    }
}
