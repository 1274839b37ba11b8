// Vibration trend chart drawn directly onto a drawing surface
use crate::application::drawing::{DrawingSurface, Point, Stroke, TextAlign, TextStyle};
use crate::domain::scale::LinearScale;
use crate::domain::telemetry::TimeSeries;

const GRID_ROWS: usize = 6;
const LINE_WIDTH: f64 = 3.0;
const MARKER_RADIUS: f64 = 4.0;

const ACCENT: &str = "#f59e0b";
const GRID: &str = "#e5e7eb";
const LABEL: &str = "#6b7280";
const TITLE: &str = "#1f2937";

#[derive(Debug, Clone)]
pub struct ChartRenderer {
    padding: f64,
    title: String,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(40.0)
    }
}

impl ChartRenderer {
    pub fn new(padding: f64) -> Self {
        Self {
            padding,
            title: "Vibration Trend (Hz)".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Clear `surface` and draw the full chart for `series`.
    pub fn render(&self, series: &TimeSeries, surface: &mut dyn DrawingSurface) {
        let (width, height) = (surface.width(), surface.height());
        let left = self.padding;
        let right = width - self.padding;
        let top = self.padding;
        let bottom = height - self.padding;

        surface.clear();
        self.draw_horizontal_grid(surface, left, right, top, bottom);

        let Some((min, max)) = series.bounds() else {
            surface.text(
                Point::new(width / 2.0, height / 2.0),
                "No data",
                label_style(TextAlign::Center),
            );
            self.draw_title(surface, width);
            return;
        };

        let n = series.len();
        let x_scale = LinearScale::new((0.0, (n - 1) as f64), (left, right));
        let y_scale = LinearScale::new((min, max), (bottom, top));

        let plotted: Vec<Point> = series
            .points()
            .iter()
            .enumerate()
            .map(|(i, p)| Point::new(x_scale.apply(i as f64), y_scale.apply(p.vibration)))
            .collect();

        for point in &plotted {
            surface.line(
                Point::new(point.x, top),
                Point::new(point.x, bottom),
                Stroke { color: GRID, width: 1.0 },
            );
        }

        if plotted.len() > 1 {
            surface.polyline(&plotted, Stroke { color: ACCENT, width: LINE_WIDTH });
        }
        for point in &plotted {
            surface.circle(*point, MARKER_RADIUS, ACCENT);
        }

        for (point, sample) in plotted.iter().zip(series.points()) {
            surface.text(
                Point::new(point.x, bottom + 20.0),
                &sample.timestamp,
                label_style(TextAlign::Center),
            );
        }

        for (row, y) in grid_rows(top, bottom).enumerate() {
            let value = max - (max - min) * row as f64 / (GRID_ROWS - 1) as f64;
            surface.text(
                Point::new(left - 10.0, y + 4.0),
                &format!("{:.1}", value),
                label_style(TextAlign::End),
            );
        }

        self.draw_title(surface, width);
    }

    fn draw_horizontal_grid(
        &self,
        surface: &mut dyn DrawingSurface,
        left: f64,
        right: f64,
        top: f64,
        bottom: f64,
    ) {
        for y in grid_rows(top, bottom) {
            surface.line(
                Point::new(left, y),
                Point::new(right, y),
                Stroke { color: GRID, width: 1.0 },
            );
        }
    }

    fn draw_title(&self, surface: &mut dyn DrawingSurface, width: f64) {
        surface.text(
            Point::new(width / 2.0, self.padding / 2.0),
            &self.title,
            TextStyle {
                color: TITLE,
                size: 16.0,
                align: TextAlign::Center,
                bold: true,
            },
        );
    }
}

fn grid_rows(top: f64, bottom: f64) -> impl Iterator<Item = f64> {
    let step = (bottom - top) / (GRID_ROWS - 1) as f64;
    (0..GRID_ROWS).map(move |row| top + step * row as f64)
}

fn label_style(align: TextAlign) -> TextStyle {
    TextStyle {
        color: LABEL,
        size: 12.0,
        align,
        bold: false,
    }
}
