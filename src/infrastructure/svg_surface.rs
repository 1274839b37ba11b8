// SVG drawing surface for rendered charts
use crate::application::drawing::{DrawingSurface, Point, Stroke, TextAlign, TextStyle};
use std::fmt::Write;

#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    elements: Vec<String>,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.elements.is_empty()
    }

    /// Serialize everything drawn since the last clear as a standalone SVG document
    pub fn to_svg(&self) -> String {
        let mut out = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        out.push('\n');
        out.push_str(&format!(
            r#"<rect width="{}" height="{}" fill="white"/>"#,
            self.width, self.height
        ));
        out.push('\n');
        for element in &self.elements {
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }
}

impl DrawingSurface for SvgSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.elements.clear();
    }

    fn line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.elements.push(format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{}"/>"#,
            from.x, from.y, to.x, to.y, stroke.color, stroke.width
        ));
    }

    fn polyline(&mut self, points: &[Point], stroke: Stroke) {
        let mut coords = String::new();
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                coords.push(' ');
            }
            let _ = write!(coords, "{:.1},{:.1}", p.x, p.y);
        }
        self.elements.push(format!(
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round"/>"#,
            coords, stroke.color, stroke.width
        ));
    }

    fn circle(&mut self, center: Point, radius: f64, fill: &'static str) {
        self.elements.push(format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{}" fill="{}"/>"#,
            center.x, center.y, radius, fill
        ));
    }

    fn text(&mut self, at: Point, text: &str, style: TextStyle) {
        let anchor = match style.align {
            TextAlign::Center => "middle",
            TextAlign::End => "end",
        };
        let weight = if style.bold { "bold" } else { "normal" };
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" fill="{}" font-size="{}" font-weight="{}" text-anchor="{}" font-family="sans-serif">{}</text>"#,
            at.x,
            at.y,
            style.color,
            style.size,
            weight,
            anchor,
            escape(text)
        ));
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
