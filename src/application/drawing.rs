// Port for the pixel surface the chart is drawn on

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: &'static str,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: &'static str,
    pub size: f64,
    pub align: TextAlign,
    pub bold: bool,
}

/// A 2D canvas with its origin at the top-left corner.
pub trait DrawingSurface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn clear(&mut self);
    fn line(&mut self, from: Point, to: Point, stroke: Stroke);
    fn polyline(&mut self, points: &[Point], stroke: Stroke);
    fn circle(&mut self, center: Point, radius: f64, fill: &'static str);
    fn text(&mut self, at: Point, text: &str, style: TextStyle);
}
