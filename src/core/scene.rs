//! Draw commands produced by the chart builders.
//!
//! A [`Scene`] is everything one canvas shows: an ordered list of shapes plus
//! the interactive marks used for hover/click hit-testing. The web front-end
//! paints scenes onto a 2D canvas context; [`Scene::to_svg`] serializes them
//! for the snapshot binary.

use crate::fmt::{fmt_fixed, fmt_tick};
use crate::model::RecordKey;
use crate::scale::{BandScale, LinearScale};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn svg(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }

    /// Canvas `textAlign` equivalent.
    pub fn canvas(self) -> &'static str {
        match self {
            TextAnchor::Start => "left",
            TextAnchor::Middle => "center",
            TextAnchor::End => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: String,
    },
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        fill: String,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: String,
        width: f64,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        stroke: String,
        width: f64,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        anchor: TextAnchor,
        size_px: f64,
        /// Rotation in degrees about (x, y).
        rotate: f64,
        fill: String,
    },
}

/// An interactive dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mark {
    pub key: RecordKey,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub shapes: Vec<Shape>,
    pub marks: Vec<Mark>,
}

pub const AXIS_COLOR: &str = "#000000";
pub const TEXT_COLOR: &str = "#333333";
const TICK_SIZE: f64 = 6.0;

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
            marks: Vec::new(),
        }
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn text(&mut self, x: f64, y: f64, text: impl Into<String>, anchor: TextAnchor, size_px: f64) {
        self.push(Shape::Text {
            x,
            y,
            text: text.into(),
            anchor,
            size_px,
            rotate: 0.0,
            fill: TEXT_COLOR.to_string(),
        });
    }

    pub fn circle_count(&self) -> usize {
        self.shapes
            .iter()
            .filter(|s| matches!(s, Shape::Circle { .. }))
            .count()
    }

    /// Topmost mark under the pointer. Later marks are drawn above earlier ones.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<RecordKey> {
        self.marks
            .iter()
            .rev()
            .find(|m| {
                let dx = x - m.cx;
                let dy = y - m.cy;
                dx * dx + dy * dy <= m.r * m.r
            })
            .map(|m| m.key)
    }

    /// Vertical axis at `x` with tick labels on the left.
    pub fn axis_left_linear(&mut self, scale: &LinearScale, x: f64, ticks: usize, size_px: f64) {
        let (r0, r1) = scale.range;
        self.axis_line(x, r0, x, r1);
        let step = scale.tick_step(ticks);
        for t in scale.ticks(ticks) {
            let y = scale.map(t);
            self.axis_line(x - TICK_SIZE, y, x, y);
            self.text(x - TICK_SIZE - 3.0, y + size_px * 0.35, fmt_tick(t, step), TextAnchor::End, size_px);
        }
    }

    /// Horizontal axis at `y` with tick labels below. `format` overrides the
    /// default label rendering; returning `None` skips the tick.
    pub fn axis_bottom_linear(
        &mut self,
        scale: &LinearScale,
        y: f64,
        ticks: usize,
        size_px: f64,
        format: Option<&dyn Fn(f64) -> Option<String>>,
    ) {
        let (r0, r1) = scale.range;
        self.axis_line(r0, y, r1, y);
        let step = scale.tick_step(ticks);
        for t in scale.ticks(ticks) {
            let label = match format {
                Some(f) => match f(t) {
                    Some(l) => l,
                    None => continue,
                },
                None => fmt_tick(t, step),
            };
            let x = scale.map(t);
            self.axis_line(x, y, x, y + TICK_SIZE);
            self.text(x, y + TICK_SIZE + size_px + 1.0, label, TextAnchor::Middle, size_px);
        }
    }

    pub fn axis_left_band(&mut self, scale: &BandScale, x: f64, extent: (f64, f64), size_px: f64) {
        self.axis_line(x, extent.0, x, extent.1);
        for label in scale.labels() {
            if let Some(y) = scale.center(label) {
                self.axis_line(x - TICK_SIZE, y, x, y);
                self.text(x - TICK_SIZE - 3.0, y + size_px * 0.35, label.clone(), TextAnchor::End, size_px);
            }
        }
    }

    pub fn axis_bottom_band(&mut self, scale: &BandScale, y: f64, extent: (f64, f64), size_px: f64) {
        self.axis_line(extent.0, y, extent.1, y);
        for label in scale.labels() {
            if let Some(x) = scale.center(label) {
                self.axis_line(x, y, x, y + TICK_SIZE);
                self.text(x, y + TICK_SIZE + size_px + 1.0, label.clone(), TextAnchor::Middle, size_px);
            }
        }
    }

    fn axis_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.push(Shape::Line {
            x1,
            y1,
            x2,
            y2,
            stroke: AXIS_COLOR.to_string(),
            width: 1.0,
        });
    }

    pub fn to_svg(&self) -> String {
        let mut out = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = num(self.width),
            h = num(self.height),
        );
        out.push('\n');
        for shape in &self.shapes {
            match shape {
                Shape::Circle { cx, cy, r, fill } => out.push_str(&format!(
                    r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                    num(*cx),
                    num(*cy),
                    num(*r),
                    escape(fill)
                )),
                Shape::Rect { x, y, w, h, fill } => out.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                    num(*x),
                    num(*y),
                    num(w.max(0.0)),
                    num(h.max(0.0)),
                    escape(fill)
                )),
                Shape::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    stroke,
                    width,
                } => out.push_str(&format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
                    num(*x1),
                    num(*y1),
                    num(*x2),
                    num(*y2),
                    escape(stroke),
                    num(*width)
                )),
                Shape::Polyline {
                    points,
                    stroke,
                    width,
                } => {
                    let pts: Vec<String> = points
                        .iter()
                        .map(|(x, y)| format!("{},{}", num(*x), num(*y)))
                        .collect();
                    out.push_str(&format!(
                        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                        pts.join(" "),
                        escape(stroke),
                        num(*width)
                    ));
                }
                Shape::Text {
                    x,
                    y,
                    text,
                    anchor,
                    size_px,
                    rotate,
                    fill,
                } => {
                    let transform = if *rotate != 0.0 {
                        format!(
                            r#" transform="rotate({} {} {})""#,
                            num(*rotate),
                            num(*x),
                            num(*y)
                        )
                    } else {
                        String::new()
                    };
                    out.push_str(&format!(
                        r#"<text x="{}" y="{}" text-anchor="{}" font-size="{}px" fill="{}"{}>{}</text>"#,
                        num(*x),
                        num(*y),
                        anchor.svg(),
                        num(*size_px),
                        escape(fill),
                        transform,
                        escape(text)
                    ));
                }
            }
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }
}

fn num(v: f64) -> String {
    let s = fmt_fixed(v, 2);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(unitid: u32) -> RecordKey {
        RecordKey { unitid, year: 2020 }
    }

    #[test]
    fn hit_test_prefers_topmost_mark() {
        let mut s = Scene::new(100.0, 100.0);
        s.marks.push(Mark { key: key(1), cx: 10.0, cy: 10.0, r: 4.0 });
        s.marks.push(Mark { key: key(2), cx: 13.0, cy: 10.0, r: 4.0 });
        assert_eq!(s.hit_test(12.0, 10.0), Some(key(2)));
        assert_eq!(s.hit_test(7.0, 10.0), Some(key(1)));
        assert_eq!(s.hit_test(50.0, 50.0), None);
    }

    #[test]
    fn svg_escapes_text_and_trims_numbers() {
        let mut s = Scene::new(200.0, 50.5);
        s.text(10.0, 20.25, "A&M <Tech>", TextAnchor::Middle, 11.0);
        s.push(Shape::Circle { cx: 1.5, cy: 2.0, r: 4.0, fill: "#0066cc".into() });
        let svg = s.to_svg();
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="50.5""#));
        assert!(svg.contains("A&amp;M &lt;Tech&gt;"));
        assert!(svg.contains(r##"<circle cx="1.5" cy="2" r="4" fill="#0066cc"/>"##));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn numbers_render_compactly() {
        assert_eq!(num(0.0), "0");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(12.30), "12.3");
        assert_eq!(num(-4.0), "-4");
        assert_eq!(num(100.0), "100");
    }

    #[test]
    fn linear_axis_emits_tick_per_value() {
        let mut s = Scene::new(100.0, 100.0);
        let y = LinearScale::new((0.0, 100.0), (90.0, 10.0));
        s.axis_left_linear(&y, 40.0, 5, 10.0);
        let labels: Vec<&str> = s
            .shapes
            .iter()
            .filter_map(|sh| match sh {
                Shape::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["0", "20", "40", "60", "80", "100"]);
    }
}
