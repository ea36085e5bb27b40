//! Drill-down views for one selected institution: hover text, profile card,
//! actual-vs-predicted comparison, and the multi-year trend.

use crate::charts::{Margin, AXIS_TICKS, BAR_COLOR};
use crate::dataset::Dataset;
use crate::fmt::{fmt_fixed, fmt_percent};
use crate::model::{InstitutionRecord, ModelName, OutcomeKind};
use crate::scale::{BandScale, LinearScale};
use crate::scene::{Scene, Shape};

pub const PROFILE_MARGIN: Margin = Margin {
    top: 10.0,
    right: 20.0,
    bottom: 30.0,
    left: 40.0,
};
pub const TREND_COLOR: &str = "#0066cc";

/// Hover box contents for a map dot.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub title: String,
    pub lines: Vec<String>,
}

pub fn tooltip_content(r: &InstitutionRecord, outcome: OutcomeKind, model: ModelName) -> TooltipContent {
    let predicted = match outcome {
        OutcomeKind::GradRate => r
            .predicted_grad_rate(model)
            .map(|v| fmt_percent(v, 1))
            .unwrap_or_else(|| "n/a".to_string()),
        OutcomeKind::Risk => r
            .risk_category(model)
            .map(|c| c.label().to_string())
            .unwrap_or_else(|| "n/a".to_string()),
    };
    TooltipContent {
        title: r.institution_name.clone(),
        lines: vec![
            format!("State: {}", r.state),
            format!("Actual Grad Rate: {}", fmt_percent(r.actual_grad_rate, 1)),
            format!("Predicted: {predicted}"),
        ],
    }
}

/// Static text shown above the profile charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCard {
    pub name: String,
    pub state: String,
    pub sector: String,
    pub size: String,
}

impl ProfileCard {
    pub fn from_record(r: &InstitutionRecord) -> Self {
        Self {
            name: r.institution_name.clone(),
            state: r.state.clone(),
            sector: r.sector.label().to_string(),
            size: r.school_size_category.label().to_string(),
        }
    }

    /// `(label, value)` rows under the name.
    pub fn rows(&self) -> [(&'static str, &str); 3] {
        [
            ("State", self.state.as_str()),
            ("Sector", self.sector.as_str()),
            ("Size", self.size.as_str()),
        ]
    }
}

/// Profile charts share half the parent width; the canvas is sized for two
/// side-by-side plots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfWidth {
    pub plot: f64,
    pub canvas: f64,
}

impl HalfWidth {
    pub fn from_parent(parent_width: f64) -> Self {
        let plot = (parent_width / 2.0 - 20.0).max(0.0);
        Self {
            plot,
            canvas: plot * 2.0 + 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonBar {
    pub label: &'static str,
    pub value: Option<f64>,
}

/// The two bar values. Risk categories are charted through their numeric
/// placeholders; the "Actual" risk comes from `reference` and falls back to
/// the medium placeholder, a missing predicted risk charts as high.
pub fn comparison_bars(
    r: &InstitutionRecord,
    outcome: OutcomeKind,
    model: ModelName,
    reference: ModelName,
) -> [ComparisonBar; 2] {
    let (actual, predicted) = match outcome {
        OutcomeKind::GradRate => (Some(r.actual_grad_rate), r.predicted_grad_rate(model)),
        OutcomeKind::Risk => (
            Some(
                r.risk_category(reference)
                    .map(|c| c.placeholder_value())
                    .unwrap_or(50.0),
            ),
            Some(
                r.risk_category(model)
                    .map(|c| c.placeholder_value())
                    .unwrap_or(25.0),
            ),
        ),
    };
    [
        ComparisonBar {
            label: "Actual",
            value: actual,
        },
        ComparisonBar {
            label: "Predicted",
            value: predicted,
        },
    ]
}

pub fn comparison_scene(bars: &[ComparisonBar; 2], size: HalfWidth, height: f64) -> Scene {
    let m = PROFILE_MARGIN;
    let mut scene = Scene::new(size.canvas, height);
    let x = BandScale::new(
        bars.iter().map(|b| b.label.to_string()).collect(),
        (m.left, size.plot - m.right),
        0.3,
    );
    let y = LinearScale::new((0.0, 100.0), (height - m.bottom, m.top));

    for bar in bars {
        let (Some(v), Some(bx)) = (bar.value, x.position(bar.label)) else {
            continue;
        };
        let top = y.map(v);
        scene.push(Shape::Rect {
            x: bx,
            y: top,
            w: x.bandwidth(),
            h: height - m.bottom - top,
            fill: BAR_COLOR.to_string(),
        });
    }

    scene.axis_bottom_band(&x, height - m.bottom, (m.left, size.plot - m.right), 11.0);
    scene.axis_left_linear(&y, m.left, AXIS_TICKS, 11.0);
    scene
}

pub struct TrendScene {
    pub scene: Scene,
    pub year_domain: (i32, i32),
    pub points: Vec<(i32, f64)>,
}

/// Actual graduation rate across every year recorded for `unitid`. Years
/// with no record are skipped, not interpolated.
pub fn trend_scene(ds: &Dataset, unitid: u32, size: HalfWidth, height: f64) -> TrendScene {
    let m = PROFILE_MARGIN;
    let points: Vec<(i32, f64)> = ds
        .history(unitid)
        .map(|r| (r.year, r.actual_grad_rate))
        .collect();
    let year_domain = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first.0, last.0),
        _ => (0, 0),
    };

    let mut scene = Scene::new(size.canvas, height);
    let x = LinearScale::new(
        (year_domain.0 as f64, year_domain.1 as f64),
        (m.left, size.plot - m.right),
    );
    let y = LinearScale::new((0.0, 100.0), (height - m.bottom, m.top));

    let projected: Vec<(f64, f64)> = points
        .iter()
        .map(|&(yr, v)| (x.map(yr as f64), y.map(v)))
        .collect();
    if !projected.is_empty() {
        scene.push(Shape::Polyline {
            points: projected.clone(),
            stroke: TREND_COLOR.to_string(),
            width: 1.5,
        });
    }
    for (cx, cy) in projected {
        scene.push(Shape::Circle {
            cx,
            cy,
            r: 2.0,
            fill: TREND_COLOR.to_string(),
        });
    }

    let whole_years = |t: f64| (t.fract() == 0.0).then(|| fmt_fixed(t, 0));
    scene.axis_bottom_linear(&x, height - m.bottom, AXIS_TICKS, 10.0, Some(&whole_years));
    scene.axis_left_linear(&y, m.left, AXIS_TICKS, 10.0);

    TrendScene {
        scene,
        year_domain,
        points,
    }
}
