//! Map and feature-importance scenes.

use crate::dataset::Dataset;
use crate::filter::FilterState;
use crate::model::OutcomeKind;
use crate::scale::{BandScale, ColorScale, LinearScale};
use crate::scene::{Mark, Scene, Shape, TextAnchor, TEXT_COLOR};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

/// Fixed projection extents (continental US). Not derived from the data.
pub const LONGITUDE_DOMAIN: (f64, f64) = (-125.0, -66.0);
pub const LATITUDE_DOMAIN: (f64, f64) = (24.0, 50.0);

pub const MAP_MARGIN: Margin = Margin::uniform(20.0);
pub const DOT_RADIUS: f64 = 4.0;
pub const IMPORTANCE_MARGIN: Margin = Margin {
    top: 20.0,
    right: 20.0,
    bottom: 20.0,
    left: 150.0,
};
pub const BAR_COLOR: &str = "#0066cc";
pub const AXIS_TICKS: usize = 10;

/// Full-width charts leave 40px of the parent for padding.
pub fn full_width(parent_width: f64) -> f64 {
    (parent_width - 40.0).max(0.0)
}

pub struct MapScene {
    pub scene: Scene,
    pub color: ColorScale,
}

pub fn map_projection(width: f64, height: f64) -> (LinearScale, LinearScale) {
    let x = LinearScale::new(
        LONGITUDE_DOMAIN,
        (MAP_MARGIN.left, width - MAP_MARGIN.right),
    );
    let y = LinearScale::new(
        LATITUDE_DOMAIN,
        (height - MAP_MARGIN.bottom, MAP_MARGIN.top),
    );
    (x, y)
}

/// One dot per filtered record that carries a value for the active model.
pub fn map_scene(ds: &Dataset, st: &FilterState, width: f64, height: f64) -> MapScene {
    let mut scene = Scene::new(width, height);
    let (x, y) = map_projection(width, height);

    let color = match st.outcome {
        OutcomeKind::GradRate => {
            ColorScale::continuous(st.filtered(ds).filter_map(|r| r.predicted_grad_rate(st.model)))
        }
        OutcomeKind::Risk => ColorScale::Ordinal,
    };

    for r in st.filtered(ds) {
        let fill = match st.outcome {
            OutcomeKind::GradRate => r
                .predicted_grad_rate(st.model)
                .and_then(|v| color.grad_color(v)),
            OutcomeKind::Risk => r.risk_category(st.model).and_then(|c| color.risk_color(c)),
        };
        let Some(fill) = fill else {
            continue;
        };
        let cx = x.map(r.longitude);
        let cy = y.map(r.latitude);
        scene.push(Shape::Circle {
            cx,
            cy,
            r: DOT_RADIUS,
            fill,
        });
        scene.marks.push(Mark {
            key: r.key(),
            cx,
            cy,
            r: DOT_RADIUS,
        });
    }

    scene.text(width / 2.0, height - 5.0, "Longitude", TextAnchor::Middle, 12.0);
    scene.push(Shape::Text {
        x: 15.0,
        y: height / 2.0,
        text: "Latitude".to_string(),
        anchor: TextAnchor::Middle,
        size_px: 12.0,
        rotate: -90.0,
        fill: TEXT_COLOR.to_string(),
    });

    for (i, entry) in color.legend().into_iter().enumerate() {
        let lx = width - 120.0;
        let ly = MAP_MARGIN.top + i as f64 * 20.0;
        scene.push(Shape::Rect {
            x: lx,
            y: ly,
            w: 12.0,
            h: 12.0,
            fill: entry.color,
        });
        scene.text(lx + 18.0, ly + 10.0, entry.label, TextAnchor::Start, 11.0);
    }

    MapScene { scene, color }
}

/// Horizontal bars for the selected year/model; axes only when nothing is
/// recorded for that pair.
pub fn importance_scene(ds: &Dataset, st: &FilterState, width: f64, height: f64) -> Scene {
    let m = IMPORTANCE_MARGIN;
    let mut scene = Scene::new(width, height);
    let entries = ds.importance(st.filters().year, st.model);

    let band = BandScale::new(
        entries.iter().map(|e| e.feature_name.clone()).collect(),
        (height - m.bottom, m.top),
        0.3,
    );
    let max = entries
        .iter()
        .map(|e| e.importance_value)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let x = LinearScale::new(
        (0.0, if max > 0.0 { max } else { 1.0 }),
        (m.left, width - m.right),
    );

    for e in entries {
        let Some(y) = band.position(&e.feature_name) else {
            continue;
        };
        scene.push(Shape::Rect {
            x: m.left,
            y,
            w: (x.map(e.importance_value) - m.left).max(0.0),
            h: band.bandwidth(),
            fill: BAR_COLOR.to_string(),
        });
    }

    scene.axis_left_band(&band, m.left, (height - m.bottom, m.top), 11.0);
    scene.axis_bottom_linear(&x, height - m.bottom, AXIS_TICKS, 11.0, None);
    scene.text(width / 2.0, height - 5.0, "Importance", TextAnchor::Middle, 12.0);
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::{row, IMPORTANCE};
    use crate::model::ModelName;

    fn rects(scene: &Scene) -> Vec<(f64, f64, f64, f64)> {
        scene
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Rect { x, y, w, h, .. } => Some((*x, *y, *w, *h)),
                _ => None,
            })
            .collect()
    }

    fn dataset(rows: &[String]) -> Dataset {
        Dataset::from_json_strs(&format!("[{}]", rows.join(",")), IMPORTANCE).unwrap()
    }

    #[test]
    fn map_plots_one_dot_per_filtered_record() {
        let ds = dataset(&[
            row(1, 2020, "CA", "Public", "Medium"),
            row(2, 2020, "NY", "Public", "Small"),
            row(3, 2019, "NY", "Public", "Small"),
        ]);
        let st = FilterState::new(&ds, ModelName::RandomForest);
        let map = map_scene(&ds, &st, 800.0, 500.0);
        assert_eq!(map.scene.circle_count(), 2);
        assert_eq!(map.scene.marks.len(), 2);
        assert!(matches!(map.color, ColorScale::Continuous { .. }));

        // (-100, 40) projects inside the plot area
        let m = map.scene.marks[0];
        let (x, y) = map_projection(800.0, 500.0);
        assert_eq!((m.cx, m.cy), (x.map(-100.0), y.map(40.0)));
        // both rows share a location; the later dot is on top
        assert_eq!(map.scene.hit_test(m.cx + 1.0, m.cy), Some(map.scene.marks[1].key));
    }

    #[test]
    fn empty_subset_draws_nothing_and_omits_legend() {
        let ds = dataset(&[row(1, 2020, "CA", "Public", "Medium")]);
        let mut st = FilterState::new(&ds, ModelName::RandomForest);
        st.update_filters(&ds, |f| f.state = Some("NY".to_string()));

        let map = map_scene(&ds, &st, 800.0, 500.0);
        assert_eq!(map.color, ColorScale::Empty);
        assert_eq!(map.scene.circle_count(), 0);
        assert!(map.scene.marks.is_empty());
        assert!(rects(&map.scene).is_empty());
    }

    #[test]
    fn risk_outcome_uses_fixed_palette_and_full_legend() {
        let ds = dataset(&[row(1, 2020, "CA", "Public", "Medium")]);
        let mut st = FilterState::new(&ds, ModelName::RandomForest);
        st.outcome = OutcomeKind::Risk;
        let map = map_scene(&ds, &st, 800.0, 500.0);
        let fills: Vec<&str> = map
            .scene
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Circle { fill, .. } => Some(fill.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec!["#ff7f0e"]);
        assert_eq!(rects(&map.scene).len(), 3);
    }

    #[test]
    fn records_without_the_active_model_are_skipped() {
        let ds = dataset(&[row(1, 2020, "CA", "Public", "Medium")]);
        let mut st = FilterState::new(&ds, ModelName::GradientBoosting);
        let map = map_scene(&ds, &st, 800.0, 500.0);
        assert_eq!(map.scene.circle_count(), 0);
        st.outcome = OutcomeKind::Risk;
        assert_eq!(map_scene(&ds, &st, 800.0, 500.0).scene.circle_count(), 0);
    }

    #[test]
    fn importance_bars_scale_to_the_largest_value() {
        let ds = dataset(&[row(1, 2020, "CA", "Public", "Medium")]);
        let st = FilterState::new(&ds, ModelName::RandomForest);
        let scene = importance_scene(&ds, &st, 650.0, 500.0);
        let bars = rects(&scene);
        assert_eq!(bars.len(), 3);
        // widest bar spans the whole plot width
        assert!((bars[0].2 - (650.0 - 20.0 - 150.0)).abs() < 1e-9);
        assert!((bars[1].2 - 480.0 * 0.21 / 0.42).abs() < 1e-9);
        // first feature sits at the bottom
        assert!(bars[0].1 > bars[1].1 && bars[1].1 > bars[2].1);
    }

    #[test]
    fn missing_importance_renders_an_empty_chart() {
        let ds = dataset(&[row(1, 2020, "CA", "Public", "Medium")]);
        let mut st = FilterState::new(&ds, ModelName::GradientBoosting);
        assert!(rects(&importance_scene(&ds, &st, 650.0, 500.0)).is_empty());
        st.model = ModelName::RandomForest;
        st.update_filters(&ds, |f| f.year = 2010);
        assert!(rects(&importance_scene(&ds, &st, 650.0, 500.0)).is_empty());
    }
}
