//! Position and colour scales.
//!
//! Behaviour follows the usual charting conventions: a linear scale with a
//! zero-width domain maps everything to the middle of its range, a band scale
//! splits its range into evenly padded bands, and ticks land on 1/2/5 × 10ⁿ
//! steps.

use crate::fmt::fmt_fixed;
use crate::model::RiskCategory;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 || !span.is_finite() {
            0.5
        } else {
            (x - d0) / span
        };
        r0 + t * (r1 - r0)
    }

    /// Roughly `count` round-numbered ticks inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }

    /// Spacing between consecutive ticks, for label precision.
    pub fn tick_step(&self, count: usize) -> f64 {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        match tick_params(lo, hi, count as f64) {
            Some((_, _, inc)) if inc < 0.0 => -1.0 / inc,
            Some((_, _, inc)) => inc,
            None => 0.0,
        }
    }
}

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Integer tick bounds plus the increment. A negative increment encodes a
/// fractional step as its reciprocal to avoid accumulating float error.
fn tick_params(start: f64, stop: f64, count: f64) -> Option<(f64, f64, f64)> {
    let step = (stop - start) / count.max(0.0);
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inv = 10f64.powf(-power) / factor;
        i1 = (start * inv).round();
        i2 = (stop * inv).round();
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        inc = -inv;
    } else {
        let step = 10f64.powf(power) * factor;
        i1 = (start / step).round();
        i2 = (stop / step).round();
        if i1 * step < start {
            i1 += 1.0;
        }
        if i2 * step > stop {
            i2 -= 1.0;
        }
        inc = step;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_params(start, stop, count * 2.0);
    }
    Some((i1, i2, inc))
}

pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let Some((i1, i2, inc)) = tick_params(lo, hi, count as f64) else {
        return Vec::new();
    };
    if i2 < i1 {
        return Vec::new();
    }
    let n = (i2 - i1) as usize + 1;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 {
                k / -inc
            } else {
                k * inc
            }
        })
        .collect();
    if reverse {
        out.reverse();
    }
    out
}

/// Discrete bands over an ordered list of labels.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    labels: Vec<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
    reversed: bool,
}

impl BandScale {
    /// `padding` applies both between bands and at the outer edges.
    pub fn new(labels: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let n = labels.len() as f64;
        let reversed = range.1 < range.0;
        let (lo, hi) = if reversed {
            (range.1, range.0)
        } else {
            range
        };
        let step = (hi - lo) / (n - padding + padding * 2.0).max(1.0);
        let start = lo + (hi - lo - step * (n - padding)) * 0.5;
        Self {
            labels,
            start,
            step,
            bandwidth: step * (1.0 - padding),
            reversed,
        }
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Leading edge of the band for `label`.
    pub fn position(&self, label: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == label)?;
        let slot = if self.reversed {
            self.labels.len() - 1 - i
        } else {
            i
        };
        Some(self.start + self.step * slot as f64)
    }

    pub fn center(&self, label: &str) -> Option<f64> {
        self.position(label).map(|p| p + self.bandwidth / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| {
            let v = a as f64 + (b as f64 - a as f64) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    pub fn css(self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

pub const GRAD_LOW_COLOR: Rgb = Rgb(0xff, 0xff, 0xcc);
pub const GRAD_HIGH_COLOR: Rgb = Rgb(0x00, 0x51, 0xba);

pub fn risk_color(r: RiskCategory) -> &'static str {
    match r {
        RiskCategory::Low => "#2ca02c",
        RiskCategory::Medium => "#ff7f0e",
        RiskCategory::High => "#d62728",
    }
}

/// Colour encoding for the active outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorScale {
    /// Predicted graduation rate, min..max of the plotted values.
    Continuous { min: f64, max: f64 },
    /// Risk category, fixed palette.
    Ordinal,
    /// No values to derive a continuous domain from.
    Empty,
}

/// A legend row: swatch colour and caption.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub color: String,
    pub label: String,
}

impl ColorScale {
    /// Continuous scale over `values`; `Empty` when there are none.
    pub fn continuous(values: impl IntoIterator<Item = f64>) -> ColorScale {
        let mut bounds: Option<(f64, f64)> = None;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            bounds = Some(match bounds {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
        match bounds {
            Some((min, max)) => ColorScale::Continuous { min, max },
            None => ColorScale::Empty,
        }
    }

    pub fn grad_color(&self, v: f64) -> Option<String> {
        match *self {
            ColorScale::Continuous { min, max } => {
                let t = LinearScale::new((min, max), (0.0, 1.0)).map(v);
                Some(GRAD_LOW_COLOR.lerp(GRAD_HIGH_COLOR, t).css())
            }
            _ => None,
        }
    }

    pub fn risk_color(&self, r: RiskCategory) -> Option<String> {
        match self {
            ColorScale::Ordinal => Some(risk_color(r).to_string()),
            _ => None,
        }
    }

    /// Domain in reverse order, as drawn top to bottom.
    pub fn legend(&self) -> Vec<LegendEntry> {
        match *self {
            ColorScale::Continuous { min, max } => [max, min]
                .into_iter()
                .map(|v| LegendEntry {
                    color: self.grad_color(v).unwrap_or_default(),
                    label: fmt_fixed(v, 1),
                })
                .collect(),
            ColorScale::Ordinal => RiskCategory::all()
                .iter()
                .rev()
                .map(|&r| LegendEntry {
                    color: risk_color(r).to_string(),
                    label: r.label().to_string(),
                })
                .collect(),
            ColorScale::Empty => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn linear_maps_and_inverts_ranges() {
        let lat = LinearScale::new((24.0, 50.0), (480.0, 20.0));
        assert!(close(lat.map(24.0), 480.0));
        assert!(close(lat.map(50.0), 20.0));
        assert!(close(lat.map(37.0), 250.0));
        // outside the domain extrapolates instead of clamping
        assert!(lat.map(60.0) < 20.0);
    }

    #[test]
    fn zero_width_domain_maps_to_middle() {
        let s = LinearScale::new((2020.0, 2020.0), (40.0, 140.0));
        assert!(close(s.map(2020.0), 90.0));
        assert_eq!(s.ticks(10), vec![2020.0]);
    }

    #[test]
    fn ticks_land_on_round_steps() {
        assert_eq!(ticks(0.0, 100.0, 10), vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]);
        assert_eq!(ticks(0.0, 100.0, 5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(ticks(0.0, 0.42, 5), vec![0.0, 0.1, 0.2, 0.3, 0.4]);
        assert_eq!(ticks(2018.0, 2021.0, 3), vec![2018.0, 2019.0, 2020.0, 2021.0]);
        assert_eq!(ticks(1.0, 0.0, 2), vec![1.0, 0.5, 0.0]);
        assert!(ticks(0.0, 1.0, 0).is_empty());
        assert!(close(LinearScale::new((0.0, 0.42), (0.0, 1.0)).tick_step(5), 0.1));
    }

    #[test]
    fn band_scale_pads_and_orders() {
        let b = BandScale::new(vec!["Actual".into(), "Predicted".into()], (40.0, 240.0), 0.3);
        // step = 200 / 2.3, first band starts one outer padding in
        let step = 200.0 / 2.3;
        assert!(close(b.bandwidth(), step * 0.7));
        assert!(close(b.position("Actual").unwrap(), 40.0 + step * 0.3));
        assert!(close(b.position("Predicted").unwrap(), 40.0 + step * 1.3));
        assert!(b.position("Other").is_none());

        let rev = BandScale::new(vec!["a".into(), "b".into()], (240.0, 40.0), 0.3);
        assert!(rev.position("a").unwrap() > rev.position("b").unwrap());
    }

    #[test]
    fn empty_band_scale_does_not_divide_by_zero() {
        let b = BandScale::new(Vec::new(), (480.0, 20.0), 0.3);
        assert!(b.bandwidth().is_finite());
        assert!(b.position("x").is_none());
    }

    #[test]
    fn continuous_colors_interpolate_between_endpoints() {
        let c = ColorScale::continuous([30.0, 90.0, 60.0]);
        assert_eq!(c, ColorScale::Continuous { min: 30.0, max: 90.0 });
        assert_eq!(c.grad_color(30.0).unwrap(), "rgb(255, 255, 204)");
        assert_eq!(c.grad_color(90.0).unwrap(), "rgb(0, 81, 186)");
        assert_eq!(c.grad_color(60.0).unwrap(), "rgb(128, 168, 195)");

        let legend = c.legend();
        assert_eq!(legend.len(), 2);
        assert_eq!(legend[0].label, "90.0");
        assert_eq!(legend[1].label, "30.0");
    }

    #[test]
    fn empty_domain_is_a_quiet_no_op() {
        let c = ColorScale::continuous(std::iter::empty());
        assert_eq!(c, ColorScale::Empty);
        assert!(c.grad_color(50.0).is_none());
        assert!(c.legend().is_empty());
    }

    #[test]
    fn ordinal_legend_lists_high_first() {
        let labels: Vec<String> = ColorScale::Ordinal.legend().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["High", "Medium", "Low"]);
        assert_eq!(ColorScale::Ordinal.risk_color(RiskCategory::Low).unwrap(), "#2ca02c");
    }
}
