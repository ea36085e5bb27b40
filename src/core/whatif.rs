//! Scenario sliders seeded from the selected record.
//!
//! Slider values are display-only: nothing re-scores a prediction from them.

use crate::fmt::{fmt_dollars, fmt_fixed, fmt_fraction_percent, fmt_percent};
use crate::model::InstitutionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slider {
    Pell,
    Admission,
    Retention,
    Ratio,
    Spend,
}

impl Slider {
    pub fn all() -> &'static [Slider] {
        &[
            Slider::Pell,
            Slider::Admission,
            Slider::Retention,
            Slider::Ratio,
            Slider::Spend,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Slider::Pell => "Pell %",
            Slider::Admission => "Admission Rate",
            Slider::Retention => "Retention Rate",
            Slider::Ratio => "Student-Faculty Ratio",
            Slider::Spend => "Spending per Student",
        }
    }

    /// Element id of the range input.
    pub fn input_id(self) -> &'static str {
        match self {
            Slider::Pell => "pell-slider",
            Slider::Admission => "admission-slider",
            Slider::Retention => "retention-slider",
            Slider::Ratio => "ratio-slider",
            Slider::Spend => "spend-slider",
        }
    }

    /// Element id of the live value label.
    pub fn value_id(self) -> &'static str {
        match self {
            Slider::Pell => "pell-val",
            Slider::Admission => "admission-val",
            Slider::Retention => "retention-val",
            Slider::Ratio => "ratio-val",
            Slider::Spend => "spend-val",
        }
    }

    /// `(min, max, step)`.
    pub fn range(self) -> (f64, f64, f64) {
        match self {
            Slider::Pell => (0.0, 100.0, 0.1),
            Slider::Admission | Slider::Retention => (0.0, 1.0, 0.01),
            Slider::Ratio => (5.0, 40.0, 0.1),
            Slider::Spend => (5000.0, 30000.0, 500.0),
        }
    }

    pub fn format(self, v: f64) -> String {
        match self {
            Slider::Pell => fmt_percent(v, 1),
            Slider::Admission | Slider::Retention => fmt_fraction_percent(v, 1),
            Slider::Ratio => fmt_fixed(v, 1),
            Slider::Spend => fmt_dollars(v),
        }
    }

    /// `value` attribute text for the range input: clamped, snapped to the
    /// step, at the step's precision.
    pub fn input_value(self, v: f64) -> String {
        let decimals = match self {
            Slider::Pell | Slider::Ratio => 1,
            Slider::Admission | Slider::Retention => 2,
            Slider::Spend => 0,
        };
        fmt_fixed(self.snap(v), decimals)
    }

    fn index(self) -> usize {
        match self {
            Slider::Pell => 0,
            Slider::Admission => 1,
            Slider::Retention => 2,
            Slider::Ratio => 3,
            Slider::Spend => 4,
        }
    }

    fn seed(self, r: &InstitutionRecord) -> f64 {
        match self {
            Slider::Pell => r.pell_percentage,
            Slider::Admission => r.admission_rate,
            Slider::Retention => r.retention_rate,
            Slider::Ratio => r.student_faculty_ratio,
            Slider::Spend => r.spending_per_student,
        }
    }

    /// Range-input semantics: out-of-range and non-finite inputs land on a bound.
    pub fn clamp(self, v: f64) -> f64 {
        let (min, max, _) = self.range();
        if v.is_nan() {
            return min;
        }
        v.clamp(min, max)
    }

    /// Clamp, then round to the nearest step counted from the minimum.
    pub fn snap(self, v: f64) -> f64 {
        let (min, max, step) = self.range();
        let v = self.clamp(v);
        (min + ((v - min) / step).round() * step).min(max)
    }
}

/// Slider state for one record. Labels start at the record's raw values,
/// even outside a slider's range; the range input itself only ever shows
/// the snapped value.
#[derive(Debug, Clone, PartialEq)]
pub struct WhatIfPanel {
    seed: [f64; 5],
    current: [f64; 5],
}

impl WhatIfPanel {
    pub fn seeded(r: &InstitutionRecord) -> Self {
        let mut seed = [0.0; 5];
        for &s in Slider::all() {
            seed[s.index()] = s.seed(r);
        }
        Self {
            seed,
            current: seed,
        }
    }

    pub fn value(&self, s: Slider) -> f64 {
        self.current[s.index()]
    }

    pub fn label(&self, s: Slider) -> String {
        s.format(self.value(s))
    }

    /// Stores the clamped value and returns its label.
    pub fn adjust(&mut self, s: Slider, v: f64) -> String {
        self.current[s.index()] = s.clamp(v);
        self.label(s)
    }

    /// Back to the seed as the range input holds it: clamped and snapped.
    pub fn reset(&mut self) {
        for &s in Slider::all() {
            self.current[s.index()] = s.snap(self.seed[s.index()]);
        }
    }

    /// True once any value differs from both the raw seed and its reset value.
    #[cfg(test)]
    fn is_modified(&self) -> bool {
        Slider::all().iter().any(|&s| {
            let (seed, v) = (self.seed[s.index()], self.current[s.index()]);
            v != seed && v != s.snap(seed)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::row;

    fn panel() -> WhatIfPanel {
        let r: InstitutionRecord = serde_json::from_str(&row(3, 2020, "TX", "Public", "Large")).unwrap();
        WhatIfPanel::seeded(&r)
    }

    #[test]
    fn seeded_labels_match_record() {
        let p = panel();
        let labels: Vec<String> = Slider::all().iter().map(|&s| p.label(s)).collect();
        assert_eq!(labels, vec!["30.0%", "50.0%", "80.0%", "15.0", "$15000"]);
        assert!(!p.is_modified());
    }

    #[test]
    fn adjust_clamps_and_reset_restores() {
        let mut p = panel();
        assert_eq!(p.adjust(Slider::Admission, 0.333), "33.3%");
        assert_eq!(p.adjust(Slider::Spend, 90_000.0), "$30000");
        assert_eq!(p.adjust(Slider::Ratio, -3.0), "5.0");
        assert_eq!(p.adjust(Slider::Pell, f64::NAN), "0.0%");
        assert!(p.is_modified());

        p.reset();
        assert!(!p.is_modified());
        assert_eq!(p.value(Slider::Spend), 15000.0);
        assert_eq!(p.label(Slider::Ratio), "15.0");
    }

    #[test]
    fn out_of_range_seed_labels_raw_value_until_reset() {
        let mut r: InstitutionRecord =
            serde_json::from_str(&row(3, 2020, "TX", "Public", "Large")).unwrap();
        r.spending_per_student = 45_000.0;
        r.student_faculty_ratio = 3.2;
        let mut p = WhatIfPanel::seeded(&r);
        assert_eq!(p.label(Slider::Spend), "$45000");
        assert_eq!(p.label(Slider::Ratio), "3.2");
        assert_eq!(Slider::Spend.input_value(p.value(Slider::Spend)), "30000");
        assert_eq!(Slider::Ratio.input_value(p.value(Slider::Ratio)), "5.0");
        assert!(!p.is_modified());

        p.reset();
        assert_eq!(p.label(Slider::Spend), "$30000");
        assert_eq!(p.label(Slider::Ratio), "5.0");
        assert!(!p.is_modified());
    }

    #[test]
    fn input_values_follow_step_precision() {
        assert_eq!(Slider::Admission.input_value(0.5), "0.50");
        assert_eq!(Slider::Spend.input_value(15000.0), "15000");
        assert_eq!(Slider::Spend.input_value(12_260.0), "12500");
        assert_eq!(Slider::Pell.input_value(41.26), "41.3");
        assert_eq!(Slider::Admission.input_value(f64::NAN), "0.00");
    }

    #[test]
    fn element_ids_are_unique() {
        let mut ids: Vec<&str> = Slider::all()
            .iter()
            .flat_map(|s| [s.input_id(), s.value_id()])
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }
}
