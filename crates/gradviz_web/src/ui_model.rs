//! Control inventory and option lists that should be available on both wasm
//! and native.
//!
//! Keeping these out of the wasm-only `web` module allows us to unit-test the
//! element ids and select contents on the host.

use gradviz::model::{ModelName, OutcomeKind, Sector, SizeCategory};

pub const MAP_CANVAS_ID: &str = "map-svg";
pub const IMPORTANCE_CANVAS_ID: &str = "importance-svg";
pub const COMPARISON_CANVAS_ID: &str = "comparison-svg";
pub const TREND_CANVAS_ID: &str = "trend-svg";

pub const YEAR_SELECT_ID: &str = "year-select";
pub const MODEL_SELECT_ID: &str = "model-select";
pub const OUTCOME_TOGGLE_ID: &str = "outcome-toggle";
pub const STATE_SELECT_ID: &str = "state-select";
pub const RESET_BUTTON_ID: &str = "reset-button";

pub const PROFILE_SECTION_ID: &str = "profile-section";
pub const WHATIF_SECTION_ID: &str = "whatif-section";

/// Checkbox group names.
pub const SECTOR_GROUP: &str = "sector";
pub const SIZE_GROUP: &str = "size";

pub const ALL_STATES_LABEL: &str = "All States";

/// Used until the first layout pass reports a real parent width.
pub const FALLBACK_PARENT_WIDTH: f64 = 1200.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

pub fn year_options(years: &[i32]) -> Vec<SelectOption> {
    years
        .iter()
        .map(|y| SelectOption::new(y.to_string(), y.to_string()))
        .collect()
}

pub fn model_options(models: &[ModelName]) -> Vec<SelectOption> {
    models
        .iter()
        .map(|m| SelectOption::new(m.suffix(), m.display_name()))
        .collect()
}

pub fn outcome_options() -> Vec<SelectOption> {
    OutcomeKind::all()
        .iter()
        .map(|o| SelectOption::new(o.value(), o.label()))
        .collect()
}

/// "All States" first, with an empty value meaning no state filter.
pub fn state_options(states: &[String]) -> Vec<SelectOption> {
    std::iter::once(SelectOption::new("", ALL_STATES_LABEL))
        .chain(states.iter().map(|s| SelectOption::new(s.as_str(), s.as_str())))
        .collect()
}

pub fn parse_state(value: &str) -> Option<String> {
    let v = value.trim();
    (!v.is_empty()).then(|| v.to_string())
}

pub fn parse_year(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

/// `(value, label)` for each checkbox in a group.
pub fn sector_checkboxes() -> Vec<SelectOption> {
    Sector::all()
        .iter()
        .map(|s| SelectOption::new(s.label(), s.label()))
        .collect()
}

pub fn size_checkboxes() -> Vec<SelectOption> {
    SizeCategory::all()
        .iter()
        .map(|s| SelectOption::new(s.label(), s.label()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradviz::whatif::Slider;

    fn element_ids() -> Vec<&'static str> {
        let mut ids = vec![
            MAP_CANVAS_ID,
            IMPORTANCE_CANVAS_ID,
            COMPARISON_CANVAS_ID,
            TREND_CANVAS_ID,
            YEAR_SELECT_ID,
            MODEL_SELECT_ID,
            OUTCOME_TOGGLE_ID,
            STATE_SELECT_ID,
            RESET_BUTTON_ID,
            PROFILE_SECTION_ID,
            WHATIF_SECTION_ID,
        ];
        for s in Slider::all() {
            ids.push(s.input_id());
            ids.push(s.value_id());
        }
        ids
    }

    #[test]
    fn element_ids_are_unique() {
        let ids = element_ids();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
        assert!(ids.contains(&"pell-val"));
        assert!(ids.contains(&"spend-slider"));
    }

    #[test]
    fn state_select_starts_with_all_states() {
        let opts = state_options(&["CA".to_string(), "NY".to_string()]);
        assert_eq!(opts[0], SelectOption::new("", "All States"));
        assert_eq!(opts.len(), 3);
        assert_eq!(parse_state(&opts[0].value), None);
        assert_eq!(parse_state(&opts[2].value), Some("NY".to_string()));
    }

    #[test]
    fn select_values_round_trip_through_parsers() {
        for opt in model_options(ModelName::all()) {
            assert!(ModelName::parse(&opt.value).is_some(), "{}", opt.value);
        }
        for opt in outcome_options() {
            assert!(OutcomeKind::parse(&opt.value).is_some(), "{}", opt.value);
        }
        for opt in sector_checkboxes() {
            assert!(Sector::parse(&opt.value).is_some(), "{}", opt.value);
        }
        for opt in size_checkboxes() {
            assert!(SizeCategory::parse(&opt.value).is_some(), "{}", opt.value);
        }
        assert_eq!(parse_year(&year_options(&[2019, 2020])[1].value), Some(2020));
        assert_eq!(parse_year("not a year"), None);
    }
}
