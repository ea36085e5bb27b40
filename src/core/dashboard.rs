//! Owned application state and the single mutation entry point.
//!
//! Controls translate user input into an [`Action`]; [`Dashboard::dispatch`]
//! applies it, recomputes the filtered subset when the action touches a
//! filter, and returns the set of views that must be repainted.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::charts::{self, MapScene};
use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::filter::FilterState;
use crate::model::{InstitutionRecord, ModelName, OutcomeKind, RecordKey, Sector, SizeCategory};
use crate::profile::{self, HalfWidth, ProfileCard, TooltipContent, TrendScene};
use crate::scene::Scene;
use crate::whatif::{Slider, WhatIfPanel};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectYear(i32),
    SelectModel(ModelName),
    SelectOutcome(OutcomeKind),
    /// `None` is "All States".
    SelectState(Option<String>),
    SetSectors(BTreeSet<Sector>),
    ToggleSector(Sector, bool),
    SetSizes(BTreeSet<SizeCategory>),
    ToggleSize(SizeCategory, bool),
    SelectInstitution(RecordKey),
    AdjustWhatIf(Slider, f64),
    ResetWhatIf,
}

/// Views invalidated by an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Redraw {
    pub map: bool,
    pub importance: bool,
    pub profile: bool,
    pub comparison: bool,
    pub trend: bool,
    pub whatif: bool,
}

impl Redraw {
    pub const NONE: Redraw = Redraw {
        map: false,
        importance: false,
        profile: false,
        comparison: false,
        trend: false,
        whatif: false,
    };

    const FILTERED: Redraw = Redraw {
        map: true,
        importance: true,
        ..Redraw::NONE
    };

    pub fn is_empty(&self) -> bool {
        *self == Redraw::NONE
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Dataset,
    config: DashboardConfig,
    state: FilterState,
    whatif: Option<WhatIfPanel>,
}

impl Dashboard {
    /// Starts on `config.default_model`, or on the first model the data
    /// carries predictions for when the default has none.
    pub fn new(dataset: Dataset, config: DashboardConfig) -> Self {
        let available = dataset.available_models();
        let model = match available.first() {
            Some(&first) if !available.contains(&config.default_model) => {
                warn!(
                    default = %config.default_model,
                    using = %first,
                    "default model has no predictions"
                );
                first
            }
            _ => config.default_model,
        };
        let state = FilterState::new(&dataset, model);
        Self {
            dataset,
            config,
            state,
            whatif: None,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn whatif(&self) -> Option<&WhatIfPanel> {
        self.whatif.as_ref()
    }

    pub fn selected(&self) -> Option<&InstitutionRecord> {
        self.state.selected_record(&self.dataset)
    }

    pub fn dispatch(&mut self, action: Action) -> Redraw {
        debug!(?action, "dispatch");
        let ds = &self.dataset;
        let st = &mut self.state;
        match action {
            Action::SelectYear(y) => st.update_filters(ds, |f| f.year = y),
            Action::SelectOutcome(o) => st.outcome = o,
            Action::SelectState(s) => {
                st.update_filters(ds, |f| f.state = s.filter(|s| !s.is_empty()))
            }
            Action::SetSectors(set) => st.update_filters(ds, |f| f.sectors = set),
            Action::ToggleSector(s, on) => {
                st.update_filters(ds, |f| toggle(&mut f.sectors, s, on))
            }
            Action::SetSizes(set) => st.update_filters(ds, |f| f.sizes = set),
            Action::ToggleSize(s, on) => {
                st.update_filters(ds, |f| toggle(&mut f.sizes, s, on))
            }
            Action::SelectModel(m) => {
                st.model = m;
                return Redraw {
                    importance: true,
                    comparison: st.selected.is_some(),
                    ..Redraw::NONE
                };
            }
            Action::SelectInstitution(key) => {
                let Some(r) = ds.index_of(key).and_then(|i| ds.record(i)) else {
                    return Redraw::NONE;
                };
                st.selected = Some(key);
                self.whatif = Some(WhatIfPanel::seeded(r));
                return Redraw {
                    profile: true,
                    comparison: true,
                    trend: true,
                    whatif: true,
                    ..Redraw::NONE
                };
            }
            Action::AdjustWhatIf(slider, v) => {
                let Some(panel) = self.whatif.as_mut() else {
                    return Redraw::NONE;
                };
                panel.adjust(slider, v);
                return Redraw {
                    whatif: true,
                    comparison: true,
                    ..Redraw::NONE
                };
            }
            Action::ResetWhatIf => {
                let Some(panel) = self.whatif.as_mut() else {
                    return Redraw::NONE;
                };
                panel.reset();
                return Redraw {
                    whatif: true,
                    comparison: true,
                    ..Redraw::NONE
                };
            }
        }
        Redraw::FILTERED
    }

    pub fn map_scene(&self, parent_width: f64) -> MapScene {
        charts::map_scene(
            &self.dataset,
            &self.state,
            charts::full_width(parent_width),
            self.config.map_height,
        )
    }

    pub fn importance_scene(&self, parent_width: f64) -> Scene {
        charts::importance_scene(
            &self.dataset,
            &self.state,
            charts::full_width(parent_width),
            self.config.importance_height,
        )
    }

    pub fn profile_card(&self) -> Option<ProfileCard> {
        self.selected().map(ProfileCard::from_record)
    }

    /// Reads only the stored record; what-if slider values do not feed it.
    pub fn comparison_scene(&self, parent_width: f64) -> Option<Scene> {
        let r = self.selected()?;
        let bars = profile::comparison_bars(
            r,
            self.state.outcome,
            self.state.model,
            self.config.reference_model,
        );
        Some(profile::comparison_scene(
            &bars,
            HalfWidth::from_parent(parent_width),
            self.config.comparison_height,
        ))
    }

    pub fn trend_scene(&self, parent_width: f64) -> Option<TrendScene> {
        let key = self.state.selected?;
        Some(profile::trend_scene(
            &self.dataset,
            key.unitid,
            HalfWidth::from_parent(parent_width),
            self.config.trend_height,
        ))
    }

    pub fn tooltip(&self, key: RecordKey) -> Option<TooltipContent> {
        let r = self.dataset.record(self.dataset.index_of(key)?)?;
        Some(profile::tooltip_content(r, self.state.outcome, self.state.model))
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, v: T, on: bool) {
    if on {
        set.insert(v);
    } else {
        set.remove(&v);
    }
}
