//! Current selections and the subset of records they admit.

use std::collections::BTreeSet;

use crate::dataset::Dataset;
use crate::model::{InstitutionRecord, ModelName, OutcomeKind, RecordKey, Sector, SizeCategory};

/// The four predicates that decide which records reach the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub year: i32,
    /// `None` means every state.
    pub state: Option<String>,
    pub sectors: BTreeSet<Sector>,
    pub sizes: BTreeSet<SizeCategory>,
}

impl Filters {
    /// All sectors, all sizes, no state filter.
    pub fn permissive(year: i32) -> Self {
        Self {
            year,
            state: None,
            sectors: Sector::all().iter().copied().collect(),
            sizes: SizeCategory::all().iter().copied().collect(),
        }
    }

    pub fn admits(&self, r: &InstitutionRecord) -> bool {
        r.year == self.year
            && self.sectors.contains(&r.sector)
            && self.state.as_deref().map_or(true, |s| r.state == s)
            && self.sizes.contains(&r.school_size_category)
    }

    /// Indices of admitted records, in dataset order.
    pub fn apply(&self, ds: &Dataset) -> Vec<usize> {
        ds.institutions()
            .iter()
            .enumerate()
            .filter(|(_, r)| self.admits(r))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Every selection the controls can make, plus the derived subset.
///
/// `filters` and `filtered` are private: the predicates only change through
/// [`FilterState::update_filters`], which recomputes the subset in the same
/// call.
#[derive(Debug, Clone)]
pub struct FilterState {
    filters: Filters,
    pub model: ModelName,
    pub outcome: OutcomeKind,
    pub selected: Option<RecordKey>,
    filtered: Vec<usize>,
}

impl FilterState {
    /// Defaults: latest year, everything admitted, nothing selected.
    pub fn new(ds: &Dataset, model: ModelName) -> Self {
        let mut s = Self {
            filters: Filters::permissive(ds.latest_year()),
            model,
            outcome: OutcomeKind::default(),
            selected: None,
            filtered: Vec::new(),
        };
        s.refilter(ds);
        s
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Edits the predicates and recomputes the subset against `ds`.
    pub fn update_filters(&mut self, ds: &Dataset, edit: impl FnOnce(&mut Filters)) {
        edit(&mut self.filters);
        self.refilter(ds);
    }

    /// Recomputes the subset without changing the predicates.
    pub fn refilter(&mut self, ds: &Dataset) {
        self.filtered = self.filters.apply(ds);
    }

    pub fn filtered_indices(&self) -> &[usize] {
        &self.filtered
    }

    pub fn filtered<'a>(
        &'a self,
        ds: &'a Dataset,
    ) -> impl Iterator<Item = &'a InstitutionRecord> + 'a {
        self.filtered.iter().filter_map(move |&i| ds.record(i))
    }

    pub fn selected_record<'a>(&self, ds: &'a Dataset) -> Option<&'a InstitutionRecord> {
        self.selected
            .and_then(|k| ds.index_of(k))
            .and_then(|i| ds.record(i))
    }
}
