use gradviz::{Action, Dashboard, Redraw};
use leptos::prelude::*;
use tracing::debug;

/// One generation counter per view. Effects that paint a view track its
/// counter; bumping it repaints exactly that view.
#[derive(Clone, Copy)]
pub(super) struct Views {
    pub map: RwSignal<u64>,
    pub importance: RwSignal<u64>,
    pub profile: RwSignal<u64>,
    pub comparison: RwSignal<u64>,
    pub trend: RwSignal<u64>,
    pub whatif: RwSignal<u64>,
}

impl Views {
    fn new() -> Self {
        Self {
            map: RwSignal::new(0),
            importance: RwSignal::new(0),
            profile: RwSignal::new(0),
            comparison: RwSignal::new(0),
            trend: RwSignal::new(0),
            whatif: RwSignal::new(0),
        }
    }

    fn bump(&self, r: Redraw) {
        let pairs = [
            (r.map, self.map),
            (r.importance, self.importance),
            (r.profile, self.profile),
            (r.comparison, self.comparison),
            (r.trend, self.trend),
            (r.whatif, self.whatif),
        ];
        for (dirty, generation) in pairs {
            if dirty {
                generation.update(|g| *g += 1);
            }
        }
    }
}

/// Handle shared by every component: the owned dashboard plus its view
/// counters. Copy, so closures can capture it freely.
#[derive(Clone, Copy)]
pub(super) struct AppState {
    dash: StoredValue<Option<Dashboard>>,
    pub views: Views,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            dash: StoredValue::new(None),
            views: Views::new(),
        }
    }

    /// Installs a freshly loaded dashboard and paints the initial views.
    pub fn install(&self, dash: Dashboard) {
        self.dash.set_value(Some(dash));
        self.views.bump(Redraw {
            map: true,
            importance: true,
            ..Redraw::NONE
        });
    }

    pub fn dispatch(&self, action: Action) {
        let mut redraw = Redraw::NONE;
        self.dash.update_value(|d| {
            if let Some(d) = d.as_mut() {
                redraw = d.dispatch(action);
            }
        });
        if redraw.is_empty() {
            debug!("action changed nothing");
            return;
        }
        self.views.bump(redraw);
    }

    /// Read access; `None` until data has loaded.
    pub fn with<R>(&self, f: impl FnOnce(&Dashboard) -> R) -> Option<R> {
        self.dash.with_value(|d| d.as_ref().map(f))
    }
}
