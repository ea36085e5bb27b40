//! Graduation-rate dashboard core: data loading, filter state, chart scenes.
//!
//! Everything here is platform-neutral. The wasm front-end in
//! `crates/gradviz_web` paints [`scene::Scene`]s onto canvases; the
//! `gradviz-snapshot` binary writes them out as SVG.

#[path = "core/fmt.rs"]
pub mod fmt;

#[path = "core/model.rs"]
pub mod model;

#[path = "core/dataset.rs"]
pub mod dataset;

#[path = "core/config.rs"]
pub mod config;

#[path = "core/filter.rs"]
pub mod filter;

#[path = "core/scale.rs"]
pub mod scale;

#[path = "core/scene.rs"]
pub mod scene;

#[path = "core/charts.rs"]
pub mod charts;

#[path = "core/profile.rs"]
pub mod profile;

#[path = "core/whatif.rs"]
pub mod whatif;

#[path = "core/dashboard.rs"]
pub mod dashboard;

pub use config::DashboardConfig;
pub use dashboard::{Action, Dashboard, Redraw};
pub use dataset::{Dataset, LoadError};
pub use model::{InstitutionRecord, ModelName, OutcomeKind, RecordKey};
