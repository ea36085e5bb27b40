use gradviz::scene::Scene;
use gradviz::{Action, Dashboard, DashboardConfig};
use leptos::prelude::*;
use tracing::{error, info, warn};
use wasm_bindgen_futures::spawn_local;

use crate::ui_model::{
    COMPARISON_CANVAS_ID, FALLBACK_PARENT_WIDTH, IMPORTANCE_CANVAS_ID, MAP_CANVAS_ID,
    PROFILE_SECTION_ID, TREND_CANVAS_ID,
};

mod canvas;
mod controls;
mod loader;
mod state;
mod tooltip;
mod whatif;

use controls::FilterControls;
use state::AppState;
use tooltip::{TooltipPayload, TooltipPortal, TooltipStore};
use whatif::WhatIfSection;

pub fn start() {
    _ = console_log::init_with_level(log::Level::Info);
    console_error_panic_hook::set_once();
    mount_to_body(|| view! { <App /> });
}

#[component]
fn App() -> impl IntoView {
    let app = AppState::new();
    let (loaded, set_loaded) = signal(false);
    let tooltip: TooltipStore = RwSignal::new(None);

    // Failure leaves the page unrendered; the console carries the error.
    spawn_local(async move {
        let config = DashboardConfig::default();
        match loader::load_dataset(&config).await {
            Ok(ds) => {
                info!(records = ds.institutions().len(), "dashboard ready");
                app.install(Dashboard::new(ds, config));
                set_loaded.set(true);
            }
            Err(e) => error!(error = %e, "dashboard data failed to load"),
        }
    });

    view! {
        <main class="dashboard">
            <h1>"Graduation Outcomes Explorer"</h1>
            <Show when=move || loaded.get() fallback=|| ()>
                <FilterControls app=app />
                <MapPanel app=app tooltip=tooltip />
                <SceneCanvas
                    app=app
                    id=IMPORTANCE_CANVAS_ID
                    title="Feature Importance"
                    generation=app.views.importance
                    render=render_importance
                />
                <ProfileSection app=app />
                <WhatIfSection app=app />
            </Show>
            <TooltipPortal store=tooltip />
        </main>
    }
}

fn render_importance(d: &Dashboard, width: f64) -> Option<Scene> {
    Some(d.importance_scene(width))
}

fn render_comparison(d: &Dashboard, width: f64) -> Option<Scene> {
    d.comparison_scene(width)
}

fn render_trend(d: &Dashboard, width: f64) -> Option<Scene> {
    d.trend_scene(width).map(|t| t.scene)
}

/// A canvas repainted whenever `generation` moves. A `None` scene leaves
/// the previous paint in place.
#[component]
fn SceneCanvas(
    app: AppState,
    id: &'static str,
    title: &'static str,
    generation: RwSignal<u64>,
    render: fn(&Dashboard, f64) -> Option<Scene>,
) -> impl IntoView {
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

    Effect::new(move |_| {
        generation.track();
        let Some(el) = canvas_ref.get() else {
            return;
        };
        let width = canvas::parent_width(&el, FALLBACK_PARENT_WIDTH);
        let Some(scene) = app.with(|d| render(d, width)).flatten() else {
            return;
        };
        if let Err(e) = canvas::paint_scene(&el, &scene) {
            warn!(canvas = id, error = %e, "paint failed");
        }
    });

    view! {
        <div class="chart">
            <h3>{title}</h3>
            <canvas id=id node_ref=canvas_ref></canvas>
        </div>
    }
}

#[component]
fn MapPanel(app: AppState, tooltip: TooltipStore) -> impl IntoView {
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    // Last painted map; its marks answer hover and click hit tests.
    let painted = StoredValue::new(Scene::default());

    Effect::new(move |_| {
        app.views.map.track();
        let Some(el) = canvas_ref.get() else {
            return;
        };
        let width = canvas::parent_width(&el, FALLBACK_PARENT_WIDTH);
        let Some(map) = app.with(|d| d.map_scene(width)) else {
            return;
        };
        if let Err(e) = canvas::paint_scene(&el, &map.scene) {
            warn!(canvas = MAP_CANVAS_ID, error = %e, "paint failed");
        }
        painted.set_value(map.scene);
        tooltip.set(None);
    });

    let hit = move |ev: &web_sys::MouseEvent| {
        painted.with_value(|s| s.hit_test(ev.offset_x() as f64, ev.offset_y() as f64))
    };

    let on_move = move |ev: web_sys::MouseEvent| {
        let content = hit(&ev).and_then(|key| app.with(|d| d.tooltip(key)).flatten());
        tooltip.set(content.map(|c| {
            TooltipPayload::at_pointer(c, ev.page_x() as f64, ev.page_y() as f64)
        }));
    };

    let on_click = move |ev: web_sys::MouseEvent| {
        if let Some(key) = hit(&ev) {
            app.dispatch(Action::SelectInstitution(key));
        }
    };

    view! {
        <div class="chart">
            <h3>"Institutions"</h3>
            <canvas
                id=MAP_CANVAS_ID
                node_ref=canvas_ref
                on:mousemove=on_move
                on:mouseleave=move |_| tooltip.set(None)
                on:click=on_click
            ></canvas>
        </div>
    }
}

#[component]
fn ProfileSection(app: AppState) -> impl IntoView {
    let card = move || {
        app.views.profile.track();
        app.with(|d| d.profile_card()).flatten()
    };

    view! {
        <section
            id=PROFILE_SECTION_ID
            class="profile"
            style:display=move || if card().is_some() { "block" } else { "none" }
        >
            {move || {
                card()
                    .map(|c| {
                        let rows = c
                            .rows()
                            .into_iter()
                            .map(|(label, value)| {
                                let value = value.to_string();
                                view! {
                                    <dt>{label}</dt>
                                    <dd>{value}</dd>
                                }
                            })
                            .collect_view();
                        view! {
                            <h2>{c.name.clone()}</h2>
                            <dl class="profile-fields">{rows}</dl>
                        }
                    })
            }}
            <div class="profile-charts">
                <SceneCanvas
                    app=app
                    id=COMPARISON_CANVAS_ID
                    title="Actual vs Predicted"
                    generation=app.views.comparison
                    render=render_comparison
                />
                <SceneCanvas
                    app=app
                    id=TREND_CANVAS_ID
                    title="Graduation Rate Trend"
                    generation=app.views.trend
                    render=render_trend
                />
            </div>
        </section>
    }
}
