use gradviz::fmt::fmt_tick;
use gradviz::whatif::Slider;
use gradviz::Action;
use leptos::prelude::*;

use super::state::AppState;
use crate::ui_model::{RESET_BUTTON_ID, WHATIF_SECTION_ID};

#[component]
fn SliderRow(app: AppState, slider: Slider) -> impl IntoView {
    let (min, max, step) = slider.range();
    let panel_value = move || {
        app.views.whatif.track();
        app.with(|d| d.whatif().map(|p| p.value(slider))).flatten()
    };
    let label = move || {
        app.views.whatif.track();
        app.with(|d| d.whatif().map(|p| p.label(slider)))
            .flatten()
            .unwrap_or_default()
    };

    view! {
        <label class="slider-row">
            <span class="slider-name">{slider.label()}</span>
            <input
                type="range"
                id=slider.input_id()
                min=slider.input_value(min)
                max=slider.input_value(max)
                step=fmt_tick(step, step)
                prop:value=move || panel_value().map(|v| slider.input_value(v)).unwrap_or_default()
                on:input=move |ev| {
                    if let Ok(v) = event_target_value(&ev).parse::<f64>() {
                        app.dispatch(Action::AdjustWhatIf(slider, v));
                    }
                }
            />
            <span id=slider.value_id() class="slider-value">{label}</span>
        </label>
    }
}

/// Scenario sliders for the selected institution. Display-only: moving them
/// updates the labels and nothing else.
#[component]
pub(super) fn WhatIfSection(app: AppState) -> impl IntoView {
    let display = move || {
        app.views.whatif.track();
        let seeded = app.with(|d| d.whatif().is_some()).unwrap_or(false);
        if seeded { "block" } else { "none" }
    };

    view! {
        <section id=WHATIF_SECTION_ID class="whatif" style:display=display>
            <h2>"What-If Analysis"</h2>
            {Slider::all()
                .iter()
                .map(|&slider| view! { <SliderRow app=app slider=slider /> })
                .collect_view()}
            <button id=RESET_BUTTON_ID on:click=move |_| app.dispatch(Action::ResetWhatIf)>
                "Reset"
            </button>
        </section>
    }
}
