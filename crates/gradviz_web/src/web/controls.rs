use gradviz::model::{Sector, SizeCategory};
use gradviz::{Action, ModelName, OutcomeKind};
use leptos::prelude::*;

use super::state::AppState;
use crate::ui_model::{
    self, SelectOption, MODEL_SELECT_ID, OUTCOME_TOGGLE_ID, SECTOR_GROUP, SIZE_GROUP,
    STATE_SELECT_ID, YEAR_SELECT_ID,
};

#[component]
fn Options(options: Vec<SelectOption>, selected: String) -> impl IntoView {
    options
        .into_iter()
        .map(|o| {
            let is_selected = o.value == selected;
            view! { <option value=o.value selected=is_selected>{o.label}</option> }
        })
        .collect_view()
}

/// Year, model, outcome and state selectors plus the sector/size checkbox
/// groups. Rendered once, after the data has loaded.
#[component]
pub(super) fn FilterControls(app: AppState) -> impl IntoView {
    let (years, states, models, year, model, outcome) = app
        .with(|d| {
            let st = d.state();
            (
                ui_model::year_options(d.dataset().years()),
                ui_model::state_options(d.dataset().states()),
                ui_model::model_options(&d.dataset().available_models()),
                st.filters().year.to_string(),
                st.model.suffix().to_string(),
                st.outcome.value().to_string(),
            )
        })
        .unwrap_or_default();

    view! {
        <section class="controls">
            <label>
                <span>"Year"</span>
                <select
                    id=YEAR_SELECT_ID
                    on:change=move |ev| {
                        if let Some(y) = ui_model::parse_year(&event_target_value(&ev)) {
                            app.dispatch(Action::SelectYear(y));
                        }
                    }
                >
                    <Options options=years selected=year />
                </select>
            </label>

            <label>
                <span>"Model"</span>
                <select
                    id=MODEL_SELECT_ID
                    on:change=move |ev| {
                        if let Some(m) = ModelName::parse(&event_target_value(&ev)) {
                            app.dispatch(Action::SelectModel(m));
                        }
                    }
                >
                    <Options options=models selected=model />
                </select>
            </label>

            <label>
                <span>"Outcome"</span>
                <select
                    id=OUTCOME_TOGGLE_ID
                    on:change=move |ev| {
                        if let Some(o) = OutcomeKind::parse(&event_target_value(&ev)) {
                            app.dispatch(Action::SelectOutcome(o));
                        }
                    }
                >
                    <Options options=ui_model::outcome_options() selected=outcome />
                </select>
            </label>

            <label>
                <span>"State"</span>
                <select
                    id=STATE_SELECT_ID
                    on:change=move |ev| {
                        let state = ui_model::parse_state(&event_target_value(&ev));
                        app.dispatch(Action::SelectState(state));
                    }
                >
                    <Options options=states selected=String::new() />
                </select>
            </label>

            <fieldset class="checkbox-group">
                <legend>"Sector"</legend>
                {ui_model::sector_checkboxes()
                    .into_iter()
                    .map(|o| {
                        let sector = Sector::parse(&o.value);
                        view! {
                            <label>
                                <input
                                    type="checkbox"
                                    name=SECTOR_GROUP
                                    value=o.value
                                    prop:checked=true
                                    on:change=move |ev| {
                                        if let Some(s) = sector {
                                            app.dispatch(Action::ToggleSector(s, event_target_checked(&ev)));
                                        }
                                    }
                                />
                                {o.label}
                            </label>
                        }
                    })
                    .collect_view()}
            </fieldset>

            <fieldset class="checkbox-group">
                <legend>"Size"</legend>
                {ui_model::size_checkboxes()
                    .into_iter()
                    .map(|o| {
                        let size = SizeCategory::parse(&o.value);
                        view! {
                            <label>
                                <input
                                    type="checkbox"
                                    name=SIZE_GROUP
                                    value=o.value
                                    prop:checked=true
                                    on:change=move |ev| {
                                        if let Some(s) = size {
                                            app.dispatch(Action::ToggleSize(s, event_target_checked(&ev)));
                                        }
                                    }
                                />
                                {o.label}
                            </label>
                        }
                    })
                    .collect_view()}
            </fieldset>
        </section>
    }
}
