use gradviz::fmt::fmt_fixed;
use gradviz::profile::TooltipContent;
use leptos::prelude::*;

/// Offset from the pointer so the box never sits under the cursor.
const POINTER_OFFSET_PX: f64 = 10.0;

#[derive(Clone, Debug, PartialEq)]
pub struct TooltipPayload {
    pub content: TooltipContent,
    pub top_px: f64,
    pub left_px: f64,
}

impl TooltipPayload {
    pub fn at_pointer(content: TooltipContent, page_x: f64, page_y: f64) -> Self {
        Self {
            content,
            top_px: page_y - POINTER_OFFSET_PX,
            left_px: page_x + POINTER_OFFSET_PX,
        }
    }
}

pub type TooltipStore = RwSignal<Option<TooltipPayload>>;

#[component]
pub fn TooltipPortal(store: TooltipStore) -> impl IntoView {
    let payload = Memo::new(move |_| store.get());

    view! {
        <Show when=move || payload.get().is_some() fallback=|| ()>
            {move || {
                let Some(p) = payload.get() else {
                    return ().into_any();
                };

                let top = fmt_fixed(p.top_px, 0);
                let left = fmt_fixed(p.left_px, 0);
                let style = format!("top: {top}px; left: {left}px;");
                let title = p.content.title;
                let lines = p.content.lines;

                view! {
                    <div class="tooltip" role="tooltip" style=style>
                        <div class="tooltip-title">{title}</div>
                        <For
                            each=move || lines.clone().into_iter().enumerate()
                            key=|(i, _)| *i
                            children=|(_i, line)| view! { <div>{line}</div> }
                        />
                    </div>
                }
                .into_any()
            }}
        </Show>
    }
}
