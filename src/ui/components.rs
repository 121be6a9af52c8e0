/// Reusable UI components

use patternfly_yew::prelude::*;
use wasm_bindgen::JsValue;
use yew::prelude::*;

use crate::link_data::LinkEntry;
use crate::operations::AgeLabel;

#[derive(Properties, PartialEq)]
pub struct LinkRowProps {
    pub link: LinkEntry,
    /// Render time, ms since epoch
    pub now: f64,
    pub on_copy: Callback<String>,
    pub on_open: Callback<String>,
}

#[function_component(LinkRow)]
pub fn link_row(props: &LinkRowProps) -> Html {
    let link = &props.link;

    let on_row_click = {
        let url = link.url.clone();
        props.on_open.reform(move |_: MouseEvent| url.clone())
    };

    let on_copy_click = {
        let url = link.url.clone();
        props.on_copy.reform(move |e: MouseEvent| {
            e.stop_propagation();
            url.clone()
        })
    };

    let on_open_click = {
        let url = link.url.clone();
        props.on_open.reform(move |e: MouseEvent| {
            e.stop_propagation();
            url.clone()
        })
    };

    html! {
        <div class="link-item" onclick={on_row_click}>
            <div class="link-main">
                <div class="link-content">
                    <div class="link-title" title={link.title.clone()}>{&link.title}</div>
                    <div class="link-url" title={link.url.clone()}>{&link.domain}</div>
                </div>
                <div class="link-time">{age_text(link.timestamp, props.now)}</div>
            </div>
            <div class="link-actions">
                <Button
                    onclick={on_copy_click}
                    variant={ButtonVariant::Secondary}
                    size={ButtonSize::Small}
                >
                    {"⧉"}
                </Button>
                <Button onclick={on_open_click} size={ButtonSize::Small}>
                    {"⚡"}
                </Button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct StatusMessageProps {
    pub message: String,
    #[prop_or_default]
    pub hint: Option<String>,
}

/// Centered message for the empty and no-results states
#[function_component(StatusMessage)]
pub fn status_message(props: &StatusMessageProps) -> Html {
    html! {
        <div class="empty-state">
            <p>{&props.message}</p>
            if let Some(hint) = &props.hint {
                <p class="empty-state-hint">{hint}</p>
            }
        </div>
    }
}

/// Age label, with dates older than a week in the browser's local time
fn age_text(timestamp: f64, now: f64) -> String {
    AgeLabel::between(timestamp, now)
        .relative()
        .unwrap_or_else(|| format_local_date(timestamp))
}

fn format_local_date(timestamp: f64) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(timestamp));
    format!(
        "{:04}-{:02}-{:02}",
        date.get_full_year(),
        date.get_month() + 1,
        date.get_date()
    )
}
