/// Popup UI for Link Locker: the searchable list of captured links

use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use patternfly_yew::prelude::*;
use crate::chrome::ChromeHost;
use crate::host::LinkStore;
use crate::link_data::{LinkEntry, DEFAULT_MAX_LINKS};
use crate::message::{Ack, Command};
use crate::operations::{filter_links, ViewState};
use crate::ui::components::{LinkRow, StatusMessage};

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn sendCommand(command: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn openTab(url: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn copyToClipboard(text: &str) -> Result<(), JsValue>;

    fn confirmAction(message: &str) -> bool;
}

const TOAST_MS: i32 = 2000;

#[derive(Clone, PartialEq)]
enum LoadState {
    Loading,
    Idle,
    Error(String),
}

#[derive(Clone, PartialEq)]
struct Toast {
    message: String,
    success: bool,
}

/// Hands out tickets so only the newest toast's timer hides it
#[derive(Default)]
struct ToastSeq {
    latest: u32,
}

impl ToastSeq {
    fn next(&mut self) -> u32 {
        self.latest = self.latest.wrapping_add(1);
        self.latest
    }

    fn is_latest(&self, ticket: u32) -> bool {
        self.latest == ticket
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| LoadState::Loading);
    let links = use_state(Vec::<LinkEntry>::new);
    let is_logging_enabled = use_state(|| true);
    let max_links = use_state(|| DEFAULT_MAX_LINKS);
    let search_query = use_state(String::new);
    let toast = use_state(|| None::<Toast>);
    let toast_seq = use_mut_ref(ToastSeq::default);

    // Load links and settings on mount
    {
        let state = state.clone();
        let links = links.clone();
        let is_logging_enabled = is_logging_enabled.clone();
        let max_links = max_links.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                let host = ChromeHost;
                match host.load_links().await {
                    Ok(stored) => links.set(stored.links),
                    Err(e) => {
                        log::error!("Error loading links: {}", e);
                        state.set(LoadState::Error(e.to_string()));
                        return;
                    }
                }
                match host.load_settings().await {
                    Ok(settings) => {
                        is_logging_enabled.set(settings.is_logging_enabled);
                        max_links.set(settings.max_links);
                    }
                    Err(e) => log::warn!("Error loading settings: {}", e),
                }
                state.set(LoadState::Idle);
            });
            || ()
        });
    }

    // Search handler
    let on_search_input = {
        let search_query = search_query.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                search_query.set(input.value());
            }
        })
    };

    let on_clear_search = {
        let search_query = search_query.clone();
        Callback::from(move |_| {
            search_query.set(String::new());
        })
    };

    // Toggle logging: flip locally first, then tell the background
    let on_toggle_logging = {
        let is_logging_enabled = is_logging_enabled.clone();
        Callback::from(move |_| {
            let enabled = !*is_logging_enabled;
            is_logging_enabled.set(enabled);

            spawn_local(async move {
                if let Err(e) = send_command(Command::ToggleLogging { enabled }).await {
                    log::error!("Error toggling logging: {}", e);
                }
            });
        })
    };

    // Clear all links
    let on_clear_links = {
        let links = links.clone();
        let search_query = search_query.clone();
        Callback::from(move |_| {
            if !confirmAction("Are you sure you want to clear all links? This cannot be undone.") {
                return;
            }

            let links = links.clone();
            let search_query = search_query.clone();
            spawn_local(async move {
                match send_command(Command::ClearLinks).await {
                    Ok(_) => {
                        links.set(Vec::new());
                        search_query.set(String::new());
                    }
                    Err(e) => log::error!("Error clearing links: {}", e),
                }
            });
        })
    };

    let on_copy = {
        let toast = toast.clone();
        let toast_seq = toast_seq.clone();
        Callback::from(move |url: String| {
            let toast = toast.clone();
            let toast_seq = toast_seq.clone();
            spawn_local(async move {
                let shown = match copyToClipboard(&url).await {
                    Ok(()) => Toast {
                        message: "Link copied".to_string(),
                        success: true,
                    },
                    Err(e) => {
                        log::error!("Failed to copy: {:?}", e);
                        Toast {
                            message: "Copy failed".to_string(),
                            success: false,
                        }
                    }
                };
                show_toast(toast, toast_seq, shown);
            });
        })
    };

    let on_open = Callback::from(move |url: String| {
        spawn_local(async move {
            if let Err(e) = openTab(&url).await {
                log::error!("Failed to open {}: {:?}", url, e);
            }
        });
    });

    let visible = filter_links(&links, &search_query);
    let view_state = ViewState::of(links.len(), visible.len());
    let now = js_sys::Date::now();
    let logging = *is_logging_enabled;

    html! {
        <div class="padding-20">
            <div class="header">
                <h1 class="popup-title">{"Link Locker"}</h1>
                <span class="link-count">{format!("{} / {}", links.len(), *max_links)}</span>
            </div>

            <div class="controls">
                <Button
                    onclick={on_toggle_logging}
                    variant={if logging {
                        ButtonVariant::Primary
                    } else {
                        ButtonVariant::Secondary
                    }}
                >
                    {if logging { "◉ Active" } else { "◯ Paused" }}
                </Button>
                <Button
                    onclick={on_clear_links}
                    variant={ButtonVariant::Danger}
                    disabled={links.is_empty()}
                >
                    {"Clear all"}
                </Button>
            </div>

            // Search bar
            <div class="search-container">
                <input
                    type="text"
                    placeholder="Search titles, URLs, or domains..."
                    value={(*search_query).clone()}
                    oninput={on_search_input}
                    class="search-input"
                />
                if !search_query.trim().is_empty() {
                    <Button
                        onclick={on_clear_search}
                        variant={ButtonVariant::Secondary}
                        size={ButtonSize::Small}
                    >
                        {"✗"}
                    </Button>
                }
            </div>

            if let Some(t) = (*toast).clone() {
                <Alert
                    r#type={if t.success { AlertType::Success } else { AlertType::Danger }}
                    title={t.message}
                    inline={true}
                >
                </Alert>
            }

            // Status display
            {match &*state {
                LoadState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Loading links..."}</p>
                    </div>
                },
                LoadState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                LoadState::Idle => match view_state {
                    ViewState::Empty => html! {
                        <StatusMessage
                            message={"No links yet."}
                            hint={Some("Pages you visit will show up here.".to_string())}
                        />
                    },
                    ViewState::NoResults => html! {
                        <StatusMessage message={"No links match your search."} />
                    },
                    ViewState::List => html! {
                        <div class="link-list">
                            {for visible.iter().map(|link| html! {
                                <LinkRow
                                    key={link.id.to_string()}
                                    link={link.clone()}
                                    now={now}
                                    on_copy={on_copy.clone()}
                                    on_open={on_open.clone()}
                                />
                            })}
                        </div>
                    },
                },
            }}

            <p class="footer-popup">
                {"Link Locker v0.1.0"}
            </p>
        </div>
    }
}

// Helper functions

async fn send_command(command: Command) -> Result<Ack, String> {
    let command_js = serde_wasm_bindgen::to_value(&command)
        .map_err(|e| format!("Failed to serialize command: {:?}", e))?;

    let response = sendCommand(command_js)
        .await
        .map_err(|e| format!("Failed to send command: {:?}", e))?;

    serde_wasm_bindgen::from_value(response)
        .map_err(|e| format!("Failed to parse response: {:?}", e))
}

/// Show a toast, then hide it after a short delay unless a newer one replaced it
fn show_toast(toast: UseStateHandle<Option<Toast>>, seq: Rc<RefCell<ToastSeq>>, shown: Toast) {
    let ticket = seq.borrow_mut().next();
    toast.set(Some(shown));

    let Some(window) = web_sys::window() else {
        return;
    };
    let hide = Closure::once_into_js(move || {
        if seq.borrow().is_latest(ticket) {
            toast.set(None);
        }
    });
    let scheduled = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(hide.unchecked_ref(), TOAST_MS);
    if let Err(e) = scheduled {
        log::warn!("Failed to schedule toast dismissal: {:?}", e);
    }
}
