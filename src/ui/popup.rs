/// Popup UI for Tab Sorter

use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use patternfly_yew::prelude::*;
use crate::chrome::{ChromeBrowser, current_window_id, load_settings};
use crate::reconcile::Reconciler;
use crate::tab_data::{SortResult, SortStatus};

#[derive(Clone, PartialEq)]
enum AppState {
    Idle,
    Loading(String),
    Done(SortResult),
    Error(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Idle);

    // Sort tabs handler
    let on_sort = {
        let state = state.clone();

        Callback::from(move |_| {
            let state = state.clone();

            state.set(AppState::Loading("Sorting tabs...".to_string()));

            spawn_local(async move {
                match current_window_id().await {
                    Ok(window_id) => {
                        let settings = load_settings().await;
                        let result = Reconciler::new(&ChromeBrowser, &ChromeBrowser, &settings)
                            .run(window_id)
                            .await;
                        state.set(AppState::Done(result));
                    }
                    Err(e) => {
                        state.set(AppState::Error(e));
                    }
                }
            });
        })
    };

    let is_busy = matches!(*state, AppState::Loading(_));

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Tab Sorter"}</h1>

            <div class="flex-column-gap">
                <Button onclick={on_sort} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"Sort Tabs"}
                </Button>
            </div>

            // Status display
            {match &*state {
                AppState::Loading(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                AppState::Done(result) => status_alert(result),
                AppState::Error(err) => error_alert(err),
                AppState::Idle => html! {}
            }}

            <p class="footer-popup">
                {"Tab Sorter v0.1.0"}
            </p>
        </div>
    }
}

fn status_alert(result: &SortResult) -> Html {
    match result.status {
        SortStatus::Sorted => html! {
            <div class="message-top-margin">
                <Alert r#type={AlertType::Success} title={"Tabs sorted"} inline={true}>
                </Alert>
            </div>
        },
        SortStatus::AlreadySorted => html! {
            <div class="message-top-margin">
                <Alert r#type={AlertType::Info} title={"Tabs were already in order"} inline={true}>
                </Alert>
            </div>
        },
        SortStatus::Error => error_alert(result.error.as_deref().unwrap_or("Sort failed")),
    }
}

fn error_alert(err: &str) -> Html {
    html! {
        <div class="message-top-margin">
            <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                {err.to_string()}
            </Alert>
        </div>
    }
}
