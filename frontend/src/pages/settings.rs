use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{client_from, use_notifier};
use crate::components::{card, page_shell};
use crate::config::{normalize_endpoint, save_settings, Settings, DEFAULT_API_ENDPOINT};

#[function_component(SettingsPage)]
pub fn settings_page() -> Html {
    let settings = use_context::<UseStateHandle<Settings>>();
    let notifier = use_notifier();

    let current = settings
        .as_ref()
        .map(|s| s.api_endpoint.clone())
        .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());
    let draft = use_state(|| current.clone());
    let testing = use_state(|| false);

    let save = {
        let settings = settings.clone();
        let draft = draft.clone();
        let notifier = notifier.clone();
        Callback::from(move |_: ()| match normalize_endpoint(&draft) {
            Ok(api_endpoint) => {
                let next = Settings { api_endpoint };
                save_settings(&next);
                tracing::info!(endpoint = %next.api_endpoint, "API endpoint updated");
                draft.set(next.api_endpoint.clone());
                if let Some(settings) = &settings {
                    settings.set(next);
                }
                notifier.success("API endpoint updated successfully!");
            }
            Err(err) => notifier.error(err.to_string()),
        })
    };

    let on_input = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            draft.set(input.value());
        })
    };

    let on_keydown = {
        let save = save.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                save.emit(());
            }
        })
    };

    let on_save = save.reform(|_: MouseEvent| ());

    let on_reset = {
        let draft = draft.clone();
        Callback::from(move |_: MouseEvent| draft.set(DEFAULT_API_ENDPOINT.to_string()))
    };

    let on_test = {
        let testing = testing.clone();
        let client = client_from(&settings);
        Callback::from(move |_: MouseEvent| {
            let testing = testing.clone();
            let client = client.clone();
            let notifier = notifier.clone();
            testing.set(true);
            spawn_local(async move {
                match client.ping().await {
                    Ok(()) => notifier.success("API connection successful!"),
                    Err(err) => {
                        tracing::error!(error = %err, "API connection test failed");
                        notifier.error(
                            "Unable to connect to the API. Please check your endpoint and try again.",
                        );
                    }
                }
                testing.set(false);
            });
        })
    };

    let dirty = *draft != current;

    html! {
        { page_shell(
            "Settings",
            html! {},
            html! {
                { card("API Endpoint", html! {
                    <div class="space-y-4">
                        <p class="text-sm text-muted-foreground">
                            {"The backend that stores transactions and serves analytics. Saved in this browser only."}
                        </p>
                        <input
                            class="w-full p-2 border rounded font-mono text-sm"
                            value={(*draft).clone()}
                            oninput={on_input}
                            onkeydown={on_keydown}
                            placeholder={DEFAULT_API_ENDPOINT}
                        />
                        <div class="flex flex-wrap gap-2">
                            <button onclick={on_save} disabled={!dirty}
                                class="bg-primary text-primary-foreground px-4 py-2 rounded-xl font-bold text-sm disabled:opacity-50">
                                {"Save"}
                            </button>
                            <button onclick={on_test} disabled={*testing}
                                class="bg-secondary text-secondary-foreground px-4 py-2 rounded-xl font-bold text-sm">
                                { if *testing { "Testing..." } else { "Test Connection" } }
                            </button>
                            <button onclick={on_reset}
                                class="text-sm text-muted-foreground underline px-2">
                                {"Reset to default"}
                            </button>
                        </div>
                        <p class="text-xs text-muted-foreground">
                            { format!("Currently using: {current}") }
                        </p>
                    </div>
                }) }
            }
        ) }
    }
}
