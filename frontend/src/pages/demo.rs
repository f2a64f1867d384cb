use chrono::Local;
use gloo_timers::callback::Timeout;
use yew::prelude::*;

use super::use_notifier;
use crate::classifier::{DemoAnalysis, DemoClassifier};
use crate::components::{card, page_shell};
use crate::config;
use crate::format::format_currency;
use crate::models::TransactionForm;

#[derive(Clone, PartialEq)]
enum DemoState {
    Idle,
    Analyzing,
    Done { amount: String, analysis: DemoAnalysis },
}

#[function_component(DemoPage)]
pub fn demo_page() -> Html {
    let notifier = use_notifier();
    let form = use_state(|| TransactionForm::dated(Local::now().date_naive()));
    let demo = use_state(|| DemoState::Idle);
    let pending = use_mut_ref(|| None::<Timeout>);

    let field = |update: fn(&mut TransactionForm, String)| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            update(&mut next, input.value());
            form.set(next);
        })
    };

    let on_submit = {
        let form = form.clone();
        let demo = demo.clone();
        let pending = pending.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let tx = match form.validate() {
                Ok(tx) => tx,
                Err(err) => {
                    tracing::debug!(error = %err, "demo form rejected");
                    notifier.error("Please fill in all fields.");
                    return;
                }
            };

            demo.set(DemoState::Analyzing);
            let demo = demo.clone();
            // Replacing the handle cancels an analysis still in flight.
            *pending.borrow_mut() = Some(Timeout::new(config::DEMO_DELAY_MS, move || {
                let analysis = DemoClassifier.analyze(&tx.merchant, tx.amount);
                tracing::debug!(category = %analysis.category, "demo analysis ready");
                demo.set(DemoState::Done {
                    amount: format_currency(tx.amount),
                    analysis,
                });
            }));
        })
    };

    let analyzing = *demo == DemoState::Analyzing;

    html! {
        { page_shell(
            "Try the Demo",
            html! {},
            html! {
                <>
                    { card("Analyze a transaction", html! {
                        <form class="grid grid-cols-1 md:grid-cols-4 gap-3" onsubmit={on_submit}>
                            <input type="number" step="0.01" placeholder="Amount" value={form.amount.clone()}
                                oninput={field(|f, v| f.amount = v)} class="p-2 border rounded" />
                            <input placeholder="Merchant (e.g. Starbucks)" value={form.merchant.clone()}
                                oninput={field(|f, v| f.merchant = v)} class="p-2 border rounded" />
                            <input type="date" value={form.date.clone()}
                                oninput={field(|f, v| f.date = v)} class="p-2 border rounded" />
                            <button type="submit" disabled={analyzing}
                                class="bg-primary text-primary-foreground px-4 rounded font-bold">
                                { if analyzing { "Analyzing..." } else { "Analyze with AI" } }
                            </button>
                        </form>
                    }) }
                    { demo_result(&demo) }
                </>
            }
        ) }
    }
}

fn demo_result(state: &DemoState) -> Html {
    match state {
        DemoState::Idle => html! {},
        DemoState::Analyzing => html! {
            <div class="text-center py-8 text-muted-foreground">
                <p class="text-sm font-bold animate-pulse">{"AI is analyzing your transaction..."}</p>
            </div>
        },
        DemoState::Done { amount, analysis } => card(
            "AI Analysis Results",
            html! {
                <div class="space-y-4">
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                        <div class="rounded-xl bg-[#eef4f9] p-4">
                            <p class="text-[10px] uppercase tracking-widest text-muted-foreground font-bold">{"Predicted Category"}</p>
                            <p class="text-lg font-bold text-[#1D617A]">{ analysis.category.label() }</p>
                        </div>
                        <div class="rounded-xl bg-[#eef4f9] p-4">
                            <p class="text-[10px] uppercase tracking-widest text-muted-foreground font-bold">{"Confidence"}</p>
                            <p class="text-lg font-bold text-green-700">{ format!("{}%", analysis.confidence_percent) }</p>
                        </div>
                        <div class="rounded-xl bg-[#eef4f9] p-4">
                            <p class="text-[10px] uppercase tracking-widest text-muted-foreground font-bold">{"Amount"}</p>
                            <p class="text-lg font-bold">{ amount.clone() }</p>
                        </div>
                    </div>
                    <div>
                        <h4 class="font-bold text-sm mb-2">{"Insights"}</h4>
                        <ul class="list-disc pl-5 space-y-1 text-sm text-muted-foreground">
                            { for analysis.insights.iter().map(|insight| html! { <li>{ *insight }</li> }) }
                        </ul>
                    </div>
                </div>
            },
        ),
    }
}
