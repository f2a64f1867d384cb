use chrono::Local;
use gloo_timers::callback::Interval;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{client_from, refresh, use_notifier, RefreshPlan};
use crate::api::RemoteClassifier;
use crate::charts::{to_f64, DoughnutChart, LineChart, Series};
use crate::components::{
    card, empty_state, icon_download, icon_plus, icon_refresh, page_shell, StatCard, StatIcon,
};
use crate::config::{self, Settings};
use crate::export::download_json;
use crate::format::{confidence_percent, format_currency, format_naive_date, month_label};
use crate::models::{CategoryPerformance, Transaction, TransactionForm};
use crate::state::{DataAction, DataState, Forecast, RefreshSequencer};

const PLAN: RefreshPlan = RefreshPlan {
    health: true,
    performance: true,
};

fn today_form() -> TransactionForm {
    TransactionForm::dated(Local::now().date_naive())
}

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let settings = use_context::<UseStateHandle<Settings>>();
    let client = client_from(&settings);
    let notifier = use_notifier();

    let state = use_reducer(DataState::default);
    let sequencer = (*use_state(RefreshSequencer::default)).clone();

    let show_form = use_state(|| false);
    let form = use_state(today_form);
    let form_error = use_state(|| None::<String>);
    let saving = use_state(|| false);

    let reload = {
        let dispatcher = state.dispatcher();
        let client = client.clone();
        let notifier = notifier.clone();
        Callback::from(move |_: ()| {
            let token = sequencer.next_token();
            dispatcher.dispatch(DataAction::Begin(token));
            spawn_local(refresh(
                client.clone(),
                token,
                dispatcher.clone(),
                notifier.clone(),
                PLAN,
            ));
        })
    };

    {
        let reload = reload.clone();
        use_effect_with_deps(
            move |_| {
                reload.emit(());
                let interval = Interval::new(config::DASHBOARD_REFRESH_MS, move || reload.emit(()));
                move || drop(interval)
            },
            client.clone(),
        );
    }

    let on_toggle_form = {
        let show_form = show_form.clone();
        let form = form.clone();
        let form_error = form_error.clone();
        Callback::from(move |_: MouseEvent| {
            if !*show_form {
                form.set(today_form());
            }
            form_error.set(None);
            show_form.set(!*show_form);
        })
    };

    let on_submit = {
        let form = form.clone();
        let form_error = form_error.clone();
        let saving = saving.clone();
        let show_form = show_form.clone();
        let notifier = notifier.clone();
        let reload = reload.clone();
        let classifier = RemoteClassifier::new(client.clone());
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let new_tx = match form.validate() {
                Ok(tx) => tx,
                Err(err) => {
                    notifier.error(err.to_string());
                    form_error.set(Some(err.to_string()));
                    return;
                }
            };

            form_error.set(None);
            saving.set(true);

            let classifier = classifier.clone();
            let form = form.clone();
            let saving = saving.clone();
            let show_form = show_form.clone();
            let notifier = notifier.clone();
            let reload = reload.clone();
            spawn_local(async move {
                match classifier.submit(&new_tx).await {
                    Ok(category) => {
                        notifier.success(format!(
                            "Transaction added successfully! AI categorized it as: {category}"
                        ));
                        form.set(today_form());
                        show_form.set(false);
                        reload.emit(());
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "error adding transaction");
                        notifier.error("Error adding transaction. Please try again.");
                    }
                }
                saving.set(false);
            });
        })
    };

    let on_edit = {
        let form = form.clone();
        let show_form = show_form.clone();
        Callback::from(move |tx: Transaction| {
            form.set(TransactionForm::from(&tx));
            show_form.set(true);
        })
    };

    let on_delete = {
        let dispatcher = state.dispatcher();
        let client = client.clone();
        let notifier = notifier.clone();
        let reload = reload.clone();
        Callback::from(move |id: i64| {
            let confirmed = web_sys::window()
                .and_then(|w| {
                    w.confirm_with_message("Are you sure you want to delete this transaction?")
                        .ok()
                })
                .unwrap_or(false);
            if !confirmed {
                return;
            }

            let client = client.clone();
            let dispatcher = dispatcher.clone();
            let notifier = notifier.clone();
            let reload = reload.clone();
            spawn_local(async move {
                match client.delete_transaction(id).await {
                    Ok(()) => {
                        tracing::info!(id, "transaction deleted");
                        dispatcher.dispatch(DataAction::Removed(id));
                        notifier.success("Transaction deleted successfully!");
                        reload.emit(());
                    }
                    Err(err) => {
                        tracing::error!(error = %err, id, "error deleting transaction");
                        notifier.error("Error deleting transaction.");
                    }
                }
            });
        })
    };

    let on_refresh = {
        let reload = reload.clone();
        let notifier = notifier.clone();
        Callback::from(move |_: MouseEvent| {
            reload.emit(());
            notifier.info("Transactions refreshed!");
        })
    };

    let on_export = {
        let transactions = state.transactions.clone();
        let notifier = notifier.clone();
        Callback::from(move |_: MouseEvent| match download_json("finance_data.json", &transactions) {
            Ok(()) => notifier.success("Data exported successfully!"),
            Err(err) => {
                tracing::error!(%err, "export failed");
                notifier.error("Could not export data.");
            }
        })
    };

    let actions = html! {
        <>
            <button onclick={on_refresh} class="flex items-center gap-2 bg-secondary text-secondary-foreground px-4 py-2 rounded-xl font-bold text-sm">
                { icon_refresh() }{"Refresh"}
            </button>
            <button onclick={on_export} class="flex items-center gap-2 bg-secondary text-secondary-foreground px-4 py-2 rounded-xl font-bold text-sm">
                { icon_download() }{"Export"}
            </button>
            <button onclick={on_toggle_form} class="flex items-center gap-2 bg-primary text-primary-foreground px-4 py-2 rounded-xl font-bold text-sm hover:opacity-90 transition-all">
                { icon_plus() }
                { if *show_form { "Close" } else { "Add Transaction" } }
            </button>
        </>
    };

    html! {
        { page_shell(
            "Dashboard",
            actions,
            html! {
                <>
                    { overview(&state) }
                    if *show_form {
                        { transaction_form(&form, &form_error, *saving, on_submit) }
                    }
                    { spending_charts(&state) }
                    { recent_transactions(&state, on_edit, on_delete) }
                    <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                        { prediction_card(&state) }
                        { recommendations_card(&state) }
                    </div>
                    { performance_grid(&state) }
                </>
            }
        ) }
    }
}

fn overview(state: &DataState) -> Html {
    if let (None, Some(message)) = (&state.analytics, &state.analytics_error) {
        return card("Overview", empty_state(message.clone()));
    }

    let (total, average) = state
        .analytics
        .as_ref()
        .map(|a| (format_currency(a.total_spent), format_currency(a.avg_transaction)))
        .unwrap_or_else(|| ("-".to_string(), "-".to_string()));
    let (score, score_class) = match &state.health {
        Some(health) => (health.score.to_string(), health.band().text_class()),
        None => ("-".to_string(), "text-muted-foreground"),
    };

    html! {
        <>
        <div class="grid grid-cols-1 md:grid-cols-4 gap-6">
            <StatCard title="Total Spent" value={total} icon={StatIcon::Wallet} />
            <StatCard title="Avg Transaction" value={average} icon={StatIcon::CreditCard} />
            <StatCard title="Health Score" value={score} icon={StatIcon::Heart} value_class={score_class} />
            <StatCard title="Anomalies" value={state.anomalies.len().to_string()} icon={StatIcon::Alert} />
        </div>
        { health_factors(state.health.as_ref().map_or(&[][..], |h| h.factors.as_slice())) }
        </>
    }
}

fn health_factors(factors: &[String]) -> Html {
    if factors.is_empty() {
        return html! {};
    }
    html! {
        <ul class="flex flex-wrap gap-2">
            { for factors.iter().map(|factor| html! {
                <li class="bg-[#eef4f9] text-[#173E63] px-3 py-1 rounded-full text-xs">{ factor.clone() }</li>
            }) }
        </ul>
    }
}

fn transaction_form(
    form: &UseStateHandle<TransactionForm>,
    form_error: &UseStateHandle<Option<String>>,
    saving: bool,
    on_submit: Callback<SubmitEvent>,
) -> Html {
    let field = |update: fn(&mut TransactionForm, String)| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            update(&mut next, input.value());
            form.set(next);
        })
    };

    html! {
        <form class="bg-card rounded-[10px] p-6 border border-border" onsubmit={on_submit}>
            <div class="grid grid-cols-1 md:grid-cols-5 gap-3">
                <input type="number" step="0.01" placeholder="Amount" value={form.amount.clone()}
                    oninput={field(|f, v| f.amount = v)} class="p-2 border rounded" />
                <input placeholder="Merchant" value={form.merchant.clone()}
                    oninput={field(|f, v| f.merchant = v)} class="p-2 border rounded" />
                <input type="date" value={form.date.clone()}
                    oninput={field(|f, v| f.date = v)} class="p-2 border rounded" />
                <input placeholder="Description (optional)" value={form.description.clone()}
                    oninput={field(|f, v| f.description = v)} class="p-2 border rounded" />
                <button type="submit" class="bg-accent text-white px-4 rounded" disabled={saving}>
                    { if saving { "Saving..." } else { "Save" } }
                </button>
            </div>
            if let Some(msg) = &**form_error {
                <p class="text-sm text-red-500 mt-2">{ msg.clone() }</p>
            }
        </form>
    }
}

fn spending_charts(state: &DataState) -> Html {
    let Some(summary) = &state.analytics else {
        return html! {};
    };
    let labels: Vec<String> = summary.monthly_spending.keys().map(|k| month_label(k)).collect();
    let series = vec![Series {
        label: "Monthly Spending",
        color: crate::charts::PALETTE[0],
        values: summary.monthly_spending.values().map(|v| to_f64(*v)).collect(),
        filled: true,
    }];
    let categories: Vec<(String, rust_decimal::Decimal)> = summary
        .category_breakdown
        .iter()
        .map(|(c, v)| (c.clone(), *v))
        .collect();

    html! {
        <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
            <div class="lg:col-span-2">
                { card("Monthly Spending Trend", html! { <LineChart labels={labels} series={series} /> }) }
            </div>
            { card("Spending by Category", html! { <DoughnutChart items={categories} /> }) }
        </div>
    }
}

fn recent_transactions(
    state: &DataState,
    on_edit: Callback<Transaction>,
    on_delete: Callback<i64>,
) -> Html {
    let rows = state.transactions.iter().take(config::RECENT_TRANSACTION_ROWS);

    html! {
        <div class="bg-card rounded-[10px] shadow-sm border border-border overflow-hidden">
            <div class="p-6 flex justify-between items-center border-b border-border">
                <h3 class="font-bold text-foreground text-lg">{"Recent Transactions"}</h3>
                if state.rejected_records > 0 {
                    <span class="text-xs text-amber-600">{ format!("{} malformed record(s) skipped", state.rejected_records) }</span>
                }
            </div>
            <div class="overflow-x-auto">
                <table class="w-full text-left border-collapse">
                    <thead>
                        <tr class="bg-muted/50 text-muted-foreground text-[10px] uppercase tracking-widest">
                            <th class="px-8 py-4 font-bold">{"Date"}</th>
                            <th class="px-8 py-4 font-bold">{"Merchant"}</th>
                            <th class="px-8 py-4 font-bold">{"Category"}</th>
                            <th class="px-8 py-4 font-bold text-right">{"Amount"}</th>
                            <th class="px-8 py-4 font-bold text-right">{"Actions"}</th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-border">
                        if state.transactions.is_empty() {
                            <tr><td colspan="5" class="px-8 py-6 text-center text-muted-foreground">
                                { if state.loading { "Loading..." } else { "No transactions found" } }
                            </td></tr>
                        }
                        { for rows.map(|tx| {
                            let edit = {
                                let on_edit = on_edit.clone();
                                let tx = tx.clone();
                                Callback::from(move |_: MouseEvent| on_edit.emit(tx.clone()))
                            };
                            let delete = {
                                let id = tx.id;
                                on_delete.reform(move |_: MouseEvent| id)
                            };
                            html! {
                                <tr key={tx.id} class="text-sm hover:bg-muted/30 transition-colors">
                                    <td class="px-8 py-4 text-muted-foreground">{ format_naive_date(tx.date) }</td>
                                    <td class="px-8 py-4 text-foreground">{ tx.merchant.clone() }</td>
                                    <td class="px-8 py-4">
                                        <span class="bg-secondary text-secondary-foreground px-3 py-1 rounded-full text-[10px] font-bold">{ tx.category.clone() }</span>
                                    </td>
                                    <td class="px-8 py-4 text-right font-semibold text-foreground">{ format_currency(tx.amount) }</td>
                                    <td class="px-8 py-4 text-right space-x-2">
                                        <button class="text-xs text-primary font-bold" onclick={edit}>{"Edit"}</button>
                                        <button class="text-xs text-red-600 font-bold" onclick={delete}>{"Delete"}</button>
                                    </td>
                                </tr>
                            }
                        }) }
                    </tbody>
                </table>
            </div>
        </div>
    }
}

pub(super) fn prediction_card(state: &DataState) -> Html {
    let body = match &state.forecast {
        Forecast::Pending => empty_state(state.placeholder("forecast")),
        Forecast::Unavailable(message) => empty_state(message.clone()),
        Forecast::Ready(prediction) => html! {
            <div class="space-y-2">
                <p class="text-sm text-muted-foreground">{"Based on your spending patterns, you're expected to spend:"}</p>
                <p class="text-3xl font-black text-[#1D617A]">{ format_currency(prediction.predicted_next_month) }</p>
                <span class="inline-block bg-green-100 text-green-700 px-3 py-1 rounded-full text-xs font-bold">
                    { format!("{} Confidence", confidence_percent(prediction.confidence)) }
                </span>
            </div>
        },
    };
    card("Next Month Prediction", body)
}

fn recommendations_card(state: &DataState) -> Html {
    let body = match &state.recommendations {
        None => empty_state(state.placeholder("recommendations")),
        Some(list) if list.is_empty() => {
            empty_state("Great job! Your spending looks well-balanced.")
        }
        Some(list) => html! {
            <div class="space-y-3">
                { for list.iter().map(|rec| html! {
                    <div class="border-l-4 border-[#667eea] pl-3">
                        <p class="font-bold text-sm text-foreground">{ rec.category.clone() }</p>
                        <p class="text-sm text-muted-foreground">{ rec.recommendation.clone() }</p>
                        <p class="text-xs text-green-700 font-bold">{ format!("Potential savings: {}", format_currency(rec.potential_savings)) }</p>
                    </div>
                }) }
            </div>
        },
    };
    card("Recommendations", body)
}

fn performance_grid(state: &DataState) -> Html {
    let body = match state.performance.as_deref() {
        None => empty_state(state.placeholder("category performance")),
        Some([]) => empty_state("No category data available for performance analysis."),
        Some(records) => html! {
            <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                { for records.iter().map(performance_tile) }
            </div>
        },
    };
    card("Category Performance", body)
}

fn performance_tile(record: &CategoryPerformance) -> Html {
    let score = record.performance_score.min(100);
    html! {
        <div class="rounded-xl border border-border p-4 space-y-3">
            <div class="flex items-center justify-between">
                <h4 class="font-bold text-sm text-foreground">{ record.category.clone() }</h4>
                <span class={classes!("px-2", "py-0.5", "rounded-full", "text-[10px]", "font-bold", record.rating.badge_class())}>
                    { record.rating.label() }
                </span>
            </div>
            <dl class="grid grid-cols-2 gap-1 text-xs">
                <dt class="text-muted-foreground">{"Total Spent"}</dt>
                <dd class="text-right">{ format_currency(record.total_spent) }</dd>
                <dt class="text-muted-foreground">{"Avg Amount"}</dt>
                <dd class="text-right">{ format_currency(record.avg_amount) }</dd>
                <dt class="text-muted-foreground">{"Frequency"}</dt>
                <dd class="text-right">{ format!("{:.1}/week", record.frequency) }</dd>
                <dt class="text-muted-foreground">{"Trend"}</dt>
                <dd class={classes!("text-right", record.trend.text_class())}>
                    { format!("{} {}", record.trend.arrow(), record.trend.label()) }
                </dd>
            </dl>
            <div class="flex items-center gap-2">
                <div class="h-2 flex-1 bg-secondary rounded-full overflow-hidden">
                    <div class="h-full bg-primary" style={format!("width: {}%", score)}></div>
                </div>
                <span class="text-xs font-bold">{ format!("{}/100", score) }</span>
            </div>
        </div>
    }
}
