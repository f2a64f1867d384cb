use chrono::Utc;
use gloo_timers::callback::Interval;
use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::dashboard::prediction_card;
use super::{client_from, refresh, use_notifier, RefreshPlan};
use crate::analytics::{
    category_stats, moving_average, seasonal_trends, spending_patterns, KeyMetrics,
    SEASONAL_PATTERN,
};
use crate::charts::{to_f64, DoughnutChart, LineChart, Series, PALETTE};
use crate::components::{
    card, empty_state, icon_download, icon_refresh, page_shell, StatCard, StatIcon,
};
use crate::config::{self, Settings};
use crate::export::download_json;
use crate::format::{format_currency, format_date, month_label, percent, weekday_name};
use crate::models::{AnalyticsSummary, Anomaly, BudgetRecommendation, Prediction, Transaction};
use crate::state::{DataAction, DataState, Forecast, RefreshSequencer};

const PLAN: RefreshPlan = RefreshPlan {
    health: false,
    performance: false,
};

#[derive(Serialize)]
struct AnalyticsExport<'a> {
    summary: Option<&'a AnalyticsSummary>,
    transactions: &'a [Transaction],
    anomalies: &'a [Anomaly],
    prediction: Option<&'a Prediction>,
    recommendations: &'a [BudgetRecommendation],
    export_date: String,
}

impl<'a> AnalyticsExport<'a> {
    fn from_state(state: &'a DataState) -> Self {
        Self {
            summary: state.analytics.as_ref(),
            transactions: &state.transactions,
            anomalies: &state.anomalies,
            prediction: match &state.forecast {
                Forecast::Ready(p) => Some(p),
                _ => None,
            },
            recommendations: state.recommendations.as_deref().unwrap_or(&[]),
            export_date: Utc::now().to_rfc3339(),
        }
    }
}

#[function_component(AnalyticsPage)]
pub fn analytics_page() -> Html {
    let settings = use_context::<UseStateHandle<Settings>>();
    let client = client_from(&settings);
    let notifier = use_notifier();

    let state = use_reducer(DataState::default);
    let sequencer = (*use_state(RefreshSequencer::default)).clone();

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
                let interval = Interval::new(config::ANALYTICS_REFRESH_MS, move || reload.emit(()));
                move || drop(interval)
            },
            client,
        );
    }

    let on_refresh = {
        let notifier = notifier.clone();
        Callback::from(move |_: MouseEvent| {
            reload.emit(());
            notifier.success("Analytics refreshed!");
        })
    };

    let on_export = {
        let state = state.clone();
        Callback::from(move |_: MouseEvent| {
            let filename = format!("financial-analytics-{}.json", Utc::now().format("%Y-%m-%d"));
            match download_json(&filename, &AnalyticsExport::from_state(&state)) {
                Ok(()) => notifier.success("Analytics data exported successfully!"),
                Err(err) => {
                    tracing::error!(%err, "export failed");
                    notifier.error("Could not export analytics data.");
                }
            }
        })
    };

    let actions = html! {
        <>
            <button onclick={on_refresh} class="flex items-center gap-2 bg-secondary text-secondary-foreground px-4 py-2 rounded-xl font-bold text-sm">
                { icon_refresh() }{"Refresh"}
            </button>
            <button onclick={on_export} class="flex items-center gap-2 bg-primary text-primary-foreground px-4 py-2 rounded-xl font-bold text-sm hover:opacity-90 transition-all">
                { icon_download() }{"Export"}
            </button>
        </>
    };

    let body = match (&state.analytics, &state.analytics_error) {
        (Some(summary), _) => html! {
            <>
                { key_metrics(summary) }
                { trend_charts(summary) }
                { category_table(&state.transactions) }
                <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                    { patterns_card(&state.transactions) }
                    { seasonal_card(&state.transactions) }
                </div>
                <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                    { anomalies_card(&state.anomalies) }
                    { prediction_card(&state) }
                </div>
                { optimization_card(&state) }
                if state.rejected_records > 0 {
                    <p class="text-xs text-amber-600">
                        { format!("{} malformed transaction record(s) were left out of these figures.", state.rejected_records) }
                    </p>
                }
            </>
        },
        (None, Some(message)) => card("Analytics", empty_state(message.clone())),
        (None, None) => empty_state("Loading analytics..."),
    };

    html! {
        { page_shell("Analytics", actions, body) }
    }
}

fn key_metrics(summary: &AnalyticsSummary) -> Html {
    let metrics = KeyMetrics::from_summary(summary);
    html! {
        <div class="grid grid-cols-1 md:grid-cols-4 gap-6">
            <StatCard title="Transactions" value={metrics.total_transactions.to_string()} icon={StatIcon::CreditCard} />
            <StatCard title="Avg Daily Spending" value={format_currency(metrics.avg_daily_spending)} icon={StatIcon::Calendar} />
            <StatCard title="Top Category" value={metrics.most_expensive_category.unwrap_or_else(|| "N/A".to_string())} icon={StatIcon::Wallet} />
            <StatCard title="Spending Velocity" value={format!("{}/day", format_currency(metrics.spending_velocity))} icon={StatIcon::TrendingUp} />
        </div>
    }
}

fn trend_charts(summary: &AnalyticsSummary) -> Html {
    let labels: Vec<String> = summary.monthly_spending.keys().map(|k| month_label(k)).collect();
    let totals: Vec<Decimal> = summary.monthly_spending.values().copied().collect();
    let series = vec![
        Series {
            label: "Monthly Spending",
            color: PALETTE[0],
            values: totals.iter().map(|v| to_f64(*v)).collect(),
            filled: true,
        },
        Series {
            label: "Moving Average",
            color: PALETTE[1],
            values: moving_average(&totals, config::MOVING_AVERAGE_WINDOW)
                .into_iter()
                .map(to_f64)
                .collect(),
            filled: false,
        },
    ];
    let categories: Vec<(String, Decimal)> = summary
        .category_breakdown
        .iter()
        .map(|(c, v)| (c.clone(), *v))
        .collect();

    html! {
        <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
            <div class="lg:col-span-2">
                { card("Spending Trend", html! { <LineChart labels={labels} series={series} show_legend=true /> }) }
            </div>
            { card("Category Distribution", html! { <DoughnutChart items={categories} /> }) }
        </div>
    }
}

fn category_table(transactions: &[Transaction]) -> Html {
    let stats = category_stats(transactions);
    if stats.is_empty() {
        return card("Category Analysis", empty_state("No transactions to analyze yet."));
    }
    let overall: Decimal = stats.iter().map(|s| s.total).sum();

    card(
        "Category Analysis",
        html! {
            <div class="overflow-x-auto">
                <table class="w-full text-left border-collapse">
                    <thead>
                        <tr class="bg-muted/50 text-muted-foreground text-[10px] uppercase tracking-widest">
                            <th class="px-6 py-3 font-bold">{"Category"}</th>
                            <th class="px-6 py-3 font-bold text-right">{"Total"}</th>
                            <th class="px-6 py-3 font-bold text-right">{"Count"}</th>
                            <th class="px-6 py-3 font-bold text-right">{"Average"}</th>
                            <th class="px-6 py-3 font-bold text-right">{"Share"}</th>
                            <th class="px-6 py-3 font-bold text-right">{"Trend"}</th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-border">
                        { for stats.iter().map(|s| html! {
                            <tr class="text-sm">
                                <td class="px-6 py-3 font-semibold text-foreground">{ s.category.clone() }</td>
                                <td class="px-6 py-3 text-right">{ format_currency(s.total) }</td>
                                <td class="px-6 py-3 text-right">{ s.count.to_string() }</td>
                                <td class="px-6 py-3 text-right">{ format_currency(s.average) }</td>
                                <td class="px-6 py-3 text-right">{ percent(s.share_of(overall)) }</td>
                                <td class={classes!("px-6", "py-3", "text-right", "font-bold", s.trend.text_class())}>
                                    { format!("{} {}", s.trend.arrow(), s.trend.label()) }
                                </td>
                            </tr>
                        }) }
                    </tbody>
                </table>
            </div>
        },
    )
}

fn patterns_card(transactions: &[Transaction]) -> Html {
    let Some(patterns) = spending_patterns(transactions) else {
        return card("Spending Patterns", empty_state("Not enough data for pattern analysis."));
    };
    card(
        "Spending Patterns",
        html! {
            <dl class="grid grid-cols-2 gap-3 text-sm">
                <dt class="text-muted-foreground">{"Peak spending day"}</dt>
                <dd class="text-right font-bold">{ weekday_name(patterns.peak_day) }</dd>
                <dt class="text-muted-foreground">{"Most active category"}</dt>
                <dd class="text-right font-bold">{ patterns.most_active_category.clone() }</dd>
                <dt class="text-muted-foreground">{"Average transaction"}</dt>
                <dd class="text-right font-bold">{ format_currency(patterns.avg_transaction) }</dd>
                <dt class="text-muted-foreground">{"Weekly frequency"}</dt>
                <dd class="text-right font-bold">{ format!("{:.1} transactions", patterns.weekly_frequency.round_dp(1)) }</dd>
            </dl>
        },
    )
}

fn seasonal_card(transactions: &[Transaction]) -> Html {
    let Some(trends) = seasonal_trends(transactions) else {
        return card("Seasonal Trends", empty_state("Not enough data for seasonal analysis."));
    };
    card(
        "Seasonal Trends",
        html! {
            <div class="space-y-3 text-sm">
                <p>
                    <span class="text-muted-foreground">{"Monthly trend: "}</span>
                    <span class="font-bold capitalize">{ trends.direction.label() }</span>
                </p>
                <p>
                    <span class="text-muted-foreground">{"Growth rate: "}</span>
                    <span class="font-bold">{ percent(trends.growth_rate) }</span>
                </p>
                <p class="text-muted-foreground">{ SEASONAL_PATTERN }</p>
                <ul class="divide-y divide-border">
                    { for trends.monthly_totals.iter().map(|(month, total)| html! {
                        <li class="flex justify-between py-1">
                            <span>{ month.clone() }</span>
                            <span class="font-semibold">{ format_currency(*total) }</span>
                        </li>
                    }) }
                </ul>
            </div>
        },
    )
}

fn anomalies_card(anomalies: &[Anomaly]) -> Html {
    let body = if anomalies.is_empty() {
        empty_state("No unusual transactions detected.")
    } else {
        html! {
            <ul class="space-y-2">
                { for anomalies.iter().take(config::ANOMALY_DISPLAY_LIMIT).map(|a| html! {
                    <li class="flex justify-between items-center bg-red-50 border-l-4 border-red-400 px-3 py-2 rounded">
                        <div>
                            <p class="font-bold text-sm text-foreground">{ a.merchant.clone() }</p>
                            <p class="text-xs text-muted-foreground">{ format_date(&a.date) }</p>
                        </div>
                        <span class="font-bold text-red-600">{ format_currency(a.amount) }</span>
                    </li>
                }) }
            </ul>
        }
    };
    card("Anomaly Detection", body)
}

fn optimization_card(state: &DataState) -> Html {
    let body = match state.recommendations.as_deref() {
        None => empty_state(state.placeholder("budget optimization")),
        Some([]) => empty_state("Your budget is already optimal!"),
        Some(list) => html! {
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                { for list.iter().map(|rec| html! {
                    <div class="rounded-xl border border-border p-4 space-y-1">
                        <p class="font-bold text-sm text-foreground">{ rec.category.clone() }</p>
                        <p class="text-xs text-muted-foreground">{ format!("Current: {}", format_currency(rec.current_spending)) }</p>
                        <p class="text-sm">{ rec.recommendation.clone() }</p>
                        <p class="text-xs text-green-700 font-bold">{ format!("Potential savings: {}", format_currency(rec.potential_savings)) }</p>
                    </div>
                }) }
            </div>
        },
    };
    card("Budget Optimization", body)
}
