mod analytics;
mod dashboard;
mod demo;
mod settings;

pub use analytics::AnalyticsPage;
pub use dashboard::DashboardPage;
pub use demo::DemoPage;
pub use settings::SettingsPage;

use yew::prelude::*;

use crate::analytics::partition_records;
use crate::api::ApiClient;
use crate::components::Notifier;
use crate::config::Settings;
use crate::error::ApiError;
use crate::state::{DataAction, DataState, Forecast, Loaded, RefreshToken};

/// Which optional sections a page wants in its refresh cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefreshPlan {
    pub health: bool,
    pub performance: bool,
}

pub fn client_from(settings: &Option<UseStateHandle<Settings>>) -> ApiClient {
    let endpoint = settings
        .as_ref()
        .map(|s| s.api_endpoint.clone())
        .unwrap_or_else(|| Settings::default().api_endpoint);
    ApiClient::new(endpoint)
}

#[hook]
pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().unwrap_or_else(|| Notifier::new(Callback::from(|_| ())))
}

/// One refresh cycle: the analytics snapshot gates everything else, the
/// remaining sections load independently and fail on their own.
pub async fn refresh(
    client: ApiClient,
    token: RefreshToken,
    dispatcher: UseReducerDispatcher<DataState>,
    notifier: Notifier,
    plan: RefreshPlan,
) {
    tracing::debug!(?token, "refresh cycle started");
    let send = |loaded: Loaded| dispatcher.dispatch(DataAction::Loaded(token, loaded));

    match client.analytics().await {
        Ok(summary) => send(Loaded::Analytics(summary)),
        Err(ApiError::Backend(message)) => {
            tracing::warn!(%message, "analytics unavailable");
            send(Loaded::AnalyticsUnavailable(message));
            dispatcher.dispatch(DataAction::Finished(token));
            return;
        }
        Err(err) => {
            tracing::error!(error = %err, "error loading analytics");
            notifier.error(err.user_message());
            dispatcher.dispatch(DataAction::Finished(token));
            return;
        }
    }

    let mut failed: Vec<&'static str> = Vec::new();

    match client.list_transactions().await {
        Ok(raw) => send(Loaded::Transactions(partition_records(raw))),
        Err(err) => {
            tracing::error!(error = %err, "error loading transactions");
            failed.push("transactions");
        }
    }

    if plan.health {
        match client.health_score().await {
            Ok(score) => send(Loaded::Health(score)),
            Err(err) => {
                tracing::error!(error = %err, "error loading health score");
                failed.push("health score");
            }
        }
    }

    match client.anomalies().await {
        Ok(list) => send(Loaded::Anomalies(list)),
        Err(err) => {
            tracing::error!(error = %err, "error loading anomalies");
            failed.push("anomalies");
        }
    }

    let forecast = match client.predict().await {
        Ok(prediction) => Forecast::Ready(prediction),
        Err(ApiError::Backend(message)) => Forecast::Unavailable(message),
        Err(err) => {
            tracing::error!(error = %err, "error loading predictions");
            Forecast::Unavailable("Prediction is not available right now.".to_string())
        }
    };
    send(Loaded::Forecast(forecast));

    match client.budget_recommendations().await {
        Ok(list) => send(Loaded::Recommendations(list)),
        Err(err) => {
            tracing::error!(error = %err, "error loading recommendations");
            failed.push("recommendations");
        }
    }

    if plan.performance {
        match client.category_performance().await {
            Ok(list) => send(Loaded::Performance(list)),
            Err(err) => {
                tracing::error!(error = %err, "error loading category performance");
                failed.push("category performance");
            }
        }
    }

    if let Some(message) = section_failure_message(&failed) {
        notifier.error(message);
    }
    dispatcher.dispatch(DataAction::Finished(token));
}

/// One banner for every section that failed in a cycle, so a dead backend
/// does not stack a banner per endpoint.
fn section_failure_message(failed: &[&str]) -> Option<String> {
    if failed.is_empty() {
        return None;
    }
    Some(format!(
        "Could not load {}. Showing the last available data.",
        failed.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_sections_share_one_banner() {
        assert_eq!(section_failure_message(&[]), None);
        assert_eq!(
            section_failure_message(&["anomalies", "recommendations"]).as_deref(),
            Some("Could not load anomalies, recommendations. Showing the last available data.")
        );
    }
}
