//! Page data and the only places it is allowed to change.

use std::cell::Cell;
use std::rc::Rc;

use yew::Reducible;

use crate::analytics::ValidatedBatch;
use crate::models::{
    AnalyticsSummary, Anomaly, BudgetRecommendation, CategoryPerformance, HealthScore, Prediction,
    Transaction,
};

/// Identifies one refresh cycle. Later cycles compare greater.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshToken(u64);

/// Hands out increasing refresh tokens. Cloning shares the counter.
#[derive(Clone, Debug, Default)]
pub struct RefreshSequencer {
    last: Rc<Cell<u64>>,
}

impl RefreshSequencer {
    pub fn next_token(&self) -> RefreshToken {
        let next = self.last.get() + 1;
        self.last.set(next);
        RefreshToken(next)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Forecast {
    Pending,
    Ready(Prediction),
    Unavailable(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Loaded {
    Analytics(AnalyticsSummary),
    AnalyticsUnavailable(String),
    Transactions(ValidatedBatch),
    Anomalies(Vec<Anomaly>),
    Forecast(Forecast),
    Recommendations(Vec<BudgetRecommendation>),
    Health(HealthScore),
    Performance(Vec<CategoryPerformance>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DataAction {
    Begin(RefreshToken),
    Loaded(RefreshToken, Loaded),
    Finished(RefreshToken),
    Removed(i64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataState {
    pub current: RefreshToken,
    pub loading: bool,
    pub analytics: Option<AnalyticsSummary>,
    pub analytics_error: Option<String>,
    pub transactions: Vec<Transaction>,
    pub rejected_records: usize,
    pub anomalies: Vec<Anomaly>,
    pub forecast: Forecast,
    pub recommendations: Option<Vec<BudgetRecommendation>>,
    pub health: Option<HealthScore>,
    pub performance: Option<Vec<CategoryPerformance>>,
}

impl Default for DataState {
    fn default() -> Self {
        Self {
            current: RefreshToken::default(),
            loading: true,
            analytics: None,
            analytics_error: None,
            transactions: Vec::new(),
            rejected_records: 0,
            anomalies: Vec::new(),
            forecast: Forecast::Pending,
            recommendations: None,
            health: None,
            performance: None,
        }
    }
}

impl DataState {
    /// What to show for a section that has no data. While a cycle is
    /// running that is a loading hint; once it has finished the section is
    /// not coming, and the analytics message says why if there is one.
    pub fn placeholder(&self, section: &str) -> String {
        if self.loading {
            return format!("Loading {section}...");
        }
        match &self.analytics_error {
            Some(message) => message.clone(),
            None => format!("No {section} available right now."),
        }
    }

    fn apply(&mut self, loaded: Loaded) {
        match loaded {
            Loaded::Analytics(summary) => {
                self.analytics = Some(summary);
                self.analytics_error = None;
            }
            Loaded::AnalyticsUnavailable(message) => self.analytics_error = Some(message),
            Loaded::Transactions(batch) => {
                self.rejected_records = batch.rejected.len();
                self.transactions = batch.records;
            }
            Loaded::Anomalies(list) => self.anomalies = list,
            Loaded::Forecast(forecast) => self.forecast = forecast,
            Loaded::Recommendations(list) => self.recommendations = Some(list),
            Loaded::Health(score) => self.health = Some(score),
            Loaded::Performance(list) => self.performance = Some(list),
        }
    }
}

impl Reducible for DataState {
    type Action = DataAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let stale = match &action {
            DataAction::Begin(token)
            | DataAction::Loaded(token, _)
            | DataAction::Finished(token) => *token < self.current,
            DataAction::Removed(_) => false,
        };
        if stale {
            tracing::debug!(?action, current = ?self.current, "dropping stale refresh result");
            return self;
        }

        let mut next = (*self).clone();
        match action {
            DataAction::Begin(token) => {
                next.current = token;
                next.loading = true;
            }
            DataAction::Loaded(_, loaded) => next.apply(loaded),
            DataAction::Finished(_) => next.loading = false,
            DataAction::Removed(id) => next.transactions.retain(|tx| tx.id != id),
        }
        Rc::new(next)
    }
}
