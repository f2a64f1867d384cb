//! Client-side aggregation over already-fetched transactions.
//!
//! Everything here is a pure function of its input. Thresholds are policy
//! constants carried over from the product, not derived statistics.

use chrono::{Datelike, Weekday};
use rust_decimal::Decimal;

use crate::error::RecordError;
use crate::models::{AnalyticsSummary, RawTransaction, Transaction, Trend};

/// Average transaction size above which a category is marked `up`.
pub const TREND_UP_ABOVE: Decimal = Decimal::ONE_HUNDRED;
/// Average transaction size below which a category is marked `down`.
pub const TREND_DOWN_BELOW: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
/// Transactions are assumed to span four weeks when computing frequency.
pub const ASSUMED_WEEKS_OF_HISTORY: Decimal = Decimal::from_parts(4, 0, 0, false, 0);
/// Second half of the year above 1.1x the first half reads as increasing.
pub const SEASONAL_RISE_FACTOR: Decimal = Decimal::from_parts(11, 0, 0, false, 1);
/// Second half below 0.9x the first half reads as decreasing.
pub const SEASONAL_FALL_FACTOR: Decimal = Decimal::from_parts(9, 0, 0, false, 1);
/// Summary totals are spread over a 30 day month for per-day metrics.
pub const DAYS_PER_MONTH: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

pub const SEASONAL_PATTERN: &str = "Consistent spending throughout the year";

/// `result[i]` is the mean of the last `window` values up to and including
/// `i`; the window shrinks near the start instead of padding.
pub fn moving_average(values: &[Decimal], window: usize) -> Vec<Decimal> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            let len = Decimal::from(slice.len());
            slice
                .iter()
                .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
                .map(|sum| sum / len)
                .unwrap_or_else(|| {
                    slice
                        .iter()
                        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v / len))
                })
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryStats {
    pub category: String,
    pub total: Decimal,
    pub count: usize,
    pub average: Decimal,
    pub trend: Trend,
}

impl CategoryStats {
    /// Percentage of `overall` this category accounts for.
    pub fn share_of(&self, overall: Decimal) -> Decimal {
        if overall.is_zero() {
            return Decimal::ZERO;
        }
        self.total
            .checked_div(overall)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO)
    }
}

pub fn classify_average(average: Decimal) -> Trend {
    if average > TREND_UP_ABOVE {
        Trend::Up
    } else if average < TREND_DOWN_BELOW {
        Trend::Down
    } else {
        Trend::Stable
    }
}

fn warn_overflow(tx: &Transaction) {
    tracing::warn!(id = tx.id, amount = %tx.amount, "amount overflows total, skipping");
}

/// Sum of amounts; a transaction that would overflow the sum is left out.
fn checked_total(transactions: &[Transaction]) -> Decimal {
    transactions.iter().fold(Decimal::ZERO, |total, tx| {
        total.checked_add(tx.amount).unwrap_or_else(|| {
            warn_overflow(tx);
            total
        })
    })
}

/// Per-category totals in first-encountered order.
pub fn category_stats(transactions: &[Transaction]) -> Vec<CategoryStats> {
    let mut stats: Vec<CategoryStats> = Vec::new();
    for tx in transactions {
        match stats.iter_mut().find(|s| s.category == tx.category) {
            Some(entry) => match entry.total.checked_add(tx.amount) {
                Some(total) => {
                    entry.total = total;
                    entry.count += 1;
                }
                None => warn_overflow(tx),
            },
            None => stats.push(CategoryStats {
                category: tx.category.clone(),
                total: tx.amount,
                count: 1,
                average: Decimal::ZERO,
                trend: Trend::Stable,
            }),
        }
    }

    for entry in &mut stats {
        entry.average = entry.total / Decimal::from(entry.count);
        entry.trend = classify_average(entry.average);
    }
    stats
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpendingPatterns {
    pub peak_day: Weekday,
    pub most_active_category: String,
    pub avg_transaction: Decimal,
    pub weekly_frequency: Decimal,
}

pub fn spending_patterns(transactions: &[Transaction]) -> Option<SpendingPatterns> {
    let peak_day = most_frequent(transactions.iter().map(|tx| tx.date.weekday()))?;
    let most_active_category = most_frequent(transactions.iter().map(|tx| tx.category.clone()))?;

    let count = Decimal::from(transactions.len());
    let total = checked_total(transactions);

    Some(SpendingPatterns {
        peak_day,
        most_active_category,
        avg_transaction: total / count,
        weekly_frequency: count / ASSUMED_WEEKS_OF_HISTORY,
    })
}

/// Highest count wins; on a tie the key seen first in the scan is kept.
fn most_frequent<K: PartialEq>(keys: impl Iterator<Item = K>) -> Option<K> {
    let mut counts: Vec<(K, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }

    let mut best: Option<(K, usize)> = None;
    for (key, n) in counts {
        let replace = match &best {
            Some((_, best_n)) => n > *best_n,
            None => true,
        };
        if replace {
            best = Some((key, n));
        }
    }
    best.map(|(key, _)| key)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonthlyTrend {
    Increasing,
    Decreasing,
    Stable,
}

impl MonthlyTrend {
    pub fn label(self) -> &'static str {
        match self {
            MonthlyTrend::Increasing => "increasing",
            MonthlyTrend::Decreasing => "decreasing",
            MonthlyTrend::Stable => "stable",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SeasonalTrends {
    /// Month name to total. Years are merged.
    pub monthly_totals: Vec<(String, Decimal)>,
    pub direction: MonthlyTrend,
    pub growth_rate: Decimal,
}

pub fn seasonal_trends(transactions: &[Transaction]) -> Option<SeasonalTrends> {
    if transactions.is_empty() {
        return None;
    }

    let mut monthly_totals: Vec<(String, Decimal)> = Vec::new();
    for tx in transactions {
        let month = tx.date.format("%B").to_string();
        match monthly_totals.iter_mut().find(|(m, _)| *m == month) {
            Some((_, total)) => match total.checked_add(tx.amount) {
                Some(sum) => *total = sum,
                None => warn_overflow(tx),
            },
            None => monthly_totals.push((month, tx.amount)),
        }
    }

    let totals: Vec<Decimal> = monthly_totals.iter().map(|(_, t)| *t).collect();
    Some(SeasonalTrends {
        direction: monthly_direction(&totals),
        growth_rate: growth_rate(&totals),
        monthly_totals,
    })
}

/// Compares the second half of `totals` against the first. An odd element
/// goes to the second half.
pub fn monthly_direction(totals: &[Decimal]) -> MonthlyTrend {
    if totals.len() < 2 {
        return MonthlyTrend::Stable;
    }
    let half_sum = |half: &[Decimal]| {
        half.iter()
            .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
            .unwrap_or(Decimal::MAX)
    };
    let (first, second) = totals.split_at(totals.len() / 2);
    let (first, second) = (half_sum(first), half_sum(second));

    // A first half too large to scale cannot be exceeded by 10%.
    let rise_bar = first.checked_mul(SEASONAL_RISE_FACTOR).unwrap_or(Decimal::MAX);
    if second > rise_bar {
        MonthlyTrend::Increasing
    } else if second < first * SEASONAL_FALL_FACTOR {
        MonthlyTrend::Decreasing
    } else {
        MonthlyTrend::Stable
    }
}

/// Percent change from the first to the last total; zero without at least
/// two months, when the first month is zero, or when the ratio does not fit
/// in a `Decimal`.
pub fn growth_rate(totals: &[Decimal]) -> Decimal {
    match (totals.first(), totals.last()) {
        (Some(first), Some(last)) if totals.len() >= 2 && !first.is_zero() => last
            .checked_sub(*first)
            .and_then(|change| change.checked_div(*first))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(|rate| rate.round_dp(1))
            .unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidatedBatch {
    pub records: Vec<Transaction>,
    pub rejected: Vec<RecordError>,
}

/// Validates each record on its own. A record whose amount would push the
/// running total past `Decimal::MAX` is rejected too, so every helper here
/// can sum the accepted records without overflowing.
pub fn partition_records(raw: Vec<RawTransaction>) -> ValidatedBatch {
    let mut batch = ValidatedBatch::default();
    let mut running = Decimal::ZERO;
    for record in raw {
        let checked = Transaction::try_from(record).and_then(|tx| {
            running = running
                .checked_add(tx.amount.abs())
                .ok_or(RecordError::AmountOverflow { id: tx.id })?;
            Ok(tx)
        });
        match checked {
            Ok(tx) => batch.records.push(tx),
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed transaction");
                batch.rejected.push(err);
            }
        }
    }
    batch
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyMetrics {
    pub total_transactions: u64,
    pub avg_daily_spending: Decimal,
    pub most_expensive_category: Option<String>,
    pub spending_velocity: Decimal,
}

impl KeyMetrics {
    pub fn from_summary(summary: &AnalyticsSummary) -> Self {
        let mut most_expensive: Option<(&String, Decimal)> = None;
        for (category, amount) in &summary.category_breakdown {
            if most_expensive.map_or(true, |(_, best)| *amount > best) {
                most_expensive = Some((category, *amount));
            }
        }

        Self {
            total_transactions: summary.total_transactions,
            avg_daily_spending: (summary.total_spent / DAYS_PER_MONTH).round_dp(2),
            most_expensive_category: most_expensive.map(|(c, _)| c.clone()),
            spending_velocity: (summary.recent_spending / DAYS_PER_MONTH).round_dp(2),
        }
    }
}

#[cfg(test)]
mod tests;
