use super::*;
use crate::models::{AnalyticsSummary, RawTransaction};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn tx(id: i64, amount: Decimal, category: &str, date: &str) -> Transaction {
    Transaction {
        id,
        amount,
        merchant: format!("Merchant {id}"),
        category: category.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        description: None,
    }
}

// ── Moving average ────────────────────────────────────────────

#[test]
fn moving_average_window_one_is_identity() {
    let values = [dec!(10), dec!(20), dec!(30)];
    assert_eq!(moving_average(&values, 1), vec![dec!(10), dec!(20), dec!(30)]);
}

#[test]
fn moving_average_window_shrinks_at_start() {
    let values = [dec!(10), dec!(20), dec!(30)];
    assert_eq!(moving_average(&values, 3), vec![dec!(10), dec!(15), dec!(20)]);
}

#[test]
fn moving_average_slides_past_window() {
    let values = [dec!(10), dec!(20), dec!(30), dec!(40)];
    assert_eq!(
        moving_average(&values, 2),
        vec![dec!(10), dec!(15), dec!(25), dec!(35)]
    );
}

#[test]
fn moving_average_guards_degenerate_input() {
    assert!(moving_average(&[], 3).is_empty());
    assert_eq!(moving_average(&[dec!(7), dec!(9)], 0), vec![dec!(7), dec!(9)]);
}

#[test]
fn moving_average_is_repeatable() {
    let values = [dec!(3.5), dec!(8), dec!(1.25), dec!(12)];
    assert_eq!(moving_average(&values, 3), moving_average(&values, 3));
}

// ── Category statistics ───────────────────────────────────────

#[test]
fn category_totals_conserve_input_sum() {
    let txns = vec![
        tx(1, dec!(12.40), "Food & Dining", "2024-01-01"),
        tx(2, dec!(250.00), "Travel", "2024-01-02"),
        tx(3, dec!(7.60), "Food & Dining", "2024-01-03"),
        tx(4, dec!(99.99), "Shopping", "2024-01-04"),
    ];
    let stats = category_stats(&txns);
    let per_category: Decimal = stats.iter().map(|s| s.total).sum();
    let overall: Decimal = txns.iter().map(|t| t.amount).sum();
    assert_eq!(per_category, overall);
    assert_eq!(stats.len(), 3);
}

#[test]
fn category_stats_keep_first_seen_order_and_average() {
    let txns = vec![
        tx(1, dec!(30), "Shopping", "2024-01-01"),
        tx(2, dec!(200), "Travel", "2024-01-02"),
        tx(3, dec!(90), "Shopping", "2024-01-03"),
    ];
    let stats = category_stats(&txns);
    assert_eq!(stats[0].category, "Shopping");
    assert_eq!(stats[0].count, 2);
    assert_eq!(stats[0].average, dec!(60));
    assert_eq!(stats[0].trend, Trend::Stable);
    assert_eq!(stats[1].trend, Trend::Up);
}

#[test]
fn trend_boundaries_are_strict() {
    assert_eq!(classify_average(dec!(100)), Trend::Stable);
    assert_eq!(classify_average(dec!(100.01)), Trend::Up);
    assert_eq!(classify_average(dec!(50)), Trend::Stable);
    assert_eq!(classify_average(dec!(49.99)), Trend::Down);
}

#[test]
fn category_share_handles_zero_total() {
    let stats = category_stats(&[tx(1, dec!(25), "Other", "2024-01-01")]);
    assert_eq!(stats[0].share_of(dec!(100)), dec!(25));
    assert_eq!(stats[0].share_of(Decimal::ZERO), Decimal::ZERO);
}

// ── Spending patterns ─────────────────────────────────────────

#[test]
fn peak_day_tie_goes_to_first_seen() {
    // 2024-01-16 is a Tuesday, 2024-01-15 a Monday.
    let txns = vec![
        tx(1, dec!(10), "Shopping", "2024-01-16"),
        tx(2, dec!(10), "Travel", "2024-01-15"),
        tx(3, dec!(10), "Travel", "2024-01-22"),
        tx(4, dec!(10), "Shopping", "2024-01-23"),
    ];
    let patterns = spending_patterns(&txns).unwrap();
    assert_eq!(patterns.peak_day, Weekday::Tue);
    assert_eq!(patterns.most_active_category, "Shopping");
}

#[test]
fn peak_day_prefers_higher_count() {
    let txns = vec![
        tx(1, dec!(10), "Shopping", "2024-01-16"),
        tx(2, dec!(10), "Travel", "2024-01-15"),
        tx(3, dec!(10), "Travel", "2024-01-22"),
    ];
    let patterns = spending_patterns(&txns).unwrap();
    assert_eq!(patterns.peak_day, Weekday::Mon);
    assert_eq!(patterns.most_active_category, "Travel");
}

#[test]
fn patterns_average_and_frequency() {
    let txns = vec![
        tx(1, dec!(10), "Shopping", "2024-01-01"),
        tx(2, dec!(30), "Shopping", "2024-01-02"),
    ];
    let patterns = spending_patterns(&txns).unwrap();
    assert_eq!(patterns.avg_transaction, dec!(20));
    assert_eq!(patterns.weekly_frequency, dec!(0.5));
}

#[test]
fn patterns_need_transactions() {
    assert_eq!(spending_patterns(&[]), None);
    assert_eq!(seasonal_trends(&[]), None);
}

// ── Seasonal trends ───────────────────────────────────────────

#[test]
fn growth_rate_between_first_and_last_month() {
    assert_eq!(growth_rate(&[dec!(100), dec!(150)]), dec!(50));
    assert_eq!(growth_rate(&[dec!(100)]), Decimal::ZERO);
    assert_eq!(growth_rate(&[]), Decimal::ZERO);
    assert_eq!(growth_rate(&[Decimal::ZERO, dec!(40)]), Decimal::ZERO);
}

#[test]
fn direction_uses_ten_percent_band() {
    assert_eq!(monthly_direction(&[dec!(100), dec!(111)]), MonthlyTrend::Increasing);
    assert_eq!(monthly_direction(&[dec!(100), dec!(110)]), MonthlyTrend::Stable);
    assert_eq!(monthly_direction(&[dec!(100), dec!(90)]), MonthlyTrend::Stable);
    assert_eq!(monthly_direction(&[dec!(100), dec!(89)]), MonthlyTrend::Decreasing);
    assert_eq!(monthly_direction(&[dec!(100)]), MonthlyTrend::Stable);
}

#[test]
fn odd_split_gives_extra_month_to_second_half() {
    // first half [100], second half [60, 60] = 120 > 110
    assert_eq!(
        monthly_direction(&[dec!(100), dec!(60), dec!(60)]),
        MonthlyTrend::Increasing
    );
}

#[test]
fn seasonal_trends_merge_years_by_month_name() {
    let txns = vec![
        tx(1, dec!(60), "Shopping", "2023-01-10"),
        tx(2, dec!(40), "Shopping", "2024-01-12"),
        tx(3, dec!(150), "Travel", "2024-02-01"),
    ];
    let trends = seasonal_trends(&txns).unwrap();
    assert_eq!(
        trends.monthly_totals,
        vec![("January".to_string(), dec!(100)), ("February".to_string(), dec!(150))]
    );
    assert_eq!(trends.growth_rate, dec!(50));
    assert_eq!(trends.direction, MonthlyTrend::Increasing);
}

// ── Record validation ─────────────────────────────────────────

#[test]
fn malformed_records_are_skipped_and_reported() {
    let raw: Vec<RawTransaction> = serde_json::from_str(
        r#"[{"id":1,"amount":10,"merchant":"a","category":"Other","date":"2024-01-01"},
            {"id":2,"amount":"n/a","merchant":"b","category":"Other","date":"2024-01-01"},
            {"id":3,"amount":5,"merchant":"c","category":"Other","date":"not a date"}]"#,
    )
    .unwrap();
    let batch = partition_records(raw);
    assert_eq!(batch.records.len(), 1);
    assert_eq!(batch.records[0].id, 1);
    assert_eq!(batch.rejected.len(), 2);
}

// ── Overflow ──────────────────────────────────────────────────

#[test]
fn overflowing_amount_is_rejected_like_a_malformed_record() {
    let huge = (Decimal::MAX - Decimal::ONE).to_string();
    let raw: Vec<RawTransaction> = serde_json::from_str(&format!(
        r#"[{{"id":1,"amount":"{huge}","merchant":"a","category":"Travel","date":"2024-01-01"}},
            {{"id":2,"amount":"{huge}","merchant":"b","category":"Travel","date":"2024-01-02"}},
            {{"id":3,"amount":1,"merchant":"c","category":"Travel","date":"2024-01-03"}}]"#
    ))
    .unwrap();
    let batch = partition_records(raw);
    assert_eq!(batch.rejected, vec![RecordError::AmountOverflow { id: 2 }]);

    let stats = category_stats(&batch.records);
    assert_eq!(stats[0].count, 2);
    assert!(spending_patterns(&batch.records).is_some());
    assert!(seasonal_trends(&batch.records).is_some());
}

#[test]
fn aggregation_skips_amounts_that_overflow() {
    let huge = Decimal::MAX - Decimal::ONE;
    let txs = vec![
        tx(1, huge, "Travel", "2024-01-01"),
        tx(2, huge, "Travel", "2024-01-02"),
    ];

    let stats = category_stats(&txs);
    assert_eq!(stats[0].total, huge);
    assert_eq!(stats[0].count, 1);

    let patterns = spending_patterns(&txs).unwrap();
    assert_eq!(patterns.avg_transaction, huge / dec!(2));

    let trends = seasonal_trends(&txs).unwrap();
    assert_eq!(trends.monthly_totals, vec![("January".to_string(), huge)]);
}

#[test]
fn growth_rate_falls_back_to_zero_when_ratio_overflows() {
    assert_eq!(growth_rate(&[dec!(0.0000000000000000000000000001), dec!(1000)]), Decimal::ZERO);
}

#[test]
fn huge_monthly_totals_do_not_panic() {
    let huge = Decimal::MAX - Decimal::ONE;
    assert_eq!(monthly_direction(&[huge, huge, huge]), MonthlyTrend::Stable);
    assert_eq!(moving_average(&[huge, huge], 2), vec![huge, huge]);
}

// ── Key metrics ───────────────────────────────────────────────

#[test]
fn key_metrics_from_summary() {
    let mut summary = AnalyticsSummary {
        total_spent: dec!(900),
        recent_spending: dec!(45),
        total_transactions: 12,
        ..AnalyticsSummary::default()
    };
    summary.category_breakdown.insert("Shopping".into(), dec!(400));
    summary.category_breakdown.insert("Travel".into(), dec!(500));

    let metrics = KeyMetrics::from_summary(&summary);
    assert_eq!(metrics.total_transactions, 12);
    assert_eq!(metrics.avg_daily_spending, dec!(30));
    assert_eq!(metrics.spending_velocity, dec!(1.5));
    assert_eq!(metrics.most_expensive_category.as_deref(), Some("Travel"));
}

#[test]
fn key_metrics_empty_breakdown() {
    let metrics = KeyMetrics::from_summary(&AnalyticsSummary::default());
    assert_eq!(metrics.most_expensive_category, None);
    assert_eq!(metrics.avg_daily_spending, Decimal::ZERO);
}
