use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FormError, RecordError};

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Transaction as the backend sends it. Nothing here is trusted yet:
/// every field is kept as raw JSON, and a list element that is not an
/// object decodes to an all-null record, so one bad row never fails the
/// whole list.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub struct RawTransaction {
    pub id: serde_json::Value,
    pub amount: serde_json::Value,
    pub merchant: serde_json::Value,
    pub category: serde_json::Value,
    pub date: serde_json::Value,
    pub description: serde_json::Value,
}

impl From<serde_json::Value> for RawTransaction {
    fn from(value: serde_json::Value) -> Self {
        let serde_json::Value::Object(mut fields) = value else {
            return Self::default();
        };
        let mut take = |key: &str| fields.remove(key).unwrap_or_default();
        Self {
            id: take("id"),
            amount: take("amount"),
            merchant: take("merchant"),
            category: take("category"),
            date: take("date"),
            description: take("description"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub amount: Decimal,
    pub merchant: String,
    pub category: String,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = RecordError;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        let id = match &raw.id {
            serde_json::Value::Null => return Err(RecordError::MissingId),
            value => parse_id(value).ok_or_else(|| RecordError::InvalidId(value.to_string()))?,
        };
        let amount = parse_amount(&raw.amount).ok_or_else(|| RecordError::InvalidAmount {
            id,
            raw: raw.amount.to_string(),
        })?;
        let date = raw
            .date
            .as_str()
            .and_then(parse_api_date)
            .ok_or_else(|| RecordError::InvalidDate {
                id,
                raw: raw.date.to_string(),
            })?;
        let category = text_field(&raw.category)
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());

        Ok(Transaction {
            id,
            amount,
            merchant: text_field(&raw.merchant).unwrap_or_default(),
            category,
            date,
            description: text_field(&raw.description).filter(|d| !d.is_empty()),
        })
    }
}

fn parse_id(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Strings pass through, numbers are shown as written, anything else is absent.
fn text_field(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_amount(value: &serde_json::Value) -> Option<Decimal> {
    let text = match value {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Accepts the date shapes the backend emits: plain dates, SQL-style
/// timestamps and the RFC 2822 form Flask uses for datetime objects.
pub fn parse_api_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub merchant: String,
    pub date: NaiveDate,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CreatedTransaction {
    #[serde(default)]
    pub message: String,
    pub predicted_category: String,
}

/// Raw text of the add-transaction form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactionForm {
    pub amount: String,
    pub merchant: String,
    pub date: String,
    pub description: String,
}

impl TransactionForm {
    pub fn dated(date: NaiveDate) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<NewTransaction, FormError> {
        let amount = self.amount.trim();
        let merchant = self.merchant.trim();
        let date = self.date.trim();

        if amount.is_empty() {
            return Err(FormError::MissingField("amount"));
        }
        if merchant.is_empty() {
            return Err(FormError::MissingField("merchant"));
        }
        if date.is_empty() {
            return Err(FormError::MissingField("date"));
        }

        let amount = Decimal::from_str(amount)
            .ok()
            .filter(|a| a.is_sign_positive() && !a.is_zero())
            .ok_or_else(|| FormError::InvalidAmount(amount.to_string()))?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| FormError::InvalidDate(date.to_string()))?;

        Ok(NewTransaction {
            amount,
            merchant: merchant.to_string(),
            date,
            description: self.description.trim().to_string(),
        })
    }
}

impl From<&Transaction> for TransactionForm {
    fn from(tx: &Transaction) -> Self {
        Self {
            amount: tx.amount.normalize().to_string(),
            merchant: tx.merchant.clone(),
            date: tx.date.format("%Y-%m-%d").to_string(),
            description: tx.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    #[serde(default)]
    pub total_spent: Decimal,
    #[serde(default)]
    pub avg_transaction: Decimal,
    #[serde(default)]
    pub total_transactions: u64,
    #[serde(default)]
    pub monthly_spending: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub category_breakdown: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub recent_spending: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(default)]
    pub merchant: String,
    pub amount: Decimal,
    #[serde(default)]
    pub date: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AnomalyList {
    #[serde(default)]
    pub anomalies: Vec<Anomaly>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_next_month: Decimal,
    pub confidence: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecommendation {
    pub category: String,
    #[serde(default)]
    pub current_spending: Decimal,
    pub recommendation: String,
    #[serde(default)]
    pub potential_savings: Decimal,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RecommendationList {
    #[serde(default)]
    pub recommendations: Vec<BudgetRecommendation>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    pub score: u32,
    #[serde(default)]
    pub factors: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthBand {
    Good,
    Warning,
    Critical,
}

impl HealthScore {
    pub fn band(&self) -> HealthBand {
        match self.score {
            s if s >= 80 => HealthBand::Good,
            s if s >= 60 => HealthBand::Warning,
            _ => HealthBand::Critical,
        }
    }
}

impl HealthBand {
    pub fn text_class(self) -> &'static str {
        match self {
            HealthBand::Good => "text-green-600",
            HealthBand::Warning => "text-amber-500",
            HealthBand::Critical => "text-red-600",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn label(self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Stable => "→",
        }
    }

    pub fn text_class(self) -> &'static str {
        match self {
            Trend::Up => "text-red-600",
            Trend::Down => "text-green-600",
            Trend::Stable => "text-muted-foreground",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Excellent,
    Good,
    Average,
    Poor,
    Inactive,
}

impl Rating {
    pub fn label(self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Average => "Average",
            Rating::Poor => "Poor",
            Rating::Inactive => "Inactive",
        }
    }

    pub fn badge_class(self) -> &'static str {
        match self {
            Rating::Excellent => "bg-green-100 text-green-700",
            Rating::Good => "bg-blue-100 text-blue-700",
            Rating::Average => "bg-amber-100 text-amber-700",
            Rating::Poor => "bg-red-100 text-red-700",
            Rating::Inactive => "bg-slate-100 text-slate-500",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryPerformance {
    pub category: String,
    pub total_spent: Decimal,
    pub avg_amount: Decimal,
    #[serde(default)]
    pub transaction_count: u32,
    pub frequency: f64,
    #[serde(default)]
    pub recent_spending: Decimal,
    #[serde(default)]
    pub previous_spending: Decimal,
    pub trend: Trend,
    pub rating: Rating,
    pub performance_score: u32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PerformanceList {
    #[serde(default)]
    pub categories: Vec<CategoryPerformance>,
}

/// The fixed label set the backend categorizes into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    FoodDining,
    Transportation,
    Shopping,
    Entertainment,
    Healthcare,
    Utilities,
    Education,
    Travel,
    Insurance,
    Other,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::FoodDining => "Food & Dining",
            Category::Transportation => "Transportation",
            Category::Shopping => "Shopping",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Utilities => "Utilities",
            Category::Education => "Education",
            Category::Travel => "Travel",
            Category::Insurance => "Insurance",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw(json: &str) -> RawTransaction {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn backend_record_converts() {
        let tx = Transaction::try_from(raw(
            r#"{"id":7,"amount":42.5,"merchant":"Starbucks","category":"Food & Dining","date":"2024-01-15 00:00:00","description":""}"#,
        ))
        .unwrap();
        assert_eq!(tx.id, 7);
        assert_eq!(tx.amount, dec!(42.5));
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(tx.description, None);
    }

    #[test]
    fn string_amount_and_missing_category() {
        let tx = Transaction::try_from(raw(
            r#"{"id":1,"amount":"19.99","merchant":"Shell","category":null,"date":"2024-02-01"}"#,
        ))
        .unwrap();
        assert_eq!(tx.amount, dec!(19.99));
        assert_eq!(tx.category, UNCATEGORIZED);
    }

    #[test]
    fn malformed_records_are_rejected() {
        let bad_amount = raw(r#"{"id":2,"amount":"abc","merchant":"x","date":"2024-01-01"}"#);
        assert!(matches!(
            Transaction::try_from(bad_amount),
            Err(RecordError::InvalidAmount { id: 2, .. })
        ));

        let bad_date = raw(r#"{"id":3,"amount":5,"merchant":"x","date":"yesterday"}"#);
        assert!(matches!(
            Transaction::try_from(bad_date),
            Err(RecordError::InvalidDate { id: 3, .. })
        ));

        let no_id = raw(r#"{"amount":5,"merchant":"x","date":"2024-01-01"}"#);
        assert_eq!(Transaction::try_from(no_id), Err(RecordError::MissingId));
    }

    #[test]
    fn wrongly_typed_fields_reject_only_that_record() {
        let null_date = raw(r#"{"id":2,"amount":5,"merchant":"x","date":null}"#);
        assert!(matches!(
            Transaction::try_from(null_date),
            Err(RecordError::InvalidDate { id: 2, .. })
        ));

        let numeric_date = raw(r#"{"id":4,"amount":5,"merchant":"x","date":20240101}"#);
        assert!(matches!(
            Transaction::try_from(numeric_date),
            Err(RecordError::InvalidDate { id: 4, .. })
        ));

        let word_id = raw(r#"{"id":"two","amount":5,"merchant":"x","date":"2024-01-01"}"#);
        assert!(matches!(
            Transaction::try_from(word_id),
            Err(RecordError::InvalidId(_))
        ));

        assert_eq!(Transaction::try_from(raw("42")), Err(RecordError::MissingId));
    }

    #[test]
    fn loose_field_types_are_coerced() {
        let tx = Transaction::try_from(raw(
            r#"{"id":"2","amount":5,"merchant":null,"category":"","date":"2024-01-01"}"#,
        ))
        .unwrap();
        assert_eq!(tx.id, 2);
        assert_eq!(tx.merchant, "");
        assert_eq!(tx.category, UNCATEGORIZED);
    }

    #[test]
    fn parses_rfc2822_dates() {
        assert_eq!(
            parse_api_date("Mon, 15 Jan 2024 00:00:00 GMT"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn form_validation() {
        let form = TransactionForm {
            amount: "42.50".into(),
            merchant: " Starbucks ".into(),
            date: "2024-01-15".into(),
            description: String::new(),
        };
        let tx = form.validate().unwrap();
        assert_eq!(tx.amount, dec!(42.50));
        assert_eq!(tx.merchant, "Starbucks");

        let body = serde_json::to_value(&tx).unwrap();
        assert_eq!(body["amount"], serde_json::json!(42.5));
        assert_eq!(body["date"], "2024-01-15");

        let missing = TransactionForm {
            merchant: String::new(),
            ..form.clone()
        };
        assert_eq!(missing.validate(), Err(FormError::MissingField("merchant")));

        let negative = TransactionForm {
            amount: "-3".into(),
            ..form.clone()
        };
        assert!(matches!(negative.validate(), Err(FormError::InvalidAmount(_))));

        let bad_date = TransactionForm {
            date: "15/01/2024".into(),
            ..form
        };
        assert!(matches!(bad_date.validate(), Err(FormError::InvalidDate(_))));
    }

    #[test]
    fn edit_repopulates_form() {
        let tx = Transaction {
            id: 1,
            amount: dec!(12.30),
            merchant: "Uber".into(),
            category: "Transportation".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            description: Some("ride".into()),
        };
        let form = TransactionForm::from(&tx);
        assert_eq!(form.amount, "12.3");
        assert_eq!(form.date, "2024-03-09");
        assert_eq!(form.description, "ride");
    }

    #[test]
    fn analytics_summary_keeps_month_order() {
        let summary: AnalyticsSummary = serde_json::from_str(
            r#"{"total_spent":300.0,"avg_transaction":100,"total_transactions":3,
                "monthly_spending":{"2024-02":200.0,"2024-01":100.0},
                "category_breakdown":{"Shopping":300.0},"recent_spending":0}"#,
        )
        .unwrap();
        let months: Vec<_> = summary.monthly_spending.keys().cloned().collect();
        assert_eq!(months, vec!["2024-01", "2024-02"]);
        assert_eq!(summary.avg_transaction, dec!(100));
    }

    #[test]
    fn performance_record_decodes() {
        let list: PerformanceList = serde_json::from_str(
            r#"{"categories":[{"category":"Travel","total_spent":120.5,"avg_amount":60.25,
                "transaction_count":2,"frequency":0.5,"recent_spending":0,"previous_spending":0,
                "performance_score":75,"rating":"Good","trend":"stable"}]}"#,
        )
        .unwrap();
        assert_eq!(list.categories[0].rating, Rating::Good);
        assert_eq!(list.categories[0].trend, Trend::Stable);
    }

    #[test]
    fn health_bands() {
        let band = |score| HealthScore { score, factors: vec![] }.band();
        assert_eq!(band(80), HealthBand::Good);
        assert_eq!(band(79), HealthBand::Warning);
        assert_eq!(band(60), HealthBand::Warning);
        assert_eq!(band(59), HealthBand::Critical);
    }

    #[test]
    fn health_factors_decode() {
        let health: HealthScore = serde_json::from_str(
            r#"{"score":72,"factors":["Spending concentrated in one category","Regular transaction activity"]}"#,
        )
        .unwrap();
        assert_eq!(health.band(), HealthBand::Warning);
        assert_eq!(health.factors.len(), 2);
        assert_eq!(health.factors[1], "Regular transaction activity");

        let bare: HealthScore = serde_json::from_str(r#"{"score":90}"#).unwrap();
        assert!(bare.factors.is_empty());
    }
}
