//! Keyword guesser for the unauthenticated demo page.
//!
//! Real transactions are categorized by the backend through
//! [`crate::api::RemoteClassifier`]; nothing here is used for stored data.

use rust_decimal::Decimal;

use crate::models::Category;

/// Confidence figure shown next to a demo prediction.
pub const DEMO_CONFIDENCE_PERCENT: u32 = 95;

const KEYWORDS: &[(Category, &[&str])] = &[
    (Category::FoodDining, &["mcdonald", "starbucks", "chipotle", "pizza"]),
    (Category::Transportation, &["uber", "lyft", "shell", "exxon"]),
    (Category::Shopping, &["amazon", "walmart", "target", "best buy"]),
    (Category::Entertainment, &["netflix", "spotify", "movie", "concert"]),
    (Category::Healthcare, &["cvs", "walgreens", "doctor", "hospital"]),
    (Category::Utilities, &["electric", "water", "internet", "phone"]),
    (Category::Education, &["university", "course", "bookstore", "library"]),
    (Category::Travel, &["airline", "hotel", "travel", "car rental"]),
    (Category::Insurance, &["insurance"]),
];

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DemoClassifier;

#[derive(Clone, Debug, PartialEq)]
pub struct DemoAnalysis {
    pub category: Category,
    pub confidence_percent: u32,
    pub insights: Vec<&'static str>,
}

impl DemoClassifier {
    pub fn predict(&self, merchant: &str) -> Category {
        let merchant = merchant.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| merchant.contains(w)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Other)
    }

    pub fn insights(&self, amount: Decimal, category: Category) -> Vec<&'static str> {
        let mut out = Vec::new();
        if amount > Decimal::ONE_HUNDRED {
            out.push("This is a high-value transaction. Consider if this expense aligns with your budget goals.");
        }
        if category == Category::FoodDining && amount > Decimal::from(50) {
            out.push("This is above average for dining expenses. Consider cooking at home to save money.");
        }
        if category == Category::Shopping && amount > Decimal::from(200) {
            out.push("Large shopping transaction detected. Review if this purchase was planned.");
        }
        if category == Category::Entertainment && amount > Decimal::ONE_HUNDRED {
            out.push("Significant entertainment expense. Balance with other financial priorities.");
        }
        if out.is_empty() {
            out.push("This transaction appears to be within normal spending patterns.");
        }
        out
    }

    pub fn analyze(&self, merchant: &str, amount: Decimal) -> DemoAnalysis {
        let category = self.predict(merchant);
        DemoAnalysis {
            category,
            confidence_percent: DEMO_CONFIDENCE_PERCENT,
            insights: self.insights(amount, category),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn keywords_match_case_insensitively() {
        let c = DemoClassifier;
        assert_eq!(c.predict("STARBUCKS #1234"), Category::FoodDining);
        assert_eq!(c.predict("Uber Trip"), Category::Transportation);
        assert_eq!(c.predict("Best Buy Store"), Category::Shopping);
        assert_eq!(c.predict("State Farm Insurance"), Category::Insurance);
    }

    #[test]
    fn unknown_merchant_is_other() {
        assert_eq!(DemoClassifier.predict("Corner Kiosk"), Category::Other);
        assert_eq!(DemoClassifier.predict(""), Category::Other);
    }

    #[test]
    fn earlier_keyword_lists_win() {
        // "pizza" (dining) is checked before "hotel" (travel)
        assert_eq!(DemoClassifier.predict("Hotel Pizza Bar"), Category::FoodDining);
    }

    #[test]
    fn insights_follow_thresholds() {
        let c = DemoClassifier;
        assert_eq!(c.insights(dec!(20), Category::Other).len(), 1);
        assert!(c.insights(dec!(20), Category::Other)[0].contains("normal"));

        let dining = c.insights(dec!(120), Category::FoodDining);
        assert_eq!(dining.len(), 2);

        let shopping = c.insights(dec!(150), Category::Shopping);
        assert_eq!(shopping.len(), 1);
        assert!(shopping[0].contains("high-value"));
    }

    #[test]
    fn analysis_reports_fixed_confidence() {
        let analysis = DemoClassifier.analyze("Netflix", dec!(15.99));
        assert_eq!(analysis.category, Category::Entertainment);
        assert_eq!(analysis.confidence_percent, 95);
    }
}
