//! Category assignment for incoming transactions
//!
//! Categories come from an ordered rule table: the first rule whose pattern matches
//! the lower-cased description wins. Order is a priority list, so "Uber food refund"
//! is Transport even though the Food and Income rules also match.
//!
//! When nothing matches, credits fall back to "Income" and everything else to "Other".
//! Categories are assigned once at insert time and stored with the row.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;

/// Fallback for positive amounts that match no rule
pub const FALLBACK_INCOME: &str = "Income";

/// Fallback for zero/negative amounts that match no rule
pub const FALLBACK_OTHER: &str = "Other";

/// Built-in rule table, in priority order
pub const DEFAULT_RULES: &[(&str, &str)] = &[
    ("uber|ola|ride|cab", "Transport"),
    ("swiggy|zomato|restaurant|cafe|food", "Food"),
    ("rent|maintenance|housing|flat", "Housing"),
    ("amazon|flipkart|shopping|store", "Shopping"),
    ("upi|transfer|imps|neft", "Transfers"),
    ("salary|credit|refund|reversal", "Income"),
];

/// A user-supplied rule, as read from config
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleConfig {
    pub pattern: String,
    pub category: String,
}

/// A compiled rule: unanchored regex search against the description
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub pattern: Regex,
    pub category: String,
}

impl CategoryRule {
    pub fn new(pattern: &str, category: &str) -> Result<Self> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self {
            pattern,
            category: category.to_string(),
        })
    }

    fn matches(&self, description: &str) -> bool {
        self.pattern.is_match(description)
    }
}

/// Ordered rule table with sign-based fallback
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<CategoryRule>,
}

impl Categorizer {
    /// Build from (pattern, category) pairs, keeping their order
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Result<Self> {
        let rules = pairs
            .iter()
            .map(|(pattern, category)| CategoryRule::new(pattern, category))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Build from configured rules, keeping their order
    ///
    /// An empty list means "use the built-in table".
    pub fn from_rules(rules: &[RuleConfig]) -> Result<Self> {
        if rules.is_empty() {
            return Ok(Self::default());
        }
        let pairs: Vec<(&str, &str)> = rules
            .iter()
            .map(|r| (r.pattern.as_str(), r.category.as_str()))
            .collect();
        Self::from_pairs(&pairs)
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Assign a category to a description and signed amount
    pub fn assign(&self, description: &str, amount: f64) -> String {
        let desc = description.to_lowercase();

        for rule in &self.rules {
            if rule.matches(&desc) {
                debug!(category = %rule.category, pattern = %rule.pattern, "Category rule matched");
                return rule.category.clone();
            }
        }

        if amount > 0.0 {
            FALLBACK_INCOME.to_string()
        } else {
            FALLBACK_OTHER.to_string()
        }
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_RULES).expect("built-in category patterns are valid regexes")
    }
}

/// Assign a category using the built-in rule table
pub fn assign_category(description: &str, amount: f64) -> String {
    static DEFAULT: OnceLock<Categorizer> = OnceLock::new();
    DEFAULT.get_or_init(Categorizer::default).assign(description, amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_default_rule() {
        assert_eq!(assign_category("Uber trip to airport", -450.0), "Transport");
        assert_eq!(assign_category("Swiggy order", -320.0), "Food");
        assert_eq!(assign_category("Monthly RENT", -15000.0), "Housing");
        assert_eq!(assign_category("Amazon.in purchase", -999.0), "Shopping");
        assert_eq!(assign_category("NEFT to savings", -2000.0), "Transfers");
        assert_eq!(assign_category("Salary for August", 85000.0), "Income");
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // Matches Transport, Food and Income patterns
        assert_eq!(assign_category("Uber food refund", 120.0), "Transport");
        // Matches Food and Shopping
        assert_eq!(assign_category("food store", -50.0), "Food");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(assign_category("UPI TRANSFER to John", -500.0), "Transfers");
        assert_eq!(assign_category("ZoMaTo", -1.0), "Food");
    }

    #[test]
    fn test_substring_match() {
        // "ola" inside "cola" still counts: rules are unanchored substring searches
        assert_eq!(assign_category("coca cola", -40.0), "Transport");
        // "credit" rule catches "credited"
        assert_eq!(assign_category("Interest credited", 12.0), "Income");
    }

    #[test]
    fn test_fallback_by_sign() {
        assert_eq!(assign_category("", 100.0), "Income");
        assert_eq!(assign_category("", -50.0), "Other");
        assert_eq!(assign_category("", 0.0), "Other");
        assert_eq!(assign_category("Mystery merchant", -10.0), "Other");
        assert_eq!(assign_category("Mystery merchant", 10.0), "Income");
    }

    #[test]
    fn test_default_table_order() {
        let categorizer = Categorizer::default();
        let names: Vec<&str> = categorizer
            .rules()
            .iter()
            .map(|r| r.category.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Transport", "Food", "Housing", "Shopping", "Transfers", "Income"]
        );
    }

    #[test]
    fn test_custom_rules_keep_order() {
        let rules = vec![
            RuleConfig {
                pattern: "netflix|spotify".to_string(),
                category: "Subscriptions".to_string(),
            },
            RuleConfig {
                pattern: "^atm".to_string(),
                category: "Cash".to_string(),
            },
        ];
        let categorizer = Categorizer::from_rules(&rules).unwrap();

        assert_eq!(categorizer.assign("NETFLIX.COM", -649.0), "Subscriptions");
        assert_eq!(categorizer.assign("ATM withdrawal", -2000.0), "Cash");
        // Anchored pattern does not match mid-string
        assert_eq!(categorizer.assign("card at ATM", -10.0), "Other");
        // Built-in rules are replaced, not extended
        assert_eq!(categorizer.assign("Uber", -10.0), "Other");
    }

    #[test]
    fn test_empty_custom_rules_use_defaults() {
        let categorizer = Categorizer::from_rules(&[]).unwrap();
        assert_eq!(categorizer.assign("Uber", -10.0), "Transport");
    }

    #[test]
    fn test_invalid_rule_pattern() {
        let rules = vec![RuleConfig {
            pattern: "(unclosed".to_string(),
            category: "Broken".to_string(),
        }];
        assert!(Categorizer::from_rules(&rules).is_err());
    }
}
