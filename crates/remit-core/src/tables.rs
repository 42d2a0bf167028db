//! Static reference tables: intent patterns, keyword sets, purpose
//! vocabulary, and risk-pattern definitions.
//!
//! Everything here is compiled once at first use and shared read-only
//! across concurrent parse calls. Pattern order is a priority contract:
//! the classifier walks `INTENT_PATTERNS` front to back and the first
//! match wins, so more specific shapes (split, tip) must stay ahead of
//! the generic payment shape.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::IntentKind;

pub static INTENT_PATTERNS: LazyLock<Vec<(IntentKind, Regex)>> = LazyLock::new(|| {
    vec![
        (
            IntentKind::SplitPayment,
            Regex::new(
                r"(?i)\bsplit\s+\$?(\d+(?:\.\d{1,2})?)\s*(?:usdc|dollars|bucks)?\s+(?:among|between)\s+(.+)",
            )
            .expect("split pattern must compile"),
        ),
        (
            IntentKind::TipPayment,
            Regex::new(r"(?i)\btip\s+(\w+)\s+\$?(\d+(?:\.\d{1,2})?)")
                .expect("tip pattern must compile"),
        ),
        (
            IntentKind::BasicPayment,
            Regex::new(r"(?i)\b(?:pay|send|transfer)\s+(\w+)\s+\$?(\d+(?:\.\d{1,2})?)")
                .expect("basic payment pattern must compile"),
        ),
    ]
});

/// Strong intent indicators, +0.1 confidence each.
pub const STRONG_KEYWORDS: [&str; 5] = ["pay", "send", "transfer", "usdc", "tip"];

/// Weak intent indicators, +0.05 confidence each.
pub const WEAK_KEYWORDS: [&str; 4] = ["money", "cash", "funds", "dollars"];

/// Known purpose terms. A purpose phrase containing one of these resolves
/// to the vocabulary term itself.
pub const PURPOSE_VOCABULARY: [&str; 12] = [
    "website",
    "design",
    "consulting",
    "development",
    "hosting",
    "marketing",
    "rent",
    "lunch",
    "dinner",
    "groceries",
    "services",
    "subscription",
];

/// Default purpose when no purpose phrase matches at all.
pub const DEFAULT_PURPOSE: &str = "Professional services";

/// Each occurrence adds +25 to the risk score, scored independently.
pub const SUSPICIOUS_KEYWORDS: [&str; 6] = [
    "urgent",
    "wire transfer",
    "gift card",
    "anonymous",
    "offshore",
    "untraceable",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Medium,
    High,
}

pub struct RiskPattern {
    pub name: &'static str,
    pub regex: Regex,
    pub severity: Severity,
}

pub static RISK_PATTERNS: LazyLock<Vec<RiskPattern>> = LazyLock::new(|| {
    vec![
        RiskPattern {
            name: "sanctioned-region reference",
            regex: Regex::new(r"(?i)\b(?:sanction|embargo)\w*\b").expect("risk pattern"),
            severity: Severity::High,
        },
        RiskPattern {
            name: "account takeover language",
            regex: Regex::new(r"(?i)\b(?:new\s+account|changed\s+bank|updated\s+details)\b")
                .expect("risk pattern"),
            severity: Severity::High,
        },
        RiskPattern {
            name: "pressure language",
            regex: Regex::new(r"(?i)\b(?:immediately|right\s+away|asap)\b").expect("risk pattern"),
            severity: Severity::Medium,
        },
        RiskPattern {
            name: "secrecy language",
            regex: Regex::new(r"(?i)\b(?:confidential|do\s+not\s+tell|keep\s+quiet)\b")
                .expect("risk pattern"),
            severity: Severity::Medium,
        },
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_patterns_keep_split_ahead_of_basic() {
        let kinds: Vec<IntentKind> = INTENT_PATTERNS.iter().map(|(kind, _)| *kind).collect();
        let split_pos = kinds
            .iter()
            .position(|k| *k == IntentKind::SplitPayment)
            .unwrap();
        let basic_pos = kinds
            .iter()
            .position(|k| *k == IntentKind::BasicPayment)
            .unwrap();
        assert!(split_pos < basic_pos, "split must be tried before basic");
    }

    #[test]
    fn risk_patterns_compile_and_match_case_insensitively() {
        let hit = RISK_PATTERNS
            .iter()
            .find(|p| p.regex.is_match("pay this IMMEDIATELY"))
            .expect("pressure language should match");
        assert_eq!(hit.severity, Severity::Medium);
    }
}
