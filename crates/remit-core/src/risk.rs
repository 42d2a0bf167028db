//! Additive risk scoring over a built payment intent.
//!
//! Scoring is advisory: a high score requests human review, it never
//! rejects the intent. Structural validity is decided separately in
//! [`crate::validate`].

use serde::{Deserialize, Serialize};

use crate::tables::{Severity, RISK_PATTERNS, SUSPICIOUS_KEYWORDS};
use crate::types::{Amount, PaymentIntent, RiskAssessment};

const LARGE_AMOUNT_POINTS: u32 = 30;
const LOW_CONFIDENCE_POINTS: u32 = 20;
const HIGH_PATTERN_POINTS: u32 = 40;
const MEDIUM_PATTERN_POINTS: u32 = 20;
const SUSPICIOUS_KEYWORD_POINTS: u32 = 25;
const FREQUENCY_POINTS: u32 = 15;

/// Reports how many payments the payer made inside the lookback window.
/// Backed by persistence outside this crate; tests use fixed counts.
pub trait PaymentHistory: Send + Sync {
    fn recent_payment_count(&self, payer: &str) -> u32;
}

/// A history source for callers with no persistence wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl PaymentHistory for NoHistory {
    fn recent_payment_count(&self, _payer: &str) -> u32 {
        0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Totals above this add 30 points.
    pub large_amount_threshold: Amount,
    /// Confidence below this adds 20 points.
    pub min_confidence: f64,
    /// Scores at or above this require review.
    pub review_threshold: u8,
    /// More recent payments than this adds 15 points.
    pub frequency_limit: u32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            large_amount_threshold: Amount::new(10_000 * 100).expect("threshold in range"),
            min_confidence: 0.85,
            review_threshold: 50,
            frequency_limit: 5,
        }
    }
}

pub struct RiskEngine {
    config: RiskConfig,
}

impl RiskEngine {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Scores the intent against amount, confidence, pattern, keyword,
    /// and frequency signals; the result is clamped to 0..=100.
    pub fn assess(&self, intent: &PaymentIntent, history: &dyn PaymentHistory) -> RiskAssessment {
        let mut score: u32 = 0;
        let mut warnings = Vec::new();

        match intent.total() {
            Ok(total) if total > self.config.large_amount_threshold => {
                score += LARGE_AMOUNT_POINTS;
                warnings.push(format!(
                    "total {} exceeds large-amount threshold {}",
                    total, self.config.large_amount_threshold
                ));
            }
            Ok(_) => {}
            // An unrepresentable sum is past any threshold we would set.
            Err(_) => {
                score += LARGE_AMOUNT_POINTS;
                warnings.push(format!(
                    "total exceeds the representable maximum, well past threshold {}",
                    self.config.large_amount_threshold
                ));
            }
        }

        if intent.confidence < self.config.min_confidence {
            score += LOW_CONFIDENCE_POINTS;
            warnings.push(format!(
                "extraction confidence {:.2} below minimum {:.2}",
                intent.confidence, self.config.min_confidence
            ));
        }

        let description = description_text(intent);
        for pattern in RISK_PATTERNS.iter() {
            if pattern.regex.is_match(&description) {
                let points = match pattern.severity {
                    Severity::High => HIGH_PATTERN_POINTS,
                    Severity::Medium => MEDIUM_PATTERN_POINTS,
                };
                score += points;
                warnings.push(format!("risk pattern matched: {}", pattern.name));
            }
        }

        for keyword in SUSPICIOUS_KEYWORDS {
            if description.contains(keyword) {
                score += SUSPICIOUS_KEYWORD_POINTS;
                warnings.push(format!("suspicious keyword: {keyword}"));
            }
        }

        let recent = history.recent_payment_count(&intent.payer);
        if recent > self.config.frequency_limit {
            score += FREQUENCY_POINTS;
            warnings.push(format!(
                "{recent} recent payments exceed limit of {}",
                self.config.frequency_limit
            ));
        }

        let score = score.min(100) as u8;
        let requires_review = score >= self.config.review_threshold;
        tracing::debug!(score, requires_review, "risk assessment computed");

        RiskAssessment {
            score,
            issues: Vec::new(),
            warnings,
            approved: !requires_review,
            requires_review,
        }
    }
}

/// Purpose plus joined recipient names, lowercased for keyword scans.
fn description_text(intent: &PaymentIntent) -> String {
    let names: Vec<&str> = intent
        .recipients
        .iter()
        .map(|recipient| recipient.name.as_str())
        .collect();
    format!("{} {}", intent.purpose, names.join(" ")).to_lowercase()
}
