//! Ordered first-match intent classification over raw request text.

use crate::tables::{INTENT_PATTERNS, STRONG_KEYWORDS, WEAK_KEYWORDS};
use crate::types::IntentMatch;

const BASE_CONFIDENCE: f64 = 0.7;
const STRONG_BONUS: f64 = 0.1;
const WEAK_BONUS: f64 = 0.05;

/// Classifies request text into an intent kind with captured fields.
///
/// Patterns are tried in table order and the first match wins; captures
/// keep the original casing of the input. No match yields
/// [`IntentKind::Unknown`](crate::types::IntentKind::Unknown) at
/// confidence zero.
pub fn classify(text: &str) -> IntentMatch {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return IntentMatch::unknown();
    }

    for (kind, pattern) in INTENT_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(trimmed) {
            let captures: Vec<String> = caps
                .iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect();

            let confidence = score_confidence(trimmed);
            tracing::debug!(kind = ?kind, confidence, "intent pattern matched");
            return IntentMatch {
                kind: *kind,
                captures,
                confidence,
            };
        }
    }

    tracing::debug!("no intent pattern matched");
    IntentMatch::unknown()
}

fn score_confidence(text: &str) -> f64 {
    let lowered = text.to_lowercase();
    let mut confidence = BASE_CONFIDENCE;

    for keyword in STRONG_KEYWORDS {
        if lowered.contains(keyword) {
            confidence += STRONG_BONUS;
        }
    }
    for keyword in WEAK_KEYWORDS {
        if lowered.contains(keyword) {
            confidence += WEAK_BONUS;
        }
    }

    confidence.min(1.0)
}
