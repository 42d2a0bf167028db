//! Field extraction: recipients, amount, and purpose from a classified
//! intent, with fallback scans over the full text.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{RemitError, Result};
use crate::tables::{DEFAULT_PURPOSE, PURPOSE_VOCABULARY};
use crate::types::{Amount, IntentKind, IntentMatch, Recipient};

static CURRENCY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?(\d+(?:\.\d{1,2})?)").expect("currency token pattern"));

static PURPOSE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\bfor\s+(.+?)(?:\s+please\b|\s+thanks\b|\.|$)")
            .expect("purpose pattern"),
        Regex::new(r"(?i)\bpayment\s+for\s+(.+?)$").expect("purpose pattern"),
        Regex::new(r"(?i)\bfor\s+(\w+\s+\w+)").expect("purpose pattern"),
    ]
});

/// Derives the recipient list from classifier captures.
///
/// The first capture, when present, is a single recipient at a 100% share.
/// For split payments the second capture is a delimited name list split on
/// `", "` or `" and "`; shares stay unset until the split is computed.
pub fn extract_recipients(intent: &IntentMatch) -> Vec<Recipient> {
    if intent.kind == IntentKind::SplitPayment {
        if let Some(names) = intent.captures.get(1) {
            return split_names(names)
                .into_iter()
                .map(Recipient::named)
                .collect();
        }
    }

    match intent.captures.first() {
        Some(name) if !name.trim().is_empty() => {
            vec![Recipient::with_share(name.trim(), 100.0)]
        }
        _ => Vec::new(),
    }
}

fn split_names(raw: &str) -> Vec<String> {
    raw.split(", ")
        .flat_map(|part| part.split(" and "))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Picks the payment amount: the numeric second capture when it parses to
/// a positive value, otherwise the maximum currency-like token anywhere in
/// the text. No positive token at all is an [`RemitError::AmountNotFound`].
pub fn extract_amount(intent: &IntentMatch, text: &str) -> Result<Amount> {
    if let Some(raw) = intent.captures.get(1) {
        if let Ok(amount) = Amount::from_units_str(raw) {
            return Ok(amount);
        }
    }

    CURRENCY_TOKEN
        .captures_iter(text)
        .filter_map(|caps| Amount::from_units_str(&caps[1]).ok())
        .max()
        .ok_or(RemitError::AmountNotFound("request text"))
}

/// Extracts a payment purpose from the text via the ordered purpose
/// patterns; the first match wins. A captured phrase containing a known
/// vocabulary term resolves to that term, otherwise the raw phrase is
/// returned. No match falls back to [`DEFAULT_PURPOSE`].
pub fn extract_purpose(text: &str) -> String {
    for pattern in PURPOSE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let phrase = caps[1].trim().to_string();
            if phrase.is_empty() {
                continue;
            }

            let lowered = phrase.to_lowercase();
            for term in PURPOSE_VOCABULARY {
                if lowered.contains(term) {
                    return term.to_string();
                }
            }
            return phrase;
        }
    }

    DEFAULT_PURPOSE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;

    #[test]
    fn single_recipient_gets_full_share() {
        let intent = classify("Pay John 120 USDC for website development");
        let recipients = extract_recipients(&intent);
        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].name, "John");
        assert_eq!(recipients[0].share, Some(100.0));
        assert_eq!(recipients[0].wallet, None);
    }

    #[test]
    fn split_recipients_are_separated_on_comma_and_and() {
        let intent = classify("Split 90 among Jane, Bob and Alex");
        let recipients = extract_recipients(&intent);
        let names: Vec<&str> = recipients.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Jane", "Bob", "Alex"]);
        assert!(recipients.iter().all(|r| r.share.is_none()));
    }

    #[test]
    fn amount_prefers_numeric_second_capture() {
        let intent = classify("Pay John 120 USDC for website development");
        let amount = extract_amount(&intent, "Pay John 120 USDC for website development").unwrap();
        assert_eq!(amount.as_cents(), 12_000);
    }

    #[test]
    fn amount_falls_back_to_maximum_token_in_text() {
        // Split captures are (amount, names); the second capture is not
        // numeric, so the fallback scan must find 500.
        let text = "Split 500 dollars among Jane and Alex";
        let intent = classify(text);
        let amount = extract_amount(&intent, text).unwrap();
        assert_eq!(amount.as_cents(), 50_000);
    }

    #[test]
    fn amount_fallback_selects_maximum_of_candidates() {
        let intent = IntentMatch::unknown();
        let amount = extract_amount(&intent, "items at $12.50, $7 and $99.99 total").unwrap();
        assert_eq!(amount.as_cents(), 9_999);
    }

    #[test]
    fn missing_amount_is_an_error() {
        let intent = IntentMatch::unknown();
        assert!(matches!(
            extract_amount(&intent, "no numbers in here"),
            Err(RemitError::AmountNotFound(_))
        ));
    }

    #[test]
    fn purpose_resolves_vocabulary_term_from_phrase() {
        assert_eq!(
            extract_purpose("Pay John 120 USDC for website development"),
            "website"
        );
    }

    #[test]
    fn purpose_keeps_raw_phrase_when_no_vocabulary_term() {
        assert_eq!(
            extract_purpose("Pay John 120 for the garden gnome"),
            "the garden gnome"
        );
    }

    #[test]
    fn purpose_defaults_when_nothing_matches() {
        assert_eq!(extract_purpose("Send Alice 50"), DEFAULT_PURPOSE);
    }
}
