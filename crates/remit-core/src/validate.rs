//! Structural validation of built payment intents. Risk is assessed
//! separately and never turns into a validation failure.

use crate::error::{RemitError, Result};
use crate::types::PaymentIntent;

/// Checks the structural invariants: payer present, at least one named
/// recipient, at least one amount, and one amount per recipient. All
/// violations are collected into a single error.
pub fn validate_intent(intent: &PaymentIntent) -> Result<()> {
    let mut violations = Vec::new();

    if intent.payer.trim().is_empty() {
        violations.push("payer is empty".to_string());
    }
    if intent.recipients.is_empty() {
        violations.push("no recipients".to_string());
    }
    for (idx, recipient) in intent.recipients.iter().enumerate() {
        if recipient.name.trim().is_empty() {
            violations.push(format!("recipient {idx} has an empty name"));
        }
    }
    if intent.amounts.is_empty() {
        violations.push("no amounts".to_string());
    } else if intent.total().is_err() {
        violations.push("amounts sum exceeds the supported total".to_string());
    }
    if intent.recipients.len() != intent.amounts.len() {
        violations.push(format!(
            "{} recipients but {} amounts",
            intent.recipients.len(),
            intent.amounts.len()
        ));
    }
    if !(0.0..=1.0).contains(&intent.confidence) {
        violations.push(format!("confidence {} outside [0, 1]", intent.confidence));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(RemitError::Validation { violations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_from_text;
    use crate::classifier::classify;
    use crate::types::{Amount, Recipient, Source};

    fn valid_intent() -> PaymentIntent {
        let text = "Pay John 120 USDC for website development";
        build_from_text("alice", &classify(text), text, Source::Chat).unwrap()
    }

    #[test]
    fn accepts_a_well_formed_intent() {
        assert!(validate_intent(&valid_intent()).is_ok());
    }

    #[test]
    fn rejects_empty_payer() {
        let mut intent = valid_intent();
        intent.payer = "  ".to_string();
        let err = validate_intent(&intent).unwrap_err();
        assert!(err.to_string().contains("payer is empty"));
    }

    #[test]
    fn rejects_recipient_amount_length_mismatch() {
        let mut intent = valid_intent();
        intent.recipients.push(Recipient::named("Extra"));
        let err = validate_intent(&intent).unwrap_err();
        assert!(err.to_string().contains("2 recipients but 1 amounts"));
    }

    #[test]
    fn collects_every_violation_at_once() {
        let mut intent = valid_intent();
        intent.payer.clear();
        intent.recipients.clear();
        intent.amounts.clear();
        match validate_intent(&intent).unwrap_err() {
            RemitError::Validation { violations } => {
                assert!(violations.len() >= 3, "got {violations:?}");
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn rejects_amounts_that_sum_past_the_maximum() {
        use crate::types::CENTS_MAX;

        let mut intent = valid_intent();
        intent.recipients = vec![Recipient::named("Jane"), Recipient::named("Alex")];
        intent.amounts = vec![
            Amount::new(CENTS_MAX).unwrap(),
            Amount::new(CENTS_MAX).unwrap(),
        ];
        let err = validate_intent(&intent).unwrap_err();
        assert!(err.to_string().contains("amounts sum exceeds"));
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        let mut intent = valid_intent();
        intent.confidence = 1.5;
        assert!(validate_intent(&intent).is_err());

        intent.confidence = 0.0;
        intent.amounts = vec![Amount::new(100).unwrap()];
        assert!(validate_intent(&intent).is_ok());
    }
}
