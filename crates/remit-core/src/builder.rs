//! Assembles classifier/extractor or invoice-analyzer output into a
//! normalized [`PaymentIntent`].

use chrono::Utc;
use uuid::Uuid;

use crate::error::{RemitError, Result};
use crate::extract;
use crate::invoice::InvoiceAnalysis;
use crate::split;
use crate::types::{
    Currency, IntentKind, IntentMatch, IntentMetadata, PaymentIntent, Recipient, Source,
};

/// Builds an intent from classified chat or voice text. The same path
/// serves both modalities; only the `source` tag differs.
pub fn build_from_text(
    payer: &str,
    intent: &IntentMatch,
    text: &str,
    source: Source,
) -> Result<PaymentIntent> {
    let mut recipients = extract::extract_recipients(intent);
    if recipients.is_empty() {
        return Err(RemitError::IntentNotDetected(
            "no recipient could be extracted".into(),
        ));
    }

    let total = extract::extract_amount(intent, text)?;
    let purpose = extract::extract_purpose(text);

    let amounts = if intent.kind == IntentKind::SplitPayment {
        let shares = split::equal_split(total, recipients.len())?;
        let percent = split::equal_share_percent(recipients.len());
        for recipient in &mut recipients {
            recipient.share = Some(percent);
        }
        shares
    } else {
        vec![total]
    };

    Ok(PaymentIntent {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        payer: payer.to_string(),
        recipients,
        amounts,
        currency: Currency::Usdc,
        purpose,
        confidence: intent.confidence,
        source,
        kind: intent.kind,
        metadata: IntentMetadata {
            extraction_method: Some("pattern".to_string()),
            word_count: Some(text.split_whitespace().count()),
            ..IntentMetadata::default()
        },
    })
}

/// Builds an intent from an analyzed invoice document. Fails with
/// [`RemitError::AmountNotFound`] when the analyzer found no total.
pub fn build_from_invoice(
    payer: &str,
    analysis: &InvoiceAnalysis,
    extraction_method: &str,
) -> Result<PaymentIntent> {
    let total = analysis.require_total()?;
    let recipient_name = analysis
        .recipient_name
        .clone()
        .unwrap_or_else(|| "Invoice recipient".to_string());
    let purpose = match &analysis.invoice_number {
        Some(number) => format!("Invoice {number}"),
        None => "Invoice payment".to_string(),
    };

    Ok(PaymentIntent {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        payer: payer.to_string(),
        recipients: vec![Recipient::with_share(recipient_name, 100.0)],
        amounts: vec![total],
        currency: Currency::Usdc,
        purpose,
        confidence: analysis.confidence(),
        source: Source::Invoice,
        kind: IntentKind::BasicPayment,
        metadata: IntentMetadata {
            extraction_method: Some(extraction_method.to_string()),
            word_count: Some(analysis.word_count),
            invoice_number: analysis.invoice_number.clone(),
            invoice_date: analysis.invoice_date.clone(),
            line_items: analysis.line_items.clone(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use crate::invoice::analyze;

    #[test]
    fn builds_basic_payment_intent() {
        let text = "Pay John 120 USDC for website development";
        let intent = classify(text);
        let built = build_from_text("alice", &intent, text, Source::Chat).unwrap();

        assert_eq!(built.payer, "alice");
        assert_eq!(built.kind, IntentKind::BasicPayment);
        assert_eq!(built.recipients.len(), 1);
        assert_eq!(built.recipients[0].name, "John");
        assert_eq!(built.amounts.len(), 1);
        assert_eq!(built.amounts[0].as_cents(), 12_000);
        assert_eq!(built.purpose, "website");
        assert_eq!(built.source, Source::Chat);
        assert_eq!(built.recipients.len(), built.amounts.len());
    }

    #[test]
    fn builds_split_intent_with_equal_shares() {
        let text = "Split 500 dollars among Jane and Alex";
        let intent = classify(text);
        let built = build_from_text("alice", &intent, text, Source::Chat).unwrap();

        assert_eq!(built.kind, IntentKind::SplitPayment);
        assert_eq!(built.recipients.len(), 2);
        assert_eq!(built.amounts.len(), 2);
        assert!(built.amounts.iter().all(|a| a.as_cents() == 25_000));
        assert_eq!(built.total().unwrap().as_cents(), 50_000);
        assert!(built
            .recipients
            .iter()
            .all(|r| r.share == Some(50.0) && r.wallet.is_none()));
    }

    #[test]
    fn unknown_intent_without_recipient_fails() {
        let intent = classify("Thanks for everything");
        let err = build_from_text("alice", &intent, "Thanks for everything", Source::Chat)
            .unwrap_err();
        assert!(matches!(err, RemitError::IntentNotDetected(_)));
    }

    #[test]
    fn builds_invoice_intent_with_metadata() {
        let analysis = analyze(
            "Invoice #INV-7\nBill To: Orbital Inc\nItems\nWidget  2  $5.00\nTotal: $10.00",
        );
        let built = build_from_invoice("alice", &analysis, "direct_text").unwrap();

        assert_eq!(built.source, Source::Invoice);
        assert_eq!(built.recipients[0].name, "Orbital Inc");
        assert_eq!(built.amounts[0].as_cents(), 1_000);
        assert_eq!(built.purpose, "Invoice INV-7");
        assert_eq!(built.metadata.invoice_number.as_deref(), Some("INV-7"));
        assert_eq!(built.metadata.line_items.len(), 1);
        assert_eq!(built.metadata.extraction_method.as_deref(), Some("direct_text"));
    }

    #[test]
    fn invoice_without_total_fails_to_build() {
        let analysis = analyze("Invoice #9\nBill To: Nobody Special");
        assert!(matches!(
            build_from_invoice("alice", &analysis, "ocr"),
            Err(RemitError::AmountNotFound(_))
        ));
    }
}
