//! Invoice document structure analysis.
//!
//! A single stateful forward pass files extracted text lines into
//! sections. A line matching a section trigger switches the current
//! section first and is then filed under the new section; the section
//! stays current until the next trigger.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{RemitError, Result};
use crate::types::{Amount, LineItem};

static INVOICE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\binvoice\s*(?:#|no\.?|number)?\s*[:#]?\s*([A-Za-z0-9-]+)")
        .expect("invoice number pattern")
});

static INVOICE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{4}-\d{2}-\d{2})\b")
        .expect("invoice date pattern")
});

static LINE_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s{2,}(\d+)\s+\$?(\d+(?:\.\d{1,2})?)\s*$|^(.+?)\s+(\d+)\s+\$?(\d+(?:\.\d{1,2})?)\s*$")
        .expect("line item pattern")
});

/// Ordered total patterns; first match on the first qualifying line wins.
static TOTAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\btotal\s*:?\s*\$?(\d+(?:\.\d{1,2})?)").expect("total pattern"),
        Regex::new(r"(?i)\bamount\s+due\s*:?\s*\$?(\d+(?:\.\d{1,2})?)").expect("total pattern"),
        Regex::new(r"(?i)\bbalance\s+due\s*:?\s*\$?(\d+(?:\.\d{1,2})?)").expect("total pattern"),
        Regex::new(r"\$?(\d+(?:\.\d{1,2})?)\s*$").expect("total pattern"),
    ]
});

static BILL_TO_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:bill|ship)\s+to\s*:?\s*(.*)").expect("bill-to pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Payer,
    Recipient,
    Items,
    Totals,
}

fn section_for_line(lowered: &str) -> Option<Section> {
    if lowered.contains("bill to") || lowered.contains("ship to") {
        Some(Section::Recipient)
    } else if lowered.contains("from") || lowered.contains("vendor") {
        Some(Section::Payer)
    } else if lowered.contains("description") || lowered.contains("item") {
        Some(Section::Items)
    } else if lowered.contains("total") || lowered.contains("amount due") {
        Some(Section::Totals)
    } else {
        None
    }
}

/// Section-bucketed lines plus the fields scanned out of them.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceAnalysis {
    pub invoice_number: Option<String>,
    pub invoice_date: Option<String>,
    pub recipient_name: Option<String>,
    pub line_items: Vec<LineItem>,
    pub total: Option<Amount>,
    pub word_count: usize,
}

impl InvoiceAnalysis {
    /// The extracted total, or [`RemitError::AmountNotFound`] when no
    /// total pattern matched anywhere in the totals section.
    pub fn require_total(&self) -> Result<Amount> {
        self.total
            .ok_or(RemitError::AmountNotFound("invoice totals section"))
    }

    /// Invoice-path confidence: 0.5 base, +0.2 for more than 100 words of
    /// extracted text, +0.1 each for invoice number, at least one line
    /// item, and a found total (-0.2 when missing), capped to [0, 1].
    pub fn confidence(&self) -> f64 {
        let mut confidence: f64 = 0.5;
        if self.word_count > 100 {
            confidence += 0.2;
        }
        if self.invoice_number.is_some() {
            confidence += 0.1;
        }
        if !self.line_items.is_empty() {
            confidence += 0.1;
        }
        if self.total.is_some() {
            confidence += 0.1;
        } else {
            confidence -= 0.2;
        }
        confidence.clamp(0.0, 1.0)
    }
}

/// Segments extracted invoice text and scans each section for its fields.
pub fn analyze(text: &str) -> InvoiceAnalysis {
    let mut current = Section::Header;
    let mut header_lines: Vec<&str> = Vec::new();
    let mut recipient_lines: Vec<&str> = Vec::new();
    let mut item_lines: Vec<&str> = Vec::new();
    let mut total_lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(section) = section_for_line(&line.to_lowercase()) {
            current = section;
        }

        match current {
            Section::Header => header_lines.push(line),
            Section::Payer => {}
            Section::Recipient => recipient_lines.push(line),
            Section::Items => item_lines.push(line),
            Section::Totals => total_lines.push(line),
        }
    }

    let invoice_number = header_lines
        .iter()
        .find_map(|line| INVOICE_NUMBER.captures(line))
        .map(|caps| caps[1].to_string());
    let invoice_date = header_lines
        .iter()
        .find_map(|line| INVOICE_DATE.captures(line))
        .map(|caps| caps[1].to_string());

    let recipient_name = extract_recipient_name(&recipient_lines);
    let line_items = parse_line_items(&item_lines);
    let total = extract_total(&total_lines);
    let word_count = text.split_whitespace().count();

    tracing::debug!(
        invoice_number = ?invoice_number,
        line_items = line_items.len(),
        total_found = total.is_some(),
        "invoice structure analyzed"
    );

    InvoiceAnalysis {
        invoice_number,
        invoice_date,
        recipient_name,
        line_items,
        total,
        word_count,
    }
}

fn extract_recipient_name(lines: &[&str]) -> Option<String> {
    let mut iter = lines.iter();
    while let Some(line) = iter.next() {
        if let Some(caps) = BILL_TO_PREFIX.captures(line) {
            let rest = caps[1].trim().to_string();
            if !rest.is_empty() {
                return Some(rest);
            }
            // Name is on the line after the bare "Bill To:" header.
            return iter.next().map(|next| next.to_string());
        }
    }
    None
}

/// Non-matching item lines are skipped rather than rejected; lossy by
/// precedent, kept that way until the product decides otherwise.
fn parse_line_items(lines: &[&str]) -> Vec<LineItem> {
    lines
        .iter()
        .filter_map(|line| {
            let caps = LINE_ITEM.captures(line)?;
            let (desc, qty, price) = if caps.get(1).is_some() {
                (&caps[1], &caps[2], &caps[3])
            } else {
                (&caps[4], &caps[5], &caps[6])
            };
            let description = desc.trim().to_string();
            if description.to_lowercase().contains("description") {
                return None;
            }
            Some(LineItem {
                description,
                quantity: qty.parse().ok()?,
                unit_price: Amount::from_units_str(price).ok()?,
            })
        })
        .collect()
}

fn extract_total(lines: &[&str]) -> Option<Amount> {
    for line in lines {
        for pattern in TOTAL_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(line) {
                if let Ok(amount) = Amount::from_units_str(&caps[1]) {
                    return Some(amount);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Invoice #INV-2024-001
Date: 03/15/2024
From: Acme Consulting LLC
Bill To: Orbital Software Inc
Description  Qty  Price
Website redesign  1  $2500.00
Hosting setup  2  $150.00
not a parseable item line
Total: $2800.00
Amount Due: $2800.00";

    #[test]
    fn files_lines_into_sections_and_extracts_fields() {
        let analysis = analyze(SAMPLE);
        assert_eq!(analysis.invoice_number.as_deref(), Some("INV-2024-001"));
        assert_eq!(analysis.invoice_date.as_deref(), Some("03/15/2024"));
        assert_eq!(analysis.recipient_name.as_deref(), Some("Orbital Software Inc"));
        assert_eq!(analysis.line_items.len(), 2);
        assert_eq!(analysis.line_items[0].description, "Website redesign");
        assert_eq!(analysis.line_items[0].quantity, 1);
        assert_eq!(analysis.line_items[0].unit_price.as_cents(), 250_000);
        assert_eq!(analysis.total.unwrap().as_cents(), 280_000);
    }

    #[test]
    fn first_total_pattern_on_first_line_wins_over_larger_values() {
        let analysis = analyze("Total: $350.00\nAmount Due: $200.00");
        assert_eq!(analysis.total.unwrap().as_cents(), 35_000);

        let reversed = analyze("Amount Due: $200.00\nTotal: $350.00");
        assert_eq!(reversed.total.unwrap().as_cents(), 20_000);
    }

    #[test]
    fn non_matching_item_lines_are_silently_dropped() {
        let analysis = analyze("Items\nWidget  3  $10.00\ngarbage\nTotal: $30.00");
        assert_eq!(analysis.line_items.len(), 1);
    }

    #[test]
    fn missing_total_is_an_error_and_lowers_confidence() {
        let analysis = analyze("Invoice #42\nBill To: Somebody");
        assert!(matches!(
            analysis.require_total(),
            Err(RemitError::AmountNotFound(_))
        ));
        // 0.5 base + 0.1 number - 0.2 missing total
        assert!((analysis.confidence() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn confidence_rewards_rich_documents() {
        let analysis = analyze(SAMPLE);
        // 0.5 base + 0.1 number + 0.1 items + 0.1 total; under 100 words
        assert!((analysis.confidence() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn bare_bill_to_header_takes_name_from_next_line() {
        let analysis = analyze("Bill To:\nNorthwind Traders\nTotal: $5.00");
        assert_eq!(analysis.recipient_name.as_deref(), Some("Northwind Traders"));
    }
}
