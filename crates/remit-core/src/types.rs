use std::fmt::{self, Display};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AmountError;

pub const CENTS_PER_UNIT: u64 = 100;
pub const CENTS_MIN: u64 = 1;
pub const CENTS_MAX: u64 = 1_000_000_000_000_00;

/// A positive money value in whole cents. Two decimal places, no floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Amount(u64);

impl Amount {
    pub fn new(cents: u64) -> Result<Self, AmountError> {
        if cents < CENTS_MIN {
            return Err(AmountError::BelowMinimum);
        }
        if cents > CENTS_MAX {
            return Err(AmountError::AboveMaximum { value: cents });
        }

        Ok(Self(cents))
    }

    /// Parses a decimal string of currency units, e.g. "120" or "120.50".
    /// Currency symbols must be stripped by the caller.
    pub fn from_units_str(input: &str) -> Result<Self, AmountError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AmountError::EmptyInput);
        }
        if trimmed.starts_with('-') {
            return Err(AmountError::NegativeNotAllowed);
        }

        let mut parts = trimmed.split('.');
        let whole_str = parts.next().ok_or(AmountError::InvalidFormat)?;
        let frac_str = parts.next();
        if parts.next().is_some() {
            return Err(AmountError::InvalidFormat);
        }
        if whole_str.is_empty() {
            return Err(AmountError::InvalidFormat);
        }

        let whole = parse_u64_digits(whole_str)?;
        let whole_cents = whole
            .checked_mul(CENTS_PER_UNIT)
            .ok_or(AmountError::Overflow)?;

        let frac_cents = match frac_str {
            None => 0,
            Some(fraction) => {
                if fraction.len() > 2 {
                    return Err(AmountError::TooManyDecimals {
                        decimals: fraction.len(),
                    });
                }
                if fraction.is_empty() {
                    return Err(AmountError::InvalidFormat);
                }

                let mut padded = fraction.to_string();
                while padded.len() < 2 {
                    padded.push('0');
                }
                parse_u64_digits(&padded)?
            }
        };

        let combined = whole_cents
            .checked_add(frac_cents)
            .ok_or(AmountError::Overflow)?;
        Self::new(combined)
    }

    /// Formats as currency units with exactly two decimal places.
    pub fn to_units_string(&self) -> String {
        format!("{}.{:02}", self.0 / CENTS_PER_UNIT, self.0 % CENTS_PER_UNIT)
    }

    pub const fn as_cents(&self) -> u64 {
        self.0
    }

    pub fn checked_add(self, other: Amount) -> Result<Amount, AmountError> {
        let sum = self.0.checked_add(other.0).ok_or(AmountError::Overflow)?;
        Amount::new(sum)
    }
}

impl TryFrom<u64> for Amount {
    type Error = AmountError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for u64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_units_string())
    }
}

/// The single settlement currency this pipeline emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usdc,
}

impl Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Usdc => write!(f, "USDC"),
        }
    }
}

/// Which input modality produced an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Chat,
    Invoice,
    Voice,
}

impl Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Chat => write!(f, "chat"),
            Source::Invoice => write!(f, "invoice"),
            Source::Voice => write!(f, "voice"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    BasicPayment,
    SplitPayment,
    TipPayment,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub name: String,
    /// Resolved downstream by the wallet directory, never by this crate.
    pub wallet: Option<String>,
    /// Percentage share of the total, set once splits are computed.
    pub share: Option<f64>,
}

impl Recipient {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wallet: None,
            share: None,
        }
    }

    pub fn with_share(name: impl Into<String>, share: f64) -> Self {
        Self {
            name: name.into(),
            wallet: None,
            share: Some(share),
        }
    }
}

/// Result of running the ordered intent patterns over raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentMatch {
    pub kind: IntentKind,
    /// Captured groups in pattern order, original casing preserved.
    pub captures: Vec<String>,
    pub confidence: f64,
}

impl IntentMatch {
    pub fn unknown() -> Self {
        Self {
            kind: IntentKind::Unknown,
            captures: Vec::new(),
            confidence: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub unit_price: Amount,
}

/// Path-specific extras attached to a built intent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentMetadata {
    pub extraction_method: Option<String>,
    pub word_count: Option<usize>,
    pub invoice_number: Option<String>,
    pub invoice_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<LineItem>,
}

/// A normalized, validated description of a requested payment.
///
/// Invariants: `recipients.len() == amounts.len()`, every amount positive
/// (guaranteed by [`Amount`]), `confidence` in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub payer: String,
    pub recipients: Vec<Recipient>,
    pub amounts: Vec<Amount>,
    pub currency: Currency,
    pub purpose: String,
    pub confidence: f64,
    pub source: Source,
    pub kind: IntentKind,
    pub metadata: IntentMetadata,
}

impl PaymentIntent {
    /// Checked sum of all per-recipient amounts. Fails when the intent
    /// carries no amounts or the sum exceeds [`Amount`]'s maximum.
    pub fn total(&self) -> Result<Amount, AmountError> {
        let mut amounts = self.amounts.iter().copied();
        let first = amounts.next().ok_or(AmountError::BelowMinimum)?;
        amounts.try_fold(first, |acc, amount| acc.checked_add(amount))
    }
}

/// Outcome of risk scoring. Advisory only: a high score flags the intent
/// for human review, it never invalidates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Clamped to 0..=100.
    pub score: u8,
    /// Structural problems; non-empty means the intent is invalid.
    pub issues: Vec<String>,
    /// Risk signals that do not invalidate the intent.
    pub warnings: Vec<String>,
    pub approved: bool,
    pub requires_review: bool,
}

fn parse_u64_digits(input: &str) -> Result<u64, AmountError> {
    if !input.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(AmountError::InvalidNumeric);
    }
    input.parse::<u64>().map_err(|_| AmountError::Overflow)
}
