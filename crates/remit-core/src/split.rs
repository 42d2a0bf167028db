//! Equal-split computation across payment recipients.

use crate::error::{RemitError, Result};
use crate::types::Amount;

/// Divides `total` into `n` equal shares, each independently rounded to
/// the nearest cent. No remainder redistribution happens, so the share
/// sum can drift from the total by up to one cent per recipient; callers
/// and tests must allow that slack.
pub fn equal_split(total: Amount, n: usize) -> Result<Vec<Amount>> {
    if n == 0 {
        return Err(RemitError::Validation {
            violations: vec!["cannot split an amount across zero recipients".into()],
        });
    }

    let n_u64 = n as u64;
    let cents = total.as_cents();
    let quotient = cents / n_u64;
    let remainder = cents % n_u64;
    // Round half up on the exact quotient.
    let share_cents = if remainder * 2 >= n_u64 {
        quotient + 1
    } else {
        quotient
    };

    let share = Amount::new(share_cents).map_err(|_| RemitError::Validation {
        violations: vec![format!(
            "splitting {} across {n} recipients leaves shares below one cent",
            total.to_units_string()
        )],
    })?;

    Ok(vec![share; n])
}

/// Percentage share per recipient under the equal policy.
pub fn equal_share_percent(n: usize) -> f64 {
    100.0 / n as f64
}
