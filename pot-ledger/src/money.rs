//! Currency-safe arithmetic primitives
//!
//! Every addition, subtraction, and rounding in the workspace routes through
//! this module so repeated operations cannot accumulate drift. Amounts are
//! `Decimal` with at most 2 decimal places; rounding is half-up (midpoint
//! away from zero).

use crate::{Error, Result};
use rust_decimal::{Decimal, RoundingStrategy};

/// Comparison tolerance for settled amounts (one cent).
pub const EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Round to 2 decimal places, half-up.
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Currency-safe addition: operands are rounded going in, result coming out.
pub fn add(a: Decimal, b: Decimal) -> Decimal {
    round2(round2(a) + round2(b))
}

/// Currency-safe subtraction.
pub fn sub(a: Decimal, b: Decimal) -> Decimal {
    round2(round2(a) - round2(b))
}

/// Reject amounts that are not representable with 2 decimal places.
///
/// Trailing zeros are fine (`1.50` normalizes cleanly); a genuine third
/// decimal digit is not.
pub fn check_scale(amount: Decimal) -> Result<Decimal> {
    if amount.normalize().scale() > 2 {
        return Err(Error::InvalidAmount(format!(
            "amount {} has more than 2 decimal places",
            amount
        )));
    }
    Ok(round2(amount))
}

/// True when two amounts agree within [`EPSILON`].
pub fn approx_eq(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < EPSILON
}

/// True when an amount is settled, i.e. below [`EPSILON`] in magnitude.
pub fn is_settled(amount: Decimal) -> bool {
    amount.abs() < EPSILON
}
