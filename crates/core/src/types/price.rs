//! Money representation using decimal arithmetic.
//!
//! Marketplace prices are Mexican pesos. Amounts are `rust_decimal::Decimal`
//! so totals, tax and margins never pick up binary float error.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Round an amount to centavos, midpoint away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// An amount in a specific currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (pesos, not centavos).
    pub amount: Decimal,
    /// ISO 4217 currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create an amount in Mexican pesos.
    #[must_use]
    pub const fn mxn(amount: Decimal) -> Self {
        Self::new(amount, Currency::MXN)
    }

    /// Zero pesos.
    #[must_use]
    pub const fn zero() -> Self {
        Self::mxn(Decimal::ZERO)
    }

    /// Format with the ISO code appended, e.g. `$1,250.00 MXN`.
    #[must_use]
    pub fn display_with_code(&self) -> String {
        format!("{self} {}", self.currency.code())
    }

    /// Amount in centavos, saturating at zero for negative amounts and at
    /// `u64::MAX` for huge ones.
    #[must_use]
    pub fn cents(&self) -> u64 {
        if self.amount.is_sign_negative() {
            return 0;
        }
        let cents = round_money(self.amount)
            .saturating_mul(Decimal::ONE_HUNDRED)
            .trunc();
        u64::try_from(cents).unwrap_or(u64::MAX)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = round_money(self.amount);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let plain = format!("{:.2}", rounded.abs());
        let (whole, frac) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
        write!(
            f,
            "{sign}{}{}.{frac}",
            self.currency.symbol(),
            group_thousands(whole)
        )
    }
}

/// Insert `,` separators every three digits.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// ISO 4217 currency codes accepted by the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    MXN,
    USD,
}

impl Currency {
    /// Currency symbol used in display strings.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::MXN | Self::USD => "$",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MXN => "MXN",
            Self::USD => "USD",
        }
    }
}
