//! Fair-trade pricing calculator.
//!
//! Turns a maker's costs into wholesale and retail prices:
//!
//! ```text
//! total_cost      = materials + labor + overhead
//! wholesale_price = total_cost * (1 + profit_margin / 100)
//! retail_price    = wholesale_price * 2
//! ```
//!
//! When labor is entered as hours at an hourly rate and a state is known,
//! the rate is checked against that state's minimum and living wage.
//!
//! ```
//! use papalote_core::pricing::{LaborCost, PricingInput, calculate};
//! use rust_decimal::Decimal;
//!
//! let input = PricingInput {
//!     materials: Decimal::from(200),
//!     labor: LaborCost::Flat(Decimal::from(300)),
//!     overhead: Decimal::from(100),
//!     profit_margin: Decimal::from(50),
//!     state: None,
//! };
//! let calc = calculate(&input, None).unwrap();
//! assert_eq!(calc.total_cost, Decimal::from(600));
//! assert_eq!(calc.wholesale_price, Decimal::from(900));
//! assert_eq!(calc.retail_price, Decimal::from(1800));
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::round_money;

/// Highest accepted profit margin, in percent.
pub const MAX_PROFIT_MARGIN: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Largest accepted peso amount for materials, labor, overhead or an
/// hourly rate.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Largest accepted number of labor hours.
pub const MAX_HOURS: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Retail price is this multiple of wholesale.
pub const RETAIL_MULTIPLIER: Decimal = Decimal::TWO;

/// Pricing validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("{0} cannot be negative")]
    Negative(&'static str),
    #[error("{0} is too large")]
    TooLarge(&'static str),
    #[error("profit margin must be between 0 and 1000 percent")]
    MarginOutOfRange,
    #[error("labor requires either a flat amount or hours with an hourly rate")]
    MissingLabor,
}

/// How labor was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaborCost {
    /// A lump sum for the piece.
    Flat(Decimal),
    /// Hours worked at an hourly rate.
    Hourly { hours: Decimal, rate: Decimal },
}

impl LaborCost {
    /// Labor cost in pesos.
    #[must_use]
    pub fn amount(self) -> Decimal {
        match self {
            Self::Flat(amount) => amount,
            Self::Hourly { hours, rate } => hours.saturating_mul(rate),
        }
    }
}

/// Validated calculator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingInput {
    pub materials: Decimal,
    pub labor: LaborCost,
    pub overhead: Decimal,
    /// Percent, e.g. `50` for 50%.
    pub profit_margin: Decimal,
    /// State whose wage references apply.
    pub state: Option<String>,
}

/// Raw calculator form / JSON body.
///
/// Either `labor` or both `hours` and `hourlyRate` must be present. When
/// both are given, hours win so the wage check can run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    pub materials: Decimal,
    #[serde(default)]
    pub labor: Option<Decimal>,
    #[serde(default)]
    pub hours: Option<Decimal>,
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    #[serde(default)]
    pub overhead: Decimal,
    pub profit_margin: Decimal,
    #[serde(default)]
    pub state: Option<String>,
}

impl TryFrom<PricingRequest> for PricingInput {
    type Error = PricingError;

    fn try_from(req: PricingRequest) -> Result<Self, Self::Error> {
        let labor = match (req.hours, req.hourly_rate, req.labor) {
            (Some(hours), Some(rate), _) => LaborCost::Hourly { hours, rate },
            (_, _, Some(flat)) => LaborCost::Flat(flat),
            _ => return Err(PricingError::MissingLabor),
        };
        let state = req
            .state
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(Self {
            materials: req.materials,
            labor,
            overhead: req.overhead,
            profit_margin: req.profit_margin,
            state,
        })
    }
}

/// Hourly wage references for one region, in MXN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalRate {
    pub minimum_wage: Decimal,
    pub living_wage: Decimal,
}

/// Regional wage table used by the calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FairTradeRates {
    /// Year the figures were published.
    pub year: u16,
    /// National fallback for states without their own figures.
    pub national: RegionalRate,
    /// Per-state figures keyed by state name.
    #[serde(default)]
    pub states: BTreeMap<String, RegionalRate>,
}

impl FairTradeRates {
    /// Figures for a state (case-insensitive), falling back to national.
    ///
    /// Returns the matched state name, or `"National"` on fallback.
    #[must_use]
    pub fn rate_for<'a>(&'a self, state: &str) -> (&'a str, RegionalRate) {
        let wanted = state.trim().to_lowercase();
        self.states
            .iter()
            .find(|(name, _)| name.to_lowercase() == wanted)
            .map_or(("National", self.national), |(name, rate)| {
                (name.as_str(), *rate)
            })
    }
}

/// Where an hourly rate sits against regional references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WageLevel {
    BelowMinimum,
    AboveMinimum,
    FairTrade,
}

impl WageLevel {
    /// Classify an hourly rate.
    #[must_use]
    pub fn classify(hourly_rate: Decimal, rate: RegionalRate) -> Self {
        if hourly_rate >= rate.living_wage {
            Self::FairTrade
        } else if hourly_rate >= rate.minimum_wage {
            Self::AboveMinimum
        } else {
            Self::BelowMinimum
        }
    }

    /// Short label for the calculator page.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BelowMinimum => "Below minimum wage",
            Self::AboveMinimum => "Above minimum, below living wage",
            Self::FairTrade => "Fair trade (living wage or better)",
        }
    }
}

/// Hourly rate check against regional references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WageAssessment {
    pub region: String,
    pub hourly_rate: Decimal,
    pub minimum_wage: Decimal,
    pub living_wage: Decimal,
    pub level: WageLevel,
    /// Labor cost had the maker been paid the living wage for the same hours.
    pub living_wage_labor: Decimal,
}

/// Calculator output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingCalculation {
    pub materials: Decimal,
    pub labor: Decimal,
    pub overhead: Decimal,
    pub total_cost: Decimal,
    pub profit_margin: Decimal,
    pub wholesale_price: Decimal,
    pub retail_price: Decimal,
    /// Wholesale price minus total cost.
    pub profit_per_piece: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wage: Option<WageAssessment>,
}

/// Run the calculator.
///
/// # Errors
///
/// Returns [`PricingError`] for negative or oversized amounts, or an
/// out-of-range margin.
pub fn calculate(
    input: &PricingInput,
    rates: Option<&FairTradeRates>,
) -> Result<PricingCalculation, PricingError> {
    ensure_in_range(input.materials, MAX_AMOUNT, "materials")?;
    ensure_in_range(input.overhead, MAX_AMOUNT, "overhead")?;
    match input.labor {
        LaborCost::Flat(amount) => ensure_in_range(amount, MAX_AMOUNT, "labor")?,
        LaborCost::Hourly { hours, rate } => {
            ensure_in_range(hours, MAX_HOURS, "hours")?;
            ensure_in_range(rate, MAX_AMOUNT, "hourly rate")?;
        }
    }
    if input.profit_margin < Decimal::ZERO || input.profit_margin > MAX_PROFIT_MARGIN {
        return Err(PricingError::MarginOutOfRange);
    }

    let labor = round_money(input.labor.amount());
    let total_cost = round_money(input.materials + labor + input.overhead);
    let wholesale_price =
        round_money(total_cost * (Decimal::ONE + input.profit_margin / Decimal::ONE_HUNDRED));
    let retail_price = round_money(wholesale_price * RETAIL_MULTIPLIER);

    let wage = match (input.labor, input.state.as_deref(), rates) {
        (LaborCost::Hourly { hours, rate }, Some(state), Some(rates)) => {
            let (region, reference) = rates.rate_for(state);
            Some(WageAssessment {
                region: region.to_string(),
                hourly_rate: rate,
                minimum_wage: reference.minimum_wage,
                living_wage: reference.living_wage,
                level: WageLevel::classify(rate, reference),
                living_wage_labor: round_money(hours * reference.living_wage),
            })
        }
        _ => None,
    };

    Ok(PricingCalculation {
        materials: input.materials,
        labor,
        overhead: input.overhead,
        total_cost,
        profit_margin: input.profit_margin,
        wholesale_price,
        retail_price,
        profit_per_piece: wholesale_price - total_cost,
        wage,
    })
}

// Caps keep the cost, wholesale and retail figures far inside `Decimal` range.
fn ensure_in_range(
    value: Decimal,
    max: Decimal,
    field: &'static str,
) -> Result<(), PricingError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PricingError::Negative(field));
    }
    if value > max {
        return Err(PricingError::TooLarge(field));
    }
    Ok(())
}
