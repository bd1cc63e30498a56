//! Pricing calculator on the command line.

use std::path::Path;

use papalote_core::Money;
use papalote_core::pricing::{PricingInput, PricingRequest, calculate};
use papalote_storefront::catalog::Fixtures;
use tracing::info;

/// Price one piece and log the breakdown.
///
/// The wage check uses the rates bundled with the fixtures in `data_dir`.
///
/// # Errors
///
/// Returns an error if the fixtures fail to load or the input is invalid.
pub fn run(request: PricingRequest, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let fixtures = Fixtures::load(data_dir)?;
    let input = PricingInput::try_from(request)?;
    let calc = calculate(&input, Some(&fixtures.fair_trade_rates))?;

    info!("Materials:        {}", Money::mxn(calc.materials));
    info!("Labor:            {}", Money::mxn(calc.labor));
    info!("Overhead:         {}", Money::mxn(calc.overhead));
    info!("Total cost:       {}", Money::mxn(calc.total_cost));
    info!("Wholesale price:  {}", Money::mxn(calc.wholesale_price));
    info!("Retail price:     {}", Money::mxn(calc.retail_price));
    info!("Profit per piece: {}", Money::mxn(calc.profit_per_piece));

    if let Some(wage) = calc.wage {
        info!("");
        info!(
            "Wage check ({}): {} per hour, {}",
            wage.region,
            Money::mxn(wage.hourly_rate),
            wage.level.label()
        );
        info!(
            "  minimum {} / living {}",
            Money::mxn(wage.minimum_wage),
            Money::mxn(wage.living_wage)
        );
        info!("  labor at living wage: {}", Money::mxn(wage.living_wage_labor));
    }
    Ok(())
}
