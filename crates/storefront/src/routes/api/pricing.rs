//! Fair-trade pricing calculator API.

use axum::{Json, extract::State};
use papalote_core::pricing::{
    FairTradeRates, PricingCalculation, PricingInput, PricingRequest, calculate as run,
};
use tracing::instrument;

use super::{ApiJson, Envelope, ok};
use crate::error::Result;
use crate::state::AppState;

/// `POST /api/pricing/calculate`
#[instrument(skip(state))]
pub async fn calculate(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PricingRequest>,
) -> Result<Json<Envelope<PricingCalculation>>> {
    let input = PricingInput::try_from(request)?;
    let calculation = run(&input, Some(state.catalog().fair_trade_rates()))?;
    Ok(ok(calculation))
}

/// `GET /api/pricing/rates`
#[instrument(skip(state))]
pub async fn rates(State(state): State<AppState>) -> Json<Envelope<FairTradeRates>> {
    ok(state.catalog().fair_trade_rates().clone())
}
