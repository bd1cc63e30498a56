//! Fair-trade pricing calculator page.
//!
//! The calculator form submits with GET so results can be bookmarked.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use papalote_core::pricing::{
    FairTradeRates, PricingCalculation, PricingInput, PricingRequest, calculate,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::state::AppState;

/// Calculator form fields as typed by the maker.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PricingForm {
    pub materials: String,
    pub labor: String,
    pub hours: String,
    pub hourly_rate: String,
    pub overhead: String,
    pub profit_margin: String,
    pub state: String,
}

fn decimal(value: &str, label: &str) -> Result<Option<Decimal>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| format!("{label} must be a number"))
}

impl PricingForm {
    /// Nothing entered yet.
    pub fn is_blank(&self) -> bool {
        [&self.materials, &self.labor, &self.hours, &self.profit_margin]
            .iter()
            .all(|v| v.trim().is_empty())
    }

    /// Parse the text fields. Blank materials, overhead and margin count as 0.
    ///
    /// # Errors
    ///
    /// A message naming the first field that is not a number.
    pub fn to_request(&self) -> Result<PricingRequest, String> {
        Ok(PricingRequest {
            materials: decimal(&self.materials, "Materials")?.unwrap_or_default(),
            labor: decimal(&self.labor, "Labor")?,
            hours: decimal(&self.hours, "Hours")?,
            hourly_rate: decimal(&self.hourly_rate, "Hourly rate")?,
            overhead: decimal(&self.overhead, "Overhead")?.unwrap_or_default(),
            profit_margin: decimal(&self.profit_margin, "Profit margin")?.unwrap_or_default(),
            state: Some(self.state.clone()),
        })
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "pricing.html")]
pub struct PricingTemplate {
    pub form: PricingForm,
    pub result: Option<PricingCalculation>,
    pub error: Option<String>,
    pub rates: FairTradeRates,
}

/// Calculator with the regional wage table.
#[instrument(skip(state))]
pub async fn calculator(
    State(state): State<AppState>,
    Query(form): Query<PricingForm>,
) -> PricingTemplate {
    let rates = state.catalog().fair_trade_rates().clone();

    let (result, error) = if form.is_blank() {
        (None, None)
    } else {
        let outcome = form
            .to_request()
            .and_then(|req| PricingInput::try_from(req).map_err(|e| e.to_string()))
            .and_then(|input| calculate(&input, Some(&rates)).map_err(|e| e.to_string()));
        match outcome {
            Ok(calc) => (Some(calc), None),
            Err(message) => (None, Some(message)),
        }
    };

    PricingTemplate {
        form,
        result,
        error,
        rates,
    }
}
