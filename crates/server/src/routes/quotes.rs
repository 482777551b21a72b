//! Quote route handler.
//!
//! Explicitly a stub: the figures below are flat placeholders and real
//! rating is out of scope for this service.

use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::routes::ApiJson;
use crate::state::AppState;

/// Create the quote routes router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/quotes", post(quote))
}

/// Quote request parameters. All optional; a rating engine would use them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuoteRequest {
    pub origin_country: Option<String>,
    pub destination_country: Option<String>,
    pub weight_kg: Option<f64>,
}

/// Quote response wrapper.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub quote: Quote,
}

/// A shipping quote.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub currency: &'static str,
    pub amount: &'static str,
    pub transit_days: u32,
    pub disclaimer: &'static str,
}

/// Return a canned shipping quote.
#[instrument(skip_all)]
pub async fn quote(ApiJson(_body): ApiJson<QuoteRequest>) -> Json<QuoteResponse> {
    Json(QuoteResponse {
        quote: Quote {
            currency: "USD",
            amount: "49.00",
            transit_days: 5,
            disclaimer: "Estimate only. Final pricing is confirmed at booking.",
        },
    })
}
