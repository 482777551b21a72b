//! Shipment prefix-search route handler.

use axum::{Json, Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::shipments::ShipmentRepository;
use crate::error::Result;
use crate::middleware::auth::RequireAuth;
use crate::models::shipment::SearchHit;
use crate::routes::ApiQuery;
use crate::state::AppState;

/// Create the search routes router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/shipments/search", get(search))
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Search response: at most eight summaries, newest first.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub items: Vec<SearchHit>,
}

/// Case-insensitive prefix search over shipment ids and tracking numbers.
///
/// An empty or whitespace-only query returns an empty result set rather
/// than an error; metacharacters in the query are treated as literals.
#[instrument(skip_all)]
pub async fn search(
    RequireAuth(_identity): RequireAuth,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<SearchResponse>> {
    let items = ShipmentRepository::new(state.pool())
        .search_by_prefix(&query.q)
        .await?;

    Ok(Json(SearchResponse { items }))
}
