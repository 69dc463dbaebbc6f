use axum::{Json, extract::State};
use std::sync::Arc;

use stockroom_api::CurrencyListResponse;
use stockroom_core::CurrencyTable;

/// GET /api/currencies: the configured currency codes and the default.
pub async fn list(State(currencies): State<Arc<CurrencyTable>>) -> Json<CurrencyListResponse> {
    Json(CurrencyListResponse {
        default: currencies.default_code().to_string(),
        currencies: currencies.mappings(),
    })
}
