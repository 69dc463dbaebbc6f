use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::Value;
use std::sync::Arc;

use stockroom_api::input::PriceBreakChanges;
use stockroom_api::query::PriceBreakQuery;
use stockroom_api::views::PriceBreakView;
use stockroom_core::CurrencyTable;
use stockroom_store::Store;

use super::ApiResult;
use crate::AppState;

/// GET /api/company/price-break/
pub async fn list(
    State(store): State<Arc<Store>>,
    Query(q): Query<PriceBreakQuery>,
) -> ApiResult<Json<Vec<PriceBreakView>>> {
    let detail = q.detail();
    let breaks = store.list_price_breaks(&q)?;
    Ok(Json(breaks.iter().map(|b| PriceBreakView::build(b, detail)).collect()))
}

/// POST /api/company/price-break/: `price_currency` defaults to the
/// configured default currency.
pub async fn create(
    State(state): State<AppState>,
    Query(q): Query<PriceBreakQuery>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<PriceBreakView>)> {
    let changes = PriceBreakChanges::parse(&body, false, &state.currencies)?;
    let saved = state.store.create_price_break(&changes, &state.currencies)?;
    Ok((StatusCode::CREATED, Json(PriceBreakView::build(&saved, q.detail()))))
}

pub async fn get(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
    Query(q): Query<PriceBreakQuery>,
) -> ApiResult<Json<PriceBreakView>> {
    let pb = store.get_price_break(id)?;
    Ok(Json(PriceBreakView::build(&pb, q.detail())))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(q): Query<PriceBreakQuery>,
    Json(body): Json<Value>,
) -> ApiResult<Json<PriceBreakView>> {
    save(&state.store, &state.currencies, id, &q, &body, false)
}

pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(q): Query<PriceBreakQuery>,
    Json(body): Json<Value>,
) -> ApiResult<Json<PriceBreakView>> {
    save(&state.store, &state.currencies, id, &q, &body, true)
}

fn save(
    store: &Store,
    currencies: &CurrencyTable,
    id: i64,
    q: &PriceBreakQuery,
    body: &Value,
    partial: bool,
) -> ApiResult<Json<PriceBreakView>> {
    let changes = PriceBreakChanges::parse(body, partial, currencies)?;
    let saved = store.update_price_break(id, &changes)?;
    Ok(Json(PriceBreakView::build(&saved, q.detail())))
}

pub async fn delete(State(store): State<Arc<Store>>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    store.delete_price_break(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use serde_json::json;
    use stockroom_api::input::SupplierPartInput;

    #[tokio::test]
    async fn test_part_detail_is_brief() {
        let (_dir, state) = test_support::state();
        let part = test_support::part(&state, "Widget");
        let digi = test_support::company(&state, "Digi", true, false);
        let sp = state
            .store
            .create_supplier_part(
                &SupplierPartInput::from_create(&json!({"part": part, "supplier": digi, "SKU": "D-1"}))
                    .unwrap(),
            )
            .unwrap()
            .supplier_part
            .pk;

        let q = PriceBreakQuery {
            part_detail: Some(true),
            supplier_detail: Some(true),
            ..Default::default()
        };
        let (_, Json(view)) = create(
            State(state.clone()),
            Query(q),
            Json(json!({"part": sp, "quantity": 10, "price": "0.5"})),
        )
        .await
        .unwrap();
        let body = serde_json::to_value(&view).unwrap();
        assert_eq!(body["price_currency"], "USD");
        assert_eq!(body["supplier"], digi);
        assert_eq!(body["supplier_detail"]["name"], "Digi");

        let nested = &body["part_detail"];
        assert_eq!(nested["SKU"], "D-1");
        for field in ["part_detail", "supplier_detail", "manufacturer_detail", "in_stock"] {
            assert!(nested.get(field).is_none(), "{field} should be absent");
        }
    }

    #[tokio::test]
    async fn test_missing_price_key_rejected() {
        let (_dir, state) = test_support::state();
        let err = create(
            State(state.clone()),
            Query(PriceBreakQuery::default()),
            Json(json!({"part": 1, "quantity": 1})),
        )
        .await
        .unwrap_err();
        assert!(err.body().get("price").is_some());
    }
}
