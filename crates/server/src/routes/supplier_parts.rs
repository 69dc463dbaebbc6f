use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::Value;
use std::sync::Arc;

use stockroom_api::input::SupplierPartInput;
use stockroom_api::query::SupplierPartQuery;
use stockroom_api::views::SupplierPartView;
use stockroom_store::Store;

use super::ApiResult;

/// GET /api/company/part/: `brief` turns the detail defaults off.
pub async fn list(
    State(store): State<Arc<Store>>,
    Query(q): Query<SupplierPartQuery>,
) -> ApiResult<Json<Vec<SupplierPartView>>> {
    let detail = q.detail();
    let parts = store.list_supplier_parts(&q)?;
    Ok(Json(
        parts
            .iter()
            .map(|b| SupplierPartView::build(b, detail))
            .collect(),
    ))
}

/// POST /api/company/part/
///
/// `available` updates availability; `manufacturer` plus `MPN` links (or
/// creates) the manufacturer part.
pub async fn create(
    State(store): State<Arc<Store>>,
    Query(q): Query<SupplierPartQuery>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<SupplierPartView>)> {
    let input = SupplierPartInput::from_create(&body)?;
    let saved = store.create_supplier_part(&input)?;
    Ok((
        StatusCode::CREATED,
        Json(SupplierPartView::build(&saved, q.detail())),
    ))
}

pub async fn get(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
    Query(q): Query<SupplierPartQuery>,
) -> ApiResult<Json<SupplierPartView>> {
    let sp = store.get_supplier_part(id)?;
    Ok(Json(SupplierPartView::build(&sp, q.detail())))
}

pub async fn update(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
    Query(q): Query<SupplierPartQuery>,
    Json(body): Json<Value>,
) -> ApiResult<Json<SupplierPartView>> {
    save(&store, id, &q, &body, false)
}

pub async fn patch(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
    Query(q): Query<SupplierPartQuery>,
    Json(body): Json<Value>,
) -> ApiResult<Json<SupplierPartView>> {
    save(&store, id, &q, &body, true)
}

fn save(
    store: &Store,
    id: i64,
    q: &SupplierPartQuery,
    body: &Value,
    partial: bool,
) -> ApiResult<Json<SupplierPartView>> {
    let input = SupplierPartInput::from_update(body, partial)?;
    let saved = store.update_supplier_part(id, &input)?;
    Ok(Json(SupplierPartView::build(&saved, q.detail())))
}

pub async fn delete(State(store): State<Arc<Store>>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    store.delete_supplier_part(id)?;
    Ok(StatusCode::NO_CONTENT)
}
