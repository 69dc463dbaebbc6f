use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::Value;
use std::sync::Arc;

use stockroom_api::input::ManufacturerPartChanges;
use stockroom_api::query::ManufacturerPartQuery;
use stockroom_api::views::ManufacturerPartView;
use stockroom_store::Store;

use super::ApiResult;

/// GET /api/company/part/manufacturer/
pub async fn list(
    State(store): State<Arc<Store>>,
    Query(q): Query<ManufacturerPartQuery>,
) -> ApiResult<Json<Vec<ManufacturerPartView>>> {
    let detail = q.detail();
    let parts = store.list_manufacturer_parts(&q)?;
    Ok(Json(
        parts
            .iter()
            .map(|b| ManufacturerPartView::build(b, detail))
            .collect(),
    ))
}

pub async fn create(
    State(store): State<Arc<Store>>,
    Query(q): Query<ManufacturerPartQuery>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<ManufacturerPartView>)> {
    let changes = ManufacturerPartChanges::parse(&body, false)?;
    let saved = store.create_manufacturer_part(&changes)?;
    Ok((
        StatusCode::CREATED,
        Json(ManufacturerPartView::build(&saved, q.detail())),
    ))
}

pub async fn get(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
    Query(q): Query<ManufacturerPartQuery>,
) -> ApiResult<Json<ManufacturerPartView>> {
    let mp = store.get_manufacturer_part(id)?;
    Ok(Json(ManufacturerPartView::build(&mp, q.detail())))
}

pub async fn update(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
    Query(q): Query<ManufacturerPartQuery>,
    Json(body): Json<Value>,
) -> ApiResult<Json<ManufacturerPartView>> {
    save(&store, id, &q, &body, false)
}

pub async fn patch(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
    Query(q): Query<ManufacturerPartQuery>,
    Json(body): Json<Value>,
) -> ApiResult<Json<ManufacturerPartView>> {
    save(&store, id, &q, &body, true)
}

fn save(
    store: &Store,
    id: i64,
    q: &ManufacturerPartQuery,
    body: &Value,
    partial: bool,
) -> ApiResult<Json<ManufacturerPartView>> {
    let changes = ManufacturerPartChanges::parse(body, partial)?;
    let saved = store.update_manufacturer_part(id, &changes)?;
    Ok(Json(ManufacturerPartView::build(&saved, q.detail())))
}

pub async fn delete(State(store): State<Arc<Store>>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    store.delete_manufacturer_part(id)?;
    Ok(StatusCode::NO_CONTENT)
}
