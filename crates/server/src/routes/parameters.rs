use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::Value;
use std::sync::Arc;

use stockroom_api::input::ParameterChanges;
use stockroom_api::query::ParameterQuery;
use stockroom_api::views::ParameterView;
use stockroom_store::Store;

use super::ApiResult;

/// GET /api/company/part/manufacturer/parameter/
pub async fn list(
    State(store): State<Arc<Store>>,
    Query(q): Query<ParameterQuery>,
) -> ApiResult<Json<Vec<ParameterView>>> {
    let detail = q.detail();
    let params = store.list_parameters(&q)?;
    Ok(Json(params.iter().map(|b| ParameterView::build(b, detail)).collect()))
}

pub async fn create(
    State(store): State<Arc<Store>>,
    Query(q): Query<ParameterQuery>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<ParameterView>)> {
    let saved = store.create_parameter(&ParameterChanges::parse(&body, false)?)?;
    Ok((StatusCode::CREATED, Json(ParameterView::build(&saved, q.detail()))))
}

pub async fn get(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
    Query(q): Query<ParameterQuery>,
) -> ApiResult<Json<ParameterView>> {
    let param = store.get_parameter(id)?;
    Ok(Json(ParameterView::build(&param, q.detail())))
}

pub async fn update(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
    Query(q): Query<ParameterQuery>,
    Json(body): Json<Value>,
) -> ApiResult<Json<ParameterView>> {
    let saved = store.update_parameter(id, &ParameterChanges::parse(&body, false)?)?;
    Ok(Json(ParameterView::build(&saved, q.detail())))
}

pub async fn patch(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
    Query(q): Query<ParameterQuery>,
    Json(body): Json<Value>,
) -> ApiResult<Json<ParameterView>> {
    let saved = store.update_parameter(id, &ParameterChanges::parse(&body, true)?)?;
    Ok(Json(ParameterView::build(&saved, q.detail())))
}

pub async fn delete(State(store): State<Arc<Store>>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    store.delete_parameter(id)?;
    Ok(StatusCode::NO_CONTENT)
}
