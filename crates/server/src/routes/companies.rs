use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::Value;
use std::sync::Arc;

use stockroom_api::input::CompanyChanges;
use stockroom_api::query::CompanyListQuery;
use stockroom_api::views::CompanyDetail;
use stockroom_store::Store;

use super::ApiResult;
use crate::AppState;

/// GET /api/company/: companies with their part counts.
pub async fn list(
    State(store): State<Arc<Store>>,
    Query(q): Query<CompanyListQuery>,
) -> ApiResult<Json<Vec<CompanyDetail>>> {
    let companies = store.list_companies(&q)?;
    Ok(Json(companies.iter().map(CompanyDetail::from).collect()))
}

/// POST /api/company/: the `remote_image` download happens first.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<CompanyDetail>)> {
    let changes = CompanyChanges::parse(&body, false, &state.currencies)?;
    let image = state.images.fetch_opt(changes.remote_image.as_deref()).await?;
    let saved = state.store.create_company(&changes, image.as_ref())?;
    Ok((StatusCode::CREATED, Json(CompanyDetail::from(&saved))))
}

pub async fn get(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<CompanyDetail>> {
    let company = store.get_company(id)?;
    Ok(Json(CompanyDetail::from(&company)))
}

/// PUT /api/company/{id}/
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> ApiResult<Json<CompanyDetail>> {
    save(&state, id, &body, false).await
}

/// PATCH /api/company/{id}/
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> ApiResult<Json<CompanyDetail>> {
    save(&state, id, &body, true).await
}

async fn save(
    state: &AppState,
    id: i64,
    body: &Value,
    partial: bool,
) -> ApiResult<Json<CompanyDetail>> {
    let changes = CompanyChanges::parse(body, partial, &state.currencies)?;
    let image = state.images.fetch_opt(changes.remote_image.as_deref()).await?;
    let saved = state.store.update_company(id, &changes, image.as_ref())?;
    Ok(Json(CompanyDetail::from(&saved)))
}

pub async fn delete(State(store): State<Arc<Store>>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    store.delete_company(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use serde_json::json;

    async fn create_json(state: &AppState, body: Value) -> Value {
        let (status, Json(view)) = create(State(state.clone()), Json(body)).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        serde_json::to_value(view).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_patch() {
        let (_dir, state) = test_support::state();
        let created = create_json(&state, json!({"name": "Acme", "currency": "EUR"})).await;
        assert_eq!(created["currency"], "EUR");
        assert_eq!(created["is_supplier"], true);
        assert_eq!(created["parts_supplied"], 0);

        let id = created["pk"].as_i64().unwrap();
        let Json(patched) = patch(
            State(state.clone()),
            Path(id),
            Json(json!({"is_manufacturer": true, "website": "https://acme.test"})),
        )
        .await
        .unwrap();
        let patched = serde_json::to_value(patched).unwrap();
        assert_eq!(patched["is_manufacturer"], true);
        assert_eq!(patched["name"], "Acme");
    }

    #[tokio::test]
    async fn test_put_requires_name_and_currency() {
        let (_dir, state) = test_support::state();
        let created = create_json(&state, json!({"name": "Acme", "currency": "USD"})).await;
        let id = created["pk"].as_i64().unwrap();

        let err = update(State(state.clone()), Path(id), Json(json!({"description": "x"})))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.body().get("name").is_some());
        assert!(err.body().get("currency").is_some());
    }

    #[tokio::test]
    async fn test_unknown_currency_rejected() {
        let (_dir, state) = test_support::state();
        let err = create(
            State(state.clone()),
            Json(json!({"name": "Acme", "currency": "XYZ"})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.body().get("currency").is_some());
    }

    #[tokio::test]
    async fn test_remote_image_disabled() {
        let (_dir, state) = test_support::state();
        let err = create(
            State(state.clone()),
            Json(json!({
                "name": "Acme",
                "currency": "USD",
                "remote_image": "https://example.com/logo.png"
            })),
        )
        .await
        .unwrap_err();
        assert!(err.body().get("remote_image").is_some());
        // nothing was saved
        let Json(all) = list(State(state.store.clone()), Query(CompanyListQuery::default()))
            .await
            .unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let (_dir, state) = test_support::state();
        let created = create_json(&state, json!({"name": "Acme", "currency": "USD"})).await;
        let id = created["pk"].as_i64().unwrap();
        let status = delete(State(state.store.clone()), Path(id)).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        let err = get(State(state.store.clone()), Path(id)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_patch_image_null_clears_image() {
        let (_dir, state) = test_support::state();
        let png = stockroom_core::RemoteImage::new(b"\x89PNG\r\n\x1a\n".to_vec());
        let changes = CompanyChanges::parse(
            &json!({"name": "Acme", "currency": "USD"}),
            false,
            &state.currencies,
        )
        .unwrap();
        let saved = state.store.create_company(&changes, Some(&png)).unwrap();
        let rel = saved.company.image.clone().unwrap();

        let Json(patched) = patch(
            State(state.clone()),
            Path(saved.company.pk),
            Json(json!({"image": null})),
        )
        .await
        .unwrap();
        let patched = serde_json::to_value(patched).unwrap();
        assert!(patched["image"].is_null());
        assert!(!state.store.media_root().join(rel).exists());
    }
}
