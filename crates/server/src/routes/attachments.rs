//! Company and manufacturer part attachments.
//!
//! Uploads arrive as JSON with `filename` and base64 `content`, or as a bare
//! `link`.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

use stockroom_api::input::AttachmentInput;
use stockroom_api::query::{CompanyAttachmentQuery, ManufacturerPartAttachmentQuery};
use stockroom_api::views::AttachmentView;
use stockroom_store::{AttachmentKind, Store};

use super::ApiResult;

fn list_kind(
    store: &Store,
    kind: AttachmentKind,
    owner: Option<i64>,
) -> ApiResult<Json<Vec<AttachmentView>>> {
    let rows = store.list_attachments(kind, owner)?;
    Ok(Json(rows.iter().map(AttachmentView::from).collect()))
}

fn create_kind(
    store: &Store,
    kind: AttachmentKind,
    body: &Value,
) -> ApiResult<(StatusCode, Json<AttachmentView>)> {
    let owner_field = kind.owner(0).field();
    let input = AttachmentInput::parse(body, owner_field)?;
    let saved = store.create_attachment(kind, &input, Utc::now().date_naive())?;
    Ok((StatusCode::CREATED, Json(AttachmentView::from(&saved))))
}

fn get_kind(store: &Store, kind: AttachmentKind, id: i64) -> ApiResult<Json<AttachmentView>> {
    let attachment = store.get_attachment(kind, id)?;
    Ok(Json(AttachmentView::from(&attachment)))
}

fn delete_kind(store: &Store, kind: AttachmentKind, id: i64) -> ApiResult<StatusCode> {
    store.delete_attachment(kind, id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ── /api/company/attachment/ ─────────────────────────────────────────────

pub async fn list_company(
    State(store): State<Arc<Store>>,
    Query(q): Query<CompanyAttachmentQuery>,
) -> ApiResult<Json<Vec<AttachmentView>>> {
    list_kind(&store, AttachmentKind::Company, q.company)
}

pub async fn create_company(
    State(store): State<Arc<Store>>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<AttachmentView>)> {
    create_kind(&store, AttachmentKind::Company, &body)
}

pub async fn get_company(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<AttachmentView>> {
    get_kind(&store, AttachmentKind::Company, id)
}

pub async fn delete_company(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    delete_kind(&store, AttachmentKind::Company, id)
}

// ── /api/company/part/manufacturer/attachment/ ───────────────────────────

pub async fn list_manufacturer_part(
    State(store): State<Arc<Store>>,
    Query(q): Query<ManufacturerPartAttachmentQuery>,
) -> ApiResult<Json<Vec<AttachmentView>>> {
    list_kind(&store, AttachmentKind::ManufacturerPart, q.manufacturer_part)
}

pub async fn create_manufacturer_part(
    State(store): State<Arc<Store>>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<AttachmentView>)> {
    create_kind(&store, AttachmentKind::ManufacturerPart, &body)
}

pub async fn get_manufacturer_part(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<AttachmentView>> {
    get_kind(&store, AttachmentKind::ManufacturerPart, id)
}

pub async fn delete_manufacturer_part(
    State(store): State<Arc<Store>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    delete_kind(&store, AttachmentKind::ManufacturerPart, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use serde_json::json;

    #[tokio::test]
    async fn test_company_attachment_upload() {
        let (_dir, state) = test_support::state();
        let acme = test_support::company(&state, "Acme", true, false);

        let (status, Json(view)) = create_company(
            State(state.store.clone()),
            Json(json!({"company": acme, "filename": "terms.pdf", "content": "JVBERi0="})),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        let body = serde_json::to_value(&view).unwrap();
        assert_eq!(body["company"], acme);
        assert_eq!(body["filename"], "terms.pdf");
        assert!(body["user"].is_null());
        assert_eq!(
            body["attachment"],
            format!("/media/attachments/company_files/{acme}/terms.pdf")
        );

        let Json(listed) = list_company(
            State(state.store.clone()),
            Query(CompanyAttachmentQuery { company: Some(acme) }),
        )
        .await
        .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_neither_file_nor_link() {
        let (_dir, state) = test_support::state();
        let acme = test_support::company(&state, "Acme", true, false);
        let err = create_company(State(state.store.clone()), Json(json!({"company": acme})))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body()["attachment"], json!(["Missing file"]));
        assert_eq!(err.body()["link"], json!(["Missing external link"]));
    }
}
