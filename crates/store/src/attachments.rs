//! Company and manufacturer part attachments.

use chrono::NaiveDate;
use rusqlite::Connection;

use stockroom_api::db::attachments::{self, AttachmentKind};
use stockroom_api::input::AttachmentInput;
use stockroom_api::ServiceError;
use stockroom_core::{Attachment, ValidationError};

use crate::manufacturer_parts::load_manufacturer_part;
use crate::rows::attachment_from_row;
use crate::{catalog, media, sql};
use crate::{Store, StoreResult};

impl Store {
    pub fn list_attachments(
        &self,
        kind: AttachmentKind,
        owner: Option<i64>,
    ) -> StoreResult<Vec<Attachment>> {
        let conn = self.conn();
        sql::query_all(&conn, attachments::list(kind, owner), attachment_from_row(kind))
            .map_err(ServiceError::from_db("list attachments"))
    }

    pub fn get_attachment(&self, kind: AttachmentKind, id: i64) -> StoreResult<Attachment> {
        let conn = self.conn();
        load_attachment(&conn, kind, id)?.ok_or_else(not_found)
    }

    /// Insert the row, then store the uploaded file (if any) under the
    /// owner's directory with a free name. The file is taken back if the
    /// transaction does not commit.
    pub fn create_attachment(
        &self,
        kind: AttachmentKind,
        input: &AttachmentInput,
        today: NaiveDate,
    ) -> StoreResult<Attachment> {
        let owner = kind.owner(input.owner);
        let mut attachment = Attachment {
            pk: 0,
            owner,
            attachment: None,
            link: input.link.clone(),
            comment: input.comment.clone(),
            upload_date: today,
            user: None,
        };
        let media_root = self.media_root.clone();
        let mut staged = None;
        let outcome = self.write("create attachment", |conn| {
            check_owner(conn, kind, input.owner)?;
            attachment.pk = sql::insert(conn, attachments::insert(&attachment))
                .map_err(ServiceError::from_db("insert attachment"))?;
            if let Some(file) = &input.file {
                let rel = media::available_path(&media_root, &owner.storage_path(&file.filename));
                sql::execute(conn, attachments::set_file(kind, attachment.pk, &rel))
                    .map_err(ServiceError::from_db("set attachment file"))?;
                staged = Some(media::Staged::write(&media_root, &rel, &file.content)?);
                tracing::info!("Stored attachment {} at {rel}", attachment.pk);
                attachment.attachment = Some(rel);
            }
            Ok(())
        });
        if let Err(e) = outcome {
            if let Some(file) = staged {
                file.discard(&self.media_root);
            }
            return Err(e);
        }
        Ok(attachment)
    }

    pub fn delete_attachment(&self, kind: AttachmentKind, id: i64) -> StoreResult<()> {
        let removed = self.write("delete attachment", |conn| {
            let attachment = load_attachment(conn, kind, id)?.ok_or_else(not_found)?;
            sql::execute(conn, attachments::delete(kind, id))
                .map_err(ServiceError::from_db("delete attachment"))?;
            Ok(attachment.attachment)
        })?;
        if let Some(rel) = removed {
            media::remove(&self.media_root, &rel);
        }
        Ok(())
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("attachment not found".into())
}

fn load_attachment(
    conn: &Connection,
    kind: AttachmentKind,
    id: i64,
) -> StoreResult<Option<Attachment>> {
    sql::query_opt(conn, attachments::get_by_id(kind, id), attachment_from_row(kind))
        .map_err(ServiceError::from_db("load attachment"))
}

fn check_owner(conn: &Connection, kind: AttachmentKind, pk: i64) -> StoreResult<()> {
    let exists = match kind {
        AttachmentKind::Company => catalog::load_company(conn, pk)?.is_some(),
        AttachmentKind::ManufacturerPart => load_manufacturer_part(conn, pk)?.is_some(),
    };
    if exists {
        return Ok(());
    }
    Err(ValidationError::DoesNotExist {
        field: kind.owner(pk).field().into(),
        pk,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_file_attachment_lifecycle() {
        let (_dir, store) = test_support::open();
        let acme = test_support::company(&store, "Acme", true, false);
        let body = json!({"company": acme.pk, "filename": "quote.pdf", "content": "aGVsbG8=", "comment": "Q1"});
        let input = AttachmentInput::parse(&body, "company").unwrap();

        let first = store
            .create_attachment(AttachmentKind::Company, &input, today())
            .unwrap();
        let expected = format!("attachments/company_files/{}/quote.pdf", acme.pk);
        assert_eq!(first.attachment.as_deref(), Some(expected.as_str()));
        assert_eq!(std::fs::read(store.media_root().join(&expected)).unwrap(), b"hello");

        let second = store
            .create_attachment(AttachmentKind::Company, &input, today())
            .unwrap();
        assert_eq!(second.filename(), Some("quote_1.pdf"));

        let listed = store
            .list_attachments(AttachmentKind::Company, Some(acme.pk))
            .unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].comment, "Q1");
        assert_eq!(listed[0].upload_date, today());

        store
            .delete_attachment(AttachmentKind::Company, first.pk)
            .unwrap();
        assert!(!store.media_root().join(&expected).exists());
        assert!(matches!(
            store.get_attachment(AttachmentKind::Company, first.pk),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn test_link_attachment_for_manufacturer_part() {
        let (_dir, store) = test_support::open();
        let part = test_support::part(&store, "Widget");
        let acme = test_support::company(&store, "Acme", false, true);
        let mp = store
            .create_manufacturer_part(
                &stockroom_api::input::ManufacturerPartChanges::parse(
                    &json!({"part": part.pk, "manufacturer": acme.pk, "MPN": "W1"}),
                    false,
                )
                .unwrap(),
            )
            .unwrap()
            .manufacturer_part;

        let body = json!({"manufacturer_part": mp.pk, "link": "https://example.com/ds.pdf"});
        let input = AttachmentInput::parse(&body, "manufacturer_part").unwrap();
        let created = store
            .create_attachment(AttachmentKind::ManufacturerPart, &input, today())
            .unwrap();
        assert_eq!(created.attachment, None);
        assert_eq!(created.link, "https://example.com/ds.pdf");

        // company attachments live in their own table
        assert!(store
            .list_attachments(AttachmentKind::Company, None)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_missing_owner() {
        let (_dir, store) = test_support::open();
        let body = json!({"company": 99, "link": "https://example.com"});
        let input = AttachmentInput::parse(&body, "company").unwrap();
        let err = store
            .create_attachment(AttachmentKind::Company, &input, today())
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e.contains("company")));
    }

    #[test]
    fn test_rejected_upload_leaves_no_file() {
        let (_dir, store) = test_support::open();
        let body = json!({"company": 99, "filename": "quote.pdf", "content": "aGVsbG8="});
        let input = AttachmentInput::parse(&body, "company").unwrap();
        assert!(store
            .create_attachment(AttachmentKind::Company, &input, today())
            .is_err());
        assert!(!store
            .media_root()
            .join("attachments/company_files/99/quote.pdf")
            .exists());
    }
}
