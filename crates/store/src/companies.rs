//! Company reads and writes, including the remote image side effect.

use std::path::Path;

use rusqlite::Connection;

use stockroom_api::db::companies;
use stockroom_api::input::CompanyChanges;
use stockroom_api::query::CompanyListQuery;
use stockroom_api::views::AnnotatedCompany;
use stockroom_api::{FieldErrors, ServiceError};
use stockroom_core::company::COMPANY_IMAGE_DIR;
use stockroom_core::image::company_image_filename;
use stockroom_core::{Company, RemoteImage};

use crate::rows::annotated_company_from_row;
use crate::{catalog, media, sql};
use crate::{Store, StoreResult};

impl Store {
    pub fn list_companies(&self, filter: &CompanyListQuery) -> StoreResult<Vec<AnnotatedCompany>> {
        let conn = self.conn();
        sql::query_all(&conn, companies::list(filter), annotated_company_from_row)
            .map_err(ServiceError::from_db("list companies"))
    }

    /// A company with its part counts.
    pub fn get_company(&self, id: i64) -> StoreResult<AnnotatedCompany> {
        let conn = self.conn();
        load_annotated(&conn, id)
    }

    /// Insert a company, then store the fetched image (if any) under its new pk.
    pub fn create_company(
        &self,
        changes: &CompanyChanges,
        image: Option<&RemoteImage>,
    ) -> StoreResult<AnnotatedCompany> {
        let mut company = changes.create();
        let media_root = self.media_root.clone();
        let mut staged = None;
        let outcome = self.write("create company", |conn| {
            check_name(conn, &company)?;
            company.pk = sql::insert(conn, companies::insert(&company))
                .map_err(ServiceError::from_db("insert company"))?;
            if let Some(image) = image {
                staged = Some(save_company_image(conn, &media_root, &mut company, image)?);
            }
            load_annotated(conn, company.pk)
        });
        let saved = self.settle_image(outcome, staged, None)?;
        tracing::info!("Created company {} ({})", saved.company.pk, saved.company.name);
        Ok(saved)
    }

    /// Apply `changes` to company `id`, then store the fetched image (if any).
    /// An image that is replaced or cleared is removed from disk.
    pub fn update_company(
        &self,
        id: i64,
        changes: &CompanyChanges,
        image: Option<&RemoteImage>,
    ) -> StoreResult<AnnotatedCompany> {
        let media_root = self.media_root.clone();
        let mut staged = None;
        let mut previous = None;
        let outcome = self.write("update company", |conn| {
            let mut company = catalog::load_company(conn, id)?.ok_or_else(not_found)?;
            previous = company.image.clone();
            changes.apply_to(&mut company);
            check_name(conn, &company)?;
            sql::execute(conn, companies::update(&company))
                .map_err(ServiceError::from_db("update company"))?;
            if let Some(image) = image {
                staged = Some(save_company_image(conn, &media_root, &mut company, image)?);
            } else if changes.clear_image {
                sql::execute(conn, companies::set_image(id, None))
                    .map_err(ServiceError::from_db("clear company image"))?;
            }
            load_annotated(conn, id)
        });
        self.settle_image(outcome, staged, previous)
    }

    /// Tidy the media root once a company write has finished: a failed write
    /// takes back the file it staged, a successful one drops the image it
    /// no longer points at.
    fn settle_image(
        &self,
        outcome: StoreResult<AnnotatedCompany>,
        staged: Option<media::Staged>,
        previous: Option<String>,
    ) -> StoreResult<AnnotatedCompany> {
        match outcome {
            Ok(saved) => {
                if let Some(old) = previous
                    && saved.company.image.as_deref() != Some(old.as_str())
                {
                    media::remove(&self.media_root, &old);
                    tracing::info!("Removed image {old} of company {}", saved.company.pk);
                }
                Ok(saved)
            }
            Err(e) => {
                if let Some(file) = staged {
                    file.discard(&self.media_root);
                }
                Err(e)
            }
        }
    }

    pub fn delete_company(&self, id: i64) -> StoreResult<()> {
        let image = self.write("delete company", |conn| {
            let company = catalog::load_company(conn, id)?.ok_or_else(not_found)?;
            sql::execute(conn, companies::delete(id))
                .map_err(ServiceError::from_db("delete company"))?;
            Ok(company.image)
        })?;
        if let Some(path) = image {
            media::remove(&self.media_root, &path);
        }
        tracing::info!("Deleted company {id}");
        Ok(())
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("company not found".into())
}

fn load_annotated(conn: &Connection, id: i64) -> StoreResult<AnnotatedCompany> {
    sql::query_opt(conn, companies::get_annotated(id), annotated_company_from_row)
        .map_err(ServiceError::from_db("load company"))?
        .ok_or_else(not_found)
}

fn check_name(conn: &Connection, company: &Company) -> StoreResult<()> {
    let exclude = (company.pk != 0).then_some(company.pk);
    let taken = sql::count(conn, companies::name_taken(&company.name, exclude))
        .map_err(ServiceError::from_db("check company name"))?;
    if taken > 0 {
        let mut errors = FieldErrors::new();
        errors.add("name", "Company with this name already exists.");
        return Err(errors.into());
    }
    Ok(())
}

/// Point the company at `company_images/company_<pk>_image.<ext>` and write
/// the fetched bytes there unchanged. The file is written last, so any error
/// before it leaves nothing on disk.
pub(crate) fn save_company_image(
    conn: &Connection,
    media_root: &Path,
    company: &mut Company,
    image: &RemoteImage,
) -> StoreResult<media::Staged> {
    let filename = company_image_filename(company.pk, image.format_or_default());
    let rel = format!("{COMPANY_IMAGE_DIR}/{filename}");
    sql::execute(conn, companies::set_image(company.pk, Some(&rel)))
        .map_err(ServiceError::from_db("set company image"))?;
    let staged = media::Staged::write(media_root, &rel, &image.bytes)?;
    company.image = Some(rel.clone());
    tracing::info!("Saved image for company {}: {rel}", company.pk);
    Ok(staged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use stockroom_api::input::{ManufacturerPartChanges, SupplierPartInput};
    use stockroom_core::CurrencyTable;

    fn changes(name: &str) -> CompanyChanges {
        CompanyChanges::parse(
            &serde_json::json!({"name": name, "currency": "USD"}),
            false,
            &CurrencyTable::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_create_and_get_company() {
        let (_dir, store) = test_support::open();
        let created = store.create_company(&changes("Acme"), None).unwrap();
        assert!(created.company.pk > 0);
        assert!(created.company.is_supplier);
        assert_eq!(created.parts_supplied, 0);

        let loaded = store.get_company(created.company.pk).unwrap();
        assert_eq!(loaded, created);
        assert!(matches!(
            store.get_company(999),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_dir, store) = test_support::open();
        store.create_company(&changes("Acme"), None).unwrap();
        let err = store.create_company(&changes("Acme"), None).unwrap_err();
        let ServiceError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.contains("name"));

        let other = store.create_company(&changes("Other"), None).unwrap();
        store
            .update_company(other.company.pk, &changes("Other"), None)
            .unwrap();
    }

    #[test]
    fn test_remote_image_saved_with_fetched_bytes() {
        let (_dir, store) = test_support::open();
        let acme = store.create_company(&changes("Acme"), None).unwrap();
        let pk = acme.company.pk;

        let bytes = b"\x89PNG\r\n\x1a\n fake png body".to_vec();
        let image = RemoteImage::new(bytes.clone());
        let updated = store
            .update_company(pk, &CompanyChanges::default(), Some(&image))
            .unwrap();

        let rel = format!("company_images/company_{pk}_image.png");
        assert_eq!(updated.company.image.as_deref(), Some(rel.as_str()));
        let on_disk = std::fs::read(store.media_root().join(&rel)).unwrap();
        assert_eq!(on_disk, bytes);
    }

    #[test]
    fn test_image_on_create_uses_new_pk_and_sniffed_format() {
        let (_dir, store) = test_support::open();
        let image = RemoteImage::new(b"GIF89a....".to_vec());
        let created = store.create_company(&changes("Acme"), Some(&image)).unwrap();
        let expected = format!("company_images/company_{}_image.gif", created.company.pk);
        assert_eq!(created.company.image.as_deref(), Some(expected.as_str()));
    }

    #[test]
    fn test_part_count_annotation() {
        let (_dir, store) = test_support::open();
        let part = test_support::part(&store, "Widget");
        let digi = test_support::company(&store, "Digi", true, true);

        for sku in ["A", "B"] {
            let body = serde_json::json!({"part": part.pk, "supplier": digi.pk, "SKU": sku});
            store
                .create_supplier_part(&SupplierPartInput::from_create(&body).unwrap())
                .unwrap();
        }
        let mp = ManufacturerPartChanges::parse(
            &serde_json::json!({"part": part.pk, "manufacturer": digi.pk, "MPN": "X1"}),
            false,
        )
        .unwrap();
        store.create_manufacturer_part(&mp).unwrap();

        let loaded = store.get_company(digi.pk).unwrap();
        assert_eq!(loaded.parts_supplied, 2);
        assert_eq!(loaded.parts_manufactured, 1);

        let listed = store
            .list_companies(&CompanyListQuery {
                is_manufacturer: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].parts_supplied, 2);
    }

    #[test]
    fn test_new_image_format_replaces_old_file() {
        let (_dir, store) = test_support::open();
        let png = RemoteImage::new(b"\x89PNG\r\n\x1a\n".to_vec());
        let created = store.create_company(&changes("Acme"), Some(&png)).unwrap();
        let pk = created.company.pk;
        let old = created.company.image.clone().unwrap();
        assert!(old.ends_with(".png"));

        let gif = RemoteImage::new(b"GIF89a....".to_vec());
        let updated = store
            .update_company(pk, &CompanyChanges::default(), Some(&gif))
            .unwrap();
        let new = updated.company.image.clone().unwrap();
        assert_eq!(new, format!("company_images/company_{pk}_image.gif"));
        assert!(!store.media_root().join(&old).exists());
        assert!(store.media_root().join(&new).exists());

        store.delete_company(pk).unwrap();
        assert!(!store.media_root().join(&new).exists());
    }

    #[test]
    fn test_same_format_keeps_file() {
        let (_dir, store) = test_support::open();
        let png = RemoteImage::new(b"\x89PNG\r\n\x1a\n first".to_vec());
        let created = store.create_company(&changes("Acme"), Some(&png)).unwrap();
        let rel = created.company.image.clone().unwrap();

        let again = RemoteImage::new(b"\x89PNG\r\n\x1a\n second".to_vec());
        store
            .update_company(created.company.pk, &CompanyChanges::default(), Some(&again))
            .unwrap();
        assert_eq!(
            std::fs::read(store.media_root().join(&rel)).unwrap(),
            b"\x89PNG\r\n\x1a\n second"
        );
    }

    #[test]
    fn test_image_null_clears_and_removes_file() {
        let (_dir, store) = test_support::open();
        let png = RemoteImage::new(b"\x89PNG\r\n\x1a\n".to_vec());
        let created = store.create_company(&changes("Acme"), Some(&png)).unwrap();
        let rel = created.company.image.clone().unwrap();

        let clear = CompanyChanges {
            clear_image: true,
            ..Default::default()
        };
        let updated = store.update_company(created.company.pk, &clear, None).unwrap();
        assert_eq!(updated.company.image, None);
        assert!(!store.media_root().join(&rel).exists());
    }

    #[test]
    fn test_rejected_create_writes_no_image() {
        let (_dir, store) = test_support::open();
        store.create_company(&changes("Acme"), None).unwrap();
        let png = RemoteImage::new(b"\x89PNG\r\n\x1a\n".to_vec());
        assert!(store.create_company(&changes("Acme"), Some(&png)).is_err());
        let dir = store.media_root().join(COMPANY_IMAGE_DIR);
        let files = std::fs::read_dir(&dir).map(|d| d.count()).unwrap_or(0);
        assert_eq!(files, 0);
    }

    #[test]
    fn test_delete_company_removes_image() {
        let (_dir, store) = test_support::open();
        let image = RemoteImage::new(b"\x89PNG\r\n\x1a\n".to_vec());
        let created = store.create_company(&changes("Acme"), Some(&image)).unwrap();
        let rel = created.company.image.clone().unwrap();
        assert!(store.media_root().join(&rel).exists());

        store.delete_company(created.company.pk).unwrap();
        assert!(!store.media_root().join(&rel).exists());
        assert!(store.get_company(created.company.pk).is_err());
    }
}
