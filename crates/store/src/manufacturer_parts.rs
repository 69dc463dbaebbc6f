//! Manufacturer part reads and writes.

use rusqlite::Connection;

use stockroom_api::db::manufacturer_parts;
use stockroom_api::input::ManufacturerPartChanges;
use stockroom_api::query::ManufacturerPartQuery;
use stockroom_api::views::ManufacturerPartBundle;
use stockroom_api::{FieldErrors, ServiceError};
use stockroom_core::{CompanyRole, ManufacturerPart};

use crate::catalog::{self, company_with_role, purchaseable_part, related};
use crate::rows::manufacturer_part_from_row;
use crate::sql;
use crate::{Store, StoreResult};

impl Store {
    pub fn list_manufacturer_parts(
        &self,
        filter: &ManufacturerPartQuery,
    ) -> StoreResult<Vec<ManufacturerPartBundle>> {
        let conn = self.conn();
        let rows = sql::query_all(
            &conn,
            manufacturer_parts::list(filter),
            manufacturer_part_from_row,
        )
        .map_err(ServiceError::from_db("list manufacturer parts"))?;
        rows.into_iter()
            .map(|mp| manufacturer_part_bundle(&conn, mp))
            .collect()
    }

    pub fn get_manufacturer_part(&self, id: i64) -> StoreResult<ManufacturerPartBundle> {
        let conn = self.conn();
        let mp = load_manufacturer_part(&conn, id)?.ok_or_else(not_found)?;
        manufacturer_part_bundle(&conn, mp)
    }

    pub fn create_manufacturer_part(
        &self,
        changes: &ManufacturerPartChanges,
    ) -> StoreResult<ManufacturerPartBundle> {
        let mut mp = changes.create();
        self.write("create manufacturer part", |conn| {
            insert_manufacturer_part(conn, &mut mp)?;
            manufacturer_part_bundle(conn, mp)
        })
    }

    pub fn update_manufacturer_part(
        &self,
        id: i64,
        changes: &ManufacturerPartChanges,
    ) -> StoreResult<ManufacturerPartBundle> {
        self.write("update manufacturer part", |conn| {
            let mut mp = load_manufacturer_part(conn, id)?.ok_or_else(not_found)?;
            changes.apply_to(&mut mp);
            validate(conn, &mp)?;
            sql::execute(conn, manufacturer_parts::update(&mp))
                .map_err(ServiceError::from_db("update manufacturer part"))?;
            manufacturer_part_bundle(conn, mp)
        })
    }

    pub fn delete_manufacturer_part(&self, id: i64) -> StoreResult<()> {
        self.write("delete manufacturer part", |conn| {
            let deleted = sql::execute(conn, manufacturer_parts::delete(id))
                .map_err(ServiceError::from_db("delete manufacturer part"))?;
            if deleted == 0 {
                return Err(not_found());
            }
            Ok(())
        })
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("manufacturer part not found".into())
}

pub(crate) fn load_manufacturer_part(
    conn: &Connection,
    id: i64,
) -> StoreResult<Option<ManufacturerPart>> {
    sql::query_opt(conn, manufacturer_parts::get_by_id(id), manufacturer_part_from_row)
        .map_err(ServiceError::from_db("load manufacturer part"))
}

/// The manufacturer part for `(part, manufacturer, MPN)`, if one exists.
pub(crate) fn find_manufacturer_part(
    conn: &Connection,
    part: i64,
    manufacturer: i64,
    mpn: &str,
) -> StoreResult<Option<ManufacturerPart>> {
    sql::query_opt(
        conn,
        manufacturer_parts::find(part, manufacturer, mpn),
        manufacturer_part_from_row,
    )
    .map_err(ServiceError::from_db("find manufacturer part"))
}

pub(crate) fn manufacturer_part_bundle(
    conn: &Connection,
    mp: ManufacturerPart,
) -> StoreResult<ManufacturerPartBundle> {
    let part = related(catalog::load_part(conn, mp.part)?, "part", mp.part)?;
    let manufacturer = related(
        catalog::load_company(conn, mp.manufacturer)?,
        "company",
        mp.manufacturer,
    )?;
    Ok(ManufacturerPartBundle {
        manufacturer_part: mp,
        part,
        manufacturer,
    })
}

/// Validate and insert; sets `mp.pk`.
pub(crate) fn insert_manufacturer_part(
    conn: &Connection,
    mp: &mut ManufacturerPart,
) -> StoreResult<()> {
    validate(conn, mp)?;
    mp.pk = sql::insert(conn, manufacturer_parts::insert(mp))
        .map_err(ServiceError::from_db("insert manufacturer part"))?;
    tracing::info!(
        "Created manufacturer part {} (part {}, manufacturer {})",
        mp.pk,
        mp.part,
        mp.manufacturer
    );
    Ok(())
}

fn validate(conn: &Connection, mp: &ManufacturerPart) -> StoreResult<()> {
    let mut errors = FieldErrors::new();
    errors.check(purchaseable_part(conn, "part", mp.part)?);
    errors.check(company_with_role(
        conn,
        "manufacturer",
        mp.manufacturer,
        CompanyRole::Manufacturer,
    )?);
    if errors.is_empty() {
        let duplicates = sql::count(conn, manufacturer_parts::duplicate_count(mp))
            .map_err(ServiceError::from_db("check manufacturer part"))?;
        if duplicates > 0 {
            errors.add(
                "non_field_errors",
                "The fields part, manufacturer, MPN must make a unique set.",
            );
        }
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> ManufacturerPartChanges {
        ManufacturerPartChanges::parse(&body, false).unwrap()
    }

    #[test]
    fn test_create_requires_manufacturer_role() {
        let (_dir, store) = test_support::open();
        let part = test_support::part(&store, "Widget");
        let supplier_only = test_support::company(&store, "Digi", true, false);

        let err = store
            .create_manufacturer_part(&parse(
                json!({"part": part.pk, "manufacturer": supplier_only.pk, "MPN": "X"}),
            ))
            .unwrap_err();
        let ServiceError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            errors.get("manufacturer").unwrap(),
            [format!("Invalid pk \"{}\" - object does not exist.", supplier_only.pk)]
        );
    }

    #[test]
    fn test_unique_part_manufacturer_mpn() {
        let (_dir, store) = test_support::open();
        let part = test_support::part(&store, "Widget");
        let acme = test_support::company(&store, "Acme", false, true);
        let body = json!({"part": part.pk, "manufacturer": acme.pk, "MPN": "ABC123"});

        let created = store.create_manufacturer_part(&parse(body.clone())).unwrap();
        assert_eq!(created.manufacturer.pk, acme.pk);
        assert_eq!(created.part.pk, part.pk);

        let err = store.create_manufacturer_part(&parse(body)).unwrap_err();
        let ServiceError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.contains("non_field_errors"));
    }

    #[test]
    fn test_update_and_filter() {
        let (_dir, store) = test_support::open();
        let widget = test_support::part(&store, "Widget");
        let gadget = test_support::part(&store, "Gadget");
        let acme = test_support::company(&store, "Acme", false, true);

        let mp = store
            .create_manufacturer_part(&parse(
                json!({"part": widget.pk, "manufacturer": acme.pk, "MPN": "W1"}),
            ))
            .unwrap();
        store
            .create_manufacturer_part(&parse(
                json!({"part": gadget.pk, "manufacturer": acme.pk, "MPN": "G1"}),
            ))
            .unwrap();

        let patch = ManufacturerPartChanges::parse(&json!({"description": "Rev B"}), true).unwrap();
        let updated = store
            .update_manufacturer_part(mp.manufacturer_part.pk, &patch)
            .unwrap();
        assert_eq!(updated.manufacturer_part.description, "Rev B");
        assert_eq!(updated.manufacturer_part.mpn.as_deref(), Some("W1"));

        let only_widget = store
            .list_manufacturer_parts(&ManufacturerPartQuery {
                part: Some(widget.pk),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(only_widget.len(), 1);

        store.delete_manufacturer_part(mp.manufacturer_part.pk).unwrap();
        assert!(matches!(
            store.delete_manufacturer_part(mp.manufacturer_part.pk),
            Err(ServiceError::NotFound(_))
        ));
    }
}
