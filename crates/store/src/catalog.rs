//! Parts, stock items and the reference lookups shared by every workflow.

use rusqlite::Connection;

use stockroom_api::db::{companies, parts};
use stockroom_api::db::parts::StockItemParams;
use stockroom_api::ServiceError;
use stockroom_core::{Company, CompanyRole, Part, ValidationError};

use crate::rows::{company_from_row, part_from_row};
use crate::sql;
use crate::{Store, StoreResult};

impl Store {
    /// Add a part to the catalogue. Parts are owned elsewhere; this exists
    /// for seeding.
    pub fn insert_part(&self, part: &Part) -> StoreResult<i64> {
        let conn = self.conn();
        sql::insert(&conn, parts::insert(part)).map_err(ServiceError::from_db("insert part"))
    }

    /// Record a stock item counted by the supplier part `in_stock` total.
    pub fn insert_stock_item(&self, item: &StockItemParams) -> StoreResult<i64> {
        let conn = self.conn();
        sql::insert(&conn, parts::insert_stock_item(item))
            .map_err(ServiceError::from_db("insert stock item"))
    }

    pub fn get_part(&self, id: i64) -> StoreResult<Part> {
        let conn = self.conn();
        load_part(&conn, id)?.ok_or_else(|| ServiceError::NotFound("part not found".into()))
    }
}

pub(crate) fn load_part(conn: &Connection, id: i64) -> StoreResult<Option<Part>> {
    sql::query_opt(conn, parts::get_by_id(id), part_from_row)
        .map_err(ServiceError::from_db("load part"))
}

pub(crate) fn load_company(conn: &Connection, id: i64) -> StoreResult<Option<Company>> {
    sql::query_opt(conn, companies::get_by_id(id), company_from_row)
        .map_err(ServiceError::from_db("load company"))
}

/// A related record that the schema guarantees to exist.
pub(crate) fn related<T>(value: Option<T>, what: &str, id: i64) -> StoreResult<T> {
    value.ok_or_else(|| ServiceError::Internal(format!("{what} {id} is missing")))
}

/// The part `id` as the target of `field`. Missing and non-purchaseable
/// parts are both reported as nonexistent.
pub(crate) fn purchaseable_part(
    conn: &Connection,
    field: &str,
    id: i64,
) -> StoreResult<Result<Part, ValidationError>> {
    Ok(match load_part(conn, id)? {
        None => Err(ValidationError::DoesNotExist {
            field: field.to_string(),
            pk: id,
        }),
        Some(part) => part.require_purchaseable(field).map(|()| part),
    })
}

/// The company `id` as the target of `field`; it must carry `role`.
pub(crate) fn company_with_role(
    conn: &Connection,
    field: &str,
    id: i64,
    role: CompanyRole,
) -> StoreResult<Result<Company, ValidationError>> {
    Ok(match load_company(conn, id)? {
        None => Err(ValidationError::DoesNotExist {
            field: field.to_string(),
            pk: id,
        }),
        Some(company) => company.require_role(field, role).map(|()| company),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn test_reference_checks() {
        let (_dir, store) = test_support::open();
        let part = test_support::part(&store, "Widget");
        let supplier = test_support::company(&store, "Digi", true, false);

        let conn = store.conn();
        assert!(purchaseable_part(&conn, "part", part.pk).unwrap().is_ok());
        let err = purchaseable_part(&conn, "part", 999).unwrap().unwrap_err();
        assert_eq!(err.to_string(), "Invalid pk \"999\" - object does not exist.");

        assert!(
            company_with_role(&conn, "supplier", supplier.pk, CompanyRole::Supplier)
                .unwrap()
                .is_ok()
        );
        let err = company_with_role(&conn, "manufacturer", supplier.pk, CompanyRole::Manufacturer)
            .unwrap()
            .unwrap_err();
        assert_eq!(err.field(), "manufacturer");
    }

    #[test]
    fn test_non_purchaseable_part_rejected() {
        let (_dir, store) = test_support::open();
        let mut p = stockroom_core::testing::part(0, "Assembly");
        p.purchaseable = false;
        let id = store.insert_part(&p).unwrap();
        let conn = store.conn();
        assert!(purchaseable_part(&conn, "part", id).unwrap().is_err());
    }
}
