//! Supplier price breaks.

use chrono::Utc;
use rusqlite::Connection;

use stockroom_api::db::price_breaks;
use stockroom_api::input::PriceBreakChanges;
use stockroom_api::query::PriceBreakQuery;
use stockroom_api::views::PriceBreakBundle;
use stockroom_api::{FieldErrors, ServiceError};
use stockroom_core::{CurrencyTable, SupplierPriceBreak, ValidationError};

use crate::catalog::related;
use crate::rows::price_break_from_row;
use crate::sql;
use crate::supplier_parts::{load_supplier_part, supplier_part_bundle};
use crate::{Store, StoreResult};

impl Store {
    pub fn list_price_breaks(&self, filter: &PriceBreakQuery) -> StoreResult<Vec<PriceBreakBundle>> {
        let conn = self.conn();
        let rows = sql::query_all(&conn, price_breaks::list(filter), price_break_from_row)
            .map_err(ServiceError::from_db("list price breaks"))?;
        rows.into_iter()
            .map(|pb| price_break_bundle(&conn, pb))
            .collect()
    }

    pub fn get_price_break(&self, id: i64) -> StoreResult<PriceBreakBundle> {
        let conn = self.conn();
        let pb = load_price_break(&conn, id)?.ok_or_else(not_found)?;
        price_break_bundle(&conn, pb)
    }

    /// `currencies` supplies the default `price_currency`.
    pub fn create_price_break(
        &self,
        changes: &PriceBreakChanges,
        currencies: &CurrencyTable,
    ) -> StoreResult<PriceBreakBundle> {
        let mut pb = changes.create(currencies);
        pb.updated = Some(Utc::now());
        self.write("create price break", |conn| {
            validate(conn, &pb)?;
            pb.pk = sql::insert(conn, price_breaks::insert(&pb))
                .map_err(ServiceError::from_db("insert price break"))?;
            price_break_bundle(conn, pb)
        })
    }

    pub fn update_price_break(
        &self,
        id: i64,
        changes: &PriceBreakChanges,
    ) -> StoreResult<PriceBreakBundle> {
        self.write("update price break", |conn| {
            let mut pb = load_price_break(conn, id)?.ok_or_else(not_found)?;
            changes.apply_to(&mut pb);
            pb.updated = Some(Utc::now());
            validate(conn, &pb)?;
            sql::execute(conn, price_breaks::update(&pb))
                .map_err(ServiceError::from_db("update price break"))?;
            price_break_bundle(conn, pb)
        })
    }

    pub fn delete_price_break(&self, id: i64) -> StoreResult<()> {
        self.write("delete price break", |conn| {
            let deleted = sql::execute(conn, price_breaks::delete(id))
                .map_err(ServiceError::from_db("delete price break"))?;
            if deleted == 0 {
                return Err(not_found());
            }
            Ok(())
        })
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("price break not found".into())
}

fn load_price_break(conn: &Connection, id: i64) -> StoreResult<Option<SupplierPriceBreak>> {
    sql::query_opt(conn, price_breaks::get_by_id(id), price_break_from_row)
        .map_err(ServiceError::from_db("load price break"))
}

/// The supplier part is loaded without the stock annotation.
fn price_break_bundle(
    conn: &Connection,
    price_break: SupplierPriceBreak,
) -> StoreResult<PriceBreakBundle> {
    let sp = related(
        load_supplier_part(conn, price_break.part)?,
        "supplier part",
        price_break.part,
    )?;
    Ok(PriceBreakBundle {
        price_break,
        supplier_part: supplier_part_bundle(conn, sp, None)?,
    })
}

fn validate(conn: &Connection, pb: &SupplierPriceBreak) -> StoreResult<()> {
    let mut errors = FieldErrors::new();
    if load_supplier_part(conn, pb.part)?.is_none() {
        errors.push(ValidationError::DoesNotExist {
            field: "part".into(),
            pk: pb.part,
        });
    } else {
        let duplicates = sql::count(conn, price_breaks::duplicate_count(pb))
            .map_err(ServiceError::from_db("check price break"))?;
        if duplicates > 0 {
            errors.add(
                "non_field_errors",
                "The fields part, quantity must make a unique set.",
            );
        }
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use rust_decimal::Decimal;
    use serde_json::json;
    use stockroom_api::input::SupplierPartInput;

    fn supplier_part(store: &Store) -> i64 {
        let part = test_support::part(store, "Widget");
        let digi = test_support::company(store, "Digi", true, false);
        let body = json!({"part": part.pk, "supplier": digi.pk, "SKU": "D-42"});
        store
            .create_supplier_part(&SupplierPartInput::from_create(&body).unwrap())
            .unwrap()
            .supplier_part
            .pk
    }

    #[test]
    fn test_price_break_lifecycle() {
        let (_dir, store) = test_support::open();
        let table = CurrencyTable::default();
        let sp = supplier_part(&store);

        let body = json!({"part": sp, "quantity": 10, "price": "0.25"});
        let created = store
            .create_price_break(&PriceBreakChanges::parse(&body, false, &table).unwrap(), &table)
            .unwrap();
        assert_eq!(created.price_break.price_currency, "USD");
        assert_eq!(created.price_break.price, Some(Decimal::new(25, 2)));
        assert_eq!(created.supplier_part.in_stock, None);
        assert_eq!(created.supplier_part.supplier.name, "Digi");

        // 10.0 and 10 are the same threshold
        let dup = json!({"part": sp, "quantity": "10.0", "price": null});
        let err = store
            .create_price_break(&PriceBreakChanges::parse(&dup, false, &table).unwrap(), &table)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e.contains("non_field_errors")));

        let patch = PriceBreakChanges::parse(&json!({"price_currency": "EUR"}), true, &table).unwrap();
        let updated = store.update_price_break(created.price_break.pk, &patch).unwrap();
        assert_eq!(updated.price_break.price_currency, "EUR");
        assert_eq!(updated.price_break.quantity, Decimal::from(10));
    }

    #[test]
    fn test_list_orders_by_quantity() {
        let (_dir, store) = test_support::open();
        let table = CurrencyTable::default();
        let sp = supplier_part(&store);
        for qty in ["100", "5", "25"] {
            let body = json!({"part": sp, "quantity": qty, "price": "1"});
            store
                .create_price_break(&PriceBreakChanges::parse(&body, false, &table).unwrap(), &table)
                .unwrap();
        }
        let listed = store
            .list_price_breaks(&PriceBreakQuery {
                part: Some(sp),
                ..Default::default()
            })
            .unwrap();
        let quantities: Vec<Decimal> = listed.iter().map(|b| b.price_break.quantity).collect();
        assert_eq!(
            quantities,
            vec![Decimal::from(5), Decimal::from(25), Decimal::from(100)]
        );
    }

    #[test]
    fn test_unknown_supplier_part() {
        let (_dir, store) = test_support::open();
        let table = CurrencyTable::default();
        let body = json!({"part": 77, "quantity": 1, "price": "1"});
        let err = store
            .create_price_break(&PriceBreakChanges::parse(&body, false, &table).unwrap(), &table)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e.contains("part")));
    }
}
