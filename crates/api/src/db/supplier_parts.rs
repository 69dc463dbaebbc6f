//! Supplier part query builders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_query::{Alias, Asterisk, Expr, Func, Order, Query, SqliteQueryBuilder};

use stockroom_core::SupplierPart;

use super::annotate;
use super::tables::{ManufacturerParts, SupplierParts};
use super::{decimal_value, timestamp_value, Built};
use crate::query::SupplierPartQuery;

/// Base columns in the order `supplier_part_from_row()` reads them.
pub const COLUMNS: [SupplierParts; 14] = [
    SupplierParts::Id,
    SupplierParts::PartId,
    SupplierParts::SupplierId,
    SupplierParts::ManufacturerPartId,
    SupplierParts::Sku,
    SupplierParts::Description,
    SupplierParts::Link,
    SupplierParts::Note,
    SupplierParts::Packaging,
    SupplierParts::PackSize,
    SupplierParts::Available,
    SupplierParts::AvailabilityUpdated,
    SupplierParts::BarcodeHash,
    SupplierParts::Updated,
];

fn select(in_stock: bool) -> sea_query::SelectStatement {
    let mut q = Query::select().to_owned();
    for col in COLUMNS {
        q.column((SupplierParts::Table, col));
    }
    q.from(SupplierParts::Table);
    if in_stock {
        annotate::supplier_part_in_stock(&mut q);
    }
    q
}

/// SELECT a supplier part by id; `in_stock` appends the stock annotation.
pub fn get_by_id(id: i64, in_stock: bool) -> Built {
    select(in_stock)
        .and_where(Expr::col((SupplierParts::Table, SupplierParts::Id)).eq(id))
        .build(SqliteQueryBuilder)
}

/// SELECT supplier parts matching the filters, with the stock annotation.
pub fn list(filter: &SupplierPartQuery) -> Built {
    let mut q = select(true);
    if let Some(part) = filter.part {
        q.and_where(Expr::col((SupplierParts::Table, SupplierParts::PartId)).eq(part));
    }
    if let Some(supplier) = filter.supplier {
        q.and_where(Expr::col((SupplierParts::Table, SupplierParts::SupplierId)).eq(supplier));
    }
    if let Some(manufacturer) = filter.manufacturer {
        q.and_where(
            Expr::col((SupplierParts::Table, SupplierParts::ManufacturerPartId)).in_subquery(
                Query::select()
                    .column(ManufacturerParts::Id)
                    .from(ManufacturerParts::Table)
                    .and_where(Expr::col(ManufacturerParts::ManufacturerId).eq(manufacturer))
                    .to_owned(),
            ),
        );
    }
    q.order_by((SupplierParts::Table, SupplierParts::Id), Order::Asc)
        .build(SqliteQueryBuilder)
}

/// Count other supplier parts with the same `(part, supplier, SKU)`.
pub fn duplicate_count(sp: &SupplierPart) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(SupplierParts::Table)
        .and_where(Expr::col(SupplierParts::PartId).eq(sp.part))
        .and_where(Expr::col(SupplierParts::SupplierId).eq(sp.supplier))
        .and_where(Expr::col(SupplierParts::Sku).eq(sp.sku.as_str()))
        .and_where(Expr::col(SupplierParts::Id).ne(sp.pk))
        .build(SqliteQueryBuilder)
}

/// INSERT a supplier part. Availability starts at zero with no timestamp
/// regardless of the record; use [`set_available`] afterwards.
pub fn insert(sp: &SupplierPart) -> Built {
    Query::insert()
        .into_table(SupplierParts::Table)
        .columns([
            SupplierParts::PartId,
            SupplierParts::SupplierId,
            SupplierParts::ManufacturerPartId,
            SupplierParts::Sku,
            SupplierParts::Description,
            SupplierParts::Link,
            SupplierParts::Note,
            SupplierParts::Packaging,
            SupplierParts::PackSize,
            SupplierParts::BarcodeHash,
            SupplierParts::Updated,
        ])
        .values_panic([
            sp.part.into(),
            sp.supplier.into(),
            sp.manufacturer_part.into(),
            sp.sku.as_str().into(),
            sp.description.as_str().into(),
            sp.link.as_str().into(),
            sp.note.as_str().into(),
            sp.packaging.as_str().into(),
            decimal_value(sp.pack_size).into(),
            sp.barcode_hash.as_str().into(),
            timestamp_value(sp.updated).into(),
        ])
        .build(SqliteQueryBuilder)
}

/// UPDATE the editable columns. Availability and barcode are not touched.
pub fn update(sp: &SupplierPart) -> Built {
    Query::update()
        .table(SupplierParts::Table)
        .values([
            (SupplierParts::PartId, sp.part.into()),
            (SupplierParts::SupplierId, sp.supplier.into()),
            (SupplierParts::ManufacturerPartId, sp.manufacturer_part.into()),
            (SupplierParts::Sku, sp.sku.as_str().into()),
            (SupplierParts::Description, sp.description.as_str().into()),
            (SupplierParts::Link, sp.link.as_str().into()),
            (SupplierParts::Note, sp.note.as_str().into()),
            (SupplierParts::Packaging, sp.packaging.as_str().into()),
            (SupplierParts::PackSize, decimal_value(sp.pack_size).into()),
            (SupplierParts::Updated, timestamp_value(sp.updated).into()),
        ])
        .and_where(Expr::col(SupplierParts::Id).eq(sp.pk))
        .build(SqliteQueryBuilder)
}

/// Record a new available quantity and when it was reported.
pub fn set_available(id: i64, quantity: Decimal, at: DateTime<Utc>) -> Built {
    Query::update()
        .table(SupplierParts::Table)
        .values([
            (SupplierParts::Available, decimal_value(quantity).into()),
            (SupplierParts::AvailabilityUpdated, timestamp_value(Some(at)).into()),
        ])
        .and_where(Expr::col(SupplierParts::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Link (or unlink) a manufacturer part.
pub fn set_manufacturer_part(id: i64, manufacturer_part: Option<i64>) -> Built {
    Query::update()
        .table(SupplierParts::Table)
        .value(SupplierParts::ManufacturerPartId, manufacturer_part)
        .and_where(Expr::col(SupplierParts::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn delete(id: i64) -> Built {
    Query::delete()
        .from_table(SupplierParts::Table)
        .and_where(Expr::col(SupplierParts::Id).eq(id))
        .build(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_never_writes_available() {
        let sp = stockroom_core::testing::supplier_part(0, 1, 2, "SKU");
        let (sql, _) = insert(&sp);
        assert!(!sql.contains(r#""available""#));
        assert!(!sql.contains(r#""availability_updated""#));

        let (sql, _) = update(&sp);
        assert!(!sql.contains(r#""available""#));
    }

    #[test]
    fn test_get_by_id_annotation_is_optional() {
        let (plain, _) = get_by_id(1, false);
        assert!(!plain.contains("in_stock"));
        let (annotated, _) = get_by_id(1, true);
        assert!(annotated.contains(r#"AS "in_stock""#));
    }

    #[test]
    fn test_list_manufacturer_filter_uses_subquery() {
        let (sql, values) = list(&SupplierPartQuery {
            manufacturer: Some(9),
            ..Default::default()
        });
        assert!(sql.contains(r#""supplier_parts"."manufacturer_part_id" IN (SELECT"#));
        assert!(values.0.contains(&sea_query::Value::from(9i64)));
    }
}
