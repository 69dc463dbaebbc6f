//! Manufacturer part query builders.

use sea_query::{Alias, Asterisk, Expr, Func, Order, Query, SqliteQueryBuilder};

use stockroom_core::ManufacturerPart;

use super::tables::ManufacturerParts;
use super::Built;
use crate::query::ManufacturerPartQuery;

/// Columns in the order `manufacturer_part_from_row()` reads them.
pub const COLUMNS: [ManufacturerParts; 6] = [
    ManufacturerParts::Id,
    ManufacturerParts::PartId,
    ManufacturerParts::ManufacturerId,
    ManufacturerParts::Mpn,
    ManufacturerParts::Description,
    ManufacturerParts::Link,
];

fn select() -> sea_query::SelectStatement {
    let mut q = Query::select().to_owned();
    for col in COLUMNS {
        q.column((ManufacturerParts::Table, col));
    }
    q.from(ManufacturerParts::Table).to_owned()
}

/// SELECT a manufacturer part by id.
pub fn get_by_id(id: i64) -> Built {
    select()
        .and_where(Expr::col((ManufacturerParts::Table, ManufacturerParts::Id)).eq(id))
        .build(SqliteQueryBuilder)
}

/// SELECT the manufacturer part for `(part, manufacturer, MPN)`.
pub fn find(part: i64, manufacturer: i64, mpn: &str) -> Built {
    select()
        .and_where(Expr::col((ManufacturerParts::Table, ManufacturerParts::PartId)).eq(part))
        .and_where(
            Expr::col((ManufacturerParts::Table, ManufacturerParts::ManufacturerId))
                .eq(manufacturer),
        )
        .and_where(Expr::col((ManufacturerParts::Table, ManufacturerParts::Mpn)).eq(mpn))
        .build(SqliteQueryBuilder)
}

/// SELECT manufacturer parts matching the filters.
pub fn list(filter: &ManufacturerPartQuery) -> Built {
    let mut q = select();
    if let Some(part) = filter.part {
        q.and_where(Expr::col((ManufacturerParts::Table, ManufacturerParts::PartId)).eq(part));
    }
    if let Some(manufacturer) = filter.manufacturer {
        q.and_where(
            Expr::col((ManufacturerParts::Table, ManufacturerParts::ManufacturerId))
                .eq(manufacturer),
        );
    }
    q.order_by((ManufacturerParts::Table, ManufacturerParts::Id), Order::Asc)
        .build(SqliteQueryBuilder)
}

/// Count other rows sharing `(part, manufacturer, MPN)`.
pub fn duplicate_count(mp: &ManufacturerPart) -> Built {
    let mut q = Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(ManufacturerParts::Table)
        .and_where(Expr::col(ManufacturerParts::PartId).eq(mp.part))
        .and_where(Expr::col(ManufacturerParts::ManufacturerId).eq(mp.manufacturer))
        .and_where(Expr::col(ManufacturerParts::Id).ne(mp.pk))
        .to_owned();
    match mp.mpn.as_deref() {
        Some(mpn) => q.and_where(Expr::col(ManufacturerParts::Mpn).eq(mpn)),
        None => q.and_where(Expr::col(ManufacturerParts::Mpn).is_null()),
    };
    q.build(SqliteQueryBuilder)
}

/// INSERT a manufacturer part; `pk` is ignored.
pub fn insert(mp: &ManufacturerPart) -> Built {
    Query::insert()
        .into_table(ManufacturerParts::Table)
        .columns(COLUMNS[1..].iter().copied())
        .values_panic([
            mp.part.into(),
            mp.manufacturer.into(),
            mp.mpn.clone().into(),
            mp.description.as_str().into(),
            mp.link.as_str().into(),
        ])
        .build(SqliteQueryBuilder)
}

/// UPDATE every writable column of a manufacturer part.
pub fn update(mp: &ManufacturerPart) -> Built {
    Query::update()
        .table(ManufacturerParts::Table)
        .values([
            (ManufacturerParts::PartId, mp.part.into()),
            (ManufacturerParts::ManufacturerId, mp.manufacturer.into()),
            (ManufacturerParts::Mpn, mp.mpn.clone().into()),
            (ManufacturerParts::Description, mp.description.as_str().into()),
            (ManufacturerParts::Link, mp.link.as_str().into()),
        ])
        .and_where(Expr::col(ManufacturerParts::Id).eq(mp.pk))
        .build(SqliteQueryBuilder)
}

/// DELETE a manufacturer part by id.
pub fn delete(id: i64) -> Built {
    Query::delete()
        .from_table(ManufacturerParts::Table)
        .and_where(Expr::col(ManufacturerParts::Id).eq(id))
        .build(SqliteQueryBuilder)
}
