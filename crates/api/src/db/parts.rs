//! Part catalogue and stock item builders.
//!
//! The service never edits parts or stock; inserts exist for seeding.

use sea_query::{Expr, Query, SqliteQueryBuilder};

use stockroom_core::Part;

use super::tables::{Parts, StockItems};
use super::Built;

/// Columns in the order `part_from_row()` reads them.
pub const COLUMNS: [Parts; 13] = [
    Parts::Id,
    Parts::Name,
    Parts::Ipn,
    Parts::Revision,
    Parts::Description,
    Parts::Image,
    Parts::Units,
    Parts::Active,
    Parts::Assembly,
    Parts::Purchaseable,
    Parts::Salable,
    Parts::Trackable,
    Parts::IsVirtual,
];

/// SELECT a part by id.
pub fn get_by_id(id: i64) -> Built {
    let mut q = Query::select().to_owned();
    for col in COLUMNS {
        q.column((Parts::Table, col));
    }
    q.from(Parts::Table)
        .and_where(Expr::col((Parts::Table, Parts::Id)).eq(id))
        .build(SqliteQueryBuilder)
}

/// INSERT a part; `pk` is ignored.
pub fn insert(p: &Part) -> Built {
    Query::insert()
        .into_table(Parts::Table)
        .columns(COLUMNS[1..].iter().copied())
        .values_panic([
            p.name.as_str().into(),
            p.ipn.as_str().into(),
            p.revision.as_str().into(),
            p.description.as_str().into(),
            p.image.clone().into(),
            p.units.as_str().into(),
            p.active.into(),
            p.assembly.into(),
            p.purchaseable.into(),
            p.salable.into(),
            p.trackable.into(),
            p.is_virtual.into(),
        ])
        .build(SqliteQueryBuilder)
}

/// Parameters for inserting a stock item.
pub struct StockItemParams {
    pub part: i64,
    pub supplier_part: Option<i64>,
    pub quantity: f64,
    pub is_building: bool,
    pub customer: Option<i64>,
}

/// INSERT a stock item.
pub fn insert_stock_item(p: &StockItemParams) -> Built {
    Query::insert()
        .into_table(StockItems::Table)
        .columns([
            StockItems::PartId,
            StockItems::SupplierPartId,
            StockItems::Quantity,
            StockItems::IsBuilding,
            StockItems::CustomerId,
        ])
        .values_panic([
            p.part.into(),
            p.supplier_part.into(),
            p.quantity.into(),
            p.is_building.into(),
            p.customer.into(),
        ])
        .build(SqliteQueryBuilder)
}
