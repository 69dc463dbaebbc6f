//! Supplier price break query builders.

use sea_query::{Alias, Asterisk, Expr, Func, Order, Query, SqliteQueryBuilder};

use stockroom_core::SupplierPriceBreak;

use super::tables::SupplierPriceBreaks as Breaks;
use super::{decimal_value, opt_decimal_value, timestamp_value, Built};
use crate::query::PriceBreakQuery;

/// Columns in the order `price_break_from_row()` reads them.
pub const COLUMNS: [Breaks; 6] = [
    Breaks::Id,
    Breaks::SupplierPartId,
    Breaks::Quantity,
    Breaks::Price,
    Breaks::PriceCurrency,
    Breaks::Updated,
];

fn select() -> sea_query::SelectStatement {
    let mut q = Query::select().to_owned();
    for col in COLUMNS {
        q.column((Breaks::Table, col));
    }
    q.from(Breaks::Table).to_owned()
}

pub fn get_by_id(id: i64) -> Built {
    select()
        .and_where(Expr::col((Breaks::Table, Breaks::Id)).eq(id))
        .build(SqliteQueryBuilder)
}

/// Price breaks ordered by part, then by quantity threshold.
pub fn list(filter: &PriceBreakQuery) -> Built {
    let mut q = select();
    if let Some(part) = filter.part {
        q.and_where(Expr::col((Breaks::Table, Breaks::SupplierPartId)).eq(part));
    }
    q.order_by((Breaks::Table, Breaks::SupplierPartId), Order::Asc)
        .order_by_expr(
            Expr::cust(r#"CAST("supplier_price_breaks"."quantity" AS REAL)"#),
            Order::Asc,
        )
        .build(SqliteQueryBuilder)
}

/// Count other breaks of the same supplier part at the same quantity.
pub fn duplicate_count(pb: &SupplierPriceBreak) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(Breaks::Table)
        .and_where(Expr::col(Breaks::SupplierPartId).eq(pb.part))
        .and_where(Expr::col(Breaks::Quantity).eq(decimal_value(pb.quantity)))
        .and_where(Expr::col(Breaks::Id).ne(pb.pk))
        .build(SqliteQueryBuilder)
}

pub fn insert(pb: &SupplierPriceBreak) -> Built {
    Query::insert()
        .into_table(Breaks::Table)
        .columns(COLUMNS[1..].iter().copied())
        .values_panic([
            pb.part.into(),
            decimal_value(pb.quantity).into(),
            opt_decimal_value(pb.price).into(),
            pb.price_currency.as_str().into(),
            timestamp_value(pb.updated).into(),
        ])
        .build(SqliteQueryBuilder)
}

pub fn update(pb: &SupplierPriceBreak) -> Built {
    Query::update()
        .table(Breaks::Table)
        .values([
            (Breaks::SupplierPartId, pb.part.into()),
            (Breaks::Quantity, decimal_value(pb.quantity).into()),
            (Breaks::Price, opt_decimal_value(pb.price).into()),
            (Breaks::PriceCurrency, pb.price_currency.as_str().into()),
            (Breaks::Updated, timestamp_value(pb.updated).into()),
        ])
        .and_where(Expr::col(Breaks::Id).eq(pb.pk))
        .build(SqliteQueryBuilder)
}

pub fn delete(id: i64) -> Built {
    Query::delete()
        .from_table(Breaks::Table)
        .and_where(Expr::col(Breaks::Id).eq(id))
        .build(SqliteQueryBuilder)
}
