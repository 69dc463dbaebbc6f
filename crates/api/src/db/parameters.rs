//! Manufacturer part parameter query builders.

use sea_query::{Alias, Asterisk, Expr, Func, Order, Query, SqliteQueryBuilder};

use stockroom_core::ManufacturerPartParameter;

use super::tables::ManufacturerPartParameters as Params;
use super::Built;
use crate::query::ParameterQuery;

/// Columns in the order `parameter_from_row()` reads them.
pub const COLUMNS: [Params; 5] = [
    Params::Id,
    Params::ManufacturerPartId,
    Params::Name,
    Params::Value,
    Params::Units,
];

fn select() -> sea_query::SelectStatement {
    let mut q = Query::select().to_owned();
    for col in COLUMNS {
        q.column((Params::Table, col));
    }
    q.from(Params::Table).to_owned()
}

pub fn get_by_id(id: i64) -> Built {
    select()
        .and_where(Expr::col((Params::Table, Params::Id)).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn list(filter: &ParameterQuery) -> Built {
    let mut q = select();
    if let Some(mp) = filter.manufacturer_part {
        q.and_where(Expr::col((Params::Table, Params::ManufacturerPartId)).eq(mp));
    }
    q.order_by((Params::Table, Params::Name), Order::Asc)
        .build(SqliteQueryBuilder)
}

/// Count other parameters of the same manufacturer part with the same name.
pub fn duplicate_count(p: &ManufacturerPartParameter) -> Built {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(Params::Table)
        .and_where(Expr::col(Params::ManufacturerPartId).eq(p.manufacturer_part))
        .and_where(Expr::col(Params::Name).eq(p.name.as_str()))
        .and_where(Expr::col(Params::Id).ne(p.pk))
        .build(SqliteQueryBuilder)
}

pub fn insert(p: &ManufacturerPartParameter) -> Built {
    Query::insert()
        .into_table(Params::Table)
        .columns(COLUMNS[1..].iter().copied())
        .values_panic([
            p.manufacturer_part.into(),
            p.name.as_str().into(),
            p.value.as_str().into(),
            p.units.as_str().into(),
        ])
        .build(SqliteQueryBuilder)
}

pub fn update(p: &ManufacturerPartParameter) -> Built {
    Query::update()
        .table(Params::Table)
        .values([
            (Params::ManufacturerPartId, p.manufacturer_part.into()),
            (Params::Name, p.name.as_str().into()),
            (Params::Value, p.value.as_str().into()),
            (Params::Units, p.units.as_str().into()),
        ])
        .and_where(Expr::col(Params::Id).eq(p.pk))
        .build(SqliteQueryBuilder)
}

pub fn delete(id: i64) -> Built {
    Query::delete()
        .from_table(Params::Table)
        .and_where(Expr::col(Params::Id).eq(id))
        .build(SqliteQueryBuilder)
}
