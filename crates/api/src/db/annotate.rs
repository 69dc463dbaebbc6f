//! Aggregate columns composed onto SELECT statements.
//!
//! Each function adds correlated sub-query expressions to a statement whose
//! FROM clause names the annotated table. Callers decide when to annotate;
//! views that expose the aggregates only accept annotated rows.

use sea_query::{Alias, Expr, Func, Query, SelectStatement, SimpleExpr};

use super::tables::{Companies, ManufacturerParts, StockItems, SupplierParts};

/// Column alias: number of manufacturer parts made by a company.
pub const PARTS_MANUFACTURED: &str = "parts_manufactured";
/// Column alias: number of supplier parts sold by a company.
pub const PARTS_SUPPLIED: &str = "parts_supplied";
/// Column alias: total in-stock quantity received through a supplier part.
pub const IN_STOCK: &str = "in_stock";

fn subquery(q: SelectStatement) -> SimpleExpr {
    SimpleExpr::SubQuery(None, Box::new(q.into_sub_query_statement()))
}

/// Add `parts_manufactured` and `parts_supplied` to a `companies` SELECT.
pub fn company_part_counts(q: &mut SelectStatement) -> &mut SelectStatement {
    let manufactured = Query::select()
        .expr(Func::count(Expr::col((
            ManufacturerParts::Table,
            ManufacturerParts::Id,
        ))))
        .from(ManufacturerParts::Table)
        .and_where(
            Expr::col((ManufacturerParts::Table, ManufacturerParts::ManufacturerId))
                .equals((Companies::Table, Companies::Id)),
        )
        .to_owned();

    let supplied = Query::select()
        .expr(Func::count(Expr::col((SupplierParts::Table, SupplierParts::Id))))
        .from(SupplierParts::Table)
        .and_where(
            Expr::col((SupplierParts::Table, SupplierParts::SupplierId))
                .equals((Companies::Table, Companies::Id)),
        )
        .to_owned();

    q.expr_as(subquery(manufactured), Alias::new(PARTS_MANUFACTURED))
        .expr_as(subquery(supplied), Alias::new(PARTS_SUPPLIED))
}

/// Stock items that count towards "in stock": positive quantity, not part of
/// a build in progress, not shipped to a customer.
pub fn in_stock_filter() -> SimpleExpr {
    Expr::col((StockItems::Table, StockItems::Quantity))
        .gt(0)
        .and(Expr::col((StockItems::Table, StockItems::IsBuilding)).eq(false))
        .and(Expr::col((StockItems::Table, StockItems::CustomerId)).is_null())
}

/// Add `in_stock` (`COALESCE(SUM(quantity), 0)`) to a `supplier_parts` SELECT.
pub fn supplier_part_in_stock(q: &mut SelectStatement) -> &mut SelectStatement {
    let total = Query::select()
        .expr(Func::sum(Expr::col((StockItems::Table, StockItems::Quantity))))
        .from(StockItems::Table)
        .and_where(
            Expr::col((StockItems::Table, StockItems::SupplierPartId))
                .equals((SupplierParts::Table, SupplierParts::Id)),
        )
        .and_where(in_stock_filter())
        .to_owned();

    q.expr_as(
        Func::coalesce([subquery(total), Expr::val(0.0).into()]),
        Alias::new(IN_STOCK),
    )
}
