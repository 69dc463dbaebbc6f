//! Company query builders.

use sea_query::{Alias, Asterisk, Cond, Expr, Func, Order, Query, SqliteQueryBuilder};

use stockroom_core::Company;

use super::annotate;
use super::tables::Companies;
use super::{contains_pattern, Built};
use crate::query::CompanyListQuery;

/// Base columns in the order `company_from_row()` reads them.
pub const COLUMNS: [Companies; 15] = [
    Companies::Id,
    Companies::Name,
    Companies::Description,
    Companies::Website,
    Companies::Phone,
    Companies::Address,
    Companies::Email,
    Companies::Currency,
    Companies::Contact,
    Companies::Link,
    Companies::Image,
    Companies::IsCustomer,
    Companies::IsSupplier,
    Companies::IsManufacturer,
    Companies::Notes,
];

fn company_select() -> sea_query::SelectStatement {
    let mut q = Query::select().to_owned();
    for col in COLUMNS {
        q.column((Companies::Table, col));
    }
    q.from(Companies::Table).to_owned()
}

/// SELECT a single company by id.
pub fn get_by_id(id: i64) -> Built {
    company_select()
        .and_where(Expr::col((Companies::Table, Companies::Id)).eq(id))
        .build(SqliteQueryBuilder)
}

/// SELECT a single company by id, with part counts appended.
pub fn get_annotated(id: i64) -> Built {
    let mut q = company_select();
    annotate::company_part_counts(&mut q);
    q.and_where(Expr::col((Companies::Table, Companies::Id)).eq(id))
        .build(SqliteQueryBuilder)
}

/// SELECT companies matching the filters, with part counts appended.
pub fn list(filter: &CompanyListQuery) -> Built {
    let mut q = company_select();
    annotate::company_part_counts(&mut q);

    let flags = [
        (Companies::IsCustomer, filter.is_customer),
        (Companies::IsSupplier, filter.is_supplier),
        (Companies::IsManufacturer, filter.is_manufacturer),
    ];
    for (col, value) in flags {
        if let Some(value) = value {
            q.and_where(Expr::col((Companies::Table, col)).eq(value));
        }
    }

    if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let like = contains_pattern(search);
        q.cond_where(
            Cond::any()
                .add(Expr::col((Companies::Table, Companies::Name)).like(&like))
                .add(Expr::col((Companies::Table, Companies::Description)).like(&like)),
        );
    }

    q.order_by((Companies::Table, Companies::Name), Order::Asc)
        .build(SqliteQueryBuilder)
}

/// INSERT a company; `pk` is ignored.
pub fn insert(c: &Company) -> Built {
    Query::insert()
        .into_table(Companies::Table)
        .columns(COLUMNS[1..].iter().copied())
        .values_panic([
            c.name.as_str().into(),
            c.description.as_str().into(),
            c.website.as_str().into(),
            c.phone.as_str().into(),
            c.address.as_str().into(),
            c.email.as_str().into(),
            c.currency.as_str().into(),
            c.contact.as_str().into(),
            c.link.as_str().into(),
            c.image.clone().into(),
            c.is_customer.into(),
            c.is_supplier.into(),
            c.is_manufacturer.into(),
            c.notes.as_str().into(),
        ])
        .build(SqliteQueryBuilder)
}

/// UPDATE every writable column of a company. The image is left alone; it
/// only changes through [`set_image`].
pub fn update(c: &Company) -> Built {
    Query::update()
        .table(Companies::Table)
        .values([
            (Companies::Name, c.name.as_str().into()),
            (Companies::Description, c.description.as_str().into()),
            (Companies::Website, c.website.as_str().into()),
            (Companies::Phone, c.phone.as_str().into()),
            (Companies::Address, c.address.as_str().into()),
            (Companies::Email, c.email.as_str().into()),
            (Companies::Currency, c.currency.as_str().into()),
            (Companies::Contact, c.contact.as_str().into()),
            (Companies::Link, c.link.as_str().into()),
            (Companies::IsCustomer, c.is_customer.into()),
            (Companies::IsSupplier, c.is_supplier.into()),
            (Companies::IsManufacturer, c.is_manufacturer.into()),
            (Companies::Notes, c.notes.as_str().into()),
        ])
        .and_where(Expr::col(Companies::Id).eq(c.pk))
        .build(SqliteQueryBuilder)
}

/// Point a company at a stored image (media-relative path).
pub fn set_image(id: i64, path: Option<&str>) -> Built {
    Query::update()
        .table(Companies::Table)
        .value(Companies::Image, path.map(|s| s.to_string()))
        .and_where(Expr::col(Companies::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Count companies called `name`, other than `exclude`.
pub fn name_taken(name: &str, exclude: Option<i64>) -> Built {
    let mut q = Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
        .from(Companies::Table)
        .and_where(Expr::col(Companies::Name).eq(name))
        .to_owned();
    if let Some(id) = exclude {
        q.and_where(Expr::col(Companies::Id).ne(id));
    }
    q.build(SqliteQueryBuilder)
}

/// DELETE a company by id.
pub fn delete(id: i64) -> Built {
    Query::delete()
        .from_table(Companies::Table)
        .and_where(Expr::col(Companies::Id).eq(id))
        .build(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_filters() {
        let (sql, values) = list(&CompanyListQuery {
            is_supplier: Some(true),
            search: Some("acme".into()),
            ..Default::default()
        });
        assert!(sql.contains(r#""companies"."is_supplier" = ?"#));
        assert!(!sql.contains(r#""companies"."is_customer" = ?"#));
        assert!(sql.contains("LIKE"));
        assert!(sql.contains(r#"ORDER BY "companies"."name" ASC"#));
        assert!(values.0.contains(&sea_query::Value::from("%acme%")));
    }

    #[test]
    fn test_update_leaves_image() {
        let company = stockroom_core::testing::company(3, "Acme");
        let (sql, _) = update(&company);
        assert!(sql.starts_with(r#"UPDATE "companies" SET"#));
        assert!(!sql.contains(r#""image""#));
    }

    #[test]
    fn test_name_taken_excludes_self() {
        let (sql, values) = name_taken("Acme", Some(3));
        assert!(sql.contains(r#""id" <> ?"#));
        assert_eq!(values.0.len(), 2);
    }
}
