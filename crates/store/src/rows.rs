//! Row mappers. Each reads columns in the order of the matching builder's
//! `COLUMNS`, starting at column 0.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use rust_decimal::Decimal;

use stockroom_api::db::attachments::AttachmentKind;
use stockroom_api::views::AnnotatedCompany;
use stockroom_core::{
    Attachment, Company, ManufacturerPart, ManufacturerPartParameter, Part, SupplierPart,
    SupplierPriceBreak,
};

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn decimal(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    Decimal::from_str(&s).map_err(|e| conversion_error(idx, e))
}

fn opt_decimal(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    let s: Option<String> = row.get(idx)?;
    s.map(|s| Decimal::from_str(&s).map_err(|e| conversion_error(idx, e)))
        .transpose()
}

fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let s: Option<String> = row.get(idx)?;
    s.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| conversion_error(idx, e))
    })
    .transpose()
}

pub(crate) fn company_from_row(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        pk: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        website: row.get(3)?,
        phone: row.get(4)?,
        address: row.get(5)?,
        email: row.get(6)?,
        currency: row.get(7)?,
        contact: row.get(8)?,
        link: row.get(9)?,
        image: row.get(10)?,
        is_customer: row.get(11)?,
        is_supplier: row.get(12)?,
        is_manufacturer: row.get(13)?,
        notes: row.get(14)?,
    })
}

/// Company columns followed by `parts_manufactured`, `parts_supplied`.
pub(crate) fn annotated_company_from_row(row: &Row<'_>) -> rusqlite::Result<AnnotatedCompany> {
    Ok(AnnotatedCompany {
        company: company_from_row(row)?,
        parts_manufactured: row.get(15)?,
        parts_supplied: row.get(16)?,
    })
}

pub(crate) fn part_from_row(row: &Row<'_>) -> rusqlite::Result<Part> {
    Ok(Part {
        pk: row.get(0)?,
        name: row.get(1)?,
        ipn: row.get(2)?,
        revision: row.get(3)?,
        description: row.get(4)?,
        image: row.get(5)?,
        units: row.get(6)?,
        active: row.get(7)?,
        assembly: row.get(8)?,
        purchaseable: row.get(9)?,
        salable: row.get(10)?,
        trackable: row.get(11)?,
        is_virtual: row.get(12)?,
    })
}

pub(crate) fn manufacturer_part_from_row(row: &Row<'_>) -> rusqlite::Result<ManufacturerPart> {
    Ok(ManufacturerPart {
        pk: row.get(0)?,
        part: row.get(1)?,
        manufacturer: row.get(2)?,
        mpn: row.get(3)?,
        description: row.get(4)?,
        link: row.get(5)?,
    })
}

pub(crate) fn parameter_from_row(row: &Row<'_>) -> rusqlite::Result<ManufacturerPartParameter> {
    Ok(ManufacturerPartParameter {
        pk: row.get(0)?,
        manufacturer_part: row.get(1)?,
        name: row.get(2)?,
        value: row.get(3)?,
        units: row.get(4)?,
    })
}

pub(crate) fn supplier_part_from_row(row: &Row<'_>) -> rusqlite::Result<SupplierPart> {
    Ok(SupplierPart {
        pk: row.get(0)?,
        part: row.get(1)?,
        supplier: row.get(2)?,
        manufacturer_part: row.get(3)?,
        sku: row.get(4)?,
        description: row.get(5)?,
        link: row.get(6)?,
        note: row.get(7)?,
        packaging: row.get(8)?,
        pack_size: decimal(row, 9)?,
        available: decimal(row, 10)?,
        availability_updated: timestamp(row, 11)?,
        barcode_hash: row.get(12)?,
        updated: timestamp(row, 13)?,
    })
}

/// Supplier part columns followed by the `in_stock` annotation.
pub(crate) fn stocked_supplier_part_from_row(
    row: &Row<'_>,
) -> rusqlite::Result<(SupplierPart, f64)> {
    Ok((supplier_part_from_row(row)?, row.get(14)?))
}

pub(crate) fn price_break_from_row(row: &Row<'_>) -> rusqlite::Result<SupplierPriceBreak> {
    Ok(SupplierPriceBreak {
        pk: row.get(0)?,
        part: row.get(1)?,
        quantity: decimal(row, 2)?,
        price: opt_decimal(row, 3)?,
        price_currency: row.get(4)?,
        updated: timestamp(row, 5)?,
    })
}

pub(crate) fn attachment_from_row(
    kind: AttachmentKind,
) -> impl Fn(&Row<'_>) -> rusqlite::Result<Attachment> {
    move |row| {
        let upload_date: String = row.get(5)?;
        Ok(Attachment {
            pk: row.get(0)?,
            owner: kind.owner(row.get(1)?),
            attachment: row.get(2)?,
            link: row.get(3)?,
            comment: row.get(4)?,
            upload_date: NaiveDate::parse_from_str(&upload_date, "%Y-%m-%d")
                .map_err(|e| conversion_error(5, e))?,
            user: row.get(6)?,
        })
    }
}
