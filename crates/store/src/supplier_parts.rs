//! Supplier part reads and the create/update workflows.
//!
//! A create runs, in one transaction: reference and uniqueness checks, the
//! INSERT, the availability update (only when the payload carried
//! `available`), then the manufacturer link (only when it carried both
//! `manufacturer` and `MPN`). Updates run the same steps minus the link.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;

use stockroom_api::db::supplier_parts;
use stockroom_api::input::{ManufacturerLink, SupplierPartInput};
use stockroom_api::query::SupplierPartQuery;
use stockroom_api::views::SupplierPartBundle;
use stockroom_api::{FieldErrors, ServiceError};
use stockroom_core::{CompanyRole, ManufacturerPart, SupplierPart, ValidationError};

use crate::catalog::{self, company_with_role, purchaseable_part, related};
use crate::manufacturer_parts::{
    find_manufacturer_part, insert_manufacturer_part, load_manufacturer_part,
    manufacturer_part_bundle,
};
use crate::rows::{stocked_supplier_part_from_row, supplier_part_from_row};
use crate::sql;
use crate::{Store, StoreResult};

impl Store {
    /// Supplier parts matching `filter`, each with its `in_stock` total.
    pub fn list_supplier_parts(
        &self,
        filter: &SupplierPartQuery,
    ) -> StoreResult<Vec<SupplierPartBundle>> {
        let conn = self.conn();
        let rows = sql::query_all(&conn, supplier_parts::list(filter), stocked_supplier_part_from_row)
            .map_err(ServiceError::from_db("list supplier parts"))?;
        rows.into_iter()
            .map(|(sp, in_stock)| supplier_part_bundle(&conn, sp, Some(in_stock)))
            .collect()
    }

    pub fn get_supplier_part(&self, id: i64) -> StoreResult<SupplierPartBundle> {
        let conn = self.conn();
        load_stocked_bundle(&conn, id)
    }

    pub fn create_supplier_part(&self, input: &SupplierPartInput) -> StoreResult<SupplierPartBundle> {
        let now = Utc::now();
        let mut sp = input.changes.create();
        sp.updated = Some(now);
        let saved = self.write("create supplier part", |conn| {
            validate(conn, &sp)?;
            sp.pk = sql::insert(conn, supplier_parts::insert(&sp))
                .map_err(ServiceError::from_db("insert supplier part"))?;
            if let Some(quantity) = input.available {
                apply_available_quantity(conn, &mut sp, quantity, now)?;
            }
            if let Some(link) = &input.manufacturer_link {
                link_manufacturer_part(conn, &mut sp, link)?;
            }
            load_stocked_bundle(conn, sp.pk)
        })?;
        tracing::info!(
            "Created supplier part {} ({})",
            saved.supplier_part.pk,
            saved.supplier_part.sku
        );
        Ok(saved)
    }

    pub fn update_supplier_part(
        &self,
        id: i64,
        input: &SupplierPartInput,
    ) -> StoreResult<SupplierPartBundle> {
        let now = Utc::now();
        self.write("update supplier part", |conn| {
            let mut sp = load_supplier_part(conn, id)?.ok_or_else(not_found)?;
            input.changes.apply_to(&mut sp);
            sp.updated = Some(now);
            validate(conn, &sp)?;
            sql::execute(conn, supplier_parts::update(&sp))
                .map_err(ServiceError::from_db("update supplier part"))?;
            if let Some(quantity) = input.available {
                apply_available_quantity(conn, &mut sp, quantity, now)?;
            }
            load_stocked_bundle(conn, id)
        })
    }

    pub fn delete_supplier_part(&self, id: i64) -> StoreResult<()> {
        self.write("delete supplier part", |conn| {
            let deleted = sql::execute(conn, supplier_parts::delete(id))
                .map_err(ServiceError::from_db("delete supplier part"))?;
            if deleted == 0 {
                return Err(not_found());
            }
            Ok(())
        })
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("supplier part not found".into())
}

pub(crate) fn load_supplier_part(conn: &Connection, id: i64) -> StoreResult<Option<SupplierPart>> {
    sql::query_opt(conn, supplier_parts::get_by_id(id, false), supplier_part_from_row)
        .map_err(ServiceError::from_db("load supplier part"))
}

fn load_stocked_bundle(conn: &Connection, id: i64) -> StoreResult<SupplierPartBundle> {
    let (sp, in_stock) = sql::query_opt(
        conn,
        supplier_parts::get_by_id(id, true),
        stocked_supplier_part_from_row,
    )
    .map_err(ServiceError::from_db("load supplier part"))?
    .ok_or_else(not_found)?;
    supplier_part_bundle(conn, sp, Some(in_stock))
}

/// Load the records a supplier part view may embed.
pub(crate) fn supplier_part_bundle(
    conn: &Connection,
    sp: SupplierPart,
    in_stock: Option<f64>,
) -> StoreResult<SupplierPartBundle> {
    let part = related(catalog::load_part(conn, sp.part)?, "part", sp.part)?;
    let supplier = related(catalog::load_company(conn, sp.supplier)?, "company", sp.supplier)?;
    let manufacturer_part = match sp.manufacturer_part {
        Some(id) => {
            let mp = related(load_manufacturer_part(conn, id)?, "manufacturer part", id)?;
            Some(manufacturer_part_bundle(conn, mp)?)
        }
        None => None,
    };
    Ok(SupplierPartBundle {
        supplier_part: sp,
        part,
        supplier,
        manufacturer_part,
        in_stock,
    })
}

fn validate(conn: &Connection, sp: &SupplierPart) -> StoreResult<()> {
    let mut errors = FieldErrors::new();
    let part = errors.check(purchaseable_part(conn, "part", sp.part)?);
    let supplier = errors.check(company_with_role(
        conn,
        "supplier",
        sp.supplier,
        CompanyRole::Supplier,
    )?);
    if let Some(id) = sp.manufacturer_part {
        match load_manufacturer_part(conn, id)? {
            None => errors.push(ValidationError::DoesNotExist {
                field: "manufacturer_part".into(),
                pk: id,
            }),
            Some(mp) => {
                errors.check(sp.check_manufacturer_part(&mp));
            }
        }
    }
    if part.is_some() && supplier.is_some() {
        let duplicates = sql::count(conn, supplier_parts::duplicate_count(sp))
            .map_err(ServiceError::from_db("check supplier part"))?;
        if duplicates > 0 {
            errors.add(
                "non_field_errors",
                "The fields part, supplier, SKU must make a unique set.",
            );
        }
    }
    errors.into_result()
}

/// Set the available quantity and stamp `availability_updated`.
pub(crate) fn apply_available_quantity(
    conn: &Connection,
    sp: &mut SupplierPart,
    quantity: Decimal,
    now: DateTime<Utc>,
) -> StoreResult<()> {
    sp.update_available_quantity(quantity, now)?;
    sql::execute(conn, supplier_parts::set_available(sp.pk, sp.available, now))
        .map_err(ServiceError::from_db("update availability"))?;
    tracing::debug!("Supplier part {} available = {}", sp.pk, sp.available);
    Ok(())
}

/// Link the supplier part to the manufacturer part for `(part, manufacturer,
/// MPN)`, creating that manufacturer part when it does not exist yet.
pub(crate) fn link_manufacturer_part(
    conn: &Connection,
    sp: &mut SupplierPart,
    link: &ManufacturerLink,
) -> StoreResult<()> {
    let manufacturer = company_with_role(
        conn,
        "manufacturer",
        link.manufacturer,
        CompanyRole::Manufacturer,
    )?
    .map_err(ServiceError::from)?;

    let mp = match find_manufacturer_part(conn, sp.part, manufacturer.pk, &link.mpn)? {
        Some(mp) => mp,
        None => {
            let mut mp = ManufacturerPart {
                pk: 0,
                part: sp.part,
                manufacturer: manufacturer.pk,
                mpn: Some(link.mpn.clone()),
                description: String::new(),
                link: String::new(),
            };
            insert_manufacturer_part(conn, &mut mp)?;
            mp
        }
    };

    if let Some(existing) = sp.manufacturer_part
        && existing != mp.pk
    {
        return Err(ServiceError::field(
            "manufacturer_part",
            "Supplier part is already linked to a different manufacturer part",
        ));
    }
    sp.check_manufacturer_part(&mp)?;

    sp.manufacturer_part = Some(mp.pk);
    sql::execute(conn, supplier_parts::set_manufacturer_part(sp.pk, Some(mp.pk)))
        .map_err(ServiceError::from_db("link manufacturer part"))?;
    tracing::info!("Linked supplier part {} to manufacturer part {}", sp.pk, mp.pk);
    Ok(())
}
