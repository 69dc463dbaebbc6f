//! Manufacturer part parameters.

use rusqlite::Connection;

use stockroom_api::db::parameters;
use stockroom_api::input::ParameterChanges;
use stockroom_api::query::ParameterQuery;
use stockroom_api::views::ParameterBundle;
use stockroom_api::{FieldErrors, ServiceError};
use stockroom_core::{ManufacturerPartParameter, ValidationError};

use crate::catalog::related;
use crate::manufacturer_parts::{load_manufacturer_part, manufacturer_part_bundle};
use crate::rows::parameter_from_row;
use crate::sql;
use crate::{Store, StoreResult};

impl Store {
    pub fn list_parameters(&self, filter: &ParameterQuery) -> StoreResult<Vec<ParameterBundle>> {
        let conn = self.conn();
        let rows = sql::query_all(&conn, parameters::list(filter), parameter_from_row)
            .map_err(ServiceError::from_db("list parameters"))?;
        rows.into_iter()
            .map(|p| parameter_bundle(&conn, p))
            .collect()
    }

    pub fn get_parameter(&self, id: i64) -> StoreResult<ParameterBundle> {
        let conn = self.conn();
        let param = load_parameter(&conn, id)?.ok_or_else(not_found)?;
        parameter_bundle(&conn, param)
    }

    pub fn create_parameter(&self, changes: &ParameterChanges) -> StoreResult<ParameterBundle> {
        let mut param = changes.create();
        self.write("create parameter", |conn| {
            validate(conn, &param)?;
            param.pk = sql::insert(conn, parameters::insert(&param))
                .map_err(ServiceError::from_db("insert parameter"))?;
            parameter_bundle(conn, param)
        })
    }

    pub fn update_parameter(
        &self,
        id: i64,
        changes: &ParameterChanges,
    ) -> StoreResult<ParameterBundle> {
        self.write("update parameter", |conn| {
            let mut param = load_parameter(conn, id)?.ok_or_else(not_found)?;
            changes.apply_to(&mut param);
            validate(conn, &param)?;
            sql::execute(conn, parameters::update(&param))
                .map_err(ServiceError::from_db("update parameter"))?;
            parameter_bundle(conn, param)
        })
    }

    pub fn delete_parameter(&self, id: i64) -> StoreResult<()> {
        self.write("delete parameter", |conn| {
            let deleted = sql::execute(conn, parameters::delete(id))
                .map_err(ServiceError::from_db("delete parameter"))?;
            if deleted == 0 {
                return Err(not_found());
            }
            Ok(())
        })
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("parameter not found".into())
}

fn load_parameter(conn: &Connection, id: i64) -> StoreResult<Option<ManufacturerPartParameter>> {
    sql::query_opt(conn, parameters::get_by_id(id), parameter_from_row)
        .map_err(ServiceError::from_db("load parameter"))
}

fn parameter_bundle(
    conn: &Connection,
    parameter: ManufacturerPartParameter,
) -> StoreResult<ParameterBundle> {
    let mp = related(
        load_manufacturer_part(conn, parameter.manufacturer_part)?,
        "manufacturer part",
        parameter.manufacturer_part,
    )?;
    Ok(ParameterBundle {
        parameter,
        manufacturer_part: manufacturer_part_bundle(conn, mp)?,
    })
}

fn validate(conn: &Connection, param: &ManufacturerPartParameter) -> StoreResult<()> {
    let mut errors = FieldErrors::new();
    if load_manufacturer_part(conn, param.manufacturer_part)?.is_none() {
        errors.push(ValidationError::DoesNotExist {
            field: "manufacturer_part".into(),
            pk: param.manufacturer_part,
        });
    } else {
        let duplicates = sql::count(conn, parameters::duplicate_count(param))
            .map_err(ServiceError::from_db("check parameter"))?;
        if duplicates > 0 {
            errors.add(
                "non_field_errors",
                "The fields manufacturer_part, name must make a unique set.",
            );
        }
    }
    errors.into_result()
}
