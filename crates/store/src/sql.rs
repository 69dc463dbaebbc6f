//! Execute sea-query builders against rusqlite.

use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

use stockroom_api::db::Built;

/// Convert `sea_query::Values` into rusqlite bind params.
pub fn values_to_params(values: &sea_query::Values) -> Vec<SqlValue> {
    values
        .0
        .iter()
        .map(|v| match v {
            sea_query::Value::Bool(Some(b)) => SqlValue::Integer(i64::from(*b)),
            sea_query::Value::TinyInt(Some(i)) => SqlValue::Integer(i64::from(*i)),
            sea_query::Value::SmallInt(Some(i)) => SqlValue::Integer(i64::from(*i)),
            sea_query::Value::Int(Some(i)) => SqlValue::Integer(i64::from(*i)),
            sea_query::Value::BigInt(Some(i)) => SqlValue::Integer(*i),
            sea_query::Value::TinyUnsigned(Some(i)) => SqlValue::Integer(i64::from(*i)),
            sea_query::Value::SmallUnsigned(Some(i)) => SqlValue::Integer(i64::from(*i)),
            sea_query::Value::Unsigned(Some(i)) => SqlValue::Integer(i64::from(*i)),
            sea_query::Value::Float(Some(f)) => SqlValue::Real(f64::from(*f)),
            sea_query::Value::Double(Some(f)) => SqlValue::Real(*f),
            sea_query::Value::String(Some(s)) => SqlValue::Text(s.as_str().to_owned()),
            sea_query::Value::Char(Some(c)) => SqlValue::Text(c.to_string()),
            sea_query::Value::Bytes(Some(b)) => SqlValue::Blob(b.to_vec()),
            _ => SqlValue::Null,
        })
        .collect()
}

pub(crate) fn execute(conn: &Connection, (sql, values): Built) -> rusqlite::Result<usize> {
    conn.execute(&sql, params_from_iter(values_to_params(&values)))
}

/// Execute an INSERT and return the new row id.
pub(crate) fn insert(conn: &Connection, built: Built) -> rusqlite::Result<i64> {
    execute(conn, built)?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn query_opt<T>(
    conn: &Connection,
    (sql, values): Built,
    map: impl FnOnce(&Row<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<Option<T>> {
    conn.query_row(&sql, params_from_iter(values_to_params(&values)), map)
        .optional()
}

pub(crate) fn query_all<T>(
    conn: &Connection,
    (sql, values): Built,
    map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<Vec<T>> {
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values_to_params(&values)), map)?;
    rows.collect()
}

/// Run a `SELECT COUNT(*)` builder.
pub(crate) fn count(conn: &Connection, (sql, values): Built) -> rusqlite::Result<i64> {
    conn.query_row(&sql, params_from_iter(values_to_params(&values)), |row| {
        row.get(0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_to_params() {
        let values = sea_query::Values(vec![
            true.into(),
            7i64.into(),
            2.5f64.into(),
            "USD".into(),
            sea_query::Value::String(None),
            Option::<i64>::None.into(),
        ]);
        assert_eq!(
            values_to_params(&values),
            vec![
                SqlValue::Integer(1),
                SqlValue::Integer(7),
                SqlValue::Real(2.5),
                SqlValue::Text("USD".into()),
                SqlValue::Null,
                SqlValue::Null,
            ]
        );
    }
}
