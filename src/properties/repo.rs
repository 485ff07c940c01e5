use serde_json::{Map, Value};
use sqlx::mysql::MySqlRow;
use sqlx::{Column, MySqlPool, Row};
use time::format_description::well_known::Rfc3339;

/// Fetch every listing joined to its owner. The projection is a
/// wildcard on purpose: listing columns live in the database schema,
/// not in this crate, so rows are carried as JSON objects. The inner
/// join drops any property whose owner row is missing.
pub async fn list_with_owners(db: &MySqlPool) -> sqlx::Result<Vec<Value>> {
    let rows = sqlx::query(
        r#"
        SELECT p.*, u.name AS owner_name
        FROM properties p
        JOIN users u ON p.owner_id = u.id
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows.iter().map(row_to_json).collect())
}

fn row_to_json(row: &MySqlRow) -> Value {
    let mut obj = Map::with_capacity(row.columns().len());
    for col in row.columns() {
        obj.insert(col.name().to_string(), decode_column(row, col.ordinal()));
    }
    Value::Object(obj)
}

/// Decode one column into JSON without knowing the schema. Tries the
/// common MySQL families in order; `try_get` rejects incompatible
/// types, so the first successful decode wins.
fn decode_column(row: &MySqlRow, idx: usize) -> Value {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<u64>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<time::OffsetDateTime>, _>(idx) {
        return v
            .map(|t| {
                t.format(&Rfc3339)
                    .map(Value::from)
                    .unwrap_or_else(|_| Value::from(t.to_string()))
            })
            .unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<time::PrimitiveDateTime>, _>(idx) {
        return v.map(|t| Value::from(t.to_string())).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<time::Date>, _>(idx) {
        return v.map(|t| Value::from(t.to_string())).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<time::Time>, _>(idx) {
        return v.map(|t| Value::from(t.to_string())).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<Value>, _>(idx) {
        return v.unwrap_or(Value::Null);
    }
    // DECIMAL and friends arrive as text on the wire even when no typed
    // decode is registered for them.
    if let Ok(v) = row.try_get_unchecked::<Option<String>, _>(idx) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    Value::Null
}
