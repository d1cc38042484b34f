//! Convert request JSON into typed values that sqlx can bind.

use crate::error::AppError;
use crate::model::{ColumnDef, ColumnType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value bound to a PostgreSQL statement. Reports its own wire type so one parameter list
/// can mix integers, text and timestamps.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Int(i32),
    /// Paging bounds only; no column is `bigint`.
    BigInt(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl PgBindValue {
    /// Coerce a JSON value for `column`. Null and blank strings count as missing.
    pub fn from_json(column: &ColumnDef, v: &Value) -> Result<Self, AppError> {
        if is_blank(v) {
            return Err(AppError::Validation(format!("{} must not be empty", column.name)));
        }
        match column.ty {
            ColumnType::Integer => parse_int(v)
                .map(PgBindValue::Int)
                .ok_or_else(|| AppError::Validation(format!("{} must be an integer", column.name))),
            ColumnType::Text => match v {
                Value::String(s) => Ok(PgBindValue::Text(s.clone())),
                Value::Number(n) => Ok(PgBindValue::Text(n.to_string())),
                _ => Err(AppError::Validation(format!("{} must be a string", column.name))),
            },
            ColumnType::Timestamp => v
                .as_str()
                .and_then(parse_timestamp)
                .map(PgBindValue::Timestamp)
                .ok_or_else(|| AppError::Validation(format!("{} must be a date (YYYY-MM-DD or RFC 3339)", column.name))),
        }
    }

    /// Coerce a query-string value for `column`.
    pub fn from_query(column: &ColumnDef, s: &str) -> Result<Self, AppError> {
        Self::from_json(column, &Value::String(s.to_string()))
    }
}

/// Missing in the sense of the request checks: null, or a string with nothing but whitespace.
pub fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn parse_int(v: &Value) -> Option<i32> {
    match v {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC) or a bare date (midnight UTC).
/// Truncated to microseconds, the precision `timestamptz` stores.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    parse_any_timestamp(s.trim()).map(|d| d.trunc_subsecs(6))
}

fn parse_any_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(d.and_utc());
    }
    if let Ok(d) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(d.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            PgBindValue::Int(n) => <i32 as Encode<Postgres>>::encode_by_ref(n, buf),
            PgBindValue::BigInt(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf),
            PgBindValue::Text(s) => <&str as Encode<Postgres>>::encode_by_ref(&s.as_str(), buf),
            PgBindValue::Timestamp(d) => <DateTime<Utc> as Encode<Postgres>>::encode_by_ref(d, buf),
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::Int(_) => <i32 as Type<Postgres>>::type_info(),
            PgBindValue::BigInt(_) => <i64 as Type<Postgres>>::type_info(),
            PgBindValue::Text(_) => <String as Type<Postgres>>::type_info(),
            PgBindValue::Timestamp(_) => <DateTime<Utc> as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

/// Coerced column values from one request body, in body order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fields(Vec<(&'static str, PgBindValue)>);

impl Fields {
    pub fn push(&mut self, column: &'static str, value: PgBindValue) {
        self.0.push((column, value));
    }

    pub fn get(&self, column: &str) -> Option<&PgBindValue> {
        self.0.iter().find(|(c, _)| *c == column).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, PgBindValue)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    const PRICE: ColumnDef = ColumnDef::new("precio", ColumnType::Integer, "");
    const YEAR: ColumnDef = ColumnDef::new("año", ColumnType::Text, "");
    const DAY: ColumnDef = ColumnDef::new("fecha", ColumnType::Timestamp, "");

    #[test]
    fn integers_from_numbers_and_numeric_strings() {
        assert_eq!(PgBindValue::from_json(&PRICE, &json!(25000)).unwrap(), PgBindValue::Int(25000));
        assert_eq!(PgBindValue::from_json(&PRICE, &json!(" 42 ")).unwrap(), PgBindValue::Int(42));
        assert!(PgBindValue::from_json(&PRICE, &json!("abc")).is_err());
        assert!(PgBindValue::from_json(&PRICE, &json!(1.5)).is_err());
        assert!(PgBindValue::from_json(&PRICE, &json!(i64::from(i32::MAX) + 1)).is_err());
        assert!(PgBindValue::from_json(&PRICE, &json!(true)).is_err());
    }

    #[test]
    fn text_accepts_numbers() {
        assert_eq!(PgBindValue::from_json(&YEAR, &json!(2020)).unwrap(), PgBindValue::Text("2020".into()));
        assert_eq!(PgBindValue::from_json(&YEAR, &json!("2020")).unwrap(), PgBindValue::Text("2020".into()));
        assert!(PgBindValue::from_json(&YEAR, &json!(["2020"])).is_err());
    }

    #[test]
    fn blank_values_are_missing() {
        for v in [json!(null), json!(""), json!("   ")] {
            let err = PgBindValue::from_json(&YEAR, &v).unwrap_err();
            assert!(err.to_string().contains("must not be empty"));
        }
    }

    #[test]
    fn timestamps() {
        let midnight = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-01"), Some(midnight));
        assert_eq!(parse_timestamp("2024-05-01T00:00:00Z"), Some(midnight));
        assert_eq!(parse_timestamp("2024-05-01T02:00:00+02:00"), Some(midnight));
        assert_eq!(parse_timestamp("2024-05-01T00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp("01/05/2024"), None);
        assert_eq!(
            PgBindValue::from_json(&DAY, &json!("2024-05-01")).unwrap(),
            PgBindValue::Timestamp(midnight)
        );
        assert!(PgBindValue::from_json(&DAY, &json!(20240501)).is_err());
    }

    #[test]
    fn timestamps_keep_only_microseconds() {
        let parsed = parse_timestamp("2030-05-17T10:00:00.1234567Z").unwrap();
        assert_eq!(parsed.timestamp_subsec_nanos(), 123_456_000);
        assert_eq!(
            parse_timestamp("2030-05-17T10:00:00.0000001Z"),
            parse_timestamp("2030-05-17T10:00:00Z")
        );
        assert_eq!(
            parse_timestamp("2030-05-17 10:00:00.9999999").map(|d| d.timestamp_subsec_micros()),
            Some(999_999)
        );
    }

    #[test]
    fn fields_lookup() {
        let mut f = Fields::default();
        f.push("precio", PgBindValue::Int(1));
        assert_eq!(f.get("precio"), Some(&PgBindValue::Int(1)));
        assert_eq!(f.get("color"), None);
        assert_eq!(f.len(), 1);
    }
}
