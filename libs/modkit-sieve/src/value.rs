//! Canonical text rendering of filter values.
//!
//! Every instant is written as `yyyy-MM-ddTHH:mm:ss.fffZ` regardless of the host locale.
//! Values that carry a local offset, or no zone at all, are shifted to UTC first.

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use std::fmt;
use uuid::Uuid;

/// Wire format for instants.
const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// A typed filter value before it is embedded into a clause.
#[derive(Clone, Debug, PartialEq)]
pub enum SieveValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float32(f32),
    Float(f64),
    Decimal(BigDecimal),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    String(String),
}

impl SieveValue {
    /// Render the value the way it appears after the operator in a filter clause.
    #[must_use]
    pub fn format(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SieveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SieveValue::Null => Ok(()),
            SieveValue::Bool(b) => write!(f, "{b}"),
            SieveValue::Int(n) => write!(f, "{n}"),
            SieveValue::UInt(n) => write!(f, "{n}"),
            SieveValue::Float32(n) => write!(f, "{n}"),
            SieveValue::Float(n) => write!(f, "{n}"),
            SieveValue::Decimal(d) => write!(f, "{d}"),
            SieveValue::Uuid(u) => write!(f, "{u}"),
            SieveValue::DateTime(dt) => f.write_str(&format_instant(*dt)),
            SieveValue::String(s) => f.write_str(s),
        }
    }
}

/// Format a UTC instant with millisecond precision and a `Z` designator.
#[must_use]
pub fn format_instant(dt: DateTime<Utc>) -> String {
    dt.format(INSTANT_FORMAT).to_string()
}

/// Interpret a zone-less timestamp as host-local time and convert it to UTC.
///
/// A wall-clock time that does not exist locally (DST gap) is taken as UTC.
#[must_use]
pub fn naive_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map_or_else(|| naive.and_utc(), |local| local.with_timezone(&Utc))
}

/// Trait for types that can be embedded as a filter value.
pub trait IntoSieveValue {
    /// Convert this value into a `SieveValue`.
    fn into_sieve_value(self) -> SieveValue;
}

impl IntoSieveValue for SieveValue {
    fn into_sieve_value(self) -> SieveValue {
        self
    }
}

impl IntoSieveValue for bool {
    fn into_sieve_value(self) -> SieveValue {
        SieveValue::Bool(self)
    }
}

macro_rules! impl_signed {
    ($($t:ty),*) => {
        $(impl IntoSieveValue for $t {
            fn into_sieve_value(self) -> SieveValue {
                SieveValue::Int(i64::from(self))
            }
        })*
    };
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {
        $(impl IntoSieveValue for $t {
            fn into_sieve_value(self) -> SieveValue {
                SieveValue::UInt(u64::from(self))
            }
        })*
    };
}

impl_signed!(i8, i16, i32, i64);
impl_unsigned!(u8, u16, u32, u64);

impl IntoSieveValue for f32 {
    fn into_sieve_value(self) -> SieveValue {
        SieveValue::Float32(self)
    }
}

impl IntoSieveValue for f64 {
    fn into_sieve_value(self) -> SieveValue {
        SieveValue::Float(self)
    }
}

impl IntoSieveValue for BigDecimal {
    fn into_sieve_value(self) -> SieveValue {
        SieveValue::Decimal(self)
    }
}

impl IntoSieveValue for Uuid {
    fn into_sieve_value(self) -> SieveValue {
        SieveValue::Uuid(self)
    }
}

impl IntoSieveValue for String {
    fn into_sieve_value(self) -> SieveValue {
        SieveValue::String(self)
    }
}

impl IntoSieveValue for &str {
    fn into_sieve_value(self) -> SieveValue {
        SieveValue::String(self.to_owned())
    }
}

impl IntoSieveValue for &String {
    fn into_sieve_value(self) -> SieveValue {
        SieveValue::String(self.clone())
    }
}

impl IntoSieveValue for DateTime<Utc> {
    fn into_sieve_value(self) -> SieveValue {
        SieveValue::DateTime(self)
    }
}

impl IntoSieveValue for DateTime<Local> {
    fn into_sieve_value(self) -> SieveValue {
        SieveValue::DateTime(self.with_timezone(&Utc))
    }
}

impl IntoSieveValue for DateTime<FixedOffset> {
    fn into_sieve_value(self) -> SieveValue {
        SieveValue::DateTime(self.with_timezone(&Utc))
    }
}

impl IntoSieveValue for NaiveDateTime {
    fn into_sieve_value(self) -> SieveValue {
        SieveValue::DateTime(naive_to_utc(self))
    }
}

impl<T: IntoSieveValue> IntoSieveValue for Option<T> {
    fn into_sieve_value(self) -> SieveValue {
        self.map_or(SieveValue::Null, IntoSieveValue::into_sieve_value)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use regex::Regex;
    use std::str::FromStr;

    fn assert_canonical_instant(s: &str) {
        let re = Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z$").unwrap();
        assert!(re.is_match(s), "unexpected format: {s}");
    }

    fn sample_naive() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 10)
            .unwrap()
            .and_hms_milli_opt(16, 48, 5, 123)
            .unwrap()
    }

    #[test]
    fn test_utc_instant_is_exact() {
        let dt = sample_naive().and_utc();
        assert_eq!(dt.into_sieve_value().format(), "2024-06-10T16:48:05.123Z");
    }

    #[test]
    fn test_whole_seconds_keep_millis() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
            .and_utc();
        assert_eq!(format_instant(dt), "2024-01-02T03:04:05.000Z");
    }

    #[test]
    fn test_sub_millisecond_precision_is_truncated() {
        let dt = NaiveDate::from_ymd_opt(2024, 6, 10)
            .unwrap()
            .and_hms_micro_opt(16, 48, 5, 123_999)
            .unwrap()
            .and_utc();
        assert_eq!(format_instant(dt), "2024-06-10T16:48:05.123Z");
    }

    #[test]
    fn test_naive_instant_is_canonical() {
        let s = sample_naive().into_sieve_value().format();
        assert_canonical_instant(&s);
    }

    #[test]
    fn test_local_instant_is_canonical() {
        let local = Local.from_local_datetime(&sample_naive()).earliest();
        if let Some(local) = local {
            let s = local.into_sieve_value().format();
            assert_canonical_instant(&s);
            assert_eq!(s, format_instant(local.with_timezone(&Utc)));
        }
    }

    #[test]
    fn test_fixed_offset_is_shifted_to_utc() {
        let dt = DateTime::parse_from_rfc3339("2024-06-10T18:48:05.123+02:00").unwrap();
        assert_eq!(dt.into_sieve_value().format(), "2024-06-10T16:48:05.123Z");
    }

    #[test]
    fn test_scalars() {
        assert_eq!("Bob".into_sieve_value().format(), "Bob");
        assert_eq!(42_i32.into_sieve_value().format(), "42");
        assert_eq!((-7_i64).into_sieve_value().format(), "-7");
        assert_eq!(7_u8.into_sieve_value().format(), "7");
        assert_eq!(true.into_sieve_value().format(), "true");
        assert_eq!(1.5_f64.into_sieve_value().format(), "1.5");
        assert_eq!(1.1_f32.into_sieve_value().format(), "1.1");
        assert_eq!((-0.3_f32).into_sieve_value().format(), "-0.3");
        assert_eq!(
            BigDecimal::from_str("10.25").unwrap().into_sieve_value().format(),
            "10.25"
        );
    }

    #[test]
    fn test_uuid_is_hyphenated_lowercase() {
        let id = Uuid::from_str("67E55044-10B1-426F-9247-BB680E5FE0C8").unwrap();
        assert_eq!(
            id.into_sieve_value().format(),
            "67e55044-10b1-426f-9247-bb680e5fe0c8"
        );
    }

    #[test]
    fn test_absent_value_is_empty() {
        assert_eq!(None::<i32>.into_sieve_value().format(), "");
        assert_eq!(Some("x").into_sieve_value().format(), "x");
        assert_eq!(SieveValue::Null.format(), "");
    }
}
