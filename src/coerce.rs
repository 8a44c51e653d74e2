use std::fmt::Display;
use std::num::IntErrorKind;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Regex, RegexBuilder};

use crate::ConversionError;

lazy_static::lazy_static! {
    // Longest integer prefix accepted by `stob`; anything after it is ignored.
    static ref INT_PREFIX: Regex = Regex::new(r"(?-u)^\s*([+-]?\d+)").unwrap();
    static ref NON_FINITE: Regex = RegexBuilder::new(r"^[+-]?(?:inf|infinity|nan)$")
        .case_insensitive(true)
        .build()
        .unwrap();
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", // 2024-12-27
    "%Y/%m/%d", // 2024/12/27
    "%d/%m/%Y", // 27/12/2024
    "%d-%b-%Y", // 27-Dec-2024
];

const TIME_FORMATS: &[&str] = &[
    "%H:%M:%S",    // 19:57:55
    "%H:%M",       // 19:57
    "%I:%M:%S %p", // 07:57:55 PM
    "%I:%M %p",    // 07:57 PM
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",    // 2024-12-27 19:57:55
    "%Y-%m-%dT%H:%M:%S",    // 2024-12-27T19:57:55
    "%Y-%m-%d %H:%M:%S%.f", // 2024-12-27 19:57:55.250
    "%Y-%m-%dT%H:%M:%S%.f", // 2024-12-27T19:57:55.250
    "%Y-%m-%d %H:%M",       // 2024-12-27 19:57
    "%d/%m/%Y %H:%M:%S",    // 27/12/2024 19:57:55
];

/// Conversion from an option value into a destination type.
///
/// Implementations either produce the whole value or fail; there is no
/// partial result.
pub trait Coerce: Sized {
    fn coerce(value: &str) -> Result<Self, ConversionError>;
}

// Leading blanks as C `isspace` sees them; `char::is_ascii_whitespace` misses \x0b.
fn skip_space(value: &str) -> &str {
    value.trim_start_matches([' ', '\t', '\n', '\x0b', '\x0c', '\r'])
}

fn invalid(target: &'static str, value: &str) -> ConversionError {
    ConversionError::InvalidLiteral {
        target,
        value: value.to_string(),
    }
}

fn out_of_range(target: &'static str, value: &str) -> ConversionError {
    ConversionError::OutOfRange {
        target,
        value: value.to_string(),
    }
}

macro_rules! coerce_int {
    ($($ty:ty),* $(,)?) => {$(
        impl Coerce for $ty {
            fn coerce(value: &str) -> Result<Self, ConversionError> {
                skip_space(value).parse::<$ty>().map_err(|e| match e.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                        out_of_range(stringify!($ty), value)
                    }
                    _ => invalid(stringify!($ty), value),
                })
            }
        }
    )*};
}

coerce_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! coerce_float {
    ($($ty:ty),* $(,)?) => {$(
        impl Coerce for $ty {
            fn coerce(value: &str) -> Result<Self, ConversionError> {
                let literal = skip_space(value);
                let parsed = literal
                    .parse::<$ty>()
                    .map_err(|_| invalid(stringify!($ty), value))?;
                if parsed.is_infinite() && !NON_FINITE.is_match(literal) {
                    return Err(out_of_range(stringify!($ty), value));
                }
                Ok(parsed)
            }
        }
    )*};
}

coerce_float!(f32, f64);

impl Coerce for bool {
    fn coerce(value: &str) -> Result<Self, ConversionError> {
        Ok(stob(value))
    }
}

impl Coerce for String {
    fn coerce(value: &str) -> Result<Self, ConversionError> {
        Ok(value.to_string())
    }
}

impl<T: Coerce> Coerce for Option<T> {
    fn coerce(value: &str) -> Result<Self, ConversionError> {
        T::coerce(value).map(Some)
    }
}

fn parse_with_formats<T>(
    target: &'static str,
    value: &str,
    formats: &[&str],
    parse: impl Fn(&str, &str) -> chrono::ParseResult<T>,
) -> Result<T, ConversionError> {
    let literal = skip_space(value);
    formats
        .iter()
        .find_map(|format| parse(literal, format).ok())
        .ok_or_else(|| invalid(target, value))
}

impl Coerce for NaiveDate {
    fn coerce(value: &str) -> Result<Self, ConversionError> {
        parse_with_formats("date", value, DATE_FORMATS, NaiveDate::parse_from_str)
    }
}

impl Coerce for NaiveTime {
    fn coerce(value: &str) -> Result<Self, ConversionError> {
        parse_with_formats("time", value, TIME_FORMATS, NaiveTime::parse_from_str)
    }
}

impl Coerce for NaiveDateTime {
    fn coerce(value: &str) -> Result<Self, ConversionError> {
        parse_with_formats("datetime", value, DATETIME_FORMATS, NaiveDateTime::parse_from_str)
    }
}

/// Best-effort boolean reading of an option value.
///
/// `yes`, `y` and `true` (any case) are true, as is any value starting with a
/// nonzero 32-bit integer. Everything else is false; this never fails.
pub fn stob(value: &str) -> bool {
    let upper = value.to_ascii_uppercase();
    if upper == "YES" || upper == "Y" || upper == "TRUE" {
        return true;
    }
    INT_PREFIX
        .captures(&upper)
        .and_then(|caps| caps[1].parse::<i32>().ok())
        .is_some_and(|n| n != 0)
}

/// Converts `value` and stores it in `dest`. On error `dest` is left as it was.
pub fn define<T: Coerce>(dest: &mut T, value: &str) -> Result<(), ConversionError> {
    *dest = T::coerce(value)?;
    Ok(())
}

/// Stores `f(value)` in `dest`.
pub fn transform<T, F>(dest: &mut T, value: &str, f: F)
where
    F: FnOnce(&str) -> T,
{
    *dest = f(value);
}

/// Like [`transform`], for conversions that can fail.
pub fn try_transform<T, F, E>(dest: &mut T, value: &str, f: F) -> Result<(), ConversionError>
where
    F: FnOnce(&str) -> Result<T, E>,
    E: Display,
{
    *dest = f(value).map_err(|e| ConversionError::Custom {
        value: value.to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}

/// Builds the destination directly from the value string.
pub fn object<T>(dest: &mut T, value: &str)
where
    T: for<'a> From<&'a str>,
{
    *dest = T::from(value);
}
