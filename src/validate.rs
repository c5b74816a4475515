//! Field-level validation shared by the resource handlers.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;
use time::{macros::format_description, Date, OffsetDateTime};
use uuid::Uuid;

use crate::error::AppError;

lazy_static! {
    static ref DATE_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

/// Malformed ids are reported separately from ids that match nothing.
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::InvalidId(format!("Invalid {what} id format")))
}

/// Like [`parse_id`], for an id carried in a body field such as `categoryId`.
pub fn parse_ref(raw: &str, field: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::InvalidId(format!("Invalid {field} format")))
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

pub fn parse_date(raw: &str) -> Result<Date, AppError> {
    if !DATE_RE.is_match(raw) {
        return Err(AppError::bad_request("Date format should be YYYY-MM-DD"));
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::bad_request("Invalid date format"))
}

/// Validity window for a new coupon or offer: the start must lie after
/// `today` and the end strictly after the start.
pub fn new_validity_window(start: &str, end: &str, today: Date) -> Result<(Date, Date), AppError> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    if start <= today {
        return Err(AppError::bad_request("Start date cannot be in the past"));
    }
    ordered_window(start, end)
}

pub fn ordered_window(start: Date, end: Date) -> Result<(Date, Date), AppError> {
    if end <= start {
        return Err(AppError::bad_request("End date must be after start date"));
    }
    Ok((start, end))
}

/// Window after an update that may move either end. Untouched windows are
/// returned as they are.
pub fn revised_window(
    current: (Date, Date),
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(Date, Date), AppError> {
    if start.is_none() && end.is_none() {
        return Ok(current);
    }
    let start = start.map(parse_date).transpose()?.unwrap_or(current.0);
    let end = end.map(parse_date).transpose()?.unwrap_or(current.1);
    ordered_window(start, end)
}

/// Trimmed text; blank strings count as absent. Numbers are accepted and
/// rendered as text, since clients send contact numbers either way.
pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let s = s.trim();
            Ok((!s.is_empty()).then(|| s.to_string()))
        }
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!("expected text, got {other}"))),
    }
}

/// Amounts sent either as JSON numbers or as multipart text. NaN, the
/// infinities and negative values are rejected.
pub fn opt_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let n = match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom("number out of range"))?,
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("`{s}` is not a number")))?,
        Some(other) => return Err(de::Error::custom(format!("expected a number, got {other}"))),
    };
    if !n.is_finite() {
        return Err(de::Error::custom(format!("`{n}` is not a number")));
    }
    if n < 0.0 {
        return Err(de::Error::custom("amounts cannot be negative"));
    }
    Ok(Some(n))
}

/// Like [`opt_number`], and zero is refused as well.
pub fn opt_price<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    match opt_number(d)? {
        Some(n) if n == 0.0 => Err(de::Error::custom("price must be greater than zero")),
        other => Ok(other),
    }
}
