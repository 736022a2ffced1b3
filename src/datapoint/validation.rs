//! # Input Validation
//!
//! Per-route input constraints, checked before any store access:
//!
//! - `windspeed`, `temperature`, `humidity`, `barpressure`, `altitude`:
//!   finite numbers (JSON numbers or numeric strings)
//! - `winddirection`, `daynight`: one of the enum values, exact case
//! - `page >= 1`, `1 <= perPage <= 100`
//! - `createdAt` (list filter): RFC 3339 timestamp
//! - path id: 24 hex characters
//!
//! Unknown keys are ignored. All failing fields are reported together.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::errors::{DatapointError, DatapointResult, FieldError, Location};
use super::id::DatapointId;
use super::model::{DatapointFields, DayNight, WindDirection};
use crate::store::{DatapointFilter, FindQuery};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 30;
pub const MAX_PER_PAGE: u64 = 100;

/// Route parameter carrying the datapoint id
pub const ID_PARAM: &str = "datapointId";

/// Validated list request
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page: u64,
    pub per_page: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub windspeed: Option<f64>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            created_at: None,
            windspeed: None,
        }
    }
}

impl ListQuery {
    /// Records to skip: perPage × (page − 1)
    pub fn skip(&self) -> usize {
        self.per_page.saturating_mul(self.page.saturating_sub(1)) as usize
    }

    pub fn to_find_query(&self) -> FindQuery {
        FindQuery {
            filter: DatapointFilter {
                created_at: self.created_at,
                windspeed: self.windspeed,
            },
            skip: self.skip(),
            limit: self.per_page as usize,
        }
    }
}

/// Validate the `:datapointId` path segment
pub fn parse_id(raw: &str) -> DatapointResult<DatapointId> {
    DatapointId::parse(raw).map_err(|_| {
        DatapointError::invalid(
            ID_PARAM,
            Location::Params,
            format!(
                "\"{}\" with value \"{}\" fails to match the required pattern: /^[a-fA-F0-9]{{24}}$/",
                ID_PARAM, raw
            ),
        )
    })
}

/// Validate a create/replace/update body
pub fn validate_body(body: &Value) -> DatapointResult<DatapointFields> {
    let obj = body.as_object().ok_or_else(|| {
        DatapointError::invalid("body", Location::Body, "\"body\" must be an object")
    })?;

    let mut errors = Vec::new();
    let fields = DatapointFields {
        windspeed: body_number(obj, "windspeed", &mut errors),
        winddirection: body_enum(obj, "winddirection", &WindDirection::ALL.map(|v| v.as_str()), &mut errors),
        temperature: body_number(obj, "temperature", &mut errors),
        humidity: body_number(obj, "humidity", &mut errors),
        barpressure: body_number(obj, "barpressure", &mut errors),
        altitude: body_number(obj, "altitude", &mut errors),
        daynight: body_enum(obj, "daynight", &DayNight::ALL.map(|v| v.as_str()), &mut errors),
    };

    if errors.is_empty() {
        Ok(fields)
    } else {
        Err(DatapointError::Validation(errors))
    }
}

/// Validate list query parameters
pub fn validate_query(params: &HashMap<String, String>) -> DatapointResult<ListQuery> {
    let mut errors = Vec::new();

    let page = query_bounded(params, "page", DEFAULT_PAGE, 1, None, &mut errors);
    let per_page = query_bounded(
        params,
        "perPage",
        DEFAULT_PER_PAGE,
        1,
        Some(MAX_PER_PAGE),
        &mut errors,
    );

    let windspeed = query_number(params, "windspeed", &mut errors);
    for field in ["temperature", "humidity", "barpressure", "altitude"] {
        query_number(params, field, &mut errors);
    }
    query_enum(params, "winddirection", &WindDirection::ALL.map(|v| v.as_str()), &mut errors);
    query_enum(params, "daynight", &DayNight::ALL.map(|v| v.as_str()), &mut errors);

    let created_at = match params.get("createdAt") {
        None => None,
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(t) => Some(t.with_timezone(&Utc)),
            Err(_) => {
                errors.push(FieldError::new(
                    "createdAt",
                    Location::Query,
                    "\"createdAt\" must be a valid ISO 8601 date",
                ));
                None
            }
        },
    };

    if errors.is_empty() {
        Ok(ListQuery {
            page,
            per_page,
            created_at,
            windspeed,
        })
    } else {
        Err(DatapointError::Validation(errors))
    }
}

fn must_be_number(field: &str) -> String {
    format!("\"{}\" must be a number", field)
}

fn must_be_one_of(field: &str, allowed: &[&str]) -> String {
    format!("\"{}\" must be one of [{}]", field, allowed.join(", "))
}

/// Finite number from a JSON number or a numeric string
fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn body_number(obj: &Map<String, Value>, field: &str, errors: &mut Vec<FieldError>) -> Option<f64> {
    let value = obj.get(field)?;
    let number = to_number(value);
    if number.is_none() {
        errors.push(FieldError::new(field, Location::Body, must_be_number(field)));
    }
    number
}

fn body_enum<T: FromStr>(
    obj: &Map<String, Value>,
    field: &str,
    allowed: &[&str],
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let value = obj.get(field)?;
    let Some(s) = value.as_str() else {
        errors.push(FieldError::new(
            field,
            Location::Body,
            format!("\"{}\" must be a string", field),
        ));
        return None;
    };
    let parsed = s.parse::<T>().ok();
    if parsed.is_none() {
        errors.push(FieldError::new(field, Location::Body, must_be_one_of(field, allowed)));
    }
    parsed
}

fn query_number(
    params: &HashMap<String, String>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    let raw = params.get(field)?;
    let number = parse_number(raw);
    if number.is_none() {
        errors.push(FieldError::new(field, Location::Query, must_be_number(field)));
    }
    number
}

fn query_enum(
    params: &HashMap<String, String>,
    field: &str,
    allowed: &[&str],
    errors: &mut Vec<FieldError>,
) {
    if let Some(raw) = params.get(field) {
        if !allowed.contains(&raw.as_str()) {
            errors.push(FieldError::new(field, Location::Query, must_be_one_of(field, allowed)));
        }
    }
}

fn query_bounded(
    params: &HashMap<String, String>,
    field: &str,
    default: u64,
    min: u64,
    max: Option<u64>,
    errors: &mut Vec<FieldError>,
) -> u64 {
    let Some(raw) = params.get(field) else {
        return default;
    };
    let Ok(n) = raw.trim().parse::<u64>() else {
        errors.push(FieldError::new(
            field,
            Location::Query,
            format!("\"{}\" must be an integer", field),
        ));
        return default;
    };
    if n < min {
        errors.push(FieldError::new(
            field,
            Location::Query,
            format!("\"{}\" must be larger than or equal to {}", field, min),
        ));
        return default;
    }
    if let Some(max) = max.filter(|max| n > *max) {
        errors.push(FieldError::new(
            field,
            Location::Query,
            format!("\"{}\" must be less than or equal to {}", field, max),
        ));
        return default;
    }
    n
}
