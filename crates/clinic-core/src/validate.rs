//! Payload validators.
//!
//! Every validator is a pure predicate: it never panics, never mutates its
//! input and answers `false` for anything that is not a JSON object of the
//! expected shape. Extra keys are ignored rather than rejected.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::models::Gender;
use crate::schema::EntityKind;

const UUID_MASK: &str =
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";

const DATE_FORMAT: &str = "%Y-%m-%d";

static UUID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(UUID_MASK).expect("UUID mask is valid"));

/// True iff `value` is a 36-character hex-dash UUID (any case).
pub fn is_uuid(value: &str) -> bool {
    UUID_RE.is_match(value)
}

/// [`is_uuid`] over an arbitrary JSON value; non-strings are rejected.
pub fn is_uuid_value(value: &Value) -> bool {
    value.as_str().is_some_and(is_uuid)
}

/// True iff `value` is a calendar date written exactly as `YYYY-MM-DD`.
///
/// No range check is applied; past and future dates are both accepted.
/// chrono tolerates a signed year and space-padded fields, so the shape is
/// pinned to ten ASCII digits and dashes before parsing.
pub fn is_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
        && NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok()
}

/// True iff `value` is exactly `"Male"` or `"Female"`.
pub fn is_gender(value: &Value) -> bool {
    value.as_str().is_some_and(|s| s.parse::<Gender>().is_ok())
}

fn is_string(value: &Value) -> bool {
    value.is_string()
}

fn is_date_value(value: &Value) -> bool {
    value.as_str().is_some_and(is_date)
}

fn has_all(map: &Map<String, Value>, kind: EntityKind) -> bool {
    kind.required_fields().iter().all(|key| map.contains_key(*key))
}

fn has_any(map: &Map<String, Value>, kind: EntityKind) -> bool {
    kind.required_fields().iter().any(|key| map.contains_key(*key))
}

/// Field-level check for one patient key. Unknown keys pass.
fn patient_field_ok(key: &str, value: &Value) -> bool {
    match key {
        "first_name" | "last_name" => is_string(value),
        "date_of_birth" => is_date_value(value),
        "gender" => is_gender(value),
        _ => true,
    }
}

/// Field-level check for one doctor key. Unknown keys pass.
fn doctor_field_ok(key: &str, value: &Value) -> bool {
    match key {
        "first_name" | "last_name" | "specialization" => is_string(value),
        _ => true,
    }
}

/// Field-level check for one visit key. Unknown keys pass.
fn visit_field_ok(key: &str, value: &Value) -> bool {
    match key {
        "patient_id" | "doctor_id" | "diagnosis" => is_string(value),
        "visit_date" => is_date_value(value),
        _ => true,
    }
}

fn all_fields_ok(map: &Map<String, Value>, check: fn(&str, &Value) -> bool) -> bool {
    map.iter().all(|(key, value)| check(key, value))
}

/// A complete patient record: all four fields present and well-formed.
pub fn is_full_patient(payload: &Value) -> bool {
    payload.as_object().is_some_and(|map| {
        has_all(map, EntityKind::Patient) && all_fields_ok(map, patient_field_ok)
    })
}

/// A patient update: at least one patient field, every present one well-formed.
pub fn is_partial_patient(payload: &Value) -> bool {
    payload.as_object().is_some_and(|map| {
        has_any(map, EntityKind::Patient) && all_fields_ok(map, patient_field_ok)
    })
}

/// A complete doctor record.
pub fn is_full_doctor(payload: &Value) -> bool {
    payload.as_object().is_some_and(|map| {
        has_all(map, EntityKind::Doctor) && all_fields_ok(map, doctor_field_ok)
    })
}

/// A doctor update: at least one doctor field, every present one a string.
pub fn is_partial_doctor(payload: &Value) -> bool {
    payload.as_object().is_some_and(|map| {
        has_any(map, EntityKind::Doctor) && all_fields_ok(map, doctor_field_ok)
    })
}

/// A complete visit record.
pub fn is_visit(payload: &Value) -> bool {
    payload
        .as_object()
        .is_some_and(|map| has_all(map, EntityKind::Visit) && all_fields_ok(map, visit_field_ok))
}
