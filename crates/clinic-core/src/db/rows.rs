//! Row → model mapping for the statements built in [`crate::query`].

use rusqlite::types::Type;
use rusqlite::Row;
use serde::de::DeserializeOwned;

use crate::models::{Doctor, Gender, Patient, PatientAggregate, Visit};

fn gender_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Gender> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Decode a column holding JSON text (as produced by `json_group_array`).
fn json_at<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Columns: `id, first_name, last_name, date_of_birth, gender`.
pub fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        date_of_birth: row.get(3)?,
        gender: gender_at(row, 4)?,
    })
}

/// Columns: `id, first_name, last_name, specialization`.
pub fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        specialization: row.get(3)?,
    })
}

/// Columns: `id, patient_id, doctor_id, visit_date, diagnosis`.
pub fn visit_from_row(row: &Row<'_>) -> rusqlite::Result<Visit> {
    Ok(Visit {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        visit_date: row.get(3)?,
        diagnosis: row.get(4)?,
    })
}

/// Columns: patient columns, then `doctors` and `visits` as JSON arrays.
pub fn aggregate_from_row(row: &Row<'_>) -> rusqlite::Result<PatientAggregate> {
    Ok(PatientAggregate {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        date_of_birth: row.get(3)?,
        gender: gender_at(row, 4)?,
        doctors: json_at(row, 5)?,
        visits: json_at(row, 6)?,
    })
}
