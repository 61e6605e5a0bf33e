//! Request orchestration: validate, build the statement, persist.
//!
//! Each mutation is `validate(payload) && persist(statement)`; a payload that
//! fails validation never reaches the gateway. Reads skip validation apart
//! from id-format checks and hand rows back directly.

use std::sync::Arc;

use log::{info, warn};
use serde_json::Value;

use crate::db::{
    aggregate_from_row, doctor_from_row, patient_from_row, visit_from_row, DbResult, Gateway,
};
use crate::models::{Doctor, Patient, PatientAggregate, Visit};
use crate::query::{self, Statement};
use crate::schema::{Column, DoctorColumn, PatientColumn, VisitColumn};
use crate::validate;

/// Result of a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A record was inserted under this server-generated id.
    Created(String),
    /// An update or delete touched at least one row.
    Success,
    /// The id or payload failed validation; nothing was executed.
    Rejected,
    /// The statement ran but matched no rows.
    NotFound,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Created(_) | Outcome::Success)
    }

    fn from_affected(affected: bool) -> Self {
        if affected {
            Outcome::Success
        } else {
            Outcome::NotFound
        }
    }
}

/// Result of a lookup by id.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<T> {
    Found(T),
    NotFound,
    /// The id is not a UUID; nothing was queried.
    Rejected,
}

/// Patient, doctor and visit operations over a shared [`Gateway`].
#[derive(Clone)]
pub struct ClinicService {
    gateway: Arc<Gateway>,
}

impl ClinicService {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    // =========================================================================
    // Patients
    // =========================================================================

    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        self.gateway
            .query(&query::select_all::<PatientColumn>(), patient_from_row)
    }

    pub fn get_patient(&self, id: &str) -> DbResult<Fetch<Patient>> {
        self.fetch::<PatientColumn, _>(id, patient_from_row)
    }

    pub fn search_patients(
        &self,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> DbResult<Option<Vec<Patient>>> {
        query::search::<PatientColumn>(first_name, last_name)
            .map(|stmt| self.gateway.query(&stmt, patient_from_row))
            .transpose()
    }

    pub fn add_patient(&self, payload: &Value) -> DbResult<Outcome> {
        self.create::<PatientColumn>(payload, validate::is_full_patient)
    }

    pub fn update_patient(&self, id: &str, payload: &Value) -> DbResult<Outcome> {
        self.modify::<PatientColumn>(id, payload, validate::is_partial_patient)
    }

    pub fn delete_patient(&self, id: &str) -> DbResult<Outcome> {
        self.remove::<PatientColumn>(id)
    }

    /// Every patient with their distinct doctors and all visits.
    pub fn patients_with_doctors_visits(&self) -> DbResult<Vec<PatientAggregate>> {
        self.gateway
            .query(&query::patients_with_doctors_visits(), aggregate_from_row)
    }

    // =========================================================================
    // Doctors
    // =========================================================================

    pub fn list_doctors(&self) -> DbResult<Vec<Doctor>> {
        self.gateway
            .query(&query::select_all::<DoctorColumn>(), doctor_from_row)
    }

    pub fn get_doctor(&self, id: &str) -> DbResult<Fetch<Doctor>> {
        self.fetch::<DoctorColumn, _>(id, doctor_from_row)
    }

    pub fn search_doctors(
        &self,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> DbResult<Option<Vec<Doctor>>> {
        query::search::<DoctorColumn>(first_name, last_name)
            .map(|stmt| self.gateway.query(&stmt, doctor_from_row))
            .transpose()
    }

    pub fn add_doctor(&self, payload: &Value) -> DbResult<Outcome> {
        self.create::<DoctorColumn>(payload, validate::is_full_doctor)
    }

    pub fn update_doctor(&self, id: &str, payload: &Value) -> DbResult<Outcome> {
        self.modify::<DoctorColumn>(id, payload, validate::is_partial_doctor)
    }

    pub fn delete_doctor(&self, id: &str) -> DbResult<Outcome> {
        self.remove::<DoctorColumn>(id)
    }

    // =========================================================================
    // Visits (not exposed over HTTP)
    // =========================================================================

    pub fn add_visit(&self, payload: &Value) -> DbResult<Outcome> {
        self.create::<VisitColumn>(payload, validate::is_visit)
    }

    pub fn get_visit(&self, id: &str) -> DbResult<Fetch<Visit>> {
        self.fetch::<VisitColumn, _>(id, visit_from_row)
    }

    pub fn delete_visit(&self, id: &str) -> DbResult<Outcome> {
        self.remove::<VisitColumn>(id)
    }

    // =========================================================================
    // Shared pipeline
    // =========================================================================

    fn create<C: Column>(&self, payload: &Value, is_valid: fn(&Value) -> bool) -> DbResult<Outcome> {
        let values = match payload.as_object() {
            Some(map) if is_valid(payload) => query::values_from_payload::<C>(map),
            _ => None,
        };
        let Some(values) = values else {
            return Ok(rejected(C::TABLE, "insert"));
        };

        let id = uuid::Uuid::new_v4().to_string();
        let outcome = if self.gateway.execute(&query::insert::<C>(&id, values))? {
            Outcome::Created(id)
        } else {
            Outcome::NotFound
        };
        log_outcome(C::TABLE, "insert", &outcome);
        Ok(outcome)
    }

    fn modify<C: Column>(
        &self,
        id: &str,
        payload: &Value,
        is_valid: fn(&Value) -> bool,
    ) -> DbResult<Outcome> {
        if !validate::is_uuid(id) || !is_valid(payload) {
            return Ok(rejected(C::TABLE, "update"));
        }
        let changes = payload
            .as_object()
            .map(query::changes_from_payload::<C>)
            .unwrap_or_default();
        let Some(stmt) = query::update::<C>(id, &changes) else {
            return Ok(rejected(C::TABLE, "update"));
        };
        self.persist(C::TABLE, "update", &stmt)
    }

    fn remove<C: Column>(&self, id: &str) -> DbResult<Outcome> {
        if !validate::is_uuid(id) {
            return Ok(rejected(C::TABLE, "delete"));
        }
        self.persist(C::TABLE, "delete", &query::delete_by_id::<C>(id))
    }

    fn fetch<C: Column, T>(
        &self,
        id: &str,
        map: fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    ) -> DbResult<Fetch<T>> {
        if !validate::is_uuid(id) {
            return Ok(Fetch::Rejected);
        }
        Ok(self
            .gateway
            .query_one(&query::select_by_id::<C>(id), map)?
            .map_or(Fetch::NotFound, Fetch::Found))
    }

    fn persist(&self, table: &str, op: &str, stmt: &Statement) -> DbResult<Outcome> {
        let outcome = Outcome::from_affected(self.gateway.execute(stmt)?);
        log_outcome(table, op, &outcome);
        Ok(outcome)
    }
}

fn rejected(table: &str, op: &str) -> Outcome {
    warn!(
        "event={}_{} module=service status=rejected reason=validation",
        table, op
    );
    Outcome::Rejected
}

fn log_outcome(table: &str, op: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Created(id) => info!(
            "event={}_{} module=service status=ok id={}",
            table, op, id
        ),
        Outcome::Success => info!("event={}_{} module=service status=ok", table, op),
        Outcome::NotFound => warn!(
            "event={}_{} module=service status=not_found",
            table, op
        ),
        Outcome::Rejected => {}
    }
}
