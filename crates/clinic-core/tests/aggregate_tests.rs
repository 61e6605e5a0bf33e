//! Aggregate join integration tests.

use std::sync::Arc;

use clinic_core::db::{Gateway, PoolConfig};
use clinic_core::service::{ClinicService, Outcome};
use clinic_core::PatientAggregate;
use serde_json::json;

fn setup() -> (tempfile::TempDir, ClinicService) {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Gateway::open(PoolConfig::new(dir.path().join("clinic.db"))).unwrap();
    (dir, ClinicService::new(Arc::new(gateway)))
}

fn created(outcome: Outcome) -> String {
    match outcome {
        Outcome::Created(id) => id,
        other => panic!("expected Created, got {:?}", other),
    }
}

fn add_patient(service: &ClinicService, first: &str, last: &str) -> String {
    created(
        service
            .add_patient(&json!({
                "first_name": first,
                "last_name": last,
                "date_of_birth": "1990-01-01",
                "gender": "Female"
            }))
            .unwrap(),
    )
}

fn add_doctor(service: &ClinicService, last: &str, specialization: &str) -> String {
    created(
        service
            .add_doctor(&json!({
                "first_name": "Dr",
                "last_name": last,
                "specialization": specialization
            }))
            .unwrap(),
    )
}

fn add_visit(service: &ClinicService, patient: &str, doctor: &str, date: &str, diagnosis: &str) {
    created(
        service
            .add_visit(&json!({
                "patient_id": patient,
                "doctor_id": doctor,
                "visit_date": date,
                "diagnosis": diagnosis
            }))
            .unwrap(),
    );
}

fn find<'a>(rows: &'a [PatientAggregate], id: &str) -> &'a PatientAggregate {
    rows.iter().find(|row| row.id == id).expect("patient in aggregate")
}

#[test]
fn test_patient_without_visits_has_empty_lists() {
    let (_dir, service) = setup();
    let id = add_patient(&service, "Lonely", "Patient");

    let rows = service.patients_with_doctors_visits().unwrap();
    let row = find(&rows, &id);
    assert!(row.doctors.is_empty());
    assert!(row.visits.is_empty());

    let value = serde_json::to_value(row).unwrap();
    assert_eq!(value["doctors"], json!([]));
    assert_eq!(value["visits"], json!([]));
}

#[test]
fn test_repeat_visits_do_not_duplicate_doctor() {
    let (_dir, service) = setup();
    let patient = add_patient(&service, "Repeat", "Visitor");
    let doctor = add_doctor(&service, "House", "Diagnostics");

    add_visit(&service, &patient, &doctor, "2024-01-01", "Flu");
    add_visit(&service, &patient, &doctor, "2024-02-01", "Cold");

    let rows = service.patients_with_doctors_visits().unwrap();
    let row = find(&rows, &patient);
    assert_eq!(row.doctors.len(), 1);
    assert_eq!(row.doctors[0].id, doctor);
    assert_eq!(row.doctors[0].specialization, "Diagnostics");
    assert_eq!(row.visits.len(), 2);

    let mut diagnoses: Vec<_> = row.visits.iter().map(|v| v.diagnosis.as_str()).collect();
    diagnoses.sort();
    assert_eq!(diagnoses, vec!["Cold", "Flu"]);
}

#[test]
fn test_many_doctors_many_visits_has_no_cross_product() {
    let (_dir, service) = setup();
    let patient = add_patient(&service, "Busy", "Patient");
    let other = add_patient(&service, "Other", "Patient");
    let house = add_doctor(&service, "House", "Diagnostics");
    let wilson = add_doctor(&service, "Wilson", "Oncology");

    add_visit(&service, &patient, &house, "2024-01-01", "A");
    add_visit(&service, &patient, &house, "2024-01-02", "B");
    add_visit(&service, &patient, &wilson, "2024-01-03", "C");
    add_visit(&service, &other, &wilson, "2024-01-04", "D");

    let rows = service.patients_with_doctors_visits().unwrap();
    assert_eq!(rows.len(), 2);

    let busy = find(&rows, &patient);
    assert_eq!(busy.doctors.len(), 2);
    assert_eq!(busy.visits.len(), 3);

    let other_row = find(&rows, &other);
    assert_eq!(other_row.doctors.len(), 1);
    assert_eq!(other_row.doctors[0].last_name, "Wilson");
    assert_eq!(other_row.visits.len(), 1);
    assert_eq!(other_row.visits[0].visit_date, "2024-01-04");
}

#[test]
fn test_deleting_patient_removes_their_visits() {
    let (_dir, service) = setup();
    let patient = add_patient(&service, "Gone", "Soon");
    let doctor = add_doctor(&service, "House", "Diagnostics");
    add_visit(&service, &patient, &doctor, "2024-01-01", "Flu");

    assert_eq!(service.delete_patient(&patient).unwrap(), Outcome::Success);
    assert!(service.patients_with_doctors_visits().unwrap().is_empty());
    assert_eq!(service.list_doctors().unwrap().len(), 1);
}
