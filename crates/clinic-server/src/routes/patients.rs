//! Patient HTTP routes, plus the aggregate `/patients/all` view.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use clinic_core::{ClinicService, Patient, PatientAggregate};

use super::{blocking, parse_payload, FetchReply, OutcomeReply, SearchParams, SearchReply};
use crate::error::ApiResult;

pub fn patient_routes(service: ClinicService) -> Router {
    Router::new()
        .route("/patients", get(list_patients).post(create_patient))
        .route("/patients/all", get(list_patients_with_doctors_visits))
        .route("/patients/search", get(search_patients))
        .route(
            "/patients/:id",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .with_state(service)
}

async fn list_patients(State(service): State<ClinicService>) -> ApiResult<Json<Vec<Patient>>> {
    Ok(Json(blocking(service, |s| s.list_patients()).await?))
}

async fn list_patients_with_doctors_visits(
    State(service): State<ClinicService>,
) -> ApiResult<Json<Vec<PatientAggregate>>> {
    Ok(Json(
        blocking(service, |s| s.patients_with_doctors_visits()).await?,
    ))
}

async fn search_patients(
    State(service): State<ClinicService>,
    Query(params): Query<SearchParams>,
) -> ApiResult<SearchReply<Patient>> {
    let rows = blocking(service, move |s| {
        s.search_patients(params.first_name.as_deref(), params.last_name.as_deref())
    })
    .await?;
    Ok(SearchReply(rows))
}

async fn get_patient(
    State(service): State<ClinicService>,
    Path(id): Path<String>,
) -> ApiResult<FetchReply<Patient>> {
    Ok(FetchReply(blocking(service, move |s| s.get_patient(&id)).await?))
}

async fn create_patient(
    State(service): State<ClinicService>,
    body: Bytes,
) -> ApiResult<OutcomeReply> {
    let payload = parse_payload(&body);
    Ok(OutcomeReply(
        blocking(service, move |s| s.add_patient(&payload)).await?,
    ))
}

async fn update_patient(
    State(service): State<ClinicService>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<OutcomeReply> {
    let payload = parse_payload(&body);
    Ok(OutcomeReply(
        blocking(service, move |s| s.update_patient(&id, &payload)).await?,
    ))
}

async fn delete_patient(
    State(service): State<ClinicService>,
    Path(id): Path<String>,
) -> ApiResult<OutcomeReply> {
    Ok(OutcomeReply(
        blocking(service, move |s| s.delete_patient(&id)).await?,
    ))
}
