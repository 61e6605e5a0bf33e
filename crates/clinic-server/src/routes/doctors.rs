//! Doctor HTTP routes.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use clinic_core::{ClinicService, Doctor};

use super::{blocking, parse_payload, FetchReply, OutcomeReply, SearchParams, SearchReply};
use crate::error::ApiResult;

pub fn doctor_routes(service: ClinicService) -> Router {
    Router::new()
        .route("/doctors", get(list_doctors).post(create_doctor))
        .route("/doctors/search", get(search_doctors))
        .route(
            "/doctors/:id",
            get(get_doctor).put(update_doctor).delete(delete_doctor),
        )
        .with_state(service)
}

async fn list_doctors(State(service): State<ClinicService>) -> ApiResult<Json<Vec<Doctor>>> {
    Ok(Json(blocking(service, |s| s.list_doctors()).await?))
}

async fn search_doctors(
    State(service): State<ClinicService>,
    Query(params): Query<SearchParams>,
) -> ApiResult<SearchReply<Doctor>> {
    let rows = blocking(service, move |s| {
        s.search_doctors(params.first_name.as_deref(), params.last_name.as_deref())
    })
    .await?;
    Ok(SearchReply(rows))
}

async fn get_doctor(
    State(service): State<ClinicService>,
    Path(id): Path<String>,
) -> ApiResult<FetchReply<Doctor>> {
    Ok(FetchReply(blocking(service, move |s| s.get_doctor(&id)).await?))
}

async fn create_doctor(
    State(service): State<ClinicService>,
    body: Bytes,
) -> ApiResult<OutcomeReply> {
    let payload = parse_payload(&body);
    Ok(OutcomeReply(
        blocking(service, move |s| s.add_doctor(&payload)).await?,
    ))
}

async fn update_doctor(
    State(service): State<ClinicService>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<OutcomeReply> {
    let payload = parse_payload(&body);
    Ok(OutcomeReply(
        blocking(service, move |s| s.update_doctor(&id, &payload)).await?,
    ))
}

async fn delete_doctor(
    State(service): State<ClinicService>,
    Path(id): Path<String>,
) -> ApiResult<OutcomeReply> {
    Ok(OutcomeReply(
        blocking(service, move |s| s.delete_doctor(&id)).await?,
    ))
}
