//! Customer intake and read-side endpoints.

use crate::error::{api_error, validation_error, ApiError};
use crate::AppState;
use api_shared::{CreateCustomerReq, CreateCustomerRes, ErrorRes, JobRes, ListJobsRes};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use intake_core::{format_date_time, ClientId, CustomerSubmission, FieldErrors, Job};

fn job_res(job: &Job) -> JobRes {
    JobRes {
        client_id: job.client_id.to_string(),
        full_name: job.full_name.clone(),
        address: job.address.clone(),
        phone_number: job.phone_number.clone(),
        last_service_date: format_date_time(&job.last_service_date),
    }
}

#[utoipa::path(
    post,
    path = "/customer/create",
    request_body = CreateCustomerReq,
    responses(
        (status = 201, description = "Customer created", body = CreateCustomerRes),
        (status = 400, description = "Invalid submission", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Create a new customer record from an intake form submission.
///
/// The body is read raw so that malformed JSON and wrong field types come back as field-level
/// validation errors rather than a bare extractor rejection.
pub(crate) async fn create_customer(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateCustomerRes>), ApiError> {
    let submission =
        CustomerSubmission::from_json_slice(&body).map_err(|e| api_error("Create customer", e))?;

    match state.customers.create_customer(submission) {
        Ok(client_id) => Ok((
            StatusCode::CREATED,
            Json(CreateCustomerRes {
                message: "Customer created successfully".into(),
                client_id: client_id.to_string(),
            }),
        )),
        Err(e) => Err(api_error("Create customer", e)),
    }
}

#[utoipa::path(
    get,
    path = "/customer/{client_id}",
    params(
        ("client_id" = String, Path, description = "Canonical client id (32 lowercase hex)")
    ),
    responses(
        (status = 200, description = "Stored customer document, verbatim"),
        (status = 400, description = "Malformed client id", body = ErrorRes),
        (status = 404, description = "Unknown client id", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Return a customer record exactly as it was stored.
pub(crate) async fn get_customer(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let client_id = ClientId::parse(&client_id)
        .map_err(|e| validation_error(&FieldErrors::single("client_id", e.to_string())))?;

    match state.customers.get_customer(&client_id) {
        Ok(document) => Ok(([(header::CONTENT_TYPE, "application/json")], document)),
        Err(e) => Err(api_error("Get customer", e)),
    }
}

#[utoipa::path(
    get,
    path = "/jobs",
    responses(
        (status = 200, description = "All customers as jobs, most recent service first", body = ListJobsRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List every customer as a job.
pub(crate) async fn list_jobs(State(state): State<AppState>) -> Result<Json<ListJobsRes>, ApiError> {
    match state.customers.list_jobs() {
        Ok(jobs) => Ok(Json(ListJobsRes {
            jobs: jobs.iter().map(job_res).collect(),
        })),
        Err(e) => Err(api_error("List jobs", e)),
    }
}
