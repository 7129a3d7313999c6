//! # API REST
//!
//! REST API implementation for the customer intake service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS, request tracing)
//!
//! Uses `api-shared` for wire types and `intake-core` for all business logic.

#![warn(rust_2018_idioms)]

mod appointments;
mod customers;
pub mod error;

use api_shared::{
    AppointmentRes, AvailableSlotsRes, BookAppointmentReq, BulkAvailableSlotsRes,
    CreateCustomerReq, CreateCustomerRes, DayAppointmentsRes, ErrorRes, FieldErrorRes,
    HealthRes, HealthService, JobRes, ListJobsRes, MessageRes,
};
use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use intake_core::{CalendarService, CoreConfig, CustomerService};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared by all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub customers: CustomerService,
    pub calendar: Arc<CalendarService>,
}

impl AppState {
    pub fn new(customers: CustomerService, calendar: Arc<CalendarService>) -> Self {
        Self {
            customers,
            calendar,
        }
    }

    /// Filesystem-backed services rooted at the configured data directory.
    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::new(
            CustomerService::from_config(cfg),
            Arc::new(CalendarService::from_config(cfg)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        root,
        health,
        customers::create_customer,
        customers::get_customer,
        customers::list_jobs,
        appointments::day_appointments,
        appointments::available_slots,
        appointments::bulk_available_slots,
        appointments::book_appointment,
    ),
    components(schemas(
        HealthRes,
        MessageRes,
        ErrorRes,
        FieldErrorRes,
        CreateCustomerReq,
        CreateCustomerRes,
        JobRes,
        ListJobsRes,
        AppointmentRes,
        DayAppointmentsRes,
        AvailableSlotsRes,
        BulkAvailableSlotsRes,
        BookAppointmentReq,
    ))
)]
pub struct ApiDoc;

/// Builds the router with every endpoint, Swagger UI, CORS, and request tracing.
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/customer/create", post(customers::create_customer))
        .route("/customer/:client_id", get(customers::get_customer))
        .route("/jobs", get(customers::list_jobs))
        .route("/appointments/book", post(appointments::book_appointment))
        .route(
            "/appointments/available/bulk/:days",
            get(appointments::bulk_available_slots),
        )
        .route(
            "/appointments/available/:day",
            get(appointments::available_slots),
        )
        .route("/appointments/:day", get(appointments::day_appointments))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Welcome message", body = MessageRes)
    )
)]
async fn root() -> Json<MessageRes> {
    Json(MessageRes {
        message: "Welcome to the Customer Intake API".into(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}
