//! Request and response bodies.
//!
//! These mirror the JSON the REST API speaks. Identifiers and date-times travel as strings:
//! client ids in their canonical 32-hex form, date-times as RFC 3339.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Plain `{"message": ...}` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

/// Customer intake form.
///
/// Every field is required. `service_date` is ISO-8601; without an offset it is read as UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateCustomerReq {
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "john@example.com")]
    pub email: String,
    #[schema(example = "555-0100")]
    pub phone_number: String,
    #[schema(example = "1 Main St")]
    pub address: String,
    #[schema(example = "2024-01-15T10:00:00Z")]
    pub service_date: String,
    #[schema(minimum = 0.0, example = 150.0)]
    pub quote_amount: f64,
    pub service_details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateCustomerRes {
    pub message: String,
    pub client_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorRes {
    pub field: String,
    pub reason: String,
}

/// Error body. `fields` is present for validation failures only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldErrorRes>,
}

impl ErrorRes {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JobRes {
    pub client_id: String,
    pub full_name: String,
    pub address: String,
    pub phone_number: String,
    pub last_service_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListJobsRes {
    pub jobs: Vec<JobRes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AppointmentRes {
    pub contact_id: String,
    pub start_time: String,
    pub end_time: String,
    pub booked_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DayAppointmentsRes {
    #[schema(example = "2024-03-01")]
    pub date: String,
    pub appointments: Vec<AppointmentRes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AvailableSlotsRes {
    #[schema(example = "2024-03-01")]
    pub date: String,
    pub available_slots: Vec<String>,
}

/// Available slots keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct BulkAvailableSlotsRes(pub BTreeMap<String, Vec<String>>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookAppointmentReq {
    pub contact_id: String,
    #[schema(example = "2024-03-01T10:00:00-08:00")]
    pub start_time_iso: String,
}
