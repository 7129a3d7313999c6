//! Appointment calendar endpoints.

use crate::error::{api_error, validation_error, ApiError};
use crate::AppState;
use api_shared::{
    AppointmentRes, AvailableSlotsRes, BookAppointmentReq, BulkAvailableSlotsRes,
    DayAppointmentsRes, ErrorRes, MessageRes,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Json,
};
use chrono::{NaiveDate, Utc};
use intake_core::{
    decode_json, format_date_time, Appointment, CalendarService, ClientId, FieldErrors,
};

fn parse_day(day: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| {
        validation_error(&FieldErrors::single(
            "day",
            "Invalid date format. Please use YYYY-MM-DD.",
        ))
    })
}

fn appointment_res(appointment: &Appointment) -> AppointmentRes {
    AppointmentRes {
        contact_id: appointment.contact_id.to_string(),
        start_time: format_date_time(&appointment.start_time),
        end_time: format_date_time(&appointment.end_time),
        booked_at: format_date_time(&appointment.booked_at),
    }
}

#[utoipa::path(
    get,
    path = "/appointments/{day}",
    params(("day" = String, Path, description = "Date as YYYY-MM-DD")),
    responses(
        (status = 200, description = "Appointments on the day", body = DayAppointmentsRes),
        (status = 400, description = "Malformed date", body = ErrorRes)
    )
)]
/// All appointments on one day, business time.
pub(crate) async fn day_appointments(
    State(state): State<AppState>,
    Path(day): Path<String>,
) -> Result<Json<DayAppointmentsRes>, ApiError> {
    let date = parse_day(&day)?;
    let appointments = state.calendar.appointments_for_day(date);
    Ok(Json(DayAppointmentsRes {
        date: date.to_string(),
        appointments: appointments.iter().map(appointment_res).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/appointments/available/{day}",
    params(("day" = String, Path, description = "Date as YYYY-MM-DD")),
    responses(
        (status = 200, description = "Free one-hour slots", body = AvailableSlotsRes),
        (status = 400, description = "Malformed date", body = ErrorRes)
    )
)]
pub(crate) async fn available_slots(
    State(state): State<AppState>,
    Path(day): Path<String>,
) -> Result<Json<AvailableSlotsRes>, ApiError> {
    let date = parse_day(&day)?;
    Ok(Json(AvailableSlotsRes {
        date: date.to_string(),
        available_slots: state.calendar.available_slots(date, Utc::now()),
    }))
}

#[utoipa::path(
    get,
    path = "/appointments/available/bulk/{days}",
    params(("days" = u32, Path, description = "Number of days from today, 1 to 60")),
    responses(
        (status = 200, description = "Free slots keyed by date", body = BulkAvailableSlotsRes),
        (status = 400, description = "Days out of range", body = ErrorRes)
    )
)]
pub(crate) async fn bulk_available_slots(
    State(state): State<AppState>,
    Path(days): Path<String>,
) -> Result<Json<BulkAvailableSlotsRes>, ApiError> {
    let days: u32 = days.parse().map_err(|_| {
        validation_error(&FieldErrors::single(
            "days",
            "Days in advance must be between 1 and 60.",
        ))
    })?;

    match state.calendar.bulk_available_slots(days, Utc::now()) {
        Ok(slots) => Ok(Json(BulkAvailableSlotsRes(
            slots
                .into_iter()
                .map(|(date, slots)| (date.to_string(), slots))
                .collect(),
        ))),
        Err(e) => Err(api_error("Bulk availability", e)),
    }
}

#[utoipa::path(
    post,
    path = "/appointments/book",
    request_body = BookAppointmentReq,
    responses(
        (status = 200, description = "Appointment booked", body = MessageRes),
        (status = 400, description = "Malformed body or contact id", body = ErrorRes),
        (status = 409, description = "Slot rejected", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Book a one-hour slot for a contact.
pub(crate) async fn book_appointment(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageRes>, ApiError> {
    let req: BookAppointmentReq =
        decode_json(&body).map_err(|errors| validation_error(&errors))?;
    let contact_id = ClientId::parse(&req.contact_id)
        .map_err(|e| validation_error(&FieldErrors::single("contact_id", e.to_string())))?;

    match state
        .calendar
        .book(contact_id, &req.start_time_iso, Utc::now())
    {
        Ok(appointment) => Ok(Json(MessageRes {
            message: CalendarService::confirmation_message(&appointment),
        })),
        Err(e) => Err(api_error("Book appointment", e)),
    }
}
