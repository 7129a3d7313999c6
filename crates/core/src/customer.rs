//! Customer intake submission, stored record, and job projection.
//!
//! A [`CustomerSubmission`] is the loosely typed wire shape: every field optional so that a
//! missing field is reported by validation rather than by the JSON decoder. Validation runs
//! in one declarative pass (`validator` derive) that names every offending field; the
//! accepted submission then converts into a [`ValidatedSubmission`] holding typed values. A [`CustomerRecord`] is what gets written.

use crate::follow_up::follow_up_date;
use crate::validation::{decode_json, FieldErrors};
use crate::{IntakeError, IntakeResult};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, SecondsFormat};
use intake_types::{EmailAddress, NonEmptyText, TextError};
use intake_uuid::ClientId;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Intake form fields as submitted by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CustomerSubmission {
    #[validate(required, custom(function = "not_blank"))]
    pub first_name: Option<String>,
    #[validate(required, custom(function = "not_blank"))]
    pub last_name: Option<String>,
    #[validate(required, custom(function = "email_address"))]
    pub email: Option<String>,
    #[validate(required, custom(function = "not_blank"))]
    pub phone_number: Option<String>,
    #[validate(required, custom(function = "not_blank"))]
    pub address: Option<String>,
    #[validate(required, custom(function = "service_date_time"))]
    pub service_date: Option<String>,
    #[validate(required, range(min = 0.0))]
    pub quote_amount: Option<f64>,
    #[validate(required, custom(function = "not_blank"))]
    pub service_details: Option<String>,
}

/// A submission that passed validation, with typed fields and the derived follow-up date.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSubmission {
    pub first_name: NonEmptyText,
    pub last_name: NonEmptyText,
    pub email: EmailAddress,
    pub phone_number: NonEmptyText,
    pub address: NonEmptyText,
    pub service_date: DateTime<FixedOffset>,
    pub quote_amount: f64,
    pub service_details: NonEmptyText,
    pub follow_up_date: DateTime<FixedOffset>,
}

/// Last year RFC 3339 can carry; chrono writes later years as `+YYYYY`, which it cannot
/// read back.
const LAST_DOCUMENT_YEAR: i32 = 9999;

impl CustomerSubmission {
    /// Decodes a request body.
    ///
    /// Wrong JSON types are reported against the offending field path; a body that is not
    /// JSON at all, or has anything after the object, is reported against `body`. Unknown
    /// fields are ignored.
    pub fn from_json_slice(body: &[u8]) -> IntakeResult<Self> {
        decode_json(body).map_err(IntakeError::Validation)
    }

    /// Validates every field and converts into typed values.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Validation`] naming every offending field.
    pub fn validate_into(self) -> IntakeResult<ValidatedSubmission> {
        self.validate().map_err(FieldErrors::from)?;

        // Every field has been accepted above; these only move values into their types.
        let raw_service_date = required("service_date", self.service_date)?;
        let service_date = parse_date_time(&raw_service_date)
            .ok_or_else(|| rejected("service_date", "must be an ISO-8601 date-time"))?;
        let follow_up_date = storable_follow_up(service_date)
            .ok_or_else(|| rejected("service_date", "follow-up date is out of range"))?;
        let email = EmailAddress::parse(required("email", self.email)?)
            .map_err(|e| rejected("email", e.to_string()))?;

        Ok(ValidatedSubmission {
            first_name: text("first_name", self.first_name)?,
            last_name: text("last_name", self.last_name)?,
            email,
            phone_number: text("phone_number", self.phone_number)?,
            address: text("address", self.address)?,
            service_date,
            quote_amount: required("quote_amount", self.quote_amount)?,
            service_details: text("service_details", self.service_details)?,
            follow_up_date,
        })
    }
}

fn rejected(field: &str, reason: impl Into<String>) -> IntakeError {
    IntakeError::Validation(FieldErrors::single(field, reason))
}

fn required<T>(field: &str, value: Option<T>) -> IntakeResult<T> {
    value.ok_or_else(|| rejected(field, "field is required"))
}

fn text(field: &str, value: Option<String>) -> IntakeResult<NonEmptyText> {
    NonEmptyText::new(required(field, value)?).map_err(|e| rejected(field, e.to_string()))
}

/// Follow-up date for `service_date`, if it can be written to and read back from a document.
fn storable_follow_up(service_date: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    follow_up_date(service_date).filter(|d| (0..=LAST_DOCUMENT_YEAR).contains(&d.year()))
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("blank", "must not be blank"));
    }
    Ok(())
}

/// Same rule as [`EmailAddress::parse`]: surrounding whitespace is dropped before the check.
fn email_address(value: &str) -> Result<(), ValidationError> {
    match EmailAddress::parse(value) {
        Ok(_) => Ok(()),
        Err(TextError::Empty) => Err(invalid("blank", "must not be blank")),
        Err(_) => Err(invalid("email", "must be a valid email address")),
    }
}

fn service_date_time(value: &str) -> Result<(), ValidationError> {
    let Some(service_date) = parse_date_time(value) else {
        return Err(invalid("iso8601", "must be an ISO-8601 date-time"));
    };
    if storable_follow_up(service_date).is_none() {
        return Err(invalid("follow_up_range", "follow-up date is out of range"));
    }
    Ok(())
}

/// Parses an ISO-8601 date-time.
///
/// RFC 3339 with an explicit offset keeps that offset. A date-time without an offset is read
/// as UTC.
pub fn parse_date_time(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed);
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    let utc = FixedOffset::east_opt(0)?;
    Some(DateTime::from_naive_utc_and_offset(naive, utc))
}

/// Renders a date-time as RFC 3339, writing a zero offset as `Z`.
pub fn format_date_time(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Serde adapter for [`format_date_time`] / [`parse_date_time`].
pub(crate) mod iso8601 {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_date_time(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_date_time(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date-time: '{}'", raw)))
    }
}

/// The persisted customer document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub client_id: ClientId,
    pub first_name: NonEmptyText,
    pub last_name: NonEmptyText,
    pub email: EmailAddress,
    pub phone_number: NonEmptyText,
    pub address: NonEmptyText,
    #[serde(with = "iso8601")]
    pub service_date: DateTime<FixedOffset>,
    pub quote_amount: f64,
    pub service_details: NonEmptyText,
    #[serde(with = "iso8601")]
    pub follow_up_date: DateTime<FixedOffset>,
}

impl CustomerRecord {
    pub fn new(client_id: ClientId, submission: ValidatedSubmission) -> Self {
        Self {
            client_id,
            first_name: submission.first_name,
            last_name: submission.last_name,
            email: submission.email,
            phone_number: submission.phone_number,
            address: submission.address,
            service_date: submission.service_date,
            quote_amount: submission.quote_amount,
            service_details: submission.service_details,
            follow_up_date: submission.follow_up_date,
        }
    }

    /// Renders the record as the pretty JSON document stored on disk.
    pub fn to_document(&self) -> IntakeResult<String> {
        serde_json::to_string_pretty(self).map_err(IntakeError::Serialization)
    }

    pub fn from_document(document: &str) -> IntakeResult<Self> {
        serde_json::from_str(document).map_err(IntakeError::Deserialization)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// List projection of a customer record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub client_id: ClientId,
    pub full_name: String,
    pub address: String,
    pub phone_number: String,
    #[serde(with = "iso8601")]
    pub last_service_date: DateTime<FixedOffset>,
}

impl From<&CustomerRecord> for Job {
    fn from(record: &CustomerRecord) -> Self {
        Self {
            client_id: record.client_id,
            full_name: record.full_name(),
            address: record.address.to_string(),
            phone_number: record.phone_number.to_string(),
            last_service_date: record.service_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn john_doe() -> serde_json::Value {
        json!({
            "first_name": "John",
            "last_name": "Doe",
            "email": "john@example.com",
            "phone_number": "555-0100",
            "address": "1 Main St",
            "service_date": "2024-01-15T10:00:00Z",
            "quote_amount": 150.0,
            "service_details": "Window cleaning"
        })
    }

    fn submission(value: serde_json::Value) -> CustomerSubmission {
        CustomerSubmission::from_json_slice(value.to_string().as_bytes()).unwrap()
    }

    fn field_errors(err: IntakeError) -> FieldErrors {
        match err {
            IntakeError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_submission_converts() {
        let validated = submission(john_doe()).validate_into().unwrap();
        assert_eq!(validated.first_name.as_str(), "John");
        assert_eq!(validated.email.as_str(), "john@example.com");
        assert_eq!(
            validated.follow_up_date,
            DateTime::parse_from_rfc3339("2024-04-15T10:00:00Z").unwrap()
        );
    }

    #[test]
    fn test_missing_email_is_reported() {
        let mut body = john_doe();
        body.as_object_mut().unwrap().remove("email");

        let errors = field_errors(submission(body).validate_into().unwrap_err());
        assert_eq!(errors.fields(), vec!["email"]);
    }

    #[test]
    fn test_negative_quote_is_reported() {
        let mut body = john_doe();
        body["quote_amount"] = json!(-10);

        let errors = field_errors(submission(body).validate_into().unwrap_err());
        assert_eq!(errors.fields(), vec!["quote_amount"]);
    }

    #[test]
    fn test_every_offending_field_is_named() {
        let body = json!({
            "first_name": "   ",
            "email": "not-an-email",
            "service_date": "next tuesday",
            "quote_amount": 10
        });

        let errors = field_errors(submission(body).validate_into().unwrap_err());
        for field in [
            "address",
            "email",
            "first_name",
            "last_name",
            "phone_number",
            "service_date",
            "service_details",
        ] {
            assert!(errors.contains(field), "missing {field} in {errors}");
        }
        assert!(!errors.contains("quote_amount"));
    }

    #[test]
    fn test_wrong_json_type_names_field() {
        let mut body = john_doe();
        body["quote_amount"] = json!("a lot");

        let err = CustomerSubmission::from_json_slice(body.to_string().as_bytes()).unwrap_err();
        assert_eq!(field_errors(err).fields(), vec!["quote_amount"]);
    }

    #[test]
    fn test_non_json_body_is_reported_against_body() {
        let err = CustomerSubmission::from_json_slice(b"first_name=John").unwrap_err();
        assert_eq!(field_errors(err).fields(), vec!["body"]);
    }

    #[test]
    fn test_trailing_text_after_object_is_reported_against_body() {
        let mut body = john_doe().to_string().into_bytes();
        body.extend_from_slice(b" GARBAGE");

        let err = CustomerSubmission::from_json_slice(&body).unwrap_err();
        assert_eq!(field_errors(err).fields(), vec!["body"]);
    }

    #[test]
    fn test_trailing_whitespace_is_accepted() {
        let body = format!("{}\n  ", john_doe());
        assert!(CustomerSubmission::from_json_slice(body.as_bytes()).is_ok());
    }

    #[test]
    fn test_follow_up_past_year_9999_is_rejected() {
        let mut body = john_doe();
        body["service_date"] = json!("9999-11-15T10:00:00Z");

        let errors = field_errors(submission(body).validate_into().unwrap_err());
        assert_eq!(errors.fields(), vec!["service_date"]);
    }

    #[test]
    fn test_latest_storable_follow_up_round_trips() {
        let mut body = john_doe();
        body["service_date"] = json!("9999-09-30T10:00:00Z");

        let id = ClientId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let record = CustomerRecord::new(id, submission(body).validate_into().unwrap());
        let document = record.to_document().unwrap();

        assert!(document.contains("\"follow_up_date\": \"9999-12-30T10:00:00Z\""));
        assert_eq!(CustomerRecord::from_document(&document).unwrap(), record);
    }

    #[test]
    fn test_email_is_trimmed_like_other_text() {
        let mut body = john_doe();
        body["email"] = json!(" john@example.com ");

        let validated = submission(body).validate_into().unwrap();
        assert_eq!(validated.email.as_str(), "john@example.com");
    }

    #[test]
    fn test_blank_email_is_reported() {
        let mut body = john_doe();
        body["email"] = json!("   ");

        let errors = field_errors(submission(body).validate_into().unwrap_err());
        assert_eq!(errors.fields(), vec!["email"]);
    }

    #[test]
    fn test_text_is_trimmed() {
        let mut body = john_doe();
        body["first_name"] = json!("  John  ");

        let validated = submission(body).validate_into().unwrap();
        assert_eq!(validated.first_name.as_str(), "John");
    }

    #[test]
    fn test_parse_date_time_forms() {
        let with_offset = parse_date_time("2024-01-15T10:00:00-08:00").unwrap();
        assert_eq!(with_offset.offset().local_minus_utc(), -8 * 3600);

        let naive = parse_date_time("2024-01-15T10:00:00.250").unwrap();
        assert_eq!(naive.offset().local_minus_utc(), 0);
        assert_eq!(naive.timestamp_subsec_millis(), 250);

        assert!(parse_date_time("2024-01-15").is_none());
        assert!(parse_date_time("2024-13-01T00:00:00Z").is_none());
    }

    #[test]
    fn test_record_document_shape() {
        let id = ClientId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let record = CustomerRecord::new(id, submission(john_doe()).validate_into().unwrap());
        let document = record.to_document().unwrap();
        let value: serde_json::Value = serde_json::from_str(&document).unwrap();

        assert_eq!(value["client_id"], "550e8400e29b41d4a716446655440000");
        assert_eq!(value["service_date"], "2024-01-15T10:00:00Z");
        assert_eq!(value["follow_up_date"], "2024-04-15T10:00:00Z");
        assert_eq!(value["quote_amount"], 150.0);
        assert_eq!(CustomerRecord::from_document(&document).unwrap(), record);
    }

    #[test]
    fn test_job_projection() {
        let id = ClientId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let record = CustomerRecord::new(id, submission(john_doe()).validate_into().unwrap());
        let job = Job::from(&record);

        assert_eq!(job.full_name, "John Doe");
        assert_eq!(job.last_service_date, record.service_date);
    }
}
