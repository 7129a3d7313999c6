//! # Intake Core
//!
//! Core business logic for the customer intake service.
//!
//! This crate contains pure data operations and file/folder management:
//! - Submission validation and customer record creation with sharded JSON storage
//! - Follow-up date arithmetic
//! - Read-side projections (single record, job list)
//! - The appointment calendar
//!
//! **No API concerns**: HTTP servers, CLIs, and wire DTOs belong in `api-rest`, `cli`, or
//! `api-shared`.

pub mod calendar;
pub mod config;
pub mod constants;
pub mod customer;
pub mod error;
pub mod follow_up;
pub mod service;
pub mod storage;
pub mod validation;

pub use calendar::{Appointment, BookingRejection, CalendarService};
pub use config::{business_offset_from_env_value, CoreConfig};
pub use customer::{
    format_date_time, parse_date_time, CustomerRecord, CustomerSubmission, Job,
    ValidatedSubmission,
};
pub use error::{IntakeError, IntakeResult};
pub use follow_up::follow_up_date;
pub use service::CustomerService;
pub use storage::{CustomerStore, FsCustomerStore, MemoryCustomerStore};
pub use validation::{decode_json, FieldError, FieldErrors};

pub use intake_types::{EmailAddress, NonEmptyText, TextError};
pub use intake_uuid::{ClientId, ClientIdGenerator, RandomClientIdGenerator};
