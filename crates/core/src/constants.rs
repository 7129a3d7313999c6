//! Constants used throughout the intake core crate.
//!
//! Path and filename constants live here so the storage layout is defined in one place.

/// Default directory for customer data when no explicit directory is configured.
pub const DEFAULT_CUSTOMER_DATA_DIR: &str = "customer_data";

/// Directory (under the data dir) holding the sharded customer records.
pub const CUSTOMERS_DIR_NAME: &str = "customers";

/// Filename of the JSON document inside each customer directory.
pub const CUSTOMER_JSON_FILENAME: &str = "customer_data.json";

/// Filename of the appointment calendar (directly under the data dir).
pub const CALENDAR_JSON_FILENAME: &str = "calendar.json";

/// Number of calendar months between the service date and the follow-up date.
pub const FOLLOW_UP_MONTHS: u32 = 3;

/// How many fresh identifiers to try before giving up on allocating a record.
pub const MAX_ID_ATTEMPTS: usize = 5;

/// Default business UTC offset used for calendar days and business hours.
pub const DEFAULT_BUSINESS_UTC_OFFSET: &str = "-08:00";

/// First bookable hour (inclusive), business time.
pub const BUSINESS_START_HOUR: u32 = 7;

/// End of the business day (exclusive); the last slot starts one hour earlier.
pub const BUSINESS_END_HOUR: u32 = 21;

/// Length of one appointment.
pub const APPOINTMENT_DURATION_HOURS: i64 = 1;

/// Upper bound for bulk availability requests.
pub const MAX_BULK_DAYS: u32 = 60;
