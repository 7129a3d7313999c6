//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Request handling never reads process-wide environment variables, which keeps behaviour
//! consistent across threads and test harnesses.

use crate::constants::{
    CALENDAR_JSON_FILENAME, CUSTOMERS_DIR_NAME, DEFAULT_BUSINESS_UTC_OFFSET,
};
use crate::{IntakeError, IntakeResult};
use chrono::FixedOffset;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    customer_data_dir: PathBuf,
    business_offset: FixedOffset,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidInput`] if `customer_data_dir` is empty.
    pub fn new(customer_data_dir: PathBuf, business_offset: FixedOffset) -> IntakeResult<Self> {
        if customer_data_dir.as_os_str().is_empty() {
            return Err(IntakeError::InvalidInput(
                "customer_data_dir cannot be empty".into(),
            ));
        }

        Ok(Self {
            customer_data_dir,
            business_offset,
        })
    }

    pub fn customer_data_dir(&self) -> &Path {
        &self.customer_data_dir
    }

    /// Root of the sharded customer records.
    pub fn customers_dir(&self) -> PathBuf {
        self.customer_data_dir.join(CUSTOMERS_DIR_NAME)
    }

    pub fn calendar_file(&self) -> PathBuf {
        self.customer_data_dir.join(CALENDAR_JSON_FILENAME)
    }

    pub fn business_offset(&self) -> FixedOffset {
        self.business_offset
    }
}

/// Parse the business UTC offset from an optional string value such as `"-08:00"`.
///
/// If `value` is `None` or empty/whitespace, returns the default offset.
pub fn business_offset_from_env_value(value: Option<String>) -> IntakeResult<FixedOffset> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BUSINESS_UTC_OFFSET.to_string());

    value.parse::<FixedOffset>().map_err(|e| {
        IntakeError::InvalidInput(format!(
            "BUSINESS_UTC_OFFSET must look like '-08:00', got '{}': {}",
            value, e
        ))
    })
}
