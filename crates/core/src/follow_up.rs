//! Follow-up date arithmetic.

use crate::constants::FOLLOW_UP_MONTHS;
use chrono::{DateTime, FixedOffset, Months};

/// Returns the follow-up date for a service performed at `service_date`.
///
/// The date is advanced by [`FOLLOW_UP_MONTHS`] calendar months. When the target month is
/// shorter than the source day, the day is clamped to the target month's last day
/// (January 31 becomes April 30). Time of day and UTC offset are unchanged.
///
/// Returns `None` only when the result would fall outside chrono's representable range.
pub fn follow_up_date(service_date: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    service_date.checked_add_months(Months::new(FOLLOW_UP_MONTHS))
}
