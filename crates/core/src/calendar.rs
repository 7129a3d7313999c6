//! Appointment calendar.
//!
//! One-hour appointments on the hour, within business hours, evaluated in a fixed business
//! UTC offset. All appointments live in a single `calendar.json` array; a missing or
//! unreadable file is an empty calendar.
//!
//! Operations take `now` explicitly so that availability and "in the past" checks are
//! deterministic under test. Callers pass `Utc::now()`.

use crate::constants::{
    APPOINTMENT_DURATION_HOURS, BUSINESS_END_HOUR, BUSINESS_START_HOUR, MAX_BULK_DAYS,
};
use crate::customer::{iso8601, parse_date_time};
use crate::validation::FieldErrors;
use crate::{IntakeError, IntakeResult};
use chrono::{
    DateTime, Days, Duration, FixedOffset, NaiveDate, SecondsFormat, TimeZone, Timelike, Utc,
};
use intake_uuid::ClientId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// A booked appointment as stored in `calendar.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub contact_id: ClientId,
    #[serde(with = "iso8601")]
    pub start_time: DateTime<FixedOffset>,
    #[serde(with = "iso8601")]
    pub end_time: DateTime<FixedOffset>,
    #[serde(with = "iso8601")]
    pub booked_at: DateTime<FixedOffset>,
}

/// Why a booking request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingRejection {
    InvalidDateTime,
    NotOnTheHour,
    OutsideBusinessHours,
    InThePast,
    SlotTaken,
}

impl fmt::Display for BookingRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            BookingRejection::InvalidDateTime => "Invalid ISO date format provided.",
            BookingRejection::NotOnTheHour => "Appointments can only be booked on the hour.",
            BookingRejection::OutsideBusinessHours => {
                "The requested time is outside of business hours."
            }
            BookingRejection::InThePast => "Cannot book appointments in the past.",
            BookingRejection::SlotTaken => "The requested time slot is not available.",
        };
        f.write_str(message)
    }
}

pub struct CalendarService {
    path: PathBuf,
    offset: FixedOffset,
    booking: Mutex<()>,
}

impl fmt::Debug for CalendarService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarService")
            .field("path", &self.path)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl CalendarService {
    pub fn new(path: impl Into<PathBuf>, offset: FixedOffset) -> Self {
        Self {
            path: path.into(),
            offset,
            booking: Mutex::new(()),
        }
    }

    pub fn from_config(cfg: &crate::CoreConfig) -> Self {
        Self::new(cfg.calendar_file(), cfg.business_offset())
    }

    /// Appointments starting on `date` (business time), ordered by start.
    pub fn appointments_for_day(&self, date: NaiveDate) -> Vec<Appointment> {
        let mut day: Vec<Appointment> = self
            .load()
            .into_iter()
            .filter(|a| a.start_time.with_timezone(&self.offset).date_naive() == date)
            .collect();
        day.sort_by_key(|a| a.start_time);
        day
    }

    /// Free slot start times on `date`, as RFC 3339 strings in the business offset.
    ///
    /// Only slots strictly after `now` are offered.
    pub fn available_slots(&self, date: NaiveDate, now: DateTime<Utc>) -> Vec<String> {
        let booked: HashSet<DateTime<Utc>> = self
            .appointments_for_day(date)
            .iter()
            .map(|a| a.start_time.with_timezone(&Utc))
            .collect();

        (BUSINESS_START_HOUR..BUSINESS_END_HOUR)
            .filter_map(|hour| self.slot_start(date, hour))
            .filter(|slot| slot.with_timezone(&Utc) > now)
            .filter(|slot| !booked.contains(&slot.with_timezone(&Utc)))
            .map(|slot| slot.to_rfc3339_opts(SecondsFormat::Secs, true))
            .collect()
    }

    /// Free slots for `days` consecutive days starting today (business time).
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Validation`] if `days` is not within `1..=60`.
    pub fn bulk_available_slots(
        &self,
        days: u32,
        now: DateTime<Utc>,
    ) -> IntakeResult<BTreeMap<NaiveDate, Vec<String>>> {
        if !(1..=MAX_BULK_DAYS).contains(&days) {
            return Err(IntakeError::Validation(FieldErrors::single(
                "days",
                format!("must be between 1 and {}", MAX_BULK_DAYS),
            )));
        }

        let today = now.with_timezone(&self.offset).date_naive();
        Ok((0..days)
            .filter_map(|i| today.checked_add_days(Days::new(u64::from(i))))
            .map(|date| (date, self.available_slots(date, now)))
            .collect())
    }

    /// Books the slot starting at `start_time` for `contact_id`.
    ///
    /// Returns the stored appointment. Bookings are serialised so that two concurrent
    /// requests cannot both take the same slot.
    ///
    /// # Errors
    ///
    /// - [`IntakeError::BookingRejected`] if the time is unparseable, not on the hour,
    ///   outside business hours, in the past, or already booked.
    /// - A storage error if `calendar.json` cannot be written.
    pub fn book(
        &self,
        contact_id: ClientId,
        start_time: &str,
        now: DateTime<Utc>,
    ) -> IntakeResult<Appointment> {
        let start = parse_date_time(start_time)
            .ok_or(IntakeError::BookingRejected(BookingRejection::InvalidDateTime))?
            .with_timezone(&self.offset);

        if start.minute() != 0 || start.second() != 0 || start.nanosecond() != 0 {
            return Err(IntakeError::BookingRejected(BookingRejection::NotOnTheHour));
        }
        if !(BUSINESS_START_HOUR..BUSINESS_END_HOUR).contains(&start.hour()) {
            return Err(IntakeError::BookingRejected(
                BookingRejection::OutsideBusinessHours,
            ));
        }
        if start.with_timezone(&Utc) < now {
            return Err(IntakeError::BookingRejected(BookingRejection::InThePast));
        }

        let _guard = self
            .booking
            .lock()
            .map_err(|_| IntakeError::StoreUnavailable("calendar lock poisoned".into()))?;

        let mut appointments = self.load();
        if appointments.iter().any(|a| a.start_time == start) {
            return Err(IntakeError::BookingRejected(BookingRejection::SlotTaken));
        }

        let appointment = Appointment {
            contact_id,
            start_time: start,
            end_time: start + Duration::hours(APPOINTMENT_DURATION_HOURS),
            booked_at: now.with_timezone(&self.offset),
        };
        appointments.push(appointment.clone());
        self.save(&appointments)?;

        tracing::info!(%contact_id, start = %start, "appointment booked");
        Ok(appointment)
    }

    /// Confirmation text for a stored appointment.
    pub fn confirmation_message(appointment: &Appointment) -> String {
        format!(
            "Appointment successfully booked for {} at {}.",
            appointment.contact_id,
            appointment.start_time.format("%Y-%m-%d %I:%M %p UTC%:z")
        )
    }

    fn slot_start(&self, date: NaiveDate, hour: u32) -> Option<DateTime<FixedOffset>> {
        let naive = date.and_hms_opt(hour, 0, 0)?;
        self.offset.from_local_datetime(&naive).single()
    }

    fn load(&self) -> Vec<Appointment> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "calendar unreadable, treating as empty: {}", e);
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(appointments) => appointments,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "calendar corrupt, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    fn save(&self, appointments: &[Appointment]) -> IntakeResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(IntakeError::StorageDirCreation)?;

        let json =
            serde_json::to_string_pretty(appointments).map_err(IntakeError::Serialization)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(IntakeError::FileWrite)?;
        tmp.write_all(json.as_bytes())
            .map_err(IntakeError::FileWrite)?;
        tmp.as_file().sync_all().map_err(IntakeError::FileWrite)?;
        tmp.persist(&self.path)
            .map_err(|e| IntakeError::FileWrite(e.error))?;
        Ok(())
    }
}
