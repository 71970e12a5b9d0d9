use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Source of "now" for date-relative rules such as past-date checks and appointment partitioning.
pub trait Clock: Send + Sync {
    /// Wall-clock time, used for calendar rules.
    fn now(&self) -> NaiveDateTime;

    /// The same instant in UTC, used for stored timestamps.
    fn now_utc(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Local wall-clock time, matching what the patient sees on their own calendar.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at one instant; the wall time doubles as UTC.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn on(date: NaiveDate, hour: u32) -> Self {
        Self(date.and_hms_opt(hour, 0, 0).unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.0)
    }
}

/// `2026-02-01T09:00:00.000Z`, the shape the backend stores.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_timestamp() {
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(), 9);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(iso_timestamp(clock.now_utc()), "2026-02-01T09:00:00.000Z");
    }

    #[test]
    fn test_system_clock_timestamp_is_utc() {
        let before = Utc::now();
        let stamped = SystemClock.now_utc();
        assert!(stamped >= before);
        assert!(iso_timestamp(stamped).ends_with('Z'));
    }
}
