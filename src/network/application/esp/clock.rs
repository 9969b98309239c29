//! Wall-clock estimation from periodic gateway date-time reports.
//!
//! The gateway reports `YYYY-MM-DD HH:MM:SS weekday` on request. Between
//! reports the current time is derived from the last report plus the local
//! monotonic milliseconds elapsed since it arrived.

use core::fmt::Write as _;

use heapless::String;

use super::codec::{parse_leading_int, truncated};

/// Time reported before the first sync.
pub const UNSYNCED_TIME: &str = "00:00:00";
/// Date reported before the first sync.
pub const UNSYNCED_DATE: &str = "0000-00-00";
/// Timezone used when none was configured.
pub const DEFAULT_TIMEZONE: &str = "UTC0";

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// A POSIX TZ style timezone descriptor.
pub type TimeZoneDescriptor = String<48>;

/// Timezones with a built-in descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeZone {
    /// Coordinated Universal Time.
    #[default]
    Utc,
    /// America/Los_Angeles.
    AmericaLosAngeles,
    /// Europe/Berlin.
    EuropeBerlin,
    /// America/New_York.
    AmericaNewYork,
    /// Asia/Tokyo.
    AsiaTokyo,
}

impl TimeZone {
    /// Descriptor understood by the gateway firmware.
    pub const fn posix(self) -> &'static str {
        match self {
            TimeZone::Utc => "UTC0",
            TimeZone::AmericaLosAngeles => "PST8PDT,M3.2.0,M11.1.0",
            TimeZone::EuropeBerlin => "CET-1CEST,M3.5.0,M10.5.0/3",
            TimeZone::AmericaNewYork => "TZ_America_New_York",
            TimeZone::AsiaTokyo => "JST-9",
        }
    }
}

/// Descriptor for a fixed offset from UTC, e.g. `(4, 30)` gives
/// `<+0430>-04:30`.
///
/// The sign of `hours` picks the direction; the sign of `minutes` is ignored.
/// Note the POSIX convention: the second field is negated.
pub fn utc_offset_descriptor(hours: i32, minutes: i32) -> TimeZoneDescriptor {
    let (abbrev, posix) = if hours >= 0 { ('+', '-') } else { ('-', '+') };
    let hours = hours.unsigned_abs();
    let minutes = minutes.unsigned_abs();

    let mut descriptor = TimeZoneDescriptor::new();
    // Fits: at most 45 bytes for two ten-digit fields.
    let _ = write!(
        descriptor,
        "<{}{:02}{:02}>{}{:02}:{:02}",
        abbrev, hours, minutes, posix, hours, minutes
    );
    descriptor
}

/// Reference time from the last gateway report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    time: String<8>,
    date: String<10>,
    weekday: u8,
    timezone: TimeZoneDescriptor,
    last_sync: Option<u64>,
}

impl Clock {
    /// An unsynced clock in `timezone`.
    pub fn new(timezone: &str) -> Self {
        Self {
            time: truncated(UNSYNCED_TIME),
            date: truncated(UNSYNCED_DATE),
            weekday: 0,
            timezone: truncated(timezone),
            last_sync: None,
        }
    }

    /// Configured timezone descriptor.
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Replace the timezone descriptor. Takes effect with the next report.
    pub fn set_timezone(&mut self, timezone: &str) {
        self.timezone = truncated(timezone);
    }

    /// Whether at least one report has been applied.
    pub fn is_synced(&self) -> bool {
        self.last_sync.is_some()
    }

    /// Monotonic timestamp of the last applied report.
    pub fn last_sync(&self) -> Option<u64> {
        self.last_sync
    }

    /// Date of the last report, `0000-00-00` before the first.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Weekday of the last report, 0 is Sunday.
    pub fn weekday(&self) -> u8 {
        self.weekday
    }

    /// Apply a `date time weekday` report received at `now`.
    ///
    /// Returns `false` and leaves the clock untouched unless the content has
    /// exactly three space-separated fields. A weekday that does not parse
    /// keeps its previous value.
    pub fn apply_sync(&mut self, content: &str, now: u64) -> bool {
        let mut fields = content.split(' ');
        let (Some(date), Some(time), Some(weekday), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            debug!("ignoring malformed date-time report");
            return false;
        };

        self.last_sync = Some(now);
        self.date = truncated(date);
        self.time = truncated(time);
        match parse_leading_int(weekday).and_then(|day| u8::try_from(day).ok()) {
            Some(day) => self.weekday = day,
            None => warn!("unparseable weekday in date-time report"),
        }
        true
    }

    /// Estimated local time at monotonic time `now`, as `HH:MM:SS`.
    pub fn time_at(&self, now: u64) -> String<8> {
        let Some(last_sync) = self.last_sync else {
            return truncated(UNSYNCED_TIME);
        };
        if self.date == UNSYNCED_DATE {
            return truncated(UNSYNCED_TIME);
        }

        let elapsed = i64::try_from(now.saturating_sub(last_sync) / 1000).unwrap_or(i64::MAX);
        let seconds = reference_seconds(&self.time)
            .saturating_add(elapsed)
            .rem_euclid(SECONDS_PER_DAY);
        format_time(seconds)
    }
}

/// Seconds since midnight for `HH:MM:SS`. Fields that do not parse count
/// as zero.
fn reference_seconds(time: &str) -> i64 {
    let mut fields = time.split(':').map(|field| i64::from(parse_leading_int(field).unwrap_or(0)));
    let hours = fields.next().unwrap_or(0);
    let minutes = fields.next().unwrap_or(0);
    let seconds = fields.next().unwrap_or(0);
    hours * 3600 + minutes * 60 + seconds
}

fn format_time(seconds: i64) -> String<8> {
    let mut time = String::new();
    // Fits: `seconds` is below one day.
    let _ = write!(
        time,
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        seconds / 60 % 60,
        seconds % 60
    );
    time
}
