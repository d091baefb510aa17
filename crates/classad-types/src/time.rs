//! Absolute and relative time values
//!
//! An [`AbsTime`] is an instant (milliseconds since the Unix epoch, UTC)
//! together with the zone offset used to display it. A [`RelTime`] is a
//! signed interval in milliseconds. Neither knows about leap seconds.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc};
use classad_diagnostics::{CAD0003, CAD0004, ClassAdError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
const MS_PER_HOUR: i64 = 60 * 60 * 1000;
const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_SECOND: i64 = 1000;

/// 0000-01-01T00:00:00 and 9999-12-31T23:59:59.999 as epoch milliseconds
const FIRST_PRINTABLE_MS: i64 = -62_167_219_200_000;
const LAST_PRINTABLE_MS: i64 = 253_402_300_799_999;

/// Milliseconds per day, hour, minute and second
const THRESHOLD: [i64; 4] = [MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND];

/// Separator printed after the day, hour and minute fields
const SEPARATOR: [char; 3] = ['+', ':', ':'];

static ZONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\D*([+-])(\d\d):?(\d\d)$").expect("valid zone pattern"));

static DATE_TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^\D*(\d{4})",              // year
        r"(?:\D*(\d\d)",             // month
        r"(?:\D*(\d\d)",             // day
        r"(?:\D*(\d\d)",             // hour
        r"(?:\D*(\d\d)",             // minute
        r"(?:\D*(\d\d)",             // second
        r"(?:\.(\d{1,3})\d*)?",      // fraction
        r")?)?)?)?)?$",
    ))
    .expect("valid date-time pattern")
});

/// An instant in time with a display zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbsTime {
    /// Milliseconds since 1970-01-01T00:00:00Z
    pub millis: i64,
    /// Seconds east of Greenwich
    pub offset_secs: i32,
}

impl AbsTime {
    pub const fn new(millis: i64, offset_secs: i32) -> Self {
        Self {
            millis,
            offset_secs,
        }
    }

    /// The current instant, displayed in the local zone
    pub fn now() -> Self {
        let now = Local::now();
        Self::new(now.timestamp_millis(), now.offset().fix().local_minus_utc())
    }

    /// The local zone's offset at the given instant
    pub fn local_offset_at(millis: i64) -> i32 {
        Local
            .timestamp_millis_opt(millis)
            .earliest()
            .map_or(0, |dt| dt.offset().fix().local_minus_utc())
    }

    /// Whole seconds since the epoch, rounded toward negative infinity
    pub fn epoch_seconds(&self) -> i64 {
        self.millis.div_euclid(1000)
    }

    /// This instant as a zoned chrono value, if it is in chrono's range
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        let zone = FixedOffset::east_opt(self.offset_secs)?;
        DateTime::<Utc>::from_timestamp_millis(self.millis).map(|dt| dt.with_timezone(&zone))
    }

    /// Parse an ISO-8601-like timestamp
    ///
    /// The accepted shape is `D* yyyy [D* mm [D* dd [D* hh [D* mm [D* ss
    /// [.fff]]]]]] [zone]` where `D` is any non-digit, and the zone is `Z`,
    /// `z`, `+hh:mm`, `-hh:mm`, `+hhmm` or `-hhmm`. A missing month or day is
    /// 1 and a missing time of day is midnight. A missing zone means the
    /// local zone.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || ClassAdError::parse(CAD0004, format!("Invalid absTime \"{s}\""), s);

        let (body, offset) = if let Some(body) = s.strip_suffix(['z', 'Z']) {
            (body, Some(0))
        } else if let Some(caps) = ZONE_PATTERN.captures(s) {
            let sign = if &caps[1] == "-" { -1 } else { 1 };
            let hours: i32 = caps[2].parse().map_err(|_| invalid())?;
            let minutes: i32 = caps[3].parse().map_err(|_| invalid())?;
            let start = caps.get(0).map_or(s.len(), |m| m.start());
            (&s[..start], Some(sign * (hours * 3600 + minutes * 60)))
        } else {
            (s, None)
        };

        let caps = DATE_TIME_PATTERN.captures(body).ok_or_else(invalid)?;
        let field = |i: usize, default: u32| -> Result<u32> {
            match caps.get(i) {
                Some(m) => m.as_str().parse().map_err(|_| invalid()),
                None => Ok(default),
            }
        };
        let year = i32::try_from(field(1, 0)?).map_err(|_| invalid())?;
        let month = field(2, 1)?;
        let day = field(3, 1)?;
        let hour = field(4, 0)?;
        let minute = field(5, 0)?;
        let second = field(6, 0)?;
        let milli = match caps.get(7) {
            Some(m) => {
                let digits = m.as_str();
                let value: u32 = digits.parse().map_err(|_| invalid())?;
                value * 10u32.pow(3 - digits.len() as u32)
            }
            None => 0,
        };

        let naive = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_milli_opt(hour, minute, second, milli))
            .ok_or_else(invalid)?;

        match offset {
            Some(offset) => {
                let zone = FixedOffset::east_opt(offset).ok_or_else(invalid)?;
                let dt = zone.from_local_datetime(&naive).single().ok_or_else(invalid)?;
                Ok(Self::new(dt.timestamp_millis(), offset))
            }
            None => {
                let dt = Local.from_local_datetime(&naive).earliest().ok_or_else(invalid)?;
                Ok(Self::new(
                    dt.timestamp_millis(),
                    dt.offset().fix().local_minus_utc(),
                ))
            }
        }
    }
}

impl fmt::Display for AbsTime {
    /// `yyyy-mm-ddThh:mm:ss[.fff]+hh:mm`
    ///
    /// Instants whose wall time falls outside years 0000 to 9999 print as
    /// the nearest wall time inside them, so the text always parses.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let offset_ms = i64::from(self.offset_secs) * MS_PER_SECOND;
        let wall = self
            .millis
            .saturating_add(offset_ms)
            .clamp(FIRST_PRINTABLE_MS, LAST_PRINTABLE_MS);
        let shown = Self::new(wall - offset_ms, self.offset_secs);
        let Some(dt) = shown.to_datetime() else {
            // Not a usable zone offset
            return write!(f, "{}", Self::new(self.millis, 0));
        };
        write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S"))?;
        let ms = shown.millis.rem_euclid(1000);
        if ms != 0 {
            write!(f, ".{ms:03}")?;
        }
        write!(f, "{}", dt.format("%:z"))
    }
}

/// A signed time interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RelTime {
    pub millis: i64,
}

impl RelTime {
    pub const fn new(millis: i64) -> Self {
        Self { millis }
    }

    pub const fn from_secs(secs: i64) -> Self {
        Self::new(secs.wrapping_mul(1000))
    }

    /// Parse an interval
    ///
    /// The canonical form is `[-]days+hh:mm:ss.fff`, but whitespace may
    /// appear between fields, fields may have any number of digits, `+` may
    /// be written `d`, the first `:` may be `h`, the second `m`, and `s` may
    /// follow the seconds. A field followed by a unit letter may skip the
    /// zero fields before it. Fractions are rounded to milliseconds.
    ///
    /// `1d 2m 0.003s`, `1+00:02:00.003` and `86520.003` all denote the same
    /// interval.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = |why: &str| {
            ClassAdError::parse(
                CAD0003,
                format!("invalid RelTime string \"{s}\": {why}"),
                s,
            )
        };
        let bytes = s.as_bytes();
        let skip_ws = |mut i: usize| {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            i
        };

        let mut negative = false;
        let mut pos = 0;
        let start = skip_ws(0);
        if bytes.get(start) == Some(&b'-') {
            negative = true;
            pos = start + 1;
        }

        // (digits, separator) pairs, in input order
        let mut fields: Vec<(&str, Option<u8>)> = Vec::with_capacity(5);
        let mut dot_seen = false;
        loop {
            let digits_start = skip_ws(pos);
            let mut digits_end = digits_start;
            while digits_end < bytes.len() && bytes[digits_end].is_ascii_digit() {
                digits_end += 1;
            }
            if digits_end == digits_start {
                break;
            }
            if fields.len() >= 5 {
                return Err(invalid("too many fields"));
            }
            let mut next = skip_ws(digits_end);
            let sep = match bytes.get(next) {
                Some(&c) if b"+:.dDhHmMsS".contains(&c) => {
                    next += 1;
                    Some(c)
                }
                _ => None,
            };
            if sep == Some(b'.') {
                if dot_seen {
                    return Err(invalid("two dots"));
                }
                dot_seen = true;
            }
            fields.push((&s[digits_start..digits_end], sep));
            pos = next;
        }
        if pos != bytes.len() {
            return Err(invalid("extra characters at the end"));
        }

        // Positions: 0 day, 1 hour, 2 minute, 3 second, 4 fraction. A field
        // without a unit letter sits one slot before the field after it.
        let mut slots: [Option<&str>; 5] = [None; 5];
        let mut slot: i32 = if dot_seen { 5 } else { 4 };
        for &(digits, sep) in fields.iter().rev() {
            slot -= 1;
            match sep {
                Some(b'd' | b'D' | b'+') => slot = 0,
                Some(b'h' | b'H') => slot = 1,
                Some(b'm' | b'M') => slot = 2,
                Some(b'.') => slot = 3,
                _ => {}
            }
            let index = usize::try_from(slot).map_err(|_| invalid("too many fields"))?;
            slots[index] = Some(digits);
        }

        let mut millis: i64 = 0;
        if let Some(fraction) = slots[4] {
            let digits = fraction.as_bytes();
            for i in 0..3 {
                let d = digits.get(i).map_or(0, |c| i64::from(c - b'0'));
                millis = millis * 10 + d;
            }
            if digits.get(3).is_some_and(|&c| c >= b'5') {
                millis += 1;
            }
        }
        for (i, threshold) in THRESHOLD.iter().enumerate() {
            if let Some(digits) = slots[i] {
                let value: i64 = digits.parse().map_err(|_| invalid("field out of range"))?;
                millis = value
                    .checked_mul(*threshold)
                    .and_then(|v| v.checked_add(millis))
                    .ok_or_else(|| invalid("field out of range"))?;
            }
        }
        Ok(Self::new(if negative { -millis } else { millis }))
    }
}

impl fmt::Display for RelTime {
    /// `[-]days+hh:mm:ss.fff` without leading zero fields or a zero fraction
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.millis == 0 {
            return f.write_str("0");
        }
        if self.millis < 0 {
            f.write_str("-")?;
        }
        let mut t = self.millis.unsigned_abs();
        if t < 1000 {
            f.write_str("0")?;
        } else {
            let mut i = THRESHOLD
                .iter()
                .position(|&th| t >= th as u64)
                .unwrap_or(THRESHOLD.len() - 1);
            write!(f, "{}", t / THRESHOLD[i] as u64)?;
            loop {
                t %= THRESHOLD[i] as u64;
                if i >= SEPARATOR.len() {
                    break;
                }
                write!(f, "{}", SEPARATOR[i])?;
                i += 1;
                write!(f, "{:02}", t / THRESHOLD[i] as u64)?;
            }
        }
        if t > 0 {
            write!(f, ".{t:03}")?;
        }
        Ok(())
    }
}
