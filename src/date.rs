//! Period keys: a "YYYY-MM" calendar type plus helpers that derive a period from
//! unix timestamps, RFC 3339 strings and dated URLs.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};

/// Simple "YYYY-MM" utility with safe arithmetic and ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: u16,
    pub month: u8, // 1..=12
}

impl YearMonth {
    pub fn new(year: u16, month: u8) -> Self {
        assert!((1..=12).contains(&month), "Month must be 1..=12");
        Self { year, month }
    }
    pub fn next(self) -> Option<Self> {
        if self.month < 12 {
            Some(Self { year: self.year, month: self.month + 1 })
        } else if self.year < u16::MAX {
            Some(Self { year: self.year + 1, month: 1 })
        } else {
            None
        }
    }
    pub fn prev(self) -> Option<Self> {
        if self.month > 1 {
            Some(Self { year: self.year, month: self.month - 1 })
        } else if self.year > 0 {
            Some(Self { year: self.year - 1, month: 12 })
        } else {
            None
        }
    }

    /// True when `self` is exactly the calendar month after `earlier` (Dec rolls into Jan).
    pub fn follows(self, earlier: YearMonth) -> bool {
        earlier.next() == Some(self)
    }

    fn from_date(date: Date) -> Option<Self> {
        let year = u16::try_from(date.year()).ok()?;
        Some(Self { year, month: date.month() as u8 })
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<_> = s.split('-').collect();
        if parts.len() != 2 {
            return Err("expected YYYY-MM".into());
        }
        let year: u16 = parts[0].parse().map_err(|_| "invalid year")?;
        let month: u8 = parts[1].parse().map_err(|_| "invalid month")?;
        if !(1..=12).contains(&month) {
            return Err("month must be 01..12".into());
        }
        Ok(Self { year, month })
    }
}

/// Whether two period keys are consecutive calendar months.
/// Keys that do not parse as "YYYY-MM" are never consecutive.
pub fn consecutive_periods(earlier: &str, later: &str) -> bool {
    match (earlier.parse::<YearMonth>(), later.parse::<YearMonth>()) {
        (Ok(a), Ok(b)) => b.follows(a),
        _ => false,
    }
}

/// Period of a unix timestamp (seconds, UTC). Out-of-range timestamps yield `None`.
pub fn period_from_epoch(ts: i64) -> Option<YearMonth> {
    let dt = OffsetDateTime::from_unix_timestamp(ts).ok()?;
    YearMonth::from_date(dt.date())
}

/// Period of an RFC 3339 timestamp such as `2013-02-14T08:30:00Z`.
pub fn period_from_rfc3339(s: &str) -> Option<YearMonth> {
    let dt = OffsetDateTime::parse(s.trim(), &Rfc3339).ok()?;
    YearMonth::from_date(dt.date())
}

fn dated_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/((?:19|20)\d{2})/(\d{1,2})/").expect("static regex"))
}

/// Period embedded in a news-style URL path, e.g. `https://site/2013/02/some-story`.
pub fn period_from_url(url: &str) -> Option<YearMonth> {
    let caps = dated_url_re().captures(url)?;
    let year: u16 = caps[1].parse().ok()?;
    let month: u8 = caps[2].parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(YearMonth { year, month })
}
