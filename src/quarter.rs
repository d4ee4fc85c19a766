use crate::model::QuarterRange;
use chrono::{Datelike, NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// Exact, case-sensitive match on `Q1`..`Q4`.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "Q1" => Some(Quarter::Q1),
            "Q2" => Some(Quarter::Q2),
            "Q3" => Some(Quarter::Q3),
            "Q4" => Some(Quarter::Q4),
            _ => None,
        }
    }

    /// (first month, last month, last day of last month)
    fn months(self) -> (u32, u32, u32) {
        match self {
            Quarter::Q1 => (1, 3, 31),
            Quarter::Q2 => (4, 6, 30),
            Quarter::Q3 => (7, 9, 30),
            Quarter::Q4 => (10, 12, 31),
        }
    }

    pub fn range(self, year: i32) -> Option<QuarterRange> {
        let (first, last, last_day) = self.months();
        let start = NaiveDate::from_ymd_opt(year, first, 1)?.and_hms_opt(0, 0, 0)?;
        let end = NaiveDate::from_ymd_opt(year, last, last_day)?.and_hms_opt(23, 59, 0)?;
        Some(QuarterRange::new(start, end))
    }
}

/// Resolve a quarter code against the year of `now`.
///
/// Unknown codes fall back to `[Jan 1 of that year, now]`.
pub fn resolve(code: &str, now: NaiveDateTime) -> QuarterRange {
    resolve_in_year(code, now.year(), now)
}

pub fn resolve_in_year(code: &str, year: i32, now: NaiveDateTime) -> QuarterRange {
    if let Some(range) = Quarter::parse(code).and_then(|q| q.range(year)) {
        return range;
    }
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(now);
    QuarterRange::new(start, now)
}
