use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};

/// A calendar month in UTC, written `YYYY-MM`.
/// This is the filtering unit for the dashboard, the history list and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthKeyError> {
        if !(0..=9999).contains(&year) {
            return Err(MonthKeyError::YearOutOfRange(year));
        }
        if !(1..=12).contains(&month) {
            return Err(MonthKeyError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    /// The month a timestamp falls in.
    pub fn of(date: &DateTime<Utc>) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::of(&Utc::now())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// True when `date` lies in this month. Same result as testing whether the
    /// RFC 3339 form of `date` starts with `YYYY-MM`.
    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| MonthKeyError::InvalidFormat(s.to_string()))?;

        let is_digits = |part: &str, len: usize| {
            part.len() == len && part.chars().all(|c| c.is_ascii_digit())
        };
        if !is_digits(year, 4) || !is_digits(month, 2) {
            return Err(MonthKeyError::InvalidFormat(s.to_string()));
        }

        let year: i32 = year
            .parse()
            .map_err(|_| MonthKeyError::InvalidFormat(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| MonthKeyError::InvalidFormat(s.to_string()))?;
        Self::new(year, month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthKeyError {
    InvalidFormat(String),
    YearOutOfRange(i32),
    MonthOutOfRange(u32),
}

impl fmt::Display for MonthKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthKeyError::InvalidFormat(s) => {
                write!(f, "invalid month '{}', expected YYYY-MM", s)
            }
            MonthKeyError::YearOutOfRange(y) => write!(f, "year {} is out of range", y),
            MonthKeyError::MonthOutOfRange(m) => write!(f, "month {} is out of range", m),
        }
    }
}

impl std::error::Error for MonthKeyError {}
