//! Closed ordinal types for the academic calendar.
//!
//! Weekdays, year levels and blocks are parsed once at ingestion. Anything that
//! does not parse is rejected there, so the ordering code downstream never has
//! to guess a rank for an unknown value.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AppError;

/// Canonical wire/storage format for meeting times.
pub const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseCalendarError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseCalendarError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl From<ParseCalendarError> for AppError {
    fn from(err: ParseCalendarError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Teaching days, Monday through Saturday. Declaration order is weekly order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    pub const ALL: [Weekday; 6] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// 1-based position in the week (Mon = 1).
    pub fn rank(self) -> u8 {
        self as u8 + 1
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
        }
    }

    fn long_name(self) -> &'static str {
        match self {
            Weekday::Mon => "monday",
            Weekday::Tue => "tuesday",
            Weekday::Wed => "wednesday",
            Weekday::Thu => "thursday",
            Weekday::Fri => "friday",
            Weekday::Sat => "saturday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = ParseCalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| token == day.as_str().to_ascii_lowercase() || token == day.long_name())
            .ok_or_else(|| ParseCalendarError::new("day", s))
    }
}

impl TryFrom<String> for Weekday {
    type Error = ParseCalendarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Weekday> for String {
    fn from(day: Weekday) -> Self {
        day.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum YearLevel {
    First,
    Second,
    Third,
    Fourth,
}

impl YearLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            YearLevel::First => "1st Year",
            YearLevel::Second => "2nd Year",
            YearLevel::Third => "3rd Year",
            YearLevel::Fourth => "4th Year",
        }
    }
}

impl fmt::Display for YearLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YearLevel {
    type Err = ParseCalendarError;

    /// Accepts "1st Year", "1st", "first" or "1" (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let token = lowered.strip_suffix("year").unwrap_or(lowered.as_str()).trim();
        match token {
            "1" | "1st" | "first" => Ok(YearLevel::First),
            "2" | "2nd" | "second" => Ok(YearLevel::Second),
            "3" | "3rd" | "third" => Ok(YearLevel::Third),
            "4" | "4th" | "fourth" => Ok(YearLevel::Fourth),
            _ => Err(ParseCalendarError::new("year level", s)),
        }
    }
}

impl TryFrom<String> for YearLevel {
    type Error = ParseCalendarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearLevel> for String {
    fn from(level: YearLevel) -> Self {
        level.as_str().to_string()
    }
}

/// Section block letter. Ordered alphabetically, defaults to `A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Block(char);

impl Block {
    pub fn letter(self) -> char {
        self.0
    }

    /// Parses an optional block, treating a missing or blank value as `A`.
    pub fn parse_or_default(raw: Option<&str>) -> Result<Self, ParseCalendarError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Block::default()),
            Some(value) => value.parse(),
        }
    }
}

impl Default for Block {
    fn default() -> Self {
        Block('A')
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Block {
    type Err = ParseCalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => Ok(Block(c.to_ascii_uppercase())),
            _ => Err(ParseCalendarError::new("block", s)),
        }
    }
}

impl TryFrom<String> for Block {
    type Error = ParseCalendarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Block> for String {
    fn from(block: Block) -> Self {
        block.0.to_string()
    }
}

/// Parses `HH:MM` or `HH:MM:SS` and returns the canonical `HH:MM:SS` form.
///
/// Canonical strings compare lexicographically in chronological order, which
/// the consolidation and overlap code relies on.
pub fn normalize_time(raw: &str) -> Result<String, ParseCalendarError> {
    parse_time(raw)
        .map(|t| t.format(TIME_FORMAT).to_string())
        .ok_or_else(|| ParseCalendarError::new("time", raw))
}

pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// Validates a meeting interval and returns it normalized. The interval is
/// half-open, so `end` must be strictly after `start`.
pub fn normalize_interval(start: &str, end: &str) -> Result<(String, String), AppError> {
    let start = normalize_time(start)?;
    let end = normalize_time(end)?;
    if end <= start {
        return Err(AppError::Validation(format!(
            "end_time {} must be after start_time {}",
            end, start
        )));
    }
    Ok((start, end))
}
