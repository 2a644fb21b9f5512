//! Calendar months and period strings
//!
//! Experience records carry human-entered periods such as "Jan 2026",
//! "Q1 2026" or "Present". This module turns them into comparable
//! `YearMonth` values, counts inclusive month spans, and formats month
//! totals for display.
//!
//! "Present" resolves to the current month at call time, so totals are not
//! stable across days and should never be persisted.

use chrono::Datelike;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, digit1, one_of, space1},
    combinator::{all_consuming, map, map_res, verify},
    sequence::{preceded, separated_pair},
    IResult, Parser,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Month names accepted by the parser (case-sensitive)
const MONTHS: &[(&str, u32)] = &[
    ("Jan", 1),
    ("January", 1),
    ("Feb", 2),
    ("February", 2),
    ("Mar", 3),
    ("March", 3),
    ("Apr", 4),
    ("April", 4),
    ("May", 5),
    ("Jun", 6),
    ("June", 6),
    ("Jul", 7),
    ("July", 7),
    ("Aug", 8),
    ("August", 8),
    ("Sep", 9),
    ("Sept", 9),
    ("September", 9),
    ("Oct", 10),
    ("October", 10),
    ("Nov", 11),
    ("November", 11),
    ("Dec", 12),
    ("December", 12),
];

/// Canonical three-letter abbreviations, indexed by month - 1
const CANONICAL_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Literal marking an ongoing role
pub const PRESENT: &str = "Present";

/// Why a period string could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("period is empty")]
    Empty,

    #[error("unrecognized period: {0:?}")]
    Unrecognized(String),

    #[error("unknown month name: {0:?}")]
    UnknownMonth(String),

    #[error("year out of range: {0:?}")]
    BadYear(String),
}

/// A calendar month (day-of-month is irrelevant to every computation here)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawYearMonth")]
pub struct YearMonth {
    year: i32,
    /// 1..=12
    month: u32,
}

#[derive(Deserialize)]
struct RawYearMonth {
    year: i32,
    month: u32,
}

impl TryFrom<RawYearMonth> for YearMonth {
    type Error = String;

    fn try_from(raw: RawYearMonth) -> Result<Self, Self::Error> {
        YearMonth::new(raw.year, raw.month).ok_or_else(|| format!("month {} is not in 1..=12", raw.month))
    }
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Current month from the local clock
    pub fn today() -> Self {
        let now = chrono::Local::now().date_naive();
        Self {
            year: now.year(),
            month: now.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Months since year zero; differences of this value are month spans
    fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", CANONICAL_MONTHS[self.month as usize - 1], self.year)
    }
}

/// The textual shape a period was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodShape {
    Present,
    /// `canonical` is false for full or irregular month names ("April", "Sept")
    Month { canonical: bool },
    Quarter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Period {
    Present,
    Month { year: i32, month: u32, canonical: bool },
    Quarter { year: i32, quarter: u32 },
}

fn year(input: &str) -> IResult<&str, i32> {
    map_res(
        verify(digit1, |digits: &str| digits.len() == 4),
        |digits: &str| digits.parse::<i32>(),
    )
    .parse(input)
}

fn quarter(input: &str) -> IResult<&str, Period> {
    map(
        separated_pair(preceded(tag("Q"), one_of("1234")), space1, year),
        |(q, year)| Period::Quarter {
            year,
            quarter: q.to_digit(10).unwrap_or(1),
        },
    )
    .parse(input)
}

fn month_name(input: &str) -> IResult<&str, &str> {
    alpha1(input)
}

fn period(input: &str) -> IResult<&str, Option<Period>> {
    alt((
        map(quarter, Some),
        map(tag(PRESENT), |_| Some(Period::Present)),
        map(separated_pair(month_name, space1, year), |(name, year)| {
            MONTHS
                .iter()
                .find(|(candidate, _)| *candidate == name)
                .map(|&(_, month)| Period::Month {
                    year,
                    month,
                    canonical: CANONICAL_MONTHS[month as usize - 1] == name,
                })
        }),
    ))
    .parse(input)
}

fn parse_shape(text: &str) -> Result<Period, PeriodError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(PeriodError::Empty);
    }
    match all_consuming(period).parse(text) {
        Ok((_, Some(parsed))) => Ok(parsed),
        Ok((_, None)) => Err(PeriodError::UnknownMonth(
            text.split_whitespace().next().unwrap_or_default().to_string(),
        )),
        Err(_) => {
            // Distinguish "Jan 26" from outright garbage for authoring feedback
            let mut parts = text.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(_), Some(y), None)
                    if y.len() != 4 && y.chars().all(|c| c.is_ascii_digit()) =>
                {
                    Err(PeriodError::BadYear(y.to_string()))
                }
                _ => Err(PeriodError::Unrecognized(text.to_string())),
            }
        }
    }
}

/// Classify how a period string was written, without resolving it
pub fn classify_period(text: &str) -> Result<PeriodShape, PeriodError> {
    Ok(match parse_shape(text)? {
        Period::Present => PeriodShape::Present,
        Period::Month { canonical, .. } => PeriodShape::Month { canonical },
        Period::Quarter { .. } => PeriodShape::Quarter,
    })
}

/// Parse a period, resolving "Present" to `today`
///
/// Quarters map to their first month: Q1 → Jan, Q2 → Apr, Q3 → Jul, Q4 → Oct.
pub fn try_parse_period_at(text: &str, today: YearMonth) -> Result<YearMonth, PeriodError> {
    Ok(match parse_shape(text)? {
        Period::Present => today,
        Period::Month { year, month, .. } => YearMonth { year, month },
        Period::Quarter { year, quarter } => YearMonth {
            year,
            month: (quarter - 1) * 3 + 1,
        },
    })
}

/// Fallible parse against the local clock
pub fn try_parse_period(text: &str) -> Result<YearMonth, PeriodError> {
    try_parse_period_at(text, YearMonth::today())
}

/// Parse a period against an explicit "today", falling back to `today` when
/// the text is unrecognized
///
/// The fallback is deliberate: bad content must never take the page down.
/// It is logged so authoring mistakes still show up.
pub fn parse_period_at(text: &str, today: YearMonth) -> YearMonth {
    match try_parse_period_at(text, today) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(
                target: "career_dashboard::period",
                period = text,
                error = %err,
                "unparseable period, falling back to current month"
            );
            today
        }
    }
}

/// Parse a period against the local clock (see `parse_period_at`)
pub fn parse_period(text: &str) -> YearMonth {
    parse_period_at(text, YearMonth::today())
}

/// Inclusive month count between two months, floored at 0
///
/// A role that starts and ends in the same month counts as 1.
pub fn months_between(start: YearMonth, end: YearMonth) -> u32 {
    let span = end.ordinal() - start.ordinal() + 1;
    span.max(0) as u32
}

/// Render a month total as "2y 3m", dropping zero segments
pub fn format_duration(months: u32) -> String {
    if months == 0 {
        return "0m".to_string();
    }

    let years = months / 12;
    let remaining = months % 12;

    match (years, remaining) {
        (0, m) => format!("{}m", m),
        (y, 0) => format!("{}y", y),
        (y, m) => format!("{}y {}m", y, m),
    }
}
