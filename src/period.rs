//! Report windows.
//!
//! A report covers a day, a month or a year. Each period maps to a
//! `[min, max]` range of unix timestamps and to the French display date used
//! in the report title. Boundaries are computed in UTC.

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Weekday};
use std::fmt;

const WEEKDAYS: [&str; 7] = [
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
];

const MONTHS: [&str; 12] = [
    "janv.", "févr.", "mars", "avril", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

/// Kind of report window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PeriodKind {
    #[default]
    Day,
    Month,
    Year,
}

/// A concrete report window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
    Year(i32),
}

/// Timestamp range and display date of a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampRange {
    pub display_date: String,
    pub min_timestamp: i64,
    pub max_timestamp: i64,
}

impl ReportPeriod {
    /// Parse `YYYY-MM-DD`, `YYYY-MM` or `YYYY` depending on `kind`.
    pub fn parse(kind: PeriodKind, value: &str) -> Result<Self> {
        match kind {
            PeriodKind::Day => {
                let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .with_context(|| format!("Invalid day '{}', expected YYYY-MM-DD", value))?;
                Ok(ReportPeriod::Day(date))
            }
            PeriodKind::Month => {
                let date = NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d")
                    .with_context(|| format!("Invalid month '{}', expected YYYY-MM", value))?;
                Ok(ReportPeriod::Month {
                    year: date.year(),
                    month: date.month(),
                })
            }
            PeriodKind::Year => {
                let year: i32 = value
                    .parse()
                    .with_context(|| format!("Invalid year '{}', expected YYYY", value))?;
                if NaiveDate::from_ymd_opt(year, 1, 1).is_none() {
                    bail!("Year out of range: {}", year);
                }
                Ok(ReportPeriod::Year(year))
            }
        }
    }

    /// The period containing `today`.
    pub fn current(kind: PeriodKind, today: NaiveDate) -> Self {
        match kind {
            PeriodKind::Day => ReportPeriod::Day(today),
            PeriodKind::Month => ReportPeriod::Month {
                year: today.year(),
                month: today.month(),
            },
            PeriodKind::Year => ReportPeriod::Year(today.year()),
        }
    }

    /// Bare French date of the period, as used in report titles
    /// (`mardi 02 nov. 2021`, `nov. 2021`, `2021`).
    pub fn title_date(&self) -> Result<String> {
        Ok(match *self {
            ReportPeriod::Day(date) => french_day(date),
            ReportPeriod::Month { year, month } => french_month(ymd(year, month, 1)?),
            ReportPeriod::Year(year) => year.to_string(),
        })
    }

    /// Range of the period and its display date.
    ///
    /// A day ends at 23:00; months and years end at 02:00 on the first day
    /// of the following period.
    pub fn timestamp_range(&self) -> Result<TimestampRange> {
        let (display_date, min, max) = match *self {
            ReportPeriod::Day(date) => {
                let max = at(date, 23)?;
                let min = max - Duration::hours(24);
                (format!("du {}", french_day(date)), min, max)
            }
            ReportPeriod::Month { year, month } => {
                let first = ymd(year, month, 1)?;
                let max = at(add_months(first, 1)?, 2)?;
                let min = sub_months(max, 1)?;
                (format!("du mois de {}", french_month(first)), min, max)
            }
            ReportPeriod::Year(year) => {
                let max = at(ymd(year + 1, 1, 1)?, 2)?;
                let min = sub_months(max, 12)?;
                (format!("de l'année {}", year), min, max)
            }
        };

        Ok(TimestampRange {
            display_date,
            min_timestamp: min.and_utc().timestamp(),
            max_timestamp: max.and_utc().timestamp(),
        })
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportPeriod::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            ReportPeriod::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            ReportPeriod::Year(year) => write!(f, "{:04}", year),
        }
    }
}

/// `mardi 02 nov. 2021`
pub fn french_day(date: NaiveDate) -> String {
    format!(
        "{} {:02} {}",
        WEEKDAYS[weekday_index(date.weekday())],
        date.day(),
        french_month(date)
    )
}

/// `nov. 2021`
pub fn french_month(date: NaiveDate) -> String {
    format!("{} {}", MONTHS[date.month0() as usize], date.year())
}

fn weekday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .with_context(|| format!("Invalid date {:04}-{:02}-{:02}", year, month, day))
}

fn at(date: NaiveDate, hour: u32) -> Result<NaiveDateTime> {
    date.and_hms_opt(hour, 0, 0)
        .with_context(|| format!("Invalid hour {} on {}", hour, date))
}

fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .with_context(|| format!("Date overflow adding {} months to {}", months, date))
}

fn sub_months(datetime: NaiveDateTime, months: u32) -> Result<NaiveDateTime> {
    datetime
        .checked_sub_months(Months::new(months))
        .with_context(|| format!("Date overflow removing {} months from {}", months, datetime))
}
