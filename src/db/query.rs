use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::str::FromStr;

use super::models::{Status, TaskKind};
use crate::error::CliError;

/// The built-in lists of the Things sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView {
    Inbox,
    Today,
    Upcoming,
    Anytime,
    Someday,
    Trash,
}

/// Longest look-back accepted, far older than any Things database.
pub const MAX_PERIOD_DAYS: i64 = 1000 * 365;

/// A look-back window such as `3d`, `2w`, `1m` or `1y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub days: i64,
}

impl Period {
    pub fn parse(s: &str) -> Result<Self, CliError> {
        let re = Regex::new(r"^(\d+)([dwmy])$").map_err(|e| CliError::Other(e.into()))?;
        let invalid = || {
            CliError::validation(format!(
                "Invalid period '{}' (expected a number followed by d, w, m or y, e.g. 7d)",
                s
            ))
        };

        let caps = re.captures(s.trim()).ok_or_else(invalid)?;
        let count: i64 = caps[1].parse().map_err(|_| invalid())?;
        let unit = match &caps[2] {
            "d" => 1,
            "w" => 7,
            "m" => 30,
            _ => 365,
        };

        let days = count
            .checked_mul(unit)
            .filter(|days| *days <= MAX_PERIOD_DAYS)
            .ok_or_else(|| {
                CliError::validation(format!(
                    "Invalid period '{}' (at most {} years)",
                    s,
                    MAX_PERIOD_DAYS / 365
                ))
            })?;

        Ok(Period { days })
    }

    pub fn duration(&self) -> Duration {
        Duration::days(self.days.clamp(0, MAX_PERIOD_DAYS))
    }
}

impl FromStr for Period {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::parse(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    pub fn sql(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }
}

/// Constraint on a calendar-date column (start date or deadline).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    /// Has any date at all.
    Set,
    /// Has no date.
    Unset,
    /// On or before today.
    Past,
    /// After today.
    Future,
    Compare(Comparison, NaiveDate),
}

impl DateFilter {
    pub fn parse(s: &str) -> Result<Self, CliError> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "true" => return Ok(DateFilter::Set),
            "false" => return Ok(DateFilter::Unset),
            "past" => return Ok(DateFilter::Past),
            "future" => return Ok(DateFilter::Future),
            _ => {}
        }

        // two-character operators first so "<=" is not read as "<"
        let (comparison, rest) = [
            ("<=", Comparison::Le),
            (">=", Comparison::Ge),
            ("=", Comparison::Eq),
            ("<", Comparison::Lt),
            (">", Comparison::Gt),
        ]
        .iter()
        .find_map(|(prefix, cmp)| s.strip_prefix(prefix).map(|rest| (*cmp, rest)))
        .unwrap_or((Comparison::Eq, s));

        let date = NaiveDate::parse_from_str(rest.trim(), "%Y-%m-%d").map_err(|_| {
            CliError::validation(format!(
                "Invalid date filter '{}' (expected YYYY-MM-DD, optionally prefixed by <, <=, >, >= or =, or past/future)",
                s
            ))
        })?;

        Ok(DateFilter::Compare(comparison, date))
    }
}

/// Filters for the general to-do listing and the advanced search.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFilter {
    pub kind: TaskKind,
    /// `None` matches every status.
    pub status: Option<Status>,
    pub project: Option<String>,
    pub area: Option<String>,
    pub heading: Option<String>,
    pub tag: Option<String>,
    pub start_date: Option<DateFilter>,
    pub deadline: Option<DateFilter>,
    pub include_items: bool,
}

impl Default for TaskFilter {
    fn default() -> Self {
        TaskFilter {
            kind: TaskKind::Todo,
            status: Some(Status::Incomplete),
            project: None,
            area: None,
            heading: None,
            tag: None,
            start_date: None,
            deadline: None,
            include_items: false,
        }
    }
}

impl TaskFilter {
    pub fn todos() -> Self {
        TaskFilter::default()
    }

    pub fn in_project(project: impl Into<String>) -> Self {
        TaskFilter {
            project: Some(project.into()),
            ..TaskFilter::default()
        }
    }

    pub fn in_area(area: impl Into<String>) -> Self {
        TaskFilter {
            area: Some(area.into()),
            ..TaskFilter::default()
        }
    }

    pub fn under_heading(heading: impl Into<String>) -> Self {
        TaskFilter {
            heading: Some(heading.into()),
            ..TaskFilter::default()
        }
    }

    pub fn tagged(tag: impl Into<String>) -> Self {
        TaskFilter {
            tag: Some(tag.into()),
            ..TaskFilter::default()
        }
    }

    pub fn with_items(mut self, include_items: bool) -> Self {
        self.include_items = include_items;
        self
    }
}
