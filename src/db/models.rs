use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskKind {
    #[serde(rename = "to-do")]
    Todo,
    #[serde(rename = "project")]
    Project,
    #[serde(rename = "heading")]
    Heading,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Todo => "to-do",
            TaskKind::Project => "project",
            TaskKind::Heading => "heading",
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(TaskKind::Todo),
            1 => Some(TaskKind::Project),
            2 => Some(TaskKind::Heading),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            TaskKind::Todo => 0,
            TaskKind::Project => 1,
            TaskKind::Heading => 2,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "to-do" | "todo" => Ok(TaskKind::Todo),
            "project" => Ok(TaskKind::Project),
            "heading" => Ok(TaskKind::Heading),
            other => Err(CliError::validation(format!(
                "Invalid type '{}' (expected to-do, project or heading)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Incomplete,
    Completed,
    Canceled,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Incomplete => "incomplete",
            Status::Completed => "completed",
            Status::Canceled => "canceled",
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Status::Incomplete),
            2 => Some(Status::Canceled),
            3 => Some(Status::Completed),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Status::Incomplete => 0,
            Status::Canceled => 2,
            Status::Completed => 3,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "incomplete" => Ok(Status::Incomplete),
            "completed" => Ok(Status::Completed),
            "canceled" | "cancelled" => Ok(Status::Canceled),
            other => Err(CliError::validation(format!(
                "Invalid status '{}' (expected incomplete, completed or canceled)",
                other
            ))),
        }
    }
}

/// Which built-in list an item sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StartList {
    Inbox,
    Anytime,
    Someday,
}

impl StartList {
    pub fn as_str(&self) -> &'static str {
        match self {
            StartList::Inbox => "Inbox",
            StartList::Anytime => "Anytime",
            StartList::Someday => "Someday",
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(StartList::Inbox),
            1 => Some(StartList::Anytime),
            2 => Some(StartList::Someday),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            StartList::Inbox => 0,
            StartList::Anytime => 1,
            StartList::Someday => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistItem {
    pub title: String,
    pub status: Status,
}

/// A to-do, project or heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub uuid: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub title: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<StartList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_title: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist: Option<Vec<ChecklistItem>>,
}

impl Task {
    /// A bare record with only the required fields set.
    pub fn new(uuid: impl Into<String>, kind: TaskKind, title: impl Into<String>) -> Self {
        Task {
            uuid: uuid.into(),
            kind,
            title: title.into(),
            status: Status::Incomplete,
            start: None,
            notes: None,
            area: None,
            area_title: None,
            project: None,
            project_title: None,
            heading: None,
            heading_title: None,
            tags: Vec::new(),
            start_date: None,
            deadline: None,
            stop_date: None,
            created: None,
            modified: None,
            checklist: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Area {
    pub uuid: String,
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Area {
    pub fn new(uuid: impl Into<String>, title: impl Into<String>) -> Self {
        Area {
            uuid: uuid.into(),
            title: title.into(),
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub uuid: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
}

/// Anything an identifier can resolve to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Task(Task),
    Area(Area),
    Tag(Tag),
}

impl Record {
    pub fn title(&self) -> &str {
        match self {
            Record::Task(task) => &task.title,
            Record::Area(area) => &area.title,
            Record::Tag(tag) => &tag.title,
        }
    }

    pub fn is_project(&self) -> bool {
        matches!(self, Record::Task(task) if task.kind == TaskKind::Project)
    }
}
