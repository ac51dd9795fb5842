#![allow(dead_code)]

use anyhow::{anyhow, Result};
use chrono::{Duration, Local, NaiveDate, Utc};
use rusqlite::{params, Connection};
use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use tempfile::TempDir;

use skill_utils::db::{Area, ListView, Period, Record, Tag, Task, TaskFilter, TaskKind, ThingsDatabase, ThingsStore};
use skill_utils::exec::CommandExecutor;
use skill_utils::install::detect::HostProbe;
use skill_utils::url::UrlDispatcher;
use skill_utils::utils::time::pack_things_date;

const SCHEMA: &str = r#"
CREATE TABLE TMTask (
    uuid TEXT PRIMARY KEY,
    type INTEGER NOT NULL DEFAULT 0,
    title TEXT,
    status INTEGER NOT NULL DEFAULT 0,
    start INTEGER,
    notes TEXT,
    area TEXT,
    project TEXT,
    heading TEXT,
    trashed INTEGER NOT NULL DEFAULT 0,
    startDate INTEGER,
    deadline INTEGER,
    stopDate REAL,
    creationDate REAL,
    userModificationDate REAL,
    "index" INTEGER NOT NULL DEFAULT 0,
    todayIndex INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE TMArea (uuid TEXT PRIMARY KEY, title TEXT, visible INTEGER, "index" INTEGER NOT NULL DEFAULT 0);
CREATE TABLE TMTag (uuid TEXT PRIMARY KEY, title TEXT, shortcut TEXT, parent TEXT, "index" INTEGER NOT NULL DEFAULT 0);
CREATE TABLE TMTaskTag (tasks TEXT NOT NULL, tags TEXT NOT NULL);
CREATE TABLE TMAreaTag (areas TEXT NOT NULL, tags TEXT NOT NULL);
CREATE TABLE TMChecklistItem (uuid TEXT PRIMARY KEY, title TEXT, status INTEGER NOT NULL DEFAULT 0, task TEXT, "index" INTEGER NOT NULL DEFAULT 0);
CREATE TABLE TMSettings (uuid TEXT PRIMARY KEY, uriSchemeAuthenticationToken TEXT);
"#;

/// Row values for one TMTask insert.
pub struct TaskRow {
    pub uuid: &'static str,
    pub kind: i64,
    pub title: &'static str,
    pub status: i64,
    pub start: Option<i64>,
    pub notes: Option<&'static str>,
    pub area: Option<&'static str>,
    pub project: Option<&'static str>,
    pub heading: Option<&'static str>,
    pub trashed: bool,
    pub start_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub stop_days_ago: Option<i64>,
    pub created_days_ago: f64,
    pub index: i64,
}

impl TaskRow {
    pub fn todo(uuid: &'static str, title: &'static str) -> Self {
        TaskRow {
            uuid,
            kind: 0,
            title,
            status: 0,
            start: Some(1),
            notes: None,
            area: None,
            project: None,
            heading: None,
            trashed: false,
            start_date: None,
            deadline: None,
            stop_days_ago: None,
            created_days_ago: 3.0,
            index: 0,
        }
    }
}

fn epoch_days_ago(days: f64) -> f64 {
    Utc::now().timestamp() as f64 - days * 86_400.0
}

pub fn insert_task(conn: &Connection, row: &TaskRow) -> Result<()> {
    conn.execute(
        "INSERT INTO TMTask (uuid, type, title, status, start, notes, area, project, heading, trashed,
                             startDate, deadline, stopDate, creationDate, userModificationDate, \"index\")
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            row.uuid,
            row.kind,
            row.title,
            row.status,
            row.start,
            row.notes,
            row.area,
            row.project,
            row.heading,
            row.trashed as i64,
            row.start_date.map(pack_things_date),
            row.deadline.map(pack_things_date),
            row.stop_days_ago.map(|d| epoch_days_ago(d as f64)),
            epoch_days_ago(row.created_days_ago),
            epoch_days_ago(row.created_days_ago),
            row.index,
        ],
    )?;
    Ok(())
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Builds a Things-shaped database with a small, known data set:
///
/// - areas `A-work` "Work" (tagged `urgent`), `A-home` "Home"
/// - tags `TG-urgent` "urgent" (shortcut u), `TG-errand` "errand"
/// - project `P-launch` "Launch" in Work, heading `H-phase` "Phase 1"
/// - to-dos: "Write proposal" (today, in Launch, urgent, 2 checklist items),
///   "Review copy" (under Phase 1), "Buy milk" (inbox, errand), "Learn piano"
///   (someday), "Dentist" (upcoming), "Old report" (completed), "Discarded"
///   (trashed), "Garden" (in Home)
pub fn create_test_db() -> Result<(ThingsDatabase, TempDir)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("main.sqlite");

    {
        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA)?;

        conn.execute_batch(
            "INSERT INTO TMArea (uuid, title, visible, \"index\") VALUES ('A-work', 'Work', 1, 0), ('A-home', 'Home', 1, 1);
             INSERT INTO TMTag (uuid, title, shortcut, \"index\") VALUES ('TG-urgent', 'urgent', 'u', 0), ('TG-errand', 'errand', NULL, 1);
             INSERT INTO TMAreaTag (areas, tags) VALUES ('A-work', 'TG-urgent');
             INSERT INTO TMSettings (uuid, uriSchemeAuthenticationToken) VALUES ('settings', 'secret-token');",
        )?;

        let rows = vec![
            TaskRow {
                kind: 1,
                area: Some("A-work"),
                created_days_ago: 10.0,
                ..TaskRow::todo("P-launch", "Launch")
            },
            TaskRow {
                kind: 2,
                project: Some("P-launch"),
                ..TaskRow::todo("H-phase", "Phase 1")
            },
            TaskRow {
                project: Some("P-launch"),
                start_date: Some(today()),
                index: 1,
                ..TaskRow::todo("TD-proposal", "Write proposal")
            },
            TaskRow {
                heading: Some("H-phase"),
                index: 2,
                ..TaskRow::todo("TD-review", "Review copy")
            },
            TaskRow {
                start: Some(0),
                notes: Some("2 liters"),
                created_days_ago: 0.05,
                ..TaskRow::todo("TD-milk", "Buy milk")
            },
            TaskRow {
                start: Some(2),
                ..TaskRow::todo("TD-piano", "Learn piano")
            },
            TaskRow {
                start: Some(2),
                start_date: Some(today() + Duration::days(5)),
                deadline: Some(today() + Duration::days(6)),
                ..TaskRow::todo("TD-dentist", "Dentist")
            },
            TaskRow {
                status: 3,
                stop_days_ago: Some(1),
                created_days_ago: 2.0,
                ..TaskRow::todo("TD-report", "Old report")
            },
            TaskRow {
                trashed: true,
                ..TaskRow::todo("TD-trash", "Discarded")
            },
            TaskRow {
                area: Some("A-home"),
                ..TaskRow::todo("TD-garden", "Garden")
            },
        ];
        for row in &rows {
            insert_task(&conn, row)?;
        }

        conn.execute_batch(
            "INSERT INTO TMTaskTag (tasks, tags) VALUES ('TD-proposal', 'TG-urgent'), ('TD-milk', 'TG-errand');
             INSERT INTO TMChecklistItem (uuid, title, status, task, \"index\") VALUES
                ('C-1', 'Outline', 3, 'TD-proposal', 0),
                ('C-2', 'Draft', 0, 'TD-proposal', 1);",
        )?;
    }

    let db = ThingsDatabase::open(&path)?;
    Ok((db, dir))
}

pub fn titles(tasks: &[Task]) -> Vec<String> {
    let mut titles: Vec<String> = tasks.iter().map(|t| t.title.clone()).collect();
    titles.sort();
    titles
}

/// In-memory store for formatter and command tests.
#[derive(Default)]
pub struct MemoryStore {
    pub tasks: Vec<Task>,
    pub areas: Vec<Area>,
    pub tags: Vec<Tag>,
    pub token: Option<String>,
    pub fail_lookups: bool,
    pub task_queries: Cell<usize>,
}

impl MemoryStore {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        MemoryStore {
            tasks,
            ..MemoryStore::default()
        }
    }

    fn task_tags(&self, task: &Task, title: &str) -> bool {
        task.tags.iter().any(|t| t == title)
    }
}

impl ThingsStore for MemoryStore {
    fn get(&self, uuid: &str) -> Result<Option<Record>> {
        if self.fail_lookups {
            return Err(anyhow!("lookup failed"));
        }
        if let Some(task) = self.tasks.iter().find(|t| t.uuid == uuid) {
            return Ok(Some(Record::Task(task.clone())));
        }
        if let Some(area) = self.areas.iter().find(|a| a.uuid == uuid) {
            return Ok(Some(Record::Area(area.clone())));
        }
        Ok(self.tags.iter().find(|t| t.uuid == uuid).cloned().map(Record::Tag))
    }

    fn list(&self, _view: ListView) -> Result<Vec<Task>> {
        self.task_queries.set(self.task_queries.get() + 1);
        Ok(self.tasks.iter().filter(|t| t.kind == TaskKind::Todo).cloned().collect())
    }

    fn logbook(&self, _period: Period) -> Result<Vec<Task>> {
        self.task_queries.set(self.task_queries.get() + 1);
        Ok(self.tasks.clone())
    }

    fn recent(&self, _period: Period) -> Result<Vec<Task>> {
        self.task_queries.set(self.task_queries.get() + 1);
        Ok(self.tasks.clone())
    }

    fn tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        self.task_queries.set(self.task_queries.get() + 1);
        Ok(self
            .tasks
            .iter()
            .filter(|t| t.kind == filter.kind)
            .filter(|t| filter.status.map_or(true, |s| t.status == s))
            .filter(|t| filter.project.as_ref().map_or(true, |p| t.project.as_ref() == Some(p)))
            .filter(|t| filter.area.as_ref().map_or(true, |a| t.area.as_ref() == Some(a)))
            .filter(|t| filter.heading.as_ref().map_or(true, |h| t.heading.as_ref() == Some(h)))
            .filter(|t| filter.tag.as_ref().map_or(true, |tag| self.task_tags(t, tag)))
            .cloned()
            .collect())
    }

    fn areas(&self) -> Result<Vec<Area>> {
        Ok(self.areas.clone())
    }

    fn tags(&self) -> Result<Vec<Tag>> {
        Ok(self.tags.clone())
    }

    fn search(&self, query: &str) -> Result<Vec<Task>> {
        self.task_queries.set(self.task_queries.get() + 1);
        Ok(self.tasks.iter().filter(|t| t.title.contains(query)).cloned().collect())
    }

    fn auth_token(&self) -> Result<Option<String>> {
        Ok(self.token.clone())
    }
}

/// Remembers every URL instead of opening it.
#[derive(Default)]
pub struct RecordingDispatcher {
    pub urls: RefCell<Vec<String>>,
}

impl UrlDispatcher for RecordingDispatcher {
    fn dispatch(&self, url: &str) {
        self.urls.borrow_mut().push(url.to_string());
    }
}

/// PATH lookup against a fixed set of names.
#[derive(Default)]
pub struct FakeProbe {
    pub executables: HashSet<String>,
}

impl FakeProbe {
    pub fn with(names: &[&str]) -> Self {
        FakeProbe {
            executables: names.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl HostProbe for FakeProbe {
    fn has_executable(&self, name: &str) -> bool {
        self.executables.contains(name)
    }
}

/// Records argv lists and answers with queued exit codes (0 once the queue is empty).
#[derive(Default)]
pub struct FakeExecutor {
    pub calls: Vec<Vec<String>>,
    pub exit_codes: VecDeque<Option<i32>>,
}

impl FakeExecutor {
    pub fn with_codes(codes: &[Option<i32>]) -> Self {
        FakeExecutor {
            calls: Vec::new(),
            exit_codes: codes.iter().copied().collect(),
        }
    }
}

impl CommandExecutor for FakeExecutor {
    fn run(&mut self, argv: &[String]) -> Result<Option<i32>> {
        self.calls.push(argv.to_vec());
        Ok(self.exit_codes.pop_front().unwrap_or(Some(0)))
    }
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn output_of(buf: Vec<u8>) -> String {
    String::from_utf8(buf).expect("utf-8 output")
}
