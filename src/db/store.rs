use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OpenFlags, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::models::{Area, ChecklistItem, Record, StartList, Status, Tag, Task, TaskKind};
use super::query::{DateFilter, ListView, Period, TaskFilter};
use crate::utils::time::{format_epoch, pack_things_date, unpack_things_date};

/// Read access to the user's Things data.
pub trait ThingsStore {
    /// Looks an identifier up among tasks, areas and tags.
    fn get(&self, uuid: &str) -> Result<Option<Record>>;

    fn list(&self, view: ListView) -> Result<Vec<Task>>;

    /// Completed items created within `period`, most recently finished first.
    fn logbook(&self, period: Period) -> Result<Vec<Task>>;

    /// Open items created within `period`, newest first.
    fn recent(&self, period: Period) -> Result<Vec<Task>>;

    fn tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    fn projects(&self, area: Option<&str>) -> Result<Vec<Task>> {
        let filter = TaskFilter {
            kind: TaskKind::Project,
            area: area.map(str::to_string),
            ..TaskFilter::default()
        };
        self.tasks(&filter)
    }

    fn headings(&self, project: Option<&str>) -> Result<Vec<Task>> {
        let filter = TaskFilter {
            kind: TaskKind::Heading,
            project: project.map(str::to_string),
            ..TaskFilter::default()
        };
        self.tasks(&filter)
    }

    fn areas(&self) -> Result<Vec<Area>>;

    fn tags(&self) -> Result<Vec<Tag>>;

    /// Open to-dos and projects whose title or notes contain `query`.
    fn search(&self, query: &str) -> Result<Vec<Task>>;

    /// Token the URL scheme requires for update commands, if one is set.
    fn auth_token(&self) -> Result<Option<String>>;
}

const TASK_COLUMNS: &str = "SELECT TASK.uuid, TASK.type, TASK.title, TASK.status, TASK.start, TASK.notes,
        TASK.area, AREA.title, TASK.project, PROJECT.title, TASK.heading, HEADING.title,
        TASK.startDate, TASK.deadline, TASK.stopDate, TASK.creationDate, TASK.userModificationDate
     FROM TMTask AS TASK
     LEFT JOIN TMArea AS AREA ON AREA.uuid = TASK.area
     LEFT JOIN TMTask AS PROJECT ON PROJECT.uuid = TASK.project
     LEFT JOIN TMTask AS HEADING ON HEADING.uuid = TASK.heading
     LEFT JOIN TMTask AS HEADING_PROJECT ON HEADING_PROJECT.uuid = HEADING.project";

/// Items inside a trashed project are hidden everywhere but the trash.
const CONTEXT_NOT_TRASHED: &str =
    "COALESCE(PROJECT.trashed, 0) = 0 AND COALESCE(HEADING_PROJECT.trashed, 0) = 0";

/// WHERE clauses plus their positional parameters, in the same order.
#[derive(Default)]
struct Conditions {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl Conditions {
    fn add(&mut self, clause: impl Into<String>) -> &mut Self {
        self.clauses.push(clause.into());
        self
    }

    fn add_with(&mut self, clause: impl Into<String>, params: impl IntoIterator<Item = Value>) -> &mut Self {
        self.clauses.push(clause.into());
        self.params.extend(params);
        self
    }

    fn add_date(&mut self, column: &str, filter: DateFilter, today: i64) -> &mut Self {
        match filter {
            DateFilter::Set => self.add(format!("{} IS NOT NULL", column)),
            DateFilter::Unset => self.add(format!("{} IS NULL", column)),
            DateFilter::Past => self.add_with(format!("{} <= ?", column), [Value::Integer(today)]),
            DateFilter::Future => self.add_with(format!("{} > ?", column), [Value::Integer(today)]),
            DateFilter::Compare(cmp, date) => self.add_with(
                format!("{} {} ?", column, cmp.sql()),
                [Value::Integer(pack_things_date(date))],
            ),
        }
    }

    fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

pub struct ThingsDatabase {
    conn: Connection,
    path: PathBuf,
}

impl ThingsDatabase {
    /// Opens the database read-only; Things owns the file.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(anyhow!("Things database not found at {}", path.display()));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!("opened Things database at {}", path.display());
        Ok(ThingsDatabase {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn today() -> i64 {
        pack_things_date(Local::now().date_naive())
    }

    /// Epoch seconds `period` ago; clamps to the earliest time when that is unrepresentable.
    fn cutoff(period: Period) -> f64 {
        Local::now()
            .checked_sub_signed(period.duration())
            .map_or(f64::MIN, |start| start.timestamp() as f64)
    }

    fn query_tasks(&self, conditions: &Conditions, order_by: &str, include_items: bool) -> Result<Vec<Task>> {
        let sql = format!("{}{} ORDER BY {}", TASK_COLUMNS, conditions.where_sql(), order_by);
        debug!("task query: {} ({} params)", sql.replace('\n', " "), conditions.params.len());

        let mut stmt = self.conn.prepare(&sql)?;
        let mut tasks = stmt
            .query_map(params_from_iter(conditions.params.iter()), task_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for task in &mut tasks {
            task.tags = self.task_tags(&task.uuid)?;
            if include_items && task.kind == TaskKind::Todo {
                let items = self.checklist(&task.uuid)?;
                if !items.is_empty() {
                    task.checklist = Some(items);
                }
            }
        }

        Ok(tasks)
    }

    fn task_tags(&self, task_uuid: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT TAG.title
             FROM TMTaskTag AS TASK_TAG
             JOIN TMTag AS TAG ON TAG.uuid = TASK_TAG.tags
             WHERE TASK_TAG.tasks = ?1
             ORDER BY TAG.\"index\"",
        )?;

        let tags = stmt
            .query_map([task_uuid], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tags)
    }

    fn area_tags(&self, area_uuid: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT TAG.title
             FROM TMAreaTag AS AREA_TAG
             JOIN TMTag AS TAG ON TAG.uuid = AREA_TAG.tags
             WHERE AREA_TAG.areas = ?1
             ORDER BY TAG.\"index\"",
        )?;

        let tags = stmt
            .query_map([area_uuid], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tags)
    }

    fn checklist(&self, task_uuid: &str) -> Result<Vec<ChecklistItem>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT title, status
             FROM TMChecklistItem
             WHERE task = ?1
             ORDER BY \"index\"",
        )?;

        let items = stmt
            .query_map([task_uuid], |row| {
                Ok(ChecklistItem {
                    title: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                    status: Status::from_code(row.get(1)?).unwrap_or(Status::Incomplete),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn get_task(&self, uuid: &str) -> Result<Option<Task>> {
        let mut conditions = Conditions::default();
        conditions.add_with("TASK.uuid = ?", [Value::Text(uuid.to_string())]);
        Ok(self.query_tasks(&conditions, "TASK.uuid", false)?.into_iter().next())
    }

    fn get_area(&self, uuid: &str) -> Result<Option<Area>> {
        let area = self
            .conn
            .query_row(
                "SELECT uuid, title FROM TMArea WHERE uuid = ?1",
                [uuid],
                area_from_row,
            )
            .optional()?;

        match area {
            Some(mut area) => {
                area.tags = self.area_tags(&area.uuid)?;
                Ok(Some(area))
            }
            None => Ok(None),
        }
    }

    fn get_tag(&self, uuid: &str) -> Result<Option<Tag>> {
        let tag = self
            .conn
            .query_row(
                "SELECT uuid, title, shortcut FROM TMTag WHERE uuid = ?1",
                [uuid],
                tag_from_row,
            )
            .optional()?;
        Ok(tag)
    }

    /// Shared by every list of open, untrashed items.
    fn open_items() -> Conditions {
        let mut conditions = Conditions::default();
        conditions
            .add_with("TASK.status = ?", [Value::Integer(Status::Incomplete.code())])
            .add("TASK.trashed = 0")
            .add(CONTEXT_NOT_TRASHED);
        conditions
    }
}

impl ThingsStore for ThingsDatabase {
    fn get(&self, uuid: &str) -> Result<Option<Record>> {
        if let Some(task) = self.get_task(uuid)? {
            return Ok(Some(Record::Task(task)));
        }
        if let Some(area) = self.get_area(uuid)? {
            return Ok(Some(Record::Area(area)));
        }
        Ok(self.get_tag(uuid)?.map(Record::Tag))
    }

    fn list(&self, view: ListView) -> Result<Vec<Task>> {
        let today = ThingsDatabase::today();
        let not_heading = format!("TASK.type != {}", TaskKind::Heading.code());
        let start = |list: StartList| Value::Integer(list.code());

        let (conditions, order_by) = match view {
            ListView::Inbox => {
                let mut c = ThingsDatabase::open_items();
                c.add_with("TASK.type = ?", [Value::Integer(TaskKind::Todo.code())])
                    .add_with("TASK.start = ?", [start(StartList::Inbox)]);
                (c, "TASK.\"index\"")
            }
            ListView::Today => {
                let mut c = ThingsDatabase::open_items();
                c.add(not_heading)
                    .add_with(
                        "TASK.start IN (?, ?)",
                        [start(StartList::Anytime), start(StartList::Someday)],
                    )
                    .add_date("TASK.startDate", DateFilter::Past, today);
                (c, "TASK.todayIndex, TASK.startDate")
            }
            ListView::Upcoming => {
                let mut c = ThingsDatabase::open_items();
                c.add(not_heading)
                    .add_with("TASK.start = ?", [start(StartList::Someday)])
                    .add_date("TASK.startDate", DateFilter::Future, today);
                (c, "TASK.startDate, TASK.todayIndex")
            }
            ListView::Anytime => {
                let mut c = ThingsDatabase::open_items();
                c.add(not_heading)
                    .add_with("TASK.start = ?", [start(StartList::Anytime)]);
                (c, "TASK.\"index\"")
            }
            ListView::Someday => {
                let mut c = ThingsDatabase::open_items();
                c.add(not_heading)
                    .add_with("TASK.start = ?", [start(StartList::Someday)])
                    .add_date("TASK.startDate", DateFilter::Unset, today);
                (c, "TASK.\"index\"")
            }
            ListView::Trash => {
                let mut c = Conditions::default();
                c.add("TASK.trashed = 1");
                (c, "TASK.userModificationDate DESC")
            }
        };

        self.query_tasks(&conditions, order_by, true)
    }

    fn logbook(&self, period: Period) -> Result<Vec<Task>> {
        let mut conditions = Conditions::default();
        conditions
            .add_with("TASK.status = ?", [Value::Integer(Status::Completed.code())])
            .add("TASK.trashed = 0")
            .add(format!("TASK.type != {}", TaskKind::Heading.code()))
            .add_with("TASK.creationDate > ?", [Value::Real(ThingsDatabase::cutoff(period))]);

        self.query_tasks(&conditions, "TASK.stopDate DESC", true)
    }

    fn recent(&self, period: Period) -> Result<Vec<Task>> {
        let mut conditions = ThingsDatabase::open_items();
        conditions
            .add(format!("TASK.type != {}", TaskKind::Heading.code()))
            .add_with("TASK.creationDate > ?", [Value::Real(ThingsDatabase::cutoff(period))]);

        self.query_tasks(&conditions, "TASK.creationDate DESC", true)
    }

    fn tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let today = ThingsDatabase::today();
        let mut conditions = Conditions::default();
        conditions
            .add_with("TASK.type = ?", [Value::Integer(filter.kind.code())])
            .add("TASK.trashed = 0")
            .add(CONTEXT_NOT_TRASHED);

        if let Some(status) = filter.status {
            conditions.add_with("TASK.status = ?", [Value::Integer(status.code())]);
        }
        if let Some(project) = &filter.project {
            conditions.add_with(
                "(TASK.project = ? OR HEADING.project = ?)",
                [Value::Text(project.clone()), Value::Text(project.clone())],
            );
        }
        if let Some(area) = &filter.area {
            conditions.add_with(
                "(TASK.area = ? OR PROJECT.area = ?)",
                [Value::Text(area.clone()), Value::Text(area.clone())],
            );
        }
        if let Some(heading) = &filter.heading {
            conditions.add_with("TASK.heading = ?", [Value::Text(heading.clone())]);
        }
        if let Some(tag) = &filter.tag {
            conditions.add_with(
                "TASK.uuid IN (SELECT TASK_TAG.tasks FROM TMTaskTag AS TASK_TAG
                   JOIN TMTag AS TAG ON TAG.uuid = TASK_TAG.tags WHERE TAG.title = ?)",
                [Value::Text(tag.clone())],
            );
        }
        if let Some(start_date) = filter.start_date {
            conditions.add_date("TASK.startDate", start_date, today);
        }
        if let Some(deadline) = filter.deadline {
            conditions.add_date("TASK.deadline", deadline, today);
        }

        self.query_tasks(&conditions, "TASK.\"index\"", filter.include_items)
    }

    fn areas(&self) -> Result<Vec<Area>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, title FROM TMArea ORDER BY \"index\"")?;
        let mut areas = stmt
            .query_map([], area_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        for area in &mut areas {
            area.tags = self.area_tags(&area.uuid)?;
        }
        Ok(areas)
    }

    fn tags(&self) -> Result<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, title, shortcut FROM TMTag ORDER BY \"index\"")?;
        let tags = stmt
            .query_map([], tag_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn search(&self, query: &str) -> Result<Vec<Task>> {
        let mut conditions = ThingsDatabase::open_items();
        conditions
            .add(format!("TASK.type != {}", TaskKind::Heading.code()))
            .add_with(
                "(TASK.title LIKE '%' || ? || '%' OR TASK.notes LIKE '%' || ? || '%')",
                [Value::Text(query.to_string()), Value::Text(query.to_string())],
            );

        self.query_tasks(&conditions, "TASK.\"index\"", true)
    }

    fn auth_token(&self) -> Result<Option<String>> {
        let token: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT uriSchemeAuthenticationToken FROM TMSettings LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(token.flatten().filter(|t| !t.is_empty()))
    }
}

fn text_or_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn date_column(packed: Option<i64>) -> Option<String> {
    packed
        .and_then(unpack_things_date)
        .map(|date: NaiveDate| date.format("%Y-%m-%d").to_string())
}

fn task_from_row(row: &Row) -> rusqlite::Result<Task> {
    let kind_code: i64 = row.get(1)?;
    let status_code: i64 = row.get(3)?;

    Ok(Task {
        uuid: row.get(0)?,
        kind: TaskKind::from_code(kind_code).unwrap_or(TaskKind::Todo),
        title: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        status: Status::from_code(status_code).unwrap_or(Status::Incomplete),
        start: row.get::<_, Option<i64>>(4)?.and_then(StartList::from_code),
        notes: text_or_none(row.get(5)?),
        area: text_or_none(row.get(6)?),
        area_title: text_or_none(row.get(7)?),
        project: text_or_none(row.get(8)?),
        project_title: text_or_none(row.get(9)?),
        heading: text_or_none(row.get(10)?),
        heading_title: text_or_none(row.get(11)?),
        tags: Vec::new(),
        start_date: date_column(row.get(12)?),
        deadline: date_column(row.get(13)?),
        stop_date: row.get::<_, Option<f64>>(14)?.and_then(format_epoch),
        created: row.get::<_, Option<f64>>(15)?.and_then(format_epoch),
        modified: row.get::<_, Option<f64>>(16)?.and_then(format_epoch),
        checklist: None,
    })
}

fn area_from_row(row: &Row) -> rusqlite::Result<Area> {
    Ok(Area::new(
        row.get::<_, String>(0)?,
        row.get::<_, Option<String>>(1)?.unwrap_or_default(),
    ))
}

fn tag_from_row(row: &Row) -> rusqlite::Result<Tag> {
    Ok(Tag {
        uuid: row.get(0)?,
        title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        shortcut: text_or_none(row.get(2)?),
    })
}
