//! Plain-text rendering of Things records.
//!
//! Every block starts with `Title:` and `UUID:` lines; optional fields follow
//! only when present. Lookups needed for a single optional line (parent titles,
//! ages) are best-effort: when they fail the line is left out.

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use tracing::debug;

use crate::db::{Area, Status, Tag, Task, TaskFilter, ThingsStore};
use crate::utils::time::age_from_str;

/// Placed between records when a list is printed.
pub const SEPARATOR: &str = "\n\n---\n\n";

const CHECKED: &str = "✓";
const UNCHECKED: &str = "☐";

pub fn join_blocks(blocks: &[String]) -> String {
    blocks.join(SEPARATOR)
}

pub struct Formatter<'a> {
    store: &'a dyn ThingsStore,
    now: NaiveDateTime,
}

impl<'a> Formatter<'a> {
    pub fn new(store: &'a dyn ThingsStore) -> Self {
        Formatter::with_clock(store, Local::now().naive_local())
    }

    /// Ages are computed against `now` instead of the wall clock.
    pub fn with_clock(store: &'a dyn ThingsStore, now: NaiveDateTime) -> Self {
        Formatter { store, now }
    }

    pub fn todo(&self, todo: &Task) -> String {
        let mut text = header(&todo.title, &todo.uuid);
        line(&mut text, "Type", todo.kind.as_str());
        line(&mut text, "Status", todo.status.as_str());

        if let Some(start) = todo.start {
            line(&mut text, "List", start.as_str());
        }
        optional_line(&mut text, "Start Date", todo.start_date.as_deref());
        optional_line(&mut text, "Deadline", todo.deadline.as_deref());
        optional_line(&mut text, "Completed", todo.stop_date.as_deref());

        self.timestamps(&mut text, todo.created.as_deref(), todo.modified.as_deref());
        optional_line(&mut text, "Notes", todo.notes.as_deref());

        let project = self.parent_title(todo.project.as_deref(), todo.project_title.as_deref());
        optional_line(&mut text, "Project", project.as_deref());
        let heading = self.parent_title(todo.heading.as_deref(), todo.heading_title.as_deref());
        optional_line(&mut text, "Heading", heading.as_deref());
        let area = self.parent_title(todo.area.as_deref(), todo.area_title.as_deref());
        optional_line(&mut text, "Area", area.as_deref());

        if !todo.tags.is_empty() {
            line(&mut text, "Tags", &todo.tags.join(", "));
        }

        if let Some(checklist) = &todo.checklist {
            text.push_str("\nChecklist:");
            for item in checklist {
                let mark = if item.status == Status::Completed { CHECKED } else { UNCHECKED };
                text.push_str(&format!("\n  {} {}", mark, item.title));
            }
        }

        text
    }

    /// Headings are always listed; the project's to-dos only with `include_items`.
    pub fn project(&self, project: &Task, include_items: bool) -> Result<String> {
        let mut text = header(&project.title, &project.uuid);

        let area = self.parent_title(project.area.as_deref(), project.area_title.as_deref());
        optional_line(&mut text, "Area", area.as_deref());
        optional_line(&mut text, "Notes", project.notes.as_deref());
        self.timestamps(&mut text, project.created.as_deref(), project.modified.as_deref());

        let headings = self.store.headings(Some(project.uuid.as_str()))?;
        child_section(&mut text, "Headings", &headings);

        if include_items {
            let todos = self.store.tasks(&TaskFilter::in_project(&project.uuid))?;
            child_section(&mut text, "Tasks", &todos);
        }

        Ok(text)
    }

    pub fn area(&self, area: &Area, include_items: bool) -> Result<String> {
        let mut text = header(&area.title, &area.uuid);
        if !area.tags.is_empty() {
            line(&mut text, "Tags", &area.tags.join(", "));
        }

        if include_items {
            let projects = self.store.projects(Some(area.uuid.as_str()))?;
            child_section(&mut text, "Projects", &projects);

            let todos = self.store.tasks(&TaskFilter::in_area(&area.uuid))?;
            child_section(&mut text, "Tasks", &todos);
        }

        Ok(text)
    }

    pub fn tag(&self, tag: &Tag, include_items: bool) -> Result<String> {
        let mut text = header(&tag.title, &tag.uuid);
        optional_line(&mut text, "Shortcut", tag.shortcut.as_deref());

        if include_items {
            let todos = self.store.tasks(&TaskFilter::tagged(&tag.title))?;
            child_section(&mut text, "Tagged Items", &todos);
        }

        Ok(text)
    }

    pub fn heading(&self, heading: &Task, include_items: bool) -> Result<String> {
        let mut text = header(&heading.title, &heading.uuid);
        line(&mut text, "Type", "heading");

        let project = self.parent_title(heading.project.as_deref(), heading.project_title.as_deref());
        optional_line(&mut text, "Project", project.as_deref());
        self.timestamps(&mut text, heading.created.as_deref(), heading.modified.as_deref());
        optional_line(&mut text, "Notes", heading.notes.as_deref());

        if include_items {
            let todos = self.store.tasks(&TaskFilter::under_heading(&heading.uuid))?;
            child_section(&mut text, "Tasks under heading", &todos);
        }

        Ok(text)
    }

    fn timestamps(&self, text: &mut String, created: Option<&str>, modified: Option<&str>) {
        if let Some(created) = non_empty(created) {
            line(text, "Created", created);
            if let Some(age) = self.age(created) {
                line(text, "Age", &age);
            }
        }
        if let Some(modified) = non_empty(modified) {
            line(text, "Modified", modified);
            if let Some(age) = self.age(modified) {
                line(text, "Last modified", &age);
            }
        }
    }

    fn age(&self, timestamp: &str) -> Option<String> {
        let age = age_from_str(timestamp, self.now);
        if age.is_none() {
            debug!("unparseable timestamp {:?}, omitting age", timestamp);
        }
        age
    }

    /// Title of a referenced record: the joined title if we have it, otherwise a lookup.
    fn parent_title(&self, uuid: Option<&str>, known_title: Option<&str>) -> Option<String> {
        let uuid = non_empty(uuid)?;
        if let Some(title) = non_empty(known_title) {
            return Some(title.to_string());
        }

        match self.store.get(uuid) {
            Ok(Some(record)) => Some(record.title().to_string()),
            Ok(None) => {
                debug!("reference {} not found, omitting", uuid);
                None
            }
            Err(e) => {
                debug!("lookup of {} failed, omitting: {:#}", uuid, e);
                None
            }
        }
    }
}

fn header(title: &str, uuid: &str) -> String {
    format!("Title: {}\nUUID: {}", title, uuid)
}

fn line(text: &mut String, label: &str, value: &str) {
    text.push_str(&format!("\n{}: {}", label, value));
}

fn optional_line(text: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = non_empty(value) {
        line(text, label, value);
    }
}

fn child_section(text: &mut String, label: &str, children: &[Task]) {
    if children.is_empty() {
        return;
    }
    text.push_str(&format!("\n\n{}:", label));
    for child in children {
        text.push_str(&format!("\n- {}", child.title));
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
