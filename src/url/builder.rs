use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

pub const SCHEME: &str = "things:///";

/// Everything but unreserved characters and `/` is escaped, so spaces become `%20`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlCommand {
    Add,
    AddProject,
    Update,
    UpdateProject,
    Show,
    Search,
}

impl UrlCommand {
    pub fn verb(&self) -> &'static str {
        match self {
            UrlCommand::Add => "add",
            UrlCommand::AddProject => "add-project",
            UrlCommand::Update => "update",
            UrlCommand::UpdateProject => "update-project",
            UrlCommand::Show => "show",
            UrlCommand::Search => "search",
        }
    }

    /// Commands that modify existing items must carry the auth token.
    pub fn requires_auth(&self) -> bool {
        matches!(self, UrlCommand::Update | UrlCommand::UpdateProject)
    }
}

/// A parameter value together with how it is serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    /// Serialized as `true` / `false`.
    Flag(bool),
    /// Items joined with the separator before encoding.
    List(Vec<String>, &'static str),
}

impl ParamValue {
    pub fn serialize(&self) -> String {
        match self {
            ParamValue::Text(text) => text.clone(),
            ParamValue::Flag(flag) => flag.to_string(),
            ParamValue::List(items, separator) => items.join(separator),
        }
    }
}

/// One URL-scheme call: a verb plus parameters in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRequest {
    command: UrlCommand,
    params: Vec<(&'static str, ParamValue)>,
}

impl UrlRequest {
    pub fn new(command: UrlCommand) -> Self {
        UrlRequest {
            command,
            params: Vec::new(),
        }
    }

    pub fn command(&self) -> UrlCommand {
        self.command
    }

    pub fn params(&self) -> &[(&'static str, ParamValue)] {
        &self.params
    }

    /// Absent and empty values are skipped.
    pub fn text(mut self, name: &'static str, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value.map(Into::into).filter(|v: &String| !v.is_empty()) {
            self.params.push((name, ParamValue::Text(value)));
        }
        self
    }

    pub fn flag(mut self, name: &'static str, value: Option<bool>) -> Self {
        if let Some(value) = value {
            self.params.push((name, ParamValue::Flag(value)));
        }
        self
    }

    /// Comma-joined list; empty lists are skipped.
    pub fn list(self, name: &'static str, values: Option<Vec<String>>) -> Self {
        self.joined(name, values, ",")
    }

    /// Newline-joined list, used for multi-line fields like checklist items.
    pub fn lines(self, name: &'static str, values: Option<Vec<String>>) -> Self {
        self.joined(name, values, "\n")
    }

    fn joined(mut self, name: &'static str, values: Option<Vec<String>>, separator: &'static str) -> Self {
        if let Some(values) = values.filter(|v| !v.is_empty()) {
            self.params.push((name, ParamValue::List(values, separator)));
        }
        self
    }

    /// Appends `auth-token` for update commands; other commands and a missing token are no-ops.
    pub fn with_auth_token(self, token: Option<String>) -> Self {
        if self.command.requires_auth() {
            self.text("auth-token", token)
        } else {
            self
        }
    }

    pub fn to_url(&self) -> String {
        let mut url = format!("{}{}", SCHEME, self.command.verb());
        if self.params.is_empty() {
            return url;
        }

        let query: Vec<String> = self
            .params
            .iter()
            .map(|(name, value)| format!("{}={}", name, encode(&value.serialize())))
            .collect();
        url.push('?');
        url.push_str(&query.join("&"));
        url
    }
}

impl fmt::Display for UrlRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

pub fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

#[derive(Debug, Clone, Default)]
pub struct NewTodo {
    pub title: String,
    pub notes: Option<String>,
    pub when: Option<String>,
    pub deadline: Option<String>,
    pub tags: Vec<String>,
    pub checklist_items: Vec<String>,
    pub list_id: Option<String>,
    pub list_title: Option<String>,
    pub heading: Option<String>,
    pub heading_id: Option<String>,
}

pub fn add_todo(todo: NewTodo) -> UrlRequest {
    UrlRequest::new(UrlCommand::Add)
        .text("title", Some(todo.title))
        .text("notes", todo.notes)
        .text("when", todo.when)
        .text("deadline", todo.deadline)
        .lines("checklist-items", Some(todo.checklist_items))
        .text("list-id", todo.list_id)
        .text("list", todo.list_title)
        .text("heading", todo.heading)
        .text("heading-id", todo.heading_id)
        .list("tags", Some(todo.tags))
}

#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub title: String,
    pub notes: Option<String>,
    pub when: Option<String>,
    pub deadline: Option<String>,
    pub tags: Vec<String>,
    pub area_id: Option<String>,
    pub area_title: Option<String>,
    pub todos: Vec<String>,
}

pub fn add_project(project: NewProject) -> UrlRequest {
    UrlRequest::new(UrlCommand::AddProject)
        .text("title", Some(project.title))
        .text("notes", project.notes)
        .text("when", project.when)
        .text("deadline", project.deadline)
        .text("area-id", project.area_id)
        .text("area", project.area_title)
        .lines("to-dos", Some(project.todos))
        .list("tags", Some(project.tags))
}

/// Changes to an existing to-do. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct TodoUpdate {
    pub id: String,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub when: Option<String>,
    pub deadline: Option<String>,
    pub tags: Vec<String>,
    pub completed: Option<bool>,
    pub canceled: Option<bool>,
    pub list: Option<String>,
    pub list_id: Option<String>,
    pub heading: Option<String>,
    pub heading_id: Option<String>,
}

pub fn update_todo(update: TodoUpdate) -> UrlRequest {
    UrlRequest::new(UrlCommand::Update)
        .text("id", Some(update.id))
        .text("title", update.title)
        .text("notes", update.notes)
        .text("when", update.when)
        .text("deadline", update.deadline)
        .list("tags", Some(update.tags))
        .flag("completed", update.completed)
        .flag("canceled", update.canceled)
        .text("list", update.list)
        .text("list-id", update.list_id)
        .text("heading", update.heading)
        .text("heading-id", update.heading_id)
}

#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub id: String,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub when: Option<String>,
    pub deadline: Option<String>,
    pub tags: Vec<String>,
    pub completed: Option<bool>,
    pub canceled: Option<bool>,
}

pub fn update_project(update: ProjectUpdate) -> UrlRequest {
    UrlRequest::new(UrlCommand::UpdateProject)
        .text("id", Some(update.id))
        .text("title", update.title)
        .text("notes", update.notes)
        .text("when", update.when)
        .text("deadline", update.deadline)
        .list("tags", Some(update.tags))
        .flag("completed", update.completed)
        .flag("canceled", update.canceled)
}

pub fn show(id: &str, query: Option<String>, filter_tags: Vec<String>) -> UrlRequest {
    UrlRequest::new(UrlCommand::Show)
        .text("id", Some(id))
        .text("query", query)
        .list("filter", Some(filter_tags))
}

pub fn search(query: &str) -> UrlRequest {
    UrlRequest::new(UrlCommand::Search).text("query", Some(query))
}
