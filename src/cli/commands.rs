use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use super::args::Commands;
use crate::db::{DateFilter, ListView, Period, Status, Task, TaskFilter, TaskKind, ThingsStore};
use crate::error::{CliError, CliResult};
use crate::format::{join_blocks, Formatter};
use crate::url::builder::{self, NewProject, NewTodo, ProjectUpdate, TodoUpdate};
use crate::url::{UrlDispatcher, UrlRequest};
use crate::utils::split::split_csv;

/// The data source, or why there isn't one.
pub enum StoreAccess<'a> {
    Available(&'a dyn ThingsStore),
    Missing(String),
}

/// What a command runs against.
pub struct Session<'a> {
    pub store: StoreAccess<'a>,
    pub dispatcher: &'a dyn UrlDispatcher,
    pub json: bool,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a dyn ThingsStore, dispatcher: &'a dyn UrlDispatcher) -> Self {
        Session {
            store: StoreAccess::Available(store),
            dispatcher,
            json: false,
        }
    }

    pub fn without_store(message: impl Into<String>, dispatcher: &'a dyn UrlDispatcher) -> Self {
        Session {
            store: StoreAccess::Missing(message.into()),
            dispatcher,
            json: false,
        }
    }

    fn store(&self) -> CliResult<&'a dyn ThingsStore> {
        match &self.store {
            StoreAccess::Available(store) => Ok(*store),
            StoreAccess::Missing(message) => Err(CliError::MissingDependency {
                message: message.clone(),
            }),
        }
    }

    /// The update token when it can be read; any failure just means no token.
    fn auth_token(&self) -> Option<String> {
        let StoreAccess::Available(store) = &self.store else {
            return None;
        };
        match store.auth_token() {
            Ok(token) => token,
            Err(e) => {
                debug!("could not read auth token: {:#}", e);
                None
            }
        }
    }
}

pub fn handle_command(command: Commands, session: &Session, out: &mut dyn Write) -> CliResult<()> {
    match command {
        Commands::Inbox => list_view(session, out, ListView::Inbox),
        Commands::Today => list_view(session, out, ListView::Today),
        Commands::Upcoming => list_view(session, out, ListView::Upcoming),
        Commands::Anytime => list_view(session, out, ListView::Anytime),
        Commands::Someday => list_view(session, out, ListView::Someday),
        Commands::Trash => list_view(session, out, ListView::Trash),
        Commands::Logbook { period, limit } => {
            let period = Period::parse(&period)?;
            let store = session.store()?;
            let mut todos = store.logbook(period)?;
            todos.truncate(limit);
            print_todos(session, out, &todos, "No items found")
        }
        Commands::Recent { period } => {
            let parsed = Period::parse(&period)?;
            let store = session.store()?;
            let todos = store.recent(parsed)?;
            print_todos(session, out, &todos, &format!("No items found in the last {}", period))
        }
        Commands::Todos {
            project_uuid,
            area_uuid,
            tag,
            status,
            items,
        } => {
            let status = parse_status(status.as_deref())?;
            let store = session.store()?;
            if let Some(uuid) = &project_uuid {
                ensure_project(store, uuid)?;
            }

            let filter = TaskFilter {
                status: Some(status),
                project: project_uuid,
                area: area_uuid,
                tag,
                include_items: items.resolve(true),
                ..TaskFilter::default()
            };
            let todos = store.tasks(&filter)?;
            print_todos(session, out, &todos, "No todos found")
        }
        Commands::Projects { items } => {
            let store = session.store()?;
            let include_items = items.resolve(false);
            let projects = store.projects(None)?;
            let formatter = Formatter::new(store);
            print_records(session, out, &projects, "No projects found", |project| {
                formatter.project(project, include_items)
            })
        }
        Commands::Areas { items } => {
            let store = session.store()?;
            let include_items = items.resolve(false);
            let areas = store.areas()?;
            let formatter = Formatter::new(store);
            print_records(session, out, &areas, "No areas found", |area| {
                formatter.area(area, include_items)
            })
        }
        Commands::Tags { items } => {
            let store = session.store()?;
            let include_items = items.resolve(false);
            let tags = store.tags()?;
            let formatter = Formatter::new(store);
            print_records(session, out, &tags, "No tags found", |tag| {
                formatter.tag(tag, include_items)
            })
        }
        Commands::TaggedItems { tag } => {
            let store = session.store()?;
            let todos = store.tasks(&TaskFilter::tagged(tag.as_str()).with_items(true))?;
            print_todos(session, out, &todos, &format!("No items found with tag '{}'", tag))
        }
        Commands::Headings { project_uuid } => {
            let store = session.store()?;
            if let Some(uuid) = &project_uuid {
                ensure_project(store, uuid)?;
            }
            let headings = store.headings(project_uuid.as_deref())?;
            let formatter = Formatter::new(store);
            print_records(session, out, &headings, "No headings found", |heading| {
                formatter.heading(heading, false)
            })
        }
        Commands::Search { query } => {
            let store = session.store()?;
            let todos = store.search(&query)?;
            print_todos(session, out, &todos, &format!("No todos found matching '{}'", query))
        }
        Commands::SearchAdvanced {
            status,
            start_date,
            deadline,
            tag,
            area_uuid,
            kind,
        } => {
            // validate everything before touching the database
            let filter = TaskFilter {
                kind: kind.as_deref().map(str::parse::<TaskKind>).transpose()?.unwrap_or(TaskKind::Todo),
                status: Some(parse_status(status.as_deref())?),
                area: area_uuid,
                tag,
                start_date: start_date.as_deref().map(DateFilter::parse).transpose()?,
                deadline: deadline.as_deref().map(DateFilter::parse).transpose()?,
                include_items: true,
                ..TaskFilter::default()
            };
            let store = session.store()?;
            let todos = store.tasks(&filter)?;
            print_todos(session, out, &todos, "No matching todos found")
        }
        Commands::AddTodo {
            title,
            notes,
            when,
            deadline,
            tag,
            checklist,
            list_id,
            list_title,
            heading,
            heading_id,
            dry_run,
        } => {
            let request = builder::add_todo(NewTodo {
                title: title.clone(),
                notes,
                when,
                deadline,
                tags: split_csv(&tag),
                checklist_items: checklist,
                list_id,
                list_title,
                heading,
                heading_id,
            });
            send(session, out, &request, dry_run, &format!("Created new todo: {}", title))
        }
        Commands::AddProject {
            title,
            notes,
            when,
            deadline,
            tag,
            area_id,
            area_title,
            todo,
            dry_run,
        } => {
            let request = builder::add_project(NewProject {
                title: title.clone(),
                notes,
                when,
                deadline,
                tags: split_csv(&tag),
                area_id,
                area_title,
                todos: todo,
            });
            send(session, out, &request, dry_run, &format!("Created new project: {}", title))
        }
        Commands::UpdateTodo {
            id,
            title,
            notes,
            when,
            deadline,
            tag,
            completed,
            canceled,
            list,
            list_id,
            heading,
            heading_id,
            dry_run,
        } => {
            let request = builder::update_todo(TodoUpdate {
                id: id.clone(),
                title,
                notes,
                when,
                deadline,
                tags: split_csv(&tag),
                completed: completed.then_some(true),
                canceled: canceled.then_some(true),
                list,
                list_id,
                heading,
                heading_id,
            })
            .with_auth_token(session.auth_token());
            send(session, out, &request, dry_run, &format!("Updated todo with ID: {}", id))
        }
        Commands::UpdateProject {
            id,
            title,
            notes,
            when,
            deadline,
            tag,
            completed,
            canceled,
            dry_run,
        } => {
            let request = builder::update_project(ProjectUpdate {
                id: id.clone(),
                title,
                notes,
                when,
                deadline,
                tags: split_csv(&tag),
                completed: completed.then_some(true),
                canceled: canceled.then_some(true),
            })
            .with_auth_token(session.auth_token());
            send(session, out, &request, dry_run, &format!("Updated project with ID: {}", id))
        }
        Commands::Show {
            id,
            query,
            filter_tag,
            dry_run,
        } => {
            let request = builder::show(&id, query, split_csv(&filter_tag));
            send(session, out, &request, dry_run, &format!("Showing item: {}", id))
        }
        Commands::SearchItems { query, dry_run } => {
            let request = builder::search(&query);
            send(session, out, &request, dry_run, &format!("Searching for '{}'", query))
        }
    }
}

fn list_view(session: &Session, out: &mut dyn Write, view: ListView) -> CliResult<()> {
    let store = session.store()?;
    let todos = store.list(view)?;
    print_todos(session, out, &todos, "No items found")
}

fn parse_status(status: Option<&str>) -> CliResult<Status> {
    Ok(status.map(str::parse::<Status>).transpose()?.unwrap_or(Status::Incomplete))
}

/// Rejects identifiers that do not name a project.
fn ensure_project(store: &dyn ThingsStore, uuid: &str) -> CliResult<()> {
    match store.get(uuid)? {
        Some(record) if record.is_project() => Ok(()),
        _ => Err(CliError::validation(format!("Invalid project UUID '{}'", uuid))),
    }
}

fn print_todos(session: &Session, out: &mut dyn Write, todos: &[Task], empty_message: &str) -> CliResult<()> {
    let store = session.store()?;
    let formatter = Formatter::new(store);
    print_records(session, out, todos, empty_message, |todo| Ok(formatter.todo(todo)))
}

fn print_records<T, F>(
    session: &Session,
    out: &mut dyn Write,
    records: &[T],
    empty_message: &str,
    render: F,
) -> CliResult<()>
where
    T: Serialize,
    F: Fn(&T) -> Result<String>,
{
    if session.json {
        serde_json::to_writer_pretty(&mut *out, records).map_err(anyhow::Error::from)?;
        writeln!(out)?;
        return Ok(());
    }

    if records.is_empty() {
        writeln!(out, "{}", empty_message)?;
        return Ok(());
    }

    let blocks = records.iter().map(render).collect::<Result<Vec<_>>>()?;
    writeln!(out, "{}", join_blocks(&blocks))?;
    Ok(())
}

/// Prints the URL on a dry run, otherwise hands it to the dispatcher.
fn send(
    session: &Session,
    out: &mut dyn Write,
    request: &UrlRequest,
    dry_run: bool,
    confirmation: &str,
) -> CliResult<()> {
    let url = request.to_url();
    if dry_run {
        writeln!(out, "{}", url)?;
        return Ok(());
    }

    session.dispatcher.dispatch(&url);
    writeln!(out, "{}", confirmation)?;
    Ok(())
}
