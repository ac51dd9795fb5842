use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "things", author, version, about = "Things 3 task manager CLI", long_about = None)]
pub struct Cli {
    /// Print read results as JSON instead of text blocks
    #[arg(long, global = true)]
    pub json: bool,

    /// Print debug logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// `--include-items` / `--no-include-items`; the last one given wins.
#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncludeItems {
    /// Include nested items
    #[arg(long = "include-items", overrides_with = "no_include_items")]
    pub include_items: bool,

    /// Leave nested items out
    #[arg(long = "no-include-items", overrides_with = "include_items")]
    pub no_include_items: bool,
}

impl IncludeItems {
    pub fn resolve(&self, default: bool) -> bool {
        if self.include_items {
            true
        } else if self.no_include_items {
            false
        } else {
            default
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List Inbox items
    Inbox,
    /// List Today items
    Today,
    /// List Upcoming items
    Upcoming,
    /// List Anytime items
    Anytime,
    /// List Someday items
    Someday,
    /// List trashed items
    Trash,
    /// List completed items from the Logbook
    Logbook {
        /// Lookback period, e.g. 3d, 1w, 2m, 1y
        #[arg(long, default_value = "7d")]
        period: String,

        /// Maximum number of entries to show
        #[arg(long, default_value = "50")]
        limit: usize,
    },
    /// List recently created items
    Recent {
        /// Lookback period, e.g. 3d, 1w, 2m, 1y
        period: String,
    },
    /// List to-dos with optional filters
    Todos {
        /// Filter by project UUID
        #[arg(long)]
        project_uuid: Option<String>,

        /// Filter by area UUID
        #[arg(long)]
        area_uuid: Option<String>,

        /// Filter by tag title
        #[arg(long)]
        tag: Option<String>,

        /// Filter by status (incomplete, completed, canceled)
        #[arg(long)]
        status: Option<String>,

        // Checklist items are included unless --no-include-items is given
        #[command(flatten)]
        items: IncludeItems,
    },
    /// List projects
    Projects {
        // Include the to-dos of each project
        #[command(flatten)]
        items: IncludeItems,
    },
    /// List areas
    Areas {
        // Include the projects and to-dos of each area
        #[command(flatten)]
        items: IncludeItems,
    },
    /// List tags
    Tags {
        // Include the items carrying each tag
        #[command(flatten)]
        items: IncludeItems,
    },
    /// List items with a specific tag
    TaggedItems {
        /// Tag title to filter by
        tag: String,
    },
    /// List headings, optionally within one project
    Headings {
        /// Project UUID to filter headings by
        #[arg(long)]
        project_uuid: Option<String>,
    },
    /// Search to-dos by title and notes
    Search {
        /// Search term
        query: String,
    },
    /// Search with several filters at once
    SearchAdvanced {
        /// Status: incomplete, completed, canceled
        #[arg(long)]
        status: Option<String>,

        /// Start date: YYYY-MM-DD (optionally prefixed by <, <=, >, >=), past or future
        #[arg(long)]
        start_date: Option<String>,

        /// Deadline: YYYY-MM-DD (optionally prefixed by <, <=, >, >=), past or future
        #[arg(long)]
        deadline: Option<String>,

        /// Tag title
        #[arg(long)]
        tag: Option<String>,

        /// Area UUID
        #[arg(long)]
        area_uuid: Option<String>,

        /// Item type: to-do, project, heading
        #[arg(long = "type")]
        kind: Option<String>,
    },
    /// Create a new to-do
    AddTodo {
        /// To-do title
        #[arg(long)]
        title: String,

        /// To-do notes
        #[arg(long)]
        notes: Option<String>,

        /// today, tomorrow, evening, anytime, someday, or YYYY-MM-DD
        #[arg(long)]
        when: Option<String>,

        /// Deadline YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,

        /// Tag(s); repeat or separate with commas
        #[arg(long)]
        tag: Vec<String>,

        /// Checklist item; repeat for several
        #[arg(long)]
        checklist: Vec<String>,

        /// Project or area UUID to add into
        #[arg(long)]
        list_id: Option<String>,

        /// Project or area title to add into
        #[arg(long)]
        list_title: Option<String>,

        /// Heading title to add under
        #[arg(long)]
        heading: Option<String>,

        /// Heading UUID to add under (takes precedence over --heading)
        #[arg(long)]
        heading_id: Option<String>,

        /// Print the generated URL instead of opening Things
        #[arg(long)]
        dry_run: bool,
    },
    /// Create a new project
    AddProject {
        /// Project title
        #[arg(long)]
        title: String,

        /// Project notes
        #[arg(long)]
        notes: Option<String>,

        /// today, tomorrow, evening, anytime, someday, or YYYY-MM-DD
        #[arg(long)]
        when: Option<String>,

        /// Deadline YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,

        /// Tag(s); repeat or separate with commas
        #[arg(long)]
        tag: Vec<String>,

        /// Area UUID to add into
        #[arg(long)]
        area_id: Option<String>,

        /// Area title to add into
        #[arg(long)]
        area_title: Option<String>,

        /// Initial to-do title; repeat for several
        #[arg(long)]
        todo: Vec<String>,

        /// Print the generated URL instead of opening Things
        #[arg(long)]
        dry_run: bool,
    },
    /// Update an existing to-do
    UpdateTodo {
        /// To-do UUID
        #[arg(long)]
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New notes
        #[arg(long)]
        notes: Option<String>,

        /// New schedule
        #[arg(long)]
        when: Option<String>,

        /// New deadline YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,

        /// Tag(s); repeat or separate with commas
        #[arg(long)]
        tag: Vec<String>,

        /// Mark as completed
        #[arg(long)]
        completed: bool,

        /// Mark as canceled
        #[arg(long)]
        canceled: bool,

        /// Move into a project or area by title
        #[arg(long)]
        list: Option<String>,

        /// Move into a project or area by UUID (takes precedence over --list)
        #[arg(long)]
        list_id: Option<String>,

        /// Move under a heading by title
        #[arg(long)]
        heading: Option<String>,

        /// Move under a heading by UUID (takes precedence over --heading)
        #[arg(long)]
        heading_id: Option<String>,

        /// Print the generated URL instead of opening Things
        #[arg(long)]
        dry_run: bool,
    },
    /// Update an existing project
    UpdateProject {
        /// Project UUID
        #[arg(long)]
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New notes
        #[arg(long)]
        notes: Option<String>,

        /// New schedule
        #[arg(long)]
        when: Option<String>,

        /// New deadline YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,

        /// Tag(s); repeat or separate with commas
        #[arg(long)]
        tag: Vec<String>,

        /// Mark as completed
        #[arg(long)]
        completed: bool,

        /// Mark as canceled
        #[arg(long)]
        canceled: bool,

        /// Print the generated URL instead of opening Things
        #[arg(long)]
        dry_run: bool,
    },
    /// Open a list or item in Things
    Show {
        /// UUID or built-in list id (inbox, today, upcoming, anytime, someday, logbook)
        id: String,

        /// Optional query filter
        #[arg(long)]
        query: Option<String>,

        /// Filter tag(s); repeat or separate with commas
        #[arg(long)]
        filter_tag: Vec<String>,

        /// Print the generated URL instead of opening Things
        #[arg(long)]
        dry_run: bool,
    },
    /// Open the Things search UI for a query
    SearchItems {
        /// Search query
        query: String,

        /// Print the generated URL instead of opening Things
        #[arg(long)]
        dry_run: bool,
    },
}
