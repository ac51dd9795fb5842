pub mod models;
pub mod query;
pub mod store;

pub use models::{Area, ChecklistItem, Record, StartList, Status, Tag, Task, TaskKind};
pub use query::{DateFilter, ListView, Period, TaskFilter};
pub use store::{ThingsDatabase, ThingsStore};
