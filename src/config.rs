use std::env;
use std::path::{Path, PathBuf};

/// Explicit path to the Things `main.sqlite`.
pub const DATABASE_ENV: &str = "THINGSDB";

/// Application name the scripting bridge talks to.
pub const APP_ENV: &str = "THINGS_APP";

pub const DEFAULT_APP_NAME: &str = "Things3";

const GROUP_CONTAINER: &str =
    "Library/Group Containers/JLMPQHK86H.com.culturedcode.ThingsMac";
const DATABASE_BUNDLE: &str = "Things Database.thingsdatabase";
const DATABASE_FILE: &str = "main.sqlite";

#[derive(Debug, Clone)]
pub struct ThingsConfig {
    /// Resolved database path, `None` when nothing was found.
    pub database_path: Option<PathBuf>,
    pub app_name: String,
}

impl ThingsConfig {
    pub fn from_env() -> Self {
        let database_path = match env::var_os(DATABASE_ENV) {
            Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => dirs::home_dir().and_then(|home| find_default_database(&home)),
        };

        let app_name = env::var(APP_ENV)
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());

        ThingsConfig {
            database_path,
            app_name,
        }
    }

    /// Where we looked, for the "database not found" hint.
    pub fn describe_search_location(&self) -> String {
        match &self.database_path {
            Some(path) => path.display().to_string(),
            None => format!("~/{}/ThingsData-*/{}/{}", GROUP_CONTAINER, DATABASE_BUNDLE, DATABASE_FILE),
        }
    }
}

/// Looks for the database under the Things group container.
///
/// Things 3.15+ nests the bundle in a `ThingsData-XXXXX` directory; older
/// versions keep it directly in the container.
pub fn find_default_database(home: &Path) -> Option<PathBuf> {
    let container = home.join(GROUP_CONTAINER);

    if let Ok(entries) = std::fs::read_dir(&container) {
        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with("ThingsData-"))
            .map(|entry| entry.path().join(DATABASE_BUNDLE).join(DATABASE_FILE))
            .filter(|path| path.is_file())
            .collect();
        candidates.sort();
        if let Some(path) = candidates.into_iter().next() {
            return Some(path);
        }
    }

    let legacy = container.join(DATABASE_BUNDLE).join(DATABASE_FILE);
    legacy.is_file().then_some(legacy)
}
