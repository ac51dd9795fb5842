use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::packages::PackageManager;

pub const OS_RELEASE_PATH: &str = "/etc/os-release";

const DEBIAN_IDS: [&str; 5] = ["debian", "ubuntu", "linuxmint", "pop", "raspbian"];
const RHEL_IDS: [&str; 5] = ["fedora", "rhel", "centos", "rocky", "almalinux"];

/// Coarse platform name, as far as package management is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Other(String),
}

impl Platform {
    pub fn current() -> Self {
        Platform::from_name(std::env::consts::OS)
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "macos" | "darwin" => Platform::MacOs,
            "linux" => Platform::Linux,
            other => Platform::Other(other.to_string()),
        }
    }
}

/// Key/value pairs from an os-release file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    fields: HashMap<String, String>,
}

impl OsRelease {
    pub fn parse(contents: &str) -> Self {
        let mut fields = HashMap::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let value = value.trim().trim_matches('"');
                fields.insert(key.to_string(), value.to_string());
            }
        }
        OsRelease { fields }
    }

    /// A missing or unreadable file yields an empty mapping.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => OsRelease::parse(&contents),
            Err(e) => {
                debug!("could not read {}: {}", path.display(), e);
                OsRelease::default()
            }
        }
    }

    pub fn load() -> Self {
        OsRelease::load_from(Path::new(OS_RELEASE_PATH))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// Everything detection looks at, gathered up front so tests can fake it.
#[derive(Debug, Clone)]
pub struct HostFacts {
    pub platform: Platform,
    pub os_release: OsRelease,
}

impl HostFacts {
    pub fn gather() -> Self {
        let platform = Platform::current();
        let os_release = match platform {
            Platform::Linux => OsRelease::load(),
            _ => OsRelease::default(),
        };
        HostFacts {
            platform,
            os_release,
        }
    }
}

/// Answers "is this executable on PATH?".
pub trait HostProbe {
    fn has_executable(&self, name: &str) -> bool;
}

pub struct SystemProbe;

impl HostProbe for SystemProbe {
    fn has_executable(&self, name: &str) -> bool {
        which::which(name).is_ok()
    }
}

pub fn detect_manager(facts: &HostFacts, probe: &dyn HostProbe) -> Option<PackageManager> {
    let manager = match &facts.platform {
        Platform::MacOs => Some(PackageManager::Brew),
        Platform::Linux => detect_linux_manager(&facts.os_release, probe),
        Platform::Other(name) => {
            debug!("no package manager mapping for platform {}", name);
            None
        }
    };
    debug!("detected package manager: {:?}", manager);
    manager
}

fn detect_linux_manager(info: &OsRelease, probe: &dyn HostProbe) -> Option<PackageManager> {
    let distro_id = info.get("ID").unwrap_or_default().to_lowercase();
    let like = info.get("ID_LIKE").unwrap_or_default().to_lowercase();
    let matches = |token: &str| distro_id.contains(token) || like.contains(token);

    if matches("arch") {
        return Some(PackageManager::Pacman);
    }
    if matches("alpine") {
        return Some(PackageManager::Apk);
    }
    if matches("suse") {
        return Some(PackageManager::Zypper);
    }
    if matches("debian") || DEBIAN_IDS.contains(&distro_id.as_str()) {
        return Some(PackageManager::Apt);
    }
    if matches("rhel") || matches("fedora") || RHEL_IDS.contains(&distro_id.as_str()) {
        if probe.has_executable("dnf") {
            return Some(PackageManager::Dnf);
        }
        return Some(PackageManager::Yum);
    }

    PackageManager::FALLBACK_ORDER
        .into_iter()
        .find(|candidate| probe.has_executable(candidate.as_str()))
}
