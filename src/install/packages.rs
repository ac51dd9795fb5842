use anyhow::{anyhow, Error};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Native package managers we know how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Apt,
    Dnf,
    Yum,
    Pacman,
    Apk,
    Zypper,
    Brew,
}

impl PackageManager {
    /// Order used when nothing in os-release gives the distro away.
    pub const FALLBACK_ORDER: [PackageManager; 6] = [
        PackageManager::Apt,
        PackageManager::Dnf,
        PackageManager::Yum,
        PackageManager::Pacman,
        PackageManager::Apk,
        PackageManager::Zypper,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Apt => "apt",
            PackageManager::Dnf => "dnf",
            PackageManager::Yum => "yum",
            PackageManager::Pacman => "pacman",
            PackageManager::Apk => "apk",
            PackageManager::Zypper => "zypper",
            PackageManager::Brew => "brew",
        }
    }

    pub fn uses_sudo(&self) -> bool {
        !matches!(self, PackageManager::Brew)
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apt" => Ok(PackageManager::Apt),
            "dnf" => Ok(PackageManager::Dnf),
            "yum" => Ok(PackageManager::Yum),
            "pacman" => Ok(PackageManager::Pacman),
            "apk" => Ok(PackageManager::Apk),
            "zypper" => Ok(PackageManager::Zypper),
            "brew" => Ok(PackageManager::Brew),
            other => Err(anyhow!("Unsupported manager: {}", other)),
        }
    }
}

/// Builds the argv lists that install `packages` with `manager`, in run order.
pub fn build_install_commands(
    manager: PackageManager,
    packages: &[String],
    use_sudo: bool,
) -> Vec<Vec<String>> {
    let command = |parts: &[&str]| -> Vec<String> {
        let mut argv = Vec::with_capacity(parts.len() + packages.len() + 1);
        if use_sudo && manager.uses_sudo() {
            argv.push("sudo".to_string());
        }
        argv.extend(parts.iter().map(|part| part.to_string()));
        argv
    };
    let with_packages = |mut argv: Vec<String>| -> Vec<String> {
        argv.extend(packages.iter().cloned());
        argv
    };

    match manager {
        PackageManager::Brew => vec![with_packages(command(&["brew", "install"]))],
        PackageManager::Apt => vec![
            command(&["apt-get", "update"]),
            with_packages(command(&["apt-get", "install", "-y"])),
        ],
        PackageManager::Dnf => vec![with_packages(command(&["dnf", "install", "-y"]))],
        PackageManager::Yum => vec![with_packages(command(&["yum", "install", "-y"]))],
        PackageManager::Pacman => vec![with_packages(command(&["pacman", "-S", "--noconfirm"]))],
        PackageManager::Apk => vec![with_packages(command(&["apk", "add"]))],
        PackageManager::Zypper => vec![with_packages(command(&["zypper", "install", "-y"]))],
    }
}

/// Splits `--utils` values on commas, trims, and drops blanks and repeats.
pub fn normalize_utils(raw: &[String]) -> Vec<String> {
    let mut utils: Vec<String> = Vec::new();
    for entry in raw {
        for token in entry.split(',') {
            let token = token.trim();
            if !token.is_empty() && !utils.iter().any(|u| u == token) {
                utils.push(token.to_string());
            }
        }
    }
    utils
}
