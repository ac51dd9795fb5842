use std::process::{Command as ProcessCommand, Stdio};
use tracing::{debug, warn};

/// Delivers a URL-scheme request to the Things application.
///
/// Delivery is best-effort; implementations report problems through logging only.
pub trait UrlDispatcher {
    fn dispatch(&self, url: &str);
}

/// Asks the app through AppleScript, then falls back to the OS URL opener.
pub struct SystemDispatcher {
    app_name: String,
}

impl SystemDispatcher {
    pub fn new(app_name: impl Into<String>) -> Self {
        SystemDispatcher {
            app_name: app_name.into(),
        }
    }

    pub fn applescript(&self, url: &str) -> String {
        format!(
            "tell application \"{}\" to open location \"{}\"",
            self.app_name,
            url.replace('\\', "\\\\").replace('"', "\\\"")
        )
    }

    fn open_via_bridge(&self, url: &str) -> bool {
        run_quietly("osascript", &["-e", &self.applescript(url)])
    }

    fn open_via_default_handler(&self, url: &str) -> bool {
        let (program, args): (&str, Vec<&str>) = if cfg!(target_os = "macos") {
            ("open", vec![url])
        } else if cfg!(windows) {
            ("cmd", vec!["/C", "start", "", url])
        } else {
            ("xdg-open", vec![url])
        };
        run_quietly(program, &args)
    }
}

impl UrlDispatcher for SystemDispatcher {
    fn dispatch(&self, url: &str) {
        if self.open_via_bridge(url) {
            debug!("opened {} via osascript", url);
            return;
        }
        if self.open_via_default_handler(url) {
            debug!("opened {} via default URL handler", url);
            return;
        }
        warn!("could not deliver {} to {}", url, self.app_name);
    }
}

fn run_quietly(program: &str, args: &[&str]) -> bool {
    match ProcessCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
    {
        Ok(output) if output.status.success() => true,
        Ok(output) => {
            debug!(
                "{} exited with {}: {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            false
        }
        Err(e) => {
            debug!("{} unavailable: {}", program, e);
            false
        }
    }
}
