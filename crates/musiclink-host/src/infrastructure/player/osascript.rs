//! macOS Music adapter built on the `osascript` command-line runner.
//!
//! Each call spawns one `osascript` process and waits for it, so calls are
//! naturally serialised.  A script is wrapped as
//!
//! ```text
//! osascript -e 'tell application "Music"' -e <line> ... -e 'end tell'
//! ```
//!
//! List results come back as AppleScript's `a, b, c` text form.

use std::process::Command;

use tracing::debug;

use crate::application::player::{PlayerStatusAdapter, QueryError};
use crate::application::scripts;

const RUNNER: &str = "osascript";
const LIST_SEPARATOR: &str = ", ";

/// Drives a scriptable media player application through `osascript`.
#[derive(Debug, Clone)]
pub struct OsaScriptPlayer {
    application: String,
}

impl OsaScriptPlayer {
    /// Creates an adapter for the application named `application`
    /// (e.g. `"Music"`).
    pub fn new(application: impl Into<String>) -> Self {
        Self {
            application: application.into(),
        }
    }

    fn run(&self, script: &str) -> Result<String, QueryError> {
        let output = Command::new(RUNNER)
            .args(runner_args(&self.application, script))
            .output()?;

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            debug!("{script:?} -> {stdout:?}");
            Ok(stdout)
        } else {
            Err(QueryError::Failed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl PlayerStatusAdapter for OsaScriptPlayer {
    fn query_scalar(&mut self, expression: &str) -> Result<String, QueryError> {
        self.run(expression)
    }

    fn query_list(&mut self, expression: &str) -> Result<Vec<String>, QueryError> {
        self.run(expression).map(|text| split_list(&text))
    }

    fn is_playing(&mut self) -> Result<bool, QueryError> {
        self.run(scripts::PLAYER_STATE)
            .map(|state| state == scripts::STATE_PLAYING)
    }

    fn send_command(&mut self, script: &str) -> Result<(), QueryError> {
        self.run(script).map(|_| ())
    }
}

/// `-e` arguments wrapping every line of `script` in a `tell` block.
fn runner_args(application: &str, script: &str) -> Vec<String> {
    let mut args = vec!["-e".to_string(), format!("tell application \"{application}\"")];
    for line in script.lines().filter(|l| !l.trim().is_empty()) {
        args.push("-e".to_string());
        args.push(line.to_string());
    }
    args.push("-e".to_string());
    args.push("end tell".to_string());
    args
}

fn split_list(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(LIST_SEPARATOR).map(str::to_string).collect()
}
