//! Build identifier shown in page footers.

use std::path::Path;
use std::process::{Command, Stdio};

/// Used when no identifier can be determined.
pub const UNKNOWN: &str = "UNKNOWN";

/// Returns `explicit` if non-blank, else `git rev-parse HEAD` run in `root`, else [`UNKNOWN`].
pub fn detect(explicit: Option<&str>, root: &Path) -> String {
    if let Some(id) = explicit.map(str::trim).filter(|id| !id.is_empty()) {
        return id.to_string();
    }
    git_head(root).unwrap_or_else(|| UNKNOWN.to_string())
}

fn git_head(root: &Path) -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(root)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();

    match output {
        Ok(output) if output.status.success() => {
            let id = String::from_utf8(output.stdout).ok()?.trim().to_string();
            (!id.is_empty()).then_some(id)
        }
        Ok(output) => {
            tracing::debug!(status = %output.status, "git rev-parse failed");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "could not run git");
            None
        }
    }
}
