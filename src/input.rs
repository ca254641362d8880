//! Check request parsing for the adapter binary.

use serde::Deserialize;

/// One access check submitted by an interception harness.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRequest {
    /// Path as the monitored process supplied it.
    pub path: String,
    /// Intercepted operation name ("open", "stat", "exec", ...).
    pub operation: String,
    /// Working directory of the monitored process. Defaults to the
    /// checker's own.
    #[serde(default)]
    pub cwd: Option<String>,
    /// Pid of the monitored process. Defaults to the checker's own.
    #[serde(default)]
    pub pid: Option<u32>,
}

impl CheckRequest {
    /// Parse from a JSON string.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
