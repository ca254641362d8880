//! Access decision types.

use serde::Serialize;

/// The enforcement outcome for one checked path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Let the intercepted call proceed.
    Allowed,
    /// The caller must surface the path as nonexistent.
    Denied,
}

impl Access {
    pub fn is_denied(self) -> bool {
        matches!(self, Access::Denied)
    }
}

/// One audit record for a non-whitelisted path.
///
/// Produced exactly once per checked call that is not covered by the
/// whitelist, in every mode.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AccessEvent {
    /// Process that made the intercepted call.
    pub pid: u32,
    /// Canonical form of the checked path.
    pub path: String,
    /// Name of the intercepted operation ("open", "stat", "exec", ...).
    pub operation: String,
}

/// Full result of one `decide` call.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub access: Access,
    /// Present exactly when the path was not whitelisted.
    pub event: Option<AccessEvent>,
}

impl Verdict {
    /// A whitelisted path: allowed, nothing to log.
    pub fn allowed() -> Self {
        Verdict {
            access: Access::Allowed,
            event: None,
        }
    }

    pub fn is_denied(&self) -> bool {
        self.access.is_denied()
    }
}
