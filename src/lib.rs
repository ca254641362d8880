//! pathjail - filesystem access whitelisting for sandboxed build steps.
//!
//! Decides, for every filesystem-affecting call a monitored process
//! makes, whether the target path is permitted: paths are canonicalized
//! without touching the filesystem, checked against an immutable
//! exact/subtree whitelist, and then allowed, logged, or hidden
//! depending on the enforcement mode.

pub mod audit;
pub mod config;
pub mod decision;
pub mod engine;
pub mod input;
pub mod normalize;
pub mod whitelist;

pub use audit::{AuditEntry, AuditLogger};
pub use config::{Config, ConfigError, Mode};
pub use decision::{Access, AccessEvent, Verdict};
pub use engine::{install, installed, Jail};
pub use input::CheckRequest;
pub use normalize::normalize;
pub use whitelist::Whitelist;
