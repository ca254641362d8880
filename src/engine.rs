//! The jail decision engine.

use once_cell::sync::OnceCell;

use crate::config::{Config, ConfigError, Mode};
use crate::decision::{Access, AccessEvent, Verdict};
use crate::normalize::normalize;
use crate::whitelist::Whitelist;

/// An immutable jail: a whitelist plus an enforcement mode.
///
/// Stateless per call; one instance can serve arbitrarily many
/// concurrent threads.
#[derive(Debug, Clone)]
pub struct Jail {
    whitelist: Whitelist,
    mode: Mode,
}

static INSTALLED: OnceCell<Jail> = OnceCell::new();

impl Jail {
    pub fn new(whitelist: Whitelist, mode: Mode) -> Self {
        Self { whitelist, mode }
    }

    /// Build a jail from a loaded configuration. An absent whitelist
    /// source means an empty whitelist: nothing is covered.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let whitelist = match &config.whitelist {
            Some(path) => Whitelist::load(path)?,
            None => Whitelist::empty(),
        };
        Ok(Self::new(whitelist, config.mode))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    /// Decide whether `raw_path` may be touched.
    ///
    /// `current_dir` anchors relative paths; `operation` names the
    /// intercepted call for the audit trail. Whitelisted paths are
    /// allowed with nothing to log. Anything else produces one
    /// [`AccessEvent`], and the mode decides the outcome:
    /// [`Mode::PassThrough`] still allows, [`Mode::Hide`] denies.
    ///
    /// A relative path that escapes the root is never treated as
    /// covered, even if its clamped form is whitelisted.
    ///
    /// Never fails; the worst outcome is [`Access::Denied`].
    pub fn decide(&self, raw_path: &str, current_dir: &str, operation: &str) -> Verdict {
        let (canonical, escaped) = match normalize(raw_path, current_dir) {
            Ok(path) => (path, false),
            Err(err) => (err.clamped, true),
        };

        if !escaped && self.whitelist.contains(&canonical) {
            return Verdict::allowed();
        }

        let event = AccessEvent {
            pid: std::process::id(),
            path: canonical,
            operation: operation.to_string(),
        };
        let access = match self.mode {
            Mode::PassThrough => Access::Allowed,
            Mode::Hide => Access::Denied,
        };
        Verdict {
            access,
            event: Some(event),
        }
    }
}

/// Install the process-wide jail.
///
/// Idempotent: the first successful call builds and stores the jail;
/// later calls return the same handle regardless of their argument.
/// Must complete before [`installed`] is consulted from other threads;
/// that sequencing belongs to the hosting harness.
pub fn install(config: &Config) -> Result<&'static Jail, ConfigError> {
    INSTALLED.get_or_try_init(|| Jail::from_config(config))
}

/// The jail installed by [`install`], if any.
pub fn installed() -> Option<&'static Jail> {
    INSTALLED.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn jail(mode: Mode) -> Jail {
        let whitelist = Whitelist::parse(["/tmp/foo", "/tmp/bar/**"]).unwrap();
        Jail::new(whitelist, mode)
    }

    #[test]
    fn test_whitelisted_path_is_clean() {
        let jail = jail(Mode::Hide);
        let verdict = jail.decide("/tmp/foo", "/", "open");
        assert_eq!(verdict.access, Access::Allowed);
        assert!(verdict.event.is_none());

        let verdict = jail.decide("/tmp/bar/x", "/", "open");
        assert_eq!(verdict.access, Access::Allowed);
        assert!(verdict.event.is_none());
    }

    #[test]
    fn test_exact_rule_does_not_cover_siblings() {
        let jail = jail(Mode::Hide);
        let verdict = jail.decide("/tmp/foobar", "/", "open");
        assert_eq!(verdict.access, Access::Denied);
        assert!(verdict.event.is_some());
    }

    #[test]
    fn test_hide_denies_and_logs() {
        let jail = jail(Mode::Hide);
        let verdict = jail.decide("/etc/passwd", "/", "open");
        assert_eq!(verdict.access, Access::Denied);
        let event = verdict.event.unwrap();
        assert_eq!(event.path, "/etc/passwd");
        assert_eq!(event.operation, "open");
        assert_eq!(event.pid, std::process::id());
    }

    #[test]
    fn test_pass_through_allows_but_logs() {
        let jail = jail(Mode::PassThrough);
        let verdict = jail.decide("/etc/passwd", "/", "open");
        assert_eq!(verdict.access, Access::Allowed);
        assert!(verdict.event.is_some());
    }

    #[test]
    fn test_path_is_canonicalized_before_lookup() {
        let jail = jail(Mode::Hide);
        let verdict = jail.decide("/tmp/./bar/../foo", "/", "stat");
        assert_eq!(verdict.access, Access::Allowed);

        let verdict = jail.decide("foo", "/tmp", "stat");
        assert_eq!(verdict.access, Access::Allowed);

        let verdict = jail.decide("../foo", "/tmp/bar", "stat");
        assert_eq!(verdict.access, Access::Allowed);
    }

    #[test]
    fn test_event_carries_canonical_path() {
        let jail = jail(Mode::Hide);
        let verdict = jail.decide("x//y/./z", "/work", "exec");
        assert_eq!(verdict.event.unwrap().path, "/work/x/y/z");
    }

    #[test]
    fn test_root_escape_is_never_covered() {
        // "../../tmp/foo" from "/tmp" clamps to "/tmp/foo", which is
        // whitelisted, but an escaping path stays flagged
        let jail = jail(Mode::Hide);
        let verdict = jail.decide("../../tmp/foo", "/tmp", "open");
        assert_eq!(verdict.access, Access::Denied);
        assert_eq!(verdict.event.unwrap().path, "/tmp/foo");
    }

    #[test]
    fn test_empty_whitelist_flags_everything() {
        let jail = Jail::new(Whitelist::empty(), Mode::Hide);
        assert!(jail.decide("/anything", "/", "open").is_denied());

        let jail = Jail::new(Whitelist::empty(), Mode::PassThrough);
        let verdict = jail.decide("/anything", "/", "open");
        assert_eq!(verdict.access, Access::Allowed);
        assert!(verdict.event.is_some());
    }

    #[test]
    fn test_concurrent_decisions_match_single_threaded() {
        let jail = Arc::new(jail(Mode::Hide));
        let paths = [
            "/tmp/foo",
            "/tmp/foobar",
            "/tmp/bar/x",
            "/tmp/bar",
            "/etc/passwd",
            "/tmp/./bar/../foo",
        ];
        let expected: Vec<Access> = paths
            .iter()
            .map(|p| jail.decide(p, "/", "open").access)
            .collect();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let jail = Arc::clone(&jail);
            handles.push(thread::spawn(move || {
                paths
                    .iter()
                    .map(|p| jail.decide(p, "/", "open").access)
                    .collect::<Vec<_>>()
            }));
        }
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_install_is_idempotent() {
        let config = Config {
            mode: Mode::Hide,
            ..Default::default()
        };
        let first = install(&config).unwrap();
        assert_eq!(first.mode(), Mode::Hide);

        // a second install does not replace the stored jail
        let other = Config::default();
        let second = install(&other).unwrap();
        assert_eq!(second.mode(), Mode::Hide);
        assert!(std::ptr::eq(first, second));
        assert!(installed().is_some());
    }
}
