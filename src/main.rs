//! pathjail check binary.
//!
//! Reads one JSON check request from stdin, decides it against the
//! configured whitelist and reports the outcome via the exit code:
//! 0 allowed, 2 denied, 30 configuration or request error. On a denial
//! the interception harness is responsible for surfacing the path as
//! nonexistent to the monitored process.

use pathjail::audit::{echo_event, AuditLogger};
use pathjail::config::Config;
use pathjail::decision::Access;
use pathjail::engine::Jail;
use pathjail::input::CheckRequest;

use std::io::{self, Read};
use std::process::ExitCode;

const CONFIG_ERROR: u8 = 30;
const DENIED: u8 = 2;
const HEADER: &str = "pathjail: ";

fn main() -> ExitCode {
    // Configuration problems are fatal; nothing gets installed.
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{HEADER}{err}");
            return ExitCode::from(CONFIG_ERROR);
        }
    };
    let jail = match Jail::from_config(&config) {
        Ok(jail) => jail,
        Err(err) => {
            eprintln!("{HEADER}{err}");
            return ExitCode::from(CONFIG_ERROR);
        }
    };
    for rule in jail.whitelist().duplicates() {
        eprintln!("{HEADER}duplicate whitelist rule: {rule}");
    }

    let mut input = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut input) {
        eprintln!("{HEADER}failed to read request: {err}");
        return ExitCode::from(CONFIG_ERROR);
    }
    let request = match CheckRequest::parse(&input) {
        Ok(request) => request,
        Err(err) => {
            eprintln!("{HEADER}bad request: {err}");
            return ExitCode::from(CONFIG_ERROR);
        }
    };

    let cwd = request.cwd.clone().unwrap_or_else(|| {
        std::env::current_dir()
            .map(|d| d.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "/".to_string())
    });

    let mut verdict = jail.decide(&request.path, &cwd, &request.operation);
    if let Some(event) = verdict.event.as_mut() {
        if let Some(pid) = request.pid {
            event.pid = pid;
        }
    }

    if let Some(event) = &verdict.event {
        // best-effort: logging never changes the decision
        if let Some(path) = &config.audit_log {
            if let Ok(mut logger) = AuditLogger::open(path) {
                let _ = logger.log_event(event);
            }
        }
        if let Some(prefix) = &config.stderr_prefix {
            echo_event(prefix, event);
        }
    }

    match verdict.access {
        Access::Allowed => ExitCode::SUCCESS,
        Access::Denied => ExitCode::from(DENIED),
    }
}
