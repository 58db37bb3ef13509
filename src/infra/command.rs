//! Route-listing command execution.
//!
//! Runs `rails routes` (or a configured replacement) inside the project root
//! and hands back its stdout. Everything about processes stays here; the
//! registry only sees text or a `RouteError::ExternalTool`.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, instrument};

use crate::core::error::{RouteError, RouteResult};

/// Source of raw route-table text for a project root.
pub trait RouteSource: Send + Sync {
    fn list_routes(&self, root: &Path) -> RouteResult<String>;
}

/// Runs an external command to print the route table.
#[derive(Debug, Clone, Default)]
pub struct CommandSource {
    /// Explicit argv; auto-detected per root when `None`
    argv: Option<Vec<String>>,
}

impl CommandSource {
    pub fn new(argv: Option<Vec<String>>) -> Self {
        // An empty list in config means "not set"
        Self { argv: argv.filter(|a| !a.is_empty()) }
    }

    /// Argv that will run for `root`.
    ///
    /// Without an explicit command, prefers the project's binstub and falls
    /// back to Bundler.
    pub fn argv_for(&self, root: &Path) -> Vec<String> {
        if let Some(argv) = &self.argv {
            return argv.clone();
        }
        if root.join("bin").join("rails").is_file() {
            vec!["bin/rails".to_string(), "routes".to_string()]
        } else {
            ["bundle", "exec", "rails", "routes"]
                .iter()
                .map(|s| s.to_string())
                .collect()
        }
    }
}

impl RouteSource for CommandSource {
    #[instrument(skip(self))]
    fn list_routes(&self, root: &Path) -> RouteResult<String> {
        let argv = self.argv_for(root);
        let display = argv.join(" ");
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| RouteError::tool(&display, "no command configured"))?;

        let program = resolve_program(root, program);
        debug!(program = %program.display(), ?args, "running route command");

        let output = Command::new(&program)
            .args(args)
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| RouteError::tool(&display, format!("could not start: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = match stderr.trim() {
                "" => format!("exited with {}", output.status),
                msg => format!("exited with {}: {msg}", output.status),
            };
            return Err(RouteError::tool(&display, detail));
        }

        String::from_utf8(output.stdout)
            .map_err(|_| RouteError::tool(&display, "printed output that is not valid UTF-8"))
    }
}

/// Relative program paths with a directory part (`bin/rails`) are taken
/// from the project root; bare names go through `PATH`.
fn resolve_program(root: &Path, program: &str) -> PathBuf {
    let path = Path::new(program);
    if path.is_relative() && path.components().count() > 1 {
        root.join(path)
    } else {
        path.to_path_buf()
    }
}
