//! Project root discovery.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::error::{RouteError, RouteResult};

/// File that marks the root of a Rails application.
pub const ROUTES_FILE: &str = "config/routes.rb";

/// Nearest ancestor of `start` (inclusive) that holds `config/routes.rb`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(ROUTES_FILE).is_file())
        .map(Path::to_path_buf)
}

/// Bind a project root.
///
/// An explicit `--root` (with `~` expanded) is taken as-is when it is a
/// directory; otherwise the root is discovered upward from `cwd`.
pub fn resolve_root(explicit: Option<&str>, cwd: &Path) -> RouteResult<PathBuf> {
    if let Some(raw) = explicit {
        let expanded = shellexpand::tilde(raw);
        let path = dunce::canonicalize(expanded.as_ref()).map_err(|_| RouteError::NoWorkspace)?;
        if !path.is_dir() {
            return Err(RouteError::NoWorkspace);
        }
        debug!(root = %path.display(), "using explicit project root");
        return Ok(path);
    }

    let cwd = dunce::canonicalize(cwd).unwrap_or_else(|_| cwd.to_path_buf());
    let root = find_project_root(&cwd).ok_or(RouteError::NoWorkspace)?;
    debug!(root = %root.display(), "discovered project root");
    Ok(root)
}
