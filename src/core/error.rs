//! Errors surfaced by the registry, the session and the file collaborators.
//!
//! Parsing, filtering and formatting never fail; everything here comes from
//! a process or filesystem boundary, or from a handler lookup miss.

use std::path::PathBuf;

/// Error kinds shown to the user verbatim; none of them is retried.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// No project root is bound to the registry
    #[error("There is no workspace. Open a Rails project and then retry.")]
    NoWorkspace,

    /// The route-listing command failed to run, exited non-zero,
    /// or printed something that is not text
    #[error("`{command}` failed: {detail}")]
    ExternalTool { command: String, detail: String },

    /// No line defines the requested action
    #[error("could not find a definition of `{action}` in {}", file.display())]
    HandlerNotFound { action: String, file: PathBuf },

    /// The record has no controller file to open (engine mounts, redirects)
    #[error("route `{handler}` is not backed by a controller file")]
    NoControllerFile { handler: String },

    /// Reading a source file failed
    #[error("failed to read {}", path.display())]
    SourceFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RouteError {
    pub(crate) fn tool(command: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::ExternalTool { command: command.into(), detail: detail.into() }
    }
}

pub type RouteResult<T> = std::result::Result<T, RouteError>;
