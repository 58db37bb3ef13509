//! Browsing sessions: one per project root.
//!
//! A session owns its registry and a transport to the UI surface. Requests
//! coming from the UI map one-to-one onto registry load, search and handler
//! lookup; replies and errors go back through the transport.

use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::core::error::{RouteError, RouteResult};
use crate::core::format::{self, RowFormat};
use crate::core::locate::{DEFAULT_DEFINITION_KEYWORD, HandlerLocation, locate_with_keyword};
use crate::core::registry::RouteRegistry;
use crate::core::route::RouteRecord;
use crate::infra::io::SourceFiles;

/// Messages sent by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Request {
    /// First paint: load (cached) and render everything
    InitializeRoutes,

    /// Filter the table
    Search { text: String },

    /// Open the controller file at the action's definition
    #[serde(rename_all = "camelCase")]
    ShowTextDocument { file_path: String, action: String },

    /// Re-run the route command
    RefreshRoutes,

    /// The UI went away
    Dispose,
}

/// Messages sent to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Outbound {
    /// Rendered rows
    Routes { routes: String },

    /// Open `path` with the cursor on 0-based `line`
    Navigate { path: PathBuf, line: usize },

    Error { message: String },
}

/// Outbound side of the UI connection.
pub trait Transport: Send {
    fn send(&mut self, message: &Outbound) -> io::Result<()>;
}

/// One JSON object per line, optionally tagged with the session root.
pub struct JsonLinesTransport<W: Write + Send> {
    writer: W,
    root: Option<PathBuf>,
}

impl<W: Write + Send> JsonLinesTransport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, root: None }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[derive(Serialize)]
struct Tagged<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    root: Option<&'a Path>,
    #[serde(flatten)]
    message: &'a Outbound,
}

impl<W: Write + Send> Transport for JsonLinesTransport<W> {
    fn send(&mut self, message: &Outbound) -> io::Result<()> {
        let tagged = Tagged { root: self.root.as_deref(), message };
        serde_json::to_writer(&mut self.writer, &tagged)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

/// Per-session knobs, usually taken from `Config`.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub row_format: RowFormat,
    pub definition_keyword: String,
    pub jump_to_top_on_miss: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            row_format: RowFormat::Html,
            definition_keyword: DEFAULT_DEFINITION_KEYWORD.to_string(),
            jump_to_top_on_miss: false,
        }
    }
}

pub struct Session {
    registry: RouteRegistry,
    files: Arc<dyn SourceFiles>,
    transport: Box<dyn Transport>,
    options: SessionOptions,
}

impl Session {
    pub fn new(
        registry: RouteRegistry,
        files: Arc<dyn SourceFiles>,
        transport: Box<dyn Transport>,
        options: SessionOptions,
    ) -> Self {
        Self { registry, files, transport, options }
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// Answer one request. Failures are reported to the UI, not returned;
    /// only transport errors come back to the caller.
    #[instrument(skip(self), fields(root = ?self.registry.root()))]
    pub fn handle(&mut self, request: Request) -> io::Result<()> {
        let reply = match request {
            Request::InitializeRoutes => self.initialize(),
            Request::Search { text } => self.search(&text),
            Request::ShowTextDocument { file_path, action } => self.open(&file_path, &action),
            Request::RefreshRoutes => self.refresh(),
            Request::Dispose => return Ok(()),
        };

        match reply {
            Ok(message) => self.transport.send(&message),
            Err(err) => {
                warn!(error = %err, "request failed");
                self.transport.send(&Outbound::Error { message: err.to_string() })
            }
        }
    }

    pub fn initialize(&self) -> RouteResult<Outbound> {
        self.registry.load(false)?;
        Ok(self.render(&self.registry.current_records()))
    }

    /// Filters the full table; loads it first if nothing was loaded yet.
    pub fn search(&self, text: &str) -> RouteResult<Outbound> {
        self.registry.load(false)?;
        Ok(self.render(&self.registry.search(text)))
    }

    pub fn refresh(&self) -> RouteResult<Outbound> {
        self.registry.load(true)?;
        Ok(self.render(&self.registry.current_records()))
    }

    /// Find `action` in `file_path` (relative to the project root).
    ///
    /// Paths that are absolute or climb out with `..` are refused before
    /// anything is read.
    pub fn open(&self, file_path: &str, action: &str) -> RouteResult<Outbound> {
        let root = self.registry.root().ok_or(RouteError::NoWorkspace)?;
        let relative = Path::new(file_path);
        let inside = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !inside {
            return Err(RouteError::SourceFile {
                path: relative.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "path leaves the project root"),
            });
        }

        let path = root.join(relative);
        let lines = self.files.read_lines(&path)?;

        let location = locate_with_keyword(&lines, &self.options.definition_keyword, action);
        let line = match location {
            HandlerLocation::Found(line) => line,
            HandlerLocation::NotFound if self.options.jump_to_top_on_miss => {
                debug!(action, "handler not found; jumping to top of file");
                location.line_or_top()
            }
            HandlerLocation::NotFound => {
                return Err(RouteError::HandlerNotFound { action: action.to_string(), file: path });
            }
        };

        Ok(Outbound::Navigate { path, line })
    }

    fn render(&self, records: &[RouteRecord]) -> Outbound {
        Outbound::Routes { routes: format::format(records, self.options.row_format) }
    }
}

/// Open sessions keyed by project root.
///
/// Opening a root that already has a session hands back that session
/// instead of creating a second one.
#[derive(Default)]
pub struct SessionManager {
    sessions: IndexMap<PathBuf, Session>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing session for `root`, or a new one from `create`.
    /// The flag is `true` when the session was just created.
    pub fn open_with<F>(&mut self, root: PathBuf, create: F) -> (&mut Session, bool)
    where
        F: FnOnce(&Path) -> Session,
    {
        match self.sessions.entry(root) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => {
                let session = create(entry.key());
                (entry.insert(session), true)
            }
        }
    }

    pub fn contains(&self, root: &Path) -> bool {
        self.sessions.contains_key(root)
    }

    pub fn close(&mut self, root: &Path) -> Option<Session> {
        self.sessions.shift_remove(root)
    }

    pub fn roots(&self) -> impl Iterator<Item = &Path> {
        self.sessions.keys().map(PathBuf::as_path)
    }
}
