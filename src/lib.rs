//! **railroutes** - Rails routing table browser for editors and terminals
//!
//! Runs `rails routes`, parses the table into records, answers substring
//! queries over it, and finds the controller line that defines a route's action.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Route table, search and handler lookup
pub mod core {
    /// Route records and their derived views
    pub mod route;
    pub use route::RouteRecord;

    /// Error kinds surfaced to the user
    pub mod error;
    pub use error::{RouteError, RouteResult};

    /// `rails routes` table parser (fixed-column and whitespace rows)
    pub mod parser;
    pub use parser::parse;

    /// Per-root record set with cached and forced loads
    pub mod registry;
    pub use registry::RouteRegistry;

    /// Case-insensitive per-field substring filter
    pub mod search;
    pub use search::{SearchIndex, filter};

    /// `def <action>` line lookup
    pub mod locate;
    pub use locate::{HandlerLocation, locate};

    /// Row rendering for terminals and the editor panel
    pub mod format;
    pub use format::{RouteRow, RowFormat};

    /// Sessions keyed by project root and the UI request protocol
    pub mod session;
    pub use session::{Request, Session, SessionManager};
}

/// Command handlers behind the CLI subcommands
pub mod cli_ext {
    pub mod route_cmd;
}

/// Infrastructure - Configuration, processes, files and project discovery
pub mod infra {
    /// Layered configuration (file in project root + RAILROUTES_ env)
    pub mod config;
    pub use config::{Config, init as config_init, load_config};

    /// Route-listing command execution
    pub mod command;
    pub use command::{CommandSource, RouteSource};

    /// Source file access, memory-mapped above 1 MiB
    pub mod io;
    pub use io::{FsSourceFiles, SourceFiles};

    /// Rails project root discovery
    pub mod workspace;
    pub use workspace::{find_project_root, resolve_root};
}

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli, Commands};
pub use infra::{Config, load_config};

// Core types for external consumers
pub use self::core::{HandlerLocation, RouteError, RouteRecord, RouteRegistry, RowFormat, SearchIndex};
