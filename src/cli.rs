use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::format::RowFormat;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,          // global --quiet
    pub no_color: bool,       // global --no-color
    pub root: Option<String>, // global --root
}

#[derive(Parser)]
#[command(name = "rrs")]
#[command(about = "Browse and search a Rails routing table, and jump to the action behind a route")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Rails project root (discovered from the current directory if omitted)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress the spinner and non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the whole routing table
    Routes(RoutesArgs),

    /// Print routes whose verb, URI, controller#action or prefix contains QUERY
    Search(SearchArgs),

    /// Print the 0-based line where ACTION is defined in FILE
    Locate(LocateArgs),

    /// Resolve a `controller#action` to `file:line`
    Open(OpenArgs),

    /// Serve the editor panel protocol (JSON lines) over stdin/stdout
    Session(SessionArgs),

    /// Initialize a railroutes.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
pub struct RoutesArgs {
    /// Output format (defaults to the configured one)
    #[arg(short, long, value_enum)]
    pub format: Option<RowFormat>,
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Case-insensitive substring to look for; empty lists everything
    #[arg(default_value = "")]
    pub query: String,

    /// Output format (defaults to the configured one)
    #[arg(short, long, value_enum)]
    pub format: Option<RowFormat>,
}

#[derive(Parser, Debug)]
pub struct LocateArgs {
    /// Source file to scan
    pub file: PathBuf,

    /// Method name to find
    pub action: String,

    /// Definition keyword (defaults to the configured one, usually `def`)
    #[arg(long)]
    pub keyword: Option<String>,

    /// Print 0 instead of failing when the action is not defined
    #[arg(long)]
    pub top_on_miss: bool,
}

#[derive(Parser, Debug)]
pub struct OpenArgs {
    /// Handler as printed in the table, e.g. `admin/users#show`
    #[arg(value_name = "CONTROLLER#ACTION")]
    pub handler: String,

    /// Print line 1 instead of failing when the action is not defined
    #[arg(long)]
    pub top_on_miss: bool,
}

#[derive(Parser, Debug)]
pub struct SessionArgs {
    /// Row format sent to the panel
    #[arg(short, long, value_enum, default_value_t = RowFormat::Html)]
    pub format: RowFormat,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Directory to create config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script into this directory instead of printing it
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}
