use anyhow::Result;
use clap::Parser;
use railroutes::cli::{AppContext, Cli, Commands};
use railroutes::cli_ext::route_cmd;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries tables and session replies
    let default_level = if cli.verbose { "railroutes=debug" } else { "railroutes=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .with_target(false)
        .init();

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        root: cli.root,
    };

    match cli.command {
        Commands::Routes(args) => route_cmd::routes_run(args, &ctx),
        Commands::Search(args) => route_cmd::search_run(args, &ctx),
        Commands::Locate(args) => route_cmd::locate_run(args, &ctx),
        Commands::Open(args) => route_cmd::open_run(args, &ctx),
        Commands::Session(args) => route_cmd::session_run(args, &ctx),
        Commands::Init(args) => railroutes::infra::config::init(args, &ctx),
        Commands::Completions(args) => railroutes::completion::run(args, &ctx),
    }
}
