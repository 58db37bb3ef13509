//! CLI command handlers for listing, searching and opening routes, and for
//! the editor session protocol.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::cli::{AppContext, LocateArgs, OpenArgs, RoutesArgs, SearchArgs, SessionArgs};
use crate::core::error::RouteError;
use crate::core::format::{self, RowFormat};
use crate::core::locate::{HandlerLocation, locate_with_keyword};
use crate::core::registry::RouteRegistry;
use crate::core::route::RouteRecord;
use crate::core::session::{
    JsonLinesTransport, Outbound, Request, Session, SessionManager, SessionOptions, Transport,
};
use crate::infra::command::CommandSource;
use crate::infra::config::{Config, load_config};
use crate::infra::io::{FsSourceFiles, SourceFiles};
use crate::infra::workspace::resolve_root;

pub fn routes_run(args: RoutesArgs, ctx: &AppContext) -> Result<()> {
    let (root, config) = bind(ctx)?;
    let registry = load_registry(&root, &config, ctx)?;
    let records = registry.current_records();

    emit(&format::format(&records, args.format.unwrap_or(config.format)));
    summary(ctx, records.len(), records.len());
    Ok(())
}

pub fn search_run(args: SearchArgs, ctx: &AppContext) -> Result<()> {
    let (root, config) = bind(ctx)?;
    let registry = load_registry(&root, &config, ctx)?;
    let hits = registry.search(&args.query);

    emit(&format::format(&hits, args.format.unwrap_or(config.format)));
    summary(ctx, hits.len(), registry.current_records().len());
    Ok(())
}

pub fn locate_run(args: LocateArgs, ctx: &AppContext) -> Result<()> {
    // Works outside a Rails project too; config is optional here
    let cwd = std::env::current_dir().context("current directory")?;
    let config = match resolve_root(ctx.root.as_deref(), &cwd) {
        Ok(root) => load_config(&root)?,
        Err(_) => Config::default(),
    };

    let keyword = args.keyword.as_deref().unwrap_or(&config.definition_keyword);
    let lines = FsSourceFiles.read_lines(&args.file)?;

    match locate_with_keyword(&lines, keyword, &args.action) {
        HandlerLocation::Found(line) => println!("{line}"),
        loc @ HandlerLocation::NotFound if args.top_on_miss || config.jump_to_top_on_miss => {
            println!("{}", loc.line_or_top())
        }
        HandlerLocation::NotFound => {
            let err = RouteError::HandlerNotFound { action: args.action, file: args.file };
            return Err(err.into());
        }
    }
    Ok(())
}

pub fn open_run(args: OpenArgs, ctx: &AppContext) -> Result<()> {
    let (root, mut config) = bind(ctx)?;
    config.jump_to_top_on_miss |= args.top_on_miss;

    let (controller, action) = args
        .handler
        .split_once('#')
        .with_context(|| format!("expected CONTROLLER#ACTION, got `{}`", args.handler))?;
    let record = RouteRecord::new("", "", controller, action, "");
    let file = record
        .controller_file()
        .ok_or_else(|| RouteError::NoControllerFile { handler: args.handler.clone() })?;

    // Opening never runs the route command, so the session needs no transport
    let transport = Box::new(JsonLinesTransport::new(io::sink()));
    let session = build_session(&root, &config, RowFormat::Tsv, transport);
    match session.open(&file.to_string_lossy(), &record.action)? {
        Outbound::Navigate { path, line } => println!("{}:{}", path.display(), line + 1),
        other => anyhow::bail!("unexpected reply: {other:?}"),
    }
    Ok(())
}

/// Request line as read from stdin; `root` selects the project, defaulting
/// to the one bound at startup.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    root: Option<String>,
    #[serde(flatten)]
    request: Request,
}

#[instrument(skip_all)]
pub fn session_run(args: SessionArgs, ctx: &AppContext) -> Result<()> {
    let cwd = std::env::current_dir().context("current directory")?;
    let default_root = resolve_root(ctx.root.as_deref(), &cwd).ok();
    info!(root = ?default_root, "session started");

    let mut manager = SessionManager::new();
    let mut stray = JsonLinesTransport::new(io::stdout());

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read request from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let envelope: Envelope = match serde_json::from_str(&line) {
            Ok(envelope) => envelope,
            Err(e) => {
                stray.send(&Outbound::Error { message: format!("invalid request: {e}") })?;
                continue;
            }
        };

        let root = match &envelope.root {
            Some(raw) => resolve_root(Some(raw.as_str()), &cwd).ok(),
            None => default_root.clone(),
        };
        let Some(root) = root else {
            stray.send(&Outbound::Error { message: RouteError::NoWorkspace.to_string() })?;
            continue;
        };

        if envelope.request == Request::Dispose {
            if manager.close(&root).is_some() {
                debug!(root = %root.display(), "session closed");
            }
            continue;
        }

        let config = if manager.contains(&root) {
            None
        } else {
            match load_config(&root) {
                Ok(config) => Some(config),
                Err(e) => {
                    stray.send(&Outbound::Error { message: format!("{e:#}") })?;
                    continue;
                }
            }
        };

        let (session, created) = manager.open_with(root, |root| {
            let transport = JsonLinesTransport::new(io::stdout()).with_root(root);
            build_session(root, &config.unwrap_or_default(), args.format, Box::new(transport))
        });
        if created {
            debug!("session opened");
        }

        session
            .handle(envelope.request)
            .context("Failed to write reply to stdout")?;
    }

    let roots: Vec<&Path> = manager.roots().collect();
    info!(?roots, "session input closed");
    Ok(())
}

/// Resolve the project root and its config.
fn bind(ctx: &AppContext) -> Result<(PathBuf, Config)> {
    let cwd = std::env::current_dir().context("current directory")?;
    let root = resolve_root(ctx.root.as_deref(), &cwd)?;
    let config = load_config(&root)?;
    Ok((root, config))
}

fn build_session(
    root: &Path,
    config: &Config,
    row_format: RowFormat,
    transport: Box<dyn Transport>,
) -> Session {
    let registry = registry_for(root, config);
    let options = SessionOptions {
        row_format,
        definition_keyword: config.definition_keyword.clone(),
        jump_to_top_on_miss: config.jump_to_top_on_miss,
    };
    Session::new(registry, Arc::new(FsSourceFiles), transport, options)
}

fn registry_for(root: &Path, config: &Config) -> RouteRegistry {
    let source = CommandSource::new(config.command.clone());
    RouteRegistry::new(Some(root.to_path_buf()), Arc::new(source))
}

/// Cold-load the table with a spinner on stderr.
fn load_registry(root: &Path, config: &Config, ctx: &AppContext) -> Result<RouteRegistry> {
    let registry = registry_for(root, config);
    let command = CommandSource::new(config.command.clone())
        .argv_for(root)
        .join(" ");

    let spinner = if ctx.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
        pb.set_message(format!("Running `{command}`"));
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    };

    let loaded = registry.load(false);
    spinner.finish_and_clear();
    loaded?;

    Ok(registry)
}

fn emit(rendered: &str) {
    if rendered.is_empty() || rendered.ends_with('\n') {
        print!("{rendered}");
    } else {
        println!("{rendered}");
    }
}

fn summary(ctx: &AppContext, shown: usize, total: usize) {
    if ctx.quiet {
        return;
    }
    let mark = if ctx.no_color { "✓".to_string() } else { "✓".green().to_string() };
    eprintln!("{mark} {shown} of {total} routes");
}
