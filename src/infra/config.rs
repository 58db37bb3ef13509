use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs};
use crate::core::format::RowFormat;
use crate::core::locate::DEFAULT_DEFINITION_KEYWORD;

/// Config file names looked up in the project root, first hit wins.
pub const CONFIG_FILES: [&str; 2] = ["railroutes.toml", ".railroutes.toml"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Route-listing command; `bin/rails routes` or `bundle exec rails routes`
    /// when unset
    pub command: Option<Vec<String>>,

    /// Keyword that introduces a handler definition
    pub definition_keyword: String,

    /// Place the cursor on line 0 instead of failing when a handler is missing
    pub jump_to_top_on_miss: bool,

    /// Default output format for `routes` and `search`
    pub format: RowFormat,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            command: None,
            definition_keyword: DEFAULT_DEFINITION_KEYWORD.to_string(),
            jump_to_top_on_miss: false,
            format: RowFormat::Table,
        }
    }
}

/// Load config for `root`: defaults, then the first config file found in the
/// root, then `RAILROUTES_*` environment variables.
pub fn load_config(root: &Path) -> Result<Config>
{
    let mut builder = config::Config::builder();

    for name in &CONFIG_FILES
    {
        let path = root.join(name);
        if path.is_file()
        {
            builder = builder.add_source(config::File::from(path));
            break;
        }
    }

    // RAILROUTES_COMMAND="bin/rails routes" splits on spaces
    builder = builder.add_source(
        config::Environment::with_prefix("RAILROUTES")
            .try_parsing(true)
            .list_separator(" ")
            .with_list_parse_key("command"),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join(CONFIG_FILES[0]);

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}
