//! Shell completion scripts for `rrs`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{Shell as CompletionShell, generate};

use crate::cli::{AppContext, Cli, CompletionsArgs, Shell};

pub const BIN_NAME: &str = "rrs";

impl From<Shell> for CompletionShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => CompletionShell::Bash,
            Shell::Zsh => CompletionShell::Zsh,
            Shell::Fish => CompletionShell::Fish,
            Shell::PowerShell => CompletionShell::PowerShell,
            Shell::Elvish => CompletionShell::Elvish,
        }
    }
}

/// Print the script, or write it under `--out-dir` with the name the shell
/// expects (`rrs.bash`, `_rrs`, `rrs.fish`, ...).
pub fn run(args: CompletionsArgs, ctx: &AppContext) -> Result<()> {
    let shell: CompletionShell = args.shell.into();

    let Some(dir) = args.out_dir else {
        return render(shell, &mut io::stdout().lock());
    };

    let path = script_path(shell, &dir);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut buf = Vec::new();
    render(shell, &mut buf)?;
    std::fs::write(&path, buf).with_context(|| format!("Failed to write {}", path.display()))?;

    if !ctx.quiet {
        eprintln!("Wrote {shell} completions to {}", path.display());
    }
    Ok(())
}

fn render(shell: CompletionShell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
    out.flush().context("Failed to flush completion script")
}

fn script_path(shell: CompletionShell, dir: &Path) -> PathBuf {
    use clap_complete::Generator;
    dir.join(shell.file_name(BIN_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn bash_script_mentions_subcommands() {
        let mut buf = Vec::new();
        render(CompletionShell::Bash, &mut buf).unwrap();
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains(BIN_NAME));
        assert!(script.contains("search"));
        assert!(script.contains("session"));
    }

    #[test]
    fn out_dir_uses_shell_file_name() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("completions");
        let ctx = AppContext { quiet: true, no_color: true, root: None };

        run(CompletionsArgs { shell: Shell::Zsh, out_dir: Some(dir.clone()) }, &ctx).unwrap();

        assert!(dir.join("_rrs").is_file());
    }
}
