mod app;
mod config;
mod dispatch;
mod git;
mod logging;
#[cfg(test)]
mod test_support;
mod tui;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use config::ConfigFile;

#[derive(Parser, Debug)]
#[command(
    name = "stagecraft",
    version,
    about = "Stage, commit and amend from a terminal UI",
    long_about = "Run inside a git working tree. Pick files to stage or unstage, \
                  write a commit (optionally back-dated), or reword / undo HEAD.",
)]
struct Args {
    /// Write a default config file to ~/.config/stagecraft/config.toml and exit
    #[arg(long)]
    init: bool,

    /// Generate shell completions and print to stdout (bash, zsh, fish, elvish)
    #[arg(long, value_name = "SHELL")]
    completions: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ── --init ────────────────────────────────────────────────────────────────
    if args.init {
        let path = ConfigFile::write_default_if_missing()?;
        println!("Config written to: {}", path.display());
        return Ok(());
    }

    // ── --completions ─────────────────────────────────────────────────────────
    if let Some(shell_name) = &args.completions {
        return generate_completions(shell_name);
    }

    let file = ConfigFile::load()?;
    let _log_guard = logging::init(&file.log_level);

    // ── Startup checks ────────────────────────────────────────────────────────
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let Some(repo) = git::GitRepo::open(&cwd, file.git_timeout()) else {
        bail!("not a git repository: {}", cwd.display());
    };
    tracing::info!(root = %repo.root.display(), "opened repository");

    tui::run(repo, file.settings()).await
}

// ── Shell completions ─────────────────────────────────────────────────────────

fn generate_completions(shell_name: &str) -> Result<()> {
    use clap_complete::{Shell, generate};

    let shell: Shell = match shell_name.to_lowercase().as_str() {
        "bash"    => Shell::Bash,
        "zsh"     => Shell::Zsh,
        "fish"    => Shell::Fish,
        "elvish"  => Shell::Elvish,
        _ => bail!("Unknown shell: {shell_name} (supported: bash, zsh, fish, elvish)"),
    };

    let mut cmd = Args::command();
    generate(shell, &mut cmd, "stagecraft", &mut std::io::stdout());
    Ok(())
}
