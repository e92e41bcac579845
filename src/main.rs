//! rejoin - resolve merge conflicts and sync feature branches from the terminal

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use rejoin::app::{Actions, App, Handler};
use rejoin::config::Config;
use rejoin::git::{self, Client, SharedExecutor};
use rejoin::workflow::{self, Progress};
use tracing_subscriber::EnvFilter;

/// Resolve merge conflicts and sync feature branches
#[derive(Parser)]
#[command(name = "rejoin")]
#[command(author, version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a conflicted file in the resolver
    Resolve {
        /// File to resolve (defaults to the first conflicted file)
        path: Option<PathBuf>,
    },
    /// Rebase a feature branch onto main, then merge it into main
    Sync {
        /// Branch to merge into (defaults to `main_branch` from the config)
        main: Option<String>,
        /// Branch to rebase (defaults to the current branch)
        feature: Option<String>,
        /// Print the git commands without running them
        #[arg(long)]
        dry_run: bool,
        /// Extra arguments for `git rebase`, replacing `rebase_args` from the config
        #[arg(last = true)]
        rebase_args: Vec<String>,
    },
    /// List files with unresolved conflicts
    Conflicts,
}

fn init_logging() {
    // Log to $TMPDIR/rejoin.log - tail with: tail -f $TMPDIR/rejoin.log
    // Set DEBUG=0-3 to control verbosity (0=off, 1=warn, 2=info, 3=debug)
    // RUST_LOG takes precedence when set
    let debug_level = std::env::var("DEBUG")
        .ok()
        .and_then(|v| v.parse::<u8>().ok())
        .unwrap_or(0);
    let env_filter = std::env::var("RUST_LOG").ok().map(EnvFilter::new);

    if debug_level == 0 && env_filter.is_none() {
        return;
    }

    let filter = env_filter.unwrap_or_else(|| {
        EnvFilter::new(match debug_level {
            1 => "warn",
            2 => "info",
            _ => "debug",
        })
    });

    let log_path = rejoin::paths::log_path();
    let directory = log_path.parent().map_or_else(std::env::temp_dir, Path::to_path_buf);
    // Start each run with a fresh log
    if let Err(e) = std::fs::write(&log_path, "") {
        eprintln!("Warning: Failed to clear log file: {e}");
    }

    let file_appender = tracing_appender::rolling::never(directory, "rejoin.log");
    tracing_subscriber::fmt()
        .with_writer(file_appender)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Let --help and --version exit normally
            if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                e.exit();
            }
            // For actual errors, show error + help
            eprintln!("error: {}\n", e.kind());
            Cli::command().print_help()?;
            std::process::exit(2);
        }
    };

    let config = Config::load()?;
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let git = git::client_for(&cwd).context("rejoin must be run inside a git work tree")?;

    match cli.command {
        None => cmd_interactive(config, git, &cwd, Start::Picker),
        Some(Commands::Resolve { path: None }) => {
            cmd_interactive(config, git, &cwd, Start::FirstConflict)
        }
        Some(Commands::Resolve { path: Some(path) }) => {
            cmd_interactive(config, git, &cwd, Start::File(cwd.join(path)))
        }
        Some(Commands::Sync {
            main,
            feature,
            dry_run,
            rebase_args,
        }) => cmd_sync(&config, &git, main, feature, dry_run, rebase_args),
        Some(Commands::Conflicts) => cmd_conflicts(&git),
    }
}

/// What the TUI shows first
enum Start {
    Picker,
    FirstConflict,
    File(PathBuf),
}

fn cmd_interactive(
    config: Config,
    git: Client<SharedExecutor>,
    cwd: &Path,
    start: Start,
) -> Result<()> {
    let root = git::repository_root(cwd)?;
    let events = Handler::new(config.poll_interval());
    let mut app = App::new(config, git, root, events.sender());
    Actions::refresh_files(&mut app)?;

    match start {
        Start::Picker => {}
        Start::File(path) => Actions::open_path(&mut app, &path)?,
        Start::FirstConflict => {
            if app.files.is_empty() {
                println!("No conflicted files.");
                return Ok(());
            }
            Actions::open_selected(&mut app)?;
        }
    }

    rejoin::tui::run(app, &events)
}

fn cmd_sync(
    config: &Config,
    git: &Client<SharedExecutor>,
    main: Option<String>,
    feature: Option<String>,
    dry_run: bool,
    rebase_args: Vec<String>,
) -> Result<()> {
    let main = main.unwrap_or_else(|| config.main_branch.clone());
    let feature = match feature {
        Some(feature) => feature,
        None => git
            .current_branch()
            .context("HEAD is detached; name the feature branch to sync")?,
    };
    let rebase_args = if rebase_args.is_empty() {
        config.rebase_argv()?
    } else {
        rebase_args
    };

    if dry_run {
        for step in workflow::plan(git, &main, &feature, &rebase_args)? {
            println!("{}", step.command_line());
        }
        return Ok(());
    }

    let result = workflow::run_with_progress(git, &main, &feature, &rebase_args, |progress| {
        match progress {
            Progress::StepStarted { step, total, label } => {
                println!("[{step}/{total}] {label}");
            }
            Progress::StepFinished { .. } => {}
        }
    });

    match result {
        Ok(summary) => {
            println!("{summary}");
            Ok(())
        }
        Err(e) => {
            let conflicted = git.conflicted_files().unwrap_or_default();
            if !conflicted.is_empty() {
                eprintln!("Conflicted files:");
                for file in &conflicted {
                    eprintln!("  {file}");
                }
                eprintln!("Run `rejoin resolve` to fix them.");
            }
            Err(e.into())
        }
    }
}

fn cmd_conflicts(git: &Client<SharedExecutor>) -> Result<()> {
    for file in git.conflicted_files()? {
        println!("{file}");
    }
    Ok(())
}
