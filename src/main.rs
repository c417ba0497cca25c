use clap::{Parser, Subcommand};
use gitfacade::audit::AuditLogger;
use gitfacade::config::Config;
use gitfacade::{AppError, AppResult, GitExecutor, GitVersion, Repository};
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::process;

/// Query a git working copy and print the answer as JSON
#[derive(Parser, Debug)]
#[command(name = "gitfacade")]
#[command(version)]
struct Cli {
    /// Working copy to operate on (default: current directory)
    #[arg(long, global = true, value_name = "PATH")]
    repo: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Current branch name
    Branch,
    /// Non-merge revisions, newest first
    Revisions {
        /// How many revisions to list (default from config)
        #[arg(allow_negative_numbers = true)]
        limit: Option<i64>,
        /// List oldest first
        #[arg(long)]
        asc: bool,
    },
    /// Most recent revision
    Current,
    /// Revision before the current one
    Previous,
    /// Modified and added files
    Status,
    /// Whether the working copy is clean
    Clean,
    /// Remote tags
    Tags {
        /// Remote name or URL (default remote when omitted)
        remote: Option<String>,
    },
    /// Remote tag pointing at a commit
    TagOf {
        hash: String,
        remote: Option<String>,
    },
    /// Diff between two revisions
    Diff { from: String, to: String },
    /// Whether a path is inside a work tree
    IsRepo { path: Option<PathBuf> },
    /// Clone a repository
    Clone { url: String, path: Option<PathBuf> },
    /// Force checkout a revision, branch or tag
    Checkout { revision: String },
    /// Fetch from a remote
    Fetch {
        /// Arguments passed to git fetch
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            process::exit(1);
        }
        // --help and --version
        Err(e) => e.exit(),
    };

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> AppResult<()> {
    let config = Config::load_or_default()?;
    let executor = build_executor(&config);
    GitVersion::validate(&executor)?;

    let repo_path = match cli.repo {
        Some(path) => path,
        None => env::current_dir()?,
    };
    let repo = Repository::with_runner(repo_path, executor)?;

    match cli.command {
        Command::Branch => print_json(&repo.current_branch()?),
        Command::Revisions { limit, asc } => {
            let limit = limit.unwrap_or(config.revisions.default_limit);
            print_json(&repo.revisions(limit, asc)?)
        }
        Command::Current => print_json(&repo.current_revision()?),
        Command::Previous => print_json(&repo.previous_revision()?),
        Command::Status => print_json(&repo.status()?),
        Command::Clean => print_json(&repo.is_working_copy_clean()?),
        Command::Tags { remote } => print_json(&repo.remote_tags(remote.as_deref())?),
        Command::TagOf { hash, remote } => {
            print_json(&repo.tag_for_hash(&hash, remote.as_deref())?)
        }
        Command::Diff { from, to } => {
            println!("{}", repo.diff(&from, &to)?);
            Ok(())
        }
        Command::IsRepo { path } => print_json(&repo.is_repository(path.as_deref())?),
        Command::Clone { url, path } => {
            repo.clone_remote(&url, path.as_deref())?;
            Ok(())
        }
        Command::Checkout { revision } => {
            repo.checkout(&revision)?;
            Ok(())
        }
        Command::Fetch { args } => {
            repo.fetch(&args.join(" "))?;
            Ok(())
        }
    }
}

fn build_executor(config: &Config) -> GitExecutor {
    let executor = GitExecutor::with_config(config.git.clone());
    if !config.log.log_commands {
        return executor;
    }

    let logger = config
        .audit_log_path()
        .map_err(AppError::from)
        .and_then(|path| AuditLogger::with_path(path).map_err(AppError::from));

    match logger {
        Ok(logger) => executor.with_audit_logger(logger),
        Err(e) => {
            eprintln!("Warning: command history disabled: {}", e);
            executor
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
