mod error;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{ArgAction, Parser, Subcommand};
use exn::ResultExt;
use tankobon_cache::PathCache;
use tankobon_config::error::ErrorKind as ConfigError;
use tankobon_config::{Config, Features};
use tankobon_extract::Placement;
use tankobon_library::notify::TracingNotifier;
use tankobon_library::{Context, RunContext, check};
use tankobon_storage::BackendHandle;
use tankobon_storage::backend::{LocalBackend, ReadOnlyBackend};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::error::{ErrorKind, Result};

#[derive(Parser)]
#[command(name = "tankobon", version, about = "Organizes a manga/light-novel library from a download staging area")]
struct Cli {
    /// Configuration file, TOML or YAML
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log more; repeat for more detail
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Log less
    #[arg(short, long, action = ArgAction::Count, global = true)]
    quiet: u8,

    /// Log every change without touching any file
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run every pass enabled in the configuration (default)
    Run,
    /// Rename downloads to the naming template
    Rename,
    /// Match downloads to library folders, moving new releases and upgrades
    CheckExisting,
    /// Resolve releases sharing a slot within each library folder
    Duplicates,
    /// Report gaps in the volume numbering of each library folder
    Missing,
    /// Write cover images next to library archives
    Covers,
    /// Print the descriptors parsed from file names as JSON
    Parse {
        #[arg(required = true)]
        names: Vec<PathBuf>,

        /// Treat each name as the only release in its folder
        #[arg(long)]
        sole: bool,

        /// Treat each name as sitting directly in a download path
        #[arg(long)]
        download_root: bool,
    },
}

impl Command {
    /// The passes to run: the configured set, or exactly the one requested.
    fn features(&self, configured: Features) -> Features {
        let only = Features {
            rename_downloads: false,
            check_existing: false,
            check_duplicates: false,
            check_missing: false,
            extract_covers: false,
        };
        match self {
            Self::Run | Self::Parse { .. } => configured,
            Self::Rename => Features {
                rename_downloads: true,
                ..only
            },
            Self::CheckExisting => Features {
                check_existing: true,
                ..only
            },
            Self::Duplicates => Features {
                check_duplicates: true,
                ..only
            },
            Self::Missing => Features {
                check_missing: true,
                ..only
            },
            Self::Covers => Features {
                extract_covers: true,
                ..only
            },
        }
    }
}

fn init_tracing(verbose: u8, quiet: u8) {
    let level = match i16::from(verbose) - i16::from(quiet) {
        ..0 => Level::ERROR,
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match execute(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:?}");
            ExitCode::FAILURE
        },
    }
}

fn execute(cli: Cli) -> Result<ExitCode> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let command = cli.command.unwrap_or(Command::Run);
    if let Command::Parse {
        names,
        sole,
        download_root,
    } = &command
    {
        let placement = Placement {
            sole_in_directory: *sole,
            in_download_root: *download_root,
        };
        return parse(&config, names, placement);
    }

    let mut problems = Vec::new();
    for problem in config.validate() {
        match problem {
            ConfigError::NoPaths => exn::bail!(ErrorKind::NoPaths),
            problem => {
                tracing::warn!(%problem, "Configuration problem");
                problems.push(problem.to_string());
            },
        }
    }

    let local: BackendHandle = Arc::new(LocalBackend::new("local"));
    let backend: BackendHandle = match cli.dry_run {
        true => Arc::new(ReadOnlyBackend::new(local)),
        false => local,
    };
    let ctx = Context::from_config(&config, backend.clone(), Arc::new(TracingNotifier)).or_raise(|| ErrorKind::Setup)?;

    let cache = match &config.cache_file {
        Some(file) => match PathCache::load(backend.as_ref(), file, &config.download_paths) {
            Ok(cache) => cache,
            Err(e) => {
                tracing::warn!(error = %e, file = %file.display(), "Ignoring unreadable path cache");
                PathCache::in_memory()
            },
        },
        None => PathCache::in_memory(),
    };
    let mut run = RunContext::new(cache);
    for problem in problems {
        run.report.error(problem);
    }

    check::run(&ctx, &mut run, command.features(config.features));

    print!("{}", run.report.summary());
    if let Some(dir) = &config.log_dir
        && let Err(e) = run.report.persist(backend.as_ref(), dir)
    {
        tracing::error!(error = %e, dir = %dir.display(), "Could not append to the run log");
    }
    Ok(match run.report.errors().is_empty() {
        true => ExitCode::SUCCESS,
        false => ExitCode::FAILURE,
    })
}

/// Prints the descriptors of `names` without touching the filesystem.
fn parse(config: &Config, names: &[PathBuf], placement: Placement) -> Result<ExitCode> {
    let parser = tankobon_extract::Parser::new(config.vocabulary.clone()).or_raise(|| ErrorKind::Config)?;
    let mut descriptors = Vec::with_capacity(names.len());
    let mut failed = false;
    for name in names {
        match parser.describe_path(name, placement) {
            Ok(descriptor) => descriptors.push(descriptor),
            Err(e) => {
                failed = true;
                eprintln!("{}: {e}", name.display());
            },
        }
    }
    let json = serde_json::to_string_pretty(&descriptors).or_raise(|| ErrorKind::Output)?;
    println!("{json}");
    Ok(match failed {
        true => ExitCode::FAILURE,
        false => ExitCode::SUCCESS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_single_pass_features() {
        let features = Command::Missing.features(Features::default());
        assert!(features.check_missing);
        assert!(!features.check_existing);
        assert_eq!(Command::Run.features(Features::default()), Features::default());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tankobon", "covers", "--dry-run", "-vv"]).unwrap();
        assert!(cli.dry_run);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Command::Covers)));
    }
}
