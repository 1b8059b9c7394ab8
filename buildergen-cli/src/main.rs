//! # buildergen
//!
//! CLI tool for generating Java builder classes from JSON type descriptors.
//!
//! ## Usage
//!
//! ```bash
//! # Generate builders for every descriptor under ./descriptors
//! buildergen generate --input ./descriptors
//!
//! # Generate into a specific source root, targeting Java 7 with Guava
//! buildergen generate --output ./src/main/java --source-level java7 --guava
//!
//! # Watch mode for development
//! buildergen generate --watch
//!
//! # Dry run to preview changes
//! buildergen generate --dry-run
//!
//! # Initialize configuration
//! buildergen init
//!
//! # Verify generated builders are up-to-date (exit code 2 if not)
//! buildergen check
//!
//! # Check builders generated with overrides, passing the same flags
//! buildergen check --source-level java7 --guava
//! ```

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use buildergen::SourceLevel;
use buildergen_cli::{
    config::{CliArgs, Config, ConfigManager, CONFIG_FILENAME},
    error::CliError,
    run_pipeline,
    watcher::FileWatcher,
    writer::{file_status, FileStatus, FileWriter, WriteResult},
};

#[derive(Parser, Debug)]
#[command(name = "buildergen")]
#[command(author, version, about = "Generate Java builder classes from type descriptors", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate builders from descriptor files
    Generate {
        /// Directory or file containing JSON type descriptors
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Source root for generated Java files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Watch for descriptor changes and regenerate
        #[arg(short, long)]
        watch: bool,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Filter descriptors by path pattern (glob)
        #[arg(long)]
        filter: Option<String>,

        /// Java source level (java6, java7, java8)
        #[arg(long)]
        source_level: Option<SourceLevel>,

        /// Use Guava in generated code
        #[arg(long)]
        guava: bool,
    },

    /// Initialize a new buildergen configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = CONFIG_FILENAME)]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Check that generated builders are up-to-date
    Check {
        /// Directory or file containing JSON type descriptors
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Source root holding the generated Java files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Filter descriptors by path pattern (glob)
        #[arg(long)]
        filter: Option<String>,

        /// Java source level the builders were generated for
        #[arg(long)]
        source_level: Option<SourceLevel>,

        /// Builders were generated with Guava
        #[arg(long)]
        guava: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            match e {
                CliError::Stale(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

/// Install the log subscriber; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Generate {
            input,
            output,
            watch,
            dry_run,
            config,
            filter,
            source_level,
            guava,
        } => cmd_generate(
            input,
            override_args(output, source_level, guava),
            watch,
            dry_run,
            config,
            filter,
        ),

        Commands::Init { output, force } => cmd_init(output, force),

        Commands::Check {
            input,
            output,
            config,
            filter,
            source_level,
            guava,
        } => cmd_check(
            input,
            override_args(output, source_level, guava),
            config,
            filter,
        ),
    }
}

/// Overrides shared by `generate` and `check`; `--guava` only ever turns it on.
fn override_args(output: Option<PathBuf>, source_level: Option<SourceLevel>, guava: bool) -> CliArgs {
    CliArgs {
        output,
        source_level,
        guava: guava.then_some(true),
        ..Default::default()
    }
}

/// Generate command implementation.
fn cmd_generate(
    input: PathBuf,
    args: CliArgs,
    watch: bool,
    dry_run: bool,
    config_path: Option<PathBuf>,
    filter: Option<String>,
) -> Result<(), CliError> {
    let config = ConfigManager::load(config_path.as_deref())?;
    let config = ConfigManager::merge_cli_args(config, &args);

    if watch {
        run_watch_mode(&input, &config, filter.as_deref(), dry_run)
    } else {
        run_generate(&input, &config, filter.as_deref(), dry_run)
    }
}

/// Run builder generation once.
fn run_generate(
    input: &Path,
    config: &Config,
    filter: Option<&str>,
    dry_run: bool,
) -> Result<(), CliError> {
    println!("{}", "Scanning for type descriptors...".cyan());

    let run = run_pipeline(input, filter, config)?;

    if run.scanned == 0 {
        println!("{}", "No descriptor files found.".yellow());
        return Ok(());
    }

    println!("  Found {} descriptor file(s)", run.scanned.to_string().green());

    if !run.skipped.is_empty() {
        println!(
            "{} {} descriptor(s) skipped:",
            "Warning:".yellow(),
            run.skipped.len()
        );
        for error in &run.skipped {
            println!("  {}", error);
        }
    }

    if run.output.is_empty() {
        println!("{}", "No builders to generate.".yellow());
        return Ok(());
    }

    println!(
        "{} ({}, guava: {})",
        "Generating builders...".cyan(),
        config.java.source_level,
        config.java.guava
    );

    let writer = FileWriter::new(dry_run);

    for file in &run.output.files {
        let path = config.output.dir.join(&file.relative_path);
        match writer.write(&path, &file.content)? {
            WriteResult::Written { path, bytes } => {
                println!(
                    "{} {} ({} bytes) -> {}",
                    "✓".green(),
                    file.type_name,
                    bytes,
                    path.display()
                );
            }
            WriteResult::DryRun { content, path } => {
                println!(
                    "{} Would write {} to {}:",
                    "[dry-run]".yellow(),
                    file.type_name,
                    path.display()
                );
                println!("{}", "─".repeat(60).dimmed());
                println!("{}", content);
                println!("{}", "─".repeat(60).dimmed());
            }
        }
    }

    println!(
        "  Generated {} builder(s)",
        run.output.len().to_string().green()
    );

    Ok(())
}

/// Run in watch mode.
fn run_watch_mode(
    input: &Path,
    config: &Config,
    filter: Option<&str>,
    dry_run: bool,
) -> Result<(), CliError> {
    println!("{}", "Starting watch mode...".cyan());
    println!("  Watching: {}", input.display());
    println!("  Press Ctrl+C to stop\n");

    if let Err(e) = run_generate(input, config, filter, dry_run) {
        println!("{} {}", "Generation error:".red(), e);
    }

    let watcher = FileWatcher::new(input);
    let (_debouncer, rx) = watcher.watch()?;

    println!("\n{}", "Watching for changes...".cyan());

    while let Ok(event) = rx.recv() {
        if event.is_error() {
            println!(
                "{} {}",
                "Watch error:".red(),
                event.error_message().unwrap_or("Unknown error")
            );
            continue;
        }

        if let Some(path) = event.path() {
            println!("\n{} {}", "Descriptor changed:".cyan(), path.display());
        }

        if let Err(e) = run_generate(input, config, filter, dry_run) {
            println!("{} {}", "Generation error:".red(), e);
        }

        println!("\n{}", "Watching for changes...".cyan());
    }

    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!("  Use --force to overwrite");
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("Configuration file already exists: {}", output.display()),
        )
        .into());
    }

    std::fs::write(&output, ConfigManager::default_config_content())?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Check command implementation.
fn cmd_check(
    input: PathBuf,
    args: CliArgs,
    config_path: Option<PathBuf>,
    filter: Option<String>,
) -> Result<(), CliError> {
    println!("{}", "Checking generated builders...".cyan());

    let config = ConfigManager::load(config_path.as_deref())?;
    let config = ConfigManager::merge_cli_args(config, &args);

    let run = run_pipeline(&input, filter.as_deref(), &config)?;

    let mut outdated = 0;
    for file in &run.output.files {
        let path = config.output.dir.join(&file.relative_path);
        match file_status(&path, &file.content)? {
            FileStatus::UpToDate => {}
            FileStatus::Stale => {
                outdated += 1;
                println!("{} {} is out of date", "✗".red(), path.display());
            }
            FileStatus::Missing => {
                outdated += 1;
                println!("{} {} is missing", "✗".red(), path.display());
            }
        }
    }

    for error in &run.skipped {
        println!("{} {}", "✗".red(), error);
    }

    if outdated == 0 && run.skipped.is_empty() {
        println!(
            "{} {} builder(s) are up-to-date",
            "✓".green(),
            run.output.len()
        );
        Ok(())
    } else {
        println!("  Run 'buildergen generate' to update");
        Err(CliError::Stale(format!(
            "{} builder(s) out of date, {} descriptor(s) unreadable",
            outdated,
            run.skipped.len()
        )))
    }
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_accepts_generate_overrides() {
        let cli = Cli::try_parse_from([
            "buildergen",
            "check",
            "--source-level",
            "java7",
            "--guava",
        ])
        .unwrap();

        let Commands::Check {
            output,
            source_level,
            guava,
            ..
        } = cli.command
        else {
            panic!("expected check command");
        };
        let args = override_args(output, source_level, guava);
        assert_eq!(args.source_level, Some(SourceLevel::Java7));
        assert_eq!(args.guava, Some(true));
    }

    #[test]
    fn test_check_without_overrides_keeps_config() {
        let cli = Cli::try_parse_from(["buildergen", "check"]).unwrap();
        let Commands::Check {
            output,
            source_level,
            guava,
            ..
        } = cli.command
        else {
            panic!("expected check command");
        };
        let args = override_args(output, source_level, guava);
        assert_eq!(args.source_level, None);
        assert_eq!(args.guava, None);
    }
}
