//! # locale-gen
//!
//! Generates strongly-named C# accessors for localization string tables.
//!
//! ## Usage
//!
//! ```bash
//! # Generate LocaleClasses.g.cs into the configured target folder
//! locale-gen generate
//!
//! # Regenerate whenever entries are added to or removed from a table
//! locale-gen generate --watch
//!
//! # Preview the generated file without writing it
//! locale-gen generate --dry-run
//!
//! # Generate for a project elsewhere, under another file name
//! locale-gen generate --project-root ../Game --file-name Strings.g.cs
//!
//! # Check that the generated file is up-to-date
//! locale-gen validate
//!
//! # Move the generated file to another folder
//! locale-gen settings set-target Assets/Scripts/Generated
//! ```

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

use locale_gen::{
    CheckOutcome, GenerateReport, GenerateResult, Regenerator, SettingsStore, TableEvent,
    TableSource, Trigger, WriteOutcome,
};
use locale_gen_cli::{
    config::{CliArgs, Config, ConfigManager},
    error::{CliError, ConfigError},
    scanner::DirectoryTableSource,
    watcher::{regenerate_on_change, FileWatcher},
    writer::LocalFileSystem,
};

type CliRegenerator = Regenerator<DirectoryTableSource, LocalFileSystem>;

#[derive(Parser)]
#[command(name = "locale-gen")]
#[command(author, version, about = "Generate C# accessors for localization string tables", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the commands that read the project.
#[derive(Args, Debug)]
struct ProjectArgs {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project root; the target folder must be inside it
    #[arg(long)]
    project_root: Option<PathBuf>,

    /// Directory containing table files
    #[arg(short, long)]
    tables: Option<PathBuf>,

    /// Name of the generated file
    #[arg(long)]
    file_name: Option<String>,
}

impl ProjectArgs {
    fn overrides(self, filter: Option<String>) -> (Option<PathBuf>, CliArgs) {
        let args = CliArgs {
            project_root: self.project_root,
            tables: self.tables,
            filter,
            file_name: self.file_name,
        };
        (self.config, args)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the C# accessor file from the string tables
    Generate {
        #[command(flatten)]
        project: ProjectArgs,

        /// Watch table files and regenerate on entry changes
        #[arg(short, long)]
        watch: bool,

        /// Preview the output without writing files
        #[arg(long)]
        dry_run: bool,

        /// Only load table files matching this pattern (glob)
        #[arg(long)]
        filter: Option<String>,
    },

    /// Check that the generated file matches the current tables
    Validate {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Initialize a new locale-gen configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "locale-gen.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Show or change the persisted generator settings
    Settings {
        #[command(flatten)]
        project: ProjectArgs,

        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current settings
    Show,

    /// Move the generated file to another folder inside the project
    SetTarget {
        /// New target folder, relative to the project root
        folder: PathBuf,
    },

    /// Change the prefix of generated class names
    SetPrefix {
        /// New prefix; sanitized before it is stored
        prefix: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Log to stderr so generated output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Generate {
            project,
            watch,
            dry_run,
            filter,
        } => cmd_generate(project, watch, dry_run, filter),

        Commands::Validate { project } => cmd_validate(project),

        Commands::Init { output, force } => cmd_init(output, force),

        Commands::Settings { project, action } => cmd_settings(project, action),
    }
}

/// Generate command implementation.
fn cmd_generate(
    project: ProjectArgs,
    watch: bool,
    dry_run: bool,
    filter: Option<String>,
) -> Result<(), CliError> {
    let (config_path, overrides) = project.overrides(filter);
    let config = load_config(config_path.as_deref(), &overrides)?;

    if watch {
        run_watch_mode(&config, dry_run)
    } else {
        run_generate(&config, dry_run)
    }
}

/// Run generation once.
fn run_generate(config: &Config, dry_run: bool) -> Result<(), CliError> {
    let store = open_settings(config)?;
    let mut regenerator = build_regenerator(config, dry_run)?;

    println!(
        "{} {}",
        "Reading string tables from".cyan(),
        config.tables_dir().display()
    );

    let report = regenerator.handle(&Trigger::Manual, store.settings())?;
    print_report(&report);

    Ok(())
}

/// Run in watch mode.
///
/// Every debounced batch of file changes goes through
/// [`regenerate_on_change`]; a batch with at least one entry event
/// regenerates once.
fn run_watch_mode(config: &Config, dry_run: bool) -> Result<(), CliError> {
    let tables_dir = config.tables_dir();
    println!("{}", "Starting watch mode...".cyan());
    println!("  Watching: {}", tables_dir.display());
    println!("  Press Ctrl+C to stop\n");

    let store = open_settings(config)?;
    let mut regenerator = build_regenerator(config, dry_run)?;

    report_result(regenerator.handle(&Trigger::Manual, store.settings()));
    let mut snapshot = regenerator
        .source()
        .list_string_tables()
        .unwrap_or_default();

    let watcher = FileWatcher::new(&tables_dir).with_debounce(config.watch.debounce_ms);
    let (_debouncer, rx) = watcher.watch()?;

    println!("\n{}", "Watching for changes...".cyan());

    while let Ok(event) = rx.recv() {
        if let Some(message) = event.error_message() {
            println!("{} {}", "Watch error:".red(), message);
            continue;
        }

        if let Some(path) = event.path() {
            println!("\n{} {}", "File changed:".cyan(), path.display());
        }

        let outcome =
            match regenerate_on_change(&mut snapshot, &mut regenerator, store.settings()) {
                Ok(outcome) => outcome,
                Err(e) => {
                    println!("{} {}", "Table error:".red(), e);
                    continue;
                }
            };

        for event in &outcome.events {
            print_table_event(event);
        }

        let Some(result) = outcome.report else {
            println!("  No entries added or removed");
            continue;
        };

        report_result(result);
        println!("\n{}", "Watching for changes...".cyan());
    }

    Ok(())
}

/// Validate command implementation.
fn cmd_validate(project: ProjectArgs) -> Result<(), CliError> {
    println!("{}", "Validating generated locale classes...".cyan());

    let (config_path, overrides) = project.overrides(None);
    let config = load_config(config_path.as_deref(), &overrides)?;
    let store = open_settings(&config)?;
    let regenerator = build_regenerator(&config, false)?;

    let generator = regenerator.generator(store.settings());
    let output_path = regenerator.output_path(store.target_folder());
    let tables = regenerator.source().list_string_tables()?;

    match generator.check(&tables, &output_path, regenerator.file_system())? {
        CheckOutcome::UpToDate => {
            println!("{} Locale classes are up-to-date", "✓".green());
            Ok(())
        }
        CheckOutcome::Stale => {
            println!("{} Locale classes are out of date", "✗".red());
            println!("  Run 'locale-gen generate' to update");
            Err(CliError::Validation(format!(
                "{} is out of date",
                output_path.display()
            )))
        }
        CheckOutcome::Missing => {
            println!("{} Locale classes have not been generated", "✗".red());
            println!("  Run 'locale-gen generate' to create them");
            Err(CliError::Validation(format!(
                "{} not found",
                output_path.display()
            )))
        }
    }
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!("  Use --force to overwrite");
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("configuration file already exists: {}", output.display()),
        )
        .into());
    }

    let content = ConfigManager::default_config_content();
    std::fs::write(&output, content)?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Settings command implementation.
fn cmd_settings(project: ProjectArgs, action: SettingsAction) -> Result<(), CliError> {
    let (config_path, overrides) = project.overrides(None);
    let config = load_config(config_path.as_deref(), &overrides)?;
    let mut store = open_settings(&config)?;

    match action {
        SettingsAction::Show => {
            let regenerator = build_regenerator(&config, false)?;
            println!("{} {}", "Settings file:".cyan(), store.path().display());
            println!("  Target folder: {}", store.target_folder().display());
            println!("  Class prefix:  {}", store.prefix());
            println!(
                "  Output file:   {}",
                regenerator.output_path(store.target_folder()).display()
            );
        }

        SettingsAction::SetTarget { folder } => {
            let mut regenerator = build_regenerator(&config, false)?;
            let outcome: Rc<RefCell<Option<GenerateResult<GenerateReport>>>> = Rc::default();

            let sink = Rc::clone(&outcome);
            store.subscribe(move |change, settings| {
                let result = regenerator.handle(&Trigger::from(change), settings);
                *sink.borrow_mut() = Some(result);
            });

            if !store.set_target_folder(&folder)? {
                println!(
                    "{} Target folder is already {}",
                    "✓".green(),
                    store.target_folder().display()
                );
                return Ok(());
            }

            println!(
                "{} Target folder set to {}",
                "✓".green(),
                store.target_folder().display()
            );

            let result = outcome.borrow_mut().take();
            if let Some(result) = result {
                print_report(&result?);
            }
        }

        SettingsAction::SetPrefix { prefix } => {
            let stored = store.set_prefix(&prefix)?;
            println!("{} Class prefix set to {}", "✓".green(), stored);
            println!("  Run 'locale-gen generate' to apply it");
        }
    }

    Ok(())
}

/// Load the configuration file and apply CLI overrides.
fn load_config(config_path: Option<&Path>, args: &CliArgs) -> Result<Config, CliError> {
    let config = ConfigManager::load(config_path)?;
    let config = ConfigManager::merge_cli_args(config, args);
    config.validate()?;
    Ok(config)
}

fn open_settings(config: &Config) -> Result<SettingsStore, CliError> {
    Ok(SettingsStore::open(
        config.settings_path(),
        config.project_root(),
    )?)
}

fn build_regenerator(config: &Config, dry_run: bool) -> Result<CliRegenerator, CliError> {
    let mut source = DirectoryTableSource::new(config.tables_dir());
    if let Some(pattern) = &config.tables.filter {
        source = source
            .with_filter(pattern)
            .map_err(|e| ConfigError::invalid_value("tables.filter", e.to_string()))?;
    }

    Ok(Regenerator::new(
        config.generator_options(),
        config.project_root(),
        source,
        LocalFileSystem::new(dry_run),
    ))
}

/// Print a generation report.
fn print_report(report: &GenerateReport) {
    match report.outcome {
        WriteOutcome::Written { bytes } => {
            println!(
                "{} Generated {} class(es) with {} accessor(s)",
                "✓".green(),
                report.classes.to_string().green(),
                report.accessors.to_string().green()
            );
            println!("  Written {} bytes to {}", bytes, report.path.display());
        }
        WriteOutcome::DryRun => {
            println!(
                "{} Would write to {}:",
                "[dry-run]".yellow(),
                report.path.display()
            );
            println!("{}", "─".repeat(60).dimmed());
            print!("{}", report.content);
            println!("{}", "─".repeat(60).dimmed());
        }
    }
}

/// Print the outcome of a generation run without stopping.
fn report_result(result: GenerateResult<GenerateReport>) {
    match result {
        Ok(report) => print_report(&report),
        Err(e) => println!("{} {}", "Generation error:".red(), e),
    }
}

fn print_table_event(event: &TableEvent) {
    match event {
        TableEvent::EntryAdded { table, key, .. } => {
            println!("  {} {}/{}", "+".green(), table, key);
        }
        TableEvent::EntryRemoved { table, key, .. } => {
            println!("  {} {}/{}", "-".red(), table, key);
        }
    }
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
