use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use command_docs_core::DetailLevel;
use command_docs_db::{
    DefinitionSource, DocsConfig, DocsProvider, ReloadReport, complete, hover, load_source,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// CLI-specific detail level enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliDetailLevel {
    Off,
    Minimum,
    NoExamplesNoLinks,
    Full,
}

impl From<CliDetailLevel> for DetailLevel {
    fn from(level: CliDetailLevel) -> Self {
        match level {
            CliDetailLevel::Off => Self::Off,
            CliDetailLevel::Minimum => Self::Minimum,
            CliDetailLevel::NoExamplesNoLinks => Self::NoExamplesNoLinks,
            CliDetailLevel::Full => Self::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "docs-lookup")]
#[command(about = "Command documentation hover and completion lookups")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Path to a docs config YAML file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Extra definition file (repeatable), loaded after configured sources.
    #[arg(long = "source", global = true)]
    sources: Vec<PathBuf>,
    /// Skip the bundled definitions.
    #[arg(long, global = true)]
    no_bundled: bool,
    /// Enable debug logging on stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show hover help for the identifier at a file position.
    Hover(PositionArgs),
    /// List completions for the identifier at a file position.
    Complete(CompleteArgs),
    /// Render help for a command by name.
    Show(ShowArgs),
    /// List registered command names.
    List(ListArgs),
    /// Parse every definition source and report warnings and failures.
    Check,
}

#[derive(Debug, Args)]
struct PositionArgs {
    /// File containing the text to inspect.
    #[arg(long)]
    file: PathBuf,
    /// Zero-based line number.
    #[arg(long)]
    line: usize,
    /// Zero-based character column.
    #[arg(long)]
    column: usize,
    /// Override the configured detail level.
    #[arg(long)]
    level: Option<CliDetailLevel>,
}

#[derive(Debug, Args)]
struct CompleteArgs {
    #[command(flatten)]
    position: PositionArgs,
    /// Output format.
    #[arg(long, default_value = "text")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ShowArgs {
    /// Command name to render.
    command: String,
    /// Detail level.
    #[arg(long, default_value = "full")]
    level: CliDetailLevel,
    /// Omit the signature block.
    #[arg(long)]
    no_signature: bool,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Only list commands starting with this prefix.
    #[arg(long, default_value = "")]
    prefix: String,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let result = match cli.command {
        Command::Hover(args) => run_hover(&cli.global, args),
        Command::Complete(args) => run_complete(&cli.global, args),
        Command::Show(args) => run_show(&cli.global, args),
        Command::List(args) => run_list(&cli.global, args),
        Command::Check => run_check(&cli.global),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(global: &GlobalArgs) -> Result<DocsConfig, String> {
    let mut config = match &global.config {
        Some(path) => DocsConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => DocsConfig::default(),
    };
    if global.no_bundled {
        config.bundled = false;
    }
    config.sources.extend(global.sources.iter().cloned());
    Ok(config)
}

/// Builds a provider and reloads it, reporting failing sources on stderr.
fn load_provider(global: &GlobalArgs) -> Result<DocsProvider, String> {
    let provider = DocsProvider::new(load_config(global)?);
    let report = provider.reload();
    debug!(loaded = report.loaded, warnings = report.warnings.len(), "Loaded definitions");
    report_failures(&report);
    Ok(provider)
}

fn report_failures(report: &ReloadReport) {
    for failure in &report.failures {
        eprintln!("warning: skipped {}: {}", failure.label, failure.message);
    }
}

fn read_line(args: &PositionArgs) -> Result<String, String> {
    let text = fs::read_to_string(&args.file)
        .map_err(|err| format!("Failed to read '{}': {err}", args.file.display()))?;
    Ok(text.lines().nth(args.line).unwrap_or_default().to_string())
}

fn run_hover(global: &GlobalArgs, args: PositionArgs) -> Result<(), String> {
    let provider = load_provider(global)?;
    let line_text = read_line(&args)?;
    let level = args
        .level
        .map_or(provider.config().hover.level, DetailLevel::from);

    match hover(
        provider.registry(),
        &provider.config().resolver(),
        &line_text,
        args.line,
        args.column,
        level,
    ) {
        Some(found) => println!("{}", found.contents),
        None => eprintln!("no documentation at {}:{}", args.line, args.column),
    }
    Ok(())
}

fn run_complete(global: &GlobalArgs, args: CompleteArgs) -> Result<(), String> {
    let provider = load_provider(global)?;
    let position = args.position;
    let line_text = read_line(&position)?;
    let level = position
        .level
        .map_or(provider.config().completion.level, DetailLevel::from);

    let items = complete(
        provider.registry(),
        &provider.config().resolver(),
        &line_text,
        position.column,
        level,
    );

    match args.format {
        CliOutputFormat::Text => {
            for item in &items {
                let detail = item.detail.lines().collect::<Vec<_>>().join(" ");
                println!("{}\t{}\t{detail}", item.label, item.insert_text);
            }
        }
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(&items)
                .map_err(|err| format!("Failed to serialize completions: {err}"))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn run_show(global: &GlobalArgs, args: ShowArgs) -> Result<(), String> {
    let provider = load_provider(global)?;
    let desc = provider
        .registry()
        .get(&args.command)
        .ok_or_else(|| format!("Unknown command '{}'", args.command))?;

    if let Some(text) = desc.format(args.level.into(), !args.no_signature) {
        println!("{text}");
    }
    Ok(())
}

fn run_list(global: &GlobalArgs, args: ListArgs) -> Result<(), String> {
    let provider = load_provider(global)?;
    for desc in provider.registry().prefix_search(&args.prefix) {
        println!("{}", desc.command());
    }
    Ok(())
}

fn run_check(global: &GlobalArgs) -> Result<(), String> {
    let config = load_config(global)?;
    let options = config.parse_options();
    let sources: Vec<DefinitionSource> = config.definition_sources();

    let mut failed = 0usize;
    for source in &sources {
        let label = source.label();
        match load_source(source, &options) {
            Ok(parsed) => {
                println!("ok: {label} ({} commands)", parsed.descriptions.len());
                for warning in &parsed.warnings {
                    println!("  warning: {warning}");
                }
            }
            Err(err) => {
                failed += 1;
                println!("failed: {label}: {err}");
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} of {} sources failed to load", sources.len()));
    }
    Ok(())
}
