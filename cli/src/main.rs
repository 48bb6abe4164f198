use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use helpsync_core::{CommandTable, validate_table};
use helpsync_generate::config::SyncConfig;
use helpsync_generate::defaults::install_default_templates;
use helpsync_generate::emit::Dialect;
use helpsync_generate::extract::extract_help_text;
use helpsync_generate::output::{OutputFormat, format_table};
use helpsync_generate::parser::{CommandTableParser, ParseDiagnostics};
use helpsync_generate::pipeline::Pipeline;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Config file picked up from the root when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "helpsync.yaml";

#[derive(Debug, Parser)]
#[command(name = "helpsync")]
#[command(about = "Regenerate shell completions and README sections from embedded help text")]
#[command(version)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Regenerate completion scripts and README sections.
    Sync(ProjectArgs),
    /// Report files that are out of date without writing; exits 1 on drift.
    Check(ProjectArgs),
    /// Extract and parse the help text of a source file, printing the command table.
    Parse(ParseArgs),
    /// Render one dialect's completion script to stdout.
    Render(RenderArgs),
    /// Write the bundled default templates into the templates directory.
    InitTemplates(InitTemplatesArgs),
}

#[derive(Debug, Args)]
struct ProjectArgs {
    /// Repository root; configured paths are relative to it.
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// YAML configuration file (default: <root>/helpsync.yaml when present).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[command(flatten)]
    project: ProjectArgs,
    /// Source file containing the help text assignment.
    #[arg(long)]
    input: PathBuf,
    /// Name of the variable holding the help text (default: from config).
    #[arg(long)]
    variable: Option<String>,
    /// Also print parser diagnostics.
    #[arg(long)]
    with_report: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct RenderArgs {
    #[command(flatten)]
    project: ProjectArgs,
    /// Completion dialect to render.
    #[arg(long)]
    dialect: Dialect,
}

#[derive(Debug, Args)]
struct InitTemplatesArgs {
    #[command(flatten)]
    project: ProjectArgs,
    /// Overwrite templates that already exist.
    #[arg(long)]
    force: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Sync(args) => run_sync(args),
        Command::Check(args) => run_check(args),
        Command::Parse(args) => run_parse(args),
        Command::Render(args) => run_render(args),
        Command::InitTemplates(args) => run_init_templates(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &ProjectArgs) -> Result<SyncConfig, String> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => {
            let candidate = args.root.join(DEFAULT_CONFIG_FILE);
            if !candidate.is_file() {
                debug!("no {DEFAULT_CONFIG_FILE} in root, using defaults");
                return Ok(SyncConfig::default());
            }
            candidate
        }
    };
    debug!(path = %path.display(), "loading configuration");
    SyncConfig::load(&path).map_err(|err| err.to_string())
}

fn pipeline(args: &ProjectArgs) -> Result<Pipeline, String> {
    Ok(Pipeline::new(&args.root, load_config(args)?))
}

// ---------------------------------------------------------------------------
// sync / check
// ---------------------------------------------------------------------------

fn run_sync(args: ProjectArgs) -> Result<(), String> {
    let pipeline = pipeline(&args)?;
    pipeline
        .sync(|event| println!("{event}"))
        .map_err(|err| err.to_string())?;
    Ok(())
}

fn run_check(args: ProjectArgs) -> Result<(), String> {
    let pipeline = pipeline(&args)?;
    let stale = pipeline.check().map_err(|err| err.to_string())?;
    if stale.is_empty() {
        println!("Completions and Documentation are up to date.");
        return Ok(());
    }

    for path in &stale {
        println!("out of date: {}", path.display());
    }
    Err(format!(
        "{} file(s) out of date; run `helpsync sync`",
        stale.len()
    ))
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let config = load_config(&args.project)?;
    let variable = args.variable.as_deref().unwrap_or(&config.source.variable);
    let source = fs::read_to_string(&args.input)
        .map_err(|err| format!("Failed to read '{}': {err}", args.input.display()))?;
    let help_text = extract_help_text(&source, variable)
        .ok_or_else(|| format!("could not find {variable} in {}", args.input.display()))?;

    let policy = &config.parse;
    let outcome = CommandTableParser::new(policy).parse(help_text);
    for problem in validate_table(&outcome.table, policy) {
        warn!("{problem}");
    }

    if args.with_report {
        print_with_report(&outcome.table, &outcome.diagnostics, args.format)
    } else {
        let output = format_table(&outcome.table, args.format).map_err(|err| err.to_string())?;
        print!("{output}");
        if !output.ends_with('\n') {
            println!();
        }
        Ok(())
    }
}

fn print_with_report(
    table: &CommandTable,
    diagnostics: &ParseDiagnostics,
    format: OutputFormat,
) -> Result<(), String> {
    #[derive(serde::Serialize)]
    struct ParseOutput<'a> {
        table: &'a CommandTable,
        report: &'a ParseDiagnostics,
        coverage: f64,
    }

    let output = ParseOutput {
        table,
        report: diagnostics,
        coverage: diagnostics.coverage(),
    };

    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let text = if matches!(format, OutputFormat::Json) {
                serde_json::to_string_pretty(&output)
                    .map_err(|e| format!("Failed to serialize output: {e}"))?
            } else {
                serde_yaml::to_string(&output)
                    .map_err(|e| format!("Failed to serialize output: {e}"))?
            };
            println!("{}", text.trim_end());
        }
        OutputFormat::Text => {
            print!(
                "{}",
                format_table(table, format).map_err(|err| err.to_string())?
            );
            println!(
                "coverage: {:.0}% ({}/{} lines), final state: {:?}",
                output.coverage * 100.0,
                diagnostics.recognized_lines,
                diagnostics.relevant_lines,
                diagnostics.final_state
            );
            for line in &diagnostics.unresolved_lines {
                println!("unresolved: {}", line.trim());
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// render / init-templates
// ---------------------------------------------------------------------------

fn run_render(args: RenderArgs) -> Result<(), String> {
    let pipeline = pipeline(&args.project)?;
    let analysis = pipeline.analyze().map_err(|err| err.to_string())?;
    let rendered = pipeline
        .render_completion(&analysis, args.dialect)
        .map_err(|err| err.to_string())?;
    print!("{}", rendered.content);
    Ok(())
}

fn run_init_templates(args: InitTemplatesArgs) -> Result<(), String> {
    let config = load_config(&args.project)?;
    let installs = install_default_templates(&args.project.root, &config, args.force)
        .map_err(|err| err.to_string())?;
    for install in installs {
        let status = if install.written { "wrote" } else { "kept" };
        println!("{status} {}", display_relative(&install.path, &args.project.root));
    }
    Ok(())
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
