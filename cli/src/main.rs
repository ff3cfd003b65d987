use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use listrank_core::{DEFAULT_TOP_RANK_THRESHOLD, DialectId, Target};
use listrank_engine::lists::parse_prompt_list;
use listrank_engine::output::{
    OutputFormat, format_analysis, format_entities, format_prompts, format_summary,
};
use listrank_engine::workflow::{ModePreference, analyze_with_mode};
use listrank_engine::{DialectSelector, RankConfig, RunResults, parse};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Output formats accepted on the command line.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    Table,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Yaml => Self::Yaml,
            CliOutputFormat::Table => Self::Table,
        }
    }
}

/// List dialects accepted on the command line.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliDialect {
    PermissiveNumbered,
    NumberedParen,
    NumberedOrBulleted,
}

impl From<CliDialect> for DialectId {
    fn from(dialect: CliDialect) -> Self {
        match dialect {
            CliDialect::PermissiveNumbered => Self::PermissiveNumbered,
            CliDialect::NumberedParen => Self::NumberedParen,
            CliDialect::NumberedOrBulleted => Self::NumberedOrBulleted,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "listrank")]
#[command(about = "Find where a site ranks in list-style model responses")]
struct Cli {
    /// Path to a listrank YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log parser and resolver decisions to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a response into ranked entities.
    Parse(ParseArgs),
    /// Resolve where a target ranks in a response.
    Rank(RankArgs),
    /// Extract prompts from a numbered or dashed list.
    Prompts(PromptsArgs),
    /// Summarize a saved results file per backend.
    Summarize(SummarizeArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// List dialect of the response.
    #[arg(long, default_value = "numbered-or-bulleted")]
    dialect: CliDialect,
    /// File containing the response (default: stdin).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct RankArgs {
    /// Target domain (default: from --config).
    #[arg(long)]
    domain: Option<String>,
    /// Brand name (default: derived from the domain).
    #[arg(long)]
    brand: Option<String>,
    /// List dialect of the response.
    #[arg(long, conflicts_with = "backend")]
    dialect: Option<CliDialect>,
    /// Backend that produced the response; selects its configured dialect.
    #[arg(long)]
    backend: Option<String>,
    /// Resolution mode.
    #[arg(long, default_value = "auto")]
    mode: ModePreference,
    /// File containing the response (default: stdin).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct PromptsArgs {
    /// File containing the list (default: stdin).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct SummarizeArgs {
    /// Results JSON file written by a rank run.
    #[arg(long)]
    input: PathBuf,
    /// Positions at or above this rank count as top placements
    /// (default: from --config, else 3).
    #[arg(long)]
    top_threshold: Option<usize>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Rank(args) => run_rank(args, config.as_ref()),
        Command::Prompts(args) => run_prompts(args),
        Command::Summarize(args) => run_summarize(args, config.as_ref()),
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Option<RankConfig>, String> {
    let Some(path) = path else {
        return Ok(None);
    };
    let config = RankConfig::load(path)
        .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?;
    debug!(path = %path.display(), domain = %config.target.domain, "loaded configuration");
    Ok(Some(config))
}

fn read_input(input: Option<&Path>) -> Result<String, String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            Ok(text)
        }
    }
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let text = read_input(args.input.as_deref())?;
    let parsed = parse(&text, args.dialect.into());
    print!("{}", with_newline(format_entities(&parsed, args.format.into())?));
    Ok(())
}

fn run_rank(args: RankArgs, config: Option<&RankConfig>) -> Result<(), String> {
    let target = match (args.domain.as_deref(), config) {
        (Some(domain), _) => Target::with_optional_brand(domain, args.brand.as_deref()),
        (None, Some(config)) => match args.brand.as_deref() {
            Some(brand) => Target::with_optional_brand(&config.target.domain, Some(brand)),
            None => config.target(),
        },
        (None, None) => return Err("--domain is required without --config".to_string()),
    };
    if target.domain.is_empty() && target.brand.is_empty() {
        return Err("target domain must not be empty".to_string());
    }

    let dialect = match (args.dialect, args.backend.as_deref()) {
        (Some(dialect), _) => dialect.into(),
        (None, Some(backend)) => config
            .map(|config| config.dialects.clone())
            .unwrap_or_default()
            .select(backend),
        (None, None) => DialectSelector::default().default,
    };
    debug!(%dialect, domain = %target.domain, brand = %target.brand, "ranking response");

    let text = read_input(args.input.as_deref())?;
    let analysis = analyze_with_mode(&text, dialect, &target, args.mode);
    print!("{}", with_newline(format_analysis(&analysis, args.format.into())?));
    Ok(())
}

fn run_prompts(args: PromptsArgs) -> Result<(), String> {
    let text = read_input(args.input.as_deref())?;
    let prompts = parse_prompt_list(&text);
    print!("{}", with_newline(format_prompts(&prompts, args.format.into())?));
    Ok(())
}

fn run_summarize(args: SummarizeArgs, config: Option<&RankConfig>) -> Result<(), String> {
    let results = RunResults::load(&args.input)
        .map_err(|err| format!("Failed to load results '{}': {err}", args.input.display()))?;
    let threshold = args
        .top_threshold
        .or(config.map(|config| config.top_rank_threshold))
        .unwrap_or(DEFAULT_TOP_RANK_THRESHOLD);
    if threshold == 0 {
        return Err("--top-threshold must be at least 1".to_string());
    }

    let summary = results.summary(threshold);
    print!("{}", with_newline(format_summary(&summary, args.format.into())?));
    Ok(())
}

fn with_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
