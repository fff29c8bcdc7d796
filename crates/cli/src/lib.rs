use anyhow::{anyhow, Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use syntax_blocks::{Language, LanguageParser, ParserConfig, ParserService, SourceDocument};

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    print_stdout(&serde_json::to_string_pretty(value)?)
}

#[derive(Parser)]
#[command(name = "syntax-blocks")]
#[command(about = "Syntax-aware code blocks and boundary repair", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Parser configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Language id (javascript, tsx, python, ...); detected from the file
    /// extension when omitted
    #[arg(long, global = true)]
    language: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List every block in a file as JSON
    Blocks(FileArgs),

    /// List functions and classes in a file as JSON
    Symbols(FileArgs),

    /// Report the block around a byte offset as JSON
    At(AtArgs),

    /// Drop malformed text from the end (or start) of a file
    Trim(TrimArgs),

    /// List module import paths as JSON
    Imports(FileArgs),
}

#[derive(Args)]
struct FileArgs {
    /// Source file
    file: PathBuf,
}

#[derive(Args)]
struct AtArgs {
    /// Source file
    file: PathBuf,

    /// Byte offset into the file
    #[arg(long)]
    offset: usize,
}

#[derive(Args)]
struct TrimArgs {
    /// Source file
    file: PathBuf,

    /// Trim the start of the file instead of the end
    #[arg(long)]
    prefix: bool,

    /// Top-level blocks never trimmed into (default: from config)
    #[arg(long)]
    min_block_count: Option<usize>,
}

impl Commands {
    fn file(&self) -> &Path {
        match self {
            Commands::Blocks(args) | Commands::Symbols(args) | Commands::Imports(args) => &args.file,
            Commands::At(args) => &args.file,
            Commands::Trim(args) => &args.file,
        }
    }
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = match &cli.config {
        Some(path) => ParserConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ParserConfig::default(),
    };
    let service = ParserService::with_builtin_grammars(config)?;

    let outcome = run(&service, &cli).await;
    service.dispose();
    outcome
}

async fn run(service: &ParserService, cli: &Cli) -> Result<()> {
    let path = cli.command.file();
    let language = resolve_language(cli.language.as_deref(), path)?;
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    log::debug!("{} ({language}, {} bytes)", path.display(), text.len());

    let parser = service.parser(language);
    let document = SourceDocument::new(path.display().to_string(), 1, text);

    match &cli.command {
        Commands::Blocks(_) => print_json(&parser.list_all_blocks(&document).await?),
        Commands::Symbols(_) => {
            print_json(&parser.list_all_functions_and_classes(&document).await?)
        }
        Commands::At(args) => {
            let block = parser.find_block_at_offset(&document, args.offset).await?;
            print_json(&block)
        }
        Commands::Trim(args) => run_trim(&parser, &document, args).await,
        Commands::Imports(_) => print_json(&parser.import_paths(&document.text).await?),
    }
}

async fn run_trim(parser: &LanguageParser, document: &SourceDocument, args: &TrimArgs) -> Result<()> {
    let trimmed = if args.prefix {
        parser
            .trim_to_valid_prefix(&document.text, args.min_block_count)
            .await?
    } else {
        parser
            .trim_to_valid_suffix(&document.text, args.min_block_count)
            .await?
    };

    let dropped = document.text.len().saturating_sub(trimmed.len());
    if dropped > 0 {
        log::info!("Trimmed {dropped} bytes from {}", document.id);
    }
    print_stdout(&trimmed)
}

fn resolve_language(id: Option<&str>, path: &Path) -> Result<Language> {
    match id {
        Some(id) => Language::from_id(id).ok_or_else(|| anyhow!("Unsupported language: {id}")),
        None => Language::from_path(path).with_context(|| {
            format!(
                "Cannot detect language of {}; pass --language",
                path.display()
            )
        }),
    }
}
