//! sqlbridge: SQL dialect translator CLI
//!
//! # Usage
//!
//! ```bash
//! # Translate a statement
//! sqlbridge "CREATE TABLE \`t\` (\`id\` INT AUTO_INCREMENT)" --read mysql --write nuodb
//!
//! # Translate a dump, keep going past bad statements
//! sqlbridge --file dump.sql --read mysql --write postgres
//!
//! # Inspect the front end
//! sqlbridge tokens "SELECT 1" --read oracle
//! sqlbridge ast "SELECT a FROM t" --read generic
//! ```

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use sqlbridge::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlbridge")]
#[command(version)]
#[command(about = "Translate SQL between dialects", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = "EXAMPLES:
    sqlbridge 'SELECT a FROM t LIMIT 5' --read mysql --write oracle
    sqlbridge --file schema.sql --read mysql --write nuodb --unsupported raise
    sqlbridge dialects")]
struct Cli {
    #[command(flatten)]
    input: InputArgs,

    /// Target dialect
    #[arg(short, long, env = "SQLBRIDGE_WRITE")]
    write: Option<String>,

    /// Stop at the first statement that fails
    #[arg(long)]
    strict: bool,

    /// What to do with constructs the target cannot express
    #[arg(short, long)]
    unsupported: Option<UnsupportedLevel>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Verbose logging (overridden by SQLBRIDGE_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ./sqlbridge.toml, then the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone)]
struct InputArgs {
    /// SQL text; read from --file or stdin when absent
    sql: Option<String>,

    /// Read SQL from a file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Source dialect
    #[arg(short, long, env = "SQLBRIDGE_READ")]
    read: Option<String>,
}

#[derive(Clone, Copy, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the tokens of the input
    Tokens {
        #[command(flatten)]
        input: InputArgs,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Show the parsed tree of each statement as JSON
    Ast {
        #[command(flatten)]
        input: InputArgs,
    },
    /// List the registered dialects
    Dialects,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "sqlbridge=debug" } else { "sqlbridge=error" };
    let filter = EnvFilter::try_from_env("SQLBRIDGE_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Returns whether every statement went through.
fn run(cli: &Cli) -> Result<bool> {
    let config = match &cli.config {
        Some(path) => BridgeConfig::from_file(path)?,
        None => BridgeConfig::load()?,
    };
    let registry = config.registry().context("building dialect registry")?;

    match &cli.command {
        Some(Commands::Tokens { input, format }) => show_tokens(&registry, &config, input, *format),
        Some(Commands::Ast { input }) => show_ast(&registry, &config, input),
        Some(Commands::Dialects) => {
            list_dialects(&registry);
            Ok(true)
        }
        None => translate(&registry, &config, cli),
    }
}

fn translate(registry: &DialectRegistry, config: &BridgeConfig, cli: &Cli) -> Result<bool> {
    let sql = read_input(&cli.input)?;
    let read = read_dialect(&cli.input, config);
    let Some(write) = cli.write.clone().or_else(|| config.write.clone()) else {
        bail!("no target dialect: pass --write or set `write` in {}", sqlbridge::config::CONFIG_FILE);
    };

    let options = TranslateOptions {
        unsupported: cli.unsupported.or(config.unsupported).unwrap_or_default(),
        strict: cli.strict || config.strict,
    };
    if cli.verbose {
        eprintln!("{} {} → {}", "Translating:".dimmed(), read.yellow(), write.yellow());
    }

    let report = Translator::new(registry)
        .with_options(options)
        .translate_batch(&sql, &read, &write)?;

    match cli.format {
        OutputFormat::Text => print_report(&report),
        OutputFormat::Json => {
            let value = report_json(&report);
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(report.is_success())
}

fn print_report(report: &BatchReport) {
    for outcome in &report.statements {
        for diagnostic in &outcome.diagnostics {
            eprintln!("{} {}", "warning:".yellow().bold(), diagnostic);
        }
        match &outcome.result {
            Ok(statements) => {
                for statement in statements {
                    println!("{};", statement);
                }
            }
            Err(err) => {
                eprintln!(
                    "{} statement {}: {}",
                    "error:".red().bold(),
                    outcome.index + 1,
                    err
                );
            }
        }
    }
}

fn report_json(report: &BatchReport) -> serde_json::Value {
    let statements: Vec<serde_json::Value> = report
        .statements
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(sql) => serde_json::json!({
                "index": outcome.index,
                "sql": sql,
                "diagnostics": outcome.diagnostics,
            }),
            Err(err) => serde_json::json!({
                "index": outcome.index,
                "error": { "category": err.category(), "message": err.to_string() },
                "diagnostics": outcome.diagnostics,
            }),
        })
        .collect();
    serde_json::json!({ "success": report.is_success(), "statements": statements })
}

fn show_tokens(
    registry: &DialectRegistry,
    config: &BridgeConfig,
    input: &InputArgs,
    format: OutputFormat,
) -> Result<bool> {
    let sql = read_input(input)?;
    let dialect = registry.get(&read_dialect(input, config))?;
    let tokens = dialect.tokenize(&sql)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tokens)?),
        OutputFormat::Text => {
            for token in &tokens {
                println!(
                    "{:>4}:{:<4} {:<18} {}",
                    token.line,
                    token.col,
                    token.kind.to_string().cyan(),
                    token.text
                );
            }
        }
    }
    Ok(true)
}

fn show_ast(registry: &DialectRegistry, config: &BridgeConfig, input: &InputArgs) -> Result<bool> {
    let sql = read_input(input)?;
    let dialect = registry.get(&read_dialect(input, config))?;
    let trees: Vec<serde_json::Value> = dialect.parse(&sql)?.iter().map(Ast::to_json).collect();
    println!("{}", serde_json::to_string_pretty(&trees)?);
    Ok(true)
}

fn list_dialects(registry: &DialectRegistry) {
    println!("{}", "Dialects:".green().bold());
    for name in registry.names() {
        let mut aliases: Vec<&str> = registry
            .aliases()
            .filter(|(_, target)| *target == name)
            .map(|(alias, _)| alias)
            .collect();
        aliases.sort_unstable();
        if aliases.is_empty() {
            println!("  {}", name.cyan());
        } else {
            println!("  {} {}", name.cyan(), format!("({})", aliases.join(", ")).dimmed());
        }
    }
}

fn read_dialect(input: &InputArgs, config: &BridgeConfig) -> String {
    input
        .read
        .clone()
        .or_else(|| config.read.clone())
        .unwrap_or_else(|| "generic".to_string())
}

fn read_input(input: &InputArgs) -> Result<String> {
    if let Some(sql) = &input.sql {
        return Ok(sql.clone());
    }
    if let Some(path) = &input.file {
        return std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()));
    }
    let mut sql = String::new();
    std::io::stdin()
        .read_to_string(&mut sql)
        .context("reading SQL from stdin")?;
    if sql.trim().is_empty() {
        bail!("no SQL given: pass it as an argument, with --file, or on stdin");
    }
    Ok(sql)
}
