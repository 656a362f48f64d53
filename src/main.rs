use anyhow::{Context, Result};
use backsweep::check::CheckerSet;
use backsweep::cli::{Cli, OutputFormat};
use backsweep::config::Config;
use backsweep::crawl::{IgnoreList, Scanner};
use backsweep::progress::{NoopTracker, StatusTracker};
use backsweep::{report, utils};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use std::io;
use std::process;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e:#}", "Error:".red().bold());
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    init_tracing(cli.debug);

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => match Config::default_path() {
            Some(path) => Config::load(&path)?,
            None => Config::default(),
        },
    };

    if config.scan.parallel_threads > 0 {
        utils::thread_pool::init_thread_pool(config.scan.parallel_threads)?;
    }

    let mut patterns = config.ignore_paths;
    patterns.extend(cli.ignore.iter().cloned());
    let ignore = IgnoreList::compile(&patterns)?;

    // Checkers and ignore patterns both key on absolute path strings
    let root = cli
        .path
        .canonicalize()
        .with_context(|| format!("Cannot resolve scan root {}", cli.path.display()))?;

    let scanner = Scanner::new(CheckerSet::default_set(), ignore);
    let result = if cli.progress {
        scanner.scan(&root, &StatusTracker::new())?
    } else {
        scanner.scan(&root, &NoopTracker)?
    };

    match cli.format {
        OutputFormat::Human => print!("{}", report::render_human(&result, cli.verbose)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report::render_json(&result))?
        ),
    }

    Ok(())
}

/// Route log output to stderr, at a level raised by the `--debug` flag.
/// `RUST_LOG` still wins when set.
fn init_tracing(debug: u8) {
    let level = match debug {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
