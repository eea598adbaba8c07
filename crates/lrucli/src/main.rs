//! lrucli - replay get/put command scripts against an LRU cache

mod script;

use anyhow::{Context, Result};
use clap::Parser;
use lrucache::LruCache;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::script::Command;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of items)
    #[arg(short, long, default_value_t = 2)]
    capacity: usize,

    /// Script file to replay ("-" for stdin); runs the built-in demo if omitted
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Print cache statistics after the run
    #[arg(long)]
    stats: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays a clean result stream
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    info!("Cache capacity: {}", args.capacity);

    let commands = load_commands(args.script.as_deref())?;
    debug!("Loaded {} commands", commands.len());

    let mut cache = LruCache::new(args.capacity)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for cmd in commands {
        script::execute(&mut cache, cmd, &mut out)?;
    }

    if args.stats {
        let stats = cache.stats();
        writeln!(out, "hits: {}", stats.hits())?;
        writeln!(out, "misses: {}", stats.misses())?;
        writeln!(out, "inserts: {}", stats.inserts())?;
        writeln!(out, "updates: {}", stats.updates())?;
        writeln!(out, "evictions: {}", stats.evictions())?;
        writeln!(out, "hit ratio: {:.3}", stats.hit_ratio())?;
    }
    out.flush()?;

    Ok(())
}

fn load_commands(path: Option<&Path>) -> Result<Vec<Command>> {
    match path {
        None => Ok(script::demo()),
        Some(path) if path.as_os_str() == "-" => script::parse_script(io::stdin().lock()),
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            script::parse_script(BufReader::new(file))
                .with_context(|| format!("in script {}", path.display()))
        }
    }
}
