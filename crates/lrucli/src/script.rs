//! Command scripts for replaying cache traffic
//!
//! One command per line. Blank lines and `#` comments are skipped.
//!
//! ```text
//! put 1 1
//! get 1      # prints 1
//! get 7      # prints -1
//! ```

use std::io::{BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};
use lrucache::LruCache;

/// Printed for a key that is not resident
pub const NOT_FOUND: i64 = -1;

/// A single script command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Put(i64, i64),
    Get(i64),
    Peek(i64),
    Remove(i64),
    Len,
}

impl Command {
    /// Parse one line. Returns `Ok(None)` for blank and comment lines.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = match line.split_once('#') {
            Some((code, _)) => code,
            None => line,
        };
        let mut parts = line.split_whitespace();
        let command = match parts.next() {
            Some(word) => word.to_lowercase(),
            None => return Ok(None),
        };
        let args: Vec<&str> = parts.collect();

        let cmd = match command.as_str() {
            "put" => {
                let [key, value] = expect_args::<2>("put", &args)?;
                Command::Put(parse_int(key)?, parse_int(value)?)
            }
            "get" => Command::Get(parse_int(expect_args::<1>("get", &args)?[0])?),
            "peek" => Command::Peek(parse_int(expect_args::<1>("peek", &args)?[0])?),
            "remove" => Command::Remove(parse_int(expect_args::<1>("remove", &args)?[0])?),
            "len" => {
                expect_args::<0>("len", &args)?;
                Command::Len
            }
            _ => bail!("unknown command '{}'", command),
        };
        Ok(Some(cmd))
    }
}

fn expect_args<'a, const N: usize>(name: &str, args: &[&'a str]) -> Result<[&'a str; N]> {
    <[&str; N]>::try_from(args).map_err(|_| {
        anyhow!(
            "wrong number of arguments for '{}': expected {}, got {}",
            name,
            N,
            args.len()
        )
    })
}

fn parse_int(word: &str) -> Result<i64> {
    word.parse()
        .with_context(|| format!("invalid integer '{}'", word))
}

/// Parse a whole script, tagging errors with their line number
pub fn parse_script<R: BufRead>(reader: R) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.context("failed to read script")?;
        if let Some(cmd) = Command::parse(&line).with_context(|| format!("line {}", lineno + 1))? {
            commands.push(cmd);
        }
    }
    Ok(commands)
}

/// Apply `cmd` to `cache`, writing any result line to `out`
pub fn execute<W: Write>(cache: &mut LruCache<i64, i64>, cmd: Command, out: &mut W) -> Result<()> {
    match cmd {
        Command::Put(key, value) => cache.put(key, value),
        Command::Get(key) => writeln!(out, "{}", cache.get(&key).copied().unwrap_or(NOT_FOUND))?,
        Command::Peek(key) => writeln!(out, "{}", cache.peek(&key).copied().unwrap_or(NOT_FOUND))?,
        Command::Remove(key) => writeln!(out, "{}", cache.remove(&key).unwrap_or(NOT_FOUND))?,
        Command::Len => writeln!(out, "{}", cache.len())?,
    }
    Ok(())
}

/// Built-in demo: two puts, a promoting get, then two evicting puts
pub fn demo() -> Vec<Command> {
    vec![
        Command::Put(1, 1),
        Command::Put(2, 2),
        Command::Get(1),
        Command::Put(3, 3),
        Command::Get(2),
        Command::Put(4, 4),
        Command::Get(1),
        Command::Get(3),
        Command::Get(4),
    ]
}
