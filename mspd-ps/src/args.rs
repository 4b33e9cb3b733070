//! Command-line arguments for mspd-ps
//!
//! Parsing is lenient: options the player does not know are dropped before
//! clap sees them, so callers passing extra flags still get playback.

use crate::tag::TagSink;
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Command-line arguments for mspd-ps
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "mspd-ps")]
#[command(about = "Play an internet radio stream and record the current track title")]
#[command(version)]
pub struct Args {
    /// Station name (informational)
    #[arg(short = 's', value_name = "STATION", default_value = "")]
    pub station_name: String,

    /// The current tag in the stream will be written here
    #[arg(short = 't', value_name = "TAG_FILE")]
    pub tag_file: Option<PathBuf>,

    /// Accepted for compatibility; has no effect
    #[arg(short = 'p')]
    pub playlist: bool,

    /// Configuration file
    #[arg(long, value_name = "FILE", env = "MSPD_CONFIG")]
    pub config: Option<PathBuf>,

    /// URI of the stream or playlist
    pub uri: String,
}

/// Arguments after lenient parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArgs {
    pub args: Args,

    /// Tokens that were not recognised and got dropped
    pub ignored: Vec<String>,
}

impl Args {
    /// Tag sink for `-t`; without it tag writing is off
    pub fn tag_sink(&self) -> TagSink {
        TagSink::new(self.tag_file.clone())
    }

    /// Parse the process arguments, exiting on `--help`, `--version` or a
    /// missing URI
    pub fn parse_lenient() -> ParsedArgs {
        Self::try_parse_lenient_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parse `argv` (program name first), dropping unknown options and
    /// surplus positionals
    pub fn try_parse_lenient_from<I, T>(argv: I) -> Result<ParsedArgs, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv: Vec<String> = argv
            .into_iter()
            .map(|arg| arg.into().to_string_lossy().into_owned())
            .collect();

        let (known, ignored) = split_known(&Self::command(), argv);
        let args = Self::try_parse_from(known)?;
        Ok(ParsedArgs { args, ignored })
    }
}

/// Split `argv` into tokens `cmd` understands and tokens it does not
fn split_known(cmd: &clap::Command, argv: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut cmd = cmd.clone();
    cmd.build();

    let positional_slots = cmd.get_positionals().count();
    let mut positionals = 0;
    let mut after_separator = false;

    let mut known = Vec::with_capacity(argv.len());
    let mut ignored = Vec::new();

    let mut tokens = argv.into_iter();
    if let Some(program) = tokens.next() {
        known.push(program);
    }

    while let Some(token) = tokens.next() {
        let is_option = !after_separator && token.len() > 1 && token.starts_with('-');

        if !is_option {
            if positionals < positional_slots {
                positionals += 1;
                known.push(token);
            } else {
                ignored.push(token);
            }
            continue;
        }

        if token == "--" {
            after_separator = true;
            known.push(token);
            continue;
        }

        let recognised = match token.strip_prefix("--") {
            Some(long) => {
                let (name, inline_value) = match long.split_once('=') {
                    Some((name, _)) => (name, true),
                    None => (long, false),
                };
                cmd.get_arguments()
                    .find(|a| a.get_long() == Some(name))
                    .map(|arg| arg.get_action().takes_values() && !inline_value)
            }
            None => short_cluster_needs_value(&cmd, &token[1..]),
        };

        match recognised {
            Some(needs_value) => {
                known.push(token);
                if needs_value {
                    if let Some(value) = tokens.next() {
                        known.push(value);
                    }
                }
            }
            None => ignored.push(token),
        }
    }

    (known, ignored)
}

/// Check a cluster of short flags such as `pt` (from `-pt`)
///
/// Returns `None` when a flag is unknown, otherwise whether the next token is
/// the value of the cluster's last flag. A value-taking flag followed by more
/// characters has its value attached (`-t/tmp/tag`).
fn short_cluster_needs_value(cmd: &clap::Command, cluster: &str) -> Option<bool> {
    let mut chars = cluster.chars();
    while let Some(short) = chars.next() {
        let arg = cmd.get_arguments().find(|a| a.get_short() == Some(short))?;
        if arg.get_action().takes_values() {
            return Some(chars.as_str().is_empty());
        }
    }
    Some(false)
}
