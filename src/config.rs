//! Discovery of the primary tree and overlays from Portage configuration
//!
//! Reads `PORTDIR` and `PORTDIR_OVERLAY` from the `make.globals` and
//! `make.conf` files, later files overriding earlier ones, and finally from
//! the environment.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use winnow::ascii::{space0, space1};
use winnow::combinator::{alt, delimited, opt, preceded, repeat, terminated};
use winnow::error::{ContextError, ErrMode, StrContext};
use winnow::prelude::*;
use winnow::token::{rest, take_till, take_while};

use crate::error::{Error, Result};

/// Primary tree used when nothing configures one
pub const DEFAULT_PORTDIR: &str = "/usr/portage";

/// Configuration files consulted by [`PortageConfig::load`], in order
pub const CONFIG_FILES: [&str; 4] = [
    "/usr/share/portage/config/make.globals",
    "/etc/make.globals",
    "/etc/make.conf",
    "/etc/portage/make.conf",
];

const PORTDIR: &str = "PORTDIR";
const PORTDIR_OVERLAY: &str = "PORTDIR_OVERLAY";

/// Location of the primary package tree and its overlays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortageConfig {
    pub portdir: PathBuf,
    /// Overlay roots in `PORTDIR_OVERLAY` order.
    pub overlays: Vec<PathBuf>,
}

impl Default for PortageConfig {
    fn default() -> Self {
        PortageConfig {
            portdir: PathBuf::from(DEFAULT_PORTDIR),
            overlays: Vec::new(),
        }
    }
}

impl PortageConfig {
    /// Load from the system configuration files and process environment
    pub fn load() -> Result<Self> {
        Self::load_from(&CONFIG_FILES, |key| env::var(key).ok())
    }

    /// Load from `files` (missing ones are skipped) with `env` looked up
    /// last
    pub fn load_from<P, F>(files: &[P], env: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let mut vars = HashMap::new();
        for file in files {
            let file = file.as_ref();
            match fs::read_to_string(file) {
                Ok(data) => {
                    debug!("reading {}", file.display());
                    parse_make_conf(&data, &mut vars);
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(Error::io(file, e)),
            }
        }

        for key in [PORTDIR, PORTDIR_OVERLAY] {
            if let Some(value) = env(key) {
                vars.insert(key.to_string(), value);
            }
        }

        Ok(Self::from_vars(&vars))
    }

    /// Build from already-parsed `make.conf` variables
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let portdir = vars
            .get(PORTDIR)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PORTDIR));
        let overlays = vars
            .get(PORTDIR_OVERLAY)
            .map(|s| s.split_whitespace().map(PathBuf::from).collect())
            .unwrap_or_default();

        PortageConfig { portdir, overlays }
    }
}

/// Parse `make.conf` syntax into `vars`.
///
/// Handles `[export ]KEY=value` with double, single or no quotes, comments,
/// backslash continuations, quoted values spanning lines, and `$KEY` /
/// `${KEY}` references to keys assigned earlier. Lines that are not
/// assignments are skipped.
pub fn parse_make_conf(input: &str, vars: &mut HashMap<String, String>) {
    for line in logical_lines(input) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_assignment().parse(line) {
            Ok((key, value)) => {
                let value = match value {
                    Value::Expand(v) => expand(v, vars),
                    Value::Literal(v) => v.to_string(),
                };
                vars.insert(key.to_string(), value);
            }
            Err(e) => warn!("ignoring make.conf line {:?}: {}", line, e),
        }
    }
}

/// Join continued lines and multi-line double-quoted values
fn logical_lines(input: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for raw in input.lines() {
        if current.is_empty() && raw.trim_start().starts_with('#') {
            continue;
        }
        if let Some(head) = raw.strip_suffix('\\') {
            current.push_str(head);
            current.push(' ');
            continue;
        }
        current.push_str(raw);
        if current.matches('"').count() % 2 == 1 {
            current.push(' ');
            continue;
        }
        lines.push(std::mem::take(&mut current));
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn expand(value: &str, vars: &HashMap<String, String>) -> String {
    let pieces = match parse_pieces().parse(value) {
        Ok(pieces) => pieces,
        Err(_) => return value.to_string(),
    };
    pieces
        .into_iter()
        .map(|piece| match piece {
            Piece::Text(s) => s,
            Piece::Var(key) => vars.get(key).map(String::as_str).unwrap_or_default(),
        })
        .collect()
}

enum Value<'s> {
    /// Double-quoted or bare: variable references are expanded.
    Expand(&'s str),
    /// Single-quoted: taken as is.
    Literal(&'s str),
}

enum Piece<'s> {
    Text(&'s str),
    Var(&'s str),
}

// Winnow parsers

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn parse_key<'s>() -> impl Parser<&'s str, &'s str, ErrMode<ContextError>> {
    take_while(1.., is_key_char).context(StrContext::Label("key"))
}

fn parse_value<'s>() -> impl Parser<&'s str, Value<'s>, ErrMode<ContextError>> {
    alt((
        delimited('"', take_till(0.., '"'), '"').map(Value::Expand),
        delimited('\'', take_till(0.., '\''), '\'').map(Value::Literal),
        take_till(0.., |c: char| c.is_whitespace() || c == '#').map(Value::Expand),
    ))
    .context(StrContext::Label("value"))
}

fn parse_assignment<'s>() -> impl Parser<&'s str, (&'s str, Value<'s>), ErrMode<ContextError>> {
    (
        opt(terminated("export", space1)),
        parse_key(),
        '=',
        parse_value(),
        space0,
        opt(preceded('#', rest)),
    )
        .map(|(_, key, _, value, _, _)| (key, value))
        .context(StrContext::Label("assignment"))
}

fn parse_pieces<'s>() -> impl Parser<&'s str, Vec<Piece<'s>>, ErrMode<ContextError>> {
    repeat(
        0..,
        alt((
            delimited("${", parse_key(), '}').map(Piece::Var),
            preceded('$', parse_key()).map(Piece::Var),
            take_till(1.., '$').map(Piece::Text),
            "$".map(Piece::Text),
        )),
    )
}
