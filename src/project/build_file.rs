//! Command-file (`.f`) reader.
//!
//! Understands the subset of simulator command-file syntax that decides
//! which files compile together: source files, nested command files,
//! include directories and defines. Other flags are ignored.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{debug, warn};

use crate::base::normalize_path;

/// Errors reading project inputs.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("failed to read build file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Flags whose next token is a value rather than a source file.
const VALUE_FLAGS: &[&str] = &[
    "--top",
    "-top",
    "--timescale",
    "-timescale",
    "--std",
    "-y",
    "--libdir",
    "-L",
    "--library",
    "-o",
    "-G",
    "--compat",
    "--max-errors",
];

/// The parsed contents of a command file and everything it nests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildFile {
    /// The command file itself.
    pub path: PathBuf,
    /// Source files in command-line order, without duplicates.
    pub files: Vec<PathBuf>,
    pub include_dirs: Vec<PathBuf>,
    /// `NAME` or `NAME=VALUE` defines.
    pub defines: Vec<(String, Option<String>)>,
}

impl BuildFile {
    /// Read `path` and every command file it nests through `-f`/`-F`.
    ///
    /// Nested files that cannot be read are logged and skipped; only the
    /// top-level file is required to exist.
    pub fn read(path: impl AsRef<Path>) -> Result<BuildFile, ProjectError> {
        let path = normalize_path(path.as_ref());
        let text = std::fs::read_to_string(&path).map_err(|source| ProjectError::Io {
            path: path.clone(),
            source,
        })?;

        let mut build = BuildFile {
            path: path.clone(),
            ..BuildFile::default()
        };
        let mut state = ReadState::default();
        state.visited.insert(path.clone());
        build.read_text(&path, &text, &mut state);
        debug!(
            file = %path.display(),
            files = build.files.len(),
            include_dirs = build.include_dirs.len(),
            defines = build.defines.len(),
            "read build file"
        );
        Ok(build)
    }

    fn read_text(&mut self, path: &Path, text: &str, state: &mut ReadState) {
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let tokens = tokenize(text);
        let mut iter = tokens.into_iter();

        while let Some(token) = iter.next() {
            match token.as_str() {
                "-f" | "-F" => match iter.next() {
                    Some(nested) => self.read_nested(&resolve(&base, &nested), state),
                    None => warn!(file = %path.display(), "{token} without a file"),
                },
                "-I" | "--include-directory" => match iter.next() {
                    Some(dir) => self.push_include_dir(resolve(&base, &dir)),
                    None => warn!(file = %path.display(), "{token} without a directory"),
                },
                "-D" | "--define-macro" => match iter.next() {
                    Some(define) => self.push_define(&define),
                    None => warn!(file = %path.display(), "{token} without a macro"),
                },
                "-v" => {
                    if let Some(file) = iter.next() {
                        self.push_file(resolve(&base, &file), state);
                    }
                }
                flag if VALUE_FLAGS.contains(&flag) => {
                    iter.next();
                }
                _ => {
                    if let Some(dirs) = token.strip_prefix("+incdir+") {
                        for dir in dirs.split('+').filter(|d| !d.is_empty()) {
                            self.push_include_dir(resolve(&base, dir));
                        }
                    } else if let Some(defines) = token.strip_prefix("+define+") {
                        for define in defines.split('+').filter(|d| !d.is_empty()) {
                            self.push_define(define);
                        }
                    } else if let Some(dir) = token.strip_prefix("-I") {
                        self.push_include_dir(resolve(&base, dir));
                    } else if let Some(define) = token.strip_prefix("-D") {
                        self.push_define(define);
                    } else if token.starts_with('-') || token.starts_with('+') {
                        debug!(flag = %token, "ignoring flag");
                    } else {
                        self.push_file(resolve(&base, &token), state);
                    }
                }
            }
        }
    }

    fn read_nested(&mut self, path: &Path, state: &mut ReadState) {
        let path = normalize_path(path);
        if !state.visited.insert(path.clone()) {
            warn!(file = %path.display(), "command file included recursively, skipping");
            return;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => self.read_text(&path, &text, state),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "failed to read nested command file")
            }
        }
    }

    fn push_file(&mut self, path: PathBuf, state: &mut ReadState) {
        let path = normalize_path(&path);
        if state.files.insert(path.clone()) {
            self.files.push(path);
        }
    }

    fn push_include_dir(&mut self, dir: PathBuf) {
        let dir = normalize_path(&dir);
        if !self.include_dirs.contains(&dir) {
            self.include_dirs.push(dir);
        }
    }

    fn push_define(&mut self, define: &str) {
        let entry = match define.split_once('=') {
            Some((name, value)) => (name.to_string(), Some(value.to_string())),
            None => (define.to_string(), None),
        };
        self.defines.push(entry);
    }
}

#[derive(Default)]
struct ReadState {
    visited: FxHashSet<PathBuf>,
    files: FxHashSet<PathBuf>,
}

/// Split command-file text into tokens, dropping comments and expanding
/// environment variables.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for line in text.lines() {
        let line = match line.find("//") {
            Some(idx) => &line[..idx],
            None => line,
        };
        for word in line.split_whitespace() {
            if word.starts_with('#') {
                break;
            }
            tokens.push(expand_env(word));
        }
    }
    tokens
}

/// Expand `$VAR`, `${VAR}` and `$(VAR)`. Unset variables expand to nothing.
fn expand_env(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut chars = word.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if ch != '$' {
            out.push(ch);
            continue;
        }
        let rest = &word[idx + 1..];
        let (name, consumed) = match rest.chars().next() {
            Some(open @ ('{' | '(')) => {
                let close = if open == '{' { '}' } else { ')' };
                match rest.find(close) {
                    Some(end) => (&rest[1..end], end + 1),
                    None => {
                        out.push(ch);
                        continue;
                    }
                }
            }
            _ => {
                let end = rest
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(rest.len());
                (&rest[..end], end)
            }
        };
        if name.is_empty() {
            out.push(ch);
            continue;
        }
        match std::env::var(name) {
            Ok(value) => out.push_str(&value),
            Err(_) => warn!(variable = name, "undefined environment variable in command file"),
        }
        let next = idx + 1 + consumed;
        while chars.next_if(|(i, _)| *i < next).is_some() {}
    }
    out
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
