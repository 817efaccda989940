//! In-memory server configuration.

use std::path::PathBuf;

/// Glob used when no index globs are configured.
pub const DEFAULT_INDEX_GLOB: &str = "**/*.sv*";

/// Include depth applied to open documents.
pub const DEFAULT_OPEN_INCLUDE_DEPTH: u32 = 8;

/// Settings that drive indexing and session construction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct ServerConfig {
    /// Globs of files to index. `...` is accepted as `**`.
    pub index_globs: Vec<String>,
    /// Paths containing any of these substrings are never indexed.
    pub exclude_dirs: Vec<String>,
    /// Worker count for bulk indexing; `0` lets rayon decide.
    pub indexing_threads: usize,
    /// Extra directories searched for `` `include `` targets.
    pub include_dirs: Vec<PathBuf>,
    pub open_include_depth: u32,
    /// Command file to load at startup instead of Explore mode.
    pub build_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            index_globs: Vec::new(),
            exclude_dirs: Vec::new(),
            indexing_threads: 0,
            include_dirs: Vec::new(),
            open_include_depth: DEFAULT_OPEN_INCLUDE_DEPTH,
            build_file: None,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index_globs<I, S>(mut self, globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index_globs = globs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_exclude_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_indexing_threads(mut self, threads: usize) -> Self {
        self.indexing_threads = threads;
        self
    }

    pub fn with_include_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.include_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_open_include_depth(mut self, depth: u32) -> Self {
        self.open_include_depth = depth;
        self
    }

    pub fn with_build_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.build_file = Some(path.into());
        self
    }

    /// Effective index globs: the configured ones sorted and de-duplicated,
    /// or [`DEFAULT_INDEX_GLOB`] when none are set.
    pub fn index_globs(&self) -> Vec<String> {
        if self.index_globs.is_empty() {
            return vec![DEFAULT_INDEX_GLOB.to_string()];
        }
        let mut globs = self.index_globs.clone();
        globs.sort();
        globs.dedup();
        globs
    }
}
