//! Filesystem inputs: workspace crawl, command files and configuration.

mod build_file;
mod config;
mod file_loader;

pub use build_file::{BuildFile, ProjectError};
pub use config::{DEFAULT_INDEX_GLOB, DEFAULT_OPEN_INCLUDE_DEPTH, ServerConfig};
pub use file_loader::{SOURCE_EXTENSIONS, collect_file_paths, is_excluded};
