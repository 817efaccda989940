//! Workspace file discovery from include globs and exclude substrings.

use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extensions picked up when a glob names a plain directory.
pub const SOURCE_EXTENSIONS: &[&str] = &["sv", "svh", "v", "vh", "svi", "svp"];

/// Collect every file matching one of `globs`, skipping any path that
/// contains one of `exclude_dirs` as a substring.
///
/// Each glob is split into a literal base directory and a pattern; only the
/// base is crawled. `...` is accepted as a synonym for `**`. A glob with no
/// wildcard that names a directory matches all source files below it. The
/// result is sorted and de-duplicated. Invalid globs are logged and skipped.
pub fn collect_file_paths<G, E>(globs: &[G], exclude_dirs: &[E]) -> Vec<PathBuf>
where
    G: AsRef<str>,
    E: AsRef<str>,
{
    let excludes: Vec<&str> = exclude_dirs
        .iter()
        .map(AsRef::as_ref)
        .filter(|e| !e.is_empty())
        .collect();
    let mut paths = Vec::new();

    for glob in globs {
        let pattern = normalize_pattern(glob.as_ref());
        let (base, matcher) = match split_glob(&pattern) {
            GlobTarget::File(path) => {
                if !is_excluded(&path, &excludes) {
                    paths.push(path);
                }
                continue;
            }
            GlobTarget::Pattern { base, pattern } => match compile(&pattern) {
                Some(matcher) => (base, matcher),
                None => continue,
            },
        };

        debug!(base = %base.display(), pattern = %pattern, "crawling");
        let walker = WalkDir::new(&base)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| !is_excluded(entry.path(), &excludes));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_file() && matcher.is_match(entry.path()) {
                paths.push(entry.into_path());
            }
        }
    }

    paths.sort();
    paths.dedup();
    paths
}

/// Whether `path` contains any of the exclude substrings.
pub fn is_excluded(path: &Path, excludes: &[&str]) -> bool {
    let text = path.to_string_lossy();
    excludes.iter().any(|e| text.contains(e))
}

enum GlobTarget {
    File(PathBuf),
    Pattern { base: PathBuf, pattern: String },
}

fn normalize_pattern(glob: &str) -> String {
    let glob = glob.replace("...", "**");
    glob.strip_prefix("./").map(str::to_string).unwrap_or(glob)
}

fn has_wildcard(component: &str) -> bool {
    component.contains(['*', '?', '[', '{'])
}

fn split_glob(pattern: &str) -> GlobTarget {
    let path = Path::new(pattern);
    let mut base = PathBuf::new();
    for component in path.components() {
        let wild = match component {
            Component::Normal(part) => has_wildcard(&part.to_string_lossy()),
            _ => false,
        };
        if wild {
            break;
        }
        base.push(component);
    }

    if !has_wildcard(pattern) {
        if base.is_file() {
            return GlobTarget::File(base);
        }
        let extensions = SOURCE_EXTENSIONS.join(",");
        let pattern = format!("{}/**/*.{{{extensions}}}", pattern.trim_end_matches('/'));
        return GlobTarget::Pattern { base, pattern };
    }

    if base.as_os_str().is_empty() {
        base.push(".");
        return GlobTarget::Pattern {
            base,
            pattern: format!("./{pattern}"),
        };
    }
    GlobTarget::Pattern {
        base,
        pattern: pattern.to_string(),
    }
}

fn compile(pattern: &str) -> Option<GlobMatcher> {
    match GlobBuilder::new(pattern).literal_separator(true).build() {
        Ok(glob) => Some(glob.compile_matcher()),
        Err(e) => {
            warn!(pattern, error = %e, "invalid index glob");
            None
        }
    }
}
