use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;

/// Directories never descended into when looking for posts.
const SKIPPED_DIRS: &[&str] = &[".git", "node_modules", "target"];

/// Whether a walk entry is a skipped directory.
fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    return entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_str().is_some_and(|name| return SKIPPED_DIRS.contains(&name));
}

/// Find every markdown post under `root` that the config's include/exclude
/// filters allow. Paths are returned relative to `root`, sorted, with `/`
/// separators so prefix matching behaves the same on every platform.
pub fn scan(root: &Path, config: &Config) -> Vec<PathBuf> {
    let mut posts: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| return !is_skipped_dir(e))
        .filter_map(Result::ok)
        .filter(|e| return e.file_type().is_file())
        .filter(|e| return e.path().extension().is_some_and(|ext| return ext == "md"))
        .filter_map(|e| {
            let relative = e.path().strip_prefix(root).unwrap_or(e.path()).to_path_buf();
            let key = relative.to_string_lossy().replace('\\', "/");
            if !config.should_export(&key) {
                tracing::debug!(path = %key, "skipped by include/exclude");
                return None;
            }
            return Some(relative);
        })
        .collect();

    posts.sort();
    return posts;
}
