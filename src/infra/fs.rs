//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides the small set of path utilities the comparison needs:
//! shell-style expansion of user supplied paths and listing the report files
//! of a directory.
//!
//! 此模块提供比较所需的少量路径工具：对用户提供的路径进行 shell 风格展开，
//! 以及列出目录中的报告文件。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Expands `~` and `$VAR` / `${VAR}` in a user supplied path.
///
/// An expansion failure (for example an undefined variable) leaves the input
/// untouched, so the later existence check reports the path as given.
///
/// # Arguments
/// * `input` - The path as typed on the command line
///
/// # Returns
/// The expanded path
pub fn expand_path(input: &str) -> PathBuf {
    match shellexpand::full(input) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(err) => {
            tracing::debug!("path expansion failed for {}: {}", input, err);
            PathBuf::from(input)
        }
    }
}

/// Lists the regular files directly inside `dir` whose name ends in `suffix`.
///
/// Not recursive. Results are sorted by file name so the column order of the
/// output does not depend on the directory iteration order of the platform.
///
/// # Arguments
/// * `dir` - Directory to list
/// * `suffix` - Case-sensitive file name suffix, e.g. `.xml`
///
/// # Returns
/// The matching file paths, or the I/O error from reading the directory
pub fn list_files_with_suffix(dir: &Path, suffix: &str) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .is_some_and(|name| name.to_string_lossy().ends_with(suffix))
        })
        .collect();
    files.sort();
    Ok(files)
}
