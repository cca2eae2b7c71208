//! Template file collection
//!
//! Expands the mix of files, directories and glob patterns a user can
//! pass on the command line into a sorted, deduplicated file list.

use glob::glob;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Template file extensions to process
const TEMPLATE_EXTENSIONS: &[&str] = &["erb", "rhtml"];

/// Check whether a path looks like a template file
pub fn is_template_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| TEMPLATE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Collect all template files referenced by the given inputs
pub fn collect_template_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            // Explicitly named files are taken regardless of extension.
            files.push(input.clone());
        } else if input.is_dir() {
            collect_from_directory(input, &mut files);
        } else if let Some(pattern) = input.to_str() {
            collect_from_pattern(pattern, &mut files);
        } else {
            eprintln!("warning: skipping path {}", input.display());
        }
    }

    files.sort();
    files.dedup();
    files
}

fn collect_from_directory(dir: &Path, files: &mut Vec<PathBuf>) {
    for entry in WalkDir::new(dir).follow_links(false) {
        match entry {
            Ok(entry) if entry.file_type().is_file() && is_template_file(entry.path()) => {
                files.push(entry.path().to_path_buf());
            }
            Ok(_) => {}
            Err(e) => eprintln!("warning: {e}"),
        }
    }
}

fn collect_from_pattern(pattern: &str, files: &mut Vec<PathBuf>) {
    match glob(pattern) {
        Ok(paths) => {
            for path in paths.flatten() {
                if path.is_file() {
                    files.push(path);
                }
            }
        }
        Err(e) => eprintln!("warning: invalid pattern '{pattern}': {e}"),
    }
}
