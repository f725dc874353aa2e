//! File collector: selects a bounded sample of source files from the
//! working directory for the quality review prompt.
//!
//! Selection is glob-based over relative paths, deduplicated and ordered
//! deterministically. Each file is read as text, stripped of non-printable
//! control characters, capped at a fixed character budget, and concatenated
//! under a header naming its relative path. Collection is best-effort
//! throughout: an unreadable file is skipped, never fatal.

use crate::types::ProjectType;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Marker appended to any file cut off at the character cap.
pub const TRUNCATION_MARKER: &str = "\n... [truncated]";

/// Directories never worth sampling.
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", "dist", "build", "coverage"];

/// Default file-selection set when the submission specifies none. Favors
/// breadth over depth: manifest and README first, then common entrypoint and
/// source locations.
pub fn default_patterns(project_type: ProjectType) -> Vec<String> {
    let patterns: &[&str] = match project_type {
        ProjectType::C => &[
            "README*",
            "Makefile",
            "*.c",
            "*.h",
            "src/**/*.c",
            "src/**/*.h",
            "include/**/*.h",
        ],
        _ => &[
            "README*",
            "package.json",
            "*.js",
            "*.ts",
            "src/**/*.{js,ts,jsx,tsx}",
            "routes/**/*.js",
            "controllers/**/*.js",
            "models/**/*.js",
            "middleware/**/*.js",
        ],
    };
    patterns.iter().map(|p| p.to_string()).collect()
}

/// Compiles glob patterns into a single matcher. Invalid patterns are
/// skipped with a warning so one bad user-supplied selector cannot abort
/// collection.
fn build_globset(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => {
                log::warn!("skipping invalid file selector '{}': {}", pattern, e);
            }
        }
    }
    builder.build().unwrap_or_else(|e| {
        log::warn!("failed to build file selector set: {}", e);
        GlobSet::empty()
    })
}

/// Removes non-printable control characters, preserving standard whitespace.
fn sanitize(content: &str) -> String {
    content
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

/// Caps `content` at `max_chars` characters, appending the truncation marker
/// when anything was cut.
fn truncate(content: String, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content;
    }
    let mut capped: String = content.chars().take(max_chars).collect();
    capped.push_str(TRUNCATION_MARKER);
    capped
}

/// Applies each glob pattern against `project_path` and returns the
/// concatenated, sanitized text of every matched file, each prefixed with a
/// header comment naming its relative path.
pub fn collect(project_path: &Path, patterns: &[String], max_chars: usize) -> String {
    let globset = build_globset(patterns);
    if globset.is_empty() {
        return String::new();
    }

    // BTreeSet both deduplicates overlapping patterns and fixes the order.
    let mut matched: BTreeSet<PathBuf> = BTreeSet::new();
    let walker = WalkDir::new(project_path).into_iter().filter_entry(|e| {
        !e.file_name()
            .to_str()
            .map(|name| SKIPPED_DIRS.contains(&name))
            .unwrap_or(false)
    });

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(project_path) else {
            continue;
        };
        if globset.is_match(relative) {
            matched.insert(relative.to_path_buf());
        }
    }

    let mut sections = Vec::new();
    for relative in &matched {
        let content = match fs::read_to_string(project_path.join(relative)) {
            Ok(content) => content,
            Err(e) => {
                log::debug!("skipping unreadable file {}: {}", relative.display(), e);
                continue;
            }
        };
        let body = truncate(sanitize(&content), max_chars);
        sections.push(format!(
            "// ==== File: {} ====\n{}",
            relative.display(),
            body
        ));
    }

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn collects_matched_files_with_headers() {
        let dir = tempdir().unwrap();
        write(dir.path(), "package.json", "{\"name\": \"demo\"}");
        write(dir.path(), "src/app.js", "const x = 1;");
        write(dir.path(), "ignore.txt", "not selected");

        let out = collect(
            dir.path(),
            &["package.json".into(), "src/**/*.js".into()],
            10_000,
        );
        assert!(out.contains("// ==== File: package.json ===="));
        assert!(out.contains("// ==== File: src/app.js ===="));
        assert!(out.contains("const x = 1;"));
        assert!(!out.contains("not selected"));
    }

    #[test]
    fn overlapping_patterns_are_deduplicated() {
        let dir = tempdir().unwrap();
        write(dir.path(), "index.js", "module.exports = {};");

        let out = collect(dir.path(), &["*.js".into(), "index.js".into()], 10_000);
        assert_eq!(out.matches("// ==== File: index.js ====").count(), 1);
    }

    #[test]
    fn oversized_file_is_truncated_with_marker() {
        let dir = tempdir().unwrap();
        write(dir.path(), "big.js", &"a".repeat(12_000));

        let out = collect(dir.path(), &["big.js".into()], 10_000);
        assert!(out.contains(TRUNCATION_MARKER));
        // Header + 10_000 chars + marker, nothing more.
        assert!(out.len() < 12_000);
    }

    #[test]
    fn control_characters_are_stripped_whitespace_kept() {
        let dir = tempdir().unwrap();
        write(dir.path(), "weird.js", "line1\n\tline2\u{0000}\u{0007}end");

        let out = collect(dir.path(), &["weird.js".into()], 10_000);
        assert!(out.contains("line1\n\tline2end"));
        assert!(!out.contains('\u{0000}'));
    }

    #[test]
    fn unreadable_file_is_silently_skipped() {
        let dir = tempdir().unwrap();
        write(dir.path(), "ok.js", "fine");
        // Invalid UTF-8 makes read_to_string fail for this entry.
        fs::write(dir.path().join("bad.js"), [0xff, 0xfe, 0xfd]).unwrap();

        let out = collect(dir.path(), &["*.js".into()], 10_000);
        assert!(out.contains("// ==== File: ok.js ===="));
        assert!(!out.contains("bad.js"));
    }

    #[test]
    fn node_modules_is_never_sampled() {
        let dir = tempdir().unwrap();
        write(dir.path(), "node_modules/dep/index.js", "vendored");
        write(dir.path(), "app.js", "mine");

        let out = collect(dir.path(), &["**/*.js".into()], 10_000);
        assert!(out.contains("mine"));
        assert!(!out.contains("vendored"));
    }

    #[test]
    fn invalid_pattern_does_not_abort_collection() {
        let dir = tempdir().unwrap();
        write(dir.path(), "app.js", "content");

        let out = collect(dir.path(), &["[bad".into(), "*.js".into()], 10_000);
        assert!(out.contains("content"));
    }
}
