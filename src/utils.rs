//! Utility functions for text cleanup, dated file naming, and file system checks.
//!
//! - Whitespace normalization and character-exact truncation for scraped text
//! - String truncation for logging
//! - `dd-MM-yyyy` file naming under the materials directory
//! - Output directory validation

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Name of the directory, under the home directory, holding inputs and reports.
pub const MATERIALS_DIR_NAME: &str = "Materials";

/// Collapse every run of whitespace to one space and trim both ends.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_whitespace("  a \n\t b  "), "a b");
/// ```
pub fn normalize_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

/// Keep at most `max` characters of `s`.
///
/// Counts `char`s, not bytes, and cuts mid-word if needed.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the
/// number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let kept = truncate_chars(s, max);
    if kept.len() == s.len() {
        kept
    } else {
        format!("{}…(+{} bytes)", kept, s.len() - kept.len())
    }
}

/// File stem for a given day, formatted `dd-MM-yyyy`.
pub fn dated_stem(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// `{home}/Materials`, or `None` when no home directory can be resolved.
pub fn default_materials_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(MATERIALS_DIR_NAME))
}

/// Input CSV and output report paths for `date` inside `materials_dir`.
pub fn dated_paths(materials_dir: &Path, date: NaiveDate) -> (PathBuf, PathBuf) {
    let stem = dated_stem(date);
    (
        materials_dir.join(format!("{stem}.csv")),
        materials_dir.join(format!("{stem}.txt")),
    )
}

/// Ensure the directory that will hold `file` exists.
#[instrument(level = "info", skip_all, fields(path = %file.display()))]
pub async fn ensure_parent_dir(file: &Path) -> io::Result<()> {
    match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).await?;
            info!(dir = %dir.display(), "Output directory ready");
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\t b  "), "a b");
        assert_eq!(normalize_whitespace("one\r\n\r\ntwo   three"), "one two three");
        assert_eq!(normalize_whitespace("   "), "");
        assert_eq!(normalize_whitespace("a\u{a0}\u{a0}b"), "a b");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hello", 0), "");
        assert_eq!(truncate_chars("ünïcödé", 3), "ünï");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let result = truncate_for_log("éééé", 2);
        assert_eq!(result, "éé…(+4 bytes)");
    }

    #[test]
    fn test_dated_stem() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(dated_stem(date), "07-03-2025");
    }

    #[test]
    fn test_dated_paths() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let (csv, txt) = dated_paths(Path::new("/home/me/Materials"), date);
        assert_eq!(csv, PathBuf::from("/home/me/Materials/31-12-2024.csv"));
        assert_eq!(txt, PathBuf::from("/home/me/Materials/31-12-2024.txt"));
    }

    #[test]
    fn test_default_materials_dir_ends_with_materials() {
        if let Some(dir) = default_materials_dir() {
            assert!(dir.ends_with(MATERIALS_DIR_NAME));
        }
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_creates_missing_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a/b/report.txt");
        ensure_parent_dir(&file).await.unwrap();
        assert!(tmp.path().join("a/b").is_dir());
    }
}
