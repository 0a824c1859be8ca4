//! Plain-text report of the run's debriefings.
//!
//! Each entry looks like:
//!
//! ```text
//! === ARTICLE 1 ===
//! URL: https://example.com/story
//! TITLE: Headline
//!
//! DEBRIEFING:
//! Summary text...
//!
//! ================================================================================
//! ```
//!
//! Entries are separated by one blank line and keep the input order.

use crate::models::Debriefing;
use itertools::Itertools;
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Width of the `=` line closing every entry.
pub const DIVIDER_WIDTH: usize = 80;

/// Render one entry; `n` is 1-based.
pub fn render_entry(n: usize, debriefing: &Debriefing) -> String {
    format!(
        "=== ARTICLE {n} ===\nURL: {}\nTITLE: {}\n\nDEBRIEFING:\n{}\n\n{}",
        debriefing.url,
        debriefing.title,
        debriefing.summary,
        "=".repeat(DIVIDER_WIDTH)
    )
}

/// Render the full report. An empty slice renders as an empty string.
pub fn render_report(debriefings: &[Debriefing]) -> String {
    debriefings
        .iter()
        .enumerate()
        .map(|(i, d)| render_entry(i + 1, d))
        .join("\n\n")
}

/// Write the report to `path`, replacing any existing file.
#[instrument(level = "info", skip_all, fields(path = %path.display(), entries = debriefings.len()))]
pub async fn write_report(debriefings: &[Debriefing], path: &Path) -> io::Result<()> {
    let text = render_report(debriefings);
    fs::write(path, &text).await?;
    info!(bytes = text.len(), "Wrote report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debriefing(i: usize) -> Debriefing {
        Debriefing {
            url: format!("https://example.com/{i}"),
            title: format!("Title {i}"),
            summary: format!("Summary {i}"),
        }
    }

    #[test]
    fn test_render_entry_layout() {
        let text = render_entry(1, &debriefing(1));
        let expected = format!(
            "=== ARTICLE 1 ===\nURL: https://example.com/1\nTITLE: Title 1\n\nDEBRIEFING:\nSummary 1\n\n{}",
            "=".repeat(80)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_sections_numbered_in_order() {
        let items: Vec<_> = (1..=5).map(debriefing).collect();
        let text = render_report(&items);

        assert_eq!(text.matches("=== ARTICLE ").count(), 5);
        let mut last = 0;
        for k in 1..=5 {
            let pos = text.find(&format!("=== ARTICLE {k} ===")).unwrap();
            assert!(pos >= last);
            last = pos;
        }
        assert!(text.find("Summary 2").unwrap() < text.find("Summary 3").unwrap());
    }

    #[test]
    fn test_entries_joined_by_single_blank_line() {
        let text = render_report(&[debriefing(1), debriefing(2)]);
        let joint = format!("{}\n\n=== ARTICLE 2 ===", "=".repeat(80));
        assert!(text.contains(&joint));
        assert!(!text.contains("\n\n\n"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_empty_report() {
        assert_eq!(render_report(&[]), "");
    }

    #[tokio::test]
    async fn test_write_report_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old contents that should disappear").unwrap();

        write_report(&[debriefing(1)], &path).await.unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("=== ARTICLE 1 ==="));
        assert!(!text.contains("old contents"));
    }

    #[tokio::test]
    async fn test_write_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        write_report(&[], &path).await.unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("ARTICLE"));
        assert!(text.is_empty());
    }
}
