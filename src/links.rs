//! Link extraction from the daily CSV file.
//!
//! The CSV may or may not carry a header. A header is recognised only when
//! the first line is exactly `url` or `link` (case-insensitive, trimmed);
//! otherwise every row, including the first, is a link in its first column.

use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Column names tried, in order, when the file has a header.
const LINK_COLUMNS: [&str; 4] = ["url", "link", "URL", "Link"];

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read `path` once and return its links in row order.
///
/// An empty file yields an empty list. Duplicates are kept.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn extract_links(path: &Path) -> Result<Vec<String>, LinkError> {
    let text = fs::read_to_string(path).await.map_err(|source| LinkError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let links = parse_links(&text);
    info!(count = links.len(), "Extracted links from CSV");
    Ok(links)
}

/// Parse CSV text into an ordered list of trimmed, non-empty links.
pub fn parse_links(text: &str) -> Vec<String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some(first_line) = text.lines().next() else {
        return Vec::new();
    };
    let has_header = is_header_line(first_line);
    debug!(has_header, "Detected CSV layout");

    let mut reader = ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: Option<StringRecord> = if has_header {
        match reader.headers() {
            Ok(h) => Some(h.clone()),
            Err(e) => {
                warn!(error = %e, "Unreadable CSV header; no links extracted");
                return Vec::new();
            }
        }
    } else {
        None
    };

    let mut links = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!(row, error = %e, "Skipping malformed CSV row");
                continue;
            }
        };

        let resolved = match &headers {
            Some(headers) => {
                let fields: Vec<(&str, &str)> = record
                    .iter()
                    .enumerate()
                    .map(|(i, value)| (headers.get(i).unwrap_or(""), value))
                    .collect();
                resolve_link(&fields)
            }
            None => record.get(0).and_then(non_empty),
        };

        match resolved {
            Some(link) => links.push(link),
            None => debug!(row, "Row has no link value; skipped"),
        }
    }
    links
}

/// Whether the first line of the file is a header naming the link column.
pub fn is_header_line(line: &str) -> bool {
    let line = line.trim();
    line.eq_ignore_ascii_case("url") || line.eq_ignore_ascii_case("link")
}

/// Pick the link out of one headed row.
///
/// Named columns are tried in [`LINK_COLUMNS`] order (case-sensitive), then
/// the row's first value. The first candidate that is non-empty after
/// trimming wins.
pub fn resolve_link(row: &[(&str, &str)]) -> Option<String> {
    LINK_COLUMNS
        .iter()
        .filter_map(|name| row.iter().find(|(key, _)| key == name).map(|(_, v)| *v))
        .chain(row.first().map(|(_, v)| *v))
        .find_map(non_empty)
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_header_url() {
        let links = parse_links("url\nhttp://a.com\nhttp://b.com");
        assert_eq!(links, vec!["http://a.com", "http://b.com"]);
    }

    #[test]
    fn test_headerless() {
        let links = parse_links("http://a.com\nhttp://b.com");
        assert_eq!(links, vec!["http://a.com", "http://b.com"]);
    }

    #[test]
    fn test_header_is_case_insensitive_and_trimmed() {
        assert_eq!(parse_links("  LINK \nhttp://a.com\n"), vec!["http://a.com"]);
        assert_eq!(parse_links("Url\r\nhttp://a.com\r\n"), vec!["http://a.com"]);
    }

    #[test]
    fn test_header_never_emitted_as_link() {
        for header in ["url", "URL", "link", "Link", "lInK"] {
            let links = parse_links(&format!("{header}\nhttp://x.com"));
            assert_eq!(links, vec!["http://x.com"], "header {header}");
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_links("").is_empty());
    }

    #[test]
    fn test_header_only() {
        assert!(parse_links("url\n").is_empty());
    }

    #[test]
    fn test_headerless_first_column_only() {
        let links = parse_links("http://a.com,ignored\nhttp://b.com,also ignored");
        assert_eq!(links, vec!["http://a.com", "http://b.com"]);
    }

    #[test]
    fn test_headerless_first_row_looks_like_multi_column_header() {
        // Only a bare `url`/`link` line counts as a header.
        let links = parse_links("url,title\nhttp://a.com,A");
        assert_eq!(links, vec!["url", "http://a.com"]);
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let links = parse_links("url\nhttp://a.com\n   \n\nhttp://b.com\n");
        assert_eq!(links, vec!["http://a.com", "http://b.com"]);
    }

    #[test]
    fn test_duplicates_and_order_preserved() {
        let links = parse_links("http://b.com\nhttp://a.com\nhttp://b.com");
        assert_eq!(links, vec!["http://b.com", "http://a.com", "http://b.com"]);
    }

    #[test]
    fn test_values_are_trimmed() {
        let links = parse_links("link\n   http://a.com   \n");
        assert_eq!(links, vec!["http://a.com"]);
    }

    #[test]
    fn test_byte_order_mark() {
        let links = parse_links("\u{feff}url\nhttp://a.com");
        assert_eq!(links, vec!["http://a.com"]);
    }

    #[test]
    fn test_is_header_line() {
        assert!(is_header_line("url"));
        assert!(is_header_line(" LINK "));
        assert!(!is_header_line("urls"));
        assert!(!is_header_line("http://url.com"));
    }

    #[test]
    fn test_resolve_link_prefers_named_columns_in_order() {
        let row = [("title", "T"), ("Link", "http://L.com"), ("url", "http://u.com")];
        assert_eq!(resolve_link(&row), Some("http://u.com".to_string()));

        let row = [("title", "T"), ("URL", "http://U.com"), ("link", "http://l.com")];
        assert_eq!(resolve_link(&row), Some("http://l.com".to_string()));

        let row = [("title", "T"), ("Link", "http://L.com"), ("URL", "http://U.com")];
        assert_eq!(resolve_link(&row), Some("http://U.com".to_string()));
    }

    #[test]
    fn test_resolve_link_skips_empty_candidates() {
        let row = [("url", "  "), ("link", "http://l.com")];
        assert_eq!(resolve_link(&row), Some("http://l.com".to_string()));
    }

    #[test]
    fn test_resolve_link_falls_back_to_first_value() {
        let row = [("address", " http://first.com "), ("other", "x")];
        assert_eq!(resolve_link(&row), Some("http://first.com".to_string()));
    }

    #[test]
    fn test_resolve_link_empty_row() {
        assert_eq!(resolve_link(&[]), None);
        assert_eq!(resolve_link(&[("url", ""), ("x", "y")]), None);
    }

    #[tokio::test]
    async fn test_extract_links_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "url\nhttp://a.com\nhttp://b.com").unwrap();
        let links = extract_links(file.path()).await.unwrap();
        assert_eq!(links, vec!["http://a.com", "http://b.com"]);
    }

    #[tokio::test]
    async fn test_extract_links_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let links = extract_links(file.path()).await.unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_extract_links_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_links(&dir.path().join("nope.csv")).await.unwrap_err();
        assert!(matches!(err, LinkError::Io { .. }));
    }
}
