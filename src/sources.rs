//! Reading and parsing the subscription source list.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Read the source list file and parse it into subscription URLs.
pub fn read_source_list(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| Error::SourceListUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_source_list(&content))
}

/// Parse source list text into subscription URLs.
///
/// URLs are separated by newlines and/or commas. Fragments are trimmed and
/// empty ones dropped; order is kept and duplicates are not removed.
pub fn parse_source_list(content: &str) -> Vec<String> {
    content
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_newlines_and_commas() {
        let urls = parse_source_list("http://a, http://b\n\n  http://c  \r\n,http://d,,\n");
        assert_eq!(urls, vec!["http://a", "http://b", "http://c", "http://d"]);
    }

    #[test]
    fn blank_input_is_empty() {
        assert!(parse_source_list("").is_empty());
        assert!(parse_source_list(" \n\t\n , ,").is_empty());
    }

    #[test]
    fn duplicates_are_kept() {
        let urls = parse_source_list("http://a\nhttp://a");
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_source_list(dir.path().join("subs.txt")).unwrap_err();
        assert!(matches!(err, Error::SourceListUnreadable { .. }));
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subs.txt");
        fs::write(&path, "http://a,http://b\n").unwrap();
        assert_eq!(read_source_list(&path).unwrap(), vec!["http://a", "http://b"]);
    }
}
