//! Dataset loading and the year filter.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Failure to read the dataset file.
#[derive(Debug)]
pub struct DatasetError {
    pub path: PathBuf,
    pub source: io::Error,
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cannot read dataset '{}': {}", self.path.display(), self.source)
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Read the dataset into lines with trailing whitespace removed.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
pub fn load_lines(path: &Path) -> Result<Vec<String>, DatasetError> {
    let bytes = fs::read(path).map_err(|source| DatasetError {
        path: path.to_path_buf(),
        source,
    })?;
    let lines: Vec<String> = String::from_utf8_lossy(&bytes)
        .lines()
        .map(|l| l.trim_end().to_string())
        .collect();
    tracing::info!(path = %path.display(), lines = lines.len(), "dataset loaded");
    Ok(lines)
}

/// Keep the lines that mention `year` anywhere.
///
/// This is a plain substring test, so a year inside a title or an episode
/// number also matches.
pub fn filter_by_year<'a, I, S>(lines: I, year: i32) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + ?Sized + 'a,
{
    let needle = year.to_string();
    lines
        .into_iter()
        .map(|line| AsRef::<str>::as_ref(line))
        .filter(|line| line.contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_lines_strips_trailing_whitespace() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "\"A\" (1969)\tOslo, Norway  \r\n\"B\" (1970)\tRome, Italy\n").unwrap();

        let lines = load_lines(file.path()).unwrap();
        assert_eq!(lines, vec!["\"A\" (1969)\tOslo, Norway", "\"B\" (1970)\tRome, Italy"]);
    }

    #[test]
    fn test_load_lines_lossy() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\"Caf\xe9\" (1969)\tParis, France\n").unwrap();

        let lines = load_lines(file.path()).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("Paris, France"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_lines(Path::new("/definitely/not/here.list")).unwrap_err();
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("/definitely/not/here.list"));
    }

    #[test]
    fn test_filter_by_year() {
        let lines = vec![
            "\"60 Minutes\" (1968)\tNew York, USA".to_string(),
            "\"Apollo\" (1969)\tHouston, Texas, USA".to_string(),
            "\"Other\" (1970)\tLondon, UK".to_string(),
        ];
        let kept = filter_by_year(&lines, 1969);
        assert_eq!(kept, vec!["\"Apollo\" (1969)\tHouston, Texas, USA"]);
    }

    #[test]
    fn test_filter_substring_quirk() {
        // "1969" appears in an episode tag, not in the date field.
        let lines = ["\"60 Minutes\" (1968) {Moon Landing 1969 (#1.20)}\tNew York, USA"];
        let kept = filter_by_year(lines.iter().copied(), 1969);
        assert_eq!(kept.len(), 1);
        assert!(filter_by_year(lines.iter().copied(), 1971).is_empty());
    }
}
