use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::{BlogTable, LoadError, Topic};

fn read_file(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Read the topic list, one topic per line.
pub fn load_topics(path: &Path) -> Result<Vec<Topic>, LoadError> {
    let text = read_file(path)?;
    let topics = parse_topics(&text);
    debug!(path = %path.display(), count = topics.len(), "topics loaded");
    Ok(topics)
}

/// Read the blog table, one `topic|link, link` line per topic.
pub fn load_blogs(path: &Path) -> Result<BlogTable, LoadError> {
    let text = read_file(path)?;
    let blogs = parse_blogs(&text, path)?;
    debug!(path = %path.display(), count = blogs.len(), "blog links loaded");
    Ok(blogs)
}

/// Blank lines are skipped: an empty topic would be a substring of every question.
pub fn parse_topics(text: &str) -> Vec<Topic> {
    text.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|topic| !topic.is_empty())
        .collect()
}

/// `origin` is only used for error messages.
pub fn parse_blogs(text: &str, origin: &Path) -> Result<BlogTable, LoadError> {
    let mut blogs = BlogTable::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        let mut parts = line.split('|');
        let (topic, links) = match (parts.next(), parts.next(), parts.next()) {
            (Some(topic), Some(links), None) => (topic, links),
            _ => {
                return Err(LoadError::Malformed {
                    path: PathBuf::from(origin),
                    line: idx + 1,
                    content: line.to_string(),
                })
            }
        };

        let links: Vec<String> = links
            .split(',')
            .map(str::trim)
            .filter(|link| !link.is_empty())
            .map(str::to_string)
            .collect();

        // Later lines win for a repeated topic
        blogs.insert(topic.trim().to_lowercase(), links);
    }

    Ok(blogs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn origin() -> &'static Path {
        Path::new("blogs.txt")
    }

    #[test]
    fn test_parse_topics_normalizes_lines() {
        let topics = parse_topics("  Anxiety \nDEPRESSION\n\n   \nsleep\n");
        assert_eq!(topics, vec!["anxiety", "depression", "sleep"]);
    }

    #[test]
    fn test_parse_blogs_single_line() {
        let blogs = parse_blogs("anxiety|a.com, b.com", origin()).unwrap();
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs["anxiety"], vec!["a.com", "b.com"]);
    }

    #[test]
    fn test_parse_blogs_trims_and_drops_empty_links() {
        let blogs = parse_blogs(" Stress | x.org ,, y.org , \n", origin()).unwrap();
        assert_eq!(blogs["stress"], vec!["x.org", "y.org"]);
    }

    #[test]
    fn test_parse_blogs_allows_empty_list() {
        let blogs = parse_blogs("grief|", origin()).unwrap();
        assert!(blogs["grief"].is_empty());
    }

    #[test]
    fn test_parse_blogs_later_line_wins() {
        let blogs = parse_blogs("sleep|a.com\nsleep|b.com", origin()).unwrap();
        assert_eq!(blogs["sleep"], vec!["b.com"]);
    }

    #[test]
    fn test_parse_blogs_missing_separator() {
        let err = parse_blogs("anxiety|a.com\ndepression a.com", origin()).unwrap_err();
        match err {
            LoadError::Malformed { line, content, .. } => {
                assert_eq!(line, 2);
                assert_eq!(content, "depression a.com");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_blogs_rejects_extra_separator() {
        let err = parse_blogs("a|b|c", origin()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { line: 1, .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topics.txt");
        assert!(matches!(
            load_topics(&path),
            Err(LoadError::NotFound { .. })
        ));
        assert!(matches!(load_blogs(&path), Err(LoadError::NotFound { .. })));
    }

    #[test]
    fn test_load_from_files() {
        let mut topics = tempfile::NamedTempFile::new().unwrap();
        writeln!(topics, "Anxiety\nStress").unwrap();
        let mut blogs = tempfile::NamedTempFile::new().unwrap();
        writeln!(blogs, "anxiety|https://a.com/1, https://a.com/2").unwrap();

        assert_eq!(load_topics(topics.path()).unwrap(), vec!["anxiety", "stress"]);
        let table = load_blogs(blogs.path()).unwrap();
        assert_eq!(table["anxiety"], vec!["https://a.com/1", "https://a.com/2"]);
    }
}
