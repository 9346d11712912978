//! Labeled corpus loading from a directory of CSV files.
//!
//! A file contributes rows only when its header has both a `text` and a `tags`
//! column. Tags are whitespace separated inside the `tags` cell.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, VectorizerError};

const TEXT_COLUMN: &str = "text";
const TAGS_COLUMN: &str = "tags";

/// Texts and their tag lists as two parallel sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabeledCorpus {
    pub texts: Vec<String>,
    pub tags: Vec<Vec<String>>,
}

impl LabeledCorpus {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn push(&mut self, text: String, tags: Vec<String>) {
        self.texts.push(text);
        self.tags.push(tags);
    }
}

/// Topic and file stem comparison ignores spaces and underscores.
fn normalize_topic(name: &str) -> String {
    name.chars().filter(|c| *c != ' ' && *c != '_').collect()
}

/// `*.csv` files directly under `dir`, sorted by path.
pub fn csv_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    files.sort();
    Ok(files)
}

/// The single file whose stem matches `topic`, or every file when there is
/// no topic or no match.
pub fn select_files(files: Vec<PathBuf>, topic: Option<&str>) -> Vec<PathBuf> {
    let Some(topic) = topic.map(normalize_topic).filter(|t| !t.is_empty()) else {
        return files;
    };
    let matched = files.iter().find(|path| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| normalize_topic(stem) == topic)
    });
    match matched {
        Some(path) => vec![path.clone()],
        None => {
            tracing::info!(topic = %topic, "no file matches topic, using all files");
            files
        }
    }
}

/// Appends the rows of one CSV file. Returns `false` when the file lacks the
/// `text` or `tags` column.
pub fn read_csv(path: &Path, corpus: &mut LabeledCorpus) -> Result<bool> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let text_idx = headers.iter().position(|h| h.trim() == TEXT_COLUMN);
    let tags_idx = headers.iter().position(|h| h.trim() == TAGS_COLUMN);
    let (Some(text_idx), Some(tags_idx)) = (text_idx, tags_idx) else {
        return Ok(false);
    };

    for record in reader.records() {
        let record = record?;
        let text = record.get(text_idx).unwrap_or_default().to_owned();
        let tags = record
            .get(tags_idx)
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_owned)
            .collect();
        corpus.push(text, tags);
    }
    Ok(true)
}

/// Loads every usable row under `dir`, restricted to the topic file when one matches.
///
/// # Errors
/// `NoData` when no row could be collected.
pub fn load_corpus(dir: impl AsRef<Path>, topic: Option<&str>) -> Result<LabeledCorpus> {
    let dir = dir.as_ref();
    let files = select_files(csv_files(dir)?, topic);

    let mut corpus = LabeledCorpus::default();
    for path in &files {
        if !read_csv(path, &mut corpus)? {
            tracing::warn!(file = %path.display(), "skipping csv without text/tags columns");
        }
    }

    if corpus.is_empty() {
        return Err(VectorizerError::NoData(format!(
            "no rows with 'text' and 'tags' columns under {}",
            dir.display()
        )));
    }
    tracing::info!(documents = corpus.len(), files = files.len(), "loaded corpus");
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn loads_text_and_split_tags() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "tech.csv",
            "id,text,tags\n1,Rust is fast,rust speed\n2,\"Hello, world\",\n",
        );
        let corpus = load_corpus(dir.path(), None).unwrap();
        assert_eq!(corpus.texts, vec!["Rust is fast", "Hello, world"]);
        assert_eq!(corpus.tags, vec![vec!["rust".to_string(), "speed".into()], vec![]]);
    }

    #[test]
    fn skips_files_without_required_columns() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.csv", "text,tags\nhello,greeting\n");
        write(dir.path(), "b.csv", "body,labels\nignored,nope\n");
        write(dir.path(), "notes.txt", "text,tags\nnot,csv\n");
        let corpus = load_corpus(dir.path(), None).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.texts[0], "hello");
    }

    #[test]
    fn topic_selects_matching_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "machine_learning.csv", "text,tags\nneural nets,ml\n");
        write(dir.path(), "sports.csv", "text,tags\nfootball,sport\n");

        let corpus = load_corpus(dir.path(), Some("machine learning")).unwrap();
        assert_eq!(corpus.texts, vec!["neural nets"]);

        let corpus = load_corpus(dir.path(), Some("machinelearning")).unwrap();
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn unknown_topic_falls_back_to_all_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.csv", "text,tags\none,x\n");
        write(dir.path(), "b.csv", "text,tags\ntwo,y\n");
        let corpus = load_corpus(dir.path(), Some("cooking")).unwrap();
        assert_eq!(corpus.texts, vec!["one", "two"]);
    }

    #[test]
    fn empty_directory_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_corpus(dir.path(), None), Err(VectorizerError::NoData(_))));
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(load_corpus(&missing, None), Err(VectorizerError::Io(_))));
    }
}
