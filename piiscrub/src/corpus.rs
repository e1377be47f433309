// piiscrub/src/corpus.rs
//! Name corpus loading.
//!
//! The corpus file holds one name per line. Blank lines and `#` comments are
//! skipped. For CSV-style lines (e.g. census exports `name,count,rank`) only
//! the first field is used.

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::Path;

use piiscrub_core::{NameTrie, NameTrieBuilder};

/// Reads a corpus file and builds the dictionary.
pub fn load_name_corpus(path: &Path) -> Result<NameTrie> {
    info!("Loading name corpus from: {}", path.display());
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read name corpus {}", path.display()))?;
    let trie = parse_name_corpus(&text);
    info!("Loaded {} distinct name(s) from {}.", trie.len(), path.display());
    Ok(trie)
}

pub fn parse_name_corpus(text: &str) -> NameTrie {
    let mut builder = NameTrieBuilder::new();
    let mut duplicates = 0usize;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let name = line
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .trim_matches('"');
        if !name.is_empty() && !builder.insert(name) {
            duplicates += 1;
        }
    }

    debug!("Skipped {} duplicate corpus entries.", duplicates);
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_skips_comments_and_takes_first_csv_field() {
        let trie = parse_name_corpus("# census extract\nSMITH,2442977,1\n\n\"Garcia\",1166120,2\nsmith\n  Jon  \n");
        assert_eq!(trie.len(), 3);
        assert!(trie.contains("Smith"));
        assert!(trie.contains("garcia"));
        assert!(trie.contains("JON"));
        assert!(!trie.contains("2442977"));
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "jon\ndoe")?;
        let trie = load_name_corpus(file.path())?;
        assert!(trie.contains("Doe"));
        Ok(())
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_name_corpus(Path::new("/no/such/names.txt")).unwrap_err();
        assert!(err.to_string().contains("/no/such/names.txt"));
    }
}
