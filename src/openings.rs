use crate::log;
use crate::normalize::opening_key;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

const CODE_CHARS: usize = 6;

/// Maps `ECO│Opening name` to a six-character opening code.
///
/// Each line of the side file is the code, one separator character, then the key.
#[derive(Debug, Clone, Default)]
pub struct OpeningTable {
    entries: HashMap<String, String>,
}

/// Splits one table line into (code, key), or `None` when it is too short.
fn parse_entry(line: &str) -> Option<(&str, &str)> {
    let mut boundaries = line.char_indices().map(|(idx, _)| idx).skip(CODE_CHARS);
    let code_end = boundaries.next()?;
    let key_start = boundaries.next()?;
    Some((&line[..code_end], &line[key_start..]))
}

impl OpeningTable {
    pub fn load(path: &Path) -> io::Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut entries = HashMap::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            match parse_entry(&line) {
                Some((code, key)) => {
                    entries.insert(key.to_string(), code.to_string());
                }
                None => log::warn(format!(
                    "Skipping opening table line {}: too short ('{}')",
                    idx + 1,
                    line
                )),
            }
        }
        Ok(Self { entries })
    }

    pub fn lookup(&self, eco: &str, opening: &str) -> Option<&str> {
        self.entries.get(&opening_key(eco, opening)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for OpeningTable {
    /// Builds a table from `(key, code)` pairs.
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "A00a01 A00│Amar Opening\n\
                         B01b02 B01│Scandinavian Defense: Mieses-Kotroc Variation\r\n\
                         \n\
                         short\n\
                         C20c03 C20│King's Pawn Game\n";

    #[test]
    fn test_from_reader_parses_entries() {
        let table = OpeningTable::from_reader(TABLE.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.lookup("A00", "Amar Opening"), Some("A00a01"));
        assert_eq!(
            table.lookup("B01", "Scandinavian Defense: Mieses-Kotroc Variation"),
            Some("B01b02")
        );
        assert_eq!(table.lookup("C20", "King's Pawn Game"), Some("C20c03"));
    }

    #[test]
    fn test_lookup_miss() {
        let table = OpeningTable::from_reader(TABLE.as_bytes()).unwrap();
        assert_eq!(table.lookup("A00", "Amar"), None);
        assert_eq!(table.lookup("", ""), None);
    }

    #[test]
    fn test_later_duplicates_overwrite() {
        let table =
            OpeningTable::from_reader("A00a01 A00│Amar Opening\nA00zz9 A00│Amar Opening\n".as_bytes())
                .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("A00", "Amar Opening"), Some("A00zz9"));
    }

    #[test]
    fn test_parse_entry_counts_characters_not_bytes() {
        assert_eq!(parse_entry("ÄÖÜäöü Ä│x"), Some(("ÄÖÜäöü", "Ä│x")));
        assert_eq!(parse_entry("A00a01 "), None);
        assert_eq!(parse_entry("A00a01"), None);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let path = std::env::temp_dir().join("chess-cri-no-such-openings.txt");
        assert!(OpeningTable::load(&path).is_err());
    }
}
