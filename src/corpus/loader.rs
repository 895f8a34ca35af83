//! Record loading from tab-separated recipe files.
//!
//! One line per recipe: the cuisine label, then one field per ingredient.
//!
//! ```text
//! italian\tgarlic\tolive_oil\ttomato
//! japanese\tsoy_sauce\trice\tscallion
//! ```
//!
//! Fields are trimmed; an ingredient with whitespace inside (`olive oil`) is
//! rejected. Reading is lazy and fail-fast: the first malformed line ends the sequence
//! with [`Error::MalformedRecord`].

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// One recipe: a cuisine label and its ingredient tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line number the record was read from.
    pub line: usize,
    /// Cuisine label (field 0).
    pub cuisine: String,
    /// Ingredient tokens in input order (fields 1..n).
    pub ingredients: Vec<String>,
}

impl Record {
    /// Parse one input line. Returns `Ok(None)` for an empty line.
    pub fn parse(line_no: usize, line: &str) -> Result<Option<Self>> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            return Ok(None);
        }

        let mut fields = line.split('\t');
        let cuisine = fields.next().unwrap_or_default().trim();
        if cuisine.is_empty() {
            return Err(Error::MalformedRecord {
                line: line_no,
                reason: "empty cuisine label",
            });
        }

        let ingredients: Vec<String> = fields
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_owned)
            .collect();
        if ingredients.is_empty() {
            return Err(Error::MalformedRecord {
                line: line_no,
                reason: "label has no ingredients",
            });
        }
        // Documents are re-tokenized on whitespace downstream.
        if ingredients.iter().any(|i| i.contains(char::is_whitespace)) {
            return Err(Error::MalformedRecord {
                line: line_no,
                reason: "ingredient contains whitespace",
            });
        }

        Ok(Some(Self {
            line: line_no,
            cuisine: cuisine.to_owned(),
            ingredients,
        }))
    }
}

/// Lazy iterator over the records of a buffered reader.
///
/// After yielding an error the reader is exhausted.
pub struct RecordReader<R> {
    lines: Lines<R>,
    source: PathBuf,
    line_no: usize,
    failed: bool,
}

impl<R: BufRead> RecordReader<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            source: PathBuf::from("<input>"),
            line_no: 0,
            failed: false,
        }
    }
}

impl RecordReader<BufReader<File>> {
    /// Open a record file. Re-open to restart the sequence.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = Self::new(BufReader::new(file));
        reader.source = path.to_path_buf();
        Ok(reader)
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(Error::Io {
                        path: self.source.clone(),
                        source: e,
                    }));
                }
            };
            self.line_no += 1;

            match Record::parse(self.line_no, &line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Read every record of a file, aborting on the first malformed line.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    RecordReader::open(path)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(text: &str) -> RecordReader<Cursor<&str>> {
        RecordReader::new(Cursor::new(text))
    }

    #[test]
    fn test_parse_basic_line() {
        let record = Record::parse(1, "A\tx\ty").unwrap().unwrap();
        assert_eq!(record.cuisine, "A");
        assert_eq!(record.ingredients, vec!["x", "y"]);
        assert_eq!(record.line, 1);
    }

    #[test]
    fn test_parse_strips_carriage_return() {
        let record = Record::parse(3, "korean\tgarlic\tsesame_oil\r")
            .unwrap()
            .unwrap();
        assert_eq!(record.ingredients, vec!["garlic", "sesame_oil"]);
    }

    #[test]
    fn test_empty_line_is_skipped() {
        let records: Vec<_> = reader("A\tx\n\nB\ty\n")
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn test_label_without_ingredients_is_malformed() {
        let err = reader("A\tx\nB\n").collect::<Result<Vec<_>>>().unwrap_err();
        match err {
            Error::MalformedRecord { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_only_empty_fields_is_malformed() {
        let err = Record::parse(5, "A\t\t").unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 5, .. }));
    }

    #[test]
    fn test_ingredient_with_inner_space_is_malformed() {
        let err = reader("A\tgarlic\nA\tolive oil\tgarlic\n")
            .collect::<Result<Vec<_>>>()
            .unwrap_err();
        match err {
            Error::MalformedRecord { line, reason } => {
                assert_eq!(line, 2);
                assert_eq!(reason, "ingredient contains whitespace");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_label_is_malformed() {
        let err = Record::parse(1, "\tx").unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_reader_stops_after_error() {
        let mut it = reader("bad\nA\tx\n");
        assert!(it.next().unwrap().is_err());
        assert!(it.next().is_none());
    }

    #[test]
    fn test_open_missing_file() {
        let err = RecordReader::open("/definitely/not/here.tsv").err().unwrap();
        assert_eq!(err.stage(), "loader");
    }
}
