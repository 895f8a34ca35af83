//! Recipe records and their per-cuisine aggregation.
//!
//! ```text
//! records.tsv ──► RecordReader ──► Corpus (one CuisineDocument per label)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use palate::corpus::{Corpus, RecordReader};
//! use std::io::Cursor;
//!
//! let input = "A\tx\ty\nA\tx\tz\n";
//! let corpus = Corpus::from_records(RecordReader::new(Cursor::new(input))).unwrap();
//! assert_eq!(corpus.get("A").unwrap().text, "x y x z");
//! ```

mod aggregate;
mod loader;

pub use aggregate::{Corpus, CuisineDocument};
pub use loader::{read_records, Record, RecordReader};
