//! Per-cuisine aggregation of recipe records.

use std::collections::HashMap;

use tracing::debug;

use super::loader::Record;
use crate::error::{Error, Result};

/// All ingredient tokens of one cuisine, space-joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuisineDocument {
    /// Cuisine label.
    pub label: String,
    /// Tokens of every record with this label, in input order.
    pub text: String,
}

impl CuisineDocument {
    /// Whitespace tokens of the document.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }
}

/// One document per distinct cuisine, ordered by first appearance.
#[derive(Debug, Clone)]
pub struct Corpus {
    documents: Vec<CuisineDocument>,
    index: HashMap<String, usize>,
    n_records: usize,
}

impl Corpus {
    /// Aggregate a record sequence in a single pass.
    ///
    /// The first error in the sequence aborts aggregation.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<Record>>,
    {
        let mut labels: Vec<String> = Vec::new();
        let mut buffers: Vec<Vec<String>> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut n_records = 0;

        for record in records {
            let Record {
                cuisine,
                ingredients,
                ..
            } = record?;
            n_records += 1;

            let slot = match index.get(&cuisine) {
                Some(&slot) => slot,
                None => {
                    let slot = labels.len();
                    index.insert(cuisine.clone(), slot);
                    labels.push(cuisine);
                    buffers.push(Vec::new());
                    slot
                }
            };
            buffers[slot].extend(ingredients);
        }

        if labels.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        // Join once per cuisine, after the pass.
        let documents: Vec<CuisineDocument> = labels
            .into_iter()
            .zip(buffers)
            .map(|(label, tokens)| CuisineDocument {
                label,
                text: tokens.join(" "),
            })
            .collect();

        debug!(
            cuisines = documents.len(),
            records = n_records,
            "aggregated corpus"
        );

        Ok(Self {
            documents,
            index,
            n_records,
        })
    }

    /// Documents in first-appearance order.
    pub fn documents(&self) -> &[CuisineDocument] {
        &self.documents
    }

    /// Cuisine labels in first-appearance order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|d| d.label.as_str())
    }

    /// Look up a cuisine's document.
    pub fn get(&self, label: &str) -> Option<&CuisineDocument> {
        self.index.get(label).map(|&i| &self.documents[i])
    }

    /// Number of distinct cuisines.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Always false for a constructed corpus; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of records that went into the corpus.
    pub fn n_records(&self) -> usize {
        self.n_records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(line: usize, cuisine: &str, ingredients: &[&str]) -> Result<Record> {
        Ok(Record {
            line,
            cuisine: cuisine.to_string(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[test]
    fn test_tokens_are_combined_per_cuisine() {
        let corpus =
            Corpus::from_records(vec![rec(1, "A", &["x", "y"]), rec(2, "A", &["x", "z"])]).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.get("A").unwrap().text, "x y x z");
        assert_eq!(corpus.n_records(), 2);
    }

    #[test]
    fn test_first_appearance_order() {
        let corpus = Corpus::from_records(vec![
            rec(1, "thai", &["lime"]),
            rec(2, "greek", &["feta"]),
            rec(3, "thai", &["basil"]),
            rec(4, "cajun", &["okra"]),
        ])
        .unwrap();
        let labels: Vec<_> = corpus.labels().collect();
        assert_eq!(labels, vec!["thai", "greek", "cajun"]);
        assert_eq!(corpus.get("thai").unwrap().text, "lime basil");
    }

    #[test]
    fn test_empty_corpus() {
        let err = Corpus::from_records(Vec::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyCorpus));
    }

    #[test]
    fn test_error_aborts() {
        let records = vec![
            rec(1, "A", &["x"]),
            Err(Error::MalformedRecord {
                line: 2,
                reason: "label has no ingredients",
            }),
        ];
        assert!(Corpus::from_records(records).is_err());
    }
}
