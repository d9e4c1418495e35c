use crate::utils::text::contains_phrase;
use serde_json::Value;

/// Text fields covered by full-text search.
pub const TEXT_SEARCH_FIELDS: &[&str] = &["title"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    TextSearch(String),
    PublishedAfter(i32),
    PublishedBefore(i32),
    AuthorsAnyOf(Vec<String>),
}

impl Predicate {
    /// Evaluates the predicate against a raw stored document.
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Predicate::TextSearch(phrase) => TEXT_SEARCH_FIELDS.iter().any(|field| {
                doc.get(*field)
                    .and_then(Value::as_str)
                    .is_some_and(|text| contains_phrase(text, phrase))
            }),
            Predicate::PublishedAfter(year) => {
                publication_year(doc).is_some_and(|y| y >= i64::from(*year))
            }
            Predicate::PublishedBefore(year) => {
                publication_year(doc).is_some_and(|y| y <= i64::from(*year))
            }
            Predicate::AuthorsAnyOf(wanted) => {
                author_ids(doc).any(|id| wanted.iter().any(|w| w == id))
            }
        }
    }
}

fn publication_year(doc: &Value) -> Option<i64> {
    doc.get("publication_year").and_then(Value::as_i64)
}

fn author_ids(doc: &Value) -> impl Iterator<Item = &str> {
    doc.get("authors")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|author| author.get("author_id").and_then(Value::as_str))
}

/// Conjunction of predicates. An empty expression matches every document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpression {
    predicates: Vec<Predicate>,
}

impl FilterExpression {
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Self { predicates }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_match_all(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, doc: &Value) -> bool {
        self.predicates.iter().all(|p| p.matches(doc))
    }
}
