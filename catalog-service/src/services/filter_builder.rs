use crate::models::filter::{FilterExpression, Predicate};
use crate::models::query::QueryParameters;

/// Maps validated parameters to a conjunction of predicates. Absent
/// parameters contribute nothing; ranges are passed through unchecked.
pub fn build_filter(params: &QueryParameters) -> FilterExpression {
    let mut predicates = Vec::new();

    if let Some(search) = params.search.as_ref().filter(|s| !s.is_empty()) {
        predicates.push(Predicate::TextSearch(search.clone()));
    }

    if let Some(year) = params.published_after {
        predicates.push(Predicate::PublishedAfter(year));
    }

    if let Some(year) = params.published_before {
        predicates.push(Predicate::PublishedBefore(year));
    }

    if !params.authors.is_empty() {
        predicates.push(Predicate::AuthorsAnyOf(params.authors.clone()));
    }

    FilterExpression::new(predicates)
}
