use crate::models::query::{FilterPolicy, QueryParameters, RawParams, ValidationError, MAX_LIMIT};
use std::str::FromStr;

pub const OFFSET_VIOLATION: &str = "offset must be a non-negative number";
pub const LIMIT_VIOLATION: &str = "limit must be between 1 and 1000";

fn parse_param<T: FromStr>(raw: &RawParams, key: &str) -> Option<T> {
    raw.get(key).and_then(|value| value.parse::<T>().ok())
}

fn present<'a>(raw: &'a RawParams, key: &str) -> Option<&'a str> {
    raw.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn parse_year(
    raw: &RawParams,
    key: &str,
    policy: FilterPolicy,
    violations: &mut Vec<String>,
) -> Option<i32> {
    let value = present(raw, key)?;
    match value.parse::<i32>() {
        Ok(year) => Some(year),
        Err(_) => {
            if policy == FilterPolicy::Strict {
                violations.push(format!("{} must be an integer", key));
            }
            None
        }
    }
}

/// Checks raw request parameters, collecting every violated rule.
pub fn validate(raw: &RawParams, policy: FilterPolicy) -> Result<QueryParameters, ValidationError> {
    let mut violations = Vec::new();

    let offset = parse_param::<i64>(raw, "offset")
        .and_then(|offset| u64::try_from(offset).ok());
    if offset.is_none() {
        violations.push(OFFSET_VIOLATION.to_string());
    }

    let limit = parse_param::<i64>(raw, "limit")
        .and_then(|limit| u64::try_from(limit).ok())
        .filter(|limit| (1..=MAX_LIMIT).contains(limit));
    if limit.is_none() {
        violations.push(LIMIT_VIOLATION.to_string());
    }

    let published_after = parse_year(raw, "published-after", policy, &mut violations);
    let published_before = parse_year(raw, "published-before", policy, &mut violations);

    let search = present(raw, "search").map(str::to_string);
    let authors = present(raw, "authors")
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    match (offset, limit) {
        (Some(offset), Some(limit)) if violations.is_empty() => Ok(QueryParameters {
            offset,
            limit,
            search,
            authors,
            published_after,
            published_before,
        }),
        _ => Err(ValidationError { violations }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> RawParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_valid_pagination() {
        let parsed = validate(&params(&[("offset", "0"), ("limit", "1000")]), FilterPolicy::Lenient)
            .unwrap();
        assert_eq!(parsed, QueryParameters::page(0, 1000));
    }

    #[test]
    fn test_missing_pagination_reports_both_rules() {
        let err = validate(&RawParams::new(), FilterPolicy::Lenient).unwrap_err();
        assert_eq!(err.violations, vec![OFFSET_VIOLATION, LIMIT_VIOLATION]);
    }

    #[test]
    fn test_negative_offset_and_oversized_limit() {
        let err = validate(&params(&[("offset", "-1"), ("limit", "1001")]), FilterPolicy::Lenient)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed: offset must be a non-negative number, limit must be between 1 and 1000"
        );
    }

    #[test]
    fn test_limit_bounds() {
        for bad in ["0", "-5", "abc", "", "1.5"] {
            let err = validate(&params(&[("offset", "0"), ("limit", bad)]), FilterPolicy::Lenient)
                .unwrap_err();
            assert_eq!(err.violations, vec![LIMIT_VIOLATION], "limit={:?}", bad);
        }
        assert!(validate(&params(&[("offset", "0"), ("limit", "1")]), FilterPolicy::Lenient).is_ok());
    }

    #[test]
    fn test_non_numeric_offset() {
        let err = validate(&params(&[("offset", "ten"), ("limit", "10")]), FilterPolicy::Lenient)
            .unwrap_err();
        assert_eq!(err.violations, vec![OFFSET_VIOLATION]);
    }

    #[test]
    fn test_optional_filters_are_parsed() {
        let parsed = validate(
            &params(&[
                ("offset", "5"),
                ("limit", "10"),
                ("search", "  lord of the rings "),
                ("authors", "a, b,,c"),
                ("published-after", "1950"),
                ("published-before", "1960"),
            ]),
            FilterPolicy::Lenient,
        )
        .unwrap();

        assert_eq!(parsed.search.as_deref(), Some("lord of the rings"));
        assert_eq!(parsed.authors, vec!["a", "b", "c"]);
        assert_eq!(parsed.published_after, Some(1950));
        assert_eq!(parsed.published_before, Some(1960));
    }

    #[test]
    fn test_lenient_policy_drops_malformed_years() {
        let parsed = validate(
            &params(&[
                ("offset", "0"),
                ("limit", "10"),
                ("published-after", "nineteen"),
                ("published-before", "2000x"),
            ]),
            FilterPolicy::Lenient,
        )
        .unwrap();

        assert_eq!(parsed.published_after, None);
        assert_eq!(parsed.published_before, None);
    }

    #[test]
    fn test_strict_policy_reports_malformed_years_with_pagination_errors() {
        let err = validate(
            &params(&[
                ("offset", "-3"),
                ("limit", "10"),
                ("published-after", "nineteen"),
            ]),
            FilterPolicy::Strict,
        )
        .unwrap_err();

        assert_eq!(
            err.violations,
            vec![OFFSET_VIOLATION, "published-after must be an integer"]
        );
    }

    #[test]
    fn test_empty_optional_values_are_absent() {
        let parsed = validate(
            &params(&[
                ("offset", "0"),
                ("limit", "10"),
                ("search", ""),
                ("authors", " , "),
                ("published-after", ""),
            ]),
            FilterPolicy::Strict,
        )
        .unwrap();

        assert_eq!(parsed, QueryParameters::page(0, 10));
    }
}
