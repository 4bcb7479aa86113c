//! Search predicate expression tree and its builder.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr};

use super::{normalize_query, QueryError};

/// A composable, side-effect free filter description.
///
/// Predicates only describe a filter; running one is the job of
/// [`Predicate::matches`] (in memory) or [`Predicate::to_sql`] (SQL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// The field contains the term, ignoring case.
    FieldContains { field: String, term: String },
    /// Both sides match.
    And(Box<Predicate>, Box<Predicate>),
    /// Either side matches.
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    /// Case-insensitive substring match of `term` within `field`.
    pub fn contains(field: impl Into<String>, term: impl Into<String>) -> Self {
        Predicate::FieldContains {
            field: field.into(),
            term: term.into(),
        }
    }

    /// Both `self` and `other` must match. Same as `self & other`.
    pub fn and(self, other: Predicate) -> Self {
        Predicate::And(Box::new(self), Box::new(other))
    }

    /// Either `self` or `other` must match. Same as `self | other`.
    pub fn or(self, other: Predicate) -> Self {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    /// Number of `FieldContains` leaves.
    pub fn leaf_count(&self) -> usize {
        match self {
            Predicate::FieldContains { .. } => 1,
            Predicate::And(left, right) | Predicate::Or(left, right) => {
                left.leaf_count() + right.leaf_count()
            }
        }
    }

    /// Distinct field names referenced by the predicate, in first-seen order.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Predicate::FieldContains { field, .. } => {
                if !out.contains(&field.as_str()) {
                    out.push(field);
                }
            }
            Predicate::And(left, right) | Predicate::Or(left, right) => {
                left.collect_fields(out);
                right.collect_fields(out);
            }
        }
    }

    fn write_operand(&self, f: &mut fmt::Formatter<'_>, parent_is_and: bool) -> fmt::Result {
        match self {
            Predicate::Or(..) if parent_is_and => write!(f, "({})", self),
            _ => write!(f, "{}", self),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::FieldContains { field, term } => write!(f, "{} CONTAINS {:?}", field, term),
            Predicate::And(left, right) => {
                left.write_operand(f, true)?;
                f.write_str(" AND ")?;
                right.write_operand(f, true)
            }
            Predicate::Or(left, right) => {
                left.write_operand(f, false)?;
                f.write_str(" OR ")?;
                right.write_operand(f, false)
            }
        }
    }
}

impl BitAnd for Predicate {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl BitOr for Predicate {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

/// Combine search terms and fields into one predicate.
///
/// Each term becomes an OR over all `fields`; the per-term predicates are
/// AND-ed together in term order. Returns `Ok(None)` when there is nothing to
/// search for. Empty-string terms are skipped since they would match
/// everything.
///
/// # Errors
///
/// [`QueryError::NoSearchFields`] when `terms` is non-empty but `fields` is
/// empty, even if every term is an empty string.
pub fn build_predicate<S, F>(terms: &[S], fields: &[F]) -> Result<Option<Predicate>, QueryError>
where
    S: AsRef<str>,
    F: AsRef<str>,
{
    let Some((first_field, other_fields)) = fields.split_first() else {
        if terms.is_empty() {
            return Ok(None);
        }
        return Err(QueryError::NoSearchFields { terms: terms.len() });
    };

    let predicate = terms
        .iter()
        .map(|term| term.as_ref())
        .filter(|term| !term.is_empty())
        .map(|term| {
            other_fields.iter().fold(
                Predicate::contains(first_field.as_ref(), term),
                |acc, field| acc | Predicate::contains(field.as_ref(), term),
            )
        })
        .reduce(Predicate::and);

    Ok(predicate)
}

/// Normalize `query` and build the predicate searching `fields` for it.
///
/// ```
/// use listing_search::query::get_query;
///
/// let predicate = get_query("oak desk", &["title", "text"]).unwrap().unwrap();
/// assert_eq!(
///     predicate.to_string(),
///     r#"(title CONTAINS "oak" OR text CONTAINS "oak") AND (title CONTAINS "desk" OR text CONTAINS "desk")"#
/// );
/// ```
pub fn get_query<F: AsRef<str>>(query: &str, fields: &[F]) -> Result<Option<Predicate>, QueryError> {
    let terms = normalize_query(query);
    tracing::trace!(?terms, "normalized search query");
    build_predicate(&terms, fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: [&str; 2] = ["title", "body"];

    fn either(term: &str) -> Predicate {
        Predicate::contains("title", term) | Predicate::contains("body", term)
    }

    #[test]
    fn test_no_terms() {
        let terms: [&str; 0] = [];
        assert_eq!(build_predicate(&terms, &FIELDS).unwrap(), None);
    }

    #[test]
    fn test_no_terms_no_fields() {
        let terms: [&str; 0] = [];
        let fields: [&str; 0] = [];
        assert_eq!(build_predicate(&terms, &fields).unwrap(), None);
    }

    #[test]
    fn test_single_term() {
        let predicate = build_predicate(&["x"], &FIELDS).unwrap().unwrap();
        assert_eq!(predicate, either("x"));
        assert_eq!(
            predicate.to_string(),
            r#"title CONTAINS "x" OR body CONTAINS "x""#
        );
    }

    #[test]
    fn test_two_terms() {
        let predicate = build_predicate(&["x", "y"], &FIELDS).unwrap().unwrap();
        assert_eq!(predicate, Predicate::And(Box::new(either("x")), Box::new(either("y"))));
        assert_eq!(
            predicate.to_string(),
            r#"(title CONTAINS "x" OR body CONTAINS "x") AND (title CONTAINS "y" OR body CONTAINS "y")"#
        );
    }

    #[test]
    fn test_terms_fold_left() {
        let predicate = build_predicate(&["a", "b", "c"], &["title"]).unwrap().unwrap();
        let expected = Predicate::contains("title", "a")
            .and(Predicate::contains("title", "b"))
            .and(Predicate::contains("title", "c"));
        assert_eq!(predicate, expected);
    }

    #[test]
    fn test_fields_fold_left() {
        let predicate = build_predicate(&["x"], &["a", "b", "c"]).unwrap().unwrap();
        let expected = Predicate::contains("a", "x")
            .or(Predicate::contains("b", "x"))
            .or(Predicate::contains("c", "x"));
        assert_eq!(predicate, expected);
        assert_eq!(predicate.leaf_count(), 3);
    }

    #[test]
    fn test_no_fields_is_an_error() {
        let fields: [&str; 0] = [];
        let err = build_predicate(&["x"], &fields).unwrap_err();
        assert_eq!(err, QueryError::NoSearchFields { terms: 1 });
    }

    #[test]
    fn test_empty_terms_without_fields_is_an_error() {
        let fields: [&str; 0] = [];
        assert_eq!(
            build_predicate(&[""], &fields),
            Err(QueryError::NoSearchFields { terms: 1 })
        );
        assert_eq!(
            build_predicate(&["", "  "], &fields),
            Err(QueryError::NoSearchFields { terms: 2 })
        );
    }

    #[test]
    fn test_empty_terms_are_skipped() {
        assert_eq!(build_predicate(&["", ""], &FIELDS).unwrap(), None);
        assert_eq!(build_predicate(&["", "x"], &FIELDS).unwrap(), Some(either("x")));
    }

    #[test]
    fn test_get_query() {
        let predicate = get_query(r#"  "red  chair"  "#, &FIELDS).unwrap().unwrap();
        assert_eq!(predicate, either("red chair"));
        assert_eq!(get_query("   ", &FIELDS).unwrap(), None);
    }

    #[test]
    fn test_fields_listing() {
        let predicate = build_predicate(&["x", "y"], &["title", "text", "title"])
            .unwrap()
            .unwrap();
        assert_eq!(predicate.fields(), vec!["title", "text"]);
    }

    #[test]
    fn test_display_escapes_quotes() {
        let predicate = Predicate::contains("title", r#"12" pipe"#);
        assert_eq!(predicate.to_string(), r#"title CONTAINS "12\" pipe""#);
    }

    #[test]
    fn test_json_shape() {
        let predicate = either("x");
        let json = serde_json::to_value(&predicate).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "or": [
                    {"field_contains": {"field": "title", "term": "x"}},
                    {"field_contains": {"field": "body", "term": "x"}}
                ]
            })
        );
        let back: Predicate = serde_json::from_value(json).unwrap();
        assert_eq!(back, predicate);
    }
}
