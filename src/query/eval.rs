//! In-memory evaluation of search predicates.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use super::Predicate;

/// A record whose fields can be searched by name.
pub trait Searchable {
    /// Text value of `field`, or `None` if the record has no such field.
    fn field_value(&self, field: &str) -> Option<Cow<'_, str>>;
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        (**self).field_value(field)
    }
}

impl Searchable for HashMap<String, String> {
    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        self.get(field).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl Searchable for BTreeMap<String, String> {
    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        self.get(field).map(|v| Cow::Borrowed(v.as_str()))
    }
}

/// JSON objects: strings as-is, numbers and booleans through their JSON text.
/// Nulls, arrays and nested objects are not searchable.
impl Searchable for serde_json::Value {
    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match self.get(field)? {
            serde_json::Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            serde_json::Value::Number(n) => Some(Cow::Owned(n.to_string())),
            serde_json::Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            _ => None,
        }
    }
}

impl Predicate {
    /// Evaluate the predicate against `record`.
    ///
    /// `FieldContains` compares lowercased text, so `"Bike"` finds `"mountain BIKE"`.
    /// A field the record does not have never matches.
    pub fn matches<R: Searchable + ?Sized>(&self, record: &R) -> bool {
        match self {
            Predicate::FieldContains { field, term } => record
                .field_value(field)
                .is_some_and(|value| contains_ignore_case(&value, term)),
            Predicate::And(left, right) => left.matches(record) && right.matches(record),
            Predicate::Or(left, right) => left.matches(record) || right.matches(record),
        }
    }
}

/// Keep the records matching `predicate`; `None` keeps everything.
pub fn filter_records<'a, R: Searchable>(
    predicate: Option<&Predicate>,
    records: &'a [R],
) -> Vec<&'a R> {
    records
        .iter()
        .filter(|record| predicate.map_or(true, |p| p.matches(*record)))
        .collect()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{build_predicate, get_query};
    use serde_json::json;

    fn record(title: &str, body: &str) -> HashMap<String, String> {
        HashMap::from([
            ("title".to_string(), title.to_string()),
            ("body".to_string(), body.to_string()),
        ])
    }

    #[test]
    fn test_contains_ignores_case() {
        let p = Predicate::contains("title", "bike");
        assert!(p.matches(&record("Mountain BIKE", "")));
        assert!(!p.matches(&record("Road cycle", "bike")));
    }

    #[test]
    fn test_unicode_case_folding() {
        let p = Predicate::contains("title", "ÉTÉ");
        assert!(p.matches(&record("robe d'été", "")));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let p = Predicate::contains("price", "1");
        assert!(!p.matches(&record("1", "1")));
    }

    #[test]
    fn test_and_of_ors() {
        let p = get_query("oak desk", &["title", "body"]).unwrap().unwrap();
        assert!(p.matches(&record("Oak desk", "")));
        assert!(p.matches(&record("Desk", "solid oak")));
        assert!(!p.matches(&record("Oak table", "pine")));
    }

    #[test]
    fn test_phrase_must_match_whole() {
        let p = get_query(r#""red chair""#, &["title", "body"]).unwrap().unwrap();
        assert!(p.matches(&record("Big red chair", "")));
        assert!(!p.matches(&record("Red leather chair", "")));
    }

    #[test]
    fn test_empty_record_never_matches() {
        let p = build_predicate(&["a", "b"], &["title", "body"]).unwrap().unwrap();
        assert!(!p.matches(&record("", "")));
    }

    #[test]
    fn test_json_record() {
        let listing = json!({"title": "Lamp", "price": 15, "sold": false, "tags": ["x"]});
        assert!(Predicate::contains("title", "lam").matches(&listing));
        assert!(Predicate::contains("price", "15").matches(&listing));
        assert!(Predicate::contains("sold", "FALSE").matches(&listing));
        assert!(!Predicate::contains("tags", "x").matches(&listing));
        assert!(!Predicate::contains("title", "lam").matches(&json!(["Lamp"])));
    }

    #[test]
    fn test_filter_records() {
        let records = vec![record("Oak desk", ""), record("Pine shelf", ""), record("Oak shelf", "")];
        let p = get_query("oak", &["title"]).unwrap();
        let hits = filter_records(p.as_ref(), &records);
        assert_eq!(hits.len(), 2);

        let all = filter_records(None, &records);
        assert_eq!(all.len(), 3);
    }
}
