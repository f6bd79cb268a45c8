//! Structured field-equality selectors.
//!
//! A [`Selector`] is built from typed `(field, value)` pairs and is only ever
//! turned into query text by serializing it. Values are escaped on the way
//! out, so no caller-provided value can add, remove, or rename selector
//! clauses.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

/// Conjunction of field equalities, e.g. `docType == "aCert" AND
/// studentID == "SWE1904873"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selector {
    fields: BTreeMap<String, Value>,
}

#[derive(Serialize)]
struct QueryDocument<'a> {
    selector: &'a Selector,
}

impl Selector {
    /// An empty selector. It matches every JSON object document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal the string `value`.
    ///
    /// Adding the same field twice keeps the last value.
    pub fn equals(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), Value::String(value.into()));
        self
    }

    /// Number of equality clauses.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The clauses in field-name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Expected value for `field`, if constrained.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Render as a rich-query document: `{"selector":{...}}`.
    pub fn to_query_string(&self) -> StoreResult<String> {
        serde_json::to_string(&QueryDocument { selector: self })
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Evaluate against an already-parsed document.
    pub fn matches_document(&self, document: &Value) -> bool {
        let Some(object) = document.as_object() else {
            return false;
        };
        self.fields
            .iter()
            .all(|(field, expected)| object.get(field) == Some(expected))
    }

    /// Evaluate against a stored value. Values that are not JSON never
    /// match.
    pub fn matches(&self, bytes: &[u8]) -> bool {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(document) => self.matches_document(&document),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn by_student(student: &str) -> Selector {
        Selector::new().equals("docType", "aCert").equals("studentID", student)
    }

    #[test]
    fn renders_rich_query_document() {
        let query = by_student("SWE1904873").to_query_string().unwrap();
        assert_eq!(
            query,
            r#"{"selector":{"docType":"aCert","studentID":"SWE1904873"}}"#
        );
    }

    #[test]
    fn hostile_value_cannot_change_structure() {
        let hostile = r#"x","docType":"cCert"#;
        let selector = by_student(hostile);
        let query = selector.to_query_string().unwrap();

        let parsed: Value = serde_json::from_str(&query).unwrap();
        let clauses = parsed["selector"].as_object().unwrap();
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses["docType"], "aCert");
        assert_eq!(clauses["studentID"], hostile);
    }

    #[test]
    fn operator_lookalike_stays_a_literal() {
        let selector = by_student(r#"{"$gt":null}"#);
        let doc = json!({"docType": "aCert", "studentID": "anyone"});
        assert!(!selector.matches_document(&doc));
        let query = selector.to_query_string().unwrap();
        let parsed: Value = serde_json::from_str(&query).unwrap();
        assert!(parsed["selector"]["studentID"].is_string());
    }

    #[test]
    fn matches_requires_every_field() {
        let selector = by_student("S1");
        assert!(selector.matches_document(&json!({
            "docType": "aCert", "studentID": "S1", "certID": "a"
        })));
        assert!(!selector.matches_document(&json!({"docType": "aCert"})));
        assert!(!selector.matches_document(&json!({
            "docType": "cCert", "studentID": "S1"
        })));
    }

    #[test]
    fn non_object_documents_never_match() {
        let selector = Selector::new();
        assert!(!selector.matches_document(&json!([1, 2])));
        assert!(!selector.matches(b"\x00\x01binary"));
        assert!(selector.matches(br#"{"any":"thing"}"#));
    }

    #[test]
    fn repeated_field_keeps_last_value() {
        let selector = Selector::new().equals("studentID", "a").equals("studentID", "b");
        assert_eq!(selector.len(), 1);
        assert_eq!(selector.get("studentID"), Some(&json!("b")));
    }

    #[test]
    fn fields_are_ordered_by_name() {
        let selector = Selector::new().equals("studentID", "s").equals("docType", "cCert");
        let names: Vec<&str> = selector.fields().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["docType", "studentID"]);
    }
}
