use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored record: a generated id plus an open set of JSON fields.
///
/// Serializes flat, e.g. `{"id": 1718000000000, "label": "cat", "value": "3"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: i64, fields: Map<String, Value>) -> Self {
        Self {
            id,
            fields: strip_id(fields),
        }
    }

    /// Shallow merge: every key in `partial` overwrites, everything else is kept.
    /// The id never changes.
    pub fn merge(&mut self, partial: Map<String, Value>) {
        for (key, value) in strip_id(partial) {
            self.fields.insert(key, value);
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// Turn an arbitrary request body into a field map.
/// Objects are taken verbatim; any other JSON shape contributes no fields.
pub fn fields_from_value(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn strip_id(mut fields: Map<String, Value>) -> Map<String, Value> {
    fields.remove("id");
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_flat() {
        let record = Record::new(7, fields_from_value(json!({"label": "cat", "value": "3"})));
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"id": 7, "label": "cat", "value": "3"})
        );
    }

    #[test]
    fn test_merge_keeps_unspecified_fields() {
        let mut record = Record::new(1, fields_from_value(json!({"label": "cat", "value": "3"})));
        record.merge(fields_from_value(json!({"label": "dog", "extra": [1, 2]})));

        assert_eq!(record.get("label"), Some(&json!("dog")));
        assert_eq!(record.get("value"), Some(&json!("3")));
        assert_eq!(record.get("extra"), Some(&json!([1, 2])));
    }

    #[test]
    fn test_caller_cannot_replace_id() {
        let mut record = Record::new(1, fields_from_value(json!({"id": 99, "label": "x"})));
        assert_eq!(record.id, 1);
        assert!(record.get("id").is_none());

        record.merge(fields_from_value(json!({"id": 42})));
        assert_eq!(record.id, 1);
        assert_eq!(serde_json::to_value(&record).unwrap(), json!({"id": 1, "label": "x"}));
    }

    #[test]
    fn test_non_object_body_has_no_fields() {
        assert!(fields_from_value(json!([1, 2, 3])).is_empty());
        assert!(fields_from_value(json!("text")).is_empty());
        assert!(fields_from_value(Value::Null).is_empty());
    }
}
