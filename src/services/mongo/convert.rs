use mongodb::bson::{Bson, Document};
use serde_json::Value;

use super::StoreError;

/// Render a stored document as JSON for tool output.
///
/// An `ObjectId` primary key becomes its hex string, everything else is
/// relaxed extended JSON.
pub fn document_to_json(mut doc: Document) -> Value {
    let id_hex = match doc.get("_id") {
        Some(Bson::ObjectId(oid)) => Some(oid.to_hex()),
        _ => None,
    };
    if let Some(hex) = id_hex {
        doc.insert("_id", hex);
    }
    Bson::Document(doc).into_relaxed_extjson()
}

/// Parse a JSON object (extended JSON accepted) into a BSON document.
pub fn json_to_document(value: Value) -> Result<Document, StoreError> {
    match Bson::try_from(value) {
        Ok(Bson::Document(doc)) => Ok(doc),
        Ok(other) => Err(StoreError::Conversion(format!(
            "expected a JSON object, got {:?}",
            other.element_type()
        ))),
        Err(e) => Err(StoreError::Conversion(e.to_string())),
    }
}

/// Plain-text rendering of a BSON value, strings without quotes.
pub fn bson_to_display_string(value: &Bson) -> String {
    match value {
        Bson::String(s) => s.clone(),
        Bson::Null | Bson::Undefined => String::new(),
        other => other.clone().into_relaxed_extjson().to_string(),
    }
}

pub fn bson_as_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        Bson::Double(v) if v.fract() == 0.0 => Some(*v as i64),
        _ => None,
    }
}

pub fn bson_as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(v) => Some(*v),
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        _ => None,
    }
}

/// String field of a document, or `default` when missing or not a string.
pub fn str_field_or<'a>(doc: &'a Document, key: &str, default: &'a str) -> &'a str {
    doc.get_str(key).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId};
    use serde_json::json;

    #[test]
    fn object_id_is_rendered_as_hex() {
        let oid = ObjectId::new();
        let out = document_to_json(doc! { "_id": oid, "title": "a", "n": 3 });
        assert_eq!(out["_id"], json!(oid.to_hex()));
        assert_eq!(out["title"], json!("a"));
        assert_eq!(out["n"], json!(3));
    }

    #[test]
    fn json_objects_round_into_documents() {
        let doc = json_to_document(json!({"title": "x", "tags": ["a", "b"], "n": 1})).unwrap();
        assert_eq!(doc.get_str("title").unwrap(), "x");
        assert_eq!(doc.get_array("tags").unwrap().len(), 2);
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(matches!(
            json_to_document(json!([1, 2])),
            Err(StoreError::Conversion(_))
        ));
        assert!(json_to_document(json!("text")).is_err());
    }

    #[test]
    fn display_strings_and_numbers() {
        assert_eq!(bson_to_display_string(&Bson::String("hi".into())), "hi");
        assert_eq!(bson_to_display_string(&Bson::Null), "");
        assert_eq!(bson_to_display_string(&Bson::Int32(4)), "4");
        assert_eq!(bson_as_i64(&Bson::Double(3.0)), Some(3));
        assert_eq!(bson_as_i64(&Bson::Double(3.5)), None);
        assert_eq!(bson_as_f64(&Bson::Int64(2)), Some(2.0));
    }
}
