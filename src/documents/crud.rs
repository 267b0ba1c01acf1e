use std::str::FromStr;

use mongodb::bson::{Bson, Document};
use serde_json::Value;

use super::DocumentError;
use crate::services::mongo::{bson_to_display_string, json_to_document};

/// Write modes accepted by the write tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteOperation {
    #[default]
    Insert,
    Update,
    Upsert,
}

impl FromStr for WriteOperation {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "insert" => Ok(WriteOperation::Insert),
            "update" => Ok(WriteOperation::Update),
            "upsert" => Ok(WriteOperation::Upsert),
            _ => Err(DocumentError::UnsupportedOperation(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertPayload {
    One(Document),
    Many(Vec<Document>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePayload {
    pub filter: Document,
    pub update: Document,
}

pub fn parse_json(raw: &str) -> Result<Value, DocumentError> {
    Ok(serde_json::from_str(raw)?)
}

/// Parse a query filter, blank input meaning "match everything".
pub fn parse_filter(raw: &str) -> Result<Document, DocumentError> {
    if raw.trim().is_empty() {
        return Ok(Document::new());
    }
    match parse_json(raw)? {
        value @ Value::Object(_) => object_to_document(value),
        _ => Err(DocumentError::InvalidJson(
            "query must be a JSON object".into(),
        )),
    }
}

pub fn parse_insert_payload(value: Value) -> Result<InsertPayload, DocumentError> {
    match value {
        value @ Value::Object(_) => Ok(InsertPayload::One(object_to_document(value)?)),
        Value::Array(items) if !items.is_empty() => {
            let docs = items
                .into_iter()
                .map(|item| match item {
                    item @ Value::Object(_) => object_to_document(item),
                    _ => Err(DocumentError::InvalidJson(
                        "every inserted element must be a JSON object".into(),
                    )),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(InsertPayload::Many(docs))
        }
        _ => Err(DocumentError::InvalidJson(
            "insert expects a JSON object or a non-empty array of objects".into(),
        )),
    }
}

/// Extract `filter` and `update` from an update/upsert payload.
pub fn parse_update_payload(value: Value) -> Result<UpdatePayload, DocumentError> {
    let Value::Object(mut map) = value else {
        return Err(DocumentError::InvalidUpdatePayload);
    };
    match (map.remove("filter"), map.remove("update")) {
        (Some(filter @ Value::Object(_)), Some(update @ Value::Object(_))) => Ok(UpdatePayload {
            filter: object_to_document(filter)?,
            update: object_to_document(update)?,
        }),
        _ => Err(DocumentError::InvalidUpdatePayload),
    }
}

pub fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        other => bson_to_display_string(other),
    }
}

fn object_to_document(value: Value) -> Result<Document, DocumentError> {
    json_to_document(value).map_err(|e| DocumentError::InvalidJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId};
    use serde_json::json;

    #[test]
    fn operations_parse_case_insensitively() {
        assert_eq!("insert".parse::<WriteOperation>().unwrap(), WriteOperation::Insert);
        assert_eq!(" Update ".parse::<WriteOperation>().unwrap(), WriteOperation::Update);
        assert_eq!("UPSERT".parse::<WriteOperation>().unwrap(), WriteOperation::Upsert);
        assert_eq!("".parse::<WriteOperation>().unwrap(), WriteOperation::Insert);

        let err = "invalid_op".parse::<WriteOperation>().unwrap_err();
        assert!(err.to_string().contains("Unsupported operation"));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = parse_json("invalid json string").unwrap_err();
        assert!(matches!(err, DocumentError::InvalidJson(_)));
        assert!(err.to_string().starts_with("Invalid JSON"));
        assert!(parse_filter("invalid query").unwrap_err().to_string().contains("Invalid JSON"));
    }

    #[test]
    fn filters_must_be_objects() {
        assert_eq!(parse_filter("  ").unwrap(), Document::new());
        assert_eq!(parse_filter("{}").unwrap(), Document::new());
        assert_eq!(
            parse_filter(r#"{"category": "research"}"#).unwrap(),
            doc! { "category": "research" }
        );
        assert!(parse_filter("[1]").is_err());
    }

    #[test]
    fn update_payload_requires_both_keys() {
        let err = parse_update_payload(json!({"data": "test"})).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidUpdatePayload));
        assert!(err.to_string().contains("must contain 'filter' and 'update'"));

        assert!(parse_update_payload(json!({"filter": {}, "update": "x"})).is_err());
        assert!(parse_update_payload(json!("x")).is_err());

        let payload = parse_update_payload(json!({
            "filter": {"test_id": "sample_doc_001"},
            "update": {"$set": {"status": "reviewed"}}
        }))
        .unwrap();
        assert_eq!(payload.filter, doc! { "test_id": "sample_doc_001" });
        assert_eq!(payload.update, doc! { "$set": { "status": "reviewed" } });
    }

    #[test]
    fn insert_payload_accepts_objects_and_arrays() {
        assert!(matches!(
            parse_insert_payload(json!({"a": 1})).unwrap(),
            InsertPayload::One(_)
        ));
        match parse_insert_payload(json!([{"a": 1}, {"b": 2}])).unwrap() {
            InsertPayload::Many(docs) => assert_eq!(docs.len(), 2),
            other => panic!("unexpected payload {other:?}"),
        }
        assert!(parse_insert_payload(json!([])).is_err());
        assert!(parse_insert_payload(json!([{"a": 1}, 2])).is_err());
        assert!(parse_insert_payload(json!(5)).is_err());
    }

    #[test]
    fn ids_render_as_hex_or_text() {
        let oid = ObjectId::new();
        assert_eq!(id_to_string(&Bson::ObjectId(oid)), oid.to_hex());
        assert_eq!(id_to_string(&Bson::String("custom".into())), "custom");
    }
}
