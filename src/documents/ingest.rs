use chrono::{DateTime, SecondsFormat, Utc};
use mongodb::bson::{doc, Bson, Document};
use serde_json::Value;

use crate::services::mongo::json_to_document;

pub const UNTITLED: &str = "Untitled Document";

/// Caller input split into stored fields and the text used for search.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInput {
    pub fields: Document,
    pub searchable_text: String,
}

/// Interpret `raw` as a JSON object, or as plain text when it is anything else.
pub fn parse_document_input(raw: &str) -> ParsedInput {
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(raw) {
        let pretty = serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string());
        if let Ok(fields) = json_to_document(value) {
            return ParsedInput {
                fields,
                searchable_text: pretty,
            };
        }
    }
    ParsedInput {
        fields: doc! { "content": raw },
        searchable_text: raw.to_string(),
    }
}

/// Build the document written by the store operation.
///
/// An explicit `title` wins, then a string `title` already in the input,
/// then [`UNTITLED`].
pub fn prepare_document(raw: &str, title: Option<&str>, now: DateTime<Utc>) -> Document {
    let ParsedInput {
        mut fields,
        searchable_text,
    } = parse_document_input(raw);

    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| fields.get_str("title").ok().map(str::to_string))
        .unwrap_or_else(|| UNTITLED.to_string());

    let content_type = match fields.get("content") {
        Some(Bson::Document(_)) => "json",
        _ => "text",
    };

    fields.insert("timestamp", now.to_rfc3339_opts(SecondsFormat::Micros, true));
    fields.insert("title", title);
    fields.insert("indexed_for_search", true);
    fields.insert("content_type", content_type);
    fields.insert("searchable_text", searchable_text);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 2, 14, 30, 0).unwrap()
    }

    #[test]
    fn plain_text_becomes_content() {
        let parsed = parse_document_input("just some notes");
        assert_eq!(parsed.fields, doc! { "content": "just some notes" });
        assert_eq!(parsed.searchable_text, "just some notes");
    }

    #[test]
    fn non_object_json_is_treated_as_text() {
        let parsed = parse_document_input("[1, 2, 3]");
        assert_eq!(parsed.fields.get_str("content").unwrap(), "[1, 2, 3]");
    }

    #[test]
    fn json_objects_keep_their_fields() {
        let parsed = parse_document_input(r#"{"category":"research","score":3}"#);
        assert_eq!(parsed.fields.get_str("category").unwrap(), "research");
        assert!(parsed.searchable_text.contains("\"category\": \"research\""));
    }

    #[test]
    fn prepared_documents_are_stamped() {
        let doc = prepare_document("hello", None, fixed_now());
        assert_eq!(doc.get_str("title").unwrap(), UNTITLED);
        assert_eq!(doc.get_str("content_type").unwrap(), "text");
        assert!(doc.get_bool("indexed_for_search").unwrap());
        assert_eq!(doc.get_str("searchable_text").unwrap(), "hello");
        assert!(doc.get_str("timestamp").unwrap().starts_with("2025-08-02T14:30:00"));
    }

    #[test]
    fn title_precedence() {
        let raw = r#"{"title":"From input","content":{"mood":"calm"}}"#;
        let doc = prepare_document(raw, None, fixed_now());
        assert_eq!(doc.get_str("title").unwrap(), "From input");
        assert_eq!(doc.get_str("content_type").unwrap(), "json");

        let doc = prepare_document(raw, Some("Explicit"), fixed_now());
        assert_eq!(doc.get_str("title").unwrap(), "Explicit");

        let doc = prepare_document(raw, Some("   "), fixed_now());
        assert_eq!(doc.get_str("title").unwrap(), "From input");
    }
}
