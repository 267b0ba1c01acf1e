use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    Collection,
};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{
    analysis::{build_collection_summary, build_trend_report, trend_pipeline},
    crud::{
        id_to_string, parse_filter, parse_insert_payload, parse_json, parse_update_payload,
        InsertPayload, WriteOperation,
    },
    ingest::{prepare_document, UNTITLED},
    models::{
        ContextQueryReport, RagResponse, SearchReport, SimilarityReport, StoreReceipt,
        SummaryReport, TrendReport, WriteOutcome,
    },
    retrieval::{
        build_context_report, build_rag_response, build_search_report, build_similarity_report,
        context_pipeline, rerank, text_filter, text_score,
    },
    text::{leading_keywords, KeyTerms},
    DocumentError,
};
use crate::services::mongo::{document_to_json, MongoStore};

const SIMILAR_KEYWORDS: usize = 10;
const SIMILAR_LIMIT: i64 = 10;

/// The driver reads a limit of 0 as "no limit".
fn at_least_one(limit: u32) -> u32 {
    limit.max(1)
}

/// Document access operations over one MongoDB database.
///
/// Every operation is a single round trip, plus the idempotent text index
/// ensure for the search-backed ones.
#[derive(Debug, Clone)]
pub struct DocumentService {
    store: MongoStore,
}

impl DocumentService {
    pub fn new(store: MongoStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &MongoStore {
        &self.store
    }

    fn collection(&self, name: &str) -> Result<Collection<Document>, DocumentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DocumentError::InvalidArgument(
                "collection name must not be empty".into(),
            ));
        }
        Ok(self.store.collection(name))
    }

    async fn searchable(&self, name: &str) -> Result<Collection<Document>, DocumentError> {
        let collection = self.collection(name)?;
        self.store.ensure_text_index(&collection).await;
        Ok(collection)
    }

    /// `$text` search sorted by score, best first.
    async fn text_search(
        &self,
        collection: &Collection<Document>,
        search: &str,
        limit: i64,
    ) -> Result<Vec<Document>, DocumentError> {
        let cursor = collection
            .find(text_filter(search))
            .projection(text_score())
            .sort(text_score())
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Store `document` with search metadata.
    ///
    /// The stored title is `title` when given, else a string `title` field of
    /// the input JSON object, else `"Untitled Document"`.
    #[instrument(level = "debug", skip(self, document))]
    pub async fn store_document(
        &self,
        collection: &str,
        document: &str,
        title: Option<&str>,
    ) -> Result<StoreReceipt, DocumentError> {
        let coll = self.searchable(collection).await?;
        let prepared = prepare_document(document, title, Utc::now());
        let title = prepared
            .get_str("title")
            .unwrap_or(UNTITLED)
            .to_string();

        let inserted = coll.insert_one(prepared).await?;
        let id = id_to_string(&inserted.inserted_id);
        debug!(%id, collection, "document stored");

        Ok(StoreReceipt {
            id,
            collection: collection.to_string(),
            title,
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn semantic_search(
        &self,
        query: &str,
        collection: &str,
        limit: u32,
    ) -> Result<SearchReport, DocumentError> {
        let coll = self.searchable(collection).await?;
        let docs = self
            .text_search(&coll, query, i64::from(at_least_one(limit)))
            .await?;
        Ok(build_search_report(query, collection, docs))
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn query_with_context(
        &self,
        collection: &str,
        query: &str,
        context_limit: u32,
    ) -> Result<ContextQueryReport, DocumentError> {
        let coll = self.searchable(collection).await?;
        let cursor = coll
            .aggregate(context_pipeline(query, i64::from(at_least_one(context_limit))))
            .await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(build_context_report(query, docs))
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn summarize_collection(
        &self,
        collection: &str,
        max_docs: u32,
    ) -> Result<SummaryReport, DocumentError> {
        let coll = self.collection(collection)?;
        let total = coll.count_documents(doc! {}).await?;
        if total == 0 {
            return Ok(build_collection_summary(collection, 0, &[]));
        }

        let sample: Vec<Document> = coll
            .find(doc! {})
            .limit(i64::from(at_least_one(max_docs)))
            .await?
            .try_collect()
            .await?;
        Ok(build_collection_summary(collection, total, &sample))
    }

    #[instrument(level = "debug", skip(self, reference_text))]
    pub async fn find_similar(
        &self,
        collection: &str,
        reference_text: &str,
        similarity_threshold: f64,
    ) -> Result<SimilarityReport, DocumentError> {
        let keywords = leading_keywords(reference_text, SIMILAR_KEYWORDS);
        if keywords.is_empty() {
            return Ok(build_similarity_report(
                reference_text,
                similarity_threshold,
                keywords,
                Vec::new(),
            ));
        }

        let coll = self.searchable(collection).await?;
        let docs = self
            .text_search(&coll, &keywords.join(" "), SIMILAR_LIMIT)
            .await?;
        Ok(build_similarity_report(
            reference_text,
            similarity_threshold,
            keywords,
            docs,
        ))
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn analyze_trends(
        &self,
        collection: &str,
        time_field: &str,
    ) -> Result<TrendReport, DocumentError> {
        let time_field = time_field.trim();
        if time_field.is_empty() || time_field.starts_with('$') {
            return Err(DocumentError::InvalidArgument(format!(
                "'{time_field}' is not a usable time field"
            )));
        }

        let coll = self.collection(collection)?;
        let rows: Vec<Document> = coll
            .aggregate(trend_pipeline(time_field))
            .await?
            .try_collect()
            .await?;
        let total = coll.count_documents(doc! {}).await?;
        Ok(build_trend_report(collection, total, &rows))
    }

    /// Retrieval for answer generation: text search on the query and
    /// conversation terms, re-ranked by term overlap.
    #[instrument(level = "debug", skip(self, conversation_context))]
    pub async fn semantic_query_with_context(
        &self,
        query: &str,
        collection: &str,
        conversation_context: &str,
        limit: u32,
    ) -> Result<RagResponse, DocumentError> {
        let limit = at_least_one(limit);
        let terms = KeyTerms::extract(query, conversation_context);
        if terms.is_empty() {
            debug!("no usable search terms");
            return Ok(build_rag_response(query, conversation_context, &terms, Vec::new()));
        }

        let coll = self.searchable(collection).await?;
        let docs = self
            .text_search(&coll, &terms.search_string(), i64::from(limit) * 2)
            .await?;
        let ranked = rerank(docs, &terms, limit as usize);
        Ok(build_rag_response(query, conversation_context, &terms, ranked))
    }

    /// Insert, update or upsert from a JSON payload.
    ///
    /// Payload validation happens before any database call.
    #[instrument(level = "debug", skip(self, data))]
    pub async fn write(
        &self,
        collection: &str,
        data: &str,
        operation: &str,
    ) -> Result<WriteOutcome, DocumentError> {
        let operation: WriteOperation = operation.parse()?;
        let value = parse_json(data)?;

        match operation {
            WriteOperation::Insert => {
                let payload = parse_insert_payload(value)?;
                let coll = self.collection(collection)?;
                match payload {
                    InsertPayload::One(doc) => {
                        let inserted = coll.insert_one(doc).await?;
                        Ok(WriteOutcome::Inserted {
                            id: id_to_string(&inserted.inserted_id),
                        })
                    }
                    InsertPayload::Many(docs) => {
                        let inserted = coll.insert_many(docs).await?;
                        let mut ids: Vec<_> = inserted.inserted_ids.into_iter().collect();
                        ids.sort_by_key(|(idx, _)| *idx);
                        Ok(WriteOutcome::InsertedMany {
                            ids: ids.iter().map(|(_, id)| id_to_string(id)).collect(),
                        })
                    }
                }
            }
            WriteOperation::Update => {
                let payload = parse_update_payload(value)?;
                let coll = self.collection(collection)?;
                let result = coll.update_many(payload.filter, payload.update).await?;
                Ok(WriteOutcome::Updated {
                    matched: result.matched_count,
                    modified: result.modified_count,
                })
            }
            WriteOperation::Upsert => {
                let payload = parse_update_payload(value)?;
                let coll = self.collection(collection)?;
                let result = coll
                    .update_one(payload.filter, payload.update)
                    .upsert(true)
                    .await?;
                Ok(WriteOutcome::Upserted {
                    id: result.upserted_id.as_ref().map(id_to_string),
                    matched: result.matched_count,
                    modified: result.modified_count,
                })
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn read(
        &self,
        collection: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Value>, DocumentError> {
        let filter = parse_filter(query)?;
        let coll = self.collection(collection)?;
        let docs: Vec<Document> = coll
            .find(filter)
            .limit(i64::from(at_least_one(limit)))
            .await?
            .try_collect()
            .await?;
        Ok(docs.into_iter().map(document_to_json).collect())
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn count(&self, collection: &str, query: &str) -> Result<u64, DocumentError> {
        let filter = parse_filter(query)?;
        let coll = self.collection(collection)?;
        Ok(coll.count_documents(filter).await?)
    }

    /// Delete every document matching `query`; an empty filter is refused.
    #[instrument(level = "debug", skip(self))]
    pub async fn delete(&self, collection: &str, query: &str) -> Result<u64, DocumentError> {
        let filter = parse_filter(query)?;
        if filter.is_empty() {
            return Err(DocumentError::EmptyDeleteFilter);
        }
        let coll = self.collection(collection)?;
        let result = coll.delete_many(filter).await?;
        debug!(deleted = result.deleted_count, collection, "documents deleted");
        Ok(result.deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mongo::StoreConfig;

    // Each case returns before the first round trip, so no server is needed.
    async fn offline() -> DocumentService {
        DocumentService::new(MongoStore::lazy(StoreConfig::default()).await.unwrap())
    }

    #[tokio::test]
    async fn rag_query_without_usable_terms_is_empty() {
        let service = offline().await;

        let response = service
            .semantic_query_with_context("a an to", "notes", "", 5)
            .await
            .unwrap();
        assert!(response.retrieved_documents.is_empty());
        assert!(response.search_terms_used.is_empty());
        assert_eq!(response.total_retrieved, 0);
        assert!(!response.conversation_context_used);

        let response = service
            .semantic_query_with_context("is it ok", "notes", "go on", 5)
            .await
            .unwrap();
        assert!(response.retrieved_documents.is_empty());
        assert!(response.search_terms_used.is_empty());
        assert!(response.conversation_context_used);
    }

    #[tokio::test]
    async fn blank_reference_text_finds_nothing() {
        let report = offline()
            .await
            .find_similar("notes", "   ", 0.5)
            .await
            .unwrap();
        assert_eq!(report.total_found, 0);
        assert!(report.similar_documents.is_empty());
        assert!(report.search_keywords.is_empty());
    }

    #[tokio::test]
    async fn unusable_time_fields_are_rejected() {
        let service = offline().await;
        for field in ["$ts", "  ", ""] {
            let err = service.analyze_trends("notes", field).await.unwrap_err();
            assert!(
                matches!(err, DocumentError::InvalidArgument(_)),
                "{field:?} gave {err}"
            );
        }
    }

    #[tokio::test]
    async fn blank_collection_names_are_rejected() {
        let service = offline().await;

        let err = service.semantic_search("rust", "  ", 5).await.unwrap_err();
        assert!(matches!(err, DocumentError::InvalidArgument(_)));
        assert!(err.to_string().contains("collection name"));

        let err = service.summarize_collection("", 20).await.unwrap_err();
        assert!(matches!(err, DocumentError::InvalidArgument(_)));

        let err = service.analyze_trends(" ", "timestamp").await.unwrap_err();
        assert!(matches!(err, DocumentError::InvalidArgument(_)));
    }

    #[test]
    fn zero_limits_become_one() {
        assert_eq!(at_least_one(0), 1);
        assert_eq!(at_least_one(7), 7);
    }
}
