mod analysis;
mod crud;
mod error;
mod ingest;
mod models;
mod retrieval;
mod service;
mod text;

pub use analysis::{build_collection_summary, build_trend_report, trend_pipeline};
pub use crud::{
    parse_filter, parse_insert_payload, parse_json, parse_update_payload, InsertPayload,
    UpdatePayload, WriteOperation,
};
pub use error::DocumentError;
pub use ingest::{parse_document_input, prepare_document, ParsedInput, UNTITLED};
pub use models::{
    CollectionSummary, ContextQueryReport, RagInsight, RagRecommendations, RagResponse,
    RankedDocument, RecentDocument, SearchReport, SimilarDocument, SimilarityReport,
    StoreReceipt, SummaryReport, TrendReport, WriteOutcome,
};
pub use retrieval::{
    build_context_report, build_rag_response, build_search_report, build_similarity_report,
    context_pipeline, rerank, SEARCH_STRATEGY,
};
pub use service::DocumentService;
pub use text::{leading_keywords, preview, preview_if_longer, truncate_chars, KeyTerms};

pub const DEFAULT_SEARCH_LIMIT: u32 = 5;
pub const DEFAULT_CONTEXT_LIMIT: u32 = 3;
pub const DEFAULT_SUMMARY_DOCS: u32 = 20;
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.5;
pub const DEFAULT_TIME_FIELD: &str = "timestamp";
pub const DEFAULT_READ_LIMIT: u32 = 10;
