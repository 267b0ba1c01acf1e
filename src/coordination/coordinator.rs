use std::{future::Future, sync::Arc};

use chrono::{Datelike, Utc};
use serde_json::Value;
use tokio::sync::{mpsc, Mutex};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    error::{CoordinationError, StepError},
    history::{ConversationHistory, HistoryKind},
    report::{
        format_findings, format_search_results, research_queries, AnalysisKind,
        DocumentAnalysisReport, KnowledgeQueryReport, ResearchAndOrganizeReport, ResearchPhase,
        ResearchPipelineReport, SearchAndStoreReport, UserInteractionReport, SUCCESS,
    },
};
use crate::{
    documents::{preview, DocumentService, DEFAULT_TIME_FIELD},
    notifications::{Notification, NotificationHandler},
    services::search::WebSearch,
};

pub const DEFAULT_RESEARCH_COLLECTION: &str = "research_data";
pub const DEFAULT_PIPELINE_COLLECTION: &str = "research_pipeline";

const CONVERSATION_CONTEXT_LIMIT: u32 = 3;
const LONG_RESPONSE_CHARS: usize = 500;
const CONVERSATION_SUMMARY_DOCS: u32 = 5;
const PIPELINE_SUMMARY_DOCS: u32 = 20;
const ORGANIZE_SUMMARY_DOCS: u32 = 10;
const ANALYSIS_SUMMARY_DOCS: u32 = 20;
const RELATED_RESEARCH_THRESHOLD: f64 = 0.6;
const RELATED_DOCUMENTS_THRESHOLD: f64 = 0.5;
const KNOWLEDGE_QUERY_LIMIT: u32 = 5;

/// The multi-step workflows a [`Coordinator`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowKind {
    UserInteraction,
    SearchAndStore,
    ResearchPipeline,
    ResearchAndOrganize,
    KnowledgeQuery,
    DocumentAnalysis,
}

impl WorkflowKind {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowKind::UserInteraction => "user_interaction",
            WorkflowKind::SearchAndStore => "search_and_store",
            WorkflowKind::ResearchPipeline => "research_pipeline",
            WorkflowKind::ResearchAndOrganize => "research_and_organize",
            WorkflowKind::KnowledgeQuery => "knowledge_query",
            WorkflowKind::DocumentAnalysis => "document_analysis",
        }
    }

    /// Label reported in place of the step chain when the workflow aborts.
    pub fn failure_label(&self) -> &'static str {
        match self {
            WorkflowKind::UserInteraction => "user_interaction_failed",
            WorkflowKind::SearchAndStore => "a2a_coordination_failed",
            WorkflowKind::ResearchPipeline => "research_pipeline_failed",
            WorkflowKind::ResearchAndOrganize => "research_workflow_failed",
            WorkflowKind::KnowledgeQuery => "knowledge_query_failed",
            WorkflowKind::DocumentAnalysis => "document_analysis_failed",
        }
    }
}

/// Runs linear workflows over the document operations and a web search.
///
/// Each step is a real call. The first failing step aborts the workflow with
/// a [`CoordinationError`]. Progress goes out as notifications when a channel
/// is attached.
///
/// Workflows take `&self` and may run concurrently. The history lock is held
/// only to read context or record a finished workflow, never across a step.
pub struct Coordinator {
    documents: DocumentService,
    search: Arc<dyn WebSearch>,
    history: Mutex<ConversationHistory>,
    conversation_collection: String,
    notifications: Option<mpsc::Sender<Notification>>,
    name: String,
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("name", &self.name)
            .field("search", &self.search.name())
            .field("conversation_collection", &self.conversation_collection)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    pub fn new(documents: DocumentService, search: Arc<dyn WebSearch>) -> Self {
        let conversation_collection = documents.store().config().conversation_collection.clone();
        Self {
            documents,
            search,
            history: Mutex::new(ConversationHistory::new()),
            conversation_collection,
            notifications: None,
            name: "a2a_coordinator".to_string(),
        }
    }

    /// Attach a fresh notification channel of size 100 and return its receiver.
    pub fn with_notifications(mut self) -> (Self, mpsc::Receiver<Notification>) {
        let (sender, receiver) = mpsc::channel(100);
        self.notifications = Some(sender);
        (self, receiver)
    }

    pub fn set_name<T: Into<String>>(mut self, name: T) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the history, e.g. with one of a different capacity.
    pub fn with_history(mut self, history: ConversationHistory) -> Self {
        self.history = Mutex::new(history);
        self
    }

    pub fn conversation_collection(&self) -> &str {
        &self.conversation_collection
    }

    /// Snapshot of the workflow history.
    pub async fn history(&self) -> ConversationHistory {
        self.history.lock().await.clone()
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }

    async fn record(&self, kind: HistoryKind) {
        self.history.lock().await.push(kind);
    }

    pub fn documents(&self) -> &DocumentService {
        &self.documents
    }

    async fn step<T, E, F>(&self, kind: WorkflowKind, step: &str, fut: F) -> Result<T, CoordinationError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<StepError>,
    {
        self.notify_step_started(kind.name(), step).await;
        let result: Result<T, StepError> = fut.await.map_err(Into::into);
        self.notify_step_finished(kind.name(), step, result.is_ok()).await;
        result.map_err(|source| CoordinationError::new(kind, step, source))
    }

    async fn finish<T>(
        &self,
        kind: WorkflowKind,
        result: Result<T, CoordinationError>,
    ) -> Result<T, CoordinationError> {
        match &result {
            Ok(_) => {
                info!(workflow = kind.name(), "workflow completed");
                self.notify_done(kind.name(), true, None).await;
            }
            Err(e) => {
                warn!(workflow = kind.name(), step = %e.step, error = %e.source, "workflow failed");
                self.notify_done(kind.name(), false, Some(e.to_string())).await;
            }
        }
        result
    }

    fn require(kind: WorkflowKind, name: &str, value: &str) -> Result<(), CoordinationError> {
        if value.trim().is_empty() {
            return Err(CoordinationError::new(
                kind,
                "validate_input",
                StepError::InvalidArgument(format!("{name} must not be empty")),
            ));
        }
        Ok(())
    }

    /// Context lookup in the conversation collection, a response and storage
    /// of the exchange for later context.
    #[instrument(level = "debug", skip(self))]
    pub async fn coordinate_user_interaction(
        &self,
        user_query: &str,
        include_context: bool,
    ) -> Result<UserInteractionReport, CoordinationError> {
        let kind = WorkflowKind::UserInteraction;
        let result = self.user_interaction(kind, user_query, include_context).await;
        self.finish(kind, result).await
    }

    async fn user_interaction(
        &self,
        kind: WorkflowKind,
        user_query: &str,
        include_context: bool,
    ) -> Result<UserInteractionReport, CoordinationError> {
        Self::require(kind, "user_query", user_query)?;
        let collection = self.conversation_collection.as_str();

        let context = if include_context {
            Some(
                self.step(
                    kind,
                    "context_retrieval",
                    self.documents
                        .semantic_search(user_query, collection, CONVERSATION_CONTEXT_LIMIT),
                )
                .await?,
            )
        } else {
            None
        };

        let mut chat_response = format!("Processing query: {user_query}");
        let titles: Vec<&str> = context
            .iter()
            .flat_map(|report| report.results.iter())
            .filter_map(|doc| doc.get("title").and_then(Value::as_str))
            .collect();
        if !titles.is_empty() {
            chat_response.push_str("\n\nRelevant context found: ");
            chat_response.push_str(&titles.join(", "));
        }

        let exchange = format!("User Query: {user_query}\nResponse: {chat_response}");
        let title = format!("Conversation: {}", preview(user_query, 30));
        let conversation_stored = self
            .step(
                kind,
                "conversation_storage",
                self.documents
                    .store_document(collection, &exchange, Some(&title)),
            )
            .await?;

        let summary = if chat_response.chars().count() > LONG_RESPONSE_CHARS {
            Some(
                self.step(
                    kind,
                    "summarization",
                    self.documents
                        .summarize_collection(collection, CONVERSATION_SUMMARY_DOCS),
                )
                .await?,
            )
        } else {
            None
        };

        Ok(UserInteractionReport {
            run_id: Uuid::new_v4().to_string(),
            user_query: user_query.to_string(),
            context_retrieved: context.as_ref().is_some_and(|c| c.total_found > 0),
            context,
            chat_response,
            conversation_stored,
            summary_provided: summary.is_some(),
            summary,
            workflow: "context_retrieval -> chat_processing -> conversation_storage",
            status: SUCCESS,
        })
    }

    /// Web search, storage of the results and a search over what was stored.
    #[instrument(level = "debug", skip(self))]
    pub async fn coordinate_search_and_store(
        &self,
        query: &str,
        collection: &str,
    ) -> Result<SearchAndStoreReport, CoordinationError> {
        let kind = WorkflowKind::SearchAndStore;
        let result = self.search_and_store(kind, query, collection).await;
        if result.is_ok() {
            self.record(HistoryKind::SearchAndStore {
                query: query.to_string(),
            })
            .await;
        }
        self.finish(kind, result).await
    }

    async fn search_and_store(
        &self,
        kind: WorkflowKind,
        query: &str,
        collection: &str,
    ) -> Result<SearchAndStoreReport, CoordinationError> {
        Self::require(kind, "query", query)?;

        let search_results = self.step(kind, "web_search", self.search.search(query)).await?;
        let formatted = self
            .step(kind, "format_results", async {
                format_search_results(query, &search_results, self.search.name(), Utc::now())
            })
            .await?;
        let title = format!("Search Results: {query}");
        let storage_result = self
            .step(
                kind,
                "document_storage",
                self.documents
                    .store_document(collection, &formatted, Some(&title)),
            )
            .await?;
        let semantic_analysis = self
            .step(
                kind,
                "semantic_analysis",
                self.documents
                    .semantic_search(query, collection, crate::documents::DEFAULT_SEARCH_LIMIT),
            )
            .await?;

        Ok(SearchAndStoreReport {
            run_id: Uuid::new_v4().to_string(),
            query: query.to_string(),
            search_results,
            storage_result,
            semantic_analysis,
            workflow: "google_search -> mongodb_storage -> semantic_analysis",
            status: SUCCESS,
        })
    }

    /// Five searches covering a topic, each stored as a phase, then a summary
    /// and a trend analysis of the collection.
    #[instrument(level = "debug", skip(self))]
    pub async fn intelligent_research_pipeline(
        &self,
        research_topic: &str,
        collection: &str,
    ) -> Result<ResearchPipelineReport, CoordinationError> {
        let kind = WorkflowKind::ResearchPipeline;
        let result = self.research_pipeline(kind, research_topic, collection).await;
        if result.is_ok() {
            self.record(HistoryKind::ResearchPipeline {
                topic: research_topic.to_string(),
            })
            .await;
        }
        self.finish(kind, result).await
    }

    async fn research_pipeline(
        &self,
        kind: WorkflowKind,
        topic: &str,
        collection: &str,
    ) -> Result<ResearchPipelineReport, CoordinationError> {
        Self::require(kind, "research_topic", topic)?;

        let queries = research_queries(topic, Utc::now().year());
        let mut search_phases = Vec::with_capacity(queries.len());
        for (i, query) in queries.iter().enumerate() {
            let phase = i + 1;
            let step_name = format!("research_phase_{phase}");
            let results = self.step(kind, &step_name, self.search.search(query)).await?;
            let formatted = self
                .step(kind, &step_name, async {
                    format_search_results(query, &results, self.search.name(), Utc::now())
                })
                .await?;
            let title = format!("Research Phase {phase}: {query}");
            let storage = self
                .step(
                    kind,
                    &step_name,
                    self.documents
                        .store_document(collection, &formatted, Some(&title)),
                )
                .await?;
            search_phases.push(ResearchPhase {
                phase,
                query: query.clone(),
                results,
                storage,
            });
        }

        let synthesis = self
            .step(
                kind,
                "synthesis",
                self.documents
                    .summarize_collection(collection, PIPELINE_SUMMARY_DOCS),
            )
            .await?;
        let patterns_and_insights = self
            .step(
                kind,
                "pattern_analysis",
                self.documents.analyze_trends(collection, DEFAULT_TIME_FIELD),
            )
            .await?;

        Ok(ResearchPipelineReport {
            run_id: Uuid::new_v4().to_string(),
            research_topic: topic.to_string(),
            research_depth: search_phases.len(),
            search_phases,
            synthesis,
            patterns_and_insights,
            collection_name: collection.to_string(),
            workflow: "multi_phase_search -> knowledge_storage -> synthesis -> pattern_analysis",
            status: SUCCESS,
        })
    }

    /// One search stored as a research note, then a summary of the
    /// collection and related earlier research.
    #[instrument(level = "debug", skip(self))]
    pub async fn coordinate_research_and_organize(
        &self,
        research_topic: &str,
        collection: &str,
    ) -> Result<ResearchAndOrganizeReport, CoordinationError> {
        let kind = WorkflowKind::ResearchAndOrganize;
        let result = self.research_and_organize(kind, research_topic, collection).await;
        self.finish(kind, result).await
    }

    async fn research_and_organize(
        &self,
        kind: WorkflowKind,
        topic: &str,
        collection: &str,
    ) -> Result<ResearchAndOrganizeReport, CoordinationError> {
        Self::require(kind, "research_topic", topic)?;

        let query = format!("{topic} latest information research");
        let search_results = self.step(kind, "web_search", self.search.search(&query)).await?;

        let note = format!(
            "Research Topic: {topic}\n\nFindings:\n{}",
            format_findings(&search_results)
        );
        let title = format!("Research: {topic}");
        let storage_result = self
            .step(
                kind,
                "document_storage",
                self.documents.store_document(collection, &note, Some(&title)),
            )
            .await?;
        let organization_summary = self
            .step(
                kind,
                "summarization",
                self.documents
                    .summarize_collection(collection, ORGANIZE_SUMMARY_DOCS),
            )
            .await?;
        let related_research = self
            .step(
                kind,
                "related_discovery",
                self.documents
                    .find_similar(collection, topic, RELATED_RESEARCH_THRESHOLD),
            )
            .await?;

        Ok(ResearchAndOrganizeReport {
            run_id: Uuid::new_v4().to_string(),
            research_topic: topic.to_string(),
            search_results,
            storage_result,
            organization_summary,
            related_research,
            workflow: "google_search -> mongodb_storage -> summarization -> related_discovery",
            status: SUCCESS,
        })
    }

    /// Retrieval for a question, using earlier questions and research topics
    /// as context.
    #[instrument(level = "debug", skip(self))]
    pub async fn query_knowledge_base(
        &self,
        question: &str,
        collection: &str,
    ) -> Result<KnowledgeQueryReport, CoordinationError> {
        let kind = WorkflowKind::KnowledgeQuery;
        let context = self.history.lock().await.context();
        let result = self.knowledge_query(kind, question, collection, &context).await;
        if result.is_ok() {
            self.record(HistoryKind::KnowledgeQuery {
                question: question.to_string(),
            })
            .await;
        }
        self.finish(kind, result).await
    }

    async fn knowledge_query(
        &self,
        kind: WorkflowKind,
        question: &str,
        collection: &str,
        context: &str,
    ) -> Result<KnowledgeQueryReport, CoordinationError> {
        Self::require(kind, "question", question)?;

        let rag_response = self
            .step(
                kind,
                "rag_query",
                self.documents.semantic_query_with_context(
                    question,
                    collection,
                    context,
                    KNOWLEDGE_QUERY_LIMIT,
                ),
            )
            .await?;
        let related_documents = self
            .step(
                kind,
                "related_search",
                self.documents
                    .find_similar(collection, question, RELATED_DOCUMENTS_THRESHOLD),
            )
            .await?;

        Ok(KnowledgeQueryReport {
            run_id: Uuid::new_v4().to_string(),
            question: question.to_string(),
            rag_response,
            related_documents,
            collection_queried: collection.to_string(),
            conversation_context_used: !context.is_empty(),
            workflow: "rag_query -> related_search -> contextual_response",
            status: SUCCESS,
        })
    }

    /// Summary, trend analysis or both over a stored collection.
    #[instrument(level = "debug", skip(self))]
    pub async fn analyze_stored_documents(
        &self,
        collection: &str,
        analysis: &str,
    ) -> Result<DocumentAnalysisReport, CoordinationError> {
        let kind = WorkflowKind::DocumentAnalysis;
        let result = self.document_analysis(kind, collection, analysis).await;
        self.finish(kind, result).await
    }

    async fn document_analysis(
        &self,
        kind: WorkflowKind,
        collection: &str,
        analysis: &str,
    ) -> Result<DocumentAnalysisReport, CoordinationError> {
        let analysis: AnalysisKind = analysis.parse().map_err(|e| {
            CoordinationError::new(kind, "validate_input", StepError::InvalidArgument(e))
        })?;

        let summary = match analysis {
            AnalysisKind::Summary | AnalysisKind::Organization => Some(
                self.step(
                    kind,
                    "collection_summary",
                    self.documents
                        .summarize_collection(collection, ANALYSIS_SUMMARY_DOCS),
                )
                .await?,
            ),
            AnalysisKind::Patterns => None,
        };
        let trends = match analysis {
            AnalysisKind::Patterns | AnalysisKind::Organization => Some(
                self.step(
                    kind,
                    "trend_analysis",
                    self.documents.analyze_trends(collection, DEFAULT_TIME_FIELD),
                )
                .await?,
            ),
            AnalysisKind::Summary => None,
        };

        Ok(DocumentAnalysisReport {
            run_id: Uuid::new_v4().to_string(),
            collection: collection.to_string(),
            analysis,
            summary,
            trends,
            workflow: analysis.workflow(),
            status: SUCCESS,
        })
    }
}

impl NotificationHandler for Coordinator {
    fn get_outgoing_channel(&self) -> Option<&mpsc::Sender<Notification>> {
        self.notifications.as_ref()
    }

    fn get_channel_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        notifications::NotificationContent,
        services::{
            mongo::{MongoStore, StoreConfig},
            search::{SearchError, SearchFuture},
        },
    };

    struct Unreachable;

    impl WebSearch for Unreachable {
        fn search<'a>(&'a self, _query: &'a str) -> SearchFuture<'a> {
            Box::pin(async { Err(SearchError::Request("connection refused".into())) })
        }
    }

    async fn coordinator() -> Coordinator {
        let store = MongoStore::lazy(StoreConfig::default()).await.unwrap();
        Coordinator::new(DocumentService::new(store), Arc::new(Unreachable))
    }

    #[tokio::test]
    async fn failed_search_aborts_with_failure_label() {
        let (coordinator, mut rx) = coordinator().await.with_notifications();

        let err = coordinator
            .coordinate_search_and_store("rust", DEFAULT_RESEARCH_COLLECTION)
            .await
            .unwrap_err();
        assert_eq!(err.workflow, "a2a_coordination_failed");
        assert_eq!(err.step, "web_search");
        assert!(matches!(err.source, StepError::Search(_)));
        assert!(coordinator.history().await.is_empty());

        let kinds: Vec<NotificationContent> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|n| n.content)
            .collect();
        assert_eq!(kinds.len(), 3);
        assert!(matches!(kinds[1], NotificationContent::StepFinished { success: false, .. }));
        assert!(matches!(
            &kinds[2],
            NotificationContent::WorkflowDone { success: false, summary: Some(s), .. }
                if s.contains("connection refused")
        ));
    }

    #[tokio::test]
    async fn empty_inputs_are_rejected_before_any_call() {
        let coordinator = coordinator().await;

        let err = coordinator
            .intelligent_research_pipeline("  ", DEFAULT_PIPELINE_COLLECTION)
            .await
            .unwrap_err();
        assert_eq!(err.workflow, "research_pipeline_failed");
        assert_eq!(err.step, "validate_input");

        let err = coordinator
            .query_knowledge_base("", DEFAULT_RESEARCH_COLLECTION)
            .await
            .unwrap_err();
        assert_eq!(err.workflow, "knowledge_query_failed");

        let err = coordinator
            .coordinate_user_interaction("", true)
            .await
            .unwrap_err();
        assert_eq!(err.workflow, "user_interaction_failed");
    }

    #[tokio::test]
    async fn unknown_analysis_is_rejected() {
        let coordinator = coordinator().await;
        let err = coordinator
            .analyze_stored_documents("user_conversations", "themes")
            .await
            .unwrap_err();
        assert_eq!(err.workflow, "document_analysis_failed");
        assert!(err.to_string().contains("themes"));
    }

    #[tokio::test]
    async fn research_and_organize_reports_its_failure_label() {
        let coordinator = coordinator().await;
        let err = coordinator
            .coordinate_research_and_organize("quantum networking", DEFAULT_RESEARCH_COLLECTION)
            .await
            .unwrap_err();
        assert_eq!(err.workflow, "research_workflow_failed");
        assert_eq!(err.step, "web_search");
    }

    #[tokio::test]
    async fn conversation_collection_comes_from_store_config() {
        let coordinator = coordinator().await;
        assert_eq!(coordinator.conversation_collection(), "user_conversations");
    }

    #[tokio::test]
    async fn read_only_workflows_do_not_wait_on_history() {
        let coordinator = coordinator().await;
        let _history = coordinator.history.lock().await;

        // Fails at input validation, which needs neither history nor server.
        let err = coordinator
            .analyze_stored_documents("user_conversations", "themes")
            .await
            .unwrap_err();
        assert_eq!(err.step, "validate_input");
    }

    #[tokio::test]
    async fn replacement_history_keeps_its_capacity() {
        let coordinator = coordinator()
            .await
            .with_history(ConversationHistory::with_capacity(2));
        coordinator.clear_history().await;
        assert_eq!(coordinator.history().await.capacity(), 2);
    }
}
