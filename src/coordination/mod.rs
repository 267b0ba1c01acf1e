mod coordinator;
mod error;
mod history;
mod report;
mod tools;

pub use coordinator::{
    Coordinator, WorkflowKind, DEFAULT_PIPELINE_COLLECTION, DEFAULT_RESEARCH_COLLECTION,
};
pub use error::{CoordinationError, StepError};
pub use history::{ConversationHistory, HistoryEntry, HistoryKind, HISTORY_CAPACITY};
pub use report::{
    format_findings, format_search_results, research_queries, AnalysisKind,
    DocumentAnalysisReport, KnowledgeQueryReport, ResearchAndOrganizeReport, ResearchPhase,
    ResearchPipelineReport, SearchAndStoreReport, UserInteractionReport,
};
pub use tools::{
    coordination_tools, document_analysis_tool, knowledge_base_tool, render_outcome,
    research_and_organize_tool, research_pipeline_tool, search_and_store_tool, user_query_tool,
    SharedCoordinator,
};
