//! Digital readiness audit: deterministic scoring, gap selection, gated
//! report disclosure, persistence, and export.

pub mod domain;
pub mod gaps;
pub mod gating;
pub mod llm;
pub mod mailer;
pub mod narrative;
pub mod pdf;
pub mod report;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{AnswerSet, AuditId, AuditRecord, AuditReport, GapImpact, Lead, QuestionKey};
pub use gaps::{select_gaps, GapKey, MAX_GAPS};
pub use gating::{
    AuditFlow, EmailSubmission, EnrichmentRequest, FlowPhase, GatingError, PERSONAL_EMAIL_DOMAINS,
    PROCESSING_HOLD,
};
pub use llm::{
    HostedCompletionClient, NarrativeError, NarrativeGateway, NarrativePrompt, UnconfiguredGateway,
};
pub use mailer::{LogMailer, MailError, ReportMailer};
pub use narrative::ReadinessBand;
pub use pdf::{render_pdf, ExportError};
pub use report::{assemble, NarrativeUpdate};
pub use repository::{AuditStore, DocumentStore, MemoryStore, StoreError};
pub use router::audit_router;
pub use rules::{score_answers, ScoreCard, ScoreComponent, ScoreFactor};
pub use service::{AuditService, AuditServiceError};
