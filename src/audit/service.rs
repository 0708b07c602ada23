use std::sync::Arc;

use tracing::warn;

use super::domain::{AnswerSet, AuditId, AuditRecord, Lead};
use super::gating::EnrichmentRequest;
use super::llm::{NarrativeError, NarrativeGateway, NarrativePrompt};
use super::mailer::ReportMailer;
use super::narrative;
use super::pdf::{render_pdf, ExportError};
use super::report::{assemble, assemble_with_score};
use super::repository::{AuditStore, StoreError};

/// Service composing the store, narrative gateway, and mail hook behind
/// their trait seams.
pub struct AuditService {
    store: Arc<dyn AuditStore>,
    narrative: Arc<dyn NarrativeGateway>,
    mailer: Arc<dyn ReportMailer>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuditServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Narrative(#[from] NarrativeError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl AuditService {
    pub fn new(
        store: Arc<dyn AuditStore>,
        narrative: Arc<dyn NarrativeGateway>,
        mailer: Arc<dyn ReportMailer>,
    ) -> Self {
        Self {
            store,
            narrative,
            mailer,
        }
    }

    /// Immediate deterministic path: assemble, persist, return the record
    /// under its freshly generated identifier.
    pub fn generate(&self, answers: &AnswerSet) -> Result<AuditRecord, AuditServiceError> {
        let record = AuditRecord {
            id: AuditId::generate(),
            report: assemble(answers),
        };
        self.store.put_audit(&record)?;
        Ok(record)
    }

    pub fn fetch(&self, id: &AuditId) -> Result<Option<AuditRecord>, AuditServiceError> {
        Ok(self.store.get_audit(id)?)
    }

    /// Render a stored report to PDF bytes; `None` when the id is unknown.
    pub fn export_pdf(&self, id: &AuditId) -> Result<Option<Vec<u8>>, AuditServiceError> {
        match self.store.get_audit(id)? {
            Some(record) => Ok(Some(render_pdf(&record)?)),
            None => Ok(None),
        }
    }

    pub fn store_lead(&self, lead: &Lead) -> Result<(), AuditServiceError> {
        Ok(self.store.add_lead(lead)?)
    }

    /// Email-gated enrichment path.
    ///
    /// An unconfigured gateway is the one failure surfaced to the caller
    /// (the operator diagnostic); every other gateway failure degrades to
    /// the template narrative. With a `report_id` the stored report's
    /// narrative fields are overwritten in place; otherwise a fresh record
    /// is assembled around the caller's frozen score. The emailed PDF is
    /// best-effort: export or transport trouble is logged and the request
    /// still succeeds.
    pub async fn enrich(
        &self,
        request: EnrichmentRequest,
        report_id: Option<AuditId>,
    ) -> Result<AuditRecord, AuditServiceError> {
        let prompt = NarrativePrompt::from_context(
            &request.answers,
            request.score,
            &request.initial_gaps,
        );

        let gateway = Arc::clone(&self.narrative);
        let generated =
            tokio::task::spawn_blocking(move || gateway.generate(&prompt)).await;

        let update = match generated {
            Ok(Ok(update)) => update,
            Ok(Err(NarrativeError::NotConfigured)) => {
                return Err(NarrativeError::NotConfigured.into());
            }
            Ok(Err(err)) => {
                warn!(error = %err, "narrative enrichment failed, using template fallback");
                narrative::fallback_update(&request.answers, request.score)
            }
            Err(join_err) => {
                warn!(error = %join_err, "narrative task aborted, using template fallback");
                narrative::fallback_update(&request.answers, request.score)
            }
        };

        let mut record = match &report_id {
            Some(id) => match self.store.get_audit(id)? {
                Some(existing) => existing,
                None => self.fresh_record(&request),
            },
            None => self.fresh_record(&request),
        };

        record.report.apply_narrative(update);
        self.store.put_audit(&record)?;

        self.deliver(&request.email, &record);

        Ok(record)
    }

    fn fresh_record(&self, request: &EnrichmentRequest) -> AuditRecord {
        AuditRecord {
            id: AuditId::generate(),
            report: assemble_with_score(&request.answers, request.score),
        }
    }

    fn deliver(&self, recipient: &str, record: &AuditRecord) {
        let pdf = match render_pdf(record) {
            Ok(pdf) => pdf,
            Err(err) => {
                warn!(error = %err, audit_id = %record.id, "report export failed, skipping delivery");
                return;
            }
        };
        if let Err(err) = self.mailer.send_report(recipient, record, &pdf) {
            warn!(error = %err, audit_id = %record.id, "report delivery failed, continuing");
        }
    }
}
