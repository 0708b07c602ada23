use tracing::info;

use super::domain::AuditRecord;

/// Outbound delivery hook for the emailed report. Mail failures never fail
/// the request path; the service logs and continues.
pub trait ReportMailer: Send + Sync {
    fn send_report(&self, recipient: &str, record: &AuditRecord, pdf: &[u8])
        -> Result<(), MailError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}

/// Default adapter: records the handoff and moves on. A real SMTP
/// transport slots in behind the same trait.
pub struct LogMailer;

impl ReportMailer for LogMailer {
    fn send_report(
        &self,
        recipient: &str,
        record: &AuditRecord,
        pdf: &[u8],
    ) -> Result<(), MailError> {
        info!(
            recipient = %recipient,
            audit_id = %record.id,
            pdf_bytes = pdf.len(),
            "audit report queued for delivery"
        );
        Ok(())
    }
}
