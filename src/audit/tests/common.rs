use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::audit::domain::{AnswerSet, AuditId, AuditRecord, Lead, QuestionKey};
use crate::audit::llm::{NarrativeError, NarrativeGateway, NarrativePrompt};
use crate::audit::mailer::{MailError, ReportMailer};
use crate::audit::report::NarrativeUpdate;
use crate::audit::repository::{AuditStore, MemoryStore, StoreError};
use crate::audit::service::AuditService;

pub(super) fn empty_answers() -> AnswerSet {
    AnswerSet::new()
}

/// The enterprise scenario from the scoring rubric's acceptance checks.
pub(super) fn enterprise_answers() -> AnswerSet {
    AnswerSet::new()
        .with(QuestionKey::BusinessSize, "Enterprise ($50M+)")
        .with(QuestionKey::Bottleneck, "Data Visibility & Reporting")
        .with(QuestionKey::Automation, "Mostly manual / Spreadsheets")
        .with(
            QuestionKey::Infrastructure,
            "Legacy (On-premise / Older systems)",
        )
        .with(QuestionKey::TechStack, "a,b,c,d,e,f,g,h")
}

pub(super) fn saas_answers() -> AnswerSet {
    AnswerSet::new()
        .with(QuestionKey::Industry, "SaaS")
        .with(QuestionKey::BusinessSize, "SMB ($1M - $10M)")
        .with(QuestionKey::Infrastructure, "Cloud-native")
        .with(QuestionKey::Bottleneck, "Manual approval handoffs")
        .with(QuestionKey::Automation, "Partially automated")
        .with(QuestionKey::Data, "Central warehouse")
        .with(QuestionKey::AiReadiness, "Piloting")
        .with(QuestionKey::CustomerJourney, "Instrumented")
        .with(QuestionKey::TechStack, "HubSpot, Slack, Notion")
}

/// Gateway with a scripted outcome so tests control the enrichment path.
pub(super) enum Script {
    Succeed(NarrativeUpdate),
    Transport,
    NotConfigured,
}

pub(super) struct ScriptedGateway {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedGateway {
    pub(super) fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl NarrativeGateway for ScriptedGateway {
    fn generate(&self, _prompt: &NarrativePrompt) -> Result<NarrativeUpdate, NarrativeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Succeed(update) => Ok(update.clone()),
            Script::Transport => Err(NarrativeError::Transport("scripted outage".to_string())),
            Script::NotConfigured => Err(NarrativeError::NotConfigured),
        }
    }
}

#[derive(Default)]
pub(super) struct RecordingMailer {
    sent: Mutex<Vec<(String, AuditId)>>,
}

impl RecordingMailer {
    pub(super) fn sent(&self) -> Vec<(String, AuditId)> {
        self.sent.lock().expect("lock").clone()
    }
}

impl ReportMailer for RecordingMailer {
    fn send_report(
        &self,
        recipient: &str,
        record: &AuditRecord,
        _pdf: &[u8],
    ) -> Result<(), MailError> {
        self.sent
            .lock()
            .expect("lock")
            .push((recipient.to_string(), record.id.clone()));
        Ok(())
    }
}

/// Store whose every operation fails, for exercising 500 paths.
pub(super) struct FailingStore;

impl AuditStore for FailingStore {
    fn put_audit(&self, _record: &AuditRecord) -> Result<(), StoreError> {
        Err(StoreError::Io(io::Error::new(io::ErrorKind::Other, "scripted store outage")))
    }

    fn get_audit(&self, _id: &AuditId) -> Result<Option<AuditRecord>, StoreError> {
        Err(StoreError::Io(io::Error::new(io::ErrorKind::Other, "scripted store outage")))
    }

    fn add_lead(&self, _lead: &Lead) -> Result<(), StoreError> {
        Err(StoreError::Io(io::Error::new(io::ErrorKind::Other, "scripted store outage")))
    }
}

pub(super) fn build_service(
    script: Script,
) -> (
    Arc<AuditService>,
    Arc<MemoryStore>,
    Arc<ScriptedGateway>,
    Arc<RecordingMailer>,
) {
    let store = Arc::new(MemoryStore::default());
    let gateway = Arc::new(ScriptedGateway::new(script));
    let mailer = Arc::new(RecordingMailer::default());
    let service = Arc::new(AuditService::new(
        store.clone(),
        gateway.clone(),
        mailer.clone(),
    ));
    (service, store, gateway, mailer)
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}
