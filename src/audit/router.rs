use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{AnswerSet, AuditId, Lead, QuestionKey};
use super::gating::EnrichmentRequest;
use super::llm::NarrativeError;
use super::rules::score_answers;
use super::service::{AuditService, AuditServiceError};

/// Router exposing the audit and lead-capture endpoints.
pub fn audit_router(service: Arc<AuditService>) -> Router {
    Router::new()
        .route("/api/audit/generate", post(generate_handler))
        .route("/api/audit/summary", post(summary_handler))
        .route("/api/audit/:id", get(fetch_handler))
        .route("/api/audit/:id/pdf", get(pdf_handler))
        .route("/api/contact", post(contact_handler))
        .with_state(service)
}

/// Legacy single-shot form body. `goal` is accepted for compatibility but
/// carries no scoring signal.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateRequest {
    pub business_size: String,
    pub industry: String,
    pub tech_stack: String,
    pub bottleneck: String,
    pub goal: String,
}

impl GenerateRequest {
    fn into_answers(self) -> AnswerSet {
        AnswerSet::new()
            .with(QuestionKey::BusinessSize, self.business_size)
            .with(QuestionKey::Industry, self.industry)
            .with(QuestionKey::TechStack, self.tech_stack)
            .with(QuestionKey::Bottleneck, self.bottleneck)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryRequest {
    pub email: String,
    pub answers: AnswerSet,
    pub score: Option<u8>,
    pub initial_gaps: Vec<String>,
    pub report_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

pub(crate) async fn generate_handler(
    State(service): State<Arc<AuditService>>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    let answers = request.into_answers();
    match service.generate(&answers) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => {
            error!(error = %err, "audit generation failed");
            let payload = json!({ "error": "Failed to generate report" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn summary_handler(
    State(service): State<Arc<AuditService>>,
    Json(request): Json<SummaryRequest>,
) -> Response {
    let SummaryRequest {
        email,
        answers,
        score,
        initial_gaps,
        report_id,
    } = request;

    let score = score.unwrap_or_else(|| score_answers(&answers).score);
    let enrichment = EnrichmentRequest {
        email,
        answers,
        score,
        initial_gaps,
    };

    match service.enrich(enrichment, report_id.map(AuditId)).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(AuditServiceError::Narrative(NarrativeError::NotConfigured)) => {
            let payload = json!({ "error": "Service not configured" });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
        Err(err) => {
            error!(error = %err, "audit summary failed");
            let payload = json!({ "error": "Failed to generate summary" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn fetch_handler(
    State(service): State<Arc<AuditService>>,
    Path(id): Path<String>,
) -> Response {
    match service.fetch(&AuditId(id)) {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => not_found_response(),
        Err(err) => {
            error!(error = %err, "audit fetch failed");
            let payload = json!({ "error": "Failed to load report" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn pdf_handler(
    State(service): State<Arc<AuditService>>,
    Path(id): Path<String>,
) -> Response {
    let id = AuditId(id);
    match service.export_pdf(&id) {
        Ok(Some(bytes)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=onqo-audit-{id}.pdf"),
                ),
            ],
            bytes,
        )
            .into_response(),
        Ok(None) => not_found_response(),
        Err(err) => {
            error!(error = %err, "audit export failed");
            let payload = json!({ "error": "Failed to render report" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn contact_handler(
    State(service): State<Arc<AuditService>>,
    Json(request): Json<ContactRequest>,
) -> Response {
    let name = request.name.unwrap_or_default();
    let email = request.email.unwrap_or_default();
    if name.trim().is_empty() || email.trim().is_empty() {
        let payload = json!({ "error": "Missing fields" });
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    }

    let lead = Lead {
        name,
        email,
        message: request.message.unwrap_or_default(),
        submitted_at: Utc::now(),
    };

    match service.store_lead(&lead) {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(err) => {
            error!(error = %err, "lead capture failed");
            let payload = json!({ "error": "Failed to store contact" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

fn not_found_response() -> Response {
    let payload = json!({ "error": "Audit not found" });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}
