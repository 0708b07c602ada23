use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use serde_json::json;

use super::common::*;
use crate::audit::domain::QuestionKey;
use crate::audit::router::{
    contact_handler, fetch_handler, generate_handler, pdf_handler, summary_handler,
    ContactRequest, GenerateRequest, SummaryRequest,
};
use crate::audit::service::AuditService;

fn failing_service() -> Arc<AuditService> {
    let (_, _, gateway, mailer) = build_service(Script::NotConfigured);
    Arc::new(AuditService::new(Arc::new(FailingStore), gateway, mailer))
}

#[tokio::test]
async fn generate_handler_maps_store_failures_to_500() {
    let response = generate_handler(
        State(failing_service()),
        axum::Json(GenerateRequest::default()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "error": "Failed to generate report" }));
}

#[tokio::test]
async fn generate_handler_accepts_the_legacy_body() {
    let (service, _, _, _) = build_service(Script::NotConfigured);

    let request = GenerateRequest {
        business_size: "Enterprise ($50M+)".to_string(),
        industry: "Healthcare".to_string(),
        tech_stack: "a,b,c,d,e,f,g,h".to_string(),
        bottleneck: "Data Visibility & Reporting".to_string(),
        goal: "Scale without breaking".to_string(),
    };

    let response = generate_handler(State(service), axum::Json(request)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert!(payload.get("id").is_some());
    let score = payload["score"].as_u64().expect("score present");
    assert!((3..=9).contains(&score));
    assert_eq!(payload["gaps"].as_array().map(Vec::len), Some(3));
    assert_eq!(payload["pillar"], payload["focusSignal"]);
}

#[tokio::test]
async fn fetch_handler_returns_404_shape_for_unknown_ids() {
    let (service, _, _, _) = build_service(Script::NotConfigured);

    let response = fetch_handler(State(service), Path("unknown-id".to_string())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "error": "Audit not found" }));
}

#[tokio::test]
async fn summary_handler_signals_missing_configuration() {
    let (service, _, _, _) = build_service(Script::NotConfigured);

    let request = SummaryRequest {
        email: "ops@acme-industries.com".to_string(),
        answers: saas_answers(),
        score: Some(5),
        initial_gaps: vec![],
        report_id: None,
    };

    let response = summary_handler(State(service), axum::Json(request)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "error": "Service not configured" }));
}

#[tokio::test]
async fn summary_handler_derives_a_score_when_absent() {
    let (service, _, _, _) = build_service(Script::Transport);

    let request = SummaryRequest {
        email: "ops@acme-industries.com".to_string(),
        answers: enterprise_answers(),
        score: None,
        initial_gaps: vec![],
        report_id: None,
    };

    let response = summary_handler(State(service), axum::Json(request)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["score"], json!(3));
}

#[tokio::test]
async fn pdf_handler_sets_download_headers() {
    let (service, _, _, _) = build_service(Script::NotConfigured);
    let record = service.generate(&saas_answers()).expect("generates");

    let response = pdf_handler(State(service), Path(record.id.0.clone())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("application/pdf")
    );
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .expect("disposition present");
    assert_eq!(
        disposition,
        format!("attachment; filename=onqo-audit-{}.pdf", record.id.0)
    );
}

#[tokio::test]
async fn pdf_handler_returns_404_for_unknown_ids() {
    let (service, _, _, _) = build_service(Script::NotConfigured);
    let response = pdf_handler(State(service), Path("unknown-id".to_string())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn contact_handler_rejects_missing_fields() {
    let (service, store, _, _) = build_service(Script::NotConfigured);

    let request = ContactRequest {
        name: None,
        email: None,
        message: Some("hi".to_string()),
    };

    let response = contact_handler(State(service), axum::Json(request)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "error": "Missing fields" }));
    assert_eq!(store.lead_count(), 0, "validation has no side effects");
}

#[tokio::test]
async fn contact_handler_stores_complete_leads() {
    let (service, store, _, _) = build_service(Script::NotConfigured);

    let request = ContactRequest {
        name: Some("Dana".to_string()),
        email: Some("dana@acme-industries.com".to_string()),
        message: Some("Following up on the audit.".to_string()),
    };

    let response = contact_handler(State(service), axum::Json(request)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "success": true }));
    assert_eq!(store.lead_count(), 1);
}

#[tokio::test]
async fn generate_handler_maps_the_wizard_fields() {
    let (service, _, _, _) = build_service(Script::NotConfigured);

    let request = GenerateRequest {
        bottleneck: "manual approvals".to_string(),
        ..GenerateRequest::default()
    };
    let response = generate_handler(State(service.clone()), axum::Json(request)).await;
    let payload = read_json_body(response).await;

    let answers = payload["answers"]
        .as_object()
        .expect("input echo present");
    assert_eq!(
        answers
            .get(QuestionKey::Bottleneck.label())
            .and_then(|value| value.as_str()),
        Some("manual approvals")
    );
}
