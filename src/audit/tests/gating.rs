use super::common::*;
use crate::audit::domain::QuestionKey;
use crate::audit::gating::{
    is_personal_domain, is_valid_email, AuditFlow, EmailSubmission, FlowPhase, GatingError,
};
use crate::audit::report::{assemble, NarrativeUpdate};

fn completed_flow() -> AuditFlow {
    let answers = saas_answers();
    let mut flow = AuditFlow::start();
    while let Some(key) = flow.current_question() {
        flow.record_answer(answers.get(key));
        flow.advance().expect("sample answers are non-empty");
    }
    flow
}

#[test]
fn advance_requires_a_non_empty_answer() {
    let mut flow = AuditFlow::start();
    assert_eq!(flow.advance(), Err(GatingError::EmptyAnswer));

    flow.record_answer("   ");
    assert_eq!(flow.advance(), Err(GatingError::EmptyAnswer));

    flow.record_answer("SaaS");
    assert_eq!(flow.advance(), Ok(()));
    assert_eq!(flow.phase(), &FlowPhase::Collecting { step: 1 });
}

#[test]
fn back_navigation_is_bounded_and_collecting_only() {
    let mut flow = AuditFlow::start();
    flow.back();
    assert_eq!(flow.phase(), &FlowPhase::Collecting { step: 0 });

    flow.record_answer("SaaS");
    flow.advance().expect("advances");
    flow.back();
    assert_eq!(flow.phase(), &FlowPhase::Collecting { step: 0 });

    let mut done = completed_flow();
    done.back();
    assert_eq!(done.phase(), &FlowPhase::EmailPending);
}

#[test]
fn completing_the_walk_scores_locally() {
    let flow = completed_flow();
    assert_eq!(flow.phase(), &FlowPhase::EmailPending);

    let report = flow.local_report().expect("local report assembled");
    assert_eq!(report.gaps.len(), 3);
    assert!((3..=9).contains(&report.score));

    // The gate is still closed.
    assert!(flow.unlocked_report().is_none());
}

#[test]
fn no_report_is_visible_while_collecting() {
    let flow = AuditFlow::start();
    assert!(flow.local_report().is_none());
    assert!(flow.unlocked_report().is_none());
}

#[test]
fn email_submission_requires_a_scored_report() {
    let mut flow = AuditFlow::start();
    assert_eq!(
        flow.submit_email("ops@example.com"),
        Err(GatingError::NotReady)
    );
}

#[test]
fn invalid_emails_are_rejected_in_place() {
    let mut flow = completed_flow();
    for email in ["", "plainaddress", "a@b", "no-at-sign.com", "a@b.c"] {
        assert_eq!(
            flow.submit_email(email),
            Err(GatingError::InvalidEmail),
            "{email:?} should be rejected"
        );
        assert_eq!(flow.phase(), &FlowPhase::EmailPending);
    }
}

#[test]
fn personal_domain_draws_one_warning_then_proceeds_on_override() {
    let mut flow = completed_flow();

    let outcome = flow
        .submit_email("user@gmail.com")
        .expect("submission is syntactically valid");
    assert_eq!(outcome, EmailSubmission::PersonalDomainWarning);
    assert_eq!(
        flow.phase(),
        &FlowPhase::PersonalEmailWarning {
            email: "user@gmail.com".to_string()
        }
    );

    // The explicit override re-invokes submission and yields exactly one
    // enrichment request.
    let request = match flow.use_anyway().expect("override proceeds") {
        EmailSubmission::Proceed(request) => request,
        other => panic!("expected Proceed, got {other:?}"),
    };
    assert_eq!(request.email, "user@gmail.com");
    assert_eq!(request.initial_gaps.len(), 3);
    assert_eq!(
        request.score,
        flow.local_report().expect("report").score,
        "request carries the frozen local score"
    );
}

#[test]
fn business_domain_proceeds_without_warning() {
    let mut flow = completed_flow();
    let outcome = flow
        .submit_email("ops@acme-industries.com")
        .expect("valid email");
    assert!(matches!(outcome, EmailSubmission::Proceed(_)));
    assert_eq!(flow.phase(), &FlowPhase::EmailPending);
}

#[test]
fn enrichment_applies_partially_and_unlocks() {
    let mut flow = completed_flow();
    let before = flow.local_report().expect("report").clone();

    flow.submit_email("ops@acme-industries.com")
        .expect("valid email");
    flow.apply_enrichment(NarrativeUpdate {
        summary: Some("Sharper summary.".to_string()),
        ..NarrativeUpdate::default()
    })
    .expect("unlocks");

    let unlocked = flow.unlocked_report().expect("gate open");
    assert_eq!(unlocked.summary, "Sharper summary.");
    // Unspecified fields retain prior values; score is frozen.
    assert_eq!(unlocked.score, before.score);
    assert_eq!(unlocked.next_steps, before.next_steps);
    assert_eq!(unlocked.gap_impacts, before.gap_impacts);
    assert_eq!(unlocked.focus_signal, before.focus_signal);
}

#[test]
fn failed_enrichment_loses_no_state() {
    let mut flow = completed_flow();
    flow.submit_email("user@gmail.com").expect("valid email");

    // The caller got a transport error and simply retries: the warning
    // phase and the recorded answers are all still there.
    assert!(matches!(
        flow.phase(),
        FlowPhase::PersonalEmailWarning { .. }
    ));
    assert_eq!(flow.answers(), &saas_answers());
    assert!(flow.use_anyway().is_ok());
}

#[test]
fn resume_requires_a_report() {
    assert!(AuditFlow::resume(None).is_none());

    let report = assemble(&saas_answers());
    let flow = AuditFlow::resume(Some(report.clone())).expect("resumes");
    assert_eq!(flow.phase(), &FlowPhase::EmailPending);
    assert_eq!(flow.local_report(), Some(&report));
    assert_eq!(flow.answers(), &report.answers);
}

#[test]
fn email_helpers_follow_the_basic_rules() {
    assert!(is_valid_email("a@b.co"));
    assert!(!is_valid_email("a@b.c"));
    assert!(!is_valid_email("nodots@com"));

    assert!(is_personal_domain("someone@GMAIL.com"));
    assert!(is_personal_domain("x@proton.me"));
    assert!(!is_personal_domain("someone@acme.com"));
}

#[test]
fn question_sequence_drives_the_walk() {
    let mut flow = AuditFlow::start();
    let mut seen = Vec::new();
    while let Some(key) = flow.current_question() {
        seen.push(key);
        flow.record_answer("answer");
        flow.advance().expect("advances");
    }
    assert_eq!(seen, QuestionKey::SEQUENCE);
}
