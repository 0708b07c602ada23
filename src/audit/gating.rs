//! Progressive-disclosure controller for the audit flow.
//!
//! A strict linear gate: questionnaire steps advance one at a time, the
//! locally scored report sits behind an email capture, personal-domain
//! addresses get one soft warning, and enriched narrative content is
//! observable only after [`FlowPhase::Unlocked`]. The only reversible
//! transition is step back-navigation while collecting.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::domain::{AnswerSet, AuditReport, QuestionKey};
use super::report::{assemble, NarrativeUpdate};

/// Consumer email domains that draw a soft warning before submission.
pub const PERSONAL_EMAIL_DOMAINS: [&str; 8] = [
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "icloud.com",
    "aol.com",
    "proton.me",
    "protonmail.com",
];

/// Hold applied by the wizard's processing screen before results show.
/// Pure presentation pacing, not tied to real work.
pub const PROCESSING_HOLD: Duration = Duration::from_secs(3);

pub fn is_valid_email(email: &str) -> bool {
    email.contains('@') && email.contains('.') && email.len() >= 6
}

pub fn email_domain(email: &str) -> &str {
    match email.rfind('@') {
        Some(at) => email[at + 1..].trim(),
        None => "",
    }
}

pub fn is_personal_domain(email: &str) -> bool {
    let domain = email_domain(email).to_lowercase();
    PERSONAL_EMAIL_DOMAINS.contains(&domain.as_str())
}

/// Where the flow currently stands. In `EmailPending` a locally scored
/// report exists and the gate is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowPhase {
    Collecting { step: usize },
    EmailPending,
    PersonalEmailWarning { email: String },
    Unlocked,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatingError {
    #[error("answer required before advancing")]
    EmptyAnswer,
    #[error("enter a valid email address")]
    InvalidEmail,
    #[error("questionnaire not complete")]
    NotReady,
}

/// Payload the caller must send to the summary endpoint. Issued at most
/// once per accepted submission; the controller itself performs no I/O.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentRequest {
    pub email: String,
    pub answers: AnswerSet,
    pub score: u8,
    pub initial_gaps: Vec<String>,
}

/// Outcome of an email submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EmailSubmission {
    /// Soft gate engaged; no network request may be issued.
    PersonalDomainWarning,
    /// Proceed: the caller now issues exactly one enrichment request.
    Proceed(EnrichmentRequest),
}

#[derive(Debug, Clone)]
pub struct AuditFlow {
    answers: AnswerSet,
    phase: FlowPhase,
    report: Option<AuditReport>,
    allow_personal_email: bool,
}

impl AuditFlow {
    /// Fresh wizard at the first question.
    pub fn start() -> Self {
        Self {
            answers: AnswerSet::new(),
            phase: FlowPhase::Collecting { step: 0 },
            report: None,
            allow_personal_email: false,
        }
    }

    /// Resume the results-side gate from navigation state. The report is
    /// an explicit optional input: without one there is nothing to gate,
    /// and the caller renders the "no report" view instead.
    pub fn resume(report: Option<AuditReport>) -> Option<Self> {
        report.map(|report| Self {
            answers: report.answers.clone(),
            phase: FlowPhase::EmailPending,
            report: Some(report),
            allow_personal_email: false,
        })
    }

    pub fn phase(&self) -> &FlowPhase {
        &self.phase
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// The question currently awaiting an answer, if still collecting.
    pub fn current_question(&self) -> Option<QuestionKey> {
        match self.phase {
            FlowPhase::Collecting { step } => QuestionKey::SEQUENCE.get(step).copied(),
            _ => None,
        }
    }

    /// Record (or overwrite) the answer for the current question.
    pub fn record_answer(&mut self, value: impl Into<String>) {
        if let Some(key) = self.current_question() {
            self.answers.set(key, value);
        }
    }

    /// Advance one step. Requires a non-empty answer for the current
    /// question; the final advance scores the questionnaire and closes
    /// the collection phase.
    pub fn advance(&mut self) -> Result<(), GatingError> {
        let step = match self.phase {
            FlowPhase::Collecting { step } => step,
            _ => return Err(GatingError::NotReady),
        };

        let key = QuestionKey::SEQUENCE[step];
        if self.answers.get(key).trim().is_empty() {
            return Err(GatingError::EmptyAnswer);
        }

        if step + 1 < QuestionKey::SEQUENCE.len() {
            self.phase = FlowPhase::Collecting { step: step + 1 };
        } else {
            self.report = Some(assemble(&self.answers));
            self.phase = FlowPhase::EmailPending;
        }
        Ok(())
    }

    /// Step back one question. A no-op at the first question and outside
    /// the collection phase; nothing else in the flow is reversible.
    pub fn back(&mut self) {
        if let FlowPhase::Collecting { step } = self.phase {
            if step > 0 {
                self.phase = FlowPhase::Collecting { step: step - 1 };
            }
        }
    }

    /// The locally scored report, available once collection finishes.
    pub fn local_report(&self) -> Option<&AuditReport> {
        match self.phase {
            FlowPhase::Collecting { .. } => None,
            _ => self.report.as_ref(),
        }
    }

    /// Submit an email against the gate.
    ///
    /// Invalid addresses are rejected in place. A personal domain draws a
    /// single soft warning unless the override flag is set; acknowledging
    /// the warning via [`AuditFlow::use_anyway`] sets the flag and
    /// resubmits. Only `Proceed` permits a network call.
    pub fn submit_email(&mut self, email: &str) -> Result<EmailSubmission, GatingError> {
        match self.phase {
            FlowPhase::EmailPending | FlowPhase::PersonalEmailWarning { .. } => {}
            _ => return Err(GatingError::NotReady),
        }

        let normalized = email.trim().to_lowercase();
        if !is_valid_email(&normalized) {
            return Err(GatingError::InvalidEmail);
        }

        if is_personal_domain(&normalized) && !self.allow_personal_email {
            self.phase = FlowPhase::PersonalEmailWarning {
                email: normalized.clone(),
            };
            return Ok(EmailSubmission::PersonalDomainWarning);
        }

        let report = self.report.as_ref().ok_or(GatingError::NotReady)?;
        Ok(EmailSubmission::Proceed(EnrichmentRequest {
            email: normalized,
            answers: self.answers.clone(),
            score: report.score,
            initial_gaps: report.gaps.clone(),
        }))
    }

    /// Explicit "use this email anyway": set the override flag and
    /// re-invoke submission, which now bypasses the domain check.
    pub fn use_anyway(&mut self) -> Result<EmailSubmission, GatingError> {
        let email = match &self.phase {
            FlowPhase::PersonalEmailWarning { email } => email.clone(),
            _ => return Err(GatingError::NotReady),
        };
        self.allow_personal_email = true;
        self.submit_email(&email)
    }

    /// A successful enrichment call: merge the returned narrative into the
    /// local report (partial update, score untouched) and open the gate.
    /// A failed call needs no method at all: state is simply unchanged
    /// and the submission can be retried.
    pub fn apply_enrichment(&mut self, update: NarrativeUpdate) -> Result<(), GatingError> {
        match self.phase {
            FlowPhase::EmailPending | FlowPhase::PersonalEmailWarning { .. } => {}
            _ => return Err(GatingError::NotReady),
        }
        let report = self.report.as_mut().ok_or(GatingError::NotReady)?;
        report.apply_narrative(update);
        self.phase = FlowPhase::Unlocked;
        Ok(())
    }

    /// Enriched report content. `None` until the gate has opened, which is
    /// what keeps full narrative and next steps out of pre-unlock UI state.
    pub fn unlocked_report(&self) -> Option<&AuditReport> {
        match self.phase {
            FlowPhase::Unlocked => self.report.as_ref(),
            _ => None,
        }
    }
}
