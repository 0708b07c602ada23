use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for persisted audit reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditId(pub String);

static AUDIT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

impl AuditId {
    /// Timestamp-derived identifier. The sequence suffix keeps ids unique
    /// when two reports land in the same millisecond.
    pub fn generate() -> Self {
        let seq = AUDIT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        AuditId(format!("{}-{seq:04}", Utc::now().timestamp_millis()))
    }
}

impl fmt::Display for AuditId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The nine canonical questionnaire keys. Wire names are preserved
/// verbatim from the original form payloads (mixed camel/snake case).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum QuestionKey {
    #[serde(rename = "industry")]
    Industry,
    #[serde(rename = "businessSize")]
    BusinessSize,
    #[serde(rename = "infrastructure")]
    Infrastructure,
    #[serde(rename = "bottleneck")]
    Bottleneck,
    #[serde(rename = "automation")]
    Automation,
    #[serde(rename = "data")]
    Data,
    #[serde(rename = "ai_readiness")]
    AiReadiness,
    #[serde(rename = "customer_journey")]
    CustomerJourney,
    #[serde(rename = "tech_stack")]
    TechStack,
}

impl QuestionKey {
    /// Wizard presentation order. Drives the gating controller's
    /// `Collecting` steps.
    pub const SEQUENCE: [QuestionKey; 9] = [
        QuestionKey::Industry,
        QuestionKey::BusinessSize,
        QuestionKey::Infrastructure,
        QuestionKey::Bottleneck,
        QuestionKey::Automation,
        QuestionKey::Data,
        QuestionKey::AiReadiness,
        QuestionKey::CustomerJourney,
        QuestionKey::TechStack,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            QuestionKey::Industry => "industry",
            QuestionKey::BusinessSize => "businessSize",
            QuestionKey::Infrastructure => "infrastructure",
            QuestionKey::Bottleneck => "bottleneck",
            QuestionKey::Automation => "automation",
            QuestionKey::Data => "data",
            QuestionKey::AiReadiness => "ai_readiness",
            QuestionKey::CustomerJourney => "customer_journey",
            QuestionKey::TechStack => "tech_stack",
        }
    }

    pub const fn prompt(self) -> &'static str {
        match self {
            QuestionKey::Industry => "What industry do you operate in?",
            QuestionKey::BusinessSize => "What is your organization's size?",
            QuestionKey::Infrastructure => "How would you describe your infrastructure?",
            QuestionKey::Bottleneck => "What is your biggest operational bottleneck?",
            QuestionKey::Automation => "How automated are your core workflows?",
            QuestionKey::Data => "How is your operational data managed?",
            QuestionKey::AiReadiness => "Where are you on AI adoption?",
            QuestionKey::CustomerJourney => "How well instrumented is your customer journey?",
            QuestionKey::TechStack => "Which tools make up your current stack?",
        }
    }
}

/// Questionnaire answers keyed by question. Reads are total: an absent key
/// reads as the empty string, so downstream heuristics never fail on
/// missing input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet(BTreeMap<QuestionKey, String>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: QuestionKey, value: impl Into<String>) {
        self.0.insert(key, value.into());
    }

    /// Builder-style variant of [`AnswerSet::set`].
    pub fn with(mut self, key: QuestionKey, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: QuestionKey) -> &str {
        self.0.get(&key).map(String::as_str).unwrap_or_default()
    }

    /// Trimmed, lower-cased view used by keyword predicates.
    pub fn lowered(&self, key: QuestionKey) -> String {
        self.get(key).trim().to_lowercase()
    }

    /// Number of non-empty comma-separated entries in the tech stack.
    pub fn tool_count(&self) -> usize {
        self.get(QuestionKey::TechStack)
            .split(',')
            .filter(|tool| !tool.trim().is_empty())
            .count()
    }

    /// First few stack entries for narrative display.
    pub fn stack_preview(&self) -> String {
        let tools: Vec<&str> = self
            .get(QuestionKey::TechStack)
            .split(',')
            .map(str::trim)
            .filter(|tool| !tool.is_empty())
            .take(6)
            .collect();

        if tools.is_empty() {
            "not specified".to_string()
        } else {
            tools.join(", ")
        }
    }
}

/// A structural weakness paired with its business-impact rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapImpact {
    pub gap: String,
    pub why_it_matters: String,
}

/// Contact-form lead. Shares the persistence mechanism with audits but is
/// otherwise unrelated to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "timestamp")]
    pub submitted_at: DateTime<Utc>,
}

/// Assembled readiness report. Immutable once persisted, except that a
/// successful enrichment pass may overwrite the narrative fields via
/// [`AuditReport::apply_narrative`]; the score is never touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub score: u8,
    pub readiness_label: String,
    pub summary: String,
    pub gaps: Vec<String>,
    pub gap_impacts: Vec<GapImpact>,
    pub focus_signal: String,
    /// Legacy UI field, kept in lockstep with `focus_signal`.
    pub pillar: String,
    pub next_steps: Vec<String>,
    /// Input echo retained with the report for later context.
    #[serde(default)]
    pub answers: AnswerSet,
    #[serde(rename = "timestamp")]
    pub generated_at: DateTime<Utc>,
}

/// A report under its persistence identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: AuditId,
    #[serde(flatten)]
    pub report: AuditReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_answers_read_as_empty() {
        let answers = AnswerSet::new();
        assert_eq!(answers.get(QuestionKey::Bottleneck), "");
        assert_eq!(answers.lowered(QuestionKey::Industry), "");
        assert_eq!(answers.tool_count(), 0);
        assert_eq!(answers.stack_preview(), "not specified");
    }

    #[test]
    fn tool_count_ignores_blank_entries() {
        let answers =
            AnswerSet::new().with(QuestionKey::TechStack, "HubSpot, , Slack,Notion,  ,Jira");
        assert_eq!(answers.tool_count(), 4);
        assert_eq!(answers.stack_preview(), "HubSpot, Slack, Notion, Jira");
    }

    #[test]
    fn answer_set_round_trips_wire_names() {
        let answers = AnswerSet::new()
            .with(QuestionKey::BusinessSize, "SMB ($1M - $10M)")
            .with(QuestionKey::TechStack, "a,b");
        let json = serde_json::to_value(&answers).expect("serializes");
        assert_eq!(json["businessSize"], "SMB ($1M - $10M)");
        assert_eq!(json["tech_stack"], "a,b");

        let back: AnswerSet = serde_json::from_value(json).expect("deserializes");
        assert_eq!(back, answers);
    }

    #[test]
    fn generated_ids_are_unique() {
        let first = AuditId::generate();
        let second = AuditId::generate();
        assert_ne!(first, second);
    }
}
