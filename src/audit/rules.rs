use serde::{Deserialize, Serialize};

use super::domain::{AnswerSet, QuestionKey};

pub const BASELINE_SCORE: i16 = 10;
pub const SCORE_FLOOR: u8 = 3;
pub const SCORE_CEILING: u8 = 9;

/// Factors permitted in the scoring rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreFactor {
    OrganizationScale,
    ManualOperations,
    DataVisibility,
    CoordinationDrag,
    SecurityPosture,
    InfrastructureMaturity,
    ToolSprawl,
}

/// Predicate side of a scoring or gap rule.
pub(crate) enum Trigger {
    /// Any of the keywords appears in any of the named fields (lower-cased
    /// substring match).
    Keyword {
        fields: &'static [QuestionKey],
        any: &'static [&'static str],
    },
    /// The tech stack lists at least this many tools.
    StackBreadth { min_tools: usize },
}

impl Trigger {
    pub(crate) fn fires(&self, answers: &AnswerSet) -> bool {
        match self {
            Trigger::Keyword { fields, any } => fields.iter().any(|field| {
                let value = answers.lowered(*field);
                !value.is_empty() && any.iter().any(|needle| value.contains(needle))
            }),
            Trigger::StackBreadth { min_tools } => answers.tool_count() >= *min_tools,
        }
    }
}

pub(crate) struct ScoreRule {
    pub factor: ScoreFactor,
    pub trigger: Trigger,
    /// Negative delta applied when the rule fires.
    pub penalty: i16,
    pub note: &'static str,
}

// Rules are additive and independent: each fires at most once and the
// clamp is applied once, after all of them.
pub(crate) const SCORE_RULES: &[ScoreRule] = &[
    ScoreRule {
        factor: ScoreFactor::OrganizationScale,
        trigger: Trigger::Keyword {
            fields: &[QuestionKey::BusinessSize],
            any: &["mid", "smb", "11", "50"],
        },
        penalty: -1,
        note: "mid-market scale adds coordination surface",
    },
    ScoreRule {
        factor: ScoreFactor::OrganizationScale,
        trigger: Trigger::Keyword {
            fields: &[QuestionKey::BusinessSize],
            any: &["enterprise", "large", "100"],
        },
        penalty: -2,
        note: "enterprise scale amplifies structural friction",
    },
    ScoreRule {
        factor: ScoreFactor::ManualOperations,
        trigger: Trigger::Keyword {
            fields: &[QuestionKey::Bottleneck, QuestionKey::Automation],
            any: &["manual", "ops", "operation"],
        },
        penalty: -1,
        note: "manual workflows cap throughput",
    },
    ScoreRule {
        factor: ScoreFactor::DataVisibility,
        trigger: Trigger::Keyword {
            fields: &[QuestionKey::Bottleneck],
            any: &["data", "kpi", "visibility", "report"],
        },
        penalty: -1,
        note: "reporting gaps obscure decision inputs",
    },
    ScoreRule {
        factor: ScoreFactor::CoordinationDrag,
        trigger: Trigger::Keyword {
            fields: &[QuestionKey::Bottleneck],
            any: &["handoff", "approval", "coordination"],
        },
        penalty: -1,
        note: "handoff friction slows execution",
    },
    ScoreRule {
        factor: ScoreFactor::SecurityPosture,
        trigger: Trigger::Keyword {
            fields: &[QuestionKey::Bottleneck],
            any: &["security", "compliance", "access"],
        },
        penalty: -1,
        note: "control gaps accumulate audit risk",
    },
    ScoreRule {
        factor: ScoreFactor::InfrastructureMaturity,
        trigger: Trigger::Keyword {
            fields: &[QuestionKey::Infrastructure],
            any: &["legacy"],
        },
        penalty: -2,
        note: "legacy systems resist integration",
    },
    ScoreRule {
        factor: ScoreFactor::InfrastructureMaturity,
        trigger: Trigger::Keyword {
            fields: &[QuestionKey::Infrastructure],
            any: &["hybrid"],
        },
        penalty: -1,
        note: "hybrid estates split operational focus",
    },
    ScoreRule {
        factor: ScoreFactor::ToolSprawl,
        trigger: Trigger::StackBreadth { min_tools: 7 },
        penalty: -1,
        note: "tool sprawl raises coordination cost",
    },
];

/// Discrete contribution to a score, kept for transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub delta: i16,
    pub note: String,
}

/// Scoring outcome: the clamped readiness score plus its component trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub score: u8,
    pub components: Vec<ScoreComponent>,
}

/// Deterministic readiness score. Pure and total: every field read has a
/// default, so any answer map (including an empty one) scores.
pub fn score_answers(answers: &AnswerSet) -> ScoreCard {
    let mut total = BASELINE_SCORE;
    let mut components = Vec::new();

    for rule in SCORE_RULES {
        if rule.trigger.fires(answers) {
            total += rule.penalty;
            components.push(ScoreComponent {
                factor: rule.factor,
                delta: rule.penalty,
                note: rule.note.to_string(),
            });
        }
    }

    let score = total.clamp(SCORE_FLOOR as i16, SCORE_CEILING as i16) as u8;

    ScoreCard { score, components }
}
