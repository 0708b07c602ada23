//! Template-generated report text. This is both the immediate
//! deterministic narrative path and the fallback used whenever the hosted
//! narrative service fails.

use super::domain::{AnswerSet, QuestionKey};
use super::gaps::select_gaps;
use super::report::NarrativeUpdate;

/// Score banding shown alongside the readiness index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessBand {
    FoundationalRisk,
    StructuralConstraints,
    ExecutionDiscipline,
}

impl ReadinessBand {
    pub fn for_score(score: u8) -> Self {
        match score {
            0..=3 => ReadinessBand::FoundationalRisk,
            4..=6 => ReadinessBand::StructuralConstraints,
            _ => ReadinessBand::ExecutionDiscipline,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ReadinessBand::FoundationalRisk => "Foundational Risk Signals",
            ReadinessBand::StructuralConstraints => "Structural Constraints Emerging",
            ReadinessBand::ExecutionDiscipline => "Execution Discipline Improving",
        }
    }
}

/// Fixed industry-keyword lookup giving the summary its contextual phrase.
pub fn industry_context(answers: &AnswerSet) -> &'static str {
    let industry = answers.lowered(QuestionKey::Industry);

    if industry.contains("health") {
        "compliance pressure and complex data flows"
    } else if industry.contains("fin") {
        "regulatory sensitivity and audit expectations"
    } else if industry.contains("manufact") {
        "handoffs between planning and operations"
    } else if industry.contains("retail") {
        "inventory volatility and fragmented demand signals"
    } else if industry.contains("saas") {
        "fast iteration cycles and cross-team dependencies"
    } else if industry.contains("robot") {
        "hardware-software coordination complexity"
    } else {
        "cross-functional execution"
    }
}

/// Single recommended focus area derived from the dominant bottleneck
/// category.
pub fn focus_signal(answers: &AnswerSet) -> &'static str {
    let bottleneck = answers.lowered(QuestionKey::Bottleneck);

    if bottleneck.contains("sale") {
        "Pipeline Clarity & Handoff Discipline"
    } else if bottleneck.contains("data")
        || bottleneck.contains("kpi")
        || bottleneck.contains("visibility")
    {
        "Decision Visibility & Measurement Cadence"
    } else if bottleneck.contains("manual") || bottleneck.contains("ops") {
        "Operational Throughput & Workflow Discipline"
    } else if bottleneck.contains("security") || bottleneck.contains("compliance") {
        "Governance Posture & Access Discipline"
    } else {
        "Cross-Team Execution & Operating Rhythm"
    }
}

/// Three-sentence consultative summary parameterized by band, industry
/// context, and the stack preview.
pub fn executive_summary(answers: &AnswerSet, band: ReadinessBand) -> String {
    let context = industry_context(answers);
    let stack_preview = answers.stack_preview();

    [
        format!(
            "Your organization shows a {} profile - not due to capability gaps, but because {} tends to amplify structural friction as scale increases.",
            band.label().to_lowercase(),
            context
        ),
        format!(
            "The current stack ({}) reflects momentum and functional coverage, but also increases the likelihood of fragmented ownership and inconsistent data definitions across teams.",
            stack_preview
        ),
        "This assessment highlights where coordination, visibility, and decision cadence may break under growth - before those issues surface as missed timelines, rework, or rising operational cost.".to_string(),
    ]
    .join(" ")
}

/// Discovery-only next steps; deliberately tool-agnostic.
pub fn next_steps() -> Vec<String> {
    vec![
        "Map one high-frequency workflow end-to-end, including all handoffs.".to_string(),
        "List the top 10 weekly leadership decisions and where data comes from.".to_string(),
        "Define systems of record for core entities and note conflicts.".to_string(),
    ]
}

/// Complete template-based narrative for the given answers, used when the
/// hosted service is unreachable or returns garbage.
pub fn fallback_update(answers: &AnswerSet, score: u8) -> NarrativeUpdate {
    let band = ReadinessBand::for_score(score);
    let focus = focus_signal(answers);

    NarrativeUpdate {
        summary: Some(executive_summary(answers, band)),
        focus_signal: Some(focus.to_string()),
        next_steps: Some(next_steps()),
        gap_impacts: Some(select_gaps(answers)),
    }
}
