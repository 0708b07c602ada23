use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::domain::{AnswerSet, AuditReport, GapImpact};
use super::gaps::select_gaps;
use super::narrative::{executive_summary, focus_signal, next_steps, ReadinessBand};
use super::rules::score_answers;

/// Immediate deterministic assembly path: score, gaps, and template
/// narrative, all computed locally with no I/O.
pub fn assemble(answers: &AnswerSet) -> AuditReport {
    let card = score_answers(answers);
    assemble_with_score(answers, card.score)
}

/// Assembly with a caller-provided score (the enrichment endpoint trusts
/// the previously computed deterministic score rather than re-deriving
/// it). The score is bound-checked before it is stored.
pub fn assemble_with_score(answers: &AnswerSet, score: u8) -> AuditReport {
    let score = score.clamp(super::rules::SCORE_FLOOR, super::rules::SCORE_CEILING);
    let band = ReadinessBand::for_score(score);
    let gap_impacts = select_gaps(answers);
    let focus = focus_signal(answers);

    AuditReport {
        score,
        readiness_label: band.label().to_string(),
        summary: executive_summary(answers, band),
        gaps: gap_impacts.iter().map(|item| item.gap.clone()).collect(),
        gap_impacts,
        focus_signal: focus.to_string(),
        pillar: focus.to_string(),
        next_steps: next_steps(),
        answers: answers.clone(),
        generated_at: Utc::now(),
    }
}

/// Partial narrative replacement produced by enrichment. Unset fields
/// leave the report untouched; the score is not representable here at all,
/// which keeps it frozen by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NarrativeUpdate {
    pub summary: Option<String>,
    pub focus_signal: Option<String>,
    pub next_steps: Option<Vec<String>>,
    pub gap_impacts: Option<Vec<GapImpact>>,
}

impl NarrativeUpdate {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.focus_signal.is_none()
            && self.next_steps.is_none()
            && self.gap_impacts.is_none()
    }
}

impl AuditReport {
    /// Apply an enrichment pass. Only narrative fields move; `gaps` is
    /// rebuilt from the replacement impacts so the two lists stay parallel.
    pub fn apply_narrative(&mut self, update: NarrativeUpdate) {
        if let Some(summary) = update.summary {
            self.summary = summary;
        }
        if let Some(focus) = update.focus_signal {
            self.pillar = focus.clone();
            self.focus_signal = focus;
        }
        if let Some(steps) = update.next_steps {
            self.next_steps = steps;
        }
        if let Some(impacts) = update.gap_impacts {
            self.gaps = impacts.iter().map(|item| item.gap.clone()).collect();
            self.gap_impacts = impacts;
        }
    }
}
