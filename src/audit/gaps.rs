use serde::{Deserialize, Serialize};

use super::domain::{AnswerSet, GapImpact, QuestionKey};
use super::rules::Trigger;

/// Keys into the fixed gap catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapKey {
    Silos,
    Manual,
    Ownership,
    Visibility,
    Integration,
    Security,
}

pub(crate) struct GapEntry {
    pub key: GapKey,
    pub label: &'static str,
    pub why_it_matters: &'static str,
}

// Declaration order doubles as backfill priority.
pub(crate) const GAP_CATALOGUE: &[GapEntry] = &[
    GapEntry {
        key: GapKey::Silos,
        label: "Disparate data silos across teams",
        why_it_matters: "Decisions slow down when teams operate on different versions of the truth.",
    },
    GapEntry {
        key: GapKey::Manual,
        label: "Manual workflows in critical operations",
        why_it_matters: "Throughput becomes people-dependent, increasing variability as volume grows.",
    },
    GapEntry {
        key: GapKey::Ownership,
        label: "Unclear ownership of systems and data",
        why_it_matters: "Accountability diffuses, making root-cause analysis difficult.",
    },
    GapEntry {
        key: GapKey::Visibility,
        label: "Limited operational visibility",
        why_it_matters: "Corrective action arrives only after business impact is felt.",
    },
    GapEntry {
        key: GapKey::Integration,
        label: "Tool sprawl without governance",
        why_it_matters: "Coordination cost increases as systems grow without alignment.",
    },
    GapEntry {
        key: GapKey::Security,
        label: "Inconsistent access controls",
        why_it_matters: "Risk accumulates silently and surfaces during audits or incidents.",
    },
];

struct GapTrigger {
    trigger: Trigger,
    include: &'static [GapKey],
}

const GAP_TRIGGERS: &[GapTrigger] = &[
    GapTrigger {
        trigger: Trigger::Keyword {
            fields: &[QuestionKey::Bottleneck],
            any: &["data", "kpi", "report", "visibility"],
        },
        include: &[GapKey::Visibility, GapKey::Silos],
    },
    GapTrigger {
        trigger: Trigger::Keyword {
            fields: &[QuestionKey::Bottleneck, QuestionKey::Automation],
            any: &["manual", "ops", "handoff", "approval"],
        },
        include: &[GapKey::Manual, GapKey::Ownership],
    },
    GapTrigger {
        trigger: Trigger::StackBreadth { min_tools: 7 },
        include: &[GapKey::Integration],
    },
    GapTrigger {
        trigger: Trigger::Keyword {
            fields: &[QuestionKey::Bottleneck, QuestionKey::Industry],
            any: &["security", "compliance", "health", "fin"],
        },
        include: &[GapKey::Security],
    },
];

pub const MAX_GAPS: usize = 3;

/// Priority-ordered set union with a guaranteed minimum: trigger matches
/// first (first-seen order, deduplicated by key), then backfill from the
/// catalogue until three entries exist. Never returns an empty list.
pub fn select_gaps(answers: &AnswerSet) -> Vec<GapImpact> {
    let mut keys: Vec<GapKey> = Vec::new();

    for rule in GAP_TRIGGERS {
        if rule.trigger.fires(answers) {
            for key in rule.include {
                if !keys.contains(key) {
                    keys.push(*key);
                }
            }
        }
    }

    for entry in GAP_CATALOGUE {
        if keys.len() >= MAX_GAPS {
            break;
        }
        if !keys.contains(&entry.key) {
            keys.push(entry.key);
        }
    }

    keys.truncate(MAX_GAPS);

    keys.iter()
        .filter_map(|key| GAP_CATALOGUE.iter().find(|entry| entry.key == *key))
        .map(|entry| GapImpact {
            gap: entry.label.to_string(),
            why_it_matters: entry.why_it_matters.to_string(),
        })
        .collect()
}
