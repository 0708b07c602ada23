//! Gateway to the hosted narrative (text-completion) service.
//!
//! The service is an external collaborator with a small contract: it gets
//! a structured business-context prompt and must answer with a JSON object
//! carrying `summary`, `focusSignal`, `nextSteps`, and `gapImpacts`.
//! Anything else is a malformed response, which the caller downgrades to
//! the template fallback.

use serde::Serialize;
use serde_json::json;

use super::domain::{AnswerSet, QuestionKey};
use super::report::NarrativeUpdate;
use crate::config::NarrativeConfig;

/// Business context shipped to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativePrompt {
    pub industry: String,
    pub business_size: String,
    pub infrastructure: String,
    pub bottleneck: String,
    pub automation: String,
    pub tech_stack: String,
    pub score: u8,
    pub gaps: Vec<String>,
}

impl NarrativePrompt {
    pub fn from_context(answers: &AnswerSet, score: u8, gaps: &[String]) -> Self {
        Self {
            industry: answers.get(QuestionKey::Industry).to_string(),
            business_size: answers.get(QuestionKey::BusinessSize).to_string(),
            infrastructure: answers.get(QuestionKey::Infrastructure).to_string(),
            bottleneck: answers.get(QuestionKey::Bottleneck).to_string(),
            automation: answers.get(QuestionKey::Automation).to_string(),
            tech_stack: answers.get(QuestionKey::TechStack).to_string(),
            score,
            gaps: gaps.to_vec(),
        }
    }

    /// Instruction text for the completion endpoint. The response contract
    /// is restated inline so the hosted model has no excuse.
    pub fn render(&self) -> String {
        format!(
            concat!(
                "You are drafting a consultative digital-readiness summary. ",
                "Business context: industry={industry:?}, size={size:?}, ",
                "infrastructure={infra:?}, bottleneck={bottleneck:?}, ",
                "automation={automation:?}, stack={stack:?}. ",
                "The deterministic readiness score is {score} and the ",
                "identified gaps are {gaps:?}. The score is final; do not ",
                "revise it. Respond with a single JSON object with keys ",
                "\"summary\" (string), \"focusSignal\" (string), ",
                "\"nextSteps\" (array of exactly 3 strings), and ",
                "\"gapImpacts\" (array of {{\"gap\", \"whyItMatters\"}} ",
                "objects, one per gap)."
            ),
            industry = self.industry,
            size = self.business_size,
            infra = self.infrastructure,
            bottleneck = self.bottleneck,
            automation = self.automation,
            stack = self.tech_stack,
            score = self.score,
            gaps = self.gaps,
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("narrative service not configured")]
    NotConfigured,
    #[error("narrative transport failure: {0}")]
    Transport(String),
    #[error("narrative response malformed: {0}")]
    Malformed(String),
}

/// Seam for the hosted completion service so tests and the unconfigured
/// deployment can stand in for it.
pub trait NarrativeGateway: Send + Sync {
    fn generate(&self, prompt: &NarrativePrompt) -> Result<NarrativeUpdate, NarrativeError>;
}

/// Stand-in gateway for deployments without narrative credentials. The
/// summary endpoint maps this error to its explicit 503 operator signal.
pub struct UnconfiguredGateway;

impl NarrativeGateway for UnconfiguredGateway {
    fn generate(&self, _prompt: &NarrativePrompt) -> Result<NarrativeUpdate, NarrativeError> {
        Err(NarrativeError::NotConfigured)
    }
}

/// Thin blocking client for the hosted completion endpoint. The service
/// layer bridges it into async with `spawn_blocking`; no timeout is set
/// beyond the transport default.
pub struct HostedCompletionClient {
    endpoint: String,
    api_key: String,
    model: String,
    agent: ureq::Agent,
}

impl HostedCompletionClient {
    /// Build a client when both endpoint and key are configured.
    pub fn from_config(config: &NarrativeConfig) -> Option<Self> {
        let endpoint = config.api_url.clone()?;
        let api_key = config.api_key.clone()?;
        Some(Self {
            endpoint,
            api_key,
            model: config.model.clone(),
            agent: ureq::agent(),
        })
    }
}

impl NarrativeGateway for HostedCompletionClient {
    fn generate(&self, prompt: &NarrativePrompt) -> Result<NarrativeUpdate, NarrativeError> {
        let payload = json!({
            "model": self.model,
            "prompt": prompt.render(),
            "max_tokens": 600,
        });

        let response = self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(payload)
            .map_err(|err| NarrativeError::Transport(err.to_string()))?;

        let body: serde_json::Value = response
            .into_json()
            .map_err(|err| NarrativeError::Transport(err.to_string()))?;

        let completion = body
            .get("completion")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| NarrativeError::Malformed("missing completion field".to_string()))?;

        parse_completion(completion)
    }
}

/// Extract the JSON object from a completion, tolerating prose or code
/// fences around it.
pub(crate) fn parse_completion(text: &str) -> Result<NarrativeUpdate, NarrativeError> {
    let start = text
        .find('{')
        .ok_or_else(|| NarrativeError::Malformed("no JSON object in completion".to_string()))?;
    let end = text
        .rfind('}')
        .ok_or_else(|| NarrativeError::Malformed("unterminated JSON object".to_string()))?;
    if end < start {
        return Err(NarrativeError::Malformed(
            "unterminated JSON object".to_string(),
        ));
    }

    let update: NarrativeUpdate = serde_json::from_str(&text[start..=end])
        .map_err(|err| NarrativeError::Malformed(err.to_string()))?;

    if update.is_empty() {
        return Err(NarrativeError::Malformed(
            "completion carried no usable fields".to_string(),
        ));
    }

    Ok(update)
}
