//! OpenAI chat-completions reasoning adapter
//!
//! Sends one system prompt and one claim prompt per call. The response text
//! is scored with [`extract_confidence`] and [`determine_status`]; any
//! transport, HTTP or empty-response failure is returned as an [`AiError`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable};
use domain_claims::HealthcareClaim;

use crate::confidence::{determine_status, extract_confidence};
use crate::error::AiError;
use crate::ports::{MedicalReasoning, ReasoningProvider};

const SYSTEM_PROMPT: &str = "You are a healthcare AI assistant specializing in medical claims review and validation.
You have extensive knowledge of:
- CPT/HCPCS procedure codes and their medical indications
- ICD-10 diagnosis codes and associated conditions
- Medical necessity criteria and evidence-based guidelines
- Healthcare cost-effectiveness principles

Always provide clear, evidence-based reasoning that could be understood by both
medical professionals and healthcare executives. Focus on patient safety,
medical appropriateness, and cost-effective care.";

/// Connection settings for the chat-completions endpoint
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gpt-4".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: 1000,
            temperature: 0.1,
            timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Reasoning provider backed by an OpenAI-compatible API
pub struct OpenAiReasoningProvider {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiReasoningProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, AiError> {
        if config.api_key.trim().is_empty() {
            return Err(AiError::Configuration("OpenAI API key is not set".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: prompt },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout(self.config.timeout.as_secs())
                } else {
                    AiError::from(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AiError::EmptyResponse)
    }
}

impl DomainPort for OpenAiReasoningProvider {}

#[async_trait]
impl HealthCheckable for OpenAiReasoningProvider {
    async fn health_check(&self) -> HealthCheckResult {
        // Configuration only; a live call would be billed.
        let mut result = HealthCheckResult::healthy("openai-reasoning", 0);
        result.message = Some(format!("model {}", self.config.model));
        result
    }
}

#[async_trait]
impl ReasoningProvider for OpenAiReasoningProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn medical_reasoning(&self, claim: &HealthcareClaim) -> Result<MedicalReasoning, AiError> {
        let started = Instant::now();
        let prompt = build_medical_prompt(claim);
        debug!(claim_id = %claim.claim_id, model = %self.config.model, "Requesting medical reasoning");

        let text = self.complete(&prompt).await?;
        let confidence = extract_confidence(&text);
        let status = determine_status(&text, confidence);

        info!(
            claim_id = %claim.claim_id,
            confidence_score = confidence,
            validation_status = %status,
            response_chars = text.chars().count(),
            duration_ms = started.elapsed().as_millis() as u64,
            "OpenAI medical reasoning completed"
        );

        Ok(MedicalReasoning {
            text,
            confidence,
            status,
        })
    }
}

/// User prompt for a claim
pub fn build_medical_prompt(claim: &HealthcareClaim) -> String {
    let context = claim
        .medical_necessity_context
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or("Not provided");

    format!(
        "Analyze this healthcare claim for medical necessity and appropriateness:

CLAIM DETAILS:
- Procedure: {procedure}
- Diagnosis: {diagnosis}
- Amount: {amount}
- Clinical Context: {context}

EVALUATION CRITERIA:
1. Medical necessity based on diagnosis
2. Appropriateness of procedure for condition
3. Cost-effectiveness compared to alternatives
4. Compliance with standard care guidelines

Please provide:
1. Detailed medical reasoning (150-300 words)
2. Recommendation: APPROVED/DENIED/REQUIRES_REVIEW
3. Confidence score (0-100%)

Format your response with clear sections and include the confidence score.",
        procedure = claim.procedure_code,
        diagnosis = claim.diagnosis_code,
        amount = claim.claim_amount,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_rejected() {
        let err = OpenAiReasoningProvider::new(OpenAiConfig::default()).err();
        assert!(matches!(err, Some(AiError::Configuration(_))));
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let provider = OpenAiReasoningProvider::new(OpenAiConfig {
            api_key: "sk-test-0123456789abcdef".to_string(),
            base_url: "http://localhost:9000/v1/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(provider.endpoint(), "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn test_response_without_content_decodes() {
        let body: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap();
        assert!(body.choices[0].message.content.is_none());
    }
}
