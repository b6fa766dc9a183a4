//! Résumé analysis through a remote model: request, response normalization and parsing

use crate::config::LlmConfig;
use crate::error::{AdvisorError, Result};
use crate::llm::client::TextGenerator;
use crate::llm::prompts::PromptTemplates;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// One analysis run's inputs. Both texts are non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    resume_text: String,
    job_description_text: String,
}

impl AnalysisRequest {
    pub fn new(resume_text: impl Into<String>, job_description_text: impl Into<String>) -> Result<Self> {
        let resume_text = resume_text.into();
        let job_description_text = job_description_text.into();

        if resume_text.trim().is_empty() {
            return Err(AdvisorError::Validation("resume text is empty".to_string()));
        }
        if job_description_text.trim().is_empty() {
            return Err(AdvisorError::Validation("job description is empty".to_string()));
        }

        Ok(Self {
            resume_text,
            job_description_text,
        })
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn job_description_text(&self) -> &str {
        &self.job_description_text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Importance {
    High,
    Medium,
    Low,
}

impl FromStr for Importance {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Importance::High),
            "medium" => Ok(Importance::Medium),
            "low" => Ok(Importance::Low),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Importance::High => "High",
            Importance::Medium => "Medium",
            Importance::Low => "Low",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissingSkill {
    pub skill: Option<String>,
    pub importance: Option<Importance>,
    pub explanation: Option<String>,
}

/// The model's answer. Every field is optional: absent or ill-typed fields are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub match_score: Option<Number>,
    pub candidate_summary: Option<String>,
    pub missing_skills: Option<Vec<MissingSkill>>,
    pub resume_recommendations: Option<Vec<String>>,
    pub career_advice: Option<String>,
    pub feedback: Option<String>,
    /// The parsed JSON tree as received.
    pub raw: Value,
}

impl AnalysisResult {
    pub fn from_object(object: Map<String, Value>) -> Self {
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);

        let match_score = object.get("match_score").and_then(|v| match v {
            Value::Number(n) => Some(n.clone()),
            Value::String(s) => serde_json::from_str::<Number>(s.trim().trim_end_matches('%').trim()).ok(),
            _ => None,
        });

        let missing_skills = object
            .get("missing_skills")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(parse_missing_skill).collect());

        let resume_recommendations = object.get("resume_recommendations").and_then(|v| match v {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            ),
            Value::String(s) => Some(vec![s.clone()]),
            _ => None,
        });

        Self {
            match_score,
            candidate_summary: text("candidate_summary"),
            missing_skills,
            resume_recommendations,
            career_advice: text("career_advice"),
            feedback: text("feedback"),
            raw: Value::Object(object),
        }
    }
}

fn parse_missing_skill(item: &Value) -> Option<MissingSkill> {
    match item {
        Value::Object(fields) => {
            let text = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_string);
            Some(MissingSkill {
                skill: text("skill"),
                importance: fields
                    .get("importance")
                    .and_then(Value::as_str)
                    .and_then(|s| s.parse().ok()),
                explanation: text("explanation"),
            })
        }
        Value::String(name) => Some(MissingSkill {
            skill: Some(name.clone()),
            importance: None,
            explanation: None,
        }),
        _ => None,
    }
}

/// Strip surrounding whitespace and one leading/trailing code fence
/// (three backticks plus an optional language tag).
pub fn normalize_response(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')))
            .unwrap_or(rest.len());
        text = rest[tag_len..].trim_start();
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }

    text
}

/// Normalize and parse a raw model reply. The reply must hold a JSON object.
pub fn parse_response(raw: String) -> Result<AnalysisResult> {
    let parsed = serde_json::from_str::<Value>(normalize_response(&raw))
        .and_then(serde_json::from_value::<Map<String, Value>>);

    match parsed {
        Ok(object) => Ok(AnalysisResult::from_object(object)),
        Err(source) => Err(AdvisorError::MalformedResponse { source, raw }),
    }
}

pub struct AnalysisClient<G> {
    generator: G,
    templates: PromptTemplates,
    max_retries: u32,
    retry_backoff: Duration,
}

impl<G: TextGenerator> AnalysisClient<G> {
    /// Client without retries.
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            templates: PromptTemplates::default(),
            max_retries: 0,
            retry_backoff: Duration::ZERO,
        }
    }

    pub fn from_config(generator: G, config: &LlmConfig) -> Self {
        Self::new(generator).with_retry(config.max_retries, Duration::from_millis(config.retry_backoff_ms))
    }

    pub fn with_retry(mut self, max_retries: u32, retry_backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = retry_backoff;
        self
    }

    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    /// One remote analysis. Nothing is cached: every call reaches the service.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let prompt = self.templates.render_analysis(request);
        debug!("Prompt length: {} characters", prompt.len());

        let raw = self.generate_with_retry(&prompt).await?;
        debug!("Response length: {} characters", raw.len());

        let result = parse_response(raw)?;
        info!("Analysis response parsed");
        Ok(result)
    }

    /// Retries only service failures, with exponential backoff. A malformed
    /// reply is returned to the caller untouched.
    async fn generate_with_retry(&self, prompt: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.generator.generate(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = self.retry_backoff.saturating_mul(2u32.saturating_pow(attempt));
                    attempt += 1;
                    warn!(
                        "AI model call failed ({}), retry {}/{} in {}ms",
                        e,
                        attempt,
                        self.max_retries,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
