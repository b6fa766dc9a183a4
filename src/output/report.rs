//! Report view: the analysis result with every placeholder resolved

use crate::llm::analyzer::{AnalysisResult, Importance, MissingSkill};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const NOT_AVAILABLE: &str = "Not available.";
pub const NA: &str = "N/A";
pub const NO_GAPS_MESSAGE: &str =
    "No significant skill gaps identified. Your skills are a great match!";

/// What the formatters render. All defaulting of absent fields happens in
/// [`ReportView::from_result`]; formatters never see an `Option` for content.
#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    /// Score as displayed, e.g. `73%`, or `N/A`.
    pub match_score: String,
    /// Numeric score for badges, when the model gave one.
    pub score_value: Option<f64>,
    pub candidate_summary: String,
    pub missing_skills: Vec<SkillGapView>,
    pub resume_recommendations: Vec<String>,
    pub career_advice: String,
    pub feedback: String,
    /// Pretty-printed parsed response.
    pub raw_json: String,
    pub metadata: Option<ReportMetadata>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillGapView {
    pub skill: String,
    pub importance: String,
    pub level: Option<Importance>,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub model_used: String,
    pub resume_file: String,
    pub page_count: usize,
    pub advisor_version: String,
}

impl ReportMetadata {
    pub fn new(model_used: impl Into<String>, resume_file: impl Into<String>, page_count: usize) -> Self {
        Self {
            generated_at: Utc::now(),
            model_used: model_used.into(),
            resume_file: resume_file.into(),
            page_count,
            advisor_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ReportView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let score_value = result.match_score.as_ref().and_then(|n| n.as_f64());
        let match_score = result
            .match_score
            .as_ref()
            .map(|n| format!("{}%", n))
            .unwrap_or_else(|| NA.to_string());

        let missing_skills = result
            .missing_skills
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(SkillGapView::from_skill)
            .collect();

        Self {
            match_score,
            score_value,
            candidate_summary: or_not_available(&result.candidate_summary),
            missing_skills,
            resume_recommendations: result.resume_recommendations.clone().unwrap_or_default(),
            career_advice: or_not_available(&result.career_advice),
            feedback: or_not_available(&result.feedback),
            raw_json: serde_json::to_string_pretty(&result.raw).unwrap_or_else(|_| result.raw.to_string()),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: ReportMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn has_skill_gaps(&self) -> bool {
        !self.missing_skills.is_empty()
    }

    /// Qualitative band for the score, `None` when there is no score.
    pub fn score_label(&self) -> Option<&'static str> {
        self.score_value.map(|score| match score {
            s if s >= 90.0 => "EXCELLENT",
            s if s >= 80.0 => "VERY GOOD",
            s if s >= 70.0 => "GOOD",
            s if s >= 60.0 => "FAIR",
            s if s >= 50.0 => "BELOW AVG",
            _ => "POOR",
        })
    }
}

impl SkillGapView {
    fn from_skill(skill: &MissingSkill) -> Self {
        Self {
            skill: skill.skill.clone().unwrap_or_else(|| NA.to_string()),
            importance: skill
                .importance
                .map(|i| i.to_string())
                .unwrap_or_else(|| NA.to_string()),
            level: skill.importance,
            explanation: skill.explanation.clone().unwrap_or_else(|| NA.to_string()),
        }
    }
}

fn or_not_available(field: &Option<String>) -> String {
    match field.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}
