//! Prompt template for the résumé / job description analysis

use crate::llm::analyzer::AnalysisRequest;

const RESUME_PLACEHOLDER: &str = "{resume}";
const JOB_PLACEHOLDER: &str = "{job}";

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub analysis: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            analysis: ANALYSIS_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Render the analysis prompt. Deterministic: equal requests give byte-identical prompts.
    pub fn render_analysis(&self, request: &AnalysisRequest) -> String {
        substitute(&self.analysis, request.resume_text(), request.job_description_text())
    }
}

/// Single pass over the template, so placeholder-looking text inside the
/// inputs is copied verbatim instead of being expanded again.
fn substitute(template: &str, resume: &str, job: &str) -> String {
    let mut out = String::with_capacity(template.len() + resume.len() + job.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        if let Some(after) = tail.strip_prefix(RESUME_PLACEHOLDER) {
            out.push_str(resume);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(JOB_PLACEHOLDER) {
            out.push_str(job);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}

const ANALYSIS_TEMPLATE: &str = r#"You are an expert AI Career Advisor. Analyze a candidate's resume against a job description and provide a detailed, structured analysis in JSON format.

**Resume Text:**
---
{resume}
---

**Job Description Text:**
---
{job}
---

**Instructions:**
1. **Analyze Both Documents:** Read the resume to understand the candidate's skills, experience, and education. Read the job description to identify the key requirements, responsibilities, and desired qualifications. Compare them by meaning, not only by keywords.
2. **Calculate Match Score:** Provide a "match_score", an integer from 0 to 100, for how well the resume aligns with the job description. Higher means a better match.
3. **Summarize Candidate Profile:** Write a brief "candidate_summary" of the candidate's profile in relation to the job.
4. **Identify Skill Gaps:** Create a list of "missing_skills". Each item is an object with the "skill" name, its "importance" (exactly one of High, Medium, Low), and an "explanation" of why the job needs it.
5. **Provide Resume Recommendations:** Offer specific, actionable "resume_recommendations" that improve the resume's alignment with the job description.
6. **Give Career Advice:** Provide personalized "career_advice" to help the candidate bridge the gaps for this or similar roles.
7. **Overall Feedback:** Give a concluding "feedback" statement.

**Output Format:**
Return ONLY a single valid JSON object with the following structure. Do not include any other text, and do not wrap it in markdown code fences.
{
  "match_score": <integer 0-100>,
  "candidate_summary": "<string>",
  "missing_skills": [
    {
      "skill": "<string>",
      "importance": "<High|Medium|Low>",
      "explanation": "<string>"
    }
  ],
  "resume_recommendations": ["<string>", "<string>"],
  "career_advice": "<string>",
  "feedback": "<string>"
}"#;
