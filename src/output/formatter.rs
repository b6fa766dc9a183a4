//! Output formatters: console, JSON, Markdown and HTML renditions of a report

use crate::config::OutputFormat;
use crate::error::{AdvisorError, Result};
use crate::llm::analyzer::Importance;
use crate::output::report::{ReportView, SkillGapView, NO_GAPS_MESSAGE};
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting analysis reports
pub trait OutputFormatter {
    fn format_report(&self, report: &ReportView) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal output with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    show_raw_json: bool,
}

/// The parsed model response, as JSON
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
    show_raw_json: bool,
}

/// Self-contained HTML page
pub struct HtmlFormatter {
    include_styles: bool,
    show_raw_json: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>AI Career Advisor Report</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #f5f5f5;
            background: #1e1e2f;
            max-width: 1100px;
            margin: 0 auto;
            padding: 2rem 3rem;
        }
        h1, h2 { color: #ffffff; }
        .metric {
            background: #2c2c3c;
            border-left: 5px solid #00b4d8;
            padding: 1.2rem;
            border-radius: 10px;
        }
        .metric .value { font-size: 2rem; font-weight: bold; }
        .alert {
            border-radius: 8px;
            border: 1px solid;
            padding: 1rem;
            margin: 0.5rem 0;
        }
        .warning { background: #3b2f1e; border-color: #facc15; color: #ffe58f; }
        .info { background: #1e3a8a; border-color: #60a5fa; color: #dbeafe; }
        .success { background: #14532d; border-color: #4ade80; color: #d1fae5; }
        pre { background: #2a2a3b; border: 1px solid #444; padding: 1rem; overflow-x: auto; }
        .metadata { color: #a0aec0; font-size: 0.9em; }
    </style>
    {% endif %}
</head>
<body>
    <h1>📊 Analysis Report</h1>

    <div class="metric">
        <div>Resume Match Score</div>
        <div class="value">{{ match_score }}{% if !score_label.is_empty() %} <small>{{ score_label }}</small>{% endif %}</div>
    </div>

    <h2>👤 Candidate Summary</h2>
    <p>{{ candidate_summary }}</p>

    <h2>⚠️ Missing Skills</h2>
    {% if missing_skills.is_empty() %}
    <div class="alert info">{{ no_gaps_message }}</div>
    {% else %}
    {% for gap in missing_skills %}
    <div class="alert warning"><strong>{{ gap.skill }}</strong> ({{ gap.importance }} Importance): {{ gap.explanation }}</div>
    {% endfor %}
    {% endif %}

    <h2>📝 Resume Recommendations</h2>
    {% if !resume_recommendations.is_empty() %}
    <ul>
        {% for rec in resume_recommendations %}
        <li>{{ rec }}</li>
        {% endfor %}
    </ul>
    {% endif %}

    <h2>🚀 Career Advice</h2>
    <div class="alert info">{{ career_advice }}</div>

    <h2>💬 Overall Feedback</h2>
    <div class="alert success">{{ feedback }}</div>

    {% if show_raw_json %}
    <details>
        <summary>Show Raw JSON Output</summary>
        <pre>{{ raw_json }}</pre>
    </details>
    {% endif %}

    {% if !footer.is_empty() %}
    <p class="metadata">{{ footer }}</p>
    {% endif %}
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    show_raw_json: bool,
    match_score: String,
    score_label: String,
    candidate_summary: String,
    missing_skills: Vec<SkillGapView>,
    no_gaps_message: &'static str,
    resume_recommendations: Vec<String>,
    career_advice: String,
    feedback: String,
    raw_json: String,
    footer: String,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, show_raw_json: bool) -> Self {
        Self { use_colors, show_raw_json }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, label: &str, score: f64) -> String {
        let color = match score {
            s if s >= 80.0 => Color::Green,
            s if s >= 70.0 => Color::Yellow,
            s if s >= 60.0 => Color::BrightYellow,
            _ => Color::Red,
        };

        if self.use_colors {
            format!(" [{}]", label.color(color).bold())
        } else {
            format!(" [{}]", label)
        }
    }

    fn importance_color(level: Option<Importance>) -> Color {
        match level {
            Some(Importance::High) => Color::Red,
            Some(Importance::Medium) => Color::Yellow,
            Some(Importance::Low) => Color::Blue,
            None => Color::White,
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ReportView) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📊 ANALYSIS REPORT", 1));

        let badge = match (report.score_label(), report.score_value) {
            (Some(label), Some(score)) => self.format_score_badge(label, score),
            _ => String::new(),
        };
        output.push_str(&format!(
            "Resume Match Score: {}{}\n",
            self.colorize(&report.match_score, Color::Cyan),
            badge
        ));

        output.push_str(&self.format_header("👤 Candidate Summary", 2));
        output.push_str(&format!("{}\n", report.candidate_summary));

        output.push_str(&self.format_header("⚠️  Missing Skills", 2));
        if report.has_skill_gaps() {
            for gap in &report.missing_skills {
                output.push_str(&format!(
                    "  • {} {}: {}\n",
                    self.colorize(&gap.skill, Color::White),
                    self.colorize(
                        &format!("({} Importance)", gap.importance),
                        Self::importance_color(gap.level)
                    ),
                    gap.explanation
                ));
            }
        } else {
            output.push_str(&format!("{}\n", self.colorize(NO_GAPS_MESSAGE, Color::Green)));
        }

        output.push_str(&self.format_header("📝 Resume Recommendations", 2));
        for rec in &report.resume_recommendations {
            output.push_str(&format!("  - {}\n", rec));
        }

        output.push_str(&self.format_header("🚀 Career Advice", 2));
        output.push_str(&format!("{}\n", self.colorize(&report.career_advice, Color::BrightBlue)));

        output.push_str(&self.format_header("💬 Overall Feedback", 2));
        output.push_str(&format!("{}\n", self.colorize(&report.feedback, Color::Green)));

        if self.show_raw_json {
            output.push_str(&self.format_header("Raw JSON Output", 3));
            output.push_str(&format!("{}\n", report.raw_json));
        }

        if let Some(meta) = &report.metadata {
            output.push_str(&format!(
                "\n{} Generated by AI Career Advisor v{} | Model: {} | {}\n",
                self.colorize("ℹ️", Color::Blue),
                meta.advisor_version,
                meta.model_used,
                meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ReportView) -> Result<String> {
        if self.pretty {
            Ok(report.raw_json.clone())
        } else {
            let value: serde_json::Value = serde_json::from_str(&report.raw_json)?;
            Ok(serde_json::to_string(&value)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool, show_raw_json: bool) -> Self {
        Self {
            include_metadata,
            show_raw_json,
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ReportView) -> Result<String> {
        let mut output = String::new();

        output.push_str("# 📊 Analysis Report\n\n");

        if self.include_metadata {
            if let Some(meta) = &report.metadata {
                output.push_str(&format!(
                    "**Generated:** {} | **Model:** {}\n",
                    meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    meta.model_used
                ));
                let resume_name = Path::new(&meta.resume_file)
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| meta.resume_file.clone());
                output.push_str(&format!("**Resume:** `{}` ({} pages)\n\n", resume_name, meta.page_count));
            }
        }

        output.push_str(&format!("**Resume Match Score:** {}", report.match_score));
        if let Some(label) = report.score_label() {
            output.push_str(&format!(" ({})", label));
        }
        output.push_str("\n\n");

        output.push_str("## 👤 Candidate Summary\n\n");
        output.push_str(&format!("{}\n\n", report.candidate_summary));

        output.push_str("## ⚠️ Missing Skills\n\n");
        if report.has_skill_gaps() {
            for gap in &report.missing_skills {
                output.push_str(&format!(
                    "- **{}** ({} Importance): {}\n",
                    gap.skill, gap.importance, gap.explanation
                ));
            }
            output.push('\n');
        } else {
            output.push_str(&format!("> {}\n\n", NO_GAPS_MESSAGE));
        }

        output.push_str("## 📝 Resume Recommendations\n\n");
        if !report.resume_recommendations.is_empty() {
            for rec in &report.resume_recommendations {
                output.push_str(&format!("- {}\n", rec));
            }
            output.push('\n');
        }

        output.push_str("## 🚀 Career Advice\n\n");
        output.push_str(&format!("{}\n\n", report.career_advice));

        output.push_str("## 💬 Overall Feedback\n\n");
        output.push_str(&format!("{}\n", report.feedback));

        if self.show_raw_json {
            output.push_str("\n## Raw JSON Output\n\n");
            output.push_str(&format!("```json\n{}\n```\n", report.raw_json));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool, show_raw_json: bool) -> Self {
        Self {
            include_styles,
            show_raw_json,
        }
    }

    fn create_template_data(&self, report: &ReportView) -> HtmlTemplate {
        let footer = report
            .metadata
            .as_ref()
            .map(|meta| {
                format!(
                    "Generated by AI Career Advisor v{} | Model: {} | {}",
                    meta.advisor_version,
                    meta.model_used,
                    meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
                )
            })
            .unwrap_or_default();

        HtmlTemplate {
            include_styles: self.include_styles,
            show_raw_json: self.show_raw_json,
            match_score: report.match_score.clone(),
            score_label: report.score_label().unwrap_or_default().to_string(),
            candidate_summary: report.candidate_summary.clone(),
            missing_skills: report.missing_skills.clone(),
            no_gaps_message: NO_GAPS_MESSAGE,
            resume_recommendations: report.resume_recommendations.clone(),
            career_advice: report.career_advice.clone(),
            feedback: report.feedback.clone(),
            raw_json: report.raw_json.clone(),
            footer,
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &ReportView) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| AdvisorError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn with_options(use_colors: bool, show_raw_json: bool, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, show_raw_json),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(true, show_raw_json),
            html_formatter: HtmlFormatter::new(true, show_raw_json),
        }
    }

    pub fn generate_report(&self, report: &ReportView, format: &OutputFormat) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
            OutputFormat::Html => &self.html_formatter,
        };
        formatter.format_report(report)
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_analysis{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_analysis{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_analysis{}.md", base_name, timestamp_suffix),
        OutputFormat::Html => format!("{}_analysis{}.html", base_name, timestamp_suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::analyzer::parse_response;
    use crate::output::report::{ReportMetadata, NA, NOT_AVAILABLE};

    fn view(json: &str) -> ReportView {
        ReportView::from_result(&parse_response(json.to_string()).unwrap())
    }

    fn full_view() -> ReportView {
        view(
            r#"{
                "match_score": 73,
                "candidate_summary": "Backend engineer with 5 years of Rust",
                "missing_skills": [
                    {"skill": "Kubernetes", "importance": "High", "explanation": "Deploys run on k8s"}
                ],
                "resume_recommendations": ["Quantify latency wins", "Move skills to the top"],
                "career_advice": "Get hands-on with cluster operations",
                "feedback": "Good fit"
            }"#,
        )
    }

    fn plain_console() -> ConsoleFormatter {
        ConsoleFormatter::new(false, false)
    }

    #[test]
    fn test_console_renders_all_sections() {
        let out = plain_console().format_report(&full_view()).unwrap();

        assert!(out.contains("Resume Match Score: 73% [GOOD]"));
        assert!(out.contains("Backend engineer with 5 years of Rust"));
        assert!(out.contains("Kubernetes (High Importance): Deploys run on k8s"));
        assert!(out.contains("  - Quantify latency wins\n  - Move skills to the top"));
        assert!(out.contains("Get hands-on with cluster operations"));
        assert!(out.contains("Good fit"));
        assert!(!out.contains(NO_GAPS_MESSAGE));
    }

    #[test]
    fn test_console_empty_object_renders_placeholders() {
        let out = plain_console().format_report(&view("{}")).unwrap();

        assert!(out.contains(&format!("Resume Match Score: {}", NA)));
        assert_eq!(out.matches(NOT_AVAILABLE).count(), 3);
        assert!(out.contains(NO_GAPS_MESSAGE));
        assert!(out.contains("Resume Recommendations"));
        assert!(out.contains("Overall Feedback"));
    }

    #[test]
    fn test_empty_skill_list_shows_no_gaps_message() {
        let report = view(r#"{"missing_skills": []}"#);

        assert!(plain_console().format_report(&report).unwrap().contains(NO_GAPS_MESSAGE));
        assert!(MarkdownFormatter::new(false, false).format_report(&report).unwrap().contains(NO_GAPS_MESSAGE));
        assert!(HtmlFormatter::new(false, false).format_report(&report).unwrap().contains(NO_GAPS_MESSAGE));
    }

    #[test]
    fn test_raw_json_view_is_optional() {
        let report = view(r#"{"match_score": 73, "feedback": "Good fit"}"#);

        let hidden = ConsoleFormatter::new(false, false).format_report(&report).unwrap();
        assert!(!hidden.contains("Raw JSON Output"));

        let shown = ConsoleFormatter::new(false, true).format_report(&report).unwrap();
        assert!(shown.contains("Raw JSON Output"));
        assert!(shown.contains("\"match_score\": 73"));
    }

    #[test]
    fn test_markdown_raw_json_block_is_optional() {
        let report = view(r#"{"match_score": 73, "feedback": "Good fit"}"#);

        let hidden = MarkdownFormatter::new(false, false).format_report(&report).unwrap();
        assert!(!hidden.contains("Raw JSON Output"));
        assert!(!hidden.contains("```json"));

        let shown = MarkdownFormatter::new(false, true).format_report(&report).unwrap();
        assert!(shown.contains("## Raw JSON Output"));
        assert!(shown.contains("```json\n{"));
        assert!(shown.contains("\"match_score\": 73"));
        assert!(shown.trim_end().ends_with("```"));
    }

    #[test]
    fn test_html_raw_json_section_is_optional() {
        let report = view(r#"{"match_score": 73, "feedback": "Good fit"}"#);

        let hidden = HtmlFormatter::new(false, false).format_report(&report).unwrap();
        assert!(!hidden.contains("Show Raw JSON Output"));

        let shown = HtmlFormatter::new(false, true).format_report(&report).unwrap();
        assert!(shown.contains("<summary>Show Raw JSON Output</summary>"));
        assert!(shown.contains("match_score"));
        assert!(!shown.contains("\"match_score\""));
    }

    #[test]
    fn test_generator_passes_raw_json_flag_to_every_text_format() {
        let report = view(r#"{"match_score": 73}"#);
        let generator = ReportGenerator::with_options(false, true, true);

        for format in [OutputFormat::Console, OutputFormat::Markdown, OutputFormat::Html] {
            let out = generator.generate_report(&report, &format).unwrap();
            assert!(out.contains("Raw JSON Output"), "{:?} lacks the raw view", format);
        }
    }

    #[test]
    fn test_generator_honours_compact_json() {
        let report = view(r#"{"match_score": 73, "feedback": "Good fit"}"#);

        let pretty = ReportGenerator::with_options(false, false, true)
            .generate_report(&report, &OutputFormat::Json)
            .unwrap();
        assert!(pretty.contains('\n'));

        let compact = ReportGenerator::with_options(false, false, false)
            .generate_report(&report, &OutputFormat::Json)
            .unwrap();
        assert!(!compact.contains('\n'));
    }

    #[test]
    fn test_json_formatter_outputs_parsed_tree() {
        let report = view(r#"{"match_score": 73, "extra": {"kept": true}}"#);

        let compact = JsonFormatter::new(false).format_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(value["match_score"], 73);
        assert_eq!(value["extra"]["kept"], true);
        assert!(!compact.contains('\n'));
    }

    #[test]
    fn test_markdown_lists_gaps_and_metadata() {
        let report = full_view().with_metadata(ReportMetadata::new("gemini-1.5-flash", "/tmp/jane_cv.pdf", 2));
        let out = MarkdownFormatter::new(true, false).format_report(&report).unwrap();

        assert!(out.contains("**Resume Match Score:** 73% (GOOD)"));
        assert!(out.contains("- **Kubernetes** (High Importance): Deploys run on k8s"));
        assert!(out.contains("**Resume:** `jane_cv.pdf` (2 pages)"));
        assert!(out.contains("**Model:** gemini-1.5-flash"));
    }

    #[test]
    fn test_html_escapes_model_text() {
        let report = view(r#"{"feedback": "<script>alert(1)</script>"}"#);
        let html = HtmlFormatter::new(true, false).format_report(&report).unwrap();

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_generator_dispatches_by_format() {
        let generator = ReportGenerator::with_options(false, false, true);
        let report = full_view();

        assert!(generator.generate_report(&report, &OutputFormat::Html).unwrap().starts_with("<!DOCTYPE html>"));
        assert!(generator.generate_report(&report, &OutputFormat::Markdown).unwrap().starts_with("# "));
        assert!(generator.generate_report(&report, &OutputFormat::Json).unwrap().starts_with('{'));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(
            suggest_filename(&OutputFormat::Markdown, "/home/jane/resume.pdf", false),
            "resume_analysis.md"
        );
        let stamped = suggest_filename(&OutputFormat::Html, "cv.pdf", true);
        assert!(stamped.starts_with("cv_analysis_") && stamped.ends_with(".html"));
    }

    #[test]
    fn test_save_report_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("out.md");

        save_report_to_file("# report", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# report");
    }
}
