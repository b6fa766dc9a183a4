//! Integration tests for input loading

use career_advisor::error::AdvisorError;
use career_advisor::input::file_detector::FileType;
use career_advisor::input::InputManager;
use std::path::Path;

#[tokio::test]
async fn test_job_description_from_txt() {
    let manager = InputManager::new();
    let text = manager
        .load_job_description(Path::new("tests/fixtures/sample_job.txt"))
        .await
        .unwrap();

    assert!(text.contains("Senior Backend Engineer"));
    assert!(text.contains("Kubernetes"));
}

#[tokio::test]
async fn test_resume_from_markdown_is_flattened() {
    let manager = InputManager::new();
    let document = manager
        .load_resume(Path::new("tests/fixtures/sample_resume.md"))
        .await
        .unwrap();
    assert_eq!(document.file_type, FileType::Markdown);

    let text = document.extract_text().unwrap().text;
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("Node.js"));
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_resume_from_txt() {
    let manager = InputManager::new();
    let document = manager
        .load_resume(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();

    let extracted = document.extract_text().unwrap();
    assert!(extracted.text.contains("React"));
    assert_eq!(extracted.page_count, 1);
}

#[tokio::test]
async fn test_pdf_job_description_is_rejected() {
    let manager = InputManager::new();
    let result = manager.load_job_description(Path::new("tests/fixtures/job.pdf")).await;
    assert!(matches!(result, Err(AdvisorError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let manager = InputManager::new();
    let result = manager.load_resume(Path::new("tests/fixtures/unsupported.xyz")).await;
    assert!(matches!(result, Err(AdvisorError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let manager = InputManager::new();
    let result = manager.load_resume(Path::new("tests/fixtures/nonexistent.pdf")).await;
    assert!(matches!(result, Err(AdvisorError::Validation(_))));
}
