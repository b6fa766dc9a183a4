//! Input manager for loading the résumé and the job description

use crate::error::{AdvisorError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    ExtractedText, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::info;
use std::path::Path;
use tokio::fs;

/// An uploaded résumé: raw bytes plus what it claims to be.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub name: String,
    pub file_type: FileType,
    pub bytes: Vec<u8>,
}

impl ResumeDocument {
    pub fn new(name: impl Into<String>, file_type: FileType, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            file_type,
            bytes,
        }
    }

    pub fn pdf(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(name, FileType::Pdf, bytes)
    }

    /// Route to the extractor matching the declared file type.
    pub fn extract_text(&self) -> Result<ExtractedText> {
        match self.file_type {
            FileType::Pdf => PdfExtractor.extract(&self.bytes),
            FileType::Text => PlainTextExtractor.extract(&self.bytes),
            FileType::Markdown => MarkdownExtractor.extract(&self.bytes),
            FileType::Unknown => Err(AdvisorError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                self.name
            ))),
        }
    }
}

#[derive(Default)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Read a résumé file without extracting it; extraction belongs to the session.
    pub async fn load_resume(&self, path: &Path) -> Result<ResumeDocument> {
        let file_type = self.detect_file_type(path)?;

        info!("Reading resume: {}", path.display());
        let bytes = self.read_existing(path).await?;

        Ok(ResumeDocument::new(path.display().to_string(), file_type, bytes))
    }

    /// Read a job description from a text or Markdown file.
    pub async fn load_job_description(&self, path: &Path) -> Result<String> {
        let file_type = self.detect_file_type(path)?;
        if file_type == FileType::Pdf {
            return Err(AdvisorError::UnsupportedFormat(format!(
                "Job description must be a .txt or .md file: {}",
                path.display()
            )));
        }

        let bytes = self.read_existing(path).await?;
        let extracted = if file_type == FileType::Markdown {
            info!("Processing markdown job description: {}", path.display());
            MarkdownExtractor.extract(&bytes)?
        } else {
            info!("Reading plain text job description: {}", path.display());
            PlainTextExtractor.extract(&bytes)?
        };

        Ok(extracted.text)
    }

    async fn read_existing(&self, path: &Path) -> Result<Vec<u8>> {
        if !path.exists() {
            return Err(AdvisorError::Validation(format!(
                "File does not exist: {}",
                path.display()
            )));
        }
        Ok(fs::read(path).await?)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        match FileType::from_path(path) {
            FileType::Unknown => Err(AdvisorError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            ))),
            file_type => Ok(file_type),
        }
    }
}
