//! Text extraction from résumé documents

use crate::error::{AdvisorError, Result};
use log::debug;
use pulldown_cmark::{Event, Parser, Tag};
use std::panic::{self, AssertUnwindSafe};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Text pulled out of a document, pages already joined in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
}

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText>;
}

pub struct PdfExtractor;

impl PdfExtractor {
    /// Text of each page, in page order.
    pub fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>> {
        if !bytes.starts_with(PDF_MAGIC) {
            return Err(AdvisorError::Extraction(
                "not a PDF document (missing %PDF- header)".to_string(),
            ));
        }

        // pdf-extract panics on some malformed inputs instead of returning an error.
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        }));

        match result {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(AdvisorError::Extraction(format!("failed to parse PDF: {}", e))),
            Err(_) => Err(AdvisorError::Extraction(
                "failed to parse PDF: malformed document".to_string(),
            )),
        }
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText> {
        let pages = self.extract_pages(bytes)?;
        debug!("Extracted {} PDF pages", pages.len());

        let text = pages.concat();
        if text.trim().is_empty() {
            return Err(AdvisorError::Extraction(
                "the PDF contains no extractable text (is it a scanned image?)".to_string(),
            ));
        }

        Ok(ExtractedText {
            text,
            page_count: pages.len(),
        })
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| AdvisorError::Extraction(format!("text file is not valid UTF-8: {}", e)))?;

        Ok(ExtractedText {
            text: text.to_string(),
            page_count: 1,
        })
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText> {
        let markdown = PlainTextExtractor.extract(bytes)?;
        Ok(ExtractedText {
            text: markdown_to_text(&markdown.text),
            page_count: 1,
        })
    }
}

/// Flatten Markdown to plain text, one block per line.
fn markdown_to_text(markdown: &str) -> String {
    let mut out = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::End(Tag::Paragraph) | Event::End(Tag::Heading(..)) | Event::End(Tag::Item) => {
                out.push('\n')
            }
            _ => {}
        }
    }

    out.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
