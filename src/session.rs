//! Analysis session: the submit → extract → request → render flow as an explicit state machine

use crate::error::{AdvisorError, Result};
use crate::input::manager::ResumeDocument;
use crate::llm::analyzer::{AnalysisClient, AnalysisRequest, AnalysisResult};
use crate::llm::client::TextGenerator;
use crate::output::report::{ReportMetadata, ReportView};
use log::{debug, info, warn};

/// What the user handed in for one analysis.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub document: Option<ResumeDocument>,
    pub job_description: String,
}

impl Submission {
    pub fn new(document: Option<ResumeDocument>, job_description: impl Into<String>) -> Self {
        Self {
            document,
            job_description: job_description.into(),
        }
    }
}

/// A finished analysis, ready to be formatted.
#[derive(Debug, Clone)]
pub struct CompletedAnalysis {
    pub result: AnalysisResult,
    pub report: ReportView,
}

#[derive(Debug)]
pub enum SessionState {
    Idle,
    Submitted,
    Extracting,
    Extracted,
    Requesting,
    Rendered(Box<CompletedAnalysis>),
    Error(AdvisorError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitted,
    Extracting,
    Extracted,
    Requesting,
    Rendered,
    Error,
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        match self {
            SessionState::Idle => Phase::Idle,
            SessionState::Submitted => Phase::Submitted,
            SessionState::Extracting => Phase::Extracting,
            SessionState::Extracted => Phase::Extracted,
            SessionState::Requesting => Phase::Requesting,
            SessionState::Rendered(_) => Phase::Rendered,
            SessionState::Error(_) => Phase::Error,
        }
    }
}

pub struct AnalysisSession<G> {
    client: AnalysisClient<G>,
    state: SessionState,
    history: Vec<Phase>,
}

impl<G: TextGenerator> AnalysisSession<G> {
    pub fn new(client: AnalysisClient<G>) -> Self {
        Self {
            client,
            state: SessionState::Idle,
            history: vec![Phase::Idle],
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Phases visited by the latest run, starting at `Idle`.
    pub fn history(&self) -> &[Phase] {
        &self.history
    }

    /// Take the outcome of a finished run and return to `Idle`.
    /// `None` when no run has finished since the last acknowledgement.
    pub fn acknowledge(&mut self) -> Option<Result<CompletedAnalysis>> {
        match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Rendered(done) => Some(Ok(*done)),
            SessionState::Error(e) => Some(Err(e)),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Run one analysis from `Idle`.
    ///
    /// Missing input is a validation error: the session stays `Idle` and the
    /// error is returned. Every later failure is captured in
    /// [`SessionState::Error`] and `Ok` is returned with that state.
    pub async fn submit(&mut self, submission: Submission) -> Result<&SessionState> {
        self.acknowledge();
        self.history.clear();
        self.history.push(Phase::Idle);

        let (document, job_description) = match submission {
            Submission {
                document: Some(document),
                job_description,
            } if !job_description.trim().is_empty() => (document, job_description),
            _ => {
                return Err(AdvisorError::Validation(
                    "Please upload a resume and paste a job description to proceed.".to_string(),
                ))
            }
        };

        self.transition(SessionState::Submitted);

        self.transition(SessionState::Extracting);
        let extracted = match document.extract_text() {
            Ok(extracted) => extracted,
            Err(e) => return Ok(self.fail(e)),
        };
        let request = match AnalysisRequest::new(extracted.text, job_description) {
            Ok(request) => request,
            Err(_) => {
                return Ok(self.fail(AdvisorError::Extraction(format!(
                    "no text found in {}",
                    document.name
                ))))
            }
        };
        info!(
            "Extracted {} characters from {} ({} pages)",
            request.resume_text().len(),
            document.name,
            extracted.page_count
        );
        self.transition(SessionState::Extracted);

        self.transition(SessionState::Requesting);
        let result = match self.client.analyze(&request).await {
            Ok(result) => result,
            Err(e) => return Ok(self.fail(e)),
        };

        let metadata = ReportMetadata::new(self.client.model_name(), document.name, extracted.page_count);
        let report = ReportView::from_result(&result).with_metadata(metadata);
        self.transition(SessionState::Rendered(Box::new(CompletedAnalysis { result, report })));

        Ok(&self.state)
    }

    fn transition(&mut self, next: SessionState) {
        debug!("Session {:?} -> {:?}", self.state.phase(), next.phase());
        self.history.push(next.phase());
        self.state = next;
    }

    fn fail(&mut self, error: AdvisorError) -> &SessionState {
        warn!("Analysis failed during {:?}: {}", self.state.phase(), error);
        self.transition(SessionState::Error(error));
        &self.state
    }
}
