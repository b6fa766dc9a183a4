//! LLM integration module

pub mod analyzer;
pub mod client;
pub mod prompts;

pub use analyzer::{AnalysisClient, AnalysisRequest, AnalysisResult, Importance, MissingSkill};
pub use client::{GeminiClient, TextGenerator};
