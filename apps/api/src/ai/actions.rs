//! The AI operations: prompt → gateway → repair, one function per action.
//!
//! Each returns a typed result or an `AiError`; callers surface errors to
//! the user and never retry. The two free-text operations fall back to
//! their input when the model answers with nothing — an empty summary or
//! description is never an improvement.

use tracing::info;

use crate::ai::prompts;
use crate::ai::repair::{parse_analysis_payload, parse_resume_payload, parse_review_payload};
use crate::ai::schemas::{analysis_schema, resume_schema, review_schema};
use crate::ai::{KeywordAnalysis, ReviewResult};
use crate::llm_client::{AiError, Attachment, GeminiClient, GenerateRequest, ResponseMode};
use crate::models::resume::ResumeData;

/// Input to the standalone document audit.
#[derive(Debug)]
pub enum ScanSource {
    RawText(String),
    Pdf(Attachment),
}

/// Input to structured extraction.
#[derive(Debug)]
pub enum ExtractSource {
    RawText(String),
    Pdf(Attachment),
    ProfileUrl(String),
}

/// Rewrites the whole resume against a job description.
/// Factual fields are protected by prompt instruction only.
pub async fn optimize_resume(
    llm: &GeminiClient,
    resume: &ResumeData,
    jd_text: &str,
) -> Result<ResumeData, AiError> {
    let prompt = prompts::build_optimize_prompt(resume, jd_text);
    let text = llm
        .generate(GenerateRequest::json(&prompt, resume_schema()).with_temperature(0.3))
        .await?;
    parse_resume_payload(&text)
}

/// Generates a fresh professional summary. An empty model response leaves
/// the current summary unchanged.
pub async fn generate_summary(
    llm: &GeminiClient,
    resume: &ResumeData,
    jd_text: Option<&str>,
) -> Result<String, AiError> {
    let prompt = prompts::build_summary_prompt(resume, jd_text);
    match llm.generate(GenerateRequest::text(&prompt)).await {
        Ok(summary) => Ok(summary),
        Err(AiError::EmptyResponse) => {
            info!("summary generation returned no text — keeping the current summary");
            Ok(resume.personal_info.summary.clone())
        }
        Err(e) => Err(e),
    }
}

/// Refines a single description field. An empty model response returns the
/// original text unchanged.
pub async fn refine_description(
    llm: &GeminiClient,
    text: &str,
    context: &str,
    jd_text: Option<&str>,
) -> Result<String, AiError> {
    let prompt = prompts::build_refine_prompt(text, context, jd_text);
    match llm.generate(GenerateRequest::text(&prompt)).await {
        Ok(refined) => Ok(refined),
        Err(AiError::EmptyResponse) => {
            info!("refinement returned no text — keeping the original description");
            Ok(text.to_string())
        }
        Err(e) => Err(e),
    }
}

/// Scores the resume's keyword coverage of a job description.
pub async fn analyze_keywords(
    llm: &GeminiClient,
    resume: &ResumeData,
    jd_text: &str,
) -> Result<KeywordAnalysis, AiError> {
    let prompt = prompts::build_analysis_prompt(resume, jd_text);
    let text = llm
        .generate(GenerateRequest::json(&prompt, analysis_schema()))
        .await?;
    parse_analysis_payload(&text)
}

/// Audits the resume and returns a scored critique with fixable findings.
pub async fn review_resume(
    llm: &GeminiClient,
    resume: &ResumeData,
    jd_text: Option<&str>,
) -> Result<ReviewResult, AiError> {
    let prompt = prompts::build_review_prompt(resume, jd_text);
    let text = llm
        .generate(GenerateRequest::json(&prompt, review_schema()).with_temperature(0.4))
        .await?;
    parse_review_payload(&text)
}

/// Audits an external document (pasted text or an uploaded PDF) that is not
/// tied to any project.
pub async fn scan_document(
    llm: &GeminiClient,
    source: &ScanSource,
) -> Result<ReviewResult, AiError> {
    let text = match source {
        ScanSource::RawText(raw) => {
            let prompt = prompts::build_scan_text_prompt(raw);
            llm.generate(GenerateRequest::json(&prompt, review_schema()))
                .await?
        }
        ScanSource::Pdf(attachment) => {
            llm.generate(
                GenerateRequest::json(prompts::SCAN_DOCUMENT_PROMPT, review_schema())
                    .with_attachment(attachment),
            )
            .await?
        }
    };
    parse_review_payload(&text)
}

/// Extracts a structured resume from raw text, a PDF, or a public profile
/// URL. URL extraction runs through the search tool, where the platform
/// enforces no schema — the repair path is what makes that mode safe.
pub async fn extract_from_source(
    llm: &GeminiClient,
    source: &ExtractSource,
) -> Result<ResumeData, AiError> {
    let text = match source {
        ExtractSource::RawText(raw) => {
            let prompt = prompts::build_extract_text_prompt(raw);
            llm.generate(
                GenerateRequest::json(&prompt, resume_schema()).with_temperature(0.1),
            )
            .await?
        }
        ExtractSource::Pdf(attachment) => {
            llm.generate(
                GenerateRequest::json(prompts::EXTRACT_DOCUMENT_PROMPT, resume_schema())
                    .with_attachment(attachment)
                    .with_temperature(0.1),
            )
            .await?
        }
        ExtractSource::ProfileUrl(url) => {
            let prompt = prompts::build_extract_url_prompt(url);
            llm.generate(GenerateRequest {
                prompt: &prompt,
                attachment: None,
                mode: ResponseMode::Search,
                temperature: Some(0.1),
            })
            .await?
        }
    };
    parse_resume_payload(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Network-free coverage: every action must raise the configuration
    // error before touching the transport when the key is a placeholder.

    fn unconfigured() -> GeminiClient {
        GeminiClient::new("YOUR_API_KEY_HERE".to_string())
    }

    #[tokio::test]
    async fn test_every_action_fails_fast_without_a_key() {
        let llm = unconfigured();
        let resume = ResumeData::starter();

        assert!(matches!(
            optimize_resume(&llm, &resume, "jd").await,
            Err(AiError::MissingApiKey)
        ));
        assert!(matches!(
            generate_summary(&llm, &resume, None).await,
            Err(AiError::MissingApiKey)
        ));
        assert!(matches!(
            refine_description(&llm, "text", "ctx", None).await,
            Err(AiError::MissingApiKey)
        ));
        assert!(matches!(
            analyze_keywords(&llm, &resume, "jd").await,
            Err(AiError::MissingApiKey)
        ));
        assert!(matches!(
            review_resume(&llm, &resume, None).await,
            Err(AiError::MissingApiKey)
        ));
        assert!(matches!(
            scan_document(&llm, &ScanSource::RawText("text".to_string())).await,
            Err(AiError::MissingApiKey)
        ));
        assert!(matches!(
            extract_from_source(&llm, &ExtractSource::ProfileUrl("https://x".to_string())).await,
            Err(AiError::MissingApiKey)
        ));
    }
}
