//! Response cleanup and schema repair.
//!
//! Models wrap JSON in code fences and prose despite instructions, and
//! occasionally omit fields the schema marks optional. The rules here:
//!
//! 1. Strip fence markers, then slice from the first `{` to the last `}`.
//! 2. Parse strictly. A failed parse is a malformed-output error — it is
//!    never papered over with defaults.
//! 3. Only after a successful parse, repair what is missing: list fields
//!    and personalInfo keys default via serde, and any list item without a
//!    usable id gets a fresh one here.
//!
//! A repaired `ResumeData` always satisfies the document invariants: all
//! six lists present, every personalInfo key present, every item id
//! non-empty and unique within its list.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::ai::{KeywordAnalysis, ReviewResult};
use crate::llm_client::AiError;
use crate::models::resume::ResumeData;

/// Strips code fences and any prose around the outermost JSON object.
/// Errors when no balanced `{`…`}` span exists at all.
pub fn extract_json_payload(text: &str) -> Result<String, AiError> {
    let cleaned = text.replace("```json", "").replace("```", "");

    let first = cleaned.find('{');
    let last = cleaned.rfind('}');
    match (first, last) {
        (Some(first), Some(last)) if last > first => {
            Ok(cleaned[first..=last].trim().to_string())
        }
        _ => Err(AiError::MalformedOutput(
            "no JSON object found in model output".to_string(),
        )),
    }
}

/// Parses cleaned model output into `T`.
fn parse_model_json<T: DeserializeOwned>(text: &str) -> Result<T, AiError> {
    let payload = extract_json_payload(text)?;
    serde_json::from_str(&payload).map_err(|e| AiError::MalformedOutput(e.to_string()))
}

/// Parses model output into a `ResumeData` and repairs it in place.
pub fn parse_resume_payload(text: &str) -> Result<ResumeData, AiError> {
    let mut data: ResumeData = parse_model_json(text)?;
    repair_resume_data(&mut data);
    Ok(data)
}

/// Parses model output into a `ReviewResult`. Improvements are applied by
/// id later, so any the model left blank gets one here.
pub fn parse_review_payload(text: &str) -> Result<ReviewResult, AiError> {
    let mut review: ReviewResult = parse_model_json(text)?;
    assign_ids(review.improvements.iter_mut().map(|i| &mut i.id));
    Ok(review)
}

/// Parses model output into a `KeywordAnalysis`. Nothing to repair beyond
/// the serde defaults.
pub fn parse_analysis_payload(text: &str) -> Result<KeywordAnalysis, AiError> {
    parse_model_json(text)
}

/// Post-parse repair for a `ResumeData`. Structural defaults are already
/// handled by serde; this pass only regenerates ids that are missing or
/// collide within their list. Returns how many ids were rewritten.
pub fn repair_resume_data(data: &mut ResumeData) -> usize {
    let repaired = assign_ids(data.experience.iter_mut().map(|e| &mut e.id))
        + assign_ids(data.education.iter_mut().map(|e| &mut e.id))
        + assign_ids(data.projects.iter_mut().map(|p| &mut p.id))
        + assign_ids(data.awards.iter_mut().map(|a| &mut a.id))
        + assign_ids(data.certificates.iter_mut().map(|c| &mut c.id));
    if repaired > 0 {
        debug!("repaired {repaired} missing or duplicate item ids in model output");
    }
    repaired
}

/// Regenerates any id that is blank or already taken within its list.
fn assign_ids<'a>(ids: impl Iterator<Item = &'a mut String>) -> usize {
    let mut seen: HashSet<String> = HashSet::new();
    let mut repaired = 0;
    for id in ids {
        if id.trim().is_empty() || !seen.insert(id.clone()) {
            *id = Uuid::new_v4().to_string();
            seen.insert(id.clone());
            repaired += 1;
        }
    }
    repaired
}
