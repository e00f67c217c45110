// AI orchestration: prompt construction, constrained-schema calls, response
// repair, and the per-operation pipelines. All LLM calls go through
// llm_client — no direct API calls here.

pub mod actions;
pub mod handlers;
pub mod prompts;
pub mod repair;
pub mod schemas;

use serde::{Deserialize, Serialize};

/// Ephemeral result of matching a resume against a job description.
/// Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeywordAnalysis {
    /// 0–100: how well the resume covers the JD.
    pub score: u32,
    pub matching_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
}

/// One audit finding: a pointer into the resume plus the problem and the
/// proposed replacement text. Consumed at most once — applying it mutates
/// the resume and removes it from the pending list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeImprovement {
    pub id: String,
    pub section: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    pub field: String,
    pub issue: String,
    pub suggestion: String,
}

/// Ephemeral audit result. Never persisted — only the score makes it into
/// the project's score history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewResult {
    /// 0–100, based on ATS readiness and content quality.
    pub score: u32,
    pub summary: String,
    pub improvements: Vec<ResumeImprovement>,
}
