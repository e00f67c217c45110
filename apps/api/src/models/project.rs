use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::resume::ResumeData;

/// Print layout choice. Stored per project; rendering happens client-side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateKind {
    #[default]
    Modern,
    Classic,
    Minimal,
    Tech,
}

/// Immutable point-in-time deep copy of a project's resume data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeVersion {
    pub data: ResumeData,
    pub created_at: DateTime<Utc>,
    pub note: String,
}

/// One completed audit. Appended, never mutated or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub timestamp: DateTime<Utc>,
    pub score: u32,
}

/// A named, persisted resume container.
///
/// Owns its data, version snapshots, and score history exclusively. The
/// whole record is the unit of persistence — saves are last-write-wins
/// snapshots, never diffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeProject {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub last_modified: DateTime<Utc>,
    pub data: ResumeData,
    pub template: TemplateKind,
    #[serde(default)]
    pub versions: Vec<ResumeVersion>,
    #[serde(default)]
    pub score_history: Vec<ScoreRecord>,
    /// Bumped on every persisted mutation. AI rewrite requests stamp the
    /// revision they were built against; an advance while the model call
    /// was in flight turns the overwrite into a conflict instead.
    #[serde(default)]
    pub revision: u64,
    /// Monotonic counter behind auto-numbered version notes. Survives
    /// eviction from the capped version list so numbers never repeat.
    #[serde(default)]
    pub version_seq: u32,
}

impl ResumeProject {
    pub fn new(user_id: &str, title: &str, data: ResumeData) -> Self {
        ResumeProject {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            last_modified: Utc::now(),
            data,
            template: TemplateKind::default(),
            versions: Vec::new(),
            score_history: Vec::new(),
            revision: 0,
            version_seq: 0,
        }
    }
}
