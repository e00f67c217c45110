//! Version snapshots and score history.
//!
//! Versions are pushed on significant actions only: explicit save, AI
//! optimize, AI import. The list is newest-first and capped; score history
//! is append-only and unbounded.

use chrono::Utc;

use crate::models::project::{ResumeProject, ResumeVersion, ScoreRecord};

/// Hard cap on stored version snapshots per project.
pub const MAX_VERSIONS: usize = 15;

/// Pushes a deep copy of the working copy onto the front of the version
/// list, evicting the oldest entries past the cap. Notes auto-number from
/// `version_seq`, which survives eviction so numbers never repeat.
pub fn push_version(project: &mut ResumeProject, note: Option<String>) {
    project.version_seq += 1;
    let note = note.unwrap_or_else(|| format!("Version {}", project.version_seq));

    project.versions.insert(
        0,
        ResumeVersion {
            data: project.data.clone(),
            created_at: Utc::now(),
            note,
        },
    );
    project.versions.truncate(MAX_VERSIONS);
}

/// Appends a completed audit's score. Records are never mutated or removed.
pub fn record_score(project: &mut ResumeProject, score: u32) {
    project.score_history.push(ScoreRecord {
        timestamp: Utc::now(),
        score,
    });
}

/// Stamps a persisted mutation: bumps the conflict-detection revision and
/// refreshes the modification time.
pub fn touch(project: &mut ResumeProject) {
    project.revision += 1;
    project.last_modified = Utc::now();
}
