//! Merge/Apply engine — integrates AI output into the working copy.
//!
//! Full replacements (optimize, import) are an atomic swap of the whole
//! document; there is no field-level merge. Single improvements dispatch on
//! an explicit section enumeration with typed per-section field setters.
//! Unknown sections and unknown fields are rejected outright; an `itemId`
//! that matches nothing is a benign no-op so a stale finding can never
//! corrupt the document.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::ai::{ResumeImprovement, ReviewResult};
use crate::models::resume::{
    Award, Certificate, Education, Experience, PersonalInfo, Project, ResumeData,
};

/// The sections an improvement may target. Parsed from the wire `section`
/// string; anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    PersonalInfo,
    Skills,
    Experience,
    Education,
    Projects,
    Awards,
    Certificates,
}

impl FromStr for Section {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personalInfo" => Ok(Section::PersonalInfo),
            "skills" => Ok(Section::Skills),
            "experience" => Ok(Section::Experience),
            "education" => Ok(Section::Education),
            "projects" => Ok(Section::Projects),
            "awards" => Ok(Section::Awards),
            "certificates" => Ok(Section::Certificates),
            other => Err(MergeError::UnknownSection(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("unknown resume section '{0}'")]
    UnknownSection(String),

    #[error("section '{section}' has no field '{field}'")]
    UnknownField {
        section: &'static str,
        field: String,
    },

    #[error("section '{0}' requires an itemId to locate the entry")]
    MissingItemId(&'static str),
}

/// What applying an improvement did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ApplyOutcome {
    /// The suggestion was written into the document.
    Applied,
    /// The target list has no item with the given id. No-op.
    ItemNotFound,
    /// The improvement id is not in the pending list — already consumed.
    NotPending,
}

/// Applies a single improvement to the document.
pub fn apply_improvement(
    data: &mut ResumeData,
    improvement: &ResumeImprovement,
) -> Result<ApplyOutcome, MergeError> {
    let suggestion = improvement.suggestion.as_str();
    match improvement.section.parse::<Section>()? {
        Section::PersonalInfo => {
            set_personal_field(&mut data.personal_info, &improvement.field, suggestion)?;
            Ok(ApplyOutcome::Applied)
        }
        // The whole skills list is replaced: the suggestion is a
        // comma-separated inventory, not a patch.
        Section::Skills => {
            data.skills = split_skills(suggestion);
            Ok(ApplyOutcome::Applied)
        }
        Section::Experience => {
            let item_id = require_item_id(improvement, "experience")?;
            match data.experience.iter_mut().find(|e| e.id == item_id) {
                Some(item) => {
                    set_experience_field(item, &improvement.field, suggestion)?;
                    Ok(ApplyOutcome::Applied)
                }
                None => Ok(ApplyOutcome::ItemNotFound),
            }
        }
        Section::Education => {
            let item_id = require_item_id(improvement, "education")?;
            match data.education.iter_mut().find(|e| e.id == item_id) {
                Some(item) => {
                    set_education_field(item, &improvement.field, suggestion)?;
                    Ok(ApplyOutcome::Applied)
                }
                None => Ok(ApplyOutcome::ItemNotFound),
            }
        }
        Section::Projects => {
            let item_id = require_item_id(improvement, "projects")?;
            match data.projects.iter_mut().find(|p| p.id == item_id) {
                Some(item) => {
                    set_project_field(item, &improvement.field, suggestion)?;
                    Ok(ApplyOutcome::Applied)
                }
                None => Ok(ApplyOutcome::ItemNotFound),
            }
        }
        Section::Awards => {
            let item_id = require_item_id(improvement, "awards")?;
            match data.awards.iter_mut().find(|a| a.id == item_id) {
                Some(item) => {
                    set_award_field(item, &improvement.field, suggestion)?;
                    Ok(ApplyOutcome::Applied)
                }
                None => Ok(ApplyOutcome::ItemNotFound),
            }
        }
        Section::Certificates => {
            let item_id = require_item_id(improvement, "certificates")?;
            match data.certificates.iter_mut().find(|c| c.id == item_id) {
                Some(item) => {
                    set_certificate_field(item, &improvement.field, suggestion)?;
                    Ok(ApplyOutcome::Applied)
                }
                None => Ok(ApplyOutcome::ItemNotFound),
            }
        }
    }
}

fn require_item_id<'a>(
    improvement: &'a ResumeImprovement,
    section: &'static str,
) -> Result<&'a str, MergeError> {
    improvement
        .item_id
        .as_deref()
        .ok_or(MergeError::MissingItemId(section))
}

/// Applies one pending improvement from a review and removes it from the
/// pending list. Application is at-most-once: a consumed (or never-issued)
/// id reports `NotPending` and touches nothing. A failed apply leaves the
/// improvement pending so the caller can surface the error and retry.
pub fn apply_and_consume(
    data: &mut ResumeData,
    review: &mut ReviewResult,
    improvement_id: &str,
) -> Result<ApplyOutcome, MergeError> {
    let Some(index) = review
        .improvements
        .iter()
        .position(|i| i.id == improvement_id)
    else {
        return Ok(ApplyOutcome::NotPending);
    };

    let outcome = apply_improvement(data, &review.improvements[index])?;
    review.improvements.remove(index);
    Ok(outcome)
}

/// Splits a suggested skills inventory on commas, trimming and dropping
/// empties.
pub fn split_skills(suggestion: &str) -> Vec<String> {
    suggestion
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn set_personal_field(
    info: &mut PersonalInfo,
    field: &str,
    value: &str,
) -> Result<(), MergeError> {
    let slot = match field {
        "fullName" => &mut info.full_name,
        "email" => &mut info.email,
        "phone" => &mut info.phone,
        "location" => &mut info.location,
        "linkedin" => &mut info.linkedin,
        "website" => &mut info.website,
        "summary" => &mut info.summary,
        _ => {
            return Err(MergeError::UnknownField {
                section: "personalInfo",
                field: field.to_string(),
            })
        }
    };
    *slot = value.to_string();
    Ok(())
}

fn set_experience_field(
    item: &mut Experience,
    field: &str,
    value: &str,
) -> Result<(), MergeError> {
    let slot = match field {
        "company" => &mut item.company,
        "position" => &mut item.position,
        "startDate" => &mut item.start_date,
        "endDate" => &mut item.end_date,
        "location" => &mut item.location,
        "description" => &mut item.description,
        _ => {
            return Err(MergeError::UnknownField {
                section: "experience",
                field: field.to_string(),
            })
        }
    };
    *slot = value.to_string();
    Ok(())
}

fn set_education_field(item: &mut Education, field: &str, value: &str) -> Result<(), MergeError> {
    match field {
        "school" => item.school = value.to_string(),
        "degree" => item.degree = value.to_string(),
        "startDate" => item.start_date = value.to_string(),
        "endDate" => item.end_date = value.to_string(),
        "location" => item.location = value.to_string(),
        "description" => item.description = value.to_string(),
        "gpa" => item.gpa = Some(value.to_string()),
        "cgpa" => item.cgpa = Some(value.to_string()),
        "coursework" => item.coursework = Some(value.to_string()),
        _ => {
            return Err(MergeError::UnknownField {
                section: "education",
                field: field.to_string(),
            })
        }
    }
    Ok(())
}

fn set_project_field(item: &mut Project, field: &str, value: &str) -> Result<(), MergeError> {
    let slot = match field {
        "name" => &mut item.name,
        "technologies" => &mut item.technologies,
        "link" => &mut item.link,
        "date" => &mut item.date,
        "description" => &mut item.description,
        _ => {
            return Err(MergeError::UnknownField {
                section: "projects",
                field: field.to_string(),
            })
        }
    };
    *slot = value.to_string();
    Ok(())
}

fn set_award_field(item: &mut Award, field: &str, value: &str) -> Result<(), MergeError> {
    let slot = match field {
        "title" => &mut item.title,
        "issuer" => &mut item.issuer,
        "date" => &mut item.date,
        "description" => &mut item.description,
        _ => {
            return Err(MergeError::UnknownField {
                section: "awards",
                field: field.to_string(),
            })
        }
    };
    *slot = value.to_string();
    Ok(())
}

fn set_certificate_field(
    item: &mut Certificate,
    field: &str,
    value: &str,
) -> Result<(), MergeError> {
    let slot = match field {
        "name" => &mut item.name,
        "issuer" => &mut item.issuer,
        "date" => &mut item.date,
        _ => {
            return Err(MergeError::UnknownField {
                section: "certificates",
                field: field.to_string(),
            })
        }
    };
    *slot = value.to_string();
    Ok(())
}
