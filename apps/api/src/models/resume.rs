//! Resume document model.
//!
//! Field names serialize as camelCase — this is the wire shape shared with
//! the editor UI and with the model-facing response schemas, so the JSON a
//! model returns deserializes straight into these types.
//!
//! Every list item carries an opaque string `id`, generated once at
//! creation and stable across edits. Ids default to empty on
//! deserialization; the repair pass fills in anything a model left blank.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flat contact record plus the professional summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub website: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub id: String,
    pub school: String,
    pub degree: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cgpa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coursework: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub technologies: String,
    pub link: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certificate {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Award {
    pub id: String,
    pub title: String,
    pub issuer: String,
    pub date: String,
    pub description: String,
}

/// The full resume document.
///
/// All six list fields and `personalInfo` default when absent, so a partial
/// document (a model response, an old stored record) always deserializes.
/// Dates are free-form strings, never parsed. Order within each list is
/// user-controlled and significant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub personal_info: PersonalInfo,
    pub skills: Vec<String>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub certificates: Vec<Certificate>,
    pub awards: Vec<Award>,
}

impl ResumeData {
    /// Starter content for a brand-new project when the user has no master
    /// profile yet. Gives the editor something concrete to replace.
    pub fn starter() -> Self {
        ResumeData {
            personal_info: PersonalInfo {
                full_name: "Alex Developer".to_string(),
                email: "alex@example.com".to_string(),
                phone: "(555) 123-4567".to_string(),
                location: "San Francisco, CA".to_string(),
                linkedin: "linkedin.com/in/alexdev".to_string(),
                website: "alex.dev".to_string(),
                summary: "Experienced full stack developer with a passion for building \
                          scalable web applications and a track record of shipping \
                          high-quality code."
                    .to_string(),
            },
            skills: ["JavaScript", "TypeScript", "React", "Rust", "Python", "AWS", "Docker"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            experience: vec![Experience {
                id: Uuid::new_v4().to_string(),
                company: "Tech Solutions Inc.".to_string(),
                position: "Senior Frontend Engineer".to_string(),
                start_date: "2021-01".to_string(),
                end_date: "Present".to_string(),
                location: "Remote".to_string(),
                description: "• Led the migration of a legacy monolith to a micro-frontend \
                              architecture.\n• Improved site performance by 40% through code \
                              splitting and lazy loading."
                    .to_string(),
            }],
            education: vec![Education {
                id: Uuid::new_v4().to_string(),
                school: "University of Technology".to_string(),
                degree: "B.S. Computer Science".to_string(),
                start_date: "2014-09".to_string(),
                end_date: "2018-05".to_string(),
                location: "Boston, MA".to_string(),
                description: "Graduated with honors.".to_string(),
                gpa: Some("3.8/4.0".to_string()),
                cgpa: None,
                coursework: Some("Data Structures, Algorithms, Distributed Systems".to_string()),
            }],
            projects: vec![],
            certificates: vec![],
            awards: vec![],
        }
    }
}
