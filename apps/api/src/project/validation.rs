//! Advisory link checks.
//!
//! Local, synchronous, and purely advisory: a finding annotates the field
//! with an inline message and blocks nothing. Empty fields are fine — only
//! a value that looks wrong earns a message.

use serde::Serialize;

use crate::models::resume::ResumeData;

/// One advisory message, addressed the same way an improvement is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAdvisory {
    pub section: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    pub field: String,
    pub message: String,
}

/// Checks the LinkedIn profile field. Expects a linkedin.com profile path,
/// with or without a scheme.
pub fn check_linkedin(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.contains(char::is_whitespace) {
        return Some("LinkedIn URL should not contain spaces".to_string());
    }
    if !value.contains("linkedin.com/") {
        return Some("Expected a linkedin.com profile URL".to_string());
    }
    None
}

/// Checks a personal website or project link. Accepts bare domains as well
/// as full URLs.
pub fn check_url(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.contains(char::is_whitespace) {
        return Some("URL should not contain spaces".to_string());
    }
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .unwrap_or(value);
    if !rest.contains('.') || rest.starts_with('.') {
        return Some("This doesn't look like a valid URL".to_string());
    }
    None
}

/// Runs every link check across the document. The result annotates fields
/// for the editor; it never gates a save or an AI action.
pub fn check_resume_links(data: &ResumeData) -> Vec<LinkAdvisory> {
    let mut advisories = Vec::new();

    if let Some(message) = check_linkedin(&data.personal_info.linkedin) {
        advisories.push(LinkAdvisory {
            section: "personalInfo".to_string(),
            item_id: None,
            field: "linkedin".to_string(),
            message,
        });
    }
    if let Some(message) = check_url(&data.personal_info.website) {
        advisories.push(LinkAdvisory {
            section: "personalInfo".to_string(),
            item_id: None,
            field: "website".to_string(),
            message,
        });
    }
    for project in &data.projects {
        if let Some(message) = check_url(&project.link) {
            advisories.push(LinkAdvisory {
                section: "projects".to_string(),
                item_id: Some(project.id.clone()),
                field: "link".to_string(),
                message,
            });
        }
    }

    advisories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::Project;

    #[test]
    fn test_empty_fields_get_no_advisory() {
        assert_eq!(check_linkedin(""), None);
        assert_eq!(check_url("   "), None);
    }

    #[test]
    fn test_valid_linkedin_forms_pass() {
        assert_eq!(check_linkedin("linkedin.com/in/ada"), None);
        assert_eq!(check_linkedin("https://www.linkedin.com/in/ada"), None);
    }

    #[test]
    fn test_non_linkedin_host_is_flagged() {
        assert!(check_linkedin("github.com/ada").is_some());
    }

    #[test]
    fn test_spaces_are_flagged() {
        assert!(check_linkedin("linkedin.com/in/ada lovelace").is_some());
        assert!(check_url("my site.dev").is_some());
    }

    #[test]
    fn test_bare_domain_and_full_url_pass() {
        assert_eq!(check_url("alex.dev"), None);
        assert_eq!(check_url("https://alex.dev/portfolio"), None);
    }

    #[test]
    fn test_schemeless_garbage_is_flagged() {
        assert!(check_url("not-a-url").is_some());
        assert!(check_url("https://nodotshere").is_some());
    }

    #[test]
    fn test_resume_sweep_addresses_findings() {
        let mut data = ResumeData::default();
        data.personal_info.linkedin = "twitter.com/ada".to_string();
        data.projects.push(Project {
            id: "proj-1".to_string(),
            link: "broken link".to_string(),
            ..Default::default()
        });

        let advisories = check_resume_links(&data);
        assert_eq!(advisories.len(), 2);
        assert_eq!(advisories[0].section, "personalInfo");
        assert_eq!(advisories[1].item_id.as_deref(), Some("proj-1"));
    }

    #[test]
    fn test_clean_resume_has_no_advisories() {
        let data = ResumeData::starter();
        assert!(check_resume_links(&data).is_empty());
    }
}
