//! Response schemas for constrained-JSON model calls.
//!
//! These are the `responseSchema` trees sent with every structured call,
//! mirroring the wire shape of the types in `models::resume` and `ai`.
//! The platform enforces them in JSON mode; search-tool calls cannot carry
//! one and are parsed defensively instead.

use serde_json::{json, Value};

/// Schema for a full `ResumeData` document (rewrite and extraction calls).
pub fn resume_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "personalInfo": {
                "type": "OBJECT",
                "properties": {
                    "fullName": { "type": "STRING" },
                    "email": { "type": "STRING" },
                    "phone": { "type": "STRING" },
                    "location": { "type": "STRING" },
                    "linkedin": { "type": "STRING" },
                    "website": { "type": "STRING" },
                    "summary": { "type": "STRING" }
                }
            },
            "skills": { "type": "ARRAY", "items": { "type": "STRING" } },
            "experience": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "company": { "type": "STRING" },
                        "position": { "type": "STRING" },
                        "startDate": { "type": "STRING" },
                        "endDate": { "type": "STRING" },
                        "location": { "type": "STRING" },
                        "description": { "type": "STRING" }
                    }
                }
            },
            "education": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "school": { "type": "STRING" },
                        "degree": { "type": "STRING" },
                        "startDate": { "type": "STRING" },
                        "endDate": { "type": "STRING" },
                        "location": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "gpa": { "type": "STRING" },
                        "cgpa": { "type": "STRING" },
                        "coursework": { "type": "STRING" }
                    }
                }
            },
            "projects": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "name": { "type": "STRING" },
                        "technologies": { "type": "STRING" },
                        "link": { "type": "STRING" },
                        "date": { "type": "STRING" },
                        "description": { "type": "STRING" }
                    }
                }
            },
            "awards": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "title": { "type": "STRING" },
                        "issuer": { "type": "STRING" },
                        "date": { "type": "STRING" },
                        "description": { "type": "STRING" }
                    }
                }
            },
            "certificates": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "name": { "type": "STRING" },
                        "issuer": { "type": "STRING" },
                        "date": { "type": "STRING" }
                    }
                }
            }
        }
    })
}

/// Schema for a `ReviewResult` (audit and document-scan calls).
pub fn review_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": {
                "type": "INTEGER",
                "description": "Overall score out of 100 based on quality and impact."
            },
            "summary": {
                "type": "STRING",
                "description": "A brief, encouraging summary of the resume's quality."
            },
            "improvements": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "section": {
                            "type": "STRING",
                            "enum": [
                                "personalInfo",
                                "experience",
                                "education",
                                "projects",
                                "skills",
                                "awards",
                                "certificates"
                            ]
                        },
                        "itemId": { "type": "STRING" },
                        "field": { "type": "STRING" },
                        "issue": { "type": "STRING" },
                        "suggestion": { "type": "STRING" }
                    }
                }
            }
        }
    })
}

/// Schema for a `KeywordAnalysis` (JD-match calls).
pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": {
                "type": "INTEGER",
                "description": "A score from 0 to 100 indicating how well the resume matches the JD."
            },
            "matchingKeywords": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Keywords from the JD found in the resume."
            },
            "missingKeywords": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Keywords from the JD NOT found in the resume."
            },
            "suggestions": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Actionable advice to improve the resume for this JD."
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_schema_covers_all_six_lists() {
        let schema = resume_schema();
        let props = schema["properties"].as_object().unwrap();
        for list in ["skills", "experience", "education", "projects", "awards", "certificates"] {
            assert!(props.contains_key(list), "schema missing {list}");
        }
        assert!(props.contains_key("personalInfo"));
    }

    #[test]
    fn test_review_schema_section_enum_matches_merge_dispatch() {
        let schema = review_schema();
        let sections = schema["properties"]["improvements"]["items"]["properties"]["section"]
            ["enum"]
            .as_array()
            .unwrap();
        for section in sections {
            let name = section.as_str().unwrap();
            assert!(
                name.parse::<crate::project::merge::Section>().is_ok(),
                "merge engine cannot dispatch section '{name}'"
            );
        }
    }

    #[test]
    fn test_analysis_schema_fields_are_camel_case() {
        let schema = analysis_schema();
        let props = schema["properties"].as_object().unwrap();
        assert!(props.contains_key("matchingKeywords"));
        assert!(props.contains_key("missingKeywords"));
    }
}
