// All LLM prompt constants and builders for the AI module.
//
// Builders are pure functions of their inputs: same resume, same JD, same
// prompt. Factual fields (names, dates, employers, schools) are protected
// by instruction only — the model is told to preserve them, nothing here
// verifies that it did.

use crate::models::resume::ResumeData;

/// JD text appended to a refinement prompt is clipped to this many chars.
const REFINE_JD_CLIP: usize = 500;
/// Raw text sent to the document audit is clipped to this many chars.
const SCAN_TEXT_CLIP: usize = 20_000;
/// Raw text sent to extraction is clipped to this many chars.
const EXTRACT_TEXT_CLIP: usize = 30_000;

const OPTIMIZE_TEMPLATE: &str = r#"You are an expert resume writer.
Analyze the job description and the resume.
Rewrite the resume to match the job description using high-impact, ATS-friendly language.

Instructions:
1. Align "summary" with the job description.
2. Rewrite "description" fields in "experience" and "projects" to include JD keywords and action verbs.
3. Reorder and refine "skills".
4. Keep factual data (names, dates, companies, schools) UNCHANGED.
5. Be concise.

Resume: {resume_json}
JD: {jd_text}"#;

const SUMMARY_TEMPLATE: &str = r#"Write a professional resume summary (max 3 sentences).
{jd_context}Profile: {profile_json}
Skills: {skills_json}
Exp: {experience_json}"#;

const REFINE_TEMPLATE: &str = r#"Rewrite the following resume bullet points to be ATS-friendly, result-oriented, and impactful.
Context: {context}
{jd_context}Text: {text}
Return ONLY the refined text."#;

const ANALYSIS_TEMPLATE: &str = r#"Compare the resume against the job description. Output JSON.
Resume: {resume_json}
JD: {jd_text}"#;

const REVIEW_TEMPLATE: &str = r#"Act as a strict resume auditor.
Review the provided resume data {review_target}.

Calculate a score (0-100) based on ATS readiness and content quality.

If the resume is excellent (score > 90), return an EMPTY 'improvements' array and a complimentary summary.
If improvements are needed, list ONLY critical, specific, fixable issues.
DO NOT repeat suggestions.
DO NOT make vague suggestions like "Add more detail". Be specific with a rewritten 'suggestion' field.

Resume data:
{resume_json}
{jd_block}"#;

/// Audit instruction for an attached document (no resume JSON to inline).
pub const SCAN_DOCUMENT_PROMPT: &str = "Act as a strict resume auditor. \
    Review the attached resume document. \
    1. Calculate a score (0-100). \
    2. Provide a 1-sentence summary. \
    3. List 3-5 critical improvements.";

const SCAN_TEXT_TEMPLATE: &str = r#"Act as a strict resume auditor. Review the provided raw resume text.
1. Calculate a score (0-100).
2. Provide a 1-sentence summary.
3. List 3-5 critical improvements.

Text:
{text}"#;

const EXTRACT_BASE: &str = r#"You are a data extractor.
Extract resume data from the input.
Map it to the JSON schema provided.
Rules:
- Infer missing fields logically.
- If a date is just a year, assume Jan 1st.
- Be precise with company names and job titles."#;

/// Extraction instruction for an attached document.
pub const EXTRACT_DOCUMENT_PROMPT: &str = EXTRACT_BASE;

const EXTRACT_URL_TEMPLATE: &str = r#"I need to construct a resume from the public profile at this URL: {url}

Perform a web search to find the profile details for this person.
Look for:
- Full name and headline (use as summary if needed)
- Experience (job titles, companies, dates, descriptions)
- Education (school, degree, dates)
- Skills
- Projects or certifications if available.

Consolidate the search results into a valid JSON object matching the resume data schema:
{"personalInfo": {"fullName", "email", "phone", "location", "linkedin", "website", "summary"}, "skills": [], "experience": [], "education": [], "projects": [], "awards": [], "certificates": []}

Estimate start/end years if specific months are not found.
Do not include markdown formatting in the response, just the JSON."#;

/// Clips to a maximum number of characters on a char boundary.
fn clip(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn resume_json(resume: &ResumeData) -> String {
    // Serialization of a plain string-field struct cannot fail.
    serde_json::to_string(resume).expect("resume data serializes to JSON")
}

/// Full-rewrite prompt for the optimize-for-JD operation.
pub fn build_optimize_prompt(resume: &ResumeData, jd_text: &str) -> String {
    OPTIMIZE_TEMPLATE
        .replace("{resume_json}", &resume_json(resume))
        .replace("{jd_text}", jd_text)
}

/// Summary prompt. Only the profile, skills, and most recent experience are
/// inlined — the model does not need the whole document for 3 sentences.
pub fn build_summary_prompt(resume: &ResumeData, jd_text: Option<&str>) -> String {
    let jd_context = match jd_text.filter(|jd| !jd.trim().is_empty()) {
        Some(jd) => format!("Context: Align with this JD:\n{jd}\n"),
        None => String::new(),
    };
    let first_experience: Vec<_> = resume.experience.iter().take(1).collect();
    SUMMARY_TEMPLATE
        .replace("{jd_context}", &jd_context)
        .replace(
            "{profile_json}",
            &serde_json::to_string(&resume.personal_info).expect("personal info serializes"),
        )
        .replace(
            "{skills_json}",
            &serde_json::to_string(&resume.skills).expect("skills serialize"),
        )
        .replace(
            "{experience_json}",
            &serde_json::to_string(&first_experience).expect("experience serializes"),
        )
}

/// Refinement prompt for a single description field. `context` is a short
/// "what this item is" line, e.g. "Senior Engineer from Acme Corp".
pub fn build_refine_prompt(text: &str, context: &str, jd_text: Option<&str>) -> String {
    let jd_context = match jd_text.filter(|jd| !jd.trim().is_empty()) {
        Some(jd) => format!("JD keywords to use: {}...\n", clip(jd, REFINE_JD_CLIP)),
        None => String::new(),
    };
    REFINE_TEMPLATE
        .replace("{context}", context)
        .replace("{jd_context}", &jd_context)
        .replace("{text}", text)
}

/// Keyword-match prompt.
pub fn build_analysis_prompt(resume: &ResumeData, jd_text: &str) -> String {
    ANALYSIS_TEMPLATE
        .replace("{resume_json}", &resume_json(resume))
        .replace("{jd_text}", jd_text)
}

/// Audit prompt. With a JD the review targets the posting; without one it
/// falls back to a general quality pass.
pub fn build_review_prompt(resume: &ResumeData, jd_text: Option<&str>) -> String {
    let jd_text = jd_text.filter(|jd| !jd.trim().is_empty());
    let review_target = match jd_text {
        Some(_) => "against the job description",
        None => "for general ATS readiness and impact",
    };
    let jd_block = match jd_text {
        Some(jd) => format!("\nJob description:\n{jd}"),
        None => String::new(),
    };
    REVIEW_TEMPLATE
        .replace("{review_target}", review_target)
        .replace("{resume_json}", &resume_json(resume))
        .replace("{jd_block}", &jd_block)
}

/// Document-audit prompt over pasted raw text.
pub fn build_scan_text_prompt(text: &str) -> String {
    SCAN_TEXT_TEMPLATE.replace("{text}", &clip(text, SCAN_TEXT_CLIP))
}

/// Extraction prompt over pasted raw text.
pub fn build_extract_text_prompt(text: &str) -> String {
    format!("{EXTRACT_BASE}\n\nText:\n{}", clip(text, EXTRACT_TEXT_CLIP))
}

/// Extraction prompt for a public profile URL. Paired with the search tool;
/// the schema hint lives in the prompt because search mode cannot carry a
/// response schema.
pub fn build_extract_url_prompt(url: &str) -> String {
    EXTRACT_URL_TEMPLATE.replace("{url}", url)
}
