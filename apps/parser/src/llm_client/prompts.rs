// Prompts for the header-classification fallback.

/// System prompt that pins the answer to a single label.
pub const HEADER_CLASSIFY_SYSTEM: &str = "You are a precise resume structure classifier. \
    You MUST respond with exactly one lowercase label and nothing else. \
    Do NOT include punctuation, explanations, or markdown.";

/// `{header}` is replaced with the raw candidate line.
pub const HEADER_CLASSIFY_PROMPT: &str = "\
Classify the resume section header below into one of these labels:
summary, skills, experience, education, projects, certifications, awards, publications, other

Use `other` when the line is not a section header (a name, a company, a job title, a sentence).

Header: {header}

Respond with only the label.";

pub fn header_classify_prompt(header: &str) -> String {
    HEADER_CLASSIFY_PROMPT.replace("{header}", header.trim())
}
