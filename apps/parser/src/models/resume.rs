use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::trace::ParseTrace;

/// The closed set of normalized resume section identifiers.
///
/// Variant order is the canonical display order and drives `Ord`, so any
/// `BTreeMap` keyed by section iterates deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalSection {
    Summary,
    Skills,
    Experience,
    Education,
    Projects,
    Certifications,
    Awards,
    Publications,
    Other,
}

impl CanonicalSection {
    /// Every section a header may be segmented into. Excludes `Other`.
    pub const SEGMENTABLE: [CanonicalSection; 8] = [
        CanonicalSection::Summary,
        CanonicalSection::Skills,
        CanonicalSection::Experience,
        CanonicalSection::Education,
        CanonicalSection::Projects,
        CanonicalSection::Certifications,
        CanonicalSection::Awards,
        CanonicalSection::Publications,
    ];

    /// Sections the keyword fallback tries to recover when the header pass missed them.
    pub const REQUIRED: [CanonicalSection; 4] = [
        CanonicalSection::Summary,
        CanonicalSection::Skills,
        CanonicalSection::Experience,
        CanonicalSection::Education,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalSection::Summary => "summary",
            CanonicalSection::Skills => "skills",
            CanonicalSection::Experience => "experience",
            CanonicalSection::Education => "education",
            CanonicalSection::Projects => "projects",
            CanonicalSection::Certifications => "certifications",
            CanonicalSection::Awards => "awards",
            CanonicalSection::Publications => "publications",
            CanonicalSection::Other => "other",
        }
    }

    /// Parses an exact canonical label (`"projects"`, `"other"`, ...).
    /// Anything outside the closed set yields `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "summary" => Some(CanonicalSection::Summary),
            "skills" => Some(CanonicalSection::Skills),
            "experience" => Some(CanonicalSection::Experience),
            "education" => Some(CanonicalSection::Education),
            "projects" => Some(CanonicalSection::Projects),
            "certifications" => Some(CanonicalSection::Certifications),
            "awards" => Some(CanonicalSection::Awards),
            "publications" => Some(CanonicalSection::Publications),
            "other" => Some(CanonicalSection::Other),
            _ => None,
        }
    }

    pub fn is_segmentable(&self) -> bool {
        !matches!(self, CanonicalSection::Other)
    }
}

impl fmt::Display for CanonicalSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a section's span was located.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionOrigin {
    /// Confirmed by the header regex and classifier. `line` is 1-indexed.
    Header { line: usize },
    /// Recovered by the line-start keyword search after the header pass.
    KeywordFallback { line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: CanonicalSection,
    pub text: String,
    /// One entry per occurrence that contributed to `text`, in document order.
    pub origins: Vec<SectionOrigin>,
}

impl Section {
    pub fn first_line(&self) -> usize {
        self.origins
            .first()
            .map(|origin| match origin {
                SectionOrigin::Header { line } | SectionOrigin::KeywordFallback { line } => *line,
            })
            .unwrap_or(0)
    }

    pub fn is_recovered(&self) -> bool {
        self.origins
            .iter()
            .all(|origin| matches!(origin, SectionOrigin::KeywordFallback { .. }))
    }
}

/// Canonical section name → section text, kept in document order of first
/// appearance. Serializes as a JSON object in that same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    sections: Vec<Section>,
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `text` to `name`, joining repeated occurrences with a newline.
    /// Empty occurrences add an origin but no separator.
    pub fn append(&mut self, name: CanonicalSection, text: &str, origin: SectionOrigin) {
        match self.sections.iter_mut().find(|s| s.name == name) {
            Some(section) => {
                if !section.text.is_empty() && !text.is_empty() {
                    section.text.push('\n');
                }
                section.text.push_str(text);
                section.origins.push(origin);
            }
            None => self.sections.push(Section {
                name,
                text: text.to_string(),
                origins: vec![origin],
            }),
        }
    }

    /// Fills a missing or empty section. Existing non-empty text is never overwritten.
    pub(crate) fn recover(&mut self, name: CanonicalSection, text: &str, origin: SectionOrigin) {
        match self.sections.iter_mut().find(|s| s.name == name) {
            Some(section) if section.text.trim().is_empty() => {
                section.text = text.to_string();
                section.origins.push(origin);
            }
            Some(_) => {}
            None => self.sections.push(Section {
                name,
                text: text.to_string(),
                origins: vec![origin],
            }),
        }
    }

    pub fn get(&self, name: CanonicalSection) -> Option<&str> {
        self.section(name).map(|s| s.text.as_str())
    }

    pub fn section(&self, name: CanonicalSection) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: CanonicalSection) -> bool {
        self.section(name).is_some()
    }

    /// True when the section is absent or holds only whitespace.
    pub fn is_missing_or_empty(&self, name: CanonicalSection) -> bool {
        self.get(name).map(|t| t.trim().is_empty()).unwrap_or(true)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn names(&self) -> Vec<CanonicalSection> {
        self.sections.iter().map(|s| s.name).collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Orders sections by the line they were first found on.
    pub(crate) fn sort_by_position(&mut self) {
        self.sections.sort_by_key(Section::first_line);
    }
}

impl Serialize for SectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(section.name.as_str(), &section.text)?;
        }
        map.end()
    }
}

/// A contiguous run of experience lines believed to describe one job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobChunk {
    /// 1-indexed line of the first entry in `lines`, relative to the experience text.
    pub first_line: usize,
    /// Trimmed, non-blank lines in document order.
    pub lines: Vec<String>,
}

impl JobChunk {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            first_line: 1,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// One structured job record extracted from a `JobChunk`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobEntry {
    pub title: String,
    pub company: String,
    /// Raw matched text, never date-parsed.
    pub date_range: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub website: String,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self == &ContactInfo::default()
    }
}

/// Full structural output for one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedResume {
    pub contact: ContactInfo,
    pub sections: SectionMap,
    /// Empty when no experience section was recovered.
    pub jobs: Vec<JobEntry>,
    #[serde(skip_serializing_if = "ParseTrace::is_empty")]
    pub trace: ParseTrace,
}
