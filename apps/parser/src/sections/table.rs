//! Static header synonym table: the first classification tier.
//!
//! Matching is exact on the normalized form only. No substring or fuzzy
//! matching happens here, so "Project Management" never lands in `projects`.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::models::resume::CanonicalSection;

const SECTION_VARIANTS: &[(CanonicalSection, &[&str])] = &[
    (
        CanonicalSection::Summary,
        &[
            "summary",
            "professional summary",
            "career summary",
            "executive summary",
            "summary of qualifications",
            "profile",
            "professional profile",
            "objective",
            "career objective",
            "overview",
            "about me",
        ],
    ),
    (
        CanonicalSection::Skills,
        &[
            "skills",
            "technical skills",
            "professional skills",
            "key skills",
            "core competencies",
            "competencies",
            "areas of expertise",
            "skills & abilities",
            "skills and abilities",
            "tools",
            "tech stack",
            "technologies",
        ],
    ),
    (
        CanonicalSection::Experience,
        &[
            "experience",
            "work experience",
            "professional experience",
            "relevant experience",
            "employment",
            "employment history",
            "work history",
            "career history",
            "professional background",
        ],
    ),
    (
        CanonicalSection::Education,
        &[
            "education",
            "academic background",
            "academic history",
            "education & training",
            "education and training",
            "education & certifications",
            "education and certifications",
            "degrees",
        ],
    ),
    (
        CanonicalSection::Projects,
        &[
            "projects",
            "relevant projects",
            "personal projects",
            "academic projects",
            "key projects",
            "capstone projects",
            "independent work",
        ],
    ),
    (
        CanonicalSection::Certifications,
        &[
            "certifications",
            "certificates",
            "professional certifications",
            "licenses",
            "licenses & certifications",
            "licenses and certifications",
            "certifications & licenses",
            "certifications and licenses",
        ],
    ),
    (
        CanonicalSection::Awards,
        &[
            "awards",
            "honors",
            "honors & awards",
            "honors and awards",
            "awards & honors",
            "awards and honors",
            "achievements",
            "recognition",
        ],
    ),
    (
        CanonicalSection::Publications,
        &[
            "publications",
            "research",
            "research & publications",
            "research and publications",
            "papers",
            "presentations",
        ],
    ),
];

/// Lines that look like headers but never delimit a section.
const FALSE_HEADERS: &[&str] = &["resume", "résumé", "curriculum vitae", "cv"];

static VARIANT_INDEX: Lazy<HashMap<&'static str, CanonicalSection>> = Lazy::new(|| {
    SECTION_VARIANTS
        .iter()
        .flat_map(|(section, variants)| variants.iter().map(move |v| (*v, *section)))
        .collect()
});

/// Lowercases, trims, collapses inner whitespace and strips trailing
/// punctuation (`Work Experience:` → `work experience`).
pub fn normalize_header(candidate: &str) -> String {
    let lowered = candidate.trim().to_lowercase();
    let stripped = lowered
        .trim_end_matches(|c: char| (c.is_ascii_punctuation() && c != '&') || c.is_whitespace());
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Exact lookup of an already-normalized header.
pub fn lookup(normalized: &str) -> Option<CanonicalSection> {
    VARIANT_INDEX.get(normalized).copied()
}

pub fn is_false_header(normalized: &str) -> bool {
    FALSE_HEADERS.contains(&normalized)
}
