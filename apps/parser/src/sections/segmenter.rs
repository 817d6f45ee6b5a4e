//! Section Segmenter: slices a whole resume into canonical sections.
//!
//! Two passes over the trimmed lines:
//! 1. Header pass. Conservative regex candidates, filtered by the rejection
//!    rules, resolved through the `HeaderClassifier`. Each accepted header
//!    owns the lines up to the next accepted header.
//! 2. Keyword pass. Runs only if the header pass found something. Required
//!    sections still missing get a best-effort span starting at a line that
//!    opens with the section keyword (`Skills: Python, SQL`).

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::experience::patterns::{starts_with_content_bullet, starts_with_marker};
use crate::models::resume::{CanonicalSection, SectionMap, SectionOrigin};
use crate::sections::classifier::HeaderClassifier;
use crate::sections::table::{is_false_header, normalize_header};
use crate::trace::{HeaderRejection, ParseTrace, TraceEvent};

/// Capitalized word, then up to 40 letters/spaces/`&`/`/`/`-`, optional colon.
static HEADER_CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][A-Za-z &/\-]{1,40}:?$").expect("header candidate pattern is valid")
});

const MAX_HEADER_WORDS: usize = 5;

/// (0-indexed line, section) for every accepted header.
type AcceptedHeader = (usize, CanonicalSection);

pub fn segment(text: &str, classifier: &HeaderClassifier) -> SectionMap {
    segment_traced(text, classifier, &mut ParseTrace::new())
}

pub fn segment_traced(
    text: &str,
    classifier: &HeaderClassifier,
    trace: &mut ParseTrace,
) -> SectionMap {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let headers = find_headers(&lines, classifier, trace);

    let mut sections = SectionMap::new();
    if headers.is_empty() {
        debug!("No section headers found in {} lines", lines.len());
        return sections;
    }

    for (i, &(idx, name)) in headers.iter().enumerate() {
        let end = headers
            .get(i + 1)
            .map(|&(next, _)| next)
            .unwrap_or(lines.len());
        let span = lines[idx + 1..end].join("\n");
        sections.append(name, span.trim(), SectionOrigin::Header { line: idx + 1 });
    }

    recover_missing(&lines, &headers, &mut sections, trace);
    sections
}

// ────────────────────────────────────────────────────────────────────────────
// Header pass
// ────────────────────────────────────────────────────────────────────────────

fn find_headers(
    lines: &[&str],
    classifier: &HeaderClassifier,
    trace: &mut ParseTrace,
) -> Vec<AcceptedHeader> {
    let first_content = lines.iter().position(|l| !l.is_empty());
    let mut accepted = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        if !HEADER_CANDIDATE.is_match(line) {
            continue;
        }

        let is_first = first_content == Some(idx);
        if let Some(reason) = rejection_reason(lines, idx, is_first, classifier) {
            trace.record(TraceEvent::HeaderRejected {
                line: idx + 1,
                raw: line.to_string(),
                reason,
            });
            continue;
        }

        let (section, source) = classifier.classify_with_source(line);
        if section.is_segmentable() {
            trace.record(TraceEvent::HeaderAccepted {
                line: idx + 1,
                raw: line.to_string(),
                section,
                source,
            });
            accepted.push((idx, section));
        } else {
            trace.record(TraceEvent::HeaderDiscarded {
                line: idx + 1,
                raw: line.to_string(),
                source,
            });
        }
    }

    accepted
}

fn rejection_reason(
    lines: &[&str],
    idx: usize,
    is_first: bool,
    classifier: &HeaderClassifier,
) -> Option<HeaderRejection> {
    let line = lines[idx];

    if is_false_header(&normalize_header(line)) {
        return Some(HeaderRejection::FalseHeader);
    }
    // The opening line is nearly always the candidate's name; only an exact
    // table match may open the document as a header.
    if is_first && classifier.classify_local(line).is_none() {
        return Some(HeaderRejection::LeadingNameLine);
    }
    if line.split_whitespace().count() > MAX_HEADER_WORDS {
        return Some(HeaderRejection::TooManyWords);
    }

    let previous = lines[..idx].iter().rev().find(|l| !l.is_empty());
    let next = lines[idx + 1..].iter().find(|l| !l.is_empty());
    if previous.is_some_and(|l| is_bullet(l)) && next.is_some_and(|l| is_bullet(l)) {
        return Some(HeaderRejection::BetweenBullets);
    }

    None
}

fn is_bullet(line: &str) -> bool {
    starts_with_content_bullet(line) || starts_with_marker(line)
}

// ────────────────────────────────────────────────────────────────────────────
// Keyword pass
// ────────────────────────────────────────────────────────────────────────────

fn recover_missing(
    lines: &[&str],
    headers: &[AcceptedHeader],
    sections: &mut SectionMap,
    trace: &mut ParseTrace,
) {
    let is_header = |idx: usize| headers.iter().any(|&(h, _)| h == idx);
    let mut recovered = false;

    for name in CanonicalSection::REQUIRED {
        if !sections.is_missing_or_empty(name) {
            continue;
        }

        let Some((start, rest)) = lines.iter().enumerate().find_map(|(idx, line)| {
            if is_header(idx) {
                return None;
            }
            keyword_remainder(line, name.as_str()).map(|rest| (idx, rest))
        }) else {
            continue;
        };

        let mut span = vec![rest];
        span.extend(
            lines
                .iter()
                .enumerate()
                .skip(start + 1)
                .take_while(|&(idx, line)| !is_header(idx) && !starts_with_section_keyword(line))
                .map(|(_, line)| *line),
        );
        let text = span.join("\n");
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        debug!("Recovered '{}' from keyword at line {}", name, start + 1);
        sections.recover(name, text, SectionOrigin::KeywordFallback { line: start + 1 });
        trace.record(TraceEvent::SectionRecovered {
            line: start + 1,
            section: name,
        });
        recovered = true;
    }

    if recovered {
        sections.sort_by_position();
    }
}

/// If `line` opens with `keyword` as a whole word (case-insensitive), returns
/// what follows it with any leading `:` / `-` separator removed.
fn keyword_remainder<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let head = line.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &line[keyword.len()..];
    if rest.starts_with(|c: char| c.is_alphanumeric()) {
        return None;
    }
    Some(rest.trim_start_matches(|c: char| c == ':' || c == '-' || c.is_whitespace()))
}

fn starts_with_section_keyword(line: &str) -> bool {
    CanonicalSection::SEGMENTABLE
        .iter()
        .any(|s| keyword_remainder(line, s.as_str()).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::sections::cache::HeaderCache;
    use crate::sections::classifier::{ClassificationSource, ClassifierError, SectionClassifier};

    struct Stub(&'static str);

    impl SectionClassifier for Stub {
        fn classify_unknown(&self, _header_text: &str) -> Result<String, ClassifierError> {
            Ok(self.0.to_string())
        }
    }

    fn local() -> HeaderClassifier {
        HeaderClassifier::default()
    }

    #[test]
    fn test_scenario_a_sections() {
        let text = "EXPERIENCE\n◆ Budget Analyst Dec '23 - Mar '25\nDept. of Treasury\n- Did X\n- Did Y\nEDUCATION\nBA Finance";
        let sections = segment(text, &local());
        assert_eq!(
            sections.names(),
            vec![CanonicalSection::Experience, CanonicalSection::Education]
        );
        assert_eq!(
            sections.get(CanonicalSection::Experience),
            Some("◆ Budget Analyst Dec '23 - Mar '25\nDept. of Treasury\n- Did X\n- Did Y")
        );
        assert_eq!(sections.get(CanonicalSection::Education), Some("BA Finance"));
    }

    #[test]
    fn test_empty_and_headerless_input() {
        assert!(segment("", &local()).is_empty());
        assert!(segment("just some prose\nand more prose, really", &local()).is_empty());
    }

    #[test]
    fn test_leading_name_line_is_rejected() {
        let mut trace = ParseTrace::new();
        let text = "Jane Doe\njane@example.com\nSUMMARY\nBudget analyst.";
        let sections = segment_traced(text, &local(), &mut trace);
        assert_eq!(sections.names(), vec![CanonicalSection::Summary]);
        assert_eq!(
            trace.events()[0],
            TraceEvent::HeaderRejected {
                line: 1,
                raw: "Jane Doe".to_string(),
                reason: HeaderRejection::LeadingNameLine,
            }
        );
    }

    #[test]
    fn test_false_header_and_word_limit() {
        let mut trace = ParseTrace::new();
        let text = "Jane Doe\nResume\nSkills\nRust\nManaged Budgets For Six Regional Offices\nEducation\nBA";
        let sections = segment_traced(text, &local(), &mut trace);
        assert_eq!(
            sections.get(CanonicalSection::Skills),
            Some("Rust\nManaged Budgets For Six Regional Offices")
        );
        let reasons: Vec<_> = trace
            .events()
            .iter()
            .filter_map(|e| match e {
                TraceEvent::HeaderRejected { reason, .. } => Some(*reason),
                _ => None,
            })
            .collect();
        assert_eq!(
            reasons,
            vec![
                HeaderRejection::LeadingNameLine,
                HeaderRejection::FalseHeader,
                HeaderRejection::TooManyWords,
            ]
        );
    }

    #[test]
    fn test_candidate_between_bullets_is_body() {
        let text = "SKILLS\n- Excel\nAwards\n- SQL\nEXPERIENCE\nAnalyst";
        let sections = segment(text, &local());
        assert_eq!(
            sections.get(CanonicalSection::Skills),
            Some("- Excel\nAwards\n- SQL")
        );
        assert!(!sections.contains(CanonicalSection::Awards));
    }

    #[test]
    fn test_header_next_to_one_bullet_is_accepted() {
        let text = "SKILLS\n- Excel\n- SQL\nEDUCATION\nBA Finance\nPROJECTS\n- Ledger tool";
        let sections = segment(text, &local());
        assert_eq!(sections.get(CanonicalSection::Education), Some("BA Finance"));
        assert_eq!(sections.get(CanonicalSection::Projects), Some("- Ledger tool"));
    }

    #[test]
    fn test_repeated_sections_are_merged_in_order() {
        let text = "Jane Doe\nProjects\nLedger tool\nSkills\nRust\nKey Projects:\nBudget dashboard";
        let sections = segment(text, &local());
        assert_eq!(
            sections.get(CanonicalSection::Projects),
            Some("Ledger tool\nBudget dashboard")
        );
        assert_eq!(
            sections.section(CanonicalSection::Projects).unwrap().origins,
            vec![
                SectionOrigin::Header { line: 2 },
                SectionOrigin::Header { line: 6 },
            ]
        );
    }

    #[test]
    fn test_unknown_header_without_fallback_stays_in_body() {
        let mut trace = ParseTrace::new();
        let text = "SKILLS\nExcel\nProject Management\nScheduling";
        let sections = segment_traced(text, &local(), &mut trace);
        assert_eq!(
            sections.get(CanonicalSection::Skills),
            Some("Excel\nProject Management\nScheduling")
        );
        assert!(trace.events().contains(&TraceEvent::HeaderDiscarded {
            line: 3,
            raw: "Project Management".to_string(),
            source: ClassificationSource::Unavailable,
        }));
    }

    #[test]
    fn test_fallback_classifier_opens_section() {
        let classifier =
            HeaderClassifier::new(Arc::new(HeaderCache::new())).with_fallback(Arc::new(Stub("projects")));
        let text = "SKILLS\nExcel, SQL\nVolunteer Work\nFood bank ledger, 2021";
        let sections = segment(text, &classifier);
        assert_eq!(sections.get(CanonicalSection::Skills), Some("Excel, SQL"));
        assert_eq!(
            sections.get(CanonicalSection::Projects),
            Some("Food bank ledger, 2021")
        );
    }

    #[test]
    fn test_keyword_fallback_recovers_inline_section() {
        let mut trace = ParseTrace::new();
        let text = "Jane Doe\nEXPERIENCE\nAnalyst at Acme\nSkills: Python, SQL\nExcel\nEDUCATION\nBA Finance";
        let sections = segment_traced(text, &local(), &mut trace);
        assert_eq!(
            sections.names(),
            vec![
                CanonicalSection::Experience,
                CanonicalSection::Skills,
                CanonicalSection::Education,
            ]
        );
        assert_eq!(sections.get(CanonicalSection::Skills), Some("Python, SQL\nExcel"));
        assert!(sections.section(CanonicalSection::Skills).unwrap().is_recovered());
        assert!(trace.events().contains(&TraceEvent::SectionRecovered {
            line: 4,
            section: CanonicalSection::Skills,
        }));
    }

    #[test]
    fn test_keyword_fallback_needs_a_header() {
        assert!(segment("Jane Doe\nSkills: Python, SQL", &local()).is_empty());
    }

    #[test]
    fn test_keyword_fallback_requires_whole_word() {
        let text = "EDUCATION\nBA Finance\nExperienced in public budgeting";
        let sections = segment(text, &local());
        assert!(!sections.contains(CanonicalSection::Experience));
    }

    #[test]
    fn test_colon_header_variant() {
        let text = "Work Experience:\nAnalyst\nTechnical Skills:\nRust";
        let sections = segment(text, &local());
        assert_eq!(sections.get(CanonicalSection::Experience), Some("Analyst"));
        assert_eq!(sections.get(CanonicalSection::Skills), Some("Rust"));
    }

    #[test]
    fn test_keyword_remainder() {
        assert_eq!(keyword_remainder("Skills: Python", "skills"), Some("Python"));
        assert_eq!(keyword_remainder("SKILLS - Excel", "skills"), Some("Excel"));
        assert_eq!(keyword_remainder("Skillset", "skills"), None);
        assert_eq!(keyword_remainder("Ed", "education"), None);
    }
}
