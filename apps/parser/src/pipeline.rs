//! End-to-end structural parse of one document.

use tracing::debug;

use crate::contact::extract_contact_info;
use crate::experience::entry::parse_job_entry_traced;
use crate::experience::splitter::split_experience_traced;
use crate::models::resume::{CanonicalSection, JobEntry, ParsedResume};
use crate::sections::classifier::HeaderClassifier;
use crate::sections::segmenter::segment_traced;
use crate::trace::ParseTrace;

/// Stateless apart from the shared classifier (and its cache). Cheap to
/// clone, safe to call from many threads at once.
#[derive(Clone, Default)]
pub struct ResumeParser {
    classifier: HeaderClassifier,
}

impl ResumeParser {
    pub fn new(classifier: HeaderClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &HeaderClassifier {
        &self.classifier
    }

    pub fn parse(&self, text: &str) -> ParsedResume {
        let mut trace = ParseTrace::new();
        let contact = extract_contact_info(text);
        let sections = segment_traced(text, &self.classifier, &mut trace);
        let jobs = sections
            .get(CanonicalSection::Experience)
            .map(|experience| parse_jobs_traced(experience, &mut trace))
            .unwrap_or_default();

        debug!(
            "Parsed {} sections, {} jobs, {} trace events",
            sections.len(),
            jobs.len(),
            trace.events().len()
        );

        ParsedResume {
            contact,
            sections,
            jobs,
            trace,
        }
    }
}

/// Splits experience text into chunks and parses each into a `JobEntry`.
pub fn parse_jobs(experience: &str) -> Vec<JobEntry> {
    parse_jobs_traced(experience, &mut ParseTrace::new())
}

pub fn parse_jobs_traced(experience: &str, trace: &mut ParseTrace) -> Vec<JobEntry> {
    split_experience_traced(experience, trace)
        .iter()
        .map(|chunk| parse_job_entry_traced(chunk, trace))
        .collect()
}
