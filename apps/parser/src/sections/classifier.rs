//! HeaderClassifier: maps a header candidate to a `CanonicalSection`.
//!
//! Tier 1 is the static synonym table. Tier 2 is the shared `HeaderCache`.
//! Tier 3 is an injected `SectionClassifier` (an LLM in production, a stub in
//! tests). Any failure at tier 3 is absorbed as `CanonicalSection::Other`.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::LlmError;
use crate::models::resume::CanonicalSection;
use crate::sections::cache::HeaderCache;
use crate::sections::table::{lookup, normalize_header};

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),

    #[error("Classifier timed out after {0:?}")]
    Timeout(Duration),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// The narrow seam to an external header classifier.
///
/// Implementations return a single categorical token, ideally one of the
/// canonical section labels or `"other"`. Callers never trust the answer:
/// anything outside the closed set is coerced to `other`.
pub trait SectionClassifier: Send + Sync {
    fn classify_unknown(&self, header_text: &str) -> Result<String, ClassifierError>;
}

/// Where a classification came from. Recorded in the parse trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    Table,
    Cache,
    Fallback,
    /// No fallback collaborator is configured.
    Unavailable,
    /// The collaborator errored or timed out.
    Failed,
}

/// Three-tier header classifier. Cheap to clone; clones share the cache.
#[derive(Clone)]
pub struct HeaderClassifier {
    cache: Arc<HeaderCache>,
    fallback: Option<Arc<dyn SectionClassifier>>,
}

impl Default for HeaderClassifier {
    fn default() -> Self {
        Self::new(Arc::new(HeaderCache::new()))
    }
}

impl HeaderClassifier {
    /// Table and cache only. Unknown headers resolve to `other`.
    pub fn new(cache: Arc<HeaderCache>) -> Self {
        Self {
            cache,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn SectionClassifier>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn cache(&self) -> &Arc<HeaderCache> {
        &self.cache
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub fn classify(&self, candidate: &str) -> CanonicalSection {
        self.classify_with_source(candidate).0
    }

    /// Static-table tier only. Never consults the cache or the collaborator.
    pub fn classify_local(&self, candidate: &str) -> Option<CanonicalSection> {
        lookup(&normalize_header(candidate))
    }

    pub fn classify_with_source(&self, candidate: &str) -> (CanonicalSection, ClassificationSource) {
        let normalized = normalize_header(candidate);

        if let Some(section) = lookup(&normalized) {
            return (section, ClassificationSource::Table);
        }
        if let Some(section) = self.cache.get(&normalized) {
            return (section, ClassificationSource::Cache);
        }

        let Some(fallback) = &self.fallback else {
            return (CanonicalSection::Other, ClassificationSource::Unavailable);
        };

        match fallback.classify_unknown(candidate) {
            Ok(answer) => {
                let section = interpret_label(&answer);
                if section == CanonicalSection::Other && answer.trim() != "other" {
                    debug!("Fallback label '{answer}' for '{candidate}' is outside the canonical set");
                }
                self.cache.insert(normalized, section);
                (section, ClassificationSource::Fallback)
            }
            Err(e) => {
                // Failures are not cached: a later parse may reach the collaborator.
                warn!("Header fallback failed for '{candidate}': {e}");
                (CanonicalSection::Other, ClassificationSource::Failed)
            }
        }
    }
}

/// Coerces a collaborator answer into the closed set.
///
/// Surrounding quotes, backticks and a trailing period are tolerated
/// (`"Projects."` → `projects`); anything else unknown becomes `other`.
pub fn interpret_label(answer: &str) -> CanonicalSection {
    let cleaned = answer
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '.') || c.is_whitespace())
        .to_lowercase();
    CanonicalSection::from_label(&cleaned).unwrap_or(CanonicalSection::Other)
}
