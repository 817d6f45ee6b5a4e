//! Structured diagnostics for one parse.
//!
//! Every heuristic decision the segmenter, splitter and entry parser make is
//! recorded here (and mirrored to `tracing` at debug level). Nothing in this
//! module influences control flow.

use serde::Serialize;
use tracing::debug;

use crate::models::resume::CanonicalSection;
use crate::sections::classifier::ClassificationSource;

/// Which start-of-job detector opened a chunk, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStartDetector {
    MarkerBullet,
    TitleWithDate,
    StandaloneTitle,
    IsolatedDateRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderRejection {
    FalseHeader,
    LeadingNameLine,
    TooManyWords,
    BetweenBullets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationReason {
    /// A marker glyph or short title line: the start of another job.
    NewJobHeader,
    /// A bare section header that leaked into the experience text.
    SectionKeyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    HeaderAccepted {
        line: usize,
        raw: String,
        section: CanonicalSection,
        source: ClassificationSource,
    },
    HeaderRejected {
        line: usize,
        raw: String,
        reason: HeaderRejection,
    },
    HeaderDiscarded {
        line: usize,
        raw: String,
        source: ClassificationSource,
    },
    SectionRecovered {
        line: usize,
        section: CanonicalSection,
    },
    ChunkStarted {
        line: usize,
        detector: JobStartDetector,
    },
    LinesPulledBack {
        line: usize,
        count: usize,
    },
    LineCarried {
        line: usize,
    },
    Unsegmented {
        lines: usize,
    },
    /// `chunk` is the chunk's first line; `offset` is the 1-indexed
    /// position of the stopping line within the chunk.
    BulletsTruncated {
        chunk: usize,
        offset: usize,
        text: String,
        reason: TruncationReason,
        dropped: usize,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParseTrace {
    events: Vec<TraceEvent>,
}

impl ParseTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: TraceEvent) {
        debug!(?event, "parse decision");
        self.events.push(event);
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn truncations(&self) -> impl Iterator<Item = &TraceEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::BulletsTruncated { .. }))
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_serializes_as_tagged_list() {
        let mut trace = ParseTrace::new();
        trace.record(TraceEvent::ChunkStarted {
            line: 1,
            detector: JobStartDetector::MarkerBullet,
        });
        let json = serde_json::to_string(&trace).unwrap();
        assert_eq!(
            json,
            r#"[{"event":"chunk_started","line":1,"detector":"marker_bullet"}]"#
        );
    }

    #[test]
    fn test_truncations_filter() {
        let mut trace = ParseTrace::new();
        trace.record(TraceEvent::LineCarried { line: 2 });
        trace.record(TraceEvent::BulletsTruncated {
            chunk: 1,
            offset: 5,
            text: "Education".to_string(),
            reason: TruncationReason::SectionKeyword,
            dropped: 2,
        });
        assert_eq!(trace.truncations().count(), 1);
        trace.clear();
        assert!(trace.is_empty());
    }
}
