//! Experience Splitter: partitions experience text into one chunk per job.
//!
//! Single pass, one open buffer. A non-bullet line closes the buffer and opens
//! a new chunk when one of four detectors fires (first match wins):
//! 1. marker-bullet glyph (`◆`, `■`, `📌`, ...)
//! 2. title keyword and date range on the same line
//! 3. short standalone title-keyword line (< 70 chars)
//! 4. isolated date-range line, which pulls the one or two preceding
//!    title/company lines back into the new chunk
//!
//! Content-bullet lines never open a chunk.

use tracing::debug;

use crate::experience::patterns::{
    has_date_range, has_title_keyword, is_date_line, starts_with_content_bullet,
    starts_with_marker,
};
use crate::models::resume::JobChunk;
use crate::trace::{JobStartDetector, ParseTrace, TraceEvent};

const STANDALONE_TITLE_MAX_CHARS: usize = 70;
const PULL_BACK_MAX_LINES: usize = 2;
const PULL_BACK_MAX_CHARS: usize = 100;

type NumberedLine = (usize, String);

pub fn split_experience(text: &str) -> Vec<JobChunk> {
    split_experience_traced(text, &mut ParseTrace::new())
}

pub fn split_experience_traced(text: &str, trace: &mut ParseTrace) -> Vec<JobChunk> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    let mut chunks = Vec::new();
    let mut buffer: Vec<NumberedLine> = Vec::new();
    let mut opened_by: Option<JobStartDetector> = None;

    for &(number, line) in &lines {
        if starts_with_content_bullet(line) {
            buffer.push((number, line.to_string()));
            continue;
        }
        let Some(detector) = detect_job_start(line) else {
            buffer.push((number, line.to_string()));
            continue;
        };

        let mut head = Vec::new();
        if detector == JobStartDetector::IsolatedDateRange {
            head = pull_back(&mut buffer);
            if !head.is_empty() {
                trace.record(TraceEvent::LinesPulledBack {
                    line: number,
                    count: head.len(),
                });
            }
        }

        match buffer.len() {
            0 => {}
            // A lone line before any detector fired is usually a company name
            // sitting above the title. It joins the new chunk instead of
            // becoming a job of its own. A detected header stays its own job.
            1 if opened_by.is_none() => {
                let carried = buffer.remove(0);
                trace.record(TraceEvent::LineCarried { line: carried.0 });
                head.insert(0, carried);
            }
            _ => chunks.push(into_chunk(std::mem::take(&mut buffer))),
        }

        trace.record(TraceEvent::ChunkStarted {
            line: number,
            detector,
        });
        head.push((number, line.to_string()));
        buffer = head;
        opened_by = Some(detector);
    }

    if opened_by.is_none() && !lines.is_empty() {
        debug!("No job boundary found in {} experience lines", lines.len());
        trace.record(TraceEvent::Unsegmented { lines: lines.len() });
    }
    if !buffer.is_empty() {
        chunks.push(into_chunk(buffer));
    }

    chunks
}

/// Returns the detector that marks `line` as the start of a new job, if any.
/// Content-bullet lines always return `None`.
pub fn detect_job_start(line: &str) -> Option<JobStartDetector> {
    let line = line.trim();
    if line.is_empty() || starts_with_content_bullet(line) {
        return None;
    }
    if starts_with_marker(line) {
        return Some(JobStartDetector::MarkerBullet);
    }
    let has_title = has_title_keyword(line);
    if has_title && has_date_range(line) {
        return Some(JobStartDetector::TitleWithDate);
    }
    if has_title && line.chars().count() < STANDALONE_TITLE_MAX_CHARS {
        return Some(JobStartDetector::StandaloneTitle);
    }
    if is_date_line(line) {
        return Some(JobStartDetector::IsolatedDateRange);
    }
    None
}

/// Takes up to two trailing buffered lines that can plausibly be a title or
/// company for the date line that follows them.
fn pull_back(buffer: &mut Vec<NumberedLine>) -> Vec<NumberedLine> {
    let mut pulled = Vec::new();
    while pulled.len() < PULL_BACK_MAX_LINES {
        match buffer.last() {
            Some((_, line)) if is_pullable(line) => {}
            _ => break,
        }
        if let Some(entry) = buffer.pop() {
            pulled.push(entry);
        }
    }
    pulled.reverse();
    pulled
}

fn is_pullable(line: &str) -> bool {
    !starts_with_content_bullet(line)
        && !has_date_range(line)
        && !line.starts_with(|c: char| c.is_lowercase())
        && line.chars().count() < PULL_BACK_MAX_CHARS
}

fn into_chunk(lines: Vec<NumberedLine>) -> JobChunk {
    JobChunk {
        first_line: lines.first().map(|(n, _)| *n).unwrap_or(0),
        lines: lines.into_iter().map(|(_, line)| line).collect(),
    }
}
