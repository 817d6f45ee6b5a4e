//! Job Entry Parser: turns one `JobChunk` into one `JobEntry`.
//!
//! Phase 1 reads the header (up to three leading non-bullet lines) for
//! title, company and date range. Phase 2 runs a bullet accumulator over the
//! rest, rejoining wrapped lines and stopping at anything that looks like
//! the start of another job or a stray section header.

use crate::experience::patterns::{
    clean_fragment, find_at_company, find_date_range, has_title_keyword, is_date_line,
    starts_with_content_bullet, starts_with_marker, strip_content_bullet, strip_marker,
    strip_trailing_at,
};
use crate::models::resume::{JobChunk, JobEntry};
use crate::sections::table::{lookup, normalize_header};
use crate::trace::{ParseTrace, TraceEvent, TruncationReason};

const HEADER_WINDOW: usize = 3;
const COMPANY_MAX_CHARS: usize = 100;
const COMPANY_MAX_WORDS: usize = 10;
const NEW_JOB_TITLE_MAX_CHARS: usize = 60;
const SECTION_HEADER_MAX_CHARS: usize = 40;

pub fn parse_job_entry(chunk: &JobChunk) -> JobEntry {
    parse_job_entry_traced(chunk, &mut ParseTrace::new())
}

pub fn parse_job_entry_traced(chunk: &JobChunk, trace: &mut ParseTrace) -> JobEntry {
    let lines: Vec<&str> = chunk
        .lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    match lines.len() {
        0 => return JobEntry::default(),
        1 => {
            return JobEntry {
                title: strip_content_bullet(strip_marker(lines[0])).to_string(),
                ..JobEntry::default()
            }
        }
        _ => {}
    }

    let (mut entry, body_start) = extract_header(&lines);
    entry.bullets = accumulate_bullets(&lines, body_start, chunk.first_line, trace);
    entry
}

// ────────────────────────────────────────────────────────────────────────────
// Phase 1: header
// ────────────────────────────────────────────────────────────────────────────

/// Returns the header fields and the index of the first body line.
fn extract_header(lines: &[&str]) -> (JobEntry, usize) {
    let header_len = lines
        .iter()
        .take(HEADER_WINDOW)
        .take_while(|l| !starts_with_content_bullet(l))
        .count();
    if header_len == 0 {
        return (JobEntry::default(), 0);
    }

    let mut entry = JobEntry::default();
    let mut title = take_date(strip_marker(lines[0]), &mut entry.date_range);
    let mut idx = 1;

    if let Some((role, employer)) = title.split_once(" at ") {
        entry.company = clean_fragment(employer);
        title = clean_fragment(role);
    }

    // Company line above the title line.
    if entry.company.is_empty()
        && !has_title_keyword(&title)
        && idx < header_len
        && is_title_line(lines[idx])
    {
        entry.company = title;
        title = take_date(strip_marker(lines[idx]), &mut entry.date_range);
        idx += 1;
    }

    while idx < header_len {
        let line = lines[idx];
        if is_date_line(line) {
            take_date(line, &mut entry.date_range);
            idx += 1;
            continue;
        }
        if entry.company.is_empty() && is_company_line(line) {
            entry.company = take_date(line, &mut entry.date_range);
            idx += 1;
            continue;
        }
        break;
    }

    if entry.company.is_empty() {
        if let Some(employer) = find_at_company(&title) {
            entry.company = clean_fragment(employer);
        }
    }

    title = strip_trailing_at(&title);
    if !entry.company.is_empty() && title != entry.company && title.contains(&entry.company) {
        title = strip_trailing_at(&clean_fragment(&title.replacen(&entry.company, "", 1)));
    }
    entry.title = title;

    (entry, idx)
}

/// Moves the first date range in `line` into `date_range` (if still empty)
/// and returns what is left of the line.
fn take_date(line: &str, date_range: &mut String) -> String {
    match find_date_range(line) {
        Some(date) if date_range.is_empty() => {
            *date_range = date.trim().to_string();
            clean_fragment(&line.replacen(date, "", 1))
        }
        Some(date) => clean_fragment(&line.replacen(date, "", 1)),
        None => clean_fragment(line),
    }
}

fn is_title_line(line: &str) -> bool {
    !starts_with_marker(line)
        && has_title_keyword(line)
        && !is_date_line(line)
        && line.chars().count() < NEW_JOB_TITLE_MAX_CHARS
}

fn is_company_line(line: &str) -> bool {
    !starts_with_marker(line)
        && !has_title_keyword(line)
        && line.chars().count() < COMPANY_MAX_CHARS
        && line.split_whitespace().count() <= COMPANY_MAX_WORDS
}

// ────────────────────────────────────────────────────────────────────────────
// Phase 2: bullets
// ────────────────────────────────────────────────────────────────────────────

fn accumulate_bullets(
    lines: &[&str],
    body_start: usize,
    chunk_first_line: usize,
    trace: &mut ParseTrace,
) -> Vec<String> {
    let mut bullets = Vec::new();
    let mut current = String::new();

    for (idx, line) in lines.iter().enumerate().skip(body_start) {
        if let Some(reason) = truncation_reason(line) {
            trace.record(TraceEvent::BulletsTruncated {
                chunk: chunk_first_line,
                offset: idx + 1,
                text: line.to_string(),
                reason,
                dropped: lines.len() - idx,
            });
            break;
        }

        if starts_with_content_bullet(line) {
            flush(&mut current, &mut bullets);
            current.push_str(strip_content_bullet(line));
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(line);
        }
    }
    flush(&mut current, &mut bullets);

    bullets
}

fn flush(current: &mut String, bullets: &mut Vec<String>) {
    let text = current.trim();
    if !text.is_empty() {
        bullets.push(text.to_string());
    }
    current.clear();
}

/// Lines that end bullet accumulation without being consumed.
fn truncation_reason(line: &str) -> Option<TruncationReason> {
    if starts_with_marker(line) {
        return Some(TruncationReason::NewJobHeader);
    }
    if starts_with_content_bullet(line) {
        return None;
    }
    if has_title_keyword(line) && line.chars().count() < NEW_JOB_TITLE_MAX_CHARS {
        return Some(TruncationReason::NewJobHeader);
    }
    if line.chars().count() <= SECTION_HEADER_MAX_CHARS && lookup(&normalize_header(line)).is_some()
    {
        return Some(TruncationReason::SectionKeyword);
    }
    None
}
