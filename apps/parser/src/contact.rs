//! Contact block extraction from the head of a resume.
//!
//! Regex-only and best-effort: only the first 15 lines are inspected, and
//! each field takes the first line that matches.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::resume::ContactInfo;

const CONTACT_WINDOW: usize = 15;
const LOCATION_MAX_CHARS: usize = 60;

const NOT_A_NAME: &[&str] = &["resume", "résumé", "curriculum", "vitae", "summary"];
const LOCATION_KEYWORDS: &[&str] = &["city", "state", "country", "location", "address"];

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.+\-]+@[\w\-]+(?:\.[\w\-]+)*\.\w+").expect("email pattern is valid"));

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[-.\s]?)?(?:\(\d{3}\)\s*|\d{3}[-.\s]?)\d{3}[-.\s]?\d{4}")
        .expect("phone pattern is valid")
});

static LINKEDIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)linkedin\.com/in/[\w\-]+").expect("linkedin pattern is valid"));

static GITHUB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)github\.com/[\w\-]+").expect("github pattern is valid"));

static WEBSITE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://[\w.\-]+\.\w+[\w/.\-]*").expect("website pattern is valid"));

static LOCATION_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:address|location|city|state|country)[\s:]+")
        .expect("location label pattern is valid")
});

static CV_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bcv\b").expect("cv pattern is valid"));

pub fn extract_contact_info(text: &str) -> ContactInfo {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(CONTACT_WINDOW)
        .collect();

    let mut info = ContactInfo {
        name: lines
            .iter()
            .find(|l| is_name_line(l))
            .map(|l| l.to_string())
            .unwrap_or_default(),
        email: first_match(&lines, &EMAIL),
        phone: first_match(&lines, &PHONE),
        location: lines
            .iter()
            .find(|l| is_location_line(l))
            .map(|l| LOCATION_LABEL.replace_all(l, "").trim().to_string())
            .unwrap_or_default(),
        ..ContactInfo::default()
    };

    info.linkedin = first_match(&lines, &LINKEDIN);
    info.github = first_match(&lines, &GITHUB);
    info.website = lines
        .iter()
        .flat_map(|l| WEBSITE.find_iter(l))
        .map(|m| m.as_str())
        .find(|url| {
            let url = url.to_lowercase();
            !url.contains("linkedin.com") && !url.contains("github.com")
        })
        .unwrap_or_default()
        .to_string();

    info
}

fn first_match(lines: &[&str], pattern: &Regex) -> String {
    lines
        .iter()
        .find_map(|l| pattern.find(l))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn is_name_line(line: &str) -> bool {
    let lowered = line.to_lowercase();
    line.chars().count() > 2
        && !line.contains('@')
        && !lowered.starts_with("http")
        && !lowered.starts_with("www")
        && !lowered.contains("linkedin.com")
        && !lowered.contains("github.com")
        && !PHONE.is_match(line)
        && !NOT_A_NAME.iter().any(|term| lowered.contains(term))
        && !CV_WORD.is_match(line)
}

fn is_location_line(line: &str) -> bool {
    if line.contains('@') || PHONE.is_match(line) || line.chars().count() > LOCATION_MAX_CHARS {
        return false;
    }
    let lowered = line.to_lowercase();
    if lowered.contains("http") || lowered.contains(".com") {
        return false;
    }
    line.contains(',') || LOCATION_KEYWORDS.iter().any(|k| lowered.contains(k))
}
