//! Shared line predicates for the experience splitter and the entry parser.

use once_cell::sync::Lazy;
use regex::Regex;

/// Glyphs reserved for job headers. Resumes that use them use them for
/// nothing else.
pub const MARKER_GLYPHS: &[char] = &['□', '■', '◆', '♦', '📌'];

/// Ordinary content-bullet glyphs.
pub const CONTENT_GLYPHS: &[char] = &[
    '•', '-', '*', '·', '–', '◦', '‣', '⁃', '▪', '◇', '◈', '➢', '➣', '➤', '►', '→',
];

const TITLE_KEYWORDS: &[&str] = &[
    "Analyst",
    "Engineer",
    "Manager",
    "Director",
    "Specialist",
    "Associate",
    "Consultant",
    "Developer",
    "Accountant",
    "Coordinator",
    "Assistant",
    "Administrator",
    "Scientist",
    "Supervisor",
    "Officer",
    "Representative",
    "Intern",
];

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

/// Month (abbreviated or full) + 2-4 digit year, optionally apostrophe-prefixed:
/// `Dec '23`, `Jan 2020`, `Sept. 2019`.
static MONTH_YEAR: Lazy<String> =
    Lazy::new(|| format!(r"\b{MONTH}\b\.?\s*['’‘`]?\s*\d{{2,4}}\b"));

static DATE_RANGE: Lazy<Regex> = Lazy::new(|| {
    let month_year = MONTH_YEAR.as_str();
    let pattern = format!(
        r"(?i){month_year}\s*[-–—]\s*(?:{month_year}|present\b|current\b|now\b)|\b(?:19|20)\d{{2}}\s*[-–—]\s*(?:(?:19|20)\d{{2}}\b|present\b|current\b|now\b)"
    );
    Regex::new(&pattern).expect("date range pattern is valid")
});

/// Capitalized or all-caps title keyword as a whole word. Lowercase
/// occurrences ("reported to the manager") are body text, not titles.
static TITLE_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    let alternatives = TITLE_KEYWORDS
        .iter()
        .flat_map(|k| [k.to_string(), k.to_uppercase()])
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternatives})\b")).expect("title keyword pattern is valid")
});

/// `at <Capitalized phrase>` anywhere in a title line.
static AT_COMPANY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bat\s+([A-Z][A-Za-z0-9&,.'\- ]*[A-Za-z0-9.)])").expect("at-company pattern is valid")
});

static TRAILING_AT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+at\s*$").expect("trailing-at pattern is valid"));

pub fn starts_with_marker(line: &str) -> bool {
    line.trim_start().starts_with(MARKER_GLYPHS)
}

pub fn starts_with_content_bullet(line: &str) -> bool {
    line.trim_start().starts_with(CONTENT_GLYPHS)
}

pub fn strip_marker(line: &str) -> &str {
    line.trim()
        .trim_start_matches(MARKER_GLYPHS)
        .trim_start()
}

pub fn strip_content_bullet(line: &str) -> &str {
    line.trim()
        .trim_start_matches(CONTENT_GLYPHS)
        .trim_start()
}

pub fn find_date_range(line: &str) -> Option<&str> {
    DATE_RANGE.find(line).map(|m| m.as_str())
}

pub fn has_date_range(line: &str) -> bool {
    DATE_RANGE.is_match(line)
}

/// A line that is only, or mostly, a date range (`Jan 2020 – Present`,
/// `(2019 - 2021)`, `Dates: Dec '23 - Mar '25`).
pub fn is_date_line(line: &str) -> bool {
    let line = line.trim();
    let Some(date) = find_date_range(line) else {
        return false;
    };
    let rest = line.replacen(date, "", 1);
    let residue = rest
        .chars()
        .filter(|c| c.is_alphanumeric())
        .count();
    residue <= 6
}

pub fn has_title_keyword(line: &str) -> bool {
    TITLE_KEYWORD.is_match(line)
}

pub fn find_at_company(text: &str) -> Option<&str> {
    AT_COMPANY
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

pub fn strip_trailing_at(text: &str) -> String {
    TRAILING_AT.replace(text, "").trim().to_string()
}

/// Tidies a header fragment left behind after removing a date or company:
/// collapses whitespace, drops empty brackets and dangling separators.
pub fn clean_fragment(text: &str) -> String {
    let collapsed = text
        .replace("()", "")
        .replace("[]", "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    collapsed
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '|' | ',' | ';' | '-' | '–' | '—' | '·' | '•'))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Budget Analyst Dec '23 - Mar '25", "Dec '23 - Mar '25")]
    #[case("Jan 2020 – Present", "Jan 2020 – Present")]
    #[case("Engineer | March 2018 — June 2021", "March 2018 — June 2021")]
    #[case("Sept. 2019 - Dec 2020", "Sept. 2019 - Dec 2020")]
    #[case("2019 - 2021", "2019 - 2021")]
    #[case("Acme Corp 2020 – present", "2020 – present")]
    #[case("Dec’23 - Mar’25", "Dec’23 - Mar’25")]
    fn test_find_date_range(#[case] line: &str, #[case] expected: &str) {
        assert_eq!(find_date_range(line), Some(expected));
    }

    #[rstest]
    #[case("Reduced close time by 20% in 2021")]
    #[case("Marketing 2020 plan")]
    #[case("Managed May releases")]
    fn test_no_date_range(#[case] line: &str) {
        assert_eq!(find_date_range(line), None);
    }

    #[test]
    fn test_is_date_line() {
        assert!(is_date_line("Jan 2020 - Present"));
        assert!(is_date_line("(2019 – 2021)"));
        assert!(is_date_line("Dates: Dec '23 - Mar '25"));
        assert!(!is_date_line("Budget Analyst Dec '23 - Mar '25"));
        assert!(!is_date_line("Department of the Treasury, Jan 2020 - Present"));
    }

    #[rstest]
    #[case("Budget Analyst", true)]
    #[case("SENIOR ENGINEER", true)]
    #[case("Fund Accountant II", true)]
    #[case("Reported to the manager weekly", false)]
    #[case("Project Management Office", false)]
    #[case("Associates Degree", false)]
    fn test_title_keyword(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(has_title_keyword(line), expected);
    }

    #[test]
    fn test_glyph_predicates() {
        assert!(starts_with_marker("◆ Budget Analyst"));
        assert!(starts_with_marker("📌 Engineer"));
        assert!(!starts_with_marker("• Did X"));
        assert!(starts_with_content_bullet("- Did X"));
        assert!(starts_with_content_bullet("  • Did Y"));
        assert!(!starts_with_content_bullet("◆ Budget Analyst"));
        assert!(!starts_with_content_bullet("Dept. of Treasury"));
    }

    #[test]
    fn test_strip_glyphs() {
        assert_eq!(strip_marker("◆ Budget Analyst"), "Budget Analyst");
        assert_eq!(strip_content_bullet("-  Did X "), "Did X");
        assert_eq!(strip_content_bullet("• • Nested"), "Nested");
    }

    #[test]
    fn test_find_at_company() {
        assert_eq!(
            find_at_company("Budget Analyst at SAMHSA"),
            Some("SAMHSA")
        );
        assert_eq!(
            find_at_company("Engineer at Initech, Inc."),
            Some("Initech, Inc.")
        );
        assert_eq!(find_at_company("Looked at data"), None);
    }

    #[test]
    fn test_strip_trailing_at() {
        assert_eq!(strip_trailing_at("Budget Analyst at "), "Budget Analyst");
        assert_eq!(strip_trailing_at("Data Analyst"), "Data Analyst");
    }

    #[test]
    fn test_clean_fragment() {
        assert_eq!(clean_fragment("Analyst  |  "), "Analyst");
        assert_eq!(clean_fragment("Analyst ()"), "Analyst");
        assert_eq!(clean_fragment(" - Acme Corp, "), "Acme Corp");
    }
}
