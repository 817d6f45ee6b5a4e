use proptest::prelude::*;

use resume_parser::experience::entry::parse_job_entry_traced;
use resume_parser::experience::splitter::split_experience;
use resume_parser::sections::segmenter::segment;
use resume_parser::trace::ParseTrace;
use resume_parser::{HeaderClassifier, ResumeParser, SectionMap};

/// Lowercase prose that can never be a header candidate or open with a
/// section keyword.
fn body_line() -> impl Strategy<Value = String> {
    "[b-d][a-z]{2,6}( [b-d][a-z]{2,6}){0,4}"
}

fn bullet_line() -> impl Strategy<Value = String> {
    "[a-z]{1,8}( [a-z]{1,8}){0,4}".prop_map(|text| format!("- {text}"))
}

fn experience_line() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => bullet_line(),
        2 => body_line(),
        1 => Just("◆ Budget Analyst Jan 2020 - Present".to_string()),
        1 => Just("Acme Corp".to_string()),
        1 => Just("Engineer".to_string()),
        1 => Just("Jan 2019 - Dec 2021".to_string()),
        1 => Just(String::new()),
    ]
}

fn section_block() -> impl Strategy<Value = String> {
    let header = prop_oneof![
        Just("Professional Summary"),
        Just("Skills"),
        Just("Work Experience"),
        Just("Education"),
        Just("Projects"),
        Just("Awards"),
    ];
    (header, prop::collection::vec(body_line(), 0..4)).prop_map(|(header, body)| {
        let mut block = vec![header.to_string()];
        block.extend(body);
        block.join("\n")
    })
}

fn structured_document() -> impl Strategy<Value = String> {
    prop::collection::vec(section_block(), 1..6)
        .prop_map(|blocks| format!("Jane Doe\n{}", blocks.join("\n")))
}

fn reconstruct(sections: &SectionMap) -> String {
    sections
        .iter()
        .map(|s| format!("{}\n{}", s.name.as_str().to_uppercase(), s.text))
        .collect::<Vec<_>>()
        .join("\n")
}

proptest! {
    #[test]
    fn test_parse_is_total_and_deterministic(text in any::<String>()) {
        let parser = ResumeParser::default();
        let first = serde_json::to_string(&parser.parse(&text)).unwrap();
        let second = serde_json::to_string(&parser.parse(&text)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_experience_parse_is_deterministic(
        lines in prop::collection::vec(experience_line(), 0..30)
    ) {
        let text = format!("EXPERIENCE\n{}", lines.join("\n"));
        let parser = ResumeParser::default();
        let first = parser.parse(&text);
        let second = parser.parse(&text);
        prop_assert_eq!(&first.jobs, &second.jobs);
        prop_assert_eq!(&first.trace, &second.trace);
    }

    #[test]
    fn test_splitter_never_drops_lines(
        lines in prop::collection::vec(experience_line(), 0..30)
    ) {
        let text = lines.join("\n");
        let chunks = split_experience(&text);
        let emitted: Vec<&str> = chunks
            .iter()
            .flat_map(|c| c.lines.iter().map(String::as_str))
            .collect();
        let expected: Vec<&str> = lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();
        prop_assert_eq!(emitted, expected);
    }

    #[test]
    fn test_bullets_cover_chunk_unless_truncated(
        lines in prop::collection::vec(experience_line(), 0..30)
    ) {
        for chunk in split_experience(&lines.join("\n")) {
            if chunk.lines.len() < 2 {
                continue;
            }
            let mut trace = ParseTrace::new();
            let entry = parse_job_entry_traced(&chunk, &mut trace);
            if trace.truncations().count() > 0 {
                continue;
            }
            let mut bullets = entry.bullets.iter();
            for line in chunk.lines.iter().filter(|l| l.starts_with("- ")) {
                let text = line.trim_start_matches("- ");
                prop_assert!(
                    bullets.any(|b| b.starts_with(text)),
                    "bullet line {:?} missing from {:?}",
                    line,
                    entry.bullets
                );
            }
        }
    }

    #[test]
    fn test_segmentation_is_idempotent(text in structured_document()) {
        let classifier = HeaderClassifier::default();
        let first = segment(&text, &classifier);
        let second = segment(&reconstruct(&first), &classifier);
        prop_assert_eq!(first.names(), second.names());
        for section in first.iter() {
            prop_assert_eq!(Some(section.text.as_str()), second.get(section.name));
        }
    }
}
