//! Structural resume parser.
//!
//! Raw resume text goes in; canonical sections and, for the experience
//! section, structured job entries come out. The core is synchronous and
//! total. The only suspending call is the optional LLM header fallback.

pub mod config;
pub mod contact;
pub mod errors;
pub mod experience;
pub mod input;
pub mod llm_client;
pub mod models;
pub mod pipeline;
pub mod sections;
pub mod trace;

pub use models::resume::{
    CanonicalSection, ContactInfo, JobChunk, JobEntry, ParsedResume, Section, SectionMap,
    SectionOrigin,
};
pub use pipeline::ResumeParser;
pub use sections::classifier::{HeaderClassifier, SectionClassifier};
