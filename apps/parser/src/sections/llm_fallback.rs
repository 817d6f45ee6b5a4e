//! `SectionClassifier` backed by the LLM client.
//!
//! The parser is synchronous; the LLM client is async. Each call is driven to
//! completion on a captured Tokio runtime handle under a bounded timeout.
//! From a blocking thread that is a plain `block_on`. On a multi-thread
//! worker the call goes through `block_in_place`. On a current-thread worker
//! it cannot block at all and the classifier reports itself unavailable.

use std::time::Duration;

use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::debug;

use crate::llm_client::prompts::{header_classify_prompt, HEADER_CLASSIFY_SYSTEM};
use crate::llm_client::LlmClient;
use crate::sections::classifier::{ClassifierError, SectionClassifier};

pub struct LlmSectionClassifier {
    llm: LlmClient,
    runtime: Handle,
    timeout: Duration,
}

impl LlmSectionClassifier {
    pub fn new(llm: LlmClient, runtime: Handle, timeout: Duration) -> Self {
        Self {
            llm,
            runtime,
            timeout,
        }
    }
}

impl SectionClassifier for LlmSectionClassifier {
    fn classify_unknown(&self, header_text: &str) -> Result<String, ClassifierError> {
        let prompt = header_classify_prompt(header_text);
        let call = self.llm.call_text(&prompt, HEADER_CLASSIFY_SYSTEM);
        let run = || {
            self.runtime
                .block_on(async { tokio::time::timeout(self.timeout, call).await })
        };
        let outcome = match Handle::try_current() {
            Err(_) => run(),
            Ok(current) if current.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(run)
            }
            Ok(_) => {
                return Err(ClassifierError::Unavailable(
                    "cannot block on a current-thread runtime".to_string(),
                ))
            }
        };
        let label = outcome.map_err(|_| ClassifierError::Timeout(self.timeout))??;
        debug!("LLM classified header '{}' as '{}'", header_text.trim(), label);
        Ok(label)
    }
}
