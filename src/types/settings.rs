use serde::{Deserialize, Serialize};

/// Persisted one-shot flags and counters for the app shell.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppFlags {
    /// Onboarding has been completed and is skipped on launch.
    pub needs_skip_onboarding: bool,
    /// The review prompt has already been presented.
    pub was_review_shown: bool,
    /// The split-screen drag hint has been dismissed.
    pub has_seen_split_hint: bool,
    /// Pages finished loading across all panes.
    pub page_load_count: u32,
}

impl AppFlags {
    /// Page loads after which the review prompt is offered.
    pub const REVIEW_PROMPT_THRESHOLD: u32 = 5;

    /// True once enough pages have loaded and the prompt was never shown.
    pub fn should_prompt_review(&self) -> bool {
        self.page_load_count > Self::REVIEW_PROMPT_THRESHOLD && !self.was_review_shown
    }
}
