//! Address bar state for a web panel.
//!
//! Tracks the text field, whether the user is editing, whether a page is
//! showing, and the favorite indicator. The trailing button switches
//! between "clear" while editing and "share" otherwise.

use serde::{Deserialize, Serialize};

/// Search endpoint used when the input does not look like an address.
pub const SEARCH_URL_PREFIX: &str = "https://www.google.com/search?q=";

/// Turns address-bar input into a loadable URL.
///
/// Input with a space or without a dot is treated as a search query.
/// Input starting with `http` is used as is; anything else gets `https://`.
pub fn normalize_input(query: &str) -> String {
    let trimmed = query.trim();
    if trimmed.contains(' ') || !trimmed.contains('.') {
        format!("{}{}", SEARCH_URL_PREFIX, urlencoding::encode(trimmed))
    } else if trimmed.starts_with("http") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Host of `url`, used as the address-bar label while a page shows.
pub fn display_host(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

/// Action bound to the trailing button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RightAction {
    Clear,
    Share,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBar {
    text: String,
    is_editing: bool,
    is_web_visible: bool,
    is_favorite: bool,
}

impl AddressBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub fn is_web_visible(&self) -> bool {
        self.is_web_visible
    }

    pub fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    /// Replaces the text programmatically.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.is_editing = !self.text.is_empty();
    }

    /// Shows `label` (the page host) without entering editing mode.
    pub fn show_label(&mut self, label: &str) {
        self.text = label.to_string();
        self.is_editing = false;
    }

    /// User typed into the field.
    pub fn text_changed(&mut self, text: &str) {
        self.set_text(text);
    }

    pub fn set_web_visible(&mut self, visible: bool) {
        self.is_web_visible = visible;
    }

    pub fn set_favorite(&mut self, favorite: bool) {
        self.is_favorite = favorite;
    }

    /// Return key pressed. Yields the URL to load for non-blank input.
    pub fn submit(&mut self) -> Option<String> {
        self.is_editing = false;
        if self.text.trim().is_empty() {
            return None;
        }
        Some(normalize_input(&self.text))
    }

    pub fn right_action(&self) -> RightAction {
        if self.is_editing {
            RightAction::Clear
        } else {
            RightAction::Share
        }
    }

    pub fn right_action_enabled(&self) -> bool {
        self.is_web_visible || self.is_editing
    }

    /// Back, reload and favorite are only live while a page shows.
    pub fn navigation_enabled(&self) -> bool {
        self.is_web_visible
    }

    /// Trailing button tapped. Returns the action that was performed.
    ///
    /// `Clear` empties the field; `Share` is left to the caller.
    pub fn tap_right(&mut self) -> Option<RightAction> {
        if !self.right_action_enabled() {
            return None;
        }
        let action = self.right_action();
        if action == RightAction::Clear {
            self.set_text("");
        }
        Some(action)
    }
}
