//! Web Panel controller for SplitScreen.
//!
//! One panel per pane: a grid of quick-launch sites until something is
//! opened, then the embedded web view. The panel owns the address bar
//! state, records finished page loads as visits and toggles favorites.
//! Rendering is delegated to a [`WebView`] supplied by the host.

use tracing::warn;

use crate::managers::address_bar::{display_host, AddressBar, RightAction};
use crate::managers::page_store::{PageStore, PendingWrite};
use crate::services::favicon::IconSource;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::page::PageRecord;

/// Title stored when the page does not report one.
pub const UNTITLED: &str = "Untitled";

/// Web-rendering collaborator driven by the panel.
pub trait WebView {
    fn current_url(&self) -> Option<String>;
    fn page_title(&self) -> Option<String>;
    fn load(&mut self, url: &str);
    fn can_go_back(&self) -> bool;
    /// Navigates back; returns false if there was nothing to go back to.
    fn go_back(&mut self) -> bool;
    fn reload(&mut self);
    fn stop_loading(&mut self);
}

/// Entry on the home grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickSite {
    pub name: &'static str,
    pub url: &'static str,
}

pub const QUICK_SITES: [QuickSite; 6] = [
    QuickSite { name: "Google", url: "https://www.google.com" },
    QuickSite { name: "YouTube", url: "https://www.youtube.com" },
    QuickSite { name: "Facebook", url: "https://www.facebook.com" },
    QuickSite { name: "Instagram", url: "https://www.instagram.com" },
    QuickSite { name: "X", url: "https://www.twitter.com" },
    QuickSite { name: "Amazon", url: "https://www.amazon.com" },
];

/// Result of handling a finished page load.
pub struct PageFinished {
    pub url: String,
    /// The queued visit record.
    pub visit: PendingWrite<PageRecord>,
    /// True when the host should present the review prompt now.
    pub show_review_prompt: bool,
}

pub struct WebPanel<W: WebView, I: IconSource> {
    web: W,
    icons: I,
    store: PageStore,
    address_bar: AddressBar,
}

impl<W: WebView, I: IconSource> WebPanel<W, I> {
    pub fn new(web: W, icons: I, store: PageStore) -> Self {
        Self {
            web,
            icons,
            store,
            address_bar: AddressBar::new(),
        }
    }

    pub fn address_bar(&self) -> &AddressBar {
        &self.address_bar
    }

    pub fn web_view(&self) -> &W {
        &self.web
    }

    pub fn web_view_mut(&mut self) -> &mut W {
        &mut self.web
    }

    pub fn icons(&self) -> &I {
        &self.icons
    }

    /// True while the home grid is showing instead of a page.
    pub fn is_home(&self) -> bool {
        !self.address_bar.is_web_visible()
    }

    /// Loads `url` in the web view. Returns false if it is not a valid URL.
    pub fn open_website(&mut self, url: &str) -> bool {
        if url::Url::parse(url).is_err() {
            return false;
        }
        let label = display_host(url).unwrap_or_else(|| url.to_string());
        self.address_bar.show_label(&label);
        self.address_bar.set_web_visible(true);
        self.web.load(url);
        true
    }

    pub fn open_quick_site(&mut self, index: usize) -> bool {
        match QUICK_SITES.get(index) {
            Some(site) => self.open_website(site.url),
            None => false,
        }
    }

    /// User is typing in the address bar.
    pub fn type_text(&mut self, text: &str) {
        self.address_bar.text_changed(text);
    }

    /// Return key in the address bar: search or navigate.
    pub fn submit(&mut self) -> bool {
        match self.address_bar.submit() {
            Some(url) => self.open_website(&url),
            None => false,
        }
    }

    pub fn submit_search(&mut self, query: &str) -> bool {
        self.type_text(query);
        self.submit()
    }

    /// Back button: history back, or return to the home grid.
    pub fn tap_back(&mut self) {
        if !self.address_bar.navigation_enabled() {
            return;
        }
        if self.web.can_go_back() && self.web.go_back() {
            return;
        }
        self.web.stop_loading();
        self.address_bar.set_favorite(false);
        self.address_bar.show_label("");
        self.address_bar.set_web_visible(false);
    }

    pub fn tap_reload(&mut self) {
        if self.address_bar.navigation_enabled() {
            self.web.reload();
        }
    }

    /// Trailing button: clears the field while editing, otherwise returns the URL to share.
    pub fn tap_right(&mut self) -> Option<String> {
        match self.address_bar.tap_right()? {
            RightAction::Clear => None,
            RightAction::Share => self.share_url(),
        }
    }

    /// Current page URL, if it parses.
    pub fn share_url(&self) -> Option<String> {
        let url = self.web.current_url()?;
        url::Url::parse(&url).ok().map(|u| u.to_string())
    }

    /// Favorite button: toggles the favorite for the current page in one store write.
    ///
    /// Returns the new indicator state, or `None` if nothing changed.
    pub async fn tap_favorite(&mut self) -> Option<bool> {
        if !self.address_bar.navigation_enabled() {
            return None;
        }
        let url = self.web.current_url()?;

        // The icon is only stored when the toggle adds; skip the fetch when
        // the page already looks favorited. The store decides atomically.
        let title = self.title();
        let icon = if self.lookup_favorite(&url) {
            Vec::new()
        } else {
            self.fetch_icon(&url).await
        };
        let now_favorite = self.store.toggle_favorite(&url, &title, icon).await?.is_favorite();
        self.address_bar.set_favorite(now_favorite);
        Some(now_favorite)
    }

    /// Handles the web view's "finished loading" notification.
    ///
    /// Updates the address bar, records the visit and counts the page load.
    pub async fn on_page_finished(&mut self, settings: &mut SettingsEngine) -> Option<PageFinished> {
        let url = self.web.current_url()?;
        let label = display_host(&url).unwrap_or_else(|| url.clone());
        self.address_bar.show_label(&label);
        let favorite = self.lookup_favorite(&url);
        self.address_bar.set_favorite(favorite);

        let title = self.title();
        let icon = self.fetch_icon(&url).await;
        let visit = self.store.record_visit(&url, &title, icon);

        if let Err(e) = settings.bump_page_loads() {
            warn!(error = %e, "failed to persist page-load counter");
        }
        let show_review_prompt = settings.get_settings().should_prompt_review();

        Some(PageFinished {
            url,
            visit,
            show_review_prompt,
        })
    }

    fn title(&self) -> String {
        self.web
            .page_title()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    fn lookup_favorite(&self, url: &str) -> bool {
        self.store.is_favorite(url).unwrap_or_else(|e| {
            warn!(error = %e, "favorite lookup failed");
            false
        })
    }

    async fn fetch_icon(&self, url: &str) -> Vec<u8> {
        let domain = display_host(url).unwrap_or_default();
        self.icons.fetch_icon(&domain).await.unwrap_or_default()
    }
}
