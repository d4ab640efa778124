use serde::{Deserialize, Serialize};

/// One browsing event or bookmark.
///
/// Favorites and passive visits share this schema and the `pages` table,
/// but they are independent record streams: favoriting never converts a
/// visit record, and un-favoriting deletes the favorite record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: String,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub icon_data: Vec<u8>,
    /// Milliseconds since the UNIX epoch.
    pub created_at: i64,
    pub is_favorite: bool,
}

/// Which filtered view of the store a caller reads or observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageQuery {
    /// Records with `is_favorite == true`.
    Favorites,
    /// Every record, favorite or not.
    Recents,
}

impl PageQuery {
    /// Returns true if `record` belongs to this view.
    pub fn matches(&self, record: &PageRecord) -> bool {
        match self {
            PageQuery::Favorites => record.is_favorite,
            PageQuery::Recents => true,
        }
    }
}

/// A committed change, broadcast to observers after the write lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageChange {
    Inserted(PageRecord),
    Deleted { id: String },
}

/// Outcome of a favorite toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FavoriteToggle {
    Added(PageRecord),
    Removed { count: usize },
}

impl FavoriteToggle {
    pub fn is_favorite(&self) -> bool {
        matches!(self, FavoriteToggle::Added(_))
    }
}
