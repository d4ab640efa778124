//! Favorites list view model.
//!
//! Backs the two-segment list screen (Favorites / Recent) with a live
//! [`PageSubscription`]. Switching segments replaces the subscription.

use crate::managers::page_store::{PageStore, PageSubscription, PendingWrite, ViewUpdate};
use crate::types::errors::StoreError;
use crate::types::page::{PageQuery, PageRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Favorites = 0,
    Recent = 1,
}

impl Segment {
    /// Maps a segmented-control index; unknown indices yield `None`.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Segment::Favorites),
            1 => Some(Segment::Recent),
            _ => None,
        }
    }

    pub fn query(self) -> PageQuery {
        match self {
            Segment::Favorites => PageQuery::Favorites,
            Segment::Recent => PageQuery::Recents,
        }
    }
}

pub struct FavoritesList {
    store: PageStore,
    segment: Segment,
    subscription: PageSubscription,
}

impl FavoritesList {
    /// Opens the list on the Favorites segment.
    pub fn new(store: PageStore) -> Result<Self, StoreError> {
        let subscription = store.observe(Segment::Favorites.query())?;
        Ok(Self {
            store,
            segment: Segment::Favorites,
            subscription,
        })
    }

    pub fn segment(&self) -> Segment {
        self.segment
    }

    /// Switches segment by control index. Unknown indices are ignored.
    ///
    /// Returns true if the segment changed.
    pub fn set_segment(&mut self, index: usize) -> Result<bool, StoreError> {
        let Some(segment) = Segment::from_index(index) else {
            return Ok(false);
        };
        if segment == self.segment {
            return Ok(false);
        }
        self.subscription = self.store.observe(segment.query())?;
        self.segment = segment;
        Ok(true)
    }

    pub fn items(&self) -> &[PageRecord] {
        self.subscription.items()
    }

    /// Applies every change committed since the last call.
    ///
    /// Returns the number of updates applied.
    pub fn refresh(&mut self) -> usize {
        let mut applied = 0;
        while self.subscription.try_next_update().is_some() {
            applied += 1;
        }
        applied
    }

    /// Waits for the next change to the visible segment.
    pub async fn changed(&mut self) -> Option<ViewUpdate> {
        self.subscription.next_update().await
    }

    /// Deletes the record at `index` in the current view.
    pub fn delete(&self, index: usize) -> Option<PendingWrite<bool>> {
        let record = self.items().get(index)?;
        Some(self.store.delete(&record.id))
    }

    /// Parsed URL of the record at `index`, for the share sheet.
    pub fn share_url(&self, index: usize) -> Option<String> {
        let record = self.items().get(index)?;
        url::Url::parse(&record.url).ok().map(|u| u.to_string())
    }
}
