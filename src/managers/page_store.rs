//! Page Store for SplitScreen.
//!
//! Sole owner of [`PageRecord`] persistence. Favorites and visit history
//! live in one `pages` table; every mutation funnels through a single
//! writer thread so writes apply in submission order and never interleave.
//! Reads lock the connection briefly and see only committed state.
//!
//! Mutating calls return a [`PendingWrite`] immediately. Awaiting it (or
//! calling [`PendingWrite::wait`] from synchronous code) yields `Some(value)`
//! once the write commits, or `None` if it failed. Failures are logged and
//! never surfaced beyond that.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};
use std::thread::{self, JoinHandle};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection, OptionalExtension, Transaction};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::database::Database;
use crate::types::errors::StoreError;
use crate::types::page::{FavoriteToggle, PageChange, PageQuery, PageRecord};

/// Buffered change events per observer before it has to resynchronize.
const CHANGE_CHANNEL_CAPACITY: usize = 256;

const SELECT_COLUMNS: &str = "SELECT id, url, title, icon_data, created_at, is_favorite FROM pages";

/// Page data supplied by callers; id and timestamp are assigned by the store.
#[derive(Debug, Clone)]
struct NewPage {
    url: String,
    title: String,
    icon_data: Vec<u8>,
}

/// Commands sent to the writer thread.
enum WriteCommand {
    RecordVisit {
        page: NewPage,
        respond: oneshot::Sender<Option<PageRecord>>,
    },
    AddFavorite {
        page: NewPage,
        respond: oneshot::Sender<Option<PageRecord>>,
    },
    RemoveFavorite {
        url_or_id: String,
        respond: oneshot::Sender<Option<usize>>,
    },
    ToggleFavorite {
        page: NewPage,
        respond: oneshot::Sender<Option<FavoriteToggle>>,
    },
    Delete {
        id: String,
        respond: oneshot::Sender<Option<bool>>,
    },
    /// Stop the writer after every earlier command has been applied.
    Shutdown { respond: oneshot::Sender<()> },
}

/// Handle to a queued write.
///
/// The write runs whether or not this handle is polled; dropping it only
/// discards the outcome.
#[must_use = "dropping a PendingWrite discards the outcome, not the write"]
pub struct PendingWrite<T> {
    rx: Option<oneshot::Receiver<Option<T>>>,
}

impl<T> PendingWrite<T> {
    fn new(rx: oneshot::Receiver<Option<T>>) -> Self {
        Self { rx: Some(rx) }
    }

    /// A write that could not be queued at all.
    fn failed() -> Self {
        Self { rx: None }
    }

    /// Blocks the current thread until the write commits or fails.
    ///
    /// For synchronous hosts only; panics if called from within an async runtime.
    pub fn wait(self) -> Option<T> {
        self.rx?.blocking_recv().ok().flatten()
    }
}

impl<T> Future for PendingWrite<T> {
    type Output = Option<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.get_mut().rx.as_mut() {
            None => Poll::Ready(None),
            Some(rx) => Pin::new(rx).poll(cx).map(|res| res.ok().flatten()),
        }
    }
}

/// Cloneable handle to the page store.
///
/// All clones share one connection, one writer thread and one change feed.
#[derive(Clone)]
pub struct PageStore {
    db: Arc<Mutex<Database>>,
    write_tx: mpsc::UnboundedSender<WriteCommand>,
    changes: broadcast::Sender<PageChange>,
    writer_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl PageStore {
    /// Opens (or creates) the store at `path` and starts its writer thread.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self, StoreError> {
        let db = Database::open(path.as_ref())?;
        info!(path = %path.as_ref().display(), "page store opened");
        Self::with_database(db)
    }

    /// Opens a store backed by an in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_database(Database::open_in_memory()?)
    }

    /// Wraps an already migrated database and starts the writer thread.
    pub fn with_database(db: Database) -> Result<Self, StoreError> {
        let db = Arc::new(Mutex::new(db));
        let (write_tx, mut write_rx) = mpsc::unbounded_channel::<WriteCommand>();
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        let writer_db = Arc::clone(&db);
        let writer_changes = changes.clone();
        let handle = thread::Builder::new()
            .name("page-store-writer".to_string())
            .spawn(move || writer_loop(&writer_db, &mut write_rx, &writer_changes))
            .map_err(|e| {
                warn!(error = %e, "failed to start page store writer");
                StoreError::WriterUnavailable
            })?;

        Ok(Self {
            db,
            write_tx,
            changes,
            writer_handle: Arc::new(Mutex::new(Some(handle))),
        })
    }

    // ─── Reads ───

    /// All favorite records, newest first.
    pub fn fetch_favorites(&self) -> Result<Vec<PageRecord>, StoreError> {
        self.fetch(PageQuery::Favorites)
    }

    /// Every record, favorite or not, newest first.
    pub fn fetch_recents(&self) -> Result<Vec<PageRecord>, StoreError> {
        self.fetch(PageQuery::Recents)
    }

    /// Runs `query` against the last committed state.
    pub fn fetch(&self, query: PageQuery) -> Result<Vec<PageRecord>, StoreError> {
        let db = lock_db(&self.db);
        query_pages(db.connection(), query)
    }

    /// Whether a favorite record exists for exactly this URL.
    pub fn is_favorite(&self, url: &str) -> Result<bool, StoreError> {
        let db = lock_db(&self.db);
        Ok(find_favorite(db.connection(), url)?.is_some())
    }

    /// Looks up a single record by id.
    pub fn get(&self, id: &str) -> Result<PageRecord, StoreError> {
        let db = lock_db(&self.db);
        db.connection()
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                row_to_record,
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Starts a live view over `query`.
    ///
    /// The snapshot and the change feed are taken under the connection lock,
    /// so every commit is either in the snapshot or delivered as a change.
    pub fn observe(&self, query: PageQuery) -> Result<PageSubscription, StoreError> {
        let db = lock_db(&self.db);
        let rx = self.changes.subscribe();
        let items = query_pages(db.connection(), query)?;
        Ok(PageSubscription {
            query,
            items,
            rx,
            db: Arc::clone(&self.db),
        })
    }

    // ─── Writes ───

    /// Appends a passive visit record. Best effort: failures are only logged.
    pub fn record_visit(&self, url: &str, title: &str, icon_data: Vec<u8>) -> PendingWrite<PageRecord> {
        let page = new_page(url, title, icon_data);
        self.submit("record_visit", |respond| WriteCommand::RecordVisit { page, respond })
    }

    /// Bookmarks `url`. An existing favorite for the same URL is returned as is.
    pub fn add_favorite(&self, url: &str, title: &str, icon_data: Vec<u8>) -> PendingWrite<PageRecord> {
        let page = new_page(url, title, icon_data);
        self.submit("add_favorite", |respond| WriteCommand::AddFavorite { page, respond })
    }

    /// Deletes every favorite whose id or URL equals `url_or_id`.
    ///
    /// Resolves to the number of records removed; zero is not an error.
    pub fn remove_favorite(&self, url_or_id: &str) -> PendingWrite<usize> {
        let url_or_id = url_or_id.to_string();
        self.submit("remove_favorite", |respond| WriteCommand::RemoveFavorite { url_or_id, respond })
    }

    /// Removes the favorite for `url` if there is one, otherwise adds it.
    pub fn toggle_favorite(&self, url: &str, title: &str, icon_data: Vec<u8>) -> PendingWrite<FavoriteToggle> {
        let page = new_page(url, title, icon_data);
        self.submit("toggle_favorite", |respond| WriteCommand::ToggleFavorite { page, respond })
    }

    /// Deletes a record by id. Resolves to `false` if it was already gone.
    pub fn delete(&self, id: &str) -> PendingWrite<bool> {
        let id = id.to_string();
        self.submit("delete", |respond| WriteCommand::Delete { id, respond })
    }

    /// Drains queued writes, then stops and joins the writer thread.
    ///
    /// Writes submitted afterwards resolve to `None`. Calling this more than
    /// once is harmless. Inside a tokio runtime this only queues the stop
    /// and returns; use [`shutdown_async`](Self::shutdown_async) to wait there.
    pub fn shutdown(&self) {
        let (tx, rx) = oneshot::channel();
        let queued = self.write_tx.send(WriteCommand::Shutdown { respond: tx }).is_ok();

        if tokio::runtime::Handle::try_current().is_ok() {
            debug!("page store shutdown queued from async context; not joining writer");
            return;
        }

        if queued {
            let _ = rx.blocking_recv();
        }
        if let Some(handle) = self.take_writer() {
            if handle.join().is_err() {
                warn!("page store writer thread panicked");
            }
        }
    }

    /// Async form of [`shutdown`](Self::shutdown): drains queued writes, then
    /// joins the writer thread without blocking the runtime.
    pub async fn shutdown_async(&self) {
        let (tx, rx) = oneshot::channel();
        if self.write_tx.send(WriteCommand::Shutdown { respond: tx }).is_ok() {
            let _ = rx.await;
        }
        if let Some(handle) = self.take_writer() {
            match tokio::task::spawn_blocking(move || handle.join()).await {
                Ok(Ok(())) => {}
                Ok(Err(_)) => warn!("page store writer thread panicked"),
                Err(e) => warn!(error = %e, "failed to join page store writer"),
            }
        }
    }

    fn take_writer(&self) -> Option<JoinHandle<()>> {
        self.writer_handle
            .lock()
            .ok()
            .and_then(|mut guard| guard.take())
    }

    fn submit<T>(
        &self,
        op: &'static str,
        build: impl FnOnce(oneshot::Sender<Option<T>>) -> WriteCommand,
    ) -> PendingWrite<T> {
        let (tx, rx) = oneshot::channel();
        if self.write_tx.send(build(tx)).is_err() {
            warn!(op, "page store writer is not running; write dropped");
            return PendingWrite::failed();
        }
        PendingWrite::new(rx)
    }
}

/// Live, sorted view of one [`PageQuery`].
///
/// Holds the current items and applies committed changes as they arrive.
/// Dropping the subscription unsubscribes.
pub struct PageSubscription {
    query: PageQuery,
    items: Vec<PageRecord>,
    rx: broadcast::Receiver<PageChange>,
    db: Arc<Mutex<Database>>,
}

/// What changed in a subscription's view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    /// A single committed change touching this view.
    Changed(PageChange),
    /// Change events were missed; the view was reloaded from the database.
    Reloaded,
}

impl PageSubscription {
    pub fn query(&self) -> PageQuery {
        self.query
    }

    /// Current contents of the view, newest first.
    pub fn items(&self) -> &[PageRecord] {
        &self.items
    }

    /// Waits for the next change that affects this view.
    ///
    /// Returns `None` once the store and its writer are gone.
    pub async fn next_update(&mut self) -> Option<ViewUpdate> {
        loop {
            let received = self.rx.recv().await;
            match self.handle(received) {
                Step::Update(update) => return Some(update),
                Step::Skip => continue,
                Step::Closed => return None,
            }
        }
    }

    /// Applies the next pending change without waiting.
    ///
    /// Returns `None` when nothing relevant is queued.
    pub fn try_next_update(&mut self) -> Option<ViewUpdate> {
        loop {
            let received = match self.rx.try_recv() {
                Ok(change) => Ok(change),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    Err(broadcast::error::RecvError::Lagged(n))
                }
                Err(broadcast::error::TryRecvError::Closed) => {
                    Err(broadcast::error::RecvError::Closed)
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
            };
            match self.handle(received) {
                Step::Update(update) => return Some(update),
                Step::Skip => continue,
                Step::Closed => return None,
            }
        }
    }

    /// Explicitly ends the subscription.
    pub fn unsubscribe(self) {}

    fn handle(&mut self, received: Result<PageChange, broadcast::error::RecvError>) -> Step {
        match received {
            Ok(change) => {
                if self.apply(&change) {
                    Step::Update(ViewUpdate::Changed(change))
                } else {
                    Step::Skip
                }
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                debug!(missed, "page subscription lagged; reloading");
                match query_pages(lock_db(&self.db).connection(), self.query) {
                    Ok(items) => {
                        self.items = items;
                        Step::Update(ViewUpdate::Reloaded)
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to reload page subscription");
                        Step::Skip
                    }
                }
            }
            Err(broadcast::error::RecvError::Closed) => Step::Closed,
        }
    }

    /// Returns true if the change altered this view.
    fn apply(&mut self, change: &PageChange) -> bool {
        match change {
            PageChange::Inserted(record) => {
                if !self.query.matches(record) || self.items.iter().any(|r| r.id == record.id) {
                    return false;
                }
                // Ties go first, matching the rowid tiebreak in `query_pages`.
                let at = self
                    .items
                    .iter()
                    .position(|r| r.created_at <= record.created_at)
                    .unwrap_or(self.items.len());
                self.items.insert(at, record.clone());
                true
            }
            PageChange::Deleted { id } => match self.items.iter().position(|r| &r.id == id) {
                Some(at) => {
                    self.items.remove(at);
                    true
                }
                None => false,
            },
        }
    }
}

enum Step {
    Update(ViewUpdate),
    Skip,
    Closed,
}

// =============================================================================
// Writer thread
// =============================================================================

fn writer_loop(
    db: &Mutex<Database>,
    rx: &mut mpsc::UnboundedReceiver<WriteCommand>,
    changes: &broadcast::Sender<PageChange>,
) {
    debug!("page store writer started");
    while let Some(cmd) = rx.blocking_recv() {
        match cmd {
            WriteCommand::RecordVisit { page, respond } => {
                let result = commit(db, changes, "record_visit", |tx| {
                    let record = insert_page(tx, &page, false)?;
                    Ok((record.clone(), vec![PageChange::Inserted(record)]))
                });
                let _ = respond.send(result);
            }
            WriteCommand::AddFavorite { page, respond } => {
                let result = commit(db, changes, "add_favorite", |tx| {
                    if let Some(existing) = find_favorite(tx, &page.url)? {
                        return Ok((existing, Vec::new()));
                    }
                    let record = insert_page(tx, &page, true)?;
                    Ok((record.clone(), vec![PageChange::Inserted(record)]))
                });
                let _ = respond.send(result);
            }
            WriteCommand::RemoveFavorite { url_or_id, respond } => {
                let result = commit(db, changes, "remove_favorite", |tx| {
                    let removed = remove_favorites(tx, &url_or_id)?;
                    let count = removed.len();
                    Ok((count, deletions(removed)))
                });
                let _ = respond.send(result);
            }
            WriteCommand::ToggleFavorite { page, respond } => {
                let result = commit(db, changes, "toggle_favorite", |tx| {
                    if find_favorite(tx, &page.url)?.is_some() {
                        let removed = remove_favorites(tx, &page.url)?;
                        let count = removed.len();
                        return Ok((FavoriteToggle::Removed { count }, deletions(removed)));
                    }
                    let record = insert_page(tx, &page, true)?;
                    Ok((
                        FavoriteToggle::Added(record.clone()),
                        vec![PageChange::Inserted(record)],
                    ))
                });
                let _ = respond.send(result);
            }
            WriteCommand::Delete { id, respond } => {
                let result = commit(db, changes, "delete", |tx| {
                    let affected = tx.execute("DELETE FROM pages WHERE id = ?1", params![id])?;
                    if affected == 0 {
                        return Ok((false, Vec::new()));
                    }
                    Ok((true, vec![PageChange::Deleted { id: id.clone() }]))
                });
                let _ = respond.send(result);
            }
            WriteCommand::Shutdown { respond } => {
                let _ = respond.send(());
                break;
            }
        }
    }
    debug!("page store writer stopped");
}

/// Runs `op` in a transaction and broadcasts its changes after commit.
///
/// Changes are sent while the connection lock is still held so `observe`
/// never sees a commit without its event or vice versa.
fn commit<T>(
    db: &Mutex<Database>,
    changes: &broadcast::Sender<PageChange>,
    op: &'static str,
    f: impl FnOnce(&Transaction<'_>) -> Result<(T, Vec<PageChange>), StoreError>,
) -> Option<T> {
    let mut guard = lock_db(db);
    let result = guard
        .connection_mut()
        .transaction()
        .map_err(StoreError::from)
        .and_then(|tx| {
            let out = f(&tx)?;
            tx.commit()?;
            Ok(out)
        });

    match result {
        Ok((value, events)) => {
            debug!(op, changes = events.len(), "page store write committed");
            for event in events {
                // No receivers is fine.
                let _ = changes.send(event);
            }
            Some(value)
        }
        Err(e) => {
            warn!(op, error = %e, "page store write failed");
            None
        }
    }
}

fn deletions(ids: Vec<String>) -> Vec<PageChange> {
    ids.into_iter().map(|id| PageChange::Deleted { id }).collect()
}

// =============================================================================
// SQL helpers
// =============================================================================

/// Returns the current time in milliseconds since the UNIX epoch.
fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

fn new_page(url: &str, title: &str, icon_data: Vec<u8>) -> NewPage {
    NewPage {
        url: url.to_string(),
        title: title.to_string(),
        icon_data,
    }
}

/// Recovers the guard from a poisoned lock; SQLite state is transactional.
fn lock_db(db: &Mutex<Database>) -> MutexGuard<'_, Database> {
    db.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<PageRecord> {
    Ok(PageRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        title: row.get(2)?,
        icon_data: row.get(3)?,
        created_at: row.get(4)?,
        is_favorite: row.get(5)?,
    })
}

pub(crate) fn query_pages(conn: &Connection, query: PageQuery) -> Result<Vec<PageRecord>, StoreError> {
    let filter = match query {
        PageQuery::Favorites => " WHERE is_favorite = 1",
        PageQuery::Recents => "",
    };
    let sql = format!(
        "{}{} ORDER BY created_at DESC, rowid DESC",
        SELECT_COLUMNS, filter
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_record)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

fn find_favorite(conn: &Connection, url: &str) -> Result<Option<PageRecord>, StoreError> {
    let record = conn
        .query_row(
            &format!(
                "{} WHERE is_favorite = 1 AND url = ?1 ORDER BY created_at DESC, rowid DESC LIMIT 1",
                SELECT_COLUMNS
            ),
            params![url],
            row_to_record,
        )
        .optional()?;
    Ok(record)
}

fn insert_page(conn: &Connection, page: &NewPage, is_favorite: bool) -> Result<PageRecord, StoreError> {
    let record = PageRecord {
        id: Uuid::new_v4().to_string(),
        url: page.url.clone(),
        title: page.title.clone(),
        icon_data: page.icon_data.clone(),
        created_at: now_millis(),
        is_favorite,
    };
    conn.execute(
        "INSERT INTO pages (id, url, title, icon_data, created_at, is_favorite) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.id,
            record.url,
            record.title,
            record.icon_data,
            record.created_at,
            record.is_favorite
        ],
    )?;
    Ok(record)
}

/// Deletes matching favorites and returns their ids. Visit records never match.
fn remove_favorites(conn: &Connection, url_or_id: &str) -> Result<Vec<String>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT id FROM pages WHERE is_favorite = 1 AND (id = ?1 OR url = ?1)")?;
    let rows = stmt.query_map(params![url_or_id], |row| row.get::<_, String>(0))?;
    let mut ids = Vec::new();
    for row in rows {
        ids.push(row?);
    }

    for id in &ids {
        conn.execute("DELETE FROM pages WHERE id = ?1", params![id])?;
    }
    Ok(ids)
}
