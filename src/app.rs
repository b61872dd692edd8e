//! Application state and its transitions.
//!
//! One mutable [`App`] value holds everything the view projects: the login
//! flag, the loaded items, the open-item selection, the pagination cursor,
//! and the in-flight guards. Every transition is a plain method so the
//! whole state machine is unit-testable without a terminal or a server.
//! The UI layer only ever mutates state through these methods and then
//! redraws.

use crate::api::{ApiClient, ApiError, UnreadPage};
use crate::config::Config;
use crate::model::Item;
use crate::session::Session;

/// Rows kept above the open item when the viewport scrolls it into view.
const SCROLL_MARGIN: usize = 1;

/// Events sent back from spawned background tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// A page fetch finished. `generation` is the refresh generation the
    /// load was started under; results from a superseded generation are
    /// discarded (a refresh cancels in-flight loads).
    PageLoaded {
        generation: u64,
        result: Result<UnreadPage, ApiError>,
    },
    /// Login attempt finished; `Ok` carries the token to persist.
    LoginFinished(Result<String, ApiError>),
    /// Remote mark-as-read finished. Failures are logged, never retried.
    MarkedRead {
        ids: Vec<String>,
        result: Result<(), ApiError>,
    },
    /// Add-subscription call finished; a full refresh follows either way.
    SubscriptionAdded(Result<(), ApiError>),
    /// The settle delay after mark-all-read elapsed; refresh now.
    RefreshDue,
}

/// The three mutually-exclusive top-level regions. The add-subscription
/// dialog overlays independently of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Splash,
    LoggedOut,
    LoggedIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

/// Input state for the logged-out panel.
#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub field: LoginField,
}

impl LoginForm {
    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.field {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogField {
    #[default]
    Link,
    Title,
    Folder,
}

/// Input state for the add-subscription dialog. `Some` on the [`App`]
/// means the dialog is open, which also gates the list shortcuts.
#[derive(Debug, Default)]
pub struct SubscribeDialog {
    pub link: String,
    pub title: String,
    pub folder: String,
    pub field: DialogField,
}

impl SubscribeDialog {
    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.field {
            DialogField::Link => &mut self.link,
            DialogField::Title => &mut self.title,
            DialogField::Folder => &mut self.folder,
        }
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            DialogField::Link => DialogField::Title,
            DialogField::Title => DialogField::Folder,
            DialogField::Folder => DialogField::Link,
        };
    }

    pub fn prev_field(&mut self) {
        self.field = match self.field {
            DialogField::Link => DialogField::Folder,
            DialogField::Title => DialogField::Link,
            DialogField::Folder => DialogField::Title,
        };
    }
}

/// Process-wide application state, lifetime = one run of the client.
pub struct App {
    pub api: ApiClient,
    pub session: Session,

    /// Derived from token presence at startup, forced false on 403,
    /// forced true on successful login.
    pub login: bool,
    /// Loaded unread items, append-only between refreshes.
    pub items: Vec<Item>,
    /// Index of the currently open item. An index, not a reference, so a
    /// wholesale item replacement on refresh cannot dangle.
    pub open_item: Option<usize>,
    /// Whether the open item's body is shown. Meaningless without an open
    /// item.
    pub expand_item: bool,
    /// Pagination cursor. `None` = first page not fetched yet,
    /// `Some("")` = no more pages, otherwise the cursor to echo back.
    pub next_offset: Option<String>,
    /// Guard: at most one page load in flight.
    pub is_loading_next_page: bool,
    /// Bumped on every refresh; page results from an older generation are
    /// stale and get dropped.
    pub load_generation: u64,

    /// `Some` while the add-subscription dialog is open.
    pub subscribe_dialog: Option<SubscribeDialog>,
    pub login_form: LoginForm,
    /// `Some(text)` while the full-screen splash is shown.
    pub splash: Option<String>,

    /// First visible row of the item list.
    pub list_offset: usize,
    /// Rows the list viewport can show; written by the renderer each frame.
    pub viewport_rows: usize,
    pub near_bottom_rows: usize,

    pub needs_redraw: bool,
}

impl App {
    pub fn new(api: ApiClient, session: Session, config: &Config) -> Self {
        let login = session.is_logged_in();
        Self {
            api,
            session,
            login,
            items: Vec::new(),
            open_item: None,
            expand_item: false,
            next_offset: None,
            is_loading_next_page: false,
            load_generation: 0,
            subscribe_dialog: None,
            login_form: LoginForm::default(),
            splash: None,
            list_offset: 0,
            viewport_rows: 0,
            near_bottom_rows: config.near_bottom_rows,
            needs_redraw: true,
        }
    }

    pub fn region(&self) -> Region {
        if self.splash.is_some() {
            Region::Splash
        } else if self.login {
            Region::LoggedIn
        } else {
            Region::LoggedOut
        }
    }

    pub fn adding_subscription(&self) -> bool {
        self.subscribe_dialog.is_some()
    }

    /// Reset everything a refresh clears: items, cursor, selection, guards.
    /// Also bumps the load generation so an in-flight page load started
    /// before the refresh cannot append into the fresh state.
    pub fn clean_up(&mut self) {
        self.items.clear();
        self.open_item = None;
        self.expand_item = false;
        self.next_offset = None;
        self.is_loading_next_page = false;
        self.list_offset = 0;
        self.load_generation = self.load_generation.wrapping_add(1);
    }

    /// Claim the single page-load slot. Returns the generation to tag the
    /// load with, or `None` when a load is already in flight.
    pub fn take_load_slot(&mut self) -> Option<u64> {
        if self.is_loading_next_page {
            return None;
        }
        self.is_loading_next_page = true;
        Some(self.load_generation)
    }

    /// Append a fetched page and advance the cursor. An absent
    /// `nextPageOffset` collapses to the empty sentinel ("no more pages").
    pub fn finish_page(&mut self, page: UnreadPage) {
        self.items.extend(page.items);
        self.next_offset = Some(page.next_page_offset.unwrap_or_default());
        self.is_loading_next_page = false;
    }

    /// A page load failed: release the guard and degrade to "no items
    /// returned". The cursor is left untouched.
    pub fn fail_page(&mut self) {
        self.is_loading_next_page = false;
    }

    pub fn has_more_pages(&self) -> bool {
        self.next_offset.as_deref() != Some("")
    }

    /// Whether the list viewport is close enough to the end of the loaded
    /// items that the next page should be prefetched.
    pub fn near_bottom(&self) -> bool {
        !self.items.is_empty()
            && self.list_offset + self.viewport_rows + self.near_bottom_rows >= self.items.len()
    }

    /// Toggle selection of the item at `index`. Opening an item collapses
    /// the body and marks it read locally; the returned ids (already
    /// filtered to previously-unread items) still need the remote
    /// mark-as-read call. Selecting the open item closes it and returns
    /// nothing.
    pub fn select_item(&mut self, index: usize) -> Vec<String> {
        if index >= self.items.len() {
            tracing::error!(index, len = self.items.len(), "select_item: index out of bounds");
            return Vec::new();
        }
        self.expand_item = false;
        if self.open_item == Some(index) {
            self.open_item = None;
            return Vec::new();
        }
        self.open_item = Some(index);
        self.mark_read_local(index..=index)
    }

    /// Mark the given item positions read locally, skipping items that are
    /// already read. Returns the ids that actually changed, which are the
    /// ones to send to the server.
    pub fn mark_read_local(&mut self, range: impl IntoIterator<Item = usize>) -> Vec<String> {
        let mut ids = Vec::new();
        for index in range {
            if let Some(item) = self.items.get_mut(index) {
                if !item.is_read() {
                    item.mark_read_local();
                    ids.push(item.id.clone());
                }
            }
        }
        ids
    }

    pub fn mark_all_read_local(&mut self) -> Vec<String> {
        self.mark_read_local(0..self.items.len())
    }

    /// Mark everything from the top of the list through the open item.
    /// With no open item there is no prefix; that is a caller bug and gets
    /// logged loudly instead of silently marking the wrong range.
    pub fn mark_until_open_local(&mut self) -> Vec<String> {
        match self.open_item {
            Some(open) => self.mark_read_local(0..=open),
            None => {
                tracing::error!("mark_until_open_local called with no open item");
                Vec::new()
            }
        }
    }

    /// The inclusive prefix of `items` ending at `index`.
    pub fn items_until(&self, index: usize) -> &[Item] {
        match self.items.get(..=index) {
            Some(prefix) => prefix,
            None => {
                tracing::error!(index, len = self.items.len(), "items_until: index out of bounds");
                &[]
            }
        }
    }

    /// `e`: show the open item's body. No-op when nothing is open.
    pub fn expand_open(&mut self) {
        self.expand_item = self.open_item.is_some();
    }

    /// Target index for a `j`/`k` move. With nothing open, `j` lands on
    /// the first item and `k` is a no-op, matching a selection cursor that
    /// starts just above the list. Clamped to the list bounds.
    pub fn neighbor_index(&self, delta: i64) -> Option<usize> {
        let current = self.open_item.map(|i| i as i64).unwrap_or(-1);
        let target = current + delta;
        if target >= 0 && (target as usize) < self.items.len() {
            Some(target as usize)
        } else {
            None
        }
    }

    /// External link of the open item, if any.
    pub fn open_item_url(&self) -> Option<&str> {
        self.open_item
            .and_then(|index| self.items.get(index))
            .and_then(|item| item.external_url())
    }

    /// Keep the open item inside the list viewport, with a small margin
    /// above it (the terminal version of scroll-into-view-then-nudge-up).
    pub fn ensure_open_visible(&mut self) {
        let Some(index) = self.open_item else { return };
        let rows = self.viewport_rows.max(1);
        if index < self.list_offset + SCROLL_MARGIN {
            self.list_offset = index.saturating_sub(SCROLL_MARGIN);
        } else if index >= self.list_offset + rows {
            self.list_offset = index + 1 - rows;
        }
    }

    /// HTTP 403 on any authenticated call lands here: clear the token in
    /// the client and on disk, and force the logged-out state. The next
    /// frame renders the login panel.
    pub fn force_logout(&mut self) {
        tracing::info!("Session rejected by server, logging out");
        self.api.clear_token();
        if let Err(e) = self.session.clear() {
            tracing::warn!(error = %e, "Failed to clear stored session token");
        }
        self.login = false;
        self.splash = None;
    }

    /// Scroll the list viewport by `delta` rows, clamped to the list.
    pub fn scroll_list(&mut self, delta: i64) {
        let max_offset = self.items.len().saturating_sub(1) as i64;
        let next = (self.list_offset as i64 + delta).clamp(0, max_offset);
        self.list_offset = next as usize;
    }
}
