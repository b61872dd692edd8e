//! Task spawners bridging the state machine to the API client.
//!
//! Each helper mutates state synchronously first (guards, local marking,
//! splash), then spawns the network call; results come back as
//! [`AppEvent`]s on the channel. Nothing here blocks the UI task.

use crate::app::{App, AppEvent};
use crate::util::validate_browser_url;
use std::time::Duration;
use tokio::sync::mpsc;

/// Pause between marking everything read and the follow-up refresh, giving
/// the remote write time to settle before the unread list is re-queried.
const MARK_ALL_SETTLE: Duration = Duration::from_millis(100);

/// Claim the load slot and fetch one page of unread items.
///
/// Returns false without issuing a request when a load is already in
/// flight — the single mutual-exclusion mechanism in the client.
pub(super) fn start_page_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) -> bool {
    let Some(generation) = app.take_load_slot() else {
        return false;
    };
    // An empty cursor is the "no more pages" sentinel, never echoed back.
    let offset = app.next_offset.clone().filter(|s| !s.is_empty());
    let api = app.api.clone();
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let result = api.load_unread(offset.as_deref()).await;
        if tx
            .send(AppEvent::PageLoaded { generation, result })
            .await
            .is_err()
        {
            tracing::warn!("Failed to deliver page result (receiver dropped)");
        }
    });
    true
}

/// Fetch the next page if more pages exist and the viewport sits near the
/// end of the loaded items. No-op (false) otherwise.
pub(super) fn maybe_load_more(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) -> bool {
    if app.has_more_pages() && app.near_bottom() {
        start_page_load(app, event_tx)
    } else {
        false
    }
}

/// Full refresh: reset state (cancelling any in-flight load via the
/// generation bump), show the splash, and fetch the first page.
pub(super) fn begin_refresh(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    app.clean_up();
    app.splash = Some("Loading...".to_string());
    start_page_load(app, event_tx);
}

/// Submit the login form.
pub(super) fn spawn_login(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let email = app.login_form.email.trim().to_string();
    let password = app.login_form.password.clone();
    if email.is_empty() {
        return;
    }
    app.splash = Some("Logging in...".to_string());
    let api = app.api.clone();
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let result = api.login(&email, &password).await;
        let _ = tx.send(AppEvent::LoginFinished(result)).await;
    });
}

/// Push an already-applied local mark to the server. Fire and forget: the
/// caller does not wait, and failures are only logged.
pub(super) fn spawn_remote_mark(app: &App, ids: Vec<String>, event_tx: &mpsc::Sender<AppEvent>) {
    if ids.is_empty() {
        return;
    }
    let api = app.api.clone();
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let result = api.mark_as_read(&ids).await;
        let _ = tx.send(AppEvent::MarkedRead { ids, result }).await;
    });
}

/// Mark every loaded item read on both sides, then refresh after the
/// settle delay.
pub(super) fn mark_all_read(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let ids = app.mark_all_read_local();
    app.splash = Some("Loading...".to_string());
    let api = app.api.clone();
    let tx = event_tx.clone();
    tokio::spawn(async move {
        if !ids.is_empty() {
            let result = api.mark_as_read(&ids).await;
            let _ = tx.send(AppEvent::MarkedRead { ids, result }).await;
        }
        tokio::time::sleep(MARK_ALL_SETTLE).await;
        let _ = tx.send(AppEvent::RefreshDue).await;
    });
}

/// Confirm the add-subscription dialog: close it, show the splash, and
/// send the subscription to the server. A refresh follows via the
/// completion event.
pub(super) fn confirm_subscription(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(dialog) = app.subscribe_dialog.take() else {
        return;
    };
    let link = dialog.link.trim().to_string();
    if link.is_empty() {
        return;
    }
    let title = Some(dialog.title.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let folder = Some(dialog.folder.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    app.splash = Some("Adding Subscription...".to_string());
    let api = app.api.clone();
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let result = api
            .add_subscription(&link, title.as_deref(), folder.as_deref())
            .await;
        let _ = tx.send(AppEvent::SubscriptionAdded(result)).await;
    });
}

/// `v`: open the current item's external link in the system browser.
/// No-op when nothing is open or the link does not validate.
pub(super) fn open_in_browser(app: &App) {
    let Some(raw) = app.open_item_url() else {
        return;
    };
    match validate_browser_url(raw) {
        Some(url) => {
            if let Err(e) = open::that(url.as_str()) {
                tracing::warn!(url = %url, error = %e, "Failed to open browser");
            }
        }
        None => {
            tracing::warn!(url = %raw, "Refusing to open non-http(s) item link");
        }
    }
}
