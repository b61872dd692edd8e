//! Background task event handling.
//!
//! Every API call reports back here. A 403 on any of them routes through
//! `App::force_logout`, the single cross-cutting error behavior in the
//! client.

use crate::api::ApiError;
use crate::app::{App, AppEvent};
use tokio::sync::mpsc;

use super::helpers::begin_refresh;

pub(super) fn handle_app_event(app: &mut App, event: AppEvent, event_tx: &mpsc::Sender<AppEvent>) {
    match event {
        AppEvent::PageLoaded { generation, result } => {
            if generation != app.load_generation {
                // A refresh superseded this load; its items belong to a
                // state that no longer exists.
                tracing::debug!(
                    generation,
                    current = app.load_generation,
                    "Dropping stale page load"
                );
                return;
            }
            app.splash = None;
            match result {
                Ok(page) => {
                    tracing::debug!(
                        items = page.items.len(),
                        next = page.next_page_offset.as_deref().unwrap_or(""),
                        "Unread page loaded"
                    );
                    app.finish_page(page);
                }
                Err(ApiError::AuthExpired) => {
                    app.fail_page();
                    app.force_logout();
                }
                Err(e) => {
                    // Degrade to "no items returned": log, release the
                    // guard, leave the cursor alone.
                    tracing::warn!(error = %e, "Failed to load unread items");
                    app.fail_page();
                }
            }
        }

        AppEvent::LoginFinished(result) => match result {
            Ok(token) => {
                if let Err(e) = app.session.store(&token) {
                    tracing::warn!(error = %e, "Failed to persist session token");
                }
                app.login = true;
                app.login_form.password.clear();
                begin_refresh(app, event_tx);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                app.splash = None;
            }
        },

        AppEvent::MarkedRead { ids, result } => match result {
            Ok(()) => {
                tracing::debug!(count = ids.len(), "Marked items read remotely");
            }
            Err(ApiError::AuthExpired) => app.force_logout(),
            Err(e) => {
                // Never retried, never surfaced; the local mark stands.
                tracing::warn!(error = %e, ids = ?ids, "Failed to mark items read remotely");
            }
        },

        AppEvent::SubscriptionAdded(result) => match result {
            Ok(()) => begin_refresh(app, event_tx),
            Err(ApiError::AuthExpired) => app.force_logout(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to add subscription");
                begin_refresh(app, event_tx);
            }
        },

        AppEvent::RefreshDue => {
            if app.login {
                begin_refresh(app, event_tx);
            } else {
                app.splash = None;
            }
        }
    }
}
