//! Keyboard dispatch.
//!
//! The add-subscription dialog captures all keys while open, and the login
//! form captures them while logged out — which together implement the
//! "shortcuts disabled while logged out or while the dialog is open" rule.

use crate::app::{App, AppEvent, Region, SubscribeDialog};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{
    begin_refresh, confirm_subscription, mark_all_read, maybe_load_more, open_in_browser,
    spawn_login, spawn_remote_mark,
};
use super::Action;

pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Ctrl+C always quits, whatever is focused.
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    // The dialog captures all keys while visible.
    if app.adding_subscription() {
        handle_dialog_input(app, code, event_tx);
        return Action::Continue;
    }

    match app.region() {
        // Blocking operation in progress; keys wait for the next frame.
        Region::Splash => Action::Continue,
        Region::LoggedOut => handle_login_input(app, code, event_tx),
        Region::LoggedIn => handle_list_input(app, code, event_tx),
    }
}

/// Input while the add-subscription dialog is open.
fn handle_dialog_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    match code {
        KeyCode::Esc => {
            app.subscribe_dialog = None;
        }
        KeyCode::Enter => confirm_subscription(app, event_tx),
        KeyCode::Tab | KeyCode::Down => {
            if let Some(dialog) = app.subscribe_dialog.as_mut() {
                dialog.next_field();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(dialog) = app.subscribe_dialog.as_mut() {
                dialog.prev_field();
            }
        }
        KeyCode::Backspace => {
            if let Some(dialog) = app.subscribe_dialog.as_mut() {
                dialog.focused_value_mut().pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(dialog) = app.subscribe_dialog.as_mut() {
                dialog.focused_value_mut().push(c);
            }
        }
        _ => {}
    }
}

/// Input for the logged-out panel's login form.
fn handle_login_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    match code {
        KeyCode::Esc => return Action::Quit,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.login_form.toggle_field();
        }
        KeyCode::Enter => spawn_login(app, event_tx),
        KeyCode::Backspace => {
            app.login_form.focused_value_mut().pop();
        }
        KeyCode::Char(c) => {
            app.login_form.focused_value_mut().push(c);
        }
        _ => {}
    }
    Action::Continue
}

/// Shortcuts for the logged-in item list.
fn handle_list_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,

        // Open the current item's link externally; no-op with nothing open.
        KeyCode::Char('v') => open_in_browser(app),

        KeyCode::Char('r') => begin_refresh(app, event_tx),

        KeyCode::Char('e') => app.expand_open(),

        // Mark everything from the top through the open item.
        KeyCode::Char('z') => {
            if app.open_item.is_some() {
                let ids = app.mark_until_open_local();
                spawn_remote_mark(app, ids, event_tx);
            }
        }

        KeyCode::Char('j') | KeyCode::Down => move_selection(app, 1, event_tx),
        KeyCode::Char('k') | KeyCode::Up => move_selection(app, -1, event_tx),

        KeyCode::Char('a') => {
            app.subscribe_dialog = Some(SubscribeDialog::default());
        }

        KeyCode::Char('A') => mark_all_read(app, event_tx),

        KeyCode::PageDown => {
            app.scroll_list(app.viewport_rows as i64);
            maybe_load_more(app, event_tx);
        }
        KeyCode::PageUp => {
            app.scroll_list(-(app.viewport_rows as i64));
        }

        _ => {}
    }
    Action::Continue
}

/// `j`/`k`: select the neighboring item (clamped to the list), mark it
/// read on both sides, keep it visible, and prefetch when this lands the
/// viewport near the end of the loaded items.
fn move_selection(app: &mut App, delta: i64, event_tx: &mpsc::Sender<AppEvent>) {
    if let Some(index) = app.neighbor_index(delta) {
        let ids = app.select_item(index);
        spawn_remote_mark(app, ids, event_tx);
        app.ensure_open_visible();
        maybe_load_more(app, event_tx);
    }
}
