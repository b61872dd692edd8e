//! Terminal user interface.
//!
//! - `loop_runner` - main event loop and terminal management
//! - `input` - keyboard dispatch
//! - `events` - background task event processing
//! - `helpers` - task spawners for API calls
//! - `render` - top-level region dispatch and overlays
//! - `items` - unread item list and expanded body pane
//! - `login` - logged-out panel

mod events;
mod helpers;
mod input;
mod items;
mod login;
mod loop_runner;
mod render;

pub use loop_runner::{run, Action};
