//! Terminal client for GReader-compatible feed aggregation servers.
//!
//! The client authenticates against the remote API, pages through unread
//! items, renders them in a scrollable terminal list, marks items read
//! locally and remotely, and can add new subscriptions. The server owns
//! all aggregation; this crate is session handling, a thin API client, an
//! application state machine, and a ratatui view over it.

pub mod api;
pub mod app;
pub mod config;
pub mod model;
pub mod session;
pub mod ui;
pub mod util;
