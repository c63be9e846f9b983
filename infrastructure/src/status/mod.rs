//! File-backed task status
//!
//! Provides [`JsonTaskStatusStore`], which implements the
//! [`TaskStatusStore`](shokunin_application::TaskStatusStore) port.

mod json_store;

pub use json_store::{DEFAULT_STATUS_PATH, JsonTaskStatusStore};
