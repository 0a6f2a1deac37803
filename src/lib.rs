//! watchdiff - colorized diffs of Kubernetes watch events.
//!
//! Consumes the JSON lines printed by
//! `kubectl get -o json --output-watch-events --watch` and prints one line per
//! event, with a diff against the previous state for modifications.

pub mod canonical;
pub mod config;
pub mod diff;
pub mod display;
pub mod event;
pub mod store;
pub mod watch;
