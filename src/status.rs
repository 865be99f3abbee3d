// src/status.rs - Process-wide status overlay state

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Error,
    Loading,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusState {
    pub is_open: bool,
    pub kind: StatusKind,
    pub title: String,
    pub message: String,
}

impl Default for StatusState {
    fn default() -> Self {
        Self {
            is_open: false,
            kind: StatusKind::Loading,
            title: String::new(),
            message: String::new(),
        }
    }
}

/// Shared status channel reporting async-operation outcomes to the UI.
///
/// One instance serves the whole process; clones share state. A `Loading`
/// status cannot be dismissed from the outside (outside-click or
/// acknowledgement button) so an in-flight operation's indicator cannot
/// be lost; only a subsequent `show_status`/`hide_status` replaces it.
#[derive(Debug, Clone, Default)]
pub struct StatusChannel {
    state: Arc<RwLock<StatusState>>,
}

impl StatusChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the overlay, replacing any prior content
    pub fn show_status(
        &self,
        kind: StatusKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) {
        *self.state.write() = StatusState {
            is_open: true,
            kind,
            title: title.into(),
            message: message.into(),
        };
    }

    /// Closes the overlay unconditionally
    pub fn hide_status(&self) {
        self.state.write().is_open = false;
    }

    /// Outside-click or acknowledgement-button dismissal.
    ///
    /// Returns whether the overlay was closed; a `Loading` status ignores
    /// the request.
    pub fn dismiss(&self) -> bool {
        let mut state = self.state.write();
        if state.is_open && state.kind != StatusKind::Loading {
            state.is_open = false;
            true
        } else {
            false
        }
    }

    pub fn snapshot(&self) -> StatusState {
        self.state.read().clone()
    }

    pub fn is_open(&self) -> bool {
        self.state.read().is_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_replaces_prior_content() {
        let status = StatusChannel::new();
        status.show_status(StatusKind::Loading, "Working", "Please wait");
        status.show_status(StatusKind::Error, "Order Failed", "Try again");

        let state = status.snapshot();
        assert!(state.is_open);
        assert_eq!(state.kind, StatusKind::Error);
        assert_eq!(state.title, "Order Failed");
    }

    #[test]
    fn test_loading_is_not_outside_dismissible() {
        let status = StatusChannel::new();
        status.show_status(StatusKind::Loading, "Working", "Please wait");

        assert!(!status.dismiss());
        assert!(status.is_open());

        // A follow-up show or an explicit hide still replaces it.
        status.show_status(StatusKind::Success, "Done", "All good");
        assert!(status.dismiss());
        assert!(!status.is_open());
    }

    #[test]
    fn test_error_and_success_are_dismissible() {
        let status = StatusChannel::new();
        status.show_status(StatusKind::Error, "Oops", "Something broke");
        assert!(status.dismiss());

        status.show_status(StatusKind::Success, "Great", "It worked");
        assert!(status.dismiss());
    }

    #[test]
    fn test_hide_works_while_loading() {
        let status = StatusChannel::new();
        status.show_status(StatusKind::Loading, "Working", "Please wait");
        status.hide_status();
        assert!(!status.is_open());
    }

    #[test]
    fn test_dismiss_when_closed_is_noop() {
        let status = StatusChannel::new();
        assert!(!status.dismiss());
    }
}
