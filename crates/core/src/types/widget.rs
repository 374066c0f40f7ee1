//! Open/closed state of the cart widget.
//!
//! The widget has two overlays: the cart panel and the full-screen waiter
//! view. The waiter view sits on top of the panel, so closing it returns
//! the guest to whatever panel state they came from.

use serde::{Deserialize, Serialize};

/// Which parts of the cart widget are open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetState {
    #[serde(default)]
    pub panel_open: bool,
    #[serde(default)]
    pub waiter_open: bool,
}

impl WidgetState {
    /// Open the panel if closed, close it if open.
    pub const fn toggle_panel(&mut self) {
        self.panel_open = !self.panel_open;
    }

    pub const fn close_panel(&mut self) {
        self.panel_open = false;
    }

    /// Show the waiter view. There is nothing to show for an empty cart, so
    /// this does nothing and returns `false` in that case.
    pub const fn open_waiter(&mut self, cart_is_empty: bool) -> bool {
        if cart_is_empty {
            return false;
        }
        self.waiter_open = true;
        true
    }

    pub const fn close_waiter(&mut self) {
        self.waiter_open = false;
    }

    /// Whether page scrolling should be locked behind an overlay.
    #[must_use]
    pub const fn scroll_locked(&self) -> bool {
        self.panel_open || self.waiter_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_closed() {
        let state = WidgetState::default();
        assert!(!state.panel_open);
        assert!(!state.waiter_open);
        assert!(!state.scroll_locked());
    }

    #[test]
    fn test_toggle_panel() {
        let mut state = WidgetState::default();
        state.toggle_panel();
        assert!(state.panel_open);
        assert!(state.scroll_locked());
        state.toggle_panel();
        assert!(!state.panel_open);
    }

    #[test]
    fn test_waiter_needs_items() {
        let mut state = WidgetState::default();
        assert!(!state.open_waiter(true));
        assert!(!state.waiter_open);
        assert!(state.open_waiter(false));
        assert!(state.waiter_open);
    }

    #[test]
    fn test_closing_waiter_restores_panel_lock() {
        let mut state = WidgetState::default();
        state.toggle_panel();
        state.open_waiter(false);
        state.close_waiter();
        assert!(state.panel_open);
        assert!(state.scroll_locked());

        let mut state = WidgetState::default();
        state.open_waiter(false);
        state.close_waiter();
        assert!(!state.scroll_locked());
    }
}
