//! Stateless success notification. Visibility and timing belong to the caller.

use std::fmt;

pub const POPUP_TITLE: &str = "Success!";
pub const CLOSE_LABEL: &str = "Close";

pub struct PopupProps<'a, F: FnOnce()> {
    pub is_open: bool,
    pub message: &'a str,
    pub on_close: F,
}

/// What an open popup shows: title, message and a close control.
pub struct PopupView<'a, F: FnOnce()> {
    pub title: &'static str,
    pub message: &'a str,
    on_close: F,
}

/// Nothing when closed, otherwise the view.
pub fn popup<F: FnOnce()>(props: PopupProps<'_, F>) -> Option<PopupView<'_, F>> {
    if !props.is_open {
        return None;
    }

    Some(PopupView {
        title: POPUP_TITLE,
        message: props.message,
        on_close: props.on_close,
    })
}

impl<F: FnOnce()> PopupView<'_, F> {
    pub fn close_label(&self) -> &'static str {
        CLOSE_LABEL
    }

    /// The close control
    pub fn close(self) {
        (self.on_close)()
    }
}

impl<F: FnOnce()> fmt::Display for PopupView<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.title, self.message)
    }
}

impl<F: FnOnce()> fmt::Debug for PopupView<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupView")
            .field("title", &self.title)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}
