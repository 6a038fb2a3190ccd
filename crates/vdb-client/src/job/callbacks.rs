//! Per-job success/error handlers.

use crate::error::VdbError;

pub(crate) type SuccessFn<T> = Box<dyn FnOnce(T) + Send>;
pub(crate) type ErrorFn = Box<dyn FnOnce(VdbError) + Send>;

/// At most one handler of each kind; registering again replaces the old one.
pub(crate) struct Callbacks<T> {
    on_success: Option<SuccessFn<T>>,
    on_error: Option<ErrorFn>,
}

impl<T> Default for Callbacks<T> {
    fn default() -> Self {
        Self {
            on_success: None,
            on_error: None,
        }
    }
}

impl<T> Callbacks<T> {
    pub(crate) fn set_success(&mut self, f: SuccessFn<T>) {
        self.on_success = Some(f);
    }

    pub(crate) fn set_error(&mut self, f: ErrorFn) {
        self.on_error = Some(f);
    }

    /// Take the success handler; the error handler can no longer fire.
    pub(crate) fn take_success(&mut self) -> Option<SuccessFn<T>> {
        self.on_error = None;
        self.on_success.take()
    }

    /// Take the error handler; the success handler can no longer fire.
    pub(crate) fn take_error(&mut self) -> Option<ErrorFn> {
        self.on_success = None;
        self.on_error.take()
    }

    pub(crate) fn clear(&mut self) {
        self.on_success = None;
        self.on_error = None;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.on_success.is_none() && self.on_error.is_none()
    }
}
