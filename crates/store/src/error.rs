//! Dispatch pipeline errors.

use thiserror::Error;

/// Error returned by an event handler.
///
/// Handlers are expected to absorb side-effect failures into aggregate state
/// (a notification marked Failed, for example). Returning this aborts the
/// remaining dispatch for the current commit.
#[derive(Debug, Clone, Error)]
#[error("handler '{handler}' failed on {event_type}: {message}")]
pub struct DispatchError {
    /// Name of the handler that failed.
    pub handler: &'static str,

    /// Type name of the event being dispatched.
    pub event_type: &'static str,

    /// Human-readable failure description.
    pub message: String,
}

impl DispatchError {
    pub fn new(handler: &'static str, event_type: &'static str, message: impl Into<String>) -> Self {
        Self {
            handler,
            event_type,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_handler_and_event() {
        let err = DispatchError::new("order-payment", "PaymentSucceeded", "order missing");
        let text = err.to_string();
        assert!(text.contains("order-payment"));
        assert!(text.contains("PaymentSucceeded"));
    }
}
