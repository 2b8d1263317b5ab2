//! One-way notification sink.
//!
//! The session layer reports outcomes here and never reads anything back.
//! Rendering (toasts, terminal output, ...) is up to the implementation.

/// Fire-and-forget user-facing messages.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);

    fn error(&self, message: &str);

    fn loading(&self, message: &str);

    /// Wrong-network and similar nudges. Rendered as errors unless overridden.
    fn warning(&self, message: &str) {
        self.error(message);
    }
}

/// Sends every notification to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "wallet_session::notify", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "wallet_session::notify", "{}", message);
    }

    fn loading(&self, message: &str) {
        tracing::info!(target: "wallet_session::notify", pending = true, "{}", message);
    }

    fn warning(&self, message: &str) {
        tracing::warn!(target: "wallet_session::notify", "{}", message);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn success(&self, _message: &str) {}

    fn error(&self, _message: &str) {}

    fn loading(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect(Mutex<Vec<String>>);

    impl Notifier for Collect {
        fn success(&self, m: &str) {
            self.0.lock().unwrap().push(format!("success:{m}"));
        }
        fn error(&self, m: &str) {
            self.0.lock().unwrap().push(format!("error:{m}"));
        }
        fn loading(&self, m: &str) {
            self.0.lock().unwrap().push(format!("loading:{m}"));
        }
    }

    #[test]
    fn test_warning_defaults_to_error() {
        let sink = Collect::default();
        sink.warning("wrong network");
        assert_eq!(*sink.0.lock().unwrap(), vec!["error:wrong network"]);
    }
}
