#![forbid(unsafe_code)]

//! Host input subsystem seam.
//!
//! Some remote keys (media transport, digits) are only delivered after the
//! application asks the host for them by name. [`HostInput`] is that request;
//! the dispatch layer calls it at most once per name.

/// Host refused to deliver a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostKeyError {
    pub name: String,
    pub reason: String,
}

impl HostKeyError {
    #[must_use]
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for HostKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "host refused key '{}': {}", self.name, self.reason)
    }
}

impl std::error::Error for HostKeyError {}

/// Registration side of the host input subsystem.
pub trait HostInput {
    /// Ask the host to start delivering the key called `name`.
    fn register_key(&mut self, name: &str) -> Result<(), HostKeyError>;
}

/// Host that delivers every key without registration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl HostInput for NullHost {
    fn register_key(&mut self, name: &str) -> Result<(), HostKeyError> {
        tracing::trace!(name, "null host: key registration accepted");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing {
    //! Recording host for tests.

    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{HostInput, HostKeyError};

    /// Host that records every registration and can refuse chosen names.
    ///
    /// Clones share the same log, so a test can keep one clone and hand the
    /// other to the dispatch layer.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingHost {
        registered: Rc<RefCell<Vec<String>>>,
        refused: Rc<RefCell<Vec<String>>>,
    }

    impl RecordingHost {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Refuse future registrations of `name`.
        pub fn refuse(&self, name: impl Into<String>) {
            self.refused.borrow_mut().push(name.into());
        }

        /// Names registered so far, in call order.
        #[must_use]
        pub fn registered(&self) -> Vec<String> {
            self.registered.borrow().clone()
        }
    }

    impl HostInput for RecordingHost {
        fn register_key(&mut self, name: &str) -> Result<(), HostKeyError> {
            if self.refused.borrow().iter().any(|n| n == name) {
                return Err(HostKeyError::new(name, "refused by test host"));
            }
            self.registered.borrow_mut().push(name.to_string());
            Ok(())
        }
    }
}
