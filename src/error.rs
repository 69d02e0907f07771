//! Error types.
//!
//! Construction-time and mount-time violations are programmer errors and are
//! returned to the caller immediately. Errors raised by store listeners are
//! propagated out of `dispatch` untouched.

use thiserror::Error;

use crate::types::Handle;

/// Errors produced by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The store was read before one was configured, or with the wrong state type.
    #[error("configuration error: {reason}")]
    Configuration {
        /// What was missing or mismatched
        reason: String,
    },

    /// A component id was missing, empty, or duplicated within one child list.
    #[error("identity error: {reason}")]
    Identity {
        /// Why the id was rejected
        reason: String,
    },

    /// `mount` was called on a component that already left the Unmounted state.
    #[error("component {id:?} already mounted")]
    DoubleMount {
        /// Id of the offending component
        id: String,
    },

    /// A registry lookup found no live handle for the id.
    #[error("no widget registered for id={id:?}")]
    Lookup {
        /// The id that was looked up
        id: String,
    },

    /// A build result, hook slot or menu description had the wrong shape.
    #[error("validation error: {reason}")]
    Validation {
        /// What was malformed
        reason: String,
    },

    /// The host toolkit refused an operation.
    #[error("toolkit error on {handle:?}: {reason}")]
    Toolkit {
        /// Handle the operation targeted, if any
        handle: Option<Handle>,
        /// Reason reported by the toolkit
        reason: String,
    },
}

impl Error {
    pub(crate) fn identity(reason: impl Into<String>) -> Self {
        Self::Identity { reason: reason.into() }
    }

    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Self::Validation { reason: reason.into() }
    }

    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration { reason: reason.into() }
    }
}

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
