//! Error types for docwire.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`DocwireError`] - Top-level error type for registry and declaration operations
//! - [`CallbackError`] - Errors raised when the host invokes a bound callback
//!
//! Parse misses and unsupported `@api-*` keys are deliberately absent: they are
//! skipped, not reported.

use crate::declaration::HookKind;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all docwire operations.
#[derive(Error, Debug)]
pub enum DocwireError {
    /// A component identity that already has a live instance was constructed again.
    #[error("component `{component}` is already instantiated")]
    DuplicateInstantiation {
        /// The component identity.
        component: &'static str,
    },

    /// The construction sequence of a component asked for its own instance.
    #[error("component `{component}` was requested while it was still being constructed")]
    ReentrantInstantiation {
        /// The component identity.
        component: &'static str,
    },

    /// An earlier construction sequence of this component identity panicked.
    ///
    /// Hooks registered before the panic stay bound to that instance, so the
    /// identity is never constructed again.
    #[error("component `{component}` failed during construction and cannot be instantiated")]
    FailedInstantiation {
        /// The component identity.
        component: &'static str,
    },

    /// A declaration name does not match the grammar of its kind.
    #[error("invalid {kind} name: {name:?}")]
    InvalidHookName {
        /// The declaration kind.
        kind: HookKind,
        /// The rejected name.
        name: String,
    },

    /// A bound callback failed.
    #[error("callback error: {0}")]
    Callback(#[from] CallbackError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors raised when a host invokes a bound callback.
#[derive(Error, Debug)]
pub enum CallbackError {
    /// A positional argument could not be decoded into the parameter type.
    #[error("argument {index} could not be decoded")]
    Argument {
        /// Zero-based position of the argument.
        index: usize,
        /// The decoding failure.
        #[source]
        source: serde_json::Error,
    },

    /// The method's return value could not be encoded.
    #[error("return value could not be encoded")]
    Return(#[source] serde_json::Error),

    /// The host that issued the call is gone.
    #[error("callback invoked after its host was dropped")]
    Detached,

    /// A custom callback error.
    #[error(transparent)]
    Custom(BoxError),
}

// Convenience conversions
impl From<BoxError> for DocwireError {
    fn from(err: BoxError) -> Self {
        DocwireError::Custom(err)
    }
}

impl From<BoxError> for CallbackError {
    fn from(err: BoxError) -> Self {
        CallbackError::Custom(err)
    }
}
