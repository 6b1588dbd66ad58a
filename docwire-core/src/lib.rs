//! # docwire-core
//!
//! Core types for the docwire registration engine.
//!
//! This crate has minimal dependencies and is designed to be imported by hosts
//! that only need to accept registrations, without the parser or registry
//! implementation in `docwire-std`.
//!
//! # Contents
//!
//! - [`Declaration`] and [`HookKind`] - The typed result of reading one annotation
//! - [`Callback`] and [`Invocation`] - A bound `(instance, method)` and one call of it
//! - [`EventDispatch`], [`RouteRegistrar`], [`CommandRegistrar`] - The host boundary
//!
//! # Error Types
//!
//! - [`DocwireError`] - Top-level error type
//! - [`CallbackError`] - Callback invocation errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod callback;
mod declaration;
mod error;
mod host;

// Re-exports
pub use callback::{Callback, IntoReturn, Invocation};
pub use declaration::{ANNOTATED_PRIORITY, ArgCount, DEFAULT_PRIORITY, Declaration, HookKind};
pub use error::{BoxError, CallbackError, DocwireError};
pub use host::{CommandRegistrar, EventDispatch, Host, RouteRegistrar};
