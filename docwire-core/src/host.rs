//! # Host Boundary
//!
//! The registration entry points docwire calls on the host application. How
//! the host orders, invokes, or routes what it receives is its own business;
//! docwire only relies on these signatures and ignores their results.

use crate::{callback::Callback, declaration::ArgCount};
use serde_json::Value;

/// Event dispatch registration (actions, filters, shortcodes).
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot accept hook registrations",
    label = "missing `EventDispatch` implementation",
    note = "Implement `register_action`, `register_filter` and `register_shortcode`."
)]
pub trait EventDispatch: Send + Sync {
    /// Register `callback` on action `name`.
    fn register_action(&self, name: &str, callback: Callback, priority: i32, arg_count: ArgCount);

    /// Register `callback` on filter `name`.
    fn register_filter(&self, name: &str, callback: Callback, priority: i32, arg_count: ArgCount);

    /// Register `callback` as shortcode `name`.
    fn register_shortcode(&self, name: &str, callback: Callback);
}

/// Request-routing registration.
pub trait RouteRegistrar: Send + Sync {
    /// Register `base_path` under `prefix`. `method_config` is passed through untouched.
    fn register_route(&self, prefix: &str, base_path: &str, method_config: &Value);
}

/// Command-line registration.
pub trait CommandRegistrar: Send + Sync {
    /// Register `callback` as command `name`.
    fn register_command(&self, name: &str, callback: Callback);
}

/// Everything docwire needs from a host.
///
/// Implemented automatically for any type implementing the three registration
/// traits.
pub trait Host: EventDispatch + RouteRegistrar + CommandRegistrar {}

impl<T> Host for T where T: EventDispatch + RouteRegistrar + CommandRegistrar {}
