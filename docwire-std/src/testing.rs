//! Testing utilities for docwire.
//!
//! This module provides a host double so components can be wired and
//! exercised without a real host application.
//!
//! # Features
//!
//! - [`RecordingHost`]: records every registration, in order
//! - [`RecordingHost::do_action`] / [`RecordingHost::apply_filters`]: invoke
//!   recorded callbacks the way a dispatch system would, by ascending priority
//!
//! # Example
//!
//! ```rust,ignore
//! let host = Arc::new(RecordingHost::new());
//! let registry = Registry::new(host.clone());
//! registry.instance::<MyComponent>(())?;
//!
//! assert_eq!(host.actions("init").len(), 1);
//! host.do_action("init", &[])?;
//! ```

use docwire_core::{
    ArgCount, Callback, CallbackError, CommandRegistrar, EventDispatch, RouteRegistrar,
};
use parking_lot::Mutex;
use serde_json::Value;

/// One recorded host registration.
#[derive(Debug, Clone)]
pub enum Registration {
    /// `register_action`.
    Action(Binding),
    /// `register_filter`.
    Filter(Binding),
    /// `register_shortcode`.
    Shortcode {
        /// Shortcode name.
        name: String,
        /// Bound callback.
        callback: Callback,
    },
    /// `register_route`.
    Route(RouteBinding),
    /// `register_command`.
    Command {
        /// Command name.
        name: String,
        /// Bound callback.
        callback: Callback,
    },
}

/// A recorded action or filter registration.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Hook name.
    pub name: String,
    /// Bound callback.
    pub callback: Callback,
    /// Priority.
    pub priority: i32,
    /// Argument count.
    pub arg_count: ArgCount,
}

/// A recorded route registration.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteBinding {
    /// Full route prefix.
    pub prefix: String,
    /// Route base path.
    pub base_path: String,
    /// Method configuration, as handed over.
    pub method_config: Value,
}

/// A host that records registrations.
#[derive(Debug, Default)]
pub struct RecordingHost {
    log: Mutex<Vec<Registration>>,
}

impl RecordingHost {
    /// Create an empty recording host.
    pub fn new() -> Self {
        Self {
            log: Mutex::new(Vec::new()),
        }
    }

    /// Every registration, in the order received.
    pub fn registrations(&self) -> Vec<Registration> {
        self.log.lock().clone()
    }

    /// Number of registrations received.
    pub fn count(&self) -> usize {
        self.log.lock().len()
    }

    /// Forget all registrations.
    pub fn clear(&self) {
        self.log.lock().clear();
    }

    /// Actions registered under `name`, in registration order.
    pub fn actions(&self, name: &str) -> Vec<Binding> {
        self.bindings(name, |r| match r {
            Registration::Action(b) => Some(b),
            _ => None,
        })
    }

    /// Filters registered under `name`, in registration order.
    pub fn filters(&self, name: &str) -> Vec<Binding> {
        self.bindings(name, |r| match r {
            Registration::Filter(b) => Some(b),
            _ => None,
        })
    }

    /// Registered shortcodes as `(name, callback)`.
    pub fn shortcodes(&self) -> Vec<(String, Callback)> {
        self.log
            .lock()
            .iter()
            .filter_map(|r| match r {
                Registration::Shortcode { name, callback } => Some((name.clone(), callback.clone())),
                _ => None,
            })
            .collect()
    }

    /// Registered commands as `(name, callback)`.
    pub fn commands(&self) -> Vec<(String, Callback)> {
        self.log
            .lock()
            .iter()
            .filter_map(|r| match r {
                Registration::Command { name, callback } => Some((name.clone(), callback.clone())),
                _ => None,
            })
            .collect()
    }

    /// Registered routes.
    pub fn routes(&self) -> Vec<RouteBinding> {
        self.log
            .lock()
            .iter()
            .filter_map(|r| match r {
                Registration::Route(route) => Some(route.clone()),
                _ => None,
            })
            .collect()
    }

    /// Run every action registered under `name`, returning how many ran.
    ///
    /// Each callback receives at most its argument count of `args`.
    /// Callbacks may register further hooks while running.
    pub fn do_action(&self, name: &str, args: &[Value]) -> Result<usize, CallbackError> {
        let bindings = Self::ordered(self.actions(name));
        for binding in &bindings {
            binding.callback.call(truncate(args, binding.arg_count))?;
        }
        Ok(bindings.len())
    }

    /// Pass `value` through every filter registered under `name`.
    ///
    /// The current value is always the first argument; `extra` follows it.
    pub fn apply_filters(
        &self,
        name: &str,
        value: Value,
        extra: &[Value],
    ) -> Result<Value, CallbackError> {
        let mut value = value;
        for binding in Self::ordered(self.filters(name)) {
            let mut args = Vec::with_capacity(extra.len() + 1);
            args.push(value);
            args.extend_from_slice(extra);
            value = binding.callback.call(truncate(&args, binding.arg_count))?;
        }
        Ok(value)
    }

    fn bindings(&self, name: &str, pick: impl Fn(&Registration) -> Option<&Binding>) -> Vec<Binding> {
        self.log
            .lock()
            .iter()
            .filter_map(|r| pick(r))
            .filter(|b| b.name == name)
            .cloned()
            .collect()
    }

    fn ordered(mut bindings: Vec<Binding>) -> Vec<Binding> {
        // Stable: equal priorities keep registration order.
        bindings.sort_by_key(|b| b.priority);
        bindings
    }
}

fn truncate(args: &[Value], arg_count: ArgCount) -> &[Value] {
    &args[..args.len().min(arg_count.as_usize())]
}

impl EventDispatch for RecordingHost {
    fn register_action(&self, name: &str, callback: Callback, priority: i32, arg_count: ArgCount) {
        self.log.lock().push(Registration::Action(Binding {
            name: name.to_owned(),
            callback,
            priority,
            arg_count,
        }));
    }

    fn register_filter(&self, name: &str, callback: Callback, priority: i32, arg_count: ArgCount) {
        self.log.lock().push(Registration::Filter(Binding {
            name: name.to_owned(),
            callback,
            priority,
            arg_count,
        }));
    }

    fn register_shortcode(&self, name: &str, callback: Callback) {
        self.log.lock().push(Registration::Shortcode {
            name: name.to_owned(),
            callback,
        });
    }
}

impl RouteRegistrar for RecordingHost {
    fn register_route(&self, prefix: &str, base_path: &str, method_config: &Value) {
        self.log.lock().push(Registration::Route(RouteBinding {
            prefix: prefix.to_owned(),
            base_path: base_path.to_owned(),
            method_config: method_config.clone(),
        }));
    }
}

impl CommandRegistrar for RecordingHost {
    fn register_command(&self, name: &str, callback: Callback) {
        self.log.lock().push(Registration::Command {
            name: name.to_owned(),
            callback,
        });
    }
}
