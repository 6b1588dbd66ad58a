//! # Bound Callbacks
//!
//! A [`Callback`] is what the host stores when a declaration is registered: a
//! reference to one method of one live component instance. Hosts invoke it with
//! positional `serde_json::Value` arguments and receive a `Value` back (ignored
//! for actions, the transformed value for filters, rendered text for
//! shortcodes).
//!
//! [`Invocation`] is the view a component method gets of a call: the positional
//! arguments plus the host that issued it.

use crate::{error::CallbackError, host::Host};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{fmt, sync::Arc};

type CallbackFn = dyn Fn(&[Value]) -> Result<Value, CallbackError> + Send + Sync;

/// A cheaply clonable reference to `(instance, method)`.
#[derive(Clone)]
pub struct Callback {
    component: &'static str,
    method: &'static str,
    func: Arc<CallbackFn>,
}

impl Callback {
    /// Create a callback for `component::method`.
    pub fn new<F>(component: &'static str, method: &'static str, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, CallbackError> + Send + Sync + 'static,
    {
        Self {
            component,
            method,
            func: Arc::new(func),
        }
    }

    /// Invoke the callback.
    pub fn call(&self, args: &[Value]) -> Result<Value, CallbackError> {
        (self.func)(args)
    }

    /// The identity of the component the callback is bound to.
    pub fn component(&self) -> &'static str {
        self.component
    }

    /// The bound method name.
    pub fn method(&self) -> &'static str {
        self.method
    }

    /// Whether two callbacks share the same underlying closure.
    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("component", &self.component)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// One call of a bound method.
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    args: &'a [Value],
    host: &'a dyn Host,
}

impl<'a> Invocation<'a> {
    /// Create an invocation.
    pub fn new(args: &'a [Value], host: &'a dyn Host) -> Self {
        Self { args, host }
    }

    /// Raw positional arguments.
    pub fn args(&self) -> &'a [Value] {
        self.args
    }

    /// The host that issued the call.
    pub fn host(&self) -> &'a dyn Host {
        self.host
    }

    /// Decode the argument at `index`.
    ///
    /// Missing arguments decode from `null`, so `Option<T>` parameters accept a
    /// host that passes fewer values than the method declares.
    pub fn arg<T: DeserializeOwned>(&self, index: usize) -> Result<T, CallbackError> {
        let value = self.args.get(index).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|source| CallbackError::Argument { index, source })
    }
}

impl fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Conversion of a method's return value into the host's value currency.
pub trait IntoReturn {
    /// Encode the value.
    fn into_return(self) -> Result<Value, CallbackError>;
}

impl<T: Serialize> IntoReturn for T {
    fn into_return(self) -> Result<Value, CallbackError> {
        serde_json::to_value(self).map_err(CallbackError::Return)
    }
}
