//! # Hook Registration Engine
//!
//! Turns declarations into host registrations.
//!
//! The engine is a pass-through: it owns no state beyond a reference to the
//! host and the [`Settings`]. What it centralizes is policy that component
//! authors would otherwise repeat:
//!
//! - **Defaults**: actions and filters registered without a priority get
//!   [`DEFAULT_PRIORITY`]; without an argument count they accept every value
//!   the host passes ([`ArgCount::Unbounded`]).
//! - **Ajax expansion**: one ajax handler becomes two actions, one per request
//!   context, named `<prefix>_<name>` for each prefix in
//!   [`Settings::ajax_prefixes`].
//!
//! Registering the same declaration twice creates two host bindings; the
//! engine does not deduplicate.

use crate::{commands::CommandBinder, settings::Settings};
use docwire_core::{ArgCount, Callback, DEFAULT_PRIORITY, Declaration, Host, HookKind};

/// Caller-supplied registration arguments, merged over the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HookArgs {
    /// Priority (lower runs earlier).
    pub priority: Option<i32>,
    /// Number of values the host passes.
    pub arg_count: Option<ArgCount>,
}

impl HookArgs {
    /// Create empty arguments; every field falls back to its default.
    pub const fn new() -> Self {
        Self {
            priority: None,
            arg_count: None,
        }
    }

    /// Set priority.
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set argument count.
    pub const fn with_arg_count(mut self, arg_count: ArgCount) -> Self {
        self.arg_count = Some(arg_count);
        self
    }

    /// The effective priority and argument count.
    pub fn resolve(self) -> (i32, ArgCount) {
        (
            self.priority.unwrap_or(DEFAULT_PRIORITY),
            self.arg_count.unwrap_or_default(),
        )
    }
}

impl From<&Declaration> for HookArgs {
    fn from(decl: &Declaration) -> Self {
        HookArgs::new()
            .with_priority(decl.priority())
            .with_arg_count(decl.arg_count())
    }
}

/// Registers hooks with a host.
pub struct HookRegistrar<'h, H: ?Sized> {
    host: &'h H,
    settings: &'h Settings,
}

impl<'h, H: Host + ?Sized> HookRegistrar<'h, H> {
    /// Create a registrar for `host`.
    pub fn new(host: &'h H, settings: &'h Settings) -> Self {
        Self { host, settings }
    }

    /// Hook `callback` on to action `name`.
    pub fn add_action(&self, name: &str, callback: Callback, args: HookArgs) {
        let (priority, arg_count) = args.resolve();
        tracing::trace!(hook = name, priority, ?arg_count, method = callback.method(), "add action");
        self.host.register_action(name, callback, priority, arg_count);
    }

    /// Hook `callback` on to filter `name`.
    pub fn add_filter(&self, name: &str, callback: Callback, args: HookArgs) {
        let (priority, arg_count) = args.resolve();
        tracing::trace!(hook = name, priority, ?arg_count, method = callback.method(), "add filter");
        self.host.register_filter(name, callback, priority, arg_count);
    }

    /// Register `callback` as shortcode `name`.
    pub fn add_shortcode(&self, name: &str, callback: Callback) {
        tracing::trace!(shortcode = name, method = callback.method(), "add shortcode");
        self.host.register_shortcode(name, callback);
    }

    /// Hook `callback` on to the authenticated and unauthenticated ajax actions for `name`.
    pub fn add_ajax(&self, name: &str, callback: Callback, args: HookArgs) {
        for prefix in self.settings.ajax_prefixes() {
            self.add_action(&format!("{prefix}_{name}"), callback.clone(), args);
        }
    }

    /// Register `callback` as command `name`.
    pub fn add_command(&self, name: &str, callback: Callback) {
        CommandBinder::new(self.host).bind(name, callback);
    }

    /// Register one declaration.
    pub fn register(&self, decl: &Declaration) {
        let callback = decl.callback().clone();
        match decl.kind() {
            HookKind::Action => self.add_action(decl.name(), callback, decl.into()),
            HookKind::Filter => self.add_filter(decl.name(), callback, decl.into()),
            HookKind::Shortcode => self.add_shortcode(decl.name(), callback),
            HookKind::Ajax => self.add_ajax(decl.name(), callback, decl.into()),
            HookKind::Command => {
                CommandBinder::new(self.host).bind_declaration(decl);
            }
        }
    }

    /// Register every declaration in order, returning how many were registered.
    pub fn register_all<'d>(&self, decls: impl IntoIterator<Item = &'d Declaration>) -> usize {
        decls.into_iter().fold(0, |count, decl| {
            self.register(decl);
            count + 1
        })
    }
}
