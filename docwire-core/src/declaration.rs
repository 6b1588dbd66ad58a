//! # Declaration Schema
//!
//! A [`Declaration`] is the typed result of reading one annotation: which host
//! registration it becomes ([`HookKind`]), under which name, with which
//! priority and argument count, and which [`Callback`] the host should invoke.
//!
//! Declarations are immutable once built. A single method may produce several
//! of them, one per matched annotation.

use crate::{callback::Callback, error::DocwireError};
use std::fmt;

/// Priority used when a caller registers an action or filter without one.
pub const DEFAULT_PRIORITY: i32 = 10;

/// Priority used when an annotation omits one.
pub const ANNOTATED_PRIORITY: i32 = 11;

/// The host registration a declaration turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// A side-effecting callback on a named extension point.
    Action,
    /// A value-transforming callback on a named extension point.
    Filter,
    /// A content-substitution callback without priority.
    Shortcode,
    /// An action registered twice, for authenticated and anonymous requests.
    Ajax,
    /// A command-line command.
    Command,
}

impl HookKind {
    /// The annotation tag for this kind, without the leading `@`.
    pub const fn tag(self) -> &'static str {
        match self {
            HookKind::Action => "action",
            HookKind::Filter => "filter",
            HookKind::Shortcode => "shortcode",
            HookKind::Ajax => "ajax",
            HookKind::Command => "command",
        }
    }

    /// Parse an annotation tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "action" => Some(HookKind::Action),
            "filter" => Some(HookKind::Filter),
            "shortcode" => Some(HookKind::Shortcode),
            "ajax" => Some(HookKind::Ajax),
            "command" => Some(HookKind::Command),
            _ => None,
        }
    }

    /// Whether `name` is acceptable for this kind.
    ///
    /// Names are non-empty runs of `[a-z0-9/=\-._]`; commands additionally
    /// allow `:` and space so namespaced command paths can be declared.
    pub fn accepts_name(self, name: &str) -> bool {
        !name.is_empty()
            && name.chars().all(|c| {
                matches!(c, 'a'..='z' | '0'..='9' | '/' | '=' | '-' | '.' | '_')
                    || (self == HookKind::Command && matches!(c, ':' | ' '))
            })
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Number of positional values the host passes to a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArgCount {
    /// Exactly this many values.
    Exact(usize),
    /// As many values as the host has.
    #[default]
    Unbounded,
}

impl ArgCount {
    /// The count as a number, with `Unbounded` mapped to `usize::MAX`.
    pub const fn as_usize(self) -> usize {
        match self {
            ArgCount::Exact(n) => n,
            ArgCount::Unbounded => usize::MAX,
        }
    }
}

impl From<usize> for ArgCount {
    fn from(n: usize) -> Self {
        ArgCount::Exact(n)
    }
}

/// A typed, immutable registration request.
#[derive(Debug, Clone)]
pub struct Declaration {
    kind: HookKind,
    name: String,
    priority: i32,
    arg_count: ArgCount,
    callback: Callback,
}

impl Declaration {
    /// Create a declaration, validating `name` against the grammar of `kind`.
    pub fn new(
        kind: HookKind,
        name: impl Into<String>,
        priority: i32,
        arg_count: ArgCount,
        callback: Callback,
    ) -> Result<Self, DocwireError> {
        let name = name.into();
        if !kind.accepts_name(&name) {
            return Err(DocwireError::InvalidHookName { kind, name });
        }
        Ok(Self {
            kind,
            name,
            priority,
            arg_count,
            callback,
        })
    }

    /// The registration kind.
    pub fn kind(&self) -> HookKind {
        self.kind
    }

    /// The declared or derived name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved priority. Ignored for shortcodes and commands.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// The argument count. Ignored for shortcodes and commands.
    pub fn arg_count(&self) -> ArgCount {
        self.arg_count
    }

    /// The callback the host should invoke.
    pub fn callback(&self) -> &Callback {
        &self.callback
    }
}
