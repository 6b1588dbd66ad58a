//! # docwire - Doc-Comment Driven Host Wiring
//!
//! `docwire` turns annotations in a component's documentation into
//! registrations with a host application's event, request-routing and
//! command-line systems. Each component has exactly one live instance per
//! [`Registry`]; the first access constructs it, registers its hooks and
//! initializes it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docwire::prelude::*;
//!
//! struct Forms;
//!
//! impl Lifecycle for Forms {
//!     type Args = ();
//!     fn construct(_: Construct) -> Self { Forms }
//!     fn hooks() -> Option<Reflection<Self>> { Some(Self::reflection()) }
//! }
//!
//! #[docwire::hooks]
//! impl Forms {
//!     /// @action save_post, 20
//!     fn on_save(&self, post_id: u64) {}
//!
//!     /// @ajax
//!     fn handle_submit(&self) -> String { "ok".into() }
//! }
//!
//! let registry = Registry::new(host);
//! registry.instance::<Forms>(())?;
//! ```
//!
//! ## Annotations
//!
//! | tag | registers |
//! |-----|-----------|
//! | `@action name[, priority]` | an action hook |
//! | `@filter name[, priority]` | a filter hook |
//! | `@shortcode name` | a shortcode |
//! | `@ajax [name]` | the authenticated and unauthenticated ajax actions |
//! | `@command name` | a command-line command |
//! | `@api-<key> value` | (class level) a setter call, e.g. `@api-namespace` |

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use docwire_core::{
    ANNOTATED_PRIORITY,
    // Declarations
    ArgCount,
    // Errors
    BoxError,
    // Callbacks
    Callback,
    CallbackError,
    // Host boundary
    CommandRegistrar,
    DEFAULT_PRIORITY,
    Declaration,
    DocwireError,
    EventDispatch,
    HookKind,
    Host,
    IntoReturn,
    Invocation,
    RouteRegistrar,
};

pub use docwire_std::{
    // Routes
    ApiComponent,
    ApiMetadata,
    // Engine
    CommandBinder,
    // Components
    Construct,
    DEFAULT_API_VERSION,
    Handle,
    HookArgs,
    HookRegistrar,
    Hookable,
    Lifecycle,
    LifecycleState,
    Method,
    MethodFn,
    // Plugins
    PackageLocation,
    PathResolver,
    Plugin,
    Reflection,
    // Registry
    Registry,
    RegistryBuilder,
    SetterFn,
    Settings,
    register_routes,
};

/// Annotation parsing.
pub mod parser {
    pub use docwire_std::parser::{ApiAnnotation, HookAnnotation, ajax, api, commands, hooks};
}

/// Testing utilities.
pub mod testing {
    pub use docwire_std::testing::{Binding, RecordingHost, Registration, RouteBinding};
}

/// Prelude module - common imports for docwire.
///
/// # Usage
///
/// ```rust,ignore
/// use docwire::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ApiComponent, ApiMetadata, ArgCount, CallbackError, Construct, DocwireError, Handle,
        Hookable, Invocation, Lifecycle, Plugin, Reflection, Registry, Settings,
    };
}

pub use serde_json;

#[cfg(feature = "inventory")]
pub use docwire_std::{Autoload, load_default};

#[cfg(feature = "macros")]
pub use docwire_macros::hooks;

#[cfg(feature = "inventory")]
pub use inventory;
