//! # docwire-std
//!
//! Standard implementations for the docwire registration engine.
//!
//! This crate provides:
//! - **Annotation parsing**: [`parser`] reads `@action`, `@filter`,
//!   `@shortcode`, `@ajax`, `@command` and `@api-*` tags from doc text
//! - **Registration**: [`HookRegistrar`] applies declarations to a host with
//!   the default priority and argument count policy
//! - **Components**: [`Lifecycle`], [`Hookable`] and [`Reflection`]
//! - **Instances**: [`Registry`] owns one instance per component identity
//! - **Routes**: [`ApiMetadata`] and [`register_routes`]
//! - **Plugins**: [`Plugin`] entry components and [`PackageLocation`]
//! - **Testing**: [`testing::RecordingHost`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use docwire_core;

// Modules
#[cfg(feature = "inventory")]
pub mod autoload;
pub mod case;
pub mod commands;
pub mod component;
pub mod engine;
pub mod location;
pub mod parser;
pub mod plugin;
pub mod registry;
pub mod routes;
pub mod settings;
pub mod testing;

pub use commands::CommandBinder;
pub use component::{Construct, Hookable, Lifecycle, Method, MethodFn, Reflection, SetterFn};
pub use engine::{HookArgs, HookRegistrar};
pub use location::{PackageLocation, PathResolver};
pub use plugin::Plugin;
pub use registry::{Handle, LifecycleState, Registry, RegistryBuilder};
pub use routes::{ApiComponent, ApiMetadata, DEFAULT_API_VERSION, register_routes};
pub use settings::Settings;

#[cfg(feature = "inventory")]
pub use autoload::{Autoload, load_default};

#[cfg(feature = "inventory")]
pub use inventory;
