//! Plugin entry components.

use crate::{
    component::Lifecycle,
    location::PackageLocation,
    registry::{Handle, Registry},
};
use docwire_core::DocwireError;
use std::path::PathBuf;

/// The entry component of a package.
///
/// ```rust,ignore
/// impl Plugin for AcmeForms {
///     const SOURCE: &'static str = file!();
/// }
///
/// AcmeForms::load(&registry)?;
/// let script = AcmeForms::url(&registry, "assets/app.js");
/// ```
pub trait Plugin: Lifecycle<Args: Default> {
    /// The source file the component is defined in.
    const SOURCE: &'static str;

    /// Instantiate the plugin with default arguments.
    fn load(registry: &Registry) -> Result<Handle<Self>, DocwireError> {
        registry.instance::<Self>(Self::Args::default())
    }

    /// Where the package lives.
    fn location() -> PackageLocation {
        PackageLocation::new(Self::SOURCE)
    }

    /// The package entry file.
    fn file() -> PathBuf {
        Self::location().entry_file()
    }

    /// `path` inside the package directory.
    fn dir(registry: &Registry, path: &str) -> PathBuf {
        Self::location().dir(path, registry.path_resolver())
    }

    /// Public URL of `path` inside the package directory.
    fn url(registry: &Registry, path: &str) -> String {
        Self::location().url(path, registry.path_resolver())
    }
}
