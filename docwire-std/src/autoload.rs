//! # Autoload
//!
//! Components marked `#[docwire::hooks(autoload)]` submit an [`Autoload`]
//! record through `inventory`. [`Registry::load_registered`] instantiates every
//! submitted component with default arguments, so an application only has to
//! link the crates that define them.

use crate::{component::Lifecycle, registry::Registry};
use docwire_core::DocwireError;

/// Registration entry for an autoloaded component.
///
/// This struct is submitted to `inventory` for automatic collection.
pub struct Autoload {
    /// The component identity, for logging.
    pub component: &'static str,
    /// Instantiates the component in a registry.
    pub load: fn(&Registry) -> Result<(), DocwireError>,
}

impl Autoload {
    /// Create an autoload record.
    pub const fn new(
        component: &'static str,
        load: fn(&Registry) -> Result<(), DocwireError>,
    ) -> Self {
        Self { component, load }
    }
}

inventory::collect!(Autoload);

/// Instantiate `C` with default arguments.
pub fn load_default<C>(registry: &Registry) -> Result<(), DocwireError>
where
    C: Lifecycle<Args: Default>,
{
    registry.instance::<C>(C::Args::default()).map(drop)
}

impl Registry {
    /// Instantiate every autoloaded component, returning how many were loaded.
    ///
    /// Components that are already live are looked up, not rebuilt. Stops at
    /// the first failure.
    pub fn load_registered(&self) -> Result<usize, DocwireError> {
        let mut loaded = 0;
        for entry in inventory::iter::<Autoload>() {
            tracing::debug!(component = entry.component, "autoload");
            (entry.load)(self)?;
            loaded += 1;
        }
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{component::Construct, testing::RecordingHost};
    use std::sync::Arc;

    struct Beacon;

    impl Lifecycle for Beacon {
        type Args = ();

        fn construct(_: Construct) -> Self {
            Beacon
        }
    }

    inventory::submit! {
        Autoload::new("Beacon", load_default::<Beacon>)
    }

    #[test]
    fn test_load_registered_instantiates_submitted() {
        let registry = Registry::new(Arc::new(RecordingHost::new()));
        assert!(registry.get::<Beacon>().is_none());

        let loaded = registry.load_registered().unwrap();
        assert!(loaded >= 1);
        assert!(registry.get::<Beacon>().is_some());

        assert_eq!(registry.load_registered().unwrap(), loaded);
    }
}
