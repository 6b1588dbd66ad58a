//! # Route Table Builder
//!
//! Components that expose an API carry an [`ApiMetadata`]: a namespace, a
//! version and an optional subspace, plus a table mapping route base paths to
//! method configuration. The configuration (HTTP methods, permission callback,
//! argument schema, ...) is owned by the component author and handed to the
//! host untouched.
//!
//! The prefix every route is registered under is
//!
//! - `{namespace}/v{version}/{subspace}` when the subspace is set,
//! - `{namespace}/v{version}` otherwise.
//!
//! A component with an empty namespace or version registers nothing, which is
//! how a component opts out of API exposure.

use crate::component::Lifecycle;
use docwire_core::RouteRegistrar;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;

/// Version used until an `@api-version` annotation says otherwise.
pub const DEFAULT_API_VERSION: &str = "1";

/// A component whose methods are exposed through the host's request router.
pub trait ApiComponent: Lifecycle {
    /// The component's API metadata.
    fn api(&self) -> &ApiMetadata;
}

#[derive(Debug)]
struct ApiState {
    namespace: String,
    version: String,
    subspace: String,
    routes: IndexMap<String, Value>,
}

/// Route prefix segments and the route table of one component.
#[derive(Debug)]
pub struct ApiMetadata {
    state: RwLock<ApiState>,
}

impl Default for ApiMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiMetadata {
    /// Create metadata with an empty namespace, version `1` and no routes.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ApiState {
                namespace: String::new(),
                version: DEFAULT_API_VERSION.to_owned(),
                subspace: String::new(),
                routes: IndexMap::new(),
            }),
        }
    }

    /// The namespace.
    pub fn namespace(&self) -> String {
        self.state.read().namespace.clone()
    }

    /// The version, without the `v` prefix.
    pub fn version(&self) -> String {
        self.state.read().version.clone()
    }

    /// The subspace.
    pub fn subspace(&self) -> String {
        self.state.read().subspace.clone()
    }

    /// Set the namespace.
    pub fn set_namespace(&self, namespace: impl Into<String>) {
        self.state.write().namespace = namespace.into();
    }

    /// Set the version.
    pub fn set_version(&self, version: impl Into<String>) {
        self.state.write().version = version.into();
    }

    /// Set the subspace.
    pub fn set_subspace(&self, subspace: impl Into<String>) {
        self.state.write().subspace = subspace.into();
    }

    /// Replace the route table.
    pub fn set_routes<K: Into<String>>(&self, routes: impl IntoIterator<Item = (K, Value)>) {
        self.state.write().routes = routes.into_iter().map(|(k, v)| (k.into(), v)).collect();
    }

    /// Add or replace one route.
    pub fn add_route(&self, base_path: impl Into<String>, method_config: Value) {
        self.state.write().routes.insert(base_path.into(), method_config);
    }

    /// The route table, in insertion order.
    pub fn routes(&self) -> Vec<(String, Value)> {
        self.state
            .read()
            .routes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// The prefix routes are registered under, or `None` when the namespace or
    /// version is empty.
    pub fn route_prefix(&self) -> Option<String> {
        let state = self.state.read();
        if state.namespace.is_empty() || state.version.is_empty() {
            return None;
        }
        Some(if state.subspace.is_empty() {
            format!("{}/v{}", state.namespace, state.version)
        } else {
            format!("{}/v{}/{}", state.namespace, state.version, state.subspace)
        })
    }
}

/// Register every route of `api` with `host`, returning how many were registered.
pub fn register_routes<R: RouteRegistrar + ?Sized>(host: &R, api: &ApiMetadata) -> usize {
    let routes = api.routes();
    let Some(prefix) = api.route_prefix() else {
        if !routes.is_empty() {
            tracing::debug!(
                skipped = routes.len(),
                "api namespace or version is empty; routes not registered"
            );
        }
        return 0;
    };

    for (base_path, method_config) in &routes {
        tracing::trace!(prefix = %prefix, base_path = %base_path, "register route");
        host.register_route(&prefix, base_path, method_config);
    }
    routes.len()
}
