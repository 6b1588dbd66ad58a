//! Registration settings.

use std::borrow::Cow;

/// Host-specific names the engine registers under.
///
/// The defaults match the conventional hook names of the host the annotation
/// vocabulary comes from; override them for hosts that name things differently.
///
/// # Example
/// ```ignore
/// let settings = Settings::new()
///     .with_ajax_prefixes("rpc", "rpc_public")
///     .with_route_init_hook("routes_ready");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    ajax_prefix: Cow<'static, str>,
    ajax_nopriv_prefix: Cow<'static, str>,
    api_init_hook: Cow<'static, str>,
    route_init_hook: Cow<'static, str>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Create default settings.
    pub const fn new() -> Self {
        Self {
            ajax_prefix: Cow::Borrowed("wp_ajax"),
            ajax_nopriv_prefix: Cow::Borrowed("wp_ajax_nopriv"),
            api_init_hook: Cow::Borrowed("init"),
            route_init_hook: Cow::Borrowed("rest_api_init"),
        }
    }

    /// Set the authenticated and unauthenticated ajax hook prefixes.
    pub fn with_ajax_prefixes(
        mut self,
        authenticated: impl Into<Cow<'static, str>>,
        unauthenticated: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.ajax_prefix = authenticated.into();
        self.ajax_nopriv_prefix = unauthenticated.into();
        self
    }

    /// Set the hook on which class-level `@api-*` annotations are applied.
    pub fn with_api_init_hook(mut self, hook: impl Into<Cow<'static, str>>) -> Self {
        self.api_init_hook = hook.into();
        self
    }

    /// Set the hook on which route tables are registered.
    pub fn with_route_init_hook(mut self, hook: impl Into<Cow<'static, str>>) -> Self {
        self.route_init_hook = hook.into();
        self
    }

    /// Both ajax hook prefixes, authenticated first.
    pub fn ajax_prefixes(&self) -> [&str; 2] {
        [&self.ajax_prefix, &self.ajax_nopriv_prefix]
    }

    /// Hook on which class-level `@api-*` annotations are applied.
    pub fn api_init_hook(&self) -> &str {
        &self.api_init_hook
    }

    /// Hook on which route tables are registered.
    pub fn route_init_hook(&self) -> &str {
        &self.route_init_hook
    }
}
