//! # Component Capabilities
//!
//! A component is a type with exactly one live instance per [`Registry`].
//! Two capabilities describe it:
//!
//! - [`Lifecycle`]: how the instance is constructed, whether it is hooked, and
//!   how it is initialized. Construction needs a [`Construct`] token, which
//!   only the registry can create, so a component cannot be built around it.
//! - [`Hookable`]: a static [`Reflection`] of the component's methods and their
//!   documentation text, usually generated by `#[docwire::hooks]`.
//!
//! A component opts into hooking by returning its reflection from
//! [`Lifecycle::hooks`]:
//!
//! ```rust,ignore
//! impl Lifecycle for Greeter {
//!     type Args = ();
//!     fn construct(_: Construct) -> Self { Greeter }
//!     fn hooks() -> Option<Reflection<Self>> { Some(Self::reflection()) }
//! }
//! ```
//!
//! [`Registry`]: crate::registry::Registry

use crate::{
    case::to_snake_case,
    parser,
    routes::{self, ApiComponent},
    settings::Settings,
};
use docwire_core::{
    ANNOTATED_PRIORITY, ArgCount, Callback, CallbackError, DEFAULT_PRIORITY, Declaration, Host,
    HookKind, Invocation,
};
use serde_json::Value;
use std::{
    borrow::Cow,
    fmt,
    sync::{Arc, Weak},
};

/// Proof that construction was requested by the registry.
///
/// There is no public constructor.
#[derive(Debug)]
pub struct Construct {
    component: &'static str,
}

impl Construct {
    pub(crate) fn new(component: &'static str) -> Self {
        Self { component }
    }

    /// The identity of the component being constructed.
    pub fn component(&self) -> &'static str {
        self.component
    }
}

/// Construct-once, hook, init.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a docwire component",
    label = "missing `Lifecycle` implementation",
    note = "Implement `Lifecycle` so the registry can construct `{Self}`."
)]
pub trait Lifecycle: Send + Sync + Sized + 'static {
    /// Arguments passed to [`Lifecycle::init`] on first access.
    type Args: Send;

    /// Build the instance.
    fn construct(token: Construct) -> Self;

    /// The reflection to wire into the host, if the component is hookable.
    fn hooks() -> Option<Reflection<Self>> {
        None
    }

    /// Initialize the instance after its hooks are registered.
    fn init(&self, _args: Self::Args) {}
}

/// Produces the static reflection of a component.
pub trait Hookable: Lifecycle {
    /// Describe the component's methods and class documentation.
    fn reflection() -> Reflection<Self>;
}

/// Invokes one method of `C`.
pub type MethodFn<C> = for<'a> fn(&C, Invocation<'a>) -> Result<Value, CallbackError>;

/// Applies one `@api-<key>` value to `C`.
pub type SetterFn<C> = fn(&C, &str);

/// One reflected method.
pub struct Method<C> {
    name: &'static str,
    arg_count: usize,
    doc: Cow<'static, str>,
    invoke: MethodFn<C>,
}

impl<C> Method<C> {
    /// The method identifier.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared parameter count, excluding the receiver.
    pub fn arg_count(&self) -> usize {
        self.arg_count
    }

    /// Raw documentation text.
    pub fn doc(&self) -> &str {
        &self.doc
    }
}

impl<C> fmt::Debug for Method<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("arg_count", &self.arg_count)
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

/// The static description of a component: methods, documentation and the
/// setters class-level `@api-<key>` annotations may call.
pub struct Reflection<C> {
    component: &'static str,
    class_doc: Cow<'static, str>,
    methods: Vec<Method<C>>,
    setters: Vec<(String, SetterFn<C>)>,
    api: Option<fn(&C) -> &routes::ApiMetadata>,
}

impl<C: Lifecycle> Reflection<C> {
    /// Create an empty reflection for `component` with class-level `class_doc`.
    pub fn new(component: &'static str, class_doc: impl Into<Cow<'static, str>>) -> Self {
        Self {
            component,
            class_doc: class_doc.into(),
            methods: Vec::new(),
            setters: Vec::new(),
            api: None,
        }
    }

    /// Add a method.
    pub fn method(
        mut self,
        name: &'static str,
        arg_count: usize,
        doc: impl Into<Cow<'static, str>>,
        invoke: MethodFn<C>,
    ) -> Self {
        self.methods.push(Method {
            name,
            arg_count,
            doc: doc.into(),
            invoke,
        });
        self
    }

    /// Add a setter for `@api-<key>`. Keys match case-insensitively; a later
    /// setter for the same key replaces the earlier one.
    pub fn setter(mut self, key: &str, setter: SetterFn<C>) -> Self {
        let key = key.to_ascii_lowercase();
        if let Some(slot) = self.setters.iter_mut().find(|(k, _)| *k == key) {
            tracing::warn!(component = self.component, key = %key, "replacing @api setter");
            slot.1 = setter;
        } else {
            self.setters.push((key, setter));
        }
        self
    }

    /// Expose the component's routes.
    ///
    /// Adds the `namespace`, `version` and `subspace` setters, applies
    /// class-level annotations on [`Settings::api_init_hook`] and registers
    /// the route table on [`Settings::route_init_hook`].
    pub fn with_api(mut self) -> Self
    where
        C: ApiComponent,
    {
        self.api = Some(C::api);
        self.setter("namespace", |c, v| c.api().set_namespace(v))
            .setter("version", |c, v| c.api().set_version(v))
            .setter("subspace", |c, v| c.api().set_subspace(v))
    }

    /// The component identity.
    pub fn component(&self) -> &'static str {
        self.component
    }

    /// Class-level documentation text.
    pub fn class_doc(&self) -> &str {
        &self.class_doc
    }

    /// The reflected methods, in declaration order.
    pub fn methods(&self) -> &[Method<C>] {
        &self.methods
    }

    /// Whether the route table is exposed.
    pub fn has_api(&self) -> bool {
        self.api.is_some()
    }

    /// Apply every `@api-<key> <value>` class annotation to `instance`.
    ///
    /// Keys without a setter are skipped. Returns how many were applied.
    pub fn apply_class_annotations(&self, instance: &C) -> usize {
        let mut applied = 0;
        for annotation in parser::api(&self.class_doc) {
            let key = annotation.key.to_ascii_lowercase();
            match self.setters.iter().find(|(k, _)| *k == key) {
                Some((_, setter)) => {
                    setter(instance, annotation.value);
                    applied += 1;
                }
                None => tracing::debug!(
                    component = self.component,
                    key = annotation.key,
                    "no setter for @api annotation; ignored"
                ),
            }
        }
        applied
    }

    /// Build every declaration this reflection yields for `instance`.
    ///
    /// Callbacks hold the instance strongly and the host weakly.
    pub fn declarations(
        self: &Arc<Self>,
        instance: &Arc<C>,
        host: &Weak<dyn Host>,
        settings: &Settings,
    ) -> Vec<Declaration> {
        let mut decls = Vec::new();

        for method in &self.methods {
            let doc = method.doc();
            let hooks = parser::hooks(doc);
            let commands = parser::commands(doc);
            let ajax = parser::ajax(doc);
            if hooks.is_empty() && commands.is_empty() && ajax.is_empty() {
                continue;
            }

            let callback = bind_method(self.component, method, instance, host);
            let arg_count = ArgCount::Exact(method.arg_count);

            for hook in hooks {
                let priority = hook.priority.unwrap_or(ANNOTATED_PRIORITY);
                self.push(
                    &mut decls,
                    Declaration::new(hook.kind, hook.name, priority, arg_count, callback.clone()),
                );
            }
            for name in commands {
                self.push(
                    &mut decls,
                    Declaration::new(
                        HookKind::Command,
                        name,
                        DEFAULT_PRIORITY,
                        ArgCount::Unbounded,
                        callback.clone(),
                    ),
                );
            }
            for name in ajax {
                let name = name.map_or_else(|| to_snake_case(method.name), str::to_owned);
                // Ajax priority is not read from the annotation.
                self.push(
                    &mut decls,
                    Declaration::new(
                        HookKind::Ajax,
                        name,
                        ANNOTATED_PRIORITY,
                        arg_count,
                        callback.clone(),
                    ),
                );
            }
        }

        if let Some(api) = self.api {
            let reflection = Arc::clone(self);
            let this = Arc::clone(instance);
            let apply = Callback::new(self.component, "apply_api_annotations", move |_| {
                reflection.apply_class_annotations(&this);
                Ok(Value::Null)
            });
            self.push(
                &mut decls,
                Declaration::new(
                    HookKind::Action,
                    settings.api_init_hook(),
                    ANNOTATED_PRIORITY,
                    ArgCount::Exact(0),
                    apply,
                ),
            );

            let this = Arc::clone(instance);
            let host = host.clone();
            let register = Callback::new(self.component, "register_endpoints", move |_| {
                let host = host.upgrade().ok_or(CallbackError::Detached)?;
                Ok(Value::from(routes::register_routes(&*host, api(&this))))
            });
            self.push(
                &mut decls,
                Declaration::new(
                    HookKind::Action,
                    settings.route_init_hook(),
                    ANNOTATED_PRIORITY,
                    ArgCount::Exact(0),
                    register,
                ),
            );
        }

        decls
    }

    fn push(&self, decls: &mut Vec<Declaration>, decl: Result<Declaration, docwire_core::DocwireError>) {
        match decl {
            Ok(decl) => decls.push(decl),
            Err(err) => tracing::debug!(component = self.component, %err, "declaration skipped"),
        }
    }
}

impl<C> fmt::Debug for Reflection<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reflection")
            .field("component", &self.component)
            .field("class_doc", &self.class_doc)
            .field("methods", &self.methods)
            .field("setters", &self.setters.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .field("api", &self.api.is_some())
            .finish()
    }
}

fn bind_method<C: Lifecycle>(
    component: &'static str,
    method: &Method<C>,
    instance: &Arc<C>,
    host: &Weak<dyn Host>,
) -> Callback {
    let this = Arc::clone(instance);
    let host = host.clone();
    let invoke = method.invoke;
    Callback::new(component, method.name, move |args| {
        let host = host.upgrade().ok_or(CallbackError::Detached)?;
        invoke(&this, Invocation::new(args, &*host))
    })
}
