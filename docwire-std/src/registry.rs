//! # Instance Registry
//!
//! The application context that owns every component instance.
//!
//! Each component identity (its fully-qualified type name) has one slot. The
//! first access runs the whole lifecycle as one unit:
//!
//! ```text
//! UNINITIALIZED -> CONSTRUCTED -> HOOKED -> READY
//! ```
//!
//! - **Constructed**: [`Lifecycle::construct`] is called with a token only the
//!   registry can create.
//! - **Hooked**: if [`Lifecycle::hooks`] returns a reflection, its declarations
//!   are registered with the host.
//! - **Ready**: [`Lifecycle::init`] receives the arguments of the first call.
//!
//! Every later access is a lookup returning the same [`Handle`].
//!
//! If any step panics the slot becomes [`LifecycleState::Failed`]. Host
//! registrations made before the panic cannot be withdrawn, so the identity is
//! never built again; later accesses return
//! [`DocwireError::FailedInstantiation`].
//!
//! # Concurrency
//!
//! The slot map lock is held only long enough to find or create a slot. Each
//! slot has its own reentrant mutex, held for the entire sequence, so
//! concurrent first accesses to one identity run exactly one sequence and
//! never observe a partial instance. Accesses to other identities proceed in
//! parallel, including from inside another component's sequence. A component
//! that asks for itself while its own sequence is running on the same thread
//! gets [`DocwireError::ReentrantInstantiation`].
//!
//! Cycles across threads are not detected. If `A::init` waits on a thread
//! that asks for `A`, or `A::init` asks for `B` while `B::init` on another
//! thread asks for `A` and both are first accesses, the threads deadlock.
//! Keep first-access dependencies between components acyclic.

use crate::{
    component::{Construct, Lifecycle, Reflection},
    engine::HookRegistrar,
    location::PathResolver,
    settings::Settings,
};
use docwire_core::{DocwireError, Host};
use parking_lot::{Mutex, ReentrantMutex};
use std::{
    any::{Any, TypeId, type_name},
    cell::RefCell,
    collections::HashMap,
    fmt,
    ops::Deref,
    sync::Arc,
};

/// Where a component identity is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    /// No instance has been requested.
    Uninitialized,
    /// The instance exists but its hooks are not registered.
    Constructed,
    /// Hooks are registered; `init` has not run.
    Hooked,
    /// Fully initialized.
    Ready,
    /// A step of the sequence panicked. Terminal.
    Failed,
}

/// A shared reference to the single instance of `C`.
pub struct Handle<C> {
    inner: Arc<C>,
}

impl<C> Handle<C> {
    fn new(inner: Arc<C>) -> Self {
        Self { inner }
    }

    /// Whether two handles refer to the same instance.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.inner, &other.inner)
    }

    /// The underlying `Arc`.
    pub fn as_arc(&self) -> &Arc<C> {
        &self.inner
    }
}

impl<C> Clone for Handle<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> Deref for Handle<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<C: fmt::Debug> fmt::Debug for Handle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.inner).finish()
    }
}

struct SlotState<C> {
    state: LifecycleState,
    instance: Option<Arc<C>>,
    constructing: bool,
}

struct Slot<C> {
    cell: ReentrantMutex<RefCell<SlotState<C>>>,
}

impl<C> Slot<C> {
    fn new() -> Self {
        Self {
            cell: ReentrantMutex::new(RefCell::new(SlotState {
                state: LifecycleState::Uninitialized,
                instance: None,
                constructing: false,
            })),
        }
    }
}

/// Marks a slot `Failed` if the sequence unwinds.
struct Poison<'a, C> {
    component: &'static str,
    cell: &'a RefCell<SlotState<C>>,
    armed: bool,
}

impl<C> Drop for Poison<'_, C> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.cell.borrow_mut();
            state.state = LifecycleState::Failed;
            state.instance = None;
            state.constructing = false;
            tracing::error!(component = self.component, "construction sequence panicked");
        }
    }
}

/// Owns component instances and wires them into a host.
pub struct Registry {
    host: Arc<dyn Host>,
    settings: Settings,
    paths: Option<Arc<dyn PathResolver>>,
    slots: Mutex<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl Registry {
    /// Create a registry for `host` with default settings.
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self::builder(host).build()
    }

    /// Start building a registry for `host`.
    pub fn builder(host: Arc<dyn Host>) -> RegistryBuilder {
        RegistryBuilder {
            host,
            settings: Settings::default(),
            paths: None,
        }
    }

    /// The host registrations go to.
    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    /// The registration settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The host's path resolver, if it has one.
    pub fn path_resolver(&self) -> Option<&dyn PathResolver> {
        self.paths.as_deref()
    }

    /// Get the instance of `C`, constructing it on first access.
    ///
    /// `args` is passed to [`Lifecycle::init`] on first access and dropped
    /// otherwise.
    pub fn instance<C: Lifecycle>(&self, args: C::Args) -> Result<Handle<C>, DocwireError> {
        self.acquire(args, false)
    }

    /// Construct `C`, failing with [`DocwireError::DuplicateInstantiation`] if
    /// it already has an instance.
    pub fn construct<C: Lifecycle>(&self, args: C::Args) -> Result<Handle<C>, DocwireError> {
        self.acquire(args, true)
    }

    /// Get the instance of `C` if it is ready. Never constructs.
    pub fn get<C: Lifecycle>(&self) -> Option<Handle<C>> {
        let slot = self.existing_slot::<C>()?;
        let guard = slot.cell.lock();
        let state = guard.borrow();
        if state.constructing {
            return None;
        }
        state.instance.clone().map(Handle::new)
    }

    /// Where `C` is in its lifecycle.
    pub fn state<C: Lifecycle>(&self) -> LifecycleState {
        match self.existing_slot::<C>() {
            Some(slot) => slot.cell.lock().borrow().state,
            None => LifecycleState::Uninitialized,
        }
    }

    /// Number of identities that have been requested.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Whether no identity has been requested.
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    fn acquire<C: Lifecycle>(&self, args: C::Args, strict: bool) -> Result<Handle<C>, DocwireError> {
        let component = type_name::<C>();
        let slot = self.slot::<C>();
        let guard = slot.cell.lock();

        {
            let state = guard.borrow();
            if state.constructing {
                return Err(DocwireError::ReentrantInstantiation { component });
            }
            if state.state == LifecycleState::Failed {
                return Err(DocwireError::FailedInstantiation { component });
            }
            if let Some(instance) = &state.instance {
                if strict {
                    tracing::warn!(component, "duplicate construction rejected");
                    return Err(DocwireError::DuplicateInstantiation { component });
                }
                return Ok(Handle::new(Arc::clone(instance)));
            }
        }

        let span = tracing::info_span!("instantiate", component);
        let _enter = span.enter();

        guard.borrow_mut().constructing = true;
        let mut poison = Poison {
            component,
            cell: &guard,
            armed: true,
        };

        let instance = Arc::new(C::construct(Construct::new(component)));
        self.advance(&guard, LifecycleState::Constructed);

        if let Some(reflection) = C::hooks() {
            let registered = self.add_doc_hooks(&instance, reflection);
            tracing::debug!(registered, "hooks registered");
        }
        self.advance(&guard, LifecycleState::Hooked);

        instance.init(args);

        {
            let mut state = guard.borrow_mut();
            state.instance = Some(Arc::clone(&instance));
            state.constructing = false;
        }
        self.advance(&guard, LifecycleState::Ready);
        poison.armed = false;

        Ok(Handle::new(instance))
    }

    fn advance<C>(&self, cell: &RefCell<SlotState<C>>, next: LifecycleState) {
        cell.borrow_mut().state = next;
        tracing::debug!(state = ?next, "lifecycle");
    }

    fn add_doc_hooks<C: Lifecycle>(&self, instance: &Arc<C>, reflection: Reflection<C>) -> usize {
        let reflection = Arc::new(reflection);
        let decls = reflection.declarations(instance, &Arc::downgrade(&self.host), &self.settings);
        HookRegistrar::new(&*self.host, &self.settings).register_all(&decls)
    }

    fn slot<C: Lifecycle>(&self) -> Arc<Slot<C>> {
        let slot = Arc::clone(
            self.slots
                .lock()
                .entry(TypeId::of::<C>())
                .or_insert_with(|| Arc::new(Slot::<C>::new()) as Arc<dyn Any + Send + Sync>),
        );
        slot.downcast::<Slot<C>>()
            .expect("registry slots are keyed by TypeId")
    }

    fn existing_slot<C: Lifecycle>(&self) -> Option<Arc<Slot<C>>> {
        let slot = Arc::clone(self.slots.lock().get(&TypeId::of::<C>())?);
        slot.downcast::<Slot<C>>().ok()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("settings", &self.settings)
            .field("identities", &self.len())
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a [`Registry`].
pub struct RegistryBuilder {
    host: Arc<dyn Host>,
    settings: Settings,
    paths: Option<Arc<dyn PathResolver>>,
}

impl RegistryBuilder {
    /// Use `settings` instead of the defaults.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Resolve package paths and URLs through `resolver`.
    pub fn path_resolver(mut self, resolver: Arc<dyn PathResolver>) -> Self {
        self.paths = Some(resolver);
        self
    }

    /// Build the registry.
    pub fn build(self) -> Registry {
        Registry {
            host: self.host,
            settings: self.settings,
            paths: self.paths,
            slots: Mutex::new(HashMap::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingHost;
    use docwire_core::{CallbackError, Invocation};
    use serde_json::Value;
    use std::sync::{
        Barrier,
        atomic::{AtomicUsize, Ordering},
    };

    fn registry() -> (Registry, Arc<RecordingHost>) {
        let host = Arc::new(RecordingHost::new());
        (Registry::new(host.clone()), host)
    }

    static COUNTER_CONSTRUCTS: AtomicUsize = AtomicUsize::new(0);
    static COUNTER_INITS: AtomicUsize = AtomicUsize::new(0);

    struct Counter {
        start: AtomicUsize,
    }

    impl Lifecycle for Counter {
        type Args = usize;

        fn construct(_: Construct) -> Self {
            COUNTER_CONSTRUCTS.fetch_add(1, Ordering::SeqCst);
            Counter {
                start: AtomicUsize::new(0),
            }
        }

        fn hooks() -> Option<Reflection<Self>> {
            Some(Reflection::new("Counter", "").method("tick", 0, " @action tick", tick))
        }

        fn init(&self, args: usize) {
            COUNTER_INITS.fetch_add(1, Ordering::SeqCst);
            self.start.store(args, Ordering::SeqCst);
        }
    }

    fn tick(_: &Counter, _: Invocation<'_>) -> Result<Value, CallbackError> {
        Ok(Value::Null)
    }

    #[test]
    fn test_second_access_is_a_lookup() {
        let (registry, host) = registry();
        let before_constructs = COUNTER_CONSTRUCTS.load(Ordering::SeqCst);
        let before_inits = COUNTER_INITS.load(Ordering::SeqCst);

        let first = registry.instance::<Counter>(7).unwrap();
        let second = registry.instance::<Counter>(99).unwrap();

        assert!(Handle::ptr_eq(&first, &second));
        assert_eq!(second.start.load(Ordering::SeqCst), 7);
        assert_eq!(COUNTER_CONSTRUCTS.load(Ordering::SeqCst) - before_constructs, 1);
        assert_eq!(COUNTER_INITS.load(Ordering::SeqCst) - before_inits, 1);
        assert_eq!(host.actions("tick").len(), 1);
        assert_eq!(registry.state::<Counter>(), LifecycleState::Ready);
    }

    #[derive(Debug)]
    struct Plain {
        value: usize,
    }

    impl Lifecycle for Plain {
        type Args = usize;

        fn construct(_: Construct) -> Self {
            Plain { value: 0 }
        }
    }

    #[test]
    fn test_strict_construction_rejects_duplicate() {
        let (registry, _) = registry();
        registry.construct::<Plain>(1).unwrap();

        let err = registry.construct::<Plain>(2).unwrap_err();
        assert!(matches!(err, DocwireError::DuplicateInstantiation { .. }));
        assert!(registry.instance::<Plain>(3).is_ok());
    }

    #[test]
    fn test_get_never_constructs() {
        let (registry, _) = registry();
        assert!(registry.get::<Plain>().is_none());
        assert_eq!(registry.state::<Plain>(), LifecycleState::Uninitialized);
        assert!(registry.is_empty());

        registry.instance::<Plain>(5).unwrap();
        assert_eq!(registry.get::<Plain>().unwrap().value, 0);
        assert_eq!(registry.len(), 1);
    }

    static SLOW_CONSTRUCTS: AtomicUsize = AtomicUsize::new(0);

    struct Slow;

    impl Lifecycle for Slow {
        type Args = ();

        fn construct(_: Construct) -> Self {
            SLOW_CONSTRUCTS.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(20));
            Slow
        }
    }

    #[test]
    fn test_concurrent_first_access_constructs_once() {
        let (registry, _) = registry();
        let barrier = Barrier::new(8);

        let handles: Vec<_> = std::thread::scope(|s| {
            let workers: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        registry.instance::<Slow>(()).unwrap()
                    })
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        assert_eq!(SLOW_CONSTRUCTS.load(Ordering::SeqCst), 1);
        assert!(handles.windows(2).all(|w| Handle::ptr_eq(&w[0], &w[1])));
    }

    static REENTRY: std::sync::Mutex<Option<bool>> = std::sync::Mutex::new(None);

    struct Recursive;

    impl Lifecycle for Recursive {
        type Args = &'static Registry;

        fn construct(_: Construct) -> Self {
            Recursive
        }

        fn init(&self, registry: &'static Registry) {
            let rejected = matches!(
                registry.instance::<Recursive>(registry),
                Err(DocwireError::ReentrantInstantiation { .. })
            );
            *REENTRY.lock().unwrap() = Some(rejected && registry.get::<Recursive>().is_none());
            assert_eq!(registry.state::<Recursive>(), LifecycleState::Hooked);
        }
    }

    #[test]
    fn test_reentrant_access_is_rejected() {
        let host = Arc::new(RecordingHost::new());
        let registry: &'static Registry = Box::leak(Box::new(Registry::new(host)));

        registry.instance::<Recursive>(registry).unwrap();
        assert_eq!(*REENTRY.lock().unwrap(), Some(true));
        assert_eq!(registry.state::<Recursive>(), LifecycleState::Ready);
    }

    static FRAGILE_CONSTRUCTS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug)]
    struct Fragile;

    impl Lifecycle for Fragile {
        type Args = bool;

        fn construct(_: Construct) -> Self {
            FRAGILE_CONSTRUCTS.fetch_add(1, Ordering::SeqCst);
            Fragile
        }

        fn hooks() -> Option<Reflection<Self>> {
            Some(Reflection::new("Fragile", "").method("tick", 0, " @action fragile_tick", |_, _| {
                Ok(Value::Null)
            }))
        }

        fn init(&self, fail: bool) {
            assert!(!fail, "init failed");
        }
    }

    #[test]
    fn test_failed_sequence_is_terminal() {
        let (registry, host) = registry();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = registry.instance::<Fragile>(true);
        }));
        assert!(result.is_err());
        assert_eq!(registry.state::<Fragile>(), LifecycleState::Failed);

        let err = registry.instance::<Fragile>(false).unwrap_err();
        assert!(matches!(err, DocwireError::FailedInstantiation { .. }));
        assert!(matches!(
            registry.construct::<Fragile>(false),
            Err(DocwireError::FailedInstantiation { .. })
        ));
        assert!(registry.get::<Fragile>().is_none());

        assert_eq!(FRAGILE_CONSTRUCTS.load(Ordering::SeqCst), 1);
        assert_eq!(host.actions("fragile_tick").len(), 1);
    }

    struct Leaf;

    impl Lifecycle for Leaf {
        type Args = ();

        fn construct(_: Construct) -> Self {
            Leaf
        }
    }

    struct Branch;

    impl Lifecycle for Branch {
        type Args = &'static Registry;

        fn construct(_: Construct) -> Self {
            Branch
        }

        fn init(&self, registry: &'static Registry) {
            let leaf = std::thread::scope(|s| {
                s.spawn(|| registry.instance::<Leaf>(()).is_ok())
                    .join()
                    .unwrap()
            });
            assert!(leaf);
        }
    }

    #[test]
    fn test_other_identity_is_built_on_another_thread_during_init() {
        let host = Arc::new(RecordingHost::new());
        let registry: &'static Registry = Box::leak(Box::new(Registry::new(host)));

        registry.instance::<Branch>(registry).unwrap();
        assert_eq!(registry.state::<Leaf>(), LifecycleState::Ready);
        assert_eq!(registry.state::<Branch>(), LifecycleState::Ready);
    }
}
