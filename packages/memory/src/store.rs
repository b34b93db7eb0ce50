//! The in-memory store: a flattened module tree behind one state lock.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use statebind_core::module::{ErasedAction, ErasedGetter, ErasedModule, ErasedMutation, ModuleState};
use statebind_core::{
    tag_handlers, ActionContext, BoxFuture, CallOptions, Error, GetterView, Handle, HandlerKind,
    ModuleDescriptor, Namespace, Operations, Result, StoreHandle,
};

use crate::context::MemoryContext;

const ROOT_MODULE: usize = 0;

thread_local! {
    /// Stores whose state lock the current thread is holding.
    static HELD_STATE: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks one store's state lock as held by the current thread.
///
/// `std::sync::RwLock` is not re-entrant: a thread that asks for the lock
/// while already holding it blocks forever. Every state access enters a
/// scope first, so re-entry fails with `Error::StateLockHeld` instead.
struct StateScope {
    store: usize,
}

impl StateScope {
    fn enter(inner: &Inner) -> Result<Self> {
        let store = inner as *const Inner as usize;
        HELD_STATE.with(|held| {
            let mut held = held.borrow_mut();
            if held.contains(&store) {
                return Err(Error::StateLockHeld);
            }
            held.push(store);
            Ok(Self { store })
        })
    }
}

impl Drop for StateScope {
    fn drop(&mut self) {
        HELD_STATE.with(|held| held.borrow_mut().retain(|store| *store != self.store));
    }
}

/// A mutation that was applied, as seen by subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRecord {
    /// Fully-qualified mutation key.
    pub key: String,
    pub payload: Option<Value>,
}

/// Identifies a subscription for [`MemoryStore::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Arc<dyn Fn(&MutationRecord) + Send + Sync>;

struct Registered<E> {
    module: usize,
    handler: E,
}

struct ModuleInfo {
    /// Mount path, one component per module name.
    path: Namespace,
    /// Prefix of the module's keys; only namespaced modules contribute.
    namespace: Namespace,
}

pub(crate) struct Inner {
    states: RwLock<Vec<ModuleState>>,
    modules: Vec<ModuleInfo>,
    getters: BTreeMap<String, Registered<ErasedGetter>>,
    mutations: BTreeMap<String, Registered<ErasedMutation>>,
    actions: BTreeMap<String, Registered<ErasedAction>>,
    subscribers: RwLock<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: AtomicU64,
}

/// An in-memory state container.
///
/// Modules are registered once, at construction, from a root
/// [`ModuleDescriptor`]. Registration tags every handler, so wrappers can
/// bind them as soon as the store exists.
///
/// Cloning is cheap and every clone shares the same state.
///
/// # Example
///
/// ```rust
/// use statebind_core::{AccessorWrapper, ModuleDescriptor};
/// use statebind_memory::MemoryStore;
///
/// struct Root {
///     language: String,
/// }
///
/// let mut root: ModuleDescriptor<Root, Root> = ModuleDescriptor::new(Root {
///     language: "en-US".to_string(),
/// });
/// let language = root.getter("language", |state: &Root, _: &Root| state.language.clone());
/// let set_language = root.mutation("SET_LANGUAGE", |state: &mut Root, value: String| {
///     state.language = value;
/// });
///
/// let store = MemoryStore::new(root).unwrap();
/// let wrapper: AccessorWrapper<Root, Root> = AccessorWrapper::root();
///
/// wrapper.commit(&set_language).unwrap().commit_with(&store, "es".to_string()).unwrap();
/// assert_eq!(wrapper.read(&language).unwrap().read(&store).unwrap(), "es");
/// ```
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// Tag and register a module tree.
    ///
    /// Fails with `Error::DuplicateKey` if two handlers of the same kind end
    /// up with the same qualified key.
    pub fn new<R>(root: ModuleDescriptor<R, R>) -> Result<Self>
    where
        R: Send + Sync + 'static,
    {
        let report = tag_handlers(&root);
        let mut builder = Builder::default();
        builder.register(root.into_erased(), Namespace::root(), Namespace::root())?;

        tracing::debug!(
            modules = builder.modules.len(),
            handlers = report.total(),
            "registered module tree"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                states: RwLock::new(builder.states),
                modules: builder.modules,
                getters: builder.getters,
                mutations: builder.mutations,
                actions: builder.actions,
                subscribers: RwLock::new(Vec::new()),
                next_subscription: AtomicU64::new(0),
            }),
        })
    }

    /// Call `f` after every applied mutation, in commit order.
    pub fn subscribe<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&MutationRecord) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_subscription.fetch_add(1, Ordering::Relaxed));
        match self.inner.subscribers.write() {
            Ok(mut subscribers) => subscribers.push((id, Arc::new(f))),
            Err(poisoned) => poisoned.into_inner().push((id, Arc::new(f))),
        }
        id
    }

    /// Stop calling a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = match self.inner.subscribers.write() {
            Ok(subscribers) => subscribers,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    /// Inspect the state of the module mounted at `path` (`""` for root).
    ///
    /// `f` runs with the state lock held. Reads and commits against this
    /// store from inside `f` fail with `Error::StateLockHeld`.
    pub fn with_state<S, T>(&self, path: &str, f: impl FnOnce(&S) -> T) -> Result<T>
    where
        S: 'static,
    {
        let path = Namespace::new(path);
        let index = self
            .inner
            .modules
            .iter()
            .position(|module| module.path == path)
            .ok_or_else(|| Error::UnknownModule {
                path: path.to_string(),
            })?;

        let _scope = StateScope::enter(&self.inner)?;
        let states = self.inner.states.read().map_err(|_| Error::LockPoisoned)?;
        let state = states[index]
            .downcast_ref::<S>()
            .ok_or_else(|| Error::StateType {
                key: path.to_string(),
            })?;
        Ok(f(state))
    }
}

impl Inner {
    pub(crate) fn commit_in(
        &self,
        namespace: &Namespace,
        key: &str,
        payload: Option<Value>,
        options: CallOptions,
    ) -> Result<()> {
        let key = resolve(namespace, key, options);
        let mutation = self.mutations.get(&key).ok_or_else(|| Error::UnknownKey {
            kind: HandlerKind::Mutation,
            key: key.clone(),
        })?;

        tracing::trace!(%key, "commit");
        let record = MutationRecord { key, payload };
        {
            let _scope = StateScope::enter(self)?;
            let mut states = self.states.write().map_err(|_| Error::LockPoisoned)?;
            (mutation.handler)(&mut *states[mutation.module], record.payload.clone())?;
        }

        self.notify(&record);
        Ok(())
    }

    /// Start an action. The returned future owns everything it needs.
    pub(crate) fn start_dispatch(
        self: &Arc<Self>,
        namespace: &Namespace,
        key: &str,
        payload: Option<Value>,
        options: CallOptions,
    ) -> Result<BoxFuture<'static, Result<Value>>> {
        let key = resolve(namespace, key, options);
        let action = self.actions.get(&key).ok_or_else(|| Error::UnknownKey {
            kind: HandlerKind::Action,
            key: key.clone(),
        })?;

        tracing::trace!(%key, "dispatch");
        let module_namespace = self.modules[action.module].namespace.clone();
        let ctx = ActionContext::new(Arc::new(MemoryContext::new(self.clone(), module_namespace)));
        Ok((action.handler)(ctx, payload))
    }

    fn notify(&self, record: &MutationRecord) {
        let subscribers: Vec<Subscriber> = match self.subscribers.read() {
            Ok(subscribers) => subscribers.iter().map(|(_, f)| f.clone()).collect(),
            Err(poisoned) => poisoned.into_inner().iter().map(|(_, f)| f.clone()).collect(),
        };
        for subscriber in subscribers {
            subscriber(record);
        }
    }
}

impl GetterView for Inner {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let Some(getter) = self.getters.get(key) else {
            return Ok(None);
        };

        let _scope = StateScope::enter(self)?;
        let states = self.states.read().map_err(|_| Error::LockPoisoned)?;
        let value = (getter.handler)(&*states[getter.module], &*states[ROOT_MODULE])?;
        Ok(Some(value))
    }
}

fn resolve(namespace: &Namespace, key: &str, options: CallOptions) -> String {
    if options.root {
        key.to_string()
    } else {
        namespace.qualify(key).to_string()
    }
}

#[async_trait]
impl Operations for MemoryStore {
    fn commit(&self, key: &str, payload: Option<Value>, options: CallOptions) -> Result<()> {
        self.inner.commit_in(&Namespace::root(), key, payload, options)
    }

    async fn dispatch(
        &self,
        key: &str,
        payload: Option<Value>,
        options: CallOptions,
    ) -> Result<Value> {
        self.inner
            .start_dispatch(&Namespace::root(), key, payload, options)?
            .await
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("modules", &self.inner.modules.len())
            .field("getters", &self.inner.getters.len())
            .field("mutations", &self.inner.mutations.len())
            .field("actions", &self.inner.actions.len())
            .finish()
    }
}

impl StoreHandle for MemoryStore {
    fn getters(&self) -> &dyn GetterView {
        self.inner.as_ref()
    }
}

impl<'a> From<&'a MemoryStore> for Handle<'a> {
    fn from(store: &'a MemoryStore) -> Self {
        Handle::Store(store)
    }
}

#[derive(Default)]
struct Builder {
    states: Vec<ModuleState>,
    modules: Vec<ModuleInfo>,
    getters: BTreeMap<String, Registered<ErasedGetter>>,
    mutations: BTreeMap<String, Registered<ErasedMutation>>,
    actions: BTreeMap<String, Registered<ErasedAction>>,
}

impl Builder {
    fn register(
        &mut self,
        module: ErasedModule,
        path: Namespace,
        namespace: Namespace,
    ) -> Result<()> {
        let index = self.states.len();
        self.states.push(module.state);

        for (name, handler) in module.getters {
            let key = namespace.qualify(&name).to_string();
            insert_unique(&mut self.getters, HandlerKind::Getter, key, index, handler)?;
        }
        for (name, handler) in module.mutations {
            let key = namespace.qualify(&name).to_string();
            insert_unique(&mut self.mutations, HandlerKind::Mutation, key, index, handler)?;
        }
        for (name, handler) in module.actions {
            let key = namespace.qualify(&name).to_string();
            insert_unique(&mut self.actions, HandlerKind::Action, key, index, handler)?;
        }

        tracing::debug!(path = %path, namespace = %namespace, "registered module");
        self.modules.push(ModuleInfo {
            path: path.clone(),
            namespace: namespace.clone(),
        });

        for (name, child) in module.modules {
            let child_namespace = if child.namespaced {
                namespace.child(&name)
            } else {
                namespace.clone()
            };
            self.register(child, path.child(&name), child_namespace)?;
        }
        Ok(())
    }
}

fn insert_unique<E>(
    table: &mut BTreeMap<String, Registered<E>>,
    kind: HandlerKind,
    key: String,
    module: usize,
    handler: E,
) -> Result<()> {
    if table.contains_key(&key) {
        return Err(Error::DuplicateKey { kind, key });
    }
    table.insert(key, Registered { module, handler });
    Ok(())
}
