//! Module descriptors: state plus named getters, mutations, and actions.
//!
//! A descriptor is what application code hands to a container. Each entry
//! keeps the typed handler's tag next to a type-erased form of the handler
//! that the container can call with `serde_json::Value` payloads.
//!
//! # Example
//!
//! ```rust
//! use statebind_core::ModuleDescriptor;
//!
//! #[derive(Default)]
//! struct Counter {
//!     count: u32,
//! }
//!
//! let mut module: ModuleDescriptor<Counter, Counter> = ModuleDescriptor::new(Counter::default());
//! let count = module.getter("count", |state: &Counter, _root: &Counter| state.count);
//! let bump = module.mutation_no_payload("BUMP", |state: &mut Counter| state.count += 1);
//!
//! assert_eq!(module.getters().len(), 1);
//! assert_eq!(count.key(), None); // tagged at registration
//! # let _ = bump;
//! ```

use std::any::Any;
use std::collections::BTreeMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::context::ActionContext;
use crate::handler::{Action, BoxFuture, Getter, HandlerKind, HandlerTag, Mutation};
use crate::payload::{encode_value, NoPayload, Payload};
use crate::{Error, Result};

/// Type-erased module state.
pub type ModuleState = Box<dyn Any + Send + Sync>;

/// Type-erased getter: `(module state, root state) -> value`.
pub type ErasedGetter =
    Arc<dyn Fn(&(dyn Any + Send + Sync), &(dyn Any + Send + Sync)) -> Result<Value> + Send + Sync>;

/// Type-erased mutation: `(module state, payload)`.
pub type ErasedMutation =
    Arc<dyn Fn(&mut (dyn Any + Send + Sync), Option<Value>) -> Result<()> + Send + Sync>;

/// Type-erased action: `(context, payload) -> future result`.
pub type ErasedAction =
    Arc<dyn Fn(ActionContext, Option<Value>) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// One named handler in a table.
pub struct Entry<E> {
    tag: Arc<HandlerTag>,
    handler: E,
}

impl<E> Entry<E> {
    pub(crate) fn tag(&self) -> &HandlerTag {
        &self.tag
    }

    pub fn handler(&self) -> &E {
        &self.handler
    }
}

/// Handlers of one kind, keyed by name.
pub struct HandlerTable<E> {
    kind: HandlerKind,
    entries: BTreeMap<String, Entry<E>>,
}

impl<E> HandlerTable<E> {
    fn new(kind: HandlerKind) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
        }
    }

    fn insert(&mut self, name: &str, tag: Arc<HandlerTag>, handler: E) {
        if self
            .entries
            .insert(name.to_string(), Entry { tag, handler })
            .is_some()
        {
            tracing::warn!(kind = %self.kind, name, "replaced handler registered under the same name");
        }
    }

    pub fn kind(&self) -> HandlerKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&E> {
        self.entries.get(name).map(Entry::handler)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry<E>)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }
}

impl<E> IntoIterator for HandlerTable<E> {
    type Item = (String, E);
    type IntoIter = std::iter::Map<
        std::collections::btree_map::IntoIter<String, Entry<E>>,
        fn((String, Entry<E>)) -> (String, E),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .into_iter()
            .map(unwrap_entry as fn((String, Entry<E>)) -> (String, E))
    }
}

fn unwrap_entry<E>((name, entry): (String, Entry<E>)) -> (String, E) {
    (name, entry.handler)
}

/// A module with its state type erased, ready for a container.
pub struct ErasedModule {
    pub state: ModuleState,
    pub namespaced: bool,
    pub getters: HandlerTable<ErasedGetter>,
    pub mutations: HandlerTable<ErasedMutation>,
    pub actions: HandlerTable<ErasedAction>,
    pub modules: BTreeMap<String, ErasedModule>,
}

/// A module under construction.
///
/// `S` is the module's state, `R` the root module's state. The root module
/// itself is a `ModuleDescriptor<R, R>`.
pub struct ModuleDescriptor<S, R> {
    state: S,
    namespaced: bool,
    getters: HandlerTable<ErasedGetter>,
    mutations: HandlerTable<ErasedMutation>,
    actions: HandlerTable<ErasedAction>,
    modules: BTreeMap<String, ErasedModule>,
    _root: PhantomData<fn() -> R>,
}

impl<S, R> ModuleDescriptor<S, R>
where
    S: Send + Sync + 'static,
    R: 'static,
{
    pub fn new(state: S) -> Self {
        Self {
            state,
            namespaced: false,
            getters: HandlerTable::new(HandlerKind::Getter),
            mutations: HandlerTable::new(HandlerKind::Mutation),
            actions: HandlerTable::new(HandlerKind::Action),
            modules: BTreeMap::new(),
            _root: PhantomData,
        }
    }

    /// Register this module's keys under its own name when mounted.
    #[must_use]
    pub fn namespaced(mut self) -> Self {
        self.namespaced = true;
        self
    }

    pub fn is_namespaced(&self) -> bool {
        self.namespaced
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Define and register a getter.
    pub fn getter<T, F>(&mut self, name: &str, func: F) -> Getter<S, R, T>
    where
        T: Serialize + DeserializeOwned + 'static,
        F: Fn(&S, &R) -> T + Send + Sync + 'static,
    {
        let handler = Getter::new(func);
        self.insert_getter(name, &handler);
        handler
    }

    /// Register an existing getter under `name`.
    pub fn insert_getter<T>(&mut self, name: &str, handler: &Getter<S, R, T>)
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        let typed = handler.clone();
        let key = name.to_string();
        let erased: ErasedGetter = Arc::new(
            move |state: &(dyn Any + Send + Sync), root: &(dyn Any + Send + Sync)| {
                let state = state
                    .downcast_ref::<S>()
                    .ok_or_else(|| Error::StateType { key: key.clone() })?;
                let root = root
                    .downcast_ref::<R>()
                    .ok_or_else(|| Error::StateType { key: key.clone() })?;
                encode_value(&typed.call(state, root), &key)
            },
        );
        self.getters.insert(name, handler.tag().clone(), erased);
    }

    /// Define and register a mutation taking a payload.
    pub fn mutation<P, F>(&mut self, name: &str, func: F) -> Mutation<S, P>
    where
        P: Payload,
        F: Fn(&mut S, P) + Send + Sync + 'static,
    {
        let handler = Mutation::new(func);
        self.insert_mutation(name, &handler);
        handler
    }

    /// Define and register a mutation without payload.
    pub fn mutation_no_payload<F>(&mut self, name: &str, func: F) -> Mutation<S, NoPayload>
    where
        F: Fn(&mut S) + Send + Sync + 'static,
    {
        let handler = Mutation::no_payload(func);
        self.insert_mutation(name, &handler);
        handler
    }

    /// Register an existing mutation under `name`.
    pub fn insert_mutation<P: Payload>(&mut self, name: &str, handler: &Mutation<S, P>) {
        let typed = handler.clone();
        let key = name.to_string();
        let erased: ErasedMutation = Arc::new(
            move |state: &mut (dyn Any + Send + Sync), payload: Option<Value>| {
                let state = state
                    .downcast_mut::<S>()
                    .ok_or_else(|| Error::StateType { key: key.clone() })?;
                typed.call(state, P::decode(payload, &key)?);
                Ok(())
            },
        );
        self.mutations.insert(name, handler.tag().clone(), erased);
    }

    /// Define and register an async action taking a payload.
    pub fn action<P, T, F, Fut>(&mut self, name: &str, func: F) -> Action<S, R, P, T>
    where
        P: Payload,
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn(ActionContext, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let handler = Action::new(func);
        self.insert_action(name, &handler);
        handler
    }

    /// Define and register an async action without payload.
    pub fn action_no_payload<T, F, Fut>(
        &mut self,
        name: &str,
        func: F,
    ) -> Action<S, R, NoPayload, T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn(ActionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let handler = Action::no_payload(func);
        self.insert_action(name, &handler);
        handler
    }

    /// Define and register a synchronous action.
    pub fn sync_action<P, T, F>(&mut self, name: &str, func: F) -> Action<S, R, P, T>
    where
        P: Payload,
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn(&ActionContext, P) -> Result<T> + Send + Sync + 'static,
    {
        let handler = Action::sync(func);
        self.insert_action(name, &handler);
        handler
    }

    /// Register an existing action under `name`.
    pub fn insert_action<P, T>(&mut self, name: &str, handler: &Action<S, R, P, T>)
    where
        P: Payload,
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        let typed = handler.clone();
        let key = name.to_string();
        let erased: ErasedAction = Arc::new(
            move |ctx: ActionContext, payload: Option<Value>| -> BoxFuture<'static, Result<Value>> {
                let typed = typed.clone();
                let key = key.clone();
                Box::pin(async move {
                    let payload = P::decode(payload, &key)?;
                    let result = typed.call(ctx, payload).await?;
                    encode_value(&result, &key)
                })
            },
        );
        self.actions.insert(name, handler.tag().clone(), erased);
    }

    /// Mount a child module under `name`.
    pub fn module<C>(&mut self, name: &str, child: ModuleDescriptor<C, R>)
    where
        C: Send + Sync + 'static,
    {
        if self
            .modules
            .insert(name.to_string(), child.into_erased())
            .is_some()
        {
            tracing::warn!(name, "replaced child module registered under the same name");
        }
    }

    pub fn getters(&self) -> &HandlerTable<ErasedGetter> {
        &self.getters
    }

    pub fn mutations(&self) -> &HandlerTable<ErasedMutation> {
        &self.mutations
    }

    pub fn actions(&self) -> &HandlerTable<ErasedAction> {
        &self.actions
    }

    pub fn modules(&self) -> &BTreeMap<String, ErasedModule> {
        &self.modules
    }

    /// Erase the state type for a container.
    pub fn into_erased(self) -> ErasedModule {
        ErasedModule {
            state: Box::new(self.state),
            namespaced: self.namespaced,
            getters: self.getters,
            mutations: self.mutations,
            actions: self.actions,
            modules: self.modules,
        }
    }
}
