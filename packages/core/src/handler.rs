//! Typed handler values: getters, mutations, and actions.
//!
//! A handler is the user's function plus a [`HandlerTag`]. The tag is shared
//! by every clone of the handler, so once a module descriptor stamps its map
//! key into the tag, any copy held elsewhere (a helper, a closure, a static)
//! can recover that key without a separate lookup table.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};

use crate::context::ActionContext;
use crate::payload::NoPayload;
use crate::Result;

/// Boxed future returned by action handlers and containers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The three kinds of handler a module registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Getter,
    Mutation,
    Action,
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerKind::Getter => write!(f, "getter"),
            HandlerKind::Mutation => write!(f, "mutation"),
            HandlerKind::Action => write!(f, "action"),
        }
    }
}

/// Registration key attached to a handler.
///
/// Set at most once. Later stamps with a different key are ignored so a
/// handler's identity stays stable for the life of the process.
#[derive(Debug, Default)]
pub struct HandlerTag {
    key: OnceLock<String>,
}

impl HandlerTag {
    /// The key the handler was registered under, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.get().map(String::as_str)
    }

    /// Stamp `key` and return the key the handler actually carries.
    pub(crate) fn stamp(&self, key: &str) -> &str {
        self.key.get_or_init(|| key.to_string())
    }
}

/// A getter: derives a value from module state and root state.
pub struct Getter<S, R, T> {
    func: Arc<dyn Fn(&S, &R) -> T + Send + Sync>,
    tag: Arc<HandlerTag>,
}

impl<S, R, T> Getter<S, R, T> {
    /// Wrap a getter function. The result is untagged until registered.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&S, &R) -> T + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            tag: Arc::default(),
        }
    }

    /// Invoke the getter directly.
    pub fn call(&self, state: &S, root: &R) -> T {
        (self.func)(state, root)
    }

    /// Registration key, once tagged.
    pub fn key(&self) -> Option<&str> {
        self.tag.key()
    }

    pub(crate) fn tag(&self) -> &Arc<HandlerTag> {
        &self.tag
    }
}

impl<S, R, T> Clone for Getter<S, R, T> {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
            tag: self.tag.clone(),
        }
    }
}

impl<S, R, T> fmt::Debug for Getter<S, R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Getter").field("key", &self.key()).finish()
    }
}

/// A mutation: changes module state synchronously.
pub struct Mutation<S, P> {
    func: Arc<dyn Fn(&mut S, P) + Send + Sync>,
    tag: Arc<HandlerTag>,
}

impl<S, P> Mutation<S, P> {
    /// Wrap a mutation function taking a payload.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&mut S, P) + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            tag: Arc::default(),
        }
    }

    /// Apply the mutation directly.
    pub fn call(&self, state: &mut S, payload: P) {
        (self.func)(state, payload)
    }

    pub fn key(&self) -> Option<&str> {
        self.tag.key()
    }

    pub(crate) fn tag(&self) -> &Arc<HandlerTag> {
        &self.tag
    }
}

impl<S: 'static> Mutation<S, NoPayload> {
    /// Wrap a mutation function that takes no payload.
    pub fn no_payload<F>(func: F) -> Self
    where
        F: Fn(&mut S) + Send + Sync + 'static,
    {
        Self::new(move |state: &mut S, _: NoPayload| func(state))
    }
}

impl<S, P> Clone for Mutation<S, P> {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
            tag: self.tag.clone(),
        }
    }
}

impl<S, P> fmt::Debug for Mutation<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutation").field("key", &self.key()).finish()
    }
}

type ActionFn<P, T> = dyn Fn(ActionContext, P) -> BoxFuture<'static, Result<T>> + Send + Sync;

/// An action: orchestrates commits and dispatches, resolving asynchronously.
///
/// `S` and `R` are not used by the function itself; they tie the action to
/// its module so a wrapper only accepts actions of its own module.
pub struct Action<S, R, P, T> {
    func: Arc<ActionFn<P, T>>,
    tag: Arc<HandlerTag>,
    _module: PhantomData<fn(&S, &R)>,
}

impl<S: 'static, R: 'static, P: 'static, T: 'static> Action<S, R, P, T> {
    /// Wrap an async action function taking a payload.
    pub fn new<F, Fut>(func: F) -> Self
    where
        F: Fn(ActionContext, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let func: Arc<ActionFn<P, T>> =
            Arc::new(move |ctx: ActionContext, payload: P| -> BoxFuture<'static, Result<T>> {
                Box::pin(func(ctx, payload))
            });
        Self {
            func,
            tag: Arc::default(),
            _module: PhantomData,
        }
    }

    /// Wrap a synchronous action function.
    ///
    /// Dispatching it still yields a future, like any other action.
    pub fn sync<F>(func: F) -> Self
    where
        F: Fn(&ActionContext, P) -> Result<T> + Send + Sync + 'static,
        P: Send,
        T: Send,
    {
        let func = Arc::new(func);
        Self::new(move |ctx: ActionContext, payload: P| {
            let func = func.clone();
            async move { func(&ctx, payload) }
        })
    }
}

impl<S, R, P, T> Action<S, R, P, T> {
    /// Run the action directly against a context.
    pub fn call(&self, ctx: ActionContext, payload: P) -> BoxFuture<'static, Result<T>> {
        (self.func)(ctx, payload)
    }

    pub fn key(&self) -> Option<&str> {
        self.tag.key()
    }

    pub(crate) fn tag(&self) -> &Arc<HandlerTag> {
        &self.tag
    }
}

impl<S: 'static, R: 'static, T: 'static> Action<S, R, NoPayload, T> {
    /// Wrap an async action function that takes no payload.
    pub fn no_payload<F, Fut>(func: F) -> Self
    where
        F: Fn(ActionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self::new(move |ctx: ActionContext, _: NoPayload| func(ctx))
    }
}

impl<S, R, P, T> Clone for Action<S, R, P, T> {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
            tag: self.tag.clone(),
            _module: PhantomData,
        }
    }
}

impl<S, R, P, T> fmt::Debug for Action<S, R, P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("key", &self.key()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_is_set_once() {
        let tag = HandlerTag::default();
        assert_eq!(tag.key(), None);

        assert_eq!(tag.stamp("items"), "items");
        assert_eq!(tag.stamp("items"), "items");
        assert_eq!(tag.stamp("other"), "items");
        assert_eq!(tag.key(), Some("items"));
    }

    #[test]
    fn clones_share_the_tag() {
        let getter: Getter<Vec<u32>, (), usize> = Getter::new(|state: &Vec<u32>, _| state.len());
        let copy = getter.clone();

        getter.tag().stamp("count");

        assert_eq!(copy.key(), Some("count"));
        assert_eq!(copy.call(&vec![1, 2, 3], &()), 3);
    }

    #[test]
    fn no_payload_mutation_ignores_marker() {
        let reset: Mutation<Vec<u32>, NoPayload> = Mutation::no_payload(|state: &mut Vec<u32>| state.clear());
        let mut state = vec![1, 2];

        reset.call(&mut state, NoPayload);

        assert!(state.is_empty());
    }

    #[test]
    fn handler_kind_display() {
        assert_eq!(HandlerKind::Getter.to_string(), "getter");
        assert_eq!(HandlerKind::Mutation.to_string(), "mutation");
        assert_eq!(HandlerKind::Action.to_string(), "action");
    }
}
