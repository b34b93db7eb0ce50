//! The string-keyed interface a state container exposes.
//!
//! Containers hand out two kinds of handle:
//! - a store handle, whose `getters` view is keyed by fully-qualified keys;
//! - an action-context handle, passed to running actions, whose `getters`
//!   view is local to the action's module and whose `root_getters` view is
//!   keyed by fully-qualified keys.
//!
//! [`Handle`] is the sum of the two. Accessors match on it to pick the view
//! that understands qualified keys.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::{Namespace, Result};

/// How a container resolves the key of a commit or dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Resolve against the root of the namespace tree instead of the
    /// caller's own module.
    pub root: bool,
}

impl CallOptions {
    /// Key is already fully qualified.
    pub const ROOT: CallOptions = CallOptions { root: true };

    /// Key is relative to the calling context's namespace.
    pub const LOCAL: CallOptions = CallOptions { root: false };
}

/// A read-only view of getter values.
pub trait GetterView: Send + Sync {
    /// Current value of the getter registered under `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - No getter under that key.
    /// * `Ok(Some(value))` - The getter's current value.
    /// * `Err(Error)` - Evaluating the getter failed.
    fn get(&self, key: &str) -> Result<Option<Value>>;
}

/// Commit and dispatch by key.
#[async_trait]
pub trait Operations: Send + Sync {
    /// Apply a mutation synchronously.
    fn commit(&self, key: &str, payload: Option<Value>, options: CallOptions) -> Result<()>;

    /// Run an action, resolving once it completes.
    async fn dispatch(
        &self,
        key: &str,
        payload: Option<Value>,
        options: CallOptions,
    ) -> Result<Value>;
}

/// A handle on the whole store.
pub trait StoreHandle: Operations {
    /// Getters keyed by fully-qualified key.
    fn getters(&self) -> &dyn GetterView;
}

/// A handle passed to a running action.
pub trait ContextHandle: Operations {
    /// Getters of the action's own module, keyed by local key.
    fn getters(&self) -> &dyn GetterView;

    /// Getters of the whole store, keyed by fully-qualified key.
    fn root_getters(&self) -> &dyn GetterView;

    /// Namespace that local keys resolve against.
    fn namespace(&self) -> &Namespace;
}

/// Either kind of container handle.
#[derive(Clone, Copy)]
pub enum Handle<'a> {
    Store(&'a dyn StoreHandle),
    Context(&'a dyn ContextHandle),
}

impl<'a> Handle<'a> {
    /// The view keyed by fully-qualified keys, whatever the handle kind.
    pub fn qualified_getters(self) -> &'a dyn GetterView {
        match self {
            Handle::Store(store) => store.getters(),
            Handle::Context(ctx) => ctx.root_getters(),
        }
    }

    pub fn commit(self, key: &str, payload: Option<Value>, options: CallOptions) -> Result<()> {
        match self {
            Handle::Store(store) => store.commit(key, payload, options),
            Handle::Context(ctx) => ctx.commit(key, payload, options),
        }
    }

    pub async fn dispatch(
        self,
        key: &str,
        payload: Option<Value>,
        options: CallOptions,
    ) -> Result<Value> {
        match self {
            Handle::Store(store) => store.dispatch(key, payload, options).await,
            Handle::Context(ctx) => ctx.dispatch(key, payload, options).await,
        }
    }
}

impl fmt::Debug for Handle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handle::Store(_) => f.write_str("Handle::Store"),
            Handle::Context(ctx) => write!(f, "Handle::Context({})", ctx.namespace()),
        }
    }
}

// Plain maps work as getter views, mostly for tests and snapshots.

impl GetterView for BTreeMap<String, Value> {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(BTreeMap::get(self, key).cloned())
    }
}

impl GetterView for HashMap<String, Value> {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(HashMap::get(self, key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FlatStore {
        getters: BTreeMap<String, Value>,
    }

    #[async_trait]
    impl Operations for FlatStore {
        fn commit(&self, _key: &str, _payload: Option<Value>, _options: CallOptions) -> Result<()> {
            Ok(())
        }

        async fn dispatch(
            &self,
            key: &str,
            _payload: Option<Value>,
            _options: CallOptions,
        ) -> Result<Value> {
            Ok(json!(key))
        }
    }

    impl StoreHandle for FlatStore {
        fn getters(&self) -> &dyn GetterView {
            &self.getters
        }
    }

    struct NestedContext {
        namespace: Namespace,
        local: BTreeMap<String, Value>,
        root: BTreeMap<String, Value>,
    }

    #[async_trait]
    impl Operations for NestedContext {
        fn commit(&self, _key: &str, _payload: Option<Value>, _options: CallOptions) -> Result<()> {
            Ok(())
        }

        async fn dispatch(
            &self,
            _key: &str,
            _payload: Option<Value>,
            _options: CallOptions,
        ) -> Result<Value> {
            Ok(Value::Null)
        }
    }

    impl ContextHandle for NestedContext {
        fn getters(&self) -> &dyn GetterView {
            &self.local
        }

        fn root_getters(&self) -> &dyn GetterView {
            &self.root
        }

        fn namespace(&self) -> &Namespace {
            &self.namespace
        }
    }

    #[test]
    fn context_handle_reads_root_getters() {
        let mut root = BTreeMap::new();
        root.insert("basket/amount".to_string(), json!(60));
        let mut local = BTreeMap::new();
        local.insert("amount".to_string(), json!(60));

        let ctx = NestedContext {
            namespace: Namespace::new("basket"),
            local,
            root,
        };
        let handle = Handle::Context(&ctx);

        let view = handle.qualified_getters();
        assert_eq!(view.get("basket/amount").unwrap(), Some(json!(60)));
        assert_eq!(view.get("amount").unwrap(), None);
    }

    #[tokio::test]
    async fn store_handle_dispatches() {
        let store = FlatStore {
            getters: BTreeMap::new(),
        };
        let handle = Handle::Store(&store);

        let result = handle
            .dispatch("changeLanguage", None, CallOptions::ROOT)
            .await
            .unwrap();
        assert_eq!(result, json!("changeLanguage"));
        assert_eq!(format!("{:?}", handle), "Handle::Store");
    }

    #[test]
    fn default_options_are_local() {
        assert_eq!(CallOptions::default(), CallOptions::LOCAL);
        assert!(CallOptions::ROOT.root);
    }
}
