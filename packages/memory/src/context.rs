//! Action contexts handed out by the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use statebind_core::{CallOptions, ContextHandle, GetterView, Namespace, Operations, Result};

use crate::store::Inner;

/// Getters of one module, addressed by local key.
struct LocalGetters {
    inner: Arc<Inner>,
    namespace: Namespace,
}

impl GetterView for LocalGetters {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        self.inner.get(self.namespace.qualify(key).as_str())
    }
}

/// Context for one running action.
///
/// Local keys resolve against the namespace of the module that registered
/// the action.
pub struct MemoryContext {
    inner: Arc<Inner>,
    local: LocalGetters,
}

impl MemoryContext {
    pub(crate) fn new(inner: Arc<Inner>, namespace: Namespace) -> Self {
        Self {
            local: LocalGetters {
                inner: inner.clone(),
                namespace,
            },
            inner,
        }
    }
}

#[async_trait]
impl Operations for MemoryContext {
    fn commit(&self, key: &str, payload: Option<Value>, options: CallOptions) -> Result<()> {
        self.inner
            .commit_in(&self.local.namespace, key, payload, options)
    }

    async fn dispatch(
        &self,
        key: &str,
        payload: Option<Value>,
        options: CallOptions,
    ) -> Result<Value> {
        self.inner
            .start_dispatch(&self.local.namespace, key, payload, options)?
            .await
    }
}

impl ContextHandle for MemoryContext {
    fn getters(&self) -> &dyn GetterView {
        &self.local
    }

    fn root_getters(&self) -> &dyn GetterView {
        self.inner.as_ref()
    }

    fn namespace(&self) -> &Namespace {
        &self.local.namespace
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use statebind_core::{Handle, ModuleDescriptor, Operations};

    use crate::MemoryStore;

    use super::*;

    struct Root;

    struct Counter {
        count: i64,
    }

    fn store() -> MemoryStore {
        let mut counter: ModuleDescriptor<Counter, Root> =
            ModuleDescriptor::new(Counter { count: 3 }).namespaced();
        counter.getter("count", |state: &Counter, _: &Root| state.count);
        counter.mutation("SET", |state: &mut Counter, count: i64| state.count = count);
        counter.action_no_payload("views", |ctx| async move {
            let Handle::Context(handle) = ctx.handle() else {
                panic!("actions receive a context handle");
            };
            Ok((
                handle.getters().get("count")?,
                handle.getters().get("counter/count")?,
                handle.root_getters().get("counter/count")?,
                handle.namespace().to_string(),
            ))
        });
        counter.mutation_no_payload("CLEAR", |state: &mut Counter| state.count = 0);
        counter.action("double", |_ctx, n: i64| async move { Ok(n * 2) });
        counter.action_no_payload("chain", |ctx| async move {
            ctx.commit_no_payload("CLEAR")?;
            let doubled: i64 = ctx.dispatch("double", 21).await?;
            ctx.commit("SET", doubled)?;
            ctx.getter::<i64>("count")
        });
        counter.action("setViaRoot", |ctx, count: i64| async move {
            ctx.handle()
                .commit("counter/SET", Some(json!(count)), CallOptions::ROOT)
        });

        let mut root: ModuleDescriptor<Root, Root> = ModuleDescriptor::new(Root);
        root.module("counter", counter);
        MemoryStore::new(root).unwrap()
    }

    #[tokio::test]
    async fn local_view_uses_module_keys() {
        let store = store();

        let views = store
            .dispatch("counter/views", None, CallOptions::ROOT)
            .await
            .unwrap();

        assert_eq!(views, json!([3, null, 3, "counter"]));
    }

    #[tokio::test]
    async fn context_calls_resolve_against_module() {
        let store = store();

        let count = store
            .dispatch("counter/chain", None, CallOptions::ROOT)
            .await
            .unwrap();

        assert_eq!(count, json!(42));
    }

    #[tokio::test]
    async fn root_option_bypasses_module_namespace() {
        let store = store();

        store
            .dispatch("counter/setViaRoot", Some(json!(9)), CallOptions::ROOT)
            .await
            .unwrap();

        assert_eq!(store.with_state("counter", |s: &Counter| s.count).unwrap(), 9);
    }
}
