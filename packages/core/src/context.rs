//! The context handed to running actions.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::handle::{CallOptions, ContextHandle, Handle};
use crate::handler::HandlerKind;
use crate::payload::{decode_value, Payload};
use crate::{Error, Namespace, Result};

/// An owned, cloneable action context.
///
/// Keys passed to its methods are local: they resolve against the action's
/// own module namespace, the way action bodies address their sibling
/// mutations. Accessors bound with a wrapper work here too via
/// [`Handle::Context`].
#[derive(Clone)]
pub struct ActionContext {
    handle: Arc<dyn ContextHandle>,
}

impl ActionContext {
    pub fn new(handle: Arc<dyn ContextHandle>) -> Self {
        Self { handle }
    }

    pub fn namespace(&self) -> &Namespace {
        self.handle.namespace()
    }

    /// Borrow as a container handle.
    pub fn handle(&self) -> Handle<'_> {
        Handle::Context(self.handle.as_ref())
    }

    /// Commit a sibling mutation with a payload.
    pub fn commit<P: Payload + Serialize>(&self, key: &str, payload: P) -> Result<()> {
        let value = payload.encode(key)?;
        self.handle.commit(key, value, CallOptions::LOCAL)
    }

    /// Commit a sibling mutation that takes no payload.
    pub fn commit_no_payload(&self, key: &str) -> Result<()> {
        self.handle.commit(key, None, CallOptions::LOCAL)
    }

    /// Dispatch a sibling action with a payload.
    pub async fn dispatch<P: Payload + Serialize, T: DeserializeOwned>(
        &self,
        key: &str,
        payload: P,
    ) -> Result<T> {
        let value = payload.encode(key)?;
        let result = self
            .handle
            .dispatch(key, value, CallOptions::LOCAL)
            .await?;
        decode_value(result, key)
    }

    /// Dispatch a sibling action that takes no payload.
    pub async fn dispatch_no_payload<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let result = self.handle.dispatch(key, None, CallOptions::LOCAL).await?;
        decode_value(result, key)
    }

    /// Read a getter of the action's own module.
    pub fn getter<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self
            .handle
            .getters()
            .get(key)?
            .ok_or_else(|| Error::UnknownKey {
                kind: HandlerKind::Getter,
                key: self.namespace().qualify(key).to_string(),
            })?;
        decode_value(value, key)
    }
}

impl<'a> From<&'a ActionContext> for Handle<'a> {
    fn from(ctx: &'a ActionContext) -> Self {
        ctx.handle()
    }
}

impl fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionContext")
            .field("namespace", self.namespace())
            .finish()
    }
}
