//! Bound accessors produced by an [`AccessorWrapper`](crate::AccessorWrapper).
//!
//! Each accessor holds one qualified key and nothing else. They are cheap
//! to clone, `Send + Sync`, and can be stored for as long as needed. No
//! accessor touches a container until it is called with a handle.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::handle::{CallOptions, Handle};
use crate::handler::HandlerKind;
use crate::payload::{decode_value, NoPayload, Payload};
use crate::{Error, QualifiedKey, Result};

/// Reads one getter.
pub struct ReadAccessor<T> {
    key: QualifiedKey,
    _result: PhantomData<fn() -> T>,
}

impl<T> ReadAccessor<T> {
    pub(crate) fn new(key: QualifiedKey) -> Self {
        Self {
            key,
            _result: PhantomData,
        }
    }

    pub fn key(&self) -> &QualifiedKey {
        &self.key
    }
}

impl<T: DeserializeOwned> ReadAccessor<T> {
    /// Current value of the getter.
    ///
    /// Store handles are read through their `getters` view and action
    /// contexts through their `root_getters` view, both of which are keyed by
    /// qualified key.
    ///
    /// Getter views answer a missing key with `Ok(None)` instead of an error,
    /// so this method reports it as `Error::UnknownKey` with the key it sent.
    /// Whether a key exists is still decided by the container alone; for an
    /// untagged handler bound under `MissingTagPolicy::Warn` the key is empty.
    pub fn read<'h>(&self, handle: impl Into<Handle<'h>>) -> Result<T> {
        let value = handle
            .into()
            .qualified_getters()
            .get(self.key.as_str())?
            .ok_or_else(|| Error::UnknownKey {
                kind: HandlerKind::Getter,
                key: self.key.to_string(),
            })?;
        decode_value(value, self.key.as_str())
    }
}

/// Commits one mutation.
pub struct CommitAccessor<P> {
    key: QualifiedKey,
    _payload: PhantomData<fn(P)>,
}

impl<P> CommitAccessor<P> {
    pub(crate) fn new(key: QualifiedKey) -> Self {
        Self {
            key,
            _payload: PhantomData,
        }
    }

    pub fn key(&self) -> &QualifiedKey {
        &self.key
    }
}

impl CommitAccessor<NoPayload> {
    /// Commit the mutation.
    pub fn commit<'h>(&self, handle: impl Into<Handle<'h>>) -> Result<()> {
        handle
            .into()
            .commit(self.key.as_str(), None, CallOptions::ROOT)
    }
}

impl<P: Payload + Serialize> CommitAccessor<P> {
    /// Commit the mutation with its payload.
    pub fn commit_with<'h>(&self, handle: impl Into<Handle<'h>>, payload: P) -> Result<()> {
        let value = payload.encode(self.key.as_str())?;
        handle
            .into()
            .commit(self.key.as_str(), value, CallOptions::ROOT)
    }
}

/// Dispatches one action.
pub struct DispatchAccessor<P, T> {
    key: QualifiedKey,
    _action: PhantomData<fn(P) -> T>,
}

impl<P, T> DispatchAccessor<P, T> {
    pub(crate) fn new(key: QualifiedKey) -> Self {
        Self {
            key,
            _action: PhantomData,
        }
    }

    pub fn key(&self) -> &QualifiedKey {
        &self.key
    }
}

impl<T: DeserializeOwned> DispatchAccessor<NoPayload, T> {
    /// Dispatch the action and wait for its result.
    pub async fn dispatch<'h>(&self, handle: impl Into<Handle<'h>>) -> Result<T> {
        let handle = handle.into();
        let result = handle
            .dispatch(self.key.as_str(), None, CallOptions::ROOT)
            .await?;
        decode_value(result, self.key.as_str())
    }
}

impl<P: Payload + Serialize, T: DeserializeOwned> DispatchAccessor<P, T> {
    /// Dispatch the action with its payload and wait for its result.
    pub async fn dispatch_with<'h>(&self, handle: impl Into<Handle<'h>>, payload: P) -> Result<T> {
        let handle = handle.into();
        let value = payload.encode(self.key.as_str())?;
        let result = handle
            .dispatch(self.key.as_str(), value, CallOptions::ROOT)
            .await?;
        decode_value(result, self.key.as_str())
    }
}

macro_rules! impl_accessor_common {
    ($name:ident < $($param:ident),+ >) => {
        impl<$($param),+> Clone for $name<$($param),+> {
            fn clone(&self) -> Self {
                Self::new(self.key.clone())
            }
        }

        impl<$($param),+> fmt::Debug for $name<$($param),+> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("key", &self.key)
                    .finish()
            }
        }
    };
}

impl_accessor_common!(ReadAccessor<T>);
impl_accessor_common!(CommitAccessor<P>);
impl_accessor_common!(DispatchAccessor<P, T>);
