//! The accessor wrapper: turns tagged handlers into bound accessors.

use std::fmt;
use std::marker::PhantomData;

use crate::accessor::{CommitAccessor, DispatchAccessor, ReadAccessor};
use crate::config::{MissingTagPolicy, WrapperConfig};
use crate::handler::{Action, Getter, HandlerKind, Mutation};
use crate::{Error, Namespace, QualifiedKey, Result};

/// Builds accessors for the handlers of one module.
///
/// `S` and `R` are the module's and the root's state types; only handlers
/// of that module are accepted. The namespace must match the one the
/// container registered the module under (empty for the root module).
///
/// # Example
///
/// ```rust,ignore
/// let wrapper: AccessorWrapper<BasketState, RootState> = AccessorWrapper::new("basket");
/// let amount = wrapper.read(&basket.amount)?;
/// let total: u32 = amount.read(&store)?;
/// ```
pub struct AccessorWrapper<S, R> {
    namespace: Namespace,
    config: WrapperConfig,
    _module: PhantomData<fn(&S, &R)>,
}

impl<S, R> AccessorWrapper<S, R> {
    pub fn new(namespace: impl Into<Namespace>) -> Self {
        Self::with_config(namespace, WrapperConfig::default())
    }

    /// Wrapper for the root module.
    pub fn root() -> Self {
        Self::new(Namespace::root())
    }

    pub fn with_config(namespace: impl Into<Namespace>, config: WrapperConfig) -> Self {
        Self {
            namespace: namespace.into(),
            config,
            _module: PhantomData,
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn config(&self) -> &WrapperConfig {
        &self.config
    }

    /// Accessor reading `handler`'s current value.
    pub fn read<T>(&self, handler: &Getter<S, R, T>) -> Result<ReadAccessor<T>> {
        let key = self.qualify_key(HandlerKind::Getter, handler.key())?;
        tracing::debug!(%key, "bound read accessor");
        Ok(ReadAccessor::new(key))
    }

    /// Accessor committing `handler`'s mutation.
    pub fn commit<P>(&self, handler: &Mutation<S, P>) -> Result<CommitAccessor<P>> {
        let key = self.qualify_key(HandlerKind::Mutation, handler.key())?;
        tracing::debug!(%key, "bound commit accessor");
        Ok(CommitAccessor::new(key))
    }

    /// Accessor dispatching `handler`'s action.
    pub fn dispatch<P, T>(&self, handler: &Action<S, R, P, T>) -> Result<DispatchAccessor<P, T>> {
        let key = self.qualify_key(HandlerKind::Action, handler.key())?;
        tracing::debug!(%key, "bound dispatch accessor");
        Ok(DispatchAccessor::new(key))
    }

    fn qualify_key(&self, kind: HandlerKind, tag: Option<&str>) -> Result<QualifiedKey> {
        match (tag, self.config.missing_tag) {
            (Some(tag), _) => Ok(self.namespace.qualify(tag)),
            (None, MissingTagPolicy::Deny) => Err(Error::UntaggedHandler { kind }),
            (None, MissingTagPolicy::Warn) => {
                tracing::warn!(
                    %kind,
                    namespace = %self.namespace,
                    "handler has no registration key; containers identify handlers by key, \
                     so define it in a module descriptor instead of passing an anonymous function"
                );
                Ok(QualifiedKey::empty())
            }
        }
    }
}

impl<S, R> Default for AccessorWrapper<S, R> {
    fn default() -> Self {
        Self::root()
    }
}

impl<S, R> Clone for AccessorWrapper<S, R> {
    fn clone(&self) -> Self {
        Self::with_config(self.namespace.clone(), self.config.clone())
    }
}

impl<S, R> fmt::Debug for AccessorWrapper<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorWrapper")
            .field("namespace", &self.namespace)
            .field("config", &self.config)
            .finish()
    }
}
