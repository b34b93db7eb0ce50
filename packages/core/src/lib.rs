//! statebind core: typed accessors over a namespaced state container.
//!
//! State containers address getters, mutations, and actions by string key.
//! This layer lets application code address them by handler value instead:
//! - `ModuleDescriptor`: a module's state plus named handlers
//! - `tag_handlers`: stamps each handler with the name it is registered under
//! - `AccessorWrapper`: binds tagged handlers to qualified keys
//! - `ReadAccessor`, `CommitAccessor`, `DispatchAccessor`: the bound accessors
//! - `Handle`: a store handle or an action-context handle to call them with
//!
//! # Example
//!
//! ```rust,ignore
//! use statebind_core::{AccessorWrapper, ModuleDescriptor};
//!
//! let mut basket = ModuleDescriptor::<BasketState, RootState>::new(BasketState::default())
//!     .namespaced();
//! let amount = basket.getter("amount", |state, _| state.items.iter().map(|i| i.price).sum());
//!
//! // ... register `basket` with a container, which tags it ...
//!
//! let wrapper = AccessorWrapper::<BasketState, RootState>::new("basket");
//! let read_amount = wrapper.read(&amount)?; // bound to "basket/amount"
//! let total: u32 = read_amount.read(&store)?;
//! ```

mod accessor;
mod config;
mod context;
mod error;
mod handle;
mod handler;
pub mod module;
mod namespace;
mod payload;
mod tagging;
mod wrapper;

pub use accessor::{CommitAccessor, DispatchAccessor, ReadAccessor};
pub use config::{MissingTagPolicy, WrapperConfig};
pub use context::ActionContext;
pub use error::{Error, Result};
pub use handle::{CallOptions, ContextHandle, GetterView, Handle, Operations, StoreHandle};
pub use handler::{Action, BoxFuture, Getter, HandlerKind, HandlerTag, Mutation};
pub use module::{ErasedModule, ModuleDescriptor};
pub use namespace::{Namespace, QualifiedKey};
pub use payload::{decode_value, encode_value, NoPayload, Payload};
pub use tagging::{tag_handlers, TagReport};
pub use wrapper::AccessorWrapper;

// Re-exported so containers and applications agree on the value type.
pub use serde_json::Value;
