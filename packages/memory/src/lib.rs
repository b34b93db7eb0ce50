//! In-memory state container for statebind.
//!
//! `MemoryStore` implements the container side of the statebind handle
//! interface: it registers a module tree, evaluates getters on read, applies
//! mutations synchronously, and runs actions with a context bound to their
//! module's namespace.
//!
//! # Example
//!
//! ```rust,ignore
//! use statebind_memory::MemoryStore;
//!
//! let store = MemoryStore::new(root_module)?;
//! let language: String = wrapper.read(&root.language)?.read(&store)?;
//! ```

mod context;
mod store;

pub use context::MemoryContext;
pub use store::{MemoryStore, MutationRecord, SubscriptionId};
