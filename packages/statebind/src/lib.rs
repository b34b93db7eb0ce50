//! statebind: typed accessors over a namespaced state container.
//!
//! Register a module tree with a container, then bind its handlers once
//! through an [`AccessorWrapper`] and call the resulting accessors with any
//! handle: the store itself or the context of a running action.
//!
//! # Example
//!
//! ```rust
//! use statebind::{AccessorWrapper, MemoryStore, ModuleDescriptor};
//!
//! #[derive(Default)]
//! struct Root {
//!     clicks: u32,
//! }
//!
//! let mut root: ModuleDescriptor<Root, Root> = ModuleDescriptor::new(Root::default());
//! let clicks = root.getter("clicks", |state: &Root, _: &Root| state.clicks);
//! let click = root.mutation_no_payload("CLICK", |state: &mut Root| state.clicks += 1);
//!
//! let store = MemoryStore::new(root)?;
//! let wrapper: AccessorWrapper<Root, Root> = AccessorWrapper::root();
//! let (clicks, click) = (wrapper.read(&clicks)?, wrapper.commit(&click)?);
//!
//! click.commit(&store)?;
//! click.commit(&store)?;
//! assert_eq!(clicks.read(&store)?, 2);
//! # Ok::<(), statebind::Error>(())
//! ```
//!
//! # Features
//!
//! - `memory` (default): the in-memory reference container, [`MemoryStore`].

pub use statebind_core::*;

#[cfg(feature = "memory")]
pub use statebind_memory::{MemoryContext, MemoryStore, MutationRecord, SubscriptionId};
