//! A small application built on statebind: a root module holding the UI
//! language and a namespaced basket module.
//!
//! ```rust,ignore
//! use statebind_demo::{create_store, BasketHelper, BasketItem};
//!
//! let basket = BasketHelper::new(create_store()?)?;
//! basket.add_item(BasketItem::new(1, "foo", 10)).await?;
//! assert_eq!(basket.amount()?, 10);
//! ```

pub mod helpers;
pub mod models;
pub mod store;

pub use helpers::{BasketHelper, RootHelper};
pub use models::BasketItem;
pub use store::{create_store, BASKET, ROOT};
