//! Module definitions and the store factory.
//!
//! Handlers live in process-wide tables so helpers can bind them without
//! holding a store. Every call to [`create_store`] builds fresh state around
//! the same handlers.

mod basket;
mod root;

use lazy_static::lazy_static;
use statebind_core::Result;
use statebind_memory::MemoryStore;

pub use basket::{BasketModule, BasketState};
pub use root::{RootModule, RootState};

lazy_static! {
    pub static ref ROOT: RootModule = RootModule::new();
    pub static ref BASKET: BasketModule = BasketModule::new();
}

/// A new store with the root module and the basket mounted under `basket`.
pub fn create_store() -> Result<MemoryStore> {
    let mut root = ROOT.descriptor();
    root.module("basket", BASKET.descriptor());
    MemoryStore::new(root)
}
