//! Typed facades over the demo store.

mod basket;
mod root;

pub use basket::BasketHelper;
pub use root::RootHelper;
