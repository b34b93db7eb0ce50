use serde::{Deserialize, Serialize};

/// An item in the basket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketItem {
    pub id: u32,
    pub name: String,
    /// Price in whole currency units.
    pub price: u32,
}

impl BasketItem {
    pub fn new(id: u32, name: impl Into<String>, price: u32) -> Self {
        Self {
            id,
            name: name.into(),
            price,
        }
    }
}
