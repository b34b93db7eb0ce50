use statebind_core::{AccessorWrapper, DispatchAccessor, NoPayload, ReadAccessor, Result};
use statebind_memory::MemoryStore;

use crate::models::BasketItem;
use crate::store::{BasketState, RootState, BASKET};

/// Basket accessors bound to one store.
pub struct BasketHelper {
    store: MemoryStore,
    is_empty: ReadAccessor<bool>,
    items: ReadAccessor<Vec<BasketItem>>,
    amount: ReadAccessor<u32>,
    add_item: DispatchAccessor<BasketItem, ()>,
    remove_item: DispatchAccessor<BasketItem, ()>,
    clear_basket: DispatchAccessor<NoPayload, ()>,
}

impl BasketHelper {
    pub fn new(store: MemoryStore) -> Result<Self> {
        let wrapper: AccessorWrapper<BasketState, RootState> = AccessorWrapper::new("basket");
        Ok(Self {
            store,
            is_empty: wrapper.read(&BASKET.is_empty)?,
            items: wrapper.read(&BASKET.items)?,
            amount: wrapper.read(&BASKET.amount)?,
            add_item: wrapper.dispatch(&BASKET.add_item)?,
            remove_item: wrapper.dispatch(&BASKET.remove_item)?,
            clear_basket: wrapper.dispatch(&BASKET.clear_basket)?,
        })
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.is_empty.read(&self.store)
    }

    pub fn items(&self) -> Result<Vec<BasketItem>> {
        self.items.read(&self.store)
    }

    /// Sum of item prices.
    pub fn amount(&self) -> Result<u32> {
        self.amount.read(&self.store)
    }

    pub async fn add_item(&self, item: BasketItem) -> Result<()> {
        self.add_item.dispatch_with(&self.store, item).await
    }

    pub async fn remove_item(&self, item: BasketItem) -> Result<()> {
        self.remove_item.dispatch_with(&self.store, item).await
    }

    pub async fn clear_basket(&self) -> Result<()> {
        self.clear_basket.dispatch(&self.store).await
    }
}
