//! The basket module, mounted under the `basket` namespace.

use serde::{Deserialize, Serialize};
use statebind_core::{Action, Getter, ModuleDescriptor, Mutation, NoPayload};

use super::root::RootState;
use crate::models::BasketItem;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasketState {
    pub items: Vec<BasketItem>,
}

/// Handlers of the basket module.
pub struct BasketModule {
    pub is_empty: Getter<BasketState, RootState, bool>,
    pub items: Getter<BasketState, RootState, Vec<BasketItem>>,
    pub amount: Getter<BasketState, RootState, u32>,

    pub add_item: Action<BasketState, RootState, BasketItem, ()>,
    pub remove_item: Action<BasketState, RootState, BasketItem, ()>,
    pub clear_basket: Action<BasketState, RootState, NoPayload, ()>,

    pub push_item: Mutation<BasketState, BasketItem>,
    pub remove_item_mutation: Mutation<BasketState, BasketItem>,
    pub set_items: Mutation<BasketState, Vec<BasketItem>>,
}

impl BasketModule {
    pub(crate) fn new() -> Self {
        Self {
            is_empty: Getter::new(|state: &BasketState, _: &RootState| state.items.is_empty()),
            items: Getter::new(|state: &BasketState, _: &RootState| state.items.clone()),
            amount: Getter::new(|state: &BasketState, _: &RootState| {
                state
                    .items
                    .iter()
                    .fold(0, |total: u32, item| total.saturating_add(item.price))
            }),

            add_item: Action::new(|ctx, item: BasketItem| async move {
                ctx.commit("PUSH_ITEM", item)
            }),
            remove_item: Action::new(|ctx, item: BasketItem| async move {
                ctx.commit("REMOVE_ITEM", item)
            }),
            clear_basket: Action::no_payload(|ctx| async move {
                ctx.commit("SET_ITEMS", Vec::<BasketItem>::new())
            }),

            push_item: Mutation::new(|state: &mut BasketState, item: BasketItem| {
                state.items.push(item)
            }),
            remove_item_mutation: Mutation::new(|state: &mut BasketState, item: BasketItem| {
                if let Some(index) = state.items.iter().position(|existing| *existing == item) {
                    state.items.remove(index);
                }
            }),
            set_items: Mutation::new(|state: &mut BasketState, items: Vec<BasketItem>| {
                state.items = items
            }),
        }
    }

    /// A fresh, empty descriptor sharing these handlers.
    pub fn descriptor(&self) -> ModuleDescriptor<BasketState, RootState> {
        let mut module = ModuleDescriptor::new(BasketState::default()).namespaced();

        module.insert_getter("isEmpty", &self.is_empty);
        module.insert_getter("items", &self.items);
        module.insert_getter("amount", &self.amount);

        module.insert_action("addItem", &self.add_item);
        module.insert_action("removeItem", &self.remove_item);
        module.insert_action("clearBasket", &self.clear_basket);

        module.insert_mutation("PUSH_ITEM", &self.push_item);
        module.insert_mutation("REMOVE_ITEM", &self.remove_item_mutation);
        module.insert_mutation("SET_ITEMS", &self.set_items);
        module
    }
}
