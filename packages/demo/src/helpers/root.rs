use statebind_core::{AccessorWrapper, DispatchAccessor, ReadAccessor, Result};
use statebind_memory::MemoryStore;

use crate::store::{RootState, ROOT};

/// Root module accessors bound to one store.
pub struct RootHelper {
    store: MemoryStore,
    language: ReadAccessor<String>,
    change_language: DispatchAccessor<String, ()>,
}

impl RootHelper {
    pub fn new(store: MemoryStore) -> Result<Self> {
        let wrapper: AccessorWrapper<RootState, RootState> = AccessorWrapper::root();
        Ok(Self {
            store,
            language: wrapper.read(&ROOT.language)?,
            change_language: wrapper.dispatch(&ROOT.change_language)?,
        })
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn language(&self) -> Result<String> {
        self.language.read(&self.store)
    }

    pub async fn change_language(&self, language: impl Into<String>) -> Result<()> {
        self.change_language
            .dispatch_with(&self.store, language.into())
            .await
    }
}
