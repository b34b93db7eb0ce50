//! The root module: application-wide settings.

use serde::{Deserialize, Serialize};
use statebind_core::{Action, Getter, ModuleDescriptor, Mutation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootState {
    pub language: String,
}

impl Default for RootState {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
        }
    }
}

/// Handlers of the root module.
pub struct RootModule {
    pub language: Getter<RootState, RootState, String>,
    pub change_language: Action<RootState, RootState, String, ()>,
    pub set_language: Mutation<RootState, String>,
}

impl RootModule {
    pub(crate) fn new() -> Self {
        Self {
            language: Getter::new(|state: &RootState, _: &RootState| state.language.clone()),
            change_language: Action::sync(|ctx, language: String| {
                ctx.commit("SET_LANGUAGE", language)
            }),
            set_language: Mutation::new(|state: &mut RootState, language: String| {
                state.language = language
            }),
        }
    }

    /// A fresh descriptor sharing these handlers.
    pub fn descriptor(&self) -> ModuleDescriptor<RootState, RootState> {
        let mut module = ModuleDescriptor::new(RootState::default());
        module.insert_getter("language", &self.language);
        module.insert_action("changeLanguage", &self.change_language);
        module.insert_mutation("SET_LANGUAGE", &self.set_language);
        module
    }
}
