//! Wrapper configuration.

use serde::{Deserialize, Serialize};

/// What a wrapper does when asked to bind a handler that was never tagged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingTagPolicy {
    /// Log a warning and bind to the empty key. Calls then fail inside the
    /// container, not at construction.
    #[default]
    Warn,
    /// Refuse to build the accessor.
    Deny,
}

/// Configuration for an [`AccessorWrapper`](crate::AccessorWrapper).
///
/// ```json
/// {"missing_tag": "deny"}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapperConfig {
    pub missing_tag: MissingTagPolicy,
}

impl WrapperConfig {
    /// Configuration that rejects untagged handlers.
    pub fn strict() -> Self {
        Self {
            missing_tag: MissingTagPolicy::Deny,
        }
    }
}
