//! Error types for the accessor layer and the containers behind it.

use thiserror::Error;

use crate::handler::HandlerKind;

/// Errors raised by accessors, handles, and container implementations.
///
/// The accessor layer itself only produces `UntaggedHandler` (when the
/// wrapper is configured to deny untagged handlers) and the serde
/// `Encode`/`Decode` failures. Everything else is reported by the container
/// and passed through unchanged.
#[derive(Debug, Error)]
pub enum Error {
    /// A handler was never registered in a module descriptor.
    #[error("{kind} handler has no registration key; register it in a module before binding it")]
    UntaggedHandler { kind: HandlerKind },

    /// The container has nothing registered under the key.
    #[error("unknown {kind} '{key}'")]
    UnknownKey { kind: HandlerKind, key: String },

    /// No module is mounted at the path.
    #[error("unknown module '{path}'")]
    UnknownModule { path: String },

    /// Two handlers of the same kind resolved to the same qualified key.
    #[error("duplicate {kind} '{key}'")]
    DuplicateKey { kind: HandlerKind, key: String },

    /// A payload or result could not be converted to a container value.
    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A container value could not be converted to the expected type.
    #[error("failed to decode value for '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Module state did not have the type the handler expects.
    #[error("state passed to '{key}' has an unexpected type")]
    StateType { key: String },

    /// The calling thread already holds the container's state lock, from
    /// inside a getter, a mutation, or a state inspection closure.
    #[error("container state is already locked by this thread")]
    StateLockHeld,

    /// A lock guarding container state was poisoned by a panicking handler.
    #[error("state lock poisoned")]
    LockPoisoned,

    /// An action handler failed.
    #[error("action '{key}' failed: {message}")]
    Action { key: String, message: String },
}

/// Result type alias for accessor and container operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn unknown_key_display() {
        let e = Error::UnknownKey {
            kind: HandlerKind::Mutation,
            key: "basket/PUSH_ITEM".to_string(),
        };
        assert_eq!(format!("{}", e), "unknown mutation 'basket/PUSH_ITEM'");
    }

    #[test]
    fn untagged_handler_display() {
        let e = Error::UntaggedHandler {
            kind: HandlerKind::Getter,
        };
        let display = format!("{}", e);
        assert!(display.starts_with("getter handler"));
        assert!(display.contains("registration key"));
    }

    #[test]
    fn decode_error_keeps_source() {
        let source = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let e = Error::Decode {
            key: "amount".to_string(),
            source,
        };
        assert!(format!("{}", e).contains("amount"));
        assert!(StdError::source(&e).is_some());
    }

    #[test]
    fn lock_poisoned_has_no_source() {
        assert!(StdError::source(&Error::LockPoisoned).is_none());
    }
}
