use std::fmt;

use crate::api::types::{ComponentKey, EntityId};

/// Errors surfaced by world construction and entity assembly.
#[derive(Debug)]
pub enum SimError {
    /// Hitbox dimensions were negative or not a number.
    InvalidSize { width: f32, height: f32 },
    /// An entity already holds a component with this key.
    DuplicateComponent(ComponentKey),
    /// No live entity has this id.
    UnknownEntity(EntityId),
    /// A manifest or config document failed to parse.
    Json(serde_json::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidSize { width, height } => {
                write!(f, "invalid hitbox size {width}x{height}")
            }
            SimError::DuplicateComponent(key) => {
                write!(f, "entity already has a `{key}` component")
            }
            SimError::UnknownEntity(id) => write!(f, "no live entity {id}"),
            SimError::Json(err) => write!(f, "malformed JSON: {err}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_key() {
        let err = SimError::DuplicateComponent(ComponentKey("hitbox"));
        assert_eq!(err.to_string(), "entity already has a `hitbox` component");
    }

    #[test]
    fn json_errors_keep_their_source() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: SimError = parse.into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
