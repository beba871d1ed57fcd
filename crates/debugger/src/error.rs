//! Errors raised by host accessors.

use engine_core::Entity;
use thiserror::Error;

/// A failed read from the host scene.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("entity {0:?} no longer exists")]
    EntityNotFound(Entity),
    #[error("entity {entity:?} has no {component} component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },
    #[error("scene query failed: {0}")]
    Query(String),
}

pub type HostResult<T> = Result<T, HostError>;
