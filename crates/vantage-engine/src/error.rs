use thiserror::Error;

/// Errors returned by [`PhysicsEngine`](crate::PhysicsEngine).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine not initialized: call initialize() before update()")]
    NotInitialized,
}
