use std::sync::Arc;

use atelier_storage::DynObjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: atelier_db::DbPool,
    /// Object store holding uploaded design images.
    pub storage: DynObjectStore,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
}
