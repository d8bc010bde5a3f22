use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: filature_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Event bus feeding the notification dispatcher.
    pub event_bus: Arc<filature_events::EventBus>,
}
