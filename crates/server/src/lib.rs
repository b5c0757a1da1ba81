use std::sync::Arc;

use bolso_import::Classifier;
use bolso_storage::DbPool;

pub mod error;
pub mod handlers;
pub mod router;

pub use error::{ApiError, Result};
pub use router::create_router;

/// Shared application state. The classifier is loaded once at startup,
/// read-only afterwards, and shared across handlers through an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub classifier: Arc<Classifier>,
}
