//! Remote configuration store for web map documents.

use serde_json::Value;

use crate::domain::AppError;

/// Fetch and replace web map item documents.
pub trait WebMapStore {
    /// Current JSON document of the item.
    fn fetch(&self, item_id: &str) -> Result<Value, AppError>;

    /// Replace the item's document. Returns the service's success flag.
    fn persist(&self, item_id: &str, document: &Value) -> Result<bool, AppError>;
}
