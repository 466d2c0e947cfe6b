//! Hosted feature layer port.

use serde_json::{Map, Value};

use crate::domain::{AppError, DataTable};

/// Outcome of one feature update reported by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct EditResult {
    pub object_id: Option<i64>,
    pub success: bool,
    /// Service-provided reason when `success` is false.
    pub description: Option<String>,
}

/// Read attributes from and write updates to a feature layer endpoint.
pub trait FeatureLayerSource {
    /// Name of the layer's object id field.
    fn object_id_field(&self, layer_url: &str) -> Result<String, AppError>;

    /// All features' attributes. `out_fields` empty means every field.
    fn query_table(&self, layer_url: &str, out_fields: &[String]) -> Result<DataTable, AppError>;

    /// Apply attribute updates. Each map must carry the object id field.
    fn apply_updates(
        &self,
        layer_url: &str,
        updates: &[Map<String, Value>],
    ) -> Result<Vec<EditResult>, AppError>;
}
