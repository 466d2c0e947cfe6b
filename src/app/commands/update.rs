//! In-place attribute updates of a hosted feature layer from the extract.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::Span;

use crate::domain::table::key_string;
use crate::domain::{AppError, DataTable};
use crate::ports::FeatureLayerSource;

/// Updates sent per `applyEdits` request.
pub const DEFAULT_BATCH_SIZE: usize = 500;

const TYPE_MISMATCH_MARKER: &str = "incompatible with the field type";

/// Writes extract values onto the features whose key matches a row.
pub struct FeatureServiceInLineUpdater<'a, L: FeatureLayerSource> {
    layers: &'a L,
    data_by_key: HashMap<String, Map<String, Value>>,
    batch_size: usize,
    span: Span,
}

impl<'a, L: FeatureLayerSource> FeatureServiceInLineUpdater<'a, L> {
    pub fn new(layers: &'a L, table: &DataTable, index_column: &str) -> Result<Self, AppError> {
        let data_by_key = table.rows_by_key(index_column)?;
        let span = tracing::info_span!("feature_updater", index_column);
        Ok(Self { layers, data_by_key, batch_size: DEFAULT_BATCH_SIZE, span })
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Update `fields[1..]` on every feature whose `fields[0]` value matches a row key.
    ///
    /// Returns the number of features the service reports as updated.
    pub fn update_feature_service(
        &self,
        layer_url: &str,
        fields: &[String],
    ) -> Result<usize, AppError> {
        let _entered = self.span.enter();
        tracing::info!(layer = layer_url, "Updating in-place");
        tracing::debug!(?fields, "Updating fields");

        let (key_field, value_fields) = fields.split_first().ok_or_else(|| {
            AppError::config_error("At least the key field is required to update a feature service")
        })?;

        let object_id_field = self.layers.object_id_field(layer_url)?;
        let mut out_fields = vec![object_id_field.clone()];
        out_fields.extend(fields.iter().filter(|f| **f != object_id_field).cloned());
        let features = self.layers.query_table(layer_url, &out_fields)?;

        let oid_index = features
            .column_index(&object_id_field)
            .ok_or_else(|| AppError::MissingColumn(object_id_field.clone()))?;
        let key_index = features
            .column_index(key_field)
            .ok_or_else(|| AppError::MissingColumn(key_field.clone()))?;

        let mut updates = Vec::new();
        for row in features.rows() {
            let key = key_string(&row[key_index]);
            let Some(data) = key.and_then(|key| self.data_by_key.get(&key)) else {
                continue;
            };

            let mut attributes = Map::new();
            attributes.insert(object_id_field.clone(), row[oid_index].clone());
            for field in value_fields {
                attributes.insert(field.clone(), data.get(field).cloned().unwrap_or(Value::Null));
            }
            tracing::trace!(?attributes, "Updating row");
            updates.push(attributes);
        }

        let mut rows_updated = 0;
        for batch in updates.chunks(self.batch_size) {
            for result in self.layers.apply_updates(layer_url, batch)? {
                if result.success {
                    rows_updated += 1;
                    continue;
                }

                let description = result.description.unwrap_or_default();
                if description.contains(TYPE_MISMATCH_MARKER) {
                    return Err(AppError::FieldTypeMismatch(description));
                }
                tracing::warn!(
                    object_id = ?result.object_id,
                    %description,
                    "Feature update rejected"
                );
            }
        }

        tracing::info!(rows_updated, "Rows updated");
        Ok(rows_updated)
    }
}
