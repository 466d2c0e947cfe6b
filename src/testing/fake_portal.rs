use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

use crate::domain::{AppError, DataTable};
use crate::ports::{EditResult, FeatureLayerSource, WebMapStore};

pub const OBJECT_ID_FIELD: &str = "OBJECTID";

/// In-memory stand-in for the portal's item store and feature layers.
#[derive(Clone)]
pub struct FakePortal {
    pub webmaps: Arc<Mutex<HashMap<String, Value>>>,
    pub layers: Arc<Mutex<HashMap<String, DataTable>>>,
    pub persisted: Arc<Mutex<Vec<(String, Value)>>>,
    pub applied: Arc<Mutex<Vec<Map<String, Value>>>>,
    pub rejected: Arc<Mutex<HashMap<i64, String>>>,
    pub persist_succeeds: bool,
}

impl Default for FakePortal {
    fn default() -> Self {
        Self {
            webmaps: Arc::default(),
            layers: Arc::default(),
            persisted: Arc::default(),
            applied: Arc::default(),
            rejected: Arc::default(),
            persist_succeeds: true,
        }
    }
}

impl FakePortal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_webmap(self, item_id: &str, document: Value) -> Self {
        self.webmaps.lock().unwrap().insert(item_id.to_string(), document);
        self
    }

    pub fn with_layer(self, layer_url: &str, table: DataTable) -> Self {
        self.layers.lock().unwrap().insert(layer_url.to_string(), table);
        self
    }

    pub fn reject(&self, object_id: i64, description: &str) {
        self.rejected.lock().unwrap().insert(object_id, description.to_string());
    }

    pub fn layer(&self, layer_url: &str) -> DataTable {
        self.layers.lock().unwrap()[layer_url].clone()
    }

    pub fn persisted_documents(&self) -> Vec<(String, Value)> {
        self.persisted.lock().unwrap().clone()
    }
}

impl WebMapStore for FakePortal {
    fn fetch(&self, item_id: &str) -> Result<Value, AppError> {
        self.webmaps
            .lock()
            .unwrap()
            .get(item_id)
            .cloned()
            .ok_or_else(|| AppError::portal(format!("Item does not exist: {}", item_id), Some(400)))
    }

    fn persist(&self, item_id: &str, document: &Value) -> Result<bool, AppError> {
        self.persisted.lock().unwrap().push((item_id.to_string(), document.clone()));
        if self.persist_succeeds {
            self.webmaps.lock().unwrap().insert(item_id.to_string(), document.clone());
        }
        Ok(self.persist_succeeds)
    }
}

impl FeatureLayerSource for FakePortal {
    fn object_id_field(&self, _layer_url: &str) -> Result<String, AppError> {
        Ok(OBJECT_ID_FIELD.to_string())
    }

    fn query_table(&self, layer_url: &str, _out_fields: &[String]) -> Result<DataTable, AppError> {
        self.layers
            .lock()
            .unwrap()
            .get(layer_url)
            .cloned()
            .ok_or_else(|| AppError::portal(format!("Invalid URL: {}", layer_url), Some(400)))
    }

    fn apply_updates(
        &self,
        layer_url: &str,
        updates: &[Map<String, Value>],
    ) -> Result<Vec<EditResult>, AppError> {
        let rejected = self.rejected.lock().unwrap().clone();
        let mut layers = self.layers.lock().unwrap();
        let table = layers
            .get_mut(layer_url)
            .ok_or_else(|| AppError::portal(format!("Invalid URL: {}", layer_url), Some(400)))?;
        let oid_index = table.column_index(OBJECT_ID_FIELD);

        let mut results = Vec::new();
        let mut rewritten = DataTable::new(table.columns().to_vec());
        let mut rows: Vec<Vec<Value>> = table.rows().to_vec();

        for update in updates {
            self.applied.lock().unwrap().push(update.clone());
            let object_id = update.get(OBJECT_ID_FIELD).and_then(Value::as_i64);

            if let Some(description) = object_id.and_then(|id| rejected.get(&id)) {
                results.push(EditResult {
                    object_id,
                    success: false,
                    description: Some(description.clone()),
                });
                continue;
            }

            let row =
                oid_index.and_then(|i| rows.iter_mut().find(|row| row[i].as_i64() == object_id));
            if let Some(row) = row {
                for (name, value) in update {
                    if let Some(column) = table.column_index(name) {
                        row[column] = value.clone();
                    }
                }
            }
            results.push(EditResult { object_id, success: true, description: None });
        }

        for row in rows {
            rewritten.push_row(row);
        }
        *table = rewritten;
        Ok(results)
    }
}
