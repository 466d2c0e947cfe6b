//! Recompute a web map layer's color ramp stops from the layer's current data.

use serde_json::Value;
use tracing::Span;

use crate::domain::webmap::{apply_new_stops, find_layer};
use crate::domain::{AppError, calculate_new_stops};
use crate::ports::{FeatureLayerSource, WebMapStore};

/// Updates the stop values on one web map's unclassed renderers.
///
/// Does not alter colors or add stops; only the values of existing breaks change.
pub struct ColorRampReclassifier<'a, S: WebMapStore, L: FeatureLayerSource> {
    webmaps: &'a S,
    layers: &'a L,
    webmap_item_id: String,
    span: Span,
}

impl<'a, S: WebMapStore, L: FeatureLayerSource> ColorRampReclassifier<'a, S, L> {
    pub fn new(webmaps: &'a S, layers: &'a L, webmap_item_id: impl Into<String>) -> Self {
        let webmap_item_id = webmap_item_id.into();
        let span = tracing::info_span!("reclassifier", webmap = %webmap_item_id);
        Self { webmaps, layers, webmap_item_id, span }
    }

    /// Recalculate and write back the stops of `layer_title` from `column_name`.
    ///
    /// Returns the portal's success flag for the write. The patched document is
    /// discarded either way; nothing is rolled back on failure.
    pub fn update_color_ramp_values(
        &self,
        layer_title: &str,
        column_name: &str,
        stop_count: usize,
    ) -> Result<bool, AppError> {
        let _entered = self.span.enter();

        let mut webmap = self.webmaps.fetch(&self.webmap_item_id)?;
        let layer_url = layer_source_url(&webmap, layer_title)?;

        tracing::info!(layer = layer_title, "Getting layer data");
        let table = self.layers.query_table(&layer_url, &[])?;
        let new_stops = calculate_new_stops(&table, column_name, stop_count)?;
        tracing::debug!(?new_stops, column = column_name, "Calculated stops");

        let updated = apply_new_stops(&mut webmap, layer_title, &new_stops)?;
        if updated != new_stops.len() {
            tracing::warn!(
                calculated = new_stops.len(),
                updated,
                "Stop count differs from the renderer's; only the overlapping stops were updated"
            );
        }

        tracing::info!(layer = layer_title, "Updating stop values");
        let result = self.webmaps.persist(&self.webmap_item_id, &webmap)?;
        tracing::debug!(result, "Update result");
        Ok(result)
    }
}

fn layer_source_url(webmap: &Value, layer_title: &str) -> Result<String, AppError> {
    find_layer(webmap, layer_title)?
        .get("url")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| AppError::RendererShapeMismatch {
            layer: layer_title.to_string(),
            missing: "url".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::DataTable;
    use crate::testing::FakePortal;

    const MAP: &str = "map-item";
    const LAYER_URL: &str = "https://services.example.com/ERAP/FeatureServer/0";
    const TITLE: &str = "ERAP Applications";

    fn webmap() -> Value {
        json!({
            "operationalLayers": [{
                "title": "ERAP Applications",
                "url": LAYER_URL,
                "layerDefinition": { "drawingInfo": { "renderer": {
                    "type": "simple",
                    "visualVariables": [{ "type": "colorInfo", "stops": [
                        { "value": 0, "color": [255, 252, 212, 255] },
                        { "value": 0, "color": [177, 205, 194, 255] },
                        { "value": 0, "color": [98, 158, 176, 255] },
                        { "value": 0, "color": [56, 98, 122, 255] },
                        { "value": 0, "color": [13, 38, 68, 255] }
                    ]}]
                }}}
            }]
        })
    }

    fn layer_data() -> DataTable {
        let mut table = DataTable::new(vec!["OBJECTID".into(), "Applications".into()]);
        let values = [json!(10), json!(20), Value::Null, json!(30), json!(40), json!(50)];
        for (id, value) in values.into_iter().enumerate() {
            table.push_row(vec![json!(id + 1), value]);
        }
        table
    }

    fn portal() -> FakePortal {
        FakePortal::new().with_webmap(MAP, webmap()).with_layer(LAYER_URL, layer_data())
    }

    fn stop_values(doc: &Value) -> Vec<Value> {
        crate::domain::webmap::current_stop_values(doc, TITLE).unwrap()
    }

    #[test]
    fn recalculates_and_persists_stops() {
        let portal = portal();
        let reclassifier = ColorRampReclassifier::new(&portal, &portal, MAP);

        let ok = reclassifier.update_color_ramp_values(TITLE, "Applications", 5).unwrap();

        assert!(ok);
        let persisted = portal.persisted_documents();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].0, MAP);
        assert_eq!(
            stop_values(&persisted[0].1),
            vec![json!(10), json!(18), json!(27), json!(36), json!(45)]
        );
        assert_eq!(
            persisted[0].1["operationalLayers"][0]["layerDefinition"]["drawingInfo"]["renderer"]
                ["visualVariables"][0]["stops"][4]["color"],
            json!([13, 38, 68, 255])
        );
    }

    #[test]
    fn unknown_layer_persists_nothing() {
        let portal = portal();
        let reclassifier = ColorRampReclassifier::new(&portal, &portal, MAP);

        let err = reclassifier.update_color_ramp_values("Nope", "Applications", 5).unwrap_err();

        assert!(matches!(err, AppError::LayerNotFound { .. }));
        assert!(portal.persisted_documents().is_empty());
    }

    #[test]
    fn missing_column_persists_nothing() {
        let portal = portal();
        let reclassifier = ColorRampReclassifier::new(&portal, &portal, MAP);

        let err = reclassifier.update_color_ramp_values(TITLE, "Cases", 5).unwrap_err();

        assert!(matches!(err, AppError::MissingColumn(name) if name == "Cases"));
        assert!(portal.persisted_documents().is_empty());
    }

    #[test]
    fn failed_persist_is_reported_as_false() {
        let mut portal = portal();
        portal.persist_succeeds = false;
        let reclassifier = ColorRampReclassifier::new(&portal, &portal, MAP);

        let ok = reclassifier.update_color_ramp_values(TITLE, "Applications", 5).unwrap();

        assert!(!ok);
        assert_eq!(stop_values(&portal.fetch(MAP).unwrap()), vec![json!(0); 5]);
    }

    #[test]
    fn layer_without_url_is_a_shape_mismatch() {
        let mut doc = webmap();
        doc["operationalLayers"][0].as_object_mut().unwrap().remove("url");
        let portal = FakePortal::new().with_webmap(MAP, doc);
        let reclassifier = ColorRampReclassifier::new(&portal, &portal, MAP);

        let err = reclassifier.update_color_ramp_values(TITLE, "Applications", 5).unwrap_err();

        assert!(matches!(err, AppError::RendererShapeMismatch { missing, .. } if missing == "url"));
    }
}
