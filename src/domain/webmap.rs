//! Navigation and patching of web map JSON documents.
//!
//! Only the path `operationalLayers[i].layerDefinition.drawingInfo.renderer
//! .visualVariables[0].stops[*].value` is touched; everything else in the
//! document is carried through untouched.

use serde_json::Value;

use crate::domain::AppError;

const OPERATIONAL_LAYERS: &str = "operationalLayers";
const STOPS_POINTER: &str = "/layerDefinition/drawingInfo/renderer/visualVariables/0/stops";

/// Index of the first operational layer whose `title` equals `layer_title` exactly.
pub fn find_layer_index(webmap: &Value, layer_title: &str) -> Result<usize, AppError> {
    webmap
        .get(OPERATIONAL_LAYERS)
        .and_then(Value::as_array)
        .and_then(|layers| {
            layers
                .iter()
                .position(|layer| layer.get("title").and_then(Value::as_str) == Some(layer_title))
        })
        .ok_or_else(|| AppError::LayerNotFound { title: layer_title.to_string() })
}

/// Operational layer entry by title.
pub fn find_layer<'a>(webmap: &'a Value, layer_title: &str) -> Result<&'a Value, AppError> {
    let index = find_layer_index(webmap, layer_title)?;
    Ok(&webmap[OPERATIONAL_LAYERS][index])
}

/// Overwrite the `value` of each existing stop, pairwise and in order.
///
/// Colors, labels and the number of stops are left as they are. When the
/// lengths differ only the shorter length's worth of stops is updated.
/// Returns the number of stops written. On error the document is unchanged.
pub fn apply_new_stops(
    webmap: &mut Value,
    layer_title: &str,
    new_stops: &[i64],
) -> Result<usize, AppError> {
    let index = find_layer_index(webmap, layer_title)?;
    let layer = &mut webmap[OPERATIONAL_LAYERS][index];
    let stops = stops_mut(layer, layer_title)?;

    let paired = stops.len().min(new_stops.len());
    if let Some(position) = stops[..paired].iter().position(|stop| !stop.is_object()) {
        return Err(AppError::RendererShapeMismatch {
            layer: layer_title.to_string(),
            missing: format!("renderer.visualVariables[0].stops[{}]", position),
        });
    }

    for (stop, new_value) in stops.iter_mut().zip(new_stops) {
        stop["value"] = Value::from(*new_value);
    }
    Ok(paired)
}

/// Current stop values of a layer's ramp.
pub fn current_stop_values(webmap: &Value, layer_title: &str) -> Result<Vec<Value>, AppError> {
    let stops = find_layer(webmap, layer_title)?
        .pointer(STOPS_POINTER)
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::RendererShapeMismatch {
            layer: layer_title.to_string(),
            missing: STOPS_POINTER.to_string(),
        })?;
    Ok(stops.iter().map(|stop| stop.get("value").cloned().unwrap_or(Value::Null)).collect())
}

fn stops_mut<'a>(layer: &'a mut Value, layer_title: &str) -> Result<&'a mut Vec<Value>, AppError> {
    let mismatch = |missing: &str| AppError::RendererShapeMismatch {
        layer: layer_title.to_string(),
        missing: missing.to_string(),
    };

    let renderer = layer
        .get_mut("layerDefinition")
        .ok_or_else(|| mismatch("layerDefinition"))?
        .get_mut("drawingInfo")
        .ok_or_else(|| mismatch("layerDefinition.drawingInfo"))?
        .get_mut("renderer")
        .ok_or_else(|| mismatch("layerDefinition.drawingInfo.renderer"))?;

    renderer
        .get_mut("visualVariables")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| mismatch("renderer.visualVariables"))?
        .first_mut()
        .ok_or_else(|| mismatch("renderer.visualVariables[0]"))?
        .get_mut("stops")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| mismatch("renderer.visualVariables[0].stops"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn stop(value: i64, color: [u8; 4]) -> Value {
        json!({ "value": value, "color": color, "label": format!("< {}", value) })
    }

    fn webmap() -> Value {
        json!({
            "operationalLayers": [
                { "title": "Counties", "layerDefinition": {} },
                {
                    "id": "erap-1",
                    "title": "ERAP Applications",
                    "url": "https://services.example.com/arcgis/rest/services/ERAP/FeatureServer/0",
                    "layerDefinition": {
                        "drawingInfo": {
                            "renderer": {
                                "type": "simple",
                                "visualVariables": [{
                                    "type": "colorInfo",
                                    "field": "Applications",
                                    "stops": [
                                        stop(1, [255, 252, 212, 255]),
                                        stop(2, [177, 205, 194, 255]),
                                        stop(3, [98, 158, 176, 255]),
                                        stop(4, [56, 98, 122, 255]),
                                        stop(5, [13, 38, 68, 255])
                                    ]
                                }]
                            }
                        }
                    }
                }
            ],
            "baseMap": { "title": "Topographic" },
            "version": "2.24"
        })
    }

    fn stops_of(doc: &Value) -> &Vec<Value> {
        doc["operationalLayers"][1]["layerDefinition"]["drawingInfo"]["renderer"]
            ["visualVariables"][0]["stops"]
            .as_array()
            .unwrap()
    }

    #[test]
    fn finds_layer_by_exact_title() {
        assert_eq!(find_layer_index(&webmap(), "ERAP Applications").unwrap(), 1);
        assert!(find_layer_index(&webmap(), "ERAP").is_err());
    }

    #[test]
    fn replaces_only_values() {
        let original = webmap();
        let mut doc = original.clone();

        let updated =
            apply_new_stops(&mut doc, "ERAP Applications", &[10, 18, 27, 36, 45]).unwrap();

        assert_eq!(updated, 5);
        let values: Vec<i64> =
            stops_of(&doc).iter().map(|s| s["value"].as_i64().unwrap()).collect();
        assert_eq!(values, vec![10, 18, 27, 36, 45]);
        for (before, after) in stops_of(&original).iter().zip(stops_of(&doc)) {
            assert_eq!(before["color"], after["color"]);
            assert_eq!(before["label"], after["label"]);
        }
        assert_eq!(doc["baseMap"], original["baseMap"]);
        assert_eq!(doc["operationalLayers"][0], original["operationalLayers"][0]);
    }

    #[test]
    fn fewer_new_values_update_leading_stops() {
        let mut doc = webmap();
        let updated = apply_new_stops(&mut doc, "ERAP Applications", &[100, 200, 300]).unwrap();

        assert_eq!(updated, 3);
        let values: Vec<i64> =
            stops_of(&doc).iter().map(|s| s["value"].as_i64().unwrap()).collect();
        assert_eq!(values, vec![100, 200, 300, 4, 5]);
    }

    #[test]
    fn extra_new_values_are_ignored() {
        let mut doc = webmap();
        let updated =
            apply_new_stops(&mut doc, "ERAP Applications", &[1, 2, 3, 4, 5, 6, 7]).unwrap();
        assert_eq!(updated, 5);
        assert_eq!(stops_of(&doc).len(), 5);
    }

    #[test]
    fn unknown_layer_leaves_document_untouched() {
        let original = webmap();
        let mut doc = original.clone();

        let err = apply_new_stops(&mut doc, "Missing Layer", &[1, 2, 3]).unwrap_err();

        assert!(matches!(err, AppError::LayerNotFound { title } if title == "Missing Layer"));
        assert_eq!(doc, original);
    }

    #[test]
    fn classed_renderer_is_a_shape_mismatch() {
        let mut doc = webmap();
        doc["operationalLayers"][1]["layerDefinition"]["drawingInfo"]["renderer"] =
            json!({ "type": "classBreaks", "classBreakInfos": [] });
        let before = doc.clone();

        let err = apply_new_stops(&mut doc, "ERAP Applications", &[1]).unwrap_err();

        match err {
            AppError::RendererShapeMismatch { layer, missing } => {
                assert_eq!(layer, "ERAP Applications");
                assert_eq!(missing, "renderer.visualVariables");
            }
            other => panic!("unexpected error variant: {}", other),
        }
        assert_eq!(doc, before);
    }

    #[test]
    fn missing_drawing_info_is_a_shape_mismatch() {
        let mut doc = webmap();
        let err = apply_new_stops(&mut doc, "Counties", &[1]).unwrap_err();
        assert!(matches!(err, AppError::RendererShapeMismatch { .. }));
    }

    #[test]
    fn document_without_layers_has_no_match() {
        let mut doc = json!({ "version": "2.24" });
        assert!(matches!(
            apply_new_stops(&mut doc, "x", &[1]),
            Err(AppError::LayerNotFound { .. })
        ));
    }

    #[test]
    fn non_object_stop_fails_before_any_write() {
        let mut doc = webmap();
        doc["operationalLayers"][1]["layerDefinition"]["drawingInfo"]["renderer"]
            ["visualVariables"][0]["stops"][1] = json!(7);
        let before = doc.clone();

        let err = apply_new_stops(&mut doc, "ERAP Applications", &[1, 2, 3, 4, 5]).unwrap_err();

        match err {
            AppError::RendererShapeMismatch { layer, missing } => {
                assert_eq!(layer, "ERAP Applications");
                assert_eq!(missing, "renderer.visualVariables[0].stops[1]");
            }
            other => panic!("unexpected error variant: {}", other),
        }
        assert_eq!(doc, before);
    }

    #[test]
    fn reads_current_stop_values() {
        let values = current_stop_values(&webmap(), "ERAP Applications").unwrap();
        assert_eq!(values, vec![json!(1), json!(2), json!(3), json!(4), json!(5)]);
    }
}
