//! ArcGIS portal client implementation using reqwest.
//!
//! One client serves both the web map item store and the hosted feature
//! layer endpoints; every request carries the session token and `f=json`.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde_json::{Map, Value};
use url::Url;

use crate::domain::{AppError, DataTable, PortalConfig};
use crate::ports::{EditResult, FeatureLayerSource, WebMapStore};

const DEFAULT_STATUS_MESSAGE: &str = "Portal request failed";
const TOKEN_EXPIRATION_MINUTES: &str = "120";
const OID_FIELD_TYPE: &str = "esriFieldTypeOID";

/// HTTP transport for the portal's sharing and feature service REST APIs.
#[derive(Clone)]
pub struct ArcGisPortalClient {
    org_url: Url,
    token: String,
    page_size: usize,
    client: Client,
}

impl std::fmt::Debug for ArcGisPortalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArcGisPortalClient")
            .field("org_url", &self.org_url)
            .field("page_size", &self.page_size)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl ArcGisPortalClient {
    /// Create a client around an existing token.
    pub fn new(config: &PortalConfig, token: String) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::portal(format!("Failed to create HTTP client: {}", e), None)
            })?;

        Ok(Self {
            org_url: config.org_url.clone(),
            token,
            page_size: config.page_size,
            client,
        })
    }

    /// Generate a token for `config.username` and return a ready client.
    pub fn sign_in(config: &PortalConfig, password: &str) -> Result<Self, AppError> {
        tracing::debug!(org = %config.org_url, user = %config.username, "Signing in to portal");
        let mut unauthenticated = Self::new(config, String::new())?;

        let url = unauthenticated.sharing_url("generateToken")?;
        let referer = config.org_url.as_str().to_string();
        let response = unauthenticated.post_form(
            &url,
            &[
                ("username", config.username.clone()),
                ("password", password.to_string()),
                ("client", "referer".to_string()),
                ("referer", referer),
                ("expiration", TOKEN_EXPIRATION_MINUTES.to_string()),
            ],
        )?;

        let token = response
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::portal("No token in generateToken response", None))?;
        unauthenticated.token = token.to_string();
        Ok(unauthenticated)
    }

    fn sharing_url(&self, path: &str) -> Result<Url, AppError> {
        let raw =
            format!("{}/sharing/rest/{}", self.org_url.as_str().trim_end_matches('/'), path);
        Url::parse(&raw)
            .map_err(|e| AppError::portal(format!("Invalid portal URL '{}': {}", raw, e), None))
    }

    fn layer_url(layer_url: &str, operation: &str) -> Result<Url, AppError> {
        let raw = if operation.is_empty() {
            layer_url.trim_end_matches('/').to_string()
        } else {
            format!("{}/{}", layer_url.trim_end_matches('/'), operation)
        };
        Url::parse(&raw)
            .map_err(|e| AppError::portal(format!("Invalid layer URL '{}': {}", raw, e), None))
    }

    fn common_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("f", "json".to_string())];
        if !self.token.is_empty() {
            params.push(("token", self.token.clone()));
        }
        params
    }

    fn get_json(&self, url: &Url, query: &[(&str, String)]) -> Result<Value, AppError> {
        let response = self
            .client
            .get(url.clone())
            .query(&self.common_params())
            .query(query)
            .send()
            .map_err(|e| AppError::portal(format!("HTTP request failed: {}", e), None))?;
        read_json(response)
    }

    fn post_form(&self, url: &Url, form: &[(&str, String)]) -> Result<Value, AppError> {
        let mut fields: Vec<(&str, String)> = self.common_params();
        fields.extend(form.iter().cloned());

        let response = self
            .client
            .post(url.clone())
            .form(&fields)
            .send()
            .map_err(|e| AppError::portal(format!("HTTP request failed: {}", e), None))?;
        read_json(response)
    }

    fn item_owner(&self, item_id: &str) -> Result<String, AppError> {
        let url = self.sharing_url(&format!("content/items/{}", item_id))?;
        let item = self.get_json(&url, &[])?;
        item.get("owner")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
            .ok_or_else(|| AppError::portal(format!("Item `{}` has no owner", item_id), None))
    }
}

fn read_json(response: Response) -> Result<Value, AppError> {
    let status = response.status();
    let body_text = response.text().unwrap_or_default();

    if !status.is_success() {
        let message = extract_error_message(&body_text).unwrap_or_else(|| {
            if !body_text.trim().is_empty() {
                body_text.clone()
            } else if status.is_server_error() {
                "Server error".to_string()
            } else {
                DEFAULT_STATUS_MESSAGE.to_string()
            }
        });
        return Err(AppError::portal(message, Some(status.as_u16())));
    }

    let parsed: Value = serde_json::from_str(&body_text).map_err(|e| {
        AppError::portal(format!("Failed to parse response: {}", e), Some(status.as_u16()))
    })?;

    // The REST API reports most failures as HTTP 200 with an `error` object.
    if let Some(error) = parsed.get("error") {
        let code =
            error.get("code").and_then(Value::as_u64).and_then(|c| u16::try_from(c).ok());
        let message =
            extract_error_message(&body_text).unwrap_or_else(|| DEFAULT_STATUS_MESSAGE.into());
        return Err(AppError::portal(message, code));
    }

    Ok(parsed)
}

fn extract_error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    let parsed = serde_json::from_str::<Value>(body).ok()?;
    let error = parsed.get("error")?;
    let message = error.get("message").and_then(Value::as_str)?;

    let details: Vec<&str> = error
        .get("details")
        .and_then(Value::as_array)
        .map(|details| {
            details.iter().filter_map(Value::as_str).filter(|d| !d.is_empty()).collect()
        })
        .unwrap_or_default();

    if details.is_empty() {
        Some(message.to_string())
    } else {
        Some(format!("{} ({})", message, details.join("; ")))
    }
}

impl WebMapStore for ArcGisPortalClient {
    fn fetch(&self, item_id: &str) -> Result<Value, AppError> {
        let url = self.sharing_url(&format!("content/items/{}/data", item_id))?;
        self.get_json(&url, &[])
    }

    fn persist(&self, item_id: &str, document: &Value) -> Result<bool, AppError> {
        let owner = self.item_owner(item_id)?;
        let url =
            self.sharing_url(&format!("content/users/{}/items/{}/update", owner, item_id))?;
        let text = serde_json::to_string(document).map_err(|e| AppError::ParseError {
            what: format!("web map `{}`", item_id),
            details: e.to_string(),
        })?;

        let response = self.post_form(&url, &[("text", text)])?;
        tracing::debug!(result = %response, "Update result");
        Ok(response.get("success").and_then(Value::as_bool).unwrap_or(false))
    }
}

impl FeatureLayerSource for ArcGisPortalClient {
    fn object_id_field(&self, layer_url: &str) -> Result<String, AppError> {
        let info = self.get_json(&Self::layer_url(layer_url, "")?, &[])?;

        if let Some(name) = info.get("objectIdField").and_then(Value::as_str) {
            return Ok(name.to_string());
        }
        info.get("fields")
            .and_then(Value::as_array)
            .and_then(|fields| {
                fields
                    .iter()
                    .find(|f| f.get("type").and_then(Value::as_str) == Some(OID_FIELD_TYPE))
            })
            .and_then(|f| f.get("name").and_then(Value::as_str))
            .map(ToOwned::to_owned)
            .ok_or_else(|| {
                AppError::portal(format!("Layer `{}` has no object id field", layer_url), None)
            })
    }

    fn query_table(&self, layer_url: &str, out_fields: &[String]) -> Result<DataTable, AppError> {
        let url = Self::layer_url(layer_url, "query")?;
        let out_fields =
            if out_fields.is_empty() { "*".to_string() } else { out_fields.join(",") };

        let mut table: Option<DataTable> = None;
        let mut offset = 0usize;
        let mut previous_first: Option<Value> = None;
        loop {
            let page = self.get_json(
                &url,
                &[
                    ("where", "1=1".to_string()),
                    ("outFields", out_fields.clone()),
                    ("returnGeometry", "false".to_string()),
                    ("resultOffset", offset.to_string()),
                    ("resultRecordCount", self.page_size.to_string()),
                ],
            )?;

            let features =
                page.get("features").and_then(Value::as_array).cloned().unwrap_or_default();

            // A server that ignores resultOffset keeps returning the same page.
            let first = features.first().and_then(|f| f.get("attributes")).cloned();
            if first.is_some() && first == previous_first {
                tracing::warn!(layer = layer_url, offset, "Query page repeated; stopping paging");
                break;
            }
            previous_first = first;

            let table =
                table.get_or_insert_with(|| DataTable::new(page_columns(&page, &features)));

            for feature in &features {
                let attributes = feature.get("attributes");
                let row = table
                    .columns()
                    .iter()
                    .map(|column| {
                        attributes.and_then(|a| a.get(column)).cloned().unwrap_or(Value::Null)
                    })
                    .collect();
                table.push_row(row);
            }

            let exceeded =
                page.get("exceededTransferLimit").and_then(Value::as_bool).unwrap_or(false);
            if !exceeded || features.is_empty() {
                break;
            }
            offset += features.len();
        }

        let table = table.unwrap_or_default();
        tracing::debug!(layer = layer_url, rows = table.len(), "Queried layer");
        Ok(table)
    }

    fn apply_updates(
        &self,
        layer_url: &str,
        updates: &[Map<String, Value>],
    ) -> Result<Vec<EditResult>, AppError> {
        if updates.is_empty() {
            return Ok(Vec::new());
        }

        let url = Self::layer_url(layer_url, "applyEdits")?;
        let payload: Vec<Value> = updates
            .iter()
            .map(|attributes| serde_json::json!({ "attributes": attributes }))
            .collect();
        let response = self.post_form(&url, &[("updates", Value::Array(payload).to_string())])?;

        let results =
            response.get("updateResults").and_then(Value::as_array).cloned().unwrap_or_default();
        Ok(results.iter().map(edit_result).collect())
    }
}

fn page_columns(page: &Value, features: &[Value]) -> Vec<String> {
    if let Some(fields) = page.get("fields").and_then(Value::as_array) {
        let names: Vec<String> = fields
            .iter()
            .filter_map(|f| f.get("name").and_then(Value::as_str))
            .map(ToOwned::to_owned)
            .collect();
        if !names.is_empty() {
            return names;
        }
    }

    features
        .first()
        .and_then(|f| f.get("attributes"))
        .and_then(Value::as_object)
        .map(|attributes| attributes.keys().cloned().collect())
        .unwrap_or_default()
}

fn edit_result(value: &Value) -> EditResult {
    let error = value.get("error");
    EditResult {
        object_id: value.get("objectId").and_then(Value::as_i64),
        success: value.get("success").and_then(Value::as_bool).unwrap_or(false),
        description: error
            .and_then(|e| e.get("description").or_else(|| e.get("message")))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned),
    }
}
