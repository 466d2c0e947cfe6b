//! Pure parse/validate for `era.toml`.

use crate::domain::{AppError, EraConfig};

/// Parse and validate configuration from TOML content.
pub fn parse_config_content(content: &str) -> Result<EraConfig, AppError> {
    let config: EraConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::ColumnType;

    const MINIMAL: &str = r#"
[rotation]
base_dir = "/data/era"

[transfer]
source_dir = "/mnt/sftp"

[data]
file_name = "erap.csv"
key_column = "ZipCode"
columns = [
    { name = "ZipCode", type = "integer" },
    { name = "Applications", type = "float" },
]

[portal]
org_url = "https://example.maps.arcgis.com"
username = "svc_era"
feature_service_url = "https://services.example.com/arcgis/rest/services/ERAP/FeatureServer/0"

[reclassify]
webmap_item_id = "0123456789abcdef"
layer_title = "ERAP Applications"
column = "Applications"
"#;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config = parse_config_content(MINIMAL).unwrap();

        assert_eq!(config.rotation.base_dir.to_str(), Some("/data/era"));
        assert_eq!(config.rotation.max_folder_count, 10);
        assert_eq!(config.transfer.folder, "upload");
        assert!(!config.data.has_header);
        assert_eq!(config.data.columns[1].column_type, ColumnType::Float);
        assert_eq!(config.portal.timeout_secs, 30);
        assert_eq!(config.portal.page_size, 2000);
        assert_eq!(config.reclassify.stop_count, 5);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.log_path.is_none());
    }

    #[test]
    fn rejects_unknown_fields() {
        let content = format!("{}\n[extra]\nvalue = 1\n", MINIMAL);
        assert!(matches!(parse_config_content(&content), Err(AppError::TomlParseError(_))));
    }

    #[test]
    fn rejects_missing_section() {
        let content = MINIMAL.replace("[transfer]\nsource_dir = \"/mnt/sftp\"\n", "");
        assert!(parse_config_content(&content).is_err());
    }

    #[test]
    fn runs_validation_after_parse() {
        let content = MINIMAL
            .replace("column = \"Applications\"", "column = \"Applications\"\nstop_count = 0");
        assert!(matches!(parse_config_content(&content), Err(AppError::Configuration(_))));
    }
}
