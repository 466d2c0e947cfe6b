//! The scheduled run: rotate, download, update, reclassify.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::adapters::read_csv_into_table;
use crate::app::AppContext;
use crate::app::commands::reclassify::ColorRampReclassifier;
use crate::app::commands::rotate::FolderRotator;
use crate::app::commands::update::FeatureServiceInLineUpdater;
use crate::domain::{AppError, EraConfig};
use crate::ports::{FeatureLayerSource, FileTransfer, FolderFilesystem, WebMapStore};

/// Subject line used when the summary is sent on.
pub const SUMMARY_SUBJECT: &str = "ERAP Update Summary";

/// What one run did, rendered as the plain-text run report.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub download_dir: PathBuf,
    pub files_downloaded: usize,
    pub rows_updated: usize,
    pub reclassified: bool,
}

impl RunSummary {
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }

    pub fn reclassifier_result(&self) -> &'static str {
        if self.reclassified { "Success" } else { "Failure" }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.duration().num_seconds().max(0);
        writeln!(f, "ERAP update {}", self.start.format("%Y-%m-%d"))?;
        writeln!(f, "{}", "=".repeat(20))?;
        writeln!(f)?;
        writeln!(f, "Start time: {}", self.start.format("%H:%M:%S"))?;
        writeln!(f, "End time: {}", self.end.format("%H:%M:%S"))?;
        writeln!(f, "Duration: {}:{:02}:{:02}", seconds / 3600, (seconds / 60) % 60, seconds % 60)?;
        writeln!(f, "{} files downloaded from transfer source", self.files_downloaded)?;
        writeln!(f, "{} rows updated in Feature Service", self.rows_updated)?;
        write!(f, "Reclassifier webmap update operation: {}", self.reclassifier_result())
    }
}

/// Execute the full pipeline against the given collaborators.
pub fn execute<F, W, L, T>(
    ctx: &AppContext<F, W, L, T>,
    config: &EraConfig,
) -> Result<RunSummary, AppError>
where
    F: FolderFilesystem,
    W: WebMapStore,
    L: FeatureLayerSource,
    T: FileTransfer,
{
    let start = Local::now();

    let rotation = &config.rotation;
    let rotator =
        FolderRotator::new(ctx.filesystem(), &rotation.base_dir, rotation.name_pattern()?);
    let download_dir =
        rotator.get_rotated_directory(rotation.exist_ok, rotation.max_folder_count)?.created;

    tracing::info!("Getting data from transfer source");
    let files_downloaded = ctx.transfer().download(&config.transfer.folder, &download_dir)?;
    let table = read_csv_into_table(
        &download_dir.join(&config.data.file_name),
        &config.data.columns,
        config.data.has_header,
    )?;

    tracing::info!("Updating data in the feature service");
    let updater = FeatureServiceInLineUpdater::new(ctx.layers(), &table, &config.data.key_column)?;
    let rows_updated = updater.update_feature_service(
        config.portal.feature_service_url.as_str(),
        &config.data.field_names(),
    )?;

    tracing::info!("Reclassifying the map");
    let target = &config.reclassify;
    let reclassifier =
        ColorRampReclassifier::new(ctx.webmaps(), ctx.layers(), target.webmap_item_id.as_str());
    let reclassified = reclassifier.update_color_ramp_values(
        &target.layer_title,
        &target.column,
        target.stop_count,
    )?;

    let summary = RunSummary {
        start,
        end: Local::now(),
        download_dir,
        files_downloaded,
        rows_updated,
        reclassified,
    };
    tracing::info!(subject = SUMMARY_SUBJECT, "\n{}", summary);
    Ok(summary)
}
