pub mod arcgis_portal;
pub mod csv_table;
pub mod directory_transfer;
pub mod local_filesystem;

pub use arcgis_portal::ArcGisPortalClient;
pub use csv_table::{read_csv_into_table, read_headed_csv};
pub use directory_transfer::MirroredDirectoryTransfer;
pub use local_filesystem::LocalFolderFilesystem;
