mod feature_layer;
mod file_transfer;
mod folder_filesystem;
mod webmap_store;

pub use feature_layer::{EditResult, FeatureLayerSource};
pub use file_transfer::FileTransfer;
pub use folder_filesystem::FolderFilesystem;
pub use webmap_store::WebMapStore;
