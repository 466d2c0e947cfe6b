use crate::ports::{FeatureLayerSource, FileTransfer, FolderFilesystem, WebMapStore};

/// Application context holding the collaborators a run talks to.
pub struct AppContext<F, W, L, T>
where
    F: FolderFilesystem,
    W: WebMapStore,
    L: FeatureLayerSource,
    T: FileTransfer,
{
    filesystem: F,
    webmaps: W,
    layers: L,
    transfer: T,
}

impl<F, W, L, T> AppContext<F, W, L, T>
where
    F: FolderFilesystem,
    W: WebMapStore,
    L: FeatureLayerSource,
    T: FileTransfer,
{
    /// Create a new application context.
    pub fn new(filesystem: F, webmaps: W, layers: L, transfer: T) -> Self {
        Self { filesystem, webmaps, layers, transfer }
    }

    pub fn filesystem(&self) -> &F {
        &self.filesystem
    }

    pub fn webmaps(&self) -> &W {
        &self.webmaps
    }

    pub fn layers(&self) -> &L {
        &self.layers
    }

    pub fn transfer(&self) -> &T {
        &self.transfer
    }
}
