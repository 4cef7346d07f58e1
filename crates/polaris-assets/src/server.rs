use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::error::AssetError;
use crate::handle::{next_asset_id, AssetHandle, AssetId};
use crate::mesh::MeshAsset;

/// Central asset registry. Registers constructed meshes, dedups by name, and
/// hands out shared references. Interior locking so it can be held as
/// `Arc<AssetServer>` by systems while the loading layer keeps registering.
pub struct AssetServer {
    inner: RwLock<Inner>,
}

struct Inner {
    meshes: HashMap<AssetId, Arc<MeshAsset>>,
    by_name: HashMap<String, AssetHandle<MeshAsset>>,
}

impl AssetServer {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                meshes: HashMap::new(),
                by_name: HashMap::new(),
            }),
        }
    }

    /// Register a constructed mesh under its own name. Fails if the name is
    /// already taken.
    pub fn register_mesh(&self, mesh: MeshAsset) -> Result<AssetHandle<MeshAsset>, AssetError> {
        let mut inner = self.inner.write();
        if inner.by_name.contains_key(&mesh.name) {
            return Err(AssetError::DuplicateName(mesh.name));
        }
        let id = next_asset_id();
        let handle = AssetHandle::new(id);
        info!(name = %mesh.name, id, "registered mesh asset");
        inner.by_name.insert(mesh.name.clone(), handle);
        inner.meshes.insert(id, Arc::new(mesh));
        Ok(handle)
    }

    /// Shared reference to a mesh by handle.
    pub fn mesh(&self, handle: AssetHandle<MeshAsset>) -> Option<Arc<MeshAsset>> {
        self.inner.read().meshes.get(&handle.id()).cloned()
    }

    /// Look up a mesh handle by asset name.
    pub fn find_mesh(&self, name: &str) -> Result<AssetHandle<MeshAsset>, AssetError> {
        self.inner
            .read()
            .by_name
            .get(name)
            .copied()
            .ok_or_else(|| AssetError::NotFound(name.to_string()))
    }

    /// Number of registered meshes.
    pub fn mesh_count(&self) -> usize {
        self.inner.read().meshes.len()
    }
}

impl Default for AssetServer {
    fn default() -> Self {
        Self::new()
    }
}
