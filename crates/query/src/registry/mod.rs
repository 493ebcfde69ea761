//! Model descriptor registry.
//!
//! The registry is a closed mapping from collection name to
//! [`ModelDescriptor`]. It is populated once at startup and read by every
//! request. Lookups hand out an `Arc` to the descriptor, so a request keeps
//! one consistent descriptor for its whole lifetime even if a reload swaps
//! the table underneath it.

mod builtin;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::{QueryError, QueryResult, RegistryError};
use crate::types::ModelDescriptor;

pub use builtin::builtin_models;

type DescriptorTable = HashMap<String, Arc<ModelDescriptor>>;

/// On-disk shape of a descriptor file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriptorFile {
    /// The model descriptors.
    pub models: Vec<ModelDescriptor>,
}

/// Update notification for registry changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryUpdate {
    /// The whole table was replaced; carries the new model count.
    Reloaded(usize),
}

/// Registry of model descriptors keyed by collection.
pub struct ModelRegistry {
    /// The current table. Replaced wholesale on reload, never mutated in place.
    table: RwLock<Arc<DescriptorTable>>,

    /// Notification channel for registry updates.
    update_tx: broadcast::Sender<RegistryUpdate>,
}

impl ModelRegistry {
    /// Creates a registry from the given descriptors.
    ///
    /// Every descriptor is validated and collection names must be unique.
    pub fn new(models: Vec<ModelDescriptor>) -> Result<Self, RegistryError> {
        let table = build_table(models)?;
        let (update_tx, _) = broadcast::channel(16);
        Ok(Self {
            table: RwLock::new(Arc::new(table)),
            update_tx,
        })
    }

    /// Creates a registry holding the built-in congressional models.
    pub fn builtin() -> Self {
        let table = builtin_models()
            .into_iter()
            .map(|m| (m.collection.clone(), Arc::new(m)))
            .collect();
        let (update_tx, _) = broadcast::channel(16);
        Self {
            table: RwLock::new(Arc::new(table)),
            update_tx,
        }
    }

    /// Creates a registry from a JSON descriptor document.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let file: DescriptorFile = serde_json::from_str(json)?;
        Self::new(file.models)
    }

    /// Creates a registry from a JSON descriptor file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        Self::new(read_descriptor_file(path.as_ref())?)
    }

    /// Looks up the descriptor for a collection.
    pub fn lookup(&self, collection: &str) -> QueryResult<Arc<ModelDescriptor>> {
        self.table
            .read()
            .get(collection)
            .cloned()
            .ok_or_else(|| QueryError::UnknownModel {
                collection: collection.to_string(),
            })
    }

    /// Returns the current table snapshot.
    pub fn snapshot(&self) -> Arc<HashMap<String, Arc<ModelDescriptor>>> {
        Arc::clone(&self.table.read())
    }

    /// Returns the registered collection names, sorted.
    pub fn collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.snapshot().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of registered models.
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    /// Returns true if no models are registered.
    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    /// Replaces the whole table.
    ///
    /// The new table is built and validated before the swap; on error the
    /// current table stays in place.
    pub fn reload(&self, models: Vec<ModelDescriptor>) -> Result<usize, RegistryError> {
        let table = build_table(models)?;
        let count = table.len();
        *self.table.write() = Arc::new(table);

        info!(models = count, "Model registry reloaded");
        let _ = self.update_tx.send(RegistryUpdate::Reloaded(count));
        Ok(count)
    }

    /// Replaces the whole table from a JSON descriptor document.
    pub fn reload_from_json_str(&self, json: &str) -> Result<usize, RegistryError> {
        let file: DescriptorFile = serde_json::from_str(json)?;
        self.reload(file.models)
    }

    /// Subscribes to registry updates.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryUpdate> {
        self.update_tx.subscribe()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("collections", &self.collections())
            .finish()
    }
}

fn read_descriptor_file(path: &Path) -> Result<Vec<ModelDescriptor>, RegistryError> {
    debug!(path = %path.display(), "Reading model descriptors");
    let raw = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file: DescriptorFile = serde_json::from_str(&raw)?;
    Ok(file.models)
}

fn build_table(models: Vec<ModelDescriptor>) -> Result<DescriptorTable, RegistryError> {
    let mut table = HashMap::with_capacity(models.len());
    for model in models {
        model.validate()?;
        if table.contains_key(&model.collection) {
            return Err(RegistryError::DuplicateCollection {
                collection: model.collection,
            });
        }
        table.insert(model.collection.clone(), Arc::new(model));
    }
    Ok(table)
}
