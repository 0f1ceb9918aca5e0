//! Registry of record types bound to a backing INI file

use std::path::{Path, PathBuf};
use tracing::debug;

use super::ini::Section;
use super::loader::{self, Records};
use super::schema::{RecordInstance, RecordType};
use crate::error::{Error, Result};

/// Typed settings backed by one INI file.
///
/// After a successful [`ConfigStore::load`] every registered record type has
/// exactly one instance. Sections in the file that no registered type owns
/// are kept and written back unchanged on [`ConfigStore::save`].
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    record_types: Vec<RecordType>,
    records: Records,
    foreign: Vec<Section>,
    fallback: Option<String>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>, record_types: impl IntoIterator<Item = RecordType>) -> Self {
        let mut store = Self {
            path: path.into(),
            record_types: Vec::new(),
            records: Records::new(),
            foreign: Vec::new(),
            fallback: None,
        };
        for record_type in record_types {
            store.register(record_type);
        }
        store
    }

    /// Create a store and load it from `path` in one step
    pub fn open(path: impl Into<PathBuf>, record_types: impl IntoIterator<Item = RecordType>) -> Result<Self> {
        let mut store = Self::new(path, record_types);
        store.load()?;
        Ok(store)
    }

    /// Add a record type, replacing any type registered under the same name.
    ///
    /// A loaded instance of a replaced type is carried over to the new
    /// schema: matching fields keep their values, the rest take defaults.
    pub fn register(&mut self, record_type: RecordType) {
        if let Some(previous) = self.records.get(record_type.name()) {
            let refilled = record_type.refill(previous);
            self.records.insert(record_type.name().to_string(), refilled);
        }
        match self
            .record_types
            .iter_mut()
            .find(|t| t.name() == record_type.name())
        {
            Some(existing) => *existing = record_type,
            None => self.record_types.push(record_type),
        }
    }

    /// Load all registered types from the backing file.
    ///
    /// On error the previously loaded state is left as it was.
    pub fn load(&mut self) -> Result<()> {
        let (doc, fallback) = loader::read_or_default(&self.path);
        let records = loader::load_from_document(&doc, &self.record_types)?;

        self.foreign = doc
            .sections()
            .iter()
            .filter(|s| !self.is_registered(s.name()))
            .cloned()
            .collect();
        self.records = records;
        self.fallback = fallback;

        debug!(
            path = %self.path.display(),
            records = self.records.len(),
            foreign = self.foreign.len(),
            "Loaded config"
        );
        Ok(())
    }

    /// Rewrite the backing file with every registered type.
    pub fn save(&self) -> Result<()> {
        let mut doc = loader::to_document(&self.record_types, &self.records);
        for section in &self.foreign {
            if !self.is_registered(section.name()) {
                doc.set_section(section.clone());
            }
        }
        loader::write_document(&self.path, &doc)
    }

    /// Get the loaded instance of a record type
    pub fn get(&self, name: &str) -> Result<&RecordInstance> {
        self.records
            .get(name)
            .ok_or_else(|| Error::RecordNotFound(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut RecordInstance> {
        self.records
            .get_mut(name)
            .ok_or_else(|| Error::RecordNotFound(name.to_string()))
    }

    /// Replace the instance of a registered record type.
    ///
    /// The instance must have exactly the registered fields with their
    /// declared kinds; otherwise the store is left unchanged.
    pub fn set(&mut self, instance: RecordInstance) -> Result<()> {
        let record_type = self
            .record_type(instance.record())
            .ok_or_else(|| Error::RecordNotFound(instance.record().to_string()))?;
        let instance = record_type.conform(instance)?;
        self.records.insert(instance.record().to_string(), instance);
        Ok(())
    }

    pub fn record_type(&self, name: &str) -> Option<&RecordType> {
        self.record_types.iter().find(|t| t.name() == name)
    }

    pub fn record_types(&self) -> &[RecordType] {
        &self.record_types
    }

    /// Loaded instances in registration order
    pub fn instances(&self) -> impl Iterator<Item = &RecordInstance> {
        self.record_types
            .iter()
            .filter_map(|t| self.records.get(t.name()))
    }

    /// Sections read from the file that no registered type owns
    pub fn foreign_sections(&self) -> &[Section] {
        &self.foreign
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Why the last load used defaults instead of the file, if it did
    pub fn fallback_reason(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    fn is_registered(&self, name: &str) -> bool {
        self.record_type(name).is_some()
    }
}
