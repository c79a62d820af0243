//! Reference brand and material profiles that ground every model request.
//!
//! Both documents are opaque JSON objects: the store never looks inside
//! them beyond listing top-level keys. They are loaded once and shared
//! read-only (`Arc<KnowledgeStore>`) for the life of the process.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("could not read knowledge file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse knowledge file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: serde_json::Error },
    #[error("knowledge document `{name}` must be a JSON object")]
    NotAnObject { name: &'static str },
}

#[derive(Clone, Debug, PartialEq)]
pub struct KnowledgeStore {
    brand_profiles: Value,
    materials_profiles: Value,
}

impl KnowledgeStore {
    pub fn new(brand_profiles: Value, materials_profiles: Value) -> Result<Self, KnowledgeError> {
        if !brand_profiles.is_object() {
            return Err(KnowledgeError::NotAnObject { name: "brand_profiles" });
        }
        if !materials_profiles.is_object() {
            return Err(KnowledgeError::NotAnObject { name: "materials_profiles" });
        }

        Ok(Self { brand_profiles, materials_profiles })
    }

    pub fn load(brand_path: &Path, materials_path: &Path) -> Result<Self, KnowledgeError> {
        let brand_profiles = read_document(brand_path)?;
        let materials_profiles = read_document(materials_path)?;
        let store = Self::new(brand_profiles, materials_profiles)?;

        tracing::info!(
            event_name = "knowledge.store.loaded",
            brand_path = %brand_path.display(),
            materials_path = %materials_path.display(),
            brands = store.brand_names().len(),
            materials = store.material_names().len(),
            "reference knowledge loaded"
        );
        Ok(store)
    }

    pub fn brand_profiles(&self) -> &Value {
        &self.brand_profiles
    }

    pub fn materials_profiles(&self) -> &Value {
        &self.materials_profiles
    }

    pub fn brand_names(&self) -> Vec<&str> {
        top_level_keys(&self.brand_profiles)
    }

    pub fn material_names(&self) -> Vec<&str> {
        top_level_keys(&self.materials_profiles)
    }
}

fn read_document(path: &Path) -> Result<Value, KnowledgeError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| KnowledgeError::ReadFile { path: path.to_path_buf(), source })?;
    serde_json::from_str(&raw)
        .map_err(|source| KnowledgeError::ParseFile { path: path.to_path_buf(), source })
}

fn top_level_keys(document: &Value) -> Vec<&str> {
    document.as_object().map(|map| map.keys().map(String::as_str).collect()).unwrap_or_default()
}
