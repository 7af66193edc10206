//! In-memory template store.

use std::{
    collections::BTreeMap,
    path::Path,
    sync::{Arc, RwLock},
};

use stencil_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{DomainValidator as validator, Template, TemplateId},
    error::StencilResult,
};
use tracing::debug;

use crate::{builtin_templates, template_loader::FilesystemTemplateLoader};

/// Thread-safe in-memory template store keyed by template name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<BTreeMap<String, Template>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store filled from the first templates directory found.
    pub fn with_builtin() -> StencilResult<Self> {
        let store = Self::new();
        for template in builtin_templates::all_templates()? {
            store.insert(template)?;
        }
        Ok(store)
    }

    /// Create a store filled from one templates directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> StencilResult<Self> {
        let store = Self::new();
        for template in FilesystemTemplateLoader::new(dir.as_ref()).load_all()? {
            store.insert(template)?;
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TemplateStore for InMemoryStore {
    fn get(&self, name: &str) -> StencilResult<Template> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let not_found = || ApplicationError::TemplateNotFound {
            name: name.to_string(),
        };

        // `name@version` must match the stored version exactly.
        let (key, version) = match name.split_once('@') {
            Some(_) => {
                let id = TemplateId::parse(name).map_err(|_| not_found())?;
                (id.name().to_string(), Some(id.version().to_string()))
            }
            None => (name.to_string(), None),
        };

        let template = inner.get(&key).ok_or_else(not_found)?;
        if let Some(version) = version {
            if template.id.version() != version {
                return Err(not_found().into());
            }
        }
        Ok(template.clone())
    }

    fn list(&self) -> StencilResult<Vec<Template>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner.values().cloned().collect())
    }

    fn insert(&self, template: Template) -> StencilResult<()> {
        validator::validate_template(&template)?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        debug!(template = %template.id, "storing template");
        inner.insert(template.name().to_string(), template);
        Ok(())
    }
}
