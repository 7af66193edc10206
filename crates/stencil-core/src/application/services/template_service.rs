//! Template Service - template queries.
//!
//! Separated from GenerateService for single responsibility.

use serde::Serialize;

use crate::{
    application::ports::TemplateStore,
    domain::{PromptSpec, Template},
    error::StencilResult,
};

/// Information about a template for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub prompts: Vec<PromptInfo>,
    pub post_emit: Option<String>,
    pub entries: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptInfo {
    pub name: String,
    pub default: Option<String>,
}

impl From<&PromptSpec> for PromptInfo {
    fn from(p: &PromptSpec) -> Self {
        Self {
            name: p.name.clone(),
            default: p.default.clone(),
        }
    }
}

impl From<&Template> for TemplateInfo {
    fn from(t: &Template) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name().to_string(),
            description: t.metadata.description.clone(),
            tags: t.metadata.tags.clone(),
            prompts: t.prompts.iter().map(PromptInfo::from).collect(),
            post_emit: t.post_emit.as_ref().map(|p| p.describe()),
            entries: t.tree.len(),
        }
    }
}

/// Service for template operations.
pub struct TemplateService {
    store: Box<dyn TemplateStore>,
}

impl TemplateService {
    /// Create a new template service.
    pub fn new(store: Box<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// Get a template by name.
    pub fn get(&self, name: &str) -> StencilResult<Template> {
        self.store.get(name)
    }

    /// Display info for every template, sorted by name.
    pub fn list(&self) -> StencilResult<Vec<TemplateInfo>> {
        let mut infos: Vec<TemplateInfo> =
            self.store.list()?.iter().map(TemplateInfo::from).collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(infos)
    }

    /// Display info for one template.
    pub fn info(&self, name: &str) -> StencilResult<TemplateInfo> {
        self.store.get(name).map(|t| TemplateInfo::from(&t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::domain::{FileSpec, PostEmit, TemplateContent, TemplateId, TemplateMetadata, TemplateNode};
    use std::sync::Mutex;

    #[derive(Default)]
    struct VecStore(Mutex<Vec<Template>>);

    impl TemplateStore for VecStore {
        fn get(&self, name: &str) -> StencilResult<Template> {
            self.0
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.name() == name)
                .cloned()
                .ok_or_else(|| ApplicationError::TemplateNotFound { name: name.into() }.into())
        }

        fn list(&self) -> StencilResult<Vec<Template>> {
            Ok(self.0.lock().unwrap().clone())
        }

        fn insert(&self, template: Template) -> StencilResult<()> {
            self.0.lock().unwrap().push(template);
            Ok(())
        }
    }

    fn template(name: &str) -> Template {
        Template::builder()
            .id(TemplateId::new(name, "1.0.0"))
            .metadata(TemplateMetadata::new(name).description("demo"))
            .add_node(TemplateNode::File(FileSpec::new(
                "console.sh",
                TemplateContent::detect("#!/bin/sh\n"),
            )))
            .post_emit(PostEmit::mark_console_executable())
            .build()
            .unwrap()
    }

    #[test]
    fn list_is_sorted_and_describes_post_emit() {
        let store = VecStore::default();
        store.insert(template("zeta")).unwrap();
        store.insert(template("alpha")).unwrap();
        let service = TemplateService::new(Box::new(store));

        let infos = service.list().unwrap();
        let names: Vec<_> = infos.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["alpha", "zeta"]);
        assert_eq!(infos[0].post_emit.as_deref(), Some("chmod u+x console.sh"));
        assert_eq!(infos[0].id, "alpha@1.0.0");
    }

    #[test]
    fn info_for_unknown_template_fails() {
        let service = TemplateService::new(Box::new(VecStore::default()));
        assert!(service.info("missing").is_err());
    }
}
