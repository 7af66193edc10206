//! Templates: what a generation run copies, what it asks for, and what it
//! does once the files are on disk.
//!
//! A [`Template`] is built once (by the loader or in tests) through
//! [`TemplateBuilder`], checked, and from then on only read.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::{
        common::{Permissions, RelativePath},
        prompt::PromptSpec,
    },
    error::DomainError,
};

/// File the shipped post-emit action targets when none is configured.
pub const DEFAULT_EXECUTABLE: &str = "console.sh";

const UNVERSIONED: &str = "0.0.0";

/// `name@version`, e.g. `webpack-babel-ts@1.0.0`.
///
/// Lookups go by name; the version is informational.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateId {
    name: String,
    version: String,
}

impl TemplateId {
    /// Unchecked. A name containing `@` is caught by [`Template::validate`].
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Accepts `name` or `name@version`; a missing version reads as `0.0.0`.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let (name, version) = s.split_once('@').unwrap_or((s, UNVERSIONED));
        if name.is_empty() || version.is_empty() || version.contains('@') {
            return Err(DomainError::InvalidTemplate(format!(
                "'{s}' is not a template id; use 'name' or 'name@version'"
            )));
        }
        Ok(Self::new(name, version))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

#[derive(Debug, Clone)]
pub struct Template {
    pub id: TemplateId,
    pub metadata: TemplateMetadata,
    /// Asked in this order.
    pub prompts: Vec<PromptSpec>,
    pub tree: TemplateTree,
    pub post_emit: Option<PostEmit>,
}

impl Template {
    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::default()
    }

    pub fn name(&self) -> &str {
        self.id.name()
    }

    /// A usable template has a plain name, at least one node, no path twice
    /// and no prompt name twice.
    pub fn validate(&self) -> Result<(), DomainError> {
        let name = self.id.name();
        if name.is_empty() || name.contains('@') {
            return Err(DomainError::InvalidTemplate(format!(
                "'{name}' is not a valid template name"
            )));
        }

        if self.tree.is_empty() {
            return Err(DomainError::EmptyTemplate {
                template_id: self.id.to_string(),
            });
        }

        if let Some(path) = first_repeat(self.tree.nodes.iter().map(|n| n.path().as_str())) {
            return Err(DomainError::DuplicatePath { path: path.into() });
        }

        for prompt in &self.prompts {
            prompt.validate()?;
        }
        if let Some(name) = first_repeat(self.prompts.iter().map(|p| p.name.as_str())) {
            return Err(DomainError::DuplicatePrompt { name: name.into() });
        }

        Ok(())
    }

    pub fn prompt(&self, name: &str) -> Option<&PromptSpec> {
        self.prompts.iter().find(|p| p.name == name)
    }
}

fn first_repeat<T: Eq + Hash>(items: impl Iterator<Item = T>) -> Option<T> {
    let mut seen = HashSet::new();
    for item in items {
        if seen.contains(&item) {
            return Some(item);
        }
        seen.insert(item);
    }
    None
}

/// Collects the parts of a [`Template`]; `build` checks them.
#[derive(Default)]
pub struct TemplateBuilder {
    id: Option<TemplateId>,
    metadata: Option<TemplateMetadata>,
    prompts: Vec<PromptSpec>,
    tree: TemplateTree,
    post_emit: Option<PostEmit>,
}

impl TemplateBuilder {
    pub fn id(self, id: TemplateId) -> Self {
        Self { id: Some(id), ..self }
    }

    pub fn metadata(self, metadata: TemplateMetadata) -> Self {
        Self {
            metadata: Some(metadata),
            ..self
        }
    }

    pub fn prompt(mut self, prompt: PromptSpec) -> Self {
        self.prompts.push(prompt);
        self
    }

    /// Replaces prompts added so far.
    pub fn prompts(self, prompts: Vec<PromptSpec>) -> Self {
        Self { prompts, ..self }
    }

    /// Replaces nodes added so far.
    pub fn tree(self, tree: TemplateTree) -> Self {
        Self { tree, ..self }
    }

    pub fn add_node(mut self, node: TemplateNode) -> Self {
        self.tree.push(node);
        self
    }

    pub fn post_emit(self, action: PostEmit) -> Self {
        Self {
            post_emit: Some(action),
            ..self
        }
    }

    /// Fails with `MissingRequiredField` without an id, otherwise with
    /// whatever [`Template::validate`] reports.
    pub fn build(self) -> Result<Template, DomainError> {
        let Some(id) = self.id else {
            return Err(DomainError::MissingRequiredField { field: "id" });
        };
        let metadata = match self.metadata {
            Some(m) => m,
            None => TemplateMetadata::new(id.name()),
        };

        let template = Template {
            id,
            metadata,
            prompts: self.prompts,
            tree: self.tree,
            post_emit: self.post_emit,
        };
        template.validate()?;
        Ok(template)
    }
}

/// Finalization a template asks for once its files exist.
///
/// In a manifest: `[post_emit] action = "mark_executable"`, with an optional
/// `path` (defaults to `console.sh`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PostEmit {
    /// Add owner-execute permission to one file under the destination.
    MarkExecutable {
        #[serde(default = "default_executable")]
        path: RelativePath,
    },
}

fn default_executable() -> RelativePath {
    RelativePath::new(DEFAULT_EXECUTABLE)
}

impl PostEmit {
    pub fn mark_console_executable() -> Self {
        Self::MarkExecutable {
            path: default_executable(),
        }
    }

    /// Shell equivalent, for listings and reports.
    pub fn describe(&self) -> String {
        match self {
            Self::MarkExecutable { path } => format!("chmod u+x {path}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplateMetadata {
    /// Display name; the id's name unless the manifest says otherwise.
    pub name: String,
    pub description: String,
    pub author: String,
    pub tags: Vec<String>,
}

impl TemplateMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn description(self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self
        }
    }

    pub fn author(self, author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            ..self
        }
    }

    pub fn tags(self, tags: Vec<String>) -> Self {
        Self { tags, ..self }
    }
}

/// Nodes in creation order. Directories are listed before their contents.
#[derive(Debug, Clone, Default)]
pub struct TemplateTree {
    pub nodes: Vec<TemplateNode>,
}

impl TemplateTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: TemplateNode) {
        self.nodes.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.iter().any(|n| n.path().as_str() == path)
    }
}

#[derive(Debug, Clone)]
pub enum TemplateNode {
    File(FileSpec),
    Directory(DirectorySpec),
}

impl TemplateNode {
    pub fn path(&self) -> &RelativePath {
        match self {
            Self::File(FileSpec { path, .. }) | Self::Directory(DirectorySpec { path }) => path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileSpec {
    pub path: RelativePath,
    pub content: TemplateContent,
    pub permissions: Permissions,
}

impl FileSpec {
    /// Read-write, not executable.
    pub fn new(path: impl Into<RelativePath>, content: TemplateContent) -> Self {
        Self {
            path: path.into(),
            content,
            permissions: Permissions::default(),
        }
    }

    /// Written with the execute bit already set.
    pub fn executable(self) -> Self {
        Self {
            permissions: Permissions::executable(),
            ..self
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectorySpec {
    pub path: RelativePath,
}

impl DirectorySpec {
    pub fn new(path: impl Into<RelativePath>) -> Self {
        Self { path: path.into() }
    }
}

/// File body, and whether `{{name}}` markers in it get substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateContent {
    Literal(String),
    Parameterized(String),
}

impl TemplateContent {
    /// Parameterized when a `{{` is later followed by `}}`.
    pub fn detect(text: impl Into<String>) -> Self {
        let text = text.into();
        let has_marker = text
            .find("{{")
            .is_some_and(|open| text[open..].contains("}}"));
        if has_marker {
            Self::Parameterized(text)
        } else {
            Self::Literal(text)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(s) | Self::Parameterized(s) => s,
        }
    }
}
