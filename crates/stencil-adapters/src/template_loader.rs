//! Filesystem-based template loader.
//!
//! Discovers and parses `template.toml` manifests from a directory tree,
//! converting them into domain [`Template`] objects ready for the generator.
//!
//! # Directory layout expected
//!
//! ```text
//! templates/
//! ├── browniexmix/
//! │   ├── template.toml        ← manifest (required)
//! │   ├── console.sh           ← file content
//! │   └── brownie-config.yaml
//! └── webpack-babel-ts/
//!     ├── template.toml
//!     └── src/
//!         └── index.ts
//! ```
//!
//! # `template.toml` format
//!
//! ```toml
//! [template]
//! id      = "browniexmix"        # unique name
//! version = "1.0.0"
//!
//! [metadata]                     # optional
//! name        = "Brownie console"
//! description = "Brownie project with a console launcher."
//! author      = "Stencil"
//! tags        = ["python", "brownie"]
//!
//! # Prompts, asked in this order.
//! [[prompts]]
//! name    = "age"
//! message = "How old are you?"
//! default = "would rather not say"
//!
//! # Optional finalization; `path` defaults to console.sh.
//! [post_emit]
//! action = "mark_executable"
//! path   = "console.sh"
//!
//! # Optional per-file overrides. Files not listed are auto-detected:
//! # content containing {{ }} is parameterized, everything else literal.
//! [[files]]
//! path       = "scripts/run.sh"
//! type       = "literal"         # literal | parameterized
//! executable = true              # set u+x while writing
//!
//! [[directories]]
//! path = "build"                 # created even when empty
//! ```

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use stencil_core::domain::{
    DirectorySpec, DomainError, FileSpec, PostEmit, PromptSpec, RelativePath, Template,
    TemplateBuilder, TemplateContent, TemplateId, TemplateMetadata, TemplateNode, TemplateTree,
};

/// File name of the manifest inside each template directory.
pub const MANIFEST_FILE: &str = "template.toml";

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a `template.toml` file.
#[derive(Debug, Deserialize, Clone)]
pub struct TemplateManifest {
    pub template: TemplateSection,
    #[serde(default)]
    pub metadata: MetadataSection,
    #[serde(default)]
    pub prompts: Vec<PromptSpec>,
    pub post_emit: Option<PostEmit>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub directories: Vec<DirectoryEntry>,
}

/// `[template]` section: identity of the template.
#[derive(Debug, Deserialize, Clone)]
pub struct TemplateSection {
    pub id: String,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "0.0.0".into()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MetadataSection {
    /// Display name; the template id when omitted.
    pub name: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// One entry under `[[files]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct FileEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub file_type: Option<FileType>,
    #[serde(default)]
    pub executable: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Literal,
    Parameterized,
}

/// One entry under `[[directories]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryEntry {
    pub path: String,
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads [`Template`] objects from a directory tree of `template.toml` manifests.
///
/// Each immediate subdirectory of `templates_dir` that contains a valid
/// manifest is one template. Subdirectories whose manifest is missing or
/// invalid emit a `WARN` log and are skipped.
pub struct FilesystemTemplateLoader {
    templates_dir: PathBuf,
}

impl FilesystemTemplateLoader {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    /// Every subdirectory holding a loadable manifest, sorted by directory
    /// name. Only an unreadable `templates_dir` is an error.
    #[instrument(skip(self), fields(dir = %self.templates_dir.display()))]
    pub fn load_all(&self) -> Result<Vec<Template>, DomainError> {
        let root = &self.templates_dir;
        if !root.exists() {
            return Err(invalid(format!("templates directory not found: {}", root.display())));
        }

        let mut dirs: Vec<PathBuf> = fs::read_dir(root)
            .map_err(|e| invalid(format!("cannot list '{}': {e}", root.display())))?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();

        let templates: Vec<Template> = dirs
            .iter()
            .filter_map(|dir| match load_template_dir(dir) {
                Ok(template) => {
                    debug!(id = %template.id, "loaded template");
                    Some(template)
                }
                Err(error) => {
                    warn!(dir = %dir.display(), %error, "template skipped");
                    None
                }
            })
            .collect();

        debug!(count = templates.len(), "templates loaded");
        Ok(templates)
    }
}

fn invalid(message: String) -> DomainError {
    DomainError::InvalidTemplate(message)
}

/// One template directory: its manifest plus every file beside it.
#[instrument(fields(dir = %dir.display()))]
pub fn load_template_dir(dir: &Path) -> Result<Template, DomainError> {
    let manifest_path = dir.join(MANIFEST_FILE);
    let shown = manifest_path.display();
    let raw = fs::read_to_string(&manifest_path)
        .map_err(|e| invalid(format!("cannot read '{shown}': {e}")))?;
    let manifest: TemplateManifest = toml::from_str(&raw)
        .map_err(|e| invalid(format!("'{shown}' is not a valid manifest: {e}")))?;

    let tree = build_tree(dir, &manifest)?;
    let TemplateManifest {
        template: section,
        metadata: meta,
        prompts,
        post_emit,
        ..
    } = manifest;

    let metadata = TemplateMetadata::new(meta.name.unwrap_or_else(|| section.id.clone()))
        .description(meta.description.unwrap_or_default())
        .author(meta.author.unwrap_or_else(|| "Stencil".into()))
        .tags(meta.tags.unwrap_or_default());

    let builder = TemplateBuilder::default()
        .id(TemplateId::new(section.id, section.version))
        .metadata(metadata)
        .prompts(prompts)
        .tree(tree);

    match post_emit {
        Some(action) => builder.post_emit(action).build(),
        None => builder.build(),
    }
}

/// Walk `dir` and build a [`TemplateTree`] according to the manifest.
///
/// Manifest `[[directories]]` come first, then everything found on disk in
/// walk order. `template.toml` itself is never part of the tree.
fn build_tree(dir: &Path, manifest: &TemplateManifest) -> Result<TemplateTree, DomainError> {
    let mut tree = TemplateTree::new();
    let mut added: HashSet<String> = HashSet::new();

    for entry in &manifest.directories {
        let path = normalize_path(&entry.path);
        if added.insert(path.clone()) {
            tree.push(TemplateNode::Directory(DirectorySpec::new(
                RelativePath::try_new(path)?,
            )));
        }
    }

    let overrides: HashMap<String, &FileEntry> = manifest
        .files
        .iter()
        .map(|f| (normalize_path(&f.path), f))
        .collect();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter();

    for walk_entry in walker {
        let walk_entry = walk_entry.map_err(|e| invalid(format!("cannot walk template: {e}")))?;
        let abs_path = walk_entry.path();
        let Ok(rel) = abs_path.strip_prefix(dir) else {
            continue;
        };

        if rel == Path::new(MANIFEST_FILE) {
            continue;
        }

        let path_str = normalize_path(&rel.to_string_lossy());

        if walk_entry.file_type().is_dir() {
            if added.insert(path_str.clone()) {
                tree.push(TemplateNode::Directory(DirectorySpec::new(
                    RelativePath::try_new(path_str)?,
                )));
            }
            continue;
        }

        if !walk_entry.file_type().is_file() {
            continue;
        }

        let content = fs::read_to_string(abs_path)
            .map_err(|e| invalid(format!("cannot read '{path_str}': {e}")))?;

        let entry = overrides.get(&path_str).copied();
        let content = match entry.and_then(|e| e.file_type) {
            Some(FileType::Literal) => TemplateContent::Literal(content),
            Some(FileType::Parameterized) => TemplateContent::Parameterized(content),
            None => TemplateContent::detect(content),
        };

        let mut spec = FileSpec::new(RelativePath::try_new(path_str.clone())?, content);
        if entry.is_some_and(|e| e.executable) {
            spec = spec.executable();
        }

        if added.insert(path_str) {
            tree.push(TemplateNode::File(spec));
        }
    }

    if let Some(path) = overrides.keys().find(|p| !added.contains(*p)) {
        return Err(invalid(format!("[[files]] entry '{path}' has no file on disk")));
    }

    Ok(tree)
}

/// Manifest paths and walked paths are compared with `/` separators.
fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}
