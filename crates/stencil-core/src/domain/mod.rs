//! Core domain layer for Stencil.
//!
//! Pure data and rules: templates, prompts, the per-run context and the
//! errors they can raise. All I/O is reached through the ports in
//! `crate::application`.
//!
//! - **No async**: domain logic is synchronous
//! - **No I/O**: no filesystem or process calls
//! - **Immutable entities**: templates never change during a run
pub mod entities;
pub mod error;

mod validation;

pub use entities::{
    common::{Permissions, RelativePath},
    context::Context,
    project_structure::{DirectoryToCreate, FileToWrite, FsEntry, ProjectStructure},
    prompt::{Answers, PromptSpec},
    template::{
        DEFAULT_EXECUTABLE, DirectorySpec, FileSpec, PostEmit, Template, TemplateBuilder,
        TemplateContent, TemplateId, TemplateMetadata, TemplateNode, TemplateTree,
    },
};

pub use error::{DomainError, ErrorCategory, HookError};

pub use validation::DomainValidator;

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, content: &str) -> TemplateNode {
        TemplateNode::File(FileSpec::new(path, TemplateContent::detect(content)))
    }

    // ========================================================================
    // Template Tests
    // ========================================================================

    #[test]
    fn template_builder_success() {
        let template = Template::builder()
            .id(TemplateId::new("test", "1.0.0"))
            .metadata(TemplateMetadata::new("Test"))
            .add_node(TemplateNode::Directory(DirectorySpec::new("src")))
            .build()
            .unwrap();

        assert_eq!(template.name(), "test");
        assert!(template.prompts.is_empty());
        assert!(template.post_emit.is_none());
    }

    #[test]
    fn template_builder_defaults_metadata_to_name() {
        let template = Template::builder()
            .id(TemplateId::new("bare", "0.1.0"))
            .add_node(file("README.md", "hi"))
            .build()
            .unwrap();

        assert_eq!(template.metadata.name, "bare");
    }

    #[test]
    fn template_builder_rejects_empty_tree() {
        let result = Template::builder()
            .id(TemplateId::new("test", "1.0.0"))
            .build();

        assert!(matches!(result, Err(DomainError::EmptyTemplate { .. })));
    }

    #[test]
    fn template_builder_requires_id() {
        let result = Template::builder().add_node(file("a", "b")).build();
        assert!(matches!(
            result,
            Err(DomainError::MissingRequiredField { field: "id" })
        ));
    }

    #[test]
    fn template_rejects_duplicate_paths() {
        let result = Template::builder()
            .id(TemplateId::new("test", "1.0.0"))
            .add_node(TemplateNode::Directory(DirectorySpec::new("src")))
            .add_node(TemplateNode::Directory(DirectorySpec::new("src")))
            .build();

        assert!(matches!(result, Err(DomainError::DuplicatePath { .. })));
    }

    #[test]
    fn template_rejects_duplicate_prompts() {
        let result = Template::builder()
            .id(TemplateId::new("test", "1.0.0"))
            .add_node(file("a.txt", "a"))
            .prompt(PromptSpec::new("name"))
            .prompt(PromptSpec::new("name"))
            .build();

        assert!(matches!(result, Err(DomainError::DuplicatePrompt { .. })));
    }

    #[test]
    fn template_keeps_prompt_declaration_order() {
        let template = Template::builder()
            .id(TemplateId::new("ts", "1.0.0"))
            .add_node(file("src/index.ts", "{{name}}"))
            .prompt(PromptSpec::new("name"))
            .prompt(PromptSpec::new("age").default_value("would rather not say"))
            .build()
            .unwrap();

        let names: Vec<_> = template.prompts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["name", "age"]);
        assert_eq!(
            template.prompt("age").and_then(|p| p.default.as_deref()),
            Some("would rather not say")
        );
    }

    #[test]
    fn template_id_parsing() {
        let id = TemplateId::parse("my-template@2.0.0").unwrap();
        assert_eq!(id.name(), "my-template");
        assert_eq!(id.version(), "2.0.0");

        let bare = TemplateId::parse("browniexmix").unwrap();
        assert_eq!(bare.version(), "0.0.0");

        assert!(TemplateId::parse("").is_err());
        assert!(TemplateId::parse("too@many@ats").is_err());
        assert!(TemplateId::parse("trailing@").is_err());
    }

    #[test]
    fn template_name_with_at_is_rejected() {
        let result = Template::builder()
            .id(TemplateId::new("invalid@name", "1.0.0"))
            .add_node(file("a", "a"))
            .build();
        assert!(matches!(result, Err(DomainError::InvalidTemplate(_))));
    }

    #[test]
    fn content_detection() {
        assert!(matches!(
            TemplateContent::detect("Hello {{name}}"),
            TemplateContent::Parameterized(_)
        ));
        assert!(matches!(
            TemplateContent::detect("#!/bin/sh\nbrownie console\n"),
            TemplateContent::Literal(_)
        ));
        assert!(matches!(
            TemplateContent::detect("only {{ opening"),
            TemplateContent::Literal(_)
        ));
    }

    // ========================================================================
    // Post-emit declaration
    // ========================================================================

    #[test]
    fn post_emit_defaults_to_console_sh() {
        let action: PostEmit = serde_json::from_str(r#"{"action": "mark_executable"}"#).unwrap();
        assert_eq!(action, PostEmit::mark_console_executable());
        assert_eq!(action.describe(), "chmod u+x console.sh");
    }

    #[test]
    fn post_emit_accepts_custom_path() {
        let action: PostEmit =
            serde_json::from_str(r#"{"action": "mark_executable", "path": "bin/run.sh"}"#)
                .unwrap();
        assert_eq!(
            action,
            PostEmit::MarkExecutable {
                path: RelativePath::new("bin/run.sh")
            }
        );
    }

    #[test]
    fn post_emit_rejects_escaping_path() {
        let result: Result<PostEmit, _> =
            serde_json::from_str(r#"{"action": "mark_executable", "path": "../evil.sh"}"#);
        assert!(result.is_err());
    }

    // ========================================================================
    // Project Structure Tests
    // ========================================================================

    #[test]
    fn project_structure_builds_correctly() {
        let structure = ProjectStructure::new("/tmp/test")
            .with_directory("src")
            .with_file(
                "src/index.ts",
                "console.log(1)".into(),
                Permissions::read_write(),
            );

        assert_eq!(structure.entry_count(), 2);
        assert_eq!(structure.files().count(), 1);
        assert_eq!(structure.directories().count(), 1);
    }

    #[test]
    fn project_structure_validates_duplicates() {
        let structure = ProjectStructure::new("/tmp/test")
            .with_file("main.rs", "".into(), Permissions::read_write())
            .with_file("main.rs", "".into(), Permissions::read_write());

        assert!(structure.validate().is_err());
    }

    #[test]
    fn project_structure_validates_empty() {
        let structure = ProjectStructure::new("/tmp/test");
        assert!(structure.validate().is_err());
    }

    // ========================================================================
    // Validator
    // ========================================================================

    #[test]
    fn preset_answers_must_match_prompts() {
        let template = Template::builder()
            .id(TemplateId::new("t", "1"))
            .add_node(file("a", "a"))
            .prompt(PromptSpec::new("name"))
            .build()
            .unwrap();

        assert!(
            DomainValidator::validate_preset_answers(&template, &Answers::new().with("name", "x"))
                .is_ok()
        );
        assert!(matches!(
            DomainValidator::validate_preset_answers(&template, &Answers::new().with("nmae", "x")),
            Err(DomainError::UnknownAnswer { .. })
        ));
    }
}
