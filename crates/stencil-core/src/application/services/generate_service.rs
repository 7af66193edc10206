//! Generate Service - main application orchestrator.
//!
//! This service coordinates one generation run:
//! 1. Resolve the template by name
//! 2. Collect answers in prompt declaration order
//! 3. Render the tree against the run context
//! 4. Write to filesystem (rolled back on failure)
//! 5. Run the template's post-emit action once

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::post_emit::{HookState, run_post_emit};
use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, HookFactory, Prompter, TemplateRenderer, TemplateStore},
    },
    domain::{
        Answers, Context, DomainValidator as validator, FsEntry, ProjectStructure, Template,
        TemplateId,
    },
    error::StencilResult,
};

/// Input for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Template name, optionally `name@version`.
    pub template: String,
    /// Absolute destination directory.
    pub dest: PathBuf,
    /// Answers given up front; these prompts are not asked.
    pub preset: Answers,
    /// Take every remaining prompt's default without asking.
    pub accept_defaults: bool,
    /// Replace an existing destination.
    pub force: bool,
    /// Render only; nothing is written and no action runs.
    pub dry_run: bool,
}

impl GenerationRequest {
    pub fn new(template: impl Into<String>, dest: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            dest: dest.into(),
            preset: Answers::new(),
            accept_defaults: false,
            force: false,
            dry_run: false,
        }
    }

    pub fn preset(mut self, answers: Answers) -> Self {
        self.preset = answers;
        self
    }

    pub fn accept_defaults(mut self, yes: bool) -> Self {
        self.accept_defaults = yes;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub run_id: Uuid,
    pub template: String,
    pub context: Context,
    pub files_written: usize,
    pub directories_created: usize,
    /// Paths relative to the destination, in write order.
    pub entries: Vec<PathBuf>,
    pub hook: HookState,
    /// What the post-emit action does, when the template declares one.
    pub post_emit: Option<String>,
    pub dry_run: bool,
    pub finished_at: DateTime<Utc>,
}

/// Main generation service.
pub struct GenerateService {
    store: Box<dyn TemplateStore>,
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
    prompter: Box<dyn Prompter>,
    hooks: Box<dyn HookFactory>,
}

impl GenerateService {
    /// Create a new generate service with the given adapters.
    pub fn new(
        store: Box<dyn TemplateStore>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
        prompter: Box<dyn Prompter>,
        hooks: Box<dyn HookFactory>,
    ) -> Self {
        Self {
            store,
            renderer,
            filesystem,
            prompter,
            hooks,
        }
    }

    /// Generate a project.
    ///
    /// A write failure removes the destination again. A post-emit failure
    /// does not: the files stay and the error is returned, so a re-run
    /// needs `force`.
    #[instrument(
        skip_all,
        fields(
            run_id,
            template = %request.template,
            dest = %request.dest.display()
        )
    )]
    pub async fn generate(&self, request: GenerationRequest) -> StencilResult<GenerationReport> {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));

        // 1. Resolve template
        let template = self.store.get(&request.template)?;
        validator::validate_template(&template)?;
        validator::validate_preset_answers(&template, &request.preset)?;
        info!(template = %template.id, "Template resolved");

        // 2. Destination must be free unless forced
        if self.filesystem.exists(&request.dest) && !request.force {
            return Err(ApplicationError::ProjectExists {
                path: request.dest.clone(),
            }
            .into());
        }

        // 3. Answers, then the context every later step sees
        let answers = self.collect_answers(&template, &request)?;
        let context = Context::new(&request.dest, answers)?;

        // 4. Render
        let structure = self.renderer.render(&template, &context, context.dest())?;
        validator::validate_project_structure(&structure)?;
        let files_written = structure.files().count();
        let directories_created = structure.directories().count();
        let entries: Vec<PathBuf> = structure
            .entries()
            .iter()
            .map(|e| e.path().to_path_buf())
            .collect();
        debug!(files_written, directories_created, "Template rendered");

        let post_emit = template.post_emit.as_ref().map(|p| p.describe());

        if request.dry_run {
            info!("Dry run, nothing written");
            return Ok(self.report(
                run_id,
                &template.id,
                context,
                (files_written, directories_created),
                entries,
                HookState::Skipped,
                post_emit,
                true,
            ));
        }

        // 5. Write
        if request.force && self.filesystem.exists(context.dest()) {
            warn!("Replacing existing destination");
            self.filesystem.remove_dir_all(context.dest())?;
        }
        self.write_structure(&structure)?;

        // 6. Post-emit, once
        let hook = match &template.post_emit {
            Some(spec) => {
                let action = self.hooks.action_for(spec);
                run_post_emit(action.as_ref(), &context).await?
            }
            None => HookState::Skipped,
        };

        info!(%hook, "Generation completed");
        Ok(self.report(
            run_id,
            &template.id,
            context,
            (files_written, directories_created),
            entries,
            hook,
            post_emit,
            false,
        ))
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Ask each prompt once, in declaration order.
    fn collect_answers(
        &self,
        template: &Template,
        request: &GenerationRequest,
    ) -> StencilResult<Answers> {
        let mut answers = Answers::new();

        for prompt in &template.prompts {
            let raw = if let Some(given) = request.preset.get(&prompt.name) {
                Some(given.to_string())
            } else if request.accept_defaults {
                None
            } else {
                self.prompter.ask(prompt)?
            };

            let value = prompt.resolve(raw.as_deref());
            debug!(prompt = %prompt.name, "Answer collected");
            answers.insert(&prompt.name, value);
        }

        Ok(answers)
    }

    /// Write project structure to filesystem with rollback on failure.
    fn write_structure(&self, structure: &ProjectStructure) -> StencilResult<()> {
        match self.write_all(structure) {
            Ok(()) => {
                info!("Successfully wrote all files");
                Ok(())
            }
            Err(e) => {
                warn!("Write failed, attempting rollback");
                self.rollback(structure.root());
                Err(e)
            }
        }
    }

    /// Write all entries in the structure.
    fn write_all(&self, structure: &ProjectStructure) -> StencilResult<()> {
        let root = structure.root();
        self.filesystem.create_dir_all(root)?;

        for entry in structure.entries() {
            match entry {
                FsEntry::Directory(dir) => {
                    self.filesystem.create_dir_all(&root.join(&dir.path))?;
                }
                FsEntry::File(file) => {
                    let path = root.join(&file.path);

                    if let Some(parent) = path.parent() {
                        self.filesystem.create_dir_all(parent)?;
                    }

                    self.filesystem.write_file(&path, &file.content)?;

                    if file.permissions.is_executable() {
                        self.filesystem.set_executable(&path)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn report(
        &self,
        run_id: Uuid,
        template: &TemplateId,
        context: Context,
        (files_written, directories_created): (usize, usize),
        entries: Vec<PathBuf>,
        hook: HookState,
        post_emit: Option<String>,
        dry_run: bool,
    ) -> GenerationReport {
        GenerationReport {
            run_id,
            template: template.to_string(),
            context,
            files_written,
            directories_created,
            entries,
            hook,
            post_emit,
            dry_run,
            finished_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StencilError;
    use crate::application::ports::{MockPrompter, PostEmitAction};
    use crate::domain::{
        FileSpec, HookError, PostEmit, PromptSpec, TemplateContent, TemplateNode,
    };
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    // ------------------------------------------------------------------
    // Fakes
    // ------------------------------------------------------------------

    #[derive(Default, Clone)]
    struct FakeFs {
        files: Arc<Mutex<HashMap<PathBuf, String>>>,
        dirs: Arc<Mutex<HashSet<PathBuf>>>,
        executable: Arc<Mutex<HashSet<PathBuf>>>,
        fail_on: Option<PathBuf>,
    }

    impl Filesystem for FakeFs {
        fn create_dir_all(&self, path: &Path) -> StencilResult<()> {
            self.dirs.lock().unwrap().insert(path.to_path_buf());
            Ok(())
        }

        fn write_file(&self, path: &Path, content: &str) -> StencilResult<()> {
            if self.fail_on.as_deref() == Some(path) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "disk full".into(),
                }
                .into());
            }
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), content.to_string());
            Ok(())
        }

        fn set_executable(&self, path: &Path) -> StencilResult<()> {
            self.executable.lock().unwrap().insert(path.to_path_buf());
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.dirs.lock().unwrap().contains(path) || self.files.lock().unwrap().contains_key(path)
        }

        fn remove_dir_all(&self, path: &Path) -> StencilResult<()> {
            self.files.lock().unwrap().retain(|p, _| !p.starts_with(path));
            self.dirs.lock().unwrap().retain(|p| !p.starts_with(path));
            Ok(())
        }
    }

    struct FakeStore(Vec<Template>);

    impl TemplateStore for FakeStore {
        fn get(&self, name: &str) -> StencilResult<Template> {
            self.0
                .iter()
                .find(|t| t.name() == name)
                .cloned()
                .ok_or_else(|| ApplicationError::TemplateNotFound { name: name.into() }.into())
        }

        fn list(&self) -> StencilResult<Vec<Template>> {
            Ok(self.0.clone())
        }

        fn insert(&self, _template: Template) -> StencilResult<()> {
            Ok(())
        }
    }

    struct FakeRenderer;

    impl TemplateRenderer for FakeRenderer {
        fn render(
            &self,
            template: &Template,
            context: &Context,
            output_root: &Path,
        ) -> StencilResult<ProjectStructure> {
            let mut structure = ProjectStructure::new(output_root);
            for node in &template.tree.nodes {
                match node {
                    TemplateNode::File(f) => structure.add_file(
                        f.path.as_path(),
                        context.render(f.content.as_str()),
                        f.permissions,
                    ),
                    TemplateNode::Directory(d) => structure.add_directory(d.path.as_path()),
                }
            }
            Ok(structure)
        }
    }

    #[derive(Clone, Default)]
    struct RecordingHooks {
        calls: Arc<AtomicUsize>,
        seen: Arc<Mutex<Vec<Context>>>,
        fail: bool,
    }

    struct RecordingAction(RecordingHooks);

    #[async_trait]
    impl PostEmitAction for RecordingAction {
        fn describe(&self) -> String {
            "record".into()
        }

        async fn emit(&self, ctx: &Context) -> Result<(), HookError> {
            self.0.calls.fetch_add(1, Ordering::SeqCst);
            self.0.seen.lock().unwrap().push(ctx.clone());
            if self.0.fail {
                return Err(HookError::executable_bit(
                    ctx.dest().join("console.sh"),
                    std::io::Error::from(std::io::ErrorKind::NotFound),
                ));
            }
            Ok(())
        }
    }

    impl HookFactory for RecordingHooks {
        fn action_for(&self, _spec: &PostEmit) -> Box<dyn PostEmitAction> {
            Box::new(RecordingAction(self.clone()))
        }
    }

    // ------------------------------------------------------------------
    // Templates
    // ------------------------------------------------------------------

    fn ts_template() -> Template {
        Template::builder()
            .id(TemplateId::new("webpack-babel-ts", "1.0.0"))
            .add_node(TemplateNode::File(FileSpec::new(
                "src/index.ts",
                TemplateContent::detect("console.log('{{name}} is {{age}}');"),
            )))
            .prompt(PromptSpec::new("name"))
            .prompt(PromptSpec::new("age").default_value("would rather not say"))
            .build()
            .unwrap()
    }

    fn brownie_template() -> Template {
        Template::builder()
            .id(TemplateId::new("browniexmix", "1.0.0"))
            .add_node(TemplateNode::File(FileSpec::new(
                "console.sh",
                TemplateContent::detect("#!/bin/sh\nbrownie console\n"),
            )))
            .post_emit(PostEmit::mark_console_executable())
            .build()
            .unwrap()
    }

    fn dest() -> PathBuf {
        std::env::temp_dir().join("stencil-generate-test").join("proj")
    }

    fn service(
        fs: FakeFs,
        prompter: MockPrompter,
        hooks: RecordingHooks,
    ) -> GenerateService {
        GenerateService::new(
            Box::new(FakeStore(vec![ts_template(), brownie_template()])),
            Box::new(FakeRenderer),
            Box::new(fs),
            Box::new(prompter),
            Box::new(hooks),
        )
    }

    // ------------------------------------------------------------------
    // Tests
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn prompts_are_asked_in_order_and_defaults_apply() {
        let mut prompter = MockPrompter::new();
        let mut seq = mockall::Sequence::new();
        prompter
            .expect_ask()
            .withf(|p| p.name == "name")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some("ada".into())));
        prompter
            .expect_ask()
            .withf(|p| p.name == "age")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some("   ".into())));

        let fs = FakeFs::default();
        let svc = service(fs.clone(), prompter, RecordingHooks::default());

        let report = svc
            .generate(GenerationRequest::new("webpack-babel-ts", dest()))
            .await
            .unwrap();

        assert_eq!(report.context.answer("name"), Some("ada"));
        assert_eq!(report.context.answer("age"), Some("would rather not say"));
        assert_eq!(report.hook, HookState::Skipped);

        let written = fs.files.lock().unwrap();
        let index = written.get(&dest().join("src/index.ts")).unwrap();
        assert_eq!(index, "console.log('ada is would rather not say');");
    }

    #[tokio::test]
    async fn blank_answer_without_default_is_empty_string() {
        let mut prompter = MockPrompter::new();
        prompter.expect_ask().returning(|_| Ok(None));

        let svc = service(FakeFs::default(), prompter, RecordingHooks::default());
        let report = svc
            .generate(GenerationRequest::new("webpack-babel-ts", dest()))
            .await
            .unwrap();

        assert_eq!(report.context.answer("name"), Some(""));
    }

    #[tokio::test]
    async fn preset_answers_skip_the_prompter() {
        let mut prompter = MockPrompter::new();
        prompter.expect_ask().never();

        let svc = service(FakeFs::default(), prompter, RecordingHooks::default());
        let request = GenerationRequest::new("webpack-babel-ts", dest())
            .preset(Answers::new().with("name", "grace"))
            .accept_defaults(true);

        let report = svc.generate(request).await.unwrap();
        assert_eq!(report.context.answer("name"), Some("grace"));
        assert_eq!(report.context.answer("age"), Some("would rather not say"));
    }

    #[tokio::test]
    async fn unknown_preset_answer_is_rejected() {
        let svc = service(
            FakeFs::default(),
            MockPrompter::new(),
            RecordingHooks::default(),
        );
        let request = GenerationRequest::new("webpack-babel-ts", dest())
            .preset(Answers::new().with("colour", "red"));

        let err = svc.generate(request).await.unwrap_err();
        assert!(matches!(err, StencilError::Domain(_)));
    }

    #[tokio::test]
    async fn post_emit_runs_once_with_absolute_dest() {
        let hooks = RecordingHooks::default();
        let svc = service(FakeFs::default(), MockPrompter::new(), hooks.clone());

        let report = svc
            .generate(GenerationRequest::new("browniexmix", dest()))
            .await
            .unwrap();

        assert_eq!(report.hook, HookState::Succeeded);
        assert_eq!(report.post_emit.as_deref(), Some("chmod u+x console.sh"));
        assert_eq!(hooks.calls.load(Ordering::SeqCst), 1);

        let seen = hooks.seen.lock().unwrap();
        assert!(seen[0].dest().is_absolute());
        assert_eq!(seen[0].dest(), dest());
    }

    #[tokio::test]
    async fn post_emit_failure_keeps_files() {
        let fs = FakeFs::default();
        let hooks = RecordingHooks {
            fail: true,
            ..Default::default()
        };
        let svc = service(fs.clone(), MockPrompter::new(), hooks.clone());

        let err = svc
            .generate(GenerationRequest::new("browniexmix", dest()))
            .await
            .unwrap_err();

        assert!(matches!(
            err.hook_error(),
            Some(HookError::ExecutableBit { .. })
        ));
        assert_eq!(hooks.calls.load(Ordering::SeqCst), 1);
        assert!(fs.exists(&dest().join("console.sh")));
    }

    #[tokio::test]
    async fn existing_destination_requires_force() {
        let fs = FakeFs::default();
        fs.create_dir_all(&dest()).unwrap();
        let svc = service(fs.clone(), MockPrompter::new(), RecordingHooks::default());

        let err = svc
            .generate(GenerationRequest::new("browniexmix", dest()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StencilError::Application(ApplicationError::ProjectExists { .. })
        ));

        let report = svc
            .generate(GenerationRequest::new("browniexmix", dest()).force(true))
            .await
            .unwrap();
        assert_eq!(report.files_written, 1);
    }

    #[tokio::test]
    async fn write_failure_rolls_back_and_skips_hook() {
        let fs = FakeFs {
            fail_on: Some(dest().join("console.sh")),
            ..Default::default()
        };
        let hooks = RecordingHooks::default();
        let svc = service(fs.clone(), MockPrompter::new(), hooks.clone());

        let result = svc
            .generate(GenerationRequest::new("browniexmix", dest()))
            .await;

        assert!(result.is_err());
        assert!(!fs.exists(&dest()));
        assert_eq!(hooks.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dry_run_writes_nothing() {
        let fs = FakeFs::default();
        let hooks = RecordingHooks::default();
        let svc = service(fs.clone(), MockPrompter::new(), hooks.clone());

        let report = svc
            .generate(GenerationRequest::new("browniexmix", dest()).dry_run(true))
            .await
            .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.entries, [PathBuf::from("console.sh")]);
        assert_eq!(report.hook, HookState::Skipped);
        assert!(fs.files.lock().unwrap().is_empty());
        assert_eq!(hooks.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn relative_dest_is_an_invocation_error() {
        let svc = service(
            FakeFs::default(),
            MockPrompter::new(),
            RecordingHooks::default(),
        );

        let err = svc
            .generate(GenerationRequest::new("browniexmix", "relative/proj"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.hook_error(),
            Some(HookError::HookInvocation { .. })
        ));
    }

    #[tokio::test]
    async fn cancelled_prompt_writes_nothing() {
        let mut prompter = MockPrompter::new();
        prompter
            .expect_ask()
            .returning(|_| Err(ApplicationError::Cancelled.into()));

        let fs = FakeFs::default();
        let svc = service(fs.clone(), prompter, RecordingHooks::default());

        let err = svc
            .generate(GenerationRequest::new("webpack-babel-ts", dest()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StencilError::Application(ApplicationError::Cancelled)
        ));
        assert!(fs.files.lock().unwrap().is_empty());
    }
}
