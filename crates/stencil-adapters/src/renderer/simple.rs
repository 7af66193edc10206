//! Simple variable substitution renderer.

use std::path::Path;

use stencil_core::{
    application::ports::TemplateRenderer,
    domain::{
        Context, DomainValidator as validator, ProjectStructure, Template, TemplateContent,
        TemplateNode,
    },
    error::StencilResult,
};
use tracing::{instrument, trace};

/// Renderer that substitutes `{{name}}` markers from the run context.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleRenderer;

impl SimpleRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for SimpleRenderer {
    #[instrument(skip_all, fields(template = %template.id))]
    fn render(
        &self,
        template: &Template,
        context: &Context,
        output_root: &Path,
    ) -> StencilResult<ProjectStructure> {
        validator::validate_template(template)?;

        let mut structure = ProjectStructure::new(output_root);

        for node in &template.tree.nodes {
            match node {
                TemplateNode::File(spec) => {
                    trace!(path = %spec.path, "rendering file");
                    let content = render_content(&spec.content, context);
                    structure.add_file(spec.path.as_path(), content, spec.permissions);
                }
                TemplateNode::Directory(spec) => {
                    structure.add_directory(spec.path.as_path());
                }
            }
        }

        validator::validate_project_structure(&structure)?;

        Ok(structure)
    }
}

fn render_content(content: &TemplateContent, ctx: &Context) -> String {
    match content {
        TemplateContent::Literal(text) => text.clone(),
        TemplateContent::Parameterized(text) => ctx.render(text),
    }
}
