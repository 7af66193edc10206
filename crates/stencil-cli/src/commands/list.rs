//! Implementation of the `stencil list` command.

use stencil_core::application::{TemplateInfo, TemplateService};

use crate::{
    cli::{ListArgs, ListFormat},
    commands::load_store,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let store = load_store(args.templates_dir.as_deref(), &config)?;
    let templates = TemplateService::new(Box::new(store)).list()?;

    match args.format.unwrap_or(config.output.format) {
        ListFormat::Table => {
            output.header("Available Templates:")?;
            for line in table_rows(&templates) {
                output.print(&line)?;
            }
        }
        ListFormat::List => {
            for t in &templates {
                output.raw(&t.name)?;
            }
        }
        ListFormat::Json => {
            // Bypasses quiet mode: JSON must stay parseable in pipes.
            let json = serde_json::to_string_pretty(&templates).map_err(std::io::Error::from)?;
            output.raw(&json)?;
        }
    }

    Ok(())
}

fn table_rows(templates: &[TemplateInfo]) -> Vec<String> {
    let width = templates.iter().map(|t| t.id.len()).max().unwrap_or(0);

    templates
        .iter()
        .map(|t| {
            let mut line = format!("  {:<width$}  {}", t.id, t.description);
            if !t.prompts.is_empty() {
                let names: Vec<&str> = t.prompts.iter().map(|p| p.name.as_str()).collect();
                line.push_str(&format!(" [asks: {}]", names.join(", ")));
            }
            if let Some(action) = &t.post_emit {
                line.push_str(&format!(" [then: {action}]"));
            }
            line.trim_end().to_string()
        })
        .collect()
}
