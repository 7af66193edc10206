//! Implementation of the `stencil emit` command: run the post-emit action
//! against a directory that was generated earlier.

use std::io::Read as _;
use std::path::Path;

use tracing::instrument;

use stencil_adapters::MarkExecutable;
use stencil_core::{
    application::{PostEmitAction, run_post_emit},
    domain::{Answers, Context, RelativePath},
    error::StencilError,
};

use crate::{
    cli::EmitArgs,
    commands::absolute,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(path = %args.path))]
pub async fn execute(args: EmitArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let ctx = match (&args.context, &args.dest) {
        (Some(file), _) => Context::from_json(&read_context(file)?).map_err(StencilError::from)?,
        (None, Some(dest)) => {
            Context::new(absolute(dest)?, Answers::new()).map_err(StencilError::from)?
        }
        (None, None) => {
            return Err(CliError::InvalidInput {
                message: "pass a destination directory or --context".into(),
                source: None,
            });
        }
    };

    let target = RelativePath::try_new(&args.path).map_err(|e| CliError::InvalidInput {
        message: format!("--path '{}' must stay inside the destination", args.path),
        source: Some(Box::new(e)),
    })?;
    let action = MarkExecutable::new(target).with_timeout(config.hooks.timeout());

    let spinner = output.spinner(&action.describe());
    let result = run_post_emit(&action, &ctx).await;
    spinner.finish_and_clear();
    let state = result.map_err(StencilError::from)?;

    output.success(&format!(
        "{} in {} ({state})",
        action.describe(),
        ctx.dest().display()
    ))?;
    Ok(())
}

fn read_context(file: &Path) -> CliResult<String> {
    if file == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .with_cli_context(|| "reading context from stdin")?;
        return Ok(raw);
    }

    std::fs::read_to_string(file)
        .with_cli_context(|| format!("reading context file '{}'", file.display()))
}
