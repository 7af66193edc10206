//! Implementation of the `stencil new` command.
//!
//! Responsibility: translate CLI arguments into a `GenerationRequest`, wire
//! the adapters, run the generation service and display the report. No
//! generation logic lives here.

use indicatif::ProgressBar;
use tracing::{info, instrument};

use stencil_adapters::{LocalFilesystem, LocalHooks, SimpleRenderer};
use stencil_core::{
    application::{GenerateService, GenerationReport, GenerationRequest, HookState},
    domain::Answers,
};

use crate::{
    cli::{GlobalArgs, NewArgs},
    commands::{absolute, load_store},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    prompt,
};

/// Execute the `stencil new` command.
///
/// 1. Resolve the destination to an absolute path
/// 2. Load templates and wire the adapters
/// 3. Run the generation (prompts, files, post-emit action)
/// 4. Print what happened
#[instrument(skip_all, fields(template = %args.template))]
pub async fn execute(
    args: NewArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let dest = absolute(&args.dest)?;
    let store = load_store(args.templates_dir.as_deref(), &config)?;

    let preset: Answers = args.answers.iter().fold(Answers::new(), |acc, (k, v)| {
        acc.with(k.as_str(), v.as_str())
    });
    let prompter = prompt::for_run(&preset);

    let service = GenerateService::new(
        Box::new(store),
        Box::new(SimpleRenderer::new()),
        Box::new(LocalFilesystem::new()),
        prompter,
        Box::new(LocalHooks::new(config.hooks.timeout())),
    );

    let request = GenerationRequest::new(args.template.as_str(), dest.as_path())
        .preset(preset)
        .accept_defaults(args.yes)
        .force(args.force)
        .dry_run(args.dry_run);

    output.header(&format!(
        "Creating '{}' from {}...",
        dest.display(),
        args.template
    ))?;

    // Only spin when no prompt will be shown.
    let spinner = if args.yes {
        output.spinner("Generating...")
    } else {
        ProgressBar::hidden()
    };
    let result = service.generate(request).await;
    spinner.finish_and_clear();
    let report = result?;

    info!(run_id = %report.run_id, hook = %report.hook, "generation finished");
    print_report(&report, &output)?;

    Ok(())
}

fn print_report(report: &GenerationReport, output: &OutputManager) -> CliResult<()> {
    let dest = report.context.dest().display().to_string();

    if report.dry_run {
        output.info(&format!(
            "Dry run: would create {} with {} entries",
            dest,
            report.entries.len()
        ))?;
        for entry in &report.entries {
            output.print(&format!("  {}", entry.display()))?;
        }
        if let Some(action) = &report.post_emit {
            output.info(&format!("Then run: {action}"))?;
        }
        return Ok(());
    }

    output.success(&format!(
        "Created {} ({} files, {} directories)",
        dest, report.files_written, report.directories_created
    ))?;

    match (&report.post_emit, report.hook) {
        (Some(action), HookState::Succeeded) => output.success(&format!("Ran: {action}"))?,
        (Some(action), state) => output.warning(&format!("{action}: {state}"))?,
        (None, _) => {}
    }

    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {dest}"))?;

    Ok(())
}
