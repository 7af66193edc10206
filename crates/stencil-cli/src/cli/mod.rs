//! Command-line surface of `stencil`, declared with the clap derive API.
//!
//! Argument names, aliases and help text live here and nowhere else.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "stencil",
    bin_name = "stencil",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate starter projects from templates",
    long_about = "Stencil asks a template's questions, writes its files into a new \
                  directory, then runs the template's post-emit action once.",
    after_help = "EXAMPLES:\n\
        \x20 stencil new browniexmix ./my-console\n\
        \x20 stencil new webpack-babel-ts ./app -a name=Ada --yes\n\
        \x20 stencil list --format json\n\
        \x20 stencil emit ./my-console",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project from a template.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 stencil new browniexmix ./proj\n\
            \x20 stencil new webpack-babel-ts ./app -a name=Ada -a age=36\n\
            \x20 stencil new webpack-babel-ts ./app --yes --dry-run"
    )]
    New(NewArgs),

    /// List available templates.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 stencil list\n\
            \x20 stencil list --format json"
    )]
    List(ListArgs),

    /// Run a template's post-emit action against an existing directory.
    #[command(
        about = "Run the post-emit action alone",
        after_help = "EXAMPLES:\n\
            \x20 stencil emit ./proj\n\
            \x20 stencil emit ./proj --path bin/run.sh\n\
            \x20 stencil emit --context ctx.json"
    )]
    Emit(EmitArgs),

    /// Initialise a Stencil configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 stencil init           # default location\n\
            \x20 stencil init --force   # overwrite existing"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stencil completions bash > ~/.local/share/bash-completion/completions/stencil\n\
            \x20 stencil completions zsh  > ~/.zfunc/_stencil"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Stencil configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stencil config get hooks.timeout_secs\n\
            \x20 stencil config list\n\
            \x20 stencil config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `stencil new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Template name, optionally `name@version`.
    #[arg(value_name = "TEMPLATE", help = "Template to generate from")]
    pub template: String,

    /// Destination directory; must not exist unless `--force`.
    #[arg(value_name = "DEST", help = "Directory to create")]
    pub dest: PathBuf,

    /// Answer a prompt up front.
    #[arg(
        short = 'a',
        long = "answer",
        value_name = "NAME=VALUE",
        value_parser = parse_answer,
        help = "Answer a prompt without asking (repeatable)"
    )]
    pub answers: Vec<(String, String)>,

    /// Accept every remaining prompt's default.
    #[arg(short = 'y', long = "yes", help = "Accept defaults without asking")]
    pub yes: bool,

    /// Overwrite an existing directory (destructive).
    #[arg(long = "force", help = "Overwrite existing directory")]
    pub force: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Load templates from this directory instead of the configured one.
    #[arg(
        long = "templates-dir",
        value_name = "DIR",
        env = "STENCIL_TEMPLATES_DIR",
        help = "Templates directory"
    )]
    pub templates_dir: Option<PathBuf>,
}

fn parse_answer(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `stencil list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format; falls back to `output.format` from the config.
    #[arg(long = "format", value_enum, help = "Output format")]
    pub format: Option<ListFormat>,

    /// Load templates from this directory instead of the configured one.
    #[arg(
        long = "templates-dir",
        value_name = "DIR",
        env = "STENCIL_TEMPLATES_DIR",
        help = "Templates directory"
    )]
    pub templates_dir: Option<PathBuf>,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

impl ListFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::List => "list",
            Self::Json => "json",
        }
    }
}

// ── emit ──────────────────────────────────────────────────────────────────────

/// Arguments for `stencil emit`.
#[derive(Debug, Args)]
pub struct EmitArgs {
    /// Generated project directory.
    #[arg(
        value_name = "DEST",
        required_unless_present = "context",
        help = "Directory holding the generated project"
    )]
    pub dest: Option<PathBuf>,

    /// Read the run context from a JSON file (`-` for stdin).
    #[arg(
        long = "context",
        value_name = "FILE",
        conflicts_with = "dest",
        help = "JSON context file with \"dest\" and \"answers\""
    )]
    pub context: Option<PathBuf>,

    /// File to mark executable, relative to the destination.
    #[arg(
        long = "path",
        value_name = "REL",
        default_value = "console.sh",
        help = "File to mark executable"
    )]
    pub path: String,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `stencil init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `stencil completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `stencil config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `hooks.timeout_secs`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
