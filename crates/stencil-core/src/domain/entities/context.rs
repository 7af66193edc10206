//! Per-run generation context.
//!
//! A [`Context`] is created once per generation run, after the prompts have
//! been answered. It carries the absolute destination directory and the
//! answers, and is the only argument a post-emit action receives.
//!
//! Rendering uses `{{name}}` markers. Besides the answers, every context
//! exposes a few derived variables:
//!
//! | Variable | Example | Source |
//! |----------|---------|--------|
//! | `PROJECT_NAME` | "My App" | last component of `dest` |
//! | `PROJECT_NAME_SNAKE` | "my_app" | computed |
//! | `PROJECT_NAME_KEBAB` | "my-app" | computed |
//! | `PROJECT_NAME_PASCAL` | "MyApp" | computed |
//! | `YEAR` | "2026" | system clock |
//!
//! Answers with the same name override the derived values.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::domain::{entities::prompt::Answers, error::HookError};

/// Data handed from the generation run to the post-emit action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawContext")]
pub struct Context {
    dest: PathBuf,
    #[serde(default)]
    answers: Answers,
}

/// Wire shape before validation; `dest` may be missing.
#[derive(Deserialize)]
struct RawContext {
    dest: Option<PathBuf>,
    #[serde(default)]
    answers: Answers,
}

impl TryFrom<RawContext> for Context {
    type Error = HookError;

    fn try_from(raw: RawContext) -> Result<Self, Self::Error> {
        let dest = raw
            .dest
            .ok_or_else(|| HookError::invocation("missing \"dest\""))?;
        Self::new(dest, raw.answers)
    }
}

impl Context {
    /// Build a context, rejecting an empty or relative `dest`.
    pub fn new(dest: impl Into<PathBuf>, answers: Answers) -> Result<Self, HookError> {
        let dest = dest.into();
        if dest.as_os_str().is_empty() {
            return Err(HookError::invocation("\"dest\" is empty"));
        }
        if !dest.is_absolute() {
            return Err(HookError::invocation(format!(
                "\"dest\" must be absolute, got '{}'",
                dest.display()
            )));
        }
        Ok(Self { dest, answers })
    }

    /// Parse the JSON invocation form: `{"dest": "...", "answers": {...}}`.
    pub fn from_json(raw: &str) -> Result<Self, HookError> {
        serde_json::from_str(raw).map_err(|e| HookError::invocation(e.to_string()))
    }

    pub fn to_json(&self) -> String {
        // A PathBuf that is not UTF-8 cannot be represented; fall back to a
        // lossy rendering instead of failing.
        serde_json::to_string_pretty(self).unwrap_or_else(|_| {
            format!(
                "{{\"dest\": {:?}, \"answers\": {{}}}}",
                self.dest.to_string_lossy()
            )
        })
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    /// Answer for `name`, if the run collected one.
    pub fn answer(&self, name: &str) -> Option<&str> {
        self.answers.get(name)
    }

    /// Project name derived from the destination directory.
    pub fn project_name(&self) -> String {
        self.dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// All variables available to `render`, derived ones first.
    pub fn variables(&self) -> HashMap<String, String> {
        let name = self.project_name();
        let mut vars = HashMap::new();
        vars.insert("PROJECT_NAME_SNAKE".to_string(), to_snake_case(&name));
        vars.insert("PROJECT_NAME_KEBAB".to_string(), to_kebab_case(&name));
        vars.insert("PROJECT_NAME_PASCAL".to_string(), to_pascal_case(&name));
        vars.insert("PROJECT_NAME".to_string(), name);
        vars.insert("YEAR".to_string(), chrono::Local::now().year().to_string());

        for (key, value) in self.answers.iter() {
            vars.insert(key.to_string(), value.to_string());
        }
        vars
    }

    /// Replace `{{name}}` markers with variable values.
    ///
    /// Unknown markers are left untouched. Inserted values are not scanned
    /// again, so an answer containing `{{x}}` stays literal.
    pub fn render(&self, input: &str) -> String {
        let vars = self.variables();
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];
            match after_open.find("}}") {
                Some(end) => {
                    let key = after_open[..end].trim();
                    match vars.get(key) {
                        Some(value) => out.push_str(value),
                        None => out.push_str(&rest[start..start + 2 + end + 2]),
                    }
                    rest = &after_open[end + 2..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

// ============================================================================
// Case conversion
// ============================================================================

fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Split on `_`, `-`, whitespace, camelCase humps and acronym boundaries
/// (`HTTPServer` → `http`, `server`). Words come back lowercased.
fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current).to_lowercase());
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current).to_lowercase());
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }
    words
}
