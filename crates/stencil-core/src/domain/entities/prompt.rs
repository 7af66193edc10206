//! Prompt declarations and collected answers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::error::DomainError;

/// One question a template asks before it is materialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSpec {
    /// Key under which the answer is stored in the context.
    pub name: String,
    /// Text shown to the operator. Falls back to `name` when empty.
    #[serde(default)]
    pub message: String,
    /// Value used when the operator leaves the answer blank.
    #[serde(default)]
    pub default: Option<String>,
}

impl PromptSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: String::new(),
            default: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Message to display, never empty.
    pub fn display_message(&self) -> &str {
        if self.message.is_empty() {
            &self.name
        } else {
            &self.message
        }
    }

    /// Turn a raw answer into the stored value.
    ///
    /// Blank (or whitespace-only) input takes the default; without a default
    /// the answer is the empty string, never absent.
    pub fn resolve(&self, raw: Option<&str>) -> String {
        match raw.map(str::trim) {
            Some(answer) if !answer.is_empty() => answer.to_string(),
            _ => self.default.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let mut chars = self.name.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !valid_start {
            return Err(DomainError::InvalidPromptName {
                name: self.name.clone(),
                reason: "must start with a letter or '_'".into(),
            });
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(DomainError::InvalidPromptName {
                name: self.name.clone(),
                reason: "only letters, digits, '_' and '-' are allowed".into(),
            });
        }
        Ok(())
    }
}

/// Answers collected for a run, keyed by prompt name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<String, String>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Answers {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
