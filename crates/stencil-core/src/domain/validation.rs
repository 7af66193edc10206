use crate::domain::{
    entities::{Answers, ProjectStructure, Template},
    error::DomainError,
};

/// The checks a run performs before anything touches the disk, in the order
/// the generate pipeline calls them.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_template(template: &Template) -> Result<(), DomainError> {
        template.validate()
    }

    pub fn validate_project_structure(structure: &ProjectStructure) -> Result<(), DomainError> {
        structure.validate()
    }

    /// Every preset answer must name a prompt the template declares.
    pub fn validate_preset_answers(template: &Template, preset: &Answers) -> Result<(), DomainError> {
        match preset.iter().find(|(name, _)| template.prompt(name).is_none()) {
            Some((name, _)) => Err(DomainError::UnknownAnswer { name: name.to_string() }),
            None => Ok(()),
        }
    }
}
