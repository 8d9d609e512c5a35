use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use super::{APP_NAME, Capability, CapabilityKind, FILE_PATH, FieldSpec};

/// Typed arguments for one adapter operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ListApplications,
    LaunchApp { app_name: String },
    OpenWithApp { app_name: String, file_path: String },
}

/// Arguments that passed validation against a capability's input shape.
///
/// Construction is sealed: the field is private and `validate` is the only
/// constructor, so the adapter never sees unvalidated input.
///
/// ```compile_fail
/// use app_launcher::capability::validate::{Intent, ValidatedArguments};
///
/// let _args = ValidatedArguments(Intent::ListApplications);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedArguments(Intent);

impl ValidatedArguments {
    pub fn into_intent(self) -> Intent {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    Missing,
    NotAString,
    Empty,
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldProblem::Missing => f.write_str("missing"),
            FieldProblem::NotAString => f.write_str("must be a string"),
            FieldProblem::Empty => f.write_str("must not be empty"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub problem: FieldProblem,
}

/// Every field that failed, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|e| e.field)
    }
}

fn render(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.problem))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check `arguments` against the capability's declared input shape.
///
/// Every declared field is checked before anything is returned. Undeclared
/// fields are ignored.
pub fn validate(
    capability: &Capability,
    arguments: &Map<String, Value>,
) -> Result<ValidatedArguments, ValidationError> {
    let mut fields = Fields {
        arguments,
        errors: Vec::new(),
    };

    let intent = match capability.kind {
        CapabilityKind::ListApplications => Intent::ListApplications,
        CapabilityKind::LaunchApp => Intent::LaunchApp {
            app_name: fields.require(&APP_NAME),
        },
        CapabilityKind::OpenWithApp => Intent::OpenWithApp {
            app_name: fields.require(&APP_NAME),
            file_path: fields.require(&FILE_PATH),
        },
    };

    if fields.errors.is_empty() {
        Ok(ValidatedArguments(intent))
    } else {
        Err(ValidationError {
            errors: fields.errors,
        })
    }
}

/// Field reader that records problems instead of stopping at the first one.
struct Fields<'a> {
    arguments: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl Fields<'_> {
    fn require(&mut self, field: &FieldSpec) -> String {
        match check_field(self.arguments.get(field.name)) {
            Ok(value) => value.to_owned(),
            Err(problem) => {
                self.errors.push(FieldError {
                    field: field.name,
                    problem,
                });
                String::new()
            }
        }
    }
}

/// Required, string, and non-empty.
fn check_field(value: Option<&Value>) -> Result<&str, FieldProblem> {
    let value = value.ok_or(FieldProblem::Missing)?;
    let text = value.as_str().ok_or(FieldProblem::NotAString)?;
    if text.is_empty() {
        return Err(FieldProblem::Empty);
    }
    Ok(text)
}
